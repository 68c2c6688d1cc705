use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use catalog_domain::{CatalogStore, NewGroup, NewProduct, NewRange};
use catalog_sync::classify;

/// `groups` groups × 10 ranges × 10 products, all linked.
fn build_store(groups: usize) -> CatalogStore {
    let mut store = CatalogStore::new();
    for g in 0..groups {
        let group = store.add_group(NewGroup::named(format!("Group {g}"))).into_id();
        for r in 0..10 {
            let range = store
                .add_range(NewRange::named(format!("Range {g}-{r}")))
                .into_id();
            store.link_range_to_group(&group, &range);
            for p in 0..10 {
                let product = store
                    .add_product(NewProduct::with_code(format!("P{g}-{r}-{p}")))
                    .into_id();
                store.link_product_to_range(&range, &product);
            }
        }
    }
    store
}

/// Half of the local folders (lowercased) plus as many unknown ones.
fn build_listing(groups: usize) -> Vec<String> {
    let mut out = Vec::new();
    for g in 0..groups {
        if g % 2 == 0 {
            out.push(format!("group {g}"));
            for r in 0..10 {
                out.push(format!("group {g}/range {g}-{r}"));
                for p in 0..10 {
                    out.push(format!("group {g}/range {g}-{r}/p{g}-{r}-{p}"));
                }
            }
        } else {
            out.push(format!("Remote {g}/Only/X{g}"));
        }
    }
    out
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    for size in [1usize, 10, 50] {
        let store = build_store(size);
        let listing = build_listing(size);
        group.throughput(Throughput::Elements((size * 111) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| classify(black_box(&store), black_box(&listing), true));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_classify);
criterion_main!(benches);
