use std::sync::Arc;

use catalog_core::{GroupId, ProductId, RangeId};
use catalog_domain::{CatalogStore, NewGroup, NewProduct, NewRange, export_data, import_data};
use catalog_infra::InMemoryObjectStorage;
use catalog_sync::{ActionError, ReconciliationEngine, SyncStatus};

fn paths(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|p| p.to_string()).collect()
}

fn gid(name: &str) -> GroupId {
    GroupId::from_name(name)
}

fn rid(name: &str) -> RangeId {
    RangeId::from_name(name)
}

fn pid(code: &str) -> ProductId {
    ProductId::from_name(code)
}

fn shelter_store() -> CatalogStore {
    let mut store = CatalogStore::new();
    store.add_group(NewGroup::named("Shelter"));
    store.add_range(NewRange::named("Peninsula"));
    store.add_product(NewProduct::with_code("K301"));
    store.link_range_to_group(&gid("Shelter"), &rid("Peninsula"));
    store.link_product_to_range(&rid("Peninsula"), &pid("K301"));
    store
}

#[test]
fn document_round_trip_keeps_relationships() {
    let mut store = shelter_store();
    store.add_range(NewRange::named("Harbour"));
    store.link_range_to_group(&gid("Shelter"), &rid("Harbour"));
    store.add_product(NewProduct::with_code("K302"));
    store.link_product_to_range(&rid("Peninsula"), &pid("K302"));

    let doc = export_data(&store);
    let mut restored = CatalogStore::new();
    import_data(&mut restored, &doc);

    assert_eq!(
        restored.range_ids_in_group(&gid("Shelter")),
        [rid("Peninsula"), rid("Harbour")]
    );
    assert_eq!(
        restored.product_ids_in_range(&rid("Peninsula")),
        [pid("K301"), pid("K302")]
    );
}

#[test]
fn linking_twice_keeps_one_entry() {
    let mut store = shelter_store();
    store.link_range_to_group(&gid("shelter"), &rid("peninsula"));
    assert_eq!(store.range_ids_in_group(&gid("Shelter")).len(), 1);
}

#[test]
fn removing_group_cascades_to_exclusive_children() {
    let mut store = CatalogStore::new();
    store.add_group(NewGroup::named("g1"));
    store.add_range(NewRange::named("r1"));
    store.add_product(NewProduct::with_code("p1"));
    store.link_range_to_group(&gid("g1"), &rid("r1"));
    store.link_product_to_range(&rid("r1"), &pid("p1"));

    store.remove_group(&gid("g1"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn classification_is_case_insensitive() {
    let storage = InMemoryObjectStorage::with_folders([
        "shelter",
        "shelter/peninsula",
        "shelter/peninsula/k301",
    ]);
    let engine = ReconciliationEngine::new(storage);

    let report = engine.analyze(&shelter_store(), false).await;
    assert!(report.remote_available);
    let product = &report.products.items[0];
    assert_eq!(product.path, "Shelter/Peninsula/K301");
    assert_eq!(product.status, SyncStatus::Synced);
    assert_eq!(report.totals().remote_only, 0);
}

#[tokio::test]
async fn import_provisions_ancestors_once() {
    let storage = InMemoryObjectStorage::with_folders([
        "NewCat",
        "NewCat/NewRange",
        "NewCat/NewRange/NP001",
        "NewCat/NewRange/NP002",
    ]);
    let engine = ReconciliationEngine::new(storage);
    let mut store = CatalogStore::new();

    let selected = paths(&["NewCat/NewRange/NP001", "NewCat/NewRange/NP002"]);
    let result = engine.import(&mut store, &selected);

    assert_eq!(result.success_count, 2);
    assert!(result.is_clean());
    assert_eq!(store.groups().len(), 1);
    assert_eq!(store.ranges().len(), 1);
    assert_eq!(
        store.product_ids_in_range(&rid("NewRange")),
        [pid("NP001"), pid("NP002")]
    );

    let report = engine.analyze(&store, true).await;
    for level in report.levels() {
        assert_eq!(level.counts.synced, level.counts.total, "{:?}", level.kind);
    }
}

#[tokio::test]
async fn import_failure_is_isolated_to_its_item() {
    let engine = ReconciliationEngine::new(InMemoryObjectStorage::new());
    let mut store = CatalogStore::new();

    let selected = paths(&["Alpha/One/A1", "Broken/###/B1", "Gamma/Three/C1"]);
    let result = engine.import(&mut store, &selected);

    assert_eq!(result.success_count, 2);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, "Broken/###/B1");
    assert!(matches!(result.errors[0].error, ActionError::Import(_)));

    assert!(store.contains_product(&pid("A1")));
    assert!(store.contains_product(&pid("C1")));
    assert!(!store.contains_group(&gid("Broken")));
}

#[tokio::test]
async fn push_failure_is_isolated_to_its_item() {
    let storage = Arc::new(InMemoryObjectStorage::new());
    storage.fail_creates_for("Shelter/Peninsula/K302");
    let engine = ReconciliationEngine::new(storage.clone());

    let selected = paths(&[
        "Shelter/Peninsula/K301",
        "Shelter/Peninsula/K302",
        "Shelter/Peninsula/K303",
    ]);
    let result = engine.push(&selected).await;

    assert_eq!(result.success_count, 2);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, "Shelter/Peninsula/K302");
    assert!(matches!(result.errors[0].error, ActionError::Gateway(_)));

    let folders = storage.folders();
    assert!(folders.contains(&"Shelter/Peninsula/K301".to_string()));
    assert!(folders.contains(&"Shelter/Peninsula/K303".to_string()));
    assert!(!folders.contains(&"Shelter/Peninsula/K302".to_string()));
}

#[tokio::test]
async fn push_then_analyze_converges() {
    let engine = ReconciliationEngine::new(InMemoryObjectStorage::new());
    let store = shelter_store();

    let before = engine.analyze(&store, true).await;
    let result = engine.push(&before.site_only_paths()).await;
    assert_eq!(result.success_count, 3);

    let after = engine.analyze(&store, true).await;
    assert_eq!(after.totals().synced, 3);
    assert!(after.site_only_paths().is_empty());
}

#[test]
fn dry_run_matches_real_import() {
    let engine = ReconciliationEngine::new(InMemoryObjectStorage::new());
    let mut store = shelter_store();
    let selected = paths(&["shelter/peninsula/K999", "Lighting/Posts"]);

    let plan = engine.plan_import(&store, &selected);
    assert_eq!(store, shelter_store());

    let result = engine.import(&mut store, &selected);
    assert_eq!(plan.items.len(), result.success_count);
    assert_eq!(
        store.stats().products + store.stats().ranges + store.stats().groups,
        3 + plan.created_count()
    );
}

#[tokio::test]
async fn import_links_existing_leaf_under_new_parent() {
    let storage = InMemoryObjectStorage::with_folders([
        "Shelter",
        "Shelter/Peninsula",
        "Shelter/Peninsula/K301",
        "Seating",
        "Seating/Benches",
        "Seating/Benches/K301",
    ]);
    let engine = ReconciliationEngine::new(storage);
    let mut store = shelter_store();

    let before = engine.analyze(&store, true).await;
    assert_eq!(
        before.remote_only_paths(),
        ["Seating", "Seating/Benches", "Seating/Benches/K301"]
    );

    let result = engine.import(&mut store, &before.remote_only_paths());
    assert!(result.is_clean());
    assert_eq!(store.products().len(), 1);
    assert_eq!(store.product_ids_in_range(&rid("Benches")), [pid("K301")]);

    let after = engine.analyze(&store, true).await;
    let k301: Vec<_> = after
        .products
        .items
        .iter()
        .map(|i| (i.path.as_str(), i.status))
        .collect();
    assert_eq!(
        k301,
        [
            ("Shelter/Peninsula/K301", SyncStatus::Synced),
            ("Seating/Benches/K301", SyncStatus::Synced),
        ]
    );
    assert!(after.remote_only_paths().is_empty());
    assert!(after.site_only_paths().is_empty());
}

#[test]
fn document_import_matches_keys_across_steps() {
    let doc: catalog_domain::Document = serde_json::from_value(serde_json::json!({
        "steps": [
            { "step": 1, "categories": ["Shelter"] },
            { "step": 2, "ranges": { "shelter": ["Peninsula Range"] } },
            { "step": 3, "products": { "peninsula range": ["K301"] } },
            { "step": 4, "productDetails": { "k301": { "name": "Four Bay" } } }
        ]
    }))
    .unwrap();

    let mut store = CatalogStore::new();
    import_data(&mut store, &doc);

    assert_eq!(store.range_ids_in_group(&gid("Shelter")), [rid("Peninsula Range")]);
    assert_eq!(store.product_ids_in_range(&rid("Peninsula Range")), [pid("K301")]);
    let k301 = store.product(&pid("K301")).unwrap();
    assert_eq!(k301.code, "K301");
    assert_eq!(k301.name, "Four Bay");
    assert_eq!(store.stats().products, 1);

    let exported = export_data(&store);
    assert_eq!(exported.products_by_range().unwrap()["Peninsula Range"], ["K301"]);
}
