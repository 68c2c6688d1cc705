//! Per-level comparison of the local taxonomy with a remote folder listing.

use catalog_core::{Entity, EntityKind, FolderPath};
use catalog_domain::{
    CatalogStore, EntityPath, EntityRef, PathResolver, Product, ProductGroup, ProductRange,
};

use crate::keys::NameKeyMap;
use crate::report::{LevelReport, SyncItem, SyncReport, SyncStatus};

/// Remote listing bucketed by depth, normalized and case-deduplicated.
#[derive(Debug, Default)]
struct RemoteLevels {
    levels: [NameKeyMap<String>; 3],
}

impl RemoteLevels {
    fn from_listing(remote: &[String]) -> Self {
        let mut out = Self::default();
        for raw in remote {
            match FolderPath::parse(raw) {
                Ok(path) => {
                    let display = path.to_string();
                    out.levels[path.depth() - 1].insert(&display, display.clone());
                }
                Err(e) => tracing::debug!(path = %raw, error = %e, "ignoring remote folder"),
            }
        }
        out
    }

    fn level(&self, kind: EntityKind) -> &NameKeyMap<String> {
        &self.levels[kind.depth() - 1]
    }
}

/// Classify every local entity and remote folder.
///
/// Levels are independent: a synced product does not imply its range is
/// synced. An entity linked under several parents yields one item per folder
/// path. `remote_available` is copied into the report untouched.
pub fn classify(store: &CatalogStore, remote: &[String], remote_available: bool) -> SyncReport {
    let resolver = PathResolver::new(store);
    let remote = RemoteLevels::from_listing(remote);

    let groups = store
        .groups()
        .iter()
        .map(|g| local_entry(g, EntityRef::Group(g.id.clone()), &resolver));
    let ranges = store
        .ranges()
        .iter()
        .map(|r| local_entry(r, EntityRef::Range(r.id.clone()), &resolver));
    let products = store
        .products()
        .iter()
        .map(|p| local_entry(p, EntityRef::Product(p.id.clone()), &resolver));

    SyncReport {
        remote_available,
        groups: classify_level(ProductGroup::KIND, groups, remote.level(ProductGroup::KIND)),
        ranges: classify_level(ProductRange::KIND, ranges, remote.level(ProductRange::KIND)),
        products: classify_level(Product::KIND, products, remote.level(Product::KIND)),
    }
}

struct LocalEntry {
    entity: EntityRef,
    label: String,
    paths: Vec<EntityPath>,
}

fn local_entry<E: Entity>(record: &E, entity: EntityRef, resolver: &PathResolver<'_>) -> LocalEntry {
    LocalEntry {
        paths: resolver.paths_of(&entity),
        entity,
        label: record.label().to_string(),
    }
}

fn classify_level(
    kind: EntityKind,
    local: impl Iterator<Item = LocalEntry>,
    remote: &NameKeyMap<String>,
) -> LevelReport {
    let mut report = LevelReport::new(kind);
    let mut seen = NameKeyMap::new();

    for entry in local {
        debug_assert_eq!(entry.entity.kind(), kind);
        if entry.paths.is_empty() {
            report.push(SyncItem {
                kind,
                path: entry.label,
                status: SyncStatus::Ungrouped,
                entity: Some(entry.entity),
                canonical_path: None,
            });
            continue;
        }

        for path in entry.paths {
            let display = path.display();
            // Two parent chains can spell the same folder.
            if !seen.insert(&display, ()) {
                continue;
            }
            let status = if remote.contains(&display) {
                SyncStatus::Synced
            } else {
                SyncStatus::SiteOnly
            };
            report.push(SyncItem {
                kind,
                canonical_path: Some(path.canonical()),
                path: display,
                status,
                entity: Some(entry.entity.clone()),
            });
        }
    }

    for remote_path in remote.values() {
        if seen.contains(remote_path) {
            continue;
        }
        report.push(SyncItem {
            kind,
            path: remote_path.clone(),
            status: SyncStatus::RemoteOnly,
            entity: None,
            canonical_path: None,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_domain::{NewGroup, NewProduct, NewRange};

    fn listing(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    fn shelter_store() -> CatalogStore {
        let mut store = CatalogStore::new();
        let g = store.add_group(NewGroup::named("Shelter")).into_id();
        let r = store.add_range(NewRange::named("Peninsula")).into_id();
        let p = store.add_product(NewProduct::with_code("K301")).into_id();
        store.link_range_to_group(&g, &r);
        store.link_product_to_range(&r, &p);
        store
    }

    #[test]
    fn matching_ignores_case() {
        let store = shelter_store();
        let report = classify(
            &store,
            &listing(&["shelter", "shelter/peninsula", "shelter/peninsula/k301"]),
            true,
        );
        for level in report.levels() {
            assert_eq!(level.counts.synced, 1, "{:?}", level.kind);
            assert_eq!(level.counts.total, 1);
        }
    }

    #[test]
    fn remote_case_variants_collapse_to_first_spelling() {
        let store = CatalogStore::new();
        let report = classify(&store, &listing(&["/Lighting/", "LIGHTING", "lighting"]), true);

        assert_eq!(report.groups.counts.remote_only, 1);
        assert_eq!(report.remote_only_paths(), ["Lighting"]);
    }

    #[test]
    fn site_only_and_remote_only_are_reported_per_level() {
        let store = shelter_store();
        let report = classify(&store, &listing(&["Shelter", "Seating/Benches"]), true);

        assert_eq!(report.groups.counts.synced, 1);
        assert_eq!(report.ranges.counts.site_only, 1);
        assert_eq!(report.ranges.counts.remote_only, 1);
        assert_eq!(report.products.counts.site_only, 1);
        assert_eq!(
            report.site_only_paths(),
            ["Shelter/Peninsula", "Shelter/Peninsula/K301"]
        );
        assert_eq!(report.remote_only_paths(), ["Seating/Benches"]);

        let item = report.ranges.with_status(SyncStatus::SiteOnly).next().unwrap();
        assert_eq!(item.canonical_path.as_deref(), Some("shelter/peninsula"));
    }

    #[test]
    fn ungrouped_entities_are_counted_separately() {
        let mut store = shelter_store();
        store.add_range(NewRange::named("Loose"));
        store.add_product(NewProduct::with_code("X9"));

        let report = classify(&store, &[], false);
        assert!(!report.remote_available);
        assert_eq!(report.ranges.counts.ungrouped, 1);
        assert_eq!(report.ranges.counts.total, 1);
        assert_eq!(report.products.counts.ungrouped, 1);
        let loose = report.ranges.with_status(SyncStatus::Ungrouped).next().unwrap();
        assert_eq!(loose.path, "Loose");
    }

    #[test]
    fn shared_product_is_classified_once_per_folder() {
        let mut store = shelter_store();
        let g = store.add_group(NewGroup::named("Seating")).into_id();
        let r = store.add_range(NewRange::named("Benches")).into_id();
        store.link_range_to_group(&g, &r);
        store.link_product_to_range(&r, &catalog_core::ProductId::from_name("K301"));

        let report = classify(&store, &listing(&["seating/benches/k301"]), true);
        let statuses: Vec<_> = report
            .products
            .items
            .iter()
            .map(|i| (i.path.as_str(), i.status))
            .collect();
        assert_eq!(
            statuses,
            [
                ("Shelter/Peninsula/K301", SyncStatus::SiteOnly),
                ("Seating/Benches/K301", SyncStatus::Synced),
            ]
        );
        assert_eq!(report.products.counts.remote_only, 0);
    }

    #[test]
    fn malformed_remote_entries_are_ignored() {
        let store = CatalogStore::new();
        let report = classify(&store, &listing(&["", "///", "a/b/c/d", "a/../b"]), true);
        assert_eq!(report.totals().total, 0);
    }
}
