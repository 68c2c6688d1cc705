//! Storage path resolution for catalog entities.
//!
//! Two spellings exist for every resolvable entity:
//!
//! - the **canonical** path, built from sanitized segments (`shelter/peninsula/k301`),
//!   used when a folder has to be provisioned under a predictable name;
//! - the **display** path, built from the raw names (`Shelter/Peninsula/K301`),
//!   which is what the reconciliation engine compares (case-insensitively)
//!   against operator-typed remote folders.

use serde::Serialize;

use catalog_core::{EntityKind, GroupId, ProductId, RangeId, slugify};

use crate::model::{EntityRef, ProductGroup, ProductRange};
use crate::store::CatalogStore;

/// Sanitize one path segment (same rules as id derivation).
pub fn sanitize(segment: &str) -> String {
    slugify(segment)
}

/// Spell a raw name as one folder segment.
///
/// Names and codes may contain `/` (e.g. `K301/A`); as a folder that would
/// split into extra levels, so separators become `-`.
pub fn folder_segment(name: &str) -> String {
    name.trim().replace(['/', '\\'], "-")
}

/// Resolved location of an entity in the folder hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityPath {
    pub kind: EntityKind,
    /// Raw names, root first.
    pub segments: Vec<String>,
}

impl EntityPath {
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Raw-name path, e.g. `Shelter/Peninsula/K301`. Always has `depth()`
    /// folder segments.
    pub fn display(&self) -> String {
        self.segments
            .iter()
            .map(|s| folder_segment(s))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Sanitized path, e.g. `shelter/peninsula/k301`.
    pub fn canonical(&self) -> String {
        self.segments
            .iter()
            .map(|s| sanitize(s))
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Computes entity paths by walking link tables upwards.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    store: &'a CatalogStore,
}

impl<'a> PathResolver<'a> {
    pub fn new(store: &'a CatalogStore) -> Self {
        Self { store }
    }

    pub fn group_path(&self, id: &GroupId) -> Option<EntityPath> {
        let group = self.store.group(id)?;
        Some(EntityPath {
            kind: EntityKind::Group,
            segments: vec![group.name.clone()],
        })
    }

    /// `None` when the range has no parent group.
    pub fn range_path(&self, id: &RangeId) -> Option<EntityPath> {
        let range = self.store.range(id)?;
        let group = self.store.parent_group(id)?;
        Some(EntityPath {
            kind: EntityKind::Range,
            segments: vec![group.name.clone(), range.name.clone()],
        })
    }

    /// `None` unless the product resolves through a range to a group.
    ///
    /// When a product is listed by several ranges, the first range (in store
    /// order) that itself has a group wins.
    pub fn product_path(&self, id: &ProductId) -> Option<EntityPath> {
        let product = self.store.product(id)?;
        let (group, range) = self.grouped_parent_range(id)?;
        Some(EntityPath {
            kind: EntityKind::Product,
            segments: vec![group.name.clone(), range.name.clone(), product.code.clone()],
        })
    }

    pub fn path_of(&self, entity: &EntityRef) -> Option<EntityPath> {
        match entity {
            EntityRef::Group(id) => self.group_path(id),
            EntityRef::Range(id) => self.range_path(id),
            EntityRef::Product(id) => self.product_path(id),
        }
    }

    /// Every path the entity resolves through, one per parent chain, in store
    /// order. The first one (if any) equals `path_of`.
    pub fn paths_of(&self, entity: &EntityRef) -> Vec<EntityPath> {
        match entity {
            EntityRef::Group(id) => self.group_path(id).into_iter().collect(),
            EntityRef::Range(id) => {
                let Some(range) = self.store.range(id) else {
                    return Vec::new();
                };
                self.store
                    .groups_of_range(id)
                    .into_iter()
                    .map(|group| EntityPath {
                        kind: EntityKind::Range,
                        segments: vec![group.name.clone(), range.name.clone()],
                    })
                    .collect()
            }
            EntityRef::Product(id) => {
                let Some(product) = self.store.product(id) else {
                    return Vec::new();
                };
                self.store
                    .ranges_of_product(id)
                    .into_iter()
                    .flat_map(|range| {
                        self.store
                            .groups_of_range(&range.id)
                            .into_iter()
                            .map(move |group| (group, range))
                    })
                    .map(|(group, range)| EntityPath {
                        kind: EntityKind::Product,
                        segments: vec![group.name.clone(), range.name.clone(), product.code.clone()],
                    })
                    .collect()
            }
        }
    }

    /// `/`-joined sanitized path from root to entity.
    pub fn canonical_path(&self, entity: &EntityRef) -> Option<String> {
        self.path_of(entity).map(|p| p.canonical())
    }

    fn grouped_parent_range(&self, product: &ProductId) -> Option<(&'a ProductGroup, &'a ProductRange)> {
        self.store
            .ranges_of_product(product)
            .into_iter()
            .find_map(|range| self.store.parent_group(&range.id).map(|group| (group, range)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewGroup, NewProduct, NewRange};

    fn store() -> CatalogStore {
        let mut store = CatalogStore::new();
        let g = store.add_group(NewGroup::named("Bus Shelters")).into_id();
        let r = store.add_range(NewRange::named("Peninsula Range")).into_id();
        let p = store.add_product(NewProduct::with_code("K301/A")).into_id();
        store.link_range_to_group(&g, &r);
        store.link_product_to_range(&r, &p);
        store
    }

    #[test]
    fn resolves_all_three_levels() {
        let store = store();
        let resolver = PathResolver::new(&store);

        let group = resolver.group_path(&GroupId::from_name("Bus Shelters")).unwrap();
        assert_eq!(group.canonical(), "bus-shelters");

        let range = resolver.range_path(&RangeId::from_name("Peninsula Range")).unwrap();
        assert_eq!(range.display(), "Bus Shelters/Peninsula Range");
        assert_eq!(range.canonical(), "bus-shelters/peninsula-range");

        let product = resolver.product_path(&ProductId::from_name("K301/A")).unwrap();
        assert_eq!(product.canonical(), "bus-shelters/peninsula-range/k301a");
        assert_eq!(product.depth(), 3);
    }

    #[test]
    fn separators_in_names_stay_inside_one_segment() {
        let store = store();
        let product = PathResolver::new(&store)
            .product_path(&ProductId::from_name("K301/A"))
            .unwrap();

        assert_eq!(product.display(), "Bus Shelters/Peninsula Range/K301-A");
        let folder = catalog_core::FolderPath::parse(&product.display()).unwrap();
        assert_eq!(folder.depth(), 3);
        assert_eq!(folder.leaf(), "K301-A");
    }

    #[test]
    fn unresolved_parent_yields_none() {
        let mut store = store();
        let r = RangeId::from_name("Peninsula Range");
        store.unlink_range_from_group(&GroupId::from_name("Bus Shelters"), &r);
        let resolver = PathResolver::new(&store);

        assert!(resolver.range_path(&r).is_none());
        assert!(resolver.product_path(&ProductId::from_name("K301/A")).is_none());
        assert!(resolver.canonical_path(&EntityRef::Range(r)).is_none());
    }

    #[test]
    fn every_parent_chain_yields_a_path() {
        let mut store = store();
        let g2 = store.add_group(NewGroup::named("Seating")).into_id();
        let r2 = store.add_range(NewRange::named("Benches")).into_id();
        let p = ProductId::from_name("K301/A");
        store.link_range_to_group(&g2, &r2);
        store.link_range_to_group(&g2, &RangeId::from_name("Peninsula Range"));
        store.link_product_to_range(&r2, &p);

        let resolver = PathResolver::new(&store);
        let entity = EntityRef::Product(p);
        let paths: Vec<String> = resolver.paths_of(&entity).iter().map(|p| p.display()).collect();
        assert_eq!(
            paths,
            [
                "Bus Shelters/Peninsula Range/K301-A",
                "Seating/Peninsula Range/K301-A",
                "Seating/Benches/K301-A",
            ]
        );
        assert_eq!(resolver.path_of(&entity).unwrap().display(), paths[0]);
    }

    #[test]
    fn product_uses_first_range_that_has_a_group() {
        let mut store = CatalogStore::new();
        let orphan = store.add_range(NewRange::named("Orphan")).into_id();
        let g = store.add_group(NewGroup::named("Seating")).into_id();
        let r = store.add_range(NewRange::named("Benches")).into_id();
        let p = store.add_product(NewProduct::with_code("B1")).into_id();
        store.link_range_to_group(&g, &r);
        store.link_product_to_range(&orphan, &p);
        store.link_product_to_range(&r, &p);

        let path = PathResolver::new(&store).product_path(&p).unwrap();
        assert_eq!(path.display(), "Seating/Benches/B1");
    }
}
