//! Normalized catalog store: entity collections plus ordered link tables.
//!
//! The store is the single owner of catalog state. It is passed explicitly to
//! the document transform and the reconciliation engine; nothing here is
//! global.
//!
//! ## Invariants
//!
//! - Entity ids are slugs of the entity name/code; adding a second entity with
//!   the same slug leaves the store untouched and reports `AddOutcome::Duplicate`.
//! - Link tables only ever reference ids present in the entity collections.
//! - Entities with no parent are legal.
//! - No operation panics or fails; operating on an absent id is a no-op.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;
use tracing::debug;

use catalog_core::{GroupId, ProductId, RangeId};

use crate::document::WizardExtras;
use crate::model::{
    GroupPatch, NewGroup, NewProduct, NewRange, Product, ProductGroup, ProductPatch, ProductRange,
    RangePatch,
};

/// Result of an `add_*` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome<Id> {
    /// A new entity was inserted.
    Created(Id),
    /// An entity with the same derived id already existed; nothing changed.
    Duplicate(Id),
}

impl<Id> AddOutcome<Id> {
    pub fn id(&self) -> &Id {
        match self {
            AddOutcome::Created(id) | AddOutcome::Duplicate(id) => id,
        }
    }

    pub fn into_id(self) -> Id {
        match self {
            AddOutcome::Created(id) | AddOutcome::Duplicate(id) => id,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, AddOutcome::Created(_))
    }
}

/// Ordered parent → children lists.
#[derive(Debug, Clone)]
struct LinkTable<P, C> {
    lists: HashMap<P, Vec<C>>,
}

impl<P: Eq + Hash, C: PartialEq> PartialEq for LinkTable<P, C> {
    fn eq(&self, other: &Self) -> bool {
        self.lists == other.lists
    }
}

impl<P, C> Default for LinkTable<P, C> {
    fn default() -> Self {
        Self {
            lists: HashMap::new(),
        }
    }
}

impl<P, C> LinkTable<P, C>
where
    P: Clone + Eq + Hash,
    C: Clone + PartialEq,
{
    fn init(&mut self, parent: P) {
        self.lists.entry(parent).or_default();
    }

    fn children(&self, parent: &P) -> &[C] {
        self.lists.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    fn contains(&self, parent: &P, child: &C) -> bool {
        self.children(parent).contains(child)
    }

    fn has_any_parent(&self, child: &C) -> bool {
        self.lists.values().any(|list| list.contains(child))
    }

    fn link(&mut self, parent: &P, child: C) -> bool {
        let list = self.lists.entry(parent.clone()).or_default();
        if list.contains(&child) {
            return false;
        }
        list.push(child);
        true
    }

    fn unlink(&mut self, parent: &P, child: &C) -> bool {
        match self.lists.get_mut(parent) {
            Some(list) => {
                let before = list.len();
                list.retain(|c| c != child);
                list.len() != before
            }
            None => false,
        }
    }

    /// Drop a parent's list, returning the children it held.
    fn remove_parent(&mut self, parent: &P) -> Vec<C> {
        self.lists.remove(parent).unwrap_or_default()
    }

    /// Remove a child from every parent's list.
    fn detach(&mut self, child: &C) {
        for list in self.lists.values_mut() {
            list.retain(|c| c != child);
        }
    }

    fn reorder(&mut self, parent: &P, order: &[C]) {
        if let Some(list) = self.lists.get_mut(parent) {
            *list = apply_order(list, order, |c| c.clone());
        }
    }

    fn link_count(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    fn clear(&mut self) {
        self.lists.clear();
    }
}

/// Items named in `order` (that exist in `current`) first, then the rest in
/// their original relative order.
fn apply_order<T, K>(current: &[T], order: &[K], key: impl Fn(&T) -> K) -> Vec<T>
where
    T: Clone,
    K: PartialEq,
{
    let mut placed = vec![false; current.len()];
    let mut out = Vec::with_capacity(current.len());

    for wanted in order {
        if let Some(idx) = current
            .iter()
            .enumerate()
            .position(|(i, item)| !placed[i] && &key(item) == wanted)
        {
            placed[idx] = true;
            out.push(current[idx].clone());
        }
    }
    for (idx, item) in current.iter().enumerate() {
        if !placed[idx] {
            out.push(item.clone());
        }
    }
    out
}

/// Entity and link counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub groups: usize,
    pub ranges: usize,
    pub products: usize,
    pub group_links: usize,
    pub range_links: usize,
}

/// The authoritative in-memory catalog repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogStore {
    groups: Vec<ProductGroup>,
    ranges: Vec<ProductRange>,
    products: Vec<Product>,
    group_to_ranges: LinkTable<GroupId, RangeId>,
    range_to_products: LinkTable<RangeId, ProductId>,
    extras: WizardExtras,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    pub fn add_group(&mut self, data: NewGroup) -> AddOutcome<GroupId> {
        let id = data.id();
        if self.contains_group(&id) {
            debug!(group_id = %id, name = %data.name, "group already exists, add ignored");
            return AddOutcome::Duplicate(id);
        }
        self.groups.push(data.into_group());
        self.group_to_ranges.init(id.clone());
        AddOutcome::Created(id)
    }

    pub fn add_range(&mut self, data: NewRange) -> AddOutcome<RangeId> {
        let id = data.id();
        if self.contains_range(&id) {
            debug!(range_id = %id, name = %data.name, "range already exists, add ignored");
            return AddOutcome::Duplicate(id);
        }
        self.ranges.push(data.into_range());
        self.range_to_products.init(id.clone());
        AddOutcome::Created(id)
    }

    pub fn add_product(&mut self, data: NewProduct) -> AddOutcome<ProductId> {
        let id = data.id();
        if self.contains_product(&id) {
            debug!(product_id = %id, code = %data.code, "product already exists, add ignored");
            return AddOutcome::Duplicate(id);
        }
        self.products.push(data.into_product());
        AddOutcome::Created(id)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    pub fn update_group(&mut self, id: &GroupId, patch: GroupPatch) {
        match self.groups.iter_mut().find(|g| &g.id == id) {
            Some(group) => patch.apply_to(group),
            None => debug!(group_id = %id, "update of unknown group ignored"),
        }
    }

    pub fn update_range(&mut self, id: &RangeId, patch: RangePatch) {
        match self.ranges.iter_mut().find(|r| &r.id == id) {
            Some(range) => patch.apply_to(range),
            None => debug!(range_id = %id, "update of unknown range ignored"),
        }
    }

    pub fn update_product(&mut self, id: &ProductId, patch: ProductPatch) {
        match self.products.iter_mut().find(|p| &p.id == id) {
            Some(product) => patch.apply_to(product),
            None => debug!(product_id = %id, "update of unknown product ignored"),
        }
    }

    // ------------------------------------------------------------------
    // Delete (cascading)
    // ------------------------------------------------------------------

    /// Remove a group, the ranges only it referenced, and their exclusive products.
    pub fn remove_group(&mut self, id: &GroupId) {
        let Some(pos) = self.groups.iter().position(|g| &g.id == id) else {
            debug!(group_id = %id, "remove of unknown group ignored");
            return;
        };
        self.groups.remove(pos);

        for range_id in self.group_to_ranges.remove_parent(id) {
            if !self.group_to_ranges.has_any_parent(&range_id) {
                self.remove_range(&range_id);
            }
        }
    }

    /// Remove a range, detach it from every group and drop products it alone held.
    pub fn remove_range(&mut self, id: &RangeId) {
        let Some(pos) = self.ranges.iter().position(|r| &r.id == id) else {
            debug!(range_id = %id, "remove of unknown range ignored");
            return;
        };
        self.ranges.remove(pos);
        self.group_to_ranges.detach(id);

        for product_id in self.range_to_products.remove_parent(id) {
            if !self.range_to_products.has_any_parent(&product_id) {
                self.remove_product(&product_id);
            }
        }
    }

    /// Remove a product and its link entries. No further cascade.
    pub fn remove_product(&mut self, id: &ProductId) {
        let Some(pos) = self.products.iter().position(|p| &p.id == id) else {
            debug!(product_id = %id, "remove of unknown product ignored");
            return;
        };
        self.products.remove(pos);
        self.range_to_products.detach(id);
    }

    // ------------------------------------------------------------------
    // Links
    // ------------------------------------------------------------------

    /// Append `range` to `group`'s list unless already present.
    pub fn link_range_to_group(&mut self, group: &GroupId, range: &RangeId) {
        if !self.contains_group(group) || !self.contains_range(range) {
            debug!(group_id = %group, range_id = %range, "link with unknown id ignored");
            return;
        }
        self.group_to_ranges.link(group, range.clone());
    }

    pub fn unlink_range_from_group(&mut self, group: &GroupId, range: &RangeId) {
        self.group_to_ranges.unlink(group, range);
    }

    /// Append `product` to `range`'s list unless already present.
    pub fn link_product_to_range(&mut self, range: &RangeId, product: &ProductId) {
        if !self.contains_range(range) || !self.contains_product(product) {
            debug!(range_id = %range, product_id = %product, "link with unknown id ignored");
            return;
        }
        self.range_to_products.link(range, product.clone());
    }

    pub fn unlink_product_from_range(&mut self, range: &RangeId, product: &ProductId) {
        self.range_to_products.unlink(range, product);
    }

    // ------------------------------------------------------------------
    // Ordering
    // ------------------------------------------------------------------

    pub fn reorder_groups(&mut self, order: &[GroupId]) {
        self.groups = apply_order(&self.groups, order, |g| g.id.clone());
    }

    pub fn reorder_ranges_in_group(&mut self, group: &GroupId, order: &[RangeId]) {
        self.group_to_ranges.reorder(group, order);
    }

    pub fn reorder_products_in_range(&mut self, range: &RangeId, order: &[ProductId]) {
        self.range_to_products.reorder(range, order);
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn groups(&self) -> &[ProductGroup] {
        &self.groups
    }

    pub fn ranges(&self) -> &[ProductRange] {
        &self.ranges
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn group(&self, id: &GroupId) -> Option<&ProductGroup> {
        self.groups.iter().find(|g| &g.id == id)
    }

    pub fn range(&self, id: &RangeId) -> Option<&ProductRange> {
        self.ranges.iter().find(|r| &r.id == id)
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn contains_group(&self, id: &GroupId) -> bool {
        self.group(id).is_some()
    }

    pub fn contains_range(&self, id: &RangeId) -> bool {
        self.range(id).is_some()
    }

    pub fn contains_product(&self, id: &ProductId) -> bool {
        self.product(id).is_some()
    }

    /// Raw ordered range ids linked under a group.
    pub fn range_ids_in_group(&self, group: &GroupId) -> &[RangeId] {
        self.group_to_ranges.children(group)
    }

    /// Raw ordered product ids linked under a range.
    pub fn product_ids_in_range(&self, range: &RangeId) -> &[ProductId] {
        self.range_to_products.children(range)
    }

    /// Ranges of a group in display order; ids that do not resolve are skipped.
    pub fn ranges_in_group(&self, group: &GroupId) -> Vec<&ProductRange> {
        self.range_ids_in_group(group)
            .iter()
            .filter_map(|id| self.range(id))
            .collect()
    }

    /// Products of a range in display order; ids that do not resolve are skipped.
    pub fn products_in_range(&self, range: &RangeId) -> Vec<&Product> {
        self.product_ids_in_range(range)
            .iter()
            .filter_map(|id| self.product(id))
            .collect()
    }

    /// Every group listing `range`, in group order.
    pub fn groups_of_range(&self, range: &RangeId) -> Vec<&ProductGroup> {
        self.groups
            .iter()
            .filter(|g| self.group_to_ranges.contains(&g.id, range))
            .collect()
    }

    /// Every range listing `product`, in range order.
    pub fn ranges_of_product(&self, product: &ProductId) -> Vec<&ProductRange> {
        self.ranges
            .iter()
            .filter(|r| self.range_to_products.contains(&r.id, product))
            .collect()
    }

    /// First group (in group order) that lists `range`.
    pub fn parent_group(&self, range: &RangeId) -> Option<&ProductGroup> {
        self.groups
            .iter()
            .find(|g| self.group_to_ranges.contains(&g.id, range))
    }

    /// First range (in range order) that lists `product`.
    pub fn parent_range(&self, product: &ProductId) -> Option<&ProductRange> {
        self.ranges
            .iter()
            .find(|r| self.range_to_products.contains(&r.id, product))
    }

    pub fn is_range_ungrouped(&self, range: &RangeId) -> bool {
        !self.group_to_ranges.has_any_parent(range)
    }

    pub fn is_product_unranged(&self, product: &ProductId) -> bool {
        !self.range_to_products.has_any_parent(product)
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            groups: self.groups.len(),
            ranges: self.ranges.len(),
            products: self.products.len(),
            group_links: self.group_to_ranges.link_count(),
            range_links: self.range_to_products.link_count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.ranges.is_empty() && self.products.is_empty()
    }

    // ------------------------------------------------------------------
    // Document pass-through payload
    // ------------------------------------------------------------------

    pub fn wizard_extras(&self) -> &WizardExtras {
        &self.extras
    }

    pub fn set_wizard_extras(&mut self, extras: WizardExtras) {
        self.extras = extras;
    }

    /// Drop every entity, link and pass-through payload.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.ranges.clear();
        self.products.clear();
        self.group_to_ranges.clear();
        self.range_to_products.clear();
        self.extras = WizardExtras::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gid(name: &str) -> GroupId {
        GroupId::from_name(name)
    }

    fn rid(name: &str) -> RangeId {
        RangeId::from_name(name)
    }

    fn pid(code: &str) -> ProductId {
        ProductId::from_name(code)
    }

    /// g1 → r1 → p1
    fn chain() -> CatalogStore {
        let mut store = CatalogStore::new();
        let g = store.add_group(NewGroup::named("g1")).into_id();
        let r = store.add_range(NewRange::named("r1")).into_id();
        let p = store.add_product(NewProduct::with_code("p1")).into_id();
        store.link_range_to_group(&g, &r);
        store.link_product_to_range(&r, &p);
        store
    }

    #[test]
    fn add_derives_slug_id() {
        let mut store = CatalogStore::new();
        let outcome = store.add_group(NewGroup::named("Street Furniture"));
        assert_eq!(outcome, AddOutcome::Created(gid("street-furniture")));
        assert_eq!(store.groups()[0].name, "Street Furniture");
    }

    #[test]
    fn add_with_colliding_slug_is_reported_and_ignored() {
        let mut store = CatalogStore::new();
        store.add_group(NewGroup::named("Shelter").with_description("first"));
        let outcome = store.add_group(NewGroup::named("SHELTER").with_description("second"));

        assert_eq!(outcome, AddOutcome::Duplicate(gid("shelter")));
        assert_eq!(store.groups().len(), 1);
        assert_eq!(store.groups()[0].description, "first");
    }

    #[test]
    fn link_is_idempotent() {
        let mut store = CatalogStore::new();
        store.add_group(NewGroup::named("shelter"));
        store.add_range(NewRange::named("peninsula"));

        store.link_range_to_group(&gid("shelter"), &rid("peninsula"));
        store.link_range_to_group(&gid("shelter"), &rid("peninsula"));

        assert_eq!(store.range_ids_in_group(&gid("shelter")), [rid("peninsula")]);
    }

    #[test]
    fn link_preserves_insertion_order() {
        let mut store = CatalogStore::new();
        store.add_group(NewGroup::named("shelter"));
        for name in ["b", "a", "c"] {
            store.add_range(NewRange::named(name));
            store.link_range_to_group(&gid("shelter"), &rid(name));
        }
        store.link_range_to_group(&gid("shelter"), &rid("a"));

        assert_eq!(store.range_ids_in_group(&gid("shelter")), [rid("b"), rid("a"), rid("c")]);
    }

    #[test]
    fn link_with_unknown_ids_is_ignored() {
        let mut store = CatalogStore::new();
        store.add_group(NewGroup::named("shelter"));
        store.link_range_to_group(&gid("shelter"), &rid("ghost"));
        store.link_product_to_range(&rid("ghost"), &pid("p1"));

        assert!(store.range_ids_in_group(&gid("shelter")).is_empty());
        assert_eq!(store.stats().group_links, 0);
        assert_eq!(store.stats().range_links, 0);
    }

    #[test]
    fn unlink_is_idempotent_and_leaves_entity_ungrouped() {
        let mut store = chain();
        store.unlink_range_from_group(&gid("g1"), &rid("r1"));
        store.unlink_range_from_group(&gid("g1"), &rid("r1"));

        assert!(store.contains_range(&rid("r1")));
        assert!(store.is_range_ungrouped(&rid("r1")));
        assert!(store.parent_group(&rid("r1")).is_none());
    }

    #[test]
    fn remove_group_cascades_to_exclusive_children() {
        let mut store = chain();
        store.remove_group(&gid("g1"));

        assert!(!store.contains_range(&rid("r1")));
        assert!(!store.contains_product(&pid("p1")));
        assert_eq!(store.stats(), StoreStats::default());
    }

    #[test]
    fn remove_group_keeps_ranges_shared_with_another_group() {
        let mut store = chain();
        store.add_group(NewGroup::named("g2"));
        store.link_range_to_group(&gid("g2"), &rid("r1"));

        store.remove_group(&gid("g1"));

        assert!(store.contains_range(&rid("r1")));
        assert!(store.contains_product(&pid("p1")));
        assert_eq!(store.parent_group(&rid("r1")).unwrap().id, gid("g2"));
    }

    #[test]
    fn remove_range_detaches_and_cascades() {
        let mut store = chain();
        store.add_range(NewRange::named("r2"));
        store.add_product(NewProduct::with_code("p2"));
        store.link_product_to_range(&rid("r1"), &pid("p2"));
        store.link_product_to_range(&rid("r2"), &pid("p2"));

        store.remove_range(&rid("r1"));

        assert!(store.range_ids_in_group(&gid("g1")).is_empty());
        assert!(!store.contains_product(&pid("p1")));
        // p2 is still reachable through r2.
        assert!(store.contains_product(&pid("p2")));
        assert_eq!(store.product_ids_in_range(&rid("r2")), [pid("p2")]);
    }

    #[test]
    fn remove_product_is_a_leaf_operation() {
        let mut store = chain();
        store.remove_product(&pid("p1"));

        assert!(store.contains_range(&rid("r1")));
        assert!(store.product_ids_in_range(&rid("r1")).is_empty());
    }

    #[test]
    fn operations_on_missing_ids_are_noops() {
        let mut store = chain();
        let before = store.clone();

        store.update_group(&gid("nope"), GroupPatch::default());
        store.update_range(&rid("nope"), RangePatch::default());
        store.update_product(&pid("nope"), ProductPatch::default());
        store.remove_group(&gid("nope"));
        store.remove_range(&rid("nope"));
        store.remove_product(&pid("nope"));
        store.unlink_product_from_range(&rid("nope"), &pid("p1"));

        assert_eq!(store, before);
    }

    #[test]
    fn update_keeps_id_when_renamed() {
        let mut store = chain();
        store.update_range(
            &rid("r1"),
            RangePatch {
                name: Some("Renamed".to_string()),
                tags: Some(vec!["steel".to_string()]),
                ..RangePatch::default()
            },
        );

        let range = store.range(&rid("r1")).unwrap();
        assert_eq!(range.name, "Renamed");
        assert_eq!(range.tags, ["steel"]);
    }

    #[test]
    fn parent_lookup_scans_in_store_order() {
        let mut store = chain();
        store.add_range(NewRange::named("r0"));
        store.link_product_to_range(&rid("r0"), &pid("p1"));

        // r1 was inserted before r0, so it is the primary parent.
        assert_eq!(store.parent_range(&pid("p1")).unwrap().id, rid("r1"));
        assert_eq!(store.ranges_of_product(&pid("p1")).len(), 2);
    }

    #[test]
    fn reorder_applies_given_order_and_keeps_rest() {
        let mut store = CatalogStore::new();
        store.add_range(NewRange::named("r"));
        for code in ["a", "b", "c", "d"] {
            store.add_product(NewProduct::with_code(code));
            store.link_product_to_range(&rid("r"), &pid(code));
        }

        store.reorder_products_in_range(&rid("r"), &[pid("c"), pid("ghost"), pid("a")]);

        assert_eq!(
            store.product_ids_in_range(&rid("r")),
            [pid("c"), pid("a"), pid("b"), pid("d")]
        );
    }

    #[test]
    fn reorder_groups_changes_iteration_order() {
        let mut store = CatalogStore::new();
        for name in ["one", "two", "three"] {
            store.add_group(NewGroup::named(name));
        }
        store.reorder_groups(&[gid("three")]);

        let names: Vec<_> = store.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["three", "one", "two"]);
    }

    #[test]
    fn clear_empties_everything() {
        let mut store = chain();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.stats(), StoreStats::default());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: link tables never reference missing entities, whatever
            /// sequence of removals is applied.
            #[test]
            fn no_dangling_links_after_removals(
                removals in proptest::collection::vec((0u8..3, 0usize..4), 0..8)
            ) {
                let mut store = CatalogStore::new();
                for g in 0..2 {
                    store.add_group(NewGroup::named(format!("g{g}")));
                }
                for r in 0..4 {
                    store.add_range(NewRange::named(format!("r{r}")));
                    store.link_range_to_group(&gid(&format!("g{}", r % 2)), &rid(&format!("r{r}")));
                }
                for p in 0..4 {
                    store.add_product(NewProduct::with_code(format!("p{p}")));
                    store.link_product_to_range(&rid(&format!("r{p}")), &pid(&format!("p{p}")));
                    store.link_product_to_range(&rid(&format!("r{}", (p + 1) % 4)), &pid(&format!("p{p}")));
                }

                for (kind, idx) in removals {
                    match kind {
                        0 => store.remove_group(&gid(&format!("g{}", idx % 2))),
                        1 => store.remove_range(&rid(&format!("r{idx}"))),
                        _ => store.remove_product(&pid(&format!("p{idx}"))),
                    }
                }

                for group in store.groups() {
                    for range_id in store.range_ids_in_group(&group.id) {
                        prop_assert!(store.contains_range(range_id));
                    }
                }
                for range in store.ranges() {
                    for product_id in store.product_ids_in_range(&range.id) {
                        prop_assert!(store.contains_product(product_id));
                    }
                }
            }
        }
    }
}
