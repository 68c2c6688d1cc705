//! Turning remote-only folders into catalog entities.
//!
//! Each folder path is planned against the current store (ancestors and leaf
//! matched by case-insensitive name, or code for products) and the plan is
//! applied before the next item is planned. Planning validates the whole item
//! first, so a refused item never leaves ancestors of its own behind.

use serde::Serialize;
use tracing::debug;

use catalog_core::{FolderPath, GroupId, ProductId, RangeId};
use catalog_domain::{CatalogStore, NewGroup, NewProduct, NewRange, folder_segment};

use crate::error::ImportError;
use crate::keys::NameKeyMap;
use crate::report::{BatchResult, ItemError};

/// Description given to ancestors created on the way to an imported folder.
pub const AUTO_CREATED_DESCRIPTION: &str = "Auto-created from storage folder import";
/// Description given to the folder an import was asked for.
pub const IMPORTED_DESCRIPTION: &str = "Imported from storage folder";

/// Case-insensitive name → id lookup over the whole store.
///
/// Keys are folder spellings (see [`folder_segment`]), so a code such as
/// `K301/A` is found under the `K301-A` folder it is pushed as.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    groups: NameKeyMap<GroupId>,
    ranges: NameKeyMap<RangeId>,
    products: NameKeyMap<ProductId>,
}

impl NameIndex {
    pub fn from_store(store: &CatalogStore) -> Self {
        let mut index = Self::default();
        for g in store.groups() {
            index.groups.insert(&folder_segment(&g.name), g.id.clone());
        }
        for r in store.ranges() {
            index.ranges.insert(&folder_segment(&r.name), r.id.clone());
        }
        for p in store.products() {
            index.products.insert(&folder_segment(&p.code), p.id.clone());
        }
        index
    }

    pub fn group(&self, name: &str) -> Option<&GroupId> {
        self.groups.get(name)
    }

    pub fn range(&self, name: &str) -> Option<&RangeId> {
        self.ranges.get(name)
    }

    pub fn product(&self, code: &str) -> Option<&ProductId> {
        self.products.get(code)
    }
}

/// One store mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PlannedAction {
    CreateGroup { name: String, description: String },
    CreateRange { name: String, description: String },
    CreateProduct { code: String, description: String },
    #[serde(rename_all = "camelCase")]
    LinkRange { group_id: GroupId, range_id: RangeId },
    #[serde(rename_all = "camelCase")]
    LinkProduct { range_id: RangeId, product_id: ProductId },
}

/// Mutations for one folder path, in application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemPlan {
    pub path: FolderPath,
    pub actions: Vec<PlannedAction>,
}

impl ItemPlan {
    /// Nothing to do: every segment already exists.
    pub fn is_noop(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Dry-run result of an import batch.
#[derive(Debug, Default, Serialize)]
pub struct ImportPlan {
    pub items: Vec<ItemPlan>,
    pub errors: Vec<ItemError>,
}

impl ImportPlan {
    pub fn created_count(&self) -> usize {
        self.items
            .iter()
            .flat_map(|i| &i.actions)
            .filter(|a| {
                matches!(
                    a,
                    PlannedAction::CreateGroup { .. }
                        | PlannedAction::CreateRange { .. }
                        | PlannedAction::CreateProduct { .. }
                )
            })
            .count()
    }
}

/// Plan a batch without touching `store`.
///
/// Later items see the effects of earlier ones, exactly as a real import
/// would.
pub fn plan_import(store: &CatalogStore, paths: &[String]) -> ImportPlan {
    let mut scratch = store.clone();
    let mut plan = ImportPlan::default();
    let result = run_import(&mut scratch, paths, |item| plan.items.push(item.clone()));
    plan.errors = result.errors;
    plan
}

/// Import a batch into `store`, item by item, best effort.
pub(crate) fn run_import(
    store: &mut CatalogStore,
    paths: &[String],
    mut on_applied: impl FnMut(&ItemPlan),
) -> BatchResult {
    let mut index = NameIndex::from_store(store);
    let mut result = BatchResult::default();

    let mut ordered: Vec<&String> = paths.iter().collect();
    ordered.sort_by_key(|p| raw_depth(p));

    for raw in ordered {
        match plan_item(store, &index, raw) {
            Ok(item) => {
                apply_item(store, &mut index, &item);
                on_applied(&item);
                result.success_count += 1;
            }
            Err(e) => {
                tracing::warn!(path = %raw, error = %e, "import item refused");
                result.fail(raw.as_str(), e);
            }
        }
    }
    result
}

fn raw_depth(raw: &str) -> usize {
    raw.split('/').filter(|s| !s.trim().is_empty()).count()
}

/// Resolve one folder path against the current store state.
pub fn plan_item(store: &CatalogStore, index: &NameIndex, raw: &str) -> Result<ItemPlan, ImportError> {
    let path = FolderPath::parse(raw)?;
    let segments = path.segments();
    let leaf_depth = segments.len();
    let description = |depth: usize| {
        let text = if depth == leaf_depth {
            IMPORTED_DESCRIPTION
        } else {
            AUTO_CREATED_DESCRIPTION
        };
        text.to_string()
    };

    // Validate every segment before planning anything.
    for segment in segments {
        if catalog_core::slugify(segment).is_empty() {
            return Err(ImportError::empty_segment(segment));
        }
    }

    let mut actions = Vec::new();

    let group_name = &segments[0];
    let group_id = match existing_group(store, index, group_name) {
        Some(id) => id,
        None => {
            actions.push(PlannedAction::CreateGroup {
                name: group_name.clone(),
                description: description(1),
            });
            GroupId::from_name(group_name)
        }
    };

    let Some(range_name) = segments.get(1) else {
        return Ok(ItemPlan { path, actions });
    };
    let range_id = match existing_range(store, index, range_name) {
        Some(id) => {
            // A range may sit under several groups; the folder's own parent
            // must be one of them for the path to resolve.
            if !store.range_ids_in_group(&group_id).contains(&id) {
                actions.push(PlannedAction::LinkRange {
                    group_id: group_id.clone(),
                    range_id: id.clone(),
                });
            }
            id
        }
        None => {
            let id = RangeId::from_name(range_name);
            actions.push(PlannedAction::CreateRange {
                name: range_name.clone(),
                description: description(2),
            });
            actions.push(PlannedAction::LinkRange {
                group_id: group_id.clone(),
                range_id: id.clone(),
            });
            id
        }
    };

    let Some(code) = segments.get(2) else {
        return Ok(ItemPlan { path, actions });
    };
    match existing_product(store, index, code) {
        Some(id) => {
            if !store.product_ids_in_range(&range_id).contains(&id) {
                actions.push(PlannedAction::LinkProduct {
                    range_id,
                    product_id: id,
                });
            }
        }
        None => {
            let id = ProductId::from_name(code);
            actions.push(PlannedAction::CreateProduct {
                code: code.clone(),
                description: description(3),
            });
            actions.push(PlannedAction::LinkProduct {
                range_id,
                product_id: id,
            });
        }
    }

    Ok(ItemPlan { path, actions })
}

fn existing_group(store: &CatalogStore, index: &NameIndex, name: &str) -> Option<GroupId> {
    if let Some(id) = index.group(name) {
        return Some(id.clone());
    }
    let slug = GroupId::from_name(name);
    store.contains_group(&slug).then(|| {
        debug!(group_id = %slug, name, "reusing group with colliding slug");
        slug
    })
}

fn existing_range(store: &CatalogStore, index: &NameIndex, name: &str) -> Option<RangeId> {
    if let Some(id) = index.range(name) {
        return Some(id.clone());
    }
    let slug = RangeId::from_name(name);
    store.contains_range(&slug).then(|| {
        debug!(range_id = %slug, name, "reusing range with colliding slug");
        slug
    })
}

fn existing_product(store: &CatalogStore, index: &NameIndex, code: &str) -> Option<ProductId> {
    if let Some(id) = index.product(code) {
        return Some(id.clone());
    }
    let slug = ProductId::from_name(code);
    store.contains_product(&slug).then(|| {
        debug!(product_id = %slug, code, "reusing product with colliding slug");
        slug
    })
}

fn apply_item(store: &mut CatalogStore, index: &mut NameIndex, item: &ItemPlan) {
    for action in &item.actions {
        match action {
            PlannedAction::CreateGroup { name, description } => {
                let outcome = store
                    .add_group(NewGroup::named(name.clone()).with_description(description.clone()));
                if !outcome.is_created() {
                    debug!(group_id = %outcome.id(), "group already present");
                }
                index.groups.insert(name, outcome.into_id());
            }
            PlannedAction::CreateRange { name, description } => {
                let outcome = store
                    .add_range(NewRange::named(name.clone()).with_description(description.clone()));
                if !outcome.is_created() {
                    debug!(range_id = %outcome.id(), "range already present");
                }
                index.ranges.insert(name, outcome.into_id());
            }
            PlannedAction::CreateProduct { code, description } => {
                let mut product = NewProduct::with_code(code.clone());
                product.description = description.clone();
                let outcome = store.add_product(product);
                if !outcome.is_created() {
                    debug!(product_id = %outcome.id(), "product already present");
                }
                index.products.insert(code, outcome.into_id());
            }
            PlannedAction::LinkRange { group_id, range_id } => {
                store.link_range_to_group(group_id, range_id);
            }
            PlannedAction::LinkProduct { range_id, product_id } => {
                store.link_product_to_range(range_id, product_id);
            }
        }
    }
    debug!(path = %item.path, actions = item.actions.len(), "import item applied");
}
