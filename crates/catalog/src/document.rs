//! Wizard document: the nested six-step interchange format.
//!
//! Field names (`steps`, `step`, `title`, `categories`, `ranges`, `products`,
//! `productDetails`, `options`, `fields`) are a contract with other consumers
//! and must not change.
//!
//! ## Transform rules
//!
//! - `export_data` walks the store: groups (step 1), group → ranges (step 2),
//!   range → product codes (step 3, every range including ungrouped ones),
//!   product details (step 4, every product). Steps 5 and 6 are replayed from
//!   the last imported document.
//! - Entity attributes the steps have no field for travel in the step's extra
//!   map under `groupSettings`, `rangeSettings` and `productSettings`. Only
//!   entries that differ from a fresh entity are written.
//! - `import_data` clears the store and rebuilds it through the public store
//!   API, so ids are derived exactly like `add_*` derives them.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use catalog_core::{GroupId, ProductId, RangeId};

use crate::model::{NewGroup, NewProduct, NewRange, OptionGroup, Product, ProductGroup, ProductRange};
use crate::store::CatalogStore;

pub const STEP_CATEGORIES: u32 = 1;
pub const STEP_RANGES: u32 = 2;
pub const STEP_PRODUCTS: u32 = 3;
pub const STEP_PRODUCT_DETAILS: u32 = 4;
pub const STEP_OPTIONS: u32 = 5;
pub const STEP_FIELDS: u32 = 6;

/// Step 1 extra: group name → icon, description, active flag.
pub const KEY_GROUP_SETTINGS: &str = "groupSettings";
/// Step 2 extra: range name → image, description, tags, active flag.
pub const KEY_RANGE_SETTINGS: &str = "rangeSettings";
/// Step 4 extra: product code → option groups, active flag.
pub const KEY_PRODUCT_SETTINGS: &str = "productSettings";

/// Top-level interchange document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub steps: Vec<Step>,
}

/// One wizard step. Only the payload field matching `step` is populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub step: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranges: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_details: Option<BTreeMap<String, ProductDetail>>,
    /// Global option catalog (opaque).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    /// Contact-form field schema (opaque).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,
    /// Anything else a consumer stored on the step.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Step {
    fn titled(step: u32, title: &str) -> Self {
        Self {
            step,
            title: title.to_string(),
            ..Self::default()
        }
    }
}

/// Denormalized product record carried in step 4.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specifications: Vec<String>,
    #[serde(default)]
    pub image_gallery: Vec<String>,
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

impl From<&Product> for ProductDetail {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            overview: p.overview.clone(),
            description: p.description.clone(),
            specifications: p.specifications.clone(),
            image_gallery: p.image_gallery.clone(),
            files: p.files.clone(),
        }
    }
}

impl ProductDetail {
    fn into_new_product(self, code: &str) -> NewProduct {
        let name = if self.name.trim().is_empty() {
            code.to_string()
        } else {
            self.name
        };
        NewProduct {
            overview: self.overview,
            description: self.description,
            specifications: self.specifications,
            image_gallery: self.image_gallery,
            files: self.files,
            ..NewProduct::with_code(code).named(name)
        }
    }
}

/// Steps 5 and 6 as last imported. They are not modelled as entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardExtras {
    pub options_step: Option<Step>,
    pub fields_step: Option<Step>,
}

impl WizardExtras {
    fn options_or_default(&self) -> Step {
        self.options_step.clone().unwrap_or_else(|| Step {
            options: Some(Value::Object(Map::new())),
            ..Step::titled(STEP_OPTIONS, "Options")
        })
    }

    fn fields_or_default(&self) -> Step {
        self.fields_step.clone().unwrap_or_else(|| Step {
            fields: Some(Value::Array(Vec::new())),
            ..Step::titled(STEP_FIELDS, "Contact Details")
        })
    }
}

impl Document {
    pub fn step(&self, number: u32) -> Option<&Step> {
        self.steps.iter().find(|s| s.step == number)
    }

    pub fn categories(&self) -> &[String] {
        self.step(STEP_CATEGORIES)
            .and_then(|s| s.categories.as_deref())
            .unwrap_or(&[])
    }

    pub fn ranges_by_group(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        self.step(STEP_RANGES).and_then(|s| s.ranges.as_ref())
    }

    pub fn products_by_range(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        self.step(STEP_PRODUCTS).and_then(|s| s.products.as_ref())
    }

    pub fn product_details(&self) -> Option<&BTreeMap<String, ProductDetail>> {
        self.step(STEP_PRODUCT_DETAILS)
            .and_then(|s| s.product_details.as_ref())
    }
}

/// Group attributes with no slot in the wizard steps. Carried on step 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GroupSettings {
    icon: String,
    description: String,
    active: bool,
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            icon: String::new(),
            description: String::new(),
            active: true,
        }
    }
}

impl From<&ProductGroup> for GroupSettings {
    fn from(g: &ProductGroup) -> Self {
        Self {
            icon: g.icon.clone(),
            description: g.description.clone(),
            active: g.active,
        }
    }
}

/// Range attributes with no slot in the wizard steps. Carried on step 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RangeSettings {
    image: String,
    description: String,
    tags: Vec<String>,
    active: bool,
}

impl Default for RangeSettings {
    fn default() -> Self {
        Self {
            image: String::new(),
            description: String::new(),
            tags: Vec::new(),
            active: true,
        }
    }
}

impl From<&ProductRange> for RangeSettings {
    fn from(r: &ProductRange) -> Self {
        Self {
            image: r.image.clone(),
            description: r.description.clone(),
            tags: r.tags.clone(),
            active: r.active,
        }
    }
}

/// Product attributes step 4 does not carry. Carried on step 4.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProductSettings {
    options: Vec<OptionGroup>,
    active: bool,
}

impl Default for ProductSettings {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            active: true,
        }
    }
}

impl From<&Product> for ProductSettings {
    fn from(p: &Product) -> Self {
        Self {
            options: p.options.clone(),
            active: p.active,
        }
    }
}

/// Entries that differ from the defaults, keyed by label, as a step extra.
fn settings_extra<'a, E, T>(key: &str, records: &'a [E], label: fn(&'a E) -> &'a str) -> Map<String, Value>
where
    T: From<&'a E> + Default + PartialEq + Serialize,
{
    let entries: BTreeMap<&str, T> = records
        .iter()
        .map(|r| (label(r), T::from(r)))
        .filter(|(_, settings)| *settings != T::default())
        .collect();

    let mut extra = Map::new();
    if entries.is_empty() {
        return extra;
    }
    match serde_json::to_value(entries) {
        Ok(value) => {
            extra.insert(key.to_string(), value);
        }
        Err(e) => debug!(key, error = %e, "entity settings not exported"),
    }
    extra
}

/// Read a settings extra back, keyed by id. Malformed blocks are ignored and
/// the first spelling of a colliding key wins.
fn settings_by_id<K, T>(step: Option<&Step>, key: &str, id: fn(&str) -> K) -> HashMap<K, T>
where
    K: Eq + Hash,
    T: DeserializeOwned,
{
    let Some(value) = step.and_then(|s| s.extra.get(key)) else {
        return HashMap::new();
    };
    let entries: BTreeMap<String, T> = match serde_json::from_value(value.clone()) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(key, error = %e, "ignoring malformed entity settings");
            return HashMap::new();
        }
    };
    let mut out = HashMap::new();
    for (label, settings) in entries {
        out.entry(id(&label)).or_insert(settings);
    }
    out
}

/// Build the six-step document from the store.
pub fn export_data(store: &CatalogStore) -> Document {
    let categories = store.groups().iter().map(|g| g.name.clone()).collect();

    let ranges = store
        .groups()
        .iter()
        .map(|g| {
            let names = store
                .ranges_in_group(&g.id)
                .into_iter()
                .map(|r| r.name.clone())
                .collect();
            (g.name.clone(), names)
        })
        .collect();

    let products = store
        .ranges()
        .iter()
        .map(|r| {
            let codes = store
                .products_in_range(&r.id)
                .into_iter()
                .map(|p| p.code.clone())
                .collect();
            (r.name.clone(), codes)
        })
        .collect();

    let product_details = store
        .products()
        .iter()
        .map(|p| (p.code.clone(), ProductDetail::from(p)))
        .collect();

    let extras = store.wizard_extras();
    Document {
        steps: vec![
            Step {
                categories: Some(categories),
                extra: settings_extra::<_, GroupSettings>(KEY_GROUP_SETTINGS, store.groups(), |g| g.name.as_str()),
                ..Step::titled(STEP_CATEGORIES, "Select Category")
            },
            Step {
                ranges: Some(ranges),
                extra: settings_extra::<_, RangeSettings>(KEY_RANGE_SETTINGS, store.ranges(), |r| r.name.as_str()),
                ..Step::titled(STEP_RANGES, "Select Range")
            },
            Step {
                products: Some(products),
                ..Step::titled(STEP_PRODUCTS, "Select Product")
            },
            Step {
                product_details: Some(product_details),
                extra: settings_extra::<_, ProductSettings>(KEY_PRODUCT_SETTINGS, store.products(), |p| p.code.as_str()),
                ..Step::titled(STEP_PRODUCT_DETAILS, "Product Details")
            },
            extras.options_or_default(),
            extras.fields_or_default(),
        ],
    }
}

/// Replace the store contents with the graph described by `doc`.
///
/// Cross-step references match by id, so `"Peninsula"` in step 3 finds the
/// `"peninsula"` listed in step 2.
pub fn import_data(store: &mut CatalogStore, doc: &Document) {
    store.clear();

    let walker = Walker::new(doc);

    for group_name in doc.categories() {
        walker.group(store, group_name);
    }
    // Lenient: range lists for groups missing from step 1.
    for group_name in doc.ranges_by_group().into_iter().flat_map(|m| m.keys()) {
        if !store.contains_group(&GroupId::from_name(group_name)) {
            debug!(group = %group_name, "group only present in ranges step, importing");
            walker.group(store, group_name);
        }
    }
    // Ranges never reached from a group stay ungrouped.
    for range_name in doc.products_by_range().into_iter().flat_map(|m| m.keys()) {
        if !store.contains_range(&RangeId::from_name(range_name)) {
            walker.range(store, range_name);
        }
    }
    // Products never reached from a range stay unranged.
    for code in doc.product_details().into_iter().flat_map(|m| m.keys()) {
        walker.product(store, code);
    }

    store.set_wizard_extras(WizardExtras {
        options_step: doc.step(STEP_OPTIONS).cloned(),
        fields_step: doc.step(STEP_FIELDS).cloned(),
    });
}

/// Step contents indexed by id.
struct Walker<'d> {
    ranges_by_group: HashMap<GroupId, Vec<&'d str>>,
    products_by_range: HashMap<RangeId, Vec<&'d str>>,
    details: HashMap<ProductId, &'d ProductDetail>,
    group_settings: HashMap<GroupId, GroupSettings>,
    range_settings: HashMap<RangeId, RangeSettings>,
    product_settings: HashMap<ProductId, ProductSettings>,
}

impl<'d> Walker<'d> {
    fn new(doc: &'d Document) -> Self {
        let mut ranges_by_group: HashMap<GroupId, Vec<&str>> = HashMap::new();
        for (group, names) in doc.ranges_by_group().into_iter().flatten() {
            ranges_by_group
                .entry(GroupId::from_name(group))
                .or_default()
                .extend(names.iter().map(String::as_str));
        }
        let mut products_by_range: HashMap<RangeId, Vec<&str>> = HashMap::new();
        for (range, codes) in doc.products_by_range().into_iter().flatten() {
            products_by_range
                .entry(RangeId::from_name(range))
                .or_default()
                .extend(codes.iter().map(String::as_str));
        }
        let mut details = HashMap::new();
        for (code, detail) in doc.product_details().into_iter().flatten() {
            details.entry(ProductId::from_name(code)).or_insert(detail);
        }

        Self {
            ranges_by_group,
            products_by_range,
            details,
            group_settings: settings_by_id(doc.step(STEP_CATEGORIES), KEY_GROUP_SETTINGS, GroupId::from_name),
            range_settings: settings_by_id(doc.step(STEP_RANGES), KEY_RANGE_SETTINGS, RangeId::from_name),
            product_settings: settings_by_id(
                doc.step(STEP_PRODUCT_DETAILS),
                KEY_PRODUCT_SETTINGS,
                ProductId::from_name,
            ),
        }
    }

    fn group(&self, store: &mut CatalogStore, group_name: &str) {
        let mut data = NewGroup::named(group_name);
        if let Some(settings) = self.group_settings.get(&data.id()).cloned() {
            data.icon = settings.icon;
            data.description = settings.description;
            data.active = settings.active;
        }
        let group_id = store.add_group(data).into_id();
        for range_name in self.ranges_by_group.get(&group_id).into_iter().flatten() {
            let range_id = self.range(store, range_name);
            store.link_range_to_group(&group_id, &range_id);
        }
    }

    fn range(&self, store: &mut CatalogStore, range_name: &str) -> RangeId {
        let mut data = NewRange::named(range_name);
        if let Some(settings) = self.range_settings.get(&data.id()).cloned() {
            data.image = settings.image;
            data.description = settings.description;
            data.tags = settings.tags;
            data.active = settings.active;
        }
        let range_id = store.add_range(data).into_id();
        for code in self.products_by_range.get(&range_id).into_iter().flatten() {
            let product_id = self.product(store, code);
            store.link_product_to_range(&range_id, &product_id);
        }
        range_id
    }

    /// The code spelled in step 3 wins over the step 4 key.
    fn product(&self, store: &mut CatalogStore, code: &str) -> ProductId {
        let id = ProductId::from_name(code);
        let mut data = match self.details.get(&id) {
            Some(detail) => (*detail).clone().into_new_product(code),
            None => NewProduct::with_code(code),
        };
        if let Some(settings) = self.product_settings.get(&id).cloned() {
            data.options = settings.options;
            data.active = settings.active;
        }
        store.add_product(data).into_id()
    }
}
