//! Catalog records, creation inputs and partial updates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use catalog_core::{Entity, EntityKind, GroupId, ProductId, RangeId};

/// Taxonomy level 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductGroup {
    pub id: GroupId,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub active: bool,
}

/// Taxonomy level 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRange {
    pub id: RangeId,
    pub name: String,
    pub image: String,
    pub description: String,
    pub tags: Vec<String>,
    pub active: bool,
}

/// Taxonomy level 3. Identified by its code, not its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub code: String,
    pub name: String,
    pub overview: String,
    pub description: String,
    pub specifications: Vec<String>,
    pub image_gallery: Vec<String>,
    /// Download label → URL.
    pub files: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionGroup>,
    pub active: bool,
}

/// A named set of selectable options for a product (e.g. "Colour").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionGroup {
    pub name: String,
    pub options: Vec<OptionValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionValue {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Entity for ProductGroup {
    type Id = GroupId;
    const KIND: EntityKind = EntityKind::Group;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Entity for ProductRange {
    type Id = RangeId;
    const KIND: EntityKind = EntityKind::Range;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Entity for Product {
    type Id = ProductId;
    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn label(&self) -> &str {
        &self.code
    }
}

/// Reference to any catalog entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum EntityRef {
    Group(GroupId),
    Range(RangeId),
    Product(ProductId),
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Group(_) => EntityKind::Group,
            EntityRef::Range(_) => EntityKind::Range,
            EntityRef::Product(_) => EntityKind::Product,
        }
    }
}

/// Input for `CatalogStore::add_group`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl NewGroup {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: String::new(),
            description: String::new(),
            active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn id(&self) -> GroupId {
        GroupId::from_name(&self.name)
    }

    pub(crate) fn into_group(self) -> ProductGroup {
        ProductGroup {
            id: self.id(),
            name: self.name,
            icon: self.icon,
            description: self.description,
            active: self.active,
        }
    }
}

/// Input for `CatalogStore::add_range`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRange {
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl NewRange {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: String::new(),
            description: String::new(),
            tags: Vec::new(),
            active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn id(&self) -> RangeId {
        RangeId::from_name(&self.name)
    }

    pub(crate) fn into_range(self) -> ProductRange {
        ProductRange {
            id: self.id(),
            name: self.name,
            image: self.image,
            description: self.description,
            tags: self.tags,
            active: self.active,
        }
    }
}

/// Input for `CatalogStore::add_product`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub code: String,
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
    #[serde(default)]
    pub options: Vec<OptionGroup>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl NewProduct {
    /// A product whose display name is its code.
    pub fn with_code(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            name: code.clone(),
            code,
            overview: String::new(),
            description: String::new(),
            specifications: Vec::new(),
            image_gallery: Vec::new(),
            files: BTreeMap::new(),
            options: Vec::new(),
            active: true,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn id(&self) -> ProductId {
        ProductId::from_name(&self.code)
    }

    pub(crate) fn into_product(self) -> Product {
        Product {
            id: self.id(),
            code: self.code,
            name: self.name,
            overview: self.overview,
            description: self.description,
            specifications: self.specifications,
            image_gallery: self.image_gallery,
            files: self.files,
            options: self.options,
            active: self.active,
        }
    }
}

fn default_active() -> bool {
    true
}

/// Partial update for a group. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl GroupPatch {
    pub(crate) fn apply_to(self, group: &mut ProductGroup) {
        if let Some(name) = self.name {
            group.name = name;
        }
        if let Some(icon) = self.icon {
            group.icon = icon;
        }
        if let Some(description) = self.description {
            group.description = description;
        }
        if let Some(active) = self.active {
            group.active = active;
        }
    }
}

/// Partial update for a range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangePatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub active: Option<bool>,
}

impl RangePatch {
    pub(crate) fn apply_to(self, range: &mut ProductRange) {
        if let Some(name) = self.name {
            range.name = name;
        }
        if let Some(image) = self.image {
            range.image = image;
        }
        if let Some(description) = self.description {
            range.description = description;
        }
        if let Some(tags) = self.tags {
            range.tags = tags;
        }
        if let Some(active) = self.active {
            range.active = active;
        }
    }
}

/// Partial update for a product. The code is fixed once created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub overview: Option<String>,
    pub description: Option<String>,
    pub specifications: Option<Vec<String>>,
    pub image_gallery: Option<Vec<String>>,
    pub files: Option<BTreeMap<String, String>>,
    pub options: Option<Vec<OptionGroup>>,
    pub active: Option<bool>,
}

impl ProductPatch {
    pub(crate) fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(overview) = self.overview {
            product.overview = overview;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(specifications) = self.specifications {
            product.specifications = specifications;
        }
        if let Some(image_gallery) = self.image_gallery {
            product.image_gallery = image_gallery;
        }
        if let Some(files) = self.files {
            product.files = files;
        }
        if let Some(options) = self.options {
            product.options = options;
        }
        if let Some(active) = self.active {
            product.active = active;
        }
    }
}
