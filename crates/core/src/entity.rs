//! Entity trait: identity + continuity across state changes.

use serde::{Deserialize, Serialize};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Level of the taxonomy this entity lives on.
    const KIND: EntityKind;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// The human-typed label used for matching and display (name or code).
    fn label(&self) -> &str;
}

/// The three levels of the product taxonomy, parent → child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Group,
    Range,
    Product,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Group, EntityKind::Range, EntityKind::Product];

    /// Folder depth at which this level appears in storage (1-based).
    pub fn depth(self) -> usize {
        match self {
            EntityKind::Group => 1,
            EntityKind::Range => 2,
            EntityKind::Product => 3,
        }
    }

    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            1 => Some(EntityKind::Group),
            2 => Some(EntityKind::Range),
            3 => Some(EntityKind::Product),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Group => "group",
            EntityKind::Range => "range",
            EntityKind::Product => "product",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
