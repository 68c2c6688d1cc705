//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. In this domain
/// folder paths are value objects while groups, ranges and products are
/// entities (see [`crate::Entity`]): two paths with the same segments are the
/// same path, two products with the same code are the same product.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
