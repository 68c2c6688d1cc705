//! Slug-derived identifiers used across the domain.
//!
//! Every catalog entity is identified by the slug of its human name (groups,
//! ranges) or code (products). Two names with the same slug denote the same
//! entity.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Normalize a human-typed name into a slug.
///
/// Lowercases, collapses each whitespace run into a single `-` and drops every
/// character outside `[a-z0-9-]`. Surrounding whitespace is ignored.
pub fn slugify(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('-');
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            out.push(ch);
        }
    }

    out
}

fn is_slug(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Identifier of a product group (taxonomy level 1).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

/// Identifier of a product range (taxonomy level 2).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeId(String);

/// Identifier of a product (taxonomy level 3), derived from the product code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

macro_rules! impl_slug_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Derive the identifier from a human-readable name.
            pub fn from_name(name: &str) -> Self {
                Self(slugify(name))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the source name contained no slug characters at all.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            /// Parse an identifier that is already in slug form.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.is_empty() || !is_slug(s) {
                    return Err(DomainError::invalid_id(format!("{}: '{}'", $name, s)));
                }
                Ok(Self(s.to_string()))
            }
        }
    };
}

impl_slug_newtype!(GroupId, "GroupId");
impl_slug_newtype!(RangeId, "RangeId");
impl_slug_newtype!(ProductId, "ProductId");
