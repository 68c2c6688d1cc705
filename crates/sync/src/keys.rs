//! Case-insensitive keys for human-typed names and folder paths.
//!
//! Remote folders are typed by people (`Shelter`, `shelter`, ` SHELTER/`), so
//! both classification and import de-duplication compare through [`NameKey`].

use std::collections::HashMap;
use std::fmt;

/// Normalized comparison key: segments trimmed, empty segments dropped,
/// lowercased, joined with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameKey(String);

impl NameKey {
    pub fn new(raw: &str) -> Self {
        let key = raw
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("/");
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NameKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Insertion-ordered map keyed by [`NameKey`]. The first value inserted for a
/// key wins; later case variants are ignored.
#[derive(Debug, Clone)]
pub struct NameKeyMap<V> {
    index: HashMap<NameKey, usize>,
    entries: Vec<(NameKey, V)>,
}

impl<V> Default for NameKeyMap<V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<V> NameKeyMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` (and keeps the existing value) when the key is taken.
    pub fn insert(&mut self, raw: &str, value: V) -> bool {
        let key = NameKey::new(raw);
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        true
    }

    pub fn get(&self, raw: &str) -> Option<&V> {
        self.index
            .get(&NameKey::new(raw))
            .map(|&idx| &self.entries[idx].1)
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.index.contains_key(&NameKey::new(raw))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NameKey, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<'a, V> FromIterator<(&'a str, V)> for NameKeyMap<V> {
    fn from_iter<I: IntoIterator<Item = (&'a str, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (raw, value) in iter {
            map.insert(raw, value);
        }
        map
    }
}
