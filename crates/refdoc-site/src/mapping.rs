//! Rewrite table from internal dotted names to public ones.
//!
//! Native libraries commonly define everything in a private extension module
//! and re-export it from a public package:
//!
//! ```text
//! from ._native import Foo as PublicName
//! __all__ = ['PublicName']
//! ```
//!
//! The mapping lets every reference to `pkg._native.Foo` (including
//! `pkg._native.Foo.method` and types mentioned in signatures) be shown as
//! `pkg.PublicName`.

use std::borrow::Cow;

/// Attempt to register a second replacement for an already mapped name.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Name {key} is already mapped to {existing}, refusing to remap it to {replacement}")]
pub struct MappingConflict {
    /// Internal name registered twice.
    pub key: String,
    /// Replacement registered first.
    pub existing: String,
    /// Replacement that was rejected.
    pub replacement: String,
}

/// Ordered name rewrite table.
///
/// Keys match a name exactly or as a dotted prefix. When several keys match,
/// the one registered first wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameMapping {
    entries: Vec<(String, String)>,
}

impl NameMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rewrite of `key` to `replacement`.
    ///
    /// Registering a key again with the same replacement is a no-op; a
    /// different replacement is a conflict.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Result<(), MappingConflict> {
        let key = key.into();
        let replacement = replacement.into();
        if let Some(existing) = self.get(&key) {
            if existing == replacement {
                return Ok(());
            }
            return Err(MappingConflict {
                existing: existing.to_owned(),
                key,
                replacement,
            });
        }
        self.entries.push((key, replacement));
        Ok(())
    }

    /// Append all entries of `other`, keeping their order.
    pub fn extend(&mut self, other: NameMapping) -> Result<(), MappingConflict> {
        for (key, replacement) in other.entries {
            self.insert(key, replacement)?;
        }
        Ok(())
    }

    /// Replacement registered for exactly `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Rewrite `name` using the first matching key.
    ///
    /// ```
    /// use refdoc_site::NameMapping;
    ///
    /// let mut mapping = NameMapping::new();
    /// mapping.insert("pkg._native", "pkg").unwrap();
    /// assert_eq!(mapping.map("pkg._native.Foo"), "pkg.Foo");
    /// assert_eq!(mapping.map("pkg._native_extra"), "pkg._native_extra");
    /// ```
    #[must_use]
    pub fn map<'a>(&self, name: &'a str) -> Cow<'a, str> {
        for (prefix, replacement) in &self.entries {
            if let Some(rest) = name.strip_prefix(prefix.as_str())
                && (rest.is_empty() || rest.starts_with('.'))
            {
                return Cow::Owned(format!("{replacement}{rest}"));
            }
        }
        Cow::Borrowed(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
