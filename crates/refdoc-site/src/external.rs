//! Externally authored documentation content.
//!
//! Summaries and page bodies for modules, classes and data can be supplied
//! in YAML files next to the code:
//!
//! ```yaml
//! modules:
//!   pkg.sub:
//!     summary: Utilities for *sub*things.
//!     content: |
//!       Longer description rendered on the module page.
//! classes:
//!   pkg.Class:
//!     summary: A class.
//! data:
//!   pkg.CONSTANT:
//!     summary: The constant.
//! ```
//!
//! Every entry is expected to be consumed by the page or member it belongs
//! to; whatever is left over after a run is reported by [`ExternalDocs::unused`].

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SiteError;

/// Which table an entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocKind {
    Module,
    Class,
    Data,
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Module => "module",
            Self::Class => "class",
            Self::Data => "data",
        })
    }
}

/// External content for one qualified path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocEntry {
    /// Markdown summary, rendered inline.
    pub summary: String,
    /// Markdown page body.
    pub content: String,
    #[serde(skip)]
    used: bool,
}

impl DocEntry {
    #[must_use]
    pub fn new(summary: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            content: content.into(),
            used: false,
        }
    }

    #[must_use]
    pub fn is_used(&self) -> bool {
        self.used
    }
}

type DocTable = BTreeMap<String, DocEntry>;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DocFile {
    modules: DocTable,
    classes: DocTable,
    data: DocTable,
}

/// Keys of entries nothing consumed during a run, per table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UnusedDocs {
    pub modules: Vec<String>,
    pub classes: Vec<String>,
    pub data: Vec<String>,
}

impl UnusedDocs {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.classes.is_empty() && self.data.is_empty()
    }

    /// Total number of unused entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len() + self.classes.len() + self.data.len()
    }

    /// Log one warning per table with unused entries.
    pub fn warn(&self) {
        for (kind, keys) in [
            (DocKind::Module, &self.modules),
            (DocKind::Class, &self.classes),
            (DocKind::Data, &self.data),
        ] {
            if !keys.is_empty() {
                tracing::warn!(kind = %kind, keys = ?keys, "External doc contents were unused");
            }
        }
    }
}

/// Module, class and data documentation tables.
#[derive(Clone, Debug, Default)]
pub struct ExternalDocs {
    modules: DocTable,
    classes: DocTable,
    data: DocTable,
}

impl ExternalDocs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single YAML documentation file.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let file: DocFile = serde_yaml::from_str(yaml)?;
        Ok(Self {
            modules: file.modules,
            classes: file.classes,
            data: file.data,
        })
    }

    /// Load and merge documentation files in order.
    pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self, SiteError> {
        let mut docs = Self::new();
        for path in paths {
            let path = path.as_ref();
            tracing::debug!(path = %path.display(), "Loading external docs");
            let yaml = fs::read_to_string(path)?;
            let file = Self::from_yaml(&yaml).map_err(|source| SiteError::Docs {
                path: path.to_path_buf(),
                source,
            })?;
            docs.merge(file);
        }
        Ok(docs)
    }

    /// Add all entries of `other`, replacing existing ones.
    pub fn merge(&mut self, other: ExternalDocs) {
        for (kind, table) in [
            (DocKind::Module, other.modules),
            (DocKind::Class, other.classes),
            (DocKind::Data, other.data),
        ] {
            for (path, entry) in table {
                self.insert(kind, path, entry);
            }
        }
    }

    /// Register an entry. A previous entry for the same path is replaced.
    pub fn insert(&mut self, kind: DocKind, path: impl Into<String>, entry: DocEntry) {
        let path = path.into();
        if self.table_mut(kind).contains_key(&path) {
            tracing::warn!(kind = %kind, path = %path, "Replacing external doc entry");
        }
        self.table_mut(kind).insert(path, entry);
    }

    #[must_use]
    pub fn get(&self, kind: DocKind, path: &str) -> Option<&DocEntry> {
        self.table(kind).get(path)
    }

    /// Non-empty external summary for `path`, without consuming the entry.
    #[must_use]
    pub fn summary(&self, kind: DocKind, path: &str) -> Option<&str> {
        self.get(kind, path)
            .map(|entry| entry.summary.as_str())
            .filter(|summary| !summary.is_empty())
    }

    /// Mark the entry for `path` as consumed and return it.
    pub fn consume(&mut self, kind: DocKind, path: &str) -> Option<&DocEntry> {
        let entry = self.table_mut(kind).get_mut(path)?;
        entry.used = true;
        Some(entry)
    }

    /// Keys never consumed, sorted.
    #[must_use]
    pub fn unused(&self) -> UnusedDocs {
        let keys = |table: &DocTable| {
            table
                .iter()
                .filter(|(_, entry)| !entry.used)
                .map(|(key, _)| key.clone())
                .collect()
        };
        UnusedDocs {
            modules: keys(&self.modules),
            classes: keys(&self.classes),
            data: keys(&self.data),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.classes.is_empty() && self.data.is_empty()
    }

    fn table(&self, kind: DocKind) -> &DocTable {
        match kind {
            DocKind::Module => &self.modules,
            DocKind::Class => &self.classes,
            DocKind::Data => &self.data,
        }
    }

    fn table_mut(&mut self, kind: DocKind) -> &mut DocTable {
        match kind {
            DocKind::Module => &mut self.modules,
            DocKind::Class => &mut self.classes,
            DocKind::Data => &mut self.data,
        }
    }
}
