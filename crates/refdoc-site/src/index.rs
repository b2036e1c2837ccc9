//! Navigational index of generated pages.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    Module,
    Class,
    Page,
}

/// Node of the module/class tree or of the flat page list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub kind: IndexKind,
    pub name: String,
    pub url: String,
    pub summary: String,
    /// Some child is a module. Only set on modules by [`mark_nested_modules`].
    pub has_nestable_children: bool,
    pub children: Vec<IndexEntry>,
}

impl IndexEntry {
    #[must_use]
    pub fn new(
        kind: IndexKind,
        name: impl Into<String>,
        url: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            url: url.into(),
            summary: summary.into(),
            has_nestable_children: false,
            children: Vec::new(),
        }
    }
}

/// Flag every module entry that has module children, depth first.
///
/// Returns whether `entries` contains a module.
pub fn mark_nested_modules(entries: &mut [IndexEntry]) -> bool {
    let mut has_modules = false;
    for entry in entries.iter_mut().filter(|e| e.kind == IndexKind::Module) {
        has_modules = true;
        entry.has_nestable_children = mark_nested_modules(&mut entry.children);
    }
    has_modules
}

/// Data of the module, class and page index pages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SiteIndex {
    /// One tree per root module.
    pub classes: Vec<IndexEntry>,
    /// Authored pages other than the home page, in input order.
    pub pages: Vec<IndexEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: IndexKind, name: &str, children: Vec<IndexEntry>) -> IndexEntry {
        IndexEntry {
            children,
            ..IndexEntry::new(kind, name, format!("{name}.html"), "")
        }
    }

    #[test]
    fn test_mark_nested_modules() {
        let mut tree = vec![entry(
            IndexKind::Module,
            "pkg",
            vec![
                entry(IndexKind::Class, "pkg.Thing", vec![]),
                entry(
                    IndexKind::Module,
                    "pkg.sub",
                    vec![entry(IndexKind::Class, "pkg.sub.Other", vec![])],
                ),
            ],
        )];

        assert!(mark_nested_modules(&mut tree));
        assert!(tree[0].has_nestable_children);
        assert!(!tree[0].children[0].has_nestable_children);
        assert!(!tree[0].children[1].has_nestable_children);
    }

    #[test]
    fn test_classes_are_not_marked() {
        let mut tree = vec![entry(
            IndexKind::Class,
            "Outer",
            vec![entry(IndexKind::Module, "weird", vec![])],
        )];

        assert!(!mark_nested_modules(&mut tree));
        assert!(!tree[0].has_nestable_children);
    }
}
