//! Rules deciding which members of a module or class are documented.
//!
//! Module members found by inspection are dropped when they are private by
//! naming convention, imported from another module, or a module that is not
//! a submodule of the container. Class pages instead drop private names and
//! special methods whose documentation is the generic text the runtime
//! supplies. Members listed in a module's export list bypass these rules.

use refdoc_inspect::{Module, Object, RuntimeVersion};

use crate::extract::MemberKind;
use crate::mapping::NameMapping;

/// Special-form name with leading and trailing double underscores.
#[must_use]
pub fn is_dunder(name: &str) -> bool {
    name.starts_with("__") && name.ends_with("__")
}

/// Private-by-convention name; special-form names are not private.
#[must_use]
pub fn is_internal_name(name: &str) -> bool {
    name.starts_with('_') && !is_dunder(name)
}

/// Module being walked in inspection mode.
pub struct ModuleScope<'a> {
    /// Dotted path of the module page.
    pub path: &'a str,
    pub module: &'a Module,
    pub mapping: &'a NameMapping,
    /// Accept submodules without package identity, as native extensions
    /// create them.
    pub native_compat: bool,
}

impl ModuleScope<'_> {
    /// Whether the member `name` pointing to `object` belongs on this
    /// module's page.
    #[must_use]
    pub fn is_visible(&self, name: &str, object: &Object) -> bool {
        if is_internal_name(name) {
            return false;
        }

        match object {
            Object::Module(child) => self.is_submodule(name, child),
            _ => match object.owning_module() {
                Some(owner) => self.mapping.map(owner) == self.path,
                None => true,
            },
        }
    }

    fn is_submodule(&self, name: &str, child: &Module) -> bool {
        if self.native_compat && child.package.is_none() {
            return true;
        }

        // A single-file module has no submodules, so this one is imported.
        let Some(parent_package) = self.module.package.as_deref().filter(|p| !p.is_empty()) else {
            return false;
        };

        child.package.as_deref().is_some_and(|package| {
            package == parent_package
                || package
                    .strip_prefix(parent_package)
                    .and_then(|rest| rest.strip_prefix('.'))
                    == Some(name)
        })
    }
}

/// Whether a member of a class belongs on the class page.
#[must_use]
pub fn is_class_member_visible(
    name: &str,
    kind: MemberKind,
    doc: Option<&str>,
    version: RuntimeVersion,
) -> bool {
    match kind {
        MemberKind::Class => !matches!(name, "__base__" | "__class__") && !name.starts_with('_'),
        MemberKind::Function => {
            !is_internal_name(name) && !is_generic_dunder_method(name, doc, version)
        }
        MemberKind::Property => !is_generic_dunder_property(name, doc) && !name.starts_with('_'),
        MemberKind::Enum | MemberKind::Data | MemberKind::Unknown => !name.starts_with('_'),
        MemberKind::Module => false,
    }
}

const COMMON_GENERIC_METHODS: &[(&str, &str)] = &[
    ("__delattr__", "Implement delattr(self, name)."),
    ("__eq__", "Return self==value."),
    ("__ge__", "Return self>=value."),
    ("__getattribute__", "Return getattr(self, name)."),
    ("__gt__", "Return self>value."),
    ("__hash__", "Return hash(self)."),
    (
        "__init__",
        "Initialize self.  See help(type(self)) for accurate signature.",
    ),
    (
        "__init_subclass__",
        "This method is called when a class is subclassed.\n\n\
         The default implementation does nothing. It may be\n\
         overridden to extend subclasses.\n",
    ),
    ("__le__", "Return self<=value."),
    ("__lt__", "Return self<value."),
    ("__ne__", "Return self!=value."),
    (
        "__new__",
        "Create and return a new object.  See help(type) for accurate signature.",
    ),
    ("__repr__", "Return repr(self)."),
    ("__setattr__", "Implement setattr(self, name, value)."),
    ("__str__", "Return str(self)."),
    (
        "__subclasshook__",
        "Abstract classes can override this to customize issubclass().\n\n\
         This is invoked early on by abc.ABCMeta.__subclasscheck__().\n\
         It should return True, False or NotImplemented.  If it returns\n\
         NotImplemented, the normal algorithm is used.  Otherwise, it\n\
         overrides the normal algorithm (and the outcome is cached).\n",
    ),
];

/// Texts changed in 3.7.
const GENERIC_METHODS_3_7: &[(&str, &str)] = &[
    ("__dir__", "Default dir() implementation."),
    ("__format__", "Default object formatter."),
    ("__reduce__", "Helper for pickle."),
    ("__reduce_ex__", "Helper for pickle."),
    ("__sizeof__", "Size of object in memory, in bytes."),
];

const GENERIC_METHODS_3_6: &[(&str, &str)] = &[
    ("__dir__", "__dir__() -> list\ndefault dir() implementation"),
    ("__format__", "default object formatter"),
    ("__reduce__", "helper for pickle"),
    ("__reduce_ex__", "helper for pickle"),
    ("__sizeof__", "__sizeof__() -> int\nsize of object in memory, in bytes"),
];

const GENERIC_PROPERTIES: &[(&str, &str)] = &[(
    "__weakref__",
    "list of weak references to the object (if defined)",
)];

/// Special method carrying only the runtime's generic documentation.
///
/// Both the name and the exact text must match; a special method with its
/// own documentation is kept.
#[must_use]
pub fn is_generic_dunder_method(name: &str, doc: Option<&str>, version: RuntimeVersion) -> bool {
    let Some(doc) = doc else {
        return false;
    };
    if !name.starts_with("__") {
        return false;
    }
    let versioned = if version >= RuntimeVersion::new(3, 7) {
        GENERIC_METHODS_3_7
    } else {
        GENERIC_METHODS_3_6
    };
    COMMON_GENERIC_METHODS
        .iter()
        .chain(versioned)
        .any(|&(n, d)| n == name && d == doc)
}

/// Property carrying only the runtime's generic documentation.
#[must_use]
pub fn is_generic_dunder_property(name: &str, doc: Option<&str>) -> bool {
    doc.is_some_and(|doc| GENERIC_PROPERTIES.iter().any(|&(n, d)| n == name && d == doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use refdoc_inspect::{Class, Data, Function};

    fn module(name: &str, package: Option<&str>) -> Module {
        Module {
            name: name.to_owned(),
            package: package.map(str::to_owned),
            ..Module::default()
        }
    }

    fn class_in(module: &str) -> Object {
        Object::Class(Class {
            name: "Thing".to_owned(),
            module: module.to_owned(),
            ..Class::default()
        })
    }

    #[test]
    fn test_name_conventions() {
        assert!(is_dunder("__init__"));
        assert!(!is_dunder("_private"));
        assert!(is_internal_name("_private"));
        assert!(is_internal_name("__mangled"));
        assert!(!is_internal_name("__init__"));
        assert!(!is_internal_name("public"));
    }

    #[test]
    fn test_private_members_hidden() {
        let parent = module("pkg", Some("pkg"));
        let mapping = NameMapping::new();
        let scope = ModuleScope {
            path: "pkg",
            module: &parent,
            mapping: &mapping,
            native_compat: false,
        };

        assert!(!scope.is_visible("_private", &class_in("pkg")));
        assert!(scope.is_visible("Thing", &class_in("pkg")));
    }

    #[test]
    fn test_imported_members_hidden() {
        let parent = module("pkg", Some("pkg"));
        let mut mapping = NameMapping::new();
        mapping.insert("pkg._native", "pkg").unwrap();
        let scope = ModuleScope {
            path: "pkg",
            module: &parent,
            mapping: &mapping,
            native_compat: false,
        };

        assert!(!scope.is_visible("OrderedDict", &class_in("collections")));
        assert!(scope.is_visible("Thing", &class_in("pkg._native")));

        let function = Object::Function(Function {
            name: "f".to_owned(),
            module: Some("os.path".to_owned()),
            ..Function::default()
        });
        assert!(!scope.is_visible("f", &function));
    }

    #[test]
    fn test_data_without_module_is_kept() {
        let parent = module("pkg", Some("pkg"));
        let mapping = NameMapping::new();
        let scope = ModuleScope {
            path: "pkg",
            module: &parent,
            mapping: &mapping,
            native_compat: false,
        };
        assert!(scope.is_visible("VALUE", &Object::Data(Data::default())));
    }

    #[test]
    fn test_submodule_package_checks() {
        let mapping = NameMapping::new();
        let package = module("pkg", Some("pkg"));
        let scope = ModuleScope {
            path: "pkg",
            module: &package,
            mapping: &mapping,
            native_compat: false,
        };

        let submodule = Object::Module(module("pkg.sub", Some("pkg")));
        let subpackage = Object::Module(module("pkg.sub", Some("pkg.sub")));
        let imported = Object::Module(module("os", Some("")));
        let native = Object::Module(module("pkg.native", None));

        assert!(scope.is_visible("sub", &submodule));
        assert!(scope.is_visible("sub", &subpackage));
        assert!(!scope.is_visible("other", &subpackage));
        assert!(!scope.is_visible("os", &imported));
        assert!(!scope.is_visible("native", &native));

        let compat = ModuleScope {
            native_compat: true,
            ..scope
        };
        assert!(compat.is_visible("native", &native));
    }

    #[test]
    fn test_single_file_module_has_no_submodules() {
        let mapping = NameMapping::new();
        let parent = module("single", Some(""));
        let scope = ModuleScope {
            path: "single",
            module: &parent,
            mapping: &mapping,
            native_compat: false,
        };
        assert!(!scope.is_visible("sub", &Object::Module(module("sub", Some("")))));
    }

    #[test]
    fn test_generic_dunder_methods() {
        let v37 = RuntimeVersion::new(3, 7);
        assert!(is_generic_dunder_method("__repr__", Some("Return repr(self)."), v37));
        assert!(!is_generic_dunder_method("__repr__", Some("Custom repr."), v37));
        assert!(!is_generic_dunder_method("__repr__", None, v37));
        assert!(!is_generic_dunder_method("repr", Some("Return repr(self)."), v37));
    }

    #[test]
    fn test_generic_dunder_methods_by_version() {
        let v36 = RuntimeVersion::new(3, 6);
        let v38 = RuntimeVersion::new(3, 8);
        assert!(is_generic_dunder_method("__reduce__", Some("helper for pickle"), v36));
        assert!(!is_generic_dunder_method("__reduce__", Some("helper for pickle"), v38));
        assert!(is_generic_dunder_method("__reduce__", Some("Helper for pickle."), v38));
    }

    #[test]
    fn test_class_member_rules() {
        let v = RuntimeVersion::default();
        assert!(!is_class_member_visible("__class__", MemberKind::Class, None, v));
        assert!(!is_class_member_visible("_Inner", MemberKind::Class, None, v));
        assert!(is_class_member_visible("Inner", MemberKind::Class, None, v));
        assert!(is_class_member_visible("__init__", MemberKind::Function, Some("Make one."), v));
        assert!(!is_class_member_visible("_helper", MemberKind::Function, None, v));
        assert!(!is_class_member_visible(
            "__weakref__",
            MemberKind::Property,
            Some("list of weak references to the object (if defined)"),
            v
        ));
        assert!(!is_class_member_visible("__dict__", MemberKind::Data, None, v));
    }
}
