//! Introspected object graph for refdoc.
//!
//! Rust cannot look inside another runtime's live objects, so introspection
//! happens in a separate step that performs the reflection calls once per
//! object and writes an object dump. This crate loads that dump into an
//! [`ObjectGraph`] whose objects are already classified into the kinds the
//! generator documents: modules, classes, enums, functions, properties and
//! plain data.
//!
//! # Example
//!
//! ```
//! use refdoc_inspect::{Object, ObjectGraph};
//!
//! let graph = ObjectGraph::from_json(r#"{
//!     "roots": {"pkg": 0},
//!     "objects": [{"kind": "module", "name": "pkg", "doc": "A package."}]
//! }"#).unwrap();
//!
//! let (_, module) = graph.root("pkg").unwrap();
//! assert_eq!(module.doc.as_deref(), Some("A package."));
//! ```

mod graph;
mod object;

pub use graph::{InspectError, ObjectGraph, ObjectGraphBuilder, find_member};
pub use object::{
    Annotation, Class, Data, Enum, EnumMember, EnumValue, Function, Getter, Member, Module,
    Object, ObjectId, Opaque, Parameter, ParameterKind, Property, RuntimeVersion, Signature,
    Storage, TypeRef,
};
