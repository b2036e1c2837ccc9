//! Reference documentation site generation for refdoc.
//!
//! This crate provides:
//! - [`Generator`]: walks root modules of an [`refdoc_inspect::ObjectGraph`]
//!   into one page per module and class, plus authored and index pages
//! - [`parse_signature`] / [`parse_docstring`]: the signature grammar native
//!   extension modules embed at the start of their documentation
//! - [`NameMapping`]: rewriting of internal dotted names to public ones
//! - [`Emitter`] implementations for HTML and JSON output
//!
//! # Quick Start
//!
//! ```
//! use refdoc_site::{NameMapping, parse_signature};
//!
//! let mut mapping = NameMapping::new();
//! mapping.insert("pkg._native", "pkg").unwrap();
//!
//! let parsed = parse_signature("scale(self: pkg._native.Vec, factor: float=1.0) -> pkg._native.Vec", &mapping).unwrap();
//! assert_eq!(parsed.name, "scale");
//! assert_eq!(parsed.params()[0].type_name.as_deref(), Some("pkg.Vec"));
//! assert_eq!(parsed.return_type(), Some("pkg.Vec"));
//! ```

mod authored;
mod docstring;
mod emit;
mod error;
mod external;
mod extract;
mod generator;
mod hooks;
mod html;
mod index;
mod mapping;
mod page;
mod path;
mod record;
mod signature;
mod sink;
mod visibility;
mod walker;

pub use authored::{AuthoredPage, HOME_PAGE, RenderedPage};
pub use emit::{EmitError, Emitter, JsonEmitter, RenderData, Template};
pub use error::SiteError;
pub use external::{DocEntry, DocKind, ExternalDocs, UnusedDocs};
pub use extract::{Extractor, MemberKind, Owner};
pub use generator::{BuildReport, Generator, OutputFormat, SiteSettings, UnknownFormat};
pub use hooks::{Hook, Hooks};
pub use html::{HtmlEmitter, SiteInfo};
pub use index::{IndexEntry, IndexKind, SiteIndex, mark_nested_modules};
pub use mapping::{MappingConflict, NameMapping};
pub use page::{ClassMembers, ModuleMembers, PageBody, PageDescriptor};
pub use path::{BreadcrumbItem, QualifiedPath};
pub use record::{
    DataRecord, EnumRecord, EnumValueRecord, FunctionRecord, LinkRecord, ParamRecord,
    PropertyRecord,
};
pub use signature::{
    ELLIPSIS, ParsedParam, ParsedSignature, SignatureError, SignatureForm, parse_docstring,
    parse_signature,
};
pub use sink::{DirSink, MemorySink, OutputSink};
pub use visibility::{
    ModuleScope, is_class_member_visible, is_dunder, is_generic_dunder_method,
    is_generic_dunder_property, is_internal_name,
};
pub use walker::{PageSink, PageWalker};

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(SiteError: Send, Sync);
    static_assertions::assert_impl_all!(NameMapping: Send, Sync, Clone);
    static_assertions::assert_impl_all!(BuildReport: Send, Sync);
}
