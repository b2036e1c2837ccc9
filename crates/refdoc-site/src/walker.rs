//! Depth-first walk producing one page per module and class.
//!
//! A module with an export list is documented from that list alone: first
//! every exported object whose own qualified name differs from its public
//! path is registered in the name mapping, then the members are extracted
//! with the complete mapping, so exports can refer to each other in any
//! order. A module without an export list is documented from its inspected
//! attributes, filtered by [`ModuleScope`] and grouped by kind.
//!
//! Each page is handed to the [`PageSink`] as soon as its member lists are
//! complete, before any child page is generated, so only the pages on the
//! current path are held in memory. The walk returns the [`IndexEntry`] tree
//! of everything it generated.

use refdoc_inspect::{Class, InspectError, Member, Module, Object, ObjectGraph, ObjectId};

use crate::error::SiteError;
use crate::extract::{Extractor, MemberKind, Owner};
use crate::external::DocKind;
use crate::index::{IndexEntry, IndexKind};
use crate::mapping::NameMapping;
use crate::page::{ClassMembers, ModuleMembers, PageBody, PageDescriptor};
use crate::path::QualifiedPath;
use crate::visibility::{ModuleScope, is_class_member_visible};

/// Receives pages as the walk produces them.
pub trait PageSink {
    /// Called before the members of a page are collected.
    fn begin_page(&mut self);

    /// Receives a complete page.
    fn finish_page(&mut self, page: PageDescriptor) -> Result<(), SiteError>;
}

/// Child page collected while building its parent's page.
enum Deferred<'g> {
    Module {
        path: QualifiedPath,
        id: ObjectId,
        module: &'g Module,
    },
    Class {
        path: QualifiedPath,
        id: ObjectId,
        class: &'g Class,
    },
}

/// Kinds listed on a module page, in page order.
const MODULE_SECTIONS: [MemberKind; 5] = [
    MemberKind::Module,
    MemberKind::Class,
    MemberKind::Enum,
    MemberKind::Function,
    MemberKind::Data,
];

/// Kinds listed on a class page, in page order.
const CLASS_SECTIONS: [MemberKind; 5] = [
    MemberKind::Class,
    MemberKind::Enum,
    MemberKind::Function,
    MemberKind::Property,
    MemberKind::Data,
];

pub struct PageWalker<'g, 'a> {
    graph: &'g ObjectGraph,
    extractor: &'a mut Extractor,
    sink: &'a mut dyn PageSink,
    /// Objects whose pages are being generated, outermost first.
    ancestors: Vec<ObjectId>,
}

impl<'g, 'a> PageWalker<'g, 'a> {
    pub fn new(
        graph: &'g ObjectGraph,
        extractor: &'a mut Extractor,
        sink: &'a mut dyn PageSink,
    ) -> Self {
        Self {
            graph,
            extractor,
            sink,
            ancestors: Vec::new(),
        }
    }

    /// Walk the root module registered under `name`.
    pub fn walk_root(&mut self, name: &str) -> Result<IndexEntry, SiteError> {
        let (id, module) = self.graph.root(name).map_err(|e| match e {
            InspectError::UnknownRoot(name) => SiteError::UnknownModule(name),
            other => SiteError::Inspect(other),
        })?;
        self.walk_module(QualifiedPath::root(name), id, module)
    }

    fn walk_module(
        &mut self,
        path: QualifiedPath,
        id: ObjectId,
        module: &'g Module,
    ) -> Result<IndexEntry, SiteError> {
        let path_str = path.to_string();
        tracing::debug!(path = %path_str, "Generating page");
        self.sink.begin_page();
        self.ancestors.push(id);

        let summary = self
            .extractor
            .summary(DocKind::Module, &path_str, module.doc.as_deref());
        let content = self.extractor.page_content(DocKind::Module, &path_str);

        let mut members = ModuleMembers::default();
        let mut deferred = Vec::new();
        match &module.all {
            Some(exports) => {
                self.collect_exports(&path, module, exports, &mut members, &mut deferred)?;
            }
            None => self.collect_inspected(&path, module, &mut members, &mut deferred)?,
        }

        let page = PageDescriptor::for_path(&path, summary, content, PageBody::Module(members));
        let mut entry = IndexEntry::new(
            IndexKind::Module,
            path.name(),
            page.url.clone(),
            page.summary.clone(),
        );
        self.sink.finish_page(page)?;

        entry.children = self.walk_deferred(deferred)?;
        self.ancestors.pop();
        Ok(entry)
    }

    fn walk_class(
        &mut self,
        path: QualifiedPath,
        id: ObjectId,
        class: &'g Class,
    ) -> Result<IndexEntry, SiteError> {
        let path_str = path.to_string();
        tracing::debug!(path = %path_str, "Generating page");
        self.sink.begin_page();
        self.ancestors.push(id);

        let summary = self
            .extractor
            .summary(DocKind::Class, &path_str, class.doc.as_deref());
        let content = self.extractor.page_content(DocKind::Class, &path_str);

        let mut members = ClassMembers::default();
        let mut deferred = Vec::new();
        self.collect_class_members(&path, class, &mut members, &mut deferred)?;

        let page = PageDescriptor::for_path(&path, summary, content, PageBody::Class(members));
        let mut entry = IndexEntry::new(
            IndexKind::Class,
            path.name(),
            page.url.clone(),
            page.summary.clone(),
        );
        self.sink.finish_page(page)?;

        entry.children = self.walk_deferred(deferred)?;
        self.ancestors.pop();
        Ok(entry)
    }

    fn walk_deferred(&mut self, deferred: Vec<Deferred<'g>>) -> Result<Vec<IndexEntry>, SiteError> {
        deferred
            .into_iter()
            .map(|child| match child {
                Deferred::Module { path, id, module } => self.walk_module(path, id, module),
                Deferred::Class { path, id, class } => self.walk_class(path, id, class),
            })
            .collect()
    }

    /// Name mapping entries for exports whose own name differs from their
    /// public path.
    fn export_mapping(
        &self,
        path: &QualifiedPath,
        module: &'g Module,
        exports: &[String],
    ) -> Result<NameMapping, SiteError> {
        let mut delta = NameMapping::new();
        for name in exports {
            let member = find_export(path, module, name)?;
            let public = path.child(name).to_string();
            let own = match self.graph.object(member.object) {
                Object::Module(m) => Some(m.name.clone()),
                Object::Class(c) => Some(format!("{}.{}", c.module, c.name)),
                Object::Enum(e) => Some(format!("{}.{}", e.module, e.name)),
                Object::Function(f) => f.module.as_ref().map(|m| format!("{m}.{}", f.name)),
                Object::Property(_) | Object::Data(_) | Object::Opaque(_) => None,
            };
            if let Some(own) = own
                && own != public
            {
                delta.insert(own, public)?;
            }
        }
        Ok(delta)
    }

    fn collect_exports(
        &mut self,
        path: &QualifiedPath,
        module: &'g Module,
        exports: &[String],
        members: &mut ModuleMembers,
        deferred: &mut Vec<Deferred<'g>>,
    ) -> Result<(), SiteError> {
        let delta = self.export_mapping(path, module, exports)?;
        self.extractor.extend_mapping(delta)?;

        // Exports are public by declaration, no visibility filtering.
        for name in exports {
            let member = find_export(path, module, name)?;
            self.collect_module_member(path, module, member, members, deferred)?;
        }
        Ok(())
    }

    fn collect_inspected(
        &mut self,
        path: &QualifiedPath,
        module: &'g Module,
        members: &mut ModuleMembers,
        deferred: &mut Vec<Deferred<'g>>,
    ) -> Result<(), SiteError> {
        let path_str = path.to_string();
        let native_compat = self.extractor.native_compat();
        let mut candidates: Vec<&'g Member> = {
            let scope = ModuleScope {
                path: &path_str,
                module,
                mapping: self.extractor.mapping(),
                native_compat,
            };
            module
                .members
                .iter()
                .filter(|m| scope.is_visible(&m.name, self.graph.object(m.object)))
                .collect()
        };
        candidates.sort_by(|a, b| a.name.cmp(&b.name));

        for section in MODULE_SECTIONS {
            for member in &candidates {
                let object = self.graph.object(member.object);
                if module_section(object, native_compat) != section {
                    continue;
                }
                warn_if_undocumented(&path.child(&member.name), section, object);
                self.collect_module_member(path, module, member, members, deferred)?;
            }
        }

        for member in &candidates {
            let object = self.graph.object(member.object);
            if module_section(object, native_compat) == MemberKind::Unknown {
                warn_unknown(path, &member.name, object);
            }
        }
        Ok(())
    }

    fn collect_module_member(
        &mut self,
        path: &QualifiedPath,
        module: &'g Module,
        member: &'g Member,
        members: &mut ModuleMembers,
        deferred: &mut Vec<Deferred<'g>>,
    ) -> Result<(), SiteError> {
        let graph = self.graph;
        let subpath = path.child(&member.name);
        let object = graph.object(member.object);

        match (module_section(object, self.extractor.native_compat()), object) {
            (MemberKind::Module, Object::Module(child)) => {
                if self.is_ancestor(member.object, &subpath) {
                    return Ok(());
                }
                let link = self
                    .extractor
                    .link(DocKind::Module, &subpath, child.doc.as_deref());
                members.modules.push(link);
                deferred.push(Deferred::Module {
                    path: subpath,
                    id: member.object,
                    module: child,
                });
            }
            (MemberKind::Class, Object::Class(class)) => {
                if self.is_ancestor(member.object, &subpath) {
                    return Ok(());
                }
                let link = self
                    .extractor
                    .link(DocKind::Class, &subpath, class.doc.as_deref());
                members.classes.push(link);
                deferred.push(Deferred::Class {
                    path: subpath,
                    id: member.object,
                    class,
                });
            }
            (MemberKind::Enum, _) => {
                if let Some(record) = self.extractor.enum_record(&member.name, object) {
                    members.push_enum(record);
                }
            }
            (MemberKind::Function, Object::Function(function)) => {
                let records = self.extractor.function(&subpath, function, Owner::Module)?;
                members.functions.extend(records);
            }
            (MemberKind::Data, Object::Data(data)) => {
                let record = self
                    .extractor
                    .data_object(&subpath, data, &module.annotations);
                members.data.push(record);
            }
            // A descriptor outside a class is plain data without a value.
            (MemberKind::Data, _) => {
                let record = self.extractor.data(&subpath, None, &module.annotations);
                members.data.push(record);
            }
            _ => warn_unknown(path, &member.name, object),
        }
        Ok(())
    }

    fn collect_class_members(
        &mut self,
        path: &QualifiedPath,
        class: &'g Class,
        members: &mut ClassMembers,
        deferred: &mut Vec<Deferred<'g>>,
    ) -> Result<(), SiteError> {
        let graph = self.graph;
        let version = graph.runtime_version();
        let native_compat = self.extractor.native_compat();

        let mut sorted: Vec<&'g Member> = class.members.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        for section in CLASS_SECTIONS {
            for member in &sorted {
                let object = graph.object(member.object);
                let kind = MemberKind::of(object, native_compat);
                if kind != section
                    || !is_class_member_visible(&member.name, kind, object.doc(), version)
                {
                    continue;
                }

                let subpath = path.child(&member.name);
                if kind != MemberKind::Data {
                    warn_if_undocumented(&subpath, kind, object);
                }

                match object {
                    Object::Class(inner) if kind == MemberKind::Class => {
                        if self.is_ancestor(member.object, &subpath) {
                            continue;
                        }
                        let link = self
                            .extractor
                            .link(DocKind::Class, &subpath, inner.doc.as_deref());
                        members.classes.push(link);
                        deferred.push(Deferred::Class {
                            path: subpath,
                            id: member.object,
                            class: inner,
                        });
                    }
                    Object::Function(function) => {
                        let owner = Owner::Class(member.storage);
                        for record in self.extractor.function(&subpath, function, owner)? {
                            members.push_routine(record);
                        }
                    }
                    Object::Property(property) => {
                        members
                            .properties
                            .push(self.extractor.property(&subpath, property)?);
                    }
                    Object::Data(data) => {
                        let record =
                            self.extractor
                                .data_object(&subpath, data, &class.annotations);
                        members.data.push(record);
                    }
                    _ => {
                        if let Some(record) = self.extractor.enum_record(&member.name, object) {
                            members.push_enum(record);
                        }
                    }
                }
            }
        }

        for member in &sorted {
            let object = graph.object(member.object);
            if MemberKind::of(object, native_compat) == MemberKind::Unknown
                && !member.name.starts_with('_')
            {
                warn_unknown(path, &member.name, object);
            }
        }
        Ok(())
    }

    /// Whether `id` is a page currently being generated. Such a reference
    /// would recurse forever and is skipped.
    fn is_ancestor(&self, id: ObjectId, path: &QualifiedPath) -> bool {
        let cyclic = self.ancestors.contains(&id);
        if cyclic {
            tracing::warn!(path = %path, "Skipping cyclic reference to an enclosing page");
        }
        cyclic
    }
}

fn find_export<'g>(
    path: &QualifiedPath,
    module: &'g Module,
    name: &str,
) -> Result<&'g Member, SiteError> {
    refdoc_inspect::find_member(&module.members, name).ok_or_else(|| SiteError::MissingExport {
        module: path.to_string(),
        name: name.to_owned(),
    })
}

/// Section of a module page an object is listed in. Properties found at
/// module level are listed as data.
fn module_section(object: &Object, native_compat: bool) -> MemberKind {
    match MemberKind::of(object, native_compat) {
        MemberKind::Property => MemberKind::Data,
        kind => kind,
    }
}

fn warn_if_undocumented(path: &QualifiedPath, kind: MemberKind, object: &Object) {
    if object.doc().is_some_and(|doc| !doc.is_empty()) {
        return;
    }
    match kind {
        MemberKind::Class | MemberKind::Enum | MemberKind::Property => {
            tracing::warn!("{path} is undocumented");
        }
        MemberKind::Function => tracing::warn!("{path}() is undocumented"),
        MemberKind::Module | MemberKind::Data | MemberKind::Unknown => {}
    }
}

fn warn_unknown(path: &QualifiedPath, name: &str, object: &Object) {
    tracing::warn!(
        path = %path,
        name,
        kind = object.kind_name(),
        "Skipping member of unknown kind"
    );
}
