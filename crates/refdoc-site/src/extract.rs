//! Member extraction: turns classified objects into page records.
//!
//! Ordinary objects are described from their recorded reflection data.
//! Functions and properties of native extensions that carry no such data
//! are described by parsing the signature at the start of their
//! documentation instead (see [`crate::signature`]).

use std::collections::{BTreeMap, BTreeSet};

use refdoc_inspect::{
    Annotation, Class, Data, Enum, Function, Object, ParameterKind, Property, Storage,
};
use refdoc_renderer::{ProseRenderer, escape_html};

use crate::docstring;
use crate::error::SiteError;
use crate::external::{DocKind, ExternalDocs};
use crate::mapping::NameMapping;
use crate::path::QualifiedPath;
use crate::record::{
    DataRecord, EnumRecord, EnumValueRecord, FunctionRecord, LinkRecord, ParamRecord,
    PropertyRecord,
};
use crate::signature::{self, ParsedSignature};

/// Documentation the runtime gives every enumeration without its own.
const GENERIC_ENUM_DOC: &str = "An enumeration.";

/// What a member is documented as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind {
    Module,
    Class,
    Enum,
    Function,
    Property,
    Data,
    /// Frames, tracebacks, code objects and the like; never documented.
    Unknown,
}

impl MemberKind {
    /// Classify `object`. In native compatibility mode a class exposing a
    /// members mapping is an enumeration.
    #[must_use]
    pub fn of(object: &Object, native_compat: bool) -> Self {
        match object {
            Object::Module(_) => Self::Module,
            Object::Class(class) if native_compat && class.enum_members.is_some() => Self::Enum,
            Object::Class(_) => Self::Class,
            Object::Enum(_) => Self::Enum,
            Object::Function(_) => Self::Function,
            Object::Property(_) => Self::Property,
            Object::Data(_) => Self::Data,
            Object::Opaque(_) => Self::Unknown,
        }
    }
}

/// Where a function was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    Module,
    /// Member of a class, stored with the given wrapper.
    Class(Storage),
}

/// Shared state for extracting members across a whole run.
///
/// Holds the name mapping, which export lists extend while the walk
/// progresses, and the external documentation, whose entries are marked as
/// consumed when used.
pub struct Extractor {
    mapping: NameMapping,
    docs: ExternalDocs,
    prose: ProseRenderer,
    resources: BTreeSet<String>,
    native_compat: bool,
}

impl Extractor {
    #[must_use]
    pub fn new(docs: ExternalDocs, native_compat: bool) -> Self {
        Self {
            mapping: NameMapping::new(),
            docs,
            prose: ProseRenderer::new(),
            resources: BTreeSet::new(),
            native_compat,
        }
    }

    #[must_use]
    pub fn with_mapping(mut self, mapping: NameMapping) -> Self {
        self.mapping = mapping;
        self
    }

    #[must_use]
    pub fn native_compat(&self) -> bool {
        self.native_compat
    }

    #[must_use]
    pub fn mapping(&self) -> &NameMapping {
        &self.mapping
    }

    /// Merge mapping entries derived from an export list.
    pub fn extend_mapping(&mut self, delta: NameMapping) -> Result<(), SiteError> {
        self.mapping.extend(delta)?;
        Ok(())
    }

    #[must_use]
    pub fn docs(&self) -> &ExternalDocs {
        &self.docs
    }

    /// External documentation and referenced resources, once the run is over.
    #[must_use]
    pub fn into_parts(self) -> (ExternalDocs, BTreeSet<String>) {
        (self.docs, self.resources)
    }

    /// Render Markdown prose, remembering the resources it references.
    pub fn render_prose(&mut self, text: &str) -> String {
        let rendered = self.prose.render(text);
        self.resources.extend(rendered.resources);
        rendered.html
    }

    fn render_inline(&mut self, text: &str) -> String {
        let rendered = self.prose.render_inline(text);
        self.resources.extend(rendered.resources);
        rendered.html
    }

    /// Summary of a module or class page: external content wins over the
    /// object's own documentation.
    pub fn summary(&mut self, kind: DocKind, path: &str, doc: Option<&str>) -> String {
        match self.docs.summary(kind, path).map(str::to_owned) {
            Some(external) => self.render_inline(&external),
            None => docstring::summary(doc),
        }
    }

    /// Externally supplied page body for `path`, marking the entry consumed
    /// even when it has no body.
    pub fn page_content(&mut self, kind: DocKind, path: &str) -> Option<String> {
        let content = self.docs.consume(kind, path)?.content.clone();
        if content.is_empty() {
            return None;
        }
        Some(self.render_prose(&content))
    }

    /// Entry for a module or class listed on its parent's page.
    pub fn link(&mut self, kind: DocKind, path: &QualifiedPath, doc: Option<&str>) -> LinkRecord {
        LinkRecord {
            name: path.name().to_owned(),
            url: path.url(),
            summary: self.summary(kind, &path.to_string(), doc),
        }
    }

    /// Describe a native enumeration.
    #[must_use]
    pub fn native_enum(&self, name: &str, enum_: &Enum) -> EnumRecord {
        let summary = match enum_.doc.as_deref() {
            Some(GENERIC_ENUM_DOC) => String::new(),
            doc => docstring::summary(doc),
        };

        let mut record = EnumRecord {
            name: name.to_owned(),
            summary,
            base: enum_.base.as_ref().map(|base| base.qualified_name()),
            values: Vec::with_capacity(enum_.values.len()),
            has_details: false,
            has_value_details: false,
        };

        for value in &enum_.values {
            // Values inherit the enum's documentation when they have none.
            let summary = if value.doc == enum_.doc {
                String::new()
            } else {
                docstring::summary(value.doc.as_deref())
            };
            if !summary.is_empty() {
                record.has_details = true;
                record.has_value_details = true;
            }
            record.values.push(EnumValueRecord {
                name: value.name.clone(),
                value: escape_html(&value.repr),
                summary,
            });
        }

        record
    }

    /// Describe an extension enumeration known only by its members mapping.
    ///
    /// Values carry no documentation of their own.
    #[must_use]
    pub fn mapped_enum(&self, name: &str, class: &Class) -> EnumRecord {
        let values = class
            .enum_members
            .iter()
            .flatten()
            .map(|member| EnumValueRecord {
                name: member.name.clone(),
                value: member.value.to_string(),
                summary: String::new(),
            })
            .collect();

        EnumRecord {
            name: name.to_owned(),
            summary: docstring::summary(class.doc.as_deref()),
            base: None,
            values,
            has_details: false,
            has_value_details: false,
        }
    }

    /// Describe an enumeration of either kind.
    pub fn enum_record(&self, name: &str, object: &Object) -> Option<EnumRecord> {
        match object {
            Object::Enum(enum_) => Some(self.native_enum(name, enum_)),
            Object::Class(class) if class.enum_members.is_some() => {
                Some(self.mapped_enum(name, class))
            }
            _ => None,
        }
    }

    /// Describe a function. Overloaded native functions yield one record per
    /// overload.
    pub fn function(
        &self,
        path: &QualifiedPath,
        function: &Function,
        owner: Owner,
    ) -> Result<Vec<FunctionRecord>, SiteError> {
        let name = path.name();
        if self.native_compat
            && function.signature.is_none()
            && let Some(doc) = function.doc.as_deref()
            && doc.starts_with(name)
        {
            let overloads = signature::parse_docstring(name, doc, &self.mapping).map_err(
                |source| SiteError::Signature {
                    path: path.to_string(),
                    source,
                },
            )?;
            return Ok(overloads
                .iter()
                .map(|parsed| native_function(name, parsed, owner))
                .collect());
        }

        Ok(vec![self.reflected_function(name, function, owner)])
    }

    fn reflected_function(&self, name: &str, function: &Function, owner: Owner) -> FunctionRecord {
        let (is_classmethod, is_staticmethod) = match owner {
            Owner::Class(storage) => (
                storage == Storage::ClassMethod,
                storage == Storage::StaticMethod,
            ),
            Owner::Module => (false, false),
        };

        let mut record = FunctionRecord {
            name: name.to_owned(),
            summary: docstring::summary(function.doc.as_deref()),
            params: Vec::new(),
            return_type: None,
            has_complex_params: false,
            has_details: false,
            is_classmethod,
            is_staticmethod,
        };

        // Some native callables refuse introspection.
        let Some(signature) = &function.signature else {
            record.params.push(ParamRecord {
                name: "...".to_owned(),
                type_name: None,
                default: None,
                kind: None,
            });
            return record;
        };

        record.return_type = signature
            .return_annotation
            .as_ref()
            .map(|a| self.annotation(a));
        for parameter in &signature.parameters {
            let type_name = parameter.annotation.as_ref().map(|a| self.annotation(a));
            let default = parameter.default.as_deref().map(escape_html);
            if type_name.is_some() || default.is_some() {
                record.has_complex_params = true;
            }
            record.params.push(ParamRecord {
                name: parameter.name.clone(),
                type_name,
                default,
                kind: Some(parameter.kind),
            });
        }

        record
    }

    /// Describe a property.
    pub fn property(
        &self,
        path: &QualifiedPath,
        property: &Property,
    ) -> Result<PropertyRecord, SiteError> {
        let type_name = match &property.getter {
            Some(getter) => match &getter.signature {
                Some(signature) => signature
                    .return_annotation
                    .as_ref()
                    .map(|a| self.annotation(a)),
                // Native properties document the type in the getter signature.
                None if self.native_compat => match getter.doc.as_deref() {
                    Some(doc) => signature::parse_signature(doc, &self.mapping)
                        .map_err(|source| SiteError::Signature {
                            path: path.to_string(),
                            source,
                        })?
                        .return_type()
                        .map(str::to_owned),
                    None => None,
                },
                None => None,
            },
            None => None,
        };

        Ok(PropertyRecord {
            name: path.name().to_owned(),
            summary: docstring::summary(property.doc.as_deref()),
            type_name,
            is_settable: property.settable,
            is_deletable: property.deletable,
            has_details: false,
        })
    }

    /// Describe a plain data attribute.
    ///
    /// `annotations` is the owner's annotation table. An external data entry
    /// for the path provides the summary and is consumed.
    pub fn data(
        &mut self,
        path: &QualifiedPath,
        repr: Option<&str>,
        annotations: &BTreeMap<String, Annotation>,
    ) -> DataRecord {
        let name = path.name();
        let mut record = DataRecord {
            name: name.to_owned(),
            summary: String::new(),
            type_name: annotations.get(name).map(|a| self.annotation(a)),
            value: repr.map(escape_html),
            has_details: false,
        };

        if let Some(entry) = self.docs.consume(DocKind::Data, &path.to_string()) {
            let summary = entry.summary.clone();
            record.summary = self.render_inline(&summary);
        }

        record
    }

    /// Describe a [`Data`] object.
    pub fn data_object(
        &mut self,
        path: &QualifiedPath,
        data: &Data,
        annotations: &BTreeMap<String, Annotation>,
    ) -> DataRecord {
        self.data(path, data.repr.as_deref(), annotations)
    }

    fn annotation(&self, annotation: &Annotation) -> String {
        self.mapping.map(&annotation.dotted_name()).into_owned()
    }
}

/// Build the record of one parsed native signature.
fn native_function(name: &str, parsed: &ParsedSignature, owner: Owner) -> FunctionRecord {
    let params = parsed.params();
    let is_method = matches!(owner, Owner::Class(_))
        && params.first().is_some_and(|first| first.name == "self");

    // Native bindings name anonymous positional arguments arg0, arg1, ...
    // Either all of them follow that scheme or none is positional-only.
    let unnamed = if is_method { &params[1..] } else { params };
    let positional_only = unnamed
        .iter()
        .enumerate()
        .all(|(i, param)| param.name == format!("arg{i}"));

    let mut record = FunctionRecord {
        name: name.to_owned(),
        summary: parsed.summary.clone(),
        params: Vec::with_capacity(params.len()),
        // Void functions are not shown as returning None.
        return_type: parsed
            .return_type()
            .filter(|ty| *ty != "None")
            .map(str::to_owned),
        has_complex_params: false,
        has_details: false,
        is_classmethod: false,
        is_staticmethod: !is_method,
    };

    for param in params {
        if param.type_name.is_some() || param.default.is_some() {
            record.has_complex_params = true;
        }
        let (name, kind) = match param.name.as_str() {
            "*args" => ("args".to_owned(), ParameterKind::VarPositional),
            "**kwargs" => ("kwargs".to_owned(), ParameterKind::VarKeyword),
            other if positional_only => (other.to_owned(), ParameterKind::PositionalOnly),
            other => (other.to_owned(), ParameterKind::PositionalOrKeyword),
        };
        record.params.push(ParamRecord {
            // The type of self is the class itself.
            type_name: if name == "self" {
                None
            } else {
                param.type_name.clone()
            },
            default: param.default.as_deref().map(escape_html),
            name,
            kind: Some(kind),
        });
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use refdoc_inspect::{EnumMember, EnumValue, Getter, Parameter, Signature, TypeRef};

    fn path(dotted: &str) -> QualifiedPath {
        let mut segments = dotted.split('.');
        let mut path = QualifiedPath::root(segments.next().unwrap());
        for segment in segments {
            path = path.child(segment);
        }
        path
    }

    fn param(name: &str, type_name: Option<&str>, kind: ParameterKind) -> ParamRecord {
        ParamRecord {
            name: name.to_owned(),
            type_name: type_name.map(str::to_owned),
            default: None,
            kind: Some(kind),
        }
    }

    fn native_doc_function(doc: &str) -> Function {
        Function {
            name: "f".to_owned(),
            module: Some("pkg".to_owned()),
            doc: Some(doc.to_owned()),
            signature: None,
        }
    }

    #[test]
    fn test_member_kind() {
        let mapped = Object::Class(Class {
            enum_members: Some(vec![]),
            ..Class::default()
        });
        assert_eq!(MemberKind::of(&mapped, true), MemberKind::Enum);
        assert_eq!(MemberKind::of(&mapped, false), MemberKind::Class);
        assert_eq!(
            MemberKind::of(&Object::Data(Data::default()), false),
            MemberKind::Data
        );
    }

    #[test]
    fn test_summary_prefers_external_docs() {
        let docs = ExternalDocs::from_yaml("classes:\n  pkg.Thing:\n    summary: '*External*'\n")
            .unwrap();
        let mut extractor = Extractor::new(docs, false);

        assert_eq!(
            extractor.summary(DocKind::Class, "pkg.Thing", Some("Own.")),
            "<em>External</em>"
        );
        assert_eq!(
            extractor.summary(DocKind::Class, "pkg.Other", Some("Own.\n\nMore.")),
            "Own."
        );
        // Summaries alone do not consume the entry.
        assert_eq!(extractor.docs().unused().classes, vec!["pkg.Thing".to_owned()]);
    }

    #[test]
    fn test_page_content_consumes_entry() {
        let docs = ExternalDocs::from_yaml(
            "modules:\n  pkg:\n    content: 'See ![arch](arch.png)'\n",
        )
        .unwrap();
        let mut extractor = Extractor::new(docs, false);

        let content = extractor.page_content(DocKind::Module, "pkg").unwrap();
        assert!(content.contains("<img"));
        assert!(extractor.docs().unused().is_empty());

        let (_, resources) = extractor.into_parts();
        assert_eq!(resources.into_iter().collect::<Vec<_>>(), vec!["arch.png"]);
    }

    #[test]
    fn test_native_enum() {
        let enum_ = Enum {
            name: "Color".to_owned(),
            module: "pkg".to_owned(),
            doc: Some("Colors.".to_owned()),
            base: Some(TypeRef {
                module: "enum".to_owned(),
                name: "Enum".to_owned(),
            }),
            values: vec![
                EnumValue {
                    name: "RED".to_owned(),
                    repr: "1".to_owned(),
                    doc: Some("Colors.".to_owned()),
                },
                EnumValue {
                    name: "GREEN".to_owned(),
                    repr: "'<g>'".to_owned(),
                    doc: Some("Green one.".to_owned()),
                },
            ],
        };
        let record = Extractor::new(ExternalDocs::new(), false).native_enum("Color", &enum_);

        assert_eq!(
            record,
            EnumRecord {
                name: "Color".to_owned(),
                summary: "Colors.".to_owned(),
                base: Some("enum.Enum".to_owned()),
                values: vec![
                    EnumValueRecord {
                        name: "RED".to_owned(),
                        value: "1".to_owned(),
                        summary: String::new(),
                    },
                    EnumValueRecord {
                        name: "GREEN".to_owned(),
                        value: "&#x27;&lt;g&gt;&#x27;".to_owned(),
                        summary: "Green one.".to_owned(),
                    },
                ],
                has_details: true,
                has_value_details: true,
            }
        );
    }

    #[test]
    fn test_generic_enum_doc_suppressed() {
        let enum_ = Enum {
            name: "E".to_owned(),
            doc: Some("An enumeration.".to_owned()),
            ..Enum::default()
        };
        let record = Extractor::new(ExternalDocs::new(), false).native_enum("E", &enum_);
        assert_eq!(record.summary, "");
        assert!(!record.has_details);
    }

    #[test]
    fn test_mapped_enum() {
        let class = Class {
            name: "Mode".to_owned(),
            module: "pkg".to_owned(),
            doc: Some("Modes.".to_owned()),
            enum_members: Some(vec![
                EnumMember {
                    name: "A".to_owned(),
                    value: 0,
                },
                EnumMember {
                    name: "B".to_owned(),
                    value: 7,
                },
            ]),
            ..Class::default()
        };
        let record = Extractor::new(ExternalDocs::new(), true).mapped_enum("Mode", &class);

        assert_eq!(record.summary, "Modes.");
        assert_eq!(record.base, None);
        assert_eq!(
            record
                .values
                .iter()
                .map(|v| (v.name.as_str(), v.value.as_str()))
                .collect::<Vec<_>>(),
            vec![("A", "0"), ("B", "7")]
        );
    }

    #[test]
    fn test_reflected_function() {
        let function = Function {
            name: "greet".to_owned(),
            module: Some("pkg".to_owned()),
            doc: Some("Say hello.".to_owned()),
            signature: Some(Signature {
                parameters: vec![
                    Parameter {
                        name: "self".to_owned(),
                        kind: ParameterKind::PositionalOrKeyword,
                        annotation: None,
                        default: None,
                    },
                    Parameter {
                        name: "name".to_owned(),
                        kind: ParameterKind::PositionalOrKeyword,
                        annotation: Some(Annotation::Type(TypeRef {
                            module: "builtins".to_owned(),
                            name: "str".to_owned(),
                        })),
                        default: Some("'<world>'".to_owned()),
                    },
                ],
                return_annotation: Some(Annotation::Text("pkg._impl.Greeting".to_owned())),
            }),
        };
        let mut mapping = NameMapping::new();
        mapping.insert("pkg._impl", "pkg").unwrap();
        let extractor = Extractor::new(ExternalDocs::new(), false).with_mapping(mapping);

        let records = extractor
            .function(&path("pkg.Greeter.greet"), &function, Owner::Class(Storage::Plain))
            .unwrap();
        assert_eq!(
            records,
            vec![FunctionRecord {
                name: "greet".to_owned(),
                summary: "Say hello.".to_owned(),
                params: vec![
                    param("self", None, ParameterKind::PositionalOrKeyword),
                    ParamRecord {
                        default: Some("&#x27;&lt;world&gt;&#x27;".to_owned()),
                        ..param("name", Some("str"), ParameterKind::PositionalOrKeyword)
                    },
                ],
                return_type: Some("pkg.Greeting".to_owned()),
                has_complex_params: true,
                has_details: false,
                is_classmethod: false,
                is_staticmethod: false,
            }]
        );
    }

    #[test]
    fn test_reflected_storage_flags() {
        let extractor = Extractor::new(ExternalDocs::new(), false);
        let function = Function {
            signature: Some(Signature::default()),
            ..Function::default()
        };

        let class_method = extractor
            .function(&path("pkg.C.make"), &function, Owner::Class(Storage::ClassMethod))
            .unwrap();
        assert!(class_method[0].is_classmethod);
        assert!(!class_method[0].is_staticmethod);

        let static_method = extractor
            .function(&path("pkg.C.util"), &function, Owner::Class(Storage::StaticMethod))
            .unwrap();
        assert!(static_method[0].is_staticmethod);
    }

    #[test]
    fn test_uninspectable_function() {
        let extractor = Extractor::new(ExternalDocs::new(), false);
        let function = Function {
            name: "log".to_owned(),
            doc: Some("log(x, [base=math.e])".to_owned()),
            ..Function::default()
        };

        let records = extractor
            .function(&path("math.log"), &function, Owner::Module)
            .unwrap();
        assert_eq!(
            records[0].params,
            vec![ParamRecord {
                name: "...".to_owned(),
                type_name: None,
                default: None,
                kind: None,
            }]
        );
        assert_eq!(records[0].return_type, None);
    }

    #[test]
    fn test_native_compat_prefers_reflected_signature() {
        let extractor = Extractor::new(ExternalDocs::new(), true);
        let function = Function {
            name: "add".to_owned(),
            module: Some("pkg".to_owned()),
            doc: Some("add two numbers together.".to_owned()),
            signature: Some(Signature {
                parameters: vec![Parameter {
                    name: "a".to_owned(),
                    kind: ParameterKind::PositionalOrKeyword,
                    annotation: Some(Annotation::Text("int".to_owned())),
                    default: None,
                }],
                return_annotation: None,
            }),
        };

        let records = extractor
            .function(&path("pkg.add"), &function, Owner::Module)
            .unwrap();
        assert_eq!(
            records,
            vec![FunctionRecord {
                name: "add".to_owned(),
                summary: "add two numbers together.".to_owned(),
                params: vec![param("a", Some("int"), ParameterKind::PositionalOrKeyword)],
                return_type: None,
                has_complex_params: true,
                has_details: false,
                is_classmethod: false,
                is_staticmethod: false,
            }]
        );
    }

    #[test]
    fn test_native_function_positional_only() {
        let extractor = Extractor::new(ExternalDocs::new(), true);
        let function = native_doc_function("f(arg0: int, arg1: float) -> None\n\nDo it.");

        let records = extractor
            .function(&path("pkg.f"), &function, Owner::Module)
            .unwrap();
        assert_eq!(
            records,
            vec![FunctionRecord {
                name: "f".to_owned(),
                summary: "Do it.".to_owned(),
                params: vec![
                    param("arg0", Some("int"), ParameterKind::PositionalOnly),
                    param("arg1", Some("float"), ParameterKind::PositionalOnly),
                ],
                return_type: None,
                has_complex_params: true,
                has_details: false,
                is_classmethod: false,
                is_staticmethod: true,
            }]
        );
    }

    #[test]
    fn test_native_method() {
        let extractor = Extractor::new(ExternalDocs::new(), true);
        let function = native_doc_function("f(self: pkg.Thing, arg0: int) -> int");

        let records = extractor
            .function(&path("pkg.Thing.f"), &function, Owner::Class(Storage::Plain))
            .unwrap();
        let record = &records[0];
        assert!(!record.is_staticmethod);
        assert_eq!(
            record.params,
            vec![
                param("self", None, ParameterKind::PositionalOnly),
                param("arg0", Some("int"), ParameterKind::PositionalOnly),
            ]
        );
    }

    #[test]
    fn test_native_named_arguments_flip_whole_list() {
        let extractor = Extractor::new(ExternalDocs::new(), true);
        let function = native_doc_function("f(arg0: int, scale: float=1.0, *args, **kwargs)");

        let records = extractor
            .function(&path("pkg.f"), &function, Owner::Module)
            .unwrap();
        let kinds: Vec<_> = records[0]
            .params
            .iter()
            .map(|p| (p.name.as_str(), p.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("arg0", Some(ParameterKind::PositionalOrKeyword)),
                ("scale", Some(ParameterKind::PositionalOrKeyword)),
                ("args", Some(ParameterKind::VarPositional)),
                ("kwargs", Some(ParameterKind::VarKeyword)),
            ]
        );
    }

    #[test]
    fn test_native_overloads() {
        let extractor = Extractor::new(ExternalDocs::new(), true);
        let function = native_doc_function(
            "f(*args, **kwargs)\nOverloaded function.\n\n\
             1. f(arg0: int) -> int\n\n\
             2. f(arg0: str) -> str\n",
        );

        let records = extractor
            .function(&path("pkg.f"), &function, Owner::Module)
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].return_type.as_deref(), Some("str"));
    }

    #[test]
    fn test_native_structural_error() {
        let extractor = Extractor::new(ExternalDocs::new(), true);
        let function = native_doc_function("f(a: List[int");

        let err = extractor
            .function(&path("pkg.f"), &function, Owner::Module)
            .unwrap_err();
        assert!(matches!(err, SiteError::Signature { path, .. } if path == "pkg.f"));
    }

    #[test]
    fn test_doc_not_starting_with_name_uses_reflection() {
        let extractor = Extractor::new(ExternalDocs::new(), true);
        let function = native_doc_function("Does things.");

        let records = extractor
            .function(&path("pkg.f"), &function, Owner::Module)
            .unwrap();
        assert_eq!(records[0].summary, "Does things.");
        assert_eq!(records[0].params[0].name, "...");
    }

    #[test]
    fn test_property() {
        let property = Property {
            doc: Some("The size.".to_owned()),
            getter: Some(Getter {
                doc: None,
                signature: Some(Signature {
                    parameters: vec![],
                    return_annotation: Some(Annotation::Typing {
                        typing: "Tuple[int, int]".to_owned(),
                    }),
                }),
            }),
            settable: true,
            deletable: false,
        };
        let record = Extractor::new(ExternalDocs::new(), false)
            .property(&path("pkg.Image.size"), &property)
            .unwrap();

        assert_eq!(
            record,
            PropertyRecord {
                name: "size".to_owned(),
                summary: "The size.".to_owned(),
                type_name: Some("Tuple[int, int]".to_owned()),
                is_settable: true,
                is_deletable: false,
                has_details: false,
            }
        );
    }

    #[test]
    fn test_native_property_type_from_getter_doc() {
        let property = Property {
            getter: Some(Getter {
                doc: Some("(self: pkg._native.Image) -> pkg._native.Size\n".to_owned()),
                signature: None,
            }),
            ..Property::default()
        };
        let mut mapping = NameMapping::new();
        mapping.insert("pkg._native", "pkg").unwrap();

        let compat = Extractor::new(ExternalDocs::new(), true).with_mapping(mapping);
        let record = compat.property(&path("pkg.Image.size"), &property).unwrap();
        assert_eq!(record.type_name.as_deref(), Some("pkg.Size"));

        let plain = Extractor::new(ExternalDocs::new(), false);
        let record = plain.property(&path("pkg.Image.size"), &property).unwrap();
        assert_eq!(record.type_name, None);
    }

    #[test]
    fn test_data() {
        let docs = ExternalDocs::from_yaml("data:\n  pkg.LIMIT:\n    summary: Upper **limit**.\n")
            .unwrap();
        let mut extractor = Extractor::new(docs, false);
        let annotations = BTreeMap::from([(
            "LIMIT".to_owned(),
            Annotation::Type(TypeRef {
                module: "builtins".to_owned(),
                name: "int".to_owned(),
            }),
        )]);

        let record = extractor.data(&path("pkg.LIMIT"), Some("3"), &annotations);
        assert_eq!(
            record,
            DataRecord {
                name: "LIMIT".to_owned(),
                summary: "Upper <strong>limit</strong>.".to_owned(),
                type_name: Some("int".to_owned()),
                value: Some("3".to_owned()),
                has_details: false,
            }
        );
        assert!(extractor.docs().unused().is_empty());

        let record = extractor.data(&path("pkg.OTHER"), None, &annotations);
        assert_eq!(record.summary, "");
        assert_eq!(record.type_name, None);
        assert_eq!(record.value, None);
    }
}
