//! Object kinds recorded by the introspection step.
//!
//! Every object reachable from a root module is classified exactly once into
//! one [`Object`] variant. Downstream code dispatches on the variant only.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Index of an object inside an [`ObjectGraph`](crate::ObjectGraph).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A classified runtime object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Object {
    Module(Module),
    Class(Class),
    Enum(Enum),
    Function(Function),
    Property(Property),
    Data(Data),
    /// Frames, tracebacks, code objects and anything else the introspection
    /// step could not place in one of the documented kinds.
    Opaque(Opaque),
}

impl Object {
    /// Documentation text attached to the object, if any.
    pub fn doc(&self) -> Option<&str> {
        match self {
            Self::Module(m) => m.doc.as_deref(),
            Self::Class(c) => c.doc.as_deref(),
            Self::Enum(e) => e.doc.as_deref(),
            Self::Function(f) => f.doc.as_deref(),
            Self::Property(p) => p.doc.as_deref(),
            Self::Data(_) | Self::Opaque(_) => None,
        }
    }

    /// Name of the module that defines this object.
    ///
    /// Modules report `None`; their identity is [`Module::name`].
    pub fn owning_module(&self) -> Option<&str> {
        match self {
            Self::Class(c) => Some(&c.module),
            Self::Enum(e) => Some(&e.module),
            Self::Function(f) => f.module.as_deref(),
            Self::Data(d) => d.module.as_deref(),
            Self::Module(_) | Self::Property(_) | Self::Opaque(_) => None,
        }
    }

    /// Short label of the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Module(_) => "module",
            Self::Class(_) => "class",
            Self::Enum(_) => "enum",
            Self::Function(_) => "function",
            Self::Property(_) => "property",
            Self::Data(_) => "data",
            Self::Opaque(_) => "opaque",
        }
    }

    pub(crate) fn referenced_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        let members: &[Member] = match self {
            Self::Module(m) => &m.members,
            Self::Class(c) => &c.members,
            _ => &[],
        };
        members.iter().map(|m| m.object)
    }
}

/// A named attribute of a module or class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub object: ObjectId,
    /// How the attribute is stored in the owning class's attribute dictionary.
    #[serde(default, skip_serializing_if = "Storage::is_plain")]
    pub storage: Storage,
}

/// Storage wrapper of a class attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Storage {
    #[default]
    Plain,
    StaticMethod,
    ClassMethod,
}

impl Storage {
    fn is_plain(&self) -> bool {
        *self == Self::Plain
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// The module's own qualified name, which may differ from the path it
    /// is reachable under.
    pub name: String,
    /// Package identity. `None` for extension submodules that do not set it,
    /// `Some("")` for top-level single-file modules.
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
    /// Explicit public-export list.
    #[serde(default)]
    pub all: Option<Vec<String>>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub annotations: BTreeMap<String, Annotation>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub module: String,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub annotations: BTreeMap<String, Annotation>,
    /// Members mapping exposed by extension enumerations that offer no
    /// per-member introspection.
    #[serde(default)]
    pub enum_members: Option<Vec<EnumMember>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

/// A native enumeration type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    pub module: String,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub base: Option<TypeRef>,
    /// Values in declaration order.
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    /// Textual representation of the underlying value.
    pub repr: String,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
    /// `None` when the runtime refused to provide a signature.
    #[serde(default)]
    pub signature: Option<Signature>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub getter: Option<Getter>,
    #[serde(default)]
    pub settable: bool,
    #[serde(default)]
    pub deletable: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Getter {
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub signature: Option<Signature>,
}

/// A plain data attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Data {
    #[serde(default)]
    pub module: Option<String>,
    /// Present only when the value's type implements its own representation.
    #[serde(default)]
    pub repr: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opaque {
    #[serde(default)]
    pub type_name: String,
}

/// Introspected call signature.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub return_annotation: Option<Annotation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub kind: ParameterKind,
    #[serde(default)]
    pub annotation: Option<Annotation>,
    /// Textual representation of the default value.
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterKind {
    PositionalOnly,
    #[default]
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

/// A type annotation as recorded by the introspection step.
///
/// Serialized untagged: a bare string is [`Annotation::Text`], an object with
/// a `typing` field is [`Annotation::Typing`], an object with `module` and
/// `name` is [`Annotation::Type`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Annotation {
    /// Annotation written as a string.
    Text(String),
    /// Generic alias from the typing module, already rendered (`List[int]`).
    Typing { typing: String },
    /// A plain type.
    Type(TypeRef),
}

impl Annotation {
    /// Dotted name of the annotation before any name mapping is applied.
    pub fn dotted_name(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Typing { typing } => typing.clone(),
            Self::Type(ty) => ty.qualified_name(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub module: String,
    pub name: String,
}

impl TypeRef {
    /// `module.name`, with the `builtins` module left out.
    pub fn qualified_name(&self) -> String {
        if self.module == "builtins" {
            self.name.clone()
        } else {
            format!("{}.{}", self.module, self.name)
        }
    }
}

/// Version of the runtime the graph was recorded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuntimeVersion {
    pub major: u32,
    pub minor: u32,
}

impl RuntimeVersion {
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl Default for RuntimeVersion {
    fn default() -> Self {
        Self::new(3, 7)
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for RuntimeVersion {
    type Err = String;

    /// Parses `major.minor`, ignoring any further components.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let mut next = |label: &str| {
            parts
                .next()
                .and_then(|p| p.parse::<u32>().ok())
                .ok_or_else(|| format!("invalid runtime version {s:?}: missing {label}"))
        };
        let major = next("major")?;
        let minor = next("minor")?;
        Ok(Self { major, minor })
    }
}

impl TryFrom<String> for RuntimeVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RuntimeVersion> for String {
    fn from(value: RuntimeVersion) -> Self {
        value.to_string()
    }
}
