//! Normalized member records listed on module and class pages.

use refdoc_inspect::ParameterKind;
use serde::Serialize;

/// Module or class listed on its parent's page, linking to its own page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    pub name: String,
    pub url: String,
    pub summary: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnumRecord {
    pub name: String,
    pub summary: String,
    /// Underlying type of a native enumeration, e.g. `enum.IntFlag`.
    pub base: Option<String>,
    pub values: Vec<EnumValueRecord>,
    pub has_details: bool,
    pub has_value_details: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnumValueRecord {
    pub name: String,
    /// Escaped textual value.
    pub value: String,
    pub summary: String,
}

/// One function, or one overload of an overloaded native function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FunctionRecord {
    pub name: String,
    pub summary: String,
    pub params: Vec<ParamRecord>,
    pub return_type: Option<String>,
    /// Some parameter has a type or a default value.
    pub has_complex_params: bool,
    pub has_details: bool,
    pub is_classmethod: bool,
    pub is_staticmethod: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParamRecord {
    pub name: String,
    pub type_name: Option<String>,
    /// Escaped default value.
    pub default: Option<String>,
    /// `None` for the placeholder of an uninspectable signature.
    pub kind: Option<ParameterKind>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PropertyRecord {
    pub name: String,
    pub summary: String,
    pub type_name: Option<String>,
    pub is_settable: bool,
    pub is_deletable: bool,
    pub has_details: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DataRecord {
    pub name: String,
    pub summary: String,
    pub type_name: Option<String>,
    /// Escaped value representation, when the type provides a meaningful one.
    pub value: Option<String>,
    pub has_details: bool,
}
