//! Page descriptors: one per generated page.

use serde::Serialize;

use crate::path::{BreadcrumbItem, QualifiedPath};
use crate::record::{DataRecord, EnumRecord, FunctionRecord, LinkRecord, PropertyRecord};

/// Everything needed to render one page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    pub url: String,
    pub breadcrumb: Vec<BreadcrumbItem>,
    /// Display prefix with soft-break markers between segments.
    pub prefix_wbr: String,
    pub summary: String,
    /// Rendered body from external content or an authored page.
    pub content: Option<String>,
    pub body: PageBody,
}

impl PageDescriptor {
    /// Page of a module or class at `path`.
    #[must_use]
    pub fn for_path(
        path: &QualifiedPath,
        summary: String,
        content: Option<String>,
        body: PageBody,
    ) -> Self {
        Self {
            url: path.url(),
            breadcrumb: path.breadcrumb(),
            prefix_wbr: path.prefix_wbr(),
            summary,
            content,
            body,
        }
    }

    /// Title of the last breadcrumb item.
    #[must_use]
    pub fn title(&self) -> &str {
        self.breadcrumb.last().map_or("", |item| item.title.as_str())
    }
}

/// Member lists of a page, by page kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageBody {
    Module(ModuleMembers),
    Class(ClassMembers),
    /// Authored prose page without members.
    Page,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ModuleMembers {
    pub modules: Vec<LinkRecord>,
    pub classes: Vec<LinkRecord>,
    pub enums: Vec<EnumRecord>,
    pub functions: Vec<FunctionRecord>,
    pub data: Vec<DataRecord>,
    pub has_enum_details: bool,
}

impl ModuleMembers {
    pub fn push_enum(&mut self, record: EnumRecord) {
        self.has_enum_details |= record.has_details;
        self.enums.push(record);
    }
}

/// Members of a class page. Routines are partitioned into four buckets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClassMembers {
    pub classes: Vec<LinkRecord>,
    pub enums: Vec<EnumRecord>,
    pub classmethods: Vec<FunctionRecord>,
    pub staticmethods: Vec<FunctionRecord>,
    pub dunder_methods: Vec<FunctionRecord>,
    pub methods: Vec<FunctionRecord>,
    pub properties: Vec<PropertyRecord>,
    pub data: Vec<DataRecord>,
    pub has_enum_details: bool,
}

impl ClassMembers {
    pub fn push_enum(&mut self, record: EnumRecord) {
        self.has_enum_details |= record.has_details;
        self.enums.push(record);
    }

    /// File a routine: special methods first, then class methods, static
    /// methods and everything else.
    pub fn push_routine(&mut self, record: FunctionRecord) {
        let bucket = if record.name.starts_with("__") {
            &mut self.dunder_methods
        } else if record.is_classmethod {
            &mut self.classmethods
        } else if record.is_staticmethod {
            &mut self.staticmethods
        } else {
            &mut self.methods
        };
        bucket.push(record);
    }
}
