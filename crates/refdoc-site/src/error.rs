//! Error types for site generation.

use std::io;
use std::path::PathBuf;

use refdoc_inspect::InspectError;

use crate::emit::EmitError;
use crate::mapping::MappingConflict;
use crate::signature::SignatureError;

/// Fatal error aborting a generation run.
///
/// Recoverable conditions (unparsable signatures, undocumented members,
/// unknown member kinds, unused external content) are logged instead.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Two export lists mapped the same internal name.
    #[error(transparent)]
    MappingConflict(#[from] MappingConflict),

    /// A native signature violates the grammar structurally.
    #[error("Invalid signature of {path}: {source}")]
    Signature {
        path: String,
        #[source]
        source: SignatureError,
    },

    /// A configured root module is not in the object graph.
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// An export list names an attribute the module does not have.
    #[error("Module {module} exports {name}, which it does not define")]
    MissingExport { module: String, name: String },

    #[error(transparent)]
    Inspect(#[from] InspectError),

    #[error("Failed to render output: {0}")]
    Emit(#[from] EmitError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An external documentation file is not valid YAML.
    #[error("Invalid documentation file {path}: {source}")]
    Docs {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An authored page has invalid front matter.
    #[error("Invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
