//! CLI error types.

use refdoc_config::ConfigError;
use refdoc_inspect::InspectError;
use refdoc_site::{SiteError, UnknownFormat};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Inspect(#[from] InspectError),

    #[error("{0}")]
    Site(#[from] SiteError),

    #[error("{0}")]
    Format(#[from] UnknownFormat),

    #[error("{0}")]
    Validation(String),
}
