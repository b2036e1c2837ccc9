//! Configuration management for refdoc.
//!
//! Parses `refdoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Path Expansion
//!
//! Path values support environment variable and home directory expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//! - a leading `~` - expands to the home directory
//!
//! Expanded fields:
//! - `input.objects`
//! - `input.pages`
//! - `input.docs`
//! - `output.dir`
//!
//! Relative paths are resolved against the directory of the config file.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override output format.
    pub format: Option<String>,
    /// Override native compatibility mode.
    pub native_compat: Option<bool>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "refdoc.toml";

/// Output formats accepted in `output.format`.
pub const OUTPUT_FORMATS: [&str; 2] = ["html", "json"];

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project metadata shown on every page.
    pub project: ProjectConfig,
    /// Input configuration (paths are relative strings from TOML).
    input: InputConfigRaw,
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// Introspection options.
    pub inspect: InspectConfig,
    /// Class index presentation.
    pub index: IndexConfig,

    /// Resolved input configuration (set after loading).
    #[serde(skip)]
    pub input_resolved: InputConfig,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Project metadata.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project title.
    pub title: String,
    /// Optional subtitle shown next to the title.
    pub subtitle: Option<String>,
    /// Link target of the project title.
    pub main_url: Option<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            title: "My Python Project".to_owned(),
            subtitle: None,
            main_url: None,
        }
    }
}

/// Raw input configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct InputConfigRaw {
    objects: Option<String>,
    modules: Vec<String>,
    pages: Vec<String>,
    docs: Vec<String>,
}

/// Resolved input configuration with absolute paths.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InputConfig {
    /// Object dump produced by the introspection step.
    pub objects: Option<PathBuf>,
    /// Root modules to document, in order.
    pub modules: Vec<String>,
    /// Authored Markdown pages.
    pub pages: Vec<PathBuf>,
    /// External documentation files, merged in order.
    pub docs: Vec<PathBuf>,
}

/// Raw output configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
    format: Option<String>,
}

/// Resolved output configuration with absolute paths.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Directory the site is written to.
    pub dir: PathBuf,
    /// Output format, one of [`OUTPUT_FORMATS`].
    pub format: String,
}

/// Introspection options.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// Support native extension modules that carry no reflection data.
    pub native_compatibility: bool,
    /// Override of the runtime version recorded in the object dump, as
    /// `major.minor`.
    pub runtime_version: Option<String>,
}

/// Class index presentation.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Depth up to which module trees start expanded.
    pub class_index_expand_levels: usize,
    /// Whether classes with inner classes start expanded.
    pub class_index_expand_inner: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            class_index_expand_levels: 1,
            class_index_expand_inner: false,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`input.objects`").
        field: String,
        /// Error message (e.g., "${`OBJECTS_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a version field to look like `major.minor`.
fn require_version(value: &str, field: &str) -> Result<(), ConfigError> {
    let valid = value.split_once('.').is_some_and(|(major, minor)| {
        major.parse::<u32>().is_ok() && minor.parse::<u32>().is_ok()
    });
    if !valid {
        return Err(ConfigError::Validation(format!(
            "{field} must have the form major.minor, got {value:?}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `refdoc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(output_dir) = &settings.output_dir {
            self.output_resolved.dir.clone_from(output_dir);
        }
        if let Some(format) = &settings.format {
            self.output_resolved.format.clone_from(format);
        }
        if let Some(native_compat) = settings.native_compat {
            self.inspect.native_compatibility = native_compat;
        }
    }

    /// Directory containing the config file, or the current directory when
    /// running without one.
    #[must_use]
    pub fn base_dir(&self) -> PathBuf {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| std::env::current_dir().unwrap_or_default(), Path::to_path_buf)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            project: ProjectConfig::default(),
            input: InputConfigRaw::default(),
            output: OutputConfigRaw::default(),
            inspect: InspectConfig::default(),
            index: IndexConfig::default(),
            input_resolved: InputConfig::default(),
            output_resolved: OutputConfig {
                dir: base.join("output"),
                format: "html".to_owned(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying CLI
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.project.title, "project.title")?;

        if !OUTPUT_FORMATS.contains(&self.output_resolved.format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "output.format must be one of {}, got {:?}",
                OUTPUT_FORMATS.join(", "),
                self.output_resolved.format
            )));
        }

        if !self.input_resolved.modules.is_empty() && self.input_resolved.objects.is_none() {
            return Err(ConfigError::Validation(
                "input.modules requires input.objects to be set".to_owned(),
            ));
        }

        if let Some(version) = &self.inspect.runtime_version {
            require_version(version, "inspect.runtime_version")?;
        }

        Ok(())
    }

    /// Expand environment variable references in path strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(objects) = &self.input.objects {
            self.input.objects = Some(expand::expand_path(objects, "input.objects")?);
        }
        for page in &mut self.input.pages {
            *page = expand::expand_path(page, "input.pages")?;
        }
        for docs in &mut self.input.docs {
            *docs = expand::expand_path(docs, "input.docs")?;
        }
        if let Some(dir) = &self.output.dir {
            self.output.dir = Some(expand::expand_path(dir, "output.dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve_all =
            |paths: &[String]| paths.iter().map(|p| config_dir.join(p)).collect::<Vec<_>>();

        self.input_resolved = InputConfig {
            objects: self.input.objects.as_deref().map(|p| config_dir.join(p)),
            modules: self.input.modules.clone(),
            pages: resolve_all(&self.input.pages),
            docs: resolve_all(&self.input.docs),
        };

        self.output_resolved = OutputConfig {
            dir: config_dir.join(self.output.dir.as_deref().unwrap_or("output")),
            format: self
                .output
                .format
                .clone()
                .unwrap_or_else(|| "html".to_owned()),
        };
    }
}
