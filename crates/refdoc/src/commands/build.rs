//! `refdoc build` command implementation.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use refdoc_config::{CliSettings, Config};
use refdoc_inspect::{ObjectGraph, RuntimeVersion};
use refdoc_renderer::is_absolute_url;
use refdoc_site::{
    AuthoredPage, DirSink, ExternalDocs, Generator, OutputFormat, SiteInfo, SiteSettings,
};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (overrides config).
    #[arg(long, value_parser = ["html", "json"])]
    format: Option<String>,

    /// Support native extension modules without reflection data.
    #[arg(long)]
    native_compat: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub(crate) debug: bool,

    /// Path to configuration file (default: auto-discover refdoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output_dir: self.output,
            format: self.format,
            native_compat: self.native_compat.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let output_dir = &config.output_resolved.dir;

        output.field("Project", &config.project.title);
        output.field("Output", &output_dir.display().to_string());

        let graph = load_graph(&config)?;
        let docs = ExternalDocs::load_files(&config.input_resolved.docs)?;
        let pages = config
            .input_resolved
            .pages
            .iter()
            .map(|path| AuthoredPage::load(path))
            .collect::<Result<Vec<_>, _>>()?;

        let mut sink = DirSink::new(output_dir);
        let report = Generator::new(site_settings(&config)?, graph, docs)
            .with_pages(pages)
            .run(&mut sink)?;

        let copied = copy_resources(&report.resources, &config.base_dir(), output_dir)?;

        output.report(&report, copied, output_dir);
        Ok(())
    }
}

/// Load the object dump, applying the configured runtime version override.
fn load_graph(config: &Config) -> Result<ObjectGraph, CliError> {
    let mut graph = match &config.input_resolved.objects {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading object dump");
            ObjectGraph::from_json(&fs::read_to_string(path)?)?
        }
        None => ObjectGraph::default(),
    };

    if let Some(version) = &config.inspect.runtime_version {
        let version: RuntimeVersion = version.parse().map_err(CliError::Validation)?;
        graph.set_runtime_version(version);
    }

    Ok(graph)
}

fn site_settings(config: &Config) -> Result<SiteSettings, CliError> {
    Ok(SiteSettings {
        roots: config.input_resolved.modules.clone(),
        site: SiteInfo {
            title: config.project.title.clone(),
            subtitle: config.project.subtitle.clone(),
            main_url: config.project.main_url.clone(),
            class_index_expand_levels: config.index.class_index_expand_levels,
            class_index_expand_inner: config.index.class_index_expand_inner,
        },
        native_compat: config.inspect.native_compatibility,
        format: config.output_resolved.format.parse::<OutputFormat>()?,
    })
}

/// Copy resources referenced by rendered prose into the output directory.
///
/// Relative references are looked up in `source_dir`; absolute URLs are left
/// alone. Returns the number of files copied.
fn copy_resources(
    resources: &BTreeSet<String>,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<usize, CliError> {
    let mut copied = 0;
    for resource in resources.iter().filter(|r| !is_absolute_url(r)) {
        let target = output_dir.join(resource);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        tracing::debug!(resource = %resource, "Copying resource");
        fs::copy(source_dir.join(resource), target)?;
        copied += 1;
    }
    Ok(copied)
}
