//! Colored terminal output for build progress and summaries.

use std::path::Path;

use console::{Style, Term};
use refdoc_site::BuildReport;

/// Writes styled status lines to stderr.
pub(crate) struct Output {
    term: Term,
    dim: Style,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            dim: Style::new().dim(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    /// Print a `label: value` line with a dimmed label.
    pub(crate) fn field(&self, label: &str, value: &str) {
        let _ = self
            .term
            .write_line(&format!("{} {value}", self.dim.apply_to(format!("{label}:"))));
    }

    /// Summarize a finished build.
    ///
    /// Unused external documentation keys are listed one per line under a
    /// warning, so stale YAML entries are easy to find.
    pub(crate) fn report(&self, report: &BuildReport, copied: usize, output_dir: &Path) {
        let unused = &report.unused_docs;
        if !unused.is_empty() {
            self.warning(&format!(
                "{} external documentation entries matched nothing:",
                unused.len()
            ));
            for key in unused.modules.iter().chain(&unused.classes).chain(&unused.data) {
                let _ = self.term.write_line(&format!("  {}", self.yellow.apply_to(key)));
            }
        }
        self.success(&format!(
            "Wrote {} files and {copied} resources to {}",
            report.files_written,
            output_dir.display()
        ));
    }

    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }
}
