//! Prose rendering for refdoc.
//!
//! Externally authored content (module and class descriptions, summaries,
//! standalone pages) is written in Markdown. [`ProseRenderer`] turns it into
//! HTML fragments and reports the images it references so they can be
//! shipped with the generated site.
//!
//! # Example
//!
//! ```
//! use refdoc_renderer::ProseRenderer;
//!
//! let result = ProseRenderer::new().render("# Intro\n\nSee ![diagram](arch.png).");
//! assert_eq!(result.title.as_deref(), Some("Intro"));
//! assert_eq!(result.resources, vec!["arch.png".to_owned()]);
//! ```

mod front_matter;
mod prose;
mod util;

pub use front_matter::{FrontMatter, split_front_matter};
pub use prose::{ProseRenderer, RenderedProse};
pub use util::{escape_html, is_absolute_url};
