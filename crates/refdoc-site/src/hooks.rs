//! Callbacks fired around page generation.

use std::fmt;

/// A registered callback.
pub type Hook = Box<dyn FnMut()>;

/// Pre-page and post-run callbacks, fired in registration order.
///
/// Pre-page hooks run once at the start of a run and once before every
/// generated page, letting plugins reset per-page state. Post-run hooks run
/// once after the last file was written.
#[derive(Default)]
pub struct Hooks {
    pre_page: Vec<Hook>,
    post_run: Vec<Hook>,
}

impl Hooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_pre_page(&mut self, hook: impl FnMut() + 'static) {
        self.pre_page.push(Box::new(hook));
    }

    pub fn on_post_run(&mut self, hook: impl FnMut() + 'static) {
        self.post_run.push(Box::new(hook));
    }

    pub fn fire_pre_page(&mut self) {
        for hook in &mut self.pre_page {
            hook();
        }
    }

    pub fn fire_post_run(&mut self) {
        for hook in &mut self.post_run {
            hook();
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("pre_page", &self.pre_page.len())
            .field("post_run", &self.post_run.len())
            .finish()
    }
}
