//! Bootstrapping
//!
//! `Tweaker` owns a page and one site profile. `start` runs the load rules,
//! then the dynamic rules over the whole document, then installs the
//! mutation watcher. The host drives it afterwards: page scripts run
//! through `run_script`, time passes through `advance`, and both deliver
//! the resulting mutation records before returning.

use std::time::Duration;

use axs_dom::Document;

use crate::apply::apply_rules;
use crate::config::EngineConfig;
use crate::page::Page;
use crate::rules::RuleSet;
use crate::watcher::MutationWatcher;
use crate::EngineError;

/// Everything a site contributes
#[derive(Debug, Default)]
pub struct SiteProfile {
    pub name: String,
    /// Run once at startup
    pub load_rules: RuleSet,
    /// Run at startup and on every relevant mutation
    pub dynamic_rules: RuleSet,
    /// Attributes whose changes rerun the dynamic rules
    pub watched_attributes: Vec<String>,
}

impl SiteProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }
}

/// One engine instance attached to one document
#[derive(Debug)]
pub struct Tweaker {
    page: Page,
    profile: SiteProfile,
    watcher: Option<MutationWatcher>,
    feedback_limit: usize,
}

impl Tweaker {
    pub fn new(document: Document, profile: SiteProfile, config: &EngineConfig) -> Self {
        Self {
            page: Page::new(document, config),
            profile,
            watcher: None,
            // zero would drop every batch unseen
            feedback_limit: config.feedback_limit.max(1),
        }
    }

    /// Apply the initial passes and begin watching
    ///
    /// On error the document keeps whatever the initial passes wrote and is
    /// not watched.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.watcher.is_some() {
            return Err(EngineError::AlreadyStarted);
        }
        tracing::info!(site = %self.profile.name, url = self.page.document.url(), "starting tweaker");

        let root = self.page.document.root();
        let load = apply_rules(&mut self.page, root, &self.profile.load_rules, false, false);
        let dynamic = apply_rules(&mut self.page, root, &self.profile.dynamic_rules, false, false);
        tracing::debug!(load = load.total(), dynamic = dynamic.total(), "initial passes done");

        self.watcher = Some(MutationWatcher::start(&mut self.page.document, &self.profile.watched_attributes)?);
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), EngineError> {
        let watcher = self.watcher.take().ok_or(EngineError::NotStarted)?;
        watcher.stop(&mut self.page.document)?;
        tracing::info!(site = %self.profile.name, "tweaker stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.watcher.is_some()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn document(&self) -> &Document {
        &self.page.document
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    /// Run page code against the document, then deliver its mutations
    pub fn run_script<R>(&mut self, script: impl FnOnce(&mut Document) -> R) -> R {
        let result = script(&mut self.page.document);
        self.flush();
        result
    }

    /// Deliver queued mutation records until the document is quiet
    ///
    /// Records queued by the rules themselves are delivered as a further
    /// batch. After `feedback_limit` batches the rest are dropped with a
    /// warning. Returns the number of batches handled.
    pub fn flush(&mut self) -> usize {
        let Some(watcher) = &self.watcher else {
            return 0;
        };

        let mut batches = 0;
        while watcher.has_pending(&self.page.document) {
            if batches == self.feedback_limit {
                let dropped = watcher.discard_pending(&mut self.page.document).unwrap_or(0);
                tracing::warn!(batches, dropped, "dynamic rules keep triggering themselves; dropping records");
                break;
            }
            if let Err(e) = watcher.process_batch(&mut self.page, &self.profile.dynamic_rules) {
                tracing::warn!(error = %e, "mutation batch failed");
                break;
            }
            batches += 1;
        }
        batches
    }

    /// Move the virtual clock forward, running due timers in order
    ///
    /// Each timer callback is followed by a flush, so a timer never sees
    /// records left over from the one before it.
    pub fn advance(&mut self, by: Duration) {
        let until = self.page.now() + by;
        while let Some(task) = self.page.timers_mut().pop_due(until) {
            task.run(&mut self.page.document);
            self.flush();
        }
        self.page.timers_mut().set_now(until);
    }
}
