//! Page context handed to rule actions
//!
//! Bundles the document with the per-instance services actions need: the
//! timer queue, the live region manager and the id generator.
//!
//! The document arena never shrinks; a long-lived page grows by one text
//! node per announcement.

use std::time::Duration;

use axs_a11y::{IdGenerator, LiveRegions, PendingRegion};
use axs_dom::{Document, NodeId, TimerQueue};

use crate::config::EngineConfig;
use crate::TweakError;

/// A document plus the engine services attached to it
#[derive(Debug)]
pub struct Page {
    pub document: Document,
    timers: TimerQueue<Document>,
    regions: LiveRegions,
    ids: IdGenerator,
}

impl Page {
    pub fn new(document: Document, config: &EngineConfig) -> Self {
        Self {
            document,
            timers: TimerQueue::new(),
            regions: LiveRegions::new(config.settle_delay(), config.clear_delay()),
            ids: IdGenerator::new(config.id_prefix.clone()),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn timers(&self) -> &TimerQueue<Document> {
        &self.timers
    }

    pub(crate) fn timers_mut(&mut self) -> &mut TimerQueue<Document> {
        &mut self.timers
    }

    pub fn regions(&self) -> &LiveRegions {
        &self.regions
    }

    /// Speak `text` through the live region `region_id`
    pub fn announce(&mut self, text: &str, region_id: &str) -> Result<PendingRegion, TweakError> {
        let region = self.regions.announce(&mut self.document, &mut self.timers, text, region_id)?;
        Ok(region)
    }

    /// The element's id, generating one if needed
    pub fn ensure_id(&mut self, el: NodeId) -> Result<String, TweakError> {
        Ok(self.ids.ensure_id(&mut self.document, el)?)
    }

    /// Make `parent` own `nodes` through `aria-owns`
    pub fn make_element_own(&mut self, parent: NodeId, nodes: &[NodeId]) -> Result<(), TweakError> {
        Ok(self.ids.make_element_own(&mut self.document, parent, nodes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_use_configured_prefix() {
        let config = EngineConfig { id_prefix: "t-".into(), ..Default::default() };
        let mut page = Page::new(Document::default(), &config);
        let body = page.document.body().unwrap();
        let div = page.document.create_element("div");
        page.document.append_child(body, div).unwrap();
        assert_eq!(page.ensure_id(div).unwrap(), "t-0");
    }

    #[test]
    fn test_announce_uses_configured_delays() {
        let config = EngineConfig { settle_delay_ms: 10, clear_delay_ms: 20, ..Default::default() };
        let mut page = Page::new(Document::default(), &config);
        let region = page.announce("hello", "r").unwrap();
        assert_eq!(region.ready_in, Duration::from_millis(10));
        assert_eq!(page.timers().next_due(), Some(Duration::from_millis(10)));
        assert_eq!(page.timers().pending_count(), 2);
    }
}
