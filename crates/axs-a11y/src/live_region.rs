//! Live Region Support
//!
//! Hidden `aria-live` regions used to speak one-shot announcements.
//!
//! A freshly inserted region is not treated as live by assistive
//! technology until a few frames have passed, so a new region only becomes
//! usable after the settle delay. Announced text is cleared after the clear
//! delay because most screen readers only speak on a content change.
//!
//! Known limitation: timers are never cancelled. A second announcement to
//! the same region inside the clear window is wiped by the first one's
//! clear. Each announcement also leaves one detached text node behind in
//! the document arena, which only frees nodes with the document.

use std::time::Duration;

use axs_dom::{Document, NodeId, TimerQueue};

use crate::A11yError;

/// Inline style keeping the region out of flow and visually near zero-sized
const REGION_STYLE: &str =
    "position: absolute; width: 1px; height: 1px; overflow: hidden; clip: rect(0 0 0 0); white-space: nowrap;";

/// A region lookup that may still be settling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRegion {
    /// The region element
    pub node: NodeId,
    /// Time until the region may receive content
    pub ready_in: Duration,
    /// Whether this lookup created the region
    pub created: bool,
}

impl PendingRegion {
    pub fn is_ready(&self) -> bool {
        self.ready_in.is_zero()
    }
}

/// Live region manager
#[derive(Debug, Clone)]
pub struct LiveRegions {
    settle_delay: Duration,
    clear_delay: Duration,
}

impl LiveRegions {
    pub fn new(settle_delay: Duration, clear_delay: Duration) -> Self {
        Self { settle_delay, clear_delay }
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    pub fn clear_delay(&self) -> Duration {
        self.clear_delay
    }

    /// Find the region with `id`, creating it if the document has none
    pub fn get_region(&self, doc: &mut Document, id: &str) -> Result<PendingRegion, A11yError> {
        if id.is_empty() {
            return Err(A11yError::InvalidRegionId);
        }
        if let Some(node) = doc.get_element_by_id(id) {
            return Ok(PendingRegion { node, ready_in: Duration::ZERO, created: false });
        }

        let container = doc.body()
            .or_else(|| doc.document_element())
            .ok_or_else(|| A11yError::NoContainer(id.to_string()))?;
        let node = doc.create_element("div");
        doc.set_attribute(node, "id", id)?;
        doc.set_attribute(node, "aria-live", "polite")?;
        doc.set_attribute(node, "aria-atomic", "true")?;
        doc.set_attribute(node, "style", REGION_STYLE)?;
        doc.append_child(container, node)?;
        tracing::debug!(region = id, "created live region");

        Ok(PendingRegion { node, ready_in: self.settle_delay, created: true })
    }

    /// Speak `text` through the region `region_id`
    ///
    /// Sets the text once the region is ready and schedules clearing it
    /// `clear_delay` later.
    pub fn announce(
        &self,
        doc: &mut Document,
        timers: &mut TimerQueue<Document>,
        text: &str,
        region_id: &str,
    ) -> Result<PendingRegion, A11yError> {
        let region = self.get_region(doc, region_id)?;
        let node = region.node;
        tracing::debug!(region = region_id, text, "announce");

        if region.is_ready() {
            doc.set_text_content(node, text)?;
        } else {
            let text = text.to_string();
            timers.set_timeout(region.ready_in, move |doc: &mut Document| {
                if let Err(e) = doc.set_text_content(node, &text) {
                    tracing::warn!(error = %e, "failed to fill live region");
                }
            });
        }
        timers.set_timeout(region.ready_in + self.clear_delay, move |doc: &mut Document| {
            if let Err(e) = doc.set_text_content(node, "") {
                tracing::warn!(error = %e, "failed to clear live region");
            }
        });
        Ok(region)
    }
}

impl Default for LiveRegions {
    fn default() -> Self {
        Self::new(Duration::from_millis(134), Duration::from_millis(1000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until(doc: &mut Document, timers: &mut TimerQueue<Document>, ms: u64) {
        let until = Duration::from_millis(ms);
        while let Some(task) = timers.pop_due(until) {
            task.run(doc);
        }
        timers.set_now(until);
    }

    #[test]
    fn test_get_region_creates_once() {
        let mut doc = Document::default();
        let regions = LiveRegions::default();

        let first = regions.get_region(&mut doc, "r1").unwrap();
        assert!(first.created);
        assert_eq!(first.ready_in, Duration::from_millis(134));
        assert_eq!(doc.get_attribute(first.node, "aria-live"), Some("polite"));
        assert_eq!(doc.get_attribute(first.node, "aria-atomic"), Some("true"));
        assert_eq!(doc.tree().parent(first.node), doc.body());

        let second = regions.get_region(&mut doc, "r1").unwrap();
        assert_eq!(second.node, first.node);
        assert!(second.is_ready());
        assert!(!second.created);
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut doc = Document::default();
        let mut timers = TimerQueue::new();
        let regions = LiveRegions::default();
        assert!(matches!(regions.get_region(&mut doc, ""), Err(A11yError::InvalidRegionId)));
        assert!(regions.announce(&mut doc, &mut timers, "x", "").is_err());
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_announce_waits_for_new_region_then_clears() {
        let mut doc = Document::default();
        let mut timers = TimerQueue::new();
        let regions = LiveRegions::default();

        let region = regions.announce(&mut doc, &mut timers, "moved", "r1").unwrap();
        assert_eq!(doc.text_content(region.node), "");

        run_until(&mut doc, &mut timers, 134);
        assert_eq!(doc.text_content(region.node), "moved");

        run_until(&mut doc, &mut timers, 1133);
        assert_eq!(doc.text_content(region.node), "moved");

        run_until(&mut doc, &mut timers, 1134);
        assert_eq!(doc.text_content(region.node), "");
    }

    #[test]
    fn test_existing_region_is_filled_immediately() {
        let mut doc = Document::default();
        let mut timers = TimerQueue::new();
        let regions = LiveRegions::default();
        regions.get_region(&mut doc, "r1").unwrap();

        let region = regions.announce(&mut doc, &mut timers, "moved", "r1").unwrap();
        assert_eq!(doc.text_content(region.node), "moved");
        run_until(&mut doc, &mut timers, 1000);
        assert_eq!(doc.text_content(region.node), "");
    }

    #[test]
    fn test_each_announcement_costs_one_node() {
        let mut doc = Document::default();
        let mut timers = TimerQueue::new();
        let regions = LiveRegions::default();
        regions.get_region(&mut doc, "r1").unwrap();

        let before = doc.tree().len();
        for round in 1..=3u64 {
            regions.announce(&mut doc, &mut timers, "moved", "r1").unwrap();
            run_until(&mut doc, &mut timers, round * 1000);
            assert_eq!(doc.tree().len(), before + round as usize);
        }
    }

    #[test]
    fn test_quick_second_announcement_is_cut_short() {
        let mut doc = Document::default();
        let mut timers = TimerQueue::new();
        let regions = LiveRegions::default();
        regions.get_region(&mut doc, "r1").unwrap();

        regions.announce(&mut doc, &mut timers, "first", "r1").unwrap();
        run_until(&mut doc, &mut timers, 500);
        let region = regions.announce(&mut doc, &mut timers, "second", "r1").unwrap();
        assert_eq!(doc.text_content(region.node), "second");

        // The first clear still fires at 1000ms
        run_until(&mut doc, &mut timers, 1000);
        assert_eq!(doc.text_content(region.node), "");
    }
}
