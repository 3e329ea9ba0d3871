//! Mutation Watcher
//!
//! Reruns the dynamic rules wherever the page changes: on each inserted
//! element subtree, and on each element whose watched attribute was set.
//! Records are handled in delivery order, each fully before the next.

use axs_dom::{Document, DomError, MutationObserverInit, MutationRecord, MutationType, ObserverId};

use crate::apply::{apply_rules, PassStats};
use crate::page::Page;
use crate::rules::RuleSet;

/// A running observer over the whole document
#[derive(Debug)]
pub struct MutationWatcher {
    observer: ObserverId,
}

impl MutationWatcher {
    /// Observe child-list changes everywhere, plus the watched attributes
    ///
    /// An empty allowlist observes no attributes at all.
    pub fn start(doc: &mut Document, watched_attributes: &[String]) -> Result<Self, DomError> {
        let init = MutationObserverInit {
            child_list: true,
            subtree: true,
            attributes: !watched_attributes.is_empty(),
            attribute_filter: (!watched_attributes.is_empty()).then(|| watched_attributes.to_vec()),
            ..Default::default()
        };
        let root = doc.root();
        let observer = doc.observe(root, init)?;
        tracing::debug!(?observer, attributes = ?watched_attributes, "mutation watcher started");
        Ok(Self { observer })
    }

    pub fn has_pending(&self, doc: &Document) -> bool {
        doc.pending_records(self.observer) > 0
    }

    /// Take every queued record and rerun `rules` for each
    pub fn process_batch(&self, page: &mut Page, rules: &RuleSet) -> Result<PassStats, DomError> {
        let records = page.document.take_records(self.observer)?;
        tracing::debug!(records = records.len(), "mutation batch");
        Ok(handle_records(page, rules, &records))
    }

    /// Drop queued records without handling them
    pub fn discard_pending(&self, doc: &mut Document) -> Result<usize, DomError> {
        Ok(doc.take_records(self.observer)?.len())
    }

    pub fn stop(self, doc: &mut Document) -> Result<(), DomError> {
        doc.disconnect(self.observer)?;
        tracing::debug!(observer = ?self.observer, "mutation watcher stopped");
        Ok(())
    }
}

/// Handle `records` in order; a failing record is logged and skipped
fn handle_records(page: &mut Page, rules: &RuleSet, records: &[MutationRecord]) -> PassStats {
    let mut stats = PassStats::default();
    for record in records {
        match handle_record(page, rules, record) {
            Ok(pass) => stats.merge(pass),
            Err(e) => tracing::warn!(target_node = %record.target, error = %e, "failed to handle mutation record"),
        }
    }
    stats
}

fn handle_record(page: &mut Page, rules: &RuleSet, record: &MutationRecord) -> Result<PassStats, DomError> {
    let mut stats = PassStats::default();
    match record.mutation_type {
        MutationType::ChildList => {
            for &node in &record.added_nodes {
                // text and comment insertions carry nothing to tweak
                if page.document.tree().is_element(node) {
                    stats.merge(apply_rules(page, node, rules, true, false));
                }
            }
        }
        MutationType::Attributes => {
            let target = record.target;
            if page.document.tree().get(target).is_none() {
                return Err(DomError::NoSuchNode(target));
            }
            if !page.document.tree().is_element(target) {
                return Err(DomError::NotAnElement(target));
            }
            stats.merge(apply_rules(page, target, rules, true, true));
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn label_images() -> RuleSet {
        RuleSet::builder()
            .direct("img", |page, el| {
                let src = page.document.get_attribute(el, "src").unwrap_or("").to_string();
                page.document.set_attribute(el, "aria-label", &src)?;
                Ok(())
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_allowlist_ignores_attributes() {
        let mut page = Page::new(Document::default(), &EngineConfig::default());
        let body = page.document.body().unwrap();
        let img = page.document.create_element("img");
        page.document.append_child(body, img).unwrap();

        let watcher = MutationWatcher::start(&mut page.document, &[]).unwrap();
        page.document.set_attribute(img, "src", "a.png").unwrap();
        assert!(!watcher.has_pending(&page.document));
    }

    #[test]
    fn test_inserted_text_is_ignored() {
        let mut page = Page::new(Document::default(), &EngineConfig::default());
        let body = page.document.body().unwrap();
        let watcher = MutationWatcher::start(&mut page.document, &["src".into()]).unwrap();

        let text = page.document.create_text_node("hello");
        page.document.append_child(body, text).unwrap();
        let stats = watcher.process_batch(&mut page, &label_images()).unwrap();
        assert_eq!(stats.total(), 0);
    }

    #[test]
    fn test_attribute_change_reruns_on_target() {
        let mut page = Page::new(Document::default(), &EngineConfig::default());
        let body = page.document.body().unwrap();
        let img = page.document.create_element("img");
        page.document.append_child(body, img).unwrap();
        let watcher = MutationWatcher::start(&mut page.document, &["src".into()]).unwrap();

        page.document.set_attribute(img, "src", "b.png").unwrap();
        let stats = watcher.process_batch(&mut page, &label_images()).unwrap();
        assert_eq!(stats.applied, 1);
        assert_eq!(page.document.get_attribute(img, "aria-label"), Some("b.png"));

        // The label write is not a watched attribute
        assert!(!watcher.has_pending(&page.document));
    }

    fn src_changed(target: axs_dom::NodeId) -> MutationRecord {
        MutationRecord {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: Some("src".into()),
            old_value: None,
        }
    }

    #[test]
    fn test_bad_record_does_not_stop_batch() {
        let mut page = Page::new(Document::default(), &EngineConfig::default());
        let body = page.document.body().unwrap();
        let first = page.document.create_element("img");
        let last = page.document.create_element("img");
        let text = page.document.create_text_node("caption");
        for node in [first, text, last] {
            page.document.append_child(body, node).unwrap();
        }
        page.document.set_attribute(first, "src", "a.png").unwrap();
        page.document.set_attribute(last, "src", "c.png").unwrap();

        let records = [src_changed(first), src_changed(text), src_changed(axs_dom::NodeId::NONE), src_changed(last)];
        let stats = handle_records(&mut page, &label_images(), &records);
        assert_eq!(stats.applied, 2);
        assert_eq!(page.document.get_attribute(first, "aria-label"), Some("a.png"));
        assert_eq!(page.document.get_attribute(last, "aria-label"), Some("c.png"));
    }

    #[test]
    fn test_stop_disconnects() {
        let mut page = Page::new(Document::default(), &EngineConfig::default());
        let body = page.document.body().unwrap();
        let watcher = MutationWatcher::start(&mut page.document, &[]).unwrap();
        let observer = watcher.observer;
        watcher.stop(&mut page.document).unwrap();

        let img = page.document.create_element("img");
        page.document.append_child(body, img).unwrap();
        assert!(page.document.take_records(observer).is_err());
    }
}
