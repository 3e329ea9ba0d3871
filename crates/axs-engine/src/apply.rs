//! Rule application
//!
//! One pass runs every rule of a set over a subtree. Matches for a rule are
//! collected before its action runs on any of them, so an action that
//! inserts matching elements does not extend the current rule's list. The
//! watcher picks those up from the insertion record instead.

use axs_dom::NodeId;

use crate::page::Page;
use crate::rules::{Rule, RuleSet};

/// Counters for one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Actions that returned `Ok`
    pub applied: usize,
    /// Actions that failed and were logged
    pub failed: usize,
}

impl PassStats {
    pub fn total(&self) -> usize {
        self.applied + self.failed
    }

    pub(crate) fn merge(&mut self, other: PassStats) {
        self.applied += other.applied;
        self.failed += other.failed;
    }
}

/// Apply `rules` to the descendants of `root`, and to `root` itself when
/// `include_root` is set
///
/// On an attribute pass, rules that ignore attribute changes are skipped.
/// The root is handled after its descendants. A failing action is logged
/// and never stops the remaining elements or rules.
pub fn apply_rules(page: &mut Page, root: NodeId, rules: &RuleSet, include_root: bool, attribute_pass: bool) -> PassStats {
    let mut stats = PassStats::default();

    for rule in rules {
        if attribute_pass && !rule.watches_attribute_changes() {
            continue;
        }

        let targets = rule.selector().select_all(page.document.tree(), root);
        for el in targets {
            invoke(page, rule, el, &mut stats);
        }

        // Matched after the descendants ran, so their changes count
        if include_root && rule.selector().matches(page.document.tree(), root) {
            invoke(page, rule, root, &mut stats);
        }
    }

    tracing::debug!(root = %root, attribute_pass, applied = stats.applied, failed = stats.failed, "rule pass");
    stats
}

fn invoke(page: &mut Page, rule: &Rule, el: NodeId, stats: &mut PassStats) {
    match rule.action().invoke(page, el) {
        Ok(()) => stats.applied += 1,
        Err(e) => {
            stats.failed += 1;
            tracing::warn!(selector = %rule.selector(), element = %el, error = %e, "tweak failed");
        }
    }
}
