//! Mutation Observers
//!
//! Observers register interest in a target (and optionally its subtree).
//! Every tree or attribute write made through `Document` queues a
//! `MutationRecord` to each interested observer, in occurrence order.
//! Records stay queued until the owner drains them with `take_records`.

use crate::{DomError, DomTree, NodeId};

/// Observer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

/// Mutation observer options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub subtree: bool,
    pub attribute_old_value: bool,
    pub attribute_filter: Option<Vec<String>>,
}

impl MutationObserverInit {
    /// Apply the implied flags and reject options that observe nothing
    pub fn normalize(mut self) -> Result<Self, DomError> {
        if self.attribute_filter.is_some() || self.attribute_old_value {
            self.attributes = true;
        }
        if !self.child_list && !self.attributes {
            return Err(DomError::InvalidObserverOptions(
                "one of child_list or attributes must be set",
            ));
        }
        if let Some(filter) = &mut self.attribute_filter {
            for name in filter.iter_mut() {
                name.make_ascii_lowercase();
            }
        }
        Ok(self)
    }

    fn wants_attribute(&self, name: &str) -> bool {
        self.attributes
            && self.attribute_filter.as_ref()
                .is_none_or(|filter| filter.iter().any(|f| f.eq_ignore_ascii_case(name)))
    }
}

/// Mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub previous_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

impl MutationRecord {
    pub(crate) fn child_list(
        target: NodeId,
        added_nodes: Vec<NodeId>,
        removed_nodes: Vec<NodeId>,
        previous_sibling: Option<NodeId>,
        next_sibling: Option<NodeId>,
    ) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes,
            removed_nodes,
            previous_sibling,
            next_sibling,
            attribute_name: None,
            old_value: None,
        }
    }

    pub(crate) fn attribute(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: Some(name.to_ascii_lowercase()),
            old_value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    ChildList,
}

#[derive(Debug)]
struct Registration {
    id: ObserverId,
    targets: Vec<(NodeId, MutationObserverInit)>,
    records: Vec<MutationRecord>,
}

impl Registration {
    /// Options of the first target that covers `node`
    fn options_for(&self, tree: &DomTree, node: NodeId) -> Option<&MutationObserverInit> {
        self.targets.iter()
            .find(|(target, opts)| {
                *target == node || (opts.subtree && tree.contains(*target, node))
            })
            .map(|(_, opts)| opts)
    }
}

/// Observers attached to one document
#[derive(Debug, Default)]
pub(crate) struct ObserverRegistry {
    next_id: u32,
    observers: Vec<Registration>,
}

impl ObserverRegistry {
    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) -> Result<ObserverId, DomError> {
        let options = options.normalize()?;
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push(Registration {
            id,
            targets: vec![(target, options)],
            records: Vec::new(),
        });
        Ok(id)
    }

    pub fn disconnect(&mut self, id: ObserverId) -> Result<(), DomError> {
        let pos = self.observers.iter()
            .position(|r| r.id == id)
            .ok_or(DomError::UnknownObserver(id))?;
        self.observers.remove(pos);
        Ok(())
    }

    pub fn take_records(&mut self, id: ObserverId) -> Result<Vec<MutationRecord>, DomError> {
        Ok(std::mem::take(&mut self.get_mut(id)?.records))
    }

    pub fn pending(&self, id: ObserverId) -> usize {
        self.observers.iter()
            .find(|r| r.id == id)
            .map_or(0, |r| r.records.len())
    }

    fn get_mut(&mut self, id: ObserverId) -> Result<&mut Registration, DomError> {
        self.observers.iter_mut()
            .find(|r| r.id == id)
            .ok_or(DomError::UnknownObserver(id))
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn queue_child_list(&mut self, tree: &DomTree, record: MutationRecord) {
        for reg in &mut self.observers {
            if reg.options_for(tree, record.target).is_some_and(|o| o.child_list) {
                reg.records.push(record.clone());
            }
        }
    }

    pub fn queue_attribute(&mut self, tree: &DomTree, target: NodeId, name: &str, old_value: Option<&str>) {
        for reg in &mut self.observers {
            let Some(opts) = reg.options_for(tree, target) else {
                continue;
            };
            if !opts.wants_attribute(name) {
                continue;
            }
            let old = if opts.attribute_old_value {
                old_value.map(str::to_string)
            } else {
                None
            };
            reg.records.push(MutationRecord::attribute(target, name, old));
        }
    }
}
