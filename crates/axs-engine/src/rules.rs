//! Rule tables
//!
//! A rule pairs a selector with an action. Rules in a set run in declared
//! order, and each rule sees every change made by the rules before it in
//! the same pass. Rule sets rely on this: a rule may read an attribute an
//! earlier rule wrote.

use std::fmt;

use axs_dom::{NodeId, SelectorList};

use crate::page::Page;
use crate::{EngineError, TweakResult};

/// Mutator called with the matched element
pub type DirectMutator = Box<dyn Fn(&mut Page, NodeId) -> TweakResult>;

/// Mutator called with the matched element and the rule's bound arguments
pub type BoundMutator = Box<dyn Fn(&mut Page, NodeId, &[TweakArg]) -> TweakResult>;

/// An argument bound into a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TweakArg {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl TweakArg {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for TweakArg {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for TweakArg {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for TweakArg {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for TweakArg {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// What a rule does to each matched element
pub enum Action {
    Direct(DirectMutator),
    Bound(BoundMutator, Vec<TweakArg>),
}

impl Action {
    pub fn direct(f: impl Fn(&mut Page, NodeId) -> TweakResult + 'static) -> Self {
        Self::Direct(Box::new(f))
    }

    pub fn bound(f: impl Fn(&mut Page, NodeId, &[TweakArg]) -> TweakResult + 'static, args: Vec<TweakArg>) -> Self {
        Self::Bound(Box::new(f), args)
    }

    /// Run the action on `el`
    pub fn invoke(&self, page: &mut Page, el: NodeId) -> TweakResult {
        match self {
            Self::Direct(f) => f(page, el),
            Self::Bound(f, args) => f(page, el, args),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(_) => f.write_str("Direct"),
            Self::Bound(_, args) => f.debug_tuple("Bound").field(args).finish(),
        }
    }
}

/// A selector and the action applied to its matches
#[derive(Debug)]
pub struct Rule {
    selector: SelectorList,
    action: Action,
    watch_attribute_changes: bool,
}

impl Rule {
    pub fn new(selector: &str, action: Action) -> Result<Self, EngineError> {
        let selector = SelectorList::parse(selector).map_err(|source| EngineError::InvalidSelector {
            selector: selector.to_string(),
            source,
        })?;
        Ok(Self { selector, action, watch_attribute_changes: true })
    }

    /// Skip this rule on passes triggered by attribute changes
    pub fn ignore_attribute_changes(mut self) -> Self {
        self.watch_attribute_changes = false;
        self
    }

    pub fn selector(&self) -> &SelectorList {
        &self.selector
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Whether the rule reruns when a watched attribute changes
    pub fn watches_attribute_changes(&self) -> bool {
        self.watch_attribute_changes
    }
}

/// Ordered rule table
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Builds a rule set, keeping the first selector error for `build`
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: Vec<Rule>,
    error: Option<EngineError>,
}

impl RuleSetBuilder {
    pub fn rule(mut self, selector: &str, action: Action) -> Self {
        self.add(selector, action, true);
        self
    }

    /// A rule skipped on attribute-change passes
    pub fn rule_ignoring_attributes(mut self, selector: &str, action: Action) -> Self {
        self.add(selector, action, false);
        self
    }

    pub fn direct(self, selector: &str, f: impl Fn(&mut Page, NodeId) -> TweakResult + 'static) -> Self {
        self.rule(selector, Action::direct(f))
    }

    pub fn bound(
        self,
        selector: &str,
        f: impl Fn(&mut Page, NodeId, &[TweakArg]) -> TweakResult + 'static,
        args: Vec<TweakArg>,
    ) -> Self {
        self.rule(selector, Action::bound(f, args))
    }

    pub fn build(self) -> Result<RuleSet, EngineError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(RuleSet { rules: self.rules }),
        }
    }

    fn add(&mut self, selector: &str, action: Action, watch_attribute_changes: bool) {
        if self.error.is_some() {
            return;
        }
        match Rule::new(selector, action) {
            Ok(rule) if watch_attribute_changes => self.rules.push(rule),
            Ok(rule) => self.rules.push(rule.ignore_attribute_changes()),
            Err(e) => self.error = Some(e),
        }
    }
}
