//! CSS Selectors
//!
//! Parser and matcher for the selector subset rule tables use:
//! type/universal, `#id`, `.class`, attribute selectors with every CSS
//! matcher, `:first-child`, `:last-child`, `:only-child`, `:empty`,
//! `:not(...)`, and the four combinators. Matching runs right to left.

use crate::{DomTree, ElementData, NodeData, NodeId};

/// Selector parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected {found:?} at offset {offset} in {selector:?}")]
    Unexpected { selector: String, offset: usize, found: char },

    #[error("unexpected end of selector {0:?}")]
    UnexpectedEnd(String),

    #[error("unsupported pseudo-class :{0}")]
    UnsupportedPseudo(String),
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    source: String,
    selectors: Vec<ComplexSelector>,
}

/// Compound selectors joined by combinators
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

/// Sequence of simple selectors with no combinator
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound {
    components: Vec<SelectorComponent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

/// A component of a compound selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Structural pseudo-class
    PseudoClass(PseudoClass),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    FirstChild,
    LastChild,
    OnlyChild,
    Empty,
    Not(Vec<Compound>),
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let (Some(matcher), Some(val)) = (&self.matcher, value) else {
            return self.matcher.is_none() && value.is_some();
        };
        let fold = |s: &str| {
            if self.case_insensitive { s.to_lowercase() } else { s.to_string() }
        };
        let val = fold(val);
        match matcher {
            AttributeMatcher::Exact(expected) => val == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                val.split_ascii_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                val == expected || val.starts_with(&format!("{expected}-"))
            }
            // Empty operands never match for the substring family
            AttributeMatcher::Prefix(expected) => !expected.is_empty() && val.starts_with(&fold(expected)),
            AttributeMatcher::Suffix(expected) => !expected.is_empty() && val.ends_with(&fold(expected)),
            AttributeMatcher::Substring(expected) => !expected.is_empty() && val.contains(&fold(expected)),
        }
    }
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser::new(input);
        let selectors = parser.parse_list()?;
        if let Some(c) = parser.peek() {
            return Err(parser.unexpected(c));
        }
        Ok(Self {
            source: input.to_string(),
            selectors,
        })
    }

    /// The selector text this list was parsed from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check if `element` matches any selector in the list
    pub fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        tree.is_element(element)
            && self.selectors.iter().any(|s| s.matches(tree, element))
    }

    /// Every descendant of `root` matching the list, in document order
    pub fn select_all(&self, tree: &DomTree, root: NodeId) -> Vec<NodeId> {
        tree.descendants(root)
            .filter(|&id| self.matches(tree, id))
            .collect()
    }
}

impl std::fmt::Display for SelectorList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl ComplexSelector {
    fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        self.matches_from(tree, element, self.compounds.len() - 1)
    }

    fn matches_from(&self, tree: &DomTree, element: NodeId, idx: usize) -> bool {
        if !self.compounds[idx].matches(tree, element) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match self.combinators[idx - 1] {
            Combinator::Child => tree.parent_element(element)
                .is_some_and(|p| self.matches_from(tree, p, idx - 1)),
            Combinator::Descendant => {
                let mut cur = tree.parent_element(element);
                while let Some(ancestor) = cur {
                    if self.matches_from(tree, ancestor, idx - 1) {
                        return true;
                    }
                    cur = tree.parent_element(ancestor);
                }
                false
            }
            Combinator::NextSibling => tree.previous_element_sibling(element)
                .is_some_and(|s| self.matches_from(tree, s, idx - 1)),
            Combinator::SubsequentSibling => {
                let mut cur = tree.previous_element_sibling(element);
                while let Some(sibling) = cur {
                    if self.matches_from(tree, sibling, idx - 1) {
                        return true;
                    }
                    cur = tree.previous_element_sibling(sibling);
                }
                false
            }
        }
    }
}

impl Compound {
    fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        let Some(data) = tree.element(element) else {
            return false;
        };
        self.components.iter().all(|c| match_component(c, tree, element, data))
    }
}

/// Match a selector component against an element
fn match_component(component: &SelectorComponent, tree: &DomTree, id: NodeId, element: &ElementData) -> bool {
    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => element.is(tag),
        SelectorComponent::Id(expected) => element.id() == Some(expected.as_str()),
        SelectorComponent::Class(class) => element.classes().any(|c| c == class),
        SelectorComponent::Attribute(attr) => attr.matches(element.get_attr(&attr.name)),
        SelectorComponent::PseudoClass(pseudo) => match pseudo {
            PseudoClass::FirstChild => tree.previous_element_sibling(id).is_none(),
            PseudoClass::LastChild => tree.next_element_sibling(id).is_none(),
            PseudoClass::OnlyChild => {
                tree.previous_element_sibling(id).is_none() && tree.next_element_sibling(id).is_none()
            }
            PseudoClass::Empty => tree.children(id).all(|c| {
                matches!(tree.get(c).map(|n| &n.data), Some(NodeData::Comment(_)))
            }),
            PseudoClass::Not(list) => !list.iter().any(|c| c.matches(tree, id)),
        },
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn offset(&self) -> usize {
        self.chars.get(self.pos).map_or(self.input.len(), |&(o, _)| o)
    }

    fn unexpected(&self, found: char) -> SelectorError {
        SelectorError::Unexpected {
            selector: self.input.to_string(),
            offset: self.offset(),
            found,
        }
    }

    fn end(&self) -> SelectorError {
        SelectorError::UnexpectedEnd(self.input.to_string())
    }

    fn expect(&mut self, expected: char) -> Result<(), SelectorError> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => {
                self.pos -= 1;
                Err(self.unexpected(c))
            }
            None => Err(self.end()),
        }
    }

    /// Skip whitespace, reporting whether any was present
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse_list(&mut self) -> Result<Vec<ComplexSelector>, SelectorError> {
        self.skip_ws();
        if self.peek().is_none() {
            return Err(SelectorError::Empty);
        }
        let mut list = vec![self.parse_complex()?];
        while self.peek() == Some(',') {
            self.bump();
            self.skip_ws();
            list.push(self.parse_complex()?);
        }
        Ok(list)
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                None | Some(',') | Some(')') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_ws => Combinator::Descendant,
                Some(c) => return Err(self.unexpected(c)),
            };
            if combinator != Combinator::Descendant {
                self.bump();
                self.skip_ws();
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }
        Ok(ComplexSelector { compounds, combinators })
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        match self.peek() {
            Some('*') => {
                self.bump();
                compound.components.push(SelectorComponent::Universal);
            }
            Some(c) if is_ident_start(c) => {
                let tag = self.parse_ident()?;
                compound.components.push(SelectorComponent::Type(tag.to_ascii_lowercase()));
            }
            _ => {}
        }
        loop {
            let component = match self.peek() {
                Some('#') => {
                    self.bump();
                    SelectorComponent::Id(self.parse_ident()?)
                }
                Some('.') => {
                    self.bump();
                    SelectorComponent::Class(self.parse_ident()?)
                }
                Some('[') => SelectorComponent::Attribute(self.parse_attribute()?),
                Some(':') => SelectorComponent::PseudoClass(self.parse_pseudo()?),
                _ => break,
            };
            compound.components.push(component);
        }
        if compound.components.is_empty() {
            return Err(match self.peek() {
                Some(c) => self.unexpected(c),
                None => self.end(),
            });
        }
        Ok(compound)
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                ident.push(self.bump().ok_or_else(|| self.end())?);
            } else if is_ident_char(c) {
                self.bump();
                ident.push(c);
            } else {
                break;
            }
        }
        if ident.is_empty() {
            return Err(match self.peek() {
                Some(c) => self.unexpected(c),
                None => self.end(),
            });
        }
        Ok(ident)
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.expect('[')?;
        self.skip_ws();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_ws();

        let op = match self.peek() {
            Some(']') => {
                self.bump();
                return Ok(AttributeSelector { name, matcher: None, case_insensitive: false });
            }
            Some('=') => None,
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                self.bump();
                Some(c)
            }
            Some(c) => return Err(self.unexpected(c)),
            None => return Err(self.end()),
        };
        self.expect('=')?;
        self.skip_ws();
        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => self.parse_string(q)?,
            Some(_) => self.parse_ident()?,
            None => return Err(self.end()),
        };
        self.skip_ws();
        let mut case_insensitive = false;
        if let Some(flag @ ('i' | 'I' | 's' | 'S')) = self.peek() {
            self.bump();
            case_insensitive = flag.eq_ignore_ascii_case(&'i');
            self.skip_ws();
        }
        self.expect(']')?;

        let matcher = match op {
            None => AttributeMatcher::Exact(value),
            Some('~') => AttributeMatcher::Contains(value),
            Some('|') => AttributeMatcher::DashMatch(value),
            Some('^') => AttributeMatcher::Prefix(value),
            Some('$') => AttributeMatcher::Suffix(value),
            Some(_) => AttributeMatcher::Substring(value),
        };
        Ok(AttributeSelector { name, matcher: Some(matcher), case_insensitive })
    }

    fn parse_string(&mut self, quote: char) -> Result<String, SelectorError> {
        self.expect(quote)?;
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(value),
                Some('\\') => value.push(self.bump().ok_or_else(|| self.end())?),
                Some(c) => value.push(c),
                None => return Err(self.end()),
            }
        }
    }

    fn parse_pseudo(&mut self) -> Result<PseudoClass, SelectorError> {
        self.expect(':')?;
        let name = self.parse_ident()?.to_ascii_lowercase();
        match name.as_str() {
            "first-child" => Ok(PseudoClass::FirstChild),
            "last-child" => Ok(PseudoClass::LastChild),
            "only-child" => Ok(PseudoClass::OnlyChild),
            "empty" => Ok(PseudoClass::Empty),
            "not" => {
                self.expect('(')?;
                self.skip_ws();
                let mut list = vec![self.parse_compound()?];
                self.skip_ws();
                while self.peek() == Some(',') {
                    self.bump();
                    self.skip_ws();
                    list.push(self.parse_compound()?);
                    self.skip_ws();
                }
                self.expect(')')?;
                Ok(PseudoClass::Not(list))
            }
            _ => Err(SelectorError::UnsupportedPseudo(name)),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}
