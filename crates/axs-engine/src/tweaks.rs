//! Reusable mutators for rule tables
//!
//! Functions taking `&[TweakArg]` are meant for `Action::Bound`, the rest
//! for `Action::Direct`:
//!
//! ```ignore
//! RuleSet::builder()
//!     .bound("#control", tweaks::make_region, vec!["Actions".into()])
//!     .direct(".ham_cell", tweaks::make_hidden)
//! ```

use axs_a11y::aria;
use axs_dom::NodeId;

use crate::page::Page;
use crate::rules::TweakArg;
use crate::{TweakError, TweakResult};

fn text_arg<'a>(tweak: &'static str, args: &'a [TweakArg], index: usize) -> Result<&'a str, TweakError> {
    args.get(index)
        .and_then(TweakArg::as_text)
        .ok_or(TweakError::BadArgument { tweak, index, expected: "text" })
}

fn optional_text_arg<'a>(tweak: &'static str, args: &'a [TweakArg], index: usize) -> Result<Option<&'a str>, TweakError> {
    match args.get(index) {
        None => Ok(None),
        Some(arg) => arg.as_text()
            .map(Some)
            .ok_or(TweakError::BadArgument { tweak, index, expected: "text" }),
    }
}

/// `make_heading(level)`
pub fn make_heading(page: &mut Page, el: NodeId, args: &[TweakArg]) -> TweakResult {
    let level = args.first()
        .and_then(TweakArg::as_int)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| (1..=6).contains(n))
        .ok_or(TweakError::BadArgument { tweak: "make_heading", index: 0, expected: "a level from 1 to 6" })?;
    aria::make_heading(&mut page.document, el, level)?;
    Ok(())
}

/// `make_region(label)`
pub fn make_region(page: &mut Page, el: NodeId, args: &[TweakArg]) -> TweakResult {
    let label = text_arg("make_region", args, 0)?;
    aria::make_region(&mut page.document, el, label)?;
    Ok(())
}

/// `make_button(label?)`
pub fn make_button(page: &mut Page, el: NodeId, args: &[TweakArg]) -> TweakResult {
    let label = optional_text_arg("make_button", args, 0)?;
    aria::make_button(&mut page.document, el, label)?;
    Ok(())
}

/// `set_label(label)`
pub fn set_label(page: &mut Page, el: NodeId, args: &[TweakArg]) -> TweakResult {
    let label = text_arg("set_label", args, 0)?;
    aria::set_label(&mut page.document, el, label)?;
    Ok(())
}

/// `set_description(text)`
pub fn set_description(page: &mut Page, el: NodeId, args: &[TweakArg]) -> TweakResult {
    let text = text_arg("set_description", args, 0)?;
    aria::set_description(&mut page.document, el, text)?;
    Ok(())
}

/// `set_expanded(bool)`
pub fn set_expanded(page: &mut Page, el: NodeId, args: &[TweakArg]) -> TweakResult {
    let expanded = args.first()
        .and_then(TweakArg::as_bool)
        .ok_or(TweakError::BadArgument { tweak: "set_expanded", index: 0, expected: "a boolean" })?;
    aria::set_expanded(&mut page.document, el, expanded)?;
    Ok(())
}

pub fn make_presentational(page: &mut Page, el: NodeId) -> TweakResult {
    aria::make_presentational(&mut page.document, el)?;
    Ok(())
}

pub fn make_hidden(page: &mut Page, el: NodeId) -> TweakResult {
    aria::make_hidden(&mut page.document, el)?;
    Ok(())
}

pub fn force_focus(page: &mut Page, el: NodeId) -> TweakResult {
    aria::force_focus(&mut page.document, el)?;
    Ok(())
}

/// Give the element a generated id unless it already has one
pub fn set_aria_id_if_necessary(page: &mut Page, el: NodeId) -> TweakResult {
    page.ensure_id(el)?;
    Ok(())
}

/// Own the elements matching each selector argument through `aria-owns`
///
/// Selectors are resolved document-wide, in argument order.
pub fn make_element_own(page: &mut Page, el: NodeId, args: &[TweakArg]) -> TweakResult {
    if args.is_empty() {
        return Err(TweakError::BadArgument { tweak: "make_element_own", index: 0, expected: "a selector" });
    }
    let root = page.document.root();
    let mut owned = Vec::new();
    for index in 0..args.len() {
        let selector = text_arg("make_element_own", args, index)?;
        owned.extend(page.document.query_selector_all(root, selector)?);
    }
    page.make_element_own(el, &owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axs_dom::Document;

    use crate::config::EngineConfig;

    fn page_with(tags: &[&str]) -> (Page, Vec<NodeId>) {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let nodes = tags.iter()
            .map(|tag| {
                let el = doc.create_element(tag);
                doc.append_child(body, el).unwrap();
                el
            })
            .collect();
        (Page::new(doc, &EngineConfig::default()), nodes)
    }

    #[test]
    fn test_bad_arguments_are_reported() {
        let (mut page, nodes) = page_with(&["div"]);
        let div = nodes[0];

        let err = set_label(&mut page, div, &[]).unwrap_err();
        assert!(matches!(err, TweakError::BadArgument { tweak: "set_label", index: 0, .. }));
        assert!(make_heading(&mut page, div, &[TweakArg::Int(9)]).is_err());
        assert!(make_heading(&mut page, div, &["2".into()]).is_err());
        assert!(set_expanded(&mut page, div, &["yes".into()]).is_err());
        assert!(make_button(&mut page, div, &[TweakArg::Int(1)]).is_err());
        assert!(!page.document.has_attribute(div, "role"));
    }

    #[test]
    fn test_bound_helpers() {
        let (mut page, nodes) = page_with(&["div", "h2", "button"]);
        make_region(&mut page, nodes[0], &["Actions".into()]).unwrap();
        make_heading(&mut page, nodes[1], &[TweakArg::Int(2)]).unwrap();
        make_button(&mut page, nodes[2], &[]).unwrap();
        set_expanded(&mut page, nodes[2], &[TweakArg::Bool(true)]).unwrap();

        assert_eq!(page.document.get_attribute(nodes[0], "aria-label"), Some("Actions"));
        assert_eq!(page.document.get_attribute(nodes[1], "aria-level"), Some("2"));
        assert_eq!(page.document.get_attribute(nodes[2], "role"), Some("button"));
        assert_eq!(page.document.get_attribute(nodes[2], "aria-label"), None);
        assert_eq!(page.document.get_attribute(nodes[2], "aria-expanded"), Some("true"));
    }

    #[test]
    fn test_make_element_own_names_targets() {
        let (mut page, nodes) = page_with(&["div", "span", "p"]);
        page.document.set_attribute(nodes[2], "id", "note").unwrap();
        make_element_own(&mut page, nodes[0], &["span".into(), "p".into()]).unwrap();
        assert_eq!(page.document.get_attribute(nodes[0], "aria-owns"), Some("axsg-0 note"));
        assert!(make_element_own(&mut page, nodes[0], &["p[".into()]).is_err());
    }

    #[test]
    fn test_set_aria_id_if_necessary_keeps_existing() {
        let (mut page, nodes) = page_with(&["div", "div"]);
        page.document.set_attribute(nodes[0], "id", "mine").unwrap();
        set_aria_id_if_necessary(&mut page, nodes[0]).unwrap();
        set_aria_id_if_necessary(&mut page, nodes[1]).unwrap();
        assert_eq!(page.document.get_attribute(nodes[0], "id"), Some("mine"));
        assert_eq!(page.document.get_attribute(nodes[1], "id"), Some("axsg-0"));
    }
}
