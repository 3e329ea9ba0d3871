//! Reversi board with image cells
//!
//! Each board cell is a link wrapping one image. The image source gives
//! the cell state: `blank-*.gif` empty, `minus-*.gif` black, `plus-*.gif`
//! white, with `-true`/`-false` marking highlighted cells. The only place
//! the coordinate appears is the link's mouse handler,
//! `status = MouseEnter(row,col); ...`, with zero-based row and column.

use axs_a11y::{aria, CellState, Stone};
use axs_dom::{Document, NodeId};
use axs_engine::{Action, CellTracker, EngineConfig, EngineError, MovePhrases, Page, RuleSet, SiteProfile, TweakError};

use crate::{expect_node, visible_text};

pub const NAME: &str = "reversi";

/// Presentation attributes the page changes when it redraws
pub const WATCHED_ATTRIBUTES: &[&str] = &["src", "class"];

const HANDLER_PREFIX: &str = "status = MouseEnter";

pub fn profile(config: &EngineConfig, phrases: MovePhrases) -> Result<SiteProfile, EngineError> {
    let tracker = CellTracker::new(config, phrases);

    let dynamic_rules = RuleSet::builder()
        .direct(r#"input[name="mode"]"#, label_mode_choice)
        .direct(r#"input[name="level"]"#, label_level_choice)
        .direct(r#"td > a[onmouseover^="status = MouseEnter"]"#, label_cell_link)
        .rule(
            r#"img[src*="blank-true.gif"], img[src*="blank-false.gif"]"#,
            cell_image(tracker.clone(), CellState::Empty),
        )
        .rule(
            r#"img[src*="minus-true.gif"], img[src*="minus-false.gif"]"#,
            cell_image(tracker.clone(), CellState::Occupied(Stone::Black)),
        )
        .rule(
            r#"img[src*="plus-true.gif"], img[src*="plus-false.gif"]"#,
            cell_image(tracker, CellState::Occupied(Stone::White)),
        )
        .build()?;

    Ok(SiteProfile {
        name: NAME.into(),
        load_rules: RuleSet::new(),
        dynamic_rules,
        watched_attributes: WATCHED_ATTRIBUTES.iter().map(|a| a.to_string()).collect(),
    })
}

/// Zero-based `(row, col)` from a `MouseEnter(row,col)` handler
pub fn parse_handler(handler: &str) -> Option<(u8, u8)> {
    let args = handler.strip_prefix(HANDLER_PREFIX)?.strip_prefix('(')?;
    let (args, _) = args.split_once(')')?;
    let (row, col) = args.split_once(',')?;
    let row: u8 = row.trim().parse().ok()?;
    let col: u8 = col.trim().parse().ok()?;
    (col < 26).then_some((row, col))
}

/// Board name of a cell, column letter first: `(3, 3)` is `d4`
pub fn coordinate_name(row: u8, col: u8) -> String {
    format!("{}{}", char::from(b'a' + col), u32::from(row) + 1)
}

/// Coordinate of the cell `link`, read from its mouse handler
fn cell_coordinate(doc: &Document, link: NodeId) -> Result<(u8, u8), TweakError> {
    let handler = doc.get_attribute(link, "onmouseover").ok_or(TweakError::Missing("cell mouse handler"))?;
    parse_handler(handler).ok_or_else(|| TweakError::Markup(format!("unrecognised cell handler {handler:?}")))
}

/// The game mode caption sits in the next table cell
fn label_mode_choice(page: &mut Page, radio: NodeId) -> Result<(), TweakError> {
    let tree = page.document.tree();
    let cell = expect_node(tree.parent_element(radio), "mode cell")?;
    let caption_cell = expect_node(tree.next_element_sibling(cell), "mode caption cell")?;
    let caption = expect_node(tree.first_element_child(caption_cell), "mode caption")?;
    let text = visible_text(&page.document, caption);
    aria::set_label(&mut page.document, radio, &text)?;
    aria::make_hidden(&mut page.document, caption)?;
    Ok(())
}

/// The level caption directly follows its radio button
fn label_level_choice(page: &mut Page, radio: NodeId) -> Result<(), TweakError> {
    let caption = expect_node(page.document.tree().next_element_sibling(radio), "level caption")?;
    let text = visible_text(&page.document, caption);
    aria::set_label(&mut page.document, radio, &text)?;
    aria::make_hidden(&mut page.document, caption)?;
    Ok(())
}

/// Name the cell link and make it clickable from the keyboard
fn label_cell_link(page: &mut Page, link: NodeId) -> Result<(), TweakError> {
    let (row, col) = cell_coordinate(&page.document, link)?;
    aria::set_label(&mut page.document, link, &coordinate_name(row, col))?;
    let click = format!("{HANDLER_PREFIX}({row},{col}); return Click();");
    page.document.set_attribute(link, "onclick", &click)?;
    Ok(())
}

/// Label a cell image and track its link's state
fn cell_image(tracker: CellTracker, state: CellState) -> Action {
    Action::direct(move |page: &mut Page, img: NodeId| {
        let label = tracker.phrases().state(state).to_string();
        aria::set_label(&mut page.document, img, &label)?;

        let link = expect_node(page.document.tree().parent_element(img), "cell link")?;
        let (row, col) = cell_coordinate(&page.document, link)?;
        tracker.track(page, link, state, &coordinate_name(row, col))?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_handler() {
        assert_eq!(parse_handler("status = MouseEnter(3,4); return true;"), Some((3, 4)));
        assert_eq!(parse_handler("status = MouseEnter( 0 , 7 )"), Some((0, 7)));
        assert_eq!(parse_handler("status = MouseEnter(3;4)"), None);
        assert_eq!(parse_handler("status = MouseLeave(3,4)"), None);
        assert_eq!(parse_handler("status = MouseEnter(1,30)"), None);
    }

    #[test]
    fn test_coordinate_name() {
        assert_eq!(coordinate_name(3, 3), "d4");
        assert_eq!(coordinate_name(0, 0), "a1");
        assert_eq!(coordinate_name(7, 7), "h8");
    }
}
