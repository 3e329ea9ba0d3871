//! Form-heavy board viewer
//!
//! A game record viewer with setting forms, navigation buttons and a board
//! of `disc_<coord>` images (`e32.png` empty, `b32.png` black, `w32.png`
//! white). Each disc is followed by a small element holding an evaluation
//! value. The last played stone is marked by a `.ham_cell` overlay whose
//! text colour is the opposite of the stone.
//!
//! Rule order matters: the disc rule runs before the cell rules, and the
//! last-move rules run after them so their label wins.

use axs_a11y::{aria, AriaRole, CellState, Stone};
use axs_dom::NodeId;
use axs_engine::{tweaks, Action, CellTracker, EngineConfig, EngineError, MovePhrases, Page, RuleSet, SiteProfile, TweakError};

use crate::{expect_node, visible_text};

pub const NAME: &str = "board-viewer";

pub const WATCHED_ATTRIBUTES: &[&str] = &["style", "class", "src"];

const DISC_PREFIX: &str = "disc_";

pub fn profile(config: &EngineConfig, phrases: MovePhrases) -> Result<SiteProfile, EngineError> {
    let tracker = CellTracker::new(config, phrases.clone());

    // Form fields are rendered once with the page
    let load_rules = RuleSet::builder()
        .bound("#PutMark", tweaks::set_label, vec!["Show played positions".into()])
        .bound("#PutEnable", tweaks::set_label, vec!["Show legal moves".into()])
        .bound("#PutTrial", tweaks::set_label, vec!["Trial mode".into()])
        .bound("#KifuText", tweaks::set_label, vec!["Enter a game record, then press Set".into()])
        .build()?;

    let dynamic_rules = RuleSet::builder()
        .bound("#check", tweaks::make_region, vec!["View settings".into()])
        .bound("#control", tweaks::make_region, vec!["Actions".into()])
        .bound("#id_form1", tweaks::make_region, vec!["Game settings".into()])
        .bound(r#"img[src="./image/repeat_off.gif"]"#, tweaks::make_button, vec!["Repeat on".into()])
        .bound(r#"img[src="./image/repeat_on.gif"]"#, tweaks::make_button, vec!["Repeat off".into()])
        .bound("#BlackStone", tweaks::set_description, vec!["Black count".into()])
        .bound("#WhiteStone", tweaks::set_description, vec!["White count".into()])
        .bound("#NextMove", tweaks::set_description, vec!["Next move depth".into()])
        .bound("#solve", tweaks::make_button, vec!["Solve".into()])
        .bound("#first", tweaks::make_button, vec!["First move".into()])
        .bound("#prev", tweaks::make_button, vec!["Previous move".into()])
        .bound("#next", tweaks::make_button, vec!["Next move".into()])
        .bound("#last", tweaks::make_button, vec!["Last move".into()])
        // Reaching the end disables the button under the keyboard focus
        .rule_ignoring_attributes("#next[disabled]", Action::direct(tweaks::force_focus))
        .direct(r#"img[id^="disc_"]"#, disc_button)
        .direct(".ham_cell", tweaks::make_hidden)
        .rule(r#"img[src="./image/e32.png"]"#, disc_cell(tracker.clone(), CellState::Empty))
        .rule(r#"img[src="./image/b32.png"]"#, disc_cell(tracker.clone(), CellState::Occupied(Stone::Black)))
        .rule(r#"img[src="./image/w32.png"]"#, disc_cell(tracker, CellState::Occupied(Stone::White)))
        .rule(r#".ham_cell[style^="color: black; font-size: 100"]"#, last_move(phrases.clone(), Stone::White))
        .rule(r#".ham_cell[style^="color: white; font-size: 100"]"#, last_move(phrases, Stone::Black))
        .direct("#x-coordinate", tweaks::make_hidden)
        .direct("#y-coordinate", tweaks::make_hidden)
        .direct(r#"div[id^="eval_"]"#, tweaks::make_hidden)
        .build()?;

    Ok(SiteProfile {
        name: NAME.into(),
        load_rules,
        dynamic_rules,
        watched_attributes: WATCHED_ATTRIBUTES.iter().map(|a| a.to_string()).collect(),
    })
}

/// Coordinate part of an id such as `disc_d4` or `ham_d4`
pub fn id_coordinate(id: &str) -> Option<&str> {
    id.split_once('_').map(|(_, coord)| coord).filter(|coord| !coord.is_empty())
}

fn disc_coordinate(page: &Page, disc: NodeId) -> Result<String, TweakError> {
    let id = page.document.get_attribute(disc, "id").unwrap_or("");
    id.strip_prefix(DISC_PREFIX)
        .filter(|coord| !coord.is_empty())
        .map(str::to_string)
        .ok_or_else(|| TweakError::Markup(format!("disc id {id:?} has no coordinate")))
}

/// Discs are clickable and announce their coordinate
fn disc_button(page: &mut Page, disc: NodeId) -> Result<(), TweakError> {
    let coord = disc_coordinate(page, disc)?;
    aria::set_role(&mut page.document, disc, AriaRole::Button)?;
    page.document.set_attribute(disc, "tabindex", "0")?;
    aria::set_description(&mut page.document, disc, &coord)?;
    Ok(())
}

/// Label a disc with its state and evaluation, and track it
fn disc_cell(tracker: CellTracker, state: CellState) -> Action {
    Action::direct(move |page: &mut Page, disc: NodeId| {
        let coord = disc_coordinate(page, disc)?;
        let name = tracker.phrases().state(state);
        let label = match page.document.tree().next_element_sibling(disc) {
            Some(eval) => format!("{} {}", name, visible_text(&page.document, eval)).trim_end().to_string(),
            None => name.to_string(),
        };
        aria::set_label(&mut page.document, disc, &label)?;
        tracker.track(page, disc, state, &coord)?;
        Ok(())
    })
}

/// Hide the last-move overlay and label the disc under it
fn last_move(phrases: MovePhrases, stone: Stone) -> Action {
    Action::direct(move |page: &mut Page, overlay: NodeId| {
        aria::make_hidden(&mut page.document, overlay)?;
        let id = page.document.get_attribute(overlay, "id").unwrap_or("");
        let coord = id_coordinate(id).ok_or_else(|| TweakError::Markup(format!("overlay id {id:?} has no coordinate")))?;
        let disc_id = format!("{DISC_PREFIX}{coord}");
        let disc = expect_node(page.document.get_element_by_id(&disc_id), "disc under overlay")?;
        aria::set_label(&mut page.document, disc, &phrases.placed_text(stone))?;
        Ok(())
    })
}
