//! Reversi profile against a page shaped like the live game

use std::time::Duration;

use axs_engine::{EngineConfig, MovePhrases, NodeId, Tweaker};
use axs_html::HtmlParser;
use axs_sites::reversi;

const PAGE: &str = r##"<html><body>
<form name="game">
  <table>
    <tr><td><input type="radio" name="mode" value="1"></td><td><b>You play black</b></td></tr>
    <tr><td><input type="radio" name="mode" value="2"></td><td><b>You play white</b></td></tr>
  </table>
  <input type="radio" name="level" value="1"><span>Easy</span>
  <input type="radio" name="level" value="2"><span>Hard</span>
</form>
<table id="board">
  <tr>
    <td><a href="#" onmouseover="status = MouseEnter(3,3); return true;"><img src="img/blank-false.gif"></a></td>
    <td><a href="#" onmouseover="status = MouseEnter(3,4); return true;"><img src="img/minus-false.gif"></a></td>
    <td><a href="#" onmouseover="status = MouseEnter(3,5); return true;"><img src="img/plus-true.gif"></a></td>
    <td><a href="#" onmouseover="broken"><img src="img/blank-true.gif"></a></td>
  </tr>
</table>
</body></html>"##;

fn start(config: &EngineConfig) -> Tweaker {
    let doc = HtmlParser::new().parse(PAGE).unwrap();
    let profile = reversi::profile(config, MovePhrases::default()).unwrap();
    let mut tweaker = Tweaker::new(doc, profile, config);
    tweaker.start().unwrap();
    tweaker
}

fn link(tweaker: &Tweaker, coord: &str) -> NodeId {
    let doc = tweaker.document();
    doc.query_selector(doc.root(), &format!("a[aria-label=\"{coord}\"]")).unwrap().unwrap()
}

fn image(tweaker: &Tweaker, coord: &str) -> NodeId {
    tweaker.document().tree().first_element_child(link(tweaker, coord)).unwrap()
}

fn announcement(tweaker: &Tweaker) -> Option<String> {
    let doc = tweaker.document();
    doc.get_element_by_id("axs-announce-new-stone").map(|r| doc.text_content(r))
}

#[test]
fn test_form_choices_labelled() {
    let tweaker = start(&EngineConfig::default());
    let doc = tweaker.document();
    let root = doc.root();

    let modes = doc.query_selector_all(root, "input[name=mode]").unwrap();
    assert_eq!(doc.get_attribute(modes[0], "aria-label"), Some("You play black"));
    assert_eq!(doc.get_attribute(modes[1], "aria-label"), Some("You play white"));
    let captions = doc.query_selector_all(root, "td > b").unwrap();
    assert!(captions.iter().all(|&b| doc.get_attribute(b, "aria-hidden") == Some("true")));

    let levels = doc.query_selector_all(root, "input[name=level]").unwrap();
    assert_eq!(doc.get_attribute(levels[1], "aria-label"), Some("Hard"));
}

#[test]
fn test_cells_named_and_marked() {
    let tweaker = start(&EngineConfig::default());
    let doc = tweaker.document();

    let d4 = link(&tweaker, "d4");
    assert_eq!(doc.get_attribute(d4, "onclick"), Some("status = MouseEnter(3,3); return Click();"));
    assert_eq!(doc.get_attribute(d4, "data-axs-cell"), Some("empty"));
    assert_eq!(doc.get_attribute(image(&tweaker, "d4"), "aria-label"), Some("Empty"));
    assert_eq!(doc.get_attribute(link(&tweaker, "e4"), "data-axs-cell"), Some("black"));
    assert_eq!(doc.get_attribute(image(&tweaker, "f4"), "aria-label"), Some("White"));

    // The cell with an unreadable handler still gets its image label
    let root = doc.root();
    let broken = doc.query_selector(root, "a[onmouseover=broken]").unwrap().unwrap();
    assert_eq!(doc.get_attribute(broken, "aria-label"), None);
    assert_eq!(doc.get_attribute(broken, "data-axs-cell"), None);
    let broken_img = doc.tree().first_element_child(broken).unwrap();
    assert_eq!(doc.get_attribute(broken_img, "aria-label"), Some("Empty"));
}

#[test]
fn test_move_then_undo() {
    let mut tweaker = start(&EngineConfig::default());
    let img = image(&tweaker, "d4");

    tweaker.run_script(|doc| doc.set_attribute(img, "src", "img/minus-true.gif").unwrap());
    tweaker.advance(Duration::from_millis(134));
    assert_eq!(announcement(&tweaker).as_deref(), Some("Black d4"));
    assert_eq!(tweaker.document().get_attribute(img, "aria-label"), Some("Black"));

    // Highlight moves away: same state, nothing new to say
    tweaker.advance(Duration::from_millis(1000));
    tweaker.run_script(|doc| doc.set_attribute(img, "src", "img/minus-false.gif").unwrap());
    assert_eq!(announcement(&tweaker).as_deref(), Some(""));

    tweaker.run_script(|doc| doc.set_attribute(img, "src", "img/blank-false.gif").unwrap());
    assert_eq!(announcement(&tweaker).as_deref(), Some("d4 undone"));
}

#[test]
fn test_flipped_stone_is_quiet() {
    let mut tweaker = start(&EngineConfig::default());
    let img = image(&tweaker, "e4");
    tweaker.run_script(|doc| doc.set_attribute(img, "src", "img/plus-false.gif").unwrap());
    assert_eq!(announcement(&tweaker), None);
    assert_eq!(tweaker.document().get_attribute(link(&tweaker, "e4"), "data-axs-cell"), Some("white"));
}

#[test]
fn test_redrawn_board_starts_fresh() {
    let mut tweaker = start(&EngineConfig::default());
    let board = tweaker.document().get_element_by_id("board").unwrap();

    tweaker.run_script(|doc| {
        let old: Vec<_> = doc.tree().children(board).collect();
        for row in old {
            doc.remove_child(board, row).unwrap();
        }
        HtmlParser::new()
            .parse_fragment_into(
                doc,
                board,
                r#"<table><tr><td><a onmouseover="status = MouseEnter(0,0); return true;"><img src="img/minus-false.gif"></a></td></tr></table>"#,
            )
            .unwrap();
    });

    let a1 = link(&tweaker, "a1");
    assert_eq!(tweaker.document().get_attribute(a1, "data-axs-cell"), Some("black"));
    // New cells have no history, so nothing is announced
    assert_eq!(announcement(&tweaker), None);
}

#[test]
fn test_korean_phrases() {
    let config = EngineConfig::default();
    let doc = HtmlParser::new().parse(PAGE).unwrap();
    let profile = reversi::profile(&config, MovePhrases::korean()).unwrap();
    let mut tweaker = Tweaker::new(doc, profile, &config);
    tweaker.start().unwrap();

    let img = image(&tweaker, "d4");
    tweaker.run_script(|doc| doc.set_attribute(img, "src", "img/plus-true.gif").unwrap());
    tweaker.advance(Duration::from_millis(134));
    assert_eq!(announcement(&tweaker).as_deref(), Some("백 d4에 착수함"));
    assert_eq!(tweaker.document().get_attribute(img, "aria-label"), Some("백"));
}
