//! Example: tweak a small reversi page and play two moves
//!
//! Run with `RUST_LOG=axs_engine=debug` to see every pass.

use std::time::Duration;

use axs_engine::{EngineConfig, MovePhrases, Tweaker};
use axs_html::{outer_html, HtmlParser};
use axs_sites::reversi;
use tracing_subscriber::EnvFilter;

const PAGE: &str = r##"<html><body><table id="board"><tr>
<td><a href="#" onmouseover="status = MouseEnter(3,3); return true;"><img src="img/blank-false.gif"></a></td>
<td><a href="#" onmouseover="status = MouseEnter(3,4); return true;"><img src="img/blank-false.gif"></a></td>
</tr></table></body></html>"##;

fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };

    let doc = HtmlParser::new().parse(PAGE)?;
    let mut tweaker = Tweaker::new(doc, reversi::profile(&config, MovePhrases::default())?, &config);
    tweaker.start()?;
    println!("axs engine v{} tweaking {}", axs_engine::VERSION, tweaker.profile().name);

    let images = {
        let doc = tweaker.document();
        doc.query_selector_all(doc.root(), "td > a > img")?
    };
    for (img, src) in images.into_iter().zip(["img/minus-true.gif", "img/plus-true.gif"]) {
        tweaker.run_script(|doc| doc.set_attribute(img, "src", src))?;
        tweaker.advance(config.settle_delay());

        let doc = tweaker.document();
        if let Some(region) = doc.get_element_by_id(&config.announce_region) {
            println!("announced: {}", doc.text_content(region));
        }
        tweaker.advance(config.clear_delay() + Duration::from_millis(1));
    }

    let doc = tweaker.document();
    if let Some(board) = doc.get_element_by_id("board") {
        println!("{}", outer_html(doc, board));
    }
    tweaker.stop()?;
    Ok(())
}
