//! axs HTML Parser
//!
//! HTML5 parsing built on html5ever, producing `axs_dom::Document`s, plus
//! a small serializer for inspecting tweaked markup.

mod parser;
mod serialize;

pub use parser::HtmlParser;
pub use serialize::{inner_html, outer_html};

pub use axs_dom::Document;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read markup: {0}")]
    Io(#[from] std::io::Error),

    #[error("markup has no body to take a fragment from")]
    NoBody,

    #[error(transparent)]
    Dom(#[from] axs_dom::DomError),
}
