//! mnml HTML Parser
//!
//! HTML5 parsing built on html5ever. Whole documents become an
//! `mnml_dom::Document`; fragments become detached nodes inside an existing
//! tree, which is how markup strings are turned into elements.

mod parser;

pub use parser::HtmlParser;

use mnml_dom::{Document, DomTree, NodeId};

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Parse markup into detached top-level nodes of `tree`
pub fn parse_fragment(markup: &str, tree: &mut DomTree) -> Result<Vec<NodeId>, HtmlError> {
    HtmlParser::new().parse_fragment(markup, tree)
}

/// HTML parsing error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dom(#[from] mnml_dom::DomError),
}
