//! mnml CSS selectors
//!
//! Parses selector strings (`ul > li.item:not(.hidden)`, `a[href^="https"]`,
//! `h1, h2`) and matches them against an `mnml_dom::DomTree`. This is the
//! "structural matching predicate" behind `matches`, `querySelector` and
//! event delegation.

mod matching;
mod parser;
mod selectors;

pub use parser::SelectorParser;
pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, SelectorComponent, SelectorList,
};

/// Parse a selector list
pub fn parse_selector(selector: &str) -> Result<SelectorList, SelectorError> {
    SelectorParser::new(selector).parse()
}

/// Selector parsing error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected '{found}' at offset {offset} in selector `{selector}`")]
    Unexpected {
        found: char,
        offset: usize,
        selector: String,
    },

    #[error("expected {expected} at offset {offset} in selector `{selector}`")]
    Expected {
        expected: &'static str,
        offset: usize,
        selector: String,
    },

    #[error("unsupported pseudo-class `:{name}`")]
    UnsupportedPseudoClass { name: String },

    #[error("pseudo-elements cannot be matched against elements: `{selector}`")]
    PseudoElement { selector: String },

    #[error("invalid An+B expression `{0}`")]
    InvalidNth(String),
}
