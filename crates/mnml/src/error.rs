//! Error types

use mnml_css::SelectorError;
use mnml_dom::DomError;
use mnml_html::HtmlError;

/// Result alias used across the crate
pub type Result<T, E = MnmlError> = std::result::Result<T, E>;

/// Errors raised by mnml operations
///
/// Type mismatches are raised by the call that received the bad argument.
/// Everything else comes from the DOM host and is passed through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum MnmlError {
    #[error("expected {param} to be a {expected} but was {found}")]
    TypeMismatch {
        param: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("expected markup to produce an {expected} but got {found}")]
    UnexpectedNodeKind {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Html(#[from] HtmlError),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("invalid document URL: {0}")]
    Url(#[from] url::ParseError),
}
