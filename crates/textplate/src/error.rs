//! Error types for template parsing and rendering.
//!
//! Parsing failures are always a [`ParseError`] carrying the zero-based
//! character offset at which the problem was detected. Rendering failures are
//! a [`RenderError`]; a failed render never corrupts the parsed
//! [`Template`](crate::Template), so the same template can be rendered again
//! with a different context.

use thiserror::Error;

/// A template syntax error.
///
/// The `position` is the zero-based character offset into the source at which
/// the error was detected. The display form is
/// `"{message} at position: {position}"`, e.g.
/// `Expected '$end' at position: 24`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position: {position}")]
pub struct ParseError {
    /// What the parser expected or rejected, e.g. `Expected ')'`.
    pub message: String,
    /// Zero-based character offset of the failure.
    pub position: usize,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Error type for rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Included content failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A scoped context could not resolve a variable name.
    ///
    /// Only raised inside loop / `$first` / `$last` bodies; at the root,
    /// missing names fall back to the configured not-found handler instead.
    #[error("No such variable {0}")]
    UnknownVariable(String),

    /// `$call` named a macro that is not registered.
    #[error("No such macro {0}")]
    NoSuchMacro(String),

    /// No registered formatter supports the requested pattern.
    #[error("Unsupported format {0}")]
    UnsupportedFormat(String),

    /// A formatter rejected the value it was given (e.g. the date formatter
    /// applied to a plain string).
    #[error("{0}")]
    ValueTypeMismatch(String),

    /// `$include` was used but no include loader is configured.
    #[error("No include loader configured")]
    IncludeNotConfigured,

    /// The include loader failed to produce content for a path.
    #[error("Failed to load include \"{path}\": {source}")]
    IncludeFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
