//! Typed value formatting for `${name|pattern}` placeholders.
//!
//! Formatting is dispatched over an ordered list of [`ValueFormatter`]s: the
//! first formatter whose [`supports`](ValueFormatter::supports) accepts the
//! pattern handles the value. The stock list is the date formatter followed
//! by the number formatter; additional formatters can be appended via
//! [`Options::builder`](crate::Options::builder).

mod date;
mod number;

pub use date::DateFormatter;
pub use number::NumberFormatter;

use crate::error::RenderError;
use crate::value::Value;

/// One pluggable formatting back-end.
pub trait ValueFormatter: Send + Sync {
    /// Whether this formatter recognizes the given pattern.
    fn supports(&self, pattern: &str) -> bool;

    /// Formats the value according to the pattern.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ValueTypeMismatch`] when the value is not of a
    /// type this formatter handles.
    fn format(&self, value: &Value, pattern: &str) -> Result<String, RenderError>;
}
