//! Date and time formatting back-end.
//!
//! Patterns use the date-pattern vocabulary common in document templates
//! (`yyyy-MM-dd`, `MMMM`, ...) rather than strftime, since they are written
//! by template authors. The supported set is closed; each entry maps to a
//! chrono format string.

use std::fmt::Write;

use chrono::FixedOffset;

use super::ValueFormatter;
use crate::error::RenderError;
use crate::value::Value;

/// Supported patterns and their chrono equivalents.
const PATTERNS: &[(&str, &str)] = &[
    ("yyyy", "%Y"),
    ("MM", "%m"),
    ("dd", "%d"),
    ("HH", "%H"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("E", "%a"),
    ("MMM", "%b"),
    ("MMMM", "%B"),
    ("dd/MM/yyyy", "%d/%m/%Y"),
    ("MM/dd/yyyy", "%m/%d/%Y"),
    ("yyyy-MM-dd", "%Y-%m-%d"),
    ("dd.MM.yyyy", "%d.%m.%Y"),
    ("EEEE, MMMM dd, yyyy", "%A, %B %d, %Y"),
    ("MM/dd/yyyy HH:mm:ss", "%m/%d/%Y %H:%M:%S"),
    ("dd/MM/yyyy HH:mm:ss", "%d/%m/%Y %H:%M:%S"),
];

/// Formats [`Value::Date`], [`Value::DateTime`], and [`Value::Timestamp`].
///
/// Timestamps are absolute instants and are converted into the configured
/// zone before formatting; dates and date-times are formatted as written.
pub struct DateFormatter {
    zone: FixedOffset,
}

impl DateFormatter {
    pub fn new(zone: FixedOffset) -> Self {
        Self { zone }
    }

    fn chrono_pattern(pattern: &str) -> Option<&'static str> {
        PATTERNS
            .iter()
            .find(|(name, _)| *name == pattern)
            .map(|(_, chrono)| *chrono)
    }
}

impl ValueFormatter for DateFormatter {
    fn supports(&self, pattern: &str) -> bool {
        Self::chrono_pattern(pattern).is_some()
    }

    fn format(&self, value: &Value, pattern: &str) -> Result<String, RenderError> {
        let Some(chrono_pattern) = Self::chrono_pattern(pattern) else {
            return Err(RenderError::UnsupportedFormat(pattern.to_string()));
        };

        let mut formatted = String::new();
        let result = match value {
            Value::Date(d) => write!(formatted, "{}", d.format(chrono_pattern)),
            Value::DateTime(dt) => write!(formatted, "{}", dt.format(chrono_pattern)),
            Value::Timestamp(ts) => write!(
                formatted,
                "{}",
                ts.with_timezone(&self.zone).format(chrono_pattern)
            ),
            _ => {
                return Err(RenderError::ValueTypeMismatch(
                    "Value must be a date, date-time, or timestamp".to_string(),
                ))
            }
        };

        // chrono reports a formatting error when the pattern asks for fields
        // the value does not carry (e.g. HH on a plain date).
        result.map_err(|_| {
            RenderError::ValueTypeMismatch(format!(
                "Value does not carry the fields required by format {pattern}"
            ))
        })?;
        Ok(formatted)
    }
}
