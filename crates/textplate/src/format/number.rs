//! Number formatting back-end.
//!
//! Implements the small decimal-pattern vocabulary that document templates
//! actually use: plain and zero-padded integers, thousands grouping, forced
//! sign, fixed and elastic decimals, and two-digit scientific notation.

use super::ValueFormatter;
use crate::error::RenderError;
use crate::value::Value;

const BASE_PATTERNS: &[&str] = &["0", "#,##0", "+0;-0", "0.00", "#,##0.00", "0.###", "0.00E0"];

/// Formats [`Value::Int`] and [`Value::Float`].
#[derive(Default)]
pub struct NumberFormatter;

impl NumberFormatter {
    pub fn new() -> Self {
        Self
    }
}

/// Any run of zeros is a zero-padding pattern, e.g. `00000`.
fn is_padding_pattern(pattern: &str) -> bool {
    !pattern.is_empty() && pattern.chars().all(|c| c == '0')
}

impl ValueFormatter for NumberFormatter {
    fn supports(&self, pattern: &str) -> bool {
        BASE_PATTERNS.contains(&pattern) || is_padding_pattern(pattern)
    }

    fn format(&self, value: &Value, pattern: &str) -> Result<String, RenderError> {
        let num = match value {
            Value::Int(i) => Num::Int(*i),
            Value::Float(f) => Num::Float(*f),
            _ => {
                return Err(RenderError::ValueTypeMismatch(
                    "Value must be a number".to_string(),
                ))
            }
        };

        match pattern {
            "0" => Ok(num.to_int().to_string()),
            "#,##0" => Ok(group_thousands(&num.to_int().to_string())),
            "+0;-0" => Ok(format!("{:+}", num.to_int())),
            "0.00" => Ok(num.to_decimal(2)),
            "#,##0.00" => {
                let plain = num.to_decimal(2);
                let (int_part, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), ""));
                Ok(format!("{}.{}", group_thousands(int_part), fraction))
            }
            "0.###" => Ok(elastic_decimals(num)),
            "0.00E0" => Ok(scientific(num.to_float())),
            padding if is_padding_pattern(padding) => Ok(zero_pad(num.to_int(), padding.len())),
            other => Err(RenderError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn to_int(self) -> i64 {
        match self {
            Num::Int(i) => i,
            Num::Float(f) => f.round_ties_even() as i64,
        }
    }

    fn to_float(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }

    fn to_decimal(self, places: usize) -> String {
        format!("{:.*}", places, self.to_float())
    }
}

/// Inserts `,` every three digits, right to left. The input is the integer
/// part only, with an optional leading sign.
fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let count = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (count - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}")
}

/// Up to three decimal places, trailing zeros stripped.
fn elastic_decimals(num: Num) -> String {
    match num {
        Num::Int(i) => i.to_string(),
        Num::Float(f) => {
            let fixed = format!("{f:.3}");
            let stripped = fixed.trim_end_matches('0').trim_end_matches('.');
            stripped.to_string()
        }
    }
}

/// Zero-pads the integer to `width` digits; the sign does not count toward
/// the width.
fn zero_pad(i: i64, width: usize) -> String {
    if i < 0 {
        format!("-{:0width$}", -i)
    } else {
        format!("{i:0width$}")
    }
}

/// Two-decimal mantissa with a bare exponent, e.g. `1.23E3` or `1.23E-3`.
fn scientific(v: f64) -> String {
    if v == 0.0 {
        return "0.00E0".to_string();
    }
    let negative = v < 0.0;
    let mut mantissa = v.abs();
    let mut exponent = 0i32;
    while mantissa >= 10.0 {
        mantissa /= 10.0;
        exponent += 1;
    }
    while mantissa < 1.0 {
        mantissa *= 10.0;
        exponent -= 1;
    }
    // Rounding the mantissa can push it to 10.0; carry into the exponent.
    mantissa = (mantissa * 100.0).round() / 100.0;
    if mantissa >= 10.0 {
        mantissa /= 10.0;
        exponent += 1;
    }
    let sign = if negative { "-" } else { "" };
    format!("{sign}{mantissa:.2}E{exponent}")
}
