//! `Literal` — Coerced scalar equality
//!
//! A scalar condition (`{"total": 20}`) means "the value at this path, written
//! as a string, equals the literal written as a string". Both sides go through
//! the same coercion, so `20`, `20.0` and `"20"` are interchangeable.
//!
//! # Coercion
//!
//! | Value | Coerced form |
//! |-------|--------------|
//! | string | itself |
//! | boolean | `true` / `false` |
//! | `null` | `null` |
//! | integer | decimal digits |
//! | float, 1e-6 ≤ \|f\| < 1e21 | shortest round-trip decimal, no trailing `.0` (`20.0` → `20`, `99.8`) |
//! | float, \|f\| ≥ 1e21 or \|f\| < 1e-6 | exponent form with explicit sign (`1e+21`, `1.5e-7`) |
//! | zero (either sign) | `0` |
//! | mapping, sequence | none (never equal to a literal) |

use crate::Resolved;
use serde_json::{Number, Value};
use std::borrow::Cow;

/// Float magnitudes at or above this print in exponent form.
const EXPONENT_UPPER: f64 = 1e21;

/// Non-zero float magnitudes below this print in exponent form.
const EXPONENT_LOWER: f64 = 1e-6;

/// A scalar literal from a condition set.
///
/// # Example
///
/// ```
/// use elig::{FieldPath, Literal};
/// use serde_json::json;
///
/// let literal = Literal::from("20");
/// let subject = json!({ "total": 20 });
///
/// assert!(literal.matches(&FieldPath::new("total").resolve(&subject)));
/// assert!(!literal.matches(&FieldPath::new("missing").resolve(&subject)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A string literal.
    String(String),
    /// A numeric literal.
    Number(Number),
    /// A boolean literal.
    Bool(bool),
}

impl Literal {
    /// The coerced string form of this literal.
    #[must_use]
    pub fn coerced(&self) -> Cow<'_, str> {
        match self {
            Self::String(s) => Cow::Borrowed(s.as_str()),
            Self::Number(n) => Cow::Owned(number_to_string(n)),
            Self::Bool(b) => Cow::Borrowed(bool_str(*b)),
        }
    }

    /// Check whether any resolved value coerces to the same string.
    ///
    /// # Returns
    ///
    /// - `false` if the path was absent (INV: Absent → false)
    /// - for a sequence, `true` if **any** element matches
    #[must_use]
    pub fn matches(&self, resolved: &Resolved<'_>) -> bool {
        let expected = self.coerced();
        resolved
            .values()
            .iter()
            .any(|value| coerce(value).is_some_and(|actual| actual == expected))
    }
}

/// Coerce a subject value to its string form, if it has one.
#[must_use]
pub(crate) fn coerce(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(number_to_string(n))),
        Value::Bool(b) => Some(Cow::Borrowed(bool_str(*b))),
        Value::Null => Some(Cow::Borrowed("null")),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn bool_str(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

fn number_to_string(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_owned(),
        Some(f) if f.abs() >= EXPONENT_UPPER || f.abs() < EXPONENT_LOWER => exponent_form(f),
        // Display never uses exponents and drops a zero fraction.
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// `1e21` → `1e+21`, `1.5e-7` stays as is.
fn exponent_form(f: f64) -> String {
    let formatted = format!("{f:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<u64> for Literal {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Number> for Literal {
    fn from(n: Number) -> Self {
        Self::Number(n)
    }
}
