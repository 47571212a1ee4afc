//! Condition — Tagged union of everything a path key can be bound to
//!
//! A condition is classified once, when the condition set is loaded, and never
//! re-inspected as raw JSON during evaluation:
//!
//! - [`Condition::Equals`] — a scalar literal, compared by coerced string
//! - [`Condition::Operator`] — an operator node (`and`, `or`, `in`, `gt`, `lt`, `gte`, `lte`)
//! - [`Condition::Unsatisfiable`] — a shape no subject can satisfy
//!
//! # Operator precedence
//!
//! An operator mapping may carry several operator keys. Exactly one is honored:
//! the first present in [`OperatorKind::PRIORITY`]. The rest are ignored, not
//! rejected.
//!
//! # Path depth
//!
//! `Equals` and `in` resolve the full path (through nested mappings and
//! sequences). `gt`, `lt`, `gte` and `lte` read the field named by the
//! **first segment only**.

use crate::{FieldPath, Literal};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// A classified condition bound to a path key.
///
/// # Example
///
/// ```
/// use elig::{Condition, FieldPath};
/// use serde_json::json;
///
/// let between = Condition::and(vec![Condition::gt(10_i64), Condition::lt(30_i64)]);
/// let total = FieldPath::new("total");
///
/// assert!(between.evaluate(&json!({ "total": 20 }), &total));
/// assert!(!between.evaluate(&json!({ "total": 40 }), &total));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Coerced string equality against the value(s) at the full path.
    Equals(Literal),

    /// An operator node, reduced to its highest-priority operator.
    Operator(Operator),

    /// A condition that never holds: a mapping without operator keys, a
    /// `null` or sequence condition, or an operator with an unusable argument.
    Unsatisfiable,
}

/// The operator honored by an operator node.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// All members must hold. Short-circuits on the first `false`.
    And(Vec<Condition>),

    /// Any member must hold. Short-circuits on the first `true`.
    Or(Vec<Condition>),

    /// Some resolved value equals some listed value.
    In(Vec<Value>),

    /// First-segment field `>` bound.
    Gt(Bound),

    /// First-segment field `<` bound.
    Lt(Bound),

    /// First-segment field `>=` bound.
    Gte(Bound),

    /// First-segment field `<=` bound.
    Lte(Bound),
}

/// Operator names, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    /// `and`
    And,
    /// `or`
    Or,
    /// `in`
    In,
    /// `gt`
    Gt,
    /// `lt`
    Lt,
    /// `gte`
    Gte,
    /// `lte`
    Lte,
}

impl OperatorKind {
    /// Precedence order: when an operator mapping holds several keys, the
    /// first one in this list wins.
    pub const PRIORITY: [Self; 7] = [
        Self::And,
        Self::Or,
        Self::In,
        Self::Gt,
        Self::Lt,
        Self::Gte,
        Self::Lte,
    ];

    /// Look up an operator by its key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|kind| kind.as_str() == key)
    }

    /// The key this operator is written as.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::In => "in",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Gte => "gte",
            Self::Lte => "lte",
        }
    }

    /// Returns `true` for `and` and `or`, whose argument is a member mapping.
    #[must_use]
    pub fn is_combinator(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The operand of a comparison operator.
///
/// Numbers only order against numbers and text only against text. Every
/// other pairing is incomparable, and an incomparable comparison is `false`.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    /// Numeric bound, compared numerically.
    Number(f64),
    /// Text bound, compared lexicographically.
    Text(String),
}

impl Bound {
    /// Build a bound from a JSON value. Only numbers and strings qualify.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Order `value` relative to this bound.
    ///
    /// Returns `None` when the two are incomparable (different kinds, NaN,
    /// sequences, mappings, `null`, booleans).
    #[must_use]
    pub fn compare(&self, value: &Value) -> Option<Ordering> {
        match (value, self) {
            (Value::Number(n), Self::Number(bound)) => n.as_f64()?.partial_cmp(bound),
            (Value::String(s), Self::Text(bound)) => Some(s.as_str().cmp(bound.as_str())),
            _ => None,
        }
    }
}

impl From<i64> for Bound {
    #[allow(clippy::cast_precision_loss)] // JSON numbers are compared as f64
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<f64> for Bound {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Bound {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Bound {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl Condition {
    /// Evaluate this condition for `path` against `subject`.
    ///
    /// Total: never fails, never panics. Missing fields, type mismatches and
    /// unusable shapes all evaluate to `false`.
    ///
    /// # Safety Consideration
    ///
    /// `and`/`or` nesting recurses. Bound untrusted input with
    /// [`depth()`](Self::depth) before evaluating; see [`MAX_DEPTH`](crate::MAX_DEPTH).
    #[must_use]
    pub fn evaluate(&self, subject: &Value, path: &FieldPath) -> bool {
        match self {
            Self::Equals(literal) => literal.matches(&path.resolve(subject)),
            Self::Operator(operator) => operator.evaluate(subject, path),
            Self::Unsatisfiable => false,
        }
    }

    /// Equality with a literal.
    pub fn equals(literal: impl Into<Literal>) -> Self {
        Self::Equals(literal.into())
    }

    /// All members must hold.
    #[must_use]
    pub fn and(members: Vec<Condition>) -> Self {
        Self::Operator(Operator::And(members))
    }

    /// Any member must hold.
    #[must_use]
    pub fn or(members: Vec<Condition>) -> Self {
        Self::Operator(Operator::Or(members))
    }

    /// Membership in a list of values (`in`).
    #[must_use]
    pub fn one_of(values: Vec<Value>) -> Self {
        Self::Operator(Operator::In(values))
    }

    /// First-segment field `>` bound.
    pub fn gt(bound: impl Into<Bound>) -> Self {
        Self::Operator(Operator::Gt(bound.into()))
    }

    /// First-segment field `<` bound.
    pub fn lt(bound: impl Into<Bound>) -> Self {
        Self::Operator(Operator::Lt(bound.into()))
    }

    /// First-segment field `>=` bound.
    pub fn gte(bound: impl Into<Bound>) -> Self {
        Self::Operator(Operator::Gte(bound.into()))
    }

    /// First-segment field `<=` bound.
    pub fn lte(bound: impl Into<Bound>) -> Self {
        Self::Operator(Operator::Lte(bound.into()))
    }

    /// Returns `true` if this is a literal equality.
    #[must_use]
    pub fn is_equals(&self) -> bool {
        matches!(self, Self::Equals(_))
    }

    /// Returns `true` if this is an operator node.
    #[must_use]
    pub fn is_operator(&self) -> bool {
        matches!(self, Self::Operator(_))
    }

    /// Returns `true` if this condition can never hold.
    #[must_use]
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, Self::Unsatisfiable)
    }

    /// Depth of this condition tree.
    ///
    /// Literals, leaf operators and unsatisfiable conditions are depth 1;
    /// each `and`/`or` adds one level above its deepest member.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Operator(Operator::And(members) | Operator::Or(members)) => {
                1 + members.iter().map(Condition::depth).max().unwrap_or(0)
            }
            _ => 1,
        }
    }
}

impl Operator {
    /// The kind of this operator.
    #[must_use]
    pub fn kind(&self) -> OperatorKind {
        match self {
            Self::And(_) => OperatorKind::And,
            Self::Or(_) => OperatorKind::Or,
            Self::In(_) => OperatorKind::In,
            Self::Gt(_) => OperatorKind::Gt,
            Self::Lt(_) => OperatorKind::Lt,
            Self::Gte(_) => OperatorKind::Gte,
            Self::Lte(_) => OperatorKind::Lte,
        }
    }

    /// Evaluate this operator for `path` against `subject`.
    #[must_use]
    pub fn evaluate(&self, subject: &Value, path: &FieldPath) -> bool {
        match self {
            Self::And(members) => members.iter().all(|m| m.evaluate(subject, path)),
            Self::Or(members) => members.iter().any(|m| m.evaluate(subject, path)),
            Self::In(listed) => path
                .resolve(subject)
                .values()
                .iter()
                .any(|value| listed.iter().any(|candidate| same_value(candidate, value))),
            Self::Gt(bound) => compare_field(subject, path, bound) == Some(Ordering::Greater),
            Self::Lt(bound) => compare_field(subject, path, bound) == Some(Ordering::Less),
            Self::Gte(bound) => matches!(
                compare_field(subject, path, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::Lte(bound) => matches!(
                compare_field(subject, path, bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }
}

fn compare_field(subject: &Value, path: &FieldPath, bound: &Bound) -> Option<Ordering> {
    bound.compare(path.field(subject)?)
}

/// Value equality for `in`: numbers compare numerically, everything else
/// structurally.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}
