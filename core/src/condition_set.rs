//! `ConditionSet` — Top-level eligibility check
//!
//! A condition set maps path keys to conditions. A subject is eligible when
//! **every** entry holds. Entries are evaluated in document order and the
//! first failing entry ends evaluation.

use crate::{Condition, FieldPath};
use serde_json::Value;

/// An ordered collection of `(path, condition)` entries.
///
/// Build it programmatically with [`with`](Self::with), classify an existing
/// `serde_json::Value` with [`from_value`](Self::from_value), or deserialize it
/// from JSON/YAML text.
///
/// # Example
///
/// ```
/// use elig::{Condition, ConditionSet};
/// use serde_json::json;
///
/// let conditions = ConditionSet::new()
///     .with("shopperId", Condition::equals("shopper-id"))
///     .with("total", Condition::gte(20_i64));
///
/// assert!(conditions.is_satisfied_by(&json!({ "shopperId": "shopper-id", "total": 20 })));
/// assert!(!conditions.is_satisfied_by(&json!({ "shopperId": "shopper-id", "total": 19 })));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionSet {
    entries: Vec<(FieldPath, Condition)>,
}

impl ConditionSet {
    /// Create an empty condition set (satisfied by every subject).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder pattern).
    #[must_use]
    pub fn with(mut self, path: impl Into<FieldPath>, condition: Condition) -> Self {
        self.entries.push((path.into(), condition));
        self
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &Condition)> {
        self.entries.iter().map(|(path, condition)| (path, condition))
    }

    /// Deepest condition in the set (0 when empty).
    ///
    /// Used by callers to bound untrusted input against
    /// [`MAX_DEPTH`](crate::MAX_DEPTH) before evaluating.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, condition)| condition.depth())
            .max()
            .unwrap_or(0)
    }

    /// Check whether `subject` satisfies every entry.
    ///
    /// Short-circuits on the first failing entry. An empty set is satisfied
    /// by every subject.
    #[must_use]
    pub fn is_satisfied_by(&self, subject: &Value) -> bool {
        tracing::trace!(entries = self.entries.len(), "evaluating condition set");
        for (path, condition) in &self.entries {
            if !condition.evaluate(subject, path) {
                tracing::debug!(path = %path, "condition not satisfied");
                return false;
            }
        }
        true
    }
}

impl FromIterator<(FieldPath, Condition)> for ConditionSet {
    fn from_iter<I: IntoIterator<Item = (FieldPath, Condition)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ConditionSet {
    type Item = (FieldPath, Condition);
    type IntoIter = std::vec::IntoIter<(FieldPath, Condition)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Decide whether `subject` satisfies the condition set `conditions`.
///
/// Both arguments are plain, already-parsed JSON-like values. The result is
/// `true` iff every key of `conditions` is satisfied. A `conditions` value
/// that is not a mapping is not a condition set, and the answer is `false`.
/// This is deliberately not "vacuously true": `[]` or `null` is rejected
/// rather than read as a set with no entries, while `{}` is satisfied.
///
/// # Example
///
/// ```
/// use elig::is_eligible;
/// use serde_json::json;
///
/// let cart = json!({ "products": [{ "quantity": 1 }, { "quantity": 2 }] });
///
/// assert!(is_eligible(&cart, &json!({ "products.quantity": 1 })));
/// assert!(!is_eligible(&cart, &json!({ "products.quantity": 3 })));
/// assert!(is_eligible(&cart, &json!({})));
/// ```
#[must_use]
pub fn is_eligible(subject: &Value, conditions: &Value) -> bool {
    match ConditionSet::from_value(conditions) {
        Ok(set) => set.is_satisfied_by(subject),
        Err(err) => {
            tracing::debug!(error = %err, "condition set rejected");
            false
        }
    }
}
