//! `FieldPath` — Dot-delimited addressing into a subject
//!
//! A path such as `products.quantity` is split once into segments and then
//! resolved against any number of subjects. Resolution walks nested mappings
//! and, when it meets a sequence before the last segment, resolves the rest of
//! the path inside **every** element and flattens the results one level.
//!
//! That flattening is what lets `products.quantity` reach the quantity of each
//! product in a cart:
//!
//! ```
//! use elig::{FieldPath, Resolved};
//! use serde_json::json;
//!
//! let cart = json!({ "products": [{ "quantity": 1 }, { "quantity": 2 }, {}] });
//! let path = FieldPath::new("products.quantity");
//!
//! let resolved = path.resolve(&cart);
//! assert_eq!(resolved.values(), &[&json!(1), &json!(2)]);
//! ```

use serde_json::Value;
use std::fmt;

/// The result of resolving a [`FieldPath`] against a subject.
///
/// Analogous to a type-erased input: the evaluators downstream never look at
/// the subject again, only at what was resolved.
///
/// # INV: Absent → false
///
/// Every evaluator treats `Absent` as a failed condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// The path does not exist in the subject.
    Absent,

    /// The path ends on a single (non-sequence) value.
    Value(&'a Value),

    /// The path ends on a sequence, or crossed one on the way.
    ///
    /// Elements that could not be resolved are dropped, so this never
    /// contains placeholders for missing fields. It may be empty.
    Sequence(Vec<&'a Value>),
}

impl<'a> Resolved<'a> {
    /// Returns `true` if the path was not found.
    #[inline]
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns `true` if resolution produced a sequence.
    #[inline]
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// All resolved values as a slice.
    ///
    /// `Absent` is empty and a single value is a one-element slice, so
    /// "any resolved value satisfies X" reads the same for every variant.
    #[must_use]
    pub fn values(&self) -> &[&'a Value] {
        match self {
            Self::Absent => &[],
            Self::Value(value) => std::slice::from_ref(value),
            Self::Sequence(values) => values.as_slice(),
        }
    }

    fn into_values(self) -> Vec<&'a Value> {
        match self {
            Self::Absent => Vec::new(),
            Self::Value(value) => vec![value],
            Self::Sequence(values) => values,
        }
    }
}

/// A parsed, dot-delimited field path.
///
/// Segments are kept verbatim: `a..b` has an empty middle segment, which is
/// looked up like any other field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a path by splitting on `.`.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = raw.split('.').map(str::to_owned).collect();
        Self { raw, segments }
    }

    /// The path exactly as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The path segments, in order. Never empty.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The first segment.
    #[must_use]
    pub fn first(&self) -> &str {
        self.segments.first().map_or("", String::as_str)
    }

    /// Resolve the full path, flattening through sequences.
    #[must_use]
    pub fn resolve<'a>(&self, subject: &'a Value) -> Resolved<'a> {
        resolve_segments(subject, &self.segments)
    }

    /// Direct lookup of the first segment only.
    ///
    /// No descent and no flattening: `products.quantity` looks up
    /// `products` and returns whatever is stored there.
    #[must_use]
    pub fn field<'a>(&self, subject: &'a Value) -> Option<&'a Value> {
        subject.as_object()?.get(self.first())
    }
}

fn resolve_segments<'a>(current: &'a Value, segments: &[String]) -> Resolved<'a> {
    let Some((head, rest)) = segments.split_first() else {
        return Resolved::Value(current);
    };
    let Some(field) = current.as_object().and_then(|fields| fields.get(head)) else {
        return Resolved::Absent;
    };

    match field {
        Value::Array(items) if rest.is_empty() => Resolved::Sequence(items.iter().collect()),
        _ if rest.is_empty() => Resolved::Value(field),
        Value::Array(items) => Resolved::Sequence(
            items
                .iter()
                .flat_map(|item| resolve_segments(item, rest).into_values())
                .collect(),
        ),
        Value::Object(_) => resolve_segments(field, rest),
        _ => Resolved::Absent,
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for FieldPath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for FieldPath {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_on_dots() {
        let path = FieldPath::new("a.b.c");
        assert_eq!(path.segments(), &["a", "b", "c"]);
        assert_eq!(path.first(), "a");
        assert_eq!(path.to_string(), "a.b.c");
    }

    #[test]
    fn keeps_empty_segments() {
        let path = FieldPath::new("a..b");
        assert_eq!(path.segments(), &["a", "", "b"]);

        let subject = json!({ "a": { "": { "b": 1 } } });
        assert_eq!(path.resolve(&subject), Resolved::Value(&json!(1)));
    }

    #[test]
    fn resolves_top_level_field() {
        let subject = json!({ "total": 20 });
        assert_eq!(
            FieldPath::new("total").resolve(&subject),
            Resolved::Value(&json!(20))
        );
    }

    #[test]
    fn missing_field_is_absent() {
        let subject = json!({});
        assert!(FieldPath::new("total").resolve(&subject).is_absent());
        assert!(FieldPath::new("products.quantity").resolve(&subject).is_absent());
    }

    #[test]
    fn descends_into_mappings() {
        let subject = json!({ "products": { "quantity": 1 } });
        assert_eq!(
            FieldPath::new("products.quantity").resolve(&subject),
            Resolved::Value(&json!(1))
        );

        let subject = json!({ "products": {} });
        assert!(FieldPath::new("products.quantity").resolve(&subject).is_absent());
    }

    #[test]
    fn scalar_cannot_be_descended() {
        let subject = json!({ "total": 20 });
        assert!(FieldPath::new("total.amount").resolve(&subject).is_absent());
    }

    #[test]
    fn flattens_through_sequences() {
        let subject = json!({ "products": [{ "quantity": 1 }, { "quantity": 2 }] });
        let resolved = FieldPath::new("products.quantity").resolve(&subject);
        assert!(resolved.is_sequence());
        assert_eq!(resolved.values(), &[&json!(1), &json!(2)]);
    }

    #[test]
    fn drops_elements_missing_the_rest_of_the_path() {
        let subject = json!({ "products": [{ "sku": "x" }, { "quantity": 2 }, 7, null] });
        let resolved = FieldPath::new("products.quantity").resolve(&subject);
        assert_eq!(resolved.values(), &[&json!(2)]);
    }

    #[test]
    fn sequence_without_matches_is_empty_not_absent() {
        let subject = json!({ "products": [{ "sku": "x" }] });
        let resolved = FieldPath::new("products.quantity").resolve(&subject);
        assert_eq!(resolved, Resolved::Sequence(Vec::new()));
    }

    #[test]
    fn flattens_nested_sequences_one_level_per_crossing() {
        let subject = json!({
            "orders": [
                { "lines": [{ "sku": "a" }, { "sku": "b" }] },
                { "lines": [{ "sku": "c" }] }
            ]
        });
        let resolved = FieldPath::new("orders.lines.sku").resolve(&subject);
        assert_eq!(resolved.values(), &[&json!("a"), &json!("b"), &json!("c")]);
    }

    #[test]
    fn trailing_sequences_are_spliced() {
        let subject = json!({ "products": [{ "tags": ["x", "y"] }, { "tags": ["z"] }] });
        let resolved = FieldPath::new("products.tags").resolve(&subject);
        assert_eq!(resolved.values(), &[&json!("x"), &json!("y"), &json!("z")]);
    }

    #[test]
    fn last_segment_sequence_is_returned_as_sequence() {
        let subject = json!({ "tags": ["x", "y"] });
        let resolved = FieldPath::new("tags").resolve(&subject);
        assert_eq!(resolved.values(), &[&json!("x"), &json!("y")]);
    }

    #[test]
    fn field_reads_first_segment_only() {
        let subject = json!({ "total": 20, "products": [{ "quantity": 1 }] });
        assert_eq!(FieldPath::new("total").field(&subject), Some(&json!(20)));
        assert_eq!(
            FieldPath::new("products.quantity").field(&subject),
            Some(&json!([{ "quantity": 1 }]))
        );
        assert_eq!(FieldPath::new("missing").field(&subject), None);
        assert_eq!(FieldPath::new("total").field(&json!([1, 2])), None);
    }

    #[test]
    fn resolution_does_not_touch_the_subject() {
        let subject = json!({ "products": [{ "quantity": 1 }] });
        let before = subject.clone();
        let _ = FieldPath::new("products.quantity").resolve(&subject);
        assert_eq!(subject, before);
    }
}
