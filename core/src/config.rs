//! Loading — Raw JSON-like values into classified conditions
//!
//! Two entry points produce the same [`Condition`] / [`ConditionSet`] types:
//!
//! | Source | Entry point | Duplicate keys |
//! |--------|-------------|----------------|
//! | `serde_json::Value` | [`Condition::from`], [`ConditionSet::from_value`] | already collapsed by the map |
//! | JSON / YAML text | `Deserialize` (`serde_json::from_str`, `serde_yaml::from_str`) | preserved |
//!
//! # Classification rules
//!
//! | Raw shape | Condition |
//! |-----------|-----------|
//! | string, number, boolean | [`Condition::Equals`] |
//! | mapping with an operator key | [`Condition::Operator`] (highest priority key) |
//! | mapping without operator keys | [`Condition::Unsatisfiable`] |
//! | `null`, sequence | [`Condition::Unsatisfiable`] |
//!
//! Operator arguments are checked for shape while classifying:
//! `and`/`or` need a mapping, `in` a sequence, `gt`/`lt`/`gte`/`lte` a number
//! or string. Anything else makes the node unsatisfiable.
//!
//! When read from text, every entry of an `and`/`or` mapping becomes its own
//! member, even if two entries share an operator name (`{"gt": 10, "gt": 20}`
//! yields two members). Within one operator node, the last occurrence of the
//! winning key is the one kept.

use crate::{Bound, Condition, ConditionSet, FieldPath, Literal, Operator, OperatorKind};
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::{Number, Value};
use std::fmt;

/// The raw argument read for one operator key, before precedence is applied.
enum Operand {
    /// Argument of `and`/`or`: its members, or `None` if it was not a mapping.
    Members(Option<Vec<Condition>>),
    /// Argument of every other operator.
    Value(Value),
}

/// Apply precedence to the operator entries of one mapping.
fn classify(mut entries: Vec<(OperatorKind, Operand)>) -> Condition {
    for kind in OperatorKind::PRIORITY {
        if let Some(index) = entries.iter().rposition(|(k, _)| *k == kind) {
            let (_, operand) = entries.swap_remove(index);
            return build(kind, operand);
        }
    }
    Condition::Unsatisfiable
}

fn build(kind: OperatorKind, operand: Operand) -> Condition {
    let operator = match (kind, operand) {
        (OperatorKind::And, Operand::Members(Some(members))) => Operator::And(members),
        (OperatorKind::Or, Operand::Members(Some(members))) => Operator::Or(members),
        (OperatorKind::In, Operand::Value(Value::Array(listed))) => Operator::In(listed),
        (OperatorKind::Gt, Operand::Value(ref v)) => match Bound::from_value(v) {
            Some(bound) => Operator::Gt(bound),
            None => return Condition::Unsatisfiable,
        },
        (OperatorKind::Lt, Operand::Value(ref v)) => match Bound::from_value(v) {
            Some(bound) => Operator::Lt(bound),
            None => return Condition::Unsatisfiable,
        },
        (OperatorKind::Gte, Operand::Value(ref v)) => match Bound::from_value(v) {
            Some(bound) => Operator::Gte(bound),
            None => return Condition::Unsatisfiable,
        },
        (OperatorKind::Lte, Operand::Value(ref v)) => match Bound::from_value(v) {
            Some(bound) => Operator::Lte(bound),
            None => return Condition::Unsatisfiable,
        },
        _ => return Condition::Unsatisfiable,
    };
    Condition::Operator(operator)
}

/// A combinator member `{key: argument}` is a one-entry operator node.
fn member(key: &str, operand: impl FnOnce(OperatorKind) -> Operand) -> Condition {
    match OperatorKind::from_key(key) {
        Some(kind) => classify(vec![(kind, operand(kind))]),
        None => Condition::Unsatisfiable,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// From serde_json::Value
// ═══════════════════════════════════════════════════════════════════════════════

fn operand_from_value(kind: OperatorKind, value: &Value) -> Operand {
    if kind.is_combinator() {
        Operand::Members(value.as_object().map(|members| {
            members
                .iter()
                .map(|(key, argument)| member(key, |k| operand_from_value(k, argument)))
                .collect()
        }))
    } else {
        Operand::Value(value.clone())
    }
}

impl From<&Value> for Condition {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Equals(Literal::String(s.clone())),
            Value::Number(n) => Self::Equals(Literal::Number(n.clone())),
            Value::Bool(b) => Self::Equals(Literal::Bool(*b)),
            Value::Object(map) => classify(
                map.iter()
                    .filter_map(|(key, argument)| {
                        let kind = OperatorKind::from_key(key)?;
                        Some((kind, operand_from_value(kind, argument)))
                    })
                    .collect(),
            ),
            Value::Null | Value::Array(_) => Self::Unsatisfiable,
        }
    }
}

impl ConditionSet {
    /// Classify a condition-set value.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionSetError::NotAMapping`](crate::ConditionSetError::NotAMapping)
    /// if `value` is not a mapping. Individual conditions never fail to load;
    /// unusable ones become [`Condition::Unsatisfiable`].
    pub fn from_value(value: &Value) -> Result<Self, crate::ConditionSetError> {
        let map = value
            .as_object()
            .ok_or(crate::ConditionSetError::NotAMapping {
                found: kind_name(value),
            })?;
        Ok(map
            .iter()
            .map(|(key, condition)| (FieldPath::new(key.as_str()), Condition::from(condition)))
            .collect())
    }
}

impl TryFrom<&Value> for ConditionSet {
    type Error = crate::ConditionSetError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Human-readable JSON kind, for error messages.
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Deserialize
// ═══════════════════════════════════════════════════════════════════════════════

fn next_operand<'de, A: MapAccess<'de>>(
    map: &mut A,
    kind: OperatorKind,
) -> Result<Operand, A::Error> {
    if kind.is_combinator() {
        Ok(Operand::Members(map.next_value::<Members>()?.0))
    } else {
        Ok(Operand::Value(map.next_value()?))
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ConditionVisitor)
    }
}

struct ConditionVisitor;

impl<'de> Visitor<'de> for ConditionVisitor {
    type Value = Condition;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar literal or an operator mapping")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Condition, E> {
        Ok(Condition::Equals(Literal::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Condition, E> {
        Ok(Condition::Equals(Literal::Number(v.into())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Condition, E> {
        Ok(Condition::Equals(Literal::Number(v.into())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Condition, E> {
        Ok(Number::from_f64(v).map_or(Condition::Unsatisfiable, |n| {
            Condition::Equals(Literal::Number(n))
        }))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Condition, E> {
        Ok(Condition::Equals(Literal::String(v.to_owned())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Condition, E> {
        Ok(Condition::Equals(Literal::String(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Condition, E> {
        Ok(Condition::Unsatisfiable)
    }

    fn visit_none<E: de::Error>(self) -> Result<Condition, E> {
        Ok(Condition::Unsatisfiable)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Condition, D::Error> {
        Condition::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Condition, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Condition::Unsatisfiable)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Condition, A::Error> {
        let mut entries = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            match OperatorKind::from_key(&key) {
                Some(kind) => entries.push((kind, next_operand(&mut map, kind)?)),
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(classify(entries))
    }
}

/// The argument of `and`/`or`: `Some(members)` for a mapping, `None` otherwise.
struct Members(Option<Vec<Condition>>);

impl<'de> Deserialize<'de> for Members {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MembersVisitor)
    }
}

struct MembersVisitor;

impl<'de> Visitor<'de> for MembersVisitor {
    type Value = Members;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of operator names to arguments")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Members, E> {
        Ok(Members(None))
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Members, E> {
        Ok(Members(None))
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Members, E> {
        Ok(Members(None))
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Members, E> {
        Ok(Members(None))
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Members, E> {
        Ok(Members(None))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Members, E> {
        Ok(Members(None))
    }

    fn visit_none<E: de::Error>(self) -> Result<Members, E> {
        Ok(Members(None))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Members, D::Error> {
        Members::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Members, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Members(None))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Members, A::Error> {
        let mut members = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            let condition = match OperatorKind::from_key(&key) {
                Some(kind) => classify(vec![(kind, next_operand(&mut map, kind)?)]),
                None => {
                    map.next_value::<IgnoredAny>()?;
                    Condition::Unsatisfiable
                }
            };
            members.push(condition);
        }
        Ok(Members(Some(members)))
    }
}

impl<'de> Deserialize<'de> for ConditionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ConditionSetVisitor)
    }
}

struct ConditionSetVisitor;

impl<'de> Visitor<'de> for ConditionSetVisitor {
    type Value = ConditionSet;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping from field paths to conditions")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ConditionSet, A::Error> {
        let mut set = ConditionSet::new();
        while let Some((path, condition)) = map.next_entry::<String, Condition>()? {
            set = set.with(path, condition);
        }
        Ok(set)
    }
}
