//! Property-based tests for eligibility evaluation.
//!
//! These tests use proptest to verify invariants around:
//! - Empty condition sets and entry order
//! - Purity and repeatability of evaluation
//! - Agreement between text and value loading
//! - Comparison and combinator algebra

use elig::{is_eligible, Condition, ConditionSet, FieldPath};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

/// Field names are drawn from a small alphabet so generated paths hit
/// generated subjects often.
fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![Just("a"), Just("b"), Just("c"), Just("total")].prop_map(str::to_owned)
}

fn arb_path() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_key(), 1..=3).prop_map(|segments| segments.join("."))
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-50i64..50).prop_map(|n| json!(n)),
        (-50.0f64..50.0).prop_map(|f| json!(f)),
        prop::string::string_regex("[a-c0-9]{0,3}")
            .unwrap()
            .prop_map(Value::String),
    ]
}

/// Arbitrary JSON subject: nested mappings and sequences over [`arb_scalar`].
fn arb_subject() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(arb_key(), inner, 0..4)
                .prop_map(|fields| Value::Object(fields.into_iter().collect())),
        ]
    })
}

fn arb_bound() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-50i64..50).prop_map(|n| json!(n)),
        prop::string::string_regex("[a-c0-9]{0,3}")
            .unwrap()
            .prop_map(Value::String),
    ]
}

/// Arbitrary raw condition: literals, leaf operators and nested combinators.
fn arb_condition() -> impl Strategy<Value = Value> {
    let op = prop_oneof![Just("gt"), Just("lt"), Just("gte"), Just("lte")];
    let leaf = prop_oneof![
        arb_scalar(),
        (op, arb_bound()).prop_map(|(op, bound)| json!({ op: bound })),
        prop::collection::vec(arb_scalar(), 0..4).prop_map(|listed| json!({ "in": listed })),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        let combinator = prop_oneof![Just("and"), Just("or")];
        let member_key = prop_oneof![Just("gt"), Just("lt"), Just("in"), Just("and"), Just("or")];
        (
            combinator,
            prop::collection::btree_map(member_key, inner, 0..3),
        )
            .prop_map(|(combinator, members)| {
                let members: Map<String, Value> = members
                    .into_iter()
                    .map(|(key, value)| (key.to_owned(), value))
                    .collect();
                json!({ combinator: members })
            })
    })
}

fn arb_conditions() -> impl Strategy<Value = Vec<(String, Value)>> {
    prop::collection::vec((arb_path(), arb_condition()), 0..4)
}

fn to_mapping(entries: &[(String, Value)]) -> Value {
    Value::Object(entries.iter().cloned().collect())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn empty_condition_set_accepts_everything(subject in arb_subject()) {
        let empty = json!({});
        prop_assert!(is_eligible(&subject, &empty));
    }

    #[test]
    fn evaluation_is_pure_and_repeatable(
        subject in arb_subject(),
        entries in arb_conditions(),
    ) {
        let conditions = to_mapping(&entries);
        let before = subject.clone();
        let first = is_eligible(&subject, &conditions);
        prop_assert_eq!(is_eligible(&subject, &conditions), first);
        prop_assert_eq!(&subject, &before);
    }

    #[test]
    fn entry_order_does_not_matter(
        subject in arb_subject(),
        entries in arb_conditions(),
    ) {
        let forward = ConditionSet::from_value(&to_mapping(&entries)).unwrap();
        let reversed: ConditionSet = forward.clone().into_iter().rev().collect();
        prop_assert_eq!(
            forward.is_satisfied_by(&subject),
            reversed.is_satisfied_by(&subject)
        );
    }

    #[test]
    fn eligible_iff_every_entry_holds(
        subject in arb_subject(),
        entries in arb_conditions(),
    ) {
        let set = ConditionSet::from_value(&to_mapping(&entries)).unwrap();
        let each = set
            .iter()
            .all(|(path, condition)| condition.evaluate(&subject, path));
        prop_assert_eq!(set.is_satisfied_by(&subject), each);
    }

    #[test]
    fn text_and_value_loading_agree(entries in arb_conditions()) {
        let value = to_mapping(&entries);
        let text = serde_json::to_string(&value).unwrap();
        let from_text: ConditionSet = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(ConditionSet::from_value(&value).unwrap(), from_text);
    }

    #[test]
    fn integer_literal_matches_its_decimal_string(n in any::<i64>()) {
        let conditions = json!({ "total": n });
        let as_text = json!({ "total": n.to_string() });
        let as_number = json!({ "total": n });
        prop_assert!(is_eligible(&as_text, &conditions));
        prop_assert!(is_eligible(&as_number, &conditions));
    }

    #[test]
    fn gt_and_lte_partition_numbers(value in -100i64..100, bound in -100i64..100) {
        let subject = json!({ "total": value });
        let total = FieldPath::new("total");
        let gt = Condition::gt(bound).evaluate(&subject, &total);
        let lte = Condition::lte(bound).evaluate(&subject, &total);
        prop_assert!(gt != lte);
    }

    #[test]
    fn comparisons_on_non_numbers_are_false(
        subject in arb_subject(),
        bound in -100i64..100,
    ) {
        let total = FieldPath::new("total");
        let is_number = subject
            .get("total")
            .is_some_and(Value::is_number);
        if !is_number {
            for condition in [
                Condition::gt(bound),
                Condition::lt(bound),
                Condition::gte(bound),
                Condition::lte(bound),
            ] {
                prop_assert!(!condition.evaluate(&subject, &total));
            }
        }
    }

    #[test]
    fn single_member_combinators_match_the_member(
        subject in arb_subject(),
        raw in arb_condition(),
        path in arb_path(),
    ) {
        let path = FieldPath::new(path);
        let member = Condition::from(&raw);
        let alone = member.evaluate(&subject, &path);
        prop_assert_eq!(Condition::and(vec![member.clone()]).evaluate(&subject, &path), alone);
        prop_assert_eq!(Condition::or(vec![member]).evaluate(&subject, &path), alone);
    }
}
