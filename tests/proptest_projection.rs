//! Property-based tests using proptest
//!
//! These tests check the index projection of `ResourceViewModel` over
//! randomly generated resources: counts, ordering and out-of-range access.

use proptest::prelude::*;
use serde_json::{json, Value};
use starship::hyperdrive::{Hyperdrive, InputProperty, Representor, Transition, Transport};
use starship::viewmodel::{infer_title, ResourceViewModel, TITLE_KEYS};
use std::collections::BTreeMap;
use std::sync::Arc;

fn client() -> Arc<dyn Transport> {
    Arc::new(Hyperdrive::new().unwrap())
}

/// Generate an arbitrary attribute value
fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        Just(Value::Null),
        prop::collection::vec(any::<u8>(), 0..4).prop_map(|v| json!(v)),
    ]
}

fn arb_attributes() -> impl Strategy<Value = BTreeMap<String, Value>> {
    prop::collection::btree_map(
        prop_oneof![
            Just("title".to_string()),
            Just("name".to_string()),
            Just("question".to_string()),
            Just("choice".to_string()),
            "[a-z]{1,8}",
        ],
        arb_value(),
        0..8,
    )
}

/// Generate a transition that may or may not need input
fn arb_transition() -> impl Strategy<Value = Transition> {
    (
        "[a-z]{1,8}",
        prop_oneof!["GET", "POST", "PUT", "DELETE"],
        prop::collection::vec("[a-z]{1,6}", 0..3),
    )
        .prop_map(|(segment, method, fields)| {
            let mut transition =
                Transition::new(&format!("https://api.example.com/{}", segment)).with_method(&method);
            for field in fields {
                transition = transition.with_attribute(&field, InputProperty::default());
            }
            transition
        })
}

fn arb_embedded() -> impl Strategy<Value = BTreeMap<String, Vec<Representor>>> {
    prop::collection::btree_map(
        "[a-z]{1,6}",
        prop::collection::vec(
            arb_attributes().prop_map(|attributes| Representor {
                attributes,
                ..Representor::default()
            }),
            1..4,
        ),
        0..4,
    )
}

/// Generate a resource, optionally with a self link among its transitions
fn arb_representor() -> impl Strategy<Value = Representor> {
    (
        arb_attributes(),
        arb_embedded(),
        prop::collection::btree_map("[a-z]{1,8}", arb_transition(), 0..6),
        any::<bool>(),
    )
        .prop_map(|(attributes, representors, mut transitions, with_self)| {
            if with_self {
                transitions.insert(
                    "self".to_string(),
                    Transition::new("https://api.example.com/me"),
                );
            } else {
                transitions.remove("self");
            }
            Representor {
                attributes,
                representors,
                transitions,
            }
        })
}

proptest! {
    /// Counts match the underlying collections, with self excluded
    #[test]
    fn counts_match_representor(representor in arb_representor()) {
        let vm = ResourceViewModel::new(client(), representor.clone());

        prop_assert_eq!(vm.number_of_attributes(), representor.attributes.len());
        prop_assert_eq!(
            vm.number_of_embedded_resources(),
            representor.representors.values().map(Vec::len).sum::<usize>()
        );
        let expected_transitions = representor
            .transitions
            .keys()
            .filter(|k| k.as_str() != "self")
            .count();
        prop_assert_eq!(vm.number_of_transitions(), expected_transitions);
        prop_assert_eq!(vm.can_reload(), representor.transitions.contains_key("self"));
    }

    /// Attribute titles come out sorted by key
    #[test]
    fn attributes_are_sorted(representor in arb_representor()) {
        let vm = ResourceViewModel::new(client(), representor);
        let titles: Vec<&str> = (0..vm.number_of_attributes())
            .filter_map(|i| vm.title_for_attribute(i))
            .collect();
        let mut sorted = titles.clone();
        sorted.sort_unstable();
        prop_assert_eq!(titles, sorted);
    }

    /// Embedded resources are grouped by relation, relations in sorted order
    #[test]
    fn embedded_resources_grouped_by_relation(representor in arb_representor()) {
        let vm = ResourceViewModel::new(client(), representor.clone());
        let relations: Vec<&str> = (0..vm.number_of_embedded_resources())
            .filter_map(|i| vm.relation_for_embedded_resource(i))
            .collect();

        let expected: Vec<&str> = representor
            .representors
            .iter()
            .flat_map(|(relation, children)| children.iter().map(move |_| relation.as_str()))
            .collect();
        prop_assert_eq!(relations, expected);

        for i in 0..vm.number_of_embedded_resources() {
            let child = vm.view_model_for_embedded_resource(i);
            prop_assert!(child.is_some());
            let child = child.unwrap();
            prop_assert_eq!(vm.title_for_embedded_resource(i), child.title());
        }
    }

    /// self never shows up as a transition title
    #[test]
    fn self_is_never_listed(representor in arb_representor()) {
        let vm = ResourceViewModel::new(client(), representor);
        for i in 0..vm.number_of_transitions() {
            prop_assert_ne!(vm.title_for_transition(i), Some("self"));
        }
    }

    /// A form view model exists exactly when the transition needs input
    #[test]
    fn transition_view_model_only_for_input(representor in arb_representor()) {
        let vm = ResourceViewModel::new(client(), representor);
        for i in 0..vm.number_of_transitions() {
            let transition = vm.transition_for_index(i);
            prop_assert!(transition.is_some());
            let needs_input = transition.unwrap().requires_input();
            prop_assert_eq!(vm.view_model_for_transition(i).is_some(), needs_input);
        }
    }

    /// Every accessor answers None past the end
    #[test]
    fn out_of_range_is_none(representor in arb_representor(), extra in 0usize..5) {
        let vm = ResourceViewModel::new(client(), representor);

        let attributes = vm.number_of_attributes() + extra;
        prop_assert!(vm.title_for_attribute(attributes).is_none());
        prop_assert!(vm.value_for_attribute(attributes).is_none());

        let embedded = vm.number_of_embedded_resources() + extra;
        prop_assert!(vm.relation_for_embedded_resource(embedded).is_none());
        prop_assert!(vm.title_for_embedded_resource(embedded).is_none());
        prop_assert!(vm.view_model_for_embedded_resource(embedded).is_none());

        let transitions = vm.number_of_transitions() + extra;
        prop_assert!(vm.title_for_transition(transitions).is_none());
        prop_assert!(vm.view_model_for_transition(transitions).is_none());
    }

    /// A title comes from a string under a title key, and every key ahead of
    /// it holds no string
    #[test]
    fn title_prefers_earlier_keys(attributes in arb_attributes()) {
        match infer_title(&attributes, TITLE_KEYS) {
            Some(title) => {
                let position = TITLE_KEYS
                    .iter()
                    .position(|key| attributes.get(*key) == Some(&Value::from(title)));
                prop_assert!(position.is_some());
                for key in &TITLE_KEYS[..position.unwrap()] {
                    prop_assert!(!attributes.get(*key).is_some_and(Value::is_string));
                }
            }
            None => {
                for key in TITLE_KEYS {
                    prop_assert!(!attributes.get(*key).is_some_and(Value::is_string));
                }
            }
        }
    }

    /// A string under `title` always wins, whatever else is present
    #[test]
    fn string_title_always_wins(
        attributes in arb_attributes(),
        title in "[a-zA-Z ]{1,12}"
    ) {
        let mut attributes = attributes;
        attributes.insert("title".to_string(), Value::from(title.clone()));
        let vm = ResourceViewModel::new(
            client(),
            Representor { attributes, ..Representor::default() },
        );
        prop_assert_eq!(vm.title(), Some(title.as_str()));
    }
}
