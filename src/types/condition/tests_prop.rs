use proptest::prelude::*;

use super::*;
use crate::types::test_keys;

fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(64);
    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

fn arb_leaf() -> impl Strategy<Value = WitnessCondition> {
    prop_oneof![
        any::<bool>().prop_map(|expression| WitnessCondition::Boolean { expression }),
        prop::array::uniform20(any::<u8>())
            .prop_map(|bytes| WitnessCondition::ScriptHash { hash: Hash160::from_le_bytes(bytes) }),
        prop::array::uniform20(any::<u8>()).prop_map(|bytes| WitnessCondition::CalledByContract {
            hash: Hash160::from_le_bytes(bytes)
        }),
        prop_oneof![
            Just(test_keys::key(test_keys::GENERATOR)),
            Just(test_keys::key(test_keys::GENERATOR_NEG)),
        ]
        .prop_map(|group| WitnessCondition::Group { group }),
        Just(WitnessCondition::CalledByEntry),
    ]
}

/// Trees within the structural bounds the wire format accepts: at most two
/// composite levels below the root, at most [`MAX_SUBITEMS`] children.
fn arb_condition() -> impl Strategy<Value = WitnessCondition> {
    arb_leaf().prop_recursive(MAX_NESTING_DEPTH as u32, 24, MAX_SUBITEMS as u32, |inner| {
        prop_oneof![
            inner
                .clone()
                .prop_map(|c| WitnessCondition::Not { expression: Box::new(c) }),
            prop::collection::vec(inner.clone(), 1..=4)
                .prop_map(|expressions| WitnessCondition::And { expressions }),
            prop::collection::vec(inner, 1..=4)
                .prop_map(|expressions| WitnessCondition::Or { expressions }),
        ]
    })
}

proptest! {
    #![proptest_config(proptest_config())]

    fn binary_round_trip(condition in arb_condition()) {
        prop_assume!(condition.validate().is_ok());
        let bytes = condition.to_bytes();
        let decoded = WitnessCondition::from_bytes(&bytes).expect("decode canonical bytes");
        prop_assert_eq!(decoded, condition);
    }

    fn json_round_trip(condition in arb_condition()) {
        prop_assume!(condition.validate().is_ok());
        let json = serde_json::to_string(&condition).expect("serialize");
        let decoded: WitnessCondition = serde_json::from_str(&json).expect("deserialize");
        decoded.validate().expect("decoded tree stays within bounds");
        prop_assert_eq!(decoded, condition);
    }

    fn decoder_never_panics_on_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let _ = WitnessCondition::from_bytes(&bytes);
    }
}
