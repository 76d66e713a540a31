use proptest::prelude::*;

use super::*;
use crate::types::condition::WitnessCondition;
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

fn arb_hash() -> impl Strategy<Value = Hash160> {
    prop::array::uniform20(any::<u8>()).prop_map(Hash160::from_le_bytes)
}

fn arb_key() -> impl Strategy<Value = PublicKey> {
    prop_oneof![
        Just(test_keys::key(test_keys::GENERATOR)),
        Just(test_keys::key(test_keys::GENERATOR_NEG)),
    ]
}

fn arb_rule() -> impl Strategy<Value = WitnessRule> {
    let action = prop_oneof![
        Just(WitnessRuleAction::Allow),
        Just(WitnessRuleAction::Deny),
    ];
    let condition = prop_oneof![
        any::<bool>().prop_map(|expression| WitnessCondition::Boolean { expression }),
        arb_hash().prop_map(|hash| WitnessCondition::ScriptHash { hash }),
        arb_hash().prop_map(|hash| WitnessCondition::CalledByContract { hash }),
        Just(WitnessCondition::CalledByEntry),
    ];
    (action, condition).prop_map(|(action, condition)| WitnessRule { action, condition })
}

prop_compose! {
    fn arb_signer()(
        account in arb_hash(),
        entry in any::<bool>(),
        contracts in prop::option::of(prop::collection::vec(arb_hash(), 1..=4)),
        groups in prop::option::of(prop::collection::vec(arb_key(), 1..=2)),
        rules in prop::option::of(prop::collection::vec(arb_rule(), 1..=4)),
    ) -> Signer {
        let mut scopes = WitnessScope::NONE;
        if entry {
            scopes |= WitnessScope::CALLED_BY_ENTRY;
        }
        if contracts.is_some() {
            scopes |= WitnessScope::CUSTOM_CONTRACTS;
        }
        if groups.is_some() {
            scopes |= WitnessScope::CUSTOM_GROUPS;
        }
        if rules.is_some() {
            scopes |= WitnessScope::WITNESS_RULES;
        }
        Signer {
            account,
            scopes,
            allowed_contracts: contracts.unwrap_or_default(),
            allowed_groups: groups.unwrap_or_default(),
            rules: rules.unwrap_or_default(),
        }
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    fn binary_round_trip(signer in arb_signer()) {
        signer.validate().expect("generated signer is well formed");
        let bytes = signer.to_bytes();
        let decoded = Signer::from_bytes(&bytes).expect("decode canonical bytes");
        prop_assert_eq!(decoded, signer);
    }

    fn json_round_trip(signer in arb_signer()) {
        let json = signer.to_json().expect("serialize");
        let decoded = Signer::from_json(&json).expect("deserialize");
        prop_assert_eq!(decoded, signer);
    }

    fn decoder_never_panics_on_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = Signer::from_bytes(&bytes);
    }

    fn global_signer_authorizes_arbitrary_contexts(
        account in arb_hash(),
        current in arb_hash(),
        calling in arb_hash(),
        entry in arb_hash(),
    ) {
        let signer = Signer::global(account);
        let ctx = crate::context::CallContext::new(current, calling, entry);
        prop_assert!(signer.authorizes(&ctx));
    }
}
