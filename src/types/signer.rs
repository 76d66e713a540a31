//! Transaction signers and the witness-scope evaluation they carry.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::{BinaryReader, BinaryWriter, Decodable, Encodable};
use crate::context::ContextView;
use crate::errors::{CoreError, CoreResult};
use crate::types::condition::MAX_SUBITEMS;
use crate::types::hash::Hash160;
use crate::types::public_key::PublicKey;
use crate::types::rule::{WitnessRule, WitnessRuleAction};
use crate::types::scope::WitnessScope;

/// A transaction party whose witness authorizes some scope of calls.
///
/// The optional lists travel on the wire only when their gating scope flag
/// is set; [`Signer::validate`] holds the same shape for objects built in
/// memory or decoded from JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    pub account: Hash160,
    pub scopes: WitnessScope,
    #[serde(rename = "allowedcontracts", default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_contracts: Vec<Hash160>,
    #[serde(rename = "allowedgroups", default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_groups: Vec<PublicKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<WitnessRule>,
}

impl Signer {
    /// Signature-only signer; authorizes nothing beyond the self check.
    pub fn with_none_scope(account: Hash160) -> Self {
        Self {
            account,
            scopes: WitnessScope::NONE,
            allowed_contracts: Vec::new(),
            allowed_groups: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn global(account: Hash160) -> Self {
        Self {
            scopes: WitnessScope::GLOBAL,
            ..Self::with_none_scope(account)
        }
    }

    pub fn called_by_entry(account: Hash160) -> Self {
        Self {
            scopes: WitnessScope::CALLED_BY_ENTRY,
            ..Self::with_none_scope(account)
        }
    }

    /// Checks the scope/list shape invariants: list caps, lists present
    /// only under their gating flag, bounded rule conditions.
    pub fn validate(&self) -> CoreResult<()> {
        if self.scopes.contains(WitnessScope::GLOBAL)
            && (!self.allowed_contracts.is_empty()
                || !self.allowed_groups.is_empty()
                || !self.rules.is_empty())
        {
            return Err(CoreError::Format(
                "a Global signer carries no contract, group, or rule lists".to_string(),
            ));
        }
        Self::check_gated_list(
            self.allowed_contracts.len(),
            self.scopes.contains(WitnessScope::CUSTOM_CONTRACTS),
            "allowed contracts",
        )?;
        Self::check_gated_list(
            self.allowed_groups.len(),
            self.scopes.contains(WitnessScope::CUSTOM_GROUPS),
            "allowed groups",
        )?;
        Self::check_gated_list(
            self.rules.len(),
            self.scopes.contains(WitnessScope::WITNESS_RULES),
            "witness rules",
        )?;
        for rule in &self.rules {
            rule.condition.validate()?;
        }
        Ok(())
    }

    fn check_gated_list(len: usize, flag_set: bool, label: &str) -> CoreResult<()> {
        if len > MAX_SUBITEMS {
            return Err(CoreError::Format(format!(
                "{label} list has {len} entries, limit is {MAX_SUBITEMS}"
            )));
        }
        if len > 0 && !flag_set {
            return Err(CoreError::Format(format!(
                "{label} list present without its scope flag"
            )));
        }
        Ok(())
    }

    /// Decides whether this signer authorizes the current call site.
    ///
    /// A signature-only signer still witnesses its own account script;
    /// beyond that, the scope flags are additive permits evaluated
    /// independently, and the rules clause grants or refuses only for
    /// itself and cannot revoke a grant made by another flag.
    pub fn authorizes(&self, ctx: &dyn ContextView) -> bool {
        if self.scopes.is_empty() {
            return ctx.current_script_hash() == self.account;
        }
        if self.scopes.contains(WitnessScope::GLOBAL) {
            return true;
        }
        if self.scopes.contains(WitnessScope::CALLED_BY_ENTRY) {
            let entry = ctx.entry_script_hash();
            if ctx.current_script_hash() == entry || ctx.calling_script_hash() == entry {
                return true;
            }
        }
        if self.scopes.contains(WitnessScope::CUSTOM_CONTRACTS)
            && self.allowed_contracts.contains(&ctx.current_script_hash())
        {
            return true;
        }
        if self.scopes.contains(WitnessScope::CUSTOM_GROUPS) {
            let groups = ctx.lookup_contract_groups(&ctx.current_script_hash());
            if groups.iter().any(|key| self.allowed_groups.contains(key)) {
                return true;
            }
        }
        if self.scopes.contains(WitnessScope::WITNESS_RULES) {
            for rule in &self.rules {
                if rule.condition.is_satisfied(ctx) {
                    let allowed = rule.action == WitnessRuleAction::Allow;
                    debug!(
                        account = %self.account,
                        allowed,
                        "witness rule matched at call site"
                    );
                    return allowed;
                }
            }
        }
        false
    }

    pub fn to_json(&self) -> CoreResult<serde_json::Value> {
        self.validate()?;
        serde_json::to_value(self)
            .map_err(|err| CoreError::Format(format!("signer does not encode as JSON: {err}")))
    }

    pub fn from_json(value: &serde_json::Value) -> CoreResult<Self> {
        let signer: Self = serde_json::from_value(value.clone())
            .map_err(|err| CoreError::Format(format!("invalid signer JSON: {err}")))?;
        signer.validate()?;
        Ok(signer)
    }
}

impl Encodable for Signer {
    fn encode(&self, writer: &mut BinaryWriter) {
        self.account.encode(writer);
        writer.write_u8(self.scopes.bits());
        if self.scopes.contains(WitnessScope::CUSTOM_CONTRACTS) {
            writer.write_array(&self.allowed_contracts);
        }
        if self.scopes.contains(WitnessScope::CUSTOM_GROUPS) {
            writer.write_array(&self.allowed_groups);
        }
        if self.scopes.contains(WitnessScope::WITNESS_RULES) {
            writer.write_array(&self.rules);
        }
    }
}

impl Decodable for Signer {
    fn decode(reader: &mut BinaryReader<'_>) -> CoreResult<Self> {
        let account = Hash160::decode(reader)?;
        let scopes = WitnessScope::from_byte(reader.read_u8()?)?;
        let allowed_contracts = if scopes.contains(WitnessScope::CUSTOM_CONTRACTS) {
            reader.read_array(MAX_SUBITEMS)?
        } else {
            Vec::new()
        };
        let allowed_groups = if scopes.contains(WitnessScope::CUSTOM_GROUPS) {
            reader.read_array(MAX_SUBITEMS)?
        } else {
            Vec::new()
        };
        let rules = if scopes.contains(WitnessScope::WITNESS_RULES) {
            reader.read_array(MAX_SUBITEMS)?
        } else {
            Vec::new()
        };
        Ok(Self {
            account,
            scopes,
            allowed_contracts,
            allowed_groups,
            rules,
        })
    }
}

#[cfg(test)]
#[path = "signer/tests_prop.rs"]
mod tests_prop;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CallContext;
    use crate::types::condition::WitnessCondition;
    use crate::types::test_keys;

    fn hash(seed: u8) -> Hash160 {
        Hash160::from_le_bytes([seed; 20])
    }

    #[test]
    fn global_scope_authorizes_every_context() {
        let signer = Signer::global(hash(9));
        let contexts = [
            CallContext::new(hash(1), hash(2), hash(3)),
            CallContext::new(hash(9), hash(9), hash(9)),
            CallContext::default(),
        ];
        for ctx in contexts {
            assert!(signer.authorizes(&ctx));
        }
    }

    #[test]
    fn none_scope_authorizes_only_the_self_check() {
        let signer = Signer::with_none_scope(hash(9));
        // The signer's own account script is executing.
        assert!(signer.authorizes(&CallContext::new(hash(9), hash(1), hash(2))));
        // Any other current script, even one called by the account.
        assert!(!signer.authorizes(&CallContext::new(hash(8), hash(9), hash(9))));
    }

    #[test]
    fn called_by_entry_scope() {
        let signer = Signer::called_by_entry(hash(9));
        // Calling contract is the entry script.
        assert!(signer.authorizes(&CallContext::new(hash(2), hash(1), hash(1))));
        // Current contract is the entry script itself.
        assert!(signer.authorizes(&CallContext::new(hash(1), hash(0), hash(1))));
        // Two levels below the entry script.
        assert!(!signer.authorizes(&CallContext::new(hash(3), hash(2), hash(1))));
    }

    #[test]
    fn custom_contracts_scope() {
        let signer = Signer {
            scopes: WitnessScope::CUSTOM_CONTRACTS,
            allowed_contracts: vec![hash(7)],
            ..Signer::with_none_scope(hash(9))
        };
        assert!(signer.authorizes(&CallContext::new(hash(7), hash(1), hash(2))));
        assert!(!signer.authorizes(&CallContext::new(hash(8), hash(1), hash(2))));
    }

    #[test]
    fn custom_groups_scope_consults_manifest() {
        let allowed = test_keys::key(test_keys::GENERATOR);
        let other = test_keys::key(test_keys::GENERATOR_NEG);
        let signer = Signer {
            scopes: WitnessScope::CUSTOM_GROUPS,
            allowed_groups: vec![allowed],
            ..Signer::with_none_scope(hash(9))
        };

        let matching =
            CallContext::new(hash(7), hash(1), hash(2)).with_groups(hash(7), vec![allowed]);
        assert!(signer.authorizes(&matching));

        let disjoint =
            CallContext::new(hash(7), hash(1), hash(2)).with_groups(hash(7), vec![other]);
        assert!(!signer.authorizes(&disjoint));
    }

    #[test]
    fn allow_rule_grants_when_other_flags_miss() {
        let signer = Signer {
            scopes: WitnessScope::CUSTOM_CONTRACTS | WitnessScope::WITNESS_RULES,
            allowed_contracts: vec![hash(42)],
            rules: vec![WitnessRule {
                action: WitnessRuleAction::Allow,
                condition: WitnessCondition::ScriptHash { hash: hash(7) },
            }],
            ..Signer::with_none_scope(hash(9))
        };
        // Not in the allowed contracts, but the rule matches.
        assert!(signer.authorizes(&CallContext::new(hash(7), hash(1), hash(2))));
    }

    #[test]
    fn deny_rule_does_not_revoke_a_flag_grant() {
        let signer = Signer {
            scopes: WitnessScope::CALLED_BY_ENTRY | WitnessScope::WITNESS_RULES,
            rules: vec![WitnessRule {
                action: WitnessRuleAction::Deny,
                condition: WitnessCondition::Boolean { expression: true },
            }],
            ..Signer::with_none_scope(hash(9))
        };
        // CalledByEntry grants; the always-matching deny rule only settles
        // the rules clause.
        assert!(signer.authorizes(&CallContext::new(hash(2), hash(1), hash(1))));
        // Without a flag grant the deny rule decides.
        assert!(!signer.authorizes(&CallContext::new(hash(3), hash(2), hash(1))));
    }

    #[test]
    fn first_matching_rule_decides() {
        let signer = Signer {
            scopes: WitnessScope::WITNESS_RULES,
            rules: vec![
                WitnessRule {
                    action: WitnessRuleAction::Deny,
                    condition: WitnessCondition::ScriptHash { hash: hash(7) },
                },
                WitnessRule {
                    action: WitnessRuleAction::Allow,
                    condition: WitnessCondition::Boolean { expression: true },
                },
            ],
            ..Signer::with_none_scope(hash(9))
        };
        assert!(!signer.authorizes(&CallContext::new(hash(7), hash(1), hash(2))));
        assert!(signer.authorizes(&CallContext::new(hash(8), hash(1), hash(2))));
    }

    #[test]
    fn wire_shape_gates_lists_on_scope_flags() {
        let signer = Signer {
            scopes: WitnessScope::CALLED_BY_ENTRY | WitnessScope::CUSTOM_CONTRACTS,
            allowed_contracts: vec![hash(1), hash(2)],
            ..Signer::with_none_scope(hash(9))
        };
        let bytes = signer.to_bytes();
        // account(20) ∥ scope(1) ∥ var_int(2) ∥ 2 × hash(20).
        assert_eq!(bytes.len(), 20 + 1 + 1 + 40);
        assert_eq!(Signer::from_bytes(&bytes).expect("round trip"), signer);
    }

    #[test]
    fn decode_rejects_global_with_other_flags() {
        let mut bytes = Signer::global(hash(9)).to_bytes();
        bytes[20] = 0x81;
        assert!(Signer::from_bytes(&bytes).is_err());
    }

    #[test]
    fn decode_rejects_reserved_scope_bits() {
        let mut bytes = Signer::with_none_scope(hash(9)).to_bytes();
        bytes[20] = 0x04;
        assert!(Signer::from_bytes(&bytes).is_err());
    }

    #[test]
    fn validate_rejects_list_without_gating_flag() {
        let signer = Signer {
            allowed_contracts: vec![hash(1)],
            ..Signer::with_none_scope(hash(9))
        };
        assert!(signer.validate().is_err());
    }

    #[test]
    fn validate_rejects_populated_global_signer() {
        let signer = Signer {
            scopes: WitnessScope::GLOBAL,
            rules: vec![WitnessRule {
                action: WitnessRuleAction::Allow,
                condition: WitnessCondition::CalledByEntry,
            }],
            ..Signer::with_none_scope(hash(9))
        };
        assert!(signer.validate().is_err());
    }

    #[test]
    fn json_round_trip_with_canonical_keys() {
        let signer = Signer {
            scopes: WitnessScope::CUSTOM_CONTRACTS | WitnessScope::WITNESS_RULES,
            allowed_contracts: vec![hash(7)],
            rules: vec![WitnessRule {
                action: WitnessRuleAction::Allow,
                condition: WitnessCondition::CalledByEntry,
            }],
            ..Signer::with_none_scope(hash(9))
        };
        let json = signer.to_json().expect("serialize");
        assert_eq!(json["scopes"], "CustomContracts, WitnessRules");
        assert!(json["allowedcontracts"].is_array());
        assert!(json.get("allowedgroups").is_none());
        assert_eq!(Signer::from_json(&json).expect("round trip"), signer);
    }

    #[test]
    fn json_list_without_flag_is_rejected() {
        let json = serde_json::json!({
            "account": hash(9).to_string(),
            "scopes": "CalledByEntry",
            "allowedcontracts": [hash(1).to_string()],
        });
        assert!(Signer::from_json(&json).is_err());
    }
}
