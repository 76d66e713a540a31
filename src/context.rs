//! Execution-context view consumed by the authorization evaluators.

use std::collections::HashMap;

use crate::types::{Hash160, PublicKey};

/// Read-only view of the call site at which a witness is being checked.
///
/// Implemented by the VM integration over its live call stack; the
/// evaluators never mutate through it. Contract manifest groups come from
/// the ledger's contract store; an unknown contract yields an empty set.
pub trait ContextView {
    fn current_script_hash(&self) -> Hash160;

    fn calling_script_hash(&self) -> Hash160;

    fn entry_script_hash(&self) -> Hash160;

    fn lookup_contract_groups(&self, contract: &Hash160) -> Vec<PublicKey>;
}

/// Plain-value [`ContextView`] for embedders without a live VM and for
/// tests.
#[derive(Clone, Debug, Default)]
pub struct CallContext {
    pub current: Hash160,
    pub calling: Hash160,
    pub entry: Hash160,
    manifest_groups: HashMap<Hash160, Vec<PublicKey>>,
}

impl CallContext {
    pub fn new(current: Hash160, calling: Hash160, entry: Hash160) -> Self {
        Self {
            current,
            calling,
            entry,
            manifest_groups: HashMap::new(),
        }
    }

    pub fn with_groups(mut self, contract: Hash160, groups: Vec<PublicKey>) -> Self {
        self.manifest_groups.insert(contract, groups);
        self
    }
}

impl ContextView for CallContext {
    fn current_script_hash(&self) -> Hash160 {
        self.current
    }

    fn calling_script_hash(&self) -> Hash160 {
        self.calling
    }

    fn entry_script_hash(&self) -> Hash160 {
        self.entry
    }

    fn lookup_contract_groups(&self, contract: &Hash160) -> Vec<PublicKey> {
        self.manifest_groups.get(contract).cloned().unwrap_or_default()
    }
}
