mod condition;
mod hash;
mod public_key;
mod rule;
mod scope;
mod signer;
mod transaction;
mod witness;

pub mod attributes;

pub use attributes::{OracleResponseCode, TransactionAttribute, TransactionAttributeType};
pub use condition::{MAX_NESTING_DEPTH, MAX_SUBITEMS, WitnessCondition};
pub use hash::{Hash160, Hash256};
pub use public_key::{COMPRESSED_KEY_LEN, PublicKey};
pub use rule::{WitnessRule, WitnessRuleAction};
pub use scope::WitnessScope;
pub use signer::Signer;
pub use transaction::{Transaction, MAX_TRANSACTION_SCRIPT};
pub use witness::{MAX_INVOCATION_SCRIPT, MAX_VERIFICATION_SCRIPT, Witness};
