//! Witness authorization core for a blockchain node.
//!
//! The crate decides, during transaction verification, whether a set of
//! witnesses authorizes the side effects of a script execution. It owns the
//! signer model with its scope flags and rule language, the recursive
//! witness-condition evaluator, the typed transaction attributes with their
//! verification and fee hooks, and the binary and JSON codecs that define
//! all of these objects on the wire.
//!
//! Consumers construct objects through the codecs in [`codec`], evaluate
//! authorization with [`Signer::authorizes`] against a [`ContextView`]
//! supplied by the VM integration, and run [`verify_attributes`] /
//! [`attribute_network_fee`] against the read-only chain views in
//! [`verification`]. The evaluators are pure functions of their inputs and
//! re-entrant across transactions; every structural bound (nesting depth,
//! list caps, script sizes) is enforced while decoding, so adversarial
//! wire input cannot drive allocation or recursion past them.

pub mod codec;
pub mod context;
pub mod errors;
pub mod settings;
pub mod types;
pub mod verification;

pub use codec::{BinaryReader, BinaryWriter, Decodable, Encodable};
pub use context::{CallContext, ContextView};
pub use errors::{CoreError, CoreResult};
pub use settings::ProtocolSettings;
pub use types::{
    Hash160, Hash256, OracleResponseCode, PublicKey, Signer, Transaction, TransactionAttribute,
    TransactionAttributeType, Witness, WitnessCondition, WitnessRule, WitnessRuleAction,
    WitnessScope, MAX_NESTING_DEPTH, MAX_SUBITEMS,
};
pub use verification::{
    attribute_network_fee, verify_attributes, ChainViews, Clock, CommitteeView, LedgerView,
    OracleState, VerificationResult,
};
