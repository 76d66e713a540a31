//! Attribute verification entry points and the read-only chain views they
//! consume.
//!
//! The views are narrow on purpose: each trait is one question the core
//! asks of a collaborator, answered against a snapshot that stays
//! consistent for the duration of one transaction's verification. Policy
//! failures surface as [`VerificationResult::Invalid`], never as errors.

use tracing::warn;

use crate::settings::ProtocolSettings;
use crate::types::attributes::check_cardinality;
use crate::types::{Hash160, Hash256, Transaction};

pub trait LedgerView {
    fn contains_transaction(&self, hash: &Hash256) -> bool;
}

pub trait CommitteeView {
    fn is_committee_member(&self, account: &Hash160) -> bool;
}

pub trait OracleState {
    fn has_pending_request(&self, id: u64) -> bool;
}

pub trait Clock {
    fn current_height(&self) -> u32;
}

/// The chain views an attribute verification pass reads from.
pub struct ChainViews<'a> {
    pub ledger: &'a dyn LedgerView,
    pub committee: &'a dyn CommitteeView,
    pub oracle: &'a dyn OracleState,
    pub clock: &'a dyn Clock,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationResult {
    Valid,
    Invalid(String),
}

impl VerificationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Runs the consensus-time attribute checks: per-type cardinality, the
/// settings-level attribute budget, then each attribute's own predicate in
/// transaction order.
pub fn verify_attributes(
    tx: &Transaction,
    views: &ChainViews<'_>,
    settings: &ProtocolSettings,
) -> VerificationResult {
    if tx.attributes.len() > settings.max_transaction_attributes {
        return invalid(format!(
            "{} attributes exceed the permitted {}",
            tx.attributes.len(),
            settings.max_transaction_attributes
        ));
    }
    if let Err(err) = check_cardinality(&tx.attributes) {
        return invalid(err.to_string());
    }
    for attribute in &tx.attributes {
        if !attribute.verify(views, tx, settings) {
            return invalid(format!(
                "{} attribute failed verification",
                attribute.attribute_type().name()
            ));
        }
    }
    VerificationResult::Valid
}

/// Sums the attribute contributions to the transaction's network fee.
pub fn attribute_network_fee(
    tx: &Transaction,
    views: &ChainViews<'_>,
    settings: &ProtocolSettings,
) -> i64 {
    tx.attributes
        .iter()
        .map(|attribute| attribute.network_fee(views, tx, settings))
        .sum()
}

fn invalid(reason: String) -> VerificationResult {
    warn!(%reason, "transaction attributes rejected");
    VerificationResult::Invalid(reason)
}
