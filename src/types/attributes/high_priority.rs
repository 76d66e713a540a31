use serde::{Deserialize, Serialize};

use crate::types::transaction::Transaction;
use crate::verification::ChainViews;

/// Marks a transaction for priority ordering. Only the committee may use
/// it, so verification pins the fee payer to the committee set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighPriority {}

impl HighPriority {
    pub fn verify(&self, views: &ChainViews<'_>, tx: &Transaction) -> bool {
        views.committee.is_committee_member(&tx.sender())
    }
}
