use serde::{Deserialize, Serialize};

use crate::codec::{BinaryReader, BinaryWriter, Decodable, Encodable};
use crate::errors::CoreResult;
use crate::settings::ProtocolSettings;
use crate::types::hash::Hash256;
use crate::types::transaction::Transaction;
use crate::verification::ChainViews;

/// Declares that this transaction conflicts with another candidate; at most
/// one of the two can be accepted. Valid only while the referenced
/// transaction is NOT on chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflicts {
    pub hash: Hash256,
}

impl Conflicts {
    pub fn verify(&self, views: &ChainViews<'_>) -> bool {
        !views.ledger.contains_transaction(&self.hash)
    }

    /// Each conflict record is paid for once per signer, so stuffing a
    /// transaction with conflict markers scales in price with the witnesses
    /// it carries.
    pub fn network_fee(
        &self,
        _views: &ChainViews<'_>,
        tx: &Transaction,
        settings: &ProtocolSettings,
    ) -> i64 {
        tx.signers.len() as i64 * settings.base_attribute_fee
    }
}

impl Encodable for Conflicts {
    fn encode(&self, writer: &mut BinaryWriter) {
        self.hash.encode(writer);
    }
}

impl Decodable for Conflicts {
    fn decode(reader: &mut BinaryReader<'_>) -> CoreResult<Self> {
        Ok(Self {
            hash: Hash256::decode(reader)?,
        })
    }
}
