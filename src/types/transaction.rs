//! Transaction container for the authorization core.
//!
//! Carries exactly what witness checking needs: the signer list (first
//! signer pays the network fee and is the transaction sender), the typed
//! attributes, the entry script, and one witness per signer paired by
//! position.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::codec::{base64_bytes, BinaryReader, BinaryWriter, Decodable, Encodable};
use crate::errors::{CoreError, CoreResult};
use crate::types::attributes::{check_cardinality, TransactionAttribute};
use crate::types::condition::MAX_SUBITEMS;
use crate::types::hash::{Hash160, Hash256};
use crate::types::signer::Signer;
use crate::types::witness::Witness;

/// Upper bound on the entry script carried by a transaction.
pub const MAX_TRANSACTION_SCRIPT: usize = 0xffff;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u8,
    pub nonce: u32,
    #[serde(rename = "sysfee")]
    pub system_fee: i64,
    #[serde(rename = "netfee")]
    pub network_fee: i64,
    #[serde(rename = "validuntilblock")]
    pub valid_until_block: u32,
    pub signers: Vec<Signer>,
    pub attributes: Vec<TransactionAttribute>,
    #[serde(with = "base64_bytes")]
    pub script: Vec<u8>,
    pub witnesses: Vec<Witness>,
}

impl Transaction {
    /// The fee payer: the first signer's account.
    pub fn sender(&self) -> Hash160 {
        self.signers
            .first()
            .map(|signer| signer.account)
            .unwrap_or_else(Hash160::zero)
    }

    /// Transaction identity: double SHA256 over the pre-witness bytes.
    pub fn hash(&self) -> Hash256 {
        Hash256::double_sha256(&self.unsigned_bytes())
    }

    /// The serialization covered by signatures: everything except the
    /// witness list.
    pub fn unsigned_bytes(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        self.encode_unsigned(&mut writer);
        writer.into_bytes()
    }

    fn encode_unsigned(&self, writer: &mut BinaryWriter) {
        writer.write_u8(self.version);
        writer.write_u32(self.nonce);
        writer.write_i64(self.system_fee);
        writer.write_i64(self.network_fee);
        writer.write_u32(self.valid_until_block);
        writer.write_array(&self.signers);
        writer.write_array(&self.attributes);
        writer.write_var_bytes(&self.script);
    }

    /// Structural invariants shared by the wire decoder and in-memory
    /// builders.
    pub fn validate(&self) -> CoreResult<()> {
        if self.signers.is_empty() {
            return Err(CoreError::Format(
                "transaction must have at least one signer".to_string(),
            ));
        }
        let mut accounts = HashSet::new();
        for signer in &self.signers {
            signer.validate()?;
            if !accounts.insert(signer.account) {
                return Err(CoreError::Format(format!(
                    "duplicate signer account {}",
                    signer.account
                )));
            }
        }
        check_cardinality(&self.attributes)?;
        if self.script.is_empty() {
            return Err(CoreError::Format("transaction script is empty".to_string()));
        }
        if !self.witnesses.is_empty() {
            self.check_witness_pairing()?;
        }
        Ok(())
    }

    /// Witnesses pair with signers by position. Where the verification
    /// script is inline (not a deployed contract), its hash must be the
    /// paired signer's account; position zero binds the fee payer to the
    /// sender.
    fn check_witness_pairing(&self) -> CoreResult<()> {
        if self.witnesses.len() != self.signers.len() {
            return Err(CoreError::Format(format!(
                "{} witnesses for {} signers",
                self.witnesses.len(),
                self.signers.len()
            )));
        }
        for (signer, witness) in self.signers.iter().zip(&self.witnesses) {
            if !witness.verification_script.is_empty()
                && witness.script_hash() != signer.account
            {
                return Err(CoreError::Format(format!(
                    "witness script hash does not bind account {}",
                    signer.account
                )));
            }
        }
        Ok(())
    }
}

impl Encodable for Transaction {
    fn encode(&self, writer: &mut BinaryWriter) {
        self.encode_unsigned(writer);
        writer.write_array(&self.witnesses);
    }
}

impl Decodable for Transaction {
    fn decode(reader: &mut BinaryReader<'_>) -> CoreResult<Self> {
        let version = reader.read_u8()?;
        if version != 0 {
            return Err(CoreError::Format(format!(
                "unsupported transaction version {version}"
            )));
        }
        let nonce = reader.read_u32()?;
        let system_fee = reader.read_i64()?;
        let network_fee = reader.read_i64()?;
        if system_fee < 0 || network_fee < 0 {
            return Err(CoreError::Format("negative fee".to_string()));
        }
        let valid_until_block = reader.read_u32()?;
        let signers = reader.read_array::<Signer>(MAX_SUBITEMS)?;
        let attributes = reader.read_array::<TransactionAttribute>(MAX_SUBITEMS)?;
        let script = reader.read_var_bytes(MAX_TRANSACTION_SCRIPT)?;
        let witnesses = reader.read_array::<Witness>(MAX_SUBITEMS)?;
        let tx = Self {
            version,
            nonce,
            system_fee,
            network_fee,
            valid_until_block,
            signers,
            attributes,
            script,
            witnesses,
        };
        tx.validate()?;
        Ok(tx)
    }
}
