//! Typed transaction attributes.
//!
//! Attributes form a closed family keyed by a one-byte type tag. The
//! tag→descriptor registry below is the single wiring point: adding an
//! attribute means one variant file plus one registry row, and nothing
//! else in the system learns about its internals. Each variant contributes
//! a consensus-time `verify` predicate and an additive network-fee hook.

mod conflicts;
mod high_priority;
mod not_valid_before;
mod notary_assisted;
mod oracle_response;

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub use conflicts::Conflicts;
pub use high_priority::HighPriority;
pub use not_valid_before::NotValidBefore;
pub use notary_assisted::NotaryAssisted;
pub use oracle_response::{OracleResponse, OracleResponseCode, MAX_ORACLE_RESULT};

use crate::codec::{BinaryReader, BinaryWriter, Decodable, Encodable};
use crate::errors::{CoreError, CoreResult};
use crate::settings::ProtocolSettings;
use crate::types::transaction::Transaction;
use crate::verification::ChainViews;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransactionAttributeType {
    HighPriority,
    OracleResponse,
    NotValidBefore,
    Conflicts,
    NotaryAssisted,
}

impl TransactionAttributeType {
    pub fn tag(self) -> u8 {
        match self {
            Self::HighPriority => 0x01,
            Self::OracleResponse => 0x11,
            Self::NotValidBefore => 0x20,
            Self::Conflicts => 0x21,
            Self::NotaryAssisted => 0x22,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::HighPriority => "HighPriority",
            Self::OracleResponse => "OracleResponse",
            Self::NotValidBefore => "NotValidBefore",
            Self::Conflicts => "Conflicts",
            Self::NotaryAssisted => "NotaryAssisted",
        }
    }
}

pub struct AttributeDescriptor {
    pub attribute_type: TransactionAttributeType,
    pub allow_multiple: bool,
    decode: fn(&mut BinaryReader<'_>) -> CoreResult<TransactionAttribute>,
}

static REGISTRY: Lazy<BTreeMap<u8, AttributeDescriptor>> = Lazy::new(|| {
    let rows = [
        AttributeDescriptor {
            attribute_type: TransactionAttributeType::HighPriority,
            allow_multiple: false,
            decode: |_| Ok(TransactionAttribute::HighPriority(HighPriority {})),
        },
        AttributeDescriptor {
            attribute_type: TransactionAttributeType::OracleResponse,
            allow_multiple: false,
            decode: |reader| {
                Ok(TransactionAttribute::OracleResponse(
                    OracleResponse::decode(reader)?,
                ))
            },
        },
        AttributeDescriptor {
            attribute_type: TransactionAttributeType::NotValidBefore,
            allow_multiple: false,
            decode: |reader| {
                Ok(TransactionAttribute::NotValidBefore(
                    NotValidBefore::decode(reader)?,
                ))
            },
        },
        AttributeDescriptor {
            attribute_type: TransactionAttributeType::Conflicts,
            allow_multiple: true,
            decode: |reader| {
                Ok(TransactionAttribute::Conflicts(Conflicts::decode(reader)?))
            },
        },
        AttributeDescriptor {
            attribute_type: TransactionAttributeType::NotaryAssisted,
            allow_multiple: false,
            decode: |reader| {
                Ok(TransactionAttribute::NotaryAssisted(
                    NotaryAssisted::decode(reader)?,
                ))
            },
        },
    ];
    rows.into_iter()
        .map(|row| (row.attribute_type.tag(), row))
        .collect()
});

/// Looks up the registry row for a wire tag.
pub fn descriptor(tag: u8) -> Option<&'static AttributeDescriptor> {
    REGISTRY.get(&tag)
}

/// Enforces the at-most-one rule for attribute types that do not allow
/// multiple instances.
pub fn check_cardinality(attributes: &[TransactionAttribute]) -> CoreResult<()> {
    let mut seen = BTreeSet::new();
    for attribute in attributes {
        let attribute_type = attribute.attribute_type();
        if !attribute.allow_multiple() && !seen.insert(attribute_type) {
            return Err(CoreError::Format(format!(
                "multiple {} attributes are not permitted",
                attribute_type.name()
            )));
        }
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransactionAttribute {
    HighPriority(HighPriority),
    OracleResponse(OracleResponse),
    NotValidBefore(NotValidBefore),
    Conflicts(Conflicts),
    NotaryAssisted(NotaryAssisted),
}

impl TransactionAttribute {
    pub fn attribute_type(&self) -> TransactionAttributeType {
        match self {
            Self::HighPriority(_) => TransactionAttributeType::HighPriority,
            Self::OracleResponse(_) => TransactionAttributeType::OracleResponse,
            Self::NotValidBefore(_) => TransactionAttributeType::NotValidBefore,
            Self::Conflicts(_) => TransactionAttributeType::Conflicts,
            Self::NotaryAssisted(_) => TransactionAttributeType::NotaryAssisted,
        }
    }

    pub fn allow_multiple(&self) -> bool {
        descriptor(self.attribute_type().tag())
            .map(|row| row.allow_multiple)
            .unwrap_or(false)
    }

    /// Consensus-time predicate against the chain views. A `false` here is
    /// a policy failure of the transaction, not an error.
    pub fn verify(
        &self,
        views: &ChainViews<'_>,
        tx: &Transaction,
        settings: &ProtocolSettings,
    ) -> bool {
        match self {
            Self::HighPriority(attr) => attr.verify(views, tx),
            Self::OracleResponse(attr) => attr.verify(views),
            Self::NotValidBefore(attr) => attr.verify(views),
            Self::Conflicts(attr) => attr.verify(views),
            Self::NotaryAssisted(attr) => attr.verify(settings),
        }
    }

    /// Additive network-fee contribution of this attribute, priced against
    /// the same chain views the verification pass reads.
    pub fn network_fee(
        &self,
        views: &ChainViews<'_>,
        tx: &Transaction,
        settings: &ProtocolSettings,
    ) -> i64 {
        match self {
            Self::Conflicts(attr) => attr.network_fee(views, tx, settings),
            Self::NotaryAssisted(attr) => attr.network_fee(views, settings),
            _ => 0,
        }
    }
}

impl Encodable for TransactionAttribute {
    fn encode(&self, writer: &mut BinaryWriter) {
        writer.write_u8(self.attribute_type().tag());
        match self {
            Self::HighPriority(_) => {}
            Self::OracleResponse(attr) => attr.encode(writer),
            Self::NotValidBefore(attr) => attr.encode(writer),
            Self::Conflicts(attr) => attr.encode(writer),
            Self::NotaryAssisted(attr) => attr.encode(writer),
        }
    }
}

impl Decodable for TransactionAttribute {
    fn decode(reader: &mut BinaryReader<'_>) -> CoreResult<Self> {
        let tag = reader.read_u8()?;
        let row = descriptor(tag)
            .ok_or_else(|| CoreError::Format(format!("unknown attribute type {tag:#04x}")))?;
        (row.decode)(reader)
    }
}
