use serde::{Deserialize, Serialize};

use crate::codec::{base64_bytes, BinaryReader, BinaryWriter, Decodable, Encodable};
use crate::errors::{CoreError, CoreResult};
use crate::verification::ChainViews;

/// Upper bound on an oracle result payload.
pub const MAX_ORACLE_RESULT: usize = 0xffff;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OracleResponseCode {
    Success,
    ProtocolNotSupported,
    ConsensusUnreachable,
    NotFound,
    Timeout,
    Forbidden,
    ResponseTooLarge,
    InsufficientFunds,
    ContentTypeNotSupported,
    Error,
}

impl OracleResponseCode {
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Success => 0x00,
            Self::ProtocolNotSupported => 0x10,
            Self::ConsensusUnreachable => 0x12,
            Self::NotFound => 0x14,
            Self::Timeout => 0x16,
            Self::Forbidden => 0x18,
            Self::ResponseTooLarge => 0x1a,
            Self::InsufficientFunds => 0x1c,
            Self::ContentTypeNotSupported => 0x1f,
            Self::Error => 0xff,
        }
    }

    pub fn from_byte(value: u8) -> CoreResult<Self> {
        match value {
            0x00 => Ok(Self::Success),
            0x10 => Ok(Self::ProtocolNotSupported),
            0x12 => Ok(Self::ConsensusUnreachable),
            0x14 => Ok(Self::NotFound),
            0x16 => Ok(Self::Timeout),
            0x18 => Ok(Self::Forbidden),
            0x1a => Ok(Self::ResponseTooLarge),
            0x1c => Ok(Self::InsufficientFunds),
            0x1f => Ok(Self::ContentTypeNotSupported),
            0xff => Ok(Self::Error),
            other => Err(CoreError::Format(format!(
                "invalid oracle response code {other:#04x}"
            ))),
        }
    }
}

/// Carries the oracle network's answer for an outstanding request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleResponse {
    pub id: u64,
    pub code: OracleResponseCode,
    #[serde(with = "base64_bytes")]
    pub result: Vec<u8>,
}

impl OracleResponse {
    pub fn verify(&self, views: &ChainViews<'_>) -> bool {
        views.oracle.has_pending_request(self.id)
    }
}

impl Encodable for OracleResponse {
    fn encode(&self, writer: &mut BinaryWriter) {
        writer.write_u64(self.id);
        writer.write_u8(self.code.to_byte());
        writer.write_var_bytes(&self.result);
    }
}

impl Decodable for OracleResponse {
    fn decode(reader: &mut BinaryReader<'_>) -> CoreResult<Self> {
        let id = reader.read_u64()?;
        let code = OracleResponseCode::from_byte(reader.read_u8()?)?;
        let result = reader.read_var_bytes(MAX_ORACLE_RESULT)?;
        if code != OracleResponseCode::Success && !result.is_empty() {
            return Err(CoreError::Format(
                "oracle result must be empty unless the response succeeded".to_string(),
            ));
        }
        Ok(Self { id, code, result })
    }
}
