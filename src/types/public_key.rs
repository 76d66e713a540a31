//! Compressed secp256r1 public keys.
//!
//! Keys are carried and compared in their 33-byte compressed encoding
//! (`0x02`/`0x03 ∥ X`), which is also the consensus ordering used for
//! group membership checks. Construction validates that the encoding is a
//! point on the curve.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{BinaryReader, BinaryWriter, Decodable, Encodable};
use crate::errors::{CoreError, CoreResult};
use crate::types::hash::Hash160;

pub const COMPRESSED_KEY_LEN: usize = 33;

const OP_PUSHDATA1: u8 = 0x0c;
const OP_CHECKSIG: u8 = 0x41;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    encoded: [u8; COMPRESSED_KEY_LEN],
}

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        let encoded: [u8; COMPRESSED_KEY_LEN] = bytes.try_into().map_err(|_| {
            CoreError::Crypto(format!(
                "public key must be {COMPRESSED_KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        if encoded[0] != 0x02 && encoded[0] != 0x03 {
            return Err(CoreError::Crypto(format!(
                "invalid compressed point prefix {:#04x}",
                encoded[0]
            )));
        }
        p256::PublicKey::from_sec1_bytes(&encoded)
            .map_err(|err| CoreError::Crypto(format!("point is not on secp256r1: {err}")))?;
        Ok(Self { encoded })
    }

    pub fn as_bytes(&self) -> &[u8; COMPRESSED_KEY_LEN] {
        &self.encoded
    }

    /// The single-signature verification script binding this key:
    /// `PUSHDATA1 ∥ 0x21 ∥ key ∥ CHECKSIG`.
    pub fn verification_script(&self) -> Vec<u8> {
        let mut script = Vec::with_capacity(2 + COMPRESSED_KEY_LEN + 1);
        script.push(OP_PUSHDATA1);
        script.push(COMPRESSED_KEY_LEN as u8);
        script.extend_from_slice(&self.encoded);
        script.push(OP_CHECKSIG);
        script
    }

    /// Script hash of the signature contract, i.e. the account this key
    /// controls.
    pub fn to_script_hash(&self) -> Hash160 {
        Hash160::from_script(&self.verification_script())
    }
}

impl Ord for PublicKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.encoded.cmp(&other.encoded)
    }
}

impl PartialOrd for PublicKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.encoded))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

impl FromStr for PublicKey {
    type Err = CoreError;

    fn from_str(value: &str) -> CoreResult<Self> {
        let decoded = hex::decode(value)
            .map_err(|err| CoreError::Crypto(format!("invalid public key hex: {err}")))?;
        Self::from_bytes(&decoded)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(D::Error::custom)
    }
}

impl Encodable for PublicKey {
    fn encode(&self, writer: &mut BinaryWriter) {
        writer.write_bytes(&self.encoded);
    }
}

impl Decodable for PublicKey {
    fn decode(reader: &mut BinaryReader<'_>) -> CoreResult<Self> {
        let bytes = reader.read_exact::<COMPRESSED_KEY_LEN>()?;
        // Malformed key material in a consensus message is a format error,
        // not a crypto failure of the local node.
        Self::from_bytes(&bytes).map_err(|err| CoreError::Format(err.to_string()))
    }
}
