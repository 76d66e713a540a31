//! Fixed-width hash identities.
//!
//! `Hash160` identifies a verification script (and thereby an account);
//! `Hash256` identifies a transaction. Both are little-endian on the wire
//! and render as `0x`-prefixed big-endian lowercase hex, so the string form
//! reverses the stored byte order.

use std::fmt;
use std::str::FromStr;

use ripemd::Ripemd160;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::codec::{BinaryReader, BinaryWriter, Decodable, Encodable};
use crate::errors::{CoreError, CoreResult};

const CHECKSUM_LEN: usize = 4;

macro_rules! fixed_hash {
    ($name:ident, $size:expr, $label:expr) => {
        #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name([u8; $size]);

        impl $name {
            pub const LEN: usize = $size;

            pub fn zero() -> Self {
                Self([0u8; $size])
            }

            /// Wraps wire-order (little-endian) bytes.
            pub fn from_le_bytes(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }

            pub fn from_slice(bytes: &[u8]) -> CoreResult<Self> {
                let arr: [u8; $size] = bytes.try_into().map_err(|_| {
                    CoreError::Format(format!(
                        concat!($label, " must be {} bytes, got {}"),
                        $size,
                        bytes.len()
                    ))
                })?;
                Ok(Self(arr))
            }

            pub fn as_le_bytes(&self) -> &[u8; $size] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; $size]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut reversed = self.0;
                reversed.reverse();
                write!(f, "0x{}", hex::encode(reversed))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(value: &str) -> CoreResult<Self> {
                let stripped = value.strip_prefix("0x").unwrap_or(value);
                let decoded = hex::decode(stripped).map_err(|err| {
                    CoreError::Format(format!(concat!("invalid ", $label, " hex: {}"), err))
                })?;
                let mut hash = Self::from_slice(&decoded)?;
                hash.0.reverse();
                Ok(hash)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                value.parse().map_err(D::Error::custom)
            }
        }

        impl Encodable for $name {
            fn encode(&self, writer: &mut BinaryWriter) {
                writer.write_bytes(&self.0);
            }
        }

        impl Decodable for $name {
            fn decode(reader: &mut BinaryReader<'_>) -> CoreResult<Self> {
                Ok(Self(reader.read_exact::<$size>()?))
            }
        }
    };
}

fixed_hash!(Hash160, 20, "script hash");
fixed_hash!(Hash256, 32, "transaction hash");

impl Hash160 {
    /// Script-hash derivation: RIPEMD160 over SHA256 of the script.
    pub fn from_script(script: &[u8]) -> Self {
        let sha = Sha256::digest(script);
        let ripemd = Ripemd160::digest(sha);
        let mut bytes = [0u8; Self::LEN];
        bytes.copy_from_slice(&ripemd);
        Self(bytes)
    }

    /// Renders `version ∥ hash ∥ checksum4` as lowercase hex, where the
    /// checksum is the first four bytes of a double SHA256 over the
    /// versioned payload.
    pub fn to_address(&self, version: u8) -> String {
        let mut payload = Vec::with_capacity(1 + Self::LEN + CHECKSUM_LEN);
        payload.push(version);
        payload.extend_from_slice(&self.0);
        let checksum = Hash256::double_sha256(&payload);
        payload.extend_from_slice(&checksum.as_le_bytes()[..CHECKSUM_LEN]);
        hex::encode(payload)
    }

    pub fn from_address(address: &str, version: u8) -> CoreResult<Self> {
        let decoded = hex::decode(address)
            .map_err(|err| CoreError::Format(format!("invalid address encoding: {err}")))?;
        if decoded.len() != 1 + Self::LEN + CHECKSUM_LEN {
            return Err(CoreError::Format(format!(
                "invalid address length {}",
                decoded.len()
            )));
        }
        if decoded[0] != version {
            return Err(CoreError::Format(format!(
                "address version {:#04x} does not match expected {version:#04x}",
                decoded[0]
            )));
        }
        let (payload, checksum) = decoded.split_at(1 + Self::LEN);
        let expected = Hash256::double_sha256(payload);
        if checksum != &expected.as_le_bytes()[..CHECKSUM_LEN] {
            return Err(CoreError::Format("address checksum mismatch".to_string()));
        }
        Self::from_slice(&payload[1..])
    }
}

impl Hash256 {
    pub fn double_sha256(data: &[u8]) -> Self {
        let first = Sha256::digest(data);
        let second = Sha256::digest(first);
        let mut bytes = [0u8; Self::LEN];
        bytes.copy_from_slice(&second);
        Self(bytes)
    }
}
