//! Witness records: the invocation/verification script pair attached to a
//! transaction, one per signer, paired by position.

use serde::{Deserialize, Serialize};

use crate::codec::{base64_bytes, BinaryReader, BinaryWriter, Decodable, Encodable};
use crate::errors::{CoreError, CoreResult};
use crate::types::hash::Hash160;

/// Upper bound on the invocation script, sized for a committee-scale
/// multisig invocation.
pub const MAX_INVOCATION_SCRIPT: usize = 1024;

/// Upper bound on the verification script, sized for a committee-scale
/// multisig contract.
pub const MAX_VERIFICATION_SCRIPT: usize = 1024;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    /// Pushes the runtime arguments (typically signatures) for the
    /// verification script.
    #[serde(rename = "invocation", with = "base64_bytes")]
    pub invocation_script: Vec<u8>,
    /// The program whose hash is the witnessed account; executed by the VM
    /// with the invocation output as its initial stack.
    #[serde(rename = "verification", with = "base64_bytes")]
    pub verification_script: Vec<u8>,
}

impl Witness {
    pub fn new(invocation_script: Vec<u8>, verification_script: Vec<u8>) -> Self {
        Self {
            invocation_script,
            verification_script,
        }
    }

    /// The account identity bound to this witness.
    pub fn script_hash(&self) -> Hash160 {
        Hash160::from_script(&self.verification_script)
    }
}

impl Encodable for Witness {
    fn encode(&self, writer: &mut BinaryWriter) {
        writer.write_var_bytes(&self.invocation_script);
        writer.write_var_bytes(&self.verification_script);
    }
}

impl Decodable for Witness {
    fn decode(reader: &mut BinaryReader<'_>) -> CoreResult<Self> {
        let invocation_script = reader
            .read_var_bytes(MAX_INVOCATION_SCRIPT)
            .map_err(|err| CoreError::Format(format!("invocation script: {err}")))?;
        let verification_script = reader
            .read_var_bytes(MAX_VERIFICATION_SCRIPT)
            .map_err(|err| CoreError::Format(format!("verification script: {err}")))?;
        Ok(Self {
            invocation_script,
            verification_script,
        })
    }
}
