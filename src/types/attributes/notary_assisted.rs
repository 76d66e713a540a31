use serde::{Deserialize, Serialize};

use crate::codec::{BinaryReader, BinaryWriter, Decodable, Encodable};
use crate::errors::CoreResult;
use crate::settings::ProtocolSettings;
use crate::verification::ChainViews;

/// Requests completion by the notary service with up to `n_keys`
/// co-signers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotaryAssisted {
    #[serde(rename = "nkeys")]
    pub n_keys: u8,
}

impl NotaryAssisted {
    pub fn verify(&self, settings: &ProtocolSettings) -> bool {
        settings.notary_enabled && self.n_keys <= settings.max_notary_keys
    }

    /// One service fee per co-signer key plus one for the notary itself.
    pub fn network_fee(&self, _views: &ChainViews<'_>, settings: &ProtocolSettings) -> i64 {
        (i64::from(self.n_keys) + 1) * settings.notary_service_fee
    }
}

impl Encodable for NotaryAssisted {
    fn encode(&self, writer: &mut BinaryWriter) {
        writer.write_u8(self.n_keys);
    }
}

impl Decodable for NotaryAssisted {
    fn decode(reader: &mut BinaryReader<'_>) -> CoreResult<Self> {
        Ok(Self {
            n_keys: reader.read_u8()?,
        })
    }
}
