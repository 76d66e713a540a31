use serde::{Deserialize, Serialize};

use crate::codec::{BinaryReader, BinaryWriter, Decodable, Encodable};
use crate::errors::CoreResult;
use crate::verification::ChainViews;

/// Defers validity until the chain reaches the given height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotValidBefore {
    pub height: u32,
}

impl NotValidBefore {
    pub fn verify(&self, views: &ChainViews<'_>) -> bool {
        views.clock.current_height() >= self.height
    }
}

impl Encodable for NotValidBefore {
    fn encode(&self, writer: &mut BinaryWriter) {
        writer.write_u32(self.height);
    }
}

impl Decodable for NotValidBefore {
    fn decode(reader: &mut BinaryReader<'_>) -> CoreResult<Self> {
        Ok(Self {
            height: reader.read_u32()?,
        })
    }
}
