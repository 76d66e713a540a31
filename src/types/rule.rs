//! Allow/deny wrapper over a witness condition.

use serde::{Deserialize, Serialize};

use crate::codec::{BinaryReader, BinaryWriter, Decodable, Encodable};
use crate::errors::{CoreError, CoreResult};
use crate::types::condition::WitnessCondition;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WitnessRuleAction {
    Deny,
    Allow,
}

impl WitnessRuleAction {
    fn to_byte(self) -> u8 {
        match self {
            Self::Deny => 0x00,
            Self::Allow => 0x01,
        }
    }

    fn from_byte(value: u8) -> CoreResult<Self> {
        match value {
            0x00 => Ok(Self::Deny),
            0x01 => Ok(Self::Allow),
            other => Err(CoreError::Format(format!(
                "invalid witness rule action {other:#04x}"
            ))),
        }
    }
}

/// One entry of a signer's rule list. The first rule whose condition holds
/// at the call site decides: `Allow` grants, `Deny` refuses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessRule {
    pub action: WitnessRuleAction,
    pub condition: WitnessCondition,
}

impl Encodable for WitnessRule {
    fn encode(&self, writer: &mut BinaryWriter) {
        writer.write_u8(self.action.to_byte());
        self.condition.encode(writer);
    }
}

impl Decodable for WitnessRule {
    fn decode(reader: &mut BinaryReader<'_>) -> CoreResult<Self> {
        let action = WitnessRuleAction::from_byte(reader.read_u8()?)?;
        let condition = WitnessCondition::decode(reader)?;
        Ok(Self { action, condition })
    }
}
