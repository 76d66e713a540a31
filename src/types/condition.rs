//! Witness-condition predicate trees.
//!
//! A condition is a small closed predicate evaluated against the live call
//! site when a signer carries the `WitnessRules` scope. The tree is bounded
//! in both directions: composites hold at most [`MAX_SUBITEMS`] children and
//! the tree nests at most [`MAX_NESTING_DEPTH`] levels below the root, and
//! both bounds are enforced while decoding so adversarial input cannot make
//! the node recurse or allocate past them.

use serde::{Deserialize, Serialize};

use crate::codec::{BinaryReader, BinaryWriter, Decodable, Encodable};
use crate::context::ContextView;
use crate::errors::{CoreError, CoreResult};
use crate::types::hash::Hash160;
use crate::types::public_key::PublicKey;

/// Maximum number of children of an `And`/`Or` composite, and of every
/// other capped collection on the witness wire format.
pub const MAX_SUBITEMS: usize = 16;

/// Maximum nesting depth of a condition tree. The root sits at depth zero;
/// each composite level below it adds one.
pub const MAX_NESTING_DEPTH: usize = 2;

const TAG_BOOLEAN: u8 = 0x00;
const TAG_NOT: u8 = 0x01;
const TAG_AND: u8 = 0x02;
const TAG_OR: u8 = 0x03;
const TAG_SCRIPT_HASH: u8 = 0x18;
const TAG_GROUP: u8 = 0x19;
const TAG_CALLED_BY_ENTRY: u8 = 0x20;
const TAG_CALLED_BY_CONTRACT: u8 = 0x28;
const TAG_CALLED_BY_GROUP: u8 = 0x29;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WitnessCondition {
    Boolean { expression: bool },
    Not { expression: Box<WitnessCondition> },
    And { expressions: Vec<WitnessCondition> },
    Or { expressions: Vec<WitnessCondition> },
    ScriptHash { hash: Hash160 },
    Group { group: PublicKey },
    CalledByEntry,
    CalledByContract { hash: Hash160 },
    CalledByGroup { group: PublicKey },
}

impl WitnessCondition {
    pub fn tag(&self) -> u8 {
        match self {
            Self::Boolean { .. } => TAG_BOOLEAN,
            Self::Not { .. } => TAG_NOT,
            Self::And { .. } => TAG_AND,
            Self::Or { .. } => TAG_OR,
            Self::ScriptHash { .. } => TAG_SCRIPT_HASH,
            Self::Group { .. } => TAG_GROUP,
            Self::CalledByEntry => TAG_CALLED_BY_ENTRY,
            Self::CalledByContract { .. } => TAG_CALLED_BY_CONTRACT,
            Self::CalledByGroup { .. } => TAG_CALLED_BY_GROUP,
        }
    }

    /// Evaluates the predicate at the given call site. Total for every
    /// well-formed tree; an unknown contract manifest contributes an empty
    /// group set.
    pub fn is_satisfied(&self, ctx: &dyn ContextView) -> bool {
        match self {
            Self::Boolean { expression } => *expression,
            Self::Not { expression } => !expression.is_satisfied(ctx),
            Self::And { expressions } => expressions.iter().all(|c| c.is_satisfied(ctx)),
            Self::Or { expressions } => expressions.iter().any(|c| c.is_satisfied(ctx)),
            Self::ScriptHash { hash } => ctx.current_script_hash() == *hash,
            Self::Group { group } => ctx
                .lookup_contract_groups(&ctx.current_script_hash())
                .contains(group),
            Self::CalledByEntry => {
                let entry = ctx.entry_script_hash();
                ctx.current_script_hash() == entry || ctx.calling_script_hash() == entry
            }
            Self::CalledByContract { hash } => ctx.calling_script_hash() == *hash,
            Self::CalledByGroup { group } => ctx
                .lookup_contract_groups(&ctx.calling_script_hash())
                .contains(group),
        }
    }

    /// Decodes one condition, spending one level of `depth_budget` for each
    /// composite encountered.
    pub fn decode_with_depth(
        reader: &mut BinaryReader<'_>,
        depth_budget: usize,
    ) -> CoreResult<Self> {
        let tag = reader.read_u8()?;
        match tag {
            TAG_BOOLEAN => Ok(Self::Boolean {
                expression: reader.read_bool()?,
            }),
            TAG_NOT | TAG_AND | TAG_OR => {
                if depth_budget == 0 {
                    return Err(CoreError::Format(
                        "condition nesting exceeds the permitted depth".to_string(),
                    ));
                }
                match tag {
                    TAG_NOT => Ok(Self::Not {
                        expression: Box::new(Self::decode_with_depth(
                            reader,
                            depth_budget - 1,
                        )?),
                    }),
                    TAG_AND => Ok(Self::And {
                        expressions: Self::decode_children(reader, depth_budget - 1)?,
                    }),
                    _ => Ok(Self::Or {
                        expressions: Self::decode_children(reader, depth_budget - 1)?,
                    }),
                }
            }
            TAG_SCRIPT_HASH => Ok(Self::ScriptHash {
                hash: Hash160::decode(reader)?,
            }),
            TAG_GROUP => Ok(Self::Group {
                group: PublicKey::decode(reader)?,
            }),
            TAG_CALLED_BY_ENTRY => Ok(Self::CalledByEntry),
            TAG_CALLED_BY_CONTRACT => Ok(Self::CalledByContract {
                hash: Hash160::decode(reader)?,
            }),
            TAG_CALLED_BY_GROUP => Ok(Self::CalledByGroup {
                group: PublicKey::decode(reader)?,
            }),
            other => Err(CoreError::Format(format!(
                "unknown condition tag {other:#04x}"
            ))),
        }
    }

    fn decode_children(
        reader: &mut BinaryReader<'_>,
        depth_budget: usize,
    ) -> CoreResult<Vec<Self>> {
        let count = reader.read_var_int(MAX_SUBITEMS as u64)? as usize;
        if count == 0 {
            return Err(CoreError::Format(
                "composite condition must have at least one child".to_string(),
            ));
        }
        let mut children = Vec::with_capacity(count);
        for _ in 0..count {
            children.push(Self::decode_with_depth(reader, depth_budget)?);
        }
        Ok(children)
    }

    /// Re-checks the structural bounds the binary decoder enforces, for
    /// trees built in memory or decoded from JSON.
    pub fn validate(&self) -> CoreResult<()> {
        self.validate_at(MAX_NESTING_DEPTH)
    }

    fn validate_at(&self, depth_budget: usize) -> CoreResult<()> {
        let children: &[WitnessCondition] = match self {
            Self::Not { expression } => std::slice::from_ref(expression),
            Self::And { expressions } | Self::Or { expressions } => {
                if expressions.is_empty() {
                    return Err(CoreError::Format(
                        "composite condition must have at least one child".to_string(),
                    ));
                }
                expressions
            }
            _ => return Ok(()),
        };
        if depth_budget == 0 {
            return Err(CoreError::Format(
                "condition nesting exceeds the permitted depth".to_string(),
            ));
        }
        if children.len() > MAX_SUBITEMS {
            return Err(CoreError::Format(format!(
                "composite condition has {} children, limit is {MAX_SUBITEMS}",
                children.len()
            )));
        }
        for child in children {
            child.validate_at(depth_budget - 1)?;
        }
        Ok(())
    }
}

impl Encodable for WitnessCondition {
    fn encode(&self, writer: &mut BinaryWriter) {
        writer.write_u8(self.tag());
        match self {
            Self::Boolean { expression } => writer.write_bool(*expression),
            Self::Not { expression } => expression.encode(writer),
            Self::And { expressions } | Self::Or { expressions } => {
                writer.write_array(expressions);
            }
            Self::ScriptHash { hash } | Self::CalledByContract { hash } => hash.encode(writer),
            Self::Group { group } | Self::CalledByGroup { group } => group.encode(writer),
            Self::CalledByEntry => {}
        }
    }
}

impl Decodable for WitnessCondition {
    fn decode(reader: &mut BinaryReader<'_>) -> CoreResult<Self> {
        Self::decode_with_depth(reader, MAX_NESTING_DEPTH)
    }
}

#[cfg(test)]
#[path = "condition/tests_prop.rs"]
mod tests_prop;
