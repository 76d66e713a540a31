//! Signer scope flags.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{CoreError, CoreResult};

bitflags! {
    /// Bitmask narrowing which script contexts a signer's signature
    /// authorizes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WitnessScope: u8 {
        /// Signature only; authorizes nothing beyond the self check.
        const NONE = 0x00;
        /// Calls made from the entry script or by contracts it invokes
        /// directly.
        const CALLED_BY_ENTRY = 0x01;
        /// Calls into contracts listed in `allowed_contracts`.
        const CUSTOM_CONTRACTS = 0x10;
        /// Calls into contracts whose manifest declares a group key listed
        /// in `allowed_groups`.
        const CUSTOM_GROUPS = 0x20;
        /// Calls permitted by the signer's witness rules.
        const WITNESS_RULES = 0x40;
        /// Any call. Cannot be combined with other flags.
        const GLOBAL = 0x80;
    }
}

impl WitnessScope {
    /// Decodes a scope byte, rejecting reserved bits and illegal
    /// combinations.
    pub fn from_byte(value: u8) -> CoreResult<Self> {
        let scope = Self::from_bits(value)
            .ok_or_else(|| CoreError::Format(format!("reserved scope bits in {value:#04x}")))?;
        if scope.contains(Self::GLOBAL) && scope != Self::GLOBAL {
            return Err(CoreError::Format(
                "Global scope cannot be combined with other flags".to_string(),
            ));
        }
        Ok(scope)
    }

    fn flag_name(flag: Self) -> &'static str {
        match flag {
            Self::CALLED_BY_ENTRY => "CalledByEntry",
            Self::CUSTOM_CONTRACTS => "CustomContracts",
            Self::CUSTOM_GROUPS => "CustomGroups",
            Self::WITNESS_RULES => "WitnessRules",
            Self::GLOBAL => "Global",
            _ => "None",
        }
    }
}

impl fmt::Display for WitnessScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        let mut first = true;
        for flag in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(Self::flag_name(flag))?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for WitnessScope {
    type Err = CoreError;

    fn from_str(value: &str) -> CoreResult<Self> {
        let mut scope = Self::NONE;
        for name in value.split(',') {
            let flag = match name.trim() {
                "None" => Self::NONE,
                "CalledByEntry" => Self::CALLED_BY_ENTRY,
                "CustomContracts" => Self::CUSTOM_CONTRACTS,
                "CustomGroups" => Self::CUSTOM_GROUPS,
                "WitnessRules" => Self::WITNESS_RULES,
                "Global" => Self::GLOBAL,
                other => {
                    return Err(CoreError::Format(format!("unknown scope name `{other}`")));
                }
            };
            scope |= flag;
        }
        // Re-validate the combination the same way the wire decoder does.
        Self::from_byte(scope.bits())
    }
}

impl Serialize for WitnessScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for WitnessScope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(D::Error::custom)
    }
}
