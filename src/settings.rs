use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, CoreResult};

/// Protocol constants consulted during witness and attribute verification.
///
/// Values are network-wide consensus parameters; nodes load them once at
/// startup and treat them as frozen.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtocolSettings {
    /// Network magic mixed into signed data, separating chains.
    pub network: u32,
    /// Version byte prefixed to rendered addresses.
    pub address_version: u8,
    #[serde(default = "default_max_transaction_attributes")]
    pub max_transaction_attributes: usize,
    /// Per-signer price of one `Conflicts` record.
    #[serde(default = "default_base_attribute_fee")]
    pub base_attribute_fee: i64,
    /// Whether the notary service is active on this network.
    #[serde(default)]
    pub notary_enabled: bool,
    /// Per-key price of notary assistance.
    #[serde(default = "default_notary_service_fee")]
    pub notary_service_fee: i64,
    #[serde(default = "default_max_notary_keys")]
    pub max_notary_keys: u8,
}

fn default_max_transaction_attributes() -> usize {
    16
}

fn default_base_attribute_fee() -> i64 {
    1_000_000
}

fn default_notary_service_fee() -> i64 {
    10_000_000
}

fn default_max_notary_keys() -> u8 {
    15
}

impl ProtocolSettings {
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|err| CoreError::Config(format!("unable to parse settings: {err}")))
    }

    pub fn save(&self, path: &Path) -> CoreResult<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;
        let encoded = toml::to_string_pretty(self)
            .map_err(|err| CoreError::Config(format!("unable to encode settings: {err}")))?;
        fs::write(path, encoded)?;
        Ok(())
    }
}

impl Default for ProtocolSettings {
    fn default() -> Self {
        Self {
            network: 0x334f454e,
            address_version: 0x35,
            max_transaction_attributes: default_max_transaction_attributes(),
            base_attribute_fee: default_base_attribute_fee(),
            notary_enabled: false,
            notary_service_fee: default_notary_service_fee(),
            max_notary_keys: default_max_notary_keys(),
        }
    }
}
