use crate::filter_mode::FilterMode;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse filter parameters: {0}")]
    Parse(String),

    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

/// Process-wide policy snapshot, loaded once at module registration and
/// immutable afterwards. Every in-flight query reads the same snapshot, so
/// no synchronization is needed.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Mode applied to clients arriving over IPv4 (or IPv4-mapped IPv6).
    #[serde(default, rename = "filter-aaaa-on-v4")]
    pub on_v4: FilterMode,

    /// Mode applied to clients arriving over plain IPv6.
    #[serde(default, rename = "filter-aaaa-on-v6")]
    pub on_v6: FilterMode,

    /// Address/prefix expressions restricting which clients the policy
    /// applies to. Absent means the policy applies to everyone.
    #[serde(default, rename = "filter-aaaa")]
    pub access_list: Option<Vec<String>>,
}

impl FilterConfig {
    /// Parse the raw parameter text handed to module registration.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Both modes off: the module will never touch a response.
    pub fn is_inert(&self) -> bool {
        !self.on_v4.is_active() && !self.on_v6.is_active()
    }

    /// Access-list expressions must be addresses or CIDR prefixes. Checked
    /// at registration so a typo disables the module loudly instead of
    /// silently matching nobody.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(entries) = &self.access_list {
            for entry in entries {
                let ok = entry.parse::<ipnetwork::IpNetwork>().is_ok()
                    || entry.parse::<IpAddr>().is_ok();
                if !ok {
                    return Err(ConfigError::Validation(format!(
                        "invalid access-list entry '{}'",
                        entry
                    )));
                }
            }
        }
        Ok(())
    }
}
