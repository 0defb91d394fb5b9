//! Assistant configuration loaded from the environment.
//!
//! Everything is optional: with no fleet token the gateway runs against a
//! placeholder vehicle, and with no maps key location phrases degrade to
//! unknown. Change behavior without code edits.

use serde::{Deserialize, Serialize};

use crate::geo::ReferenceAddress;

fn default_fleet_api_url() -> String {
    "https://owner-api.teslamotors.com".to_string()
}

fn default_local_region() -> String {
    "CA".to_string()
}

fn default_listen_port() -> u16 {
    8080
}

/// Configuration loaded from environment.
///
/// | Env | Default | Description |
/// |-----|---------|-------------|
/// | VOLTLINK_FLEET_API_URL | owner-api.teslamotors.com | Vehicle fleet API base URL. |
/// | VOLTLINK_FLEET_TOKEN | unset | Bearer token for the fleet API; unset = placeholder vehicle. |
/// | GOOGLE_MAPS_API_KEY | unset | Geocoding/routing key; unset = location always unknown. |
/// | VOLTLINK_HOME_STREET / _HOME_CITY / _HOME_REGION | unset | Reference (home) address for travel time. |
/// | VOLTLINK_LOCAL_REGION | CA | Region abbreviation spoken as city-only (no state suffix). |
/// | VOLTLINK_PORT | 8080 | Gateway listen port. |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_fleet_api_url")]
    pub fleet_api_url: String,
    #[serde(default)]
    pub fleet_token: Option<String>,
    #[serde(default)]
    pub maps_api_key: Option<String>,
    #[serde(default)]
    pub home_street: Option<String>,
    #[serde(default)]
    pub home_city: Option<String>,
    #[serde(default)]
    pub home_region: Option<String>,
    /// Spoken without a state suffix ("Palo Alto" rather than "Palo Alto, CA").
    /// A locale convenience for the operator's home region, not a domain rule.
    #[serde(default = "default_local_region")]
    pub local_region: String,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            fleet_api_url: default_fleet_api_url(),
            fleet_token: None,
            maps_api_key: None,
            home_street: None,
            home_city: None,
            home_region: None,
            local_region: default_local_region(),
            listen_port: default_listen_port(),
        }
    }
}

impl AssistantConfig {
    /// Load from environment. Unset or invalid => defaults (see field docs).
    pub fn from_env() -> Self {
        Self {
            fleet_api_url: env_string("VOLTLINK_FLEET_API_URL", default_fleet_api_url()),
            fleet_token: env_opt_string("VOLTLINK_FLEET_TOKEN"),
            maps_api_key: env_opt_string("GOOGLE_MAPS_API_KEY"),
            home_street: env_opt_string("VOLTLINK_HOME_STREET"),
            home_city: env_opt_string("VOLTLINK_HOME_CITY"),
            home_region: env_opt_string("VOLTLINK_HOME_REGION"),
            local_region: env_string("VOLTLINK_LOCAL_REGION", default_local_region()),
            listen_port: env_port("VOLTLINK_PORT"),
        }
    }

    /// The configured home address, or `None` when too little is set to be a
    /// usable travel-time destination (needs at least a street or a region).
    pub fn reference_address(&self) -> Option<ReferenceAddress> {
        if self.home_street.is_none() && self.home_region.is_none() {
            return None;
        }
        Some(ReferenceAddress {
            street_line: self.home_street.clone(),
            city: self.home_city.clone(),
            region: self.home_region.clone(),
        })
    }
}

fn env_string(name: &str, default: String) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default,
    }
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_port(name: &str) -> u16 {
    match std::env::var(name) {
        Ok(v) => v.trim().parse().unwrap_or_else(|_| default_listen_port()),
        Err(_) => default_listen_port(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AssistantConfig::default();
        assert_eq!(cfg.local_region, "CA");
        assert_eq!(cfg.listen_port, 8080);
        assert!(cfg.fleet_token.is_none());
    }

    #[test]
    fn reference_address_requires_street_or_region() {
        let mut cfg = AssistantConfig::default();
        assert!(cfg.reference_address().is_none());

        cfg.home_city = Some("Palo Alto".to_string());
        assert!(cfg.reference_address().is_none());

        cfg.home_region = Some("CA".to_string());
        let home = cfg.reference_address().unwrap();
        assert_eq!(home.formatted(), "Palo Alto, CA");
    }
}
