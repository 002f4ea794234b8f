use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::time::Duration;

use domain::DomainError;

use crate::discovery::ArtNetConfig;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InventoryConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_call_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

fn default_call_timeout() -> u64 {
    1
}
fn default_state_file() -> String {
    "inventory.json".to_string()
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            password: String::new(),
            timeout_secs: default_call_timeout(),
            state_file: default_state_file(),
        }
    }
}

impl InventoryConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Which scene axes become remote tags.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagSourceConfig {
    #[serde(default)]
    pub layers: bool,
    #[serde(default)]
    pub classes: bool,
    #[serde(default)]
    pub positions: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DiscoveryConfig {
    #[serde(default = "default_bind_ip")]
    pub bind_ip: Ipv4Addr,
    #[serde(default = "default_broadcast")]
    pub broadcast: Ipv4Addr,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_discovery_timeout")]
    pub timeout_secs: f64,
    #[serde(default = "default_discovery_output")]
    pub output: String,
}

fn default_bind_ip() -> Ipv4Addr {
    ArtNetConfig::default().bind_ip
}
fn default_broadcast() -> Ipv4Addr {
    ArtNetConfig::default().broadcast
}
fn default_port() -> u16 {
    ArtNetConfig::default().port
}
fn default_discovery_timeout() -> f64 {
    1.5
}
fn default_discovery_output() -> String {
    "discovered_devices.mvr".to_string()
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            bind_ip: default_bind_ip(),
            broadcast: default_broadcast(),
            port: default_port(),
            timeout_secs: default_discovery_timeout(),
            output: default_discovery_output(),
        }
    }
}

impl DiscoveryConfig {
    pub fn artnet(&self) -> ArtNetConfig {
        ArtNetConfig {
            bind_ip: self.bind_ip,
            broadcast: self.broadcast,
            port: self.port,
        }
    }

    /// Listen window; negative, NaN and infinite values are rejected.
    pub fn timeout(&self) -> Result<Duration, DomainError> {
        Duration::try_from_secs_f64(self.timeout_secs).map_err(|e| {
            DomainError::InvalidConfiguration(format!(
                "discovery timeout_secs = {}: {e}",
                self.timeout_secs
            ))
        })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MergeConfig {
    #[serde(default = "default_merge_output")]
    pub output: String,
}

fn default_merge_output() -> String {
    "merged_devices.mvr".to_string()
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            output: default_merge_output(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub tags: TagSourceConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub merge: MergeConfig,
}

impl AppConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Shipped defaults, e.g. config/default.toml
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            // Per-environment overrides
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // Environment variables (e.g. FIXTURE_SYNC__INVENTORY__URL=http://kuma:3001)
            .add_source(Environment::with_prefix("FIXTURE_SYNC").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
