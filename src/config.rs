//! Configuration management for `ballotsync`.
//!
//! Handles loading and validation of application configuration from TOML
//! files.

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            backtrace: true,
        }
    }
}

/// Election committee options (see the committee module for how each knob
/// is applied).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitteeConfig {
    /// Attempts per per-height fetch before the error is recorded.
    pub num_of_retries: u8,
    /// Gravity chain API endpoints, tried in order by the chain client.
    pub gravity_chain_apis: Vec<String>,
    /// Heights between election snapshots.
    pub gravity_chain_height_interval: u64,
    /// First epoch height.
    pub gravity_chain_start_height: u64,
    pub register_contract_address: String,
    pub staking_contract_address: String,
    /// Page size for candidate and vote pagination.
    pub pagination_size: u8,
    /// Minimum bucket amount, as a decimal string.
    pub vote_threshold: String,
    /// Minimum candidate score, as a decimal string.
    pub score_threshold: String,
    /// Minimum candidate self-staking tokens, as a decimal string.
    pub self_staking_threshold: String,
    /// Result cache capacity.
    pub cache_size: u32,
    /// Concurrent per-height fetches (0 falls back to the default of 10).
    #[serde(default = "default_num_of_fetch_in_parallel")]
    pub num_of_fetch_in_parallel: u8,
    /// Drop candidates whose self-staking weight exceeds 1.
    #[serde(default)]
    pub skip_manified_candidate: bool,
    /// Epochs per catch-up round (0 falls back to the default of 10).
    #[serde(default = "default_gravity_chain_batch_size")]
    pub gravity_chain_batch_size: u64,
}

const fn default_num_of_fetch_in_parallel() -> u8 {
    10
}

const fn default_gravity_chain_batch_size() -> u64 {
    10
}

impl Default for CommitteeConfig {
    fn default() -> Self {
        Self {
            num_of_retries: 8,
            gravity_chain_apis: vec!["wss://mainnet.infura.io/ws".to_string()],
            gravity_chain_height_interval: 100,
            gravity_chain_start_height: 7_368_630,
            register_contract_address: "0x95724986563028deb58f15c5fac19fa09304f32d".to_string(),
            staking_contract_address: "0x87c9dbff0016af23f5b1ab9b8e072124ab729193".to_string(),
            pagination_size: 255,
            vote_threshold: "100000000000000000000".to_string(),
            score_threshold: "0".to_string(),
            self_staking_threshold: "0".to_string(),
            cache_size: 100,
            num_of_fetch_in_parallel: default_num_of_fetch_in_parallel(),
            skip_manified_candidate: false,
            gravity_chain_batch_size: default_gravity_chain_batch_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub committee: CommitteeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// - File I/O errors (file not found, permission denied)
    /// - TOML parsing errors (invalid syntax, type mismatches)
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the default config file path.
    ///
    /// # Errors
    /// - No config file found (neither config.toml nor config.example.toml)
    /// - File I/O or TOML parsing errors
    pub fn load() -> crate::Result<Self> {
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "using config.example.toml, create config.toml for production use"
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::BallotsyncError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no config file found, create config.toml or config.example.toml",
            )))
        }
    }
}
