//! Session configuration
//!
//! Defaults come from [`crate::utils::constants`]. Native builds can override
//! them from the environment with [`SessionConfig::from_env`]; in the browser
//! the page passes a config object that is decoded with `serde`.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};
use crate::utils::constants::{
    DEFAULT_DISCOVERY_TIMEOUT_MS, DEFAULT_DISPLAY_PRECISION, NATIVE_DECIMALS, STORAGE_CONTRACT_ADDRESS,
};

/// What a `chainChanged` event does to the session.
///
/// `UpdateChainOnly` records the new chain id and leaves accounts and
/// balance alone, so the displayed balance stays the one read on the
/// previous chain until the next account event or explicit connect.
/// `RefreshWallet` re-reads balance and chain id for the active account.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChainChangePolicy {
    #[default]
    UpdateChainOnly,
    RefreshWallet,
}

impl std::str::FromStr for ChainChangePolicy {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "update_chain_only" | "chain" => Ok(ChainChangePolicy::UpdateChainOnly),
            "refresh_wallet" | "refresh" => Ok(ChainChangePolicy::RefreshWallet),
            other => Err(SessionError::Config(format!("unknown chain change policy: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Deployed `Storage` contract
    pub contract_address: Address,
    /// Decimals of the native currency's smallest unit (wei)
    pub native_decimals: u8,
    /// Decimal places shown for the balance
    pub display_precision: u8,
    /// Passphrase argument forwarded to `personal_sign`
    pub sign_passphrase: String,
    pub chain_change_policy: ChainChangePolicy,
    /// How long discovery waits for a late-injected provider
    pub discovery_timeout_ms: u32,
    /// Log level filter (e.g. "info", "debug")
    pub log_level: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            contract_address: STORAGE_CONTRACT_ADDRESS,
            native_decimals: NATIVE_DECIMALS,
            display_precision: DEFAULT_DISPLAY_PRECISION,
            sign_passphrase: String::new(),
            chain_change_policy: ChainChangePolicy::default(),
            discovery_timeout_ms: DEFAULT_DISCOVERY_TIMEOUT_MS,
            log_level: "info".to_string(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let contract_address = match std::env::var("DAPP_CONTRACT_ADDRESS") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| SessionError::Config(format!("DAPP_CONTRACT_ADDRESS: {e}")))?,
            Err(_) => defaults.contract_address,
        };

        let display_precision = match std::env::var("DAPP_DISPLAY_PRECISION") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| SessionError::Config("DAPP_DISPLAY_PRECISION must be a small integer".to_string()))?,
            Err(_) => defaults.display_precision,
        };

        let chain_change_policy = match std::env::var("DAPP_CHAIN_CHANGE_POLICY") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.chain_change_policy,
        };

        let discovery_timeout_ms = std::env::var("DAPP_DISCOVERY_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.discovery_timeout_ms);

        let log_level = std::env::var("RUST_LOG").unwrap_or(defaults.log_level);

        let config = Self {
            contract_address,
            display_precision,
            chain_change_policy,
            discovery_timeout_ms,
            log_level,
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.contract_address == Address::ZERO {
            return Err(SessionError::Config("contract address must not be zero".to_string()));
        }

        if self.display_precision > self.native_decimals {
            return Err(SessionError::Config(format!(
                "display precision {} exceeds native decimals {}",
                self.display_precision, self.native_decimals
            )));
        }

        if self.native_decimals > 77 {
            // 10^78 overflows U256
            return Err(SessionError::Config("native decimals must be at most 77".to_string()));
        }

        Ok(())
    }

    /// Parsed log level, defaulting to `Info` for unknown strings
    pub fn log_level_filter(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
