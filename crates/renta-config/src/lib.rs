//! # renta-config
//!
//! Layered configuration loading for the RentaGPT client using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`RENTA_*` prefix, `__` as separator)
//! 2. Project-level `.rentagpt/config.toml`
//! 3. User-level `~/.config/rentagpt/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `RENTA_ENDPOINT__HOST` -> `endpoint.host`,
//! `RENTA_CLIENT__IDLE_TIMEOUT_SECS` -> `client.idle_timeout_secs`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use renta_config::RentaConfig;
//!
//! let config = RentaConfig::load_with_dotenv().expect("config");
//! let endpoint = config.endpoint.resolve().expect("endpoint");
//! println!("connecting to {}", endpoint.url);
//! ```

mod client;
mod credential;
mod endpoint;
mod error;

pub use client::ClientConfig;
pub use credential::CredentialConfig;
pub use endpoint::{EndpointConfig, EndpointRoute, ResolvedEndpoint};
pub use error::ConfigError;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Env var prefix shared by every config key.
pub const ENV_PREFIX: &str = "RENTA_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RentaConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub credential: CredentialConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

impl RentaConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source cannot be parsed or a
    /// value has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and callers can layer more providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".rentagpt/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rentagpt").join("config.toml"))
    }
}
