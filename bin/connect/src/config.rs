//! Configuration for the connect command.
//!
//! Loaded via the `config` crate from an optional TOML file followed by
//! `SLUICE_`-prefixed environment variables, which take precedence. Nested
//! keys use `__`, e.g. `SLUICE_CONNECTION__FIELDS__HOST=db.internal`.

use serde::Deserialize;
use sluice_integration::{HttpClientConfig, UserProfile};
use std::collections::BTreeMap;
use std::path::Path;

/// Default configuration file, looked up in the working directory.
const DEFAULT_CONFIG_FILE: &str = "sluice";

/// Everything needed to connect one integration.
#[derive(Debug, Deserialize)]
pub struct ConnectConfig {
    /// Backend API settings.
    pub api: HttpClientConfig,

    /// The user on whose behalf the integration is connected.
    pub user: UserProfile,

    pub connection: ConnectionSection,
}

/// The integration to connect.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionSection {
    /// Service label, e.g. `Postgres` or `Aqueduct Demo`.
    pub service: String,

    /// Name suffix. A name that already carries the service prefix is
    /// accepted as well.
    #[serde(default)]
    pub name: String,

    /// Configuration field values keyed by field key.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl ConnectConfig {
    /// Loads configuration from `file` (or `sluice.toml` if present) and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or required keys are
    /// missing.
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder();
        let builder = match file {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        builder
            .add_source(
                config::Environment::with_prefix("SLUICE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
