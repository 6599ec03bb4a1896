//! Mercury configuration system.
//!
//! TOML-based configuration with validation. All sections use serde
//! defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mercury_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("tracking {}", config.presence.user_id);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    FallbackConfig, LogLevel, LoggingConfig, MercuryConfig, PresenceConfig, CONFIG_SCHEMA_VERSION,
    POLL_INTERVAL_RANGE,
};

use std::path::Path;

use mercury_common::ConfigError;

/// Load and validate the config.
///
/// With `path`, that file must exist. Without it, `config.toml` is read from
/// the OS config directory and a documented default is created if missing.
pub fn load_config(path: Option<&Path>) -> Result<MercuryConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &MercuryConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
