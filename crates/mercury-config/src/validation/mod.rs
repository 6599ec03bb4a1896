//! Full configuration validation.
//!
//! Each section has its own validator; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;
mod presence;


use crate::schema::MercuryConfig;
use mercury_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &MercuryConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    presence::validate_presence(&mut errors, config);
    presence::validate_fallback(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
