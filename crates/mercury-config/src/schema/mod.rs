//! Configuration schema types for Mercury.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod presence;

pub use logging::*;
pub use presence::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Mercury.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MercuryConfig {
    pub presence: PresenceConfig,
    pub fallback: FallbackConfig,
    pub logging: LoggingConfig,
}
