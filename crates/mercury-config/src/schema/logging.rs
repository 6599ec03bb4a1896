use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `EnvFilter` directive scoped to the workspace crates.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "mercury=trace",
            LogLevel::Debug => "mercury=debug",
            LogLevel::Info => "mercury=info",
            LogLevel::Warn => "mercury=warn",
            LogLevel::Error => "mercury=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
