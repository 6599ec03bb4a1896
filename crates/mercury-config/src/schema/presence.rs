//! Presence provider configuration types.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Accepted REST poll intervals in seconds, besides 0 (disabled).
pub const POLL_INTERVAL_RANGE: RangeInclusive<u32> = 5..=3600;

/// Where and how often to read the tracked user's presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// Discord user id tracked by default. May be overridden on the command line.
    pub user_id: String,
    /// Base URL of the Lanyard REST API.
    pub api_base: String,
    /// Lanyard WebSocket endpoint.
    pub socket_url: String,
    /// Upgrade to the push socket after the first successful fetch.
    pub live: bool,
    /// Delay before opening the socket, in milliseconds (valid range: 0-10000).
    pub live_delay_ms: u32,
    /// REST poll interval in seconds; 0 disables polling (valid range: 5-3600).
    pub poll_interval: u32,
    /// Per-request timeout in seconds (valid range: 1-30).
    pub request_timeout: u32,
    /// Socket connect timeout in seconds (valid range: 1-60).
    pub connect_timeout: u32,
    /// Fixed delay before a socket reconnect, in seconds (valid range: 1-300).
    pub reconnect_delay: u32,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            api_base: "https://api.lanyard.rest".into(),
            socket_url: "wss://api.lanyard.rest/socket".into(),
            live: true,
            live_delay_ms: 1000,
            poll_interval: 30,
            request_timeout: 8,
            connect_timeout: 15,
            reconnect_delay: 10,
        }
    }
}

/// Placeholder profile shown while live data is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub display_name: String,
    pub activity_name: String,
    pub activity_details: String,
    pub activity_state: String,
    pub application_id: String,
    /// How long ago the placeholder activity "started", in minutes.
    pub started_minutes_ago: u32,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            display_name: "Delta".into(),
            activity_name: "Visual Studio Code".into(),
            activity_details: "Editing TypeScript".into(),
            activity_state: "Working on Portfolio".into(),
            application_id: "383226320970055681".into(),
            started_minutes_ago: 30,
        }
    }
}
