//! Socket configuration and the events the connection task reports.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::protocol::LanyardData;

/// Normal closure.
pub const CLOSE_NORMAL: u16 = 1000;
/// Connection dropped without a close frame.
pub const CLOSE_ABNORMAL: u16 = 1006;
/// Close frame without a status code.
pub const CLOSE_NO_STATUS: u16 = 1005;

/// Configuration for one live subscription.
#[derive(Debug, Clone)]
pub struct SocketConfig {
    pub url: String,
    pub user_id: String,
    pub connect_timeout: Duration,
    /// Fixed wait before every reconnect attempt.
    pub reconnect_delay: Duration,
    /// Wait before the first connect.
    pub initial_delay: Duration,
}

impl SocketConfig {
    pub fn new(url: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_id: user_id.into(),
            connect_timeout: Duration::from_secs(15),
            reconnect_delay: Duration::from_secs(10),
            initial_delay: Duration::ZERO,
        }
    }
}

/// What the connection task reports to its owner.
#[derive(Debug, Clone)]
pub enum SocketEvent {
    /// A connect attempt is starting. `attempt` counts from 1.
    Connecting { attempt: u32 },
    /// Hello received and the subscribe frame sent.
    Subscribed { heartbeat_interval: Duration },
    /// Presence data for the tracked user. `received` is the monotonic
    /// arrival time; `received_at` is for display.
    Presence {
        data: Box<LanyardData>,
        event: String,
        received: Instant,
        received_at: DateTime<Utc>,
    },
    /// The session ended abnormally; a reconnect follows after `reconnect_in`.
    Disconnected {
        code: u16,
        reason: String,
        reconnect_in: Duration,
    },
    /// The task ended for good, either on a normal close or on shutdown.
    Closed { code: u16 },
}
