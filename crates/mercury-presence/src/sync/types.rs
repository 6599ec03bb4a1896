//! Runtime configuration, consumer view, and lifecycle events.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::fallback::FallbackProfile;
use crate::model::{ConnectionState, PresenceSnapshot, SnapshotSource};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Timing and endpoints for one `PresenceSync`.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub api_base: String,
    pub socket_url: String,
    /// Bound on every provider call.
    pub request_timeout: Duration,
    /// `None` disables background polling.
    pub poll_interval: Option<Duration>,
    /// Wait between `subscribe_live` and the first socket connect.
    pub live_delay: Duration,
    pub connect_timeout: Duration,
    pub reconnect_delay: Duration,
    pub fallback: FallbackProfile,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.lanyard.rest".into(),
            socket_url: "wss://api.lanyard.rest/socket".into(),
            request_timeout: Duration::from_secs(8),
            poll_interval: Some(Duration::from_secs(30)),
            live_delay: Duration::from_secs(1),
            connect_timeout: Duration::from_secs(15),
            reconnect_delay: Duration::from_secs(10),
            fallback: FallbackProfile::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Consumer view
// ---------------------------------------------------------------------------

/// What consumers render. Cheap to clone; the snapshot is shared.
#[derive(Debug, Clone, Default)]
pub struct PresenceState {
    pub snapshot: Option<Arc<PresenceSnapshot>>,
    pub loading: bool,
    /// Diagnostic for the last failure, cleared by the next real snapshot.
    pub error: Option<String>,
    pub connection: ConnectionState,
    pub last_updated: Option<DateTime<Utc>>,
}

impl PresenceState {
    /// True while the view shows synthetic placeholder data.
    pub fn is_fallback(&self) -> bool {
        self.snapshot.as_ref().is_some_and(|s| s.synthetic)
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum PresenceEvent {
    SnapshotApplied {
        source: SnapshotSource,
        fetched_at: DateTime<Utc>,
    },
    ConnectionChanged {
        from: ConnectionState,
        to: ConnectionState,
    },
    Diagnostic(String),
    /// An outcome older than the applied snapshot arrived and was dropped.
    StaleDiscarded {
        source: SnapshotSource,
        fetched_at: DateTime<Utc>,
    },
    Stopped,
}
