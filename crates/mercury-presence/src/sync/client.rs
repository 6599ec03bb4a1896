//! Public handle for one tracked user.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::live::live_bridge;
use super::lock;
use super::shared::SyncCore;
use super::poller::poll_loop;
use super::types::{PresenceEvent, PresenceState, SyncConfig};
use crate::error::PresenceError;
use crate::model::Activity;
use crate::rest::{LanyardRestClient, PresenceApi};
use crate::socket::{LiveSocket, SocketConfig};
use crate::timing;

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Keeps a live view of one user's presence.
///
/// Fetches over REST on `start`, optionally polls, and can upgrade to the
/// push socket with `subscribe_live`. Any number of consumers can read the
/// view through `subscribe`. Dropping the handle cancels all background work;
/// `stop` additionally waits for it.
pub struct PresenceSync {
    core: Arc<SyncCore>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    live: Mutex<Option<LiveSocket>>,
    polling: AtomicBool,
    stopped: AtomicBool,
}

impl PresenceSync {
    /// Track `user_id` through the Lanyard REST API at `config.api_base`.
    pub fn new(user_id: impl Into<String>, config: SyncConfig) -> Result<Self, PresenceError> {
        let api = LanyardRestClient::new(&config.api_base, config.request_timeout)?;
        Self::with_api(user_id, config, Arc::new(api))
    }

    /// Track `user_id` through any `PresenceApi`.
    pub fn with_api(
        user_id: impl Into<String>,
        config: SyncConfig,
        api: Arc<dyn PresenceApi>,
    ) -> Result<Self, PresenceError> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(PresenceError::InvalidUserId);
        }

        Ok(Self {
            core: Arc::new(SyncCore::new(user_id, config, api)),
            tasks: Mutex::new(Vec::new()),
            live: Mutex::new(None),
            polling: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        })
    }

    /// Initial fetch, then start polling if configured. Never fails: provider
    /// errors surface as fallback data plus `error`.
    pub async fn start(&self) -> PresenceState {
        if self.is_stopped() {
            return self.state();
        }

        info!(user_id = %self.core.user_id, "Starting presence sync");
        let state = self.core.fetch().await;

        if let Some(every) = self.core.config.poll_interval {
            if !self.polling.swap(true, Ordering::SeqCst) {
                debug!(every_ms = every.as_millis() as u64, "Spawning poll loop");
                let handle = tokio::spawn(poll_loop(Arc::clone(&self.core), every));
                lock(&self.tasks).push(handle);
            }
        }

        state
    }

    /// Upgrade to the push socket.
    ///
    /// Requires a real (non-fallback) snapshot first; returns `false`
    /// otherwise. Calling again while the socket task runs does nothing.
    pub fn subscribe_live(&self) -> bool {
        if self.is_stopped() {
            return false;
        }

        let has_baseline = self
            .core
            .snapshot_state()
            .snapshot
            .is_some_and(|snapshot| !snapshot.synthetic);
        if !has_baseline {
            warn!(user_id = %self.core.user_id, "Live presence needs a successful fetch first");
            return false;
        }

        let mut live = lock(&self.live);
        if live.as_ref().is_some_and(|socket| !socket.is_finished()) {
            debug!("Live presence already running");
            return true;
        }

        let config = &self.core.config;
        let socket_config = SocketConfig {
            url: config.socket_url.clone(),
            user_id: self.core.user_id.clone(),
            connect_timeout: config.connect_timeout,
            reconnect_delay: config.reconnect_delay,
            initial_delay: config.live_delay,
        };
        let (socket, events) = LiveSocket::connect(socket_config, self.core.root.child_token());
        let bridge = tokio::spawn(live_bridge(Arc::clone(&self.core), events));
        lock(&self.tasks).push(bridge);
        *live = Some(socket);

        info!(user_id = %self.core.user_id, "Live presence subscribed");
        true
    }

    /// Fetch now, cancelling any fetch already in flight.
    pub async fn refresh(&self) -> PresenceState {
        if self.is_stopped() {
            return self.state();
        }
        self.core.fetch().await
    }

    /// `"Xh Ym elapsed"` since the activity started, if it has a start time.
    pub fn elapsed_time(&self, activity: &Activity) -> Option<String> {
        timing::elapsed_time(activity, Utc::now())
    }

    /// Cancel everything, close the socket with 1000, and wait for the
    /// background tasks. Safe to call more than once.
    pub async fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }

        info!(user_id = %self.core.user_id, "Stopping presence sync");
        self.core.root.cancel();

        let socket = lock(&self.live).take();
        if let Some(socket) = socket {
            socket.close().await;
        }

        let tasks = std::mem::take(&mut *lock(&self.tasks));
        for task in tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Presence task ended abnormally");
            }
        }

        self.core.finish();
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn state(&self) -> PresenceState {
        self.core.snapshot_state()
    }

    pub fn subscribe(&self) -> watch::Receiver<PresenceState> {
        self.core.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<PresenceEvent> {
        self.core.events().subscribe()
    }

    pub fn user_id(&self) -> &str {
        &self.core.user_id
    }

    /// Whether the socket task is running.
    pub fn is_live(&self) -> bool {
        lock(&self.live)
            .as_ref()
            .is_some_and(|socket| !socket.is_finished())
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Drop for PresenceSync {
    fn drop(&mut self) {
        self.core.root.cancel();
    }
}
