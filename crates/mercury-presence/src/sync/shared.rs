//! Shared state behind a `PresenceSync`: the single writer of the view.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use chrono::{DateTime, Utc};
use mercury_common::{new_correlation_id, EventBus};
use tokio::sync::{watch, Mutex};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::lock;
use super::state::advance;
use super::types::{PresenceEvent, PresenceState, SyncConfig};
use crate::error::PresenceError;
use crate::fallback::fallback_snapshot;
use crate::model::{ConnectionState, PresenceSnapshot, SnapshotSource};
use crate::rest::PresenceApi;

const EVENT_CAPACITY: usize = 64;

/// The fetch that currently owns the `loading` flag.
struct InFlight {
    id: u64,
    cancel: CancellationToken,
}

pub(crate) struct SyncCore {
    pub(crate) user_id: String,
    pub(crate) config: SyncConfig,
    api: Arc<dyn PresenceApi>,
    state: watch::Sender<PresenceState>,
    events: EventBus<PresenceEvent>,
    in_flight: Mutex<Option<InFlight>>,
    next_fetch: AtomicU64,
    /// Monotonic stamp of the applied snapshot; only touched under the
    /// watch write lock.
    applied: StdMutex<Option<Instant>>,
    pub(crate) root: CancellationToken,
}

impl SyncCore {
    pub(crate) fn new(user_id: String, config: SyncConfig, api: Arc<dyn PresenceApi>) -> Self {
        let (state, _) = watch::channel(PresenceState::default());
        Self {
            user_id,
            config,
            api,
            state,
            events: EventBus::new(EVENT_CAPACITY),
            in_flight: Mutex::new(None),
            next_fetch: AtomicU64::new(1),
            applied: StdMutex::new(None),
            root: CancellationToken::new(),
        }
    }

    pub(crate) fn snapshot_state(&self) -> PresenceState {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<PresenceState> {
        self.state.subscribe()
    }

    pub(crate) fn events(&self) -> &EventBus<PresenceEvent> {
        &self.events
    }

    // -----------------------------------------------------------------------
    // Fetch
    // -----------------------------------------------------------------------

    /// One REST fetch. Supersedes whatever fetch is in flight and always
    /// resolves to the resulting view.
    pub(crate) async fn fetch(&self) -> PresenceState {
        let id = self.next_fetch.fetch_add(1, Ordering::Relaxed);
        let token = self.root.child_token();
        {
            let mut slot = self.in_flight.lock().await;
            let previous = slot.replace(InFlight {
                id,
                cancel: token.clone(),
            });
            if let Some(previous) = previous {
                debug!(superseded = previous.id, by = id, "Cancelling superseded fetch");
                previous.cancel.cancel();
            }
        }

        let cid = new_correlation_id();
        let issued = Instant::now();
        let issued_at = Utc::now();
        debug!(cid = %cid, user_id = %self.user_id, "Presence fetch");
        self.begin_attempt();

        let timeout = self.config.request_timeout;
        let outcome = tokio::select! {
            _ = token.cancelled() => None,
            result = tokio::time::timeout(timeout, self.api.fetch_user(&self.user_id)) => {
                Some(result.unwrap_or(Err(PresenceError::Timeout(timeout.as_millis() as u64))))
            }
        };

        let owns_loading = {
            let mut slot = self.in_flight.lock().await;
            if slot.as_ref().is_some_and(|f| f.id == id) {
                *slot = None;
                true
            } else {
                false
            }
        };

        let outcome = if token.is_cancelled() { None } else { outcome };

        match outcome {
            None => {
                debug!(cid = %cid, "Fetch cancelled");
                if owns_loading {
                    self.state.send_if_modified(|state| std::mem::replace(&mut state.loading, false));
                }
            }
            Some(Ok(data)) => {
                match PresenceSnapshot::from_lanyard(&self.user_id, data, SnapshotSource::Rest, issued_at)
                {
                    Ok(snapshot) => {
                        info!(cid = %cid, status = ?snapshot.status, "Presence fetched");
                        self.apply_snapshot(snapshot, issued, owns_loading);
                    }
                    Err(e) => self.apply_failure(&cid, e, issued, issued_at, owns_loading),
                }
            }
            Some(Err(e)) => self.apply_failure(&cid, e, issued, issued_at, owns_loading),
        }

        self.snapshot_state()
    }

    /// Mark loading and, after a failure, move back to `Connecting`.
    fn begin_attempt(&self) {
        let mut taken = Vec::new();
        self.state.send_if_modified(|state| {
            let was_loading = std::mem::replace(&mut state.loading, true);
            if state.connection == ConnectionState::Disconnected {
                taken = advance(state, ConnectionState::Connecting);
            }
            !was_loading || !taken.is_empty()
        });
        self.publish_transitions(taken);
    }

    // -----------------------------------------------------------------------
    // Apply
    // -----------------------------------------------------------------------

    /// Apply a real snapshot from either transport. `stamp` is the fetch
    /// issue time or the frame arrival time.
    pub(crate) fn apply_snapshot(
        &self,
        snapshot: PresenceSnapshot,
        stamp: Instant,
        clear_loading: bool,
    ) -> bool {
        self.apply(snapshot, stamp, None, clear_loading)
    }

    fn apply_failure(
        &self,
        cid: &str,
        error: PresenceError,
        issued: Instant,
        issued_at: DateTime<Utc>,
        clear_loading: bool,
    ) {
        warn!(cid = %cid, user_id = %self.user_id, error = %error, "Presence fetch failed, using fallback");
        let fallback = fallback_snapshot(&self.user_id, &self.config.fallback, issued_at);
        self.apply(fallback, issued, Some(error.diagnostic()), clear_loading);
    }

    /// Replace the snapshot if `stamp` is strictly later than the applied
    /// one's. Returns whether it was applied.
    fn apply(
        &self,
        snapshot: PresenceSnapshot,
        stamp: Instant,
        diagnostic: Option<String>,
        clear_loading: bool,
    ) -> bool {
        let source = snapshot.source;
        let fetched_at = snapshot.fetched_at;
        let target = if diagnostic.is_some() {
            ConnectionState::Disconnected
        } else {
            ConnectionState::Connected
        };

        let mut applied = false;
        let mut taken = Vec::new();
        let published_diagnostic = diagnostic.clone();
        self.state.send_if_modified(|state| {
            let loading_changed = clear_loading && std::mem::replace(&mut state.loading, false);

            let mut applied_stamp = lock(&self.applied);
            if applied_stamp.is_some_and(|current| stamp <= current) {
                return loading_changed;
            }
            *applied_stamp = Some(stamp);

            state.snapshot = Some(Arc::new(snapshot));
            state.error = diagnostic;
            state.last_updated = Some(fetched_at);
            taken = advance(state, target);
            applied = true;
            true
        });

        if applied {
            debug!(source = ?source, fetched_at = %fetched_at, "Snapshot applied");
            self.events.publish(PresenceEvent::SnapshotApplied { source, fetched_at });
            self.publish_transitions(taken);
            if let Some(diagnostic) = published_diagnostic {
                self.events.publish(PresenceEvent::Diagnostic(diagnostic));
            }
        } else {
            debug!(source = ?source, fetched_at = %fetched_at, "Discarding stale outcome");
            self.events.publish(PresenceEvent::StaleDiscarded { source, fetched_at });
        }
        applied
    }

    // -----------------------------------------------------------------------
    // Connection
    // -----------------------------------------------------------------------

    /// Request a connection state without touching the snapshot.
    pub(crate) fn set_connection(&self, next: ConnectionState) {
        let mut taken = Vec::new();
        self.state.send_if_modified(|state| {
            taken = advance(state, next);
            !taken.is_empty()
        });
        self.publish_transitions(taken);
    }

    /// `Disconnected → Connecting` ahead of a socket reconnect; a no-op in
    /// any other state.
    pub(crate) fn begin_reconnect(&self) {
        if self.state.borrow().connection == ConnectionState::Disconnected {
            self.set_connection(ConnectionState::Connecting);
        }
    }

    pub(crate) fn finish(&self) {
        self.state
            .send_if_modified(|state| std::mem::replace(&mut state.loading, false));
        self.events.publish(PresenceEvent::Stopped);
    }

    fn publish_transitions(&self, taken: Vec<(ConnectionState, ConnectionState)>) {
        for (from, to) in taken {
            self.events.publish(PresenceEvent::ConnectionChanged { from, to });
        }
    }
}
