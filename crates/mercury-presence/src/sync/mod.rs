//! PresenceSync: the state machine that merges REST fetches, polling, and
//! the push socket into one consumer view.

mod client;
mod shared;
mod live;
mod poller;
mod state;
mod types;

pub use client::PresenceSync;
pub use types::{PresenceEvent, PresenceState, SyncConfig};

use std::sync::{Mutex, MutexGuard};

/// Lock, recovering from poison.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
