//! Presence synchronization for a single tracked Discord account.
//!
//! `PresenceSync` reads the account's status, activities and Spotify session
//! from the Lanyard provider: a REST fetch on start, optional polling, and an
//! optional push socket. Consumers read one shared view and never see a
//! provider error directly; failures become a synthetic fallback snapshot
//! plus a diagnostic string.
//!
//! # Example
//!
//! ```rust,no_run
//! use mercury_presence::{PresenceSync, SyncConfig};
//!
//! # async fn run() -> Result<(), mercury_presence::PresenceError> {
//! let sync = PresenceSync::new("94490510688792576", SyncConfig::default())?;
//! let state = sync.start().await;
//! if let Some(snapshot) = &state.snapshot {
//!     println!("{:?}", snapshot.status);
//! }
//! sync.subscribe_live();
//! sync.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fallback;
pub mod model;
pub mod presentation;
pub mod protocol;
pub mod rest;
pub mod socket;
pub mod sync;
pub mod timing;

pub use error::PresenceError;
pub use fallback::{fallback_snapshot, FallbackProfile};
pub use model::{
    Activity, ActivityKind, ConnectionState, DiscordProfile, MusicSession, PresenceSnapshot,
    PresenceStatus, SnapshotSource,
};
pub use presentation::{activity_image_url, avatar_url, status_to_presentation, StatusPresentation};
pub use rest::{fetch_many, LanyardRestClient, PresenceApi};
pub use socket::{LiveSocket, SocketConfig, SocketEvent};
pub use sync::{PresenceEvent, PresenceState, PresenceSync, SyncConfig};
pub use timing::{elapsed_time, format_clock, PlaybackProgress};
