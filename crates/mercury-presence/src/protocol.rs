//! Wire types for the Lanyard presence provider.
//!
//! These mirror the JSON the provider sends over REST and the socket. They
//! are validated into the domain model in `model.rs`; nothing outside this
//! crate's boundary code handles raw provider payloads.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::PresenceStatus;

// ---------------------------------------------------------------------------
// Socket opcodes and event names
// ---------------------------------------------------------------------------

/// Opcodes used on the Lanyard socket.
pub mod opcodes {
    /// Server → client: an event carrying presence data.
    pub const EVENT: u8 = 0;
    /// Server → client: first frame, carries `heartbeat_interval`.
    pub const HELLO: u8 = 1;
    /// Client → server: subscribe to a user.
    pub const INITIALIZE: u8 = 2;
    /// Client → server: keep-alive.
    pub const HEARTBEAT: u8 = 3;
}

/// Event names carried in the `t` field of event frames.
pub mod events {
    pub const INIT_STATE: &str = "INIT_STATE";
    pub const PRESENCE_UPDATE: &str = "PRESENCE_UPDATE";
}

// ---------------------------------------------------------------------------
// REST envelope
// ---------------------------------------------------------------------------

/// Body of `GET /v1/users/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<LanyardData>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: String,
}

// ---------------------------------------------------------------------------
// Presence payload
// ---------------------------------------------------------------------------

/// Presence data for one user, shared by REST responses and socket events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanyardData {
    #[serde(default)]
    pub discord_user: Option<DiscordUser>,
    pub discord_status: PresenceStatus,
    #[serde(default)]
    pub activities: Vec<LanyardActivity>,
    #[serde(default)]
    pub spotify: Option<SpotifyPayload>,
    #[serde(default)]
    pub listening_to_spotify: bool,
    #[serde(default)]
    pub kv: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub global_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanyardActivity {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub timestamps: Option<ActivityTimestamps>,
    #[serde(default)]
    pub assets: Option<ActivityAssets>,
}

/// Activity timestamps in Unix milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityTimestamps {
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityAssets {
    #[serde(default)]
    pub large_image: Option<String>,
    #[serde(default)]
    pub large_text: Option<String>,
    #[serde(default)]
    pub small_image: Option<String>,
    #[serde(default)]
    pub small_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyPayload {
    #[serde(default)]
    pub track_id: Option<String>,
    pub timestamps: SpotifyTimestamps,
    pub song: String,
    pub artist: String,
    #[serde(default)]
    pub album_art_url: Option<String>,
    #[serde(default)]
    pub album: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTimestamps {
    pub start: i64,
    pub end: i64,
}

// ---------------------------------------------------------------------------
// Socket frames
// ---------------------------------------------------------------------------

/// A socket frame envelope in either direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocketFrame {
    pub op: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<serde_json::Value>,
}

impl SocketFrame {
    /// Subscribe to a single user's presence.
    pub fn initialize(user_id: &str) -> Self {
        Self {
            op: opcodes::INITIALIZE,
            seq: None,
            t: None,
            d: Some(serde_json::json!({ "subscribe_to_id": user_id })),
        }
    }

    pub fn heartbeat() -> Self {
        Self {
            op: opcodes::HEARTBEAT,
            seq: None,
            t: None,
            d: None,
        }
    }
}

/// Payload of the hello frame.
#[derive(Debug, Clone, Deserialize)]
pub struct HelloPayload {
    /// Milliseconds between client heartbeats.
    pub heartbeat_interval: u64,
}
