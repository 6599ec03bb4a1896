//! Domain model for a tracked user's presence.
//!
//! Snapshots are built once from a validated provider payload and never
//! mutated afterwards; consumers receive them behind an `Arc`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PresenceError;
use crate::protocol::{LanyardActivity, LanyardData, SpotifyPayload};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Discord online status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Idle,
    #[serde(rename = "dnd")]
    DoNotDisturb,
    Offline,
}

/// Discord activity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Playing,
    Streaming,
    Listening,
    Watching,
    Custom,
    Competing,
}

impl TryFrom<u8> for ActivityKind {
    type Error = PresenceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Playing),
            1 => Ok(Self::Streaming),
            2 => Ok(Self::Listening),
            3 => Ok(Self::Watching),
            4 => Ok(Self::Custom),
            5 => Ok(Self::Competing),
            other => Err(PresenceError::MalformedResponse(format!(
                "unknown activity type {other}"
            ))),
        }
    }
}

/// State of the transport, not of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionState {
    /// Whether `self → next` is one of the four allowed edges.
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Connecting, Connected)
                | (Connecting, Disconnected)
                | (Connected, Disconnected)
                | (Disconnected, Connecting)
        )
    }
}

/// Where a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    Rest,
    Socket,
    Fallback,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscordProfile {
    pub id: String,
    pub username: String,
    pub global_name: Option<String>,
    pub avatar: Option<String>,
    pub discriminator: Option<String>,
}

impl DiscordProfile {
    /// Global display name, falling back to the username.
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub name: String,
    pub kind: ActivityKind,
    pub details: Option<String>,
    pub state: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    /// Asset key of the large image, as sent by the provider.
    pub image_ref: Option<String>,
    pub image_text: Option<String>,
    pub application_id: Option<String>,
}

/// A Spotify session reported through the provider's integration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MusicSession {
    pub track_id: Option<String>,
    pub track_title: String,
    pub artist: String,
    pub album: String,
    pub artwork_url: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// One complete reading of the tracked user's presence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresenceSnapshot {
    pub user_id: String,
    pub profile: Option<DiscordProfile>,
    pub status: PresenceStatus,
    pub activities: Vec<Activity>,
    pub music: Option<MusicSession>,
    pub kv: HashMap<String, String>,
    pub fetched_at: DateTime<Utc>,
    pub source: SnapshotSource,
    pub synthetic: bool,
}

impl PresenceSnapshot {
    /// Validate a provider payload into a snapshot.
    pub fn from_lanyard(
        user_id: &str,
        data: LanyardData,
        source: SnapshotSource,
        fetched_at: DateTime<Utc>,
    ) -> Result<Self, PresenceError> {
        let mut activities = Vec::with_capacity(data.activities.len());
        for raw in data.activities {
            if ActivityKind::try_from(raw.kind).is_err() {
                warn!(name = %raw.name, kind = raw.kind, "Skipping activity of unknown type");
                continue;
            }
            activities.push(Activity::try_from(raw)?);
        }

        // The payload may carry a stale Spotify object after playback stops.
        let music = match (data.listening_to_spotify, data.spotify) {
            (true, Some(payload)) => Some(MusicSession::try_from(payload)?),
            _ => None,
        };

        let profile = data.discord_user.map(|user| DiscordProfile {
            id: user.id,
            username: user.username,
            global_name: user.global_name,
            avatar: user.avatar,
            discriminator: user.discriminator,
        });

        Ok(Self {
            user_id: user_id.to_string(),
            profile,
            status: data.discord_status,
            activities,
            music,
            kv: data.kv,
            fetched_at,
            source,
            synthetic: false,
        })
    }

    /// First `Playing` activity, the one activity cards highlight.
    pub fn primary_activity(&self) -> Option<&Activity> {
        self.activities
            .iter()
            .find(|activity| activity.kind == ActivityKind::Playing)
    }
}

impl TryFrom<LanyardActivity> for Activity {
    type Error = PresenceError;

    fn try_from(raw: LanyardActivity) -> Result<Self, Self::Error> {
        let kind = ActivityKind::try_from(raw.kind)?;
        let (started_at, ends_at) = match raw.timestamps {
            Some(ts) => (
                ts.start.map(millis_to_datetime).transpose()?,
                ts.end.map(millis_to_datetime).transpose()?,
            ),
            None => (None, None),
        };
        let (image_ref, image_text) = match raw.assets {
            Some(assets) => (assets.large_image, assets.large_text),
            None => (None, None),
        };

        Ok(Self {
            name: raw.name,
            kind,
            details: raw.details,
            state: raw.state,
            started_at,
            ends_at,
            image_ref,
            image_text,
            application_id: raw.application_id,
        })
    }
}

impl TryFrom<SpotifyPayload> for MusicSession {
    type Error = PresenceError;

    fn try_from(raw: SpotifyPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            track_id: raw.track_id,
            track_title: raw.song,
            artist: raw.artist,
            album: raw.album,
            artwork_url: raw.album_art_url,
            started_at: millis_to_datetime(raw.timestamps.start)?,
            ends_at: millis_to_datetime(raw.timestamps.end)?,
        })
    }
}

fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>, PresenceError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| PresenceError::MalformedResponse(format!("timestamp {millis} out of range")))
}
