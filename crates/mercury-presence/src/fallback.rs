//! Synthetic placeholder presence shown while the provider is unreachable.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::model::{
    Activity, ActivityKind, DiscordProfile, PresenceSnapshot, PresenceStatus, SnapshotSource,
};

/// Strings used to build the placeholder snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackProfile {
    pub display_name: String,
    pub activity_name: String,
    pub activity_details: String,
    pub activity_state: String,
    pub application_id: Option<String>,
    pub started_minutes_ago: u32,
}

impl Default for FallbackProfile {
    fn default() -> Self {
        Self {
            display_name: "Delta".into(),
            activity_name: "Visual Studio Code".into(),
            activity_details: "Editing TypeScript".into(),
            activity_state: "Working on Portfolio".into(),
            application_id: Some("383226320970055681".into()),
            started_minutes_ago: 30,
        }
    }
}

/// Build a clearly synthetic snapshot stamped with `fetched_at`.
pub fn fallback_snapshot(
    user_id: &str,
    profile: &FallbackProfile,
    fetched_at: DateTime<Utc>,
) -> PresenceSnapshot {
    let started_at = fetched_at - Duration::minutes(i64::from(profile.started_minutes_ago));

    PresenceSnapshot {
        user_id: user_id.to_string(),
        profile: Some(DiscordProfile {
            id: user_id.to_string(),
            username: profile.display_name.clone(),
            global_name: None,
            avatar: None,
            discriminator: None,
        }),
        status: PresenceStatus::Online,
        activities: vec![Activity {
            name: profile.activity_name.clone(),
            kind: ActivityKind::Playing,
            details: Some(profile.activity_details.clone()),
            state: Some(profile.activity_state.clone()),
            started_at: Some(started_at),
            ends_at: None,
            image_ref: None,
            image_text: None,
            application_id: profile.application_id.clone(),
        }],
        music: None,
        kv: HashMap::new(),
        fetched_at,
        source: SnapshotSource::Fallback,
        synthetic: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::elapsed_time;

    #[test]
    fn default_fallback_shape() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let snap = fallback_snapshot("404case", &FallbackProfile::default(), now);

        assert!(snap.synthetic);
        assert_eq!(snap.source, SnapshotSource::Fallback);
        assert_eq!(snap.user_id, "404case");
        assert_eq!(snap.status, PresenceStatus::Online);
        assert!(snap.music.is_none());
        assert_eq!(snap.fetched_at, now);
        assert_eq!(snap.profile.as_ref().unwrap().display_name(), "Delta");

        assert_eq!(snap.activities.len(), 1);
        let act = &snap.activities[0];
        assert_eq!(act.name, "Visual Studio Code");
        assert_eq!(act.kind, ActivityKind::Playing);
        assert_eq!(act.details.as_deref(), Some("Editing TypeScript"));
        assert_eq!(act.state.as_deref(), Some("Working on Portfolio"));
        assert_eq!(elapsed_time(act, now).as_deref(), Some("30m elapsed"));
    }

    #[test]
    fn custom_profile_strings() {
        let profile = FallbackProfile {
            display_name: "Mercury".into(),
            activity_name: "Neovim".into(),
            activity_details: "Editing Rust".into(),
            activity_state: "mercury-bio".into(),
            application_id: None,
            started_minutes_ago: 90,
        };
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let snap = fallback_snapshot("1", &profile, now);
        let act = snap.primary_activity().unwrap();
        assert_eq!(act.name, "Neovim");
        assert!(act.application_id.is_none());
        assert_eq!(elapsed_time(act, now).as_deref(), Some("1h 30m elapsed"));
    }
}
