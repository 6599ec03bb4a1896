//! Status display mapping and image URL helpers shared by every consumer.

use chrono::{DateTime, Utc};

use crate::model::{Activity, DiscordProfile, PresenceSnapshot, PresenceStatus};
use crate::timing::{elapsed_time, format_clock};

const CDN_BASE: &str = "https://cdn.discordapp.com";
const MEDIA_PROXY_BASE: &str = "https://media.discordapp.net";

/// Colour token and label for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPresentation {
    pub color_token: &'static str,
    pub label: &'static str,
}

pub fn status_to_presentation(status: PresenceStatus) -> StatusPresentation {
    let (color_token, label) = match status {
        PresenceStatus::Online => ("green", "Online"),
        PresenceStatus::Idle => ("yellow", "Idle"),
        PresenceStatus::DoNotDisturb => ("red", "Do Not Disturb"),
        PresenceStatus::Offline => ("gray", "Offline"),
    };
    StatusPresentation { color_token, label }
}

/// 128px avatar URL, if the profile has a custom avatar.
pub fn avatar_url(profile: &DiscordProfile) -> Option<String> {
    let hash = profile.avatar.as_deref()?;
    Some(format!(
        "{CDN_BASE}/avatars/{}/{hash}.png?size=128",
        profile.id
    ))
}

/// URL of an activity's large image.
///
/// `mp:` keys go through the media proxy; anything else needs the
/// application id to resolve against the app-assets CDN.
pub fn activity_image_url(activity: &Activity) -> Option<String> {
    let key = activity.image_ref.as_deref()?;
    if let Some(rest) = key.strip_prefix("mp:") {
        return Some(format!("{MEDIA_PROXY_BASE}/{rest}"));
    }
    let app_id = activity.application_id.as_deref()?;
    Some(format!("{CDN_BASE}/app-assets/{app_id}/{key}.png"))
}

impl PresenceSnapshot {
    /// One-line summary: music first, then the primary activity.
    pub fn headline(&self, now: DateTime<Utc>) -> Option<String> {
        if let Some(music) = &self.music {
            let progress = music.progress_at(now);
            return Some(format!(
                "Listening to {} by {} ({} / {})",
                music.track_title,
                music.artist,
                format_clock(progress.elapsed),
                format_clock(progress.total)
            ));
        }

        let activity = self.primary_activity()?;
        let mut line = format!("Playing {}", activity.name);
        if let Some(details) = &activity.details {
            line.push_str(" - ");
            line.push_str(details);
        }
        if let Some(elapsed) = elapsed_time(activity, now) {
            line.push_str(" (");
            line.push_str(&elapsed);
            line.push(')');
        }
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Duration;

    use super::*;
    use crate::model::{ActivityKind, MusicSession, SnapshotSource};

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn activity(image_ref: Option<&str>, app_id: Option<&str>) -> Activity {
        Activity {
            name: "Visual Studio Code".into(),
            kind: ActivityKind::Playing,
            details: Some("Editing lib.rs".into()),
            state: None,
            started_at: Some(now() - Duration::minutes(90)),
            ends_at: None,
            image_ref: image_ref.map(String::from),
            image_text: None,
            application_id: app_id.map(String::from),
        }
    }

    fn snapshot(activities: Vec<Activity>, music: Option<MusicSession>) -> PresenceSnapshot {
        PresenceSnapshot {
            user_id: "123".into(),
            profile: None,
            status: PresenceStatus::Online,
            activities,
            music,
            kv: HashMap::new(),
            fetched_at: now(),
            source: SnapshotSource::Rest,
            synthetic: false,
        }
    }

    #[test]
    fn every_status_has_a_presentation() {
        let cases = [
            (PresenceStatus::Online, "green", "Online"),
            (PresenceStatus::Idle, "yellow", "Idle"),
            (PresenceStatus::DoNotDisturb, "red", "Do Not Disturb"),
            (PresenceStatus::Offline, "gray", "Offline"),
        ];
        for (status, color, label) in cases {
            let p = status_to_presentation(status);
            assert_eq!(p.color_token, color);
            assert_eq!(p.label, label);
        }
    }

    #[test]
    fn avatar_url_needs_hash() {
        let mut profile = DiscordProfile {
            id: "94490510688792576".into(),
            username: "delta".into(),
            global_name: None,
            avatar: Some("a_1f2e".into()),
            discriminator: None,
        };
        assert_eq!(
            avatar_url(&profile).as_deref(),
            Some("https://cdn.discordapp.com/avatars/94490510688792576/a_1f2e.png?size=128")
        );
        profile.avatar = None;
        assert_eq!(avatar_url(&profile), None);
    }

    #[test]
    fn app_asset_image() {
        let act = activity(Some("373370493127884800"), Some("383226320970055681"));
        assert_eq!(
            activity_image_url(&act).as_deref(),
            Some("https://cdn.discordapp.com/app-assets/383226320970055681/373370493127884800.png")
        );
    }

    #[test]
    fn media_proxy_image() {
        let act = activity(Some("mp:external/abc/https/example.com/a.png"), None);
        assert_eq!(
            activity_image_url(&act).as_deref(),
            Some("https://media.discordapp.net/external/abc/https/example.com/a.png")
        );
    }

    #[test]
    fn image_without_app_id_is_none() {
        assert_eq!(activity_image_url(&activity(Some("rust"), None)), None);
        assert_eq!(activity_image_url(&activity(None, Some("1"))), None);
    }

    #[test]
    fn headline_prefers_music() {
        let music = MusicSession {
            track_id: None,
            track_title: "Heat Waves".into(),
            artist: "Glass Animals".into(),
            album: "Dreamland".into(),
            artwork_url: None,
            started_at: now() - Duration::seconds(65),
            ends_at: now() + Duration::seconds(173),
        };
        let snap = snapshot(vec![activity(None, None)], Some(music));
        assert_eq!(
            snap.headline(now()).as_deref(),
            Some("Listening to Heat Waves by Glass Animals (1:05 / 3:58)")
        );
    }

    #[test]
    fn headline_from_activity() {
        let snap = snapshot(vec![activity(None, None)], None);
        assert_eq!(
            snap.headline(now()).as_deref(),
            Some("Playing Visual Studio Code - Editing lib.rs (1h 30m elapsed)")
        );
    }

    #[test]
    fn headline_empty() {
        assert_eq!(snapshot(Vec::new(), None).headline(now()), None);
    }
}
