//! Derived time values: activity elapsed time and music playback progress.

use chrono::{DateTime, Duration, Utc};

use crate::model::{Activity, MusicSession};

/// Human-readable time since an activity started, e.g. `"1h 5m elapsed"`.
///
/// Returns `None` when the activity carries no start time. Start times in
/// the future count as zero elapsed.
pub fn elapsed_time(activity: &Activity, now: DateTime<Utc>) -> Option<String> {
    let started_at = activity.started_at?;
    let elapsed = (now - started_at).max(Duration::zero());

    let hours = elapsed.num_hours();
    let minutes = elapsed.num_minutes() % 60;

    Some(if hours > 0 {
        format!("{hours}h {minutes}m elapsed")
    } else {
        format!("{minutes}m elapsed")
    })
}

/// Playback position within a music session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackProgress {
    pub elapsed: Duration,
    pub total: Duration,
    /// `elapsed / total` in `[0.0, 1.0]`; zero for empty tracks.
    pub fraction: f64,
}

impl MusicSession {
    /// Progress at `now`, clamped to the track length.
    pub fn progress_at(&self, now: DateTime<Utc>) -> PlaybackProgress {
        let total = (self.ends_at - self.started_at).max(Duration::zero());
        let elapsed = (now - self.started_at).clamp(Duration::zero(), total);

        let fraction = if total.is_zero() {
            0.0
        } else {
            elapsed.num_milliseconds() as f64 / total.num_milliseconds() as f64
        };

        PlaybackProgress {
            elapsed,
            total,
            fraction,
        }
    }
}

/// Format a duration as `m:ss`. Negative durations render as `0:00`.
pub fn format_clock(duration: Duration) -> String {
    let secs = duration.num_seconds().max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActivityKind;

    fn base() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn activity(started_at: Option<DateTime<Utc>>) -> Activity {
        Activity {
            name: "Visual Studio Code".into(),
            kind: ActivityKind::Playing,
            details: None,
            state: None,
            started_at,
            ends_at: None,
            image_ref: None,
            image_text: None,
            application_id: None,
        }
    }

    fn session(length_secs: i64) -> MusicSession {
        MusicSession {
            track_id: None,
            track_title: "Heat Waves".into(),
            artist: "Glass Animals".into(),
            album: "Dreamland".into(),
            artwork_url: None,
            started_at: base(),
            ends_at: base() + Duration::seconds(length_secs),
        }
    }

    #[test]
    fn elapsed_none_without_start() {
        assert_eq!(elapsed_time(&activity(None), base()), None);
    }

    #[test]
    fn elapsed_minutes_only() {
        let act = activity(Some(base()));
        assert_eq!(
            elapsed_time(&act, base() + Duration::minutes(5)).as_deref(),
            Some("5m elapsed")
        );
        assert_eq!(elapsed_time(&act, base()).as_deref(), Some("0m elapsed"));
    }

    #[test]
    fn elapsed_hours_and_minutes() {
        let act = activity(Some(base()));
        let now = base() + Duration::minutes(65) + Duration::seconds(30);
        assert_eq!(elapsed_time(&act, now).as_deref(), Some("1h 5m elapsed"));
    }

    #[test]
    fn elapsed_future_start_clamps_to_zero() {
        let act = activity(Some(base() + Duration::minutes(10)));
        assert_eq!(elapsed_time(&act, base()).as_deref(), Some("0m elapsed"));
    }

    #[test]
    fn elapsed_is_non_decreasing() {
        let act = activity(Some(base()));
        let mut last = 0i64;
        for minutes in [0, 1, 59, 60, 61, 119, 120, 600] {
            let now = base() + Duration::minutes(minutes);
            let text = elapsed_time(&act, now).unwrap();
            let (h, m) = match text.split_once("h ") {
                Some((h, rest)) => (h.parse::<i64>().unwrap(), rest),
                None => (0, text.as_str()),
            };
            let m: i64 = m.trim_end_matches("m elapsed").parse().unwrap();
            let total = h * 60 + m;
            assert!(total >= last, "{text} went backwards");
            last = total;
        }
    }

    #[test]
    fn progress_midway() {
        let progress = session(200).progress_at(base() + Duration::seconds(50));
        assert_eq!(progress.elapsed, Duration::seconds(50));
        assert_eq!(progress.total, Duration::seconds(200));
        assert!((progress.fraction - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_clamps_both_ends() {
        let music = session(100);
        let before = music.progress_at(base() - Duration::seconds(10));
        assert_eq!(before.elapsed, Duration::zero());
        assert_eq!(before.fraction, 0.0);

        let after = music.progress_at(base() + Duration::seconds(500));
        assert_eq!(after.elapsed, Duration::seconds(100));
        assert_eq!(after.fraction, 1.0);
    }

    #[test]
    fn progress_of_empty_track() {
        let progress = session(0).progress_at(base());
        assert_eq!(progress.fraction, 0.0);
        assert!(progress.total.is_zero());
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(Duration::seconds(0)), "0:00");
        assert_eq!(format_clock(Duration::seconds(65)), "1:05");
        assert_eq!(format_clock(Duration::seconds(238)), "3:58");
        assert_eq!(format_clock(Duration::seconds(-4)), "0:00");
    }
}
