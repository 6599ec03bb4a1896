//! Terminal rendering of the presence view.

use chrono::{DateTime, Utc};
use mercury_presence::{status_to_presentation, ConnectionState, PresenceState};

/// One status line, e.g. `[green] Delta is Online · Playing ... · connected`.
pub fn status_line(state: &PresenceState, now: DateTime<Utc>) -> String {
    let connection = match state.connection {
        ConnectionState::Connecting => "connecting",
        ConnectionState::Connected => "connected",
        ConnectionState::Disconnected => "disconnected",
    };

    let Some(snapshot) = &state.snapshot else {
        let phase = if state.loading { "loading" } else { "no data" };
        return format!("[gray] {phase} · {connection}");
    };

    let badge = status_to_presentation(snapshot.status);
    let name = snapshot
        .profile
        .as_ref()
        .map(|profile| profile.display_name())
        .unwrap_or(snapshot.user_id.as_str());

    let mut line = format!("[{}] {name} is {}", badge.color_token, badge.label);
    if let Some(headline) = snapshot.headline(now) {
        line.push_str(" · ");
        line.push_str(&headline);
    }
    line.push_str(" · ");
    line.push_str(connection);
    if snapshot.synthetic {
        line.push_str(" (placeholder)");
    }
    line
}

/// Diagnostic banner shown under the status line while the view is degraded.
pub fn diagnostic_line(state: &PresenceState) -> Option<String> {
    state.error.as_ref().map(|error| format!("! {error}"))
}
