//! Presence and fallback section validation.

use crate::schema::{MercuryConfig, POLL_INTERVAL_RANGE};

use super::helpers::{validate_range, validate_scheme};

/// Validate provider endpoints and timings.
pub(crate) fn validate_presence(errors: &mut Vec<String>, config: &MercuryConfig) {
    let presence = &config.presence;

    validate_scheme(
        errors,
        "presence.api_base",
        &presence.api_base,
        &["https://", "http://"],
    );
    validate_scheme(
        errors,
        "presence.socket_url",
        &presence.socket_url,
        &["wss://", "ws://"],
    );

    validate_range(errors, "presence.live_delay_ms", presence.live_delay_ms, 0, 10_000);
    // 0 disables polling.
    if presence.poll_interval != 0 {
        validate_range(
            errors,
            "presence.poll_interval",
            presence.poll_interval,
            *POLL_INTERVAL_RANGE.start(),
            *POLL_INTERVAL_RANGE.end(),
        );
    }
    validate_range(errors, "presence.request_timeout", presence.request_timeout, 1, 30);
    validate_range(errors, "presence.connect_timeout", presence.connect_timeout, 1, 60);
    validate_range(errors, "presence.reconnect_delay", presence.reconnect_delay, 1, 300);
}

/// Validate the placeholder profile.
pub(crate) fn validate_fallback(errors: &mut Vec<String>, config: &MercuryConfig) {
    if config.fallback.activity_name.trim().is_empty() {
        errors.push("fallback.activity_name must not be empty".into());
    }
    validate_range(
        errors,
        "fallback.started_minutes_ago",
        config.fallback.started_minutes_ago,
        0,
        24 * 60,
    );
}
