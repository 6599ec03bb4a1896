//! Maps the on-disk config onto the runtime presence settings.

use std::time::Duration;

use mercury_config::{FallbackConfig, MercuryConfig};
use mercury_presence::{FallbackProfile, SyncConfig};

/// Build the `PresenceSync` settings. `poll_override` replaces the
/// configured poll interval; 0 disables polling either way.
pub fn sync_config(config: &MercuryConfig, poll_override: Option<u32>) -> SyncConfig {
    let presence = &config.presence;
    let poll_secs = poll_override.unwrap_or(presence.poll_interval);

    SyncConfig {
        api_base: presence.api_base.clone(),
        socket_url: presence.socket_url.clone(),
        request_timeout: Duration::from_secs(u64::from(presence.request_timeout)),
        poll_interval: (poll_secs > 0).then(|| Duration::from_secs(u64::from(poll_secs))),
        live_delay: Duration::from_millis(u64::from(presence.live_delay_ms)),
        connect_timeout: Duration::from_secs(u64::from(presence.connect_timeout)),
        reconnect_delay: Duration::from_secs(u64::from(presence.reconnect_delay)),
        fallback: fallback_profile(&config.fallback),
    }
}

pub fn fallback_profile(fallback: &FallbackConfig) -> FallbackProfile {
    FallbackProfile {
        display_name: fallback.display_name.clone(),
        activity_name: fallback.activity_name.clone(),
        activity_details: fallback.activity_details.clone(),
        activity_state: fallback.activity_state.clone(),
        application_id: Some(fallback.application_id.clone()).filter(|id| !id.is_empty()),
        started_minutes_ago: fallback.started_minutes_ago,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_presence_defaults() {
        let sync = sync_config(&MercuryConfig::default(), None);
        let expected = SyncConfig::default();

        assert_eq!(sync.api_base, expected.api_base);
        assert_eq!(sync.socket_url, expected.socket_url);
        assert_eq!(sync.request_timeout, expected.request_timeout);
        assert_eq!(sync.poll_interval, expected.poll_interval);
        assert_eq!(sync.live_delay, expected.live_delay);
        assert_eq!(sync.connect_timeout, expected.connect_timeout);
        assert_eq!(sync.reconnect_delay, expected.reconnect_delay);
        assert_eq!(sync.fallback, expected.fallback);
    }

    #[test]
    fn poll_override_and_disable() {
        let config = MercuryConfig::default();
        assert_eq!(
            sync_config(&config, Some(15)).poll_interval,
            Some(Duration::from_secs(15))
        );
        assert_eq!(sync_config(&config, Some(0)).poll_interval, None);

        let mut config = MercuryConfig::default();
        config.presence.poll_interval = 0;
        assert_eq!(sync_config(&config, None).poll_interval, None);
    }

    #[test]
    fn empty_application_id_becomes_none() {
        let mut fallback = FallbackConfig::default();
        fallback.application_id.clear();
        assert_eq!(fallback_profile(&fallback).application_id, None);
    }
}
