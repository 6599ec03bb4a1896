//! Lanyard REST client and response classification.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::PresenceError;
use crate::protocol::{ApiEnvelope, LanyardData};

const USER_AGENT: &str = concat!("mercury-presence/", env!("CARGO_PKG_VERSION"));

/// Source of presence payloads.
///
/// The sync core only talks to the provider through this trait, so tests
/// can script responses without a network.
#[async_trait]
pub trait PresenceApi: Send + Sync {
    async fn fetch_user(&self, user_id: &str) -> Result<LanyardData, PresenceError>;
}

/// `GET {api_base}/v1/users/{id}` over HTTP.
pub struct LanyardRestClient {
    api_base: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl LanyardRestClient {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, PresenceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PresenceError::NetworkFailure(e.to_string()))?;
        Ok(Self::with_client(api_base, timeout, http))
    }

    /// Use a preconfigured `reqwest::Client`. The per-request timeout is
    /// still applied to every call.
    pub fn with_client(api_base: &str, timeout: Duration, http: reqwest::Client) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            timeout,
            http,
        }
    }

    pub fn user_url(&self, user_id: &str) -> String {
        format!("{}/v1/users/{user_id}", self.api_base)
    }
}

#[async_trait]
impl PresenceApi for LanyardRestClient {
    async fn fetch_user(&self, user_id: &str) -> Result<LanyardData, PresenceError> {
        let url = self.user_url(user_id);
        debug!(url = %url, "Lanyard REST request");

        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.classify_transport(e))?;

        classify_response(status, &body)
    }
}

impl LanyardRestClient {
    fn classify_transport(&self, e: reqwest::Error) -> PresenceError {
        if e.is_timeout() {
            PresenceError::Timeout(self.timeout.as_millis() as u64)
        } else {
            PresenceError::NetworkFailure(e.to_string())
        }
    }
}

/// Map an HTTP status and body onto a payload or a typed failure.
pub fn classify_response(status: StatusCode, body: &str) -> Result<LanyardData, PresenceError> {
    match status {
        StatusCode::NOT_FOUND => return Err(PresenceError::NotRegistered),
        StatusCode::TOO_MANY_REQUESTS => return Err(PresenceError::RateLimited),
        s if s.is_server_error() => return Err(PresenceError::ProviderUnavailable(s.as_u16())),
        s if !s.is_success() => return Err(PresenceError::UnexpectedStatus(s.as_u16())),
        _ => {}
    }

    let envelope: ApiEnvelope = serde_json::from_str(body)
        .map_err(|e| PresenceError::MalformedResponse(e.to_string()))?;

    if !envelope.success {
        let message = envelope
            .error
            .map(|err| err.message)
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| "request was not successful".to_string());
        return Err(PresenceError::MalformedResponse(message));
    }

    envelope
        .data
        .ok_or_else(|| PresenceError::MalformedResponse("missing data".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PresenceStatus;

    #[test]
    fn user_url_trims_trailing_slash() {
        let client =
            LanyardRestClient::new("https://api.lanyard.rest/", Duration::from_secs(8)).unwrap();
        assert_eq!(
            client.user_url("94490510688792576"),
            "https://api.lanyard.rest/v1/users/94490510688792576"
        );
    }

    #[test]
    fn success_envelope() {
        let data = classify_response(
            StatusCode::OK,
            r#"{"success":true,"data":{"discord_status":"idle","activities":[]}}"#,
        )
        .unwrap();
        assert_eq!(data.discord_status, PresenceStatus::Idle);
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            classify_response(StatusCode::NOT_FOUND, "").unwrap_err(),
            PresenceError::NotRegistered
        );
        assert_eq!(
            classify_response(StatusCode::TOO_MANY_REQUESTS, "").unwrap_err(),
            PresenceError::RateLimited
        );
        assert_eq!(
            classify_response(StatusCode::BAD_GATEWAY, "").unwrap_err(),
            PresenceError::ProviderUnavailable(502)
        );
        assert_eq!(
            classify_response(StatusCode::FORBIDDEN, "").unwrap_err(),
            PresenceError::UnexpectedStatus(403)
        );
    }

    #[test]
    fn unsuccessful_envelope_carries_provider_message() {
        let err = classify_response(
            StatusCode::OK,
            r#"{"success":false,"error":{"message":"User is not being monitored by Lanyard","code":"user_not_monitored"}}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            PresenceError::MalformedResponse("User is not being monitored by Lanyard".into())
        );
    }

    #[test]
    fn schema_mismatch_is_malformed() {
        let err = classify_response(StatusCode::OK, r#"{"success":true,"data":{"activities":[]}}"#)
            .unwrap_err();
        assert!(matches!(err, PresenceError::MalformedResponse(_)));

        let err = classify_response(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, PresenceError::MalformedResponse(_)));

        let err = classify_response(StatusCode::OK, r#"{"success":true}"#).unwrap_err();
        assert_eq!(err, PresenceError::MalformedResponse("missing data".into()));
    }
}
