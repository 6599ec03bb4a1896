use mercury_common::MercuryError;

/// Failures talking to the presence provider.
///
/// Every variant except `InvalidUserId` is recoverable: the sync core turns
/// it into a fallback snapshot plus a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresenceError {
    #[error("User not found. You may need to join the Lanyard Discord server at discord.gg/lanyard")]
    NotRegistered,

    #[error("Rate limited. Please try again later")]
    RateLimited,

    #[error("Lanyard service is temporarily unavailable (HTTP {0})")]
    ProviderUnavailable(u16),

    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    #[error("Network connection failed: {0}")]
    NetworkFailure(String),

    #[error("Invalid API response: {0}")]
    MalformedResponse(String),

    #[error("API error ({0})")]
    UnexpectedStatus(u16),

    #[error("user id must not be empty")]
    InvalidUserId,
}

impl PresenceError {
    /// Consumer-facing diagnostic string.
    pub fn diagnostic(&self) -> String {
        format!("Discord API: {self}")
    }
}

impl From<PresenceError> for MercuryError {
    fn from(e: PresenceError) -> Self {
        MercuryError::Presence(e.to_string())
    }
}
