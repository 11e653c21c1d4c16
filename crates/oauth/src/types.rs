use {
    chrono::{DateTime, TimeDelta, Utc},
    serde::{Deserialize, Serialize},
};

/// Raw token payload returned by the Webex `access_token` endpoint.
///
/// Lifetimes are relative, in seconds from the moment the response is received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in: i64,
    pub refresh_token: String,
    pub refresh_token_expires_in: i64,
}

/// OAuth access token with absolute UTC expiration timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub expires: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_expires: DateTime<Utc>,
}

impl AccessToken {
    /// Anchor both relative lifetimes of `grant` at `captured_at`.
    pub fn from_grant(grant: TokenGrant, captured_at: DateTime<Utc>) -> Self {
        Self {
            expires: offset(captured_at, grant.expires_in),
            refresh_token_expires: offset(captured_at, grant.refresh_token_expires_in),
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
        }
    }

    /// Build a token from a grant that was just received.
    pub fn received(grant: TokenGrant) -> Self {
        Self::from_grant(grant, Utc::now())
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires
    }

    pub fn is_refresh_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.refresh_token_expires
    }

    /// Two-space indented JSON, as shown to the user on the token page.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// Saturates instead of panicking on absurd lifetimes.
fn offset(at: DateTime<Utc>, seconds: i64) -> DateTime<Utc> {
    TimeDelta::try_seconds(seconds)
        .and_then(|delta| at.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
