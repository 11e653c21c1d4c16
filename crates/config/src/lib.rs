//! Webex integration settings resolved from the process environment.

use {
    secrecy::{ExposeSecret, SecretString},
    thiserror::Error,
    tracing::debug,
};

pub const ENV_CLIENT_ID: &str = "WEBEX_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "WEBEX_CLIENT_SECRET";
pub const ENV_REDIRECT_URI: &str = "WEBEX_REDIRECT_URI";
pub const ENV_SCOPES: &str = "WEBEX_SCOPES";

/// Public Webex REST API root.
pub const DEFAULT_API_BASE: &str = "https://webexapis.com/v1";

/// Path segment every redirect URI must end with; the gateway serves the
/// OAuth callback there.
pub const REDIRECT_SUFFIX: &str = "/token";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Integration credentials plus the derived, static authorization URL.
///
/// Fields are read-only so the cached authorization URL always matches them.
pub struct WebexConfig {
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
    scopes: String,
    api_base: String,
    authorization_url: String,
}

impl WebexConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: &str,
        scopes: impl Into<String>,
    ) -> Self {
        let mut config = Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
            redirect_uri: normalize_redirect_uri(redirect_uri),
            scopes: scopes.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            authorization_url: String::new(),
        };
        config.authorization_url = config.build_authorization_url();
        config
    }

    /// Read all four `WEBEX_*` variables. Every one of them is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        let client_id = require(ENV_CLIENT_ID)?;
        let client_secret = require(ENV_CLIENT_SECRET)?;
        let redirect_uri = require(ENV_REDIRECT_URI)?;
        let scopes = require(ENV_SCOPES)?;

        let config = Self::new(client_id, client_secret, &redirect_uri, scopes);
        if config.redirect_uri != redirect_uri {
            debug!(
                configured = %redirect_uri,
                normalized = %config.redirect_uri,
                "normalized redirect uri"
            );
        }
        Ok(config)
    }

    /// Point the integration at a different API root (staging, local stubs).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self.authorization_url = self.build_authorization_url();
        self
    }

    /// Authorization URL without a `state` parameter. Identical for every request.
    pub fn authorization_url(&self) -> &str {
        &self.authorization_url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Redirect URI after normalization, always ending in `/token`.
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn scopes(&self) -> &str {
        &self.scopes
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn token_url(&self) -> String {
        format!("{}/access_token", self.api_base)
    }

    pub fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    // Values are passed through verbatim, the provider accepts them unencoded.
    fn build_authorization_url(&self) -> String {
        format!(
            "{}/authorize?client_id={}&response_type=code&redirect_uri={}&scope={}",
            self.api_base, self.client_id, self.redirect_uri, self.scopes
        )
    }
}

impl std::fmt::Debug for WebexConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebexConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Make sure the redirect URI points at the `/token` callback.
pub fn normalize_redirect_uri(uri: &str) -> String {
    if uri.ends_with(REDIRECT_SUFFIX) {
        uri.to_string()
    } else {
        format!("{}{REDIRECT_SUFFIX}", uri.trim_end_matches('/'))
    }
}
