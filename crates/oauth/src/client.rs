use std::{sync::Arc, time::Duration};

use {
    async_trait::async_trait,
    tracing::{debug, info, warn},
};

use wtr_config::WebexConfig;

use crate::{
    error::ExchangeError,
    types::{AccessToken, TokenGrant},
};

/// Exchanges OAuth credentials with the provider's token endpoint.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Trade an authorization code for a token grant.
    async fn request_access_token(&self, code: &str) -> Result<TokenGrant, ExchangeError>;

    /// Use the refresh token of `token` to obtain a new grant.
    ///
    /// Not reachable from the HTTP surface; the CLI `token refresh` command calls it.
    async fn refresh_access_token(
        &self,
        token: &AccessToken,
    ) -> Result<TokenGrant, ExchangeError>;
}

/// [`TokenExchange`] backed by the Webex REST API.
pub struct WebexTokenClient {
    config: Arc<WebexConfig>,
    http: reqwest::Client,
}

impl WebexTokenClient {
    pub fn new(config: Arc<WebexConfig>, timeout: Duration) -> Result<Self, ExchangeError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wtr/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ExchangeError::Transport)?;
        Ok(Self { config, http })
    }

    async fn post_form(&self, form: &[(&str, &str)]) -> Result<TokenGrant, ExchangeError> {
        let resp = self
            .http
            .post(self.config.token_url())
            .form(form)
            .send()
            .await
            .map_err(ExchangeError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "token endpoint rejected request");
            return Err(ExchangeError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<TokenGrant>()
            .await
            .map_err(ExchangeError::Decode)
    }
}

#[async_trait]
impl TokenExchange for WebexTokenClient {
    async fn request_access_token(&self, code: &str) -> Result<TokenGrant, ExchangeError> {
        info!("requesting an access token");
        self.post_form(&[
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id()),
            ("client_secret", self.config.client_secret()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri()),
        ])
        .await
    }

    async fn refresh_access_token(
        &self,
        token: &AccessToken,
    ) -> Result<TokenGrant, ExchangeError> {
        info!("refreshing an access token");
        debug!(
            expires = %token.expires.to_rfc3339(),
            refresh_token_expires = %token.refresh_token_expires.to_rfc3339(),
            "current token lifetimes"
        );
        let grant = self
            .post_form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.config.client_id()),
                ("client_secret", self.config.client_secret()),
                ("refresh_token", token.refresh_token.as_str()),
            ])
            .await?;
        debug!(expires_in = grant.expires_in, "refreshed token");
        Ok(grant)
    }
}
