use {
    askama::Template,
    axum::{
        extract::{Query, State},
        response::{Html, Redirect},
    },
    serde::Deserialize,
    tracing::info,
    uuid::Uuid,
};

use {wtr_config::WebexConfig, wtr_oauth::AccessToken};

use crate::{
    error::GatewayError,
    pages::{StartPage, TokenPage},
    state::AppState,
};

/// Query string of the provider's OAuth callback.
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub state: String,
    pub code: String,
}

/// Fresh opaque correlation value for one authorization request.
pub fn correlation_value() -> String {
    Uuid::new_v4().to_string()
}

/// Static authorization URL with the request's `state` appended.
pub fn authorize_redirect_url(config: &WebexConfig, state: &str) -> String {
    format!("{}&state={state}", config.authorization_url())
}

pub async fn start_page() -> Result<Html<String>, GatewayError> {
    info!("serving start page");
    Ok(Html(StartPage::default().render()?))
}

pub async fn authorize(State(app): State<AppState>) -> Redirect {
    let state = correlation_value();
    info!(%state, "redirecting to webex oauth flow");
    Redirect::temporary(&authorize_redirect_url(&app.config, &state))
}

// `state` is logged only; it is never checked against the value issued by
// `authorize`.
pub async fn token_page(
    State(app): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Html<String>, GatewayError> {
    info!(state = %query.state, "serving token page");

    let grant = app.exchange.request_access_token(&query.code).await?;
    let token = AccessToken::from_grant(grant, app.now());
    info!(
        expires = %token.expires.to_rfc3339(),
        refresh_token_expires = %token.refresh_token_expires.to_rfc3339(),
        "access token issued"
    );

    let json = token.to_pretty_json()?;
    Ok(Html(TokenPage::new(&json).render()?))
}

pub async fn health() -> &'static str {
    "ok"
}
