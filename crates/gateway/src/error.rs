use {
    axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    thiserror::Error,
    tracing::error,
};

use wtr_oauth::ExchangeError;

/// Anything that can go wrong while serving a page.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error("failed to render page: {0}")]
    Render(#[from] askama::Error),

    #[error("failed to serialize token: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Exchange(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Self::Exchange(_) => StatusCode::BAD_GATEWAY,
            Self::Render(_) | Self::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!(status = status.as_u16(), error = %self, "request failed");
        let reason = status.canonical_reason().unwrap_or("Error");
        (status, reason).into_response()
    }
}
