use thiserror::Error;

/// Failure talking to the provider's token endpoint.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("token endpoint unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("token endpoint rejected the request (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("token endpoint returned an unreadable body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ExchangeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) | Self::Decode(e) if e.is_timeout())
    }
}
