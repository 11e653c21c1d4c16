use std::sync::Arc;

use chrono::{DateTime, Utc};

use {wtr_config::WebexConfig, wtr_oauth::TokenExchange};

/// Source of the instant a token is captured at.
pub type Clock = fn() -> DateTime<Utc>;

/// Everything a request handler needs. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<WebexConfig>,
    pub exchange: Arc<dyn TokenExchange>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(config: Arc<WebexConfig>, exchange: Arc<dyn TokenExchange>) -> Self {
        Self {
            config,
            exchange,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}
