pub mod client;
pub mod error;
pub mod types;

pub use client::{TokenExchange, WebexTokenClient};
pub use error::ExchangeError;
pub use types::{AccessToken, TokenGrant};
