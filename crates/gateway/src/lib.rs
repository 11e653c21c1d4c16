pub mod error;
pub mod pages;
pub mod routes;
pub mod server;
pub mod state;

pub use {error::GatewayError, state::AppState};
