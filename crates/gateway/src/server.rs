use {
    axum::{Router, routing::get},
    tokio::net::TcpListener,
    tower_http::trace::TraceLayer,
    tracing::info,
};

use crate::{routes, state::AppState};

/// Assemble the OAuth relay routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::start_page))
        .route("/authorize", get(routes::authorize))
        .route("/token", get(routes::token_page))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `bind:port` and serve until the process is stopped.
pub async fn start_server(bind: &str, port: u16, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind((bind, port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, redirect_uri = %state.config.redirect_uri(), "wtr listening");
    serve(listener, state).await
}

/// Serve on an already bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
