mod token_commands;

use std::{sync::Arc, time::Duration};

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    wtr_config::WebexConfig,
    wtr_gateway::{AppState, server},
    wtr_oauth::WebexTokenClient,
};

#[derive(Parser)]
#[command(name = "wtr", about = "Webex Token Retriever/Renewer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Timeout for calls to the Webex token endpoint, in seconds.
    #[arg(
        long,
        global = true,
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    provider_timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the OAuth start, authorize and token pages.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    /// Work with issued tokens.
    Token {
        #[command(subcommand)]
        action: token_commands::TokenAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "wtr starting");
    let timeout = Duration::from_secs(cli.provider_timeout_secs);

    match cli.command {
        Commands::Serve { bind, port } => {
            let config = Arc::new(WebexConfig::from_env()?);
            let client = WebexTokenClient::new(Arc::clone(&config), timeout)?;
            let state = AppState::new(config, Arc::new(client));
            server::start_server(&bind, port, state).await
        },
        Commands::Token { action } => token_commands::handle_token(action, timeout).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_timeout_defaults_to_thirty_seconds() {
        let cli = Cli::try_parse_from(["wtr", "serve"]).unwrap();
        assert_eq!(cli.provider_timeout_secs, 30);
    }

    #[test]
    fn test_zero_provider_timeout_rejected() {
        assert!(Cli::try_parse_from(["wtr", "--provider-timeout-secs", "0", "serve"]).is_err());
        let cli = Cli::try_parse_from(["wtr", "serve", "--provider-timeout-secs", "1"]).unwrap();
        assert_eq!(cli.provider_timeout_secs, 1);
    }
}
