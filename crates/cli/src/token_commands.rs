use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use {
    anyhow::{Context, Result, bail},
    chrono::Utc,
    clap::Subcommand,
    tracing::info,
};

use {
    wtr_config::WebexConfig,
    wtr_oauth::{AccessToken, TokenExchange, WebexTokenClient},
};

#[derive(Subcommand)]
pub enum TokenAction {
    /// Refresh a token saved from the token page.
    Refresh {
        /// JSON file holding the token as shown on the token page.
        #[arg(long)]
        file: PathBuf,
        /// Overwrite the file with the refreshed token.
        #[arg(long, default_value_t = false)]
        in_place: bool,
    },
    /// Print the authorization URL users are redirected to.
    Url,
}

pub async fn handle_token(action: TokenAction, timeout: Duration) -> Result<()> {
    let config = WebexConfig::from_env()?;
    match action {
        TokenAction::Refresh { file, in_place } => {
            refresh(config, &file, in_place, timeout).await
        },
        TokenAction::Url => {
            println!("{}", config.authorization_url());
            Ok(())
        },
    }
}

async fn refresh(
    config: WebexConfig,
    file: &Path,
    in_place: bool,
    timeout: Duration,
) -> Result<()> {
    let token = load_token(file)?;
    let now = Utc::now();
    if token.is_refresh_expired(now) {
        bail!(
            "refresh token expired at {}; authorize again to obtain a new one",
            token.refresh_token_expires.to_rfc3339()
        );
    }
    if !token.is_expired(now) {
        info!(
            expires = %token.expires.to_rfc3339(),
            "access token still valid, refreshing anyway"
        );
    }

    let client = WebexTokenClient::new(Arc::new(config), timeout)?;

    let grant = client.refresh_access_token(&token).await?;
    let refreshed = AccessToken::received(grant);
    info!(expires = %refreshed.expires.to_rfc3339(), "token refreshed");

    if in_place {
        save_token(file, &refreshed)?;
        println!("Refreshed token written to {}", file.display());
    } else {
        println!("{}", refreshed.to_pretty_json()?);
    }
    Ok(())
}

fn load_token(path: &Path) -> Result<AccessToken> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read token file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} does not contain a valid token", path.display()))
}

fn save_token(path: &Path, token: &AccessToken) -> Result<()> {
    let mut json = token.to_pretty_json()?;
    json.push('\n');
    std::fs::write(path, json)
        .with_context(|| format!("failed to write token file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use {super::*, wtr_oauth::TokenGrant};

    fn token() -> AccessToken {
        AccessToken::from_grant(
            TokenGrant {
                access_token: "AT1".into(),
                expires_in: 3600,
                refresh_token: "RT1".into(),
                refresh_token_expires_in: 7_776_000,
            },
            "2024-01-01T00:00:00Z".parse().unwrap(),
        )
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");

        save_token(&path, &token()).unwrap();
        assert_eq!(load_token(&path).unwrap(), token());
    }

    #[test]
    fn test_load_accepts_token_page_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(
            &path,
            r#"{
  "access_token": "AT1",
  "expires": "2024-01-01T01:00:00Z",
  "refresh_token": "RT1",
  "refresh_token_expires": "2024-03-31T00:00:00Z"
}"#,
        )
        .unwrap();

        let loaded = load_token(&path).unwrap();
        assert_eq!(loaded.refresh_token, "RT1");
        assert_eq!(loaded, token());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "not json").unwrap();

        let err = load_token(&path).unwrap_err();
        assert!(err.to_string().contains("does not contain a valid token"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_token(&dir.path().join("absent.json")).is_err());
    }

    fn config() -> WebexConfig {
        WebexConfig::new("abc", "shh", "https://example.com/cb", "spark:all")
    }

    #[tokio::test]
    async fn test_refresh_refuses_expired_refresh_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        save_token(&path, &token()).unwrap();

        // Points nowhere: the expiry check must fail before any request.
        let config = config().with_api_base("http://127.0.0.1:9");
        let err = refresh(config, &path, false, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("refresh token expired"), "{err}");
        assert_eq!(load_token(&path).unwrap(), token());
    }

    #[tokio::test]
    async fn test_refresh_in_place_rewrites_file() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/access_token")
            .match_body(mockito::Matcher::UrlEncoded(
                "refresh_token".into(),
                "RT1".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "access_token": "AT2",
                    "expires_in": 1209599,
                    "refresh_token": "RT2",
                    "refresh_token_expires_in": 7775999
                }"#,
            )
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let current = AccessToken::received(TokenGrant {
            access_token: "AT1".into(),
            expires_in: 3600,
            refresh_token: "RT1".into(),
            refresh_token_expires_in: 7_776_000,
        });
        save_token(&path, &current).unwrap();

        let config = config().with_api_base(server.url());
        refresh(config, &path, true, Duration::from_secs(5))
            .await
            .unwrap();

        mock.assert_async().await;
        let refreshed = load_token(&path).unwrap();
        assert_eq!(refreshed.access_token, "AT2");
        assert_eq!(refreshed.refresh_token, "RT2");
        assert!(refreshed.refresh_token_expires > current.expires);
    }
}
