use askama::Template;

pub const APP_TITLE: &str = "wtr^2";
pub const APP_DESCRIPTION: &str = "Webex Token Retriever/Renewer";

#[derive(Template)]
#[template(path = "start.html")]
pub struct StartPage {
    pub title: &'static str,
    pub description: &'static str,
    pub version: &'static str,
}

impl Default for StartPage {
    fn default() -> Self {
        Self {
            title: APP_TITLE,
            description: APP_DESCRIPTION,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Result page of the OAuth flow; `token` is the pretty-printed token JSON.
#[derive(Template)]
#[template(path = "token.html")]
pub struct TokenPage<'a> {
    pub title: &'static str,
    pub token: &'a str,
}

impl<'a> TokenPage<'a> {
    pub fn new(token: &'a str) -> Self {
        Self {
            title: APP_TITLE,
            token,
        }
    }
}
