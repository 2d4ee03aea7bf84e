use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ConfigError, Result};

/// A profile describes one gateway endpoint and how to authenticate against it.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Profile {
    /// Base URL of the gateway.
    /// Example: "http://127.0.0.1:3000"
    pub url: String,

    /// Username used for basic authentication, or for token login when `login` is true.
    pub username: Option<String>,

    /// Password paired with `username`.
    pub password: Option<String>,

    /// Authorization header value sent verbatim (e.g. "Bearer eyJ...").
    /// Takes precedence over username/password.
    pub token: Option<String>,

    /// Exchange username/password for a bearer token at `<url>/auth` when connecting.
    /// Default: false
    pub login: Option<bool>,

    /// Request timeout in seconds.
    /// Default: no timeout
    pub timeout: Option<u64>,

    /// User agent sent with every request.
    /// Default: "pkgforge/sqlrest"
    pub user_agent: Option<String>,

    /// Proxy URL used for gateway requests.
    pub proxy: Option<String>,
}

impl Profile {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Applies `SQLREST_URL`, `SQLREST_TOKEN`, `SQLREST_USERNAME` and `SQLREST_PASSWORD`
    /// on top of the configured values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("SQLREST_URL") {
            self.url = url;
        }
        if let Ok(token) = std::env::var("SQLREST_TOKEN") {
            self.token = Some(token);
        }
        if let Ok(username) = std::env::var("SQLREST_USERNAME") {
            self.username = Some(username);
        }
        if let Ok(password) = std::env::var("SQLREST_PASSWORD") {
            self.password = Some(password);
        }
        self
    }

    /// Checks that `url` is an absolute http(s) URL.
    pub fn validate(&self, name: &str) -> Result<()> {
        let url = Url::parse(&self.url).map_err(|source| {
            ConfigError::InvalidUrl {
                profile: name.to_string(),
                url: self.url.clone(),
                source,
            }
        })?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => {
                Err(ConfigError::UnsupportedScheme {
                    profile: name.to_string(),
                    scheme: scheme.to_string(),
                })
            }
        }
    }

    pub fn login(&self) -> bool {
        self.login.unwrap_or(false)
    }
}
