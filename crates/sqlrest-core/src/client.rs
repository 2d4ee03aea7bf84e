//! Client construction.

use std::{fmt, sync::Arc, time::Duration};

use serde::Serialize;
use serde_json::Value;
use sqlrest_config::{config::Config, profile::Profile};
use sqlrest_http::{
    Credentials, HttpRequest, Method, Proxy, Transport, TransportConfig, UreqTransport,
};
use tracing::{debug, info};
use url::Url;

use crate::{
    error::{ClientError, Result},
    reference::Reference,
    stored::QueryAccessor,
    table::TableAccessor,
};

/// Settings a [`Client`] is built from.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub base_url: String,
    pub credentials: Credentials,
    pub transport: TransportConfig,
}

impl ClientOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Maps a configuration profile onto client options.
    ///
    /// `token` wins over `username`/`password`; the latter become basic auth, or a
    /// login exchange when `login` is set.
    pub fn from_profile(profile: &Profile) -> Result<Self> {
        let credentials = match (&profile.token, &profile.username, &profile.password) {
            (Some(token), _, _) => Credentials::Token(token.clone()),
            (None, Some(username), password) => {
                let username = username.clone();
                let password = password.clone().unwrap_or_default();
                if profile.login() {
                    Credentials::Login {
                        username,
                        password,
                    }
                } else {
                    Credentials::Basic {
                        username,
                        password,
                    }
                }
            }
            (None, None, _) => Credentials::None,
        };

        let mut transport = TransportConfig {
            timeout: profile.timeout.map(Duration::from_secs),
            ..Default::default()
        };
        if let Some(user_agent) = &profile.user_agent {
            transport.user_agent = Some(user_agent.clone());
        }
        if let Some(proxy) = &profile.proxy {
            let proxy = Proxy::new(proxy).map_err(|err| {
                ClientError::NotInitialized {
                    reason: format!("invalid proxy '{proxy}': {err}"),
                }
            })?;
            transport.proxy = Some(proxy);
        }

        Ok(Self {
            base_url: profile.url.clone(),
            credentials,
            transport,
        })
    }
}

/// Shared, read-only state behind every accessor and query.
pub(crate) struct ClientContext {
    pub(crate) base_url: String,
    pub(crate) authorization: Option<String>,
    pub(crate) transport: Arc<dyn Transport>,
}

/// A connected gateway client.
///
/// Construction completes credential setup, so every request made through a `Client`
/// carries its authorization. Cloning is cheap.
#[derive(Clone)]
pub struct Client {
    context: Arc<ClientContext>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.context.base_url)
            .field("authorized", &self.context.authorization.is_some())
            .finish()
    }
}

impl Client {
    /// Connects using a `ureq` transport built from `options.transport`.
    pub fn connect(options: ClientOptions) -> Result<Self> {
        let transport = Arc::new(UreqTransport::new(&options.transport));
        Self::with_transport(options, transport)
    }

    /// Connects using the given transport.
    pub fn with_transport(options: ClientOptions, transport: Arc<dyn Transport>) -> Result<Self> {
        let base_url = options.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::NotInitialized {
                reason: "gateway URL is empty".to_string(),
            });
        }
        Url::parse(&base_url).map_err(|err| {
            ClientError::NotInitialized {
                reason: format!("invalid gateway URL '{base_url}': {err}"),
            }
        })?;

        let authorization = match &options.credentials {
            Credentials::Login {
                username,
                password,
            } => Some(login(transport.as_ref(), &base_url, username, password)?),
            credentials => credentials.auth_header(),
        };

        debug!(base_url = %base_url, authorized = authorization.is_some(), "client ready");

        Ok(Self {
            context: Arc::new(ClientContext {
                base_url,
                authorization,
                transport,
            }),
        })
    }

    /// Connects with the named profile of `config`, or its default profile.
    pub fn from_config(config: &Config, profile: Option<&str>) -> Result<Self> {
        let profile = config.select_profile(profile)?;
        Self::connect(ClientOptions::from_profile(&profile)?)
    }

    pub fn base_url(&self) -> &str {
        &self.context.base_url
    }

    /// Accessor for a `schema.table` identifier.
    ///
    /// Fails with [`ClientError::MissingIdentifier`] when no name is given.
    pub fn table<'a>(&self, name: impl Into<Option<&'a str>>) -> Result<TableAccessor> {
        let reference = Reference::parse(name.into(), "table")?;
        Ok(TableAccessor::new(self.context.clone(), reference))
    }

    /// Accessor for a stored `path.script` query.
    pub fn queries<'a>(&self, name: impl Into<Option<&'a str>>) -> Result<QueryAccessor> {
        let reference = Reference::parse(name.into(), "script")?;
        Ok(QueryAccessor::new(self.context.clone(), reference))
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Exchanges a username and password for a bearer token at `{base}/auth`.
fn login(
    transport: &dyn Transport,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<String> {
    let not_initialized = |reason: String| {
        ClientError::NotInitialized {
            reason,
        }
    };

    let body = serde_json::to_vec(&LoginRequest {
        username,
        password,
    })
    .map_err(|err| not_initialized(format!("could not encode login request: {err}")))?;

    let url = format!("{base_url}/auth");
    let request = HttpRequest::new(Method::Post, url.as_str())
        .header("Content-Type", "application/json")
        .body(body);

    let response = transport
        .send(request)
        .map_err(|err| not_initialized(format!("login request to {url} failed: {err}")))?;

    if !response.is_success() {
        return Err(not_initialized(format!(
            "login rejected: {} {}",
            response.status,
            response.status_text()
        )));
    }

    let payload: Value = serde_json::from_slice(&response.body)
        .map_err(|err| not_initialized(format!("invalid login response: {err}")))?;
    let token = payload
        .get("token")
        .and_then(Value::as_str)
        .ok_or_else(|| not_initialized("login response has no token".to_string()))?;

    info!("Logged in to {} as {}", base_url, username);
    Ok(format!("Bearer {token}"))
}
