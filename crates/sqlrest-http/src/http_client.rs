use std::time::Duration;

use tracing::trace;
use ureq::{
    http::{header::CONTENT_TYPE, HeaderMap, Response},
    Agent, Body, Proxy, RequestBuilder,
};
use url::Url;

use crate::{
    error::{Result, TransportError},
    transport::{HttpRequest, HttpResponse, Method, Transport},
};

/// Upper bound for a buffered response body (exports can be large).
pub const DEFAULT_BODY_LIMIT: u64 = 512 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct TransportConfig {
    pub user_agent: Option<String>,
    pub headers: Option<HeaderMap>,
    pub proxy: Option<Proxy>,
    pub timeout: Option<Duration>,
    pub body_limit: u64,
}

impl Default for TransportConfig {
    /// User agent `pkgforge/sqlrest`, no proxy, no extra headers, no timeout.
    ///
    /// ```
    /// use sqlrest_http::TransportConfig;
    ///
    /// let cfg = TransportConfig::default();
    /// assert_eq!(cfg.user_agent.as_deref(), Some("pkgforge/sqlrest"));
    /// assert!(cfg.timeout.is_none());
    /// ```
    fn default() -> Self {
        Self {
            user_agent: Some("pkgforge/sqlrest".into()),
            proxy: None,
            headers: None,
            timeout: None,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl TransportConfig {
    /// Builds the `ureq` agent.
    ///
    /// Error statuses come back as ordinary responses; classifying them is up to the
    /// caller.
    pub fn build(&self) -> Agent {
        let mut config = ureq::Agent::config_builder()
            .proxy(self.proxy.clone())
            .timeout_global(self.timeout)
            .http_status_as_error(false);

        if let Some(user_agent) = &self.user_agent {
            config = config.user_agent(user_agent);
        }

        config.build().into()
    }
}

/// A [`Transport`] backed by a blocking `ureq` agent.
///
/// Each instance owns its agent; nothing is shared between transports.
#[derive(Clone, Debug)]
pub struct UreqTransport {
    agent: Agent,
    headers: Option<HeaderMap>,
    body_limit: u64,
}

impl UreqTransport {
    /// Create a transport from the given configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlrest_http::{TransportConfig, UreqTransport};
    ///
    /// let _transport = UreqTransport::new(&TransportConfig::default());
    /// ```
    pub fn new(config: &TransportConfig) -> Self {
        Self {
            agent: config.build(),
            headers: config.headers.clone(),
            body_limit: config.body_limit,
        }
    }

    fn dispatch(
        &self,
        request: &HttpRequest,
        url: &str,
    ) -> std::result::Result<Response<Body>, ureq::Error> {
        match request.method {
            Method::Get => self.prepare(self.agent.get(url), request).call(),
            Method::Delete => self.prepare(self.agent.delete(url), request).call(),
            Method::Post => {
                let req = self.prepare(self.agent.post(url), request);
                match &request.body {
                    Some(body) => req.send(body.as_slice()),
                    None => req.send_empty(),
                }
            }
            Method::Put => {
                let req = self.prepare(self.agent.put(url), request);
                match &request.body {
                    Some(body) => req.send(body.as_slice()),
                    None => req.send_empty(),
                }
            }
        }
    }

    fn prepare<B>(&self, req: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
        let mut req = apply_headers(req, &self.headers);
        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        req
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        // Serializing through `Url` escapes characters `ureq` refuses in a URI (`>`, spaces).
        let url = Url::parse(&request.url).map_err(|source| {
            TransportError::InvalidUrl {
                url: request.url.clone(),
                source,
            }
        })?;

        trace!("{} {}", request.method, url);

        let mut response = self.dispatch(&request, url.as_str())?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body = response
            .body_mut()
            .with_config()
            .limit(self.body_limit)
            .read_to_vec()?;

        trace!("{} {} -> {} ({} bytes)", request.method, url, status, body.len());

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Adds the configured extra headers, if any, to `req`.
fn apply_headers<B>(mut req: RequestBuilder<B>, headers: &Option<HeaderMap>) -> RequestBuilder<B> {
    if let Some(headers) = headers {
        for (key, value) in headers.iter() {
            req = req.header(key, value);
        }
    }
    req
}
