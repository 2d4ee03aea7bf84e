//! HTTP plumbing for the sqlrest gateway client.
//!
//! This crate owns everything that touches the wire:
//!
//! - [`Transport`]: the capability used to perform exactly one request/response round trip
//! - [`UreqTransport`]: the default blocking implementation backed by a `ureq` agent
//! - [`Credentials`]: turns configured credentials into an `Authorization` header value
//!
//! # Example
//!
//! ```no_run
//! use sqlrest_http::{HttpRequest, Method, Transport, TransportConfig, UreqTransport};
//!
//! let transport = UreqTransport::new(&TransportConfig::default());
//! let response = transport
//!     .send(HttpRequest::new(Method::Get, "http://127.0.0.1:3000/public/products"))
//!     .unwrap();
//! assert!(response.is_success());
//! ```

pub mod auth;
pub mod error;
pub mod http_client;
pub mod transport;

pub use auth::{basic_auth, Credentials};
pub use error::{Result, TransportError};
pub use http_client::{TransportConfig, UreqTransport, DEFAULT_BODY_LIMIT};
pub use transport::{HttpRequest, HttpResponse, Method, Transport};
pub use ureq::Proxy;
