//! Client library for REST-over-SQL gateways.
//!
//! A [`Client`] resolves `schema.table` (or stored `path.script`) identifiers into
//! accessors whose operations return a [`ChainedQuery`]. The query accumulates filters
//! and directives and sends one request when executed.
//!
//! ```no_run
//! use sqlrest_core::{Client, ClientOptions, Credentials, QueryOutput};
//!
//! let options = ClientOptions::new("http://127.0.0.1:3000").credentials(Credentials::Basic {
//!     username: "prest".into(),
//!     password: "prest".into(),
//! });
//! let client = Client::connect(options).unwrap();
//!
//! let output = client
//!     .table("categories")
//!     .unwrap()
//!     .list()
//!     .group_by(["category_id"])
//!     .sum("category_id")
//!     .execute()
//!     .unwrap();
//!
//! if let QueryOutput::Json(rows) = output {
//!     println!("{rows}");
//! }
//! ```

pub mod client;
pub mod error;
pub mod query;
pub mod reference;
pub mod response;
pub mod stored;
pub mod table;

#[cfg(test)]
mod test_utils;

pub use client::{Client, ClientOptions};
pub use error::{ClientError, Result};
pub use query::{
    Aggregate, ChainedQuery, FilterOp, JoinKind, Operation, PreparedRequest, Renderer,
    RequestKind,
};
pub use reference::{Reference, ScriptReference, TableReference};
pub use response::{DecodeError, QueryOutput};
pub use sqlrest_http::{Credentials, Transport, TransportConfig};
pub use stored::QueryAccessor;
pub use table::TableAccessor;
