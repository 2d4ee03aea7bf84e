//! Error types for sqlrest-core.

use miette::Diagnostic;
use sqlrest_config::error::ConfigError;
use sqlrest_http::TransportError;
use thiserror::Error;

use crate::{query::Operation, response::DecodeError};

/// Errors raised while building or executing gateway requests.
///
/// Execution errors carry the operation and its target (`schema.table` or `path.script`).
#[derive(Error, Diagnostic, Debug)]
pub enum ClientError {
    #[error("Client is not initialized: {reason}")]
    #[diagnostic(
        code(sqlrest::not_initialized),
        help("Check the gateway URL and credentials of the selected profile")
    )]
    NotInitialized { reason: String },

    #[error("No {kind} name given")]
    #[diagnostic(
        code(sqlrest::missing_identifier),
        help("Pass a name such as `public.products` or `products`")
    )]
    MissingIdentifier { kind: &'static str },

    #[error("{operation} on {target} failed: {status} {status_text}{}", format_message(.message))]
    #[diagnostic(
        code(sqlrest::http),
        help("The gateway rejected the request; see its message for details")
    )]
    HttpFailure {
        operation: Operation,
        target: String,
        status: u16,
        status_text: String,
        message: String,
    },

    #[error("{operation} on {target} failed: could not reach the gateway")]
    #[diagnostic(
        code(sqlrest::transport),
        help("Check your network connection and the gateway URL")
    )]
    TransportFailure {
        operation: Operation,
        target: String,
        #[source]
        source: TransportError,
    },

    #[error("{operation} on {target} failed: could not decode the response")]
    #[diagnostic(
        code(sqlrest::decode),
        help("Check that the requested renderer matches the data you expect")
    )]
    DecodeFailure {
        operation: Operation,
        target: String,
        #[source]
        source: DecodeError,
    },

    #[error("{operation} on {target} failed: could not serialize the request body")]
    #[diagnostic(code(sqlrest::payload))]
    Payload {
        operation: Operation,
        target: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

fn format_message(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {message}")
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_http_failure_display() {
        let err = ClientError::HttpFailure {
            operation: Operation::List,
            target: "public.products".to_string(),
            status: 404,
            status_text: "Not Found".to_string(),
            message: "table not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "list on public.products failed: 404 Not Found: table not found"
        );
    }

    #[test]
    fn test_http_failure_without_message() {
        let err = ClientError::HttpFailure {
            operation: Operation::Delete,
            target: "public.t".to_string(),
            status: 500,
            status_text: "Internal Server Error".to_string(),
            message: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "delete on public.t failed: 500 Internal Server Error"
        );
    }

    #[test]
    fn test_missing_identifier_display() {
        let err = ClientError::MissingIdentifier {
            kind: "table",
        };
        assert_eq!(err.to_string(), "No table name given");
    }

    #[test]
    fn test_transport_failure_source() {
        let err = ClientError::TransportFailure {
            operation: Operation::Query,
            target: "reports.daily".to_string(),
            source: TransportError::InvalidUrl {
                url: "x".to_string(),
                source: url::ParseError::EmptyHost,
            },
        };
        assert!(err.to_string().contains("reports.daily"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: ClientError = ConfigError::MissingProfile("staging".to_string()).into();
        assert_eq!(err.to_string(), "Missing profile: staging");
    }
}
