use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum TransportError {
    #[error("Invalid URL: {url}")]
    #[diagnostic(code(sqlrest_http::invalid_url))]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    #[diagnostic(
        code(sqlrest_http::network),
        help("Check that the gateway is reachable and try again")
    )]
    Network(#[from] Box<ureq::Error>),
}

pub type Result<T> = std::result::Result<T, TransportError>;

impl From<ureq::Error> for TransportError {
    /// Converts a `ureq::Error` into a `TransportError::Network` variant.
    fn from(e: ureq::Error) -> Self {
        Self::Network(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_invalid_url() {
        let err = TransportError::InvalidUrl {
            url: "not a url".to_string(),
            source: url::ParseError::RelativeUrlWithoutBase,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Invalid URL"));
        assert!(msg.contains("not a url"));
    }

    #[test]
    fn test_from_ureq_error() {
        let ureq_err = ureq::Error::ConnectionFailed;
        let err: TransportError = ureq_err.into();

        match err {
            TransportError::Network(_) => (),
            _ => panic!("Expected Network error variant"),
        }
    }

    #[test]
    fn test_error_source_chain() {
        let err = TransportError::InvalidUrl {
            url: "://".to_string(),
            source: url::ParseError::EmptyHost,
        };

        assert!(std::error::Error::source(&err).is_some());
    }
}
