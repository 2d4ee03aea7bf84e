//! Credential handling.
//!
//! The gateway accepts a single `Authorization` header. [`Credentials`] describes where
//! that header value comes from; the value itself is treated as an opaque string.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};

#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// Send no `Authorization` header.
    #[default]
    None,
    /// HTTP basic authentication.
    Basic { username: String, password: String },
    /// A caller-supplied header value, sent verbatim (e.g. `Bearer eyJ...`).
    Token(String),
    /// Username and password exchanged for a bearer token when the client connects.
    Login { username: String, password: String },
}

impl Credentials {
    /// Returns the `Authorization` header value these credentials produce directly.
    ///
    /// [`Credentials::Login`] yields `None` here; the token only exists after the
    /// exchange performed at connect time.
    pub fn auth_header(&self) -> Option<String> {
        match self {
            Credentials::None | Credentials::Login { .. } => None,
            Credentials::Basic {
                username,
                password,
            } => Some(basic_auth(username, password)),
            Credentials::Token(token) => Some(token.clone()),
        }
    }

    pub fn requires_exchange(&self) -> bool {
        matches!(self, Credentials::Login { .. })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::None => f.write_str("None"),
            Credentials::Basic {
                username, ..
            } => {
                f.debug_struct("Basic")
                    .field("username", username)
                    .field("password", &"<redacted>")
                    .finish()
            }
            Credentials::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
            Credentials::Login {
                username, ..
            } => {
                f.debug_struct("Login")
                    .field("username", username)
                    .field("password", &"<redacted>")
                    .finish()
            }
        }
    }
}

/// Encodes `username:password` as an HTTP basic `Authorization` value.
///
/// # Examples
///
/// ```
/// use sqlrest_http::basic_auth;
///
/// assert_eq!(basic_auth("aladdin", "opensesame"), "Basic YWxhZGRpbjpvcGVuc2VzYW1l");
/// ```
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_header() {
        let creds = Credentials::Basic {
            username: "prest".to_string(),
            password: "prest".to_string(),
        };
        assert_eq!(creds.auth_header().as_deref(), Some("Basic cHJlc3Q6cHJlc3Q="));
    }

    #[test]
    fn test_token_is_sent_verbatim() {
        let creds = Credentials::Token("Bearer abc.def".to_string());
        assert_eq!(creds.auth_header().as_deref(), Some("Bearer abc.def"));
    }

    #[test]
    fn test_none_and_login_have_no_direct_header() {
        assert_eq!(Credentials::None.auth_header(), None);

        let login = Credentials::Login {
            username: "u".to_string(),
            password: "p".to_string(),
        };
        assert_eq!(login.auth_header(), None);
        assert!(login.requires_exchange());
        assert!(!Credentials::None.requires_exchange());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::Basic {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{:?}", creds);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));

        let token = Credentials::Token("secret-token".to_string());
        assert!(!format!("{:?}", token).contains("secret-token"));
    }
}
