//! Response decoding.

use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;

use crate::query::{Renderer, RequestKind};

/// A decoded gateway response.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    /// Structured data from a JSON-rendered response.
    Json(Value),
    /// XML, CSV or any other textual rendering.
    Text(String),
    /// Raw export payload.
    Binary(Vec<u8>),
}

impl QueryOutput {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            QueryOutput::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            QueryOutput::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the output as bytes, serializing JSON values compactly.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            QueryOutput::Json(value) => value.to_string().into_bytes(),
            QueryOutput::Text(text) => text.into_bytes(),
            QueryOutput::Binary(bytes) => bytes,
        }
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    #[diagnostic(code(sqlrest::decode::json))]
    Json(#[from] serde_json::Error),

    #[error("response is not valid UTF-8: {0}")]
    #[diagnostic(code(sqlrest::decode::utf8))]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("expected JSON but the response was rendered as {rendered}")]
    #[diagnostic(
        code(sqlrest::decode::unstructured),
        help("Only JSON-rendered, non-export responses can be deserialized")
    )]
    Unstructured { rendered: &'static str },
}

/// Decodes a successful response body.
///
/// Exports are always returned as bytes, whatever renderer was requested.
pub(crate) fn decode(
    kind: RequestKind,
    renderer: Renderer,
    body: Vec<u8>,
) -> Result<QueryOutput, DecodeError> {
    if kind == RequestKind::Export {
        return Ok(QueryOutput::Binary(body));
    }

    match renderer {
        Renderer::Json if body.iter().all(u8::is_ascii_whitespace) => {
            Ok(QueryOutput::Json(Value::Null))
        }
        Renderer::Json => Ok(QueryOutput::Json(serde_json::from_slice(&body)?)),
        Renderer::Xml | Renderer::Csv => Ok(QueryOutput::Text(String::from_utf8(body)?)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_json() {
        let output = decode(RequestKind::Get, Renderer::Json, br#"[{"id":1}]"#.to_vec()).unwrap();
        assert_eq!(output, QueryOutput::Json(json!([{"id": 1}])));
    }

    #[test]
    fn test_decode_empty_json_body() {
        let output = decode(RequestKind::Delete, Renderer::Json, Vec::new()).unwrap();
        assert_eq!(output, QueryOutput::Json(Value::Null));
    }

    #[test]
    fn test_decode_text() {
        let output = decode(RequestKind::Get, Renderer::Xml, b"<rows/>".to_vec()).unwrap();
        assert_eq!(output.as_text(), Some("<rows/>"));
    }

    #[test]
    fn test_export_is_never_parsed() {
        let output = decode(RequestKind::Export, Renderer::Json, b"id,name\n1,a\n".to_vec()).unwrap();
        assert_eq!(output, QueryOutput::Binary(b"id,name\n1,a\n".to_vec()));
    }

    #[test]
    fn test_decode_invalid_json() {
        let result = decode(RequestKind::Get, Renderer::Json, b"<html>".to_vec());
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let result = decode(RequestKind::Get, Renderer::Csv, vec![0xff, 0xfe]);
        assert!(matches!(result, Err(DecodeError::Utf8(_))));
    }

    #[test]
    fn test_into_bytes() {
        assert_eq!(QueryOutput::Json(json!({"a": 1})).into_bytes(), br#"{"a":1}"#.to_vec());
        assert_eq!(QueryOutput::Binary(vec![1, 2]).into_bytes(), vec![1, 2]);
    }
}
