//! Closed vocabularies of the gateway's query language.
//!
//! Every operator, aggregate, join kind and render mode the gateway understands is an
//! enum variant here, mapped to its wire token only when a clause is serialized.

use std::fmt;

use sqlrest_http::Method;

/// Comparison operators usable in filters, joins and having clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Null,
    NotNull,
    Like,
    ILike,
    NotLike,
}

impl FilterOp {
    pub const ALL: [FilterOp; 13] = [
        FilterOp::Eq,
        FilterOp::Ne,
        FilterOp::Gt,
        FilterOp::Gte,
        FilterOp::Lt,
        FilterOp::Lte,
        FilterOp::In,
        FilterOp::NotIn,
        FilterOp::Null,
        FilterOp::NotNull,
        FilterOp::Like,
        FilterOp::ILike,
        FilterOp::NotLike,
    ];

    /// The wire token, including the leading `$`.
    pub const fn token(&self) -> &'static str {
        match self {
            FilterOp::Eq => "$eq",
            FilterOp::Ne => "$ne",
            FilterOp::Gt => "$gt",
            FilterOp::Gte => "$gte",
            FilterOp::Lt => "$lt",
            FilterOp::Lte => "$lte",
            FilterOp::In => "$in",
            FilterOp::NotIn => "$nin",
            FilterOp::Null => "$null",
            FilterOp::NotNull => "$notnull",
            FilterOp::Like => "$like",
            FilterOp::ILike => "$ilike",
            FilterOp::NotLike => "$notlike",
        }
    }

    /// Parses a wire token; the leading `$` is optional.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.strip_prefix('$').unwrap_or(token);
        Self::ALL
            .into_iter()
            .find(|op| op.token()[1..].eq_ignore_ascii_case(token))
    }

    /// Whether the operator carries a value (`$null`/`$notnull` do not).
    pub const fn takes_value(&self) -> bool {
        !matches!(self, FilterOp::Null | FilterOp::NotNull)
    }

    /// Whether the value is percent-encoded on the wire.
    ///
    /// Set membership lists are sent as-is.
    pub const fn encodes_value(&self) -> bool {
        !matches!(self, FilterOp::In | FilterOp::NotIn)
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Aggregate functions applied to grouped results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregate {
    Sum,
    Avg,
    Max,
    Min,
    StdDev,
    Variance,
}

impl Aggregate {
    pub const fn name(&self) -> &'static str {
        match self {
            Aggregate::Sum => "sum",
            Aggregate::Avg => "avg",
            Aggregate::Max => "max",
            Aggregate::Min => "min",
            Aggregate::StdDev => "stddev",
            Aggregate::Variance => "variance",
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Outer,
}

impl JoinKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "inner",
            JoinKind::Left => "left",
            JoinKind::Right => "right",
            JoinKind::Outer => "outer",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response rendering requested from the gateway.
///
/// Only [`Renderer::Json`] is decoded into structured data; the others come back as text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Renderer {
    #[default]
    Json,
    Xml,
    Csv,
}

impl Renderer {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Renderer::Json => "json",
            Renderer::Xml => "xml",
            Renderer::Csv => "csv",
        }
    }
}

impl fmt::Display for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request type fixed when a query is created.
///
/// Decides the HTTP verb and how the response body is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Get,
    Post,
    Put,
    Delete,
    Export,
}

impl RequestKind {
    pub const fn method(&self) -> Method {
        match self {
            RequestKind::Get => Method::Get,
            RequestKind::Post | RequestKind::Export => Method::Post,
            RequestKind::Put => Method::Put,
            RequestKind::Delete => Method::Delete,
        }
    }
}

/// Accessor operation a query was created by. Used to label errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Show,
    Export,
    Insert,
    BatchInsert,
    Update,
    Delete,
    Query,
    QueryExport,
}

impl Operation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Show => "show",
            Operation::Export => "export",
            Operation::Insert => "insert",
            Operation::BatchInsert => "batch insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Query => "query",
            Operation::QueryExport => "query export",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_op_tokens() {
        assert_eq!(FilterOp::Gt.token(), "$gt");
        assert_eq!(FilterOp::NotIn.token(), "$nin");
        assert_eq!(FilterOp::NotNull.token(), "$notnull");
        assert_eq!(FilterOp::ILike.to_string(), "$ilike");
    }

    #[test]
    fn test_filter_op_from_token() {
        for op in FilterOp::ALL {
            assert_eq!(FilterOp::from_token(op.token()), Some(op));
        }
        assert_eq!(FilterOp::from_token("gte"), Some(FilterOp::Gte));
        assert_eq!(FilterOp::from_token("$NIN"), Some(FilterOp::NotIn));
        assert_eq!(FilterOp::from_token("$between"), None);
    }

    #[test]
    fn test_filter_op_value_rules() {
        assert!(!FilterOp::Null.takes_value());
        assert!(FilterOp::Like.takes_value());
        assert!(!FilterOp::In.encodes_value());
        assert!(FilterOp::Eq.encodes_value());
    }

    #[test]
    fn test_export_is_posted() {
        assert_eq!(RequestKind::Export.method(), Method::Post);
        assert_eq!(RequestKind::Put.method(), Method::Put);
    }

    #[test]
    fn test_names() {
        assert_eq!(Aggregate::StdDev.to_string(), "stddev");
        assert_eq!(JoinKind::Left.to_string(), "left");
        assert_eq!(Renderer::default(), Renderer::Json);
        assert_eq!(Operation::BatchInsert.to_string(), "batch insert");
    }
}
