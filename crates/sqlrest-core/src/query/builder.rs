//! The chained query builder and its execution.

use std::{
    fmt::{self, Display},
    sync::Arc,
};

use serde::de::DeserializeOwned;
use sqlrest_http::{HttpRequest, Method};
use tracing::{debug, trace, warn};

use crate::{
    client::ClientContext,
    error::{ClientError, Result},
    query::{
        clause::Clause,
        ops::{Aggregate, FilterOp, JoinKind, Operation, Renderer, RequestKind},
    },
    response::{decode, DecodeError, QueryOutput},
};

/// A single gateway request under construction.
///
/// Created by [`crate::TableAccessor`] or [`crate::QueryAccessor`]; the URL, verb and
/// body are fixed at that point. Builder methods append clauses in call order and never
/// touch the network. [`ChainedQuery::execute`] consumes the builder and performs exactly
/// one round trip.
///
/// # Example
///
/// ```no_run
/// use sqlrest_core::{Client, ClientOptions};
///
/// let client = Client::connect(ClientOptions::new("http://127.0.0.1:3000")).unwrap();
/// let rows = client
///     .table("public.products")
///     .unwrap()
///     .list()
///     .gte("price", 10)
///     .order(["-price", "name"])
///     .page(1)
///     .page_size(20)
///     .execute()
///     .unwrap();
/// ```
pub struct ChainedQuery {
    context: Arc<ClientContext>,
    operation: Operation,
    target: String,
    base_url: String,
    kind: RequestKind,
    body: Option<Vec<u8>>,
    clauses: Vec<Clause>,
    aggregates: Vec<(Aggregate, String)>,
    renderer: Renderer,
}

/// A frozen request descriptor produced by [`ChainedQuery::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub operation: Operation,
    pub target: String,
    pub kind: RequestKind,
    pub method: Method,
    pub url: String,
    pub body: Option<Vec<u8>>,
    pub renderer: Renderer,
}

impl PreparedRequest {
    /// Converts the descriptor into a transport request with the given auth header.
    pub fn into_http_request(self, authorization: Option<&str>) -> HttpRequest {
        let mut request = HttpRequest::new(self.method, self.url);
        if let Some(value) = authorization {
            request = request.header("Authorization", value);
        }
        if let Some(body) = self.body {
            request = request
                .header("Content-Type", "application/json")
                .body(body);
        }
        request
    }
}

impl fmt::Debug for ChainedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedQuery")
            .field("operation", &self.operation)
            .field("target", &self.target)
            .field("url", &self.url())
            .field("kind", &self.kind)
            .field("renderer", &self.renderer)
            .finish()
    }
}

impl ChainedQuery {
    pub(crate) fn new(
        context: Arc<ClientContext>,
        operation: Operation,
        target: String,
        base_url: String,
        kind: RequestKind,
        body: Option<Vec<u8>>,
    ) -> Self {
        Self {
            context,
            operation,
            target,
            base_url,
            kind,
            body,
            clauses: Vec::new(),
            aggregates: Vec::new(),
            renderer: Renderer::default(),
        }
    }

    fn push(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn render_mode(&self) -> Renderer {
        self.renderer
    }

    /// `schema.table` or `path.script` this query addresses.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn page(self, page: u64) -> Self {
        self.push(Clause::Page(page))
    }

    pub fn page_size(self, size: u64) -> Self {
        self.push(Clause::PageSize(size))
    }

    /// Restricts the returned columns.
    pub fn select<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.push(Clause::Select(join_fields(fields)))
    }

    /// Counts rows; `None` counts with `*`.
    pub fn count<'a>(self, field: impl Into<Option<&'a str>>) -> Self {
        let field = field.into().unwrap_or("*");
        self.push(Clause::Count(field.to_string()))
    }

    pub fn count_first(self, enabled: bool) -> Self {
        self.push(Clause::CountFirst(enabled))
    }

    pub fn distinct(self, enabled: bool) -> Self {
        self.push(Clause::Distinct(enabled))
    }

    /// Requests a rendering from the gateway and sets how the response is decoded.
    pub fn renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self.push(Clause::Renderer(renderer))
    }

    /// Orders by the given fields; prefix a field with `-` for descending order.
    pub fn order<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.push(Clause::Order(join_fields(fields)))
    }

    pub fn group_by<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.push(Clause::GroupBy(join_fields(fields)))
    }

    /// Adds a filter with an explicit operator.
    ///
    /// For [`FilterOp::Null`] and [`FilterOp::NotNull`] the value is ignored.
    pub fn filter(self, field: impl Into<String>, op: FilterOp, value: impl Display) -> Self {
        let value = if op.takes_value() {
            value.to_string()
        } else {
            String::new()
        };
        self.push(Clause::Filter {
            field: field.into(),
            op,
            value,
        })
    }

    pub fn eq(self, field: impl Into<String>, value: impl Display) -> Self {
        self.filter(field, FilterOp::Eq, value)
    }

    pub fn ne(self, field: impl Into<String>, value: impl Display) -> Self {
        self.filter(field, FilterOp::Ne, value)
    }

    pub fn gt(self, field: impl Into<String>, value: impl Display) -> Self {
        self.filter(field, FilterOp::Gt, value)
    }

    pub fn gte(self, field: impl Into<String>, value: impl Display) -> Self {
        self.filter(field, FilterOp::Gte, value)
    }

    pub fn lt(self, field: impl Into<String>, value: impl Display) -> Self {
        self.filter(field, FilterOp::Lt, value)
    }

    pub fn lte(self, field: impl Into<String>, value: impl Display) -> Self {
        self.filter(field, FilterOp::Lte, value)
    }

    /// `field=$in.v1,v2,...`. Values are joined as-is, without percent-encoding.
    pub fn in_<I, V>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        self.filter(field, FilterOp::In, join_values(values))
    }

    /// `field=$nin.v1,v2,...`. Values are joined as-is, without percent-encoding.
    pub fn not_in<I, V>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        self.filter(field, FilterOp::NotIn, join_values(values))
    }

    pub fn null(self, field: impl Into<String>) -> Self {
        self.filter(field, FilterOp::Null, "")
    }

    pub fn not_null(self, field: impl Into<String>) -> Self {
        self.filter(field, FilterOp::NotNull, "")
    }

    pub fn like(self, field: impl Into<String>, pattern: impl Display) -> Self {
        self.filter(field, FilterOp::Like, pattern)
    }

    pub fn ilike(self, field: impl Into<String>, pattern: impl Display) -> Self {
        self.filter(field, FilterOp::ILike, pattern)
    }

    pub fn not_like(self, field: impl Into<String>, pattern: impl Display) -> Self {
        self.filter(field, FilterOp::NotLike, pattern)
    }

    /// Adds `$gte`/`$lte` bounds for whichever ends are present.
    ///
    /// A bound that renders as an empty string counts as absent; zero is a real bound.
    pub fn filter_range<V: Display>(
        self,
        field: impl Into<String>,
        start: Option<V>,
        end: Option<V>,
    ) -> Self {
        let field = field.into();
        let start = start.map(|v| v.to_string()).filter(|v| !v.is_empty());
        let end = end.map(|v| v.to_string()).filter(|v| !v.is_empty());

        let mut query = self;
        if let Some(start) = start {
            query = query.filter(field.clone(), FilterOp::Gte, start);
        }
        if let Some(end) = end {
            query = query.filter(field, FilterOp::Lte, end);
        }
        query
    }

    /// `_join=kind:table:local:op:foreign`.
    pub fn join(
        self,
        kind: JoinKind,
        table: impl Into<String>,
        local_field: impl Into<String>,
        op: FilterOp,
        foreign_field: impl Into<String>,
    ) -> Self {
        self.push(Clause::Join {
            kind,
            table: table.into(),
            local: local_field.into(),
            op,
            foreign: foreign_field.into(),
        })
    }

    /// Filters on a JSONB path: `field->>path:jsonb=value`.
    pub fn jsonb_filter(
        self,
        field: impl Into<String>,
        path: impl Into<String>,
        value: impl Display,
    ) -> Self {
        self.push(Clause::Jsonb {
            field: field.into(),
            path: path.into(),
            value: value.to_string(),
        })
    }

    /// Full-text search, optionally with a text search configuration (`english`, ...).
    pub fn text_search<'a>(
        self,
        field: impl Into<String>,
        query: impl Into<String>,
        language: impl Into<Option<&'a str>>,
    ) -> Self {
        self.push(Clause::TextSearch {
            field: field.into(),
            query: query.into(),
            language: language.into().map(String::from),
        })
    }

    /// Adds an aggregate. Aggregates are emitted together as a trailing `_select`.
    pub fn aggregate(mut self, func: Aggregate, field: impl Into<String>) -> Self {
        self.aggregates.push((func, field.into()));
        self
    }

    pub fn sum(self, field: impl Into<String>) -> Self {
        self.aggregate(Aggregate::Sum, field)
    }

    pub fn avg(self, field: impl Into<String>) -> Self {
        self.aggregate(Aggregate::Avg, field)
    }

    pub fn max(self, field: impl Into<String>) -> Self {
        self.aggregate(Aggregate::Max, field)
    }

    pub fn min(self, field: impl Into<String>) -> Self {
        self.aggregate(Aggregate::Min, field)
    }

    pub fn std_dev(self, field: impl Into<String>) -> Self {
        self.aggregate(Aggregate::StdDev, field)
    }

    pub fn variance(self, field: impl Into<String>) -> Self {
        self.aggregate(Aggregate::Variance, field)
    }

    /// `having:func:field:op:value`, applied to grouped results.
    pub fn having(
        self,
        func: Aggregate,
        field: impl Into<String>,
        condition: FilterOp,
        value: impl Display,
    ) -> Self {
        self.push(Clause::Having {
            func,
            field: field.into(),
            op: condition,
            value: value.to_string(),
        })
    }

    /// Adds an arbitrary `key=value` pair, e.g. a stored query template parameter.
    pub fn param(self, key: impl Into<String>, value: impl Display) -> Self {
        self.push(Clause::Param {
            key: key.into(),
            value: value.to_string(),
        })
    }

    /// Final request URL.
    pub fn url(&self) -> String {
        let mut url = self.base_url.clone();

        if !self.clauses.is_empty() {
            let query = self
                .clauses
                .iter()
                .map(Clause::to_string)
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }

        if !self.aggregates.is_empty() {
            let selection = self
                .aggregates
                .iter()
                .map(|(func, field)| format!("{func}:{field}"))
                .collect::<Vec<_>>()
                .join(",");
            url.push(if self.clauses.is_empty() { '?' } else { '&' });
            url.push_str("_select=");
            url.push_str(&selection);
        }

        url
    }

    /// Freezes the query into a request descriptor without performing I/O.
    pub fn build(&self) -> PreparedRequest {
        if !self.aggregates.is_empty() && self.clauses.iter().any(Clause::is_select) {
            warn!(
                "{} on {}: select() combined with aggregates sends two _select directives",
                self.operation, self.target
            );
        }

        let url = self.url();
        trace!(clauses = self.clauses.len(), aggregates = self.aggregates.len(), "{url}");

        PreparedRequest {
            operation: self.operation,
            target: self.target.clone(),
            kind: self.kind,
            method: self.kind.method(),
            url,
            body: self.body.clone(),
            renderer: self.renderer,
        }
    }

    /// Sends the request and decodes the response.
    ///
    /// Exports yield [`QueryOutput::Binary`]; other requests are decoded as JSON when
    /// the renderer is JSON, and as text otherwise.
    pub fn execute(self) -> Result<QueryOutput> {
        let prepared = self.build();
        let operation = prepared.operation;
        let target = prepared.target.clone();
        let kind = prepared.kind;
        let renderer = prepared.renderer;

        debug!(
            %operation,
            resource = %target,
            method = %prepared.method,
            url = %prepared.url,
            "dispatching request"
        );

        let request = prepared.into_http_request(self.context.authorization.as_deref());
        let response = self.context.transport.send(request).map_err(|source| {
            ClientError::TransportFailure {
                operation,
                target: target.clone(),
                source,
            }
        })?;

        if !response.is_success() {
            return Err(ClientError::HttpFailure {
                operation,
                target,
                status: response.status,
                status_text: response.status_text().to_string(),
                message: String::from_utf8_lossy(&response.body).trim().to_string(),
            });
        }

        debug!(status = response.status, bytes = response.body.len(), "received response");

        decode(kind, renderer, response.body).map_err(|source| {
            ClientError::DecodeFailure {
                operation,
                target,
                source,
            }
        })
    }

    /// Executes the query and deserializes a JSON response into `T`.
    pub fn fetch<T: DeserializeOwned>(self) -> Result<T> {
        let operation = self.operation;
        let target = self.target.clone();
        let decode_failure = |source: DecodeError| {
            ClientError::DecodeFailure {
                operation,
                target: target.clone(),
                source,
            }
        };

        match self.execute()? {
            QueryOutput::Json(value) => {
                serde_json::from_value(value).map_err(|err| decode_failure(err.into()))
            }
            QueryOutput::Text(_) => {
                Err(decode_failure(DecodeError::Unstructured {
                    rendered: "text",
                }))
            }
            QueryOutput::Binary(_) => {
                Err(decode_failure(DecodeError::Unstructured {
                    rendered: "an export",
                }))
            }
        }
    }
}

fn join_fields<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| f.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn join_values<I, V>(values: I) -> String
where
    I: IntoIterator<Item = V>,
    V: Display,
{
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
