use std::sync::Arc;

use crate::{
    client::ClientContext,
    query::{ChainedQuery, Operation, RequestKind},
    reference::ScriptReference,
};

/// Query factories for a stored `path.script` on the gateway.
///
/// Stored queries are read-only; template parameters are passed with
/// [`ChainedQuery::param`].
pub struct QueryAccessor {
    context: Arc<ClientContext>,
    reference: ScriptReference,
}

impl QueryAccessor {
    pub(crate) fn new(context: Arc<ClientContext>, reference: ScriptReference) -> Self {
        Self {
            context,
            reference,
        }
    }

    pub fn reference(&self) -> &ScriptReference {
        &self.reference
    }

    /// `GET /_queries/{path}/{script}`.
    pub fn list(&self) -> ChainedQuery {
        let url = format!(
            "{}/_queries/{}/{}",
            self.context.base_url, self.reference.schema, self.reference.name
        );
        self.query(Operation::Query, url, RequestKind::Get)
    }

    /// `POST /_queries/export/{path}/{script}`. The response is returned as raw bytes.
    pub fn export(&self) -> ChainedQuery {
        let url = format!(
            "{}/_queries/export/{}/{}",
            self.context.base_url, self.reference.schema, self.reference.name
        );
        self.query(Operation::QueryExport, url, RequestKind::Export)
    }

    fn query(&self, operation: Operation, url: String, kind: RequestKind) -> ChainedQuery {
        ChainedQuery::new(
            self.context.clone(),
            operation,
            self.reference.to_string(),
            url,
            kind,
            None,
        )
    }
}
