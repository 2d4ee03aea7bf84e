use std::sync::Arc;

use serde::Serialize;

use crate::{
    client::ClientContext,
    error::{ClientError, Result},
    query::{ChainedQuery, Operation, RequestKind},
    reference::TableReference,
};

/// Query factories for one `schema.table`.
///
/// Each method returns a fresh [`ChainedQuery`] with its URL, verb and body fixed.
pub struct TableAccessor {
    context: Arc<ClientContext>,
    reference: TableReference,
}

impl TableAccessor {
    pub(crate) fn new(context: Arc<ClientContext>, reference: TableReference) -> Self {
        Self {
            context,
            reference,
        }
    }

    pub fn reference(&self) -> &TableReference {
        &self.reference
    }

    /// `GET /{schema}/{table}`; with an empty table name, lists the schema's tables.
    pub fn list(&self) -> ChainedQuery {
        let url = format!("{}/{}", self.context.base_url, self.reference.path());
        self.query(Operation::List, url, RequestKind::Get, None)
    }

    /// `GET /show/{schema}/{table}`: table and column metadata.
    pub fn show(&self) -> ChainedQuery {
        let url = format!("{}/show/{}", self.context.base_url, self.reference.path());
        self.query(Operation::Show, url, RequestKind::Get, None)
    }

    /// `POST /export/{schema}/{table}`. The response is returned as raw bytes.
    pub fn export<T: Serialize + ?Sized>(&self, data: &T) -> Result<ChainedQuery> {
        let body = self.payload(Operation::Export, data)?;
        let url = format!("{}/export/{}", self.context.base_url, self.reference.path());
        Ok(self.query(Operation::Export, url, RequestKind::Export, Some(body)))
    }

    /// `POST /{schema}/{table}` with one row.
    pub fn insert<T: Serialize + ?Sized>(&self, row: &T) -> Result<ChainedQuery> {
        let body = self.payload(Operation::Insert, row)?;
        let url = format!("{}/{}", self.context.base_url, self.reference.path());
        Ok(self.query(Operation::Insert, url, RequestKind::Post, Some(body)))
    }

    /// `POST /batch/{schema}/{table}` with many rows.
    pub fn batch_insert<T: Serialize>(&self, rows: &[T]) -> Result<ChainedQuery> {
        let body = self.payload(Operation::BatchInsert, rows)?;
        let url = format!("{}/batch/{}", self.context.base_url, self.reference.path());
        Ok(self.query(Operation::BatchInsert, url, RequestKind::Post, Some(body)))
    }

    /// `PUT /{schema}/{table}`, restricted by the query's filters.
    pub fn update<T: Serialize + ?Sized>(&self, changes: &T) -> Result<ChainedQuery> {
        let body = self.payload(Operation::Update, changes)?;
        let url = format!("{}/{}", self.context.base_url, self.reference.path());
        Ok(self.query(Operation::Update, url, RequestKind::Put, Some(body)))
    }

    /// `DELETE /{schema}/{table}`, restricted by the query's filters.
    pub fn delete(&self) -> ChainedQuery {
        let url = format!("{}/{}", self.context.base_url, self.reference.path());
        self.query(Operation::Delete, url, RequestKind::Delete, None)
    }

    fn payload<T: Serialize + ?Sized>(&self, operation: Operation, data: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(data).map_err(|source| {
            ClientError::Payload {
                operation,
                target: self.reference.to_string(),
                source,
            }
        })
    }

    fn query(
        &self,
        operation: Operation,
        url: String,
        kind: RequestKind,
        body: Option<Vec<u8>>,
    ) -> ChainedQuery {
        ChainedQuery::new(
            self.context.clone(),
            operation,
            self.reference.to_string(),
            url,
            kind,
            body,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, sync::Arc};

    use serde::Serialize;
    use serde_json::{json, Value};
    use sqlrest_http::Method;

    use super::*;
    use crate::test_utils::{client_with, RecordingTransport, BASE};

    #[derive(Serialize)]
    struct Product {
        name: &'static str,
        price: u32,
    }

    fn accessor(name: &str) -> (Arc<RecordingTransport>, TableAccessor) {
        let transport = Arc::new(RecordingTransport::new());
        let table = client_with(transport.clone()).table(name).unwrap();
        (transport, table)
    }

    #[test]
    fn test_read_urls() {
        let (_, table) = accessor("inventory.products");
        assert_eq!(table.list().url(), format!("{BASE}/inventory/products"));
        assert_eq!(table.show().url(), format!("{BASE}/show/inventory/products"));
        assert_eq!(table.delete().url(), format!("{BASE}/inventory/products"));
        assert_eq!(table.list().kind(), RequestKind::Get);
        assert_eq!(table.delete().kind(), RequestKind::Delete);
    }

    #[test]
    fn test_schema_listing_url() {
        let (_, table) = accessor("public.");
        assert_eq!(table.list().url(), format!("{BASE}/public"));
        assert!(table.reference().is_schema_listing());
    }

    #[test]
    fn test_insert_sends_json_body() {
        let (transport, table) = accessor("products");
        table
            .insert(&Product {
                name: "pen",
                price: 3,
            })
            .unwrap()
            .execute()
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].url, format!("{BASE}/public/products"));
        assert_eq!(requests[0].header_value("Content-Type"), Some("application/json"));
        let body: Value = serde_json::from_slice(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"name": "pen", "price": 3}));
    }

    #[test]
    fn test_batch_insert() {
        let (transport, table) = accessor("products");
        let rows = [
            Product {
                name: "pen",
                price: 3,
            },
            Product {
                name: "ink",
                price: 7,
            },
        ];
        let query = table.batch_insert(&rows).unwrap();
        assert_eq!(query.operation(), Operation::BatchInsert);
        query.execute().unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].url, format!("{BASE}/batch/public/products"));
        let body: Value = serde_json::from_slice(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_update_is_put_with_filters() {
        let (transport, table) = accessor("products");
        table
            .update(&json!({"price": 4}))
            .unwrap()
            .eq("name", "pen")
            .execute()
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Put);
        assert_eq!(requests[0].url, format!("{BASE}/public/products?name=pen"));
    }

    #[test]
    fn test_export_url_and_kind() {
        let (_, table) = accessor("sales.orders");
        let query = table.export(&json!({"year": 2024})).unwrap();
        assert_eq!(query.kind(), RequestKind::Export);
        assert_eq!(query.url(), format!("{BASE}/export/sales/orders"));
        assert_eq!(query.build().method, Method::Post);
    }

    #[test]
    fn test_payload_error() {
        let (transport, table) = accessor("products");
        // JSON object keys must be strings
        let mut bad = BTreeMap::new();
        bad.insert(vec![1u8], 1);

        let err = table.insert(&bad).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Payload {
                operation: Operation::Insert,
                ..
            }
        ));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_queries_are_independent() {
        let (_, table) = accessor("products");
        let first = table.list().page(1);
        let second = table.list();
        assert!(first.url().ends_with("?_page=1"));
        assert_eq!(second.url(), format!("{BASE}/public/products"));
    }
}
