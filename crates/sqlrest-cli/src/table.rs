use miette::{IntoDiagnostic, Result, WrapErr};
use nu_ansi_term::Color::Cyan;
use serde_json::Value;
use sqlrest_core::{Client, Renderer};
use tracing::info;

use crate::{
    output::print_output,
    utils::{apply_filters, Colored},
};

pub struct ListOptions {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub select: Vec<String>,
    pub order: Vec<String>,
    pub filters: Vec<String>,
    pub count: bool,
    pub renderer: Option<Renderer>,
}

pub fn list_rows(client: &Client, table: &str, options: ListOptions, json: bool) -> Result<()> {
    let mut query = apply_filters(client.table(table)?.list(), &options.filters)?;

    if !options.select.is_empty() {
        query = query.select(&options.select);
    }
    if !options.order.is_empty() {
        query = query.order(&options.order);
    }
    if let Some(page) = options.page {
        query = query.page(page);
    }
    if let Some(size) = options.page_size {
        query = query.page_size(size);
    }
    if options.count {
        query = query.count(None);
    }
    if let Some(renderer) = options.renderer {
        query = query.renderer(renderer);
    }

    print_output(query.execute()?, json, None)
}

pub fn show_table(client: &Client, table: &str, json: bool) -> Result<()> {
    let output = client.table(table)?.show().execute()?;
    print_output(output, json, None)
}

pub fn export_table(
    client: &Client,
    table: &str,
    data: Option<&str>,
    destination: Option<&str>,
) -> Result<()> {
    let body = match data {
        Some(data) => parse_json(data)?,
        None => Value::Object(Default::default()),
    };
    let output = client.table(table)?.export(&body)?.execute()?;
    print_output(output, false, destination)
}

/// Inserts one row, or a batch when `data` is a JSON array.
pub fn insert_rows(client: &Client, table: &str, data: &str, json: bool) -> Result<()> {
    let accessor = client.table(table)?;
    let query = match parse_json(data)? {
        Value::Array(rows) => {
            info!(
                "Inserting {} rows into {}",
                Colored(Cyan, rows.len()),
                accessor.reference()
            );
            accessor.batch_insert(&rows)?
        }
        row => accessor.insert(&row)?,
    };
    print_output(query.execute()?, json, None)
}

pub fn update_rows(
    client: &Client,
    table: &str,
    data: &str,
    filters: &[String],
    json: bool,
) -> Result<()> {
    let changes = parse_json(data)?;
    let query = apply_filters(client.table(table)?.update(&changes)?, filters)?;
    print_output(query.execute()?, json, None)
}

pub fn delete_rows(client: &Client, table: &str, filters: &[String], json: bool) -> Result<()> {
    let query = apply_filters(client.table(table)?.delete(), filters)?;
    print_output(query.execute()?, json, None)
}

fn parse_json(data: &str) -> Result<Value> {
    serde_json::from_str(data)
        .into_diagnostic()
        .wrap_err("--data must be valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        assert!(parse_json(r#"{"name":"pen"}"#).unwrap().is_object());
        assert!(parse_json("[1,2]").unwrap().is_array());
        assert!(parse_json("{name: pen}").is_err());
    }
}
