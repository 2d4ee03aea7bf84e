use std::{
    fs,
    io::{self, Write},
};

use miette::{IntoDiagnostic, Result, WrapErr};
use serde_json::Value;
use sqlrest_core::QueryOutput;
use tabled::{builder::Builder, settings::Style};
use tracing::info;

/// Renders a JSON array of objects as a table.
///
/// Columns follow the keys of the first row; returns `None` for any other shape.
pub fn render_rows(value: &Value) -> Option<String> {
    let rows = value.as_array()?;
    let first = rows.first()?.as_object()?;
    let columns: Vec<String> = first.keys().cloned().collect();

    let mut builder = Builder::new();
    builder.push_record(columns.clone());
    for row in rows {
        let row = row.as_object()?;
        builder.push_record(columns.iter().map(|column| {
            match row.get(column) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            }
        }));
    }

    Some(builder.build().with(Style::rounded()).to_string())
}

/// Prints a query result to stdout, or writes it to `output` when given.
pub fn print_output(output: QueryOutput, json: bool, destination: Option<&str>) -> Result<()> {
    if let Some(path) = destination {
        let bytes = output.into_bytes();
        fs::write(path, &bytes)
            .into_diagnostic()
            .wrap_err_with(|| format!("writing {path}"))?;
        info!("Wrote {} bytes to {}", bytes.len(), path);
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    let written = match output {
        QueryOutput::Json(value) => {
            let rendered = if json {
                None
            } else {
                render_rows(&value)
            };
            match rendered {
                Some(table) => writeln!(stdout, "{table}"),
                None => {
                    let pretty = serde_json::to_string_pretty(&value).into_diagnostic()?;
                    writeln!(stdout, "{pretty}")
                }
            }
        }
        QueryOutput::Text(text) => write!(stdout, "{text}"),
        QueryOutput::Binary(bytes) => stdout.write_all(&bytes),
    };
    written.into_diagnostic()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_render_rows() {
        let table = render_rows(&json!([
            {"id": 1, "name": "pen", "note": null},
            {"id": 2, "name": "ink", "note": "blue"}
        ]))
        .unwrap();

        let header = table.lines().nth(1).unwrap();
        assert!(header.find("id").unwrap() < header.find("name").unwrap());
        assert!(header.find("name").unwrap() < header.find("note").unwrap());
        assert!(table.contains("pen"));
        assert!(table.contains("blue"));
    }

    #[test]
    fn test_render_rows_other_shapes() {
        assert!(render_rows(&json!({"id": 1})).is_none());
        assert!(render_rows(&json!([])).is_none());
        assert!(render_rows(&json!([1, 2])).is_none());
        assert!(render_rows(&Value::Null).is_none());
    }

    #[test]
    fn test_write_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.csv");
        let path = path.to_str().unwrap();

        print_output(QueryOutput::Binary(b"id\n1\n".to_vec()), false, Some(path)).unwrap();
        assert_eq!(fs::read(path).unwrap(), b"id\n1\n");
    }
}
