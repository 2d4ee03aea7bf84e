use std::fmt;

use crate::error::{ClientError, Result};

pub const DEFAULT_SCHEMA: &str = "public";

/// A dotted `namespace.name` identifier.
///
/// For tables the namespace is the database schema; for stored queries it is the
/// script directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub schema: String,
    pub name: String,
}

pub type TableReference = Reference;
pub type ScriptReference = Reference;

impl Reference {
    /// Splits `identifier` on its first `.`.
    ///
    /// Without a dot (or with nothing before it) the schema is `public`. A trailing dot
    /// leaves the name empty, which addresses the schema itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlrest_core::Reference;
    ///
    /// let r = Reference::parse(Some("inventory.products"), "table").unwrap();
    /// assert_eq!((r.schema.as_str(), r.name.as_str()), ("inventory", "products"));
    ///
    /// let r = Reference::parse(Some("products"), "table").unwrap();
    /// assert_eq!(r.schema, "public");
    /// ```
    pub fn parse(identifier: Option<&str>, kind: &'static str) -> Result<Self> {
        let identifier = identifier
            .filter(|s| !s.is_empty())
            .ok_or(ClientError::MissingIdentifier {
                kind,
            })?;

        let (schema, name) = match identifier.split_once('.') {
            Some((schema, name)) => (schema, name),
            None => ("", identifier),
        };
        let schema = if schema.is_empty() {
            DEFAULT_SCHEMA
        } else {
            schema
        };

        Ok(Self {
            schema: schema.to_string(),
            name: name.to_string(),
        })
    }

    /// Whether this reference names a schema rather than a single table.
    pub fn is_schema_listing(&self) -> bool {
        self.name.is_empty()
    }

    /// `schema/name`, or just `schema` when the name is empty.
    pub fn path(&self) -> String {
        if self.is_schema_listing() {
            self.schema.clone()
        } else {
            format!("{}/{}", self.schema, self.name)
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}
