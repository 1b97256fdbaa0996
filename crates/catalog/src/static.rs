// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Static Catalog
//!
//! Table metadata read from a schema file instead of a live database.
//!
//! ```yaml
//! tables:
//!   - name: users
//!     schema: app
//!     comment: registered users
//!     columns:
//!       - name: id
//!         type: bigint
//!         primary_key: true
//!         auto_increment: true
//!       - name: name
//!         type: varchar(64)
//!       - name: deleted_at
//!         type: datetime
//!         nullable: true
//! ```
//!
//! The same layout is accepted as JSON. Column types are written in SQL
//! and normalised with [`DataType::from_sql`].

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use sqlgen_ir::{ColumnMetadata, DataType, TableMetadata, TableType};
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::r#trait::{Catalog, split_qualified};

/// Serialization format of a schema file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Yaml,
    Json,
}

impl SchemaFormat {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> CatalogResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(SchemaFormat::Yaml),
            Some("json") => Ok(SchemaFormat::Json),
            other => Err(CatalogError::ConfigurationError(format!(
                "unsupported schema file extension: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    tables: Vec<TableDef>,
}

#[derive(Debug, Deserialize)]
struct TableDef {
    name: String,
    #[serde(default)]
    schema: String,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    view: bool,
    #[serde(default)]
    columns: Vec<ColumnDef>,
}

#[derive(Debug, Deserialize)]
struct ColumnDef {
    name: String,
    #[serde(rename = "type")]
    sql_type: String,
    #[serde(default)]
    nullable: bool,
    #[serde(default)]
    default: Option<String>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    primary_key: bool,
    #[serde(default)]
    auto_increment: bool,
}

impl From<ColumnDef> for ColumnMetadata {
    fn from(def: ColumnDef) -> Self {
        let mut column = ColumnMetadata::new(def.name, DataType::from_sql(&def.sql_type))
            .with_nullable(def.nullable);
        column.default_value = def.default;
        column.comment = def.comment;
        column.is_primary_key = def.primary_key;
        column.auto_increment = def.auto_increment;
        column
    }
}

impl From<TableDef> for TableMetadata {
    fn from(def: TableDef) -> Self {
        let mut table = TableMetadata::new(def.name, def.schema)
            .with_columns(def.columns.into_iter().map(ColumnMetadata::from).collect());
        table.comment = def.comment;
        if def.view {
            table = table.with_type(TableType::View);
        }
        table
    }
}

/// Catalog over a fixed set of tables
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    tables: Vec<TableMetadata>,
}

impl StaticCatalog {
    pub fn from_tables(tables: Vec<TableMetadata>) -> Self {
        Self { tables }
    }

    /// Load a YAML or JSON schema file, picking the format by extension
    pub fn from_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let format = SchemaFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::SchemaFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let catalog = Self::parse(&contents, format)?;
        debug!(
            path = %path.display(),
            tables = catalog.tables.len(),
            "loaded schema file"
        );
        Ok(catalog)
    }

    /// Parse schema file contents
    pub fn parse(contents: &str, format: SchemaFormat) -> CatalogResult<Self> {
        let file: SchemaFile = match format {
            SchemaFormat::Yaml => serde_yaml::from_str(contents)?,
            SchemaFormat::Json => serde_json::from_str(contents)?,
        };

        let mut tables: Vec<TableMetadata> = Vec::with_capacity(file.tables.len());
        for def in file.tables {
            if tables.iter().any(|t| t.name == def.name && t.schema == def.schema) {
                return Err(CatalogError::SerializationError(format!(
                    "table '{}' is defined more than once",
                    def.name
                )));
            }
            tables.push(def.into());
        }
        Ok(Self { tables })
    }

    pub fn tables(&self) -> &[TableMetadata] {
        &self.tables
    }

    fn find(&self, table: &str) -> Option<&TableMetadata> {
        let (schema, name) = split_qualified(table);
        self.tables
            .iter()
            .find(|t| t.name == name && schema.is_none_or(|s| t.schema == s))
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>> {
        Ok(self.tables.clone())
    }

    async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>> {
        self.find(table)
            .map(|t| t.columns.clone())
            .ok_or_else(|| {
                let (schema, name) = split_qualified(table);
                CatalogError::TableNotFound(name.to_string(), schema.unwrap_or_default().to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
tables:
  - name: users
    schema: app
    columns:
      - name: id
        type: bigint
        primary_key: true
        auto_increment: true
      - name: nickname
        type: varchar(32)
        nullable: true
  - name: active_users
    view: true
    columns:
      - name: id
        type: bigint
"#;

    #[test]
    fn test_parse_yaml_schema() {
        let catalog = StaticCatalog::parse(YAML, SchemaFormat::Yaml).unwrap();
        assert_eq!(catalog.tables().len(), 2);

        let users = &catalog.tables()[0];
        assert_eq!(users.schema, "app");
        assert_eq!(users.primary_keys().len(), 1);
        let nickname = users.get_column("nickname").unwrap();
        assert_eq!(nickname.data_type, DataType::Varchar(Some(32)));
        assert!(nickname.nullable);

        assert_eq!(catalog.tables()[1].table_type, TableType::View);
    }

    #[test]
    fn test_parse_json_schema() {
        let json = r#"{"tables":[{"name":"orders","columns":[{"name":"total","type":"decimal(10,2)"}]}]}"#;
        let catalog = StaticCatalog::parse(json, SchemaFormat::Json).unwrap();
        let orders = &catalog.tables()[0];
        assert_eq!(orders.schema, "");
        assert_eq!(orders.columns[0].data_type, DataType::Decimal);
    }

    #[test]
    fn test_parse_rejects_duplicate_table() {
        let yaml = "tables:\n  - name: users\n  - name: users\n";
        let err = StaticCatalog::parse(yaml, SchemaFormat::Yaml).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            SchemaFormat::from_path(Path::new("schema.yml")).unwrap(),
            SchemaFormat::Yaml
        );
        assert_eq!(
            SchemaFormat::from_path(Path::new("schema.json")).unwrap(),
            SchemaFormat::Json
        );
        assert!(SchemaFormat::from_path(Path::new("schema.toml")).is_err());
    }

    #[tokio::test]
    async fn test_get_columns_qualified_and_bare() {
        let catalog = StaticCatalog::parse(YAML, SchemaFormat::Yaml).unwrap();
        assert_eq!(catalog.get_columns("users").await.unwrap().len(), 2);
        assert_eq!(catalog.get_columns("app.users").await.unwrap().len(), 2);
        assert!(matches!(
            catalog.get_columns("other.users").await,
            Err(CatalogError::TableNotFound(_, _))
        ));
    }
}
