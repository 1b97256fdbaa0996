// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock catalog implementation for testing
//!
//! Provides an in-memory catalog with builder pattern for easy test setup

use std::collections::{HashMap, HashSet};

use sqlgen_catalog::{
    Catalog, CatalogError, CatalogResult, ColumnMetadata, DataType, TableMetadata, TableType,
    split_qualified,
};

/// In-memory mock catalog for testing
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    /// Tables keyed by `schema.name`
    tables: HashMap<String, TableMetadata>,
    /// Tables whose column query fails
    failing: HashSet<String>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table to the catalog
    pub fn add_table(mut self, table: TableMetadata) -> Self {
        let key = format!("{}.{}", table.schema, table.name);
        self.tables.insert(key, table);
        self
    }

    /// Make `get_columns` fail for a table
    pub fn fail_table(mut self, name: impl Into<String>) -> Self {
        self.failing.insert(name.into());
        self
    }

    /// Get a table by name (any schema unless qualified)
    pub fn get_table(&self, name: &str) -> Option<&TableMetadata> {
        let (schema, name) = split_qualified(name);
        self.tables
            .values()
            .find(|t| t.name == name && schema.is_none_or(|s| t.schema == s))
    }
}

#[async_trait::async_trait]
impl Catalog for MockCatalog {
    async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>> {
        let mut tables: Vec<TableMetadata> = self.tables.values().cloned().collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tables)
    }

    async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>> {
        let (_, name) = split_qualified(table);
        if self.failing.contains(name) {
            return Err(CatalogError::QueryFailed(format!(
                "mock failure for table '{}'",
                name
            )));
        }
        self.get_table(table)
            .map(|t| t.columns.clone())
            .ok_or_else(|| CatalogError::TableNotFound(table.to_string(), "mock".to_string()))
    }
}

/// Builder for creating mock catalogs with a fluent API
#[derive(Debug, Default)]
pub struct MockCatalogBuilder {
    catalog: MockCatalog,
}

impl MockCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the standard test schema (users and orders tables)
    pub fn with_standard_schema(mut self) -> Self {
        self.catalog = self
            .catalog
            .add_table(
                TableMetadata::new("users", "app")
                    .with_columns(vec![
                        ColumnMetadata::new("id", DataType::BigInt)
                            .with_primary_key()
                            .with_auto_increment(),
                        ColumnMetadata::new("name", DataType::Varchar(Some(64))),
                        ColumnMetadata::new("age", DataType::Integer),
                        ColumnMetadata::new("role", DataType::Varchar(Some(16)))
                            .with_default("'member'"),
                        ColumnMetadata::new("created_at", DataType::DateTime),
                        ColumnMetadata::new("deleted_at", DataType::DateTime).with_nullable(true),
                    ])
                    .with_comment("registered users"),
            )
            .add_table(
                TableMetadata::new("orders", "app")
                    .with_columns(vec![
                        ColumnMetadata::new("id", DataType::BigInt)
                            .with_primary_key()
                            .with_auto_increment(),
                        ColumnMetadata::new("user_id", DataType::BigInt),
                        ColumnMetadata::new("total", DataType::Decimal),
                        ColumnMetadata::new("paid", DataType::Boolean),
                        ColumnMetadata::new("note", DataType::Text).with_nullable(true),
                    ])
                    .with_type(TableType::Table),
            );

        self
    }

    /// Add a custom table
    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.catalog = self.catalog.add_table(table);
        self
    }

    /// Make column queries for a table fail
    pub fn with_failing_table(mut self, name: impl Into<String>) -> Self {
        self.catalog = self.catalog.fail_table(name);
        self
    }

    /// Build the mock catalog
    pub fn build(self) -> MockCatalog {
        self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_catalog_list_tables() {
        let catalog = MockCatalogBuilder::new().with_standard_schema().build();

        let tables = catalog.list_tables().await.unwrap();
        let table_names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(table_names, vec!["orders", "users"]);
    }

    #[tokio::test]
    async fn test_mock_catalog_get_columns() {
        let catalog = MockCatalogBuilder::new().with_standard_schema().build();

        let columns = catalog.get_columns("app.users").await.unwrap();
        assert_eq!(columns.len(), 6);
        assert!(columns.iter().any(|c| c.name == "deleted_at" && c.nullable));
        assert!(catalog.get_columns("other.users").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_catalog_failing_table() {
        let catalog = MockCatalogBuilder::new()
            .with_standard_schema()
            .with_failing_table("orders")
            .build();

        assert!(matches!(
            catalog.get_columns("orders").await,
            Err(CatalogError::QueryFailed(_))
        ));
        assert!(catalog.get_columns("users").await.is_ok());
    }
}
