// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Catalog trait
//!
//! The generator asks a catalog for the tables it emits models and query
//! structs for. Implementations read a schema file or query a live database.

use crate::error::{CatalogError, CatalogResult};
use sqlgen_ir::{ColumnMetadata, TableMetadata};

/// Catalog trait for database schema abstraction
///
/// # Examples
///
/// ```rust,ignore
/// use sqlgen_catalog::{Catalog, CatalogError};
///
/// async fn column_names(catalog: &impl Catalog) -> Result<Vec<String>, CatalogError> {
///     let columns = catalog.get_columns("users").await?;
///     Ok(columns.into_iter().map(|c| c.name).collect())
/// }
/// ```
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// List all tables visible to the catalog
    ///
    /// Tables may be returned without their columns; use
    /// [`Catalog::get_columns`] or [`Catalog::get_table`] to load them.
    async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>>;

    /// Get column metadata for a specific table
    ///
    /// `table` may carry a schema qualifier (`schema.table`).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::TableNotFound` if the table doesn't exist.
    async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>>;

    /// Get a table together with its columns
    async fn get_table(&self, table: &str) -> CatalogResult<TableMetadata> {
        let (schema, name) = split_qualified(table);
        let mut found = self
            .list_tables()
            .await?
            .into_iter()
            .find(|t| t.name == name && schema.is_none_or(|s| t.schema == s))
            .ok_or_else(|| {
                CatalogError::TableNotFound(name.to_string(), schema.unwrap_or_default().to_string())
            })?;

        if found.columns.is_empty() {
            found.columns = self.get_columns(table).await?;
        }
        Ok(found)
    }
}

/// Split `schema.table` into its parts
pub fn split_qualified(table: &str) -> (Option<&str>, &str) {
    match table.split_once('.') {
        Some((schema, name)) => (Some(schema), name),
        None => (None, table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_qualified() {
        assert_eq!(split_qualified("app.users"), (Some("app"), "users"));
        assert_eq!(split_qualified("users"), (None, "users"));
    }
}
