// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlgen - Catalog Layer
//!
//! Table metadata sources for the code generator. The generator emits one
//! model and one query struct per table and needs each table's columns.
//!
//! - **Static Catalogs**: schema definitions from files (YAML/JSON)
//! - **Live Catalogs**: `information_schema` queries over `sqlx` pools
//!   (features `mysql` and `postgresql`)
//!
//! ## Metadata Types
//!
//! - [`TableMetadata`]: table name, schema, type and columns
//! - [`ColumnMetadata`]: column type, nullability, keys
//! - [`DataType`]: unified SQL data type, mapped onto Go types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sqlgen_catalog::{Catalog, CatalogError, StaticCatalog};
//!
//! async fn print_columns() -> Result<(), CatalogError> {
//!     let catalog = StaticCatalog::from_file("schema.yaml")?;
//!     for column in catalog.get_columns("users").await? {
//!         println!("{}: {}", column.name, column.go_type());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod live_mysql;
pub mod live_postgres;
pub mod r#static;
pub mod r#trait;

pub use error::{CatalogError, CatalogResult};
pub use live_mysql::LiveMySQLCatalog;
pub use live_postgres::LivePostgreSQLCatalog;
pub use r#static::{SchemaFormat, StaticCatalog};
pub use r#trait::{Catalog, split_qualified};

pub use sqlgen_ir::{ColumnMetadata, DataType, Dialect, DialectFamily, TableMetadata, TableType};

use tracing::debug;

/// Connect to a live database of the given dialect
pub async fn connect(dialect: Dialect, connection_string: &str) -> CatalogResult<Box<dyn Catalog>> {
    if !dialect.accepts_connection_string(connection_string) {
        return Err(CatalogError::ConfigurationError(format!(
            "connection string does not match dialect '{}'",
            dialect
        )));
    }

    debug!(%dialect, "connecting live catalog");
    match dialect.family() {
        DialectFamily::MySQL => Ok(Box::new(LiveMySQLCatalog::new(connection_string).await?)),
        DialectFamily::PostgreSQL => {
            Ok(Box::new(LivePostgreSQLCatalog::new(connection_string).await?))
        }
    }
}
