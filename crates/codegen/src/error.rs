// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use sqlgen_catalog::CatalogError;
use sqlgen_check::CheckError;
use sqlgen_extract::ExtractError;
use thiserror::Error;

use crate::config::ConfigError;

pub type GenerateResult<T> = Result<T, GenerateError>;

/// Generator errors
///
/// `Method`, `Model`, `ModelSource`, `Interface` and `Table` are reported
/// per item and do not stop the run; the others abort it.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("{interface}.{method}: {source}")]
    Method {
        interface: String,
        method: String,
        #[source]
        source: CheckError,
    },

    #[error("model for table {table}: {source}")]
    Model {
        table: String,
        #[source]
        source: CheckError,
    },

    #[error("interface {name} ({path}): {source}")]
    Interface {
        name: String,
        path: String,
        #[source]
        source: ExtractError,
    },

    #[error("model struct for table {table}: {source}")]
    ModelSource {
        table: String,
        #[source]
        source: ExtractError,
    },

    #[error("table {table}: {source}")]
    Table {
        table: String,
        #[source]
        source: CatalogError,
    },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Cannot write {path}: {message}")]
    Io { path: String, message: String },

    #[error("Formatting failed: {0}")]
    Format(#[from] std::fmt::Error),
}
