// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use serde::Serialize;
use thiserror::Error;

pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors raised while reading Go declarations
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum ExtractError {
    /// The Go grammar could not be loaded into the parser
    #[error("failed to load Go grammar: {0}")]
    Language(String),

    /// Parser produced no tree (cancelled or timed out)
    #[error("failed to parse Go source")]
    ParseFailed,

    /// First `ERROR` or `MISSING` node of the syntax tree (1-based position)
    #[error("Go syntax error at {line}:{column} near '{snippet}'")]
    Syntax {
        line: usize,
        column: usize,
        snippet: String,
    },

    #[error("failed to read '{path}': {message}")]
    Io { path: String, message: String },

    #[error("interface {name} not found in package {package}")]
    InterfaceNotFound { name: String, package: String },

    #[error("struct {name} not found in package {package}")]
    StructNotFound { name: String, package: String },
}
