// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error types for template compilation

use serde::Serialize;

/// Result type alias for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors raised while compiling a SQL template
///
/// Every variant carries the offending SQL so the caller can report it
/// together with the interface and method it came from.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq, Serialize)]
pub enum TemplateError {
    #[error("empty SQL template")]
    Empty,

    /// Unterminated quote, `{{ }}` or `@` reference
    #[error("incomplete SQL: {sql}")]
    Incomplete { sql: String },

    /// Directive keyword not recognised
    #[error("unknown syntax: {sql}")]
    UnknownSyntax { sql: String },

    /// `for` directive not of the form `for i, v := range expr`
    #[error("for range syntax error: {sql}")]
    ForRangeSyntax { sql: String },

    /// Block opened but never closed
    #[error("incomplete SQL, {kind} not end: {sql}")]
    NotEnd { kind: String, sql: String },

    /// Block kind that may not appear where it was found
    #[error("{child} is not allowed inside {parent}: {sql}")]
    InvalidChild {
        parent: String,
        child: String,
        sql: String,
    },

    /// `else` or `end` without a matching opener
    #[error("unmatched {kind}: {sql}")]
    Unmatched { kind: String, sql: String },

    #[error("unknown variable {name} in: {sql}")]
    UnknownVariable { name: String, sql: String },

    /// Struct path through a field the struct does not declare
    #[error("unknown field {field} of {owner} in: {sql}")]
    UnknownField {
        owner: String,
        field: String,
        sql: String,
    },

    /// `@@name` whose type is not `string`
    #[error("variable name must be string: @@{name} has type {ty}")]
    QuotedNotString { name: String, ty: String },

    #[error("cannot use the same value name in different for loops: {name}")]
    DuplicateLoopValue { name: String },

    /// Directive text using an identifier of the generated code
    #[error("{ident} is a reserved identifier: {sql}")]
    ReservedIdentifier { ident: String, sql: String },

    #[error("empty condition: {sql}")]
    EmptyCondition { sql: String },
}

impl TemplateError {
    /// Short machine-readable name of the error class
    pub fn code(&self) -> &'static str {
        match self {
            TemplateError::Empty | TemplateError::Incomplete { .. } => "lexical",
            TemplateError::UnknownSyntax { .. }
            | TemplateError::ForRangeSyntax { .. }
            | TemplateError::NotEnd { .. }
            | TemplateError::InvalidChild { .. }
            | TemplateError::Unmatched { .. }
            | TemplateError::EmptyCondition { .. } => "syntax",
            TemplateError::UnknownVariable { .. }
            | TemplateError::UnknownField { .. }
            | TemplateError::QuotedNotString { .. }
            | TemplateError::DuplicateLoopValue { .. }
            | TemplateError::ReservedIdentifier { .. } => "semantic",
        }
    }
}
