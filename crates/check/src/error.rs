// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use sqlgen_template::TemplateError;
use thiserror::Error;

pub type CheckResult<T> = Result<T, CheckError>;

/// Errors in a method signature, its doc comment or a model definition
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("no SQL found in doc comment")]
    MissingSql,

    #[error("unclosed {keyword}(...) in doc comment: {doc}")]
    UnclosedWrapper { keyword: String, doc: String },

    #[error("parameter #{index} must be named")]
    UnnamedParam { index: usize },

    #[error("duplicate parameter name: {name}")]
    DuplicateParam { name: String },

    #[error("parameter name {name} is reserved")]
    ReservedParam { name: String },

    #[error("more than one data result: {first} and {second}")]
    MultipleDataResults { first: String, second: String },

    #[error("more than one error result")]
    MultipleErrorResults,

    #[error("interface result type is not supported: {ty}")]
    InterfaceResult { ty: String },

    #[error("type {name} from package {package} cannot be used here")]
    GenPackageType { package: String, name: String },

    #[error("where(...) needs a data result to scan into")]
    WhereWithoutResult,

    #[error("invalid Go identifier: {0}")]
    InvalidIdentifier(String),

    #[error("model {name} has no fields")]
    EmptyModel { name: String },

    #[error(transparent)]
    Template(#[from] TemplateError),
}
