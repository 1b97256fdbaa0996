// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlgen - Intermediate Representation
//!
//! This crate holds the data model shared by every stage of the generator:
//!
//! - **Go types and parameters** ([`GoType`], [`Param`]) as produced by the
//!   symbol extractor and consumed by the descriptor builder
//! - **Template sections** ([`Section`]): the flat token stream the template
//!   lexer produces from a method's doc comment
//! - **Clause tree** ([`Clause`]): the nested structure the clause builder
//!   assembles from sections and the renderer turns into Go statements
//! - **Schema metadata** ([`TableMetadata`], [`ColumnMetadata`]) reported by
//!   the catalog layer for database-first model generation
//!
//! ## Pipeline
//!
//! ```text
//! doc comment → Section list → Clause tree → Go statements
//! ```

pub mod clause;
pub mod dialect;
pub mod go_type;
pub mod metadata;
pub mod names;
pub mod section;
pub mod symbols;

// Re-export commonly used types
pub use clause::{
    BindKey, Binding, Clause, ElseClause, ForClause, IfClause, LoopIndex, LoopKey, SetClause,
    SqlClause, SqlFragment, WhereClause,
};
pub use dialect::{Dialect, DialectFamily, DialectParseError};
pub use go_type::{GoType, Param, StructRegistry, StructShape};
pub use metadata::{ColumnMetadata, DataType, TableMetadata, TableType};
pub use section::{ForRange, ParamRef, ParamSource, Section, SectionKind};
pub use symbols::{GoFile, Import, InterfaceDecl, MethodSignature, StructDecl, StructField};
