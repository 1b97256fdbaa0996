// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlgen - Descriptor Builder
//!
//! Turns extracted Go declarations and catalog tables into validated
//! descriptors the emitter works from.
//!
//! ## Flow
//!
//! ```text
//! MethodSignature → parse_doc → MethodDescriptor → compile → CompiledTemplate
//! TableMetadata / StructDecl → StructDescriptor → StructRegistry
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use sqlgen_check::{BuildContext, ExecKind, MethodDescriptor, StructRegistry};
//! use sqlgen_ir::{GoType, MethodSignature, Param};
//!
//! let signature = MethodSignature {
//!     name: "FindByID".to_string(),
//!     doc: "SELECT * FROM @@table WHERE id = @id".to_string(),
//!     params: vec![Param::new("id", GoType::named("int"))],
//!     results: vec![
//!         Param::new("", GoType::qualified("gen", "T")),
//!         Param::new("", GoType::named("error")),
//!     ],
//! };
//! let structs = StructRegistry::new();
//! let ctx = BuildContext::new(GoType::qualified("model", "User"), &structs);
//! let method = MethodDescriptor::build("Querier", &signature, &ctx).unwrap();
//! assert_eq!(method.exec, ExecKind::Raw);
//! ```

pub mod doc;
pub mod error;
pub mod method;
pub mod model;
pub mod naming;

pub use doc::{DocKind, SqlDoc, parse_doc};
pub use error::{CheckError, CheckResult};
pub use method::{BuildContext, ExecKind, MethodDescriptor, ResultRole, ResultSlot, ScanKind};
pub use model::{FieldDescriptor, StructDescriptor, registry};
pub use sqlgen_ir::StructRegistry;
