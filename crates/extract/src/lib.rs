// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlgen - Go Symbol Extractor
//!
//! Reads the Go declarations the generator works from:
//!
//! - interfaces whose methods carry SQL templates in their doc comments
//! - structs used as models or as template parameter types
//!
//! ```rust
//! use sqlgen_extract::extract_source;
//!
//! let file = extract_source("package q\n\ntype Q interface {\n\t// select 1\n\tOne() (int, error)\n}\n").unwrap();
//! let method = &file.interface("Q").unwrap().methods[0];
//! assert_eq!(method.doc, "select 1");
//! assert_eq!(method.results.len(), 2);
//! ```

pub mod comments;
pub mod error;
pub mod extractor;
pub mod types;

pub use error::{ExtractError, ExtractResult};
pub use extractor::GoExtractor;

use std::path::Path;

use sqlgen_ir::{GoFile, InterfaceDecl, StructDecl};

/// Parse Go source text with a fresh parser
pub fn extract_source(source: &str) -> ExtractResult<GoFile> {
    GoExtractor::new()?.extract(source)
}

/// Parse a Go file with a fresh parser
pub fn extract_file(path: impl AsRef<Path>) -> ExtractResult<GoFile> {
    GoExtractor::new()?.extract_file(path)
}

/// Look up an interface, failing with [`ExtractError::InterfaceNotFound`]
pub fn find_interface<'f>(file: &'f GoFile, name: &str) -> ExtractResult<&'f InterfaceDecl> {
    file.interface(name)
        .ok_or_else(|| ExtractError::InterfaceNotFound {
            name: name.to_string(),
            package: file.package.clone(),
        })
}

/// Look up a struct, failing with [`ExtractError::StructNotFound`]
pub fn find_struct<'f>(file: &'f GoFile, name: &str) -> ExtractResult<&'f StructDecl> {
    file.struct_decl(name)
        .ok_or_else(|| ExtractError::StructNotFound {
            name: name.to_string(),
            package: file.package.clone(),
        })
}
