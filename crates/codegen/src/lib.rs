// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlgen - Code Generator
//!
//! Generates a typed Go query package from SQL templates written in the doc
//! comments of Go interface methods.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Config (YAML)│──▶│   Catalog    │──▶│ Model        │
//! └──────────────┘   │ static / live│   │ descriptors  │
//!                    └──────────────┘   └──────┬───────┘
//! ┌──────────────┐   ┌──────────────┐          │
//! │ Go interface │──▶│ tree-sitter  │──▶ Method descriptors ──▶ Template compiler
//! │   sources    │   │  extractor   │                                  │
//! └──────────────┘   └──────────────┘                                  ↓
//!                                              gen_helper.go, <table>.gen.go
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sqlgen_codegen::{Config, Generator};
//!
//! let config = Config::load("sqlgen.yaml")?;
//! let generator = Generator::open(config).await?;
//! let output = generator.generate().await?;
//! output.write_all()?;
//! ```

pub mod config;
pub mod emit;
pub mod error;
pub mod generator;

pub use config::{CatalogConfig, Config, ConfigError, ConfigResult, InterfaceConfig};
pub use error::{GenerateError, GenerateResult};
pub use generator::{GenerateReport, GeneratedFile, Generator, Output, Plan, TablePlan};
