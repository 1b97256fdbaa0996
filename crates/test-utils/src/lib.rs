// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for sqlgen
//!
//! This crate provides common testing components including:
//! - An in-memory mock catalog
//! - Go source, schema and template fixtures
//! - Assertions over rendered Go statements

pub mod assertions;
pub mod fixtures;
pub mod mock_catalog;

// Re-exports for convenience
pub use assertions::StatementAssertions;
pub use fixtures::{GoFixtures, SchemaFixtures, TemplateFixtures};
pub use mock_catalog::{MockCatalog, MockCatalogBuilder};
