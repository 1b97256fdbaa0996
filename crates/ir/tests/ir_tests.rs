// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Crate-root API as seen by downstream crates

use sqlgen_ir::{Dialect, DialectFamily, DialectParseError};

#[test]
fn test_dialect_family_visible_from_crate_root() {
    let family = |d: Dialect| match d.family() {
        DialectFamily::MySQL => "mysql",
        DialectFamily::PostgreSQL => "postgresql",
    };
    assert_eq!(family(Dialect::MariaDB), "mysql");
    assert_eq!(family(Dialect::CockroachDB), "postgresql");
}

#[test]
fn test_dialect_parse_error_from_crate_root() {
    let err: DialectParseError = "oracle".parse::<Dialect>().unwrap_err();
    assert!(err.to_string().contains("oracle"));
}
