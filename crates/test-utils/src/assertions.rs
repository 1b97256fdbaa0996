// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Assertions over rendered Go statements and generated files

use sqlgen_catalog::{ColumnMetadata, DataType};

/// Custom assertion helpers for generated code
pub struct StatementAssertions;

impl StatementAssertions {
    /// Assert that a statement appears verbatim (ignoring indentation)
    pub fn assert_contains_statement(statements: &[String], expected: &str) {
        assert!(
            statements.iter().any(|s| s.trim() == expected),
            "Expected statement `{}` in:\n{}",
            expected,
            statements.join("\n")
        );
    }

    /// Assert that no statement contains the given text
    pub fn assert_no_statement_containing(statements: &[String], needle: &str) {
        if let Some(found) = statements.iter().find(|s| s.contains(needle)) {
            panic!("Unexpected statement `{}` containing `{}`", found, needle);
        }
    }

    /// Assert that the given statements appear in this relative order
    pub fn assert_statement_order(statements: &[String], expected: &[&str]) {
        let mut from = 0;
        for want in expected {
            match statements[from..].iter().position(|s| s.trim() == *want) {
                Some(offset) => from += offset + 1,
                None => panic!(
                    "Expected statement `{}` after position {} in:\n{}",
                    want,
                    from,
                    statements.join("\n")
                ),
            }
        }
    }

    /// Assert that Go blocks opened by statements are all closed
    pub fn assert_balanced_blocks(statements: &[String]) {
        let mut depth: i64 = 0;
        for statement in statements {
            let line = statement.trim();
            if line.starts_with('}') {
                depth -= 1;
            }
            assert!(depth >= 0, "Block closed before it was opened at `{}`", line);
            if line.ends_with('{') {
                depth += 1;
            }
        }
        assert_eq!(depth, 0, "Unclosed Go block in:\n{}", statements.join("\n"));
    }

    /// Number of statements containing the given text
    pub fn count_containing(statements: &[String], needle: &str) -> usize {
        statements.iter().filter(|s| s.contains(needle)).count()
    }

    /// Assert that generated source contains every snippet
    pub fn assert_source_contains(source: &str, snippets: &[&str]) {
        for snippet in snippets {
            assert!(
                source.contains(snippet),
                "Expected `{}` in generated source:\n{}",
                snippet,
                source
            );
        }
    }

    /// Assert that a column has the given properties
    pub fn assert_column(column: &ColumnMetadata, name: &str, data_type: DataType, nullable: bool) {
        assert_eq!(column.name, name, "Column name mismatch");
        assert_eq!(column.data_type, data_type, "Column data type mismatch");
        assert_eq!(column.nullable, nullable, "Column nullable mismatch");
    }
}
