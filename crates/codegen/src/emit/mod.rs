// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Go emitter
//!
//! Writes the generated Go files as text:
//!
//! - [`model`]: one model struct per table
//! - [`query`]: the typed query struct, its `Do` type and every applied
//!   interface method
//! - [`helper`]: the shared where/set join helpers
//!
//! Output is laid out the way `gofmt` would leave it (tab indentation,
//! aligned struct fields), so regenerating is diff-stable.

pub mod helper;
pub mod model;
pub mod query;

use std::fmt::{self, Write};

use sqlgen_ir::Import;

pub use helper::{HELPER_FILE, render_helper};
pub use model::render_model;
pub use query::{GeneratedMethod, QueryFile, render_query};

/// First line of every generated file
pub const HEADER: &str = "// Code generated by sqlgen. DO NOT EDIT.";

/// Write `package` and the import block, standard library first
pub(crate) fn write_preamble(w: &mut String, package: &str, imports: &[Import]) -> fmt::Result {
    writeln!(w, "{HEADER}\n")?;
    writeln!(w, "package {package}\n")?;

    let (mut std, mut external): (Vec<&Import>, Vec<&Import>) =
        imports.iter().partition(|i| is_std(&i.path));
    std.sort_by(|a, b| a.path.cmp(&b.path));
    external.sort_by(|a, b| a.path.cmp(&b.path));
    std.dedup_by(|a, b| a.path == b.path);
    external.dedup_by(|a, b| a.path == b.path);

    match (std.as_slice(), external.as_slice()) {
        ([], []) => {}
        ([only], []) | ([], [only]) => writeln!(w, "import {}\n", import_spec(only))?,
        _ => {
            writeln!(w, "import (")?;
            for import in &std {
                writeln!(w, "\t{}", import_spec(import))?;
            }
            if !std.is_empty() && !external.is_empty() {
                writeln!(w)?;
            }
            for import in &external {
                writeln!(w, "\t{}", import_spec(import))?;
            }
            writeln!(w, ")\n")?;
        }
    }
    Ok(())
}

fn import_spec(import: &Import) -> String {
    match &import.alias {
        Some(alias) => format!("{alias} \"{}\"", import.path),
        None => format!("\"{}\"", import.path),
    }
}

/// Standard library paths have no dot in their first element
fn is_std(path: &str) -> bool {
    !path.split('/').next().unwrap_or(path).contains('.')
}

/// Write a comment block, one `//` line per text line
pub(crate) fn write_comment(w: &mut String, indent: &str, text: &str) -> fmt::Result {
    for line in text.lines() {
        if line.trim().is_empty() {
            writeln!(w, "{indent}//")?;
        } else {
            writeln!(w, "{indent}// {line}")?;
        }
    }
    Ok(())
}

/// Write rows of cells with every column but the last padded to equal width
pub(crate) fn write_aligned(w: &mut String, indent: &str, rows: &[Vec<String>]) -> fmt::Result {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            rows.iter()
                .filter(|r| c + 1 < r.len())
                .map(|r| r[c].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    for row in rows {
        let mut line = indent.to_string();
        for (c, cell) in row.iter().enumerate() {
            if c + 1 < row.len() {
                line.push_str(&format!("{cell:<width$} ", width = widths[c]));
            } else {
                line.push_str(cell);
            }
        }
        writeln!(w, "{}", line.trim_end())?;
    }
    Ok(())
}
