// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `JoinWhereBuilder` and `JoinSetBuilder`, called by every method body
//! with a `{{where}}` or `{{set}}` block

use std::fmt::{self, Write};

use sqlgen_ir::Import;

use super::write_preamble;

pub const HELPER_FILE: &str = "gen_helper.go";

const HELPERS: &str = r#"// JoinWhereBuilder appends the condition collected in where to src as a
// WHERE clause. Leading and trailing AND/OR connectors are dropped and
// nothing is written when no condition remains.
func JoinWhereBuilder(src *strings.Builder, where *strings.Builder) {
	value := trimConnectors(strings.TrimSpace(where.String()))
	if value != "" {
		src.WriteString("WHERE ")
		src.WriteString(value)
		src.WriteString(" ")
	}
}

// JoinSetBuilder appends the assignments collected in set to src as a SET
// clause. Commas at either end are dropped and nothing is written when no
// assignment remains.
func JoinSetBuilder(src *strings.Builder, set *strings.Builder) {
	value := strings.Trim(set.String(), ", ")
	if value != "" {
		src.WriteString("SET ")
		src.WriteString(value)
		src.WriteString(" ")
	}
}

func trimConnectors(value string) string {
	for {
		lower := strings.ToLower(value)
		switch {
		case strings.HasPrefix(lower, "and ") || strings.HasPrefix(lower, "and("):
			value = strings.TrimSpace(value[3:])
		case strings.HasPrefix(lower, "or ") || strings.HasPrefix(lower, "or("):
			value = strings.TrimSpace(value[2:])
		case strings.HasSuffix(lower, " and"):
			value = strings.TrimSpace(value[:len(value)-3])
		case strings.HasSuffix(lower, " or"):
			value = strings.TrimSpace(value[:len(value)-2])
		case lower == "and" || lower == "or":
			return ""
		default:
			return value
		}
	}
}
"#;

/// Go source of the helper file of the query package
pub fn render_helper(package: &str) -> Result<String, fmt::Error> {
    let mut w = String::new();
    write_preamble(&mut w, package, &[Import::new("strings")])?;
    w.write_str(HELPERS)?;
    Ok(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_file() {
        let source = render_helper("query").unwrap();
        assert!(source.contains("package query\n\nimport \"strings\"\n"));
        assert!(source.contains("func JoinWhereBuilder(src *strings.Builder, where *strings.Builder) {"));
        assert!(source.contains("func JoinSetBuilder(src *strings.Builder, set *strings.Builder) {"));
    }
}
