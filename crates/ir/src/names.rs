// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Identifiers the generated method bodies declare for themselves.
//!
//! Template conditions and method parameters must not shadow any of these.

/// Root `strings.Builder` holding the assembled statement
pub const GENERATE_SQL: &str = "generateSQL";
/// Bind-parameter container
pub const PARAMS: &str = "params";
/// `*gorm.DB` holding the executed statement
pub const EXECUTE_SQL: &str = "executeSQL";

/// Prefix of per-where-block builders (`whereSQL0`, `whereSQL1`, ...)
pub const WHERE_SQL_PREFIX: &str = "whereSQL";
/// Prefix of per-set-block builders
pub const SET_SQL_PREFIX: &str = "setSQL";
/// Prefix of synthetic loop indices
pub const FOR_INDEX_PREFIX: &str = "forIndex";

/// Name of the table sentinel usable as `@@table`
pub const TABLE_SENTINEL: &str = "table";

/// Check whether `ident` collides with a generated identifier
pub fn is_reserved_identifier(ident: &str) -> bool {
    if ident == GENERATE_SQL || ident == PARAMS || ident == EXECUTE_SQL {
        return true;
    }
    [WHERE_SQL_PREFIX, SET_SQL_PREFIX, FOR_INDEX_PREFIX]
        .iter()
        .any(|prefix| {
            ident
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
        })
}

/// Render `s` as a Go interpreted string literal
pub fn quote_go_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_identifiers() {
        assert!(is_reserved_identifier("generateSQL"));
        assert!(is_reserved_identifier("params"));
        assert!(is_reserved_identifier("whereSQL"));
        assert!(is_reserved_identifier("whereSQL12"));
        assert!(is_reserved_identifier("forIndex0"));
        assert!(!is_reserved_identifier("whereSQLx"));
        assert!(!is_reserved_identifier("param"));
        assert!(!is_reserved_identifier("name"));
    }

    #[test]
    fn test_quote_go_string() {
        assert_eq!(quote_go_string("SELECT * "), "\"SELECT * \"");
        assert_eq!(quote_go_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote_go_string("x\\y"), "\"x\\\\y\"");
        assert_eq!(quote_go_string("x\ny"), "\"x\\ny\"");
    }
}
