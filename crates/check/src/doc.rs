// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Template text of a method doc comment

use serde::Serialize;

use crate::error::{CheckError, CheckResult};

/// How the doc comment's SQL is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocKind {
    /// Bare template text
    Template,
    /// `sql(...)` wrapper
    Sql,
    /// `where(...)` wrapper, executed as a `Where` condition
    Where,
}

/// The template part of a doc comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlDoc {
    pub kind: DocKind,
    pub text: String,
}

/// Extract the template of `method` from its doc comment
///
/// A leading paragraph that starts with the method name is a description
/// and is dropped. The remainder may be wrapped in `sql(...)` or
/// `where(...)`.
pub fn parse_doc(method: &str, doc: &str) -> CheckResult<SqlDoc> {
    let mut paragraphs: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in doc.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    if paragraphs.len() > 1
        && paragraphs[0]
            .first()
            .is_some_and(|line| line.trim_start().starts_with(method))
    {
        paragraphs.remove(0);
    }

    let body = paragraphs
        .iter()
        .map(|p| p.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n");
    let body = body.trim();

    let (kind, text) = if let Some(inner) = unwrap_call(body, "sql")? {
        (DocKind::Sql, inner)
    } else if let Some(inner) = unwrap_call(body, "where")? {
        (DocKind::Where, inner)
    } else {
        (DocKind::Template, body.to_string())
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(CheckError::MissingSql);
    }
    Ok(SqlDoc { kind, text })
}

/// Inner text of `keyword(...)`, if `body` starts with such a call
fn unwrap_call(body: &str, keyword: &str) -> CheckResult<Option<String>> {
    let Some(head) = body.get(..keyword.len()) else {
        return Ok(None);
    };
    if !head.eq_ignore_ascii_case(keyword) {
        return Ok(None);
    }
    let rest = body[keyword.len()..].trim_start();
    if !rest.starts_with('(') {
        return Ok(None);
    }
    let open = body.len() - rest.len();
    match body.rfind(')') {
        Some(close) if close > open => Ok(Some(body[open + 1..close].to_string())),
        _ => Err(CheckError::UnclosedWrapper {
            keyword: keyword.to_string(),
            doc: body.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_paragraph_is_dropped() {
        let doc = parse_doc("FindByID", "FindByID query a user\n\nSELECT * FROM @@table").unwrap();
        assert_eq!(doc.kind, DocKind::Template);
        assert_eq!(doc.text, "SELECT * FROM @@table");
    }

    #[test]
    fn test_single_paragraph_is_kept() {
        let doc = parse_doc("Find", "Find me").unwrap();
        assert_eq!(doc.text, "Find me");
    }

    #[test]
    fn test_wrappers() {
        let doc = parse_doc("M", "sql(select * from t where a=(@a))").unwrap();
        assert_eq!(doc.kind, DocKind::Sql);
        assert_eq!(doc.text, "select * from t where a=(@a)");

        let doc = parse_doc("M", "WHERE (name = @name)").unwrap();
        assert_eq!(doc.kind, DocKind::Where);
        assert_eq!(doc.text, "name = @name");
    }

    #[test]
    fn test_where_keyword_without_paren_is_plain_template() {
        let doc = parse_doc("M", "where id = @id").unwrap();
        assert_eq!(doc.kind, DocKind::Template);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_doc("M", "  \n "), Err(CheckError::MissingSql));
        assert_eq!(parse_doc("M", "sql( )"), Err(CheckError::MissingSql));
        assert!(matches!(
            parse_doc("M", "sql(select 1"),
            Err(CheckError::UnclosedWrapper { .. })
        ));
    }
}
