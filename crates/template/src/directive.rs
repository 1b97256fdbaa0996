// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Directive classification
//!
//! The text between `{{` and `}}` is split on `:`, `=`, `,` and whitespace,
//! and the first token picks the directive. Conditions are kept verbatim;
//! only `for` is taken apart into its bindings.

use sqlgen_ir::names::is_reserved_identifier;

use crate::error::{TemplateError, TemplateResult};

/// A classified `{{ ... }}` directive, before name resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    If(String),
    Else(Option<String>),
    For {
        index: String,
        value: String,
        range: String,
    },
    Where,
    Set,
    End,
}

/// Classify the trimmed body of a directive
pub fn classify(body: &str) -> TemplateResult<Directive> {
    let body = body.trim();
    let tokens: Vec<&str> = body
        .split(|c: char| matches!(c, ':' | '=' | ',') || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    let Some(keyword) = tokens.first() else {
        return Err(TemplateError::UnknownSyntax {
            sql: body.to_string(),
        });
    };

    let directive = match *keyword {
        "if" => Directive::If(condition(body, "if")?),
        "else" => match tokens.get(1) {
            None => Directive::Else(None),
            Some(&"if") => {
                let rest = body["else".len()..].trim_start();
                Directive::Else(Some(condition(rest, "if")?))
            }
            Some(_) => {
                return Err(TemplateError::UnknownSyntax {
                    sql: body.to_string(),
                });
            }
        },
        "for" => {
            if tokens.len() != 5 || tokens[3] != "range" {
                return Err(TemplateError::ForRangeSyntax {
                    sql: body.to_string(),
                });
            }
            let (index, value) = (tokens[1], tokens[2]);
            if !is_binding(index) || !is_binding(value) {
                return Err(TemplateError::ForRangeSyntax {
                    sql: body.to_string(),
                });
            }
            Directive::For {
                index: index.to_string(),
                value: value.to_string(),
                range: tokens[4].to_string(),
            }
        }
        "where" | "set" | "end" if tokens.len() != 1 => {
            return Err(TemplateError::UnknownSyntax {
                sql: body.to_string(),
            });
        }
        "where" => Directive::Where,
        "set" => Directive::Set,
        "end" => Directive::End,
        _ => {
            return Err(TemplateError::UnknownSyntax {
                sql: body.to_string(),
            });
        }
    };

    if matches!(
        directive,
        Directive::If(_) | Directive::Else(Some(_)) | Directive::For { .. }
    ) {
        check_reserved(body)?;
    }
    Ok(directive)
}

/// Text after the leading keyword, which must be non-empty
fn condition(text: &str, keyword: &str) -> TemplateResult<String> {
    let Some(cond) = text.strip_prefix(keyword).map(str::trim) else {
        return Err(TemplateError::UnknownSyntax {
            sql: text.to_string(),
        });
    };
    if cond.is_empty() {
        return Err(TemplateError::EmptyCondition {
            sql: text.to_string(),
        });
    }
    Ok(cond.to_string())
}

/// `_` or a Go identifier
fn is_binding(name: &str) -> bool {
    name == "_" || is_identifier(name)
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Reject identifiers of the generated code used outside quoted strings
fn check_reserved(body: &str) -> TemplateResult<()> {
    let mut quote: Option<char> = None;
    let mut word = String::new();
    let mut escaped = false;

    let check = |word: &mut String| -> TemplateResult<()> {
        if is_reserved_identifier(word) {
            return Err(TemplateError::ReservedIdentifier {
                ident: std::mem::take(word),
                sql: body.to_string(),
            });
        }
        word.clear();
        Ok(())
    };

    for c in body.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' && q != '`' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => {
                check(&mut word)?;
                quote = Some(c);
            }
            c if c.is_alphanumeric() || c == '_' => word.push(c),
            _ => check(&mut word)?,
        }
    }
    check(&mut word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_if_keeps_condition_verbatim() {
        assert_eq!(
            classify(" if name != \"\" && age>18 ").unwrap(),
            Directive::If("name != \"\" && age>18".to_string())
        );
    }

    #[test]
    fn test_classify_else_forms() {
        assert_eq!(classify("else").unwrap(), Directive::Else(None));
        assert_eq!(
            classify("else if id > 0").unwrap(),
            Directive::Else(Some("id > 0".to_string()))
        );
        assert!(matches!(
            classify("else id > 0"),
            Err(TemplateError::UnknownSyntax { .. })
        ));
        assert!(matches!(
            classify("else if"),
            Err(TemplateError::EmptyCondition { .. })
        ));
    }

    #[test]
    fn test_classify_for() {
        assert_eq!(
            classify("for _, name := range names").unwrap(),
            Directive::For {
                index: "_".to_string(),
                value: "name".to_string(),
                range: "names".to_string(),
            }
        );
        assert_eq!(
            classify("for i,u:=range users").unwrap(),
            Directive::For {
                index: "i".to_string(),
                value: "u".to_string(),
                range: "users".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_for_arity_errors() {
        for bad in [
            "for name := range names",
            "for _, name := range names extra",
            "for _, name := in names",
        ] {
            assert!(
                matches!(classify(bad), Err(TemplateError::ForRangeSyntax { .. })),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_classify_simple_keywords() {
        assert_eq!(classify("where").unwrap(), Directive::Where);
        assert_eq!(classify(" set ").unwrap(), Directive::Set);
        assert_eq!(classify("end").unwrap(), Directive::End);
        assert!(matches!(
            classify("end if"),
            Err(TemplateError::UnknownSyntax { .. })
        ));
        assert!(matches!(
            classify("loop x"),
            Err(TemplateError::UnknownSyntax { .. })
        ));
        assert!(matches!(classify(""), Err(TemplateError::UnknownSyntax { .. })));
    }

    #[test]
    fn test_classify_if_requires_condition() {
        assert!(matches!(
            classify("if"),
            Err(TemplateError::EmptyCondition { .. })
        ));
    }

    #[test]
    fn test_reserved_identifiers_rejected_outside_quotes() {
        assert!(matches!(
            classify("if generateSQL.Len() > 0"),
            Err(TemplateError::ReservedIdentifier { .. })
        ));
        assert!(matches!(
            classify("for _, v := range params"),
            Err(TemplateError::ReservedIdentifier { .. })
        ));
        assert!(classify("if name == \"whereSQL0\"").is_ok());
    }
}
