// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Go names for tables and columns

use heck::{ToSnakeCase, ToUpperCamelCase};

/// Segments kept fully upper-case in Go names (golint initialisms)
const INITIALISMS: &[&str] = &[
    "ACL", "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID",
    "IP", "JSON", "QPS", "RAM", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS", "TTL", "UDP",
    "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML", "XSRF", "XSS",
];

const KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// Exported Go name of a snake_case database name (`user_id` → `UserID`)
pub fn go_name(raw: &str) -> String {
    let mut name: String = raw
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|segment| {
            let upper = segment.to_uppercase();
            if INITIALISMS.contains(&upper.as_str()) {
                upper
            } else {
                segment.to_upper_camel_case()
            }
        })
        .collect();
    if name.chars().next().is_none_or(|c| c.is_ascii_digit()) {
        name.insert(0, 'F');
    }
    name
}

/// Model struct name of a table (`user_roles` → `UserRole`)
pub fn struct_name(table: &str) -> String {
    go_name(&singularize(table))
}

/// Column name of a Go field without a `column` tag (`CreatedAt` → `created_at`)
pub fn column_name(field: &str) -> String {
    field.to_snake_case()
}

/// Lower-camel variable name (`UserRole` → `userRole`)
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// English singular of the last word of a table name
pub fn singularize(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.ends_with("ies") && word.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if ["sses", "uses", "xes", "zes", "ches", "shes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        word[..word.len() - 2].to_string()
    } else if lower.ends_with('s') && !lower.ends_with("ss") && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Valid, non-keyword Go identifier
pub fn is_go_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&ident)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_name_initialisms() {
        assert_eq!(go_name("user_id"), "UserID");
        assert_eq!(go_name("avatar_url"), "AvatarURL");
        assert_eq!(go_name("createdAt"), "CreatedAt");
        assert_eq!(go_name("id"), "ID");
    }

    #[test]
    fn test_struct_name() {
        assert_eq!(struct_name("users"), "User");
        assert_eq!(struct_name("user_roles"), "UserRole");
        assert_eq!(struct_name("categories"), "Category");
        assert_eq!(struct_name("boxes"), "Box");
        assert_eq!(struct_name("address"), "Address");
        assert_eq!(struct_name("addresses"), "Address");
        assert_eq!(struct_name("courses"), "Course");
    }

    #[test]
    fn test_column_name_round_trip() {
        assert_eq!(column_name("UserID"), "user_id");
        assert_eq!(column_name("CreatedAt"), "created_at");
    }

    #[test]
    fn test_identifiers() {
        assert!(is_go_identifier("query"));
        assert!(is_go_identifier("_x1"));
        assert!(!is_go_identifier("1x"));
        assert!(!is_go_identifier("type"));
        assert!(!is_go_identifier("a-b"));
        assert_eq!(lower_first("UserRole"), "userRole");
    }
}
