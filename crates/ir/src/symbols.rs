// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Declarations found in a Go source file.

use serde::{Deserialize, Serialize};

use crate::go_type::{GoType, Param};

/// Declarations of one Go file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoFile {
    pub package: String,
    pub imports: Vec<Import>,
    pub interfaces: Vec<InterfaceDecl>,
    pub structs: Vec<StructDecl>,
}

impl GoFile {
    pub fn interface(&self, name: &str) -> Option<&InterfaceDecl> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn struct_decl(&self, name: &str) -> Option<&StructDecl> {
        self.structs.iter().find(|s| s.name == name)
    }

    /// Import path for a package qualifier used in this file
    pub fn import_path(&self, qualifier: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|i| i.qualifier() == qualifier)
            .map(|i| i.path.as_str())
    }
}

/// `import alias "path"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub alias: Option<String>,
    pub path: String,
}

impl Import {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            alias: None,
            path: path.into(),
        }
    }

    /// Name the package is referred to by
    pub fn qualifier(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDecl {
    pub name: String,
    pub methods: Vec<MethodSignature>,
}

/// A method declared in an interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,
    /// Doc comment with comment markers stripped, lines joined by `\n`
    pub doc: String,
    pub params: Vec<Param>,
    pub results: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<StructField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    pub ty: GoType,
    /// Raw tag without the surrounding backticks
    pub tag: Option<String>,
    pub embedded: bool,
}

impl StructField {
    /// Value of `key` in the struct tag (`gorm:"column:id"` → `column:id`)
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        let tag = self.tag.as_deref()?;
        let needle = format!("{key}:\"");
        let start = tag.find(&needle)? + needle.len();
        let rest = &tag[start..];
        let end = rest.find('"')?;
        Some(&rest[..end])
    }

    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_qualifier() {
        assert_eq!(Import::new("gorm.io/gen/field").qualifier(), "field");
        let aliased = Import {
            alias: Some("m".into()),
            path: "example.com/model".into(),
        };
        assert_eq!(aliased.qualifier(), "m");
    }

    #[test]
    fn test_tag_value() {
        let field = StructField {
            name: "ID".into(),
            ty: GoType::named("int64"),
            tag: Some(r#"gorm:"column:id;primaryKey" json:"id""#.into()),
            embedded: false,
        };
        assert_eq!(field.tag_value("gorm"), Some("column:id;primaryKey"));
        assert_eq!(field.tag_value("json"), Some("id"));
        assert_eq!(field.tag_value("xml"), None);
        assert!(field.is_exported());
    }
}
