// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Model struct descriptors
//!
//! A model is described either database-first from catalog columns or
//! code-first from a Go struct declaration. Both produce the same
//! [`StructDescriptor`], which drives the emitted model and query files and
//! backs `@param.Field` validation through [`StructShape`].

use serde::Serialize;
use sqlgen_ir::{GoType, Param, StructDecl, StructField, StructRegistry, StructShape, TableMetadata};

use crate::error::{CheckError, CheckResult};
use crate::naming::{column_name, go_name, is_go_identifier, struct_name};

/// One mapped column of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Go field name
    pub name: String,
    pub column: String,
    pub ty: GoType,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub comment: Option<String>,
    /// Typed column expression kind (`Int64`, `String`, `Time`, ...)
    pub field_kind: String,
}

impl FieldDescriptor {
    /// Value of the `gorm` struct tag
    pub fn gorm_tag(&self) -> String {
        let mut parts = vec![format!("column:{}", self.column)];
        if self.primary_key {
            parts.push("primaryKey".to_string());
        }
        if self.auto_increment {
            parts.push("autoIncrement:true".to_string());
        }
        if let Some(comment) = self.comment.as_deref().filter(|c| !c.is_empty()) {
            parts.push(format!("comment:{}", comment.replace(['"', ';', '`'], " ")));
        }
        parts.join(";")
    }

    /// Full struct tag without backticks
    pub fn tag(&self) -> String {
        format!("gorm:\"{}\" json:\"{}\"", self.gorm_tag(), self.column)
    }
}

/// A model struct mapped to a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructDescriptor {
    pub name: String,
    pub table: String,
    /// Package qualifier the model lives in
    pub package: String,
    pub comment: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl StructDescriptor {
    /// Describe the model of a catalog table
    pub fn from_table(table: &TableMetadata, package: &str) -> CheckResult<Self> {
        let name = struct_name(&table.name);
        let fields: Vec<FieldDescriptor> = table
            .columns
            .iter()
            .map(|column| FieldDescriptor {
                name: go_name(&column.name),
                column: column.name.clone(),
                ty: column.go_type(),
                primary_key: column.is_primary_key,
                auto_increment: column.auto_increment,
                comment: column.comment.clone(),
                field_kind: column.data_type.field_kind().to_string(),
            })
            .collect();
        Self::validated(name, &table.name, package, table.comment.clone(), fields)
    }

    /// Describe an existing Go struct used as the model of `table`
    pub fn from_struct(decl: &StructDecl, table: &str, package: &str) -> CheckResult<Self> {
        let fields = decl.fields.iter().filter_map(mapped_field).collect();
        Self::validated(decl.name.clone(), table, package, None, fields)
    }

    fn validated(
        name: String,
        table: &str,
        package: &str,
        comment: Option<String>,
        fields: Vec<FieldDescriptor>,
    ) -> CheckResult<Self> {
        if !is_go_identifier(&name) {
            return Err(CheckError::InvalidIdentifier(name));
        }
        if fields.is_empty() {
            return Err(CheckError::EmptyModel { name });
        }
        Ok(Self {
            name,
            table: table.to_string(),
            package: package.to_string(),
            comment,
            fields,
        })
    }

    /// `package.Name`
    pub fn go_type(&self) -> GoType {
        GoType::qualified(&self.package, &self.name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn primary_keys(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.primary_key)
    }

    /// Field layout used to validate template field paths
    pub fn shape(&self) -> StructShape {
        StructShape::new(
            &self.name,
            self.fields
                .iter()
                .map(|f| Param::new(&f.name, f.ty.clone()))
                .collect(),
        )
    }
}

/// Registry of the given models, keyed by their qualified Go type
pub fn registry<'a>(models: impl IntoIterator<Item = &'a StructDescriptor>) -> StructRegistry {
    let mut registry = StructRegistry::new();
    for model in models {
        registry.insert(model.go_type(), model.shape());
    }
    registry
}

fn mapped_field(field: &StructField) -> Option<FieldDescriptor> {
    if field.embedded || !field.is_exported() {
        return None;
    }
    let gorm = field.tag_value("gorm").unwrap_or_default();
    if gorm == "-" {
        return None;
    }
    let settings: Vec<(&str, &str)> = gorm
        .split(';')
        .filter(|s| !s.trim().is_empty())
        .map(|s| match s.split_once(':') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (s.trim(), ""),
        })
        .collect();
    let setting = |key: &str| {
        settings
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| *v)
    };

    let column = setting("column")
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| column_name(&field.name));
    let primary_key = setting("primaryKey").is_some()
        || setting("primary_key").is_some()
        || field.name == "ID";
    let auto_increment = setting("autoIncrement").is_some_and(|v| v != "false");

    Some(FieldDescriptor {
        name: field.name.clone(),
        column,
        ty: field.ty.clone(),
        primary_key,
        auto_increment,
        comment: setting("comment").map(str::to_string),
        field_kind: field_kind(&field.ty).to_string(),
    })
}

/// Typed column kind of a Go field type
fn field_kind(ty: &GoType) -> &'static str {
    let ty = ty.deref();
    if ty.is_byte_slice() {
        return "Bytes";
    }
    if ty.is_qualified("time", "Time") {
        return "Time";
    }
    let GoType::Named {
        package: None,
        name,
    } = ty
    else {
        return "Field";
    };
    match name.as_str() {
        "int" => "Int",
        "int8" => "Int8",
        "int16" => "Int16",
        "int32" | "rune" => "Int32",
        "int64" => "Int64",
        "uint" => "Uint",
        "uint8" | "byte" => "Uint8",
        "uint16" => "Uint16",
        "uint32" => "Uint32",
        "uint64" => "Uint64",
        "float32" => "Float32",
        "float64" => "Float64",
        "bool" => "Bool",
        "string" => "String",
        _ => "Field",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_ir::{ColumnMetadata, DataType};

    fn field(name: &str, ty: GoType, tag: Option<&str>) -> StructField {
        StructField {
            name: name.to_string(),
            ty,
            tag: tag.map(str::to_string),
            embedded: false,
        }
    }

    #[test]
    fn test_from_table() {
        let table = TableMetadata::new("user_accounts", "app").with_columns(vec![
            ColumnMetadata::new("id", DataType::BigInt)
                .with_primary_key()
                .with_auto_increment(),
            ColumnMetadata::new("avatar_url", DataType::Text).with_nullable(true),
        ]);
        let model = StructDescriptor::from_table(&table, "model").unwrap();
        assert_eq!(model.name, "UserAccount");
        assert_eq!(model.go_type().to_string(), "model.UserAccount");

        let id = model.field("ID").unwrap();
        assert_eq!(id.field_kind, "Int64");
        assert_eq!(id.tag(), r#"gorm:"column:id;primaryKey;autoIncrement:true" json:"id""#);

        let url = model.field("AvatarURL").unwrap();
        assert_eq!(url.ty.to_string(), "*string");
        assert_eq!(url.gorm_tag(), "column:avatar_url");
    }

    #[test]
    fn test_from_struct_columns() {
        let decl = StructDecl {
            name: "User".to_string(),
            fields: vec![
                field("ID", GoType::named("int64"), Some(r#"gorm:"column:uid""#)),
                field("CreatedAt", GoType::qualified("time", "Time"), None),
                field("Secret", GoType::named("string"), Some(r#"gorm:"-""#)),
                field("password", GoType::named("string"), None),
                StructField {
                    embedded: true,
                    ..field("Meta", GoType::named("Meta"), None)
                },
                field("Score", GoType::pointer(GoType::named("float64")), None),
            ],
        };
        let model = StructDescriptor::from_struct(&decl, "users", "model").unwrap();
        let names: Vec<_> = model.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["ID", "CreatedAt", "Score"]);
        assert_eq!(model.fields[0].column, "uid");
        assert!(model.fields[0].primary_key);
        assert_eq!(model.fields[1].column, "created_at");
        assert_eq!(model.fields[1].field_kind, "Time");
        assert_eq!(model.fields[2].field_kind, "Float64");
        assert_eq!(model.primary_keys().count(), 1);
    }

    #[test]
    fn test_empty_model_is_rejected() {
        let decl = StructDecl {
            name: "Empty".to_string(),
            fields: vec![field("hidden", GoType::named("int"), None)],
        };
        assert_eq!(
            StructDescriptor::from_struct(&decl, "empties", "model"),
            Err(CheckError::EmptyModel {
                name: "Empty".to_string()
            })
        );
    }

    #[test]
    fn test_registry_resolves_through_pointers() {
        let table = TableMetadata::new("users", "")
            .with_columns(vec![ColumnMetadata::new("name", DataType::Text)]);
        let model = StructDescriptor::from_table(&table, "model").unwrap();
        let registry = registry([&model]);
        let shape = registry
            .lookup(&GoType::pointer(GoType::qualified("model", "User")))
            .unwrap();
        assert_eq!(shape.field("Name").unwrap().ty, GoType::named("string"));
    }
}
