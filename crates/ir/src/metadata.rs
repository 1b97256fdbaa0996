// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema metadata
//!
//! Tables and columns reported by a catalog, used for database-first model
//! generation. Column types are normalised into [`DataType`], which knows
//! the Go type a model field of that column should have.

use serde::{Deserialize, Serialize};

use crate::go_type::GoType;

/// SQL data types (unified across dialects)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DataType {
    // Numeric types
    Integer,
    BigInt,
    SmallInt,
    TinyInt,
    Decimal,
    Float,
    Double,

    // String types
    Varchar(Option<usize>),
    Char(Option<usize>),
    Text,

    // Binary types
    Binary,
    VarBinary(Option<usize>),
    Blob,

    // Date/Time types
    Date,
    Time,
    DateTime,
    Timestamp,

    Boolean,
    Json,
    Uuid,
    Enum(Vec<String>),

    // Unknown/Other (with original type name)
    Other(String),
}

impl DataType {
    /// Normalise a column type as reported by `information_schema`
    /// (`varchar(255)`, `bigint unsigned`, `timestamp with time zone`, ...)
    pub fn from_sql(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        let (base, args) = match lower.find('(') {
            Some(open) => {
                let close = lower.rfind(')').unwrap_or(lower.len());
                (
                    lower[..open].trim().to_string(),
                    Some(lower[open + 1..close.max(open + 1)].to_string()),
                )
            }
            None => (lower.clone(), None),
        };
        let base = base
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        let length = args.as_deref().and_then(|a| a.trim().parse::<usize>().ok());

        match base.as_str() {
            "int" | "integer" | "int4" | "mediumint" | "serial" => DataType::Integer,
            "bigint" | "int8" | "bigserial" => DataType::BigInt,
            "smallint" | "int2" | "smallserial" => DataType::SmallInt,
            // MySQL reports booleans as tinyint(1)
            "tinyint" if length == Some(1) => DataType::Boolean,
            "tinyint" => DataType::TinyInt,
            "decimal" | "numeric" => DataType::Decimal,
            "float" | "real" | "float4" => DataType::Float,
            "double" | "float8" => DataType::Double,
            "varchar" | "character" if lower.contains("varying") => DataType::Varchar(length),
            "varchar" => DataType::Varchar(length),
            "char" | "character" | "bpchar" => DataType::Char(length),
            "text" | "tinytext" | "mediumtext" | "longtext" | "citext" => DataType::Text,
            "binary" => DataType::Binary,
            "varbinary" => DataType::VarBinary(length),
            "blob" | "tinyblob" | "mediumblob" | "longblob" | "bytea" => DataType::Blob,
            "date" => DataType::Date,
            "time" | "timetz" => DataType::Time,
            "datetime" => DataType::DateTime,
            "timestamp" | "timestamptz" => DataType::Timestamp,
            "bool" | "boolean" => DataType::Boolean,
            "json" | "jsonb" => DataType::Json,
            "uuid" => DataType::Uuid,
            "enum" => DataType::Enum(
                args.unwrap_or_default()
                    .split(',')
                    .map(|v| v.trim().trim_matches('\'').to_string())
                    .filter(|v| !v.is_empty())
                    .collect(),
            ),
            _ => DataType::Other(raw.trim().to_string()),
        }
    }

    /// Go type of a model field holding this column
    ///
    /// Nullable columns become pointers, except `[]byte` which already has a
    /// nil value.
    pub fn go_type(&self, nullable: bool) -> GoType {
        let base = match self {
            DataType::Integer => GoType::named("int32"),
            DataType::BigInt => GoType::named("int64"),
            DataType::SmallInt => GoType::named("int16"),
            DataType::TinyInt => GoType::named("int8"),
            DataType::Decimal | DataType::Double => GoType::named("float64"),
            DataType::Float => GoType::named("float32"),
            DataType::Varchar(_)
            | DataType::Char(_)
            | DataType::Text
            | DataType::Json
            | DataType::Uuid
            | DataType::Enum(_)
            | DataType::Other(_) => GoType::named("string"),
            DataType::Binary | DataType::VarBinary(_) | DataType::Blob => {
                GoType::slice(GoType::named("byte"))
            }
            DataType::Date | DataType::Time | DataType::DateTime | DataType::Timestamp => {
                GoType::qualified("time", "Time")
            }
            DataType::Boolean => GoType::named("bool"),
        };
        if nullable && !base.is_byte_slice() {
            GoType::pointer(base)
        } else {
            base
        }
    }

    /// `gen/field` expression type used for the typed query struct
    pub fn field_kind(&self) -> &'static str {
        match self {
            DataType::Integer => "Int32",
            DataType::BigInt => "Int64",
            DataType::SmallInt => "Int16",
            DataType::TinyInt => "Int8",
            DataType::Decimal | DataType::Double => "Float64",
            DataType::Float => "Float32",
            DataType::Binary | DataType::VarBinary(_) | DataType::Blob => "Bytes",
            DataType::Date | DataType::Time | DataType::DateTime | DataType::Timestamp => "Time",
            DataType::Boolean => "Bool",
            _ => "String",
        }
    }
}

/// Table type classification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableType {
    Table,
    View,
    Other(String),
}

/// Metadata for a database column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub nullable: bool,
    /// Default value (as SQL expression string)
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub auto_increment: bool,
}

impl ColumnMetadata {
    /// Create a new column metadata with builder pattern
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
            default_value: None,
            comment: None,
            is_primary_key: false,
            auto_increment: false,
        }
    }

    /// Builder method: set nullable
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Builder method: set default value
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    /// Builder method: set comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Builder method: mark as primary key
    pub fn with_primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Builder method: mark as auto increment
    pub fn with_auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Go type of the model field for this column
    pub fn go_type(&self) -> GoType {
        self.data_type.go_type(self.nullable)
    }
}

/// Metadata for a database table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub name: String,
    /// Schema/database name
    #[serde(default)]
    pub schema: String,
    pub columns: Vec<ColumnMetadata>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default = "default_table_type")]
    pub table_type: TableType,
}

fn default_table_type() -> TableType {
    TableType::Table
}

impl TableMetadata {
    /// Create new table metadata with builder pattern
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            columns: Vec::new(),
            comment: None,
            table_type: TableType::Table,
        }
    }

    /// Builder method: add columns
    pub fn with_columns(mut self, columns: Vec<ColumnMetadata>) -> Self {
        self.columns = columns;
        self
    }

    /// Builder method: set comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Builder method: set table type
    pub fn with_type(mut self, table_type: TableType) -> Self {
        self.table_type = table_type;
        self
    }

    /// Get column by name
    pub fn get_column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get primary key columns
    pub fn primary_keys(&self) -> Vec<&ColumnMetadata> {
        self.columns.iter().filter(|c| c.is_primary_key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sql_normalises_common_types() {
        assert_eq!(DataType::from_sql("INT(11)"), DataType::Integer);
        assert_eq!(DataType::from_sql("bigint unsigned"), DataType::BigInt);
        assert_eq!(DataType::from_sql("varchar(255)"), DataType::Varchar(Some(255)));
        assert_eq!(
            DataType::from_sql("character varying(64)"),
            DataType::Varchar(Some(64))
        );
        assert_eq!(DataType::from_sql("tinyint(1)"), DataType::Boolean);
        assert_eq!(
            DataType::from_sql("timestamp with time zone"),
            DataType::Timestamp
        );
        assert_eq!(
            DataType::from_sql("enum('a','b')"),
            DataType::Enum(vec!["a".into(), "b".into()])
        );
        assert_eq!(
            DataType::from_sql("geometry"),
            DataType::Other("geometry".into())
        );
    }

    #[test]
    fn test_go_type_mapping() {
        assert_eq!(DataType::BigInt.go_type(false).to_string(), "int64");
        assert_eq!(DataType::Text.go_type(true).to_string(), "*string");
        assert_eq!(DataType::Timestamp.go_type(false).to_string(), "time.Time");
        assert_eq!(DataType::Blob.go_type(true).to_string(), "[]byte");
    }

    #[test]
    fn test_table_builder() {
        let table = TableMetadata::new("users", "public").with_columns(vec![
            ColumnMetadata::new("id", DataType::BigInt)
                .with_primary_key()
                .with_auto_increment(),
            ColumnMetadata::new("name", DataType::Varchar(Some(64))).with_nullable(true),
        ]);
        assert_eq!(table.primary_keys().len(), 1);
        assert_eq!(table.get_column("name").unwrap().go_type().to_string(), "*string");
        assert!(table.get_column("missing").is_none());
    }

    #[test]
    fn test_column_defaults_when_deserializing() {
        let column: ColumnMetadata =
            serde_json::from_str(r#"{"name":"id","data_type":"BigInt"}"#).unwrap();
        assert!(!column.nullable);
        assert!(!column.is_primary_key);
    }
}
