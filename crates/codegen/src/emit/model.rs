// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use std::fmt::{self, Write};

use sqlgen_check::StructDescriptor;
use sqlgen_ir::Import;

use super::{write_aligned, write_comment, write_preamble};

/// Go source of a model file
pub fn render_model(model: &StructDescriptor) -> Result<String, fmt::Error> {
    let mut imports: Vec<Import> = Vec::new();
    for field in &model.fields {
        for package in field.ty.packages() {
            imports.push(Import::new(package));
        }
    }

    let mut w = String::new();
    write_preamble(&mut w, &model.package, &imports)?;

    let table_const = format!("TableName{}", model.name);
    writeln!(w, "const {table_const} = \"{}\"\n", model.table)?;

    match model.comment.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(comment) => write_comment(&mut w, "", &format!("{} {comment}", model.name))?,
        None => writeln!(w, "// {} mapped from table <{}>", model.name, model.table)?,
    }
    writeln!(w, "type {} struct {{", model.name)?;
    let rows: Vec<Vec<String>> = model
        .fields
        .iter()
        .map(|field| {
            let mut row = vec![
                field.name.clone(),
                field.ty.to_string(),
                format!("`{}`", field.tag()),
            ];
            if let Some(comment) = field.comment.as_deref().filter(|c| !c.is_empty()) {
                row.push(format!("// {comment}"));
            }
            row
        })
        .collect();
    write_aligned(&mut w, "\t", &rows)?;
    writeln!(w, "}}\n")?;

    writeln!(w, "// TableName {}'s table name", model.name)?;
    writeln!(w, "func (*{}) TableName() string {{", model.name)?;
    writeln!(w, "\treturn {table_const}")?;
    writeln!(w, "}}")?;
    Ok(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_ir::{ColumnMetadata, DataType, TableMetadata};

    #[test]
    fn test_model_file() {
        let table = TableMetadata::new("users", "app").with_columns(vec![
            ColumnMetadata::new("id", DataType::BigInt).with_primary_key(),
            ColumnMetadata::new("created_at", DataType::DateTime).with_comment("signup time"),
        ]);
        let model = StructDescriptor::from_table(&table, "model").unwrap();
        let source = render_model(&model).unwrap();

        assert!(source.starts_with("// Code generated by sqlgen. DO NOT EDIT.\n\npackage model\n\nimport \"time\"\n"));
        assert!(source.contains("const TableNameUser = \"users\"\n"));
        assert!(source.contains("// User mapped from table <users>\ntype User struct {\n"));
        assert!(source.contains(
            "\tID        int64     `gorm:\"column:id;primaryKey\" json:\"id\"`\n"
        ));
        assert!(source.contains(
            "\tCreatedAt time.Time `gorm:\"column:created_at;comment:signup time\" json:\"created_at\"` // signup time\n"
        ));
        assert!(source.ends_with("func (*User) TableName() string {\n\treturn TableNameUser\n}\n"));
    }
}
