// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Query file of one table
//!
//! ```go
//! type user struct {
//!     userDo
//!
//!     ALL  field.Asterisk
//!     ID   field.Int64
//! }
//!
//! type userDo struct{ gen.DO }
//!
//! func (u userDo) FindByID(id int) (result model.User, err error) { ... }
//! ```

use std::fmt::{self, Write};

use sqlgen_check::naming::lower_first;
use sqlgen_check::{ExecKind, MethodDescriptor, StructDescriptor};
use sqlgen_ir::Import;
use sqlgen_ir::names::EXECUTE_SQL;
use sqlgen_template::CompiledTemplate;

use super::{write_aligned, write_comment, write_preamble};

/// A method ready to be written into a query file
#[derive(Debug, Clone)]
pub struct GeneratedMethod {
    pub descriptor: MethodDescriptor,
    pub compiled: CompiledTemplate,
    /// Doc comment copied onto the generated method
    pub comment: String,
    /// Packages the signature refers to
    pub imports: Vec<Import>,
}

/// Everything a query file is rendered from
#[derive(Debug, Clone)]
pub struct QueryFile<'a> {
    pub package: &'a str,
    pub model: &'a StructDescriptor,
    pub receiver: &'a str,
    /// Model package import
    pub model_import: Import,
    pub gen_import: &'a str,
    /// Qualifier the gen package is imported under
    pub gen_package: &'a str,
    pub methods: Vec<GeneratedMethod>,
}

impl QueryFile<'_> {
    /// Unexported query struct name (`user`)
    pub fn query_type(&self) -> String {
        lower_first(&self.model.name)
    }

    /// Unexported `Do` type name (`userDo`)
    pub fn do_type(&self) -> String {
        format!("{}Do", self.query_type())
    }

    /// Constructor name (`newUser`)
    pub fn constructor(&self) -> String {
        format!("new{}", self.model.name)
    }

    fn all_imports(&self) -> Vec<Import> {
        let gen_import = Import {
            alias: (Import::new(self.gen_import).qualifier() != self.gen_package)
                .then(|| self.gen_package.to_string()),
            path: self.gen_import.to_string(),
        };
        let mut imports = vec![
            gen_import,
            Import::new(format!("{}/field", self.gen_import)),
            Import::new("gorm.io/gorm"),
        ];
        if !self.methods.is_empty() {
            imports.push(Import::new("strings"));
        }
        if self
            .methods
            .iter()
            .any(|m| m.compiled.imports.iter().any(|i| i == "fmt"))
        {
            imports.push(Import::new("fmt"));
        }
        imports.push(self.model_import.clone());
        imports.extend(self.methods.iter().flat_map(|m| m.imports.iter().cloned()));
        imports
    }
}

/// Go source of a query file
pub fn render_query(file: &QueryFile<'_>) -> Result<String, fmt::Error> {
    let mut w = String::new();
    write_preamble(&mut w, file.package, &file.all_imports())?;

    let model = file.model;
    let query = file.query_type();
    let do_type = file.do_type();
    let model_type = model.go_type();
    let local = format!("_{query}");

    writeln!(w, "func {}(db *gorm.DB) {query} {{", file.constructor())?;
    writeln!(w, "\t{local} := {query}{{}}\n")?;
    writeln!(w, "\t{local}.{do_type}.UseDB(db)")?;
    writeln!(w, "\t{local}.{do_type}.UseModel(&{model_type}{{}})\n")?;
    writeln!(w, "\ttableName := {local}.{do_type}.TableName()")?;
    writeln!(w, "\t{local}.ALL = field.NewAsterisk(tableName)")?;
    for field in &model.fields {
        writeln!(
            w,
            "\t{local}.{} = field.New{}(tableName, \"{}\")",
            field.name, field.field_kind, field.column
        )?;
    }
    writeln!(w, "\n\treturn {local}")?;
    writeln!(w, "}}\n")?;

    writeln!(w, "type {query} struct {{")?;
    writeln!(w, "\t{do_type}\n")?;
    let mut rows = vec![vec!["ALL".to_string(), "field.Asterisk".to_string()]];
    rows.extend(
        model
            .fields
            .iter()
            .map(|f| vec![f.name.clone(), format!("field.{}", f.field_kind)]),
    );
    write_aligned(&mut w, "\t", &rows)?;
    writeln!(w, "}}\n")?;

    let recv = file.receiver;
    writeln!(w, "func ({recv} {query}) TableName() string {{ return {recv}.{do_type}.TableName() }}\n")?;
    write!(w, "type {do_type} struct{{ {}.DO }}", file.gen_package)?;

    for method in &file.methods {
        writeln!(w, "\n")?;
        write_method(&mut w, recv, &do_type, method)?;
    }
    writeln!(w)?;
    Ok(w)
}

fn write_method(
    w: &mut String,
    recv: &str,
    do_type: &str,
    method: &GeneratedMethod,
) -> fmt::Result {
    let desc = &method.descriptor;
    write_comment(w, "", &method.comment)?;
    writeln!(w, "func ({recv} {do_type}) {} {{", desc.go_signature())?;
    for stmt in &method.compiled.statements {
        writeln!(w, "\t{stmt}")?;
    }
    writeln!(w)?;

    let args = method.compiled.exec_args();
    writeln!(w, "\tvar {EXECUTE_SQL} *gorm.DB")?;
    let call = match (desc.exec, desc.data(), desc.scan()) {
        (ExecKind::Raw, Some(data), Some(scan)) => {
            format!("Raw({args}).{}(&{})", scan.method(), data.name)
        }
        (ExecKind::Where, Some(data), Some(scan)) => {
            format!("Where({args}).{}(&{})", scan.method(), data.name)
        }
        _ => format!("Exec({args})"),
    };
    writeln!(w, "\t{EXECUTE_SQL} = {recv}.UnderlyingDB().{call} // ignore_security_alert")?;
    if let Some(rows) = desc.rows_affected() {
        writeln!(w, "\t{} = {}({EXECUTE_SQL}.RowsAffected)", rows.name, rows.ty)?;
    }
    match desc.error() {
        Some(err) => writeln!(w, "\t{} = {EXECUTE_SQL}.Error", err.name)?,
        None if desc.rows_affected().is_none() => writeln!(w, "\t_ = {EXECUTE_SQL}")?,
        None => {}
    }
    writeln!(w, "\treturn")?;
    write!(w, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_check::{BuildContext, StructRegistry};
    use sqlgen_ir::{ColumnMetadata, DataType, GoType, MethodSignature, Param, TableMetadata};
    use sqlgen_template::CompileOptions;

    fn model() -> StructDescriptor {
        let table = TableMetadata::new("users", "").with_columns(vec![
            ColumnMetadata::new("id", DataType::BigInt).with_primary_key(),
            ColumnMetadata::new("name", DataType::Text),
        ]);
        StructDescriptor::from_table(&table, "model").unwrap()
    }

    fn generated(model: &StructDescriptor, doc: &str, results: Vec<Param>) -> GeneratedMethod {
        let sig = MethodSignature {
            name: "Run".to_string(),
            doc: doc.to_string(),
            params: vec![Param::new("id", GoType::named("int"))],
            results,
        };
        let structs = StructRegistry::new();
        let ctx = BuildContext::new(model.go_type(), &structs);
        let descriptor = MethodDescriptor::build("Querier", &sig, &ctx).unwrap();
        let compiled = descriptor
            .compile("users", &structs, &CompileOptions::default())
            .unwrap();
        GeneratedMethod {
            descriptor,
            compiled,
            comment: doc.to_string(),
            imports: Vec::new(),
        }
    }

    fn file<'a>(model: &'a StructDescriptor, methods: Vec<GeneratedMethod>) -> QueryFile<'a> {
        QueryFile {
            package: "query",
            model,
            receiver: "u",
            model_import: Import::new("example.com/app/model"),
            gen_import: "gorm.io/gen",
            gen_package: "gen",
            methods,
        }
    }

    #[test]
    fn test_query_struct() {
        let model = model();
        let source = render_query(&file(&model, Vec::new())).unwrap();
        assert!(source.contains("func newUser(db *gorm.DB) user {\n\t_user := user{}\n"));
        assert!(source.contains("\t_user.userDo.UseModel(&model.User{})\n"));
        assert!(source.contains("\t_user.ID = field.NewInt64(tableName, \"id\")\n"));
        assert!(source.contains("\t_user.Name = field.NewString(tableName, \"name\")\n"));
        assert!(source.contains("type user struct {\n\tuserDo\n\n\tALL  field.Asterisk\n\tID   field.Int64\n\tName field.String\n}\n"));
        assert!(source.contains("type userDo struct{ gen.DO }\n"));
        assert!(!source.contains("\"strings\""));
    }

    #[test]
    fn test_raw_method_body() {
        let model = model();
        let method = generated(
            &model,
            "select * from @@table where id=@id",
            vec![
                Param::new("", GoType::qualified("gen", "T")),
                Param::new("", GoType::named("error")),
            ],
        );
        let source = render_query(&file(&model, vec![method])).unwrap();
        let expected = "// select * from @@table where id=@id
func (u userDo) Run(id int) (result model.User, err error) {
\tparams := make(map[string]interface{})
\tvar generateSQL strings.Builder
\tparams[\"id\"] = id
\tgenerateSQL.WriteString(\"select * from users where id=@id \")

\tvar executeSQL *gorm.DB
\texecuteSQL = u.UnderlyingDB().Raw(generateSQL.String(), params).Take(&result) // ignore_security_alert
\terr = executeSQL.Error
\treturn
}
";
        assert!(source.ends_with(expected), "{source}");
        assert!(source.contains("\t\"strings\"\n"));
    }

    #[test]
    fn test_exec_method_body() {
        let model = model();
        let method = generated(
            &model,
            "delete from @@table where id=@id",
            vec![Param::new("", GoType::qualified("gen", "RowsAffected"))],
        );
        let source = render_query(&file(&model, vec![method])).unwrap();
        assert!(source.contains("func (u userDo) Run(id int) (rowsAffected gen.RowsAffected) {\n"));
        assert!(source.contains(
            "\texecuteSQL = u.UnderlyingDB().Exec(generateSQL.String(), params) // ignore_security_alert\n\trowsAffected = gen.RowsAffected(executeSQL.RowsAffected)\n\treturn\n"
        ));
    }
}
