// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Clause renderer
//!
//! Walks the clause tree depth-first and emits the Go statements that build
//! the SQL text in `generateSQL` and collect bound values in `params`.
//! Statements come out in tree order because every builder write is
//! order-sensitive.

use sqlgen_ir::names::{GENERATE_SQL, PARAMS, quote_go_string};
use sqlgen_ir::{
    BindKey, Binding, Clause, ForClause, IfClause, LoopIndex, SetClause, SqlClause, SqlFragment,
    WhereClause,
};

use crate::scope::{BindStyle, CompileOptions};

/// Output of [`Renderer::render`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Statements, indented with tabs relative to the method body
    pub statements: Vec<String>,
    /// Whether the statements call `fmt.Sprintf`
    pub needs_fmt: bool,
}

/// Piece of a `WriteString` argument
#[derive(Debug)]
enum Part {
    Text(String),
    Expr(String),
}

pub struct Renderer<'a> {
    options: &'a CompileOptions,
    lines: Vec<String>,
    depth: usize,
    needs_fmt: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            lines: Vec::new(),
            depth: 0,
            needs_fmt: false,
        }
    }

    /// Render the full statement list for a template
    pub fn render(mut self, clauses: &[Clause]) -> Rendered {
        let bind_count: usize = clauses.iter().map(Clause::bind_count).sum();
        if bind_count > 0 {
            match self.options.bind_style {
                BindStyle::Named => {
                    self.emit(format!("{PARAMS} := make(map[string]interface{{}})"))
                }
                BindStyle::Positional => self.emit(format!("var {PARAMS} []interface{{}}")),
            }
        }
        self.emit(format!("var {GENERATE_SQL} strings.Builder"));
        self.render_body(clauses);
        Rendered {
            statements: self.lines,
            needs_fmt: self.needs_fmt,
        }
    }

    fn emit(&mut self, stmt: impl AsRef<str>) {
        let mut line = "\t".repeat(self.depth);
        line.push_str(stmt.as_ref());
        self.lines.push(line);
    }

    fn render_body(&mut self, clauses: &[Clause]) {
        for clause in clauses {
            match clause {
                Clause::Sql(sql) => self.render_sql(sql),
                Clause::If(c) => self.render_if(c),
                Clause::Where(c) => self.render_where(c),
                Clause::Set(c) => self.render_set(c),
                Clause::For(c) => self.render_for(c),
            }
        }
    }

    fn render_sql(&mut self, sql: &SqlClause) {
        let mut parts: Vec<Part> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        for fragment in &sql.fragments {
            match fragment {
                SqlFragment::Text(text) => push_text(&mut parts, text),
                SqlFragment::Bind(binding) => self.render_binding(binding, &mut parts, &mut binds),
                SqlFragment::Quote(expr) => {
                    parts.push(Part::Expr(format!("{}.Quote({expr})", self.options.receiver)))
                }
            }
        }

        if let Some(Part::Text(first)) = parts.first_mut() {
            *first = first.trim_start().to_string();
        }
        if let Some(Part::Text(last)) = parts.last_mut() {
            *last = last.trim_end().to_string();
        }
        parts.retain(|p| !matches!(p, Part::Text(t) if t.is_empty()));
        if parts.is_empty() {
            return;
        }
        push_text(&mut parts, " ");

        for bind in binds {
            self.emit(bind);
        }
        let arg = parts
            .iter()
            .map(|p| match p {
                Part::Text(t) => quote_go_string(t),
                Part::Expr(e) => e.clone(),
            })
            .collect::<Vec<_>>()
            .join(" + ");
        self.emit(format!("{}.WriteString({arg})", sql.builder));
    }

    fn render_binding(&mut self, binding: &Binding, parts: &mut Vec<Part>, binds: &mut Vec<String>) {
        match self.options.bind_style {
            BindStyle::Positional => {
                push_text(parts, "?");
                binds.push(format!("{PARAMS} = append({PARAMS}, {})", binding.expr));
            }
            BindStyle::Named if binding.key.is_static() => {
                push_text(parts, &format!("@{}", binding.key.name));
                binds.push(format!(
                    "{PARAMS}[{}] = {}",
                    quote_go_string(&binding.key.name),
                    binding.expr
                ));
            }
            BindStyle::Named => {
                let key = self.key_expr(&binding.key);
                push_text(parts, "@");
                parts.push(Part::Expr(key.clone()));
                binds.push(format!("{PARAMS}[{key}] = {}", binding.expr));
            }
        }
    }

    /// Go expression producing a loop-scoped key: `name.<forId>_<i>[_<j>...]`
    fn key_expr(&mut self, key: &BindKey) -> String {
        let Some(scope) = &key.scope else {
            return quote_go_string(&key.name);
        };
        self.needs_fmt = true;
        let mut format = format!("{}.{}", key.name, scope.for_id);
        for _ in &scope.indices {
            format.push_str("_%v");
        }
        format!(
            "fmt.Sprintf({}, {})",
            quote_go_string(&format),
            scope.indices.join(", ")
        )
    }

    fn render_if(&mut self, clause: &IfClause) {
        self.emit(format!("if {} {{", clause.cond));
        self.indented(&clause.body);
        let mut next = clause.otherwise.as_deref();
        while let Some(branch) = next {
            match &branch.cond {
                Some(cond) => self.emit(format!("}} else if {cond} {{")),
                None => self.emit("} else {"),
            }
            self.indented(&branch.body);
            next = branch.otherwise.as_deref();
        }
        self.emit("}");
    }

    fn render_where(&mut self, clause: &WhereClause) {
        self.emit(format!("var {} strings.Builder", clause.builder));
        self.render_body(&clause.body);
        self.emit(format!(
            "JoinWhereBuilder(&{}, &{})",
            clause.target, clause.builder
        ));
    }

    fn render_set(&mut self, clause: &SetClause) {
        self.emit(format!("var {} strings.Builder", clause.builder));
        self.render_body(&clause.body);
        self.emit(format!("JoinSetBuilder(&{}, &{})", clause.target, clause.builder));
    }

    fn render_for(&mut self, clause: &ForClause) {
        let keyed = self.options.bind_style == BindStyle::Named
            && clause.body.iter().any(Clause::has_bindings);
        let range = &clause.range;

        let mut index = range.index.as_str();
        let mut counter = None;
        if keyed {
            match &clause.key_index {
                LoopIndex::Declared(_) => {}
                LoopIndex::Synthetic(name) => index = name.as_str(),
                LoopIndex::Counter(name) => counter = Some(name.as_str()),
            }
        }

        if let Some(counter) = counter {
            self.emit(format!("{counter} := 0"));
        }
        if index == "_" && range.discards_value() {
            self.emit(format!("for range {} {{", range.range));
        } else {
            self.emit(format!(
                "for {index}, {} := range {} {{",
                range.value, range.range
            ));
        }
        self.depth += 1;
        self.render_body(&clause.body);
        if let Some(counter) = counter {
            self.emit(format!("{counter}++"));
        }
        self.depth -= 1;
        self.emit("}");
    }

    fn indented(&mut self, body: &[Clause]) {
        self.depth += 1;
        self.render_body(body);
        self.depth -= 1;
    }
}

/// Append text, merging with a preceding text part
fn push_text(parts: &mut Vec<Part>, text: &str) {
    if let Some(Part::Text(last)) = parts.last_mut() {
        last.push_str(text);
    } else {
        parts.push(Part::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_ir::{ElseClause, ForRange, GoType, LoopKey};

    fn text(s: &str) -> SqlFragment {
        SqlFragment::Text(s.to_string())
    }

    fn bind(name: &str) -> SqlFragment {
        SqlFragment::Bind(Binding {
            expr: name.to_string(),
            key: BindKey::plain(name),
        })
    }

    fn sql(builder: &str, fragments: Vec<SqlFragment>) -> Clause {
        Clause::Sql(SqlClause {
            builder: builder.to_string(),
            fragments,
        })
    }

    fn render(clauses: &[Clause], style: BindStyle) -> Vec<String> {
        let options = CompileOptions::new(style, "u");
        Renderer::new(&options).render(clauses).statements
    }

    #[test]
    fn test_literal_only_has_no_params() {
        let out = render(&[sql("generateSQL", vec![text("select * from users")])], BindStyle::Named);
        assert_eq!(
            out,
            vec![
                "var generateSQL strings.Builder",
                "generateSQL.WriteString(\"select * from users \")"
            ]
        );
    }

    #[test]
    fn test_named_binding_precedes_write() {
        let out = render(
            &[sql("generateSQL", vec![text(" where id>"), bind("id"), text("  ")])],
            BindStyle::Named,
        );
        assert_eq!(
            out,
            vec![
                "params := make(map[string]interface{})",
                "var generateSQL strings.Builder",
                "params[\"id\"] = id",
                "generateSQL.WriteString(\"where id>@id \")"
            ]
        );
    }

    #[test]
    fn test_positional_binding() {
        let out = render(
            &[sql("generateSQL", vec![text("id="), bind("id")])],
            BindStyle::Positional,
        );
        assert_eq!(out[0], "var params []interface{}");
        assert_eq!(out[2], "params = append(params, id)");
        assert_eq!(out[3], "generateSQL.WriteString(\"id=? \")");
    }

    #[test]
    fn test_quote_fragment_calls_receiver() {
        let out = render(
            &[sql(
                "generateSQL",
                vec![text("select "), SqlFragment::Quote("col".into()), text(" from t")],
            )],
            BindStyle::Named,
        );
        assert_eq!(
            out[1],
            "generateSQL.WriteString(\"select \" + u.Quote(col) + \" from t \")"
        );
    }

    #[test]
    fn test_whitespace_only_clause_is_skipped() {
        let out = render(&[sql("generateSQL", vec![text("  ")])], BindStyle::Named);
        assert_eq!(out, vec!["var generateSQL strings.Builder"]);
    }

    #[test]
    fn test_if_else_chain_rendering() {
        let clause = Clause::If(IfClause {
            builder: "generateSQL".into(),
            cond: "a > 0".into(),
            body: vec![sql("generateSQL", vec![text("a")])],
            otherwise: Some(Box::new(ElseClause {
                cond: Some("b".into()),
                body: vec![sql("generateSQL", vec![text("b")])],
                otherwise: Some(Box::new(ElseClause {
                    cond: None,
                    body: vec![sql("generateSQL", vec![text("c")])],
                    otherwise: None,
                })),
            })),
        });
        let out = render(&[clause], BindStyle::Named);
        assert_eq!(
            &out[1..],
            &[
                "if a > 0 {",
                "\tgenerateSQL.WriteString(\"a \")",
                "} else if b {",
                "\tgenerateSQL.WriteString(\"b \")",
                "} else {",
                "\tgenerateSQL.WriteString(\"c \")",
                "}"
            ]
        );
    }

    #[test]
    fn test_where_joins_into_target() {
        let clause = Clause::Where(WhereClause {
            builder: "whereSQL0".into(),
            target: "generateSQL".into(),
            body: vec![sql("whereSQL0", vec![text("x=1")])],
        });
        let out = render(&[clause], BindStyle::Named);
        assert_eq!(
            &out[1..],
            &[
                "var whereSQL0 strings.Builder",
                "whereSQL0.WriteString(\"x=1 \")",
                "JoinWhereBuilder(&generateSQL, &whereSQL0)"
            ]
        );
    }

    fn loop_over_names(key_index: LoopIndex, index: &str) -> Clause {
        let scope = LoopKey {
            for_id: 0,
            indices: vec![key_index.name().to_string()],
        };
        Clause::For(ForClause {
            id: 0,
            builder: "generateSQL".into(),
            range: ForRange::new(index, "name", "names")
                .with_range_ty(GoType::slice(GoType::named("string"))),
            key_index,
            body: vec![sql(
                "generateSQL",
                vec![
                    text("name="),
                    SqlFragment::Bind(Binding {
                        expr: "name".into(),
                        key: BindKey {
                            name: "name".into(),
                            scope: Some(scope),
                        },
                    }),
                ],
            )],
        })
    }

    #[test]
    fn test_for_with_synthetic_index() {
        let options = CompileOptions::default();
        let rendered = Renderer::new(&options)
            .render(&[loop_over_names(LoopIndex::Synthetic("forIndex0".into()), "_")]);
        assert!(rendered.needs_fmt);
        assert_eq!(
            &rendered.statements[2..],
            &[
                "for forIndex0, name := range names {",
                "\tparams[fmt.Sprintf(\"name.0_%v\", forIndex0)] = name",
                "\tgenerateSQL.WriteString(\"name=@\" + fmt.Sprintf(\"name.0_%v\", forIndex0) + \" \")",
                "}"
            ]
        );
    }

    #[test]
    fn test_for_with_counter() {
        let out = render(
            &[loop_over_names(LoopIndex::Counter("forIndex0".into()), "k")],
            BindStyle::Named,
        );
        assert_eq!(out[2], "forIndex0 := 0");
        assert_eq!(out[3], "for k, name := range names {");
        assert_eq!(out[out.len() - 2], "\tforIndex0++");
    }

    #[test]
    fn test_positional_for_keeps_header() {
        let out = render(
            &[loop_over_names(LoopIndex::Synthetic("forIndex0".into()), "_")],
            BindStyle::Positional,
        );
        assert_eq!(out[2], "for _, name := range names {");
        assert_eq!(out[3], "\tparams = append(params, name)");
    }
}
