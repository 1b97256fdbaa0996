// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlgen - Template Compiler
//!
//! Compiles the SQL template written in an interface method's doc comment
//! into the Go statements of the generated method body.
//!
//! ## Overview
//!
//! The template language is SQL text with a handful of additions:
//!
//! - `@name`: a bound value (method parameter, loop variable or a field path
//!   off either)
//! - `@@name`: a string identifier quoted at runtime; `@@table` is the
//!   target table name
//! - `{{if cond}}`, `{{else if cond}}`, `{{else}}`
//! - `{{where}}`, `{{set}}`: blocks whose text is joined behind a `WHERE` /
//!   `SET` keyword, trimming dangling connectors and commas
//! - `{{for i, v := range expr}}`
//! - `{{end}}` closing any block
//!
//! ## Compilation Process
//!
//! ```text
//! template → Lexer → Section list → ClauseBuilder → Clause tree → Renderer → Go statements
//! ```
//!
//! Every stage fails fast: the first error aborts the template.
//!
//! ## Usage
//!
//! ```rust
//! use sqlgen_template::{compile, CompileOptions, TemplateScope};
//!
//! let scope = TemplateScope::new("users");
//! let compiled = compile("select * from @@table", &scope, &CompileOptions::default()).unwrap();
//! assert_eq!(compiled.statements[1], "generateSQL.WriteString(\"select * from users \")");
//! ```

pub mod buffer;
pub mod context;
pub mod cursor;
pub mod directive;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod scope;

pub use buffer::SqlBuffer;
pub use context::CompileContext;
pub use error::{TemplateError, TemplateResult};
pub use lexer::Lexer;
pub use parser::ClauseBuilder;
pub use render::{Rendered, Renderer};
pub use scope::{BindStyle, CompileOptions, TemplateScope};

use serde::Serialize;
use sqlgen_ir::{Clause, Section};
use sqlgen_ir::names::{GENERATE_SQL, PARAMS};
use tracing::debug;

/// A compiled template, ready to be placed into a method body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledTemplate {
    /// Go statements building `generateSQL` (and `params`)
    pub statements: Vec<String>,
    /// Clause tree the statements were rendered from
    pub clauses: Vec<Clause>,
    /// Number of binding sites in the template
    pub bind_count: usize,
    /// Go packages the statements use
    pub imports: Vec<String>,
    pub bind_style: BindStyle,
}

impl CompiledTemplate {
    pub fn has_params(&self) -> bool {
        self.bind_count > 0
    }

    /// Arguments for the ORM call executing the statement
    pub fn exec_args(&self) -> String {
        match (self.has_params(), self.bind_style) {
            (false, _) => format!("{GENERATE_SQL}.String()"),
            (true, BindStyle::Named) => format!("{GENERATE_SQL}.String(), {PARAMS}"),
            (true, BindStyle::Positional) => format!("{GENERATE_SQL}.String(), {PARAMS}..."),
        }
    }
}

/// Split a template into sections
pub fn tokenize(template: &str, scope: &TemplateScope) -> TemplateResult<Vec<Section>> {
    Lexer::new(template, scope).tokenize()
}

/// Build the clause tree of already split sections
pub fn build_clauses(sections: &[Section], source: &str) -> TemplateResult<Vec<Clause>> {
    let mut ctx = CompileContext::new();
    ClauseBuilder::new(sections, &mut ctx, source).build()
}

/// Compile a template into Go statements
pub fn compile(
    template: &str,
    scope: &TemplateScope,
    options: &CompileOptions,
) -> TemplateResult<CompiledTemplate> {
    if template.trim().is_empty() {
        return Err(TemplateError::Empty);
    }

    let sections = Lexer::new(template, scope)
        .with_receiver(&options.receiver)
        .tokenize()?;
    let clauses = build_clauses(&sections, template)?;
    let bind_count = clauses.iter().map(Clause::bind_count).sum();
    let rendered = Renderer::new(options).render(&clauses);

    let mut imports = vec!["strings".to_string()];
    if rendered.needs_fmt {
        imports.insert(0, "fmt".to_string());
    }
    debug!(
        sections = sections.len(),
        clauses = clauses.len(),
        bind_count,
        "compiled template"
    );

    Ok(CompiledTemplate {
        statements: rendered.statements,
        clauses,
        bind_count,
        imports,
        bind_style: options.bind_style,
    })
}
