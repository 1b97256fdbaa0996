// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Clause tree
//!
//! The nested form of a template. Every node knows which `strings.Builder`
//! it writes into, so the renderer can walk the tree depth-first and emit
//! the Go statements in source order.
//!
//! ## Builders
//!
//! Only [`WhereClause`] and [`SetClause`] introduce a new builder variable;
//! `if`/`for` bodies and SQL fragments write into the enclosing one.

use serde::{Deserialize, Serialize};

use crate::section::ForRange;

/// A node of the clause tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Clause {
    Sql(SqlClause),
    If(IfClause),
    Where(WhereClause),
    Set(SetClause),
    For(ForClause),
}

impl Clause {
    /// Count the bound values this clause (and its children) writes per
    /// evaluation of the surrounding code
    pub fn bind_count(&self) -> usize {
        match self {
            Clause::Sql(sql) => sql.bindings().count(),
            Clause::If(c) => {
                let mut total = count_all(&c.body);
                let mut next = c.otherwise.as_deref();
                while let Some(e) = next {
                    total += count_all(&e.body);
                    next = e.otherwise.as_deref();
                }
                total
            }
            Clause::Where(c) => count_all(&c.body),
            Clause::Set(c) => count_all(&c.body),
            Clause::For(c) => count_all(&c.body),
        }
    }

    /// Whether any bound value appears in this subtree
    pub fn has_bindings(&self) -> bool {
        self.bind_count() > 0
    }
}

fn count_all(body: &[Clause]) -> usize {
    body.iter().map(Clause::bind_count).sum()
}

/// Consecutive literal and parameter fragments written with one
/// `WriteString`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlClause {
    /// Builder variable this clause writes into
    pub builder: String,
    pub fragments: Vec<SqlFragment>,
}

impl SqlClause {
    pub fn new(builder: impl Into<String>) -> Self {
        Self {
            builder: builder.into(),
            fragments: Vec::new(),
        }
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.fragments.iter().filter_map(|f| match f {
            SqlFragment::Bind(b) => Some(b),
            _ => None,
        })
    }
}

/// A piece of a [`SqlClause`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SqlFragment {
    /// Literal SQL text
    Text(String),
    /// Bound value with its placeholder
    Bind(Binding),
    /// Go expression quoted as an identifier at runtime
    Quote(String),
}

/// A value bound at runtime, in placeholder order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Go expression producing the value
    pub expr: String,
    pub key: BindKey,
}

/// Key a binding is stored under in the named-parameter map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindKey {
    /// Static part of the key (the parameter path)
    pub name: String,
    /// Present when the binding sits inside one or more loops
    pub scope: Option<LoopKey>,
}

impl BindKey {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope: None,
        }
    }

    pub fn is_static(&self) -> bool {
        self.scope.is_none()
    }
}

/// Per-iteration suffix of a [`BindKey`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopKey {
    /// Number of the innermost enclosing loop
    pub for_id: usize,
    /// Index variables of every enclosing loop, outermost first
    pub indices: Vec<String>,
}

/// `{{if}}` with its optional else chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfClause {
    pub builder: String,
    pub cond: String,
    pub body: Vec<Clause>,
    pub otherwise: Option<Box<ElseClause>>,
}

/// `{{else}}` / `{{else if}}`, chained left to right
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElseClause {
    /// `None` for a terminal `else`
    pub cond: Option<String>,
    pub body: Vec<Clause>,
    pub otherwise: Option<Box<ElseClause>>,
}

/// `{{where}}`: children write into `builder`, then the text is joined into
/// `target` behind a `WHERE` keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhereClause {
    pub builder: String,
    pub target: String,
    pub body: Vec<Clause>,
}

/// `{{set}}`: like [`WhereClause`] with the `SET` keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetClause {
    pub builder: String,
    pub target: String,
    pub body: Vec<Clause>,
}

/// `{{for}}` loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForClause {
    /// Per-method loop number
    pub id: usize,
    pub builder: String,
    pub range: ForRange,
    /// Variable that distinguishes iterations in bind keys
    pub key_index: LoopIndex,
    pub body: Vec<Clause>,
}

/// How a loop's iterations are numbered for bind keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum LoopIndex {
    /// The declared `int` index variable
    Declared(String),
    /// Generated variable taking the place of a discarded `_` index
    Synthetic(String),
    /// Generated counter incremented at the end of every iteration, used
    /// when the index is not an `int` position (maps, unknown types)
    Counter(String),
}

impl LoopIndex {
    pub fn name(&self) -> &str {
        match self {
            LoopIndex::Declared(n) | LoopIndex::Synthetic(n) | LoopIndex::Counter(n) => n,
        }
    }
}
