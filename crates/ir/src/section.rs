// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Template sections
//!
//! The template lexer splits a method's SQL template into a flat,
//! order-preserving list of [`Section`]s. Structural sections (`If`, `For`,
//! `Where`, `Set`, ...) still appear as single tokens here; nesting is only
//! established later when the clause builder turns the list into a tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::go_type::GoType;

/// Kind tag of a [`Section`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    Literal,
    DataParam,
    QuotedParam,
    If,
    Else,
    For,
    Where,
    Set,
    End,
}

impl SectionKind {
    /// Whether this kind opens a block closed by `end`
    pub fn is_opener(&self) -> bool {
        matches!(
            self,
            SectionKind::If | SectionKind::For | SectionKind::Where | SectionKind::Set
        )
    }

    /// Keyword used in template directives and error messages
    pub fn keyword(&self) -> &'static str {
        match self {
            SectionKind::Literal => "sql",
            SectionKind::DataParam => "param",
            SectionKind::QuotedParam => "quoted param",
            SectionKind::If => "if",
            SectionKind::Else => "else",
            SectionKind::For => "for",
            SectionKind::Where => "where",
            SectionKind::Set => "set",
            SectionKind::End => "end",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Where a template variable was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamSource {
    /// A parameter of the interface method
    Method,
    /// A variable bound by an enclosing `{{for}}`
    Loop,
}

/// A resolved `@name` / `@@name` reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamRef {
    /// Dotted Go expression as written (`user.Name`)
    pub path: String,
    pub source: ParamSource,
    /// Resolved type; [`GoType::Unknown`] when a field of an unknown struct
    pub ty: GoType,
}

impl ParamRef {
    pub fn new(path: impl Into<String>, source: ParamSource, ty: GoType) -> Self {
        Self {
            path: path.into(),
            source,
            ty,
        }
    }

    /// First segment of the path
    pub fn root(&self) -> &str {
        self.path.split('.').next().unwrap_or(&self.path)
    }
}

/// Bindings of a `{{for index, value := range expr}}` directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForRange {
    /// Index variable; `_` when discarded
    pub index: String,
    /// Value variable; `_` when discarded
    pub value: String,
    /// Go expression being ranged over
    pub range: String,
    /// Type of the range expression when it could be resolved
    #[serde(default = "unknown_type")]
    pub range_ty: GoType,
}

fn unknown_type() -> GoType {
    GoType::Unknown
}

impl ForRange {
    pub fn new(
        index: impl Into<String>,
        value: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        Self {
            index: index.into(),
            value: value.into(),
            range: range.into(),
            range_ty: GoType::Unknown,
        }
    }

    /// Builder method: set the resolved range type
    pub fn with_range_ty(mut self, ty: GoType) -> Self {
        self.range_ty = ty;
        self
    }

    pub fn discards_index(&self) -> bool {
        self.index == "_"
    }

    pub fn discards_value(&self) -> bool {
        self.value == "_"
    }

    /// Whether the loop index is an `int` position (slices, arrays, strings)
    pub fn is_positional(&self) -> bool {
        let ty = self.range_ty.deref();
        ty.is_array() || ty.is_string()
    }
}

/// One lexical unit of a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Section {
    /// Literal SQL text, whitespace already collapsed
    Literal(String),
    /// `@name`: a bound value
    DataParam(ParamRef),
    /// `@@name`: a quoted identifier
    QuotedParam(ParamRef),
    /// `{{if cond}}`
    If(String),
    /// `{{else}}` or `{{else if cond}}`
    Else(Option<String>),
    /// `{{for i, v := range expr}}`
    For(ForRange),
    /// `{{where}}`
    Where,
    /// `{{set}}`
    Set,
    /// `{{end}}`
    End,
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Literal(_) => SectionKind::Literal,
            Section::DataParam(_) => SectionKind::DataParam,
            Section::QuotedParam(_) => SectionKind::QuotedParam,
            Section::If(_) => SectionKind::If,
            Section::Else(_) => SectionKind::Else,
            Section::For(_) => SectionKind::For,
            Section::Where => SectionKind::Where,
            Section::Set => SectionKind::Set,
            Section::End => SectionKind::End,
        }
    }

    /// Source-like text of the section, used in error messages
    pub fn value(&self) -> String {
        match self {
            Section::Literal(text) => text.clone(),
            Section::DataParam(p) => format!("@{}", p.path),
            Section::QuotedParam(p) => format!("@@{}", p.path),
            Section::If(cond) => format!("if {cond}"),
            Section::Else(None) => "else".to_string(),
            Section::Else(Some(cond)) => format!("else if {cond}"),
            Section::For(r) => format!("for {}, {} := range {}", r.index, r.value, r.range),
            Section::Where => "where".to_string(),
            Section::Set => "set".to_string(),
            Section::End => "end".to_string(),
        }
    }

    /// Literal and parameter sections that make up a SQL clause
    pub fn is_sql(&self) -> bool {
        matches!(
            self,
            Section::Literal(_) | Section::DataParam(_) | Section::QuotedParam(_)
        )
    }
}
