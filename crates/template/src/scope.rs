// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Names visible to a template and options controlling its output.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlgen_ir::{Param, StructRegistry};

/// Method parameters, table name and known structs a template resolves
/// names against
#[derive(Debug, Clone, Default)]
pub struct TemplateScope {
    pub params: Vec<Param>,
    /// Substituted for `@@table`
    pub table: String,
    pub structs: StructRegistry,
}

impl TemplateScope {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Builder method: set method parameters
    pub fn with_params(mut self, params: Vec<Param>) -> Self {
        self.params = params;
        self
    }

    /// Builder method: set known struct shapes
    pub fn with_structs(mut self, structs: StructRegistry) -> Self {
        self.structs = structs;
        self
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// How bound values are written into the SQL text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindStyle {
    /// `@key` placeholders with a `map[string]interface{}`
    #[default]
    Named,
    /// `?` placeholders with a `[]interface{}`
    Positional,
}

impl fmt::Display for BindStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindStyle::Named => f.write_str("named"),
            BindStyle::Positional => f.write_str("positional"),
        }
    }
}

/// Rendering options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub bind_style: BindStyle,
    /// Receiver of the generated method, used for `Quote` calls
    pub receiver: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            bind_style: BindStyle::Named,
            receiver: "u".to_string(),
        }
    }
}

impl CompileOptions {
    pub fn new(bind_style: BindStyle, receiver: impl Into<String>) -> Self {
        Self {
            bind_style,
            receiver: receiver.into(),
        }
    }
}
