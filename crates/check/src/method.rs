// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Method descriptors
//!
//! A [`MethodDescriptor`] is the validated form of an interface method:
//! the template text of its doc comment, its parameters with the
//! generator placeholders substituted, and the role of every result.
//!
//! ## Placeholders
//!
//! The generator package (`gen` by default) provides three names usable in
//! signatures:
//!
//! - `gen.T`: the model the method is applied to
//! - `gen.M`: `map[string]interface{}`
//! - `gen.RowsAffected`: the affected-row count of an `Exec` call (results only)

use std::collections::HashSet;

use serde::Serialize;
use sqlgen_ir::names::{TABLE_SENTINEL, is_reserved_identifier};
use sqlgen_ir::{GoType, MethodSignature, Param, StructRegistry};
use sqlgen_template::{CompileOptions, CompiledTemplate, TemplateScope, compile};
use tracing::debug;

use crate::doc::{DocKind, SqlDoc, parse_doc};
use crate::error::{CheckError, CheckResult};

const RESULT_NAME: &str = "result";
const ROWS_AFFECTED_NAME: &str = "rowsAffected";
const ERROR_NAME: &str = "err";

/// What a method is being built against
#[derive(Debug, Clone)]
pub struct BuildContext<'a> {
    /// Qualifier of the placeholder package
    pub gen_package: String,
    /// Type substituted for `gen.T`
    pub model: GoType,
    /// Receiver name of the generated method
    pub receiver: String,
    pub structs: &'a StructRegistry,
}

impl<'a> BuildContext<'a> {
    pub fn new(model: GoType, structs: &'a StructRegistry) -> Self {
        Self {
            gen_package: "gen".to_string(),
            model,
            receiver: "u".to_string(),
            structs,
        }
    }

    /// Builder method: set the placeholder package qualifier
    pub fn with_gen_package(mut self, gen_package: impl Into<String>) -> Self {
        self.gen_package = gen_package.into();
        self
    }

    /// Builder method: set the receiver name
    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = receiver.into();
        self
    }

    fn placeholder(&self, ty: &GoType) -> Option<GoType> {
        if ty.is_qualified(&self.gen_package, "T") {
            Some(self.model.clone())
        } else if ty.is_qualified(&self.gen_package, "M") {
            Some(GoType::string_map())
        } else {
            None
        }
    }

    /// Substitute `T` and `M`, rejecting any other placeholder-package type
    fn resolve(&self, ty: &GoType) -> CheckResult<GoType> {
        let resolved = ty.substitute(&|t| self.placeholder(t));
        if resolved.packages().contains(&self.gen_package.as_str()) {
            return Err(CheckError::GenPackageType {
                package: self.gen_package.clone(),
                name: resolved.to_string(),
            });
        }
        Ok(resolved)
    }

    fn is_rows_affected(&self, ty: &GoType) -> bool {
        ty.is_qualified(&self.gen_package, "RowsAffected")
    }

    fn is_struct(&self, ty: &GoType) -> bool {
        let ty = ty.deref();
        *ty == self.model || self.structs.lookup(ty).is_some()
    }
}

/// ORM call executing the generated statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecKind {
    /// `Raw(sql, params).<scan>(&result)`
    Raw,
    /// `Exec(sql, params)`
    Exec,
    /// `Where(sql, params).<scan>(&result)`
    Where,
}

/// How rows are read into the data result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanKind {
    Find,
    Take,
    Scan,
}

impl ScanKind {
    pub fn method(&self) -> &'static str {
        match self {
            ScanKind::Find => "Find",
            ScanKind::Take => "Take",
            ScanKind::Scan => "Scan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "role", content = "scan", rename_all = "snake_case")]
pub enum ResultRole {
    Data(ScanKind),
    RowsAffected,
    Error,
}

/// A named result of the generated method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSlot {
    pub name: String,
    pub ty: GoType,
    pub role: ResultRole,
}

/// A validated interface method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDescriptor {
    pub interface: String,
    pub name: String,
    pub doc: SqlDoc,
    pub exec: ExecKind,
    pub params: Vec<Param>,
    /// Results in declaration order
    pub results: Vec<ResultSlot>,
}

impl MethodDescriptor {
    /// Validate `method` of `interface` and classify its results
    pub fn build(
        interface: &str,
        method: &MethodSignature,
        ctx: &BuildContext<'_>,
    ) -> CheckResult<Self> {
        let doc = parse_doc(&method.name, &method.doc)?;
        let params = check_params(&method.params, ctx)?;
        let results = classify_results(&method.results, &params, ctx)?;

        let has_data = results
            .iter()
            .any(|r| matches!(r.role, ResultRole::Data(_)));
        let exec = match doc.kind {
            DocKind::Where if !has_data => return Err(CheckError::WhereWithoutResult),
            DocKind::Where => ExecKind::Where,
            _ if has_data => ExecKind::Raw,
            _ => ExecKind::Exec,
        };

        debug!(interface, method = %method.name, ?exec, "built method descriptor");
        Ok(Self {
            interface: interface.to_string(),
            name: method.name.clone(),
            doc,
            exec,
            params,
            results,
        })
    }

    pub fn template(&self) -> &str {
        &self.doc.text
    }

    pub fn data(&self) -> Option<&ResultSlot> {
        self.results
            .iter()
            .find(|r| matches!(r.role, ResultRole::Data(_)))
    }

    pub fn rows_affected(&self) -> Option<&ResultSlot> {
        self.results
            .iter()
            .find(|r| r.role == ResultRole::RowsAffected)
    }

    pub fn error(&self) -> Option<&ResultSlot> {
        self.results.iter().find(|r| r.role == ResultRole::Error)
    }

    /// Scan call of the data result
    pub fn scan(&self) -> Option<ScanKind> {
        self.data().and_then(|r| match r.role {
            ResultRole::Data(scan) => Some(scan),
            _ => None,
        })
    }

    /// Packages referenced by parameter and result types
    pub fn packages(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let types = self
            .params
            .iter()
            .map(|p| &p.ty)
            .chain(self.results.iter().map(|r| &r.ty));
        for ty in types {
            for pkg in ty.packages() {
                if !out.iter().any(|p| p == pkg) {
                    out.push(pkg.to_string());
                }
            }
        }
        out
    }

    /// `Name(a int, b string) (result T, err error)`
    pub fn go_signature(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|p| format!("{} {}", p.name, p.signature_type()))
            .collect::<Vec<_>>()
            .join(", ");
        let results = self
            .results
            .iter()
            .map(|r| format!("{} {}", r.name, r.ty))
            .collect::<Vec<_>>()
            .join(", ");
        if results.is_empty() {
            format!("{}({params})", self.name)
        } else {
            format!("{}({params}) ({results})", self.name)
        }
    }

    /// Compile the method's template against its parameters
    pub fn compile(
        &self,
        table: &str,
        structs: &StructRegistry,
        options: &CompileOptions,
    ) -> CheckResult<CompiledTemplate> {
        let scope = TemplateScope::new(table)
            .with_params(self.params.clone())
            .with_structs(structs.clone());
        Ok(compile(&self.doc.text, &scope, options)?)
    }
}

fn check_params(params: &[Param], ctx: &BuildContext<'_>) -> CheckResult<Vec<Param>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(params.len());
    for (index, param) in params.iter().enumerate() {
        if param.name.is_empty() || param.name == "_" {
            return Err(CheckError::UnnamedParam { index });
        }
        if param.name == TABLE_SENTINEL
            || param.name == ctx.receiver
            || is_reserved_identifier(&param.name)
        {
            return Err(CheckError::ReservedParam {
                name: param.name.clone(),
            });
        }
        if !seen.insert(param.name.as_str()) {
            return Err(CheckError::DuplicateParam {
                name: param.name.clone(),
            });
        }
        out.push(Param {
            name: param.name.clone(),
            ty: ctx.resolve(&param.ty)?,
            variadic: param.variadic,
        });
    }
    Ok(out)
}

fn classify_results(
    results: &[Param],
    params: &[Param],
    ctx: &BuildContext<'_>,
) -> CheckResult<Vec<ResultSlot>> {
    let mut data: Option<String> = None;
    let mut has_error = false;
    let mut out = Vec::with_capacity(results.len());

    for result in results {
        let (ty, role) = if result.ty.is_error() {
            if has_error {
                return Err(CheckError::MultipleErrorResults);
            }
            has_error = true;
            (result.ty.clone(), ResultRole::Error)
        } else {
            let (ty, role) = if ctx.is_rows_affected(&result.ty) {
                (result.ty.clone(), ResultRole::RowsAffected)
            } else {
                let ty = ctx.resolve(&result.ty)?;
                if ty.deref().is_interface() {
                    return Err(CheckError::InterfaceResult { ty: ty.to_string() });
                }
                let scan = scan_kind(&ty, ctx);
                (ty, ResultRole::Data(scan))
            };
            if let Some(first) = &data {
                return Err(CheckError::MultipleDataResults {
                    first: first.clone(),
                    second: ty.to_string(),
                });
            }
            data = Some(ty.to_string());
            (ty, role)
        };

        let base = match role {
            ResultRole::Data(_) => RESULT_NAME,
            ResultRole::RowsAffected => ROWS_AFFECTED_NAME,
            ResultRole::Error => ERROR_NAME,
        };
        out.push(ResultSlot {
            name: unique_name(base, params),
            ty,
            role,
        });
    }
    Ok(out)
}

fn scan_kind(ty: &GoType, ctx: &BuildContext<'_>) -> ScanKind {
    if ty.is_array() && !ty.is_byte_slice() {
        ScanKind::Find
    } else if ctx.is_struct(ty) {
        ScanKind::Take
    } else {
        ScanKind::Scan
    }
}

/// `base`, suffixed with `_` until no parameter uses it
fn unique_name(base: &str, params: &[Param]) -> String {
    let mut name = base.to_string();
    while params.iter().any(|p| p.name == name) {
        name.push('_');
    }
    name
}
