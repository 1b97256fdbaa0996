// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Template lexer
//!
//! A single left-to-right scan over the template characters. Literal text
//! goes through a [`SqlBuffer`]; quoted strings are copied untouched;
//! `{{ ... }}` directives and `@name` references flush the buffer and become
//! sections of their own.
//!
//! Names are resolved while scanning. The lexer keeps a stack of open
//! blocks so that loop variables are visible exactly inside their `for`
//! body and shadow method parameters of the same name.

use std::collections::HashSet;

use sqlgen_ir::names::TABLE_SENTINEL;
use sqlgen_ir::{ForRange, GoType, ParamRef, ParamSource, Section};
use tracing::trace;

use crate::buffer::SqlBuffer;
use crate::directive::{Directive, classify};
use crate::error::{TemplateError, TemplateResult};
use crate::scope::TemplateScope;

/// Variables bound by an open `for` block
#[derive(Debug, Clone)]
struct LoopBinding {
    index: String,
    index_ty: GoType,
    value: String,
    value_ty: GoType,
}

/// Splits a template into [`Section`]s
pub struct Lexer<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
    buf: SqlBuffer,
    scope: &'a TemplateScope,
    /// Receiver of the generated method; loop variables may not shadow it
    receiver: Option<&'a str>,
    sections: Vec<Section>,
    /// One entry per open block; `Some` for `for` blocks
    blocks: Vec<Option<LoopBinding>>,
    /// Value names of every `for` seen so far
    loop_values: HashSet<String>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, scope: &'a TemplateScope) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
            buf: SqlBuffer::new(),
            scope,
            receiver: None,
            sections: Vec::new(),
            blocks: Vec::new(),
            loop_values: HashSet::new(),
        }
    }

    /// Builder method: reject loop variables named like the receiver
    pub fn with_receiver(mut self, receiver: &'a str) -> Self {
        self.receiver = Some(receiver);
        self
    }

    /// Scan the whole template
    pub fn tokenize(mut self) -> TemplateResult<Vec<Section>> {
        while let Some(&c) = self.chars.get(self.pos) {
            match c {
                '"' | '\'' | '`' => self.scan_quoted(c)?,
                '\\' if self.peek_at(1) == Some('@') => {
                    self.buf.write_raw('@');
                    self.pos += 2;
                }
                '{' if self.peek_at(1) == Some('{') => self.scan_directive()?,
                '@' => self.scan_param()?,
                _ => {
                    self.buf.write_sql(c);
                    self.pos += 1;
                }
            }
        }
        if !self.buf.is_blank() {
            let text = self.buf.dump();
            self.sections.push(Section::Literal(text));
        }
        trace!(count = self.sections.len(), "template split into sections");
        Ok(self.sections)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn incomplete(&self, from: usize) -> TemplateError {
        TemplateError::Incomplete {
            sql: self.chars[from.min(self.chars.len())..].iter().collect(),
        }
    }

    /// Copy a quoted string, quotes included, honouring backslash escapes
    fn scan_quoted(&mut self, quote: char) -> TemplateResult<()> {
        let start = self.pos;
        self.buf.write_raw(quote);
        self.pos += 1;
        while let Some(&c) = self.chars.get(self.pos) {
            self.buf.write_raw(c);
            self.pos += 1;
            if c == '\\' {
                if let Some(&escaped) = self.chars.get(self.pos) {
                    self.buf.write_raw(escaped);
                    self.pos += 1;
                }
            } else if c == quote {
                return Ok(());
            }
        }
        Err(self.incomplete(start))
    }

    /// Flush pending literal text as a section
    fn flush(&mut self, keep_blank: bool) {
        if self.buf.is_empty() || (!keep_blank && self.buf.is_blank()) {
            self.buf.dump();
            return;
        }
        let text = self.buf.dump();
        self.sections.push(Section::Literal(text));
    }

    fn scan_directive(&mut self) -> TemplateResult<()> {
        let start = self.pos;
        let body_start = self.pos + 2;
        let end = self
            .find_directive_end(body_start)
            .ok_or_else(|| self.incomplete(start))?;
        let body: String = self.chars[body_start..end].iter().collect();
        self.pos = end + 2;

        self.flush(false);
        let section = match classify(&body)? {
            Directive::If(cond) => {
                self.blocks.push(None);
                Section::If(cond)
            }
            Directive::Else(cond) => Section::Else(cond),
            Directive::Where => {
                self.blocks.push(None);
                Section::Where
            }
            Directive::Set => {
                self.blocks.push(None);
                Section::Set
            }
            Directive::End => {
                self.blocks.pop();
                Section::End
            }
            Directive::For {
                index,
                value,
                range,
            } => {
                let range = self.open_loop(index, value, range, &body)?;
                Section::For(range)
            }
        };
        self.sections.push(section);
        Ok(())
    }

    /// Position of the `}}` closing a directive body starting at `from`
    fn find_directive_end(&self, from: usize) -> Option<usize> {
        let mut i = from;
        let mut depth = 0usize;
        while i < self.chars.len() {
            match self.chars[i] {
                q @ ('"' | '\'' | '`') => {
                    i += 1;
                    while i < self.chars.len() && self.chars[i] != q {
                        if self.chars[i] == '\\' {
                            i += 1;
                        }
                        i += 1;
                    }
                    if i >= self.chars.len() {
                        return None;
                    }
                }
                '{' => depth += 1,
                '}' if depth > 0 => depth -= 1,
                '}' if self.chars.get(i + 1) == Some(&'}') => return Some(i),
                _ => {}
            }
            i += 1;
        }
        None
    }

    fn open_loop(
        &mut self,
        index: String,
        value: String,
        range: String,
        body: &str,
    ) -> TemplateResult<ForRange> {
        if let Some(receiver) = self.receiver.filter(|r| index == *r || value == *r) {
            return Err(TemplateError::ReservedIdentifier {
                ident: receiver.to_string(),
                sql: body.trim().to_string(),
            });
        }
        if value != "_" && !self.loop_values.insert(value.clone()) {
            return Err(TemplateError::DuplicateLoopValue { name: value });
        }

        let path: String = range
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '.')
            .collect();
        if path.is_empty() {
            return Err(TemplateError::UnknownVariable {
                name: range,
                sql: body.trim().to_string(),
            });
        }
        let resolved = self.resolve(path.trim_end_matches('.'))?;
        let range_ty = if path == range {
            resolved.ty
        } else {
            GoType::Unknown
        };
        let (index_ty, value_ty) = range_ty
            .range_types()
            .unwrap_or((GoType::Unknown, GoType::Unknown));

        self.blocks.push(Some(LoopBinding {
            index: index.clone(),
            index_ty,
            value: value.clone(),
            value_ty,
        }));
        Ok(ForRange::new(index, value, range).with_range_ty(range_ty))
    }

    fn scan_param(&mut self) -> TemplateResult<()> {
        let start = self.pos;
        let quoted = self.peek_at(1) == Some('@');
        let mut i = self.pos + if quoted { 2 } else { 1 };
        let name_start = i;
        while let Some(&c) = self.chars.get(i) {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                i += 1;
            } else {
                break;
            }
        }
        while i > name_start && self.chars[i - 1] == '.' {
            i -= 1;
        }
        if i == name_start {
            return Err(self.incomplete(start));
        }
        let name: String = self.chars[name_start..i].iter().collect();
        self.pos = i;

        if quoted && name == TABLE_SENTINEL {
            let table = self.scope.table.clone();
            self.buf.write_str_raw(&table);
            return Ok(());
        }

        self.flush(true);
        let param = self.resolve(&name)?;
        if quoted {
            if !param.ty.is_string() {
                return Err(TemplateError::QuotedNotString {
                    name,
                    ty: param.ty.to_string(),
                });
            }
            self.sections.push(Section::QuotedParam(param));
        } else {
            self.sections.push(Section::DataParam(param));
        }
        Ok(())
    }

    /// Resolve a dotted path against loop bindings, then method parameters
    fn resolve(&self, path: &str) -> TemplateResult<ParamRef> {
        let mut segments = path.split('.');
        let root = segments.next().unwrap_or_default();
        let unknown = || TemplateError::UnknownVariable {
            name: path.to_string(),
            sql: self.source.trim().to_string(),
        };
        if root.is_empty() || root == "_" {
            return Err(unknown());
        }

        let (source, mut ty) = self
            .lookup_loop(root)
            .map(|ty| (ParamSource::Loop, ty))
            .or_else(|| {
                self.scope
                    .param(root)
                    .map(|p| (ParamSource::Method, p.ty.clone()))
            })
            .ok_or_else(unknown)?;

        for field in segments {
            if field.is_empty() {
                return Err(unknown());
            }
            ty = self.field_type(&ty, field)?;
        }
        Ok(ParamRef::new(path, source, ty))
    }

    fn lookup_loop(&self, name: &str) -> Option<GoType> {
        self.blocks.iter().rev().flatten().find_map(|b| {
            if b.value == name {
                Some(b.value_ty.clone())
            } else if b.index == name {
                Some(b.index_ty.clone())
            } else {
                None
            }
        })
    }

    fn field_type(&self, owner: &GoType, field: &str) -> TemplateResult<GoType> {
        let unknown_field = |owner: String| TemplateError::UnknownField {
            owner,
            field: field.to_string(),
            sql: self.source.trim().to_string(),
        };
        if let Some(shape) = self.scope.structs.lookup(owner) {
            return shape
                .field(field)
                .map(|f| f.ty.clone())
                .ok_or_else(|| unknown_field(shape.name.clone()));
        }
        let base = owner.deref();
        if base.is_scalar() || base.is_array() || base.is_map() || base.is_interface() {
            return Err(unknown_field(owner.to_string()));
        }
        Ok(GoType::Unknown)
    }
}
