// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Clause-tree builder
//!
//! Recursive descent over the flat section list. Each block kind is parsed
//! by [`ClauseBuilder::parse_block`] until it meets the section that closes
//! it:
//!
//! | Block          | Closed by        | May contain            |
//! |----------------|------------------|------------------------|
//! | root           | end of input     | sql, if, where, set, for |
//! | `if` / `else`  | `end` or `else`  | same as its parent     |
//! | `where`/`set`  | `end`            | sql, if, for           |
//! | `for`          | `end`            | sql, if, for           |
//!
//! `where`/`set` are rejected at any depth below a `where`, `set` or `for`.

use sqlgen_ir::names::GENERATE_SQL;
use sqlgen_ir::{
    BindKey, Binding, Clause, ElseClause, ForClause, ForRange, IfClause, LoopIndex, Section,
    SetClause, SqlClause, SqlFragment, WhereClause,
};

use crate::context::CompileContext;
use crate::cursor::SectionCursor;
use crate::error::{TemplateError, TemplateResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Root,
    If,
    Else,
    Where,
    Set,
    For,
}

impl BlockKind {
    fn name(self) -> &'static str {
        match self {
            BlockKind::Root => "sql",
            BlockKind::If | BlockKind::Else => "if",
            BlockKind::Where => "where",
            BlockKind::Set => "set",
            BlockKind::For => "for",
        }
    }
}

/// What stopped a block
#[derive(Debug)]
enum Terminator {
    Eof,
    End,
    Else(Option<String>),
}

/// Builds the clause tree of one template
pub struct ClauseBuilder<'a, 'c> {
    cursor: SectionCursor<'a>,
    ctx: &'c mut CompileContext,
    source: &'a str,
}

impl<'a, 'c> ClauseBuilder<'a, 'c> {
    pub fn new(sections: &'a [Section], ctx: &'c mut CompileContext, source: &'a str) -> Self {
        Self {
            cursor: SectionCursor::new(sections),
            ctx,
            source,
        }
    }

    /// Parse every section into top-level clauses writing to `generateSQL`
    pub fn build(mut self) -> TemplateResult<Vec<Clause>> {
        let (body, _) = self.parse_block(BlockKind::Root, GENERATE_SQL, true)?;
        Ok(body)
    }

    fn parse_block(
        &mut self,
        kind: BlockKind,
        builder: &str,
        allow_where_set: bool,
    ) -> TemplateResult<(Vec<Clause>, Terminator)> {
        let mut body = Vec::new();
        while let Some(section) = self.cursor.peek() {
            match section {
                Section::Literal(_) | Section::DataParam(_) | Section::QuotedParam(_) => {
                    body.push(Clause::Sql(self.parse_sql(builder)));
                }
                Section::If(cond) => {
                    self.cursor.next();
                    body.push(self.parse_if(cond, builder, allow_where_set)?);
                }
                Section::For(range) => {
                    self.cursor.next();
                    body.push(self.parse_for(range, builder)?);
                }
                Section::Where | Section::Set => {
                    if !allow_where_set {
                        return Err(TemplateError::InvalidChild {
                            parent: kind.name().to_string(),
                            child: section.kind().keyword().to_string(),
                            sql: self.source.trim().to_string(),
                        });
                    }
                    self.cursor.next();
                    let is_where = matches!(section, Section::Where);
                    body.push(self.parse_where_set(is_where, builder)?);
                }
                Section::Else(cond) => {
                    return match kind {
                        BlockKind::If | BlockKind::Else => {
                            self.cursor.next();
                            Ok((body, Terminator::Else(cond.clone())))
                        }
                        BlockKind::Root => Err(TemplateError::Unmatched {
                            kind: "else".to_string(),
                            sql: self.source.trim().to_string(),
                        }),
                        _ => Err(TemplateError::InvalidChild {
                            parent: kind.name().to_string(),
                            child: "else".to_string(),
                            sql: self.source.trim().to_string(),
                        }),
                    };
                }
                Section::End => {
                    if kind == BlockKind::Root {
                        return Err(TemplateError::Unmatched {
                            kind: "end".to_string(),
                            sql: self.source.trim().to_string(),
                        });
                    }
                    self.cursor.next();
                    return Ok((body, Terminator::End));
                }
            }
        }

        if kind != BlockKind::Root {
            return Err(self.not_end(kind));
        }
        Ok((body, Terminator::Eof))
    }

    fn not_end(&self, kind: BlockKind) -> TemplateError {
        TemplateError::NotEnd {
            kind: kind.name().to_string(),
            sql: self.source.trim().to_string(),
        }
    }

    /// Greedily merge consecutive literal and parameter sections
    fn parse_sql(&mut self, builder: &str) -> SqlClause {
        let mut clause = SqlClause::new(builder);
        while let Some(section) = self.cursor.peek() {
            let fragment = match section {
                Section::Literal(text) => SqlFragment::Text(text.clone()),
                Section::DataParam(param) => SqlFragment::Bind(Binding {
                    expr: param.path.clone(),
                    key: BindKey {
                        name: param.path.clone(),
                        scope: self.ctx.loop_key(),
                    },
                }),
                Section::QuotedParam(param) => SqlFragment::Quote(param.path.clone()),
                _ => break,
            };
            clause.fragments.push(fragment);
            self.cursor.next();
        }
        clause
    }

    fn parse_if(
        &mut self,
        cond: &str,
        builder: &str,
        allow_where_set: bool,
    ) -> TemplateResult<Clause> {
        let (body, terminator) = self.parse_block(BlockKind::If, builder, allow_where_set)?;
        let otherwise = self.parse_else_chain(terminator, builder, allow_where_set)?;
        Ok(Clause::If(IfClause {
            builder: builder.to_string(),
            cond: cond.to_string(),
            body,
            otherwise,
        }))
    }

    fn parse_else_chain(
        &mut self,
        terminator: Terminator,
        builder: &str,
        allow_where_set: bool,
    ) -> TemplateResult<Option<Box<ElseClause>>> {
        match terminator {
            Terminator::End => Ok(None),
            Terminator::Eof => Err(self.not_end(BlockKind::If)),
            Terminator::Else(cond) => {
                let (body, next) = self.parse_block(BlockKind::Else, builder, allow_where_set)?;
                if cond.is_none() && matches!(next, Terminator::Else(_)) {
                    return Err(TemplateError::Unmatched {
                        kind: "else".to_string(),
                        sql: self.source.trim().to_string(),
                    });
                }
                let otherwise = self.parse_else_chain(next, builder, allow_where_set)?;
                Ok(Some(Box::new(ElseClause {
                    cond,
                    body,
                    otherwise,
                })))
            }
        }
    }

    fn parse_where_set(&mut self, is_where: bool, target: &str) -> TemplateResult<Clause> {
        if is_where {
            let builder = self.ctx.next_where();
            let (body, _) = self.parse_block(BlockKind::Where, &builder, false)?;
            Ok(Clause::Where(WhereClause {
                builder,
                target: target.to_string(),
                body,
            }))
        } else {
            let builder = self.ctx.next_set();
            let (body, _) = self.parse_block(BlockKind::Set, &builder, false)?;
            Ok(Clause::Set(SetClause {
                builder,
                target: target.to_string(),
                body,
            }))
        }
    }

    fn parse_for(&mut self, range: &ForRange, builder: &str) -> TemplateResult<Clause> {
        let id = self.ctx.next_for();
        let key_index = if !range.is_positional() {
            LoopIndex::Counter(self.ctx.next_index())
        } else if range.discards_index() {
            LoopIndex::Synthetic(self.ctx.next_index())
        } else {
            LoopIndex::Declared(range.index.clone())
        };

        self.ctx.push_loop(id, key_index.name());
        let parsed = self.parse_block(BlockKind::For, builder, false);
        self.ctx.pop_loop();
        let (body, _) = parsed?;

        Ok(Clause::For(ForClause {
            id,
            builder: builder.to_string(),
            range: range.clone(),
            key_index,
            body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_ir::{GoType, ParamRef, ParamSource};

    fn lit(s: &str) -> Section {
        Section::Literal(s.to_string())
    }

    fn param(name: &str) -> Section {
        Section::DataParam(ParamRef::new(name, ParamSource::Method, GoType::named("int")))
    }

    fn names() -> ForRange {
        ForRange::new("_", "name", "names").with_range_ty(GoType::slice(GoType::named("string")))
    }

    fn build(sections: &[Section]) -> TemplateResult<Vec<Clause>> {
        let mut ctx = CompileContext::new();
        ClauseBuilder::new(sections, &mut ctx, "test").build()
    }

    #[test]
    fn test_consecutive_sql_sections_merge() {
        let clauses = build(&[lit("id="), param("id"), lit(" and x=1")]).unwrap();
        assert_eq!(clauses.len(), 1);
        match &clauses[0] {
            Clause::Sql(sql) => {
                assert_eq!(sql.builder, "generateSQL");
                assert_eq!(sql.fragments.len(), 3);
                assert_eq!(sql.bindings().count(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_if_else_chain() {
        let clauses = build(&[
            Section::If("a".into()),
            lit("a"),
            Section::Else(Some("b".into())),
            lit("b"),
            Section::Else(None),
            lit("c"),
            Section::End,
        ])
        .unwrap();
        let Clause::If(c) = &clauses[0] else {
            panic!("expected if");
        };
        let first = c.otherwise.as_ref().unwrap();
        assert_eq!(first.cond.as_deref(), Some("b"));
        let last = first.otherwise.as_ref().unwrap();
        assert!(last.cond.is_none());
        assert!(last.otherwise.is_none());
    }

    #[test]
    fn test_else_after_terminal_else_rejected() {
        let err = build(&[
            Section::If("a".into()),
            Section::Else(None),
            Section::Else(None),
            Section::End,
        ])
        .unwrap_err();
        assert!(matches!(err, TemplateError::Unmatched { .. }));
    }

    #[test]
    fn test_where_set_numbering() {
        let clauses = build(&[
            Section::Where,
            lit("a"),
            Section::End,
            Section::Set,
            lit("b"),
            Section::End,
            Section::Where,
            Section::End,
        ])
        .unwrap();
        let builders: Vec<&str> = clauses
            .iter()
            .map(|c| match c {
                Clause::Where(w) => w.builder.as_str(),
                Clause::Set(s) => s.builder.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(builders, vec!["whereSQL0", "setSQL0", "whereSQL1"]);
        let Clause::Where(w) = &clauses[0] else {
            panic!("expected where");
        };
        let Clause::Sql(inner) = &w.body[0] else {
            panic!("expected sql");
        };
        assert_eq!(inner.builder, "whereSQL0");
        assert_eq!(w.target, "generateSQL");
    }

    #[test]
    fn test_nested_where_rejected_at_any_depth() {
        let err = build(&[
            Section::Where,
            Section::If("a".into()),
            Section::Set,
            Section::End,
            Section::End,
            Section::End,
        ])
        .unwrap_err();
        assert!(matches!(err, TemplateError::InvalidChild { .. }));

        let err = build(&[Section::For(names()), Section::Where, Section::End, Section::End])
            .unwrap_err();
        assert!(matches!(err, TemplateError::InvalidChild { .. }));
    }

    #[test]
    fn test_if_may_contain_where_at_top_level() {
        let clauses = build(&[
            Section::If("a".into()),
            Section::Where,
            lit("x"),
            Section::End,
            Section::End,
        ])
        .unwrap();
        let Clause::If(c) = &clauses[0] else {
            panic!("expected if");
        };
        assert!(matches!(c.body[0], Clause::Where(_)));
    }

    #[test]
    fn test_else_inside_where_is_invalid() {
        let err = build(&[Section::Where, Section::Else(None), Section::End]).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidChild { .. }));
    }

    #[test]
    fn test_unterminated_blocks() {
        let err = build(&[Section::If("a".into()), lit("x")]).unwrap_err();
        assert!(err.to_string().contains("incomplete SQL, if not end"));
        let err = build(&[Section::Set, lit("x")]).unwrap_err();
        assert!(err.to_string().contains("incomplete SQL, set not end"));
        let err = build(&[Section::If("a".into()), Section::Else(None)]).unwrap_err();
        assert!(err.to_string().contains("if not end"));
    }

    #[test]
    fn test_unmatched_end_and_else() {
        assert!(matches!(
            build(&[lit("x"), Section::End]),
            Err(TemplateError::Unmatched { .. })
        ));
        assert!(matches!(
            build(&[Section::Else(None)]),
            Err(TemplateError::Unmatched { .. })
        ));
    }

    #[test]
    fn test_loop_bindings_get_scoped_keys() {
        let inner = Section::DataParam(ParamRef::new(
            "name",
            ParamSource::Loop,
            GoType::named("string"),
        ));
        let clauses = build(&[Section::For(names()), inner, Section::End, param("id")]).unwrap();
        let Clause::For(f) = &clauses[0] else {
            panic!("expected for");
        };
        assert_eq!(f.key_index, LoopIndex::Synthetic("forIndex0".into()));
        let Clause::Sql(sql) = &f.body[0] else {
            panic!("expected sql");
        };
        let key = &sql.bindings().next().unwrap().key;
        let scope = key.scope.as_ref().unwrap();
        assert_eq!(scope.for_id, 0);
        assert_eq!(scope.indices, vec!["forIndex0".to_string()]);

        let Clause::Sql(after) = &clauses[1] else {
            panic!("expected sql");
        };
        assert!(after.bindings().next().unwrap().key.is_static());
    }

    #[test]
    fn test_loop_index_kinds() {
        let declared = ForRange::new("i", "v", "names")
            .with_range_ty(GoType::slice(GoType::named("int")));
        let map = ForRange::new("k", "v", "m").with_range_ty(GoType::string_map());
        let clauses = build(&[
            Section::For(declared),
            Section::End,
            Section::For(map),
            Section::End,
        ])
        .unwrap();
        let indices: Vec<LoopIndex> = clauses
            .iter()
            .filter_map(|c| match c {
                Clause::For(f) => Some(f.key_index.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            indices,
            vec![
                LoopIndex::Declared("i".into()),
                LoopIndex::Counter("forIndex0".into())
            ]
        );
    }
}
