// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Per-method compilation state

use sqlgen_ir::LoopKey;
use sqlgen_ir::names::{FOR_INDEX_PREFIX, SET_SQL_PREFIX, WHERE_SQL_PREFIX};

/// Counters and the active-loop stack for a single template
///
/// The context maintains:
/// - Monotonic counters for `whereSQL{N}`, `setSQL{N}`, loop ids and
///   synthetic loop indices
/// - The stack of enclosing loops, used to key bindings per iteration
///
/// A fresh context is created for every method, so names never leak
/// between methods.
#[derive(Debug, Default)]
pub struct CompileContext {
    where_count: usize,
    set_count: usize,
    for_count: usize,
    index_count: usize,
    /// `(for_id, key index variable)` of each enclosing loop
    loops: Vec<(usize, String)>,
}

impl CompileContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next `whereSQL{N}` builder name
    pub fn next_where(&mut self) -> String {
        let name = format!("{WHERE_SQL_PREFIX}{}", self.where_count);
        self.where_count += 1;
        name
    }

    /// Next `setSQL{N}` builder name
    pub fn next_set(&mut self) -> String {
        let name = format!("{SET_SQL_PREFIX}{}", self.set_count);
        self.set_count += 1;
        name
    }

    pub fn next_for(&mut self) -> usize {
        let id = self.for_count;
        self.for_count += 1;
        id
    }

    /// Next `forIndex{N}` variable name
    pub fn next_index(&mut self) -> String {
        let name = format!("{FOR_INDEX_PREFIX}{}", self.index_count);
        self.index_count += 1;
        name
    }

    pub fn push_loop(&mut self, for_id: usize, key_index: impl Into<String>) {
        self.loops.push((for_id, key_index.into()));
    }

    pub fn pop_loop(&mut self) {
        self.loops.pop();
    }

    pub fn loop_depth(&self) -> usize {
        self.loops.len()
    }

    /// Key suffix for a binding at the current position, if inside a loop
    pub fn loop_key(&self) -> Option<LoopKey> {
        let (for_id, _) = self.loops.last()?;
        Some(LoopKey {
            for_id: *for_id,
            indices: self.loops.iter().map(|(_, idx)| idx.clone()).collect(),
        })
    }
}
