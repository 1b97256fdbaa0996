// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Literal SQL accumulator

/// Collects literal SQL text, collapsing whitespace runs into one space
#[derive(Debug, Default)]
pub struct SqlBuffer {
    text: String,
}

impl SqlBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one character of template text
    ///
    /// `\n`, `\t`, `\r` and spaces become a single space, and never two in a
    /// row.
    pub fn write_sql(&mut self, c: char) {
        if matches!(c, '\n' | '\t' | '\r' | ' ') {
            if !self.text.ends_with(' ') {
                self.text.push(' ');
            }
        } else {
            self.text.push(c);
        }
    }

    /// Append a character verbatim (quoted string contents, escapes)
    pub fn write_raw(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn write_str_raw(&mut self, s: &str) {
        self.text.push_str(s);
    }

    /// Take the accumulated text, leaving the buffer empty
    pub fn dump(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Empty or only whitespace
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
