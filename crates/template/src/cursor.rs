// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use sqlgen_ir::Section;

/// Pull-based cursor over a section list with one step of pushback
#[derive(Debug, Clone)]
pub struct SectionCursor<'a> {
    sections: &'a [Section],
    pos: usize,
}

impl<'a> SectionCursor<'a> {
    pub fn new(sections: &'a [Section]) -> Self {
        Self { sections, pos: 0 }
    }

    /// Section at the cursor, without consuming it
    pub fn peek(&self) -> Option<&'a Section> {
        self.sections.get(self.pos)
    }

    /// Step back over the last consumed section
    pub fn back(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.sections.len()
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for SectionCursor<'a> {
    type Item = &'a Section;

    fn next(&mut self) -> Option<Self::Item> {
        let section = self.sections.get(self.pos)?;
        self.pos += 1;
        Some(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_next_back() {
        let sections = vec![Section::Where, Section::End];
        let mut cursor = SectionCursor::new(&sections);
        assert_eq!(cursor.peek(), Some(&Section::Where));
        assert_eq!(cursor.next(), Some(&Section::Where));
        assert_eq!(cursor.next(), Some(&Section::End));
        assert!(cursor.is_eof());
        assert_eq!(cursor.next(), None);
        cursor.back();
        assert_eq!(cursor.peek(), Some(&Section::End));
        assert_eq!(cursor.position(), 1);
    }
}
