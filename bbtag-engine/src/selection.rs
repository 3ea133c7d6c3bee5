use crate::error::{BbError, BbResult};

/// A selection inside a text buffer.
///
/// Offsets are character offsets (NOT byte offsets), with line breaks
/// normalized to a single `\n`. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Create a selection, rejecting `start > end`
    pub fn new(start: usize, end: usize) -> BbResult<Self> {
        if start > end {
            return Err(BbError::InvertedSelection { start, end });
        }
        Ok(Self { start, end })
    }

    /// A collapsed selection (caret) at `offset`
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Fail unless the selection fits inside `text`
    pub fn check(&self, text: &str) -> BbResult<()> {
        let len = char_len(text);
        if self.start > self.end {
            return Err(BbError::InvertedSelection {
                start: self.start,
                end: self.end,
            });
        }
        if self.end > len {
            return Err(BbError::SelectionOutOfBounds {
                start: self.start,
                end: self.end,
                len,
            });
        }
        Ok(())
    }

    /// Byte range of this selection in `text`. Call [`Selection::check`] first.
    pub fn byte_range(&self, text: &str) -> std::ops::Range<usize> {
        byte_offset(text, self.start)..byte_offset(text, self.end)
    }

    /// The selected text. Call [`Selection::check`] first.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.byte_range(text)]
    }
}

/// Number of characters in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the character at `offset`, or `text.len()` past the end
pub fn byte_offset(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}
