//! Source text and position mapping.
//!
//! `SourceText` borrows the raw UTF-8 source and owns a line index that is
//! built on the first position lookup. Offsets are absolute byte offsets;
//! positions are 1-based lines and 1-based columns counted in UTF-16 code
//! units, which is the positional convention of the language being parsed.

use std::sync::OnceLock;

/// A 1-based line/column pair. Columns count UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

/// Immutable source buffer with a lazily built line-start index.
///
/// The buffer is read-only and may be shared by reference between any
/// number of readers; the index is built at most once.
#[derive(Debug)]
pub struct SourceText<'s> {
    text: &'s str,
    line_starts: OnceLock<Vec<u32>>,
}

impl<'s> SourceText<'s> {
    pub fn new(text: &'s str) -> Self {
        Self {
            text,
            line_starts: OnceLock::new(),
        }
    }

    #[inline]
    pub fn text(&self) -> &'s str {
        self.text
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.text.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offsets at which each line begins. Line terminators are LF,
    /// CRLF, and bare CR, each counted as a single break.
    fn line_starts(&self) -> &[u32] {
        self.line_starts.get_or_init(|| {
            let bytes = self.text.as_bytes();
            let mut starts = vec![0u32];
            let mut i = 0;
            while i < bytes.len() {
                match bytes[i] {
                    b'\n' => {
                        starts.push((i + 1) as u32);
                        i += 1;
                    }
                    b'\r' => {
                        let next = if i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
                            i + 2
                        } else {
                            i + 1
                        };
                        starts.push(next as u32);
                        i = next;
                    }
                    _ => i += 1,
                }
            }
            starts
        })
    }

    /// Translate a byte offset into a 1-based line and UTF-16 column.
    ///
    /// An offset of `len()` reports the position immediately after the
    /// last byte. The offset must lie on a character boundary.
    pub fn position(&self, offset: u32) -> LineCol {
        let offset = offset.min(self.len());
        let starts = self.line_starts();
        let line_idx = starts.partition_point(|&s| s <= offset) - 1;
        let line_start = starts[line_idx] as usize;

        let column: usize = self.text[line_start..offset as usize]
            .chars()
            .map(char::len_utf16)
            .sum();

        LineCol {
            line: (line_idx + 1) as u32,
            column: (column + 1) as u32,
        }
    }
}
