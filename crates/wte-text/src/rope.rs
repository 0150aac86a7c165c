#![forbid(unsafe_code)]

//! Character-addressed text storage.
//!
//! [`Rope`] wraps `ropey::Rope` and speaks only in char offsets, the unit
//! [`TextBuffer`](crate::TextBuffer) uses for caret and selection positions.
//! Offsets past the end are clamped here; range validation happens in the
//! buffer before any edit reaches the rope.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

/// Inserts or replacements at least this long are logged.
const LARGE_EDIT_BYTES: usize = 10_000;

#[derive(Clone, Debug, Default)]
pub struct Rope {
    inner: ropey::Rope,
}

impl Rope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Length in chars.
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.inner.len_chars()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.len_chars() == 0
    }

    /// Text in `range`, clamped to the content. Borrows when the range lies
    /// inside one chunk.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Cow<'_, str> {
        let (start, end) = self.clamp(range);
        let slice = self.inner.slice(start..end);
        match slice.as_str() {
            Some(text) => Cow::Borrowed(text),
            None => Cow::Owned(slice.to_string()),
        }
    }

    /// Insert `text` at char `offset`; past-the-end offsets append.
    pub fn insert(&mut self, offset: usize, text: &str) {
        if text.len() >= LARGE_EDIT_BYTES {
            tracing::debug!(bytes = text.len(), offset, "large insert");
        }
        let offset = offset.min(self.len_chars());
        self.inner.insert(offset, text);
    }

    /// Remove the chars in `range` (clamped).
    pub fn remove(&mut self, range: Range<usize>) {
        let (start, end) = self.clamp(range);
        if start < end {
            self.inner.remove(start..end);
        }
    }

    /// Swap in entirely new content.
    pub fn replace(&mut self, text: &str) {
        if text.len() >= LARGE_EDIT_BYTES {
            tracing::debug!(bytes = text.len(), "large content replacement");
        }
        self.inner = ropey::Rope::from_str(text);
    }

    /// Zero-based (line, column) of char `offset`, both in chars.
    #[must_use]
    pub fn char_to_line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len_chars());
        let line = self.inner.char_to_line(offset);
        (line, offset - self.inner.line_to_char(line))
    }

    fn clamp(&self, range: Range<usize>) -> (usize, usize) {
        let len = self.len_chars();
        let start = range.start.min(len);
        (start, range.end.clamp(start, len))
    }
}

impl fmt::Display for Rope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.chunks().try_for_each(|chunk| f.write_str(chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rope(text: &str) -> Rope {
        let mut rope = Rope::new();
        rope.replace(text);
        rope
    }

    #[test]
    fn edits_by_char_offset() {
        let mut r = rope("caf\u{e9}!");
        assert_eq!(r.len_chars(), 5);
        r.insert(4, " au lait");
        assert_eq!(r.to_string(), "caf\u{e9} au lait!");
        r.remove(4..12);
        assert_eq!(r.to_string(), "caf\u{e9}!");
        r.replace("");
        assert!(r.is_empty());
    }

    #[test]
    fn line_col_counts_chars() {
        let r = rope("ab\nc\u{1F600}de\n");
        assert_eq!(r.char_to_line_col(0), (0, 0));
        assert_eq!(r.char_to_line_col(5), (1, 2));
        assert_eq!(r.char_to_line_col(8), (2, 0));
        assert_eq!(r.char_to_line_col(99), (2, 0));
    }

    #[test]
    fn out_of_range_offsets_are_clamped() {
        let mut r = rope("abc");
        assert_eq!(r.slice(1..3), "bc");
        assert_eq!(r.slice(2..10), "c");
        assert_eq!(r.slice(5..9), "");
        assert_eq!(r.slice(2..1), "");
        r.remove(2..1);
        r.insert(42, "d");
        assert_eq!(r.to_string(), "abcd");
    }

    proptest! {
        #[test]
        fn insert_then_remove_restores(s in any::<String>(), ins in any::<String>(), at in 0usize..200) {
            let mut r = rope(&s);
            let at = at.min(r.len_chars());
            r.insert(at, &ins);
            r.remove(at..at + ins.chars().count());
            prop_assert_eq!(r.to_string(), s);
        }

        #[test]
        fn slice_agrees_with_chars(s in any::<String>(), a in 0usize..64, b in 0usize..64) {
            let r = rope(&s);
            let (lo, hi) = (a.min(b), a.max(b));
            let expected: String = s.chars().skip(lo).take(hi - lo).collect();
            prop_assert_eq!(r.slice(lo..hi).into_owned(), expected);
        }
    }
}
