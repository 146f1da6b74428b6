//! Backtrackable cursors.
//!
//! [`Cursor`] walks any slice of items and keeps a stack of saved indices so
//! callers can attempt consumption speculatively. [`CharCursor`] specializes it
//! for characters and tracks line/column alongside the index.

use crate::token::Position;

/// A cursor over a finite sequence with nested snapshots.
///
/// `commit_snapshot` and `rollback_snapshot` each pop exactly one snapshot.
/// A rollback restores the index captured by the matching `take_snapshot`
/// and never affects snapshots taken before it.
#[derive(Debug, Clone)]
pub struct Cursor<'a, T> {
    items: &'a [T],
    index: usize,
    snapshots: Vec<usize>,
}

impl<'a, T> Cursor<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self {
            items,
            index: 0,
            snapshots: Vec::new(),
        }
    }

    /// The item under the cursor, or `None` at the end.
    pub fn current(&self) -> Option<&'a T> {
        self.items.get(self.index)
    }

    /// The item `n` places ahead of the current one (`peek(0)` is `current()`).
    pub fn peek(&self, n: usize) -> Option<&'a T> {
        self.items.get(self.index + n)
    }

    /// Advance by one item. A no-op at the end.
    pub fn consume(&mut self) {
        if self.index < self.items.len() {
            self.index += 1;
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.items.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn items(&self) -> &'a [T] {
        self.items
    }

    /// Items from the cursor to the end.
    pub fn remaining(&self) -> &'a [T] {
        &self.items[self.index.min(self.items.len())..]
    }

    /// Items consumed since `start`.
    pub fn since(&self, start: usize) -> &'a [T] {
        &self.items[start.min(self.index)..self.index]
    }

    pub fn take_snapshot(&mut self) {
        self.snapshots.push(self.index);
    }

    pub fn commit_snapshot(&mut self) {
        debug_assert!(!self.snapshots.is_empty(), "commit without snapshot");
        self.snapshots.pop();
    }

    pub fn rollback_snapshot(&mut self) {
        debug_assert!(!self.snapshots.is_empty(), "rollback without snapshot");
        if let Some(index) = self.snapshots.pop() {
            self.index = index;
        }
    }

    pub fn snapshot_depth(&self) -> usize {
        self.snapshots.len()
    }

    /// Run `f` speculatively: keep its progress on `Some`, rewind on `None`.
    pub fn attempt<R>(&mut self, f: impl FnOnce(&mut Self) -> Option<R>) -> Option<R> {
        self.take_snapshot();
        let result = f(self);
        if result.is_some() {
            self.commit_snapshot();
        } else {
            self.rollback_snapshot();
        }
        result
    }
}

/// A character cursor that also tracks line and column.
///
/// Consuming a line feed increments the line and resets the column so the
/// character after it is column 1. The (line, column) snapshot stack is pushed
/// and popped together with the index stack.
#[derive(Debug, Clone)]
pub struct CharCursor<'a> {
    inner: Cursor<'a, char>,
    line: usize,
    column: usize,
    snapshots: Vec<(usize, usize)>,
}

impl<'a> CharCursor<'a> {
    pub fn new(chars: &'a [char]) -> Self {
        Self {
            inner: Cursor::new(chars),
            line: 1,
            column: 1,
            snapshots: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<char> {
        self.inner.current().copied()
    }

    pub fn peek(&self, n: usize) -> Option<char> {
        self.inner.peek(n).copied()
    }

    pub fn consume(&mut self) {
        let Some(ch) = self.current() else {
            return;
        };
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.inner.consume();
    }

    pub fn is_at_end(&self) -> bool {
        self.inner.is_at_end()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn position(&self) -> Position {
        Position::new(self.inner.index(), self.line, self.column)
    }

    /// Characters consumed since the character offset `start`.
    pub fn since(&self, start: usize) -> String {
        self.inner.since(start).iter().collect()
    }

    pub fn take_snapshot(&mut self) {
        self.inner.take_snapshot();
        self.snapshots.push((self.line, self.column));
    }

    pub fn commit_snapshot(&mut self) {
        self.inner.commit_snapshot();
        self.snapshots.pop();
    }

    pub fn rollback_snapshot(&mut self) {
        self.inner.rollback_snapshot();
        if let Some((line, column)) = self.snapshots.pop() {
            self.line = line;
            self.column = column;
        }
    }

    pub fn snapshot_depth(&self) -> usize {
        self.inner.snapshot_depth()
    }

    /// Run `f` speculatively: keep its progress on `Some`, rewind on `None`.
    pub fn attempt<R>(&mut self, f: impl FnOnce(&mut Self) -> Option<R>) -> Option<R> {
        self.take_snapshot();
        let result = f(self);
        if result.is_some() {
            self.commit_snapshot();
        } else {
            self.rollback_snapshot();
        }
        result
    }

    /// Whether `f` would succeed here. Never moves the cursor.
    pub fn lookahead<R>(&mut self, f: impl FnOnce(&mut Self) -> Option<R>) -> bool {
        self.take_snapshot();
        let found = f(self).is_some();
        self.rollback_snapshot();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    // =========================================================================
    // Generic cursor
    // =========================================================================

    #[test]
    fn test_current_and_peek() {
        let items = [1, 2, 3];
        let cursor = Cursor::new(&items);
        assert_eq!(cursor.current(), Some(&1));
        assert_eq!(cursor.peek(0), Some(&1));
        assert_eq!(cursor.peek(2), Some(&3));
        assert_eq!(cursor.peek(3), None);
    }

    #[test]
    fn test_consume_past_end_is_noop() {
        let items = [1];
        let mut cursor = Cursor::new(&items);
        cursor.consume();
        assert!(cursor.is_at_end());
        cursor.consume();
        assert!(cursor.is_at_end());
        assert_eq!(cursor.index(), 1);
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn test_empty_cursor_is_at_end() {
        let items: [u8; 0] = [];
        let cursor = Cursor::new(&items);
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn test_rollback_restores_index() {
        let items = [1, 2, 3, 4];
        let mut cursor = Cursor::new(&items);
        cursor.consume();
        cursor.take_snapshot();
        cursor.consume();
        cursor.consume();
        cursor.rollback_snapshot();
        assert_eq!(cursor.current(), Some(&2));
        assert_eq!(cursor.snapshot_depth(), 0);
    }

    #[test]
    fn test_commit_keeps_progress() {
        let items = [1, 2, 3];
        let mut cursor = Cursor::new(&items);
        cursor.take_snapshot();
        cursor.consume();
        cursor.commit_snapshot();
        assert_eq!(cursor.current(), Some(&2));
        assert_eq!(cursor.snapshot_depth(), 0);
    }

    #[test]
    fn test_nested_snapshots() {
        let items = [1, 2, 3, 4];
        let mut cursor = Cursor::new(&items);
        cursor.take_snapshot();
        cursor.consume();
        cursor.take_snapshot();
        cursor.consume();
        cursor.rollback_snapshot();
        assert_eq!(cursor.current(), Some(&2));
        cursor.consume();
        cursor.consume();
        cursor.rollback_snapshot();
        assert_eq!(cursor.current(), Some(&1));
    }

    #[test]
    fn test_attempt() {
        let items = [1, 2, 3];
        let mut cursor = Cursor::new(&items);

        let miss: Option<()> = cursor.attempt(|c| {
            c.consume();
            c.consume();
            None
        });
        assert_eq!(miss, None);
        assert_eq!(cursor.index(), 0);

        let hit = cursor.attempt(|c| {
            let first = *c.current()?;
            c.consume();
            Some(first)
        });
        assert_eq!(hit, Some(1));
        assert_eq!(cursor.index(), 1);
        assert_eq!(cursor.snapshot_depth(), 0);
    }

    #[test]
    fn test_remaining_and_since() {
        let items = [1, 2, 3];
        let mut cursor = Cursor::new(&items);
        cursor.consume();
        assert_eq!(cursor.remaining(), &[2, 3]);
        cursor.consume();
        assert_eq!(cursor.since(0), &[1, 2]);
    }

    // =========================================================================
    // Character cursor
    // =========================================================================

    #[test]
    fn test_char_cursor_starts_at_line_one_column_one() {
        let source = chars("ab");
        let cursor = CharCursor::new(&source);
        assert_eq!(cursor.position(), Position::new(0, 1, 1));
    }

    #[test]
    fn test_char_cursor_tracks_columns() {
        let source = chars("ab");
        let mut cursor = CharCursor::new(&source);
        cursor.consume();
        assert_eq!(cursor.current(), Some('b'));
        assert_eq!(cursor.position(), Position::new(1, 1, 2));
    }

    #[test]
    fn test_char_cursor_line_feed() {
        let source = chars("a\nb");
        let mut cursor = CharCursor::new(&source);
        cursor.consume();
        cursor.consume();
        assert_eq!(cursor.current(), Some('b'));
        assert_eq!(cursor.line(), 2);
        assert_eq!(cursor.column(), 1);
    }

    #[test]
    fn test_char_cursor_consume_past_end() {
        let source = chars("a");
        let mut cursor = CharCursor::new(&source);
        cursor.consume();
        cursor.consume();
        assert!(cursor.is_at_end());
        assert_eq!(cursor.position(), Position::new(1, 1, 2));
    }

    #[test]
    fn test_char_cursor_rollback_restores_position() {
        let source = chars("ab\ncd");
        let mut cursor = CharCursor::new(&source);
        cursor.consume();
        let before = cursor.position();
        cursor.take_snapshot();
        for _ in 0..3 {
            cursor.consume();
        }
        assert_eq!(cursor.line(), 2);
        cursor.rollback_snapshot();
        assert_eq!(cursor.position(), before);
        assert_eq!(cursor.current(), Some('b'));
    }

    #[test]
    fn test_char_cursor_commit_keeps_position() {
        let source = chars("ab\ncd");
        let mut cursor = CharCursor::new(&source);
        cursor.take_snapshot();
        for _ in 0..4 {
            cursor.consume();
        }
        let advanced = cursor.position();
        cursor.commit_snapshot();
        assert_eq!(cursor.position(), advanced);
        assert_eq!(cursor.current(), Some('d'));
    }

    #[test]
    fn test_char_cursor_lookahead_never_moves() {
        let source = chars("abc");
        let mut cursor = CharCursor::new(&source);
        let found = cursor.lookahead(|c| {
            c.consume();
            c.consume();
            Some(())
        });
        assert!(found);
        assert_eq!(cursor.position(), Position::new(0, 1, 1));
        assert_eq!(cursor.snapshot_depth(), 0);
    }

    #[test]
    fn test_char_cursor_since() {
        let source = chars("hello");
        let mut cursor = CharCursor::new(&source);
        cursor.consume();
        cursor.consume();
        assert_eq!(cursor.since(0), "he");
    }

    // =========================================================================
    // Snapshot properties
    // =========================================================================

    proptest! {
        #[test]
        fn test_rollback_restores_any_state(
            source in "[a-z \\n]{0,40}",
            before in 0usize..50,
            during in 0usize..50,
        ) {
            let chars: Vec<char> = source.chars().collect();
            let mut cursor = CharCursor::new(&chars);
            for _ in 0..before {
                cursor.consume();
            }
            let saved = (cursor.position(), cursor.current());

            cursor.take_snapshot();
            for _ in 0..during {
                cursor.consume();
            }
            cursor.rollback_snapshot();

            prop_assert_eq!((cursor.position(), cursor.current()), saved);
            prop_assert_eq!(cursor.snapshot_depth(), 0);
        }

        #[test]
        fn test_commit_keeps_any_progress(
            source in "[a-z \\n]{0,40}",
            before in 0usize..50,
            during in 0usize..50,
        ) {
            let chars: Vec<char> = source.chars().collect();
            let mut cursor = CharCursor::new(&chars);
            for _ in 0..before {
                cursor.consume();
            }

            cursor.take_snapshot();
            for _ in 0..during {
                cursor.consume();
            }
            let advanced = (cursor.position(), cursor.current());
            cursor.commit_snapshot();

            prop_assert_eq!((cursor.position(), cursor.current()), advanced);
            prop_assert_eq!(cursor.position().index, (before + during).min(chars.len()));
        }

        #[test]
        fn test_nested_rollbacks_unwind_in_order(
            items in prop::collection::vec(any::<u8>(), 0..30),
            outer in 0usize..40,
            inner in 0usize..40,
        ) {
            let mut cursor = Cursor::new(&items);
            cursor.take_snapshot();
            for _ in 0..outer {
                cursor.consume();
            }
            let middle = cursor.index();
            cursor.take_snapshot();
            for _ in 0..inner {
                cursor.consume();
            }

            cursor.rollback_snapshot();
            prop_assert_eq!(cursor.index(), middle);
            cursor.rollback_snapshot();
            prop_assert_eq!(cursor.index(), 0);
        }
    }
}
