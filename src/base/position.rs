//! Position tracking for source files
//!
//! Stores line/column locations the way the Go toolchain reports them, so a
//! diagnostic position can be mapped straight back onto a parsed node.

use text_size::TextSize;

/// A position in source code (1-based line, 1-based byte column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets to positions and back.
///
/// Built once per parse from the line starts of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(offset as u32 + 1));
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Number of lines, counting a trailing empty line after a final newline.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset to a position.
    pub fn position(&self, offset: TextSize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let column = u32::from(offset) - u32::from(self.line_starts[line]);
        Position::new(line + 1, column as usize + 1)
    }

    /// Convert a position back to a byte offset.
    ///
    /// Returns `None` when the line does not exist or the column runs past
    /// the end of that line.
    pub fn offset(&self, position: Position) -> Option<TextSize> {
        if position.line == 0 || position.column == 0 {
            return None;
        }
        let start = *self.line_starts.get(position.line - 1)?;
        let end = self
            .line_starts
            .get(position.line)
            .copied()
            .unwrap_or(self.len + TextSize::new(1));
        let column = u32::try_from(position.column - 1).ok()?;
        let offset = start.checked_add(TextSize::new(column))?;
        (offset < end).then_some(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_of_first_byte() {
        let index = LineIndex::new("package foo\n");
        assert_eq!(index.position(TextSize::new(0)), Position::new(1, 1));
    }

    #[test]
    fn test_position_after_newline() {
        let index = LineIndex::new("package foo\n\nvar x int\n");
        assert_eq!(index.position(TextSize::new(13)), Position::new(3, 1));
        assert_eq!(index.position(TextSize::new(17)), Position::new(3, 5));
    }

    #[test]
    fn test_offset_round_trip() {
        let text = "a\n\tbc\n";
        let index = LineIndex::new(text);
        let offset = index.offset(Position::new(2, 2)).unwrap();
        assert_eq!(&text[usize::from(offset)..usize::from(offset) + 2], "bc");
        assert_eq!(index.position(offset), Position::new(2, 2));
    }

    #[test]
    fn test_offset_out_of_range() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.offset(Position::new(1, 4)), None);
        assert_eq!(index.offset(Position::new(7, 1)), None);
        assert_eq!(index.offset(Position::new(0, 1)), None);
        assert!(index.offset(Position::new(2, 2)).is_some());
    }

    #[test]
    fn test_offset_column_beyond_text_size() {
        let index = LineIndex::new("var x = Bar\n");
        assert_eq!(index.offset(Position::new(1, usize::MAX)), None);
        assert_eq!(index.offset(Position::new(1, u32::MAX as usize)), None);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_offset_column_does_not_wrap() {
        let index = LineIndex::new("var x = Bar\n");
        assert_eq!(index.offset(Position::new(1, (1 << 32) + 9)), None);
    }
}
