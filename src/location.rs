//! Line and column tracking for document offsets
//!
//! Regions are addressed by byte offsets into the document text, while humans read
//! `path:line:column`. [`SourceLocation`] bridges the two: it records where every line
//! starts once, then answers offset lookups with a binary search.
//!
//! Both line and column are 1-based. The column is a byte column: the offset minus the
//! offset of the start of its line, plus one.

use std::fmt;

/// A line:column position in a document, both 1-based
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

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl From<(usize, usize)> for Position {
    fn from((line, column): (usize, usize)) -> Self {
        Self::new(line, column)
    }
}

/// Fast conversion from byte offsets to line/column positions
#[derive(Debug, Clone)]
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'\n')
                .map(|(pos, _)| pos + 1),
        );
        Self { line_starts }
    }

    /// Convert a byte offset to a 1-based line/column position.
    ///
    /// A newline belongs to the line it terminates.
    pub fn position(&self, offset: usize) -> Position {
        let index = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index - 1,
        };
        Position::new(index + 1, offset - self.line_starts[index] + 1)
    }

    /// Number of newline characters before `offset`
    pub fn newlines_before(&self, offset: usize) -> usize {
        self.position(offset).line - 1
    }

    /// Total number of lines, counting the (possibly empty) line after the last newline
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset where a 1-based line starts
    pub fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1)
            .and_then(|index| self.line_starts.get(index))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "R1XYZ\nR2XYZ\nR3XYZ\nR4XYZ\nR4XYZ\n";

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(3, 7).to_string(), "3:7");
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(1, 9) < Position::new(2, 1));
        assert!(Position::new(2, 1) < Position::new(2, 2));
    }

    #[test]
    fn test_start_of_text() {
        let location = SourceLocation::new(TEXT);
        assert_eq!(location.position(0), Position::new(1, 1));
    }

    #[test]
    fn test_newline_belongs_to_its_line() {
        let location = SourceLocation::new(TEXT);
        // offset 11 is the newline closing "R2XYZ"
        assert_eq!(location.position(11), Position::new(2, 6));
        assert_eq!(location.position(12), Position::new(3, 1));
    }

    #[test]
    fn test_offset_inside_line() {
        let location = SourceLocation::new(TEXT);
        let r4 = TEXT.find("R4").unwrap();
        assert_eq!(location.position(r4 + 3), Position::new(4, 4));
    }

    #[test]
    fn test_end_of_text() {
        let location = SourceLocation::new(TEXT);
        assert_eq!(location.position(TEXT.len()), Position::new(6, 1));
        assert_eq!(location.line_count(), 6);
    }

    #[test]
    fn test_newlines_before() {
        let location = SourceLocation::new("a\n\nb\n");
        assert_eq!(location.newlines_before(0), 0);
        assert_eq!(location.newlines_before(2), 1);
        assert_eq!(location.newlines_before(3), 2);
    }

    #[test]
    fn test_line_start() {
        let location = SourceLocation::new("ab\ncd\n");
        assert_eq!(location.line_start(1), Some(0));
        assert_eq!(location.line_start(2), Some(3));
        assert_eq!(location.line_start(0), None);
        assert_eq!(location.line_start(9), None);
    }

    #[test]
    fn test_multibyte_columns_are_bytes() {
        let location = SourceLocation::new("é\nx");
        assert_eq!(location.position(2), Position::new(1, 3));
        assert_eq!(location.position(3), Position::new(2, 1));
    }
}
