use ropey::Rope;

use super::cursor::Position;
use super::delta::{Delta, DeltaAction, DeltaError};

/// A text buffer backed by a rope data structure.
/// Positions are (row, column) pairs where the column counts chars.
#[derive(Clone)]
pub struct Buffer {
    /// The text content
    text: Rope,
    /// Monotonic version for change tracking
    version: u64,
}

impl Buffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self {
            text: Rope::new(),
            version: 0,
        }
    }

    /// Create a buffer holding the given text
    pub fn from_text(text: &str) -> Self {
        Self {
            text: Rope::from_str(text),
            version: 0,
        }
    }

    /// Get total number of lines
    pub fn len_lines(&self) -> usize {
        self.text.len_lines()
    }

    /// Get a specific line (0-indexed)
    pub fn line(&self, idx: usize) -> Option<ropey::RopeSlice<'_>> {
        if idx < self.text.len_lines() {
            Some(self.text.line(idx))
        } else {
            None
        }
    }

    /// Get the length of a specific line (excluding newline)
    pub fn line_len(&self, idx: usize) -> usize {
        self.line(idx)
            .map(|l| {
                let len = l.len_chars();
                // Subtract newline if present
                if len > 0 && l.char(len - 1) == '\n' {
                    len - 1
                } else {
                    len
                }
            })
            .unwrap_or(0)
    }

    /// Get the current version of the buffer
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the full content of the buffer as a string
    pub fn content(&self) -> String {
        self.text.to_string()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.text.len_chars() == 0
    }

    /// Whether a position addresses an existing line and column
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.len_lines() && pos.column <= self.line_len(pos.row)
    }

    /// Get the char index for a given position
    fn char_index(&self, pos: Position) -> Result<usize, DeltaError> {
        if !self.contains(pos) {
            return Err(DeltaError::OutOfRange(pos));
        }
        Ok(self.text.line_to_char(pos.row) + pos.column)
    }

    /// Get leading whitespace from a line
    pub fn get_line_indent(&self, line_idx: usize) -> String {
        let Some(line) = self.line(line_idx) else {
            return String::new();
        };
        line.chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect()
    }

    /// Check if a line is empty or whitespace only
    pub fn is_blank_line(&self, line_idx: usize) -> bool {
        self.line(line_idx)
            .map(|l| l.chars().all(char::is_whitespace))
            .unwrap_or(true)
    }

    /// Apply a delta. The buffer is left untouched when the delta does not fit.
    pub fn apply_delta(&mut self, delta: &Delta) -> Result<(), DeltaError> {
        if delta.lines.is_empty() {
            return Err(DeltaError::Empty);
        }
        let start = self.char_index(delta.start)?;
        let text = delta.text();

        match delta.action {
            DeltaAction::Insert => {
                self.text.insert(start, &text);
            }
            DeltaAction::Remove => {
                if delta.end < delta.start {
                    return Err(DeltaError::Inverted(delta.end));
                }
                let end = self.char_index(delta.end)?;
                if self.text.slice(start..end) != text.as_str() {
                    return Err(DeltaError::TextMismatch(delta.start));
                }
                self.text.remove(start..end);
            }
        }

        self.version = self.version.wrapping_add(1);
        Ok(())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove_round() {
        let mut buffer = Buffer::from_text("<div>hello</div>");
        buffer.apply_delta(&Delta::insert(Position::new(0, 4), "1")).unwrap();
        assert_eq!(buffer.content(), "<div1>hello</div>");

        buffer.apply_delta(&Delta::remove(Position::new(0, 1), "d")).unwrap();
        assert_eq!(buffer.content(), "<iv1>hello</div>");
        assert_eq!(buffer.version(), 2);
    }

    #[test]
    fn test_multi_line_insert() {
        let mut buffer = Buffer::from_text("ab");
        buffer.apply_delta(&Delta::insert(Position::new(0, 1), "\n  ")).unwrap();
        assert_eq!(buffer.len_lines(), 2);
        assert_eq!(buffer.content(), "a\n  b");
        assert_eq!(buffer.line_len(0), 1);
        assert_eq!(buffer.get_line_indent(1), "  ");
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut buffer = Buffer::from_text("abc");
        let err = buffer
            .apply_delta(&Delta::insert(Position::new(0, 4), "x"))
            .unwrap_err();
        assert_eq!(err, DeltaError::OutOfRange(Position::new(0, 4)));

        let err = buffer
            .apply_delta(&Delta::insert(Position::new(1, 0), "x"))
            .unwrap_err();
        assert_eq!(err, DeltaError::OutOfRange(Position::new(1, 0)));
        assert_eq!(buffer.content(), "abc");
        assert_eq!(buffer.version(), 0);
    }

    #[test]
    fn test_remove_requires_matching_text() {
        let mut buffer = Buffer::from_text("abc");
        let err = buffer
            .apply_delta(&Delta::remove(Position::new(0, 0), "x"))
            .unwrap_err();
        assert_eq!(err, DeltaError::TextMismatch(Position::new(0, 0)));
        assert_eq!(buffer.content(), "abc");
    }

    #[test]
    fn test_blank_lines() {
        let buffer = Buffer::from_text("a\n   \n\nb");
        assert!(!buffer.is_blank_line(0));
        assert!(buffer.is_blank_line(1));
        assert!(buffer.is_blank_line(2));
        assert!(!buffer.is_blank_line(3));
    }

    #[test]
    fn test_line_len_excludes_newline() {
        let buffer = Buffer::from_text("hello\nworld");
        assert_eq!(buffer.line_len(0), 5);
        assert_eq!(buffer.line_len(1), 5);
        assert_eq!(buffer.line_len(2), 0);
    }
}
