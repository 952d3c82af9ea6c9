//! Document deltas: the atomic unit applied to a buffer.

use thiserror::Error;

use super::cursor::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaAction {
    Insert,
    Remove,
}

/// A single text change.
///
/// `lines` joined with `\n` is the inserted or removed text. `end` is the
/// position just past that text, so a one-line delta spans
/// `start.column..end.column` on `start.row`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    pub action: DeltaAction,
    pub lines: Vec<String>,
    pub start: Position,
    pub end: Position,
}

/// Reasons a buffer refuses a delta
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeltaError {
    #[error("position {}:{} is outside the document", .0.row, .0.column)]
    OutOfRange(Position),
    #[error("delta end {}:{} precedes its start", .0.row, .0.column)]
    Inverted(Position),
    #[error("text at {}:{} does not match the removed text", .0.row, .0.column)]
    TextMismatch(Position),
    #[error("delta carries no lines")]
    Empty,
}

impl Delta {
    /// Insert `text` at `start`
    pub fn insert(start: Position, text: &str) -> Self {
        let lines = split_lines(text);
        let end = end_of(start, &lines);
        Self {
            action: DeltaAction::Insert,
            lines,
            start,
            end,
        }
    }

    /// Remove `text`, which must be what the document holds at `start`
    pub fn remove(start: Position, text: &str) -> Self {
        let lines = split_lines(text);
        let end = end_of(start, &lines);
        Self {
            action: DeltaAction::Remove,
            lines,
            start,
            end,
        }
    }

    /// The full text carried by this delta
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_single_line(&self) -> bool {
        self.lines.len() == 1
    }

    /// Column width of a single-line delta
    pub fn width(&self) -> usize {
        self.end.column.saturating_sub(self.start.column)
    }

    /// The delta that undoes this one
    pub fn inverse(&self) -> Self {
        let action = match self.action {
            DeltaAction::Insert => DeltaAction::Remove,
            DeltaAction::Remove => DeltaAction::Insert,
        };
        Self {
            action,
            lines: self.lines.clone(),
            start: self.start,
            end: self.end,
        }
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(String::from).collect()
}

fn end_of(start: Position, lines: &[String]) -> Position {
    let last_len = lines.last().map(|l| l.chars().count()).unwrap_or(0);
    if lines.len() <= 1 {
        start.right(last_len)
    } else {
        Position::new(start.row + lines.len() - 1, last_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_insert_end() {
        let delta = Delta::insert(Position::new(2, 4), "abc");
        assert!(delta.is_single_line());
        assert_eq!(delta.end, Position::new(2, 7));
        assert_eq!(delta.width(), 3);
    }

    #[test]
    fn test_multi_line_end() {
        let delta = Delta::insert(Position::new(0, 5), "x\n  yz");
        assert!(!delta.is_single_line());
        assert_eq!(delta.lines, vec!["x".to_string(), "  yz".to_string()]);
        assert_eq!(delta.end, Position::new(1, 4));
        assert_eq!(delta.text(), "x\n  yz");
    }

    #[test]
    fn test_inverse_flips_action_only() {
        let delta = Delta::remove(Position::new(0, 1), "d");
        let inverse = delta.inverse();
        assert_eq!(inverse.action, DeltaAction::Insert);
        assert_eq!(inverse.start, delta.start);
        assert_eq!(inverse.end, delta.end);
        assert_eq!(inverse.lines, delta.lines);
    }

    #[test]
    fn test_error_messages() {
        let err = DeltaError::OutOfRange(Position::new(3, 9));
        assert_eq!(err.to_string(), "position 3:9 is outside the document");
    }
}
