use super::cursor::Position;

/// A span between two positions; `start <= end` is maintained by the constructor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Zero-width range at a position
    pub fn caret(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_multi_line(&self) -> bool {
        self.start.row != self.end.row
    }
}

/// All active ranges of an editor. More than one range means multi-cursor mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Never empty; the first range is the primary cursor
    ranges: Vec<Range>,
}

impl Selection {
    pub fn new(range: Range) -> Self {
        Self {
            ranges: vec![range],
        }
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn primary(&self) -> Range {
        self.ranges[0]
    }

    pub fn is_multi(&self) -> bool {
        self.ranges.len() > 1
    }

    /// Cursor position of the primary range
    pub fn cursor(&self) -> Position {
        self.ranges[0].end
    }

    /// Collapse to a single caret at the primary cursor
    pub fn clear(&mut self) {
        let cursor = self.cursor();
        self.ranges = vec![Range::caret(cursor)];
    }

    /// Collapse to a single caret at `pos`
    pub fn move_cursor_to(&mut self, pos: Position) {
        self.ranges = vec![Range::caret(pos)];
    }

    /// Add a range. A lone caret is replaced rather than kept next to it.
    pub fn add_range(&mut self, range: Range) {
        if self.ranges.len() == 1 && self.ranges[0].is_empty() {
            self.ranges[0] = range;
        } else {
            self.ranges.push(range);
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(Range::default())
    }
}
