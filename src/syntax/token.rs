//! Line-based token stream and a cursor that walks it.

use crate::editor::Position;

/// Lexical classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `<`
    TagOpen,
    /// `</`
    EndTagOpen,
    /// Element name inside a start or end tag
    TagName,
    /// `>` or `/>`
    TagClose,
    AttributeName,
    AttributeValue,
    Comment,
    /// Raw text inside `<script>`
    Script,
    /// Raw text inside `<style>`
    Style,
    /// Text content, whitespace and anything unclassified
    Text,
}

impl TokenKind {
    /// Either tag-opening delimiter
    pub fn is_tag_open(self) -> bool {
        matches!(self, TokenKind::TagOpen | TokenKind::EndTagOpen)
    }

    pub fn is_tag_name(self) -> bool {
        self == TokenKind::TagName
    }
}

/// An immutable span of one line's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    /// Width in chars
    width: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        let value = value.into();
        let width = value.chars().count();
        Self { kind, value, width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// True for a tag-name token spelling `name`
    pub fn is_tag_named(&self, name: &str) -> bool {
        self.kind.is_tag_name() && self.value == name
    }
}

/// Tokens of a whole document, one list per line.
/// Every line's tokens cover the line exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    rows: Vec<Vec<Token>>,
}

impl TokenStream {
    pub fn from_rows(rows: Vec<Vec<Token>>) -> Self {
        Self { rows }
    }

    pub fn len_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, idx: usize) -> &[Token] {
        self.rows.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Token at a position, as a fresh iterator would select it
    pub fn token_at(&self, pos: Position) -> Option<&Token> {
        TokenIterator::new(self, pos.row, pos.column).current()
    }
}

/// Cursor over a [`TokenStream`], crossing line boundaries transparently.
///
/// Stepping past either end exhausts the iterator: `current` and every
/// further step return `None`.
#[derive(Debug, Clone)]
pub struct TokenIterator<'a> {
    stream: &'a TokenStream,
    row: usize,
    /// Index into the current row; `None` once exhausted
    index: Option<usize>,
    /// Start column of the current token
    column: usize,
}

impl<'a> TokenIterator<'a> {
    /// Position on the token of `row` that ends at or after `column`.
    ///
    /// A column sitting between two tokens selects the left one, so a cursor
    /// placed right after a tag name still lands on that name.
    pub fn new(stream: &'a TokenStream, row: usize, column: usize) -> Self {
        let mut iter = Self {
            stream,
            row,
            index: None,
            column: 0,
        };

        let mut end = 0;
        for (i, token) in stream.row(row).iter().enumerate() {
            end += token.width();
            if end >= column {
                iter.index = Some(i);
                iter.column = end - token.width();
                break;
            }
        }
        iter
    }

    pub fn current(&self) -> Option<&'a Token> {
        self.index.and_then(|i| self.stream.row(self.row).get(i))
    }

    /// Row of the current token
    pub fn current_row(&self) -> usize {
        self.row
    }

    /// Start column of the current token
    pub fn current_column(&self) -> usize {
        self.column
    }

    pub fn current_position(&self) -> Position {
        Position::new(self.row, self.column)
    }

    /// Advance to the next token, skipping empty lines
    pub fn step_forward(&mut self) -> Option<&'a Token> {
        let index = self.index?;
        let tokens = self.stream.row(self.row);
        if index + 1 < tokens.len() {
            self.column += tokens[index].width();
            self.index = Some(index + 1);
            return self.current();
        }

        for row in self.row + 1..self.stream.len_rows() {
            if !self.stream.row(row).is_empty() {
                self.row = row;
                self.index = Some(0);
                self.column = 0;
                return self.current();
            }
        }

        self.index = None;
        None
    }

    /// Step back to the previous token, skipping empty lines
    pub fn step_backward(&mut self) -> Option<&'a Token> {
        let index = self.index?;
        if index > 0 {
            let tokens = self.stream.row(self.row);
            self.index = Some(index - 1);
            self.column -= tokens[index - 1].width();
            return self.current();
        }

        for row in (0..self.row).rev() {
            let tokens = self.stream.row(row);
            if let Some(last) = tokens.last() {
                let row_width: usize = tokens.iter().map(Token::width).sum();
                self.row = row;
                self.index = Some(tokens.len() - 1);
                self.column = row_width - last.width();
                return self.current();
            }
        }

        self.index = None;
        None
    }
}
