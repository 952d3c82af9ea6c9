use tree_sitter::{Node, Parser, Tree};

use super::token::{Token, TokenKind, TokenStream};
use super::SyntaxError;

/// A classified leaf of the syntax tree, in byte offsets
#[derive(Debug, Clone, Copy)]
struct Leaf {
    start: usize,
    end: usize,
    kind: TokenKind,
}

/// Turns HTML source into a [`TokenStream`] using tree-sitter
pub struct HtmlTokenizer {
    parser: Parser,
}

impl HtmlTokenizer {
    pub fn new() -> Result<Self, SyntaxError> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_html::LANGUAGE.into())?;
        Ok(Self { parser })
    }

    /// Parse the whole source and flatten it into per-line tokens
    pub fn tokenize(&mut self, source: &str) -> Result<TokenStream, SyntaxError> {
        let tree = self.parser.parse(source, None).ok_or(SyntaxError::Parse)?;
        let leaves = collect_leaves(&tree);
        Ok(split_into_rows(source, &leaves))
    }
}

/// Depth-first walk collecting non-empty leaves in document order
fn collect_leaves(tree: &Tree) -> Vec<Leaf> {
    let mut leaves = Vec::new();
    let mut cursor = tree.walk();

    loop {
        let node = cursor.node();
        if node.child_count() > 0 && cursor.goto_first_child() {
            continue;
        }

        // Zero-width leaves are implicit end tags and MISSING nodes
        if node.end_byte() > node.start_byte() {
            leaves.push(Leaf {
                start: node.start_byte(),
                end: node.end_byte(),
                kind: classify(node),
            });
        }

        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return leaves;
            }
        }
    }
}

fn classify(node: Node<'_>) -> TokenKind {
    match node.kind() {
        "<" => TokenKind::TagOpen,
        "</" => TokenKind::EndTagOpen,
        ">" | "/>" => TokenKind::TagClose,
        "tag_name" | "erroneous_end_tag_name" => TokenKind::TagName,
        "attribute_name" => TokenKind::AttributeName,
        "attribute_value" | "\"" | "'" => TokenKind::AttributeValue,
        "comment" => TokenKind::Comment,
        "raw_text" => match node.parent().map(|p| p.kind()) {
            Some("script_element") => TokenKind::Script,
            Some("style_element") => TokenKind::Style,
            _ => TokenKind::Text,
        },
        _ => TokenKind::Text,
    }
}

/// Cut leaves at line breaks and fill the gaps between them with text tokens
fn split_into_rows(source: &str, leaves: &[Leaf]) -> TokenStream {
    let mut rows = Vec::new();
    let mut first = 0;
    let mut line_start = 0;

    for line in source.split('\n') {
        let line_end = line_start + line.len();
        while first < leaves.len() && leaves[first].end <= line_start {
            first += 1;
        }

        let mut tokens = Vec::new();
        let mut cursor = line_start;
        for leaf in &leaves[first..] {
            if leaf.start >= line_end {
                break;
            }
            let start = leaf.start.max(cursor);
            let end = leaf.end.min(line_end);
            if start > cursor {
                tokens.push(Token::new(TokenKind::Text, &source[cursor..start]));
            }
            if end > start {
                tokens.push(Token::new(leaf.kind, &source[start..end]));
                cursor = end;
            }
        }
        if cursor < line_end {
            tokens.push(Token::new(TokenKind::Text, &source[cursor..line_end]));
        }

        rows.push(tokens);
        line_start = line_end + 1;
    }

    TokenStream::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> TokenStream {
        HtmlTokenizer::new().unwrap().tokenize(source).unwrap()
    }

    fn values(stream: &TokenStream, row: usize) -> Vec<&str> {
        stream.row(row).iter().map(|t| t.value.as_str()).collect()
    }

    #[test]
    fn test_simple_element() {
        let stream = tokenize("<div>hello</div>");
        assert_eq!(values(&stream, 0), vec!["<", "div", ">", "hello", "</", "div", ">"]);

        let kinds: Vec<TokenKind> = stream.row(0).iter().map(|t| t.kind).collect();
        assert_eq!(kinds[0], TokenKind::TagOpen);
        assert_eq!(kinds[1], TokenKind::TagName);
        assert_eq!(kinds[4], TokenKind::EndTagOpen);
        assert_eq!(kinds[5], TokenKind::TagName);
    }

    #[test]
    fn test_rows_cover_every_column() {
        let source = "<ul>\n  <li class=\"a\">one</li>\n\n</ul>";
        let stream = tokenize(source);
        assert_eq!(stream.len_rows(), 4);
        for (row, line) in source.split('\n').enumerate() {
            let joined: String = stream.row(row).iter().map(|t| t.value.as_str()).collect();
            assert_eq!(joined, line);
        }
        assert!(stream.row(2).is_empty());
    }

    #[test]
    fn test_multi_line_text_is_split() {
        let stream = tokenize("<p>one\ntwo</p>");
        assert_eq!(values(&stream, 0), vec!["<", "p", ">", "one"]);
        assert_eq!(values(&stream, 1), vec!["two", "</", "p", ">"]);
    }

    #[test]
    fn test_mismatched_end_name_is_still_a_tag_name() {
        let stream = tokenize("<div1>hello</div>");
        let name = &stream.row(0)[5];
        assert_eq!(name.value, "div");
        assert_eq!(name.kind, TokenKind::TagName);
    }

    #[test]
    fn test_script_and_style_raw_text() {
        let stream = tokenize("<script>let a;</script><style>p{}</style>");
        let script = stream.row(0).iter().find(|t| t.value == "let a;").unwrap();
        assert_eq!(script.kind, TokenKind::Script);
        let style = stream.row(0).iter().find(|t| t.value == "p{}").unwrap();
        assert_eq!(style.kind, TokenKind::Style);
    }

    #[test]
    fn test_non_ascii_columns_count_chars() {
        let stream = tokenize("<p>héllo</p>");
        let iter = super::super::TokenIterator::new(&stream, 0, 11);
        assert_eq!(iter.current().unwrap().value, "p");
        assert_eq!(iter.current_column(), 10);
    }
}
