mod token;
mod tokenizer;

pub use token::{Token, TokenIterator, TokenKind, TokenStream};
pub use tokenizer::HtmlTokenizer;

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("failed to load the HTML grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("the HTML parser produced no tree")]
    Parse,
}

/// Language mode of a session or of a position inside it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    Html,
    JavaScript,
    Css,
    #[default]
    PlainText,
}

impl Language {
    /// Detect language from a file extension
    pub fn from_path(path: &Path) -> Self {
        let extension = path.extension().and_then(|e| e.to_str());

        match extension.map(str::to_ascii_lowercase).as_deref() {
            Some("html" | "htm" | "xhtml") => Language::Html,
            Some("js" | "mjs" | "cjs") => Language::JavaScript,
            Some("css") => Language::Css,
            _ => Language::PlainText,
        }
    }

    /// Short identifier, as shown in a status line
    pub fn id(self) -> &'static str {
        match self {
            Language::Html => "html",
            Language::JavaScript => "javascript",
            Language::Css => "css",
            Language::PlainText => "text",
        }
    }

    /// Language embedded in an HTML token, if it differs from HTML
    pub fn embedded_in(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Script => Some(Language::JavaScript),
            TokenKind::Style => Some(Language::Css),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_path() {
        assert_eq!(Language::from_path(Path::new("index.html")), Language::Html);
        assert_eq!(Language::from_path(Path::new("page.HTM")), Language::Html);
        assert_eq!(Language::from_path(Path::new("app.js")), Language::JavaScript);
        assert_eq!(Language::from_path(Path::new("README")), Language::PlainText);
    }

    #[test]
    fn test_embedded_languages() {
        assert_eq!(Language::embedded_in(TokenKind::Script), Some(Language::JavaScript));
        assert_eq!(Language::embedded_in(TokenKind::TagName), None);
        assert_eq!(Language::Css.id(), "css");
    }
}
