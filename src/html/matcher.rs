//! Resolves the partner of the tag under a position.
//!
//! Matching is purely lexical: a tag is a tag-name token preceded by `<`
//! (opening) or `</` (closing). Nested elements with the same name are
//! skipped with a depth counter; anything unbalanced yields no match.

use crate::editor::{Delta, DeltaAction, Position};
use crate::syntax::{Token, TokenIterator, TokenKind, TokenStream};

/// One side of a resolved pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLocation {
    /// Start of the tag-name token
    pub position: Position,
    pub token: Token,
}

/// The tag holding the edit and its partner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPair {
    pub origin: TagLocation,
    pub matched: TagLocation,
}

/// Find the tag at `pos` and its matching tag.
///
/// `tokens` must already reflect `delta` when one is given: the edited name is
/// rebuilt as it read before the edit, since that is the name the partner still
/// carries.
pub fn find_tags(tokens: &TokenStream, pos: Position, delta: Option<&Delta>) -> Option<TagPair> {
    let mut iter = TokenIterator::new(tokens, pos.row, pos.column);
    let mut token = iter.current()?;
    if !token.kind.is_tag_open() && !token.kind.is_tag_name() {
        return None;
    }
    if token.kind.is_tag_open() {
        token = iter.step_forward()?;
    }
    if !token.kind.is_tag_name() {
        return None;
    }

    let origin = TagLocation {
        position: iter.current_position(),
        token: token.clone(),
    };
    let name = match delta {
        Some(delta) => name_before_edit(&token.value, origin.position, delta)?,
        None => token.value.clone(),
    };

    let mut behind = iter.clone();
    let matched = match behind.step_backward()?.kind {
        TokenKind::TagOpen => scan_for_close(iter, &name),
        TokenKind::EndTagOpen => scan_for_open(iter, &name),
        _ => None,
    };

    let Some(matched) = matched else {
        tracing::trace!(target: "tagsync::matcher", %name, row = pos.row, column = pos.column, "no partner tag");
        return None;
    };
    Some(TagPair { origin, matched })
}

/// Scan forward from an opening tag name for its closing tag.
///
/// Each `<name` on the way opens a nested level and each `</name` closes one;
/// the first `</name` met with no nested level open is the match.
pub fn scan_for_close(mut iter: TokenIterator<'_>, name: &str) -> Option<TagLocation> {
    let mut depth = 0usize;
    let mut prev = iter.current()?;

    while let Some(token) = iter.step_forward() {
        if token.is_tag_named(name) {
            match prev.kind {
                TokenKind::TagOpen => depth += 1,
                TokenKind::EndTagOpen if depth == 0 => {
                    return Some(TagLocation {
                        position: iter.current_position(),
                        token: token.clone(),
                    });
                }
                TokenKind::EndTagOpen => depth -= 1,
                _ => {}
            }
        }
        prev = token;
    }
    None
}

/// Scan backward from a closing tag name for its opening tag.
///
/// Mirror image of [`scan_for_close`]: each `</name` passed opens a nested
/// level, each `<name` closes one, and the first `<name` met with no nested
/// level open is the match.
pub fn scan_for_open(mut iter: TokenIterator<'_>, name: &str) -> Option<TagLocation> {
    let mut depth = 0usize;
    // The `</` in front of the origin name
    let mut token = iter.step_backward()?;

    loop {
        let position = iter.current_position();
        let prev = iter.step_backward();

        if token.is_tag_named(name) {
            match prev.map(|p| p.kind) {
                Some(TokenKind::TagOpen) if depth == 0 => {
                    return Some(TagLocation {
                        position,
                        token: token.clone(),
                    });
                }
                Some(TokenKind::TagOpen) => depth -= 1,
                Some(TokenKind::EndTagOpen) => depth += 1,
                _ => {}
            }
        }
        token = prev?;
    }
}

/// Undo `delta` on a tag name that already contains it
fn name_before_edit(value: &str, origin: Position, delta: &Delta) -> Option<String> {
    if delta.start.row != origin.row {
        return None;
    }
    let index = delta.start.column.checked_sub(origin.column)?;
    let chars: Vec<char> = value.chars().collect();
    if index > chars.len() {
        return None;
    }
    let text = delta.lines.first()?;

    let mut name: String = chars[..index].iter().collect();
    match delta.action {
        DeltaAction::Insert => {
            let end = index + text.chars().count();
            if end > chars.len() {
                return None;
            }
            name.extend(&chars[end..]);
        }
        DeltaAction::Remove => {
            name.push_str(text);
            name.extend(&chars[index..]);
        }
    }
    Some(name)
}
