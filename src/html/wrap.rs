//! Wraps the selection in a generated element.

use crate::editor::{ChangeOrigin, Delta, DeltaError, Position, Range, Selection, Session};
use crate::syntax::Language;

/// Wrap the single non-empty selection of an HTML session in `<tag>`/`</tag>`.
///
/// A selection spanning lines puts each tag on its own line and indents the
/// content one unit. Afterwards both tag names are selected so they can be
/// retyped together. Returns false and leaves the document alone when there is
/// nothing to wrap.
pub fn wrap_tag(session: &mut Session, tag: &str) -> bool {
    if tag.is_empty() || session.language() != Language::Html {
        return false;
    }
    let range = match session.selection() {
        Some(selection) if !selection.is_multi() && !selection.primary().is_empty() => {
            selection.primary()
        }
        _ => return false,
    };

    match session.transact(|session| insert_tags(session, range, tag)) {
        Ok((open, close)) => {
            let width = tag.chars().count();
            let mut selection = Selection::new(Range::new(open, open.right(width)));
            selection.add_range(Range::new(close, close.right(width)));
            session.set_selection(Some(selection));
            tracing::debug!(target: "tagsync::wrap", %tag, row = range.start.row, "wrapped selection");
            true
        }
        Err(err) => {
            tracing::warn!(target: "tagsync::wrap", %err, "wrap failed");
            false
        }
    }
}

/// Insert the tags and return the start of the name inside each of them
fn insert_tags(
    session: &mut Session,
    range: Range,
    tag: &str,
) -> Result<(Position, Position), DeltaError> {
    let Range { start, end } = range;
    let open_tag = format!("<{tag}>");
    let close_tag = format!("</{tag}>");
    let open_len = open_tag.chars().count();

    // Closing tag first so `end` still points at the selection end
    session.apply_deltas(
        &[Delta::insert(end, &close_tag), Delta::insert(start, &open_tag)],
        ChangeOrigin::User,
    )?;

    let open = start.right(1);
    if !range.is_multi_line() {
        return Ok((open, end.right(open_len + 2)));
    }

    let indent: String = session
        .buffer()
        .get_line_indent(start.row)
        .chars()
        .take(start.column)
        .collect();
    let tab = session.tab_string();

    session.apply_delta(Delta::insert(end, &format!("\n{indent}")), ChangeOrigin::User)?;
    session.apply_delta(
        Delta::insert(start.right(open_len), &format!("\n{indent}{tab}")),
        ChangeOrigin::User,
    )?;

    // The first content line was indented with its newline
    for row in start.row + 2..=end.row + 1 {
        if !session.buffer().is_blank_line(row) {
            session.apply_delta(Delta::insert(Position::new(row, 0), &tab), ChangeOrigin::User)?;
        }
    }

    let close = Position::new(end.row + 2, indent.chars().count() + 2);
    Ok((open, close))
}
