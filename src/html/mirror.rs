//! Replays a tag-name edit onto the partner tag.

use crate::editor::{ChangeEvent, ChangeOrigin, Delta, Position, Session};
use crate::syntax::Language;

use super::matcher::find_tags;

/// Change handler: mirror a user's edit of a tag name onto its partner.
///
/// Runs once the edit is in the buffer. The mirrored write carries
/// [`ChangeOrigin::Mirror`], so the notification it raises is ignored here.
pub fn on_session_change(session: &mut Session, event: &ChangeEvent) {
    if event.origin != ChangeOrigin::User {
        return;
    }
    let delta = &event.delta;
    if !is_mirrorable(delta) {
        tracing::trace!(target: "tagsync::mirror", text = %delta.text(), "edit is not a tag name edit");
        return;
    }
    match session.selection() {
        Some(selection) if !selection.is_multi() => {}
        _ => return,
    }
    if session.mode_at(delta.start) != Language::Html {
        return;
    }

    let Some(mirrored) = mirrored_delta(session, delta) else {
        return;
    };
    tracing::debug!(
        target: "tagsync::mirror",
        row = mirrored.start.row,
        column = mirrored.start.column,
        text = %mirrored.text(),
        "mirroring tag edit"
    );
    if let Err(err) = session.apply_delta(mirrored, ChangeOrigin::Mirror) {
        tracing::warn!(target: "tagsync::mirror", %err, "mirrored write rejected");
    }
}

/// Only single-line, non-empty, ASCII alphanumeric edits can be part of a tag name
pub fn is_mirrorable(delta: &Delta) -> bool {
    match delta.lines.as_slice() {
        [text] => !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// The delta that repeats `delta` at the same offset inside the partner tag name
pub fn mirrored_delta(session: &mut Session, delta: &Delta) -> Option<Delta> {
    let tokens = session.tokens()?;
    let pair = find_tags(tokens, delta.start, Some(delta))?;

    let column_diff = delta.start.column.checked_sub(pair.origin.position.column)?;
    let start = Position::new(
        pair.matched.position.row,
        pair.matched.position.column + column_diff,
    );
    Some(Delta {
        action: delta.action,
        lines: delta.lines.clone(),
        start,
        end: start.right(delta.width()),
    })
}
