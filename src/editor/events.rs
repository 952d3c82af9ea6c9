//! Synchronous notification bus shared by the sessions and editors of a workspace.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::session::{ChangeEvent, Session};
use super::Editor;

/// Called after a delta lands in a session's buffer
pub type ChangeHandler = Rc<dyn Fn(&mut Session, &ChangeEvent)>;
/// Called once for every newly built editor
pub type EditorHandler = Rc<dyn Fn(&mut Editor)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct EventBus {
    next_id: Cell<u64>,
    change: RefCell<Vec<(SubscriptionId, ChangeHandler)>>,
    editor_built: RefCell<Vec<(SubscriptionId, EditorHandler)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> SubscriptionId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        SubscriptionId(id)
    }

    /// Subscribe to document changes of every session on this bus
    pub fn on_change(&self, handler: ChangeHandler) -> SubscriptionId {
        let id = self.next_id();
        self.change.borrow_mut().push((id, handler));
        id
    }

    /// Subscribe to editor construction
    pub fn on_editor_built(&self, handler: EditorHandler) -> SubscriptionId {
        let id = self.next_id();
        self.editor_built.borrow_mut().push((id, handler));
        id
    }

    /// Remove a subscription from whichever channel holds it
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut change = self.change.borrow_mut();
        let before = change.len();
        change.retain(|(sub, _)| *sub != id);
        if change.len() != before {
            return true;
        }
        drop(change);

        let mut built = self.editor_built.borrow_mut();
        let before = built.len();
        built.retain(|(sub, _)| *sub != id);
        built.len() != before
    }

    /// Number of live subscriptions across both channels
    pub fn subscriber_count(&self) -> usize {
        self.change.borrow().len() + self.editor_built.borrow().len()
    }

    /// Deliver a change to every subscriber.
    ///
    /// Handlers run against a snapshot of the subscriber list, so a handler
    /// may write to the session (re-entering this method) or unsubscribe.
    pub fn emit_change(&self, session: &mut Session, event: &ChangeEvent) {
        let handlers: Vec<ChangeHandler> = self
            .change
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in handlers {
            handler(session, event);
        }
    }

    pub fn emit_editor_built(&self, editor: &mut Editor) {
        let handlers: Vec<EditorHandler> = self
            .editor_built
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in handlers {
            handler(editor);
        }
    }
}
