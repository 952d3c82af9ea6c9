use std::rc::Rc;

use super::buffer::Buffer;
use super::cursor::Position;
use super::delta::{Delta, DeltaError};
use super::events::EventBus;
use super::selection::Selection;
use super::undo::UndoStack;
use crate::config::EditorSettings;
use crate::syntax::{HtmlTokenizer, Language, TokenStream};

/// Where a write came from. Subscribers use it to skip writes they must not react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Typed or commanded by the user
    User,
    /// Replayed onto a partner tag; never mirrored again
    Mirror,
    /// Undo or redo replay
    Undo,
}

/// A delta that has just been applied to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub delta: Delta,
    pub origin: ChangeOrigin,
}

/// One open document
pub struct Session {
    buffer: Buffer,
    language: Language,
    /// `None` until an editor view attaches
    selection: Option<Selection>,
    undo: UndoStack,
    tab_width: usize,
    soft_tabs: bool,
    tokenizer: Option<HtmlTokenizer>,
    /// Tokens and the buffer version they were built from
    tokens: Option<(u64, TokenStream)>,
    events: Rc<EventBus>,
}

impl Session {
    pub fn new(text: &str, language: Language) -> Self {
        let defaults = EditorSettings::default();
        Self {
            buffer: Buffer::from_text(text),
            language,
            selection: None,
            undo: UndoStack::new(),
            tab_width: defaults.tab_width,
            soft_tabs: defaults.soft_tabs,
            tokenizer: None,
            tokens: None,
            events: Rc::new(EventBus::new()),
        }
    }

    /// Route change notifications through `events`
    pub fn with_events(mut self, events: Rc<EventBus>) -> Self {
        self.events = events;
        self
    }

    pub fn set_events(&mut self, events: Rc<EventBus>) {
        self.events = events;
    }

    pub fn apply_settings(&mut self, settings: &EditorSettings) {
        self.tab_width = settings.tab_width.max(1);
        self.soft_tabs = settings.soft_tabs;
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn content(&self) -> String {
        self.buffer.content()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.tokens = None;
    }

    /// One indentation unit
    pub fn tab_string(&self) -> String {
        if self.soft_tabs {
            " ".repeat(self.tab_width)
        } else {
            "\t".to_string()
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selection_mut(&mut self) -> Option<&mut Selection> {
        self.selection.as_mut()
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    /// Give the session a selection if it has none yet
    pub(crate) fn attach_selection(&mut self) {
        if self.selection.is_none() {
            self.selection = Some(Selection::default());
        }
    }

    /// Apply one delta and notify subscribers
    pub fn apply_delta(&mut self, delta: Delta, origin: ChangeOrigin) -> Result<(), DeltaError> {
        self.apply_deltas(std::slice::from_ref(&delta), origin)
    }

    /// Apply a batch, notifying subscribers after each delta.
    ///
    /// The batch is first checked against a copy of the buffer; if any delta
    /// does not fit, nothing is applied. Each later delta sees the document as
    /// left by the earlier ones and by whatever subscribers wrote in response.
    /// User batches form one undo group together with those writes.
    pub fn apply_deltas(&mut self, deltas: &[Delta], origin: ChangeOrigin) -> Result<(), DeltaError> {
        let mut scratch = self.buffer.clone();
        for delta in deltas {
            scratch.apply_delta(delta)?;
        }

        let grouped = origin == ChangeOrigin::User;
        if grouped {
            self.undo.begin_undo_group();
        }
        let result = deltas.iter().try_for_each(|delta| self.apply_one(delta, origin));
        if grouped {
            self.undo.end_undo_group();
        }
        if let Err(err) = &result {
            tracing::warn!(target: "tagsync::session", %err, "batch no longer fits after a subscriber write");
        }
        result
    }

    fn apply_one(&mut self, delta: &Delta, origin: ChangeOrigin) -> Result<(), DeltaError> {
        self.buffer.apply_delta(delta)?;
        if origin != ChangeOrigin::Undo {
            self.undo.record(delta.clone());
        }
        let event = ChangeEvent {
            delta: delta.clone(),
            origin,
        };
        let events = self.events.clone();
        events.emit_change(self, &event);
        Ok(())
    }

    /// Run `f` with every write it makes collected into one undo group
    pub fn transact<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.undo.begin_undo_group();
        let result = f(self);
        self.undo.end_undo_group();
        result
    }

    /// Revert the last undo group. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.undo.pop_undo() else {
            return false;
        };
        match self.apply_deltas(&entry.inverse(), ChangeOrigin::Undo) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(target: "tagsync::session", %err, "undo failed");
                false
            }
        }
    }

    /// Re-apply the last undone group
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.undo.pop_redo() else {
            return false;
        };
        match self.apply_deltas(&entry.deltas, ChangeOrigin::Undo) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(target: "tagsync::session", %err, "redo failed");
                false
            }
        }
    }

    /// Tokens for the current buffer contents; `None` outside HTML sessions
    pub fn tokens(&mut self) -> Option<&TokenStream> {
        if self.language != Language::Html {
            return None;
        }

        let version = self.buffer.version();
        let stale = self.tokens.as_ref().map_or(true, |(v, _)| *v != version);
        if stale {
            if self.tokenizer.is_none() {
                match HtmlTokenizer::new() {
                    Ok(tokenizer) => self.tokenizer = Some(tokenizer),
                    Err(err) => {
                        tracing::warn!(target: "tagsync::syntax", %err, "no HTML tokenizer");
                        return None;
                    }
                }
            }
            let tokenizer = self.tokenizer.as_mut()?;
            match tokenizer.tokenize(&self.buffer.content()) {
                Ok(stream) => self.tokens = Some((version, stream)),
                Err(err) => {
                    tracing::warn!(target: "tagsync::syntax", %err, "tokenizing failed");
                    return None;
                }
            }
        }

        self.tokens.as_ref().map(|(_, stream)| stream)
    }

    /// Language at a position: script and style bodies of an HTML
    /// document report their embedded language
    pub fn mode_at(&mut self, pos: Position) -> Language {
        if self.language != Language::Html {
            return self.language;
        }
        self.tokens()
            .and_then(|tokens| tokens.token_at(pos))
            .and_then(|token| Language::embedded_in(token.kind))
            .unwrap_or(Language::Html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn html(text: &str) -> Session {
        Session::new(text, Language::Html)
    }

    #[test]
    fn test_failed_batch_applies_nothing() {
        let mut session = html("abc");
        let batch = [
            Delta::insert(Position::new(0, 3), "d"),
            Delta::insert(Position::new(5, 0), "x"),
        ];
        let err = session.apply_deltas(&batch, ChangeOrigin::User).unwrap_err();
        assert_eq!(err, DeltaError::OutOfRange(Position::new(5, 0)));
        assert_eq!(session.content(), "abc");
        assert!(!session.undo());
    }

    #[test]
    fn test_batch_notifies_after_each_delta() {
        let bus = Rc::new(EventBus::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        bus.on_change(Rc::new(move |session: &mut Session, _: &ChangeEvent| {
            log.borrow_mut().push(session.content());
        }));

        let mut session = html("hello").with_events(bus);
        let batch = [
            Delta::insert(Position::new(0, 5), "</p>"),
            Delta::insert(Position::new(0, 0), "<p>"),
        ];
        session.apply_deltas(&batch, ChangeOrigin::User).unwrap();
        assert_eq!(*seen.borrow(), vec!["hello</p>", "<p>hello</p>"]);
    }

    #[test]
    fn test_later_delta_sees_earlier_one() {
        let mut session = html("ab");
        let batch = [
            Delta::insert(Position::new(0, 2), "c"),
            Delta::remove(Position::new(0, 1), "bc"),
        ];
        session.apply_deltas(&batch, ChangeOrigin::User).unwrap();
        assert_eq!(session.content(), "a");
        assert!(session.undo());
        assert_eq!(session.content(), "ab");
    }

    #[test]
    fn test_undo_and_redo_batch() {
        let mut session = html("hello");
        let batch = [
            Delta::insert(Position::new(0, 5), "</p>"),
            Delta::insert(Position::new(0, 0), "<p>"),
        ];
        session.apply_deltas(&batch, ChangeOrigin::User).unwrap();
        assert!(session.undo());
        assert_eq!(session.content(), "hello");
        assert!(session.redo());
        assert_eq!(session.content(), "<p>hello</p>");
    }

    #[test]
    fn test_undo_is_flagged_for_subscribers() {
        let bus = Rc::new(EventBus::new());
        let origins = Rc::new(RefCell::new(Vec::new()));
        let log = origins.clone();
        bus.on_change(Rc::new(move |_: &mut Session, event: &ChangeEvent| {
            log.borrow_mut().push(event.origin);
        }));

        let mut session = html("").with_events(bus);
        session
            .apply_delta(Delta::insert(Position::new(0, 0), "a"), ChangeOrigin::User)
            .unwrap();
        session.undo();
        assert_eq!(*origins.borrow(), vec![ChangeOrigin::User, ChangeOrigin::Undo]);
    }

    #[test]
    fn test_tokens_follow_buffer_version() {
        let mut session = html("<a>x</a>");
        assert_eq!(session.tokens().unwrap().row(0)[1].value, "a");
        session
            .apply_delta(Delta::insert(Position::new(0, 2), "bbr"), ChangeOrigin::User)
            .unwrap();
        assert_eq!(session.tokens().unwrap().row(0)[1].value, "abbr");
    }

    #[test]
    fn test_plain_sessions_have_no_tokens() {
        let mut session = Session::new("<b>x</b>", Language::PlainText);
        assert!(session.tokens().is_none());
        assert_eq!(session.mode_at(Position::new(0, 1)), Language::PlainText);
    }

    #[test]
    fn test_mode_at_inside_script() {
        let mut session = html("<script>let a = 1;</script>");
        assert_eq!(session.mode_at(Position::new(0, 10)), Language::JavaScript);
        assert_eq!(session.mode_at(Position::new(0, 3)), Language::Html);
    }

    #[test]
    fn test_tab_string_follows_settings() {
        let mut session = html("");
        assert_eq!(session.tab_string(), "    ");
        session.apply_settings(&EditorSettings {
            tab_width: 2,
            soft_tabs: false,
        });
        assert_eq!(session.tab_string(), "\t");
    }
}
