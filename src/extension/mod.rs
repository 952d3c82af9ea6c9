//! Composition root: owns the editors, the shared event bus, and the
//! extensions started against them.

use std::rc::Rc;

use anyhow::{bail, Context, Result};
use crossterm::event::KeyEvent;

use crate::config::Settings;
use crate::editor::{Editor, EditorId, EventBus, Session};
use crate::html::HtmlTools;

/// A feature plugged into the host.
///
/// `start` receives the editors that already exist; editors built later are
/// announced through the event bus the extension was constructed with.
pub trait Extension {
    fn name(&self) -> &str;

    fn start(&mut self, editors: &mut [Editor]) -> Result<()>;

    /// Undo everything `start` registered
    fn stop(&mut self, editors: &mut [Editor]);

    /// Run a command this extension owns. Returns false for unknown commands.
    fn handle_command(&self, _command: &str, _editor: &mut Editor) -> bool {
        false
    }
}

pub struct ExtensionHost {
    settings: Settings,
    events: Rc<EventBus>,
    editors: Vec<Editor>,
    extensions: Vec<Box<dyn Extension>>,
    next_id: usize,
}

impl ExtensionHost {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            events: Rc::new(EventBus::new()),
            editors: Vec::new(),
            extensions: Vec::new(),
            next_id: 0,
        }
    }

    /// A host with the HTML tag tools registered
    pub fn with_default_extensions(settings: Settings) -> Result<Self> {
        let mut host = Self::new(settings);
        let tools = HtmlTools::new(host.settings.html_tools.clone(), host.events());
        host.register(Box::new(tools))?;
        Ok(host)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Bus shared by every session and editor of this host
    pub fn events(&self) -> Rc<EventBus> {
        self.events.clone()
    }

    /// Start an extension and keep it until shutdown
    pub fn register(&mut self, mut extension: Box<dyn Extension>) -> Result<()> {
        if self.extension(extension.name()).is_some() {
            bail!("extension `{}` is already registered", extension.name());
        }
        extension
            .start(&mut self.editors)
            .with_context(|| format!("failed to start extension `{}`", extension.name()))?;
        tracing::debug!(target: "tagsync::extension", name = extension.name(), "extension started");
        self.extensions.push(extension);
        Ok(())
    }

    pub fn extension(&self, name: &str) -> Option<&dyn Extension> {
        self.extensions
            .iter()
            .find(|ext| ext.name() == name)
            .map(|ext| ext.as_ref())
    }

    /// Open an editor on `session` and announce it to the extensions
    pub fn open(&mut self, mut session: Session) -> EditorId {
        session.set_events(self.events.clone());
        session.apply_settings(&self.settings.editor);

        let id = EditorId(self.next_id);
        self.next_id += 1;
        let mut editor = Editor::new(id, session);
        self.events.emit_editor_built(&mut editor);
        self.editors.push(editor);
        id
    }

    /// Close an editor, returning it
    pub fn close(&mut self, id: EditorId) -> Option<Editor> {
        let idx = self.editors.iter().position(|e| e.id() == id)?;
        Some(self.editors.remove(idx))
    }

    pub fn editors(&self) -> &[Editor] {
        &self.editors
    }

    pub fn editor(&self, id: EditorId) -> Option<&Editor> {
        self.editors.iter().find(|e| e.id() == id)
    }

    pub fn editor_mut(&mut self, id: EditorId) -> Option<&mut Editor> {
        self.editors.iter_mut().find(|e| e.id() == id)
    }

    /// Route a key press to an editor's command table
    pub fn handle_key(&mut self, id: EditorId, key: KeyEvent) -> bool {
        self.editor_mut(id).is_some_and(|editor| editor.handle_key(key))
    }

    /// Run a named command on an editor, asking each extension in turn
    pub fn dispatch(&mut self, id: EditorId, command: &str) -> bool {
        let Some(editor) = self.editors.iter_mut().find(|e| e.id() == id) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|ext| ext.handle_command(command, editor))
    }

    /// Stop every extension, most recently registered first
    pub fn shutdown(&mut self) {
        while let Some(mut extension) = self.extensions.pop() {
            extension.stop(&mut self.editors);
            tracing::debug!(target: "tagsync::extension", name = extension.name(), "extension stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Language;
    use std::cell::RefCell;

    /// Records its lifecycle calls
    struct Probe {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl Probe {
        fn new(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                name,
                log: log.clone(),
                fail: false,
            }
        }
    }

    impl Extension for Probe {
        fn name(&self) -> &str {
            self.name
        }

        fn start(&mut self, editors: &mut [Editor]) -> Result<()> {
            if self.fail {
                bail!("probe refused to start");
            }
            self.log
                .borrow_mut()
                .push(format!("start {} with {}", self.name, editors.len()));
            Ok(())
        }

        fn stop(&mut self, _editors: &mut [Editor]) {
            self.log.borrow_mut().push(format!("stop {}", self.name));
        }

        fn handle_command(&self, command: &str, _editor: &mut Editor) -> bool {
            command == self.name
        }
    }

    #[test]
    fn test_register_starts_with_existing_editors() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = ExtensionHost::new(Settings::default());
        host.open(Session::new("", Language::Html));
        host.register(Box::new(Probe::new("one", &log))).unwrap();
        assert_eq!(*log.borrow(), vec!["start one with 1"]);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = ExtensionHost::new(Settings::default());
        host.register(Box::new(Probe::new("one", &log))).unwrap();
        assert!(host.register(Box::new(Probe::new("one", &log))).is_err());
    }

    #[test]
    fn test_failed_start_is_reported_with_name() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = ExtensionHost::new(Settings::default());
        let mut probe = Probe::new("broken", &log);
        probe.fail = true;

        let err = host.register(Box::new(probe)).unwrap_err();
        assert!(format!("{err:#}").contains("failed to start extension `broken`"));
        assert!(host.extension("broken").is_none());
    }

    #[test]
    fn test_shutdown_stops_in_reverse_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = ExtensionHost::new(Settings::default());
        host.register(Box::new(Probe::new("one", &log))).unwrap();
        host.register(Box::new(Probe::new("two", &log))).unwrap();
        host.shutdown();
        assert_eq!(
            *log.borrow(),
            vec!["start one with 0", "start two with 0", "stop two", "stop one"]
        );
    }

    #[test]
    fn test_dispatch_reaches_owning_extension() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = ExtensionHost::new(Settings::default());
        host.register(Box::new(Probe::new("one", &log))).unwrap();
        let id = host.open(Session::new("", Language::Html));

        assert!(host.dispatch(id, "one"));
        assert!(!host.dispatch(id, "two"));
        assert!(!host.dispatch(EditorId(99), "one"));
    }

    #[test]
    fn test_open_applies_editor_settings() {
        let mut settings = Settings::default();
        settings.editor.tab_width = 2;
        let mut host = ExtensionHost::new(settings);
        let id = host.open(Session::new("", Language::Html));
        assert_eq!(host.editor(id).unwrap().session().tab_string(), "  ");

        assert!(host.close(id).is_some());
        assert!(host.editor(id).is_none());
    }
}
