//! Named, key-bound commands registered on an editor.

use std::fmt;
use std::rc::Rc;

use crossterm::event::KeyEvent;

use crate::editor::Editor;

/// A named action bound to a key
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub key: KeyEvent,
    /// Whether the command may run in a read-only editor
    pub read_only: bool,
    exec: Rc<dyn Fn(&mut Editor)>,
}

impl Command {
    pub fn new(
        name: impl Into<String>,
        key: KeyEvent,
        read_only: bool,
        exec: impl Fn(&mut Editor) + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            key,
            read_only,
            exec: Rc::new(exec),
        }
    }

    pub fn exec(&self, editor: &mut Editor) {
        (self.exec)(editor)
    }

    /// Check if a key press triggers this command
    pub fn matches_key(&self, key: KeyEvent) -> bool {
        key.code == self.key.code && key.modifiers == self.key.modifiers
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}

/// Commands of one editor, looked up by name or key
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, replacing any command with the same name
    pub fn add_command(&mut self, command: Command) {
        self.commands.retain(|c| c.name != command.name);
        self.commands.push(command);
    }

    /// Remove a command by name. Returns true if it was registered.
    pub fn remove_command(&mut self, name: &str) -> bool {
        let before = self.commands.len();
        self.commands.retain(|c| c.name != name);
        self.commands.len() != before
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Most recently registered command bound to `key`
    pub fn find_by_key(&self, key: KeyEvent) -> Option<&Command> {
        self.commands.iter().rev().find(|c| c.matches_key(key))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
