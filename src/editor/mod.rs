mod buffer;
mod cursor;
mod delta;
pub mod events;
mod selection;
mod session;
mod undo;

pub use buffer::Buffer;
pub use cursor::Position;
pub use delta::{Delta, DeltaAction, DeltaError};
pub use events::{EventBus, SubscriptionId};
pub use selection::{Range, Selection};
pub use session::{ChangeEvent, ChangeOrigin, Session};
pub use undo::{UndoEntry, UndoStack};

use crossterm::event::KeyEvent;

use crate::commands::CommandRegistry;

/// Identifies an editor within its host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EditorId(pub usize);

/// A view onto one session, with its own command table
pub struct Editor {
    id: EditorId,
    session: Session,
    commands: CommandRegistry,
    read_only: bool,
}

impl Editor {
    pub fn new(id: EditorId, mut session: Session) -> Self {
        session.attach_selection();
        Self {
            id,
            session,
            commands: CommandRegistry::new(),
            read_only: false,
        }
    }

    pub fn id(&self) -> EditorId {
        self.id
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn commands_mut(&mut self) -> &mut CommandRegistry {
        &mut self.commands
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Run the command bound to `key`. Returns true if one ran.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(command) = self.commands.find_by_key(key).cloned() else {
            return false;
        };
        self.run(command)
    }

    /// Run a command by name. Returns true if it ran.
    pub fn exec_command(&mut self, name: &str) -> bool {
        let Some(command) = self.commands.get(name).cloned() else {
            return false;
        };
        self.run(command)
    }

    fn run(&mut self, command: crate::commands::Command) -> bool {
        if self.read_only && !command.read_only {
            tracing::debug!(target: "tagsync::commands", name = %command.name, "refused in read-only editor");
            return false;
        }
        command.exec(self);
        true
    }
}
