//! Matching tag tools for HTML sessions: tag-name edits are mirrored onto the
//! partner tag, and a command wraps the selection in a new element.

pub mod matcher;
pub mod mirror;
pub mod wrap;

use std::rc::Rc;

use anyhow::{anyhow, bail, Result};
use crossterm::event::KeyEvent;

use crate::commands::Command;
use crate::config::{parse_key_notation, HtmlToolsSettings};
use crate::editor::{Editor, EventBus, SubscriptionId};
use crate::extension::Extension;

pub use matcher::{find_tags, scan_for_close, scan_for_open, TagLocation, TagPair};
pub use mirror::on_session_change;
pub use wrap::wrap_tag;

pub const EXTENSION_NAME: &str = "html-tools";
/// Wraps the selection in the configured tag
pub const WRAP_COMMAND: &str = "html-tag-wrap";

pub struct HtmlTools {
    settings: HtmlToolsSettings,
    events: Rc<EventBus>,
    subscriptions: Vec<SubscriptionId>,
}

impl HtmlTools {
    pub fn new(settings: HtmlToolsSettings, events: Rc<EventBus>) -> Self {
        Self {
            settings,
            events,
            subscriptions: Vec::new(),
        }
    }

    pub fn settings(&self) -> &HtmlToolsSettings {
        &self.settings
    }

    pub fn is_started(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    fn wrap_command(&self, key: KeyEvent) -> Command {
        let tag = self.settings.wrap_tag.clone();
        Command::new(WRAP_COMMAND, key, false, move |editor: &mut Editor| {
            wrap_tag(editor.session_mut(), &tag);
        })
    }
}

impl Extension for HtmlTools {
    fn name(&self) -> &str {
        EXTENSION_NAME
    }

    fn start(&mut self, editors: &mut [Editor]) -> Result<()> {
        if self.is_started() {
            bail!("{EXTENSION_NAME} is already started");
        }
        let key = parse_key_notation(&self.settings.wrap_key)
            .ok_or_else(|| anyhow!("invalid wrap key `{}`", self.settings.wrap_key))?;
        let command = self.wrap_command(key);

        if self.settings.mirror_tags {
            self.subscriptions
                .push(self.events.on_change(Rc::new(on_session_change)));
        }
        let built = command.clone();
        self.subscriptions
            .push(self.events.on_editor_built(Rc::new(move |editor: &mut Editor| {
                editor.commands_mut().add_command(built.clone());
            })));

        for editor in editors.iter_mut() {
            editor.commands_mut().add_command(command.clone());
        }
        tracing::debug!(
            target: "tagsync::html",
            mirror = self.settings.mirror_tags,
            tag = %self.settings.wrap_tag,
            "html tools started"
        );
        Ok(())
    }

    fn stop(&mut self, editors: &mut [Editor]) {
        for id in self.subscriptions.drain(..) {
            self.events.unsubscribe(id);
        }
        for editor in editors.iter_mut() {
            editor.commands_mut().remove_command(WRAP_COMMAND);
        }
    }

    fn handle_command(&self, command: &str, editor: &mut Editor) -> bool {
        if command != WRAP_COMMAND || editor.is_read_only() {
            return false;
        }
        wrap_tag(editor.session_mut(), &self.settings.wrap_tag)
    }
}
