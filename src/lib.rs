pub mod commands;
pub mod config;
pub mod editor;
pub mod extension;
pub mod html;
pub mod syntax;

pub use commands::{Command, CommandRegistry};
pub use config::{load_config, Settings};
pub use editor::{ChangeEvent, ChangeOrigin, Delta, Editor, EditorId, EventBus, Position, Session};
pub use extension::{Extension, ExtensionHost};
pub use html::{find_tags, wrap_tag, HtmlTools, TagPair};
pub use syntax::{HtmlTokenizer, Language, TokenStream};
