//! Interaction shell for asking Gemini questions from a terminal.
//!
//! The shell stands in for a menu-bar app: a menu with two actions, each
//! bound to a modal dialog, plus an answer display.
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`commands`]: menu items and selection parsing
//! - [`dialogs`]: the modal prompts, as synchronous calls
//! - [`render`]: terminal output
//! - [`app`]: the application state and the actions over it

mod app;
mod commands;
mod config;
mod dialogs;
mod render;

pub use app::{App, ERROR_TITLE, NOT_CONFIGURED_MESSAGE, SAVED_MESSAGE, SETTINGS_TITLE};
pub use commands::{MENU, MenuAction, MenuItem, help_text, parse_menu_choice};
pub use config::{ChatArgs, ChatConfig};
pub use dialogs::{DISMISS_PROMPT, Dialogs, LineReader, TerminalDialogs};
pub use render::{PlainTextRenderer, Renderer, format_answer};
