//! Menu choice parsing for the interaction shell.
//!
//! The menu has two real actions, asking a question and configuring the
//! credential, plus help and quit for the terminal.

/// An entry of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    /// Shortcut shown next to the label.
    pub key: &'static str,
    /// What the entry does.
    pub label: &'static str,
}

/// The menu, in display order. `None` marks a separator.
pub const MENU: [Option<MenuItem>; 5] = [
    Some(MenuItem {
        key: "1",
        label: "Ask a question",
    }),
    None,
    Some(MenuItem {
        key: "2",
        label: "API settings",
    }),
    None,
    Some(MenuItem {
        key: "q",
        label: "Quit",
    }),
];

/// A parsed menu selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Open the ask prompt.
    Ask,

    /// Open the settings prompt.
    Settings,

    /// Display help information.
    Help,

    /// Exit the application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses a menu selection.
///
/// Returns `None` for blank input, which the caller ignores.
///
/// # Examples
///
/// ```
/// # use geminibar::shell::{MenuAction, parse_menu_choice};
/// assert_eq!(parse_menu_choice("1"), Some(MenuAction::Ask));
/// assert_eq!(parse_menu_choice("/settings"), Some(MenuAction::Settings));
/// assert_eq!(parse_menu_choice("  "), None);
/// ```
pub fn parse_menu_choice(input: &str) -> Option<MenuAction> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let choice = input.strip_prefix('/').unwrap_or(input).to_lowercase();

    let result = match choice.as_str() {
        "1" | "a" | "ask" => MenuAction::Ask,
        "2" | "s" | "settings" | "token" => MenuAction::Settings,
        "h" | "help" | "?" => MenuAction::Help,
        "q" | "quit" | "exit" => MenuAction::Quit,
        _ => MenuAction::Invalid(format!("Unknown choice: {input} (type 'help' for options)")),
    };

    Some(result)
}

/// Returns help text describing the menu.
pub fn help_text() -> &'static str {
    r#"Menu:
  1, ask        Ask Gemini a question
  2, settings   Set the Gemini API token
  h, help       Show this help message
  q, quit       Exit

Leave a prompt empty or press Ctrl+C to cancel it."#
}
