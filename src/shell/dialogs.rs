//! Modal dialogs.
//!
//! Each dialog is a synchronous call: prompts return `Ok(None)` when the user
//! cancels and `Ok(Some(text))` when they confirm. Alerts and the answer
//! display block until dismissed. [`TerminalDialogs`] draws them on a
//! terminal with `rustyline`.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::Result;
use crate::shell::commands::MenuItem;
use crate::shell::render::Renderer;

/// Prompt shown under an alert or answer until the user dismisses it.
pub const DISMISS_PROMPT: &str = "[Enter to close] ";

/// The dialogs the shell needs.
pub trait Dialogs {
    /// Show the menu and read a selection. `None` means input is closed.
    fn choose(&mut self, menu: &[Option<MenuItem>]) -> Result<Option<String>>;

    /// The ask prompt.
    fn prompt_question(&mut self) -> Result<Option<String>>;

    /// The settings prompt.
    fn prompt_credential(&mut self) -> Result<Option<String>>;

    /// A blocking alert. Returns once dismissed.
    fn alert(&mut self, title: &str, message: &str) -> Result<()>;

    /// The read-only answer display. Returns once dismissed.
    fn show_answer(&mut self, question: &str, answer: &str) -> Result<()>;

    /// Free-form informational output (help text and the like).
    fn info(&mut self, text: &str);

    /// A non-blocking error line.
    fn error(&mut self, message: &str);
}

/// Where [`TerminalDialogs`] reads lines from.
pub trait LineReader {
    /// Read one line after showing `prompt`.
    fn read_line(&mut self, prompt: &str) -> std::result::Result<String, ReadlineError>;

    /// Make `line` available to history recall.
    fn remember(&mut self, line: &str);
}

impl LineReader for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> std::result::Result<String, ReadlineError> {
        self.readline(prompt)
    }

    fn remember(&mut self, line: &str) {
        let _ = self.add_history_entry(line);
    }
}

/// Terminal dialogs over a line editor.
pub struct TerminalDialogs<R: Renderer, L: LineReader = DefaultEditor> {
    reader: L,
    renderer: R,
}

impl<R: Renderer> TerminalDialogs<R> {
    /// Creates dialogs that draw with `renderer` and read from the terminal.
    pub fn new(renderer: R) -> Result<Self> {
        Ok(Self::with_reader(renderer, DefaultEditor::new()?))
    }
}

impl<R: Renderer, L: LineReader> TerminalDialogs<R, L> {
    /// Creates dialogs that draw with `renderer` and read from `reader`.
    pub fn with_reader(renderer: R, reader: L) -> Self {
        Self { reader, renderer }
    }

    /// The line source.
    pub fn reader(&self) -> &L {
        &self.reader
    }

    fn read(&mut self, prompt: &str, remember: bool) -> Result<Option<String>> {
        match self.reader.read_line(prompt) {
            Ok(line) => {
                if remember && !line.trim().is_empty() {
                    self.reader.remember(&line);
                }
                Ok(Some(line))
            }
            // Ctrl+C cancels the dialog.
            Err(ReadlineError::Interrupted) => Ok(None),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn wait_for_dismiss(&mut self) -> Result<()> {
        // Whatever is typed, including Ctrl+C and EOF, closes the dialog.
        self.read(DISMISS_PROMPT, false).map(|_| ())
    }
}

impl<R: Renderer, L: LineReader> Dialogs for TerminalDialogs<R, L> {
    fn choose(&mut self, menu: &[Option<MenuItem>]) -> Result<Option<String>> {
        self.renderer.print_menu(menu);
        match self.reader.read_line("> ") {
            Ok(line) => Ok(Some(line)),
            // Ctrl+C at the menu just redraws it.
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn prompt_question(&mut self) -> Result<Option<String>> {
        self.renderer
            .print_info("Enter your question (empty or Ctrl+C to cancel).");
        self.read("Question: ", true)
    }

    fn prompt_credential(&mut self) -> Result<Option<String>> {
        self.renderer
            .print_info("Enter your Gemini API token (empty or Ctrl+C to cancel).");
        // Tokens stay out of the line history.
        self.read("API token: ", false)
    }

    fn alert(&mut self, title: &str, message: &str) -> Result<()> {
        self.renderer.print_alert(title, message);
        self.wait_for_dismiss()
    }

    fn show_answer(&mut self, question: &str, answer: &str) -> Result<()> {
        self.renderer.print_answer(question, answer);
        self.wait_for_dismiss()
    }

    fn info(&mut self, text: &str) {
        self.renderer.print_info(text);
    }

    fn error(&mut self, message: &str) {
        self.renderer.print_error(message);
    }
}
