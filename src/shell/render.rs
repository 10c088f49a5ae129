//! Output rendering for the interaction shell.
//!
//! A trait-based rendering abstraction so the shell can draw to a terminal
//! with or without ANSI styling.

use std::io::{self, Stdout, Write};

use crate::shell::commands::MenuItem;

/// ANSI escape code for bold text (used for titles).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for separators).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the question).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for alerts).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Trait for rendering shell output.
pub trait Renderer: Send {
    /// Print the menu. `None` entries are separators.
    fn print_menu(&mut self, items: &[Option<MenuItem>]);

    /// Print a modal alert.
    fn print_alert(&mut self, title: &str, message: &str);

    /// Print a question and its answer.
    fn print_answer(&mut self, question: &str, answer: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    /// Flushes stdout to ensure immediate display.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn styled(&self, style: &str, text: &str) -> String {
        if self.use_color {
            format!("{style}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_menu(&mut self, items: &[Option<MenuItem>]) {
        println!("{}", self.styled(ANSI_BOLD, "Gemini"));
        for item in items {
            match item {
                Some(item) => println!("  [{}] {}", item.key, item.label),
                None => println!("  {}", self.styled(ANSI_DIM, "---")),
            }
        }
        self.flush();
    }

    fn print_alert(&mut self, title: &str, message: &str) {
        let title = format!("[{title}]");
        println!("\n{} {message}\n", self.styled(ANSI_YELLOW, &title));
        self.flush();
    }

    fn print_answer(&mut self, question: &str, answer: &str) {
        println!();
        println!("{}", self.styled(ANSI_BOLD, "Gemini's answer"));
        let question = self.styled(ANSI_CYAN, question);
        println!("{}", format_answer(&question, answer));
        println!();
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        let label = self.styled(ANSI_RED, "Error:");
        eprintln!("\n{label} {error}");
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
        self.flush();
    }
}

/// The text of the answer display.
pub fn format_answer(question: &str, answer: &str) -> String {
    format!("Question: {question}\n\nAnswer: {answer}")
}
