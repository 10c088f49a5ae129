//! Terminal menu for asking Gemini questions.
//!
//! # Usage
//!
//! ```bash
//! # Read GEMINI_API_KEY from the environment, else ./.env
//! geminibar
//!
//! # Keep the token somewhere else
//! geminibar --env-file ~/.config/geminibar.env
//!
//! # Use another model and log request timings to stderr
//! geminibar --model gemini-2.0-flash --log-requests
//! ```
//!
//! # Menu
//!
//! - `1` / `ask` - Ask a question
//! - `2` / `settings` - Set the API token
//! - `h` / `help` - Show help
//! - `q` / `quit` - Exit

use std::sync::Arc;

use arrrg::CommandLine;

use geminibar::shell::{App, ChatArgs, ChatConfig, PlainTextRenderer, TerminalDialogs};
use geminibar::{API_KEY_ENV, Conversation, CredentialStore, GeminiBackend, StderrLogger};

/// Main entry point for the geminibar application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("geminibar [OPTIONS]");
    let config = ChatConfig::from(args);

    let mut backend = GeminiBackend::new(config.model.clone());
    if config.log_requests {
        backend = backend.with_logger(Arc::new(StderrLogger));
    }
    let store = CredentialStore::new(config.credential_file.clone())
        .with_key(config.credential_key.clone())
        .with_env_var(API_KEY_ENV);
    let conversation = Conversation::with_generation_config(backend, config.generation.clone());
    let dialogs = TerminalDialogs::new(PlainTextRenderer::with_color(config.use_color))?;

    let mut app = App::new(store, conversation, dialogs)?;

    println!("Gemini (model: {})", config.model);
    println!("Type help for the menu, quit to exit\n");

    app.run().await?;

    println!("Goodbye!");
    Ok(())
}
