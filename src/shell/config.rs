//! Configuration types for the geminibar shell.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling shell behavior.

use arrrg_derive::CommandLine;

use crate::credential::{DEFAULT_CREDENTIAL_FILE, DEFAULT_CREDENTIAL_KEY};
use crate::types::{GenerationConfig, KnownModel, Model};

/// Command-line arguments for the geminibar tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to ask.
    #[arrrg(optional, "Model to use (default: gemini-1.5-flash)", "MODEL")]
    pub model: Option<String>,

    /// File holding the API token.
    #[arrrg(optional, "Credential file (default: .env)", "PATH")]
    pub env_file: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Log each API request to stderr.
    #[arrrg(flag, "Log API requests and timings to stderr")]
    pub log_requests: bool,
}

/// Configuration for the shell.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// Path of the credential file.
    pub credential_file: String,

    /// Key the credential is stored under in that file.
    pub credential_key: String,

    /// Sampling settings for the chat. Fixed for the run.
    pub generation: GenerationConfig,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to log API requests to stderr.
    pub log_requests: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-1.5-flash
    /// - Credential: `GEMINI_API_KEY` in `.env`
    /// - Color: enabled
    /// - Request logging: disabled
    pub fn new() -> Self {
        Self {
            model: Model::Known(KnownModel::Gemini15Flash),
            credential_file: DEFAULT_CREDENTIAL_FILE.to_string(),
            credential_key: DEFAULT_CREDENTIAL_KEY.to_string(),
            generation: GenerationConfig::default(),
            use_color: true,
            log_requests: false,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the credential file.
    pub fn with_credential_file(mut self, path: impl Into<String>) -> Self {
        self.credential_file = path.into();
        self
    }

    /// Sets the credential key.
    pub fn with_credential_key(mut self, key: impl Into<String>) -> Self {
        self.credential_key = key.into();
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Enables request logging.
    pub fn with_request_logging(mut self) -> Self {
        self.log_requests = true;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let defaults = ChatConfig::new();
        let model = args
            .model
            .and_then(|s| s.parse::<Model>().ok())
            .unwrap_or(defaults.model.clone());

        ChatConfig {
            model,
            credential_file: args.env_file.unwrap_or(defaults.credential_file.clone()),
            use_color: !args.no_color,
            log_requests: args.log_requests,
            ..defaults
        }
    }
}
