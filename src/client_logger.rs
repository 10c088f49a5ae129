//! Logging trait for Gemini client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! and log all API interactions passing through the [`Gemini`] client, plus
//! [`StderrLogger`], the implementation the `geminibar` binary installs for
//! `--log-requests`.
//!
//! [`Gemini`]: crate::Gemini

use std::time::Duration;

use crate::{Error, GenerateContentRequest, GenerateContentResponse, Model};

/// A trait for logging Gemini client operations.
///
/// Implement this trait to capture and record all API interactions.
///
/// # Example
///
/// ```rust,ignore
/// use geminibar::{ClientLogger, GenerateContentRequest, GenerateContentResponse, Model};
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_request(&self, model: &Model, request: &GenerateContentRequest) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "{model}: {}", serde_json::to_string(request).unwrap()).unwrap();
///     }
///     // ...
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent.
    fn log_request(&self, model: &Model, request: &GenerateContentRequest);

    /// Log a successful response along with how long the call took.
    fn log_response(&self, response: &GenerateContentResponse, elapsed: Duration);

    /// Log a failed call along with how long it took.
    fn log_error(&self, error: &Error, elapsed: Duration);
}

/// Writes one line per event to stderr.
///
/// Message bodies are not printed; only sizes, token counts and timings.
#[derive(Debug, Default)]
pub struct StderrLogger;

impl ClientLogger for StderrLogger {
    fn log_request(&self, model: &Model, request: &GenerateContentRequest) {
        eprintln!(
            "[geminibar] request model={} contents={}",
            model,
            request.contents.len()
        );
    }

    fn log_response(&self, response: &GenerateContentResponse, elapsed: Duration) {
        let usage = response.usage_metadata.unwrap_or_default();
        eprintln!(
            "[geminibar] response candidates={} tokens={}/{} elapsed={:.3}s",
            response.candidates.len(),
            usage.prompt_token_count,
            usage.candidates_token_count,
            elapsed.as_secs_f64()
        );
    }

    fn log_error(&self, error: &Error, elapsed: Duration) {
        eprintln!(
            "[geminibar] error={} elapsed={:.3}s",
            error,
            elapsed.as_secs_f64()
        );
    }
}
