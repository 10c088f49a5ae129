//! The remote chat capability the conversation session talks to.
//!
//! A [`ChatBackend`] is configured with an API key and hands out a
//! [`ChatHandle`] seeded with some history. The handle owns its own copy of
//! that history and grows it only when a message round-trips successfully.
//! [`GeminiBackend`] is the production implementation over [`Gemini`].

use std::sync::Arc;
use std::time::Duration;

use crate::client::Gemini;
use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::session::Turn;
use crate::types::{Content, GenerateContentRequest, GenerationConfig, KnownModel, Model};

/// A remote chat service.
#[async_trait::async_trait]
pub trait ChatBackend: Send {
    /// The per-conversation handle this backend creates.
    type Handle: ChatHandle;

    /// Use `api_key` for handles created from now on.
    fn configure(&mut self, api_key: &str) -> Result<()>;

    /// Open a remote conversation whose history starts as `history`.
    async fn start_chat(
        &mut self,
        history: &[Turn],
        config: &GenerationConfig,
    ) -> Result<Self::Handle>;
}

/// A remote conversation created by [`ChatBackend::start_chat`].
#[async_trait::async_trait]
pub trait ChatHandle: Send {
    /// Send `text` as the next user message and return the model's reply.
    async fn send_message(&mut self, text: &str) -> Result<String>;
}

/////////////////////////////////////////// GeminiBackend //////////////////////////////////////////

/// [`ChatBackend`] over the Gemini `generateContent` API.
pub struct GeminiBackend {
    model: Model,
    base_url: Option<String>,
    timeout: Option<Duration>,
    logger: Option<Arc<dyn ClientLogger>>,
    api_key: Option<String>,
    client: Option<Gemini>,
}

impl GeminiBackend {
    /// Creates an unconfigured backend for `model`.
    pub fn new(model: Model) -> Self {
        Self {
            model,
            base_url: None,
            timeout: None,
            logger: None,
            api_key: None,
            client: None,
        }
    }

    /// Sends requests to `base_url` instead of the public endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Overrides the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Installs a logger on every client this backend builds.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The model chats are opened against.
    pub fn model(&self) -> &Model {
        &self.model
    }
}

impl Default for GeminiBackend {
    fn default() -> Self {
        Self::new(Model::Known(KnownModel::Gemini15Flash))
    }
}

#[async_trait::async_trait]
impl ChatBackend for GeminiBackend {
    type Handle = GeminiChat;

    fn configure(&mut self, api_key: &str) -> Result<()> {
        if self.client.is_some() && self.api_key.as_deref() == Some(api_key) {
            return Ok(());
        }
        let mut client =
            Gemini::with_options(Some(api_key.to_string()), self.base_url.clone(), self.timeout)?;
        if let Some(logger) = &self.logger {
            client = client.with_logger(Arc::clone(logger));
        }
        self.api_key = Some(api_key.to_string());
        self.client = Some(client);
        Ok(())
    }

    async fn start_chat(
        &mut self,
        history: &[Turn],
        config: &GenerationConfig,
    ) -> Result<GeminiChat> {
        let client = self.client.clone().ok_or(Error::NotConfigured)?;
        Ok(GeminiChat {
            client,
            model: self.model.clone(),
            config: config.clone(),
            history: history.iter().map(Content::from).collect(),
        })
    }
}

///////////////////////////////////////////// GeminiChat ///////////////////////////////////////////

/// A Gemini conversation.
///
/// The client is captured when the chat starts; reconfiguring the backend
/// afterwards does not affect an existing chat.
#[derive(Debug)]
pub struct GeminiChat {
    client: Gemini,
    model: Model,
    config: GenerationConfig,
    history: Vec<Content>,
}

impl GeminiChat {
    /// The history the next request will be prefixed with.
    pub fn history(&self) -> &[Content] {
        &self.history
    }
}

#[async_trait::async_trait]
impl ChatHandle for GeminiChat {
    async fn send_message(&mut self, text: &str) -> Result<String> {
        let question = Content::user(text);
        let mut contents = self.history.clone();
        contents.push(question.clone());
        let request =
            GenerateContentRequest::new(contents).with_generation_config(self.config.clone());

        let response = self.client.generate_content(&self.model, &request).await?;
        let reply = response
            .text()
            .ok_or_else(|| Error::empty_response(response.stop_reason()))?;

        self.history.push(question);
        self.history.push(Content::model(reply.clone()));
        Ok(reply)
    }
}
