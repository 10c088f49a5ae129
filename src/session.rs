//! Conversation state.
//!
//! A [`Conversation`] keeps the local [`Transcript`] and lazily binds to one
//! remote [`ChatHandle`] on the first question. The handle is created from
//! the transcript as it stands at that moment (the first question included)
//! and is then reused for the rest of the run, even if the credential
//! changes.
//!
//! The transcript and the handle's own history are allowed to diverge: a
//! failed send leaves an unanswered `user` turn in the transcript, while the
//! handle only records exchanges that completed.

use std::fmt;

use crate::backend::{ChatBackend, ChatHandle};
use crate::credential::Credential;
use crate::error::{Error, Result};
use crate::observability::{
    SESSION_ASK_FAILURES, SESSION_ASKS, SESSION_HANDLES_CREATED, SESSION_NOT_CONFIGURED,
};
use crate::types::{Content, GenerationConfig, Role};

/////////////////////////////////////////////// Turn ///////////////////////////////////////////////

/// One entry of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Who said it.
    pub role: Role,
    /// What was said.
    pub text: String,
}

impl Turn {
    /// A turn typed by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// A turn produced by the model.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

impl From<&Turn> for Content {
    fn from(turn: &Turn) -> Self {
        Content::new(turn.role, turn.text.clone())
    }
}

//////////////////////////////////////////// Transcript ////////////////////////////////////////////

/// Append-only record of the conversation for this run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// An empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True if nothing has been asked yet.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The most recent turn.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of `user` turns with no `model` turn after them.
    pub fn unanswered(&self) -> usize {
        self.turns
            .windows(2)
            .filter(|w| w[0].role == Role::User && w[1].role == Role::User)
            .count()
            + usize::from(self.last().is_some_and(|t| t.role == Role::User))
    }
}

////////////////////////////////////////////// Answer //////////////////////////////////////////////

/// What an [`Conversation::ask`] produced.
#[derive(Debug, Clone)]
pub enum Answer {
    /// The model replied.
    Reply(String),
    /// The remote call failed; the question stays unanswered.
    Failure(Error),
}

impl Answer {
    /// The text to show the user.
    pub fn text(&self) -> String {
        match self {
            Answer::Reply(text) => text.clone(),
            Answer::Failure(err) => format!("An error occurred: {err}"),
        }
    }

    /// True if the model replied.
    pub fn is_reply(&self) -> bool {
        matches!(self, Answer::Reply(_))
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/////////////////////////////////////////// Conversation ///////////////////////////////////////////

/// Aggregated stats for a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationStats {
    /// Turns in the transcript.
    pub turn_count: usize,
    /// Questions with no recorded answer.
    pub unanswered: usize,
    /// Whether the remote handle exists.
    pub bound: bool,
    /// Questions asked with a credential configured.
    pub asks: u64,
    /// Asks that ended in a remote failure.
    pub failures: u64,
}

/// The conversation for one run of the program.
pub struct Conversation<B: ChatBackend> {
    backend: B,
    generation_config: GenerationConfig,
    transcript: Transcript,
    handle: Option<B::Handle>,
    asks: u64,
    failures: u64,
}

impl<B: ChatBackend> Conversation<B> {
    /// Creates an unbound conversation using the default generation config.
    pub fn new(backend: B) -> Self {
        Self::with_generation_config(backend, GenerationConfig::default())
    }

    /// Creates an unbound conversation with a specific generation config.
    pub fn with_generation_config(backend: B, generation_config: GenerationConfig) -> Self {
        Self {
            backend,
            generation_config,
            transcript: Transcript::new(),
            handle: None,
            asks: 0,
            failures: 0,
        }
    }

    /// Ask `question` and record the exchange.
    ///
    /// Returns [`Error::NotConfigured`] without touching the backend or the
    /// transcript when `credential` is empty. Every other failure is folded
    /// into [`Answer::Failure`] and leaves the question unanswered.
    pub async fn ask(&mut self, credential: &Credential, question: &str) -> Result<Answer> {
        if !credential.is_configured() {
            SESSION_NOT_CONFIGURED.click();
            return Err(Error::NotConfigured);
        }
        SESSION_ASKS.click();
        self.asks += 1;
        self.transcript.push(Turn::user(question));

        match self.exchange(credential, question).await {
            Ok(reply) => {
                self.transcript.push(Turn::model(reply.clone()));
                Ok(Answer::Reply(reply))
            }
            Err(err) => {
                SESSION_ASK_FAILURES.click();
                self.failures += 1;
                Ok(Answer::Failure(err))
            }
        }
    }

    async fn exchange(&mut self, credential: &Credential, question: &str) -> Result<String> {
        self.backend.configure(credential.expose())?;
        if self.handle.is_none() {
            let handle = self
                .backend
                .start_chat(self.transcript.turns(), &self.generation_config)
                .await?;
            SESSION_HANDLES_CREATED.click();
            self.handle = Some(handle);
        }
        match self.handle.as_mut() {
            Some(handle) => handle.send_message(question).await,
            None => Err(Error::NotConfigured),
        }
    }

    /// The transcript so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// True once the remote handle has been created.
    pub fn is_bound(&self) -> bool {
        self.handle.is_some()
    }

    /// The remote handle, if bound.
    pub fn handle(&self) -> Option<&B::Handle> {
        self.handle.as_ref()
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The generation config chats are created with.
    pub fn generation_config(&self) -> &GenerationConfig {
        &self.generation_config
    }

    /// Returns the current conversation statistics snapshot.
    pub fn stats(&self) -> ConversationStats {
        ConversationStats {
            turn_count: self.transcript.len(),
            unanswered: self.transcript.unanswered(),
            bound: self.is_bound(),
            asks: self.asks,
            failures: self.failures,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// What a [`StubBackend`] saw.
    #[derive(Debug, Default)]
    pub(crate) struct StubLog {
        pub configured: Vec<String>,
        pub created_with: Vec<Vec<Turn>>,
        pub sent: Vec<String>,
    }

    /// Backend whose handles pop scripted replies.
    pub(crate) struct StubBackend {
        pub log: Arc<Mutex<StubLog>>,
        replies: Arc<Mutex<VecDeque<Result<String>>>>,
        fail_start: bool,
    }

    impl StubBackend {
        pub(crate) fn new(replies: Vec<Result<String>>) -> Self {
            Self {
                log: Arc::default(),
                replies: Arc::new(Mutex::new(replies.into())),
                fail_start: false,
            }
        }

        pub(crate) fn failing_start() -> Self {
            Self {
                fail_start: true,
                ..Self::new(vec![])
            }
        }
    }

    pub(crate) struct StubHandle {
        log: Arc<Mutex<StubLog>>,
        replies: Arc<Mutex<VecDeque<Result<String>>>>,
    }

    #[async_trait::async_trait]
    impl ChatBackend for StubBackend {
        type Handle = StubHandle;

        fn configure(&mut self, api_key: &str) -> Result<()> {
            self.log.lock().unwrap().configured.push(api_key.to_string());
            Ok(())
        }

        async fn start_chat(
            &mut self,
            history: &[Turn],
            _: &GenerationConfig,
        ) -> Result<StubHandle> {
            if self.fail_start {
                return Err(Error::connection("unreachable", None));
            }
            self.log.lock().unwrap().created_with.push(history.to_vec());
            Ok(StubHandle {
                log: Arc::clone(&self.log),
                replies: Arc::clone(&self.replies),
            })
        }
    }

    #[async_trait::async_trait]
    impl ChatHandle for StubHandle {
        async fn send_message(&mut self, text: &str) -> Result<String> {
            self.log.lock().unwrap().sent.push(text.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::internal_server("no scripted reply")))
        }
    }

    fn key() -> Credential {
        Credential::new("abc123")
    }

    #[tokio::test]
    async fn not_configured_never_calls_backend() {
        let backend = StubBackend::new(vec![Ok("unused".to_string())]);
        let log = Arc::clone(&backend.log);
        let mut conversation = Conversation::new(backend);

        let err = conversation
            .ask(&Credential::default(), "Hello")
            .await
            .unwrap_err();
        assert!(err.is_not_configured());
        assert!(conversation.transcript().is_empty());
        assert!(!conversation.is_bound());

        let log = log.lock().unwrap();
        assert!(log.configured.is_empty());
        assert!(log.created_with.is_empty());
        assert!(log.sent.is_empty());
    }

    #[tokio::test]
    async fn transcript_alternates() {
        let replies = (0..5).map(|i| Ok(format!("reply {i}"))).collect();
        let mut conversation = Conversation::new(StubBackend::new(replies));
        for i in 0..5 {
            let answer = conversation.ask(&key(), &format!("q {i}")).await.unwrap();
            assert!(answer.is_reply());
        }

        let turns = conversation.transcript().turns();
        assert_eq!(turns.len(), 10);
        for (i, turn) in turns.iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Model };
            assert_eq!(turn.role, expected, "turn {i}");
        }
        assert_eq!(conversation.transcript().unanswered(), 0);
    }

    #[tokio::test]
    async fn handle_created_once_with_first_question() {
        let backend = StubBackend::new(vec![Ok("a".to_string()), Ok("b".to_string())]);
        let log = Arc::clone(&backend.log);
        let mut conversation = Conversation::new(backend);

        conversation.ask(&key(), "first").await.unwrap();
        assert!(conversation.is_bound());
        conversation.ask(&key(), "second").await.unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.created_with, vec![vec![Turn::user("first")]]);
        assert_eq!(log.sent, vec!["first".to_string(), "second".to_string()]);
        assert_eq!(log.configured, vec!["abc123".to_string(); 2]);
    }

    #[tokio::test]
    async fn failure_leaves_question_unanswered() {
        let backend = StubBackend::new(vec![Err(Error::rate_limit("quota exhausted", None))]);
        let mut conversation = Conversation::new(backend);

        let answer = conversation.ask(&key(), "X").await.unwrap();
        assert!(!answer.is_reply());
        assert!(answer.text().contains("quota exhausted"));
        assert_eq!(conversation.transcript().last(), Some(&Turn::user("X")));
        assert_eq!(conversation.stats().failures, 1);
        assert_eq!(conversation.stats().unanswered, 1);
    }

    #[tokio::test]
    async fn ask_after_failure_keeps_dangling_turn() {
        let backend = StubBackend::new(vec![
            Err(Error::timeout("slow", Some(60.0))),
            Ok("recovered".to_string()),
        ]);
        let log = Arc::clone(&backend.log);
        let mut conversation = Conversation::new(backend);

        conversation.ask(&key(), "X").await.unwrap();
        let answer = conversation.ask(&key(), "Y").await.unwrap();
        assert_eq!(answer.text(), "recovered");
        assert_eq!(
            conversation.transcript().turns(),
            &[Turn::user("X"), Turn::user("Y"), Turn::model("recovered")]
        );
        // Still the handle from the first ask.
        assert_eq!(log.lock().unwrap().created_with.len(), 1);
    }

    #[tokio::test]
    async fn failed_start_stays_unbound() {
        let mut conversation = Conversation::new(StubBackend::failing_start());
        let answer = conversation.ask(&key(), "X").await.unwrap();
        assert!(answer.text().starts_with("An error occurred: "));
        assert!(answer.text().contains("unreachable"));
        assert!(!conversation.is_bound());
        assert_eq!(conversation.transcript().turns(), &[Turn::user("X")]);
    }

    #[tokio::test]
    async fn credential_change_keeps_handle() {
        let backend = StubBackend::new(vec![Ok("a".to_string()), Ok("b".to_string())]);
        let log = Arc::clone(&backend.log);
        let mut conversation = Conversation::new(backend);

        conversation.ask(&key(), "one").await.unwrap();
        conversation
            .ask(&Credential::new("other"), "two")
            .await
            .unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.created_with.len(), 1);
        assert_eq!(log.configured, vec!["abc123".to_string(), "other".to_string()]);
    }

    #[test]
    fn unanswered_counts() {
        let mut transcript = Transcript::new();
        assert_eq!(transcript.unanswered(), 0);
        transcript.push(Turn::user("a"));
        assert_eq!(transcript.unanswered(), 1);
        transcript.push(Turn::user("b"));
        transcript.push(Turn::model("B"));
        assert_eq!(transcript.unanswered(), 1);
    }
}
