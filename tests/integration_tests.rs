//! End-to-end tests for geminibar.
//! The remote API is either stubbed or served from a wiremock server.

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use geminibar::shell::{
        App, DISMISS_PROMPT, Dialogs, LineReader, MenuItem, Renderer, TerminalDialogs,
    };
    use geminibar::{
        ChatBackend, ChatHandle, Conversation, Credential, CredentialStore, Error,
        GeminiBackend, GenerationConfig, Result, Role, Turn,
    };
    use rustyline::error::ReadlineError;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct Calls {
        created: usize,
        seeded_with: Vec<Turn>,
    }

    struct ScriptedBackend {
        calls: Arc<Mutex<Calls>>,
        replies: VecDeque<Result<String>>,
    }

    struct ScriptedHandle {
        replies: VecDeque<Result<String>>,
    }

    #[async_trait::async_trait]
    impl ChatBackend for ScriptedBackend {
        type Handle = ScriptedHandle;

        fn configure(&mut self, _: &str) -> Result<()> {
            Ok(())
        }

        async fn start_chat(
            &mut self,
            history: &[Turn],
            _: &GenerationConfig,
        ) -> Result<ScriptedHandle> {
            let mut calls = self.calls.lock().unwrap();
            calls.created += 1;
            calls.seeded_with = history.to_vec();
            Ok(ScriptedHandle {
                replies: std::mem::take(&mut self.replies),
            })
        }
    }

    #[async_trait::async_trait]
    impl ChatHandle for ScriptedHandle {
        async fn send_message(&mut self, _: &str) -> Result<String> {
            self.replies
                .pop_front()
                .unwrap_or_else(|| Err(Error::internal_server("out of replies")))
        }
    }

    #[derive(Default)]
    struct Script {
        menu: VecDeque<String>,
        questions: VecDeque<String>,
        credentials: VecDeque<String>,
        answers: Vec<(String, String)>,
        alerts: Vec<(String, String)>,
    }

    impl Dialogs for Script {
        fn choose(&mut self, _: &[Option<MenuItem>]) -> Result<Option<String>> {
            Ok(self.menu.pop_front())
        }

        fn prompt_question(&mut self) -> Result<Option<String>> {
            Ok(self.questions.pop_front())
        }

        fn prompt_credential(&mut self) -> Result<Option<String>> {
            Ok(self.credentials.pop_front())
        }

        fn alert(&mut self, title: &str, message: &str) -> Result<()> {
            self.alerts.push((title.to_string(), message.to_string()));
            Ok(())
        }

        fn show_answer(&mut self, question: &str, answer: &str) -> Result<()> {
            self.answers.push((question.to_string(), answer.to_string()));
            Ok(())
        }

        fn info(&mut self, _: &str) {}

        fn error(&mut self, message: &str) {
            panic!("unexpected error: {message}");
        }
    }

    fn strings(items: &[&str]) -> VecDeque<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn store_in(tmp: &TempDir) -> CredentialStore {
        let path = tmp.path().join(".env");
        CredentialStore::new(path.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn configure_then_two_questions() {
        let tmp = TempDir::new().unwrap();
        let calls = Arc::new(Mutex::new(Calls::default()));
        let backend = ScriptedBackend {
            calls: Arc::clone(&calls),
            replies: [Ok("Hi there".to_string()), Ok("Fine".to_string())].into(),
        };
        let script = Script {
            menu: strings(&["1", "2", "1", "1", "quit"]),
            credentials: strings(&["abc123"]),
            questions: strings(&["Hello", "How are you?"]),
            ..Default::default()
        };
        let mut app = App::new(store_in(&tmp), Conversation::new(backend), script).unwrap();
        app.run().await.unwrap();

        // The first "1" hit the guard.
        let alerts = &app.dialogs().alerts;
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].0, "Error");
        assert_eq!(alerts[1].0, "Settings");

        assert_eq!(
            app.dialogs().answers,
            vec![
                ("Hello".to_string(), "Hi there".to_string()),
                ("How are you?".to_string(), "Fine".to_string()),
            ]
        );
        assert_eq!(
            app.conversation().transcript().turns(),
            &[
                Turn::user("Hello"),
                Turn::model("Hi there"),
                Turn::user("How are you?"),
                Turn::model("Fine"),
            ]
        );
        let calls = calls.lock().unwrap();
        assert_eq!(calls.created, 1);
        assert_eq!(calls.seeded_with, vec![Turn::user("Hello")]);
        assert_eq!(store_in(&tmp).load().unwrap(), Credential::new("abc123"));
    }

    #[tokio::test]
    async fn failure_then_recovery() {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let backend = ScriptedBackend {
            calls: Arc::clone(&calls),
            replies: [
                Err(Error::service_unavailable("overloaded", Some(5))),
                Ok("Back".to_string()),
            ]
            .into(),
        };
        let mut conversation = Conversation::new(backend);
        let credential = Credential::new("abc123");

        let answer = conversation.ask(&credential, "X").await.unwrap();
        assert!(answer.text().contains("overloaded"));
        assert_eq!(conversation.transcript().last(), Some(&Turn::user("X")));

        let answer = conversation.ask(&credential, "Y").await.unwrap();
        assert_eq!(answer.text(), "Back");
        let stats = conversation.stats();
        assert_eq!(stats.turn_count, 3);
        assert_eq!(stats.unanswered, 1);
        assert_eq!(stats.failures, 1);
        assert_eq!(calls.lock().unwrap().created, 1);
    }

    /// Terminal input replayed from a script, with every prompt recorded.
    struct Keyboard {
        lines: VecDeque<String>,
        prompts: Vec<String>,
    }

    impl LineReader for Keyboard {
        fn read_line(&mut self, prompt: &str) -> std::result::Result<String, ReadlineError> {
            self.prompts.push(prompt.to_string());
            self.lines.pop_front().ok_or(ReadlineError::Eof)
        }

        fn remember(&mut self, _: &str) {}
    }

    struct Silent;

    impl Renderer for Silent {
        fn print_menu(&mut self, _: &[Option<MenuItem>]) {}
        fn print_alert(&mut self, _: &str, _: &str) {}
        fn print_answer(&mut self, _: &str, _: &str) {}
        fn print_error(&mut self, _: &str) {}
        fn print_info(&mut self, _: &str) {}
    }

    #[tokio::test]
    async fn terminal_dialogs_wait_for_dismiss() {
        let tmp = TempDir::new().unwrap();
        let backend = ScriptedBackend {
            calls: Arc::default(),
            replies: [Ok("Hi there".to_string())].into(),
        };
        let keyboard = Keyboard {
            lines: strings(&["1", "", "2", "abc123", "", "1", "Hello", "", "q"]),
            prompts: vec![],
        };
        let dialogs = TerminalDialogs::with_reader(Silent, keyboard);
        let mut app = App::new(store_in(&tmp), Conversation::new(backend), dialogs).unwrap();
        app.run().await.unwrap();

        // Guard alert, saved alert and answer each wait for one line.
        assert_eq!(
            app.dialogs().reader().prompts,
            vec![
                "> ",
                DISMISS_PROMPT,
                "> ",
                "API token: ",
                DISMISS_PROMPT,
                "> ",
                "Question: ",
                DISMISS_PROMPT,
                "> ",
            ]
        );
        assert_eq!(
            app.conversation().transcript().turns(),
            &[Turn::user("Hello"), Turn::model("Hi there")]
        );
        assert_eq!(app.credential().expose(), "abc123");
    }

    #[tokio::test]
    async fn gemini_backend_round_trip() {
        let server = MockServer::start().await;
        let generate = "/v1beta/models/gemini-1.5-flash:generateContent";
        for text in ["Hi there", "Fine"] {
            Mock::given(method("POST"))
                .and(path(generate))
                .and(header("x-goog-api-key", "abc123"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
                })))
                .up_to_n_times(1)
                .expect(1)
                .mount(&server)
                .await;
        }

        let backend = GeminiBackend::default().with_base_url(format!("{}/v1beta", server.uri()));
        let mut conversation = Conversation::new(backend);
        let credential = Credential::new("abc123");

        let answer = conversation.ask(&credential, "Hello").await.unwrap();
        assert_eq!(answer.text(), "Hi there");
        let answer = conversation.ask(&credential, "How are you?").await.unwrap();
        assert_eq!(answer.text(), "Fine");

        // Seeded question + sent question, then that plus reply + new question.
        let sizes: Vec<usize> = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| {
                let body: serde_json::Value = r.body_json().unwrap();
                body["contents"].as_array().unwrap().len()
            })
            .collect();
        assert_eq!(sizes, vec![2, 4]);
        let roles: Vec<_> = conversation
            .handle()
            .unwrap()
            .history()
            .iter()
            .map(|c| c.role)
            .collect();
        assert_eq!(
            roles,
            vec![
                Some(Role::User),
                Some(Role::User),
                Some(Role::Model),
                Some(Role::User),
                Some(Role::Model),
            ]
        );
        assert_eq!(conversation.transcript().len(), 4);
    }
}
