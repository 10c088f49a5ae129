//! The application state and the menu actions that drive it.

use std::ops::ControlFlow;

use crate::backend::ChatBackend;
use crate::credential::{Credential, CredentialStore};
use crate::error::Result;
use crate::session::{Answer, Conversation};
use crate::shell::commands::{MENU, MenuAction, help_text, parse_menu_choice};
use crate::shell::dialogs::Dialogs;

/// Alert title for errors.
pub const ERROR_TITLE: &str = "Error";

/// Alert shown when asking without a credential.
pub const NOT_CONFIGURED_MESSAGE: &str = "Please set the API token first.";

/// Alert title for the settings confirmation.
pub const SETTINGS_TITLE: &str = "Settings";

/// Alert shown after the credential is saved.
pub const SAVED_MESSAGE: &str = "The API token was saved.";

/// Everything one running instance owns.
pub struct App<B: ChatBackend, D: Dialogs> {
    store: CredentialStore,
    credential: Credential,
    conversation: Conversation<B>,
    dialogs: D,
}

impl<B: ChatBackend, D: Dialogs> App<B, D> {
    /// Loads the credential from `store` and assembles the app.
    pub fn new(store: CredentialStore, conversation: Conversation<B>, dialogs: D) -> Result<Self> {
        let credential = store.load()?;
        Ok(Self {
            store,
            credential,
            conversation,
            dialogs,
        })
    }

    /// Show the menu and act on selections until the user quits or input
    /// closes.
    pub async fn run(&mut self) -> Result<()> {
        while let Some(line) = self.dialogs.choose(&MENU)? {
            let Some(action) = parse_menu_choice(&line) else {
                continue;
            };
            if self.dispatch(action).await?.is_break() {
                break;
            }
        }
        Ok(())
    }

    /// Perform one menu action.
    pub async fn dispatch(&mut self, action: MenuAction) -> Result<ControlFlow<()>> {
        match action {
            MenuAction::Ask => {
                self.ask_question().await?;
            }
            MenuAction::Settings => {
                self.configure_credential()?;
            }
            MenuAction::Help => self.dialogs.info(help_text()),
            MenuAction::Quit => return Ok(ControlFlow::Break(())),
            MenuAction::Invalid(message) => self.dialogs.error(&message),
        }
        Ok(ControlFlow::Continue(()))
    }

    /// The ask action: guard, prompt, ask, display.
    ///
    /// Returns the answer if a question was asked.
    pub async fn ask_question(&mut self) -> Result<Option<Answer>> {
        if !self.credential.is_configured() {
            self.dialogs.alert(ERROR_TITLE, NOT_CONFIGURED_MESSAGE)?;
            return Ok(None);
        }
        let Some(text) = self.dialogs.prompt_question()? else {
            return Ok(None);
        };
        let question = text.trim();
        if question.is_empty() {
            return Ok(None);
        }
        match self.conversation.ask(&self.credential, question).await {
            Ok(answer) => {
                self.dialogs.show_answer(question, &answer.text())?;
                Ok(Some(answer))
            }
            Err(err) if err.is_not_configured() => {
                self.dialogs.alert(ERROR_TITLE, NOT_CONFIGURED_MESSAGE)?;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// The settings action: prompt, save, confirm.
    ///
    /// Returns true if a new credential was saved.
    pub fn configure_credential(&mut self) -> Result<bool> {
        let Some(text) = self.dialogs.prompt_credential()? else {
            return Ok(false);
        };
        let secret = text.trim();
        if secret.is_empty() {
            return Ok(false);
        }
        match self.store.save(secret) {
            Ok(()) => {
                self.credential = self.store.load()?;
                self.dialogs.alert(SETTINGS_TITLE, SAVED_MESSAGE)?;
                Ok(true)
            }
            Err(err) => {
                self.dialogs
                    .alert(ERROR_TITLE, &format!("Could not save the API token: {err}"))?;
                Ok(false)
            }
        }
    }

    /// The credential currently in use.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// The conversation.
    pub fn conversation(&self) -> &Conversation<B> {
        &self.conversation
    }

    /// The dialogs.
    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }
}
