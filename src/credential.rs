//! The API credential and the file it lives in.
//!
//! The file holds `KEY=value` lines in dotenv syntax and is parsed with
//! `dotenvy`. Saving truncates the file and writes back exactly one line with
//! the secret single-quoted, so it reads back verbatim.

use std::fmt;

use utf8path::Path;

use crate::error::{Error, Result};
use crate::observability::CREDENTIAL_SAVES;

/// Default credential file, relative to the working directory.
pub const DEFAULT_CREDENTIAL_FILE: &str = ".env";

/// Default key the credential is stored under.
pub const DEFAULT_CREDENTIAL_KEY: &str = "GEMINI_API_KEY";

//////////////////////////////////////////// Credential ////////////////////////////////////////////

/// An API secret. Empty means "not configured".
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps `secret`.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// True if there is a non-blank secret.
    pub fn is_configured(&self) -> bool {
        !self.0.trim().is_empty()
    }

    /// The secret itself.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_configured() {
            f.write_str("Credential(<redacted>)")
        } else {
            f.write_str("Credential(<empty>)")
        }
    }
}

////////////////////////////////////////// CredentialStore /////////////////////////////////////////

/// Reads and rewrites the credential file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: Path<'static>,
    key: String,
    env_var: Option<String>,
    saved: Option<Credential>,
}

impl CredentialStore {
    /// A store over `path` using [`DEFAULT_CREDENTIAL_KEY`] that ignores the
    /// environment.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Path::from(path.into()),
            key: DEFAULT_CREDENTIAL_KEY.to_string(),
            env_var: None,
            saved: None,
        }
    }

    /// Store the credential under `key` instead.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Prefer environment variable `var`, when set, over the file.
    pub fn with_env_var(mut self, var: impl Into<String>) -> Self {
        self.env_var = Some(var.into());
        self
    }

    /// The credential file.
    pub fn path(&self) -> &Path<'static> {
        &self.path
    }

    /// The key the credential is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the credential.
    ///
    /// A value saved during this run wins. Otherwise a non-blank environment
    /// variable wins over the file, the way dotenv never overrides variables
    /// that are already set. A missing file or key yields an empty
    /// credential, not an error.
    pub fn load(&self) -> Result<Credential> {
        if let Some(saved) = &self.saved {
            return Ok(saved.clone());
        }
        if let Some(value) = self
            .env_var
            .as_ref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|v| !v.trim().is_empty())
        {
            return Ok(Credential::new(value));
        }
        Ok(Credential::new(self.read_file()?.unwrap_or_default()))
    }

    /// The last value assigned to the key in the file.
    fn read_file(&self) -> Result<Option<String>> {
        let entries = match dotenvy::from_path_iter(&self.path) {
            Ok(entries) => entries,
            Err(err) if err.not_found() => return Ok(None),
            Err(err) => return Err(self.file_error(err)),
        };
        let mut found = None;
        for entry in entries {
            let (key, value) = entry.map_err(|err| self.file_error(err))?;
            if key == self.key {
                found = Some(value);
            }
        }
        Ok(found)
    }

    fn file_error(&self, err: dotenvy::Error) -> Error {
        match err {
            dotenvy::Error::Io(err) => {
                Error::io(format!("failed to read {}", self.path.as_str()), err)
            }
            // The offending line may hold the secret; report only where it is.
            dotenvy::Error::LineParse(..) => Error::validation(
                format!("malformed line in {}", self.path.as_str()),
                Some(self.key.clone()),
            ),
            err => Error::validation(
                format!("failed to read {}: {err}", self.path.as_str()),
                Some(self.key.clone()),
            ),
        }
    }

    /// Replace the file's contents with a single `KEY='secret'` line.
    pub fn save(&mut self, secret: &str) -> Result<()> {
        if secret.contains(['\n', '\r']) {
            return Err(Error::validation(
                "credential must fit on one line",
                Some(self.key.clone()),
            ));
        }
        if secret.contains('\'') {
            return Err(Error::validation(
                "credential must not contain single quotes",
                Some(self.key.clone()),
            ));
        }
        std::fs::write(&self.path, format!("{}='{}'\n", self.key, secret)).map_err(|err| {
            Error::io(format!("failed to write {}", self.path.as_str()), err)
        })?;
        CREDENTIAL_SAVES.click();
        self.saved = Some(Credential::new(secret));
        Ok(())
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(DEFAULT_CREDENTIAL_FILE)
    }
}
