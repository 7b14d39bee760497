//! Credential store.
//!
//! Credentials live in a flat file, one `username;password` pair per line.
//! When the file is missing it is bootstrapped with the configured admin
//! account. Registration only ever appends.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::codec::DELIMITER;
use crate::config::AccountsConfig;
use crate::error::{Error, Result};

/// A username/password pair granting login access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

/// Known accounts in file order
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    entries: Vec<Credential>,
}

impl Credentials {
    pub fn from_entries(entries: Vec<Credential>) -> Self {
        Self { entries }
    }

    pub fn contains(&self, username: &str) -> bool {
        self.entries.iter().any(|entry| entry.username == username)
    }

    /// Usernames in the order they were registered
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.username.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check a login attempt
    pub fn authenticate(&self, username: &str, password: &str) -> Result<()> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.username == username)
            .ok_or_else(|| Error::Validation("User does not exist".to_string()))?;
        if entry.password != password {
            return Err(Error::Validation("Wrong password".to_string()));
        }
        Ok(())
    }

    fn push(&mut self, credential: Credential) {
        self.entries.push(credential);
    }
}

/// Handle on the persisted credential file
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
    accounts: AccountsConfig,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>, accounts: AccountsConfig) -> Self {
        Self {
            path: path.into(),
            accounts,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the default admin account if no credential file exists.
    /// Returns true when the file was created.
    pub fn ensure_exists(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(
            &self.path,
            format!(
                "{}{DELIMITER}{}",
                self.accounts.admin_username, self.accounts.admin_password
            ),
        )?;
        tracing::info!(
            path = %self.path.display(),
            admin = %self.accounts.admin_username,
            "bootstrapped credential file"
        );
        Ok(true)
    }

    pub fn load(&self) -> Result<Credentials> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(self.path.clone()));
            }
            Err(err) => return Err(err.into()),
        };

        let mut credentials = Credentials::default();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let (username, password) = line.split_once(DELIMITER).ok_or_else(|| Error::Format {
                path: self.path.clone(),
                line: index + 1,
                reason: "expected username;password".to_string(),
            })?;
            credentials.push(Credential {
                username: username.to_string(),
                password: password.to_string(),
            });
        }

        tracing::debug!(path = %self.path.display(), count = credentials.len(), "loaded credentials");
        Ok(credentials)
    }

    /// Validate and persist a new account, then add it to `credentials`.
    pub fn register(
        &self,
        credentials: &mut Credentials,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> Result<()> {
        validate_username(username)?;
        if credentials.contains(username) {
            return Err(Error::Validation(
                "Username already exists. Please choose a different username.".to_string(),
            ));
        }
        self.validate_password(password)?;
        if password != confirm {
            return Err(Error::Validation("Passwords do not match".to_string()));
        }

        self.append(username, password)?;
        credentials.push(Credential {
            username: username.to_string(),
            password: password.to_string(),
        });
        tracing::info!(%username, "registered user");
        Ok(())
    }

    fn validate_password(&self, password: &str) -> Result<()> {
        if password.chars().count() < self.accounts.min_password_len {
            return Err(Error::Validation(format!(
                "Password must be at least {} characters long.",
                self.accounts.min_password_len
            )));
        }
        if password.contains(DELIMITER) || password.contains(['\n', '\r']) {
            return Err(Error::Validation(format!(
                "Password cannot contain '{DELIMITER}' or line breaks."
            )));
        }
        Ok(())
    }

    fn append(&self, username: &str, password: &str) -> Result<()> {
        let needs_newline = match fs::read(&self.path) {
            Ok(bytes) => !bytes.is_empty() && !bytes.ends_with(b"\n"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
            Err(err) => return Err(err.into()),
        };

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if needs_newline {
            writeln!(file)?;
        }
        write!(file, "{username}{DELIMITER}{password}")?;
        Ok(())
    }
}

fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() || !username.chars().all(char::is_alphanumeric) {
        return Err(Error::Validation(
            "Username can only contain alphanumeric characters.".to_string(),
        ));
    }
    Ok(())
}
