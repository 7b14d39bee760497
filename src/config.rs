//! Configuration loading and management
//!
//! Handles parsing of `.taskmgr.toml` configuration files found in the
//! data directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the data directory
pub const CONFIG_FILE: &str = ".taskmgr.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data file names
    #[serde(default)]
    pub files: FilesConfig,

    /// Account bootstrap and password policy
    #[serde(default)]
    pub accounts: AccountsConfig,
}

/// Data and report file names, relative to the data directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    #[serde(default = "default_tasks_file")]
    pub tasks: String,

    #[serde(default = "default_users_file")]
    pub users: String,

    #[serde(default = "default_task_overview_file")]
    pub task_overview: String,

    #[serde(default = "default_user_overview_file")]
    pub user_overview: String,
}

fn default_tasks_file() -> String {
    "tasks.txt".to_string()
}

fn default_users_file() -> String {
    "user.txt".to_string()
}

fn default_task_overview_file() -> String {
    "task_overview.txt".to_string()
}

fn default_user_overview_file() -> String {
    "user_overview.txt".to_string()
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            tasks: default_tasks_file(),
            users: default_users_file(),
            task_overview: default_task_overview_file(),
            user_overview: default_user_overview_file(),
        }
    }
}

/// Account-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsConfig {
    /// Account written when no credential file exists
    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    /// Minimum password length for new registrations
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "password".to_string()
}

fn default_min_password_len() -> usize {
    6
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
            min_password_len: default_min_password_len(),
        }
    }
}

/// Resolved locations of every file a session touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub tasks: PathBuf,
    pub users: PathBuf,
    pub task_overview: PathBuf,
    pub user_overview: PathBuf,
}

impl Config {
    /// Load configuration from a `.taskmgr.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            match Self::load(&config_path) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(path = %config_path.display(), %err, "ignoring invalid config");
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve file names against the data directory
    pub fn paths(&self, dir: &Path) -> DataPaths {
        DataPaths {
            tasks: dir.join(&self.files.tasks),
            users: dir.join(&self.files.users),
            task_overview: dir.join(&self.files.task_overview),
            user_overview: dir.join(&self.files.user_overview),
        }
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.files.validate()?;
        self.accounts.validate()?;
        Ok(())
    }
}

impl FilesConfig {
    fn validate(&self) -> crate::error::Result<()> {
        for (field, value) in [
            ("files.tasks", &self.tasks),
            ("files.users", &self.users),
            ("files.task_overview", &self.task_overview),
            ("files.user_overview", &self.user_overview),
        ] {
            if value.trim().is_empty() {
                return Err(crate::error::Error::InvalidConfig(format!(
                    "{field} cannot be empty"
                )));
            }
        }
        Ok(())
    }
}

impl AccountsConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.min_password_len == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "accounts.min_password_len must be >= 1".to_string(),
            ));
        }
        if self.admin_username.is_empty()
            || !self.admin_username.chars().all(char::is_alphanumeric)
        {
            return Err(crate::error::Error::InvalidConfig(
                "accounts.admin_username must be alphanumeric".to_string(),
            ));
        }
        if self.admin_password.chars().count() < self.min_password_len {
            return Err(crate::error::Error::InvalidConfig(format!(
                "accounts.admin_password must be at least {} characters",
                self.min_password_len
            )));
        }
        if self.admin_password.contains(';') {
            return Err(crate::error::Error::InvalidConfig(
                "accounts.admin_password cannot contain ';'".to_string(),
            ));
        }
        Ok(())
    }
}
