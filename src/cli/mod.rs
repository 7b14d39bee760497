//! Command-line interface for taskmgr
//!
//! This module defines the CLI structure using clap derive macros.
//! Each group of subcommands is implemented in its own submodule.

use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::Session;

mod init;
mod report;
mod shell;
mod task;
mod user;

pub use shell::run_shell;

/// taskmgr - flat-file task tracker
///
/// Register users, assign tasks, mark them complete and generate
/// task and user overview reports.
#[derive(Parser, Debug)]
#[command(name = "taskmgr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory holding the task and user files (defaults to current directory)
    #[arg(long, global = true, env = "TASKMGR_DIR")]
    pub dir: Option<PathBuf>,

    /// Username to log in as
    #[arg(short, long, global = true, env = "TASKMGR_USER")]
    pub user: Option<String>,

    /// Password for the login user
    #[arg(long, global = true, env = "TASKMGR_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the user and task files plus a default .taskmgr.toml
    Init,

    /// Register a new user
    #[command(visible_alias = "r")]
    Register {
        /// New username (alphanumeric)
        username: String,

        /// Password for the new user
        #[arg(long)]
        new_password: String,

        /// Repeat the password
        #[arg(long)]
        confirm: String,
    },

    /// Add a new task
    #[command(visible_alias = "a")]
    Add {
        /// User the task is assigned to
        #[arg(long)]
        assignee: String,

        /// Task title
        #[arg(long)]
        title: String,

        /// Task description
        #[arg(long, default_value = "")]
        description: String,

        /// Due date (YYYY-MM-DD), today or later
        #[arg(long)]
        due: String,
    },

    /// View all tasks
    #[command(visible_alias = "va")]
    List,

    /// View tasks assigned to the logged-in user
    #[command(visible_alias = "vm")]
    Mine,

    /// Mark one of your tasks complete
    Complete {
        /// Task number as shown by `taskmgr mine`
        number: usize,
    },

    /// Reassign or reschedule one of your open tasks
    Edit {
        /// Task number as shown by `taskmgr mine`
        number: usize,

        /// New assignee
        #[arg(long)]
        assignee: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// Generate the task and user overview reports
    #[command(visible_alias = "gr")]
    Report,

    /// Display statistics from the report files
    #[command(visible_alias = "ds")]
    Stats,

    /// Interactive login and menu
    Shell,
}

/// Where the data lives and who is logging in
#[derive(Debug, Clone)]
pub struct Login {
    pub dir: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Login {
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    pub fn config(&self) -> Result<(PathBuf, Config)> {
        let dir = self.data_dir()?;
        let config = Config::load_from_dir(&dir);
        Ok((dir, config))
    }

    pub fn open(&self) -> Result<Session> {
        let (dir, config) = self.config()?;
        let (user, password) = match (self.user.as_deref(), self.password.as_deref()) {
            (Some(user), Some(password)) => (user, password),
            _ => {
                return Err(Error::Validation(
                    "login required: pass --user and --password (or set TASKMGR_USER and TASKMGR_PASSWORD)"
                        .to_string(),
                ))
            }
        };
        Session::login(&config, &dir, user, password)
    }
}

/// Current local time; tasks and reports work on naive local dates.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let login = Login {
            dir: self.dir,
            user: self.user,
            password: self.password,
        };
        let json = self.json;
        let quiet = self.quiet;

        match self.command {
            Commands::Init => init::run(init::InitOptions { login, json, quiet }),
            Commands::Register {
                username,
                new_password,
                confirm,
            } => user::run_register(user::RegisterOptions {
                username,
                password: new_password,
                confirm,
                login,
                json,
                quiet,
            }),
            Commands::Add {
                assignee,
                title,
                description,
                due,
            } => task::run_add(task::AddOptions {
                assignee,
                title,
                description,
                due,
                login,
                json,
                quiet,
            }),
            Commands::List => task::run_list(task::ListOptions {
                mine: false,
                login,
                json,
                quiet,
            }),
            Commands::Mine => task::run_list(task::ListOptions {
                mine: true,
                login,
                json,
                quiet,
            }),
            Commands::Complete { number } => task::run_complete(task::CompleteOptions {
                number,
                login,
                json,
                quiet,
            }),
            Commands::Edit {
                number,
                assignee,
                due,
            } => task::run_edit(task::EditOptions {
                number,
                assignee,
                due,
                login,
                json,
                quiet,
            }),
            Commands::Report => report::run_generate(report::ReportOptions { login, json, quiet }),
            Commands::Stats => report::run_stats(report::ReportOptions { login, json, quiet }),
            Commands::Shell => {
                let (dir, config) = login.config()?;
                let stdin = std::io::stdin();
                let stdout = std::io::stdout();
                run_shell(&config, &dir, stdin.lock(), stdout.lock(), local_now)
            }
        }
    }
}
