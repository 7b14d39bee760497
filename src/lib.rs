//! taskmgr - Flat-file Task Tracker Library
//!
//! This library provides the core functionality for the taskmgr CLI tool:
//! users log in against a credential file, assign tasks to each other and
//! generate overview reports. All state lives in delimited text files.
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap, plus the interactive shell
//! - `codec`: Line format for persisted task records
//! - `config`: Configuration loading from `.taskmgr.toml`
//! - `error`: Error types and result aliases
//! - `ops`: Add, list, complete and edit operations
//! - `output`: Human and JSON output envelopes
//! - `report`: Task and user overview aggregation and rendering
//! - `session`: Logged-in session state
//! - `store`: Whole-file load and save of the task list
//! - `task`: Task record types
//! - `users`: Credential file and registration

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod ops;
pub mod output;
pub mod report;
pub mod session;
pub mod store;
pub mod task;
pub mod users;

pub use error::{Error, Result};
