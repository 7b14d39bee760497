//! Logged-in session.
//!
//! A `Session` holds the current user, the loaded credentials and task list,
//! and the store handles used to persist them. Both the one-shot commands and
//! the interactive shell create one per login.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::{Config, DataPaths};
use crate::error::Result;
use crate::ops::{self, NewTask, TaskEdit};
use crate::report::{ReportWriter, Statistics, TaskOverview, UserOverview};
use crate::store::TaskStore;
use crate::task::{TaskMatch, TaskRecord};
use crate::users::{Credentials, UserStore};

/// Files created by [`bootstrap`]
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Bootstrap {
    pub users_file: bool,
    pub tasks_file: bool,
}

/// Create the credential and task files if they do not exist yet.
pub fn bootstrap(config: &Config, dir: &Path) -> Result<Bootstrap> {
    let paths = config.paths(dir);
    let users_file = UserStore::new(&paths.users, config.accounts.clone()).ensure_exists()?;
    let tasks_file = TaskStore::new(&paths.tasks).ensure_exists()?;
    Ok(Bootstrap {
        users_file,
        tasks_file,
    })
}

pub struct Session {
    user: String,
    paths: DataPaths,
    user_store: UserStore,
    credentials: Credentials,
    store: TaskStore,
    tasks: Vec<TaskRecord>,
    reports: ReportWriter,
}

impl Session {
    /// Bootstrap missing files, check credentials and load the task list.
    pub fn login(config: &Config, dir: &Path, username: &str, password: &str) -> Result<Self> {
        bootstrap(config, dir)?;
        let paths = config.paths(dir);

        let user_store = UserStore::new(&paths.users, config.accounts.clone());
        let credentials = user_store.load()?;
        credentials.authenticate(username, password)?;

        let store = TaskStore::new(&paths.tasks);
        let tasks = store.load_all()?;
        let reports = ReportWriter::new(&paths.task_overview, &paths.user_overview);

        tracing::info!(user = %username, tasks = tasks.len(), "logged in");
        Ok(Self {
            user: username.to_string(),
            paths,
            user_store,
            credentials,
            store,
            tasks,
            reports,
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn register(&mut self, username: &str, password: &str, confirm: &str) -> Result<()> {
        self.user_store
            .register(&mut self.credentials, username, password, confirm)
    }

    pub fn add_task(&mut self, new_task: NewTask, today: NaiveDate) -> Result<&TaskRecord> {
        ops::add_task(&self.store, &mut self.tasks, &self.credentials, new_task, today)
    }

    pub fn all_tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    /// Re-read the task file; the "view all" listing always shows what is on disk.
    pub fn reload(&mut self) -> Result<&[TaskRecord]> {
        self.tasks = self.store.load_all()?;
        Ok(&self.tasks)
    }

    pub fn my_tasks(&self) -> Vec<&TaskRecord> {
        ops::list_for_user(&self.tasks, &self.user)
    }

    /// Resolve a 1-based position within [`Session::my_tasks`].
    pub fn select_mine(&self, number: usize) -> Result<TaskMatch> {
        let mine = self.my_tasks();
        ops::select(&mine, number).map(TaskMatch::from)
    }

    pub fn mark_complete(&mut self, number: usize) -> Result<(TaskMatch, bool)> {
        let target = self.select_mine(number)?;
        let matched = ops::mark_complete(&self.store, &mut self.tasks, &target)?;
        Ok((target, matched))
    }

    /// Edit the record shown at `number` in [`Session::my_tasks`] and return
    /// it as saved.
    pub fn edit_task(&mut self, number: usize, edit: TaskEdit) -> Result<TaskRecord> {
        let index = ops::position_for_user(&self.tasks, &self.user, number)?;
        ops::edit_task_at(&self.store, &mut self.tasks, index, edit).cloned()
    }

    pub fn generate_reports(&self, now: NaiveDateTime) -> Result<(TaskOverview, UserOverview)> {
        self.reports.generate(&self.tasks, &self.credentials, now)
    }

    pub fn display_statistics(&self, now: NaiveDateTime) -> Result<Statistics> {
        self.reports.display(&self.tasks, &self.credentials, now)
    }

    pub fn report_paths(&self) -> (PathBuf, PathBuf) {
        (
            self.reports.task_overview_path().to_path_buf(),
            self.reports.user_overview_path().to_path_buf(),
        )
    }

    /// Persist the task list as-is. Called on exit from the interactive shell.
    pub fn save(&self) -> Result<()> {
        self.store.save_all(&self.tasks)
    }
}
