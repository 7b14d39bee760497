//! Task records and the selectors operations use to find them.

use chrono::NaiveDate;
use serde::Serialize;

/// One unit of work assigned to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRecord {
    pub username: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub assigned_date: NaiveDate,
    pub completed: bool,
}

impl TaskRecord {
    pub fn new(
        username: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: NaiveDate,
        assigned_date: NaiveDate,
    ) -> Self {
        Self {
            username: username.into(),
            title: title.into(),
            description: description.into(),
            due_date,
            assigned_date,
            completed: false,
        }
    }

    pub fn matches(&self, target: &TaskMatch) -> bool {
        self.username == target.username && self.title == target.title
    }
}

/// Identifies a task by assignee and title; the first record in insertion
/// order wins when several share both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMatch {
    pub username: String,
    pub title: String,
}

impl TaskMatch {
    pub fn new(username: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            title: title.into(),
        }
    }
}

impl From<&TaskRecord> for TaskMatch {
    fn from(record: &TaskRecord) -> Self {
        Self::new(record.username.clone(), record.title.clone())
    }
}
