//! Task operations: add, list, complete, edit.
//!
//! Every mutation rewrites the full task file through [`TaskStore::save_all`].

use chrono::NaiveDate;

use crate::codec;
use crate::error::{Error, Result};
use crate::store::TaskStore;
use crate::task::{TaskMatch, TaskRecord};
use crate::users::Credentials;

/// Input for [`add_task`]
#[derive(Debug, Clone)]
pub struct NewTask {
    pub assignee: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
}

/// Optional changes for [`edit_task`]; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub username: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl TaskEdit {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.due_date.is_none()
    }
}

/// Validate and append a new task assigned today, then persist.
pub fn add_task<'a>(
    store: &TaskStore,
    tasks: &'a mut Vec<TaskRecord>,
    users: &Credentials,
    new_task: NewTask,
    today: NaiveDate,
) -> Result<&'a TaskRecord> {
    if !users.contains(&new_task.assignee) {
        return Err(Error::Validation(
            "User does not exist. Please enter a valid username.".to_string(),
        ));
    }
    codec::validate_field("Title", &new_task.title)?;
    codec::validate_field("Description", &new_task.description)?;
    if new_task.due_date < today {
        return Err(Error::Validation(
            "Due date must be in the future.".to_string(),
        ));
    }

    tasks.push(TaskRecord::new(
        new_task.assignee,
        new_task.title,
        new_task.description,
        new_task.due_date,
        today,
    ));
    store.save_all(tasks)?;

    let added = &tasks[tasks.len() - 1];
    tracing::info!(assignee = %added.username, title = %added.title, "task added");
    Ok(added)
}

/// Tasks assigned to `username`, in insertion order.
pub fn list_for_user<'a>(tasks: &'a [TaskRecord], username: &str) -> Vec<&'a TaskRecord> {
    tasks
        .iter()
        .filter(|task| task.username == username)
        .collect()
}

/// Pick the `number`th (1-based) entry of a listing.
pub fn select<'a>(listing: &[&'a TaskRecord], number: usize) -> Result<&'a TaskRecord> {
    if number == 0 || number > listing.len() {
        return Err(Error::Validation(format!(
            "Invalid task number {number}: choose between 1 and {}",
            listing.len()
        )));
    }
    Ok(listing[number - 1])
}

/// Index into `tasks` of the `number`th (1-based) task assigned to `username`.
pub fn position_for_user(tasks: &[TaskRecord], username: &str, number: usize) -> Result<usize> {
    let positions: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| task.username == username)
        .map(|(index, _)| index)
        .collect();
    number
        .checked_sub(1)
        .and_then(|offset| positions.get(offset).copied())
        .ok_or_else(|| {
            Error::Validation(format!(
                "Invalid task number {number}: choose between 1 and {}",
                positions.len()
            ))
        })
}

/// Mark the first matching task complete and persist.
///
/// Returns `false` without touching the file when nothing matches.
pub fn mark_complete(
    store: &TaskStore,
    tasks: &mut [TaskRecord],
    target: &TaskMatch,
) -> Result<bool> {
    let Some(task) = tasks.iter_mut().find(|task| task.matches(target)) else {
        tracing::debug!(username = %target.username, title = %target.title, "no task to complete");
        return Ok(false);
    };
    task.completed = true;
    store.save_all(tasks)?;
    tracing::info!(username = %target.username, title = %target.title, "task completed");
    Ok(true)
}

/// Reassign and/or reschedule the first matching task, then persist.
///
/// Completed tasks are immutable. A new due date is taken as given: unlike
/// [`add_task`] it may lie in the past.
pub fn edit_task<'a>(
    store: &TaskStore,
    tasks: &'a mut [TaskRecord],
    target: &TaskMatch,
    edit: TaskEdit,
) -> Result<&'a TaskRecord> {
    let index = tasks
        .iter()
        .position(|task| task.matches(target))
        .ok_or_else(|| Error::TaskNotFound {
            username: target.username.clone(),
            title: target.title.clone(),
        })?;
    edit_task_at(store, tasks, index, edit)
}

/// Same as [`edit_task`] for the record at `index` in `tasks`.
pub fn edit_task_at<'a>(
    store: &TaskStore,
    tasks: &'a mut [TaskRecord],
    index: usize,
    edit: TaskEdit,
) -> Result<&'a TaskRecord> {
    let task = tasks
        .get_mut(index)
        .ok_or_else(|| Error::Validation(format!("No task at position {index}")))?;

    if task.completed {
        return Err(Error::State("Completed tasks cannot be edited.".to_string()));
    }
    if let Some(username) = edit.username.as_deref() {
        codec::validate_field("Username", username)?;
    }

    if let Some(username) = edit.username {
        task.username = username;
    }
    if let Some(due_date) = edit.due_date {
        task.due_date = due_date;
    }
    tracing::info!(username = %task.username, title = %task.title, "task edited");
    store.save_all(tasks)?;
    Ok(&tasks[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::Credential;
    use tempfile::{tempdir, TempDir};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn users() -> Credentials {
        Credentials::from_entries(
            ["admin", "alice", "bob"]
                .into_iter()
                .map(|name| Credential {
                    username: name.to_string(),
                    password: "password".to_string(),
                })
                .collect(),
        )
    }

    fn store() -> (TempDir, TaskStore) {
        let dir = tempdir().expect("tempdir");
        let store = TaskStore::new(dir.path().join("tasks.txt"));
        (dir, store)
    }

    fn new_task(assignee: &str, title: &str, due: NaiveDate) -> NewTask {
        NewTask {
            assignee: assignee.to_string(),
            title: title.to_string(),
            description: "something to do".to_string(),
            due_date: due,
        }
    }

    fn record(user: &str, title: &str, completed: bool) -> TaskRecord {
        let mut record = TaskRecord::new(user, title, "d", date(2099, 1, 1), date(2024, 1, 1));
        record.completed = completed;
        record
    }

    #[test]
    fn add_task_assigns_today_and_persists() {
        let (_dir, store) = store();
        let mut tasks = Vec::new();
        let today = date(2024, 6, 1);

        let added = add_task(
            &store,
            &mut tasks,
            &users(),
            new_task("alice", "Plan", date(2024, 6, 30)),
            today,
        )
        .expect("add")
        .clone();

        assert_eq!(added.assigned_date, today);
        assert!(!added.completed);
        assert_eq!(store.load_all().expect("load"), vec![added]);
    }

    #[test]
    fn add_task_accepts_today_rejects_yesterday() {
        let (_dir, store) = store();
        let mut tasks = Vec::new();
        let today = date(2024, 6, 1);

        add_task(&store, &mut tasks, &users(), new_task("bob", "Now", today), today)
            .expect("due today is allowed");

        let err = add_task(
            &store,
            &mut tasks,
            &users(),
            new_task("bob", "Late", date(2024, 5, 31)),
            today,
        )
        .expect_err("past due");
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(tasks.len(), 1);
        assert_eq!(store.load_all().expect("load").len(), 1);
    }

    #[test]
    fn add_task_rejects_unknown_assignee() {
        let (_dir, store) = store();
        let mut tasks = Vec::new();
        let err = add_task(
            &store,
            &mut tasks,
            &users(),
            new_task("mallory", "X", date(2099, 1, 1)),
            date(2024, 1, 1),
        )
        .expect_err("unknown user");
        assert!(matches!(err, Error::Validation(_)));
        assert!(tasks.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn add_task_rejects_delimiter_in_title() {
        let (_dir, store) = store();
        let mut tasks = Vec::new();
        let result = add_task(
            &store,
            &mut tasks,
            &users(),
            new_task("alice", "a;b", date(2099, 1, 1)),
            date(2024, 1, 1),
        );
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn list_for_user_filters_and_keeps_order() {
        let tasks = vec![
            record("alice", "A1", false),
            record("bob", "B1", false),
            record("alice", "A2", true),
            record("alicia", "X", false),
        ];

        let listed: Vec<&str> = list_for_user(&tasks, "alice")
            .into_iter()
            .map(|task| task.title.as_str())
            .collect();
        assert_eq!(listed, vec!["A1", "A2"]);
        assert!(list_for_user(&tasks, "carol").is_empty());
    }

    #[test]
    fn select_is_one_based_and_bounded() {
        let tasks = vec![record("alice", "A1", false), record("alice", "A2", false)];
        let listing = list_for_user(&tasks, "alice");

        assert_eq!(select(&listing, 2).expect("second").title, "A2");
        assert!(matches!(select(&listing, 0), Err(Error::Validation(_))));
        assert!(matches!(select(&listing, 3), Err(Error::Validation(_))));
    }

    #[test]
    fn mark_complete_is_idempotent() {
        let (_dir, store) = store();
        let mut tasks = vec![record("alice", "A1", false), record("bob", "B1", false)];
        let target = TaskMatch::new("alice", "A1");

        assert!(mark_complete(&store, &mut tasks, &target).expect("first"));
        assert!(mark_complete(&store, &mut tasks, &target).expect("second"));

        assert!(tasks[0].completed);
        assert!(!tasks[1].completed);
        let persisted = store.load_all().expect("load");
        assert!(persisted[0].completed);
    }

    #[test]
    fn mark_complete_without_match_is_noop() {
        let (_dir, store) = store();
        let mut tasks = vec![record("alice", "A1", false)];

        let matched =
            mark_complete(&store, &mut tasks, &TaskMatch::new("alice", "nope")).expect("noop");
        assert!(!matched);
        assert!(!tasks[0].completed);
        assert!(!store.path().exists());
    }

    #[test]
    fn mark_complete_updates_first_duplicate_only() {
        let (_dir, store) = store();
        let mut tasks = vec![record("alice", "Dup", false), record("alice", "Dup", false)];

        mark_complete(&store, &mut tasks, &TaskMatch::new("alice", "Dup")).expect("complete");
        assert!(tasks[0].completed);
        assert!(!tasks[1].completed);
    }

    #[test]
    fn edit_task_applies_supplied_fields_only() {
        let (_dir, store) = store();
        let mut tasks = vec![record("alice", "A1", false)];

        edit_task(
            &store,
            &mut tasks,
            &TaskMatch::new("alice", "A1"),
            TaskEdit {
                username: None,
                due_date: Some(date(2030, 2, 3)),
            },
        )
        .expect("edit due");
        assert_eq!(tasks[0].username, "alice");
        assert_eq!(tasks[0].due_date, date(2030, 2, 3));

        edit_task(
            &store,
            &mut tasks,
            &TaskMatch::new("alice", "A1"),
            TaskEdit {
                username: Some("bob".to_string()),
                due_date: None,
            },
        )
        .expect("edit user");
        assert_eq!(tasks[0].username, "bob");
        assert_eq!(tasks[0].due_date, date(2030, 2, 3));
        assert_eq!(store.load_all().expect("load"), tasks);
    }

    #[test]
    fn edit_task_allows_past_due_date() {
        let (_dir, store) = store();
        let mut tasks = vec![record("alice", "A1", false)];

        edit_task(
            &store,
            &mut tasks,
            &TaskMatch::new("alice", "A1"),
            TaskEdit {
                username: None,
                due_date: Some(date(1999, 1, 1)),
            },
        )
        .expect("past due accepted on edit");
        assert_eq!(tasks[0].due_date, date(1999, 1, 1));
    }

    #[test]
    fn edit_completed_task_is_state_error() {
        let (_dir, store) = store();
        let mut tasks = vec![record("alice", "Done", true)];
        let before = tasks.clone();

        let err = edit_task(
            &store,
            &mut tasks,
            &TaskMatch::new("alice", "Done"),
            TaskEdit {
                username: Some("bob".to_string()),
                due_date: Some(date(2030, 1, 1)),
            },
        )
        .expect_err("completed");
        assert!(matches!(err, Error::State(_)));
        assert_eq!(tasks, before);
        assert!(!store.path().exists());
    }

    #[test]
    fn edit_missing_task_is_not_found() {
        let (_dir, store) = store();
        let mut tasks = vec![record("alice", "A1", false)];
        let err = edit_task(
            &store,
            &mut tasks,
            &TaskMatch::new("bob", "A1"),
            TaskEdit::default(),
        )
        .expect_err("missing");
        assert!(matches!(err, Error::TaskNotFound { .. }));
    }

    #[test]
    fn position_for_user_skips_other_users() {
        let tasks = vec![
            record("alice", "A1", false),
            record("bob", "B1", false),
            record("alice", "A2", false),
        ];
        assert_eq!(position_for_user(&tasks, "alice", 2).expect("second"), 2);
        assert_eq!(position_for_user(&tasks, "bob", 1).expect("first"), 1);
        assert!(matches!(
            position_for_user(&tasks, "alice", 3),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            position_for_user(&tasks, "alice", 0),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn edit_task_at_targets_duplicate_title_by_position() {
        let (_dir, store) = store();
        let mut tasks = vec![record("alice", "Dup", true), record("alice", "Dup", false)];

        let edited = edit_task_at(
            &store,
            &mut tasks,
            1,
            TaskEdit {
                username: Some("bob".to_string()),
                due_date: None,
            },
        )
        .expect("open duplicate is editable")
        .clone();
        assert_eq!(edited.username, "bob");
        assert!(!edited.completed);
        assert_eq!(tasks[0].username, "alice");
        assert!(tasks[0].completed);
        assert_eq!(store.load_all().expect("load"), tasks);
    }
}
