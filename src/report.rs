//! Task and user overview reports.
//!
//! Aggregation is pure and takes the evaluation time as an argument;
//! rendering to the persisted text layout is kept separate so the numbers
//! can be checked without caring about layout.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::task::TaskRecord;
use crate::users::Credentials;

const LABEL_TOTAL: &str = "Total number of tasks";
const LABEL_COMPLETED: &str = "Total number of completed tasks";
const LABEL_INCOMPLETE: &str = "Total number of incomplete tasks";
const LABEL_OVERDUE: &str = "Total number of overdue tasks";
const NO_TASKS: &str = "No tasks available.";

/// System-wide task counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskOverview {
    pub total: usize,
    pub completed: usize,
    pub incomplete: usize,
    pub overdue: usize,
}

/// Per-user statistics. Percentages are `None` where the denominator is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub username: String,
    pub assigned: usize,
    pub completed: usize,
    pub incomplete: usize,
    pub overdue: usize,
    /// Share of all tasks assigned to this user
    pub share_of_total: Option<f64>,
    /// completed / incomplete, 0 when nothing is incomplete
    pub completed_pct: f64,
    pub incomplete_pct: Option<f64>,
    pub overdue_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserOverview {
    pub total_users: usize,
    pub total_tasks: usize,
    pub users: Vec<UserStats>,
}

/// Statistics read back from the report files
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub tasks: TaskOverview,
    pub user_report: String,
}

fn is_overdue(task: &TaskRecord, now: NaiveDateTime) -> bool {
    !task.completed && task.due_date.and_time(NaiveTime::MIN) < now
}

pub fn task_overview(tasks: &[TaskRecord], now: NaiveDateTime) -> TaskOverview {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let overdue = tasks.iter().filter(|task| is_overdue(task, now)).count();
    TaskOverview {
        total,
        completed,
        incomplete: total - completed,
        overdue,
    }
}

pub fn user_overview(
    tasks: &[TaskRecord],
    users: &Credentials,
    now: NaiveDateTime,
) -> UserOverview {
    let total_tasks = tasks.len();
    let users_stats = users
        .usernames()
        .map(|username| user_stats(tasks, username, total_tasks, now))
        .collect();

    UserOverview {
        total_users: users.len(),
        total_tasks,
        users: users_stats,
    }
}

fn user_stats(
    tasks: &[TaskRecord],
    username: &str,
    total_tasks: usize,
    now: NaiveDateTime,
) -> UserStats {
    let mine: Vec<&TaskRecord> = tasks.iter().filter(|task| task.username == username).collect();
    let assigned = mine.len();
    let completed = mine.iter().filter(|task| task.completed).count();
    let incomplete = assigned - completed;
    let overdue = mine.iter().filter(|task| is_overdue(task, now)).count();

    UserStats {
        username: username.to_string(),
        assigned,
        completed,
        incomplete,
        overdue,
        share_of_total: percentage(assigned, total_tasks),
        // Relative to incomplete rather than assigned; kept for report compatibility.
        completed_pct: percentage(completed, incomplete).unwrap_or(0.0),
        incomplete_pct: percentage(incomplete, assigned),
        overdue_pct: percentage(overdue, assigned),
    }
}

fn percentage(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(part as f64 / whole as f64 * 100.0)
    }
}

/// Render the task overview as a mapping literal of four labeled counts.
pub fn render_task_overview(overview: &TaskOverview) -> String {
    format!(
        "{{'{LABEL_TOTAL}': {}, '{LABEL_COMPLETED}': {}, '{LABEL_INCOMPLETE}': {}, '{LABEL_OVERDUE}': {}}}",
        overview.total, overview.completed, overview.incomplete, overview.overdue
    )
}

/// Read back a rendered task overview.
pub fn parse_task_overview(text: &str) -> Result<TaskOverview> {
    let body = text
        .trim()
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| Error::FormatLine("task overview must be a {...} mapping".to_string()))?;

    let mut total = None;
    let mut completed = None;
    let mut incomplete = None;
    let mut overdue = None;

    for entry in body.split(',').filter(|entry| !entry.trim().is_empty()) {
        let (key, value) = entry
            .split_once(':')
            .ok_or_else(|| Error::FormatLine(format!("expected 'label': count, found '{}'", entry.trim())))?;
        let key = key.trim().trim_matches(|ch| ch == '\'' || ch == '"');
        let value: usize = value
            .trim()
            .parse()
            .map_err(|_| Error::FormatLine(format!("count for '{key}' is not a number")))?;

        let slot = match key {
            LABEL_TOTAL => &mut total,
            LABEL_COMPLETED => &mut completed,
            LABEL_INCOMPLETE => &mut incomplete,
            LABEL_OVERDUE => &mut overdue,
            other => {
                return Err(Error::FormatLine(format!(
                    "unknown task overview label '{other}'"
                )))
            }
        };
        *slot = Some(value);
    }

    let missing = |label: &str| Error::FormatLine(format!("task overview is missing '{label}'"));
    Ok(TaskOverview {
        total: total.ok_or_else(|| missing(LABEL_TOTAL))?,
        completed: completed.ok_or_else(|| missing(LABEL_COMPLETED))?,
        incomplete: incomplete.ok_or_else(|| missing(LABEL_INCOMPLETE))?,
        overdue: overdue.ok_or_else(|| missing(LABEL_OVERDUE))?,
    })
}

/// Render the user overview as labeled text blocks, one per user.
pub fn render_user_overview(overview: &UserOverview) -> String {
    let mut out = String::from("User Overview\n\n");
    out.push_str(&format!("Total number of users: {}\n", overview.total_users));
    out.push_str(&format!("Total number of tasks: {}\n\n", overview.total_tasks));

    for user in &overview.users {
        out.push_str(&format!("User: {}\n", user.username));
        out.push_str(&format!(
            "Total number of tasks assigned: {}\n",
            user.assigned
        ));
        match user.share_of_total {
            Some(pct) => out.push_str(&format!(
                "Percentage of total tasks assigned: {pct:.2}%\n"
            )),
            None => out.push_str(&format!("{NO_TASKS}\n")),
        }
        out.push_str(&format!(
            "Percentage of completed tasks: {:.2}%\n",
            user.completed_pct
        ));
        match (user.incomplete_pct, user.overdue_pct) {
            (Some(incomplete), Some(overdue)) => {
                out.push_str(&format!(
                    "Percentage of incomplete tasks: {incomplete:.2}%\n"
                ));
                out.push_str(&format!("Percentage of overdue tasks: {overdue:.2}%\n\n"));
            }
            _ => out.push_str(&format!("{NO_TASKS}\n\n")),
        }
    }

    out
}

/// Writes and reads the two report files
#[derive(Debug, Clone)]
pub struct ReportWriter {
    task_overview_path: PathBuf,
    user_overview_path: PathBuf,
}

impl ReportWriter {
    pub fn new(task_overview_path: impl Into<PathBuf>, user_overview_path: impl Into<PathBuf>) -> Self {
        Self {
            task_overview_path: task_overview_path.into(),
            user_overview_path: user_overview_path.into(),
        }
    }

    pub fn task_overview_path(&self) -> &Path {
        &self.task_overview_path
    }

    pub fn user_overview_path(&self) -> &Path {
        &self.user_overview_path
    }

    /// Compute both overviews and overwrite the report files.
    pub fn generate(
        &self,
        tasks: &[TaskRecord],
        users: &Credentials,
        now: NaiveDateTime,
    ) -> Result<(TaskOverview, UserOverview)> {
        let tasks_report = task_overview(tasks, now);
        let users_report = user_overview(tasks, users, now);

        write_report(&self.task_overview_path, &render_task_overview(&tasks_report))?;
        write_report(&self.user_overview_path, &render_user_overview(&users_report))?;

        tracing::info!(
            task_overview = %self.task_overview_path.display(),
            user_overview = %self.user_overview_path.display(),
            "reports generated"
        );
        Ok((tasks_report, users_report))
    }

    /// Read the report files, generating them first if either is missing.
    pub fn display(
        &self,
        tasks: &[TaskRecord],
        users: &Credentials,
        now: NaiveDateTime,
    ) -> Result<Statistics> {
        if !self.task_overview_path.exists() || !self.user_overview_path.exists() {
            tracing::debug!("report files missing; generating");
            self.generate(tasks, users, now)?;
        }

        let task_text = read_report(&self.task_overview_path)?;
        let tasks_report = parse_task_overview(&task_text)
            .map_err(|err| err.at_line(&self.task_overview_path, 1))?;
        let user_report = read_report(&self.user_overview_path)?;

        Ok(Statistics {
            tasks: tasks_report,
            user_report,
        })
    }
}

fn write_report(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

fn read_report(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
        _ => err.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::Credential;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(12, 0, 0).expect("valid time")
    }

    fn task(user: &str, due: NaiveDate, completed: bool) -> TaskRecord {
        let mut record = TaskRecord::new(user, "T", "d", due, date(1999, 1, 1));
        record.completed = completed;
        record
    }

    fn users(names: &[&str]) -> Credentials {
        Credentials::from_entries(
            names
                .iter()
                .map(|name| Credential {
                    username: name.to_string(),
                    password: "password".to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn task_overview_of_nothing_is_zero() {
        assert_eq!(task_overview(&[], noon(2024, 1, 1)), TaskOverview::default());
    }

    #[test]
    fn task_overview_counts_overdue_open_tasks() {
        let tasks = vec![
            task("alice", date(2099, 1, 1), false),
            task("bob", date(2000, 1, 1), false),
        ];
        assert_eq!(
            task_overview(&tasks, noon(2024, 6, 1)),
            TaskOverview {
                total: 2,
                completed: 0,
                incomplete: 2,
                overdue: 1,
            }
        );
    }

    #[test]
    fn completed_tasks_are_never_overdue() {
        let tasks = vec![task("bob", date(2000, 1, 1), true)];
        let overview = task_overview(&tasks, noon(2024, 6, 1));
        assert_eq!(overview.completed, 1);
        assert_eq!(overview.overdue, 0);
    }

    #[test]
    fn due_today_is_overdue_once_the_day_has_started() {
        let tasks = vec![task("bob", date(2024, 6, 1), false)];
        let midnight = date(2024, 6, 1).and_time(NaiveTime::MIN);
        assert_eq!(task_overview(&tasks, midnight).overdue, 0);
        assert_eq!(task_overview(&tasks, noon(2024, 6, 1)).overdue, 1);
    }

    #[test]
    fn user_overview_computes_percentages() {
        let tasks = vec![
            task("alice", date(2000, 1, 1), false),
            task("alice", date(2099, 1, 1), false),
            task("alice", date(2099, 1, 1), false),
            task("alice", date(2099, 1, 1), true),
            task("bob", date(2099, 1, 1), true),
        ];
        let overview = user_overview(&tasks, &users(&["alice", "bob"]), noon(2024, 6, 1));
        assert_eq!(overview.total_users, 2);
        assert_eq!(overview.total_tasks, 5);

        let alice = &overview.users[0];
        assert_eq!(alice.assigned, 4);
        assert_eq!(alice.completed, 1);
        assert_eq!(alice.incomplete, 3);
        assert_eq!(alice.overdue, 1);
        assert_eq!(alice.share_of_total, Some(80.0));
        let completed_pct = alice.completed_pct;
        assert!((completed_pct - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(alice.incomplete_pct, Some(75.0));
        assert_eq!(alice.overdue_pct, Some(25.0));

        let bob = &overview.users[1];
        assert_eq!(bob.completed_pct, 0.0);
        assert_eq!(bob.incomplete_pct, Some(0.0));
    }

    #[test]
    fn user_without_tasks_renders_notice() {
        let tasks = vec![task("alice", date(2099, 1, 1), false)];
        let overview = user_overview(&tasks, &users(&["alice", "carol"]), noon(2024, 6, 1));
        let carol = &overview.users[1];
        assert_eq!(carol.assigned, 0);
        assert_eq!(carol.share_of_total, Some(0.0));
        assert_eq!(carol.incomplete_pct, None);
        assert_eq!(carol.overdue_pct, None);

        let text = render_user_overview(&overview);
        let carol_block = text.split("User: carol").nth(1).expect("carol block");
        assert!(carol_block.contains("Total number of tasks assigned: 0"));
        assert!(carol_block.contains("No tasks available."));
        assert!(!carol_block.contains("Percentage of incomplete tasks"));
    }

    #[test]
    fn empty_system_renders_notice_for_share() {
        let overview = user_overview(&[], &users(&["admin"]), noon(2024, 6, 1));
        let text = render_user_overview(&overview);
        assert_eq!(
            text,
            "User Overview\n\n\
             Total number of users: 1\n\
             Total number of tasks: 0\n\n\
             User: admin\n\
             Total number of tasks assigned: 0\n\
             No tasks available.\n\
             Percentage of completed tasks: 0.00%\n\
             No tasks available.\n\n"
        );
    }

    #[test]
    fn task_overview_renders_mapping_literal() {
        let overview = TaskOverview {
            total: 2,
            completed: 0,
            incomplete: 2,
            overdue: 1,
        };
        let text = render_task_overview(&overview);
        assert_eq!(
            text,
            "{'Total number of tasks': 2, 'Total number of completed tasks': 0, \
             'Total number of incomplete tasks': 2, 'Total number of overdue tasks': 1}"
        );
        assert_eq!(parse_task_overview(&text).expect("parse"), overview);
    }

    #[test]
    fn parse_task_overview_rejects_garbage() {
        assert!(parse_task_overview("not a mapping").is_err());
        assert!(parse_task_overview("{'Total number of tasks': 1}").is_err());
        assert!(parse_task_overview("{'Total number of tasks': x}").is_err());
        assert!(parse_task_overview("{'Unknown': 1}").is_err());
    }

    #[test]
    fn display_generates_missing_reports() {
        let dir = tempdir().expect("tempdir");
        let writer = ReportWriter::new(
            dir.path().join("task_overview.txt"),
            dir.path().join("user_overview.txt"),
        );
        let tasks = vec![task("alice", date(2000, 1, 1), false)];

        let stats = writer
            .display(&tasks, &users(&["alice"]), noon(2024, 6, 1))
            .expect("display");
        assert_eq!(stats.tasks.total, 1);
        assert_eq!(stats.tasks.overdue, 1);
        assert!(stats.user_report.starts_with("User Overview"));
        assert!(writer.task_overview_path().exists());
        assert!(writer.user_overview_path().exists());
    }

    #[test]
    fn display_reads_existing_reports_as_is() {
        let dir = tempdir().expect("tempdir");
        let writer = ReportWriter::new(
            dir.path().join("task_overview.txt"),
            dir.path().join("user_overview.txt"),
        );
        let alice = users(&["alice"]);
        writer
            .generate(&[], &alice, noon(2024, 6, 1))
            .expect("generate");

        let tasks = vec![task("alice", date(2099, 1, 1), false)];
        let stats = writer
            .display(&tasks, &alice, noon(2024, 6, 1))
            .expect("display");
        assert_eq!(stats.tasks.total, 0);
    }
}
