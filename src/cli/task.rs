//! taskmgr task command implementations.

use crate::cli::{local_now, Login};
use crate::codec::{self, completed_flag, format_date};
use crate::error::{Error, Result};
use crate::ops::{NewTask, TaskEdit};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::TaskRecord;

pub struct AddOptions {
    pub assignee: String,
    pub title: String,
    pub description: String,
    pub due: String,
    pub login: Login,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub mine: bool,
    pub login: Login,
    pub json: bool,
    pub quiet: bool,
}

pub struct CompleteOptions {
    pub number: usize,
    pub login: Login,
    pub json: bool,
    pub quiet: bool,
}

pub struct EditOptions {
    pub number: usize,
    pub assignee: Option<String>,
    pub due: Option<String>,
    pub login: Login,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct TaskListOutput {
    total: usize,
    tasks: Vec<TaskRecord>,
}

#[derive(serde::Serialize)]
struct TaskCompleteOutput {
    username: String,
    title: String,
    matched: bool,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut session = options.login.open()?;
    let due_date = codec::parse_date(&options.due)?;
    let today = local_now().date();

    let task = session
        .add_task(
            NewTask {
                assignee: options.assignee,
                title: options.title,
                description: options.description,
                due_date,
            },
            today,
        )?
        .clone();

    let mut human = HumanOutput::new("Task successfully added.");
    human.push_summary("Title", task.title.clone());
    human.push_summary("Assigned to", task.username.clone());
    human.push_summary("Due", format_date(task.due_date));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "add",
        &task,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let mut session = options.login.open()?;
    let (command, header, tasks): (&str, &str, Vec<TaskRecord>) = if options.mine {
        (
            "mine",
            "Tasks assigned to you",
            session.my_tasks().into_iter().cloned().collect(),
        )
    } else {
        ("list", "All tasks", session.reload()?.to_vec())
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("Total", tasks.len().to_string());
    if tasks.is_empty() {
        human.push_warning(if options.mine {
            "No tasks assigned to you."
        } else {
            "No tasks available."
        });
    }
    for (index, task) in tasks.iter().enumerate() {
        human.push_detail(format_task_line(index + 1, task, !options.mine));
    }
    if options.mine && !tasks.is_empty() {
        human.push_next_step("taskmgr complete <number>");
        human.push_next_step("taskmgr edit <number> --assignee <user> --due <YYYY-MM-DD>");
    }

    let output = TaskListOutput {
        total: tasks.len(),
        tasks,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        command,
        &output,
        Some(&human),
    )
}

pub fn run_complete(options: CompleteOptions) -> Result<()> {
    let mut session = options.login.open()?;
    let (target, matched) = session.mark_complete(options.number)?;

    let header = if matched {
        "Task marked as complete."
    } else {
        "No matching task; nothing changed."
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("Title", target.title.clone());
    human.push_summary("Assigned to", target.username.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "complete",
        &TaskCompleteOutput {
            username: target.username,
            title: target.title,
            matched,
        },
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let edit = TaskEdit {
        username: options.assignee.filter(|value| !value.is_empty()),
        due_date: options
            .due
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(codec::parse_date)
            .transpose()?,
    };
    if edit.is_empty() {
        return Err(Error::Validation(
            "nothing to edit: pass --assignee and/or --due".to_string(),
        ));
    }

    let mut session = options.login.open()?;
    let edited = session.edit_task(options.number, edit)?;

    let mut human = HumanOutput::new("Task edited successfully.");
    human.push_summary("Title", edited.title.clone());
    human.push_summary("Assigned to", edited.username.clone());
    human.push_summary("Due", format_date(edited.due_date));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "edit",
        &edited,
        Some(&human),
    )
}

fn format_task_line(number: usize, task: &TaskRecord, show_assignee: bool) -> String {
    let mut line = format!(
        "{number}. [{}] {} (due {}, assigned {})",
        completed_flag(task.completed),
        task.title,
        format_date(task.due_date),
        format_date(task.assigned_date),
    );
    if show_assignee {
        line.push_str(&format!(" -> {}", task.username));
    }
    line
}

/// Multi-line listing used by "view all" in the interactive shell.
pub(crate) fn format_task_block(number: usize, task: &TaskRecord) -> String {
    [
        "#".repeat(65),
        format!("{number}."),
        format!("Task:              {}", task.title),
        format!("Task Description:  {}", task.description),
        format!("Assigned to:       {}", task.username),
        format!("Due Date:          {}", format_date(task.due_date)),
        format!("Assigned Date:     {}", format_date(task.assigned_date)),
        format!("Task Completed:    {}", completed_flag(task.completed)),
    ]
    .join("\n")
}

/// Per-user listing used by "view mine" in the interactive shell.
pub(crate) fn format_my_task(number: usize, task: &TaskRecord) -> String {
    [
        format!("{number}. Title: {}", task.title),
        format!("   Description: {}", task.description),
        format!("   Due Date: {}", format_date(task.due_date)),
        format!("   Assigned Date: {}", format_date(task.assigned_date)),
        format!("   Completed: {}", completed_flag(task.completed)),
    ]
    .join("\n")
}
