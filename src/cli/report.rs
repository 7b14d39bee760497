//! taskmgr report and stats command implementations.

use crate::cli::{local_now, Login};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::report::{TaskOverview, UserOverview};

pub struct ReportOptions {
    pub login: Login,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct GenerateOutput {
    task_overview_file: std::path::PathBuf,
    user_overview_file: std::path::PathBuf,
    tasks: TaskOverview,
    users: UserOverview,
}

pub fn run_generate(options: ReportOptions) -> Result<()> {
    let session = options.login.open()?;
    let (tasks, users) = session.generate_reports(local_now())?;
    let (task_overview_file, user_overview_file) = session.report_paths();

    let mut human = HumanOutput::new("Reports generated successfully.");
    human.push_summary("Task overview", task_overview_file.display().to_string());
    human.push_summary("User overview", user_overview_file.display().to_string());
    push_task_counts(&mut human, &tasks);
    human.push_next_step("taskmgr stats");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "report",
        &GenerateOutput {
            task_overview_file,
            user_overview_file,
            tasks,
            users,
        },
        Some(&human),
    )
}

pub fn run_stats(options: ReportOptions) -> Result<()> {
    let session = options.login.open()?;
    let stats = session.display_statistics(local_now())?;

    let mut human = HumanOutput::new("Task Statistics");
    push_task_counts(&mut human, &stats.tasks);
    for line in stats.user_report.lines().filter(|line| !line.trim().is_empty()) {
        human.push_detail(line);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "stats",
        &stats,
        Some(&human),
    )
}

pub(crate) fn task_count_lines(overview: &TaskOverview) -> [(&'static str, usize); 4] {
    [
        ("Total number of tasks", overview.total),
        ("Total number of completed tasks", overview.completed),
        ("Total number of incomplete tasks", overview.incomplete),
        ("Total number of overdue tasks", overview.overdue),
    ]
}

fn push_task_counts(human: &mut HumanOutput, overview: &TaskOverview) {
    for (label, count) in task_count_lines(overview) {
        human.push_summary(label, count.to_string());
    }
}
