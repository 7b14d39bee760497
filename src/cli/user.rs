//! taskmgr register command implementation

use crate::cli::Login;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct RegisterOptions {
    pub username: String,
    pub password: String,
    pub confirm: String,
    pub login: Login,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct RegisterReport {
    username: String,
    total_users: usize,
}

pub fn run_register(options: RegisterOptions) -> Result<()> {
    let mut session = options.login.open()?;
    session.register(&options.username, &options.password, &options.confirm)?;

    let report = RegisterReport {
        username: options.username.clone(),
        total_users: session.credentials().len(),
    };

    let mut human = HumanOutput::new(format!("New user '{}' successfully added.", options.username));
    human.push_summary("Users", report.total_users.to_string());
    human.push_next_step(format!(
        "taskmgr add --assignee {} --title <title> --due <YYYY-MM-DD>",
        options.username
    ));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "register",
        &report,
        Some(&human),
    )
}
