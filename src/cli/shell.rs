//! Interactive login and menu loop.
//!
//! Reads answers line by line from any `BufRead` and writes prompts to any
//! `Write`, so scripted sessions can drive it. Any failure inside a menu
//! action is reported and the menu comes back; only a broken terminal or end
//! of input ends the session.

use std::io::{BufRead, ErrorKind, Write};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::cli::report::task_count_lines;
use crate::cli::task::{format_my_task, format_task_block};
use crate::codec;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::ops::{NewTask, TaskEdit};
use crate::session::Session;

const MENU: &str = "
Please select one of the following options:
r - Register a new user
a - Add a new task
va - View all tasks
vm - View my tasks
gr - Generate reports
ds - Display statistics
e - Exit";

struct Prompter<R, W> {
    input: R,
    output: W,
}

/// Why a menu action stopped early.
///
/// `Terminal` failures come from the prompter itself and end the shell.
/// `Action` failures are reported and the menu comes back.
#[derive(Debug)]
enum Interrupt {
    Terminal(std::io::Error),
    Action(Error),
}

impl From<std::io::Error> for Interrupt {
    fn from(err: std::io::Error) -> Self {
        Interrupt::Terminal(err)
    }
}

impl From<Error> for Interrupt {
    fn from(err: Error) -> Self {
        Interrupt::Action(err)
    }
}

type Step<T = ()> = std::result::Result<T, Interrupt>;

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn say(&mut self, text: &str) -> std::io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Prompt and read one line without its line ending.
    fn ask(&mut self, prompt: &str) -> std::io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(std::io::Error::new(ErrorKind::UnexpectedEof, "end of input"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Run the interactive shell until the user exits or input runs out.
pub fn run_shell<R, W, C>(config: &Config, dir: &Path, input: R, output: W, clock: C) -> Result<()>
where
    R: BufRead,
    W: Write,
    C: Fn() -> NaiveDateTime,
{
    let mut io = Prompter { input, output };

    let mut session = match login(&mut io, config, dir) {
        Ok(session) => session,
        Err(Interrupt::Terminal(err)) if err.kind() == ErrorKind::UnexpectedEof => return Ok(()),
        Err(Interrupt::Terminal(err)) => return Err(err.into()),
        Err(Interrupt::Action(err)) => return Err(err),
    };

    loop {
        io.say(MENU)?;
        let choice = match io.ask("Enter your choice: ") {
            Ok(choice) => choice.trim().to_lowercase(),
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => return Ok(()),
            Err(err) => return Err(err.into()),
        };

        let result = match choice.as_str() {
            "r" => register(&mut io, &mut session),
            "a" => add_task(&mut io, &mut session, clock().date()),
            "va" => view_all(&mut io, &mut session),
            "vm" => view_mine(&mut io, &mut session),
            "gr" => generate_reports(&mut io, &session, clock()),
            "ds" => display_statistics(&mut io, &session, clock()),
            "e" => match session.save() {
                Ok(()) => {
                    io.say("Goodbye!!!")?;
                    tracing::info!(user = %session.user(), "session closed");
                    return Ok(());
                }
                Err(err) => Err(Interrupt::Action(err)),
            },
            _ => io.say("Invalid choice. Please try again.").map_err(Interrupt::from),
        };

        match result {
            Ok(()) => {}
            Err(Interrupt::Terminal(err)) if err.kind() == ErrorKind::UnexpectedEof => return Ok(()),
            Err(Interrupt::Terminal(err)) => return Err(err.into()),
            Err(Interrupt::Action(err)) => {
                tracing::debug!(%err, choice = %choice, "menu action failed");
                io.say(&format!("Error: {err}"))?;
            }
        }
    }
}

fn login<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    config: &Config,
    dir: &Path,
) -> Step<Session> {
    loop {
        io.say("LOGIN")?;
        let username = io.ask("Username: ")?;
        let password = io.ask("Password: ")?;
        match Session::login(config, dir, &username, &password) {
            Ok(session) => {
                io.say("Login Successful!")?;
                return Ok(session);
            }
            Err(Error::Validation(message)) => io.say(&message)?,
            Err(err) => return Err(err.into()),
        }
    }
}

fn register<R: BufRead, W: Write>(io: &mut Prompter<R, W>, session: &mut Session) -> Step {
    let username = io.ask("New Username: ")?;
    let password = io.ask("New Password: ")?;
    let confirm = io.ask("Confirm Password: ")?;
    session.register(&username, &password, &confirm)?;
    Ok(io.say(&format!("New user '{username}' successfully added."))?)
}

fn add_task<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &mut Session,
    today: NaiveDate,
) -> Step {
    let assignee = io.ask("Name of person assigned to task: ")?;
    if !session.credentials().contains(&assignee) {
        return Err(Error::Validation(
            "User does not exist. Please enter a valid username.".to_string(),
        )
        .into());
    }
    let title = io.ask("Title of Task: ")?;
    let description = io.ask("Description of Task: ")?;

    let due_date = loop {
        let raw = io.ask("Due date of task (YYYY-MM-DD): ")?;
        match codec::parse_date(&raw) {
            Ok(date) if date < today => io.say("Due date must be in the future.")?,
            Ok(date) => break date,
            Err(err) => io.say(&err.to_string())?,
        }
    };

    session.add_task(
        NewTask {
            assignee,
            title,
            description,
            due_date,
        },
        today,
    )?;
    Ok(io.say("Task successfully added.")?)
}

fn view_all<R: BufRead, W: Write>(io: &mut Prompter<R, W>, session: &mut Session) -> Step {
    let tasks = session.reload()?;
    if tasks.is_empty() {
        return Ok(io.say("No tasks available.")?);
    }

    let blocks: Vec<String> = tasks
        .iter()
        .enumerate()
        .map(|(index, task)| format_task_block(index + 1, task))
        .collect();
    io.say("All Tasks:\n")?;
    for block in blocks {
        io.say(&block)?;
    }
    Ok(())
}

fn view_mine<R: BufRead, W: Write>(io: &mut Prompter<R, W>, session: &mut Session) -> Step {
    let listing: Vec<(String, bool)> = session
        .my_tasks()
        .iter()
        .enumerate()
        .map(|(index, task)| (format_my_task(index + 1, task), task.completed))
        .collect();
    if listing.is_empty() {
        return Ok(io.say("No tasks assigned to you.")?);
    }

    io.say("Tasks assigned to you:")?;
    for (block, _) in &listing {
        io.say(block)?;
        io.say("")?;
    }

    let number = loop {
        let raw = io.ask(
            "Enter the number of the task you want to select (or type '-1' to return to the main menu): ",
        )?;
        match raw.trim().parse::<i64>() {
            Ok(-1) => return Ok(()),
            Ok(n) if n >= 1 && (n as usize) <= listing.len() => break n as usize,
            _ => io.say("Invalid input. Please enter a valid task number.")?,
        }
    };

    let action =
        io.ask("Do you want to (1) mark the task as complete or (2) edit the task? (enter '1' or '2'): ")?;
    match action.trim() {
        "1" => {
            let (_, matched) = session.mark_complete(number)?;
            if matched {
                Ok(io.say("Task marked as complete.")?)
            } else {
                Ok(io.say("No matching task found.")?)
            }
        }
        "2" => {
            if listing[number - 1].1 {
                return Ok(io.say("Completed tasks cannot be edited.")?);
            }
            let username = io.ask("Enter new username (leave blank to keep current): ")?;
            let due = io.ask("Enter new due date (YYYY-MM-DD) (leave blank to keep current): ")?;
            let edit = TaskEdit {
                username: Some(username).filter(|value| !value.is_empty()),
                due_date: if due.trim().is_empty() {
                    None
                } else {
                    Some(codec::parse_date(&due)?)
                },
            };
            if edit.is_empty() {
                return Ok(io.say("Nothing changed.")?);
            }
            session.edit_task(number, edit)?;
            Ok(io.say("Task edited successfully.")?)
        }
        _ => Ok(io.say("Invalid choice.")?),
    }
}

fn generate_reports<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &Session,
    now: NaiveDateTime,
) -> Step {
    session.generate_reports(now)?;
    io.say("Task overview report generated successfully.")?;
    Ok(io.say("User overview report generated successfully.")?)
}

fn display_statistics<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &Session,
    now: NaiveDateTime,
) -> Step {
    let stats = session.display_statistics(now)?;
    io.say("\nTask Statistics:")?;
    for (label, count) in task_count_lines(&stats.tasks) {
        io.say(&format!("{label}: {count}"))?;
    }
    io.say("\nUser Statistics:")?;
    Ok(io.say(&stats.user_report)?)
}
