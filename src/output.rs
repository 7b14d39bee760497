//! Human and JSON rendering for taskmgr command results.
//!
//! Every command produces one [`HumanOutput`] plus a serializable payload.
//! With `--json` the payload is wrapped in a versioned envelope on stdout;
//! errors use the same envelope with `"status": "error"`.

use serde::Serialize;

use crate::error::{Error, JsonError, Result};

pub const SCHEMA_VERSION: &str = "taskmgr.v1";

/// Global flags that take a separate value argument
const VALUE_FLAGS: [&str; 4] = ["--dir", "--user", "-u", "--password"];

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Plain-text rendering of a command result
#[derive(Debug, Clone, Default)]
pub struct HumanOutput {
    header: String,
    fields: Vec<(String, String)>,
    lines: Vec<String>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Self::default()
        }
    }

    /// Key/value line shown under the header.
    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    /// Free-form line, printed as-is after the summary.
    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.lines.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    schema_version: &'static str,
    command: &'a str,
    #[serde(flatten)]
    outcome: Outcome<'a>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    next_steps: &'a [String],
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Outcome<'a> {
    Success {
        data: serde_json::Value,
        #[serde(skip_serializing_if = "<[String]>::is_empty")]
        warnings: &'a [String],
    },
    Error {
        error: JsonError,
    },
}

fn print_envelope(envelope: &Envelope<'_>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(())
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let (warnings, next_steps) = human
            .map(|h| (h.warnings.as_slice(), h.next_steps.as_slice()))
            .unwrap_or_default();
        return print_envelope(&Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            outcome: Outcome::Success {
                data: serde_json::to_value(data)?,
                warnings,
            },
            next_steps,
        });
    }

    match human {
        Some(human) if !options.quiet => println!("{}", format_human(human)),
        _ => {}
    }
    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    if json {
        return print_envelope(&Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            outcome: Outcome::Error {
                error: JsonError::from(err),
            },
            next_steps: &next_steps,
        });
    }

    eprintln!("error: {err}");
    if let Some(step) = next_steps.first() {
        eprintln!("hint: {step}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut text = output.header.clone();

    if !output.fields.is_empty() || !output.lines.is_empty() {
        text.push('\n');
    }
    for (key, value) in &output.fields {
        text.push_str(&format!("\n  {key}: {value}"));
    }
    for line in &output.lines {
        text.push_str(&format!("\n  {line}"));
    }

    if !output.warnings.is_empty() || !output.next_steps.is_empty() {
        text.push('\n');
    }
    for warning in &output.warnings {
        text.push_str(&format!("\nwarning: {warning}"));
    }
    for step in &output.next_steps {
        text.push_str(&format!("\nnext: {step}"));
    }

    text
}

pub fn infer_command_name_from_args() -> String {
    command_name_from(std::env::args().skip(1))
}

fn command_name_from(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            args.next();
        } else if !arg.starts_with('-') {
            return arg;
        }
    }
    "taskmgr".to_string()
}

fn error_next_steps(err: &Error) -> Vec<String> {
    match err {
        Error::State(_) | Error::TaskNotFound { .. } => vec!["taskmgr mine".to_string()],
        Error::InvalidConfig(_) => vec!["fix .taskmgr.toml then retry".to_string()],
        Error::Format { path, line, .. } => {
            vec![format!("fix line {line} of {}", path.display())]
        }
        _ => Vec::new(),
    }
}
