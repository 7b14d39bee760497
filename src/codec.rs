//! Line codec for persisted task records.
//!
//! One task per line:
//!
//! ```text
//! username;title;description;due_date;assigned_date;completed
//! ```
//!
//! Dates use `YYYY-MM-DD`; `completed` is the literal `Yes` or `No`.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::task::TaskRecord;

pub const DELIMITER: char = ';';
pub const DATE_FORMAT: &str = "%Y-%m-%d";
const FIELD_COUNT: usize = 6;
const COMPLETED_YES: &str = "Yes";
const COMPLETED_NO: &str = "No";

/// Decode a single persisted line.
pub fn parse(line: &str) -> Result<TaskRecord> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() != FIELD_COUNT {
        return Err(Error::FormatLine(format!(
            "expected {FIELD_COUNT} fields, found {}",
            fields.len()
        )));
    }

    Ok(TaskRecord {
        username: fields[0].to_string(),
        title: fields[1].to_string(),
        description: fields[2].to_string(),
        due_date: parse_date_field("due date", fields[3])?,
        assigned_date: parse_date_field("assigned date", fields[4])?,
        completed: parse_completed(fields[5])?,
    })
}

/// Encode a record as a single line, without the trailing newline.
pub fn serialize(record: &TaskRecord) -> String {
    [
        record.username.as_str(),
        record.title.as_str(),
        record.description.as_str(),
        &format_date(record.due_date),
        &format_date(record.assigned_date),
        completed_flag(record.completed),
    ]
    .join(&DELIMITER.to_string())
}

/// Parse a `YYYY-MM-DD` date as entered by a user.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        Error::Validation(format!(
            "Invalid date '{}': expected YYYY-MM-DD",
            value.trim()
        ))
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn completed_flag(completed: bool) -> &'static str {
    if completed {
        COMPLETED_YES
    } else {
        COMPLETED_NO
    }
}

/// Reject values that would break the line format.
pub fn validate_field(name: &str, value: &str) -> Result<()> {
    if value.contains(DELIMITER) {
        return Err(Error::Validation(format!(
            "{name} cannot contain '{DELIMITER}'"
        )));
    }
    if value.contains(['\n', '\r']) {
        return Err(Error::Validation(format!(
            "{name} cannot contain line breaks"
        )));
    }
    Ok(())
}

fn parse_date_field(name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|err| Error::FormatLine(format!("invalid {name} '{value}': {err}")))
}

fn parse_completed(value: &str) -> Result<bool> {
    match value {
        COMPLETED_YES => Ok(true),
        COMPLETED_NO => Ok(false),
        other => Err(Error::FormatLine(format!(
            "completed flag must be Yes or No, found '{other}'"
        ))),
    }
}
