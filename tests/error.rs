use std::path::PathBuf;

use serde_json::Value;
use taskmgr::error::{exit_codes, Error, JsonError};

#[test]
fn exit_code_user_error() {
    let err = Error::Validation("Due date must be in the future.".to_string());
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
}

#[test]
fn exit_code_state_blocked() {
    let err = Error::State("Completed tasks cannot be edited.".to_string());
    assert_eq!(err.exit_code(), exit_codes::STATE_BLOCKED);
}

#[test]
fn exit_code_operation_failed() {
    let err = Error::Format {
        path: PathBuf::from("tasks.txt"),
        line: 3,
        reason: "expected 6 fields, found 2".to_string(),
    };
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn details_include_format_position() {
    let err = Error::FormatLine("bad date".to_string()).at_line("tasks.txt", 7);
    let details = err.details().expect("details");
    assert_eq!(details["path"], Value::String("tasks.txt".to_string()));
    assert_eq!(details["line"], Value::from(7));
    assert_eq!(details["reason"], Value::String("bad date".to_string()));
}

#[test]
fn json_error_includes_details() {
    let err = Error::TaskNotFound {
        username: "alice".to_string(),
        title: "Write report".to_string(),
    };
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::USER_ERROR);
    let details = json.details.expect("details");
    assert_eq!(details["username"], Value::String("alice".to_string()));
    assert_eq!(details["title"], Value::String("Write report".to_string()));
}

#[test]
fn json_error_kind_follows_exit_code() {
    let err = Error::Validation("Wrong password".to_string());
    let json = JsonError::from(&err);
    assert_eq!(json.kind, "user_error");
    assert_eq!(json.message, "Wrong password");
}
