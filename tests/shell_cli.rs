mod support;

use predicates::str::contains;

use support::TestDir;

#[test]
fn shell_runs_menu_session_from_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TestDir::new();
    let script = "admin\npassword\n\
                  r\nalice\nsecret1\nsecret1\n\
                  a\nalice\nPlan sprint\nbacklog grooming\n2099-03-01\n\
                  va\n\
                  gr\n\
                  e\n";

    dir.cmd()
        .arg("shell")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Login Successful!"))
        .stdout(contains("New user 'alice' successfully added."))
        .stdout(contains("Task successfully added."))
        .stdout(contains("Assigned to:       alice"))
        .stdout(contains("Task overview report generated successfully."))
        .stdout(contains("Goodbye!!!"));

    assert!(dir
        .read_file("tasks.txt")?
        .starts_with("alice;Plan sprint;backlog grooming;2099-03-01;"));
    assert!(dir.read_file("user_overview.txt")?.contains("User: alice"));
    Ok(())
}

#[test]
fn shell_exits_cleanly_on_end_of_input() {
    let dir = TestDir::new();
    dir.cmd()
        .arg("shell")
        .write_stdin("admin\nwrong\n")
        .assert()
        .success()
        .stdout(contains("Wrong password"));
}
