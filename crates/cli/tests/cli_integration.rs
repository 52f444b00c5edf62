use std::process::Command;

fn jira_rest() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jira-rest"))
}

#[test]
fn test_cli_version() {
    let output = jira_rest()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("jira-rest"));
    assert!(stdout.contains("0.1."));
}

#[test]
fn test_cli_help() {
    let output = jira_rest()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    for command in ["get", "create", "edit", "delete", "assign", "comments", "search", "profile"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn test_search_help() {
    let output = jira_rest()
        .args(["search", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--jql"));
    assert!(stdout.contains("--limit"));
}

#[test]
fn test_missing_profile_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yaml");

    let output = jira_rest()
        .args(["--config", config.to_str().unwrap(), "get", "JIRA-1"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No profile configured"));
}

#[test]
fn test_assign_requires_a_user() {
    let output = jira_rest()
        .args(["assign", "JIRA-1"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_profile_set_then_list() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yaml");
    let config = config.to_str().unwrap();

    let output = jira_rest()
        .args(["--config", config, "profile", "set", "work"])
        .args(["--base-url", "https://jira.example.com", "--username", "foo"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let output = jira_rest()
        .args(["--config", config, "--output", "quiet", "profile", "list"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "work");
}
