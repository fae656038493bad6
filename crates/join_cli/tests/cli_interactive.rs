use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("join-{nanos}-{file_name}"))
}

fn run_interactive(input: &str) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_join_cli");
    let store_path = temp_path("cli-interactive.json");

    let mut child = Command::new(exe)
        .env("JOIN_STORE_PATH", &store_path)
        .env("JOIN_CONFIG_PATH", store_path.with_extension("config.json"))
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn interactive session");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(input.as_bytes())
            .expect("failed to write to stdin");
    }

    let output = child
        .wait_with_output()
        .expect("failed to read interactive output");

    std::fs::remove_file(&store_path).ok();
    output
}

#[test]
fn interactive_help_shows_usage() {
    let output = run_interactive("help\nexit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage") || stdout.contains("USAGE"));
}

#[test]
fn interactive_invalid_command_prints_error_and_continues() {
    let output = run_interactive("nope\ncategories\nexit\n");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Backoffice"));
}

#[test]
fn interactive_add_rerenders_board() {
    let output = run_interactive(
        "add --title \"demo task\" --description \"d\" --due 2025-01-01 --category Sales\nquit\n",
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Task 1 added to To do"));
    assert!(stdout.contains("Demo task"));
    assert!(stdout.contains("No tasks done"));
}

#[test]
fn interactive_toggle_rerenders_only_its_column() {
    let output = run_interactive(
        "add --title t --description d --due 2025-01-01 --category Sales --add-subtask \"first step\" --column done\ntoggle-subtask 1 1\nexit\n",
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let after_toggle = stdout.split("marked done").nth(1).unwrap();
    assert!(after_toggle.contains("1/1 (100%)"));
    assert!(!after_toggle.contains("No tasks to do"));
}

#[test]
fn interactive_unterminated_quote_is_reported() {
    let output = run_interactive("add --title \"broken\nexit\n");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unterminated quote"));
}
