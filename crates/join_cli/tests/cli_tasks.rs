use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("join-{nanos}-{file_name}"))
}

fn run(store_path: &Path, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_join_cli");
    Command::new(exe)
        .args(args)
        .env("JOIN_STORE_PATH", store_path)
        .env("JOIN_CONFIG_PATH", store_path.with_extension("config.json"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run join_cli")
}

fn add_task(store_path: &Path, title: &str, column: &str) -> Output {
    run(
        store_path,
        &[
            "add",
            "--title",
            title,
            "--description",
            "some details",
            "--due",
            "2025-12-20",
            "--category",
            "development",
            "--column",
            column,
        ],
    )
}

fn stored_tasks(store_path: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(store_path).unwrap();
    let mirror: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(mirror["schema_version"], 1);
    mirror["items"]["tasks"].clone()
}

#[test]
fn add_command_persists_task_in_column() {
    let store_path = temp_path("cli-add.json");

    let output = add_task(&store_path, "fix LOGIN", "await feedback");
    let tasks = stored_tasks(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Task 1 added to Await feedback"));
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["title"], "Fix login");
    assert_eq!(tasks[0]["progress"], 2);
    assert_eq!(tasks[0]["priority"], "Low");
    assert_eq!(tasks[0]["category"], "Development");
}

#[test]
fn add_command_reports_missing_fields_without_writing() {
    let store_path = temp_path("cli-add-missing.json");

    let output = run(&store_path, &["add", "--title", "only a title"]);

    assert!(!output.status.success());
    assert!(!store_path.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
    assert!(stderr.contains("description"));
    assert!(stderr.contains("due date"));
    assert!(stderr.contains("category"));
}

#[test]
fn add_command_rejects_category_outside_fixed_list() {
    let store_path = temp_path("cli-add-category.json");

    let output = run(
        &store_path,
        &[
            "add",
            "--json",
            "--title",
            "x",
            "--description",
            "y",
            "--due",
            "2025-01-01",
            "--category",
            "Gardening",
        ],
    );

    assert!(!output.status.success());
    assert!(!store_path.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
    assert!(stderr.contains("category"));
}

#[test]
fn add_command_refuses_short_subtask() {
    let store_path = temp_path("cli-add-subtask.json");

    let output = run(
        &store_path,
        &[
            "add",
            "--title",
            "t",
            "--description",
            "d",
            "--due",
            "2025-01-01",
            "--category",
            "Sales",
            "--add-subtask",
            "abc",
        ],
    );

    assert!(!output.status.success());
    assert!(!store_path.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Please enter a subtask!"));
}

#[test]
fn add_command_prints_json_task() {
    let store_path = temp_path("cli-add-json.json");

    let output = run(
        &store_path,
        &[
            "add",
            "--json",
            "--title",
            "json task",
            "--description",
            "d",
            "--due",
            "2025-01-01",
            "--category",
            "Media",
            "--priority",
            "urgent",
        ],
    );
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let task: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(task["id"], 1);
    assert_eq!(task["priority"], "Urgent");
    assert_eq!(task["progress"], 0);
    assert_eq!(task["dueDate"], "2025-01-01");
}

#[test]
fn move_is_idempotent() {
    let store_path = temp_path("cli-move.json");
    add_task(&store_path, "movable", "todo");

    let first = run(&store_path, &["move", "1", "done"]);
    let second = run(&store_path, &["move", "1", "done"]);
    let tasks = stored_tasks(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(first.status.success());
    assert!(String::from_utf8_lossy(&first.stdout).contains("Task 1 moved to Done"));
    assert!(second.status.success());
    assert!(String::from_utf8_lossy(&second.stdout).contains("Task 1 already in Done"));
    assert_eq!(tasks[0]["progress"], 3);
}

#[test]
fn drag_requires_hold_to_move() {
    let store_path = temp_path("cli-drag.json");
    add_task(&store_path, "draggable", "todo");

    let click = run(&store_path, &["drag", "1", "--hold-ms", "120", "--over", "done"]);
    let after_click = stored_tasks(&store_path);
    let drag = run(&store_path, &["drag", "1", "--hold-ms", "700", "--over", "in-progress"]);
    let after_drag = stored_tasks(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(click.status.success());
    assert!(String::from_utf8_lossy(&click.stdout).contains("Task 1: Draggable"));
    assert_eq!(after_click[0]["progress"], 0);
    assert!(drag.status.success());
    assert!(String::from_utf8_lossy(&drag.stdout).contains("moved to In progress"));
    assert_eq!(after_drag[0]["progress"], 1);
}

#[test]
fn menu_lists_other_columns() {
    let store_path = temp_path("cli-menu.json");
    add_task(&store_path, "menu", "in progress");

    let output = run(&store_path, &["menu", "1", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let labels: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(labels, vec!["To do", "Await feedback", "Done"]);
}

#[test]
fn menu_selection_moves_task() {
    let store_path = temp_path("cli-menu-select.json");
    add_task(&store_path, "menu", "todo");

    let output = run(&store_path, &["menu", "1", "--select", "await feedback"]);
    let tasks = stored_tasks(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Task 1 moved to Await feedback"));
    assert_eq!(tasks[0]["progress"], 2);
}

#[test]
fn menu_selection_rejects_current_column() {
    let store_path = temp_path("cli-menu-current.json");
    add_task(&store_path, "menu", "done");

    let output = run(&store_path, &["menu", "1", "--select", "done"]);
    let tasks = stored_tasks(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - task is already in Done"));
    assert_eq!(tasks[0]["progress"], 3);
}

#[test]
fn armed_drag_lists_drop_targets() {
    let store_path = temp_path("cli-drag-targets.json");
    add_task(&store_path, "draggable", "todo");

    let output = run(&store_path, &["drag", "1", "--hold-ms", "500", "--over", "done"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Drop targets: To do, In progress, Await feedback, Done"));
    assert!(stdout.contains("Task 1 moved to Done"));
}

#[test]
fn drag_leaving_card_changes_nothing() {
    let store_path = temp_path("cli-drag-leave.json");
    add_task(&store_path, "draggable", "todo");

    let output = run(
        &store_path,
        &["drag", "1", "--hold-ms", "900", "--over", "done", "--leave"],
    );
    let tasks = stored_tasks(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Drag cancelled"));
    assert!(!stdout.contains("Task 1:"));
    assert_eq!(tasks[0]["progress"], 0);
}

#[test]
fn edit_and_toggle_subtasks() {
    let store_path = temp_path("cli-edit.json");
    add_task(&store_path, "editable", "todo");

    let edit = run(
        &store_path,
        &[
            "edit",
            "1",
            "--priority",
            "medium",
            "--add-subtask",
            "write tests",
            "--add-subtask",
            "review code",
        ],
    );
    let toggle = run(&store_path, &["toggle-subtask", "1", "2"]);
    let show = run(&store_path, &["show", "1"]);
    let tasks = stored_tasks(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(edit.status.success());
    assert!(toggle.status.success());
    assert!(String::from_utf8_lossy(&toggle.stdout).contains("marked done"));
    let detail = String::from_utf8_lossy(&show.stdout);
    assert!(detail.contains("[ ] 1 Write tests"));
    assert!(detail.contains("[x] 2 Review code"));
    assert!(detail.contains("No contacts added"));
    assert_eq!(tasks[0]["priority"], "Medium");
    assert_eq!(tasks[0]["subtasks"][1]["progress"], true);
}

#[test]
fn delete_removes_only_matching_task() {
    let store_path = temp_path("cli-delete.json");
    add_task(&store_path, "first", "todo");
    add_task(&store_path, "second", "done");

    let output = run(&store_path, &["delete", "1"]);
    let missing = run(&store_path, &["delete", "1"]);
    let tasks = stored_tasks(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("ERROR: not_found"));
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["title"], "Second");
}
