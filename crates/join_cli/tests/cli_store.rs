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

fn run_with_config(store_path: &Path, config_path: &Path, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_join_cli");
    Command::new(exe)
        .args(args)
        .env("JOIN_STORE_PATH", store_path)
        .env("JOIN_CONFIG_PATH", config_path)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run join_cli")
}

#[test]
fn malformed_mirror_is_invalid_data() {
    let store_path = temp_path("cli-malformed.json");
    let config_path = temp_path("cli-malformed-config.json");
    std::fs::write(&store_path, "{ not json").unwrap();

    let output = run_with_config(&store_path, &config_path, &["board"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: invalid_data"));
}

#[test]
fn out_of_range_progress_is_invalid_data() {
    let store_path = temp_path("cli-bad-progress.json");
    let config_path = temp_path("cli-bad-progress-config.json");
    let mirror = serde_json::json!({
        "schema_version": 1,
        "items": {"tasks": [{
            "id": 1, "title": "t", "description": "d", "dueDate": "2025-01-01",
            "category": "Sales", "progress": 7
        }]}
    });
    std::fs::write(&store_path, mirror.to_string()).unwrap();

    let output = run_with_config(&store_path, &config_path, &["board"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: invalid_data"));
}

#[test]
fn sync_without_remote_is_rejected() {
    let store_path = temp_path("cli-sync.json");
    let config_path = temp_path("cli-sync-config.json");

    let output = run_with_config(&store_path, &config_path, &["sync", "pull"]);

    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("ERROR: invalid_input - remote store is not enabled")
    );
}

#[test]
fn invalid_config_warns_and_continues() {
    let store_path = temp_path("cli-config.json");
    let config_path = temp_path("cli-config-bad.json");
    std::fs::write(&config_path, "{ broken").unwrap();

    let output = run_with_config(&store_path, &config_path, &["categories"]);
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("WARNING: invalid_data"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Development"));
}

#[test]
fn unknown_config_override_is_rejected() {
    let store_path = temp_path("cli-override.json");
    let config_path = temp_path("cli-override-config.json");

    let output = run_with_config(
        &store_path,
        &config_path,
        &["categories", "--config-override", "colour=blue"],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown config field 'colour'"));
}

#[test]
fn remote_override_without_endpoint_fails_before_writing() {
    let store_path = temp_path("cli-remote.json");
    let config_path = temp_path("cli-remote-config.json");
    let config = serde_json::json!({"remote": {"enabled": true, "endpoint": "  "}});
    std::fs::write(&config_path, config.to_string()).unwrap();

    let output = run_with_config(&store_path, &config_path, &["contacts", "add", "Anna Berg"]);
    std::fs::remove_file(&config_path).ok();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: invalid_input"));
    assert!(!store_path.exists());
}
