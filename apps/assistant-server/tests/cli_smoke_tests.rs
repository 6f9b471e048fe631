//! CLI smoke tests for the assistant-server binary
//!
//! Help and version output, configuration validation and a real start-up
//! against an in-memory database that answers HTTP requests.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use tempfile::TempDir;
use uuid::Uuid;

fn run_assistant_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_assistant-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute assistant-server")
}

fn write_config(dir: &Path, body: &str) -> String {
    let home = dir.join("home").to_string_lossy().replace('\\', "/");
    let content = format!(
        r#"
server:
  home_dir: "{home}"
  host: "127.0.0.1"
  port: 8000
{body}"#
    );
    let path = dir.join("config.yaml");
    std::fs::write(&path, content).expect("Failed to write config file");
    path.to_string_lossy().to_string()
}

#[test]
fn test_cli_help_command() {
    let output = run_assistant_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_assistant_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("assistant-server 0.1.0"));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_assistant_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report the invalid command: {stderr}");
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_assistant_server(&["-c", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail with missing config");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config file not found"), "{stderr}");
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write file");

    let output = run_assistant_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");
}

#[test]
fn test_cli_check_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        r#"
database:
  url: "sqlite://database/assistant.db"

modules:
  dashboard_stats:
    trace_interactions: true
"#,
    );

    let output = run_assistant_server(&["--config", &config_path, "check"]);

    assert!(
        output.status.success(),
        "Should succeed with valid config: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration check passed"));
    assert!(stdout.contains("127.0.0.1:8000"));
}

#[test]
fn test_cli_check_rejects_bad_module_section() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        r#"
database:
  url: "sqlite::memory:"

modules:
  dashboard_stats:
    trace_everything: true
"#,
    );

    let output = run_assistant_server(&["--config", &config_path, "check"]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_mock_flag_overrides_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        r#"
database:
  url: "postgresql://localhost/nonexistent"
"#,
    );

    let output = run_assistant_server(&["--config", &config_path, "--mock", "--print-config"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sqlite::memory:"), "{stdout}");
    assert!(!stdout.contains("postgresql://"));
}

#[test]
fn test_cli_port_flag_sets_bind_addr() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");

    let output = run_assistant_server(&[
        "--config",
        &config_path,
        "--port",
        "9123",
        "--print-config",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("127.0.0.1:9123"), "{stdout}");
}

fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn test_cli_run_serves_dashboard_with_mock_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let user = Uuid::new_v4();
    let config_path = write_config(
        temp_dir.path(),
        &format!(
            r#"
logging:
  default:
    console_level: warn
    file: ""

modules:
  api_ingress:
    auth:
      tokens:
        smoke-token: "{user}"
"#
        ),
    );
    let port = free_port();
    let port_arg = port.to_string();

    let mut child = tokio::process::Command::new(env!("CARGO_BIN_EXE_assistant-server"))
        .args(["--config", &config_path, "--mock", "--port", &port_arg, "run"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn assistant-server");

    let base = format!("http://127.0.0.1:{port}");
    let client = reqwest::Client::new();

    let mut healthy = false;
    for _ in 0..100 {
        if let Ok(resp) = client.get(format!("{base}/health")).send().await {
            if resp.status().is_success() {
                healthy = true;
                break;
            }
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(healthy, "server did not become healthy");

    let resp = client
        .get(format!("{base}/stats/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    let resp = client
        .get(format!("{base}/stats/dashboard"))
        .bearer_auth("smoke-token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "visitors": 0,
            "conversations": 0,
            "unreadAlerts": 0,
            "upcomingReminders": 0
        })
    );

    child.kill().await.expect("kill server");
}
