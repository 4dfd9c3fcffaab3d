//! Integration tests for CLI commands

#![allow(deprecated)]

use assert_cmd::{assert::OutputAssertExt, cargo::CommandCargoExt};
use axum::{routing::post, Json, Router};
use predicates::prelude::*;
use serde_json::json;
use std::process::Command;
use tempfile::TempDir;

/// Command isolated in `home`, with colors off
fn topiccut(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("topiccut").unwrap();
    cmd.env("TOPICCUT_HOME", home.path())
        .env_remove("TOPICCUT_API_URL")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    topiccut(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("summarize"))
        .stdout(predicate::str::contains("theme"))
        .stdout(predicate::str::contains("login"));
}

#[test]
fn test_theme_toggle_round_trip() {
    let home = TempDir::new().unwrap();

    topiccut(&home)
        .arg("theme")
        .assert()
        .success()
        .stdout(predicate::str::contains("Display mode: dark"));

    topiccut(&home)
        .args(["theme", "toggle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Display mode: light"));

    let stored =
        std::fs::read_to_string(home.path().join("data").join("local_storage.json")).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored["darkMode"], "false");

    topiccut(&home)
        .args(["theme", "toggle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Display mode: dark"));
}

#[test]
fn test_status_without_session_asks_for_login() {
    let home = TempDir::new().unwrap();
    topiccut(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));
}

#[test]
fn test_status_in_dev_mode() {
    let home = TempDir::new().unwrap();
    topiccut(&home)
        .args(["--dev", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("development mode"));
}

#[test]
fn test_summarize_requires_sign_in() {
    let home = TempDir::new().unwrap();
    topiccut(&home)
        .args(["summarize", "--text", "hello"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Not signed in"))
        .stderr(predicate::str::contains("Sign in before summarizing"));
}

#[test]
fn test_summarize_without_input_fails_fast() {
    let home = TempDir::new().unwrap();
    topiccut(&home)
        .env("TOPICCUT_API_URL", "http://127.0.0.1:1")
        .args(["--dev", "summarize"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Enter some text or upload a file."));
}

#[test]
fn test_summarize_rejects_unsupported_file() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("report.docx");
    std::fs::write(&file, "binary").unwrap();

    topiccut(&home)
        .args(["--dev", "summarize", "--file"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file type: report.docx"));
}

#[test]
fn test_summarize_rejects_unknown_style() {
    let home = TempDir::new().unwrap();
    topiccut(&home)
        .args(["--dev", "summarize", "--text", "hi", "--style", "poem"])
        .assert()
        .failure();
}

#[test]
fn test_summarize_json_cannot_copy() {
    let home = TempDir::new().unwrap();
    topiccut(&home)
        .args(["--dev", "summarize", "--text", "hi", "--json", "--copy", "title"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_summarize_news_json_end_to_end() {
    let app = Router::new().route(
        "/summarize",
        post(|Json(body): Json<serde_json::Value>| async move {
            assert_eq!(body["content_type"], "news");
            Json(json!({
                "title": "Town hall",
                "keywords": ["budget"],
                "core_summary": {"main_question": "hidden in news"},
                "structured_summary": {
                    "introduction": "Residents met.",
                    "key_topics": [
                        {"title": "Roads", "content": "Repairs start soon.", "sub_points": ["Main St", "Oak Ave"]}
                    ]
                }
            }))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let home = TempDir::new().unwrap();
    let mut cmd = topiccut(&home);
    cmd.env("TOPICCUT_API_URL", format!("http://{}", addr)).args([
        "--dev",
        "summarize",
        "--text",
        "minutes of the town hall",
        "--style",
        "news",
        "--json",
    ]);

    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();
    output
        .clone()
        .assert()
        .success()
        .stdout(predicate::str::contains("Town hall"));

    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed["style"], "news");
    let keys: Vec<&str> = printed["blocks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["title", "keywords", "news_article"]);
    assert_eq!(
        printed["blocks"][2]["text"],
        "Residents met.\n\nRepairs start soon. Main St, Oak Ave are the main points."
    );
}
