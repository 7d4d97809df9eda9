//! End-to-end tests for the userdeck binary
//!
//! The binary runs against a mock listing service; logs go to stderr so
//! stdout only carries the rendered selection.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

async fn mock_service(users: &[(i64, &str, i64, &str)]) -> MockServer {
    let server = MockServer::start().await;
    let ids: Vec<i64> = users.iter().map(|u| u.0).collect();

    Mock::given(method("GET"))
        .and(path("/sample/list/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": ids })))
        .mount(&server)
        .await;

    for &(id, name, age, number) in users {
        Mock::given(method("GET"))
            .and(path(format!("/sample/detail/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "name": name,
                "age": age,
                "number": number,
                "photo": "https://img.test/p.jpg",
                "bio": "bio"
            })))
            .mount(&server)
            .await;
    }

    server
}

fn userdeck(server: &MockServer) -> Command {
    let mut cmd = Command::cargo_bin("userdeck").unwrap();
    cmd.arg("--base-url")
        .arg(format!("{}/sample/", server.uri()))
        .env("LOG_LEVEL", "warn")
        .env_remove("USERDECK_SELECTION_SIZE")
        .env_remove("USERDECK_STORE")
        .env_remove("USERDECK_OUTPUT");
    cmd
}

#[tokio::test]
async fn test_json_output() {
    let server = mock_service(&[
        (1, "Zed", 28, "555-111-2222"),
        (2, "Amy", 33, "555-222-3333"),
        (3, "Bad", 1, "12345"),
    ])
    .await;

    let output = userdeck(&server)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let users: Value = serde_json::from_slice(&output.stdout).unwrap();
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["name"], "Amy");
    assert_eq!(users[1]["name"], "Zed");
    assert_eq!(users[1]["number"], "5551112222");
}

#[tokio::test]
async fn test_default_log_level_keeps_per_user_lines_quiet() {
    let server = mock_service(&[(1, "Zed", 28, "555-111-2222")]).await;

    userdeck(&server)
        .env_remove("LOG_LEVEL")
        .env_remove("LOG_FILTER")
        .env_remove("LOG_OUTPUT")
        .assert()
        .success()
        .stderr(predicate::str::contains("Inserted valid user").not());
}

#[tokio::test]
async fn test_verbose_logs_per_user_lines() {
    let server = mock_service(&[(1, "Zed", 28, "555-111-2222")]).await;

    userdeck(&server)
        .env_remove("LOG_LEVEL")
        .env_remove("LOG_FILTER")
        .env_remove("LOG_OUTPUT")
        .arg("--verbose")
        .assert()
        .success()
        .stderr(predicate::str::contains("Inserted valid user"));
}

#[tokio::test]
async fn test_table_output_with_limit() {
    let server = mock_service(&[
        (1, "Old", 80, "555-111-2222"),
        (2, "Kid", 9, "555-222-3333"),
    ])
    .await;

    userdeck(&server)
        .arg("--limit")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Kid"))
        .stdout(predicate::str::contains("5552223333"))
        .stdout(predicate::str::contains("Old").not());
}

#[tokio::test]
async fn test_cards_with_sqlite_store() {
    let server = mock_service(&[(1, "zed", 28, "555 111 2222")]).await;

    userdeck(&server)
        .args(["--format", "cards", "--store", "sqlite"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: Zed"))
        .stdout(predicate::str::contains("Age: 28"));
}

#[tokio::test]
async fn test_unreachable_service_is_not_fatal() {
    let server = MockServer::start().await;
    // No mocks: every request gets a 404

    userdeck(&server)
        .assert()
        .success()
        .stdout(predicate::str::contains("No valid users found."));
}

#[test]
fn test_invalid_base_url_fails() {
    Command::cargo_bin("userdeck")
        .unwrap()
        .args(["--base-url", "ftp://example.com/"])
        .env("LOG_LEVEL", "error")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_help() {
    Command::cargo_bin("userdeck")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--base-url"))
        .stdout(predicate::str::contains("--store"));
}
