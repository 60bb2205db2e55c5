use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use serde_json::json;

fn base_cmd(addr: &str) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("doctrack"));
    cmd.env_remove("DOCTRACK_TOKEN")
        .env_remove("DOCTRACK_URL")
        .args(["--addr", addr]);
    cmd
}

fn document_json(sno: i32, document_type: &str) -> serde_json::Value {
    json!({
        "sno": sno,
        "document_type": document_type,
        "document_owner": "Acme Trading",
        "document_number": "TL-001",
        "expiry_date": "2025-06-30",
        "action_due_date": "2025-06-01",
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    })
}

fn health_json(status: &str) -> serde_json::Value {
    json!({
        "status": status,
        "timestamp": "2025-01-01T00:00:00Z",
        "version": "0.1.0",
        "uptime_seconds": 12
    })
}

#[test]
fn health_command_prints_status() {
    let mut server = Server::new();
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(health_json("healthy").to_string())
        .create();

    base_cmd(&server.url())
        .arg("health")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"healthy\""));
}

#[test]
fn unhealthy_server_fails_the_command() {
    let mut server = Server::new();
    server
        .mock("GET", "/health")
        .with_status(503)
        .with_body(health_json("db_error").to_string())
        .create();

    base_cmd(&server.url())
        .arg("health")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Request failed: 503"))
        .stderr(predicate::str::contains("db_error"));
}

#[test]
fn token_command_prints_raw_token() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/auth/token")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".into(), "alice".into()),
            Matcher::UrlEncoded("role".into(), "admin".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({"access_token": "jwt-value", "token_type": "bearer", "expires_in": 86400})
                .to_string(),
        )
        .create();

    base_cmd(&server.url())
        .args(["token", "--username", "alice", "--role", "admin", "--raw"])
        .assert()
        .success()
        .stdout("jwt-value\n");
    mock.assert();
}

#[test]
fn protected_commands_require_a_token() {
    let server = Server::new();

    base_cmd(&server.url())
        .args(["docs", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("token is required"));
}

#[test]
fn docs_list_table_uses_bearer_token_and_paging() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/documents/")
        .match_header("authorization", "Bearer token")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("skip".into(), "10".into()),
            Matcher::UrlEncoded("limit".into(), "5".into()),
        ]))
        .with_status(200)
        .with_body(json!([document_json(3, "Trade License")]).to_string())
        .create();

    base_cmd(&server.url())
        .args([
            "--token", "token", "docs", "list", "--skip", "10", "--limit", "5", "--table",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("SNO"))
        .stdout(predicate::str::contains("Trade License"))
        .stdout(predicate::str::contains("2025-06-30"));
    mock.assert();
}

#[test]
fn docs_create_sends_document_body() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/documents/")
        .match_header("authorization", "Bearer token")
        .match_body(Matcher::Json(json!({
            "document_type": "Trade License",
            "document_owner": "Acme Trading",
            "document_number": "TL-001",
            "expiry_date": "2025-06-30",
            "action_due_date": "2025-06-01"
        })))
        .with_status(200)
        .with_body(document_json(1, "Trade License").to_string())
        .create();

    base_cmd(&server.url())
        .args([
            "--token",
            "token",
            "docs",
            "create",
            "--type",
            "Trade License",
            "--owner",
            "Acme Trading",
            "--number",
            "TL-001",
            "--expiry",
            "2025-06-30",
            "--due",
            "2025-06-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sno\": 1"));
    mock.assert();
}

#[test]
fn docs_create_reports_duplicate_number() {
    let mut server = Server::new();
    server
        .mock("POST", "/documents/")
        .with_status(400)
        .with_body(
            json!({"error": "document_number_exists", "detail": "Document number already exists"})
                .to_string(),
        )
        .create();

    base_cmd(&server.url())
        .args([
            "--token", "token", "docs", "create", "--type", "T", "--owner", "O", "--number",
            "TL-001", "--expiry", "2025-06-30", "--due", "2025-06-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Document number already exists"));
}

#[test]
fn docs_update_sends_only_given_fields() {
    let mut server = Server::new();
    let mock = server
        .mock("PUT", "/documents/4")
        .match_body(Matcher::Json(json!({"document_type": "Renewed License"})))
        .with_status(200)
        .with_body(document_json(4, "Renewed License").to_string())
        .create();

    base_cmd(&server.url())
        .args(["--token", "token", "docs", "update", "4", "--type", "Renewed License"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renewed License"));
    mock.assert();
}

#[test]
fn docs_update_without_fields_fails_locally() {
    let server = Server::new();

    base_cmd(&server.url())
        .args(["--token", "token", "docs", "update", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to update"));
}

#[test]
fn docs_delete_and_missing_document() {
    let mut server = Server::new();
    server
        .mock("DELETE", "/documents/5")
        .with_status(200)
        .with_body(json!({"message": "Document deleted successfully"}).to_string())
        .create();
    server
        .mock("GET", "/documents/99")
        .with_status(404)
        .with_body(json!({"error": "document_not_found", "detail": "Document not found"}).to_string())
        .create();

    base_cmd(&server.url())
        .args(["--token", "token", "docs", "delete", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Document deleted successfully"));

    base_cmd(&server.url())
        .args(["--token", "token", "docs", "get", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("404"));
}

#[test]
fn docs_expiring_passes_days() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/documents/expiring/soon")
        .match_query(Matcher::UrlEncoded("days".into(), "90".into()))
        .with_status(200)
        .with_body(
            json!({
                "expiring_documents": [document_json(2, "Permit")],
                "count": 1,
                "days_ahead": 90
            })
            .to_string(),
        )
        .create();

    base_cmd(&server.url())
        .args(["--token", "token", "docs", "expiring", "--days", "90", "--table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 document(s) expiring within 90 days"))
        .stdout(predicate::str::contains("Permit"));
    mock.assert();
}

#[test]
fn remind_reports_forbidden_role() {
    let mut server = Server::new();
    server
        .mock("POST", "/reminder/check")
        .with_status(403)
        .with_body(
            json!({
                "error": "forbidden",
                "detail": "Only admin or owner can trigger manual reminder check"
            })
            .to_string(),
        )
        .create();

    base_cmd(&server.url())
        .args(["--token", "token", "remind"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Only admin or owner"));
}

fn mock_smoke_api(server: &mut mockito::ServerGuard, reminder_status: usize) {
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(health_json("healthy").to_string())
        .create();
    server
        .mock("POST", "/auth/token")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({"access_token": "smoke-token", "token_type": "bearer", "expires_in": 86400})
                .to_string(),
        )
        .create();
    server
        .mock("POST", "/documents/")
        .match_header("authorization", "Bearer smoke-token")
        .with_status(200)
        .with_body(document_json(7, "Smoke Test License").to_string())
        .create();
    server
        .mock("GET", "/documents/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([document_json(7, "Smoke Test License")]).to_string())
        .create();
    server
        .mock("GET", "/documents/7")
        .with_status(200)
        .with_body(document_json(7, "Smoke Test License").to_string())
        .create();
    server
        .mock("PUT", "/documents/7")
        .with_status(200)
        .with_body(document_json(7, "Updated Smoke Test License").to_string())
        .create();
    server
        .mock("GET", "/documents/expiring/soon")
        .match_query(Matcher::UrlEncoded("days".into(), "90".into()))
        .with_status(200)
        .with_body(
            json!({
                "expiring_documents": [document_json(7, "Updated Smoke Test License")],
                "count": 1,
                "days_ahead": 90
            })
            .to_string(),
        )
        .create();
    let reminder_body = if reminder_status == 200 {
        json!({
            "message": "Reminder check completed",
            "outcome": {"status": "sent", "documents": 1, "recipients": 2, "delivered": 2, "failed": 0}
        })
    } else {
        json!({"error": "db_error", "detail": "Database error"})
    };
    server
        .mock("POST", "/reminder/check")
        .match_header("authorization", "Bearer smoke-token")
        .with_status(reminder_status)
        .with_body(reminder_body.to_string())
        .create();
}

#[test]
fn smoke_runs_every_step() {
    let mut server = Server::new();
    mock_smoke_api(&mut server, 200);

    base_cmd(&server.url())
        .arg("smoke")
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS  health"))
        .stdout(predicate::str::contains("PASS  create     sno 7"))
        .stdout(predicate::str::contains("PASS  update     Updated Smoke Test License"))
        .stdout(predicate::str::contains("PASS  reminder   sent (2 recipient(s), 2 delivered)"))
        .stdout(predicate::str::contains("smoke run passed: 8 steps"));
}

#[test]
fn smoke_fails_when_a_step_fails() {
    let mut server = Server::new();
    mock_smoke_api(&mut server, 500);

    base_cmd(&server.url())
        .arg("smoke")
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL  reminder"))
        .stderr(predicate::str::contains("smoke run failed: 1 of 8 steps failed"));
}

#[test]
fn smoke_stops_when_no_token_is_issued() {
    let mut server = Server::new();
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(health_json("healthy").to_string())
        .create();
    server
        .mock("POST", "/auth/token")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(json!({"error": "not_found", "detail": "Not found"}).to_string())
        .create();

    base_cmd(&server.url())
        .arg("smoke")
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL  token"))
        .stdout(predicate::str::contains("create").not());
}
