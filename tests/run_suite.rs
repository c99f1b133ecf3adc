//! Whole-run behavior of the suite against a mock deployment.

use std::process::ExitCode;
use std::time::Duration;

use apiprobe::checks::{CheckContext, RunMode, standard_suite};
use apiprobe::http::Session;
use apiprobe::testing::{RunState, RunSummary, Runner, Tally};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_json(server: &MockServer, verb: &str, route: &str, status: u16, body: serde_json::Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_nextauth(server: &MockServer) {
    mount_json(server, "GET", "/api/auth/csrf", 200, json!({"csrfToken": "tok"})).await;
    mount_json(server, "GET", "/api/auth/providers", 200, json!({"credentials": {}})).await;
    mount_json(server, "GET", "/api/auth/session", 200, json!({})).await;
}

/// A deployment that already holds the test user and enrollment and that
/// rejects unauthenticated reads.
async fn populated_deployment() -> MockServer {
    let server = MockServer::start().await;
    mount_json(&server, "POST", "/api/auth/signup", 400, json!({"error": "User already exists"})).await;
    mount_nextauth(&server).await;
    mount_json(&server, "POST", "/api/enroll", 400, json!({"error": "Already enrolled in this course"})).await;
    mount_json(&server, "GET", "/api/enroll", 200, json!({"enrollments": [{"courseId": "revops"}]})).await;
    mount_json(&server, "PUT", "/api/progress", 200, json!({"message": "Progress updated successfully"})).await;
    mount_json(&server, "GET", "/api/progress", 200, json!({"progress": {"score": 85}})).await;
    server
}

async fn run_against(server: &MockServer, mode: RunMode) -> RunSummary {
    let ctx = CheckContext::new(Session::new(&server.uri(), None).unwrap()).with_mode(mode);
    Runner::new(ctx)
        .with_delay(Duration::ZERO)
        .run(&standard_suite(false))
        .await
}

fn outcome(summary: &RunSummary, name: &str) -> bool {
    summary
        .results
        .iter()
        .find(|result| result.test_name == name)
        .map(|result| result.success)
        .unwrap_or_else(|| panic!("no result for {name}"))
}

#[tokio::test]
async fn clean_run_exits_zero() {
    let server = populated_deployment().await;

    let summary = run_against(&server, RunMode::Idempotent).await;

    assert_eq!(summary.state, RunState::Done);
    assert_eq!(summary.tally, Tally { passed: 6, failed: 0 });
    assert_eq!(summary.tally.exit_code(), ExitCode::SUCCESS);
}

#[tokio::test]
async fn rerun_against_populated_deployment_stays_green() {
    let server = populated_deployment().await;

    for _ in 0..2 {
        let summary = run_against(&server, RunMode::Idempotent).await;
        assert!(outcome(&summary, "Authentication Signup"));
        assert!(outcome(&summary, "Course Enrollment"));
    }
}

#[tokio::test]
async fn fresh_mode_flags_existing_state() {
    let server = populated_deployment().await;

    let summary = run_against(&server, RunMode::Fresh).await;

    assert!(!outcome(&summary, "Authentication Signup"));
    assert!(!outcome(&summary, "Course Enrollment"));
    assert_eq!(summary.tally, Tally { passed: 4, failed: 2 });
    assert_eq!(summary.tally.exit_code(), ExitCode::FAILURE);
}

#[tokio::test]
async fn faulting_check_does_not_stop_the_run() {
    let server = MockServer::start().await;
    mount_json(&server, "POST", "/api/auth/signup", 201, json!({"userId": "u1", "message": "created"})).await;
    Mock::given(method("GET"))
        .and(path("/api/auth/csrf"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;
    mount_json(&server, "POST", "/api/enroll", 401, json!({"error": "Unauthorized"})).await;

    let summary = run_against(&server, RunMode::Idempotent).await;
    let results: Vec<_> = summary.results.iter().collect();

    assert_eq!(results.len(), 6);
    assert!(results[0].success);
    assert!(!results[1].success);
    assert!(results[1].message.starts_with("Exception occurred:"));
    assert!(results[2].success, "enrollment runs after the login fault");
}

#[tokio::test]
async fn timed_out_check_does_not_affect_the_next() {
    let server = MockServer::start().await;
    mount_json(&server, "POST", "/api/auth/signup", 201, json!({"userId": "u1", "message": "created"})).await;
    Mock::given(method("GET"))
        .and(path("/api/auth/csrf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"csrfToken": "tok"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    mount_json(&server, "POST", "/api/enroll", 401, json!({"error": "Unauthorized"})).await;

    let session = Session::new(&server.uri(), Some(Duration::from_millis(300))).unwrap();
    let summary = Runner::new(CheckContext::new(session))
        .with_delay(Duration::ZERO)
        .run(&standard_suite(false))
        .await;
    let results: Vec<_> = summary.results.iter().collect();

    assert_eq!(results.len(), 6);
    assert!(results[0].success);
    assert!(!results[1].success);
    assert!(results[1].message.starts_with("Exception occurred:"));
    assert!(results[1].message.contains("/api/auth/csrf"));
    assert!(results[2].success, "enrollment runs normally after the timeout");
    assert_eq!(summary.tally.total(), results.len());
}

#[tokio::test]
async fn unauthenticated_deployment_fails_protected_reads() {
    let server = MockServer::start().await;
    mount_json(&server, "POST", "/api/auth/signup", 201, json!({"userId": "u1", "message": "created"})).await;
    mount_nextauth(&server).await;
    for (verb, route) in [("POST", "/api/enroll"), ("GET", "/api/enroll"), ("PUT", "/api/progress"), ("GET", "/api/progress")] {
        mount_json(&server, verb, route, 401, json!({"error": "Unauthorized"})).await;
    }

    let summary = run_against(&server, RunMode::Idempotent).await;

    assert_eq!(summary.tally, Tally { passed: 3, failed: 3 });
    assert_eq!(summary.tally.total(), summary.results.len());
    assert!(!outcome(&summary, "Get User Enrollments"));
    assert!(!outcome(&summary, "Update Course Progress"));
    assert!(!outcome(&summary, "Get Course Progress"));
}

#[tokio::test]
async fn results_are_timestamped_in_completion_order() {
    let server = populated_deployment().await;

    let summary = run_against(&server, RunMode::Idempotent).await;
    let stamps: Vec<_> = summary.results.iter().map(|r| r.timestamp).collect();

    assert!(stamps.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(summary.started_at <= stamps[0]);
    assert!(summary.finished_at >= stamps[stamps.len() - 1]);
}
