use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use taskdeck_api::AppConfig;
use taskdeck_auth::{TokenClaims, UserDirectory};
use taskdeck_core::UserId;
use taskdeck_jobs::{JobTimings, LogMailer};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Build the real router (seeded users, fast job timings) and bind it
    /// to an ephemeral port.
    async fn spawn() -> Self {
        let users = Arc::new(UserDirectory::new());
        users.register("alice", "wonderland");
        users.register("bob", "builder");

        let cfg = AppConfig {
            jwt_secret: JWT_SECRET.to_string(),
            workers: 2,
            timings: JobTimings {
                delay_test: Duration::from_millis(200),
                report: Duration::from_millis(300),
            },
        };

        let app = taskdeck_api::app::build_app(cfg, users, Arc::new(LogMailer));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn fetch_token(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> String {
    let res = client
        .post(format!("{}/api/token/", base_url))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

async fn poll_until_terminal(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    job_id: &str,
) -> serde_json::Value {
    for _ in 0..100 {
        let res = client
            .get(format!("{}/api/check-report-status/{}/", base_url, job_id))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await.unwrap();

        match body["state"].as_str().unwrap() {
            "success" | "failure" | "revoked" => return body,
            _ => tokio::time::sleep(Duration::from_millis(25)).await,
        }
    }
    panic!("job {job_id} did not reach a terminal state within timeout");
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/taches/", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/api/start-report/", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_exchange_rejects_bad_credentials() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/token/", srv.base_url))
        .json(&json!({ "username": "alice", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_exchange_reports_missing_fields_per_field() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/token/", srv.base_url))
        .json(&json!({ "username": "alice" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["password"].is_array());
}

#[tokio::test]
async fn directly_minted_token_is_accepted_and_forged_one_is_not() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mint = |secret: &str| {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: UserId::new(),
            issued_at: now,
            expires_at: now + ChronoDuration::minutes(10),
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("failed to encode jwt")
    };

    let res = client
        .get(format!("{}/api/taches/", srv.base_url))
        .bearer_auth(mint(JWT_SECRET))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/taches/", srv.base_url))
        .bearer_auth(mint("wrong-secret"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn task_crud_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = fetch_token(&client, &srv.base_url, "alice", "wonderland").await;

    // Create with only a title: defaults apply.
    let res = client
        .post(format!("{}/api/taches/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "buy milk" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["title"], "buy milk");
    assert_eq!(created["description"], "");
    assert_eq!(created["completed"], false);
    let id = created["id"].as_str().unwrap().to_string();

    // Partial update flips the flag and nothing else.
    let res = client
        .patch(format!("{}/api/taches/{}/", srv.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "completed": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["title"], "buy milk");
    assert_eq!(updated["completed"], true);

    // Full update without a description resets it to the default.
    let res = client
        .put(format!("{}/api/taches/{}/", srv.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "title": "buy oat milk" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let replaced: serde_json::Value = res.json().await.unwrap();
    assert_eq!(replaced["title"], "buy oat milk");
    assert_eq!(replaced["description"], "");
    assert_eq!(replaced["completed"], false);

    // Delete, then the task is gone.
    let res = client
        .delete(format!("{}/api/taches/{}/", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/api/taches/{}/", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_returns_most_recent_first() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = fetch_token(&client, &srv.base_url, "alice", "wonderland").await;

    for title in ["first", "second", "third"] {
        let res = client
            .post(format!("{}/api/taches/", srv.base_url))
            .bearer_auth(&token)
            .json(&json!({ "title": title }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .get(format!("{}/api/taches/", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: serde_json::Value = res.json().await.unwrap();
    let titles: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn blank_title_is_a_field_validation_error() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = fetch_token(&client, &srv.base_url, "alice", "wonderland").await;

    let res = client
        .post(format!("{}/api/taches/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["title"].is_array());

    let res = client
        .post(format!("{}/api/taches/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "description": "no title at all" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn owner_scoping_hides_other_users_tasks() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let alice = fetch_token(&client, &srv.base_url, "alice", "wonderland").await;
    let bob = fetch_token(&client, &srv.base_url, "bob", "builder").await;

    let res = client
        .post(format!("{}/api/taches/", srv.base_url))
        .bearer_auth(&alice)
        .json(&json!({ "title": "alice's secret plan" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    // Bob sees nothing: not in his list, and direct access is 404 (never
    // 403, so existence does not leak).
    let res = client
        .get(format!("{}/api/taches/", srv.base_url))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    assert!(listed.as_array().unwrap().is_empty());

    for method in ["get", "patch", "delete"] {
        let url = format!("{}/api/taches/{}/", srv.base_url, id);
        let req = match method {
            "get" => client.get(&url),
            "patch" => client.patch(&url).json(&json!({ "completed": true })),
            _ => client.delete(&url),
        };
        let res = req.bearer_auth(&bob).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "method {method}");
    }

    // Alice's task is untouched.
    let res = client
        .get(format!("{}/api/taches/{}/", srv.base_url, id))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn delay_test_job_submits_immediately_then_completes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = fetch_token(&client, &srv.base_url, "alice", "wonderland").await;

    let started = Instant::now();
    let res = client
        .post(format!("{}/api/test-celery/", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["message"].is_string());
    let job_id = body["task_id"].as_str().unwrap().to_string();

    // Before the simulated delay elapses the job is not successful yet.
    let res = client
        .get(format!(
            "{}/api/check-report-status/{}/",
            srv.base_url, job_id
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let early: serde_json::Value = res.json().await.unwrap();
    assert_ne!(early["state"], "success");

    let done = poll_until_terminal(&client, &srv.base_url, &token, &job_id).await;
    assert_eq!(done["state"], "success");
    assert_eq!(done["result"], serde_json::Value::Null);
}

#[tokio::test]
async fn delay_test_job_accepts_get_too() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = fetch_token(&client, &srv.base_url, "alice", "wonderland").await;

    let res = client
        .get(format!("{}/api/test-celery/", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn report_submission_is_accepted_and_succeeds() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = fetch_token(&client, &srv.base_url, "alice", "wonderland").await;

    let res = client
        .post(format!("{}/api/start-report/", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let body: serde_json::Value = res.json().await.unwrap();
    let job_id = body["task_id"].as_str().unwrap().to_string();

    let done = poll_until_terminal(&client, &srv.base_url, &token, &job_id).await;
    assert_eq!(done["state"], "success");
    assert_eq!(done["result"], "report generated");
}

#[tokio::test]
async fn unknown_job_id_reports_pending() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = fetch_token(&client, &srv.base_url, "alice", "wonderland").await;

    // A well-formed id the broker has never seen, and a string that is not
    // an id at all: both report pending, never an error.
    let ghost = uuid::Uuid::now_v7().to_string();
    for unknown in [ghost.as_str(), "not-a-job-id"] {
        let res = client
            .get(format!(
                "{}/api/check-report-status/{}/",
                srv.base_url, unknown
            ))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["task_id"], *unknown);
        assert_eq!(body["state"], "pending");
        assert_eq!(body["result"], serde_json::Value::Null);
    }
}
