use chrono::{Duration as ChronoDuration, Utc};
use reqwest::StatusCode;
use serde_json::{Value, json};

use workforce_api::app::{AppServices, build_app};
use workforce_auth::{TokenConfig, TokenService};
use workforce_core::UserId;
use workforce_infra::{BootstrapAdmin, Stores};

const JWT_SECRET: &str = "black-box-secret-0123456789abcdef";
const ADMIN_EMAIL: &str = "root@example.com";
const ADMIN_PASSWORD: &str = "rootpass";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory stores, bound to an ephemeral port.
        let services = AppServices::new(Stores::in_memory(), TokenConfig::new(JWT_SECRET));
        services
            .seed_admin(&BootstrapAdmin {
                name: "Root".to_string(),
                email: ADMIN_EMAIL.to_string(),
                password: ADMIN_PASSWORD.to_string(),
            })
            .await
            .expect("failed to seed admin");

        let app = build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut req = self.client.post(self.url(path)).json(&body);
        if let Some(t) = token {
            req = req.bearer_auth(t);
        }
        read(req.send().await.unwrap()).await
    }

    async fn put(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap();
        read(res).await
    }

    async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut req = self.client.get(self.url(path));
        if let Some(t) = token {
            req = req.bearer_auth(t);
        }
        read(req.send().await.unwrap()).await
    }

    async fn delete(&self, path: &str, token: &str) -> (StatusCode, Value) {
        let res = self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        read(res).await
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/signup",
            None,
            json!({ "name": name, "email": email, "password": password }),
        )
        .await
    }

    async fn signin(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/signin",
            None,
            json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn admin_token(&self) -> String {
        let (status, body) = self.signin(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    async fn user_token(&self, email: &str) -> (String, String) {
        let (status, body) = self.signup("Ann", email, "secret1").await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn read(res: reqwest::Response) -> (StatusCode, Value) {
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    let body = serde_json::from_str(&text).unwrap_or(Value::Null);
    (status, body)
}

fn employee_body(email: &str) -> Value {
    json!({
        "firstName": "Grace",
        "lastName": "Hopper",
        "email": email,
        "phone": "555-0100",
        "address": { "city": "Arlington", "zipCode": "22201" },
        "department": "IT",
        "position": "Engineer",
        "employeeType": "Full-time",
        "salary": 120000,
        "hireDate": "2020-01-15"
    })
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let (status, _) = srv.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn signup_then_signin_resolve_to_same_subject() {
    let srv = TestServer::spawn().await;

    let (status, up) = srv.signup("Ann", "ann@x.com", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(up["user"]["role"], "user");
    assert_eq!(up["user"]["email"], "ann@x.com");
    assert!(up["user"].get("passwordHash").is_none());

    let (status, inn) = srv.signin("ANN@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inn["user"]["id"], up["user"]["id"]);

    for token in [&up["token"], &inn["token"]] {
        let (status, me) = srv.get("/api/auth/me", token.as_str()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["user"]["id"], up["user"]["id"]);
    }
}

#[tokio::test]
async fn signup_ignores_submitted_role() {
    let srv = TestServer::spawn().await;
    let (status, body) = srv
        .post(
            "/api/auth/signup",
            None,
            json!({ "name": "Mallory", "email": "m@x.com", "password": "secret1", "role": "admin" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "user");

    let token = body["token"].as_str().unwrap();
    let (status, _) = srv.post("/api/employees", Some(token), employee_body("e@x.com")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_identical() {
    let srv = TestServer::spawn().await;
    srv.user_token("ann@x.com").await;

    let wrong = srv.signin("ann@x.com", "wrongpass").await;
    let ghost = srv.signin("ghost@x.com", "secret1").await;

    assert_eq!(wrong.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong, ghost);
    assert_eq!(wrong.1["error"], "invalid_credentials");
}

#[tokio::test]
async fn signup_boundary_errors() {
    let srv = TestServer::spawn().await;
    srv.user_token("ann@x.com").await;

    let (status, body) = srv.signup("Ann Two", "Ann@X.com", "secret2").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "email_taken");

    let (status, body) = srv.signup("Bob", "bob@x.com", "12345").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "weak_password");

    let (status, body) = srv
        .post("/api/auth/signup", None, json!({ "email": "bob@x.com", "password": "secret1" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing_fields");

    let (status, body) = srv
        .post("/api/auth/signin", None, json!({ "email": "bob@x.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing_fields");
}

#[tokio::test]
async fn admin_operation_distinguishes_401_from_403() {
    let srv = TestServer::spawn().await;
    let (user_token, _) = srv.user_token("ann@x.com").await;

    let (anon_status, anon_body) = srv.post("/api/employees", None, employee_body("e@x.com")).await;
    let (user_status, user_body) = srv
        .post("/api/employees", Some(&user_token), employee_body("e@x.com"))
        .await;

    assert_eq!(anon_status, StatusCode::UNAUTHORIZED);
    assert_eq!(anon_body["error"], "unauthenticated");
    assert_eq!(user_status, StatusCode::FORBIDDEN);
    assert_eq!(user_body["error"], "forbidden");

    // Neither body names the internal check that failed.
    for body in [&anon_body, &user_body] {
        let text = body.to_string().to_lowercase();
        assert!(!text.contains("role"));
        assert!(!text.contains("token"));
    }
}

#[tokio::test]
async fn expired_and_foreign_tokens_are_unauthenticated() {
    let srv = TestServer::spawn().await;
    let (_, user_id) = srv.user_token("ann@x.com").await;
    let subject: UserId = user_id.parse().unwrap();

    let issued_at = Utc::now() - ChronoDuration::hours(24) - ChronoDuration::seconds(1);
    let expired = TokenService::new(TokenConfig::new(JWT_SECRET))
        .issue(subject, issued_at)
        .unwrap()
        .token;
    let foreign = TokenService::new(TokenConfig::new("some-other-secret-0123456789abcdef"))
        .issue(subject, Utc::now())
        .unwrap()
        .token;

    let (a, body_a) = srv.get("/api/employees", Some(&expired)).await;
    let (b, body_b) = srv.get("/api/employees", Some(&foreign)).await;
    let (c, body_c) = srv.get("/api/employees", None).await;

    assert_eq!(a, StatusCode::UNAUTHORIZED);
    assert_eq!(b, StatusCode::UNAUTHORIZED);
    assert_eq!(c, StatusCode::UNAUTHORIZED);
    assert_eq!(body_a, body_b);
    assert_eq!(body_b, body_c);
}

#[tokio::test]
async fn identity_lookup_is_self_or_admin() {
    let srv = TestServer::spawn().await;
    let (ann_token, ann_id) = srv.user_token("ann@x.com").await;
    let (bob_token, _) = srv.user_token("bob@x.com").await;
    let admin_token = srv.admin_token().await;
    let path = format!("/api/auth/user/{ann_id}");

    let (status, body) = srv.get(&path, Some(&ann_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], ann_id.as_str());
    assert_eq!(body["user"]["email"], "ann@x.com");

    let (status, _) = srv.get(&path, Some(&bob_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = srv.get(&path, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = srv
        .get(&format!("/api/auth/user/{}", UserId::new()), Some(&admin_token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = srv.get(&path, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn employee_lifecycle_as_admin() {
    let srv = TestServer::spawn().await;
    let admin = srv.admin_token().await;
    let (reader, _) = srv.user_token("reader@x.com").await;

    // Create
    let (status, created) = srv
        .post("/api/employees", Some(&admin), employee_body("Grace@Navy.mil"))
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {created}");
    assert_eq!(created["email"], "grace@navy.mil");
    assert_eq!(created["status"], "active");
    let id = created["id"].as_str().unwrap().to_string();

    // Readers can list, search and fetch
    let (status, list) = srv.get("/api/employees", Some(&reader)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, hits) = srv.get("/api/employees/search?query=HOPP", Some(&reader)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits.as_array().unwrap().len(), 1);

    let (status, misses) = srv.get("/api/employees/search?query=finance", Some(&reader)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(misses.as_array().unwrap().is_empty());

    let path = format!("/api/employees/{id}");
    let (status, fetched) = srv.get(&path, Some(&reader)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["firstName"], "Grace");

    // Readers cannot write
    let (status, _) = srv.put(&path, &reader, json!({ "position": "Admiral" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = srv.delete(&path, &reader).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Update
    let (status, body) = srv.put(&path, &admin, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, updated) = srv
        .put(&path, &admin, json!({ "position": "Admiral", "salary": "150000" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["position"], "Admiral");
    assert_eq!(updated["salary"], 150000.0);
    assert_eq!(updated["lastName"], "Hopper");

    // Delete
    let (status, body) = srv.delete(&path, &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Employee deleted successfully");

    let (status, _) = srv.get(&path, Some(&reader)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = srv.delete(&path, &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn employee_validation_and_conflicts() {
    let srv = TestServer::spawn().await;
    let admin = srv.admin_token().await;

    let mut bad = employee_body("x@x.com");
    bad["department"] = json!("Legal");
    let (status, body) = srv.post("/api/employees", Some(&admin), bad).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = srv.post("/api/employees", Some(&admin), employee_body("x@x.com")).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = srv.post("/api/employees", Some(&admin), employee_body("X@x.com")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, _) = srv.get("/api/employees/not-an-id", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_signups_with_one_email_admit_exactly_one() {
    let srv = TestServer::spawn().await;

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let client = srv.client.clone();
            let url = srv.url("/api/auth/signup");
            tokio::spawn(async move {
                client
                    .post(url)
                    .json(&json!({ "name": format!("Racer {i}"), "email": "race@x.com", "password": "secret1" }))
                    .send()
                    .await
                    .unwrap()
                    .status()
            })
        })
        .collect();

    let mut statuses = Vec::new();
    for h in handles {
        statuses.push(h.await.unwrap());
    }

    let created = statuses.iter().filter(|s| **s == StatusCode::CREATED).count();
    let taken = statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count();
    assert_eq!(created, 1);
    assert_eq!(taken, statuses.len() - 1);
}
