use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use habitrack::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const PASSWORD: &str = "correct-horse";

async fn spawn_app() -> Router {
    let db_path = std::env::temp_dir().join(format!("habitrack-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.database.path = format!("sqlite:{}", db_path.display());
    config.auth.token_secret = "api-test-secret".to_string();
    // Cheap hashing parameters keep the suite fast.
    config.auth.argon2_memory_cost_kib = 1024;
    config.auth.argon2_time_cost = 1;

    let state = habitrack::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    habitrack::api::router(state)
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", mime::APPLICATION_JSON.as_ref())
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

async fn register(app: &Router, username: &str, email: &str) -> (StatusCode, Value) {
    send_json(
        app,
        "POST",
        "/register",
        None,
        Some(json!({"username": username, "email": email, "password": PASSWORD})),
    )
    .await
}

async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    let form = format!("username={username}&password={password}");
    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(
            "Content-Type",
            mime::APPLICATION_WWW_FORM_URLENCODED.as_ref(),
        )
        .body(Body::from(form))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap();

    (status, body)
}

async fn login_token(app: &Router, username: &str) -> String {
    let (status, body) = login(app, username, PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

async fn create_habit(app: &Router, token: &str, name: &str, category: &str, target: i32) -> i32 {
    let (status, body) = send_json(
        app,
        "POST",
        "/habits",
        Some(token),
        Some(json!({"name": name, "category": category, "target_per_day": target})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    i32::try_from(body["id"].as_i64().unwrap()).unwrap()
}

#[tokio::test]
async fn test_register_and_login() {
    let app = spawn_app().await;

    let (status, body) = register(&app, "alice", "alice@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert!(body["id"].is_i64());
    // The hash must never appear in a response.
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let (status, _) = login(&app, "alice", "wrong-password").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = login(&app, "nobody", PASSWORD).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = login(&app, "alice", PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let app = spawn_app().await;

    let (status, _) = register(&app, "alice", "alice@example.com").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = register(&app, "someone_else", "alice@example.com").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already registered");
}

/// Username uniqueness is only enforced by the unique index, not by a
/// pre-check like the email, so a duplicate surfaces as a 500.
#[tokio::test]
async fn test_duplicate_username_hits_unique_index() {
    let app = spawn_app().await;

    let (status, _) = register(&app, "alice", "alice@example.com").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = register(&app, "alice", "other@example.com").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_register_validation() {
    let app = spawn_app().await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({"username": "", "email": "a@x.com", "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({"username": "alice", "email": "not-an-email", "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({"username": "alice", "email": "a@x.com", "password": "short"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Login takes a form-encoded body; a JSON payload must not work.
#[tokio::test]
async fn test_login_requires_form_encoding() {
    let app = spawn_app().await;

    register(&app, "alice", "alice@example.com").await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({"username": "alice", "password": PASSWORD})),
    )
    .await;
    assert_ne!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_negative_target_rejected() {
    let app = spawn_app().await;

    register(&app, "alice", "alice@example.com").await;
    let token = login_token(&app, "alice").await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/habits",
        Some(&token),
        Some(json!({"name": "Run", "target_per_day": -2})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = create_habit(&app, &token, "Run", "Fitness", 2).await;
    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/habits/{id}"),
        Some(&token),
        Some(json!({"target_per_day": -1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_habit_endpoints_require_auth() {
    let app = spawn_app().await;

    let cases = [
        ("POST", "/habits"),
        ("GET", "/habits"),
        ("GET", "/habits/1"),
        ("PUT", "/habits/1"),
        ("DELETE", "/habits/1"),
    ];

    for (method, uri) in cases {
        let (status, _) = send_json(&app, method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri} no token");

        let (status, _) = send_json(&app, method, uri, Some("garbage.token.here"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri} bad token");
    }
}

/// A structurally valid token signed with a different secret must be
/// rejected exactly like garbage.
#[tokio::test]
async fn test_forged_token_rejected() {
    let app = spawn_app().await;

    register(&app, "alice", "alice@example.com").await;

    let forged = habitrack::auth::TokenService::new("not-the-server-secret", 30)
        .issue("alice@example.com")
        .unwrap();

    let (status, _) = send_json(&app, "GET", "/habits", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// A valid token whose subject no longer resolves to a stored user is
/// unauthorized, not a server error.
#[tokio::test]
async fn test_token_for_unknown_user_rejected() {
    let app = spawn_app().await;

    let token = habitrack::auth::TokenService::new("api-test-secret", 30)
        .issue("ghost@example.com")
        .unwrap();

    let (status, _) = send_json(&app, "GET", "/habits", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_habit_crud_roundtrip() {
    let app = spawn_app().await;

    register(&app, "alice", "alice@example.com").await;
    let token = login_token(&app, "alice").await;

    let id = create_habit(&app, &token, "Run", "Fitness", 2).await;

    let (status, body) = send_json(&app, "GET", &format!("/habits/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Run");
    assert_eq!(body["category"], "Fitness");
    assert_eq!(body["target_per_day"], 2);

    let (status, body) = send_json(&app, "GET", "/habits", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/habits/{id}"),
        Some(&token),
        Some(json!({"name": "Morning run", "target_per_day": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Morning run");
    assert_eq!(body["target_per_day"], 3);

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/habits/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send_json(&app, "GET", &format!("/habits/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let app = spawn_app().await;

    register(&app, "alice", "alice@example.com").await;
    let token = login_token(&app, "alice").await;

    let id = create_habit(&app, &token, "Read", "Leisure", 1).await;

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/habits/{id}"),
        Some(&token),
        Some(json!({"category": "Education"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Read");
    assert_eq!(body["category"], "Education");
    assert_eq!(body["target_per_day"], 1);
}

#[tokio::test]
async fn test_ownership_isolation() {
    let app = spawn_app().await;

    register(&app, "alice", "alice@example.com").await;
    register(&app, "bob", "bob@example.com").await;
    let alice = login_token(&app, "alice").await;
    let bob = login_token(&app, "bob").await;

    let id = create_habit(&app, &alice, "Meditate", "Health", 1).await;

    // Bob cannot see, change or delete Alice's habit, and the failure
    // is indistinguishable from the habit not existing.
    let (status, _) = send_json(&app, "GET", &format!("/habits/{id}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/habits/{id}"),
        Some(&bob),
        Some(json!({"name": "Hijacked"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "DELETE", &format!("/habits/{id}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send_json(&app, "GET", "/habits", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    // Alice's habit survived all of it, unchanged.
    let (status, body) = send_json(&app, "GET", &format!("/habits/{id}"), Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Meditate");
}

#[tokio::test]
async fn test_progress_defaults_and_validation() {
    let app = spawn_app().await;

    register(&app, "alice", "alice@example.com").await;
    let token = login_token(&app, "alice").await;
    let id = create_habit(&app, &token, "Stretch", "Health", 1).await;

    // Explicit date is stored as given.
    let (status, body) = send_json(
        &app,
        "POST",
        "/progress",
        None,
        Some(json!({"habit_id": id, "date_tracked": "2026-08-01", "amount_done": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date_tracked"], "2026-08-01");
    assert_eq!(body["amount_done"], 2);

    // Omitted date defaults to today (UTC).
    let (status, body) = send_json(
        &app,
        "POST",
        "/progress",
        None,
        Some(json!({"habit_id": id, "amount_done": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let today = chrono::Utc::now().date_naive().to_string();
    assert_eq!(body["date_tracked"], today);

    let (status, _) = send_json(
        &app,
        "POST",
        "/progress",
        None,
        Some(json!({"habit_id": id, "amount_done": -1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "POST",
        "/progress",
        None,
        Some(json!({"habit_id": 0, "amount_done": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// A well-formed request naming a habit that does not exist is a 400
/// with the offending id, never a bare database error.
#[tokio::test]
async fn test_progress_for_unknown_habit_rejected() {
    let app = spawn_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/progress",
        None,
        Some(json!({"habit_id": 999, "amount_done": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("999"));
}

/// The progress endpoints deliberately carry no auth; see the router.
#[tokio::test]
async fn test_progress_endpoints_are_open() {
    let app = spawn_app().await;

    let (status, body) = send_json(&app, "GET", "/progress", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    // Unknown habit yields an empty list, not a 404.
    let (status, body) = send_json(&app, "GET", "/habits/999/progress", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_cascades_progress() {
    let app = spawn_app().await;

    register(&app, "alice", "alice@example.com").await;
    let token = login_token(&app, "alice").await;

    let keep = create_habit(&app, &token, "Keep", "A", 1).await;
    let doomed = create_habit(&app, &token, "Doomed", "B", 1).await;

    for habit_id in [keep, doomed, doomed] {
        let (status, _) = send_json(
            &app,
            "POST",
            "/progress",
            None,
            Some(json!({"habit_id": habit_id, "amount_done": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/habits/{doomed}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send_json(
        &app,
        "GET",
        &format!("/habits/{doomed}/progress"),
        None,
        None,
    )
    .await;
    assert!(body.as_array().unwrap().is_empty());

    // The sibling habit's entries are untouched.
    let (_, body) = send_json(&app, "GET", &format!("/habits/{keep}/progress"), None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = send_json(&app, "GET", "/progress", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_full_user_journey() {
    let app = spawn_app().await;

    let (status, _) = register(&app, "alice", "a@x.com").await;
    assert_eq!(status, StatusCode::OK);

    let token = login_token(&app, "alice").await;

    let id = create_habit(&app, &token, "Run", "Fitness", 2).await;

    let (status, body) = send_json(&app, "GET", &format!("/habits/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "Run");
    assert_eq!(body["category"], "Fitness");
    assert_eq!(body["target_per_day"], 2);

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/habits/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send_json(&app, "GET", &format!("/habits/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
