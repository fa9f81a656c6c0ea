//! HTTP flow tests driving the router directly

mod support;

use api::routes::create_router;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use serde_json::{Value, json};
use std::time::Duration;
use support::test_state;
use tower::ServiceExt;

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn registration(username: &str, password: &str) -> Value {
    json!({
        "name": "Test",
        "surname": "User",
        "email": format!("{}@example.com", username),
        "username": username,
        "password": password,
        "repeat_password": password,
    })
}

async fn register(app: &Router, username: &str) -> String {
    let response = send(
        app,
        Method::POST,
        "/register",
        None,
        Some(registration(username, "password123")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await["id"].as_str().unwrap().to_string()
}

async fn login(app: &Router, username: &str) -> String {
    let response = send(
        app,
        Method::POST,
        "/login",
        None,
        Some(json!({"username": username, "password": "password123"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_anonymous_requests_are_sent_to_login() {
    let app = create_router(test_state(Duration::from_secs(60)).await);

    for uri in ["/", "/home", "/users"] {
        let response = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }

    let response = send(&app, Method::GET, "/home", Some("forged-token"), None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let app = create_router(test_state(Duration::from_secs(60)).await);

    let mut mismatched = registration("alice", "password123");
    mismatched["repeat_password"] = json!("password124");
    let response = send(&app, Method::POST, "/register", None, Some(mismatched)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Passwords do not match");

    register(&app, "alice").await;
    let response = send(
        &app,
        Method::POST,
        "/register",
        None,
        Some(registration("alice", "password123")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_rejects_wrong_credentials() {
    let app = create_router(test_state(Duration::from_secs(60)).await);
    register(&app, "alice").await;

    let wrong_password = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({"username": "alice", "password": "password124"})),
    )
    .await;
    let unknown_user = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({"username": "mallory", "password": "password123"})),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_user.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(wrong_password).await,
        json_body(unknown_user).await
    );
}

#[tokio::test]
async fn test_follow_post_and_read_feed() {
    let app = create_router(test_state(Duration::from_secs(60)).await);
    register(&app, "alice").await;
    let bob_id = register(&app, "bob").await;

    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    let response = send(
        &app,
        Method::POST,
        "/posts",
        Some(bob.as_str()),
        Some(json!({"description": "P1", "image_path": "uploads/p1.png"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let post = json_body(response).await;

    let response = send(
        &app,
        Method::GET,
        &format!("/follow/{}", bob_id),
        Some(alice.as_str()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/users");

    let response = send(&app, Method::GET, "/home", Some(alice.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let home = json_body(response).await;
    assert_eq!(home["user"]["username"], "alice");
    assert!(home["user"].get("password_hash").is_none());
    let posts = home["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["post_id"], post["id"]);
    assert_eq!(posts[0]["author_username"], "bob");

    let response = send(&app, Method::GET, "/users", Some(alice.as_str()), None).await;
    let users = json_body(response).await;
    let bob_entry = users
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["username"] == "bob")
        .unwrap();
    assert_eq!(bob_entry["followed"], true);

    let response = send(
        &app,
        Method::GET,
        &format!("/unfollow/{}", bob_id),
        Some(alice.as_str()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let response = send(&app, Method::GET, "/home", Some(alice.as_str()), None).await;
    assert!(json_body(response).await["posts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = create_router(test_state(Duration::from_secs(60)).await);
    register(&app, "alice").await;
    let token = login(&app, "alice").await;

    let response = send(&app, Method::GET, "/logout", Some(token.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = send(&app, Method::GET, "/home", Some(token.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let app = create_router(test_state(Duration::from_secs(60)).await);
    register(&app, "alice").await;

    let response = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({"username": "alice", "password": "password123"})),
    )
    .await;
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session="));

    let request = Request::builder()
        .uri("/home")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_expired_session_is_anonymous() {
    let app = create_router(test_state(Duration::from_millis(200)).await);
    register(&app, "alice").await;
    let token = login(&app, "alice").await;

    let response = send(&app, Method::GET, "/home", Some(token.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(300)).await;

    let response = send(&app, Method::GET, "/home", Some(token.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_self_follow_is_rejected() {
    let app = create_router(test_state(Duration::from_secs(60)).await);
    let alice_id = register(&app, "alice").await;
    let alice = login(&app, "alice").await;

    let response = send(
        &app,
        Method::GET,
        &format!("/follow/{}", alice_id),
        Some(alice.as_str()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
