//! End-to-end tests for the HTTP API against the in-memory backend

use axum::http::StatusCode;
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use gaming_realm::config::AppConfig;
use gaming_realm::server::{AppState, build_router};
use gaming_realm::storage::InMemoryObjectStore;
use serde_json::{Value, json};
use std::sync::Arc;

fn create_test_server() -> TestServer {
    let state = AppState::in_memory(AppConfig::default());
    TestServer::new(build_router(state))
}

async fn signup(server: &TestServer, username: &str) -> String {
    let response = server
        .post("/user/signup")
        .json(&json!({
            "username": username,
            "password": "hunter22",
            "email": format!("{}@example.com", username),
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["session_id"].as_str().expect("session_id").to_string()
}

async fn create_post(server: &TestServer, session: &str, title: &str) -> String {
    let form = MultipartForm::new().add_text("title", title.to_string());
    let response = server
        .post("/post/create")
        .add_header("session-id", session)
        .multipart(form)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["id"].as_str().expect("post id").to_string()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_ping() {
    let server = create_test_server();
    let response = server.get("/ping").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Pong!");
}

// =============================================================================
// Accounts and sessions
// =============================================================================

#[tokio::test]
async fn test_signup_login_logout_flow() {
    let server = create_test_server();
    let session = signup(&server, "alice").await;

    // the signup session is live
    let form = MultipartForm::new().add_text("title", "first post");
    server
        .post("/post/create")
        .add_header("session-id", session.as_str())
        .multipart(form)
        .await
        .assert_status_ok();

    let response = server
        .post("/user/login")
        .json(&json!({ "username": "alice", "password": "hunter22" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["message"], "Successfully logged in.");
    let new_session = body["session_id"].as_str().unwrap().to_string();

    // logging in replaced the old session
    let form = MultipartForm::new().add_text("title", "stale session");
    server
        .post("/post/create")
        .add_header("session-id", session.as_str())
        .multipart(form)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = server
        .post("/user/logout")
        .add_header("session-id", new_session.as_str())
        .await;
    response.assert_status_ok();

    // revoked sessions cannot log out twice
    server
        .post("/user/logout")
        .add_header("session-id", new_session.as_str())
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_signup_duplicate_username_conflicts() {
    let server = create_test_server();
    signup(&server, "alice").await;

    let response = server
        .post("/user/signup")
        .json(&json!({
            "username": "alice",
            "password": "hunter22",
            "email": "other@example.com",
        }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_signup_rejects_short_password_and_bad_email() {
    let server = create_test_server();

    server
        .post("/user/signup")
        .json(&json!({
            "username": "bob",
            "password": "short",
            "email": "bob@example.com",
        }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    server
        .post("/user/signup")
        .json(&json!({
            "username": "bob",
            "password": "hunter22",
            "email": "not-an-email",
        }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_wrong_password_matches_unknown_user() {
    let server = create_test_server();
    signup(&server, "alice").await;

    let wrong = server
        .post("/user/login")
        .json(&json!({ "username": "alice", "password": "wrongpass" }))
        .await;
    wrong.assert_status(StatusCode::NOT_FOUND);

    let unknown = server
        .post("/user/login")
        .json(&json!({ "username": "nobody", "password": "wrongpass" }))
        .await;
    unknown.assert_status(StatusCode::NOT_FOUND);

    let wrong_body: Value = wrong.json();
    let unknown_body: Value = unknown.json();
    assert_eq!(wrong_body["message"], unknown_body["message"]);
}

#[tokio::test]
async fn test_missing_and_garbage_session_forbidden() {
    let server = create_test_server();
    let form = MultipartForm::new().add_text("title", "no auth");
    server
        .post("/post/create")
        .multipart(form)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let form = MultipartForm::new().add_text("title", "bad auth");
    server
        .post("/post/create")
        .add_header("session-id", "not-a-uuid")
        .multipart(form)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

// =============================================================================
// Posts and media
// =============================================================================

#[tokio::test]
async fn test_create_post_with_images() {
    let server = create_test_server();
    let session = signup(&server, "alice").await;

    let form = MultipartForm::new()
        .add_text("title", "my screenshot")
        .add_text("text_content", "look at this")
        .add_text("tags", "RPG, indie")
        .add_part(
            "images",
            Part::bytes(vec![0x89u8, 0x50, 0x4e, 0x47])
                .file_name("shot.png")
                .mime_type("image/png"),
        )
        .add_part(
            "images",
            Part::bytes(vec![0x89u8, 0x50, 0x4e, 0x47])
                .file_name("shot.png")
                .mime_type("image/png"),
        );

    let response = server
        .post("/post/create")
        .add_header("session-id", session.as_str())
        .multipart(form)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["title"], "my screenshot");
    let urls = body["urls"].as_array().unwrap();
    assert_eq!(urls.len(), 2);
    // duplicate filenames were disambiguated
    assert_ne!(urls[0], urls[1]);
    assert!(urls[0].as_str().unwrap().ends_with("shot.png"));

    // tags were registered and lowercased
    let tags: Value = server.get("/tags/").await.json();
    let names: Vec<&str> = tags
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["tag_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["indie", "rpg"]);
}

#[tokio::test]
async fn test_create_post_rejects_unsupported_media_type() {
    let server = create_test_server();
    let session = signup(&server, "alice").await;

    let form = MultipartForm::new().add_text("title", "nope").add_part(
        "images",
        Part::bytes(b"GIF89a".to_vec())
            .file_name("anim.gif")
            .mime_type("image/gif"),
    );
    server
        .post("/post/create")
        .add_header("session-id", session.as_str())
        .multipart(form)
        .await
        .assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_create_post_unreachable_object_store() {
    let state = AppState::in_memory(AppConfig::default())
        .with_object_store(Arc::new(InMemoryObjectStore::unreachable()));
    let server = TestServer::new(build_router(state));
    let session = signup(&server, "alice").await;

    let form = MultipartForm::new().add_text("title", "doomed").add_part(
        "images",
        Part::bytes(vec![1u8, 2, 3])
            .file_name("shot.png")
            .mime_type("image/png"),
    );
    let response = server
        .post("/post/create")
        .add_header("session-id", session.as_str())
        .multipart(form)
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(
        body["message"],
        "Post could not be uploaded as object storage is not reachable."
    );
}

#[tokio::test]
async fn test_feed_filters_by_author_and_tag() {
    let server = create_test_server();
    let alice = signup(&server, "alice").await;
    let bob = signup(&server, "bob").await;

    let form = MultipartForm::new()
        .add_text("title", "alice rpg")
        .add_text("tags", "rpg");
    server
        .post("/post/create")
        .add_header("session-id", alice.as_str())
        .multipart(form)
        .await
        .assert_status_ok();
    create_post(&server, &bob, "bob untagged").await;

    let all: Value = server.get("/post/").await.json();
    assert_eq!(all["count"], 2);

    let tagged: Value = server.get("/post/?tag=rpg").await.json();
    assert_eq!(tagged["count"], 1);
    assert_eq!(tagged["data"][0]["title"], "alice rpg");
    assert_eq!(tagged["data"][0]["author"]["username"], "alice");

    let author_id = tagged["data"][0]["author"]["id"].as_str().unwrap();
    let by_author: Value = server
        .get(&format!("/post/?uid={}", author_id))
        .await
        .json();
    assert_eq!(by_author["count"], 1);
    assert_eq!(by_author["data"][0]["title"], "alice rpg");
}

#[tokio::test]
async fn test_search_posts() {
    let server = create_test_server();
    let session = signup(&server, "alice").await;
    create_post(&server, &session, "Elden Ring boss guide").await;
    create_post(&server, &session, "Ring of fire speedrun").await;
    create_post(&server, &session, "unrelated").await;

    let body: Value = server.get("/post/search?q=ring").await.json();
    assert_eq!(body["count"], 2);
    // every word must match
    let body: Value = server.get("/post/search?q=ring%20boss").await.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["title"], "Elden Ring boss guide");
    // search responses are a single page
    assert!(body["cursor_id"].is_null());
}

#[tokio::test]
async fn test_post_details_with_comments_and_rating() {
    let server = create_test_server();
    let alice = signup(&server, "alice").await;
    let bob = signup(&server, "bob").await;
    let post_id = create_post(&server, &alice, "rate me").await;

    server
        .post(&format!("/post/{}/comments", post_id))
        .add_header("session-id", bob.as_str())
        .json(&json!({ "comment_text": "nice one" }))
        .await
        .assert_status_ok();

    server
        .post(&format!("/post/{}/rating", post_id))
        .add_header("session-id", alice.as_str())
        .json(&json!({ "rating": 5 }))
        .await
        .assert_status_ok();
    server
        .post(&format!("/post/{}/rating", post_id))
        .add_header("session-id", bob.as_str())
        .json(&json!({ "rating": 2 }))
        .await
        .assert_status_ok();

    let body: Value = server.get(&format!("/post/{}", post_id)).await.json();
    assert_eq!(body["post"]["title"], "rate me");
    assert_eq!(body["comments"]["count"], 1);
    assert_eq!(body["comments"]["data"][0]["content"], "nice one");
    assert_eq!(body["comments"]["data"][0]["author"]["username"], "bob");
    // (5 + 2) / 2 rounds to 4
    assert_eq!(body["avg_rating"], 4);
}

#[tokio::test]
async fn test_rating_upsert_replaces_previous_value() {
    let server = create_test_server();
    let session = signup(&server, "alice").await;
    let post_id = create_post(&server, &session, "rate me").await;

    for value in [5, 1] {
        server
            .post(&format!("/post/{}/rating", post_id))
            .add_header("session-id", session.as_str())
            .json(&json!({ "rating": value }))
            .await
            .assert_status_ok();
    }

    let body: Value = server.get(&format!("/post/{}", post_id)).await.json();
    assert_eq!(body["avg_rating"], 1);
}

#[tokio::test]
async fn test_rating_out_of_range_rejected() {
    let server = create_test_server();
    let session = signup(&server, "alice").await;
    let post_id = create_post(&server, &session, "rate me").await;

    server
        .post(&format!("/post/{}/rating", post_id))
        .add_header("session-id", session.as_str())
        .json(&json!({ "rating": 6 }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_soft_delete_hides_post_everywhere() {
    let server = create_test_server();
    let session = signup(&server, "alice").await;
    let post_id = create_post(&server, &session, "ephemeral").await;

    let response = server
        .delete(&format!("/post/{}", post_id))
        .add_header("session-id", session.as_str())
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Post deleted.");

    let feed: Value = server.get("/post/").await.json();
    assert_eq!(feed["count"], 0);
    server
        .get(&format!("/post/{}", post_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // deleting twice fails like it never existed
    server
        .delete(&format!("/post/{}", post_id))
        .add_header("session-id", session.as_str())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_post_scoped_to_author() {
    let server = create_test_server();
    let alice = signup(&server, "alice").await;
    let bob = signup(&server, "bob").await;
    let post_id = create_post(&server, &alice, "mine").await;

    server
        .delete(&format!("/post/{}", post_id))
        .add_header("session-id", bob.as_str())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let feed: Value = server.get("/post/").await.json();
    assert_eq!(feed["count"], 1);
}

// =============================================================================
// Comments
// =============================================================================

#[tokio::test]
async fn test_comment_on_missing_post_not_found() {
    let server = create_test_server();
    let session = signup(&server, "alice").await;

    server
        .post(&format!("/post/{}/comments", uuid::Uuid::new_v4()))
        .add_header("session-id", session.as_str())
        .json(&json!({ "comment_text": "hello?" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_comment_scoped_to_author_and_post() {
    let server = create_test_server();
    let alice = signup(&server, "alice").await;
    let bob = signup(&server, "bob").await;
    let post_id = create_post(&server, &alice, "discuss").await;
    let other_post = create_post(&server, &alice, "other").await;

    let response = server
        .post(&format!("/post/{}/comments", post_id))
        .add_header("session-id", alice.as_str())
        .json(&json!({ "comment_text": "first" }))
        .await;
    response.assert_status_ok();
    let comment: Value = response.json();
    let comment_id = comment["id"].as_str().unwrap();

    // wrong author
    server
        .delete(&format!("/post/{}/comments/{}", post_id, comment_id))
        .add_header("session-id", bob.as_str())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    // wrong post
    server
        .delete(&format!("/post/{}/comments/{}", other_post, comment_id))
        .add_header("session-id", alice.as_str())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let response = server
        .delete(&format!("/post/{}/comments/{}", post_id, comment_id))
        .add_header("session-id", alice.as_str())
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Comment deleted.");

    let comments: Value = server
        .get(&format!("/post/{}/comments", post_id))
        .await
        .json();
    assert_eq!(comments["count"], 0);
}
