//! Integration Tests: HTTP API
//!
//! Exercises the `/api/v1` routes through actix's test service with the
//! in-memory stores, the real user directory and real bearer tokens.

use actix_web::{http::StatusCode, test, web, App};
use post_service::db::{InMemoryPostStore, UserDirectory};
use post_service::handlers;
use post_service::models::{AuthenticationResponse, PostResponse, StatisticResponse, UserIdentity};
use post_service::security::TokenService;
use post_service::services::PostService;
use serde_json::json;
use std::sync::Arc;

const SECRET: &str = "http-api-test-secret";

macro_rules! init_app {
    () => {{
        let directory = Arc::new(UserDirectory::new());
        let posts = web::Data::new(PostService::new(
            Arc::new(InMemoryPostStore::new()),
            directory.clone(),
            20,
        ));
        test::init_service(
            App::new()
                .app_data(posts)
                .app_data(web::Data::from(directory))
                .app_data(web::Data::new(TokenService::new(SECRET, 3600)))
                .configure(handlers::configure),
        )
        .await
    }};
}

macro_rules! register {
    ($app:expr, $username:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/registration")
            .set_json(json!({"username": $username, "password": "secret-password"}))
            .to_request();
        let body: AuthenticationResponse = test::call_and_read_body_json(&$app, req).await;
        body.token
    }};
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

#[actix_web::test]
async fn test_create_list_and_like_flow() {
    let app = init_app!();
    let alice = register!(app, "alice");
    let bob = register!(app, "bob");

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(bearer(&alice))
        .set_json(json!({"content": "hi"}))
        .to_request();
    let created: PostResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created.id, 1);
    assert_eq!(created.owner_name, "alice");

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/recent")
        .insert_header(bearer(&bob))
        .to_request();
    let recent: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(recent.len(), 1);
    assert!(!recent[0].liked_by_me);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/1/likes")
        .insert_header(bearer(&alice))
        .to_request();
    let liked: PostResponse = test::call_and_read_body_json(&app, req).await;
    assert!(liked.liked_by_me);
    assert_eq!(liked.likes, 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/1")
        .insert_header(bearer(&bob))
        .to_request();
    let as_bob: PostResponse = test::call_and_read_body_json(&app, req).await;
    assert!(!as_bob.liked_by_me);
    assert_eq!(as_bob.likes, 1);
}

#[actix_web::test]
async fn test_delete_likes_records_dislike() {
    let app = init_app!();
    let alice = register!(app, "alice");

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(bearer(&alice))
        .set_json(json!({"content": "meh"}))
        .to_request();
    let _: PostResponse = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri("/api/v1/posts/1/likes")
        .insert_header(bearer(&alice))
        .to_request();
    let post: PostResponse = test::call_and_read_body_json(&app, req).await;
    assert!(post.disliked_by_me);
    assert_eq!(post.dislikes, 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/reactions/1")
        .insert_header(bearer(&alice))
        .to_request();
    let stats: Vec<StatisticResponse> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].user.username, "alice");
}

#[actix_web::test]
async fn test_foreign_edit_is_forbidden() {
    let app = init_app!();
    let alice = register!(app, "alice");
    let bob = register!(app, "bob");

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(bearer(&alice))
        .set_json(json!({"content": "original"}))
        .to_request();
    let _: PostResponse = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(bearer(&bob))
        .set_json(json!({"id": 1, "content": "hijacked"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_delete_post_by_owner() {
    let app = init_app!();
    let alice = register!(app, "alice");
    let bob = register!(app, "bob");

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(bearer(&alice))
        .set_json(json!({"content": "short-lived"}))
        .to_request();
    let _: PostResponse = test::call_and_read_body_json(&app, req).await;

    // A foreign delete is accepted but changes nothing
    let req = test::TestRequest::delete()
        .uri("/api/v1/posts/1")
        .insert_header(bearer(&bob))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/1")
        .insert_header(bearer(&bob))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri("/api/v1/posts/1")
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/1")
        .insert_header(bearer(&alice))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_missing_token_is_unauthorized() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/v1/posts").to_request();
    let err = test::try_call_service(&app, req)
        .await
        .expect_err("request without a token should be rejected");
    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/posts")
        .insert_header(bearer("not-a-jwt"))
        .to_request();
    let err = test::try_call_service(&app, req)
        .await
        .expect_err("garbage token should be rejected");
    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_non_numeric_post_id_is_bad_request() {
    let app = init_app!();
    let alice = register!(app, "alice");

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/abc")
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_authentication_and_profile() {
    let app = init_app!();
    let _ = register!(app, "alice");

    let req = test::TestRequest::post()
        .uri("/api/v1/authentication")
        .set_json(json!({"username": "alice", "password": "wrong-password"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/authentication")
        .set_json(json!({"username": "alice", "password": "secret-password"}))
        .to_request();
    let auth: AuthenticationResponse = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/me")
        .insert_header(bearer(&auth.token))
        .to_request();
    let me: UserIdentity = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me.username, "alice");
    assert!(me.avatar.is_none());

    let req = test::TestRequest::post()
        .uri("/api/v1/me/avatar")
        .insert_header(bearer(&auth.token))
        .set_json(json!({"attachment_id": "avatar-1"}))
        .to_request();
    let updated: UserIdentity = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.avatar.map(|a| a.id), Some("avatar-1".to_string()));
}

#[actix_web::test]
async fn test_duplicate_registration_conflicts() {
    let app = init_app!();
    let _ = register!(app, "alice");

    let req = test::TestRequest::post()
        .uri("/api/v1/registration")
        .set_json(json!({"username": "alice", "password": "another-password"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/v1/registration")
        .set_json(json!({"username": "carol", "password": "123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
