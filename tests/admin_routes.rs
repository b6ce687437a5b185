use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use blog_admin::auth::{self, Auth};
use blog_admin::blog::User;
use blog_admin::state::State;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

async fn seed_user(dir: &tempfile::TempDir, username: &str, password: &str, is_admin: bool) {
    Auth::write_entry(dir.path(), username, String::from(password))
        .await
        .expect("writing the login entry should succeed");
    auth::save_user(
        dir.path(),
        &User {
            username: String::from(username),
            name: String::from(username),
            is_admin,
        },
    )
    .await
    .expect("writing the user file should succeed");
}

async fn admin_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir should be creatable");
    seed_user(&dir, "admin", "hunter2", true).await;

    let state = Arc::new(State::new(dir.path()));
    (blog_admin::app(state), dir)
}

async fn log_in(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!(
                    "username={username}&password={password}"
                )))
                .expect("request should build"),
        )
        .await
        .expect("request should not fail");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set the session cookie")
        .to_str()
        .expect("cookie should be a string");
    String::from(cookie.split(';').next().expect("cookie should have a value"))
}

async fn get(app: &Router, cookie: Option<&str>, uri: &str) -> Response {
    let mut request = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }

    app.clone()
        .oneshot(request.body(Body::empty()).expect("request should build"))
        .await
        .expect("request should not fail")
}

async fn post_form(app: &Router, cookie: Option<&str>, uri: &str, body: &str) -> Response {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }

    app.clone()
        .oneshot(
            request
                .body(Body::from(String::from(body)))
                .expect("request should build"),
        )
        .await
        .expect("request should not fail")
}

async fn body_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response should redirect")
        .to_str()
        .expect("location should be a string")
}

#[tokio::test]
async fn admin_pages_send_strangers_to_the_login_form() {
    let (app, _dir) = admin_app().await;

    let response = get(&app, None, "/posts/admin/new").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    // the dispatcher aborts the same way, whatever the body says
    let response = post_form(&app, None, "/posts/admin/new", "intent=create").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn admin_pages_reject_non_admins() {
    let (app, dir) = admin_app().await;
    seed_user(&dir, "viewer", "password1", false).await;
    let cookie = log_in(&app, "viewer", "password1").await;

    let response = get(&app, Some(&cookie), "/posts/admin/new").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn the_new_form_starts_empty() {
    let (app, _dir) = admin_app().await;
    let cookie = log_in(&app, "admin", "hunter2").await;

    let response = get(&app, Some(&cookie), "/posts/admin/new").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Create a post"));
    assert!(!body.contains("is required"));
    assert!(!body.contains("Delete"));
}

#[tokio::test]
async fn creating_a_post_publishes_it() {
    let (app, _dir) = admin_app().await;
    let cookie = log_in(&app, "admin", "hunter2").await;

    let response = post_form(
        &app,
        Some(&cookie),
        "/posts/admin/new",
        "intent=create&title=Hi&slug=hi&markdown=%23+Hi",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/posts/admin");

    // the public page renders the Markdown body
    let response = get(&app, None, "/posts/hi").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("<h1>Hi</h1>"));

    // and the listings link to it
    let response = get(&app, None, "/posts").await;
    assert!(body_text(response).await.contains("/posts/hi"));
    let response = get(&app, Some(&cookie), "/posts/admin").await;
    assert!(body_text(response).await.contains("/posts/admin/hi"));
}

#[tokio::test]
async fn rejected_submissions_keep_the_typed_values() {
    let (app, _dir) = admin_app().await;
    let cookie = log_in(&app, "admin", "hunter2").await;

    post_form(
        &app,
        Some(&cookie),
        "/posts/admin/new",
        "intent=create&title=Old&slug=old-slug&markdown=x",
    )
    .await;

    let response = post_form(
        &app,
        Some(&cookie),
        "/posts/admin/old-slug",
        "intent=update&title=&slug=new-slug&markdown=x",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Title is required"));
    assert!(!body.contains("Slug is required"));
    assert!(body.contains("value=\"new-slug\""));

    // nothing was renamed
    let response = get(&app, Some(&cookie), "/posts/admin/old-slug").await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get(&app, Some(&cookie), "/posts/admin/new-slug").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn updating_under_a_new_slug_moves_the_post() {
    let (app, _dir) = admin_app().await;
    let cookie = log_in(&app, "admin", "hunter2").await;

    post_form(
        &app,
        Some(&cookie),
        "/posts/admin/new",
        "intent=create&title=Hi&slug=hi&markdown=x",
    )
    .await;

    let response = post_form(
        &app,
        Some(&cookie),
        "/posts/admin/hi",
        "intent=update&title=Hi+again&slug=hi-2&markdown=y",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/posts/admin");

    let response = get(&app, None, "/posts/hi").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get(&app, None, "/posts/hi-2").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Hi again"));
}

#[tokio::test]
async fn deleting_a_post_removes_it() {
    let (app, _dir) = admin_app().await;
    let cookie = log_in(&app, "admin", "hunter2").await;

    post_form(
        &app,
        Some(&cookie),
        "/posts/admin/new",
        "intent=create&title=Hi&slug=hi&markdown=x",
    )
    .await;

    let response = post_form(&app, Some(&cookie), "/posts/admin/hi", "intent=delete").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/posts/admin");

    let response = get(&app, None, "/posts/hi").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn editing_an_unknown_slug_is_a_404_naming_it() {
    let (app, _dir) = admin_app().await;
    let cookie = log_in(&app, "admin", "hunter2").await;

    let response = get(&app, Some(&cookie), "/posts/admin/ghost-slug").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("ghost-slug"));
}

#[tokio::test]
async fn unrecognized_intents_are_rejected() {
    let (app, _dir) = admin_app().await;
    let cookie = log_in(&app, "admin", "hunter2").await;

    let response = post_form(
        &app,
        Some(&cookie),
        "/posts/admin/new",
        "intent=publish&title=Hi&slug=hi&markdown=x",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // nothing was created along the way
    let response = get(&app, None, "/posts/hi").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn logging_out_ends_the_session() {
    let (app, _dir) = admin_app().await;
    let cookie = log_in(&app, "admin", "hunter2").await;

    let response = post_form(&app, Some(&cookie), "/logout", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = get(&app, Some(&cookie), "/posts/admin").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn bad_credentials_do_not_log_in() {
    let (app, _dir) = admin_app().await;

    let response = post_form(&app, None, "/login", "username=admin&password=wrong").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Invalid username or password"));
}
