use axum::http::StatusCode;

use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check_works() {
    let mut app = spawn_app();
    let response = app.get("/health_check").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn home_redirects_to_login_without_session() {
    let mut app = spawn_app();
    let response = app.get("/").await;
    assert!(response.status.is_redirection());
    assert_eq!(response.location.as_deref(), Some("/login"));
}

#[tokio::test]
async fn predict_redirects_to_login_without_session() {
    let mut app = spawn_app();
    let response = app.post_form("/predict", &[("area", "1000")]).await;
    assert!(response.status.is_redirection());
    assert_eq!(response.location.as_deref(), Some("/login?next=%2Fpredict"));

    let login_page = app.get("/login?next=/predict").await;
    assert!(login_page.body.contains("Please log in to access this page."));
    assert!(login_page.body.contains("flash-info"));
}

#[tokio::test]
async fn signup_persists_user_and_redirects_to_login() {
    let mut app = spawn_app();
    let response = app.signup("testuser", "test1234").await;
    assert_eq!(response.location.as_deref(), Some("/login"));

    let login_page = app.get("/login").await;
    assert!(login_page.body.contains("Account created successfully! Please login."));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&app.users_file).unwrap()).unwrap();
    assert_eq!(stored["1"]["username"], "testuser");
    assert_ne!(stored["1"]["password_hash"], "test1234");
}

#[tokio::test]
async fn flash_is_shown_only_once() {
    let mut app = spawn_app();
    app.signup("testuser", "test1234").await;

    let first = app.get("/login").await;
    assert!(first.body.contains("Account created successfully!"));
    let second = app.get("/login").await;
    assert!(!second.body.contains("Account created successfully!"));
    assert!(!app.has_cookie("flash"));
}

#[tokio::test]
async fn signup_rejects_existing_username() {
    let mut app = spawn_app();
    app.signup("testuser", "test1234").await;
    app.get("/login").await;

    let response = app.signup("testuser", "other-pass").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Username already exists"));
    assert!(response.body.contains("flash-danger"));
}

#[tokio::test]
async fn signup_rejects_mismatched_passwords() {
    let mut app = spawn_app();
    let response = app
        .post_form(
            "/signup",
            &[
                ("username", "testuser"),
                ("password", "test1234"),
                ("confirm_password", "test12345"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Passwords do not match!"));
    assert!(!app.users_file.exists());
}

#[tokio::test]
async fn signup_rejects_short_password() {
    let mut app = spawn_app();
    let response = app.signup("testuser", "abc").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Password must be at least 4 characters long."));
    assert!(!app.users_file.exists());
}

#[tokio::test]
async fn login_with_valid_credentials_opens_the_home_page() {
    let mut app = spawn_app();
    app.signup("testuser", "test1234").await;

    let response = app.login("testuser", "test1234").await;
    assert_eq!(response.location.as_deref(), Some("/"));
    assert!(app.has_cookie("session"));

    let home = app.get("/").await;
    assert_eq!(home.status, StatusCode::OK);
    assert!(home.body.contains("Welcome, testuser"));
    assert!(home.body.contains("Login successful!"));
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let mut app = spawn_app();
    app.signup("testuser", "test1234").await;

    let response = app.login("testuser", "wrongpassword").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Invalid password"));
    assert!(!app.has_cookie("session"));
}

#[tokio::test]
async fn login_with_unknown_user_is_rejected() {
    let mut app = spawn_app();
    let response = app.login("nobody", "test1234").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("User not found"));
    assert!(!app.has_cookie("session"));
}

#[tokio::test]
async fn login_follows_local_next_only() {
    let mut app = spawn_app();
    app.signup("testuser", "test1234").await;

    let response = app
        .post_form(
            "/login?next=//evil.example",
            &[("username", "testuser"), ("password", "test1234")],
        )
        .await;
    assert_eq!(response.location.as_deref(), Some("/"));

    app.get("/logout").await;
    let response = app
        .post_form(
            "/login?next=/predict",
            &[("username", "testuser"), ("password", "test1234")],
        )
        .await;
    assert_eq!(response.location.as_deref(), Some("/predict"));
}

#[tokio::test]
async fn next_with_reserved_characters_survives_the_login_form() {
    let mut app = spawn_app();
    app.signup("testuser", "test1234").await;

    let login_page = app.get("/login?next=%2Fa%26b").await;
    assert!(
        login_page.body.contains("next=%2Fa%26b\""),
        "{}",
        login_page.body
    );

    let response = app
        .post_form(
            "/login?next=%2Fa%26b",
            &[("username", "testuser"), ("password", "test1234")],
        )
        .await;
    assert_eq!(response.location.as_deref(), Some("/a&b"));
}

#[tokio::test]
async fn logged_in_users_are_sent_home_from_auth_pages() {
    let mut app = spawn_app();
    app.logged_in_as("testuser", "test1234").await;

    assert_eq!(app.get("/login").await.location.as_deref(), Some("/"));
    assert_eq!(app.get("/signup").await.location.as_deref(), Some("/"));
}

#[tokio::test]
async fn logout_ends_the_session() {
    let mut app = spawn_app();
    app.logged_in_as("testuser", "test1234").await;

    let response = app.get("/logout").await;
    assert_eq!(response.location.as_deref(), Some("/login"));
    assert!(!app.has_cookie("session"));

    let login_page = app.get("/login").await;
    assert!(login_page.body.to_lowercase().contains("logged out"));

    let home = app.get("/").await;
    assert_eq!(home.location.as_deref(), Some("/login"));
}

#[tokio::test]
async fn logout_requires_a_session() {
    let mut app = spawn_app();
    let response = app.get("/logout").await;
    assert_eq!(response.location.as_deref(), Some("/login?next=%2Flogout"));
}

#[tokio::test]
async fn session_for_vanished_user_is_rejected() {
    let mut app = spawn_app();
    app.logged_in_as("testuser", "test1234").await;
    std::fs::remove_file(&app.users_file).unwrap();

    let home = app.get("/").await;
    assert_eq!(home.location.as_deref(), Some("/login"));
}
