use axum::http::StatusCode;

use crate::helpers::{sample_house, spawn_app};

#[tokio::test]
async fn valid_form_yields_formatted_price() {
    let mut app = spawn_app();
    app.logged_in_as("testuser", "test1234").await;

    let response = app.post_form("/predict", &sample_house()).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(
        response.body.contains("Estimated House Price: ₹ 2,326,000.00"),
        "{}",
        response.body
    );
    assert!(response.body.contains("Welcome, testuser"));
}

#[tokio::test]
async fn negative_estimates_are_floored_at_zero() {
    let mut app = spawn_app();
    app.logged_in_as("testuser", "test1234").await;

    let mut form = sample_house();
    for (name, value) in form.iter_mut() {
        *value = match *name {
            "area" => "0",
            "age_of_house" => "10000",
            _ => "0",
        };
    }
    let response = app.post_form("/predict", &form).await;
    assert!(response.body.contains("Estimated House Price: ₹ 0.00"));
}

#[tokio::test]
async fn missing_field_is_reported_inline() {
    let mut app = spawn_app();
    app.logged_in_as("testuser", "test1234").await;

    let form: Vec<_> = sample_house()
        .into_iter()
        .filter(|(name, _)| *name != "area")
        .collect();
    let response = app.post_form("/predict", &form).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Error: missing field `area`"));
    assert!(!response.body.contains("Estimated House Price"));
}

#[tokio::test]
async fn non_numeric_field_is_reported_inline() {
    let mut app = spawn_app();
    app.logged_in_as("testuser", "test1234").await;

    let mut form = sample_house();
    form[1] = ("bedrooms", "two");
    let response = app.post_form("/predict", &form).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Error: invalid value for `bedrooms`"));
}

#[tokio::test]
async fn empty_body_is_an_error_not_a_crash() {
    let mut app = spawn_app();
    app.logged_in_as("testuser", "test1234").await;

    let response = app.post_form("/predict", &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Error: missing field `area`"));
}
