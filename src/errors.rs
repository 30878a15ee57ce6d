use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use thiserror::Error;

use crate::routes::flash::{self, FlashLevel};
use crate::routes::session::login_location;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username already exists")]
    UserAlreadyExists,

    #[error("Passwords do not match!")]
    PasswordMismatch,

    #[error("Password must be at least 4 characters long.")]
    PasswordTooShort,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid password")]
    InvalidPassword,

    /// No valid session. `next` is where to send the user after logging in.
    #[error("Please log in to access this page.")]
    Unauthenticated { next: Option<String> },

    #[error("Failed to create session")]
    TokenCreation,

    #[error("Internal server error")]
    Internal,
}

impl AuthError {
    /// Whether the message is meant to be flashed back onto the form.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AuthError::UserAlreadyExists
                | AuthError::PasswordMismatch
                | AuthError::PasswordTooShort
                | AuthError::UserNotFound
                | AuthError::InvalidPassword
        )
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken => AuthError::UserAlreadyExists,
            other => {
                tracing::error!("User store failure: {:?}", other);
                AuthError::Internal
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthenticated { next } => {
                let location = login_location(next.as_deref());
                let jar = flash::push(
                    CookieJar::new(),
                    FlashLevel::Info,
                    AuthError::Unauthenticated { next: None }.to_string(),
                );
                (jar, Redirect::to(&location)).into_response()
            }
            AuthError::TokenCreation | AuthError::Internal => internal_error(),
            // Handlers flash these; reaching here means one slipped through.
            other => (StatusCode::BAD_REQUEST, other.to_string()).into_response(),
        }
    }
}

pub fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<h1>Internal Server Error</h1><p>An unexpected error occurred.</p>"),
    )
        .into_response()
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Username already exists")]
    UsernameTaken,

    #[error("User id `{0}` is not an integer")]
    CorruptId(String),

    #[error("Failed to access the user file")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize the user file")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model artifact {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact {path}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{what} has {actual} entries, expected {expected}")]
    Shape {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Tree {tree}, node {node}: {reason}")]
    InvalidTree {
        tree: usize,
        node: usize,
        reason: String,
    },

    #[error("Random forest has no trees")]
    EmptyForest,

    #[error("model produced a non-finite price")]
    NonFinitePrediction,
}

/// Reasons a prediction form could not be turned into features.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeatureError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid value for `{field}`: expected {expected}, got {value:?}")]
    InvalidNumber {
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("value for `{0}` must be finite")]
    NonFinite(&'static str),
}
