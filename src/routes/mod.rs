pub mod auth;
pub mod flash;
pub mod health;
pub mod home;
pub mod session;

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use crate::errors::internal_error;

pub fn render<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render template: {:?}", e);
            internal_error()
        }
    }
}
