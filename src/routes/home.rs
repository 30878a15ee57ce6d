use std::collections::HashMap;

use askama::Template;
use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use tracing::instrument;

use crate::routes::flash::{self, Flash};
use crate::routes::render;
use crate::routes::session::{CurrentUser, session_user};
use crate::startup::AppState;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    flashes: Vec<Flash>,
    username: String,
    prediction_text: Option<String>,
}

fn index_page(jar: CookieJar, username: String, prediction_text: Option<String>) -> Response {
    let (jar, flashes) = flash::take(jar);
    let page = IndexTemplate {
        flashes,
        username,
        prediction_text,
    };
    (jar, render(page)).into_response()
}

#[instrument(name = "Web: Home GET", skip(state, jar))]
pub async fn home(State(state): State<AppState>, jar: CookieJar) -> Response {
    match session_user(&jar, &state).await {
        Ok(Some(user)) => index_page(jar, user.username, None),
        Ok(None) => Redirect::to("/login").into_response(),
        Err(e) => e.into_response(),
    }
}

#[instrument(
    name = "Web: Predict POST",
    skip(state, user, jar, form),
    fields(user_id = %user.0.id)
)]
pub async fn predict(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Response {
    // An unreadable body is treated like an empty form, so it surfaces as a missing field.
    let form = match form {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            tracing::warn!("Unreadable prediction form: {}", rejection);
            HashMap::new()
        }
    };

    let text = state.prediction_service.estimate(&form);
    let CurrentUser(user) = user;
    index_page(jar, user.username, Some(text))
}
