use askama::Template;
use axum::Form;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::Deserialize;
use tracing::instrument;

use crate::errors::AuthError;
use crate::routes::flash::{self, Flash, FlashLevel};
use crate::routes::render;
use crate::routes::session::{CurrentUser, login_location, safe_next, session_user};
use crate::services::session::SESSION_COOKIE;
use crate::startup::AppState;

#[derive(Template)]
#[template(path = "signup.html")]
struct SignupTemplate {
    flashes: Vec<Flash>,
    username: String,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    flashes: Vec<Flash>,
    username: String,
    /// Form target, keeping any `next` parameter.
    action: String,
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

impl NextQuery {
    fn target(&self) -> Option<&str> {
        safe_next(self.next.as_deref())
    }
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Deserialize)]
pub struct SignupForm {
    username: String,
    password: String,
    confirm_password: String,
}

/// Logged-in users have no business on the login or signup pages.
async fn already_logged_in(jar: &CookieJar, state: &AppState) -> Result<bool, AuthError> {
    Ok(session_user(jar, state).await?.is_some())
}

fn login_page_with(
    jar: CookieJar,
    extra: Option<Flash>,
    username: String,
    next: Option<&str>,
) -> Response {
    let (jar, mut flashes) = flash::take(jar);
    flashes.extend(extra);
    let page = LoginTemplate {
        flashes,
        username,
        action: login_location(next),
    };
    (jar, render(page)).into_response()
}

fn signup_page_with(jar: CookieJar, extra: Option<Flash>, username: String) -> Response {
    let (jar, mut flashes) = flash::take(jar);
    flashes.extend(extra);
    (jar, render(SignupTemplate { flashes, username })).into_response()
}

#[instrument(name = "Web: Login GET", skip(state, jar))]
pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<NextQuery>,
) -> Response {
    match already_logged_in(&jar, &state).await {
        Ok(true) => Redirect::to("/").into_response(),
        Ok(false) => login_page_with(jar, None, String::new(), query.target()),
        Err(e) => e.into_response(),
    }
}

#[instrument(
    name = "Web: Login POST",
    skip(state, jar, payload),
    fields(username = %payload.username)
)]
pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<NextQuery>,
    Form(payload): Form<LoginForm>,
) -> Response {
    tracing::info!("Request to login user received!");
    match already_logged_in(&jar, &state).await {
        Ok(true) => return Redirect::to("/").into_response(),
        Ok(false) => {}
        Err(e) => return e.into_response(),
    }

    // 1. Verify credentials via service
    let user = match state
        .auth_service
        .login(&payload.username, &payload.password)
        .await
    {
        Ok(user) => user,
        Err(e) if e.is_user_facing() => {
            let notice = Flash::new(FlashLevel::Danger, e.to_string());
            return login_page_with(jar, Some(notice), payload.username, query.target());
        }
        Err(e) => return e.into_response(),
    };

    // 2. Create JWT
    let token = match state.sessions.issue(&user.id) {
        Ok(token) => token,
        Err(e) => return e.into_response(),
    };

    // 3. Set HttpOnly cookie and redirect
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    let jar = flash::push(jar.add(cookie), FlashLevel::Success, "Login successful!");

    let target = query.target().unwrap_or("/");
    (jar, Redirect::to(target)).into_response()
}

#[instrument(name = "Web: Signup GET", skip(state, jar))]
pub async fn signup_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    match already_logged_in(&jar, &state).await {
        Ok(true) => Redirect::to("/").into_response(),
        Ok(false) => signup_page_with(jar, None, String::new()),
        Err(e) => e.into_response(),
    }
}

#[instrument(
    name = "Web: Signup POST",
    skip(state, jar, payload),
    fields(username = %payload.username)
)]
pub async fn signup_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(payload): Form<SignupForm>,
) -> Response {
    match already_logged_in(&jar, &state).await {
        Ok(true) => return Redirect::to("/").into_response(),
        Ok(false) => {}
        Err(e) => return e.into_response(),
    }

    match state
        .auth_service
        .register(
            &payload.username,
            &payload.password,
            &payload.confirm_password,
        )
        .await
    {
        Ok(_) => {
            let jar = flash::push(
                jar,
                FlashLevel::Success,
                "Account created successfully! Please login.",
            );
            (jar, Redirect::to("/login")).into_response()
        }
        Err(e) if e.is_user_facing() => {
            let notice = Flash::new(FlashLevel::Danger, e.to_string());
            signup_page_with(jar, Some(notice), payload.username)
        }
        Err(e) => e.into_response(),
    }
}

#[instrument(name = "Web: Logout GET", skip(jar, user), fields(user_id = %user.0.id))]
pub async fn logout_handler(user: CurrentUser, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    let jar = flash::push(jar, FlashLevel::Info, "You have been logged out.");
    (jar, Redirect::to("/login"))
}
