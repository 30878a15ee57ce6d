use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use tracing::instrument;

use crate::errors::AuthError;
use crate::models::user::UserModel;
use crate::services::session::SESSION_COOKIE;
use crate::startup::AppState;

/// The logged-in user. Rejects with a redirect to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserModel);

/// Resolve the session cookie to a user that still exists.
pub async fn session_user(
    jar: &CookieJar,
    state: &AppState,
) -> Result<Option<UserModel>, AuthError> {
    let Some(user_id) = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| state.sessions.verify(cookie.value()))
    else {
        return Ok(None);
    };
    state.auth_service.current_user(&user_id).await
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthError;

    #[instrument(name = "Extracting current user", skip(parts, state))]
    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        match session_user(&jar, state).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                tracing::debug!("No valid session");
                Err(AuthError::Unauthenticated {
                    next: Some(parts.uri.path().to_string()),
                })
            }
        }
    }
}

/// Only local absolute paths are followed after login.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|path| {
        path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
    })
}

/// `/login`, carrying `next` percent-encoded in the query when present.
pub fn login_location(next: Option<&str>) -> String {
    let Some(path) = next else {
        return "/login".to_string();
    };
    match serde_urlencoded::to_string(&[("next", path)]) {
        Ok(query) => format!("/login?{query}"),
        Err(e) => {
            tracing::warn!("Dropping unencodable next path: {:?}", e);
            "/login".to_string()
        }
    }
}
