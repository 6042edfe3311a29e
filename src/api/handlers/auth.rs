use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use crate::api::response::{self, ApiError, AppJson, SuccessBody};
use crate::auth;
use crate::session::SESSION_COOKIE;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/auth/login
///
/// Wrong username, wrong password, and non-admin account all produce the
/// same rejection, so the response never reveals which usernames exist.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<(CookieJar, Json<SuccessBody>), ApiError> {
    let rejected = || ApiError::unauthorized("Invalid credentials");

    let user = match state.store.get_user_by_username(&req.username) {
        Some(user) => user,
        None => {
            // Burn the same verification cost as a known username so the
            // response time does not reveal which accounts exist.
            let _ = auth::verify_password(&req.password, auth::dummy_hash());
            return Err(rejected());
        }
    };

    let verified = auth::verify_password(&req.password, &user.password_hash)
        .map_err(|e| ApiError::internal(e.to_string()))?;
    if !verified || !user.is_admin {
        return Err(rejected());
    }

    let session_id = state.sessions.create(user.id);
    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    tracing::info!(user_id = user.id, "Admin logged in");
    Ok((jar.add(cookie), response::success()))
}

/// POST /api/auth/logout
///
/// Destroys the session and clears the cookie. Idempotent: logging out
/// without a session is still a success.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessBody>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.destroy(cookie.value());
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, response::success())
}
