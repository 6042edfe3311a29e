use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use super::response::ApiError;
use crate::session::SESSION_COOKIE;
use crate::AppState;

/// Session gate for protected routes. Extraction succeeds only when the
/// request carries a live session cookie belonging to an admin; anything
/// else is a uniform 401.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub user_id: i64,
    pub session_id: String,
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, ApiError> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session_id = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

        let session = state
            .sessions
            .get(&session_id)
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

        // Users are never deleted, but the admin flag is still the source
        // of truth for access.
        state
            .store
            .get_user(session.user_id)
            .filter(|u| u.is_admin)
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

        Ok(AdminSession {
            user_id: session.user_id,
            session_id,
        })
    }
}
