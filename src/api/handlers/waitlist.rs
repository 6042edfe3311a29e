use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::api::extract::AdminSession;
use crate::api::response::{self, validation_error, ApiError, AppJson, SuccessBody};
use crate::store::models::WaitlistEntry;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct JoinWaitlistRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
}

/// POST /api/waitlist (public)
pub async fn join_waitlist(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<JoinWaitlistRequest>,
) -> Result<Json<WaitlistEntry>, ApiError> {
    req.validate().map_err(|e| validation_error(&e))?;

    let entry = state
        .store
        .create_waitlist_entry(&req.email, &req.name, req.company.as_deref())?;

    // Log the id, not the email.
    tracing::info!(waitlist_id = entry.id, "New waitlist signup");
    Ok(Json(entry))
}

/// GET /api/waitlist
pub async fn list_waitlist(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<WaitlistEntry>> {
    Json(state.store.list_waitlist_entries())
}

/// DELETE /api/waitlist/:id
///
/// Deleting an id that is already gone is not an error.
pub async fn delete_waitlist_entry(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Json<SuccessBody> {
    state.store.delete_waitlist_entry(id);
    tracing::debug!(waitlist_id = id, "Deleted waitlist entry");
    response::success()
}
