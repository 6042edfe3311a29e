use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use super::nullable;
use crate::api::extract::AdminSession;
use crate::api::response::{self, validation_error, ApiError, AppJson, AppQuery, SuccessBody};
use crate::store::models::{Folder, Patch};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFoldersParams {
    #[serde(default)]
    pub parent_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub parent_id: Option<Option<i64>>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/folders?parentId=
///
/// Without `parentId` this lists root folders, not all folders.
pub async fn list_folders(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<ListFoldersParams>,
) -> Json<Vec<Folder>> {
    Json(state.store.list_folders(params.parent_id))
}

/// POST /api/folders
pub async fn create_folder(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateFolderRequest>,
) -> Result<Json<Folder>, ApiError> {
    req.validate().map_err(|e| validation_error(&e))?;

    let folder = state
        .store
        .create_folder(&req.name, req.description.as_deref(), req.parent_id)?;

    tracing::debug!(folder_id = folder.id, "Created folder");
    Ok(Json(folder))
}

/// PATCH /api/folders/:id
pub async fn update_folder(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<UpdateFolderRequest>,
) -> Result<Json<Folder>, ApiError> {
    if req.name.is_none() && req.description.is_none() && req.parent_id.is_none() {
        return Err(ApiError::bad_request(
            "at least one field (name, description, parentId) must be provided",
        ));
    }

    let folder = state.store.update_folder(
        id,
        req.name.as_deref(),
        Patch::from(req.description),
        Patch::from(req.parent_id),
    )?;

    tracing::debug!(folder_id = id, "Updated folder");
    Ok(Json(folder))
}

/// DELETE /api/folders/:id
///
/// Cascades to the files directly inside the folder; nested folders are
/// left in place. Stored bytes for the removed files are cleaned up
/// best-effort after the metadata is gone.
pub async fn delete_folder(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessBody>, ApiError> {
    let removed = state.store.delete_folder(id)?;

    for file in &removed {
        if let Err(e) = state.object_store.delete(&file.path).await {
            tracing::warn!(file_id = file.id, error = %e, "Failed to delete file content during cascade");
        }
    }

    tracing::debug!(folder_id = id, files_removed = removed.len(), "Deleted folder");
    Ok(response::success())
}
