use std::collections::HashSet;
use std::io::Write;
use std::path::{Component, Path as FsPath};
use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::Deserialize;

use crate::api::extract::AdminSession;
use crate::api::response::{self, ApiError, AppQuery, SuccessBody};
use crate::store::models::FileRecord;
use crate::store::NewFile;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesParams {
    #[serde(default)]
    pub folder_id: Option<i64>,
}

/// One `files` part of the upload form, fully buffered.
struct PendingUpload {
    name: String,
    mime_type: String,
    data: Bytes,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/files?folderId=
pub async fn list_files(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<ListFilesParams>,
) -> Json<Vec<FileRecord>> {
    Json(state.store.list_files(params.folder_id))
}

/// POST /api/files
///
/// Multipart form: repeated `files` parts, optionally repeated `paths`
/// parts (relative storage paths, one per file) and a `folderId`. All
/// validation happens before the first byte reaches storage; a failure
/// partway through cleans up what was already written.
pub async fn upload_files(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Vec<FileRecord>>, ApiError> {
    let mut uploads: Vec<PendingUpload> = Vec::new();
    let mut paths: Vec<String> = Vec::new();
    let mut folder_id: Option<i64> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "files" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(|s| s.to_string());

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {e}")))?;

                if data.len() as u64 > state.config.max_upload_size {
                    return Err(ApiError::payload_too_large(format!(
                        "File exceeds maximum upload size of {} bytes",
                        state.config.max_upload_size
                    )));
                }

                if file_name.trim().is_empty() {
                    return Err(ApiError::bad_request(
                        "each files part must carry a filename",
                    ));
                }

                // MIME from the part header, or guessed from the filename
                let mime_type = content_type
                    .filter(|ct| ct != "application/octet-stream")
                    .or_else(|| {
                        mime_guess::from_path(&file_name)
                            .first()
                            .map(|m| m.to_string())
                    })
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                uploads.push(PendingUpload {
                    name: file_name,
                    mime_type,
                    data,
                });
            }
            "paths" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid paths entry: {e}")))?;
                paths.push(text);
            }
            "folderId" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid folderId: {e}")))?;
                folder_id = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| ApiError::bad_request("folderId must be an integer"))?,
                );
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    if uploads.is_empty() {
        return Err(ApiError::bad_request("at least one file is required"));
    }
    if !paths.is_empty() && paths.len() != uploads.len() {
        return Err(ApiError::bad_request(
            "paths entries must match files one-to-one",
        ));
    }

    // Storage keys mirror the uploaded relative paths; bare filenames
    // when the client sent no paths.
    let keys: Vec<String> = if paths.is_empty() {
        uploads.iter().map(|u| u.name.clone()).collect()
    } else {
        paths
    };

    // Fail closed: no byte is written until everything checks out.
    if let Some(fid) = folder_id {
        if state.store.get_folder(fid).is_none() {
            return Err(ApiError::bad_request(format!("folder {fid} does not exist")));
        }
    }
    let mut seen: HashSet<&str> = HashSet::with_capacity(keys.len());
    for key in &keys {
        validate_relative_path(key)?;
        // Two records must never share one storage key: deleting either
        // would take the other's bytes with it.
        if !seen.insert(key.as_str()) {
            return Err(ApiError::bad_request(format!(
                "duplicate storage path '{key}' in one upload"
            )));
        }
        if state.store.file_path_in_use(key) {
            return Err(ApiError::conflict(format!(
                "a file is already stored at '{key}'"
            )));
        }
    }

    let mut written: Vec<String> = Vec::new();
    let mut records: Vec<FileRecord> = Vec::new();

    for (upload, key) in uploads.iter().zip(&keys) {
        if let Err(e) = state.object_store.put(key, upload.data.clone()).await {
            remove_written(&state, &written).await;
            return Err(ApiError::internal(format!("Failed to store file: {e}")));
        }
        written.push(key.clone());

        let new_file = NewFile {
            name: upload.name.clone(),
            mime_type: upload.mime_type.clone(),
            size: upload.data.len() as u64,
            path: key.clone(),
            folder_id,
        };
        match state.store.create_file(new_file) {
            Ok(record) => records.push(record),
            Err(e) => {
                for record in &records {
                    let _ = state.store.delete_file(record.id);
                }
                remove_written(&state, &written).await;
                return Err(e.into());
            }
        }
    }

    tracing::debug!(count = records.len(), "Uploaded files");
    Ok(Json(records))
}

/// GET /api/files/:id/download
pub async fn download_file(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let file = state
        .store
        .get_file(id)
        .ok_or_else(|| ApiError::not_found("File not found"))?;

    let data = state
        .object_store
        .get(&file.path)
        .await
        .map_err(|e| match e {
            crate::object_store::ObjectStoreError::NotFound(_) => {
                ApiError::not_found("File content not found")
            }
            _ => ApiError::internal(format!("Failed to retrieve file: {e}")),
        })?;

    // Build response with appropriate headers
    let mut response = (StatusCode::OK, data).into_response();
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_TYPE,
        file.mime_type
            .parse()
            .unwrap_or(header::HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(header::CONTENT_LENGTH, header::HeaderValue::from(file.size));
    if let Ok(value) = format!("attachment; filename=\"{}\"", file.name).parse() {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}

/// GET /api/files/download-all?folderId=
///
/// Zips every file in the given scope (root scope when `folderId` is
/// absent), with entry names mirroring the storage paths.
pub async fn download_all(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<ListFilesParams>,
) -> Result<Response, ApiError> {
    let files = state.store.list_files(params.folder_id);
    if files.is_empty() {
        return Err(ApiError::not_found("No files to download"));
    }

    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();

    for file in &files {
        let data = state
            .object_store
            .get(&file.path)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to retrieve {}: {e}", file.path)))?;

        writer
            .start_file(file.path.as_str(), options)
            .map_err(|e| ApiError::internal(format!("Failed to build archive: {e}")))?;
        writer
            .write_all(&data)
            .map_err(|e| ApiError::internal(format!("Failed to build archive: {e}")))?;
    }

    let archive = writer
        .finish()
        .map_err(|e| ApiError::internal(format!("Failed to build archive: {e}")))?
        .into_inner();

    let mut response = (StatusCode::OK, archive).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/zip"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        header::HeaderValue::from_static("attachment; filename=\"files.zip\""),
    );

    Ok(response)
}

/// DELETE /api/files/:id
///
/// Removes the metadata record, then notifies object storage. Blob
/// removal is best-effort; the registry does not own the bytes.
pub async fn delete_file(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessBody>, ApiError> {
    let file = state.store.delete_file(id)?;

    if let Err(e) = state.object_store.delete(&file.path).await {
        tracing::warn!(file_id = id, error = %e, "Failed to delete file from object storage");
    }

    tracing::debug!(file_id = id, "Deleted file");
    Ok(response::success())
}

// ============================================================================
// Helpers
// ============================================================================

/// Reject storage paths that are empty, absolute, or contain `..` before
/// anything is written.
fn validate_relative_path(path: &str) -> Result<(), ApiError> {
    if path.trim().is_empty() {
        return Err(ApiError::bad_request("paths entries must not be empty"));
    }
    let p = FsPath::new(path);
    if p.is_absolute() || p.components().any(|c| !matches!(c, Component::Normal(_))) {
        return Err(ApiError::bad_request(format!(
            "'{path}' is not a safe relative path"
        )));
    }
    Ok(())
}

/// Delete blobs written by an upload that failed partway through.
async fn remove_written(state: &AppState, keys: &[String]) {
    for key in keys {
        if let Err(e) = state.object_store.delete(key).await {
            tracing::warn!(key = %key, error = %e, "Failed to clean up partial upload");
        }
    }
}
