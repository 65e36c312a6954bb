use crate::api::error::AppError;
use crate::services::documents::DocumentService;
use crate::utils::auth::Claims;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use super::types::DocumentResponse;

#[utoipa::path(
    put,
    path = "/documents/{id}/select",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document selected", body = DocumentResponse),
        (status = 404, description = "Document not found")
    ),
    security(("jwt" = [])),
    tag = "documents"
)]
pub async fn select_document(
    State(state): State<crate::AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = DocumentService::select(&state.db, &claims.sub, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    Ok(Json(document.into()))
}

#[utoipa::path(
    get,
    path = "/documents/selected",
    responses(
        (status = 200, description = "Currently selected document", body = DocumentResponse),
        (status = 404, description = "No document selected")
    ),
    security(("jwt" = [])),
    tag = "documents"
)]
pub async fn get_selected(
    State(state): State<crate::AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = DocumentService::selected(&state.db, &claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("No document selected".to_string()))?;

    Ok(Json(document.into()))
}

#[utoipa::path(
    delete,
    path = "/documents/{id}",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 404, description = "Document not found")
    ),
    security(("jwt" = [])),
    tag = "documents"
)]
pub async fn delete_document(
    State(state): State<crate::AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let document = DocumentService::get(&state.db, &claims.sub, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    if !DocumentService::remove(&state.db, &claims.sub, &id).await? {
        return Err(AppError::NotFound("Document not found".to_string()));
    }

    // Staged bytes are cleaned up best-effort; the registry row is gone
    // either way and any in-flight analysis writes become no-ops.
    if let Err(e) = state.storage.delete_file(&document.storage_key).await {
        tracing::warn!("Failed to delete staged file {}: {}", document.storage_key, e);
    }

    tracing::info!("🗑️ Document {} deleted", id);

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/documents/{id}/download",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Original uploaded bytes"),
        (status = 404, description = "Document not found")
    ),
    security(("jwt" = [])),
    tag = "documents"
)]
pub async fn download_document(
    State(state): State<crate::AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let document = DocumentService::get(&state.db, &claims.sub, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    let data = state
        .storage
        .get_file(&document.storage_key)
        .await
        .map_err(|_| AppError::NotFound("Staged file is gone".to_string()))?;

    let headers = [
        (header::CONTENT_TYPE, document.mime_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.filename),
        ),
    ];

    Ok((headers, data))
}
