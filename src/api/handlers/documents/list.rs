use crate::api::error::AppError;
use crate::services::documents::{DocumentFilter, DocumentService};
use crate::utils::auth::Claims;
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use super::types::{DocumentResponse, ListDocumentsQuery};

#[utoipa::path(
    get,
    path = "/documents",
    params(
        ("search" = Option<String>, Query, description = "Substring match on filename"),
        ("status" = Option<String>, Query, description = "Status filter: processing, completed or error")
    ),
    responses(
        (status = 200, description = "Uploaded documents, newest first", body = Vec<DocumentResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "documents"
)]
pub async fn list_documents(
    State(state): State<crate::AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<Json<Vec<DocumentResponse>>, AppError> {
    let items = DocumentService::list(
        &state.db,
        &claims.sub,
        DocumentFilter {
            search: query.search,
            status: query.status,
            limit: query.limit,
            offset: query.offset,
        },
    )
    .await?;

    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/documents/{id}",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document record", body = DocumentResponse),
        (status = 404, description = "Document not found")
    ),
    security(("jwt" = [])),
    tag = "documents"
)]
pub async fn get_document(
    State(state): State<crate::AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = DocumentService::get(&state.db, &claims.sub, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    Ok(Json(document.into()))
}
