use crate::api::error::AppError;
use crate::services::analyzer::AnalysisRequest;
use crate::services::documents::{DocumentService, NewDocument};
use crate::services::extraction::Language;
use crate::utils::auth::Claims;
use crate::utils::validation::validate_upload;
use axum::{Extension, Json, extract::Multipart, extract::State, http::StatusCode};
use uuid::Uuid;

use super::types::DocumentResponse;

#[utoipa::path(
    post,
    path = "/documents",
    request_body(content = String, description = "Multipart form: 'file' part plus optional 'language' (en|hi)", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document accepted for processing", body = DocumentResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 413, description = "File too large")
    ),
    security(("jwt" = [])),
    tag = "documents"
)]
pub async fn upload_document(
    State(state): State<crate::AppState>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentResponse>), AppError> {
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut language = Language::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field.bytes().await.map_err(|e| {
                    let err_msg = e.to_string();
                    if err_msg.contains("length limit exceeded") {
                        AppError::PayloadTooLarge(
                            "Request body exceeds the maximum allowed limit".to_string(),
                        )
                    } else {
                        AppError::BadRequest(err_msg)
                    }
                })?;
                file = Some((filename, content_type, data.to_vec()));
            }
            Some("language") => {
                let code = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                language = Language::parse(&code).ok_or_else(|| {
                    AppError::BadRequest(format!("Unsupported language '{}'", code))
                })?;
            }
            _ => {}
        }
    }

    let Some((filename, content_type, data)) = file else {
        return Err(AppError::BadRequest("Missing 'file' field".to_string()));
    };

    let (sanitized, essence) = validate_upload(
        &filename,
        content_type.as_deref(),
        data.len(),
        &data,
        state.config.max_file_size,
    )
    .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let file_size = data.len() as i64;
    let storage_key = format!("{}-{}", Uuid::new_v4().simple(), sanitized);
    state
        .storage
        .upload_file(&storage_key, data)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let document = DocumentService::create(
        &state.db,
        NewDocument {
            user_id: claims.sub,
            filename: sanitized,
            mime_type: essence,
            language,
            file_size,
            storage_key,
        },
    )
    .await?;

    tracing::info!(
        "📄 Document {} uploaded ({}, {} bytes), analysis queued",
        document.id,
        document.mime_type,
        file_size
    );

    state.processing.spawn(AnalysisRequest {
        document_id: document.id.clone(),
        language,
    });

    Ok((StatusCode::CREATED, Json(document.into())))
}
