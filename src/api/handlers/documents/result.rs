use crate::api::error::AppError;
use crate::entities::documents;
use crate::services::documents::DocumentService;
use crate::services::extraction::EntityLabel;
use crate::utils::auth::Claims;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;
use utoipa::ToSchema;

/// One recognized entity as rendered by the result view, including the
/// fixed badge color for its label.
#[derive(Serialize, ToSchema)]
pub struct EntityView {
    pub text: String,
    pub label: EntityLabel,
    pub confidence: f32,
    pub start: usize,
    pub end: usize,
    pub color: String,
}

#[derive(Serialize, ToSchema)]
pub struct DocumentResultResponse {
    pub document_id: String,
    pub status: String,
    pub progress: i32,
    pub extracted_text: Option<String>,
    pub entities: Vec<EntityView>,
    pub message: Option<String>,
}

/// Badge color per label. The set is closed, so there is no runtime
/// fallback branch to reach.
pub fn label_color(label: EntityLabel) -> &'static str {
    match label {
        EntityLabel::Person => "#2563eb",
        EntityLabel::Location => "#16a34a",
        EntityLabel::State => "#0d9488",
        EntityLabel::Aadhaar => "#dc2626",
        EntityLabel::Phone => "#7c3aed",
        EntityLabel::Date => "#ea580c",
        EntityLabel::ApplicationId => "#0891b2",
        EntityLabel::Area => "#65a30d",
        EntityLabel::SurveyNumber => "#9333ea",
        EntityLabel::Year => "#ca8a04",
    }
}

#[utoipa::path(
    get,
    path = "/documents/{id}/result",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Analysis result or status placeholder", body = DocumentResultResponse),
        (status = 404, description = "Document not found")
    ),
    security(("jwt" = [])),
    tag = "documents"
)]
pub async fn get_result(
    State(state): State<crate::AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<DocumentResultResponse>, AppError> {
    let document = DocumentService::get(&state.db, &claims.sub, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    let response = match document.status.as_str() {
        documents::STATUS_COMPLETED => {
            let entities = DocumentService::entities_of(&document)
                .into_iter()
                .map(|e| EntityView {
                    color: label_color(e.label).to_string(),
                    text: e.text,
                    label: e.label,
                    confidence: e.confidence,
                    start: e.start,
                    end: e.end,
                })
                .collect();

            DocumentResultResponse {
                document_id: document.id,
                status: document.status,
                progress: document.progress,
                extracted_text: document.extracted_text,
                entities,
                message: None,
            }
        }
        documents::STATUS_ERROR => DocumentResultResponse {
            document_id: document.id,
            status: document.status,
            progress: document.progress,
            extracted_text: None,
            entities: Vec::new(),
            message: document.error_message.or_else(|| Some("Analysis failed".to_string())),
        },
        _ => DocumentResultResponse {
            document_id: document.id,
            status: document.status,
            progress: document.progress,
            extracted_text: None,
            entities: Vec::new(),
            message: Some("Document is still being processed".to_string()),
        },
    };

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_label_has_a_distinct_color() {
        let labels = [
            EntityLabel::Person,
            EntityLabel::Location,
            EntityLabel::State,
            EntityLabel::Aadhaar,
            EntityLabel::Phone,
            EntityLabel::Date,
            EntityLabel::ApplicationId,
            EntityLabel::Area,
            EntityLabel::SurveyNumber,
            EntityLabel::Year,
        ];

        let colors: std::collections::HashSet<_> =
            labels.iter().map(|l| label_color(*l)).collect();
        assert_eq!(colors.len(), labels.len());
    }
}
