use crate::entities::documents;
use crate::utils::format::format_file_size;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct ListDocumentsQuery {
    /// Substring match on filename
    pub search: Option<String>,
    pub status: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Display metadata block mirrored from the record.
#[derive(Serialize, ToSchema)]
pub struct DocumentMetadata {
    pub page_count: i32,
    pub language: String,
    pub file_size: String,
}

#[derive(Serialize, ToSchema)]
pub struct DocumentResponse {
    pub id: String,
    pub filename: String,
    pub mime_type: String,
    pub status: String,
    pub progress: i32,
    pub is_selected: bool,
    pub metadata: DocumentMetadata,
    pub error_message: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl From<documents::Model> for DocumentResponse {
    fn from(doc: documents::Model) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename,
            mime_type: doc.mime_type,
            status: doc.status,
            progress: doc.progress,
            is_selected: doc.is_selected,
            metadata: DocumentMetadata {
                page_count: doc.page_count,
                language: doc.language,
                file_size: format_file_size(doc.file_size),
            },
            error_message: doc.error_message,
            uploaded_at: doc.uploaded_at,
            processed_at: doc.processed_at,
        }
    }
}
