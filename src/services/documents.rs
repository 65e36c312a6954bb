use crate::entities::{documents, prelude::*};
use crate::services::extraction::{AnalysisReport, Language, NamedEntity};
use anyhow::Result;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

pub struct NewDocument {
    pub user_id: String,
    pub filename: String,
    pub mime_type: String,
    pub language: Language,
    pub file_size: i64,
    pub storage_key: String,
}

#[derive(Debug, Default)]
pub struct DocumentFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Registry operations over uploaded documents.
///
/// Progress and terminal transitions are guarded in SQL: a write against a
/// missing or already-terminal row affects zero rows and is reported as
/// such, never as an error. That keeps in-flight analysis tasks harmless
/// after their document is deleted.
pub struct DocumentService;

impl DocumentService {
    pub async fn create(db: &DatabaseConnection, new: NewDocument) -> Result<documents::Model, DbErr> {
        let model = documents::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(new.user_id),
            filename: Set(new.filename),
            mime_type: Set(new.mime_type),
            language: Set(new.language.as_code().to_string()),
            status: Set(documents::STATUS_PROCESSING.to_string()),
            progress: Set(0),
            page_count: Set(0),
            file_size: Set(new.file_size),
            storage_key: Set(new.storage_key),
            is_selected: Set(false),
            extracted_text: Set(None),
            entities_json: Set(None),
            error_message: Set(None),
            uploaded_at: Set(Utc::now()),
            processed_at: Set(None),
        };

        model.insert(db).await
    }

    pub async fn get(
        db: &DatabaseConnection,
        user_id: &str,
        id: &str,
    ) -> Result<Option<documents::Model>, DbErr> {
        Documents::find_by_id(id.to_string())
            .filter(documents::Column::UserId.eq(user_id))
            .one(db)
            .await
    }

    pub async fn list(
        db: &DatabaseConnection,
        user_id: &str,
        filter: DocumentFilter,
    ) -> Result<Vec<documents::Model>, DbErr> {
        let mut cond = Condition::all().add(documents::Column::UserId.eq(user_id));

        if let Some(status) = filter.status {
            cond = cond.add(documents::Column::Status.eq(status));
        }

        if let Some(search) = filter.search {
            cond = cond.add(
                Expr::expr(Func::lower(Expr::col(documents::Column::Filename)))
                    .like(format!("%{}%", search.to_lowercase())),
            );
        }

        let mut select = Documents::find()
            .filter(cond)
            .order_by_desc(documents::Column::UploadedAt);

        if let Some(limit) = filter.limit {
            select = select.limit(limit);
        }
        if let Some(offset) = filter.offset {
            select = select.offset(offset);
        }

        select.all(db).await
    }

    /// Progress tick. Only applies while the document is still processing
    /// and the new value does not regress; anything else is a no-op.
    pub async fn update_progress(
        db: &DatabaseConnection,
        id: &str,
        progress: u8,
    ) -> Result<u64, DbErr> {
        let progress = progress.min(100) as i32;

        let res = Documents::update_many()
            .col_expr(documents::Column::Progress, Expr::value(progress))
            .filter(documents::Column::Id.eq(id))
            .filter(documents::Column::Status.eq(documents::STATUS_PROCESSING))
            .filter(documents::Column::Progress.lte(progress))
            .exec(db)
            .await?;

        Ok(res.rows_affected)
    }

    /// Terminal transition: processing -> completed, attaching the payload.
    pub async fn complete(
        db: &DatabaseConnection,
        id: &str,
        report: &AnalysisReport,
    ) -> Result<u64> {
        let entities = serde_json::to_value(&report.entities)?;

        let res = Documents::update_many()
            .col_expr(
                documents::Column::Status,
                Expr::value(documents::STATUS_COMPLETED),
            )
            .col_expr(documents::Column::Progress, Expr::value(100))
            .col_expr(
                documents::Column::PageCount,
                Expr::value(report.page_count),
            )
            .col_expr(
                documents::Column::ExtractedText,
                Expr::value(report.extracted_text.clone()),
            )
            .col_expr(documents::Column::EntitiesJson, Expr::value(entities))
            .col_expr(documents::Column::ProcessedAt, Expr::value(Utc::now()))
            .filter(documents::Column::Id.eq(id))
            .filter(documents::Column::Status.eq(documents::STATUS_PROCESSING))
            .exec(db)
            .await?;

        Ok(res.rows_affected)
    }

    /// Terminal transition: processing -> error.
    pub async fn fail(db: &DatabaseConnection, id: &str, reason: &str) -> Result<u64, DbErr> {
        let res = Documents::update_many()
            .col_expr(
                documents::Column::Status,
                Expr::value(documents::STATUS_ERROR),
            )
            .col_expr(documents::Column::ErrorMessage, Expr::value(reason))
            .col_expr(documents::Column::ProcessedAt, Expr::value(Utc::now()))
            .filter(documents::Column::Id.eq(id))
            .filter(documents::Column::Status.eq(documents::STATUS_PROCESSING))
            .exec(db)
            .await?;

        Ok(res.rows_affected)
    }

    /// Removes the record. Selection dies with the row, which is exactly
    /// the "deleting the selected file clears selection" behavior.
    pub async fn remove(db: &DatabaseConnection, user_id: &str, id: &str) -> Result<bool, DbErr> {
        let res = Documents::delete_many()
            .filter(documents::Column::Id.eq(id))
            .filter(documents::Column::UserId.eq(user_id))
            .exec(db)
            .await?;

        Ok(res.rows_affected > 0)
    }

    /// Moves the single-selection pointer to `id`.
    pub async fn select(
        db: &DatabaseConnection,
        user_id: &str,
        id: &str,
    ) -> Result<Option<documents::Model>, DbErr> {
        if Self::get(db, user_id, id).await?.is_none() {
            return Ok(None);
        }

        Documents::update_many()
            .col_expr(documents::Column::IsSelected, Expr::value(false))
            .filter(documents::Column::UserId.eq(user_id))
            .filter(documents::Column::IsSelected.eq(true))
            .exec(db)
            .await?;

        Documents::update_many()
            .col_expr(documents::Column::IsSelected, Expr::value(true))
            .filter(documents::Column::Id.eq(id))
            .exec(db)
            .await?;

        Self::get(db, user_id, id).await
    }

    pub async fn selected(
        db: &DatabaseConnection,
        user_id: &str,
    ) -> Result<Option<documents::Model>, DbErr> {
        Documents::find()
            .filter(documents::Column::UserId.eq(user_id))
            .filter(documents::Column::IsSelected.eq(true))
            .one(db)
            .await
    }

    /// Deserializes the stored entity list; empty until completion.
    pub fn entities_of(model: &documents::Model) -> Vec<NamedEntity> {
        model
            .entities_json
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database;
    use crate::services::extraction::canned_report;

    async fn test_db() -> DatabaseConnection {
        let db = database::connect("sqlite::memory:").await.unwrap();
        database::run_migrations(&db).await.unwrap();
        for user_id in ["u1", "u2"] {
            let user = crate::entities::users::ActiveModel {
                id: sea_orm::Set(user_id.to_string()),
                email: sea_orm::Set(format!("{}@fra.gov.in", user_id)),
                name: sea_orm::Set(user_id.to_string()),
                password_hash: sea_orm::Set("hash".to_string()),
                role: sea_orm::Set("officer".to_string()),
                department: sea_orm::Set(None),
                created_at: sea_orm::Set(Some(Utc::now())),
            };
            user.insert(&db).await.unwrap();
        }
        db
    }

    fn new_doc(user_id: &str, filename: &str) -> NewDocument {
        NewDocument {
            user_id: user_id.to_string(),
            filename: filename.to_string(),
            mime_type: "application/pdf".to_string(),
            language: Language::English,
            file_size: 1024,
            storage_key: format!("staging/{}", filename),
        }
    }

    #[tokio::test]
    async fn test_create_starts_processing_at_zero() {
        let db = test_db().await;
        let doc = DocumentService::create(&db, new_doc("u1", "patta.pdf"))
            .await
            .unwrap();
        assert_eq!(doc.status, documents::STATUS_PROCESSING);
        assert_eq!(doc.progress, 0);
        assert!(doc.extracted_text.is_none());
        assert!(!doc.is_selected);
    }

    #[tokio::test]
    async fn test_progress_never_regresses() {
        let db = test_db().await;
        let doc = DocumentService::create(&db, new_doc("u1", "patta.pdf"))
            .await
            .unwrap();

        assert_eq!(DocumentService::update_progress(&db, &doc.id, 50).await.unwrap(), 1);
        // Regression attempt is ignored
        assert_eq!(DocumentService::update_progress(&db, &doc.id, 30).await.unwrap(), 0);

        let current = DocumentService::get(&db, "u1", &doc.id).await.unwrap().unwrap();
        assert_eq!(current.progress, 50);
    }

    #[tokio::test]
    async fn test_terminal_states_are_immutable() {
        let db = test_db().await;
        let doc = DocumentService::create(&db, new_doc("u1", "patta.pdf"))
            .await
            .unwrap();

        let report = canned_report(Language::English);
        assert_eq!(DocumentService::complete(&db, &doc.id, &report).await.unwrap(), 1);

        // No more ticks, completions or failures once terminal
        assert_eq!(DocumentService::update_progress(&db, &doc.id, 100).await.unwrap(), 0);
        assert_eq!(DocumentService::complete(&db, &doc.id, &report).await.unwrap(), 0);
        assert_eq!(DocumentService::fail(&db, &doc.id, "late").await.unwrap(), 0);

        let current = DocumentService::get(&db, "u1", &doc.id).await.unwrap().unwrap();
        assert_eq!(current.status, documents::STATUS_COMPLETED);
        assert_eq!(current.progress, 100);
        assert_eq!(DocumentService::entities_of(&current).len(), 11);
        assert!(current.error_message.is_none());
    }

    #[tokio::test]
    async fn test_updates_on_missing_id_are_noops() {
        let db = test_db().await;
        assert_eq!(DocumentService::update_progress(&db, "ghost", 10).await.unwrap(), 0);
        assert_eq!(DocumentService::fail(&db, "ghost", "nope").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_selection_moves_and_dies_with_row() {
        let db = test_db().await;
        let a = DocumentService::create(&db, new_doc("u1", "a.pdf")).await.unwrap();
        let b = DocumentService::create(&db, new_doc("u1", "b.pdf")).await.unwrap();

        DocumentService::select(&db, "u1", &a.id).await.unwrap().unwrap();
        DocumentService::select(&db, "u1", &b.id).await.unwrap().unwrap();

        // Single selection pointer
        let selected = DocumentService::selected(&db, "u1").await.unwrap().unwrap();
        assert_eq!(selected.id, b.id);
        let a_now = DocumentService::get(&db, "u1", &a.id).await.unwrap().unwrap();
        assert!(!a_now.is_selected);

        // Deleting the selected document clears the selection
        assert!(DocumentService::remove(&db, "u1", &b.id).await.unwrap());
        assert!(DocumentService::selected(&db, "u1").await.unwrap().is_none());

        // Selecting an unknown id selects nothing
        assert!(DocumentService::select(&db, "u1", "ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_search_and_status() {
        let db = test_db().await;
        let a = DocumentService::create(&db, new_doc("u1", "patta-scan.pdf")).await.unwrap();
        DocumentService::create(&db, new_doc("u1", "aadhaar-card.png")).await.unwrap();
        DocumentService::create(&db, new_doc("u2", "patta-other.pdf")).await.unwrap();

        let found = DocumentService::list(
            &db,
            "u1",
            DocumentFilter {
                search: Some("PATTA".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, a.id);

        let report = canned_report(Language::English);
        DocumentService::complete(&db, &a.id, &report).await.unwrap();

        let completed = DocumentService::list(
            &db,
            "u1",
            DocumentFilter {
                status: Some(documents::STATUS_COMPLETED.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(completed.len(), 1);

        let processing = DocumentService::list(
            &db,
            "u1",
            DocumentFilter {
                status: Some(documents::STATUS_PROCESSING.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(processing.len(), 1);
        assert_eq!(processing[0].filename, "aadhaar-card.png");
    }
}
