use crate::services::analyzer::{AnalysisRequest, DocumentAnalyzer};
use crate::services::documents::DocumentService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Drives one analysis task per uploaded document.
///
/// Each task owns exactly one registry row; concurrent uploads run their
/// loops independently with no ordering between them. There is no
/// cancellation: deleting a document mid-flight simply turns the task's
/// remaining writes into no-ops.
pub struct ProcessingService {
    db: DatabaseConnection,
    analyzer: Arc<dyn DocumentAnalyzer>,
}

impl ProcessingService {
    pub fn new(db: DatabaseConnection, analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        Self { db, analyzer }
    }

    /// Detaches an analysis run for `request`. The handle is returned for
    /// tests; callers in request paths drop it.
    pub fn spawn(&self, request: AnalysisRequest) -> JoinHandle<()> {
        let db = self.db.clone();
        let analyzer = self.analyzer.clone();

        tokio::spawn(async move {
            let document_id = request.document_id.clone();
            tracing::info!(
                "🔍 Starting {} analysis for document {}",
                analyzer.name(),
                document_id
            );

            let (tx, mut rx) = mpsc::channel::<u8>(16);

            let reporter = tokio::spawn({
                let db = db.clone();
                let id = document_id.clone();
                async move {
                    while let Some(progress) = rx.recv().await {
                        match DocumentService::update_progress(&db, &id, progress).await {
                            Ok(0) => {
                                // Row gone or already terminal; keep draining
                                tracing::debug!("Progress tick ignored for document {}", id);
                            }
                            Ok(_) => {}
                            Err(e) => {
                                tracing::error!("Failed to record progress for {}: {}", id, e);
                            }
                        }
                    }
                }
            });

            let outcome = analyzer.analyze(&request, tx).await;

            // Sender side is closed once analyze returns; wait for the
            // reporter to flush the remaining ticks before the terminal write.
            let _ = reporter.await;

            match outcome {
                Ok(report) => match DocumentService::complete(&db, &document_id, &report).await {
                    Ok(0) => tracing::debug!(
                        "Completion dropped, document {} no longer processing",
                        document_id
                    ),
                    Ok(_) => tracing::info!(
                        "✅ Analysis completed for document {} ({} entities)",
                        document_id,
                        report.entities.len()
                    ),
                    Err(e) => tracing::error!(
                        "Failed to store analysis result for {}: {}",
                        document_id,
                        e
                    ),
                },
                Err(e) => {
                    tracing::warn!("❌ Analysis failed for document {}: {}", document_id, e);
                    match DocumentService::fail(&db, &document_id, &e.to_string()).await {
                        Ok(_) => {}
                        Err(e) => tracing::error!(
                            "Failed to record analysis error for {}: {}",
                            document_id,
                            e
                        ),
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::documents;
    use crate::infrastructure::database;
    use crate::services::analyzer::{FailingAnalyzer, SimulatedAnalyzer};
    use crate::services::documents::{DocumentService, NewDocument};
    use crate::services::extraction::Language;
    use sea_orm::{ActiveModelTrait, Set};

    async fn test_db() -> DatabaseConnection {
        let db = database::connect("sqlite::memory:").await.unwrap();
        database::run_migrations(&db).await.unwrap();
        let user = crate::entities::users::ActiveModel {
            id: Set("u1".to_string()),
            email: Set("u1@fra.gov.in".to_string()),
            name: Set("u1".to_string()),
            password_hash: Set("hash".to_string()),
            role: Set("officer".to_string()),
            department: Set(None),
            created_at: Set(Some(chrono::Utc::now())),
        };
        user.insert(&db).await.unwrap();
        db
    }

    async fn seed_document(db: &DatabaseConnection) -> documents::Model {
        DocumentService::create(
            db,
            NewDocument {
                user_id: "u1".to_string(),
                filename: "patta.pdf".to_string(),
                mime_type: "application/pdf".to_string(),
                language: Language::Hindi,
                file_size: 2048,
                storage_key: "staging/patta.pdf".to_string(),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_pipeline_completes_with_payload() {
        let db = test_db().await;
        let doc = seed_document(&db).await;

        let service = ProcessingService::new(db.clone(), Arc::new(SimulatedAnalyzer::new(1, 10)));
        service
            .spawn(AnalysisRequest {
                document_id: doc.id.clone(),
                language: Language::Hindi,
            })
            .await
            .unwrap();

        let done = DocumentService::get(&db, "u1", &doc.id).await.unwrap().unwrap();
        assert_eq!(done.status, documents::STATUS_COMPLETED);
        assert_eq!(done.progress, 100);
        assert_eq!(done.page_count, 3);
        assert!(done.processed_at.is_some());
        assert_eq!(DocumentService::entities_of(&done).len(), 11);
        assert!(done.extracted_text.unwrap().contains("राम प्रसाद मीणा"));
    }

    #[tokio::test]
    async fn test_pipeline_failure_reaches_error_state() {
        let db = test_db().await;
        let doc = seed_document(&db).await;

        let service = ProcessingService::new(db.clone(), Arc::new(FailingAnalyzer));
        service
            .spawn(AnalysisRequest {
                document_id: doc.id.clone(),
                language: Language::Hindi,
            })
            .await
            .unwrap();

        let failed = DocumentService::get(&db, "u1", &doc.id).await.unwrap().unwrap();
        assert_eq!(failed.status, documents::STATUS_ERROR);
        assert!(failed.error_message.unwrap().contains("unavailable"));
        assert!(failed.extracted_text.is_none());
    }

    #[tokio::test]
    async fn test_delete_mid_flight_leaves_no_trace() {
        let db = test_db().await;
        let doc = seed_document(&db).await;

        // Slow enough that the delete lands before the first tick
        let service = ProcessingService::new(db.clone(), Arc::new(SimulatedAnalyzer::new(20, 10)));
        let handle = service.spawn(AnalysisRequest {
            document_id: doc.id.clone(),
            language: Language::Hindi,
        });

        assert!(DocumentService::remove(&db, "u1", &doc.id).await.unwrap());

        // The loop runs to completion; all of its writes are no-ops
        handle.await.unwrap();
        assert!(DocumentService::get(&db, "u1", &doc.id).await.unwrap().is_none());
    }
}
