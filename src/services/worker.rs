use crate::entities::{prelude::*, tokens};
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tokio::sync::watch;
use tokio::time::{Duration, sleep};

/// Hourly housekeeping: drops expired auth tokens.
pub struct BackgroundWorker {
    db: DatabaseConnection,
    shutdown: watch::Receiver<bool>,
}

impl BackgroundWorker {
    pub fn new(db: DatabaseConnection, shutdown: watch::Receiver<bool>) -> Self {
        Self { db, shutdown }
    }

    pub async fn run(mut self) {
        tracing::info!("🚀 Background worker started");

        loop {
            tokio::select! {
                _ = self.shutdown.changed() => {
                    tracing::info!("🛑 Background worker shutting down");
                    break;
                }
                _ = sleep(Duration::from_secs(3600)) => {
                    self.perform_cleanup().await;
                }
            }
        }
    }

    async fn perform_cleanup(&self) {
        tracing::info!("🧹 Running background cleanup tasks...");

        match Tokens::delete_many()
            .filter(tokens::Column::ExpiresAt.lt(Utc::now()))
            .exec(&self.db)
            .await
        {
            Ok(res) if res.rows_affected > 0 => {
                tracing::info!("Removed {} expired tokens", res.rows_affected);
            }
            Ok(_) => {}
            Err(e) => tracing::error!("Token cleanup failed: {}", e),
        }

        tracing::info!("✅ Background cleanup completed");
    }
}
