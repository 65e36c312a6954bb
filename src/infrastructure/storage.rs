use crate::services::storage::LocalStorageService;
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(storage_dir: &str) -> anyhow::Result<Arc<LocalStorageService>> {
    tokio::fs::create_dir_all(storage_dir).await?;
    info!("📁 Staging storage: {}", storage_dir);
    Ok(Arc::new(LocalStorageService::new(storage_dir)))
}
