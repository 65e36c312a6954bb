use crate::entities::{allotments, claims, documents, tokens, users};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::env;
use std::time::Duration;
use tracing::info;

/// Connects using DATABASE_URL, defaulting to a process-private in-memory
/// database (the portal keeps no state across restarts), then migrates and
/// seeds.
pub async fn setup_database(seed_demo_data: bool) -> anyhow::Result<DatabaseConnection> {
    let db_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());

    info!("📂 Database: {}", db_url);

    let db = connect(&db_url).await?;

    info!("✅ Database connected successfully");

    run_migrations(&db).await?;

    if seed_demo_data {
        crate::infrastructure::seed::seed_demo_data(&db).await?;
    }

    Ok(db)
}

pub async fn connect(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(db_url);
    // Every pooled connection to an in-memory SQLite database is its own
    // empty database, so the pool must stay at a single connection there.
    let max_connections = if db_url.contains(":memory:") { 1 } else { 20 };
    opt.max_connections(max_connections)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    Ok(Database::connect(opt).await?)
}

pub async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
    info!("🔄 Creating schema from entities...");

    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let stmts = vec![
        schema
            .create_table_from_entity(users::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(tokens::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(documents::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(claims::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(allotments::Entity)
            .if_not_exists()
            .to_owned(),
    ];

    for stmt in stmts {
        db.execute(builder.build(&stmt)).await?;
    }

    info!("✅ Schema ready");
    Ok(())
}
