//! Shared setup for repository integration tests.

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use trantrac_db::migration::Migrator;

/// Fresh in-memory database with all migrations applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = trantrac_db::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}
