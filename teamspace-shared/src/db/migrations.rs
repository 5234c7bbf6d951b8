/// Database migration runner
///
/// Migrations live in this crate's `migrations/` directory and are embedded
/// into the binary at compile time, so deployments never depend on loose
/// SQL files. They run once at startup, before the server binds.

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations.
///
/// Each migration runs in its own transaction where the statements allow
/// it; a failing migration is rolled back and reported.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("Database schema is up to date");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
