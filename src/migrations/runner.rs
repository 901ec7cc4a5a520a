//! Migration runner with version tracking.

use crate::db::PostgresClient;
use crate::error::AppError;
use crate::migrations::create_register;

/// Result of running migrations.
#[derive(Debug, Clone)]
pub struct MigrationResult {
    /// Schema version before migrations ran.
    pub previous_version: u32,
    /// Schema version after migrations ran.
    pub current_version: u32,
    /// IDs of the migrations that were applied.
    pub applied_migrations: Vec<String>,
}

const CREATE_SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY DEFAULT 1 CHECK (id = 1),
    version INTEGER NOT NULL DEFAULT 0,
    applied_migrations TEXT[] NOT NULL DEFAULT '{}',
    last_applied_at TIMESTAMPTZ DEFAULT NOW()
);

-- Ensure exactly one row exists
INSERT INTO schema_version (id, version)
VALUES (1, 0)
ON CONFLICT (id) DO NOTHING;
"#;

const SELECT_VERSION: &str = "SELECT version FROM schema_version WHERE id = 1";

const UPDATE_VERSION: &str = "UPDATE schema_version
     SET version = $1,
         applied_migrations = array_append(applied_migrations, $2),
         last_applied_at = NOW()
     WHERE id = 1";

/// Run all pending migrations.
///
/// Each migration runs in its own transaction together with its version
/// bump; on failure the transaction is rolled back and the error returned.
pub async fn run_migrations(client: &PostgresClient) -> Result<MigrationResult, AppError> {
    let mut conn = client.get_connection().await?;

    conn.batch_execute(CREATE_SCHEMA_VERSION_TABLE)
        .await
        .map_err(|e| AppError::query(e, CREATE_SCHEMA_VERSION_TABLE))?;

    let previous_version = match conn
        .query_opt(SELECT_VERSION, &[])
        .await
        .map_err(|e| AppError::query(e, SELECT_VERSION))?
    {
        Some(row) => row
            .try_get::<_, i32>("version")
            .map_err(|e| AppError::query(e, SELECT_VERSION))?
            .max(0) as u32,
        None => 0,
    };

    let register = create_register();
    let target_version = register.latest_version();
    if target_version > previous_version {
        tracing::info!("Migrating schema v{} -> v{}", previous_version, target_version);
    }

    let mut applied = vec![];
    let mut current_version = previous_version;

    for migration in register.pending(previous_version) {
        tracing::info!(
            "Applying migration {} (v{}): {}",
            migration.id(),
            migration.version(),
            migration.description()
        );

        let txn = conn
            .transaction()
            .await
            .map_err(|e| AppError::Connection(format!("Failed to begin transaction: {}", e)))?;

        let outcome = match migration.up(&txn).await {
            Ok(()) => txn
                .execute(
                    UPDATE_VERSION,
                    &[&(migration.version() as i32), &migration.id()],
                )
                .await
                .map(|_| ())
                .map_err(|e| AppError::query(e, UPDATE_VERSION)),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => txn
                .commit()
                .await
                .map_err(|e| AppError::Connection(format!("Failed to commit migration: {}", e)))?,
            Err(e) => {
                tracing::error!("Migration {} failed, rolling back: {}", migration.id(), e);
                txn.rollback().await.map_err(|e| {
                    AppError::Connection(format!("Failed to roll back migration: {}", e))
                })?;
                return Err(e);
            }
        }

        current_version = migration.version();
        applied.push(migration.id().to_string());
    }

    Ok(MigrationResult {
        previous_version,
        current_version,
        applied_migrations: applied,
    })
}
