//! PostgreSQL access layer.
//!
//! - [`PostgresClient`] - pooled connections via deadpool-postgres
//! - [`SqlExecutor`] - statement execution seam used by migrations
//!
//! Documents are stored as `JSONB`; repositories compile their filters to
//! parameterized SQL and never interpolate values into statements.

mod postgres;

pub use postgres::PostgresClient;

use async_trait::async_trait;

use crate::error::AppError;

/// Executes SQL statements that return no rows.
///
/// Implemented for pooled transactions so migrations can run inside one;
/// tests implement it with a recorder.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Executes one or more `;`-separated statements.
    async fn execute_sql(&self, sql: &str) -> Result<(), AppError>;
}
