//! Schema migrations for the PostgreSQL document store.
//!
//! Migrations are:
//! - **Idempotent**: `IF NOT EXISTS` everywhere, safe to re-run
//! - **Forward-only**: no rollback support - add a compensating migration instead
//! - **Version-tracked**: the current version lives in the single-row
//!   `schema_version` table
//! - **Transactional**: each migration and its version bump commit together

mod m001_presentations;
mod runner;
mod traits;

pub use m001_presentations::M001Presentations;
pub use runner::{run_migrations, MigrationResult};
pub use traits::{Migration, Register};

/// All migrations in version order.
pub fn create_register() -> Register {
    Register::new().register(M001Presentations)
}
