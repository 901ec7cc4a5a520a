//! Application context providing dependency injection root.

use std::sync::Arc;

use crate::config::Config;
use crate::db::PostgresClient;
use crate::di::Context as ContextDerive;
use crate::error::AppError;
use crate::repositories::{PostgresPresentationRepository, ProjectPresentationRepository};

/// Shared handle to the presentation store.
pub type AppRepository = Arc<dyn ProjectPresentationRepository>;

/// Root application context for dependency injection.
///
/// `#[derive(Context)]` generates a `FromRef` impl per field, so services
/// deriving `FromContext` resolve their dependencies from it.
#[derive(ContextDerive, Clone)]
pub struct Context {
    /// Presentation document store.
    pub repository: AppRepository,
    /// Application configuration.
    pub config: Arc<Config>,
}

impl Context {
    /// Creates a context over an existing store.
    pub fn new(repository: AppRepository, config: Config) -> Self {
        Self {
            repository,
            config: Arc::new(config),
        }
    }

    /// Creates a context backed by the PostgreSQL store from `config`.
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let client = PostgresClient::from_config(&config.postgres)?;
        let repository: AppRepository = Arc::new(PostgresPresentationRepository::new(client));
        Ok(Self::new(repository, config))
    }
}
