//! Data access layer for presentation documents.
//!
//! [`ProjectPresentationRepository`] is the contract the service depends
//! on. Two stores implement it:
//!
//! | Store | Type |
//! |-------|------|
//! | PostgreSQL `JSONB` documents | [`PostgresPresentationRepository`] |
//! | Process memory | [`InMemoryPresentationRepository`] |

mod memory;
mod postgres;

pub use memory::InMemoryPresentationRepository;
pub use postgres::PostgresPresentationRepository;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::AppError;
use crate::models::{ListProjectPresentationsFilter, ProjectPresentation, SimpleContributor};

/// A lazy stream of presentations from a filtered search.
///
/// Owns whatever it needs (e.g. a pooled connection), so it can outlive the
/// repository borrow that produced it.
pub type PresentationStream =
    Pin<Box<dyn Stream<Item = Result<ProjectPresentation, AppError>> + Send + 'static>>;

/// Document store for project presentations.
#[async_trait]
pub trait ProjectPresentationRepository: Send + Sync {
    /// Point lookup by store-assigned id.
    async fn find_by_id(&self, id: &str) -> Result<Option<ProjectPresentation>, AppError>;

    /// Streams every presentation matching `filter`, ordered by id.
    ///
    /// Each call starts a fresh search.
    async fn find_using_filter(
        &self,
        filter: &ListProjectPresentationsFilter,
    ) -> Result<PresentationStream, AppError>;

    /// Returns the first presentation matching `filter` that also lists
    /// `contributor` among its contributors.
    async fn find_by_id_for_contributor(
        &self,
        filter: &ListProjectPresentationsFilter,
        contributor: &SimpleContributor,
    ) -> Result<Option<ProjectPresentation>, AppError>;

    /// Upserts a presentation.
    ///
    /// Assigns a fresh id when the document has none, otherwise overwrites
    /// the stored document with that id. Returns the persisted value.
    async fn save(&self, presentation: ProjectPresentation)
        -> Result<ProjectPresentation, AppError>;
}
