//! In-process presentation store.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{PresentationStream, ProjectPresentationRepository};
use crate::error::AppError;
use crate::models::{
    generate_ulid, ListProjectPresentationsFilter, ProjectPresentation, SimpleContributor,
};

/// Presentation store kept in memory, keyed by id.
///
/// Same semantics as the PostgreSQL store. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryPresentationRepository {
    store: Arc<RwLock<BTreeMap<String, ProjectPresentation>>>,
}

impl InMemoryPresentationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored presentations.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl ProjectPresentationRepository for InMemoryPresentationRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<ProjectPresentation>, AppError> {
        Ok(self.store.read().await.get(id).cloned())
    }

    async fn find_using_filter(
        &self,
        filter: &ListProjectPresentationsFilter,
    ) -> Result<PresentationStream, AppError> {
        // Snapshot under the read lock; the stream does not hold it.
        let matches: Vec<_> = self
            .store
            .read()
            .await
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .map(Ok)
            .collect();

        tracing::debug!(count = matches.len(), "in-memory filtered search");
        Ok(Box::pin(futures::stream::iter(matches)))
    }

    async fn find_by_id_for_contributor(
        &self,
        filter: &ListProjectPresentationsFilter,
        contributor: &SimpleContributor,
    ) -> Result<Option<ProjectPresentation>, AppError> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .find(|p| filter.matches(p) && p.has_contributor(&contributor.contributor_id))
            .cloned())
    }

    async fn save(
        &self,
        mut presentation: ProjectPresentation,
    ) -> Result<ProjectPresentation, AppError> {
        let id = match presentation.persisted_id() {
            Some(id) => id.to_string(),
            None => generate_ulid(),
        };
        presentation.id = Some(id.clone());

        self.store.write().await.insert(id, presentation.clone());
        Ok(presentation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    fn presentation(project_id: &str, contributor: &str) -> ProjectPresentation {
        ProjectPresentation::new(
            project_id,
            [SimpleContributor::new(contributor)],
            "Name",
            vec![],
        )
    }

    #[tokio::test]
    async fn test_save_assigns_id_once() {
        let repo = InMemoryPresentationRepository::new();

        let saved = repo.save(presentation("p1", "1")).await.unwrap();
        let id = saved.id.clone().expect("id assigned");
        assert!(crate::models::is_valid_id(&id));

        let mut renamed = saved.clone();
        renamed.reference_name = "Renamed".into();
        let resaved = repo.save(renamed).await.unwrap();

        assert_eq!(resaved.id.as_deref(), Some(id.as_str()));
        assert_eq!(repo.len().await, 1);
        assert_eq!(
            repo.find_by_id(&id).await.unwrap().unwrap().reference_name,
            "Renamed"
        );
    }

    #[tokio::test]
    async fn test_save_with_empty_id_creates() {
        let repo = InMemoryPresentationRepository::new();
        let saved = repo.save(presentation("p1", "1").with_id("")).await.unwrap();
        assert!(saved.persisted_id().is_some());
    }

    #[tokio::test]
    async fn test_find_using_filter_is_ordered_and_restartable() {
        let repo = InMemoryPresentationRepository::new();
        let a = repo.save(presentation("p1", "1")).await.unwrap();
        let b = repo.save(presentation("p1", "2")).await.unwrap();
        repo.save(presentation("p2", "1")).await.unwrap();

        let filter = ListProjectPresentationsFilter {
            project_id: Some("p1".into()),
            ..Default::default()
        };

        let first: Vec<_> = repo
            .find_using_filter(&filter)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        let second: Vec<_> = repo
            .find_using_filter(&filter)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        let mut expected = vec![a, b];
        expected.sort_by(|x, y| x.id.cmp(&y.id));
        assert_eq!(first, expected);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_find_for_contributor_requires_membership() {
        let repo = InMemoryPresentationRepository::new();
        let saved = repo.save(presentation("p1", "1")).await.unwrap();
        let id = saved.id.clone().unwrap();

        let filter = ListProjectPresentationsFilter {
            ids: Some(vec![id]),
            ..Default::default()
        };

        let found = repo
            .find_by_id_for_contributor(&filter, &SimpleContributor::new("1"))
            .await
            .unwrap();
        assert_eq!(found, Some(saved));

        let denied = repo
            .find_by_id_for_contributor(&filter, &SimpleContributor::new("2"))
            .await
            .unwrap();
        assert_eq!(denied, None);
    }
}
