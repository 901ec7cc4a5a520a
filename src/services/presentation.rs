//! Presentation service: find, list, create and merge-update.
//!
//! Updates are scoped: the existing document is fetched through
//! `find_by_id_for_contributor` with a filter on the owning project, the
//! requesting contributor and the presentation id. Only `reference_name`
//! and `sections` are taken from the incoming document; `id`, `project_id`
//! and `contributors` always come from the stored one.

use crate::context::{AppRepository, Context};
use crate::di::FromContext;
use crate::error::AppError;
use crate::models::{
    is_valid_id, ListProjectPresentationsFilter, ProjectPresentation, SimpleContributor,
};
use crate::repositories::PresentationStream;

/// Service for project presentation use-cases.
///
/// Stateless apart from the repository handle; safe to clone and share
/// across tasks.
#[derive(FromContext, Clone)]
pub struct ProjectPresentationService {
    repository: AppRepository,
}

impl ProjectPresentationService {
    /// Creates a service over the given repository.
    pub fn new(repository: AppRepository) -> Self {
        Self { repository }
    }

    /// Finds one presentation by id.
    ///
    /// A malformed id yields `Ok(None)` without querying the store.
    #[tracing::instrument(skip(self))]
    pub async fn find_single_project_presentation(
        &self,
        id: &str,
    ) -> Result<Option<ProjectPresentation>, AppError> {
        if !is_valid_id(id) {
            tracing::debug!("malformed presentation id, skipping lookup");
            return Ok(None);
        }
        self.repository.find_by_id(id).await
    }

    /// Streams the presentations matching `filter`, as produced by the store.
    #[tracing::instrument(skip(self))]
    pub async fn find_project_presentations(
        &self,
        filter: &ListProjectPresentationsFilter,
    ) -> Result<PresentationStream, AppError> {
        self.repository.find_using_filter(filter).await
    }

    /// Persists a new presentation and returns the stored value.
    #[tracing::instrument(skip_all, fields(project_id = %presentation.project_id))]
    pub async fn create_project_presentation(
        &self,
        presentation: ProjectPresentation,
    ) -> Result<ProjectPresentation, AppError> {
        presentation.validate()?;
        let saved = self.repository.save(presentation).await?;
        tracing::info!(id = ?saved.id, "created project presentation");
        Ok(saved)
    }

    /// Replaces `reference_name` and `sections` of an existing presentation.
    ///
    /// Fails with [`AppError::PresentationNotFound`] when the scoped lookup
    /// matches nothing, in which case nothing is saved.
    #[tracing::instrument(
        skip(self, incoming, requesting_contributor),
        fields(contributor_id = %requesting_contributor.contributor_id)
    )]
    pub async fn update_project_presentation(
        &self,
        id: &str,
        incoming: &ProjectPresentation,
        requesting_contributor: &SimpleContributor,
    ) -> Result<ProjectPresentation, AppError> {
        let filter = ListProjectPresentationsFilter::for_update(
            id,
            incoming.project_id.clone(),
            requesting_contributor.contributor_id.clone(),
        );

        let existing = self
            .repository
            .find_by_id_for_contributor(&filter, requesting_contributor)
            .await?
            .ok_or_else(|| {
                tracing::warn!("no presentation in scope for update");
                AppError::PresentationNotFound {
                    id: id.to_string(),
                    contributor_id: requesting_contributor.contributor_id.clone(),
                }
            })?;

        // The id comes from the stored document, only the body needs checking
        let merged = existing.merged_with(incoming);
        merged.validate_content()?;

        let saved = self.repository.save(merged).await?;
        tracing::info!("updated project presentation");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PresentationSection;
    use crate::repositories::ProjectPresentationRepository;
    use futures::TryStreamExt;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        FindById(String),
        FindUsingFilter(ListProjectPresentationsFilter),
        FindByIdForContributor(ListProjectPresentationsFilter, SimpleContributor),
        Save(ProjectPresentation),
    }

    /// Records every call and answers with canned values.
    #[derive(Default)]
    struct MockRepository {
        calls: Mutex<Vec<Call>>,
        found: Option<ProjectPresentation>,
        listed: Vec<ProjectPresentation>,
        /// Returned by `save`; when `None` the input is echoed back.
        saved: Option<ProjectPresentation>,
        offline: bool,
    }

    impl MockRepository {
        fn record(&self, call: Call) -> Result<(), AppError> {
            self.calls.lock().unwrap().push(call);
            if self.offline {
                return Err(AppError::Connection("store offline".into()));
            }
            Ok(())
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ProjectPresentationRepository for MockRepository {
        async fn find_by_id(&self, id: &str) -> Result<Option<ProjectPresentation>, AppError> {
            self.record(Call::FindById(id.to_string()))?;
            Ok(self.found.clone())
        }

        async fn find_using_filter(
            &self,
            filter: &ListProjectPresentationsFilter,
        ) -> Result<PresentationStream, AppError> {
            self.record(Call::FindUsingFilter(filter.clone()))?;
            let items: Vec<_> = self.listed.iter().cloned().map(Ok).collect();
            Ok(Box::pin(futures::stream::iter(items)))
        }

        async fn find_by_id_for_contributor(
            &self,
            filter: &ListProjectPresentationsFilter,
            contributor: &SimpleContributor,
        ) -> Result<Option<ProjectPresentation>, AppError> {
            self.record(Call::FindByIdForContributor(
                filter.clone(),
                contributor.clone(),
            ))?;
            Ok(self.found.clone())
        }

        async fn save(
            &self,
            presentation: ProjectPresentation,
        ) -> Result<ProjectPresentation, AppError> {
            self.record(Call::Save(presentation.clone()))?;
            Ok(self.saved.clone().unwrap_or(presentation))
        }
    }

    fn service(repo: &Arc<MockRepository>) -> ProjectPresentationService {
        ProjectPresentationService::new(repo.clone())
    }

    fn contributor() -> SimpleContributor {
        SimpleContributor::new("1")
    }

    fn mocked(reference_name: &str) -> ProjectPresentation {
        ProjectPresentation::new("mockedProjectId", [contributor()], reference_name, vec![])
    }

    fn section(title: &str) -> PresentationSection {
        PresentationSection {
            title: title.to_string(),
            description: format!("{} body", title),
            main_media: None,
            media: vec![],
        }
    }

    #[tokio::test]
    async fn test_find_presentations_returns_store_stream() {
        let listed = vec![
            mocked("first").with_id("a"),
            mocked("second").with_id("b"),
        ];
        let repo = Arc::new(MockRepository {
            listed: listed.clone(),
            ..Default::default()
        });
        let filter = ListProjectPresentationsFilter::default();

        let output: Vec<_> = service(&repo)
            .find_project_presentations(&filter)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(output, listed);
        assert_eq!(repo.calls(), vec![Call::FindUsingFilter(filter)]);
    }

    #[tokio::test]
    async fn test_find_single_with_malformed_id_skips_store() {
        let repo = Arc::new(MockRepository {
            found: Some(mocked("mockedReferenceName")),
            ..Default::default()
        });

        for id in ["id1", "", "not-a-ulid-at-all-0000000000"] {
            let output = service(&repo)
                .find_single_project_presentation(id)
                .await
                .unwrap();
            assert_eq!(output, None);
        }
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn test_find_single_returns_store_result() {
        let id = crate::models::generate_ulid();
        let existing = mocked("mockedReferenceName").with_id(&id);
        let repo = Arc::new(MockRepository {
            found: Some(existing.clone()),
            ..Default::default()
        });

        let output = service(&repo)
            .find_single_project_presentation(&id)
            .await
            .unwrap();

        assert_eq!(output, Some(existing));
        assert_eq!(repo.calls(), vec![Call::FindById(id)]);
    }

    #[tokio::test]
    async fn test_find_single_not_found_is_none() {
        let repo = Arc::new(MockRepository::default());
        let id = crate::models::generate_ulid();

        let output = service(&repo)
            .find_single_project_presentation(&id)
            .await
            .unwrap();

        assert_eq!(output, None);
        assert_eq!(repo.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_create_returns_saved_presentation() {
        let input = mocked("mockedReferenceName");
        let saved = mocked("mockedReferenceName").with_id("savedMockedProjectId");
        let repo = Arc::new(MockRepository {
            saved: Some(saved.clone()),
            ..Default::default()
        });

        let output = service(&repo)
            .create_project_presentation(input.clone())
            .await
            .unwrap();

        assert_eq!(output, saved);
        assert_eq!(repo.calls(), vec![Call::Save(input)]);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_without_saving() {
        let repo = Arc::new(MockRepository::default());
        let mut input = mocked("name");
        input.project_id = String::new();

        let result = service(&repo).create_project_presentation(input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_client_chosen_id_without_saving() {
        let repo = Arc::new(MockRepository::default());

        let result = service(&repo)
            .create_project_presentation(mocked("name").with_id("custom-id"))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_accepts_store_shaped_id() {
        let repo = Arc::new(MockRepository::default());
        let id = crate::models::generate_ulid();

        let output = service(&repo)
            .create_project_presentation(mocked("name").with_id(&id))
            .await
            .unwrap();

        assert_eq!(output.id.as_deref(), Some(id.as_str()));
        assert_eq!(repo.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_update_scoped_lookup_then_save() {
        let existing = mocked("mockedReferenceName").with_id("id1");
        let repo = Arc::new(MockRepository {
            found: Some(existing.clone()),
            ..Default::default()
        });
        let incoming = mocked("mockedUpdatedReferenceName");

        let output = service(&repo)
            .update_project_presentation("id1", &incoming, &contributor())
            .await
            .unwrap();

        assert_eq!(output.reference_name, "mockedUpdatedReferenceName");
        assert_eq!(output.contributors, existing.contributors);

        let expected_filter = ListProjectPresentationsFilter {
            project_ids: Some(vec!["mockedProjectId".into()]),
            project_id: None,
            contributor_ids: Some(vec!["1".into()]),
            ids: Some(vec!["id1".into()]),
        };
        let mut expected_saved = existing;
        expected_saved.reference_name = "mockedUpdatedReferenceName".into();

        assert_eq!(
            repo.calls(),
            vec![
                Call::FindByIdForContributor(expected_filter, contributor()),
                Call::Save(expected_saved),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_returns_store_result_unchanged() {
        let stored = mocked("normalized by store").with_id("id1");
        let repo = Arc::new(MockRepository {
            found: Some(mocked("mockedReferenceName").with_id("id1")),
            saved: Some(stored.clone()),
            ..Default::default()
        });

        let output = service(&repo)
            .update_project_presentation("id1", &mocked("updated"), &contributor())
            .await
            .unwrap();

        assert_eq!(output, stored);
    }

    #[tokio::test]
    async fn test_update_keeps_identity_and_ownership() {
        let existing = ProjectPresentation::new(
            "project-a",
            [contributor(), SimpleContributor::new("7").with_grant("editor")],
            "Before",
            vec![section("Intro")],
        )
        .with_id("id1");
        let repo = Arc::new(MockRepository {
            found: Some(existing.clone()),
            ..Default::default()
        });
        let incoming = ProjectPresentation::new(
            "project-a",
            [SimpleContributor::new("99")],
            "After",
            vec![section("Team"), section("Roadmap")],
        )
        .with_id("other-id");

        let output = service(&repo)
            .update_project_presentation("id1", &incoming, &contributor())
            .await
            .unwrap();

        assert_eq!(output.id.as_deref(), Some("id1"));
        assert_eq!(output.project_id, "project-a");
        assert_eq!(output.contributors, existing.contributors);
        assert_eq!(output.reference_name, "After");
        assert_eq!(output.sections, vec![section("Team"), section("Roadmap")]);
    }

    #[tokio::test]
    async fn test_update_without_scoped_match_does_not_save() {
        let repo = Arc::new(MockRepository::default());

        let result = service(&repo)
            .update_project_presentation("id1", &mocked("updated"), &contributor())
            .await;

        match result {
            Err(AppError::PresentationNotFound { id, contributor_id }) => {
                assert_eq!(id, "id1");
                assert_eq!(contributor_id, "1");
            }
            other => panic!("expected PresentationNotFound, got {:?}", other),
        }
        assert_eq!(repo.calls().len(), 1);
        assert!(!repo.calls().iter().any(|c| matches!(c, Call::Save(_))));
    }

    #[tokio::test]
    async fn test_store_failures_propagate() {
        let repo = Arc::new(MockRepository {
            offline: true,
            ..Default::default()
        });
        let id = crate::models::generate_ulid();

        let find = service(&repo).find_single_project_presentation(&id).await;
        assert!(matches!(find, Err(AppError::Connection(_))));

        let list = service(&repo)
            .find_project_presentations(&ListProjectPresentationsFilter::default())
            .await;
        assert!(matches!(list, Err(AppError::Connection(_))));

        let create = service(&repo)
            .create_project_presentation(mocked("name"))
            .await;
        assert!(matches!(create, Err(AppError::Connection(_))));

        let update = service(&repo)
            .update_project_presentation("id1", &mocked("name"), &contributor())
            .await;
        assert!(matches!(update, Err(AppError::Connection(_))));

        // One attempt per operation, no retries.
        assert_eq!(repo.calls().len(), 4);
    }
}
