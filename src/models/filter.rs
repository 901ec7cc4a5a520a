//! Query filter for listing presentations.

use serde::{Deserialize, Serialize};

use super::ProjectPresentation;

/// Filter for presentation searches. Not stored.
///
/// Present constraints are combined with AND; a `None` field does not
/// constrain. A present but empty list matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListProjectPresentationsFilter {
    /// Owning project ids; any may match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_ids: Option<Vec<String>>,
    /// A single owning project id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// At least one of these must be among the presentation's contributors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor_ids: Option<Vec<String>>,
    /// Presentation ids; any may match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
}

impl ListProjectPresentationsFilter {
    /// Filter used to fetch a presentation for update: scoped to the owning
    /// project, the requesting contributor and the presentation id.
    pub fn for_update(
        presentation_id: impl Into<String>,
        project_id: impl Into<String>,
        contributor_id: impl Into<String>,
    ) -> Self {
        Self {
            project_ids: Some(vec![project_id.into()]),
            project_id: None,
            contributor_ids: Some(vec![contributor_id.into()]),
            ids: Some(vec![presentation_id.into()]),
        }
    }

    /// Returns true if no field constrains.
    pub fn is_empty(&self) -> bool {
        self.project_ids.is_none()
            && self.project_id.is_none()
            && self.contributor_ids.is_none()
            && self.ids.is_none()
    }

    /// Evaluates the filter against one presentation.
    pub fn matches(&self, presentation: &ProjectPresentation) -> bool {
        if let Some(project_ids) = &self.project_ids {
            if !project_ids.contains(&presentation.project_id) {
                return false;
            }
        }

        if let Some(project_id) = &self.project_id {
            if *project_id != presentation.project_id {
                return false;
            }
        }

        if let Some(contributor_ids) = &self.contributor_ids {
            if !contributor_ids
                .iter()
                .any(|id| presentation.has_contributor(id))
            {
                return false;
            }
        }

        if let Some(ids) = &self.ids {
            match presentation.persisted_id() {
                Some(id) if ids.iter().any(|candidate| candidate == id) => {}
                _ => return false,
            }
        }

        true
    }
}
