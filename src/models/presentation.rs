//! Project presentation aggregate and its section value types.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use super::SimpleContributor;
use crate::error::AppError;

/// How a project is shown: a reference name, its contributors and an
/// ordered list of content sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPresentation {
    /// Store-assigned identifier (ULID). `None` until the first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning project. Never changed by an update.
    pub project_id: String,
    /// Contributors allowed to act on this presentation. Never changed by an update.
    #[serde(default)]
    pub contributors: BTreeSet<SimpleContributor>,
    /// Human-readable label.
    pub reference_name: String,
    /// Content blocks, in display order.
    #[serde(default)]
    pub sections: Vec<PresentationSection>,
}

/// One content block of a presentation. Has no identity of its own and is
/// always replaced together with the rest of the section list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationSection {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_media: Option<PresentationMedia>,
    #[serde(default)]
    pub media: Vec<PresentationMedia>,
}

/// A media reference (image, video, ...) used by a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationMedia {
    pub media_type: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl ProjectPresentation {
    /// Creates an unsaved presentation.
    pub fn new(
        project_id: impl Into<String>,
        contributors: impl IntoIterator<Item = SimpleContributor>,
        reference_name: impl Into<String>,
        sections: Vec<PresentationSection>,
    ) -> Self {
        Self {
            id: None,
            project_id: project_id.into(),
            contributors: merge_contributors(contributors),
            reference_name: reference_name.into(),
            sections,
        }
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Identifier if assigned and non-empty.
    pub fn persisted_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Returns true if `contributor_id` is one of the contributors.
    pub fn has_contributor(&self, contributor_id: &str) -> bool {
        self.contributors
            .iter()
            .any(|c| c.contributor_id == contributor_id)
    }

    /// Applies an update: takes `reference_name` and `sections` from
    /// `incoming`, keeps everything else from `self`.
    pub fn merged_with(self, incoming: &ProjectPresentation) -> Self {
        Self {
            reference_name: incoming.reference_name.clone(),
            sections: incoming.sections.clone(),
            ..self
        }
    }

    /// Checks a client-supplied presentation before it is first saved.
    ///
    /// An id, when present, must be one the store could have assigned.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(id) = self.persisted_id() {
            if !is_valid_id(id) {
                return Err(ValidationError::MalformedId { id: id.to_string() });
            }
        }
        self.validate_content()
    }

    /// Checks the invariants of the document body. The id is not inspected.
    pub fn validate_content(&self) -> Result<(), ValidationError> {
        if self.project_id.trim().is_empty() {
            return Err(ValidationError::BlankProjectId);
        }
        if self.reference_name.trim().is_empty() {
            return Err(ValidationError::BlankReferenceName);
        }
        if self
            .contributors
            .iter()
            .any(|c| c.contributor_id.trim().is_empty())
        {
            return Err(ValidationError::BlankContributorId);
        }
        let mut seen = BTreeSet::new();
        if let Some(duplicate) = self
            .contributors
            .iter()
            .find(|c| !seen.insert(c.contributor_id.as_str()))
        {
            return Err(ValidationError::DuplicateContributor {
                contributor_id: duplicate.contributor_id.clone(),
            });
        }
        if let Some(index) = self
            .sections
            .iter()
            .position(|s| s.title.trim().is_empty())
        {
            return Err(ValidationError::BlankSectionTitle { index });
        }
        Ok(())
    }
}

/// Invariant violations of a presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MalformedId { id: String },
    BlankProjectId,
    BlankReferenceName,
    BlankContributorId,
    BlankSectionTitle { index: usize },
    DuplicateContributor { contributor_id: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MalformedId { id } => {
                write!(f, "id {:?} is not a store-assigned identifier", id)
            }
            ValidationError::BlankProjectId => write!(f, "project_id must not be blank"),
            ValidationError::BlankReferenceName => {
                write!(f, "reference_name must not be blank")
            }
            ValidationError::BlankContributorId => {
                write!(f, "contributor ids must not be blank")
            }
            ValidationError::BlankSectionTitle { index } => {
                write!(f, "section {} has a blank title", index)
            }
            ValidationError::DuplicateContributor { contributor_id } => {
                write!(f, "contributor {} is listed more than once", contributor_id)
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Collapses contributors sharing an id into one entry holding the union
/// of their grants.
fn merge_contributors(
    contributors: impl IntoIterator<Item = SimpleContributor>,
) -> BTreeSet<SimpleContributor> {
    let mut by_id: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for contributor in contributors {
        by_id
            .entry(contributor.contributor_id)
            .or_default()
            .extend(contributor.grants);
    }
    by_id
        .into_iter()
        .map(|(contributor_id, grants)| SimpleContributor {
            contributor_id,
            grants,
        })
        .collect()
}

/// Generates a new ULID string.
pub fn generate_ulid() -> String {
    Ulid::new().to_string()
}

/// Returns true if `id` is a well-formed store identifier.
pub fn is_valid_id(id: &str) -> bool {
    Ulid::from_string(id).is_ok()
}
