//! Contributor references attached to presentations.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A contributor reference: identifier plus the grants (roles) it holds.
///
/// Resolved by an external identity layer; the service only compares ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimpleContributor {
    pub contributor_id: String,
    #[serde(default)]
    pub grants: BTreeSet<String>,
}

impl SimpleContributor {
    /// Creates a contributor reference without grants.
    pub fn new(contributor_id: impl Into<String>) -> Self {
        Self {
            contributor_id: contributor_id.into(),
            grants: BTreeSet::new(),
        }
    }

    /// Adds a grant.
    pub fn with_grant(mut self, grant: impl Into<String>) -> Self {
        self.grants.insert(grant.into());
        self
    }
}
