//! Application error types.

use thiserror::Error;

/// Application-level errors for the presentation service.
#[derive(Error, Debug)]
pub enum AppError {
    // Store errors
    #[error("PostgreSQL connection error: {0}")]
    Connection(String),

    #[error("PostgreSQL query error: {message}")]
    Query { message: String, query: String },

    #[error("Document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    // Domain errors
    /// The scoped lookup of an update matched nothing. The presentation may
    /// not exist, or the requesting contributor is not one of its
    /// contributors; the two cases are not told apart.
    #[error("Project presentation not found for contributor {contributor_id}: {id}")]
    PresentationNotFound { id: String, contributor_id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// Wraps a driver error raised while running `query`.
    pub(crate) fn query(err: tokio_postgres::Error, query: &str) -> Self {
        AppError::Query {
            message: describe_db_error(&err),
            query: query.to_string(),
        }
    }

    /// Returns true for the collapsed not-found / not-authorized outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::PresentationNotFound { .. })
    }
}

/// Server-side detail of a driver error: severity, message, SQLSTATE and,
/// when the server sent them, detail and hint.
pub(crate) fn describe_db_error(err: &tokio_postgres::Error) -> String {
    let Some(db_err) = err.as_db_error() else {
        return err.to_string();
    };

    let mut detail = format!(
        "{}: {} [{}]",
        db_err.severity(),
        db_err.message(),
        db_err.code().code()
    );
    if let Some(extra) = db_err.detail() {
        detail.push_str(&format!(" (detail: {})", extra));
    }
    if let Some(hint) = db_err.hint() {
        detail.push_str(&format!(" (hint: {})", hint));
    }
    detail
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_contributor() {
        let err = AppError::PresentationNotFound {
            id: "01HZX".to_string(),
            contributor_id: "1".to_string(),
        };

        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Project presentation not found for contributor 1: 01HZX"
        );
    }

    #[test]
    fn test_validation_is_not_not_found() {
        let err = AppError::Validation("project_id must not be blank".into());
        assert!(!err.is_not_found());
    }
}
