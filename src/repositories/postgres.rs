//! PostgreSQL-backed presentation store.
//!
//! Each presentation is one row of `project_presentations`; the full
//! document lives in a `JSONB` column and `id` / `project_id` are mirrored
//! into their own columns for indexing. The table is created by the
//! `m001_presentations` migration.

use async_stream::try_stream;
use async_trait::async_trait;
use futures::TryStreamExt;
use tokio_postgres::types::{Json, ToSql};

use super::{PresentationStream, ProjectPresentationRepository};
use crate::db::PostgresClient;
use crate::error::AppError;
use crate::models::{
    generate_ulid, ListProjectPresentationsFilter, ProjectPresentation, SimpleContributor,
};

const SELECT_BY_ID: &str = "SELECT document FROM project_presentations WHERE id = $1";

const UPSERT: &str = r#"
INSERT INTO project_presentations (id, project_id, document)
VALUES ($1, $2, $3)
ON CONFLICT (id) DO UPDATE
SET project_id = EXCLUDED.project_id,
    document = EXCLUDED.document,
    updated_at = NOW()
RETURNING document
"#;

/// Repository over the `project_presentations` table.
#[derive(Clone)]
pub struct PostgresPresentationRepository {
    client: PostgresClient,
}

impl PostgresPresentationRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProjectPresentationRepository for PostgresPresentationRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<ProjectPresentation>, AppError> {
        let conn = self.client.get_connection().await?;
        let row = conn
            .query_opt(SELECT_BY_ID, &[&id])
            .await
            .map_err(|e| AppError::query(e, SELECT_BY_ID))?;

        row.as_ref().map(decode_document).transpose()
    }

    async fn find_using_filter(
        &self,
        filter: &ListProjectPresentationsFilter,
    ) -> Result<PresentationStream, AppError> {
        let query = FilterQuery::from_filter(filter);
        let sql = query.select_sql(None);
        let params = query.params;
        tracing::debug!(%sql, "streaming presentations");

        // The stream owns the pooled connection until it is dropped.
        let conn = self.client.get_connection().await?;

        Ok(Box::pin(try_stream! {
            let rows = conn
                .query_raw(sql.as_str(), params.iter())
                .await
                .map_err(|e| AppError::query(e, &sql))?;

            futures::pin_mut!(rows);
            while let Some(row) = rows.try_next().await.map_err(|e| AppError::query(e, &sql))? {
                yield decode_document(&row)?;
            }
        }))
    }

    async fn find_by_id_for_contributor(
        &self,
        filter: &ListProjectPresentationsFilter,
        contributor: &SimpleContributor,
    ) -> Result<Option<ProjectPresentation>, AppError> {
        let mut query = FilterQuery::from_filter(filter);
        query.push(contributor_clause, vec![contributor.contributor_id.clone()]);
        let sql = query.select_sql(Some(1));
        tracing::debug!(%sql, contributor_id = %contributor.contributor_id, "scoped lookup");

        let params: Vec<&(dyn ToSql + Sync)> = query
            .params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect();

        let conn = self.client.get_connection().await?;
        let row = conn
            .query_opt(sql.as_str(), &params)
            .await
            .map_err(|e| AppError::query(e, &sql))?;

        row.as_ref().map(decode_document).transpose()
    }

    async fn save(
        &self,
        mut presentation: ProjectPresentation,
    ) -> Result<ProjectPresentation, AppError> {
        let id = presentation
            .persisted_id()
            .map(str::to_string)
            .unwrap_or_else(generate_ulid);
        presentation.id = Some(id.clone());

        let conn = self.client.get_connection().await?;
        let row = conn
            .query_one(
                UPSERT,
                &[&id, &presentation.project_id, &Json(&presentation)],
            )
            .await
            .map_err(|e| AppError::query(e, UPSERT))?;

        tracing::debug!(%id, "saved presentation");
        decode_document(&row)
    }
}

fn decode_document(row: &tokio_postgres::Row) -> Result<ProjectPresentation, AppError> {
    row.try_get::<_, Json<ProjectPresentation>>("document")
        .map(|Json(document)| document)
        .map_err(|e| AppError::Internal(format!("Failed to decode presentation: {}", e)))
}

fn contributor_clause(n: usize) -> String {
    format!(
        "EXISTS (SELECT 1 FROM jsonb_array_elements(document -> 'contributors') AS c \
         WHERE c ->> 'contributor_id' = ANY(${}))",
        n
    )
}

/// WHERE clause compiled from a filter.
///
/// Every value is bound as a `text[]` parameter, so single values use
/// `= ANY` as well.
#[derive(Debug, Default)]
struct FilterQuery {
    clauses: Vec<String>,
    params: Vec<Vec<String>>,
}

impl FilterQuery {
    fn from_filter(filter: &ListProjectPresentationsFilter) -> Self {
        let mut query = Self::default();

        if let Some(project_ids) = &filter.project_ids {
            query.push(|n| format!("project_id = ANY(${})", n), project_ids.clone());
        }
        if let Some(project_id) = &filter.project_id {
            query.push(|n| format!("project_id = ANY(${})", n), vec![project_id.clone()]);
        }
        if let Some(contributor_ids) = &filter.contributor_ids {
            query.push(contributor_clause, contributor_ids.clone());
        }
        if let Some(ids) = &filter.ids {
            query.push(|n| format!("id = ANY(${})", n), ids.clone());
        }

        query
    }

    /// Adds a clause; `clause` receives the 1-based placeholder index.
    fn push(&mut self, clause: impl FnOnce(usize) -> String, values: Vec<String>) {
        self.params.push(values);
        self.clauses.push(clause(self.params.len()));
    }

    fn select_sql(&self, limit: Option<u32>) -> String {
        let mut sql = String::from("SELECT document FROM project_presentations");
        if !self.clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        sql
    }
}
