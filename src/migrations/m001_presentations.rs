//! Presentation document table.

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::db::SqlExecutor;
use crate::error::AppError;
use crate::migrations::Migration;

/// Creates `project_presentations` and its indexes.
pub struct M001Presentations;

const CREATE_PRESENTATIONS: &str = r#"
CREATE TABLE IF NOT EXISTS project_presentations (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    document JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS project_presentations_project_id_idx
ON project_presentations (project_id);

CREATE INDEX IF NOT EXISTS project_presentations_document_idx
ON project_presentations USING GIN (document jsonb_path_ops);
"#;

impl Migration for M001Presentations {
    fn id(&self) -> &'static str {
        "m001_presentations"
    }

    fn version(&self) -> u32 {
        1
    }

    fn description(&self) -> &'static str {
        "Presentation documents table (JSONB) with project and document indexes"
    }

    fn up<'a>(&'a self, ctx: &'a (dyn SqlExecutor + Sync)) -> BoxFuture<'a, Result<(), AppError>> {
        async move { ctx.execute_sql(CREATE_PRESENTATIONS).await }.boxed()
    }
}
