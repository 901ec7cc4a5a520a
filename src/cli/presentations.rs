//! Presentation command handlers.

use std::io::Write;
use std::path::Path;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use futures::TryStreamExt;

use super::Command;
use crate::models::{ProjectPresentation, SimpleContributor};
use crate::services::ProjectPresentationService;

/// Runs a presentation command, writing JSON results to `out`.
pub(crate) async fn execute<W: Write>(
    service: &ProjectPresentationService,
    command: &Command,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Init => Err(eyre!("init is not a presentation command")),

        Command::Get { id } => match service.find_single_project_presentation(id).await? {
            Some(presentation) => {
                writeln!(out, "{}", serde_json::to_string_pretty(&presentation)?)?;
                Ok(())
            }
            None => Err(eyre!("Presentation not found: {}", id)),
        },

        Command::List(args) => {
            let filter = args.to_filter();
            if filter.is_empty() {
                tracing::debug!("no filter flags, listing every presentation");
            }
            let mut stream = service.find_project_presentations(&filter).await?;
            let mut count = 0usize;
            while let Some(presentation) = stream.try_next().await? {
                writeln!(out, "{}", serde_json::to_string(&presentation)?)?;
                count += 1;
            }
            tracing::debug!(count, "listed presentations");
            Ok(())
        }

        Command::Create { file } => {
            let presentation = read_presentation(file)?;
            let saved = service.create_project_presentation(presentation).await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&saved)?)?;
            Ok(())
        }

        Command::Update {
            id,
            file,
            contributor,
            grants,
        } => {
            let incoming = read_presentation(file)?;
            let requesting = grants
                .iter()
                .fold(SimpleContributor::new(contributor.as_str()), |c, grant| {
                    c.with_grant(grant.as_str())
                });
            let saved = service
                .update_project_presentation(id, &incoming, &requesting)
                .await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&saved)?)?;
            Ok(())
        }
    }
}

fn read_presentation(path: &Path) -> Result<ProjectPresentation> {
    let body = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&body)
        .wrap_err_with(|| format!("Invalid presentation document in {}", path.display()))
}
