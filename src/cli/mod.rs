//! CLI module.
//!
//! Subcommands:
//! - `init`: apply pending database migrations
//! - `get`, `list`, `create`, `update`: presentation operations

mod init;
mod presentations;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::context::Context;
use crate::di::FromRef;
use crate::models::ListProjectPresentationsFilter;
use crate::services::ProjectPresentationService;

/// Project presentations - manage how projects are presented
#[derive(Parser)]
#[command(name = "project-presentations")]
#[command(about = "Manage project presentation documents")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply pending database migrations
    Init,

    /// Print one presentation as JSON
    Get {
        /// Presentation id
        id: String,
    },

    /// Print the presentations matching a filter, one JSON document per line
    List(ListArgs),

    /// Create a presentation from a JSON file
    Create {
        /// Path to the presentation document
        #[arg(long)]
        file: PathBuf,
    },

    /// Replace the reference name and sections of a presentation
    Update {
        /// Presentation id
        id: String,

        /// Path to the incoming presentation document
        #[arg(long)]
        file: PathBuf,

        /// Id of the contributor requesting the update
        #[arg(long)]
        contributor: String,

        /// Grants held by the requesting contributor
        #[arg(long = "grant")]
        grants: Vec<String>,
    },
}

/// Filter flags for `list`. Repeat a flag to match any of several values.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Owning project id
    #[arg(long = "project-id")]
    pub project_ids: Vec<String>,

    /// Contributor id
    #[arg(long = "contributor-id")]
    pub contributor_ids: Vec<String>,

    /// Presentation id
    #[arg(long = "id")]
    pub ids: Vec<String>,
}

impl ListArgs {
    /// Unset flags leave the matching field unconstrained.
    pub fn to_filter(&self) -> ListProjectPresentationsFilter {
        fn non_empty(values: &[String]) -> Option<Vec<String>> {
            (!values.is_empty()).then(|| values.to_vec())
        }

        ListProjectPresentationsFilter {
            project_ids: non_empty(&self.project_ids),
            project_id: None,
            contributor_ids: non_empty(&self.contributor_ids),
            ids: non_empty(&self.ids),
        }
    }
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> color_eyre::Result<()> {
        match self.command {
            Command::Init => self.run_init().await,
            ref command => {
                let config = Config::load()?;
                let ctx = Context::from_config(config)?;
                let service = ProjectPresentationService::from_ref(&ctx);
                let mut stdout = std::io::stdout().lock();
                presentations::execute(&service, command, &mut stdout).await
            }
        }
    }
}
