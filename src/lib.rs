//! Project presentations - how projects are shown.
//!
//! A presentation is a reference name, the contributors that own it and an
//! ordered list of content sections. [`services::ProjectPresentationService`]
//! finds, lists, creates and merge-updates presentations over any
//! [`repositories::ProjectPresentationRepository`].

pub mod cli;
pub mod config;
pub mod context;
pub mod db;
pub mod di;
pub mod error;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod services;

// Re-export FromRef at crate root for di-macros generated code
pub use di::FromRef;
