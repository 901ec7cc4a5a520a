//! Domain models for project presentations.

mod contributor;
mod filter;
mod presentation;

pub use contributor::SimpleContributor;
pub use filter::ListProjectPresentationsFilter;
pub use presentation::{
    generate_ulid, is_valid_id, PresentationMedia, PresentationSection, ProjectPresentation,
    ValidationError,
};
