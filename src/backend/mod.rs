//! Archive backend communication

pub mod api;
pub mod types;

pub use api::{ArchiveApi, BackendClient, ImageQuery, FALLBACK_CATEGORY};
pub use types::*;

#[cfg(test)]
pub mod fake;
