//! The archive engine boundary.
//!
//! The front-end only builds a [`PackagingRequest`]; an [`ArchiveEngine`]
//! fulfills it. [`PlanEngine`] is the bundled implementation: it resolves
//! every directive into the ordered list of archive entries and reports that
//! plan without writing archive bytes.

mod mapping;
mod plan;

pub use mapping::{base_name, entry_name, join_zip_path, relative_to};
pub use plan::{Method, PlanEngine, PlannedEntry, plan, write_plan};

use anyhow::Result;
use async_trait::async_trait;

use crate::directive::PackagingRequest;

/// Something that turns a request into an archive.
#[async_trait]
pub trait ArchiveEngine: Send + Sync {
    /// Build the archive described by `request`.
    async fn run(&self, request: &PackagingRequest) -> Result<()>;
}
