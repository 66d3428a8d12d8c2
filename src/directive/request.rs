use std::path::PathBuf;

use super::{Directive, NonDeflateSet};

/// Everything the archive engine needs to build one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingRequest {
    /// File-adding directives in command-line order.
    pub directives: Vec<Directive>,
    pub non_deflate: NonDeflateSet,
    pub output: Option<PathBuf>,
    /// Deflate level, 0-9.
    pub compression_level: u32,
    /// Worker count hint for the engine.
    pub parallelism: usize,
    pub manifest: Option<PathBuf>,
    pub emulate_jar: bool,
    pub add_directory_entries: bool,
    pub write_if_changed: bool,
    pub cpu_profile: Option<PathBuf>,
    pub trace: Option<PathBuf>,
}
