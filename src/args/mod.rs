//! Response-file expansion.
//!
//! Any token of the form `@path` is replaced by the tokens read from `path`.
//! Expansion is a single pass: tokens produced by a response file are not
//! scanned for further `@` markers.

mod respfile;

pub use respfile::split_response_file;

use std::path::PathBuf;

use tracing::debug;

use crate::error::PackError;

/// Marker that introduces a response file on the command line.
pub const RESPONSE_FILE_MARKER: char = '@';

/// Expand response files in `args`.
///
/// The first element is the program name and is passed through untouched.
pub fn expand_response_files<I, S>(args: I) -> Result<Vec<String>, PackError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut expanded: Vec<String> = args.next().into_iter().collect();

    for arg in args {
        match arg.strip_prefix(RESPONSE_FILE_MARKER) {
            Some(path) => {
                let path = PathBuf::from(path);
                let contents =
                    std::fs::read_to_string(&path).map_err(|source| PackError::Read {
                        path: path.clone(),
                        source,
                    })?;
                let tokens = split_response_file(&contents);
                debug!(path = %path.display(), tokens = tokens.len(), "expanded response file");
                expanded.extend(tokens);
            }
            None => expanded.push(arg),
        }
    }

    Ok(expanded)
}
