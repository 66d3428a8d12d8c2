//! Error taxonomy for the packaging front-end.
//!
//! Every failure aborts the invocation. [`PackError::exit_code`] maps each
//! kind onto the process exit status: `2` for usage problems, `1` for I/O and
//! engine failures.

use std::path::PathBuf;

/// Exit status for runtime, I/O and engine failures.
pub const EXIT_RUNTIME: i32 = 1;
/// Exit status for usage errors.
pub const EXIT_USAGE: i32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum PackError {
    /// A file-adding flag appeared before any `-C` or `-j`.
    #[error("must pass -C or -j before -{flag}")]
    Ordering { flag: char },

    /// The same path was passed to `-s` twice.
    #[error("File {path:?} was specified twice as a file to not deflate")]
    DuplicateNonDeflate { path: String },

    /// A response file or list file could not be read.
    #[error("{}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Positional tokens were left over after flag parsing.
    #[error("unexpected arguments {}", .residue.join(" "))]
    UnexpectedArguments { residue: Vec<String> },

    /// The flag parser rejected the command line.
    #[error(transparent)]
    Cli(#[from] clap::Error),

    /// The archive engine failed.
    #[error(transparent)]
    Engine(anyhow::Error),
}

impl PackError {
    pub fn exit_code(&self) -> i32 {
        match self {
            PackError::Ordering { .. }
            | PackError::DuplicateNonDeflate { .. }
            | PackError::UnexpectedArguments { .. } => EXIT_USAGE,
            PackError::Cli(err) => err.exit_code(),
            PackError::Read { .. } | PackError::Engine(_) => EXIT_RUNTIME,
        }
    }

    /// Whether the usage summary should accompany the message.
    pub fn wants_usage(&self) -> bool {
        matches!(
            self,
            PackError::Ordering { .. }
                | PackError::DuplicateNonDeflate { .. }
                | PackError::UnexpectedArguments { .. }
        )
    }
}
