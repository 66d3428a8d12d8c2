//! # packzip
//!
//! Front-end for a zip packaging tool driven by build-system flags.
//!
//! The command line is an ordered program: `-C dir` and `-j` set the root
//! context, and every following `-f`, `-l` or `-D` captures that context into
//! a directive. Directive order is archive entry order. The result is a
//! [`PackagingRequest`] handed to an [`ArchiveEngine`].
//!
//! ## Example
//!
//! ```no_run
//! use packzip::{PackError, PlanEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), PackError> {
//!     let args = ["packzip", "-o", "out.zip", "-C", "src", "-f", "src/a.txt", "-D", "src/res"];
//!     packzip::run(args.iter().map(|s| s.to_string()).collect(), &PlanEngine).await
//! }
//! ```

pub mod args;
pub mod cli;
pub mod directive;
pub mod engine;
pub mod error;

mod dispatch;

pub use cli::{Cli, parse_request};
pub use directive::{Directive, NonDeflateSet, OrderedFlag, PackagingRequest, ParseContext, RootContext, Source};
pub use dispatch::run;
pub use engine::{ArchiveEngine, PlanEngine};
pub use error::PackError;
