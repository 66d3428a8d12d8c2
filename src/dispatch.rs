use crate::args::expand_response_files;
use crate::cli::parse_request;
use crate::engine::ArchiveEngine;
use crate::error::PackError;

/// Run one packaging invocation.
///
/// `args` is the raw command line, program name first. Response files are
/// expanded, flags are folded into a request, and the request is handed to
/// `engine` once.
pub async fn run<E>(args: Vec<String>, engine: &E) -> Result<(), PackError>
where
    E: ArchiveEngine + ?Sized,
{
    let args = expand_response_files(args)?;
    let request = parse_request(args)?;
    engine.run(&request).await.map_err(PackError::Engine)
}
