use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};

use crate::directive::{OrderedFlag, PackagingRequest, ParseContext};
use crate::error::PackError;

/// Long flags that are also accepted with a single leading dash.
const SINGLE_DASH_LONG_FLAGS: &[&str] = &["jar", "write_if_changed", "parallel", "cpuprofile", "trace"];

#[derive(Parser, Debug)]
#[command(name = "packzip")]
#[command(version)]
#[command(args_override_self = true)]
#[command(about = "Resolve zip packaging directives into an ordered archive request", long_about = None)]
#[command(override_usage = "packzip -o zipfile [-m manifest] -C dir [-f|-l file]...")]
#[command(after_help = "Examples:\n  \
  packzip -o out.zip -C src -f src/a.txt -D src/res    strip src/ from both entries\n  \
  packzip -o out.zip -j -l files.list -s big.bin       junk paths, store big.bin\n  \
  packzip @args.rsp                                    read arguments from args.rsp")]
pub struct Cli {
    /// File to write zip file to
    #[arg(short = 'o', value_name = "ZIPFILE")]
    pub output: Option<PathBuf>,

    /// Input jar manifest file name
    #[arg(short = 'm', value_name = "MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Include directories in zip
    #[arg(short = 'd')]
    pub directories: bool,

    /// Path prefix within the zip at which to place files
    #[arg(short = 'P', value_name = "PREFIX", allow_hyphen_values = true)]
    pub zip_prefix: Vec<String>,

    /// Deflate compression level (0-9)
    #[arg(short = 'L', value_name = "LEVEL", default_value_t = 5,
          value_parser = clap::value_parser!(u32).range(0..=9))]
    pub compression_level: u32,

    /// Modify the resultant .zip to emulate the output of 'jar'
    #[arg(long = "jar")]
    pub emulate_jar: bool,

    /// Only update resultant .zip if it has changed
    #[arg(long = "write_if_changed")]
    pub write_if_changed: bool,

    /// Number of parallel threads to use (default: number of CPUs)
    #[arg(long = "parallel", value_name = "N",
          value_parser = clap::value_parser!(u32).range(1..))]
    pub parallel: Option<u32>,

    /// Write cpu profile to file
    #[arg(long = "cpuprofile", value_name = "FILE")]
    pub cpu_profile: Option<PathBuf>,

    /// Write trace to file
    #[arg(long = "trace", value_name = "FILE")]
    pub trace: Option<PathBuf>,

    /// Path to use as relative root of files in following -f, -l, or -D arguments
    #[arg(short = 'C', value_name = "DIR", allow_hyphen_values = true)]
    pub strip_prefix: Vec<String>,

    /// Junk paths, zip files without directory names
    #[arg(short = 'j', num_args = 0..=1, require_equals = true,
          default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub junk_paths: Vec<bool>,

    /// File to include in zip
    #[arg(short = 'f', value_name = "FILE", allow_hyphen_values = true)]
    pub files: Vec<String>,

    /// File containing list of files to include in zip
    #[arg(short = 'l', value_name = "FILE", allow_hyphen_values = true)]
    pub list_files: Vec<String>,

    /// Directory to include in zip
    #[arg(short = 'D', value_name = "DIR", allow_hyphen_values = true)]
    pub dirs: Vec<String>,

    /// File path to be stored within the zip without compression
    #[arg(short = 's', value_name = "FILE", allow_hyphen_values = true)]
    pub non_deflate: Vec<String>,

    /// Anything left after the flags; always rejected.
    #[arg(value_name = "ARGS", hide = true, num_args = 1.., trailing_var_arg = true)]
    pub residue: Vec<String>,
}

impl Cli {
    /// Render the one-line usage summary.
    pub fn usage() -> String {
        Cli::command().render_usage().to_string()
    }
}

/// Rewrite `-jar`-style single-dash long flags to `--jar` so clap accepts them.
///
/// Rewriting stops at `--`.
pub fn normalize_long_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut past_separator = false;
    args.into_iter()
        .map(|arg| {
            if past_separator {
                return arg;
            }
            if arg == "--" {
                past_separator = true;
                return arg;
            }
            if let Some(rest) = arg.strip_prefix('-')
                && !rest.starts_with('-')
            {
                let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                if SINGLE_DASH_LONG_FLAGS.contains(&name) {
                    return format!("-{arg}");
                }
            }
            arg
        })
        .collect()
}

/// Parse an expanded argument list (program name first) into a request.
///
/// Flags that depend on their position are folded in command-line order;
/// leftover positional arguments are rejected afterwards. clap checks the
/// whole line before the fold runs, so a malformed flag anywhere (such as
/// `-L 10`) is reported ahead of an earlier ordering error. Both exit with
/// the usage status. A repeated scalar flag keeps its last value.
pub fn parse_request(args: Vec<String>) -> Result<PackagingRequest, PackError> {
    let matches = Cli::command().try_get_matches_from(normalize_long_flags(args))?;
    let cli = Cli::from_arg_matches(&matches)?;

    let ctx = ParseContext::fold(ordered_flags(&matches))?;

    if !cli.residue.is_empty() {
        return Err(PackError::UnexpectedArguments {
            residue: cli.residue,
        });
    }

    let (directives, non_deflate) = ctx.into_parts();
    let parallelism = match cli.parallel {
        Some(n) => n as usize,
        None => std::thread::available_parallelism().map_or(1, |n| n.get()),
    };

    Ok(PackagingRequest {
        directives,
        non_deflate,
        output: cli.output,
        compression_level: cli.compression_level,
        parallelism,
        manifest: cli.manifest,
        emulate_jar: cli.emulate_jar,
        add_directory_entries: cli.directories,
        write_if_changed: cli.write_if_changed,
        cpu_profile: cli.cpu_profile,
        trace: cli.trace,
    })
}

/// Recover the order-sensitive flags in the order they were given.
fn ordered_flags(matches: &ArgMatches) -> Vec<OrderedFlag> {
    let mut flags = Vec::new();
    collect(matches, "zip_prefix", OrderedFlag::ZipPrefix, &mut flags);
    collect(matches, "strip_prefix", OrderedFlag::StripPrefix, &mut flags);
    collect(matches, "junk_paths", OrderedFlag::JunkPaths, &mut flags);
    collect(matches, "files", OrderedFlag::File, &mut flags);
    collect(matches, "list_files", OrderedFlag::ListFile, &mut flags);
    collect(matches, "dirs", OrderedFlag::Dir, &mut flags);
    collect(matches, "non_deflate", OrderedFlag::NonDeflate, &mut flags);

    flags.sort_by_key(|(index, _)| *index);
    flags.into_iter().map(|(_, flag)| flag).collect()
}

fn collect<T>(
    matches: &ArgMatches,
    id: &str,
    make: fn(T) -> OrderedFlag,
    out: &mut Vec<(usize, OrderedFlag)>,
) where
    T: Clone + Send + Sync + 'static,
{
    if let (Some(indices), Some(values)) = (matches.indices_of(id), matches.get_many::<T>(id)) {
        out.extend(indices.zip(values.cloned().map(make)));
    }
}
