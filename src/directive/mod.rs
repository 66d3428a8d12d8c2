//! Order-dependent directive resolution.
//!
//! The file-adding flags (`-f`, `-l`, `-D`) each capture the root context
//! (`-C` / `-j`) and zip prefix (`-P`) in effect at the point they appear on
//! the command line. [`ParseContext`] folds the ordered flag stream into the
//! directive list one [`OrderedFlag`] at a time.

mod context;
mod nondeflate;
mod request;

pub use context::RootContext;
pub use nondeflate::NonDeflateSet;
pub use request::PackagingRequest;

use std::path::PathBuf;

use tracing::debug;

use crate::error::PackError;

/// What a directive adds to the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// `-f`: a single file.
    File(String),
    /// `-l`: the lines of a list file, read when the flag was parsed.
    List { list: PathBuf, paths: Vec<String> },
    /// `-D`: every file below a directory, expanded by the engine.
    Dir(String),
}

/// One file-adding flag, with the context it was given under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub root: RootContext,
    /// Path prefix inside the archive.
    pub zip_prefix: String,
    pub source: Source,
}

impl Directive {
    /// Source paths named directly by this directive.
    ///
    /// Empty for a directory glob, whose contents are only known on disk.
    pub fn source_files(&self) -> &[String] {
        match &self.source {
            Source::File(path) => std::slice::from_ref(path),
            Source::List { paths, .. } => paths,
            Source::Dir(_) => &[],
        }
    }
}

/// An order-sensitive flag occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderedFlag {
    /// `-P`
    ZipPrefix(String),
    /// `-C`
    StripPrefix(String),
    /// `-j`
    JunkPaths(bool),
    /// `-f`
    File(String),
    /// `-l`
    ListFile(String),
    /// `-D`
    Dir(String),
    /// `-s`
    NonDeflate(String),
}

/// Accumulated state of one parsing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    root: RootContext,
    zip_prefix: String,
    directives: Vec<Directive>,
    non_deflate: NonDeflateSet,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a whole flag stream, stopping at the first error.
    pub fn fold<I>(flags: I) -> Result<Self, PackError>
    where
        I: IntoIterator<Item = OrderedFlag>,
    {
        flags
            .into_iter()
            .try_fold(Self::new(), |ctx, flag| ctx.apply(flag))
    }

    pub fn apply(mut self, flag: OrderedFlag) -> Result<Self, PackError> {
        match flag {
            OrderedFlag::ZipPrefix(prefix) => self.zip_prefix = prefix,
            OrderedFlag::StripPrefix(path) => self.root.set_strip_prefix(path),
            OrderedFlag::JunkPaths(junk) => self.root.set_junk_paths(junk),
            OrderedFlag::File(path) => self.add_file(path)?,
            OrderedFlag::ListFile(path) => self.add_list_file(path)?,
            OrderedFlag::Dir(path) => self.add_dir(path)?,
            OrderedFlag::NonDeflate(path) => self.non_deflate.insert(path)?,
        }
        Ok(self)
    }

    fn add_file(&mut self, path: String) -> Result<(), PackError> {
        self.require_root('f')?;
        self.push(Source::File(path));
        Ok(())
    }

    /// Reads the list immediately so that a bad path fails the parse.
    fn add_list_file(&mut self, path: String) -> Result<(), PackError> {
        self.require_root('l')?;
        let list = PathBuf::from(path);
        let contents = std::fs::read_to_string(&list).map_err(|source| PackError::Read {
            path: list.clone(),
            source,
        })?;
        let paths = contents.split('\n').map(str::to_owned).collect();
        self.push(Source::List { list, paths });
        Ok(())
    }

    fn add_dir(&mut self, path: String) -> Result<(), PackError> {
        self.require_root('D')?;
        self.push(Source::Dir(path));
        Ok(())
    }

    fn require_root(&self, flag: char) -> Result<(), PackError> {
        if self.root.is_set() {
            Ok(())
        } else {
            Err(PackError::Ordering { flag })
        }
    }

    fn push(&mut self, source: Source) {
        let directive = Directive {
            root: self.root.clone(),
            zip_prefix: self.zip_prefix.clone(),
            source,
        };
        debug!(
            index = self.directives.len(),
            strip = directive.root.strip_prefix(),
            junk = directive.root.junk_paths(),
            prefix = %directive.zip_prefix,
            source = ?directive.source,
            "added directive"
        );
        self.directives.push(directive);
    }

    pub fn root(&self) -> &RootContext {
        &self.root
    }

    pub fn zip_prefix(&self) -> &str {
        &self.zip_prefix
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn non_deflate(&self) -> &NonDeflateSet {
        &self.non_deflate
    }

    pub fn into_parts(self) -> (Vec<Directive>, NonDeflateSet) {
        (self.directives, self.non_deflate)
    }
}
