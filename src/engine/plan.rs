//! Resolve a request into the ordered list of archive entries.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::ArchiveEngine;
use super::mapping::entry_name;
use crate::directive::{Directive, PackagingRequest, Source};

const META_INF: &str = "META-INF/";
const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

/// How an entry's data is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Store,
    Deflate,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Store => "store",
            Method::Deflate => "deflate",
        }
    }
}

/// One archive entry, in final order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedEntry {
    /// Directory entry; the name ends with `/`.
    Dir { name: String },
    File {
        name: String,
        source: String,
        method: Method,
    },
}

impl PlannedEntry {
    pub fn name(&self) -> &str {
        match self {
            PlannedEntry::Dir { name } | PlannedEntry::File { name, .. } => name,
        }
    }
}

/// Engine that reports the resolved entry list on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlanEngine;

#[async_trait]
impl ArchiveEngine for PlanEngine {
    async fn run(&self, request: &PackagingRequest) -> Result<()> {
        debug!(
            parallelism = request.parallelism,
            write_if_changed = request.write_if_changed,
            cpu_profile = ?request.cpu_profile,
            trace = ?request.trace,
            "planning archive"
        );

        let entries = plan(request).await?;
        info!(
            output = ?request.output,
            entries = entries.len(),
            "resolved archive plan"
        );

        let mut stdout = tokio::io::stdout();
        write_plan(&entries, &mut stdout).await
    }
}

/// Write one line per entry: `<method>\t<name>\t<source>` or `dir\t<name>`.
pub async fn write_plan<W>(entries: &[PlannedEntry], out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut text = String::new();
    for entry in entries {
        match entry {
            PlannedEntry::Dir { name } => {
                text.push_str("dir\t");
                text.push_str(name);
            }
            PlannedEntry::File {
                name,
                source,
                method,
            } => {
                text.push_str(method.as_str());
                text.push('\t');
                text.push_str(name);
                text.push('\t');
                text.push_str(source);
            }
        }
        text.push('\n');
    }
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

/// Resolve every directive of `request` into archive entries.
pub async fn plan(request: &PackagingRequest) -> Result<Vec<PlannedEntry>> {
    if request.output.is_none() {
        bail!("output file path must be nonempty");
    }
    if request.manifest.is_some() && !request.emulate_jar {
        bail!("must specify -jar when specifying a manifest via -m");
    }

    let mut planner = Planner::new(request);

    if request.emulate_jar {
        planner.add_dir_entry(META_INF.to_owned());
        if let Some(manifest) = &request.manifest {
            planner.add_file(MANIFEST_ENTRY.to_owned(), manifest.to_string_lossy().into_owned())?;
        }
    }

    for directive in &request.directives {
        planner.add_directive(directive).await?;
    }

    let mut entries = planner.entries;
    if request.emulate_jar {
        entries.sort_by(|a, b| {
            (jar_priority(a.name()), a.name()).cmp(&(jar_priority(b.name()), b.name()))
        });
    }
    Ok(entries)
}

fn jar_priority(name: &str) -> u8 {
    match name {
        META_INF => 0,
        MANIFEST_ENTRY => 1,
        _ if name.starts_with(META_INF) => 2,
        _ => 3,
    }
}

struct Planner<'a> {
    request: &'a PackagingRequest,
    entries: Vec<PlannedEntry>,
    /// Entry name to the source it was taken from.
    sources: HashMap<String, String>,
    dirs: HashSet<String>,
}

impl<'a> Planner<'a> {
    fn new(request: &'a PackagingRequest) -> Self {
        Self {
            request,
            entries: Vec::new(),
            sources: HashMap::new(),
            dirs: HashSet::new(),
        }
    }

    fn wants_dir_entries(&self) -> bool {
        self.request.add_directory_entries || self.request.emulate_jar
    }

    async fn add_directive(&mut self, directive: &Directive) -> Result<()> {
        match &directive.source {
            Source::File(_) | Source::List { .. } => {
                for source in directive.source_files() {
                    if source.is_empty() {
                        continue;
                    }
                    self.add_source(directive, source).await?;
                }
            }
            Source::Dir(dir) => {
                for source in walk_files(dir).await? {
                    let name = entry_name(&directive.root, &directive.zip_prefix, &source)?;
                    self.add_file(name, source)?;
                }
            }
        }
        Ok(())
    }

    async fn add_source(&mut self, directive: &Directive, source: &str) -> Result<()> {
        let metadata = fs::metadata(source)
            .await
            .with_context(|| format!("failed to stat {source}"))?;
        let name = entry_name(&directive.root, &directive.zip_prefix, source)?;

        if metadata.is_dir() {
            if self.wants_dir_entries() {
                self.add_parent_dirs(&name);
                self.add_dir_entry(format!("{name}/"));
            }
            return Ok(());
        }
        self.add_file(name, source.to_owned())
    }

    fn add_file(&mut self, name: String, source: String) -> Result<()> {
        if let Some(existing) = self.sources.get(&name) {
            if *existing == source {
                return Ok(());
            }
            bail!(
                "found two file paths to be copied into dest path {name:?}: {existing:?} and {source:?}"
            );
        }

        if self.wants_dir_entries() {
            self.add_parent_dirs(&name);
        }

        let level = self.request.compression_level;
        let non_deflate = &self.request.non_deflate;
        let method = if level == 0 || non_deflate.contains(&source) || non_deflate.contains(&name) {
            Method::Store
        } else {
            Method::Deflate
        };

        self.sources.insert(name.clone(), source.clone());
        self.entries.push(PlannedEntry::File {
            name,
            source,
            method,
        });
        Ok(())
    }

    fn add_parent_dirs(&mut self, name: &str) {
        let mut end = 0;
        while let Some(offset) = name[end..].find('/') {
            end += offset + 1;
            self.add_dir_entry(name[..end].to_owned());
        }
    }

    fn add_dir_entry(&mut self, name: String) {
        if self.dirs.insert(name.clone()) {
            self.entries.push(PlannedEntry::Dir { name });
        }
    }
}

/// Every non-directory path below `dir`, in file-name order.
async fn walk_files(dir: &str) -> Result<Vec<String>> {
    let root = PathBuf::from(dir);
    tokio::task::spawn_blocking(move || {
        let mut files = Vec::new();
        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("failed to read directory {}", root.display()))?;
            if !entry.file_type().is_dir() {
                files.push(entry.path().to_string_lossy().into_owned());
            }
        }
        Ok::<_, anyhow::Error>(files)
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::{NonDeflateSet, OrderedFlag, ParseContext};
    use std::path::Path;

    fn request(flags: Vec<OrderedFlag>) -> PackagingRequest {
        let (directives, non_deflate) = ParseContext::fold(flags).unwrap().into_parts();
        PackagingRequest {
            directives,
            non_deflate,
            output: Some(PathBuf::from("out.zip")),
            compression_level: 5,
            parallelism: 1,
            manifest: None,
            emulate_jar: false,
            add_directory_entries: false,
            write_if_changed: false,
            cpu_profile: None,
            trace: None,
        }
    }

    fn tree(root: &Path, files: &[&str]) {
        for file in files {
            let path = root.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, file.as_bytes()).unwrap();
        }
    }

    fn names(entries: &[PlannedEntry]) -> Vec<&str> {
        entries.iter().map(PlannedEntry::name).collect()
    }

    fn s(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn explicit_files_and_globs_keep_directive_order() {
        let tmp = tempfile::tempdir().unwrap();
        tree(tmp.path(), &["foo/bar.txt", "foo/sub/b", "foo/sub/a", "foo/sub/deep/c"]);
        let root = s(&tmp.path().join("foo"));

        let req = request(vec![
            OrderedFlag::StripPrefix(root.clone()),
            OrderedFlag::File(format!("{root}/bar.txt")),
            OrderedFlag::Dir(format!("{root}/sub")),
            OrderedFlag::NonDeflate(format!("{root}/bar.txt")),
        ]);
        let entries = plan(&req).await.unwrap();

        assert_eq!(names(&entries), ["bar.txt", "sub/a", "sub/b", "sub/deep/c"]);
        assert!(matches!(entries[0], PlannedEntry::File { method: Method::Store, .. }));
        assert!(matches!(entries[1], PlannedEntry::File { method: Method::Deflate, .. }));
    }

    #[tokio::test]
    async fn list_file_blank_lines_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        tree(tmp.path(), &["a/x", "a/y"]);
        let list = tmp.path().join("files.list");
        std::fs::write(&list, format!("{0}/a/x\n\n{0}/a/y\n", s(tmp.path()))).unwrap();

        let req = request(vec![
            OrderedFlag::JunkPaths(true),
            OrderedFlag::ZipPrefix("lib".into()),
            OrderedFlag::ListFile(s(&list)),
        ]);
        let entries = plan(&req).await.unwrap();
        assert_eq!(names(&entries), ["lib/x", "lib/y"]);
    }

    #[tokio::test]
    async fn directory_entries_precede_their_contents() {
        let tmp = tempfile::tempdir().unwrap();
        tree(tmp.path(), &["r/a/b/c.txt"]);
        let root = s(&tmp.path().join("r"));

        let mut req = request(vec![
            OrderedFlag::StripPrefix(root.clone()),
            OrderedFlag::File(format!("{root}/a/b/c.txt")),
        ]);
        req.add_directory_entries = true;
        let entries = plan(&req).await.unwrap();
        assert_eq!(names(&entries), ["a/", "a/b/", "a/b/c.txt"]);
    }

    #[tokio::test]
    async fn same_source_twice_is_collapsed() {
        let tmp = tempfile::tempdir().unwrap();
        tree(tmp.path(), &["x"]);
        let x = s(&tmp.path().join("x"));

        let req = request(vec![
            OrderedFlag::JunkPaths(true),
            OrderedFlag::File(x.clone()),
            OrderedFlag::File(x),
        ]);
        assert_eq!(plan(&req).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clashing_sources_fail() {
        let tmp = tempfile::tempdir().unwrap();
        tree(tmp.path(), &["a/x", "b/x"]);

        let req = request(vec![
            OrderedFlag::JunkPaths(true),
            OrderedFlag::File(s(&tmp.path().join("a/x"))),
            OrderedFlag::File(s(&tmp.path().join("b/x"))),
        ]);
        let err = plan(&req).await.unwrap_err();
        assert!(err.to_string().contains("found two file paths"));
    }

    #[tokio::test]
    async fn missing_source_fails() {
        let req = request(vec![
            OrderedFlag::JunkPaths(true),
            OrderedFlag::File("/nonexistent/packzip/x".into()),
        ]);
        assert!(plan(&req).await.is_err());
    }

    #[tokio::test]
    async fn output_is_required() {
        let mut req = request(Vec::new());
        req.output = None;
        let err = plan(&req).await.unwrap_err();
        assert_eq!(err.to_string(), "output file path must be nonempty");
    }

    #[tokio::test]
    async fn manifest_requires_jar() {
        let mut req = request(Vec::new());
        req.manifest = Some(PathBuf::from("MANIFEST.MF"));
        assert!(plan(&req).await.is_err());
    }

    #[tokio::test]
    async fn jar_entries_are_sorted_with_manifest_first() {
        let tmp = tempfile::tempdir().unwrap();
        tree(tmp.path(), &["c/z.class", "c/META-INF/services/x", "c/a.class"]);
        let root = s(&tmp.path().join("c"));

        let mut req = request(vec![
            OrderedFlag::StripPrefix(root.clone()),
            OrderedFlag::Dir(root),
        ]);
        req.emulate_jar = true;
        req.manifest = Some(tmp.path().join("MANIFEST.MF"));
        let entries = plan(&req).await.unwrap();

        assert_eq!(
            names(&entries),
            [
                "META-INF/",
                "META-INF/MANIFEST.MF",
                "META-INF/services/",
                "META-INF/services/x",
                "a.class",
                "z.class",
            ]
        );
    }

    #[tokio::test]
    async fn level_zero_stores_everything() {
        let tmp = tempfile::tempdir().unwrap();
        tree(tmp.path(), &["x"]);

        let mut req = request(vec![
            OrderedFlag::JunkPaths(true),
            OrderedFlag::File(s(&tmp.path().join("x"))),
        ]);
        req.compression_level = 0;
        req.non_deflate = NonDeflateSet::new();
        let entries = plan(&req).await.unwrap();
        assert!(matches!(entries[0], PlannedEntry::File { method: Method::Store, .. }));
    }

    #[tokio::test]
    async fn missing_glob_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = s(&tmp.path().join("gone"));

        let req = request(vec![OrderedFlag::JunkPaths(true), OrderedFlag::Dir(missing)]);
        let err = plan(&req).await.unwrap_err();
        assert!(err.to_string().starts_with("failed to read directory"));
    }

    #[tokio::test]
    async fn jar_emits_entries_for_explicit_directories() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("r/res/raw")).unwrap();
        let root = s(&tmp.path().join("r"));

        let mut req = request(vec![
            OrderedFlag::StripPrefix(root.clone()),
            OrderedFlag::File(format!("{root}/res/raw")),
        ]);
        req.emulate_jar = true;
        let entries = plan(&req).await.unwrap();
        assert_eq!(names(&entries), ["META-INF/", "res/", "res/raw/"]);
    }

    #[tokio::test]
    async fn plan_lines_are_tab_separated() {
        let entries = vec![
            PlannedEntry::Dir { name: "a/".into() },
            PlannedEntry::File {
                name: "a/b".into(),
                source: "src/a/b".into(),
                method: Method::Deflate,
            },
        ];
        let mut out = Vec::new();
        write_plan(&entries, &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "dir\ta/\ndeflate\ta/b\tsrc/a/b\n");
    }
}
