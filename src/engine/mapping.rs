//! Source path to archive entry name mapping.

use anyhow::{Result, anyhow};

use crate::directive::RootContext;

/// A path split into its cleaned components.
#[derive(Debug, PartialEq, Eq)]
struct Cleaned<'a> {
    absolute: bool,
    parts: Vec<&'a str>,
}

fn clean(path: &str) -> Cleaned<'_> {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split(['/', std::path::MAIN_SEPARATOR]) {
        match part {
            "" | "." => {}
            ".." if parts.last().is_some_and(|last| *last != "..") => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }
    Cleaned {
        absolute: path.starts_with('/'),
        parts,
    }
}

/// Last component of `path`, if it has one.
pub fn base_name(path: &str) -> Option<&str> {
    clean(path).parts.last().copied().filter(|name| *name != "..")
}

/// `path` relative to `root`, or `None` when it does not lie below it.
pub fn relative_to(root: &str, path: &str) -> Option<String> {
    let root = clean(root);
    let path = clean(path);

    if root.absolute != path.absolute || root.parts.contains(&"..") {
        return None;
    }

    let rest = path.parts.strip_prefix(root.parts.as_slice())?;
    if rest.is_empty() || rest.contains(&"..") {
        return None;
    }
    Some(rest.join("/"))
}

/// Join a zip prefix and a relative entry name with `/`.
pub fn join_zip_path(prefix: &str, name: &str) -> String {
    clean(prefix)
        .parts
        .into_iter()
        .chain(clean(name).parts)
        .collect::<Vec<_>>()
        .join("/")
}

/// Archive entry name for `source` under `root` and `zip_prefix`.
pub fn entry_name(root: &RootContext, zip_prefix: &str, source: &str) -> Result<String> {
    let relative = if root.junk_paths() {
        base_name(source)
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("source path {source:?} has no file name"))?
    } else {
        relative_to(root.strip_prefix(), source).ok_or_else(|| {
            anyhow!(
                "source path {source:?} is not under relative root {:?}",
                root.strip_prefix()
            )
        })?
    };
    Ok(join_zip_path(zip_prefix, &relative))
}
