use std::collections::HashSet;

use crate::error::PackError;

/// Paths to be stored without compression.
///
/// Adding a path that is already present is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonDeflateSet {
    paths: HashSet<String>,
}

impl NonDeflateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// `-s <path>`
    pub fn insert(&mut self, path: impl Into<String>) -> Result<(), PackError> {
        let path = path.into();
        if self.paths.contains(&path) {
            return Err(PackError::DuplicateNonDeflate { path });
        }
        self.paths.insert(path);
        Ok(())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_paths_are_kept() {
        let mut set = NonDeflateSet::new();
        set.insert("p").unwrap();
        set.insert("q").unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("p"));
        assert!(set.contains("q"));
    }

    #[test]
    fn reinsertion_is_rejected() {
        let mut set = NonDeflateSet::new();
        set.insert("p").unwrap();
        let err = set.insert("p").unwrap_err();
        assert!(matches!(err, PackError::DuplicateNonDeflate { ref path } if path == "p"));
        assert_eq!(set.len(), 1);
    }
}
