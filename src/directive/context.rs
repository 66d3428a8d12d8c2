/// Root context applied to the file-adding flags that follow it.
///
/// At most one of `strip_prefix` and `junk_paths` is set: each setter clears
/// the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootContext {
    strip_prefix: String,
    junk_paths: bool,
}

impl RootContext {
    /// `-C <path>`
    pub fn set_strip_prefix(&mut self, path: impl Into<String>) {
        self.strip_prefix = path.into();
        self.junk_paths = false;
    }

    /// `-j[=bool]`
    pub fn set_junk_paths(&mut self, junk: bool) {
        self.junk_paths = junk;
        self.strip_prefix.clear();
    }

    pub fn strip_prefix(&self) -> &str {
        &self.strip_prefix
    }

    pub fn junk_paths(&self) -> bool {
        self.junk_paths
    }

    /// Whether a file-adding flag may be accepted under this context.
    pub fn is_set(&self) -> bool {
        !self.strip_prefix.is_empty() || self.junk_paths
    }
}
