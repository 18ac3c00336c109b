use std::path::{Path, PathBuf};

/// Environment variable that relocates the checkpoint directory.
pub const ENV_OVERRIDE: &str = "BERT_BASE_UNCASED_PATH";

/// Ancestor directory name the resolver walks up looking for.
pub const MARKER_DIR: &str = "third_party";

/// Directory name of the checkpoint below the marker.
pub const CHECKPOINT_DIR: &str = "bert-base-uncased";

/// Inputs the path resolver works from.
///
/// Everything the resolver would otherwise read from the process (the
/// environment override, its own location, the working directory) lives
/// here, so callers and tests can supply values directly.
///
/// # Example
///
/// ```rust
/// use bert_local::LoaderConfig;
///
/// let config = LoaderConfig::new("/srv/app/src", "/srv/app")
///     .with_override(Some("/models/bert"));
/// assert_eq!(
///     config.override_path().map(|p| p.to_str().unwrap()),
///     Some("/models/bert")
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoaderConfig {
    override_path: Option<PathBuf>,
    search_start: PathBuf,
    working_dir: PathBuf,
}

impl LoaderConfig {
    /// Create a config with no override.
    ///
    /// * `search_start` - Directory the marker walk begins from
    /// * `working_dir` - Base for the last-resort fallback
    pub fn new<S: Into<PathBuf>, W: Into<PathBuf>>(search_start: S, working_dir: W) -> Self {
        Self {
            override_path: None,
            search_start: search_start.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Build a config from the running process.
    ///
    /// Reads `BERT_BASE_UNCASED_PATH` once, starts the marker walk at this
    /// crate's manifest directory and uses the current directory as the
    /// fallback base. An unreadable current directory degrades to `.`.
    pub fn from_env() -> Self {
        let working_dir = std::env::current_dir().unwrap_or_else(|e| {
            tracing::warn!("Cannot read current directory, using '.': {}", e);
            PathBuf::from(".")
        });

        Self::new(env!("CARGO_MANIFEST_DIR"), working_dir)
            .with_override(std::env::var_os(ENV_OVERRIDE).map(PathBuf::from))
    }

    /// Set the override path. An empty value counts as unset.
    pub fn with_override<P: Into<PathBuf>>(mut self, path: Option<P>) -> Self {
        self.override_path = path
            .map(Into::into)
            .filter(|p: &PathBuf| !p.as_os_str().is_empty());
        self
    }

    pub fn with_search_start<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.search_start = dir.into();
        self
    }

    pub fn with_working_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn override_path(&self) -> Option<&Path> {
        self.override_path.as_deref()
    }

    pub fn search_start(&self) -> &Path {
        &self.search_start
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}
