use std::path::{Path, PathBuf};

use crate::config::{LoaderConfig, CHECKPOINT_DIR, ENV_OVERRIDE, MARKER_DIR};

/// Find the nearest directory named `marker`, starting with `start` itself.
///
/// Only path components are inspected; nothing is read from disk.
pub fn find_marker_ancestor(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.file_name().is_some_and(|name| name == marker))
        .map(Path::to_path_buf)
}

/// Which lookup rule produced a checkpoint directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathSource {
    Explicit,
    EnvOverride,
    MarkerAncestor,
    WorkingDir,
}

impl PathSource {
    pub fn label(&self) -> &'static str {
        match self {
            PathSource::Explicit => "explicit path",
            PathSource::EnvOverride => ENV_OVERRIDE,
            PathSource::MarkerAncestor => "third_party ancestor",
            PathSource::WorkingDir => "working directory",
        }
    }
}

/// Default checkpoint directory when the caller names none.
///
/// Priority: the configured override, then `<third_party>/bert-base-uncased`
/// for the nearest `third_party` ancestor of the search start, then
/// `<working dir>/third_party/bert-base-uncased`. The result is not checked
/// for existence.
pub fn resolve_default_path(config: &LoaderConfig) -> PathBuf {
    resolve_default(config).0
}

fn resolve_default(config: &LoaderConfig) -> (PathBuf, PathSource) {
    if let Some(path) = config.override_path() {
        tracing::debug!("Using checkpoint override: {:?}", path);
        return (path.to_path_buf(), PathSource::EnvOverride);
    }

    if let Some(marker) = find_marker_ancestor(config.search_start(), MARKER_DIR) {
        tracing::debug!("Found {} ancestor: {:?}", MARKER_DIR, marker);
        return (marker.join(CHECKPOINT_DIR), PathSource::MarkerAncestor);
    }

    let fallback = config.working_dir().join(MARKER_DIR).join(CHECKPOINT_DIR);
    tracing::debug!("No {} ancestor, falling back to {:?}", MARKER_DIR, fallback);
    (fallback, PathSource::WorkingDir)
}

/// Directory a load call should use, and the rule that chose it.
pub fn resolve_with_source(
    explicit: Option<&Path>,
    config: &LoaderConfig,
) -> (PathBuf, PathSource) {
    match explicit {
        Some(path) if !path.as_os_str().is_empty() => (path.to_path_buf(), PathSource::Explicit),
        _ => resolve_default(config),
    }
}

/// Directory a load call should use: a non-empty explicit path, else the default.
pub fn effective_path(explicit: Option<&Path>, config: &LoaderConfig) -> PathBuf {
    resolve_with_source(explicit, config).0
}
