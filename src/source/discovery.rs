//! Locate specification documents under a workspace.

use crate::error::SyncError;
use globset::GlobBuilder;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One specification document and the service it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub service: String,
}

/// Find files under `root` whose root-relative path matches `pattern`.
///
/// `*` stops at path separators; only `**` crosses directories. Results are
/// sorted by path so fragments are appended in a stable order.
pub fn discover_sources(root: &Path, pattern: &str) -> Result<Vec<SourceDocument>, SyncError> {
    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()?
        .compile_matcher();

    let mut sources = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| {
            SyncError::ConfigError(format!("Failed to walk {}: {}", root.display(), e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = match entry.path().strip_prefix(root) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        if matcher.is_match(relative) {
            sources.push(SourceDocument {
                service: service_name(relative),
                path: entry.path().to_path_buf(),
            });
        }
    }

    sources.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(sources)
}

/// `services/<service>/designtime/<file>` names its service two levels up.
/// Files too shallow for that use their stem.
pub fn service_name(path: &Path) -> String {
    path.parent()
        .and_then(Path::parent)
        .and_then(Path::file_name)
        .or_else(|| path.file_stem())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
