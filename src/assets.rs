//! Case-insensitive static asset resolution.
//!
//! The bundled web client ships files with mixed-case names while browsers
//! request whatever case appears in the markup, so lookups must ignore case.
//! Instead of walking the tree per request, the whole tree is indexed once at
//! startup under lowercased relative paths.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;
use walkdir::WalkDir;

/// Lowercase request path to on-disk file path.
pub struct AssetIndex {
    index: HashMap<String, PathBuf>,
}

impl AssetIndex {
    /// Indexes every file under `root`. Fails if the directory cannot be
    /// walked.
    pub fn build(root: &Path) -> anyhow::Result<Self> {
        let mut index = HashMap::new();
        for entry in WalkDir::new(root) {
            let entry =
                entry.with_context(|| format!("walking asset directory {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(root)
                .with_context(|| format!("asset outside root: {}", entry.path().display()))?;
            let key = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_ascii_lowercase())
                .collect::<Vec<_>>()
                .join("/");
            index.insert(key, entry.path().to_path_buf());
        }
        info!(root = %root.display(), files = index.len(), "indexed static assets");
        Ok(Self { index })
    }

    /// An index with no files. Requests all resolve to not-found.
    pub fn empty() -> Self {
        Self {
            index: HashMap::new(),
        }
    }

    /// Resolves a request path to a file, ignoring case. The path is
    /// percent-decoded first; `/` and paths ending in `/` map to
    /// `index.html` within that directory.
    pub fn resolve(&self, request_path: &str) -> Option<&Path> {
        let decoded = urlencoding::decode(request_path).ok()?;
        let mut key = decoded.trim_start_matches('/').to_ascii_lowercase();
        if key.is_empty() || key.ends_with('/') {
            key.push_str("index.html");
        }
        self.index.get(&key).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
