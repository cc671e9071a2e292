//! Filesystem-based resource resolver for native platforms.
//!
//! Bundled `:/name` resources are served from an optional resource
//! directory and `~/` expands to an optional home directory. A resolver
//! can also be confined to a directory tree, in which case anything that
//! canonicalizes outside of it is reported as missing.

use log::debug;
use std::path::{Path, PathBuf};
use vista_traits::{RESOURCE_PREFIX, ResourceError, ResourceResolver, resolve_against};

#[derive(Debug, Default)]
pub struct FilesystemResourceResolver {
    home: Option<PathBuf>,
    resource_root: Option<PathBuf>,
    /// Canonicalized confinement root
    confined_to: Option<PathBuf>,
}

impl FilesystemResourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory substituted for a leading `~/`.
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Directory that backs `:/name` resources.
    pub fn with_resource_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.resource_root = Some(root.into());
        self
    }

    /// Rejects every path that does not canonicalize inside `root`.
    ///
    /// If `root` cannot be canonicalized (it does not exist) no confinement
    /// is applied.
    pub fn confined_to(mut self, root: impl AsRef<Path>) -> Self {
        self.confined_to = root.as_ref().canonicalize().ok();
        self
    }

    /// Maps a resolved path onto a real filesystem location.
    ///
    /// Returns `None` for bundled resources without a resource root and for
    /// paths escaping the confinement root.
    fn physical_path(&self, path: &Path) -> Option<PathBuf> {
        let physical = match path.to_str().and_then(|s| s.strip_prefix(RESOURCE_PREFIX)) {
            Some(rest) => self.resource_root.as_ref()?.join(rest),
            None => path.to_path_buf(),
        };

        if let Some(ref base) = self.confined_to {
            if let Ok(canonical) = physical.canonicalize() {
                if !canonical.starts_with(base) {
                    debug!("Path '{}' escapes '{}'", canonical.display(), base.display());
                    return None;
                }
                return Some(canonical);
            }
        }

        Some(physical)
    }
}

impl ResourceResolver for FilesystemResourceResolver {
    fn resolve(&self, path: &str, relative_to: &Path) -> PathBuf {
        resolve_against(path, relative_to, self.home.as_deref())
    }

    fn exists(&self, path: &Path) -> bool {
        self.physical_path(path).map(|p| p.exists()).unwrap_or(false)
    }

    fn read_to_string(&self, path: &Path) -> Result<String, ResourceError> {
        let display = path.display().to_string();
        let physical = self
            .physical_path(path)
            .ok_or_else(|| ResourceError::NotFound(display.clone()))?;

        std::fs::read_to_string(&physical).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(display)
            } else {
                ResourceError::LoadFailed {
                    path: display,
                    message: e.to_string(),
                }
            }
        })
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceResolver"
    }
}
