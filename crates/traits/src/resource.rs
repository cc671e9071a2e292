//! ResourceResolver trait for abstracting theme file access.
//!
//! The theme engine never touches the filesystem directly. It asks a
//! resolver to turn logical paths into concrete ones, to test existence,
//! and to read documents.

use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Prefix for paths that live in the application's bundled resources.
pub const RESOURCE_PREFIX: &str = ":/";

/// Error type for resource access.
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// A trait for locating and reading theme documents and assets.
///
/// # Implementations
///
/// - `FilesystemResourceResolver` (in `vista-resource`): native filesystem
/// - `InMemoryResourceResolver`: pre-populated documents, used by tests
pub trait ResourceResolver: Send + Sync + Debug {
    /// Resolves `path` against the directory `relative_to`.
    ///
    /// `./` and bare relative paths are joined onto `relative_to`;
    /// absolute paths and bundled `:/` resources are returned as given.
    /// The result is lexically normalized. Existence is not checked.
    fn resolve(&self, path: &str, relative_to: &Path) -> PathBuf {
        resolve_against(path, relative_to, None)
    }

    /// `true` if a document or asset exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Reads the document at `path` as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> Result<String, ResourceError>;

    /// Returns a human-readable name for this resolver (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Shared resolution rules. `home` replaces a leading `~/` when provided.
pub fn resolve_against(path: &str, relative_to: &Path, home: Option<&Path>) -> PathBuf {
    if path.is_empty() {
        return PathBuf::new();
    }
    if path == "." {
        return normalize_lexically(relative_to);
    }
    if path.starts_with(RESOURCE_PREFIX) {
        return PathBuf::from(path);
    }
    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home {
            return normalize_lexically(&home.join(rest));
        }
    }

    let candidate = Path::new(path);
    if candidate.is_absolute() {
        normalize_lexically(candidate)
    } else {
        normalize_lexically(&relative_to.join(candidate))
    }
}

/// Removes `.` components and folds `..` into its parent without touching
/// the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                ) && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// An in-memory resolver.
///
/// Documents must be added before use. Paths are normalized on insert and
/// on lookup so `/themes/./a.xml` and `/themes/a.xml` are the same entry.
#[derive(Debug, Default)]
pub struct InMemoryResourceResolver {
    documents: RwLock<HashMap<PathBuf, String>>,
}

impl InMemoryResourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document to the in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, path: impl AsRef<Path>, content: impl Into<String>) -> Result<(), ResourceError> {
        let key = normalize_lexically(path.as_ref());
        let mut documents = self.documents.write().map_err(|_| ResourceError::LoadFailed {
            path: key.display().to_string(),
            message: "resource store lock poisoned".to_string(),
        })?;
        documents.insert(key, content.into());
        Ok(())
    }

    /// Builder-style variant of [`add`](Self::add) for test fixtures.
    pub fn with(self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        if let Ok(mut documents) = self.documents.write() {
            documents.insert(normalize_lexically(path.as_ref()), content.into());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceResolver for InMemoryResourceResolver {
    fn exists(&self, path: &Path) -> bool {
        let key = normalize_lexically(path);
        self.documents
            .read()
            .map(|documents| documents.contains_key(&key))
            .unwrap_or(false)
    }

    fn read_to_string(&self, path: &Path) -> Result<String, ResourceError> {
        let key = normalize_lexically(path);
        let documents = self.documents.read().map_err(|_| ResourceError::LoadFailed {
            path: key.display().to_string(),
            message: "resource store lock poisoned".to_string(),
        })?;
        documents
            .get(&key)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(key.display().to_string()))
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceResolver"
    }
}
