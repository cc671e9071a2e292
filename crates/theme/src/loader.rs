//! Document loading and the per-pass source stack.

use log::debug;
use std::path::{Path, PathBuf};
use vista_traits::{ResourceError, ResourceResolver};
use vista_types::parse_float_prefix;

use crate::error::LoadError;
use crate::xml::XmlNode;

pub const MINIMUM_FORMAT_VERSION: f32 = 3.0;
pub const CURRENT_FORMAT_VERSION: f32 = 6.0;

pub const ROOT_TAG: &str = "theme";

/// Where a root document comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSource {
    File(PathBuf),
    Inline(String),
}

impl DocumentSource {
    /// Path recorded on the source stack. Inline documents have no location,
    /// so relative references inside them resolve against the working
    /// directory.
    pub fn path(&self) -> PathBuf {
        match self {
            DocumentSource::File(path) => path.clone(),
            DocumentSource::Inline(_) => PathBuf::new(),
        }
    }
}

/// A parsed and validated theme document.
#[derive(Debug, Clone)]
pub struct ThemeDocument {
    pub root: XmlNode,
    pub format_version: f32,
}

/// Loads a root document and validates its format version.
pub fn load(source: &DocumentSource, resolver: &dyn ResourceResolver) -> Result<ThemeDocument, LoadError> {
    let root = match source {
        DocumentSource::File(path) => load_fragment(path, resolver)?,
        DocumentSource::Inline(text) => parse_theme(text)?,
    };

    let format_version = root
        .child("formatVersion")
        .map(|v| parse_float_prefix(v.text()))
        .ok_or(LoadError::MissingVersion)?;

    if format_version < MINIMUM_FORMAT_VERSION {
        return Err(LoadError::VersionTooOld { found: format_version });
    }

    Ok(ThemeDocument { root, format_version })
}

/// Loads a document that only needs a `<theme>` root (includes, overlays).
pub fn load_fragment(path: &Path, resolver: &dyn ResourceResolver) -> Result<XmlNode, LoadError> {
    let text = resolver.read_to_string(path).map_err(|e| match e {
        ResourceError::NotFound(_) => LoadError::NotFound(path.display().to_string()),
        other => LoadError::Resource(other),
    })?;
    debug!("Read {} bytes from '{}'", text.len(), path.display());
    parse_theme(&text)
}

fn parse_theme(text: &str) -> Result<XmlNode, LoadError> {
    let root = XmlNode::parse(text).map_err(|e| LoadError::Parse(e.to_string()))?;
    if root.tag != ROOT_TAG {
        return Err(LoadError::MissingRootTag);
    }
    Ok(root)
}

/// Ordered stack of the documents being processed, innermost last.
#[derive(Debug, Clone, Default)]
pub struct SourceStack {
    paths: Vec<PathBuf>,
}

impl SourceStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn pop(&mut self) -> Option<PathBuf> {
        self.paths.pop()
    }

    pub fn depth(&self) -> usize {
        self.paths.len()
    }

    /// Directory of the innermost document.
    pub fn current_dir(&self) -> PathBuf {
        self.paths.last().map(|p| parent_dir(p)).unwrap_or_default()
    }

    /// Directory of the root document.
    pub fn root_dir(&self) -> PathBuf {
        self.paths.first().map(|p| parent_dir(p)).unwrap_or_default()
    }

    /// Paths as display strings, root first.
    pub fn files(&self) -> Vec<String> {
        self.paths.iter().map(|p| p.display().to_string()).collect()
    }
}

pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
