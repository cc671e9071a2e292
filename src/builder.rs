// src/builder.rs
use crate::engine::ThemeEngine;
use crate::error::EngineError;
use std::path::Path;
use std::sync::Arc;
use vista_resource::FilesystemResourceResolver;
use vista_theme::{DocumentSource, ThemeContext};
use vista_traits::ResourceResolver;

/// A builder for creating a [`ThemeEngine`].
///
/// The first model is resolved by [`EngineBuilder::build`], so a theme whose
/// root document cannot be loaded never produces an engine.
pub struct EngineBuilder {
    source: Option<DocumentSource>,
    resolver: Option<Arc<dyn ResourceResolver>>,
    context: ThemeContext,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            source: None,
            resolver: None,
            context: ThemeContext::default(),
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Resolves the theme rooted at `path`.
    pub fn with_theme_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source = Some(DocumentSource::File(path.as_ref().to_path_buf()));
        self
    }

    /// Resolves a root document held in memory. Relative references inside
    /// it resolve against the working directory.
    pub fn with_theme_source(mut self, xml: impl Into<String>) -> Self {
        self.source = Some(DocumentSource::Inline(xml.into()));
        self
    }

    /// Replaces the resolver. Defaults to [`FilesystemResourceResolver`].
    pub fn with_resolver(mut self, resolver: Arc<dyn ResourceResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_context(mut self, context: ThemeContext) -> Self {
        self.context = context;
        self
    }

    /// Consumes the builder and runs the first resolution pass.
    pub fn build(self) -> Result<ThemeEngine, EngineError> {
        let source = self.source.ok_or_else(|| {
            EngineError::Config("No theme has been configured. Use `with_theme_file` or `with_theme_source`.".to_string())
        })?;
        let resolver: Arc<dyn ResourceResolver> = match self.resolver {
            Some(resolver) => resolver,
            None => Arc::new(FilesystemResourceResolver::new()),
        };

        ThemeEngine::new(source, resolver, self.context)
    }
}
