// src/engine.rs
use crate::error::EngineError;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use vista_theme::{DocumentSource, MenuTheme, OverlayOptions, ThemeContext, ThemeModel, ThemeParser};
use vista_traits::ResourceResolver;

/// Owns the published theme model for one front end.
///
/// Readers take an `Arc<ThemeModel>` snapshot and keep it as long as they
/// like. Reloading resolves a new model without holding any lock and then
/// swaps it in; a failed reload leaves the published model in place.
#[derive(Debug)]
pub struct ThemeEngine {
    source: DocumentSource,
    resolver: Arc<dyn ResourceResolver>,
    context: RwLock<ThemeContext>,
    model: RwLock<Arc<ThemeModel>>,
    /// Derived from `model`; cleared on every swap.
    menu: Mutex<Option<Arc<MenuTheme>>>,
}

impl ThemeEngine {
    pub(crate) fn new(
        source: DocumentSource,
        resolver: Arc<dyn ResourceResolver>,
        context: ThemeContext,
    ) -> Result<Self, EngineError> {
        let model = ThemeParser::new(resolver.as_ref(), &context).parse(&source)?;
        info!("Theme loaded with {} views", model.views.len());

        Ok(Self {
            source,
            resolver,
            context: RwLock::new(context),
            model: RwLock::new(Arc::new(model)),
            menu: Mutex::new(None),
        })
    }

    /// The currently published model.
    pub fn model(&self) -> Arc<ThemeModel> {
        Arc::clone(&self.model.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn context(&self) -> ThemeContext {
        self.context.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn resolver(&self) -> &dyn ResourceResolver {
        self.resolver.as_ref()
    }

    /// Resolves the theme again with the current context.
    pub fn reload(&self) -> Result<Arc<ThemeModel>, EngineError> {
        let context = self.context();
        let model = self.resolve(&context)?;
        Ok(self.publish(model))
    }

    /// Resolves the theme for `context` and makes it the current context if
    /// the pass succeeds.
    pub fn reload_with(&self, context: ThemeContext) -> Result<Arc<ThemeModel>, EngineError> {
        let model = self.resolve(&context)?;
        *self.context.write().unwrap_or_else(PoisonError::into_inner) = context;
        Ok(self.publish(model))
    }

    /// Applies a theme file (for instance a per-game one) on top of the
    /// current model and publishes the result.
    pub fn apply_overlay(&self, path: &Path, options: OverlayOptions) -> Result<Arc<ThemeModel>, EngineError> {
        let base = self.model();
        let context = self.context();
        let model = ThemeParser::new(self.resolver.as_ref(), &context)
            .overlay(&base, path, options)
            .inspect_err(|e| warn!("Overlay '{}' not applied: {}", path.display(), e))?;
        Ok(self.publish(model))
    }

    /// Menu settings of the current model, computed on first use.
    pub fn menu_theme(&self) -> Arc<MenuTheme> {
        let model = self.model();
        let mut cache = self.menu.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(menu) = cache.as_ref() {
            return Arc::clone(menu);
        }
        debug!("Computing menu theme");
        let menu = Arc::new(MenuTheme::from_model(&model, self.resolver.as_ref()));
        *cache = Some(Arc::clone(&menu));
        menu
    }

    fn resolve(&self, context: &ThemeContext) -> Result<ThemeModel, EngineError> {
        ThemeParser::new(self.resolver.as_ref(), context)
            .parse(&self.source)
            .map_err(|e| {
                warn!("Theme reload failed, keeping the previous theme: {}", e);
                EngineError::from(e)
            })
    }

    fn publish(&self, model: ThemeModel) -> Arc<ThemeModel> {
        let model = Arc::new(model);
        // Hold the menu lock across the swap so no reader caches a menu
        // computed from the old model after it was cleared.
        let mut menu = self.menu.lock().unwrap_or_else(PoisonError::into_inner);
        *self.model.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&model);
        *menu = None;
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineBuilder;
    use vista_theme::VariantOverrides;
    use vista_traits::InMemoryResourceResolver;
    use vista_types::Color;

    const THEME: &str = r#"<theme><formatVersion>7</formatVersion>
        <subset name="colorset">
            <include name="dark">./dark.xml</include>
            <include name="light">./light.xml</include>
        </subset>
        <view name="basic"><text name="title"><color>${main}</color></text></view>
        <view name="menu"><menuText name="menutext"><fontSize>0.05</fontSize></menuText></view>
    </theme>"#;

    fn resolver() -> Arc<InMemoryResourceResolver> {
        let _ = env_logger::builder().is_test(true).try_init();
        Arc::new(
            InMemoryResourceResolver::new()
                .with("/t/theme.xml", THEME)
                .with("/t/dark.xml", "<theme><variables><main>000000</main></variables></theme>")
                .with("/t/light.xml", "<theme><variables><main>FFFFFF</main></variables></theme>"),
        )
    }

    fn engine(resolver: Arc<InMemoryResourceResolver>) -> ThemeEngine {
        EngineBuilder::new()
            .with_theme_file("/t/theme.xml")
            .with_resolver(resolver)
            .with_context(ThemeContext::new("snes"))
            .build()
            .unwrap()
    }

    fn title_color(model: &ThemeModel) -> Option<Color> {
        model.get_element("basic", "title", "text").and_then(|e| e.color("color"))
    }

    #[test]
    fn build_without_theme_is_a_config_error() {
        assert!(matches!(EngineBuilder::new().build(), Err(EngineError::Config(_))));
    }

    #[test]
    fn reload_with_new_overrides_swaps_model() {
        let engine = engine(resolver());
        let before = engine.model();
        assert_eq!(title_color(&before), Some(Color(0x000000FF)));

        let context = ThemeContext::new("snes").with_overrides(VariantOverrides::new().with_global("colorset", "light"));
        engine.reload_with(context).unwrap();

        assert_eq!(title_color(&engine.model()), Some(Color(0xFFFFFFFF)));
        // Earlier snapshots are unaffected.
        assert_eq!(title_color(&before), Some(Color(0x000000FF)));
        assert_eq!(engine.context().overrides.colorset.as_deref(), Some("light"));
    }

    #[test]
    fn failed_reload_keeps_published_model() {
        let resolver = resolver();
        let engine = engine(Arc::clone(&resolver));
        let before = engine.model();

        resolver.add("/t/theme.xml", "<theme><view name=\"basic\"/></theme>").unwrap();
        assert!(engine.reload().is_err());
        assert!(Arc::ptr_eq(&before, &engine.model()));
    }

    #[test]
    fn menu_theme_is_cached_until_swap() {
        let engine = engine(resolver());
        let first = engine.menu_theme();
        assert_eq!(first.text.font_size, Some(0.05));
        assert!(Arc::ptr_eq(&first, &engine.menu_theme()));

        engine.reload().unwrap();
        assert!(!Arc::ptr_eq(&first, &engine.menu_theme()));
    }
}
