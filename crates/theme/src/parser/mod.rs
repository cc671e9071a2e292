//! The resolution pass: turns a root document and everything it pulls in
//! into a [`ThemeModel`].

mod elements;
mod views;

use indexmap::IndexMap;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use vista_expr::eval_str;
use vista_traits::ResourceResolver;

use crate::context::ThemeContext;
use crate::error::{LoadError, ThemeError};
use crate::filter::FilterEvaluator;
use crate::include::{SystemPlaceholders, has_system_placeholder};
use crate::loader::{CURRENT_FORMAT_VERSION, DocumentSource, load, load_fragment, parent_dir, SourceStack};
use crate::model::ThemeModel;
use crate::subset::{Variant, VariantSelector};
use crate::variables::Variables;
use crate::view::ThemeView;
use crate::xml::XmlNode;

/// Deepest include nesting followed before giving up.
pub const MAX_INCLUDE_DEPTH: usize = 64;

/// How an overlay file is applied on top of an existing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayOptions {
    /// Extras declared by the overlay are marked per-game.
    pub per_game: bool,
    /// Properties already set are replaced. When `false` only missing
    /// properties are filled in.
    pub overwrite: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            per_game: false,
            overwrite: true,
        }
    }
}

impl OverlayOptions {
    pub fn per_game() -> Self {
        Self {
            per_game: true,
            ..Self::default()
        }
    }
}

/// Entry point for resolving themes against one host context.
pub struct ThemeParser<'a> {
    resolver: &'a dyn ResourceResolver,
    context: &'a ThemeContext,
}

impl<'a> ThemeParser<'a> {
    pub fn new(resolver: &'a dyn ResourceResolver, context: &'a ThemeContext) -> Self {
        Self { resolver, context }
    }

    /// Runs a full pass over `source`.
    ///
    /// Only a failure of the root document is an error. Problems in
    /// included files, unknown elements or properties and unresolvable
    /// paths are logged and skipped.
    pub fn parse(&self, source: &DocumentSource) -> Result<ThemeModel, ThemeError> {
        let root_path = source.path();
        info!(
            "Resolving theme '{}' for system '{}' using {} resources",
            root_path.display(),
            self.context.system,
            self.resolver.name()
        );

        let mut pass = Pass::new(self.resolver, self.context);
        pass.seed_variables(&parent_dir(&root_path));

        pass.with_source(root_path.clone(), |pass| -> Result<(), ThemeError> {
            let doc = load(source, pass.resolver).map_err(|e| pass.failure(e))?;
            pass.format_version = doc.format_version;
            pass.parse_variables(&doc.root);
            pass.parse_theme(&doc.root);
            Ok(())
        })?;

        Ok(pass.finish(root_path))
    }

    /// Applies the theme file at `path` on top of `model` and returns the
    /// combined model. `model` itself is left untouched.
    pub fn overlay(&self, model: &ThemeModel, path: &Path, options: OverlayOptions) -> Result<ThemeModel, ThemeError> {
        debug!("Applying overlay '{}' (per-game: {})", path.display(), options.per_game);

        let mut pass = Pass::resume(self.resolver, self.context, model);
        pass.per_game = options.per_game;
        pass.overwrite = options.overwrite;

        pass.sources.push(model.root_path.clone());
        pass.with_source(path.to_path_buf(), |pass| -> Result<(), ThemeError> {
            let root = load_fragment(path, pass.resolver).map_err(|e| pass.failure(e))?;
            pass.parse_variables(&root);
            pass.parse_theme(&root);
            Ok(())
        })?;

        Ok(pass.finish(model.root_path.clone()))
    }
}

/// State of one resolution pass.
pub(crate) struct Pass<'a> {
    resolver: &'a dyn ResourceResolver,
    context: &'a ThemeContext,
    sources: SourceStack,
    variables: Variables,
    selector: VariantSelector,
    views: IndexMap<String, ThemeView>,
    format_version: f32,
    default_view: Option<String>,
    default_transition: Option<String>,
    system_folder: String,
    per_game: bool,
    overwrite: bool,
}

impl<'a> Pass<'a> {
    fn new(resolver: &'a dyn ResourceResolver, context: &'a ThemeContext) -> Self {
        Self {
            resolver,
            context,
            sources: SourceStack::new(),
            variables: Variables::new(),
            selector: VariantSelector::new(context.system.clone(), context.overrides.clone()),
            views: IndexMap::new(),
            format_version: 0.0,
            default_view: None,
            default_transition: None,
            system_folder: context.system.clone(),
            per_game: false,
            overwrite: true,
        }
    }

    fn resume(resolver: &'a dyn ResourceResolver, context: &'a ThemeContext, model: &ThemeModel) -> Self {
        Self {
            resolver,
            context,
            sources: SourceStack::new(),
            variables: model.variables.clone(),
            selector: VariantSelector::resume(
                context.system.clone(),
                context.overrides.clone(),
                model.variants.clone(),
                model.selections.clone(),
            ),
            views: model.views.clone(),
            format_version: model.format_version,
            default_view: model.default_view.clone(),
            default_transition: model.default_transition.clone(),
            system_folder: model.system_folder.clone(),
            per_game: false,
            overwrite: true,
        }
    }

    fn seed_variables(&mut self, root_dir: &Path) {
        let ctx = self.context;
        self.variables.set("screen.width", ctx.screen_width.to_string());
        self.variables.set("screen.height", ctx.screen_height.to_string());
        for (name, value) in &ctx.variables {
            self.variables.set(name.as_str(), value.as_str());
        }

        let dir = root_dir.display().to_string();
        self.variables.set("lang", ctx.language());
        self.variables.set("global.language", ctx.language_tag.as_str());
        self.variables.set("currentPath", dir.as_str());
        self.variables.set("themePath", dir);
        self.variables.set("region", ctx.region.as_str());

        for (name, value) in ctx.settings.iter().filter(|(name, _)| !name.contains('.')) {
            self.variables.set(format!("settings.{}", name), value.as_str());
        }
    }

    fn finish(self, root_path: PathBuf) -> ThemeModel {
        let (variants, selections) = self.selector.into_parts();
        debug!(
            "Theme resolved: {} views, {} variants, {} variables",
            self.views.len(),
            variants.len(),
            self.variables.len()
        );
        ThemeModel {
            views: self.views,
            variants,
            variables: self.variables,
            format_version: self.format_version,
            default_view: self.default_view,
            default_transition: self.default_transition,
            system_folder: self.system_folder,
            selections,
            root_path,
        }
    }

    /// Runs `f` with `path` as the innermost document.
    fn with_source<R>(&mut self, path: PathBuf, f: impl FnOnce(&mut Self) -> R) -> R {
        self.sources.push(path);
        self.sync_current_path();
        let result = f(self);
        self.sources.pop();
        if self.sources.depth() > 0 {
            self.sync_current_path();
        }
        result
    }

    fn sync_current_path(&mut self) {
        let dir = self.sources.current_dir();
        self.variables.set("currentPath", dir.display().to_string());
    }

    fn failure(&self, source: LoadError) -> ThemeError {
        ThemeError::Load {
            files: self.sources.files(),
            source,
        }
    }

    fn allows(&mut self, node: &XmlNode) -> bool {
        FilterEvaluator::new(self.context, &self.variables, &mut self.selector).allows(node)
    }

    fn expand(&self, text: &str) -> String {
        self.variables.expand(text)
    }

    /// Substitutes `$country`, `$language` and `$system` (with `system` as
    /// the folder), checking folder aliases relative to the current
    /// document.
    fn resolve_placeholders(&self, text: &str, system: &str) -> String {
        if !text.contains('$') {
            return text.to_string();
        }
        let language = self.context.language();
        let dir = self.sources.current_dir();
        let placeholders = SystemPlaceholders {
            country: &self.context.region,
            language: &language,
            system,
        };
        placeholders.resolve(text, |candidate| {
            self.resolver.exists(&self.resolver.resolve(candidate, &dir))
        })
    }

    /// Records the variant declared by `node` and decides whether it is
    /// selected. Nodes without `subset` always pass.
    fn select_subset(&mut self, node: &XmlNode) -> bool {
        let Some(group) = node.attr("subset") else {
            return true;
        };
        let group = self.expand(group);
        let value = self.expand(node.attr_or_empty("name"));
        if group.is_empty() {
            return false;
        }

        let mut variant = Variant::new(group.as_str(), value.as_str());
        let display_name = self.expand(node.attr_or_empty("displayName"));
        if !display_name.is_empty() {
            variant.display_name = display_name;
        }
        variant.group_display_name = self.expand(node.attr_or_empty("subSetDisplayName"));
        if variant.group_display_name.is_empty() {
            if let Some(by_variable) = self.variables.get(&format!("subset.{}", group)) {
                variant.group_display_name = by_variable.to_string();
            }
        }
        variant.applies_to = self
            .expand(node.attr_or_empty("appliesTo"))
            .split([',', ' '])
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        self.selector.catalog_mut().record(variant);

        if self.selector.is_selected(&group, &value) {
            self.variables.set_string(format!("subset.{}", group), value);
            true
        } else {
            false
        }
    }

    fn parse_variables(&mut self, root: &XmlNode) {
        for block in root.children_named("variables") {
            if !self.allows(block) {
                continue;
            }
            for child in &block.children {
                self.parse_variable(child);
            }
        }
    }

    fn parse_variable(&mut self, node: &XmlNode) {
        if node.tag.is_empty() || !self.allows(node) {
            return;
        }
        let key = node.tag.as_str();
        let value = node.text();

        if value == "true" || value == "false" {
            self.variables.set(key, value);
        } else if value.contains("${") || value.contains(['=', '<', '>']) {
            match eval_str(value, &self.variables) {
                Ok(result) => self.variables.set_value(key, result),
                Err(e) => {
                    debug!("Variable '{}' is not an expression ({}), expanding as text", key, e);
                    let expanded = self.expand(value);
                    self.variables.set_string(key, expanded);
                }
            }
        } else {
            let expanded = self.expand(value);
            self.variables.set_string(key, expanded);
        }
    }

    fn parse_theme(&mut self, root: &XmlNode) {
        if let Some(view) = root.attr("defaultView") {
            self.default_view = Some(view.to_string());
        }
        if let Some(transition) = root.attr("defaultTransition") {
            self.default_transition = Some(transition.to_string());
        }

        if self.format_version <= CURRENT_FORMAT_VERSION {
            // Older themes rely on includes being applied before views and
            // on features coming last, whatever the document order.
            for node in root.children_named("include") {
                self.parse_include(node);
            }
            for node in root.children_named("view") {
                self.parse_view_element(node);
            }
            for node in root.children_named("customView") {
                self.parse_custom_view(node);
            }
            for node in root.children_named("feature") {
                self.parse_feature(node);
            }
            return;
        }

        for node in &root.children {
            if !self.allows(node) {
                continue;
            }
            match node.tag.as_str() {
                "include" => self.parse_include(node),
                "view" => self.parse_view_element(node),
                "customView" => self.parse_custom_view(node),
                "subset" => self.parse_subset_element(node),
                "feature" => self.parse_feature(node),
                _ => {}
            }
        }
    }

    fn parse_include(&mut self, node: &XmlNode) {
        if !self.allows(node) || !self.select_subset(node) {
            return;
        }

        let raw = self.expand(node.text());
        if raw.is_empty() {
            return;
        }
        if self.sources.depth() >= MAX_INCLUDE_DEPTH {
            warn!("Include depth limit of {} reached, skipping \"{}\"", MAX_INCLUDE_DEPTH, raw);
            return;
        }

        let dir = self.sources.current_dir();
        let mut path = self.resolver.resolve(&self.resolve_placeholders(&raw, &self.system_folder), &dir);

        if !self.resolver.exists(&path) {
            if !has_system_placeholder(&raw) {
                warn!("Included file \"{}\" not found! (resolved to \"{}\")", raw, path.display());
                return;
            }
            path = self.resolver.resolve(&self.resolve_placeholders(&raw, "default"), &dir);
            if !self.resolver.exists(&path) {
                warn!("Included file \"{}\" not found! (resolved to \"{}\")", raw, path.display());
                return;
            }
            if self.sources.depth() == 1 {
                debug!("Falling back to the default system folder for '{}'", self.system_folder);
                self.system_folder = "default".to_string();
            }
        }

        let root = match load_fragment(&path, self.resolver) {
            Ok(root) => root,
            Err(e) => {
                warn!("{}    from included file \"{}\"", e, raw);
                return;
            }
        };

        self.with_source(path, |pass| {
            pass.parse_variables(&root);
            pass.parse_theme(&root);
        });
    }

    /// `<subset name=".." displayName=".." appliesTo="..">` stamps its
    /// includes with the subset and processes them.
    fn parse_subset_element(&mut self, node: &XmlNode) {
        if !self.allows(node) {
            return;
        }
        let name = node.attr_or_empty("name");
        let display_name = self.expand(node.attr_or_empty("displayName"));
        let applies_to = node.attr_or_empty("appliesTo");

        for include in node.children_named("include") {
            let mut include = include.clone();
            include.set_attr("subset", name);
            if !applies_to.is_empty() {
                include.set_attr("appliesTo", applies_to);
            }
            if !display_name.is_empty() {
                include.set_attr("subSetDisplayName", display_name.as_str());
            }
            self.parse_include(&include);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_traits::InMemoryResourceResolver;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn parse(resolver: &InMemoryResourceResolver, context: &ThemeContext, root: &str) -> Result<ThemeModel, ThemeError> {
        ThemeParser::new(resolver, context).parse(&DocumentSource::File(PathBuf::from(root)))
    }

    #[test]
    fn root_failure_names_the_file() {
        init_logger();
        let resolver = InMemoryResourceResolver::new().with("/t/theme.xml", "<skin/>");
        let err = parse(&resolver, &ThemeContext::default(), "/t/theme.xml").unwrap_err();
        assert!(matches!(err.load_error(), LoadError::MissingRootTag));
        assert!(err.to_string().starts_with("from theme \"/t/theme.xml\""));
    }

    #[test]
    fn variables_are_seeded_and_parsed() {
        init_logger();
        let resolver = InMemoryResourceResolver::new().with(
            "/t/theme.xml",
            r#"<theme><formatVersion>7</formatVersion>
                <variables>
                    <accent>FF0000</accent>
                    <wide>${screen.width} > 1000</wide>
                    <label>'x' + ${lang}</label>
                    <dark>true</dark>
                    <path>${themePath}/art</path>
                    <broken>${accent} = </broken>
                </variables>
            </theme>"#,
        );
        let context = ThemeContext::new("snes")
            .with_language("fr_FR")
            .with_setting("ShowClock", "true")
            .with_setting("subset.snes.colorset", "ignored");
        let model = parse(&resolver, &context, "/t/theme.xml").unwrap();

        assert_eq!(model.variable("lang"), Some("fr"));
        assert_eq!(model.variable("global.language"), Some("fr_FR"));
        assert_eq!(model.variable("region"), Some("eu"));
        assert_eq!(model.variable("settings.ShowClock"), Some("true"));
        assert_eq!(model.variable("settings.subset.snes.colorset"), None);
        assert_eq!(model.variable("wide"), Some("1.000000"));
        assert_eq!(model.variable("label"), Some("xfr"));
        assert_eq!(model.variable("dark"), Some("true"));
        assert_eq!(model.variable("path"), Some("/t/art"));
        assert_eq!(model.variable("broken"), Some("FF0000 ="));
        assert_eq!(model.variable("currentPath"), Some("/t"));
    }

    #[test]
    fn includes_resolve_relative_to_including_file() {
        init_logger();
        let resolver = InMemoryResourceResolver::new()
            .with(
                "/t/theme.xml",
                r#"<theme><formatVersion>6</formatVersion><include>./parts/main.xml</include></theme>"#,
            )
            .with(
                "/t/parts/main.xml",
                r#"<theme><include>colors.xml</include><view name="basic"><text name="title"/></view></theme>"#,
            )
            .with(
                "/t/parts/colors.xml",
                r#"<theme><variables><here>${currentPath}</here></variables></theme>"#,
            );
        let model = parse(&resolver, &ThemeContext::default(), "/t/theme.xml").unwrap();

        assert!(model.get_element("basic", "title", "text").is_some());
        assert_eq!(model.variable("here"), Some("/t/parts"));
        assert_eq!(model.variable("currentPath"), Some("/t"));
    }

    #[test]
    fn missing_and_broken_includes_are_skipped() {
        init_logger();
        let resolver = InMemoryResourceResolver::new()
            .with(
                "/t/theme.xml",
                r#"<theme><formatVersion>6</formatVersion>
                    <include>./missing.xml</include>
                    <include>./broken.xml</include>
                    <include>./noroot.xml</include>
                    <view name="basic"><text name="title"/></view>
                </theme>"#,
            )
            .with("/t/broken.xml", "<theme><view></theme>")
            .with("/t/noroot.xml", "<other/>");
        let model = parse(&resolver, &ThemeContext::default(), "/t/theme.xml").unwrap();
        assert!(model.has_view("basic"));
    }

    #[test]
    fn self_include_stops_at_depth_limit() {
        init_logger();
        let resolver = InMemoryResourceResolver::new().with(
            "/t/theme.xml",
            r#"<theme><formatVersion>6</formatVersion><include>./theme.xml</include>
                <view name="basic"><text name="title"/></view></theme>"#,
        );
        let model = parse(&resolver, &ThemeContext::default(), "/t/theme.xml").unwrap();
        assert!(model.has_view("basic"));
    }

    #[test]
    fn system_placeholder_falls_back_to_default_folder() {
        init_logger();
        let resolver = InMemoryResourceResolver::new()
            .with(
                "/t/theme.xml",
                r#"<theme><formatVersion>6</formatVersion><include>./$system/theme.xml</include></theme>"#,
            )
            .with(
                "/t/default/theme.xml",
                r#"<theme><view name="basic"><image name="logo"><path>./logo.png</path></image></view></theme>"#,
            )
            .with("/t/default/logo.png", "");
        let model = parse(&resolver, &ThemeContext::new("snes"), "/t/theme.xml").unwrap();

        assert_eq!(model.system_folder, "default");
        let logo = model.get_element("basic", "logo", "image").unwrap();
        assert_eq!(logo.string("path"), Some("/t/default/logo.png"));
    }

    #[test]
    fn subset_element_stamps_includes() {
        init_logger();
        let resolver = InMemoryResourceResolver::new()
            .with(
                "/t/theme.xml",
                r#"<theme><formatVersion>7</formatVersion>
                    <subset name="colorset" displayName="Colors" appliesTo="basic, grid">
                        <include name="dark" displayName="Dark">./dark.xml</include>
                        <include name="light">./light.xml</include>
                    </subset>
                </theme>"#,
            )
            .with("/t/dark.xml", r#"<theme><variables><bg>000000</bg></variables></theme>"#)
            .with("/t/light.xml", r#"<theme><variables><bg>FFFFFF</bg></variables></theme>"#);
        let model = parse(&resolver, &ThemeContext::new("snes"), "/t/theme.xml").unwrap();

        assert_eq!(model.variable("bg"), Some("000000"));
        assert_eq!(model.variable("subset.colorset"), Some("dark"));
        let variants = model.variants_of("colorset");
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].display_name, "Dark");
        assert_eq!(variants[1].display_name, "light");
        assert_eq!(variants[0].group_display_name, "Colors");
        assert_eq!(variants[0].applies_to, vec!["basic", "grid"]);
        assert_eq!(model.list_variant_groups("grid"), vec!["colorset"]);
        assert_eq!(model.selected_variant("colorset"), Some("dark"));
    }

    #[test]
    fn overlay_leaves_input_untouched() {
        init_logger();
        let resolver = InMemoryResourceResolver::new()
            .with(
                "/t/theme.xml",
                r#"<theme><formatVersion>6</formatVersion>
                    <view name="basic"><text name="title"><color>FF0000</color></text></view></theme>"#,
            )
            .with(
                "/games/mario.xml",
                r#"<theme><view name="basic">
                    <text name="title"><color>00FF00</color></text>
                    <image name="badge" extra="true"/>
                </view></theme>"#,
            );
        let context = ThemeContext::default();
        let parser = ThemeParser::new(&resolver, &context);
        let base = parser.parse(&DocumentSource::File("/t/theme.xml".into())).unwrap();
        let over = parser
            .overlay(&base, Path::new("/games/mario.xml"), OverlayOptions::per_game())
            .unwrap();

        let color = |m: &ThemeModel| m.get_element("basic", "title", "text").and_then(|e| e.color("color"));
        assert_eq!(color(&base).map(|c| c.packed()), Some(0xFF0000FF));
        assert_eq!(color(&over).map(|c| c.packed()), Some(0x00FF00FF));
        assert!(base.get_element("basic", "badge", "").is_none());
        assert_eq!(over.extras("basic", crate::element::ExtraFilter::PER_GAME), vec!["badge"]);

        let kept = parser
            .overlay(
                &base,
                Path::new("/games/mario.xml"),
                OverlayOptions {
                    per_game: false,
                    overwrite: false,
                },
            )
            .unwrap();
        assert_eq!(color(&kept).map(|c| c.packed()), Some(0xFF0000FF));

        assert!(parser.overlay(&base, Path::new("/games/none.xml"), OverlayOptions::default()).is_err());
    }
}
