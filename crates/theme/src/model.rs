//! The resolved, read-only result of a pass and its query API.

use indexmap::IndexMap;
use log::warn;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::element::{ExtraFilter, ThemeElement};
use crate::schema::INTERNAL_VIEWS;
use crate::subset::{Variant, VariantCatalog};
use crate::variables::Variables;
use crate::view::ThemeView;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThemeModel {
    pub views: IndexMap<String, ThemeView>,
    pub variants: VariantCatalog,
    pub variables: Variables,
    pub format_version: f32,
    pub default_view: Option<String>,
    pub default_transition: Option<String>,
    /// Theme folder the pass resolved `$system` against. Differs from the
    /// requested system when the theme fell back to `default`.
    pub system_folder: String,
    /// Value chosen for each group during the pass.
    pub selections: HashMap<String, String>,
    /// Root document the model was resolved from; empty for inline sources.
    pub root_path: PathBuf,
}

impl ThemeModel {
    pub fn has_view(&self, view: &str) -> bool {
        self.views.contains_key(view)
    }

    pub fn view(&self, view: &str) -> Option<&ThemeView> {
        self.views.get(view)
    }

    /// Looks up an element. An empty `expected_kind` accepts any kind; a
    /// mismatch logs a warning and yields `None`.
    pub fn get_element(&self, view: &str, name: &str, expected_kind: &str) -> Option<&ThemeElement> {
        let element = self.views.get(view)?.elements.get(name)?;
        if !expected_kind.is_empty() && element.kind != expected_kind {
            warn!(
                "Requested mismatched theme type for [{}.{}] - expected \"{}\", got \"{}\"",
                view, name, expected_kind, element.kind
            );
            return None;
        }
        Some(element)
    }

    /// Names of the elements of `kind` in `view`, in view order.
    pub fn list_elements(&self, view: &str, kind: &str) -> Vec<String> {
        self.views
            .get(view)
            .map(|v| {
                v.elements
                    .iter()
                    .filter(|(_, e)| e.kind == kind)
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Variant groups in declaration order. A non-empty `scope` keeps only
    /// groups with a variant that applies to it.
    pub fn list_variant_groups(&self, scope: &str) -> Vec<String> {
        self.variants.groups(Some(scope))
    }

    pub fn variants_of(&self, group: &str) -> Vec<&Variant> {
        self.variants.variants_of(group)
    }

    /// First declared value of `group`.
    pub fn default_variant(&self, group: &str) -> Option<&str> {
        self.variants.first_value(group)
    }

    pub fn selected_variant(&self, group: &str) -> Option<&str> {
        self.selections.get(group).map(String::as_str)
    }

    /// Selectable views as (name, display name), shell views excluded.
    pub fn get_views(&self) -> Vec<(String, String)> {
        self.views
            .iter()
            .filter(|(name, _)| !INTERNAL_VIEWS.contains(&name.as_str()))
            .map(|(name, view)| (name.clone(), view.display_name().to_string()))
            .collect()
    }

    pub fn is_custom_view(&self, view: &str) -> bool {
        self.views.get(view).is_some_and(|v| v.is_custom)
    }

    pub fn custom_view_base_type(&self, view: &str) -> Option<&str> {
        self.views.get(view)?.base_type.as_deref()
    }

    /// Display name of `view`; unknown views are named after themselves.
    pub fn view_display_name<'a>(&'a self, view: &'a str) -> &'a str {
        self.views.get(view).map(ThemeView::display_name).unwrap_or(view)
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name)
    }

    /// Names of the extras of `view` accepted by `filter`, in view order.
    pub fn extras(&self, view: &str, filter: ExtraFilter) -> Vec<&str> {
        let Some(view) = self.views.get(view) else {
            return Vec::new();
        };
        view.elements
            .iter()
            .filter(|(_, e)| filter.matches(e))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// A copy of the model holding only `view`. An empty name keeps every
    /// view.
    pub fn for_view(&self, view: &str) -> ThemeModel {
        let views = if view.is_empty() {
            self.views.clone()
        } else {
            self.views
                .get_key_value(view)
                .map(|(k, v)| (k.clone(), v.clone()))
                .into_iter()
                .collect()
        };
        ThemeModel {
            views,
            variants: self.variants.clone(),
            variables: self.variables.clone(),
            format_version: self.format_version,
            default_view: self.default_view.clone(),
            default_transition: self.default_transition.clone(),
            system_folder: self.system_folder.clone(),
            selections: self.selections.clone(),
            root_path: self.root_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ExtraKind;
    use vista_types::{Color, PropertyValue};

    fn model() -> ThemeModel {
        let mut basic = ThemeView::new("basic");
        let mut bg = ThemeElement::new("image");
        bg.properties.insert("color".into(), PropertyValue::Color(Color(0x000000FF)));
        basic.elements.insert("background".into(), bg);
        basic.elements.insert("title".into(), ThemeElement::new("text"));
        let mut logo = ThemeElement::new("image");
        logo.extra = ExtraKind::Dynamic;
        basic.elements.insert("logo".into(), logo);

        let mut custom = ThemeView::new("mine");
        custom.is_custom = true;
        custom.display_name = "My view".into();
        custom.base_type = Some("basic".into());

        let mut model = ThemeModel::default();
        model.views.insert("system".into(), ThemeView::new("system"));
        model.views.insert("basic".into(), basic);
        model.views.insert("mine".into(), custom);
        model
    }

    #[test]
    fn get_element_checks_kind() {
        let model = model();
        assert!(model.get_element("basic", "background", "image").is_some());
        assert!(model.get_element("basic", "background", "").is_some());
        assert!(model.get_element("basic", "background", "text").is_none());
        assert!(model.get_element("grid", "background", "").is_none());
    }

    #[test]
    fn color_is_not_readable_as_float() {
        let model = model();
        let bg = model.get_element("basic", "background", "image").unwrap();
        assert_eq!(bg.color("color"), Some(Color(0x000000FF)));
        assert_eq!(bg.float("color"), None);
    }

    #[test]
    fn lists_and_views() {
        let model = model();
        assert_eq!(model.list_elements("basic", "image"), vec!["background", "logo"]);
        assert!(model.list_elements("nope", "image").is_empty());
        assert_eq!(
            model.get_views(),
            vec![("basic".to_string(), "basic".to_string()), ("mine".to_string(), "My view".to_string())]
        );
        assert!(model.is_custom_view("mine"));
        assert_eq!(model.custom_view_base_type("mine"), Some("basic"));
        assert_eq!(model.view_display_name("unknown"), "unknown");
    }

    #[test]
    fn extras_and_restriction() {
        let model = model();
        assert_eq!(model.extras("basic", ExtraFilter::ALL), vec!["logo"]);
        assert!(model.extras("basic", ExtraFilter::PER_GAME).is_empty());

        let only = model.for_view("basic");
        assert_eq!(only.views.len(), 1);
        assert!(only.has_view("basic"));
        assert!(model.for_view("missing").views.is_empty());
        assert_eq!(model.for_view("").views.len(), 3);
    }

    #[test]
    fn variants_outlive_the_group_name() {
        let mut model = model();
        model.variants.record(Variant::new("colorset", "dark"));
        model.variants.record(Variant::new("colorset", "light"));
        model.variants.record(Variant::new("iconset", "flat"));

        let found = {
            let group = String::from("colorset");
            model.variants_of(&group)
        };
        let values: Vec<&str> = found.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(values, vec!["dark", "light"]);
        assert!(model.variants_of("aspect").is_empty());
    }

    #[test]
    fn serializes_colors_as_hex() {
        let model = model();
        let json = serde_json::to_value(&model).unwrap();
        let background = &json["views"]["basic"]["elements"]["background"];
        assert_eq!(background["kind"], "image");
        assert_eq!(background["properties"]["color"], "000000FF");
        assert_eq!(json["views"]["basic"]["elements"]["logo"]["extra"], "dynamic");
    }
}
