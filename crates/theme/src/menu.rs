//! The menu look derived from a theme's `menu` view.

use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;
use vista_traits::ResourceResolver;
use vista_types::{Color, PropertyValue};

use crate::element::ThemeElement;
use crate::model::ThemeModel;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShaderInfo {
    pub path: String,
    pub parameters: IndexMap<String, String>,
}

impl ShaderInfo {
    /// The first child of `kind` with a non-empty path. String properties
    /// other than placement ones become shader parameters.
    fn from_children(element: &ThemeElement, kind: &str) -> Option<ShaderInfo> {
        let mut found = None;
        for (_, child) in &element.children {
            let Some(path) = child.string("path").filter(|p| child.kind == kind && !p.is_empty()) else {
                continue;
            };
            let parameters = child
                .properties
                .iter()
                .filter(|(name, _)| !matches!(name.as_str(), "pos" | "path" | "size" | "zIndex"))
                .filter_map(|(name, value)| Some((name.clone(), value.as_str()?.to_string())))
                .collect();
            found = Some(ShaderInfo {
                path: path.to_string(),
                parameters,
            });
        }
        found
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuBackground {
    pub color: Color,
    pub center_color: Color,
    pub path: String,
    pub fade_path: String,
    pub corner_size: (f32, f32),
    pub scrollbar_color: Color,
    pub scrollbar_size: f32,
    pub scrollbar_corner: f32,
    pub scrollbar_alignment: String,
    pub shader: Option<ShaderInfo>,
    pub menu_shader: Option<ShaderInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuText {
    pub color: Color,
    pub selected_color: Color,
    pub selector_color: Color,
    pub separator_color: Color,
    pub selector_gradient_color: Color,
    /// `false` when `selectorGradientType` is `horizontal`.
    pub vertical_gradient: bool,
    pub font_path: Option<String>,
    pub font_size: Option<f32>,
}

impl MenuText {
    fn new(color: u32, selected: u32, selector: u32, separator: u32, gradient: u32) -> Self {
        Self {
            color: Color(color),
            selected_color: Color(selected),
            selector_color: Color(selector),
            separator_color: Color(separator),
            selector_gradient_color: Color(gradient),
            vertical_gradient: true,
            font_path: None,
            font_size: None,
        }
    }

    fn apply_font(&mut self, element: &ThemeElement) {
        if let Some(path) = element.string("fontPath") {
            self.font_path = Some(path.to_string());
        }
        if let Some(size) = element.float("fontSize") {
            self.font_size = Some(size);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuGroup {
    pub color: Color,
    pub background_color: Color,
    pub separator_color: Color,
    pub line_spacing: f32,
    pub alignment: Alignment,
    pub visible: bool,
    pub font_path: Option<String>,
    pub font_size: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuIcons {
    pub on: String,
    pub off: String,
    pub on_off_auto: String,
    pub option_arrow: String,
    pub arrow: String,
    pub knob: String,
    pub text_input: String,
    pub text_input_active: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuButton {
    pub path: String,
    pub filled_path: String,
    pub corner_size: (f32, f32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuTheme {
    pub background: MenuBackground,
    pub title: MenuText,
    pub text: MenuText,
    pub text_small: MenuText,
    pub footer: MenuText,
    pub group: MenuGroup,
    pub icons: MenuIcons,
    pub button: MenuButton,
    /// Entries of `menuicons` whose file exists.
    pub menu_icons: IndexMap<String, String>,
}

impl Default for MenuTheme {
    fn default() -> Self {
        Self {
            background: MenuBackground {
                color: Color::WHITE,
                center_color: Color::WHITE,
                path: ":/frame.png".into(),
                fade_path: ":/scroll_gradient.png".into(),
                corner_size: (16.0, 16.0),
                scrollbar_color: Color::TRANSPARENT,
                scrollbar_size: 0.0025,
                scrollbar_corner: 0.01,
                scrollbar_alignment: "innerright".into(),
                shader: None,
                menu_shader: None,
            },
            title: MenuText::new(0x555555FF, 0x555555FF, 0x555555FF, 0xFFFFFFFF, 0x555555FF),
            text: MenuText::new(0x777777FF, 0xFFFFFFFF, 0x878787FF, 0xC6C7C6FF, 0x878787FF),
            text_small: MenuText::new(0x777777FF, 0xFFFFFFFF, 0x878787FF, 0xC6C7C6FF, 0x878787FF),
            footer: MenuText::new(0xC6C6C6FF, 0xC6C6C6FF, 0xC6C6C6FF, 0xFFFFFFFF, 0xC6C6C6FF),
            group: MenuGroup {
                color: Color(0x777777FF),
                background_color: Color(0x00000010),
                separator_color: Color(0xC6C7C6FF),
                line_spacing: 2.0,
                alignment: Alignment::Left,
                visible: false,
                font_path: None,
                font_size: None,
            },
            icons: MenuIcons {
                on: ":/on.svg".into(),
                off: ":/off.svg".into(),
                on_off_auto: ":/auto.svg".into(),
                option_arrow: ":/option_arrow.svg".into(),
                arrow: ":/arrow.svg".into(),
                knob: ":/slider_knob.svg".into(),
                text_input: ":/textinput_ninepatch.png".into(),
                text_input_active: ":/textinput_ninepatch_active.png".into(),
            },
            button: MenuButton {
                path: ":/button.png".into(),
                filled_path: ":/button_filled.png".into(),
                corner_size: (16.0, 16.0),
            },
            menu_icons: IndexMap::new(),
        }
    }
}

impl MenuTheme {
    /// Computes the menu look from `model`'s `menu` view on top of the
    /// built-in defaults. Image paths are only taken when `resolver` can
    /// find them.
    pub fn from_model(model: &ThemeModel, resolver: &dyn ResourceResolver) -> MenuTheme {
        let mut menu = MenuTheme::default();
        let exists = |path: &str| resolver.exists(Path::new(path));
        let existing = |el: &ThemeElement, name: &str| el.string(name).filter(|p| exists(p)).map(str::to_string);

        if let Some(el) = model.get_element("menu", "menubg", "menuBackground") {
            let bg = &mut menu.background;
            if let Some(path) = existing(el, "path") {
                bg.path = path;
            }
            if let Some(path) = existing(el, "fadePath") {
                bg.fade_path = path;
            }
            if let Some(color) = el.color("color") {
                bg.color = color;
                bg.center_color = color;
            }
            if let Some(center) = el.color("centerColor") {
                bg.center_color = center;
                if !el.has("color") {
                    bg.color = center;
                }
            }
            if let Some(size) = el.pair("cornerSize") {
                bg.corner_size = size;
            }
            if let Some(color) = el.color("scrollbarColor") {
                bg.scrollbar_color = color;
            }
            if let Some(size) = el.float("scrollbarSize") {
                bg.scrollbar_size = size;
            }
            if let Some(corner) = el.float("scrollbarCorner") {
                bg.scrollbar_corner = corner;
            }
            if let Some(alignment) = el.string("scrollbarAlignment") {
                bg.scrollbar_alignment = alignment.to_string();
            }
            bg.shader = ShaderInfo::from_children(el, "fadeShader");
            bg.menu_shader = ShaderInfo::from_children(el, "menuShader");
        }

        for (name, text) in [("menutitle", &mut menu.title), ("menufooter", &mut menu.footer)] {
            if let Some(el) = model.get_element("menu", name, "menuText") {
                text.apply_font(el);
                if let Some(color) = el.color("color") {
                    text.color = color;
                }
                if let Some(color) = el.color("selectorColor") {
                    text.selector_color = color;
                }
            }
        }

        if let Some(el) = model.get_element("menu", "menutextsmall", "menuTextSmall") {
            menu.group.visible = true;
            if el.has("fontPath") || el.has("fontSize") {
                menu.text_small.apply_font(el);
                menu.group.font_path = menu.text_small.font_path.clone();
                menu.group.font_size = menu.text_small.font_size;
            }
            if let Some(color) = el.color("color") {
                menu.text_small.color = color;
                menu.group.color = color;
            }
            if let Some(color) = el.color("selectedColor") {
                menu.text.selected_color = color;
            }
            if let Some(color) = el.color("selectorColor") {
                menu.text.selected_color = color;
            }
        }

        if let Some(el) = model.get_element("menu", "menutext", "menuText") {
            let text = &mut menu.text;
            text.apply_font(el);
            if let Some(color) = el.color("color") {
                text.color = color;
            }
            if let Some(color) = el.color("separatorColor") {
                text.separator_color = color;
                menu.group.separator_color = color;
            }
            if let Some(color) = el.color("selectedColor") {
                text.selected_color = color;
            }
            if let Some(color) = el.color("selectorColor") {
                text.selector_color = color;
                text.selector_gradient_color = color;
            }
            if let Some(color) = el.color("selectorColorEnd") {
                text.selector_gradient_color = color;
            }
            if let Some(kind) = el.string("selectorGradientType") {
                text.vertical_gradient = kind != "horizontal";
            }
        }

        if let Some(el) = model.get_element("menu", "menugroup", "menuGroup") {
            let group = &mut menu.group;
            group.visible = true;
            if let Some(path) = el.string("fontPath") {
                group.font_path = Some(path.to_string());
            }
            if let Some(size) = el.float("fontSize") {
                group.font_size = Some(size);
            }
            if let Some(color) = el.color("color") {
                group.color = color;
            }
            if let Some(color) = el.color("backgroundColor") {
                group.background_color = color;
            }
            if let Some(color) = el.color("separatorColor") {
                group.separator_color = color;
            }
            if let Some(spacing) = el.float("lineSpacing") {
                group.line_spacing = spacing;
            }
            if let Some(visible) = el.bool("visible") {
                group.visible = visible;
            }
            match el.string("alignment") {
                Some("left") => group.alignment = Alignment::Left,
                Some("center") => group.alignment = Alignment::Center,
                Some("right") => group.alignment = Alignment::Right,
                _ => {}
            }
        }

        if let Some(el) = model.get_element("menu", "menubutton", "menuButton") {
            if let Some(path) = el.string("path") {
                menu.button.path = path.to_string();
            }
            if let Some(path) = el.string("filledPath") {
                menu.button.filled_path = path.to_string();
            }
            if let Some(size) = el.pair("cornerSize") {
                menu.button.corner_size = size;
            }
        }

        if let Some(el) = model.get_element("menu", "menutextedit", "menuTextEdit") {
            if let Some(path) = existing(el, "active") {
                menu.icons.text_input_active = path;
            }
            if let Some(path) = existing(el, "inactive") {
                menu.icons.text_input = path;
            }
        }

        if let Some(el) = model.get_element("menu", "menuswitch", "menuSwitch") {
            if let Some(path) = existing(el, "pathOn") {
                menu.icons.on = path;
            }
            if let Some(path) = existing(el, "pathOff") {
                menu.icons.off = path;
            }
        }

        if let Some(path) = model
            .get_element("menu", "menuslider", "menuSlider")
            .and_then(|el| existing(el, "path"))
        {
            menu.icons.knob = path;
        }

        if let Some(el) = model.get_element("menu", "menuicons", "menuIcons") {
            for (name, value) in &el.properties {
                if let PropertyValue::Str(path) = value {
                    if !path.is_empty() && exists(path) {
                        menu.menu_icons.insert(name.clone(), path.clone());
                    }
                }
            }
        }

        let language = model.variable("global.language").unwrap_or("");
        let auto = format!(":/auto_{}.svg", language);
        if exists(&auto) {
            menu.icons.on_off_auto = auto;
        }

        menu
    }

    pub fn menu_icon(&self, name: &str) -> Option<&str> {
        self.menu_icons.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ThemeView;
    use vista_traits::InMemoryResourceResolver;

    fn element(kind: &str, props: &[(&str, PropertyValue)]) -> ThemeElement {
        let mut el = ThemeElement::new(kind);
        for (name, value) in props {
            el.properties.insert(name.to_string(), value.clone());
        }
        el
    }

    fn model_with(elements: Vec<(&str, ThemeElement)>) -> ThemeModel {
        let mut view = ThemeView::new("menu");
        for (name, el) in elements {
            view.elements.insert(name.to_string(), el);
        }
        let mut model = ThemeModel::default();
        model.views.insert("menu".into(), view);
        model
    }

    #[test]
    fn empty_model_gives_defaults() {
        let menu = MenuTheme::from_model(&ThemeModel::default(), &InMemoryResourceResolver::new());
        assert_eq!(menu, MenuTheme::default());
        assert_eq!(menu.group.background_color, Color(0x00000010));
        assert!(!menu.group.visible);
    }

    #[test]
    fn background_center_color_fills_missing_color() {
        let model = model_with(vec![(
            "menubg",
            element("menuBackground", &[("centerColor", PropertyValue::Color(Color(0x101010FF)))]),
        )]);
        let menu = MenuTheme::from_model(&model, &InMemoryResourceResolver::new());
        assert_eq!(menu.background.color, Color(0x101010FF));
        assert_eq!(menu.background.center_color, Color(0x101010FF));
    }

    #[test]
    fn paths_must_exist() {
        let resolver = InMemoryResourceResolver::new().with("/t/on.svg", "").with("/t/system.svg", "");
        let model = model_with(vec![
            (
                "menuswitch",
                element(
                    "menuSwitch",
                    &[
                        ("pathOn", PropertyValue::Str("/t/on.svg".into())),
                        ("pathOff", PropertyValue::Str("/t/missing.svg".into())),
                    ],
                ),
            ),
            (
                "menuicons",
                element(
                    "menuIcons",
                    &[
                        ("iconSystem", PropertyValue::Str("/t/system.svg".into())),
                        ("iconQuit", PropertyValue::Str("/t/quit.svg".into())),
                    ],
                ),
            ),
        ]);

        let menu = MenuTheme::from_model(&model, &resolver);
        assert_eq!(menu.icons.on, "/t/on.svg");
        assert_eq!(menu.icons.off, ":/off.svg");
        assert_eq!(menu.menu_icon("iconSystem"), Some("/t/system.svg"));
        assert_eq!(menu.menu_icon("iconQuit"), None);
    }

    #[test]
    fn text_and_group_colors() {
        let model = model_with(vec![
            (
                "menutext",
                element(
                    "menuText",
                    &[
                        ("separatorColor", PropertyValue::Color(Color(0x222222FF))),
                        ("selectorColor", PropertyValue::Color(Color(0x333333FF))),
                        ("selectorGradientType", PropertyValue::Str("horizontal".into())),
                    ],
                ),
            ),
            (
                "menugroup",
                element("menuGroup", &[("alignment", PropertyValue::Str("center".into()))]),
            ),
        ]);

        let menu = MenuTheme::from_model(&model, &InMemoryResourceResolver::new());
        assert_eq!(menu.group.separator_color, Color(0x222222FF));
        assert_eq!(menu.text.selector_gradient_color, Color(0x333333FF));
        assert!(!menu.text.vertical_gradient);
        assert!(menu.group.visible);
        assert_eq!(menu.group.alignment, Alignment::Center);
    }

    #[test]
    fn shader_children_become_shader_info() {
        let mut bg = element("menuBackground", &[]);
        let mut shader = element(
            "menuShader",
            &[
                ("path", PropertyValue::Str("/t/blur.glsl".into())),
                ("radius", PropertyValue::Str("4".into())),
                ("pos", PropertyValue::Str("ignored".into())),
            ],
        );
        shader.extra = crate::element::ExtraKind::Dynamic;
        bg.children.push(("menuShader".into(), shader));

        let menu = MenuTheme::from_model(&model_with(vec![("menubg", bg)]), &InMemoryResourceResolver::new());
        let info = menu.background.menu_shader.unwrap();
        assert_eq!(info.path, "/t/blur.glsl");
        assert_eq!(info.parameters.len(), 1);
        assert!(menu.background.shader.is_none());
    }
}
