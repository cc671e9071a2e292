//! Element declarations and property conversion.

use log::{debug, warn};
use std::path::Path;
use vista_types::{Color, PropertyKind, PropertyValue, parse_bool, parse_float_prefix};

use super::Pass;
use crate::element::{ExtraKind, ThemeElement};
use crate::filter::FILTER_ATTRIBUTES;
use crate::schema::{
    ITEM_TEMPLATE_HOSTS, PropertyTable, SHADER_TYPES, element_properties, inherited_kind, is_auto_extra,
};
use crate::storyboard::Storyboard;
use crate::view::ThemeView;
use crate::xml::XmlNode;

/// Element attributes that are not properties.
const RESERVED_ATTRIBUTES: &[&str] = &["name", "extra", "importProperties"];

const RANDOM_IMAGE_SOURCES: &[&str] = &[
    "{random}",
    "{random:thumbnail}",
    "{random:marquee}",
    "{random:image}",
    "{random:fanart}",
    "{random:titleshot}",
];

fn is_binding(text: &str) -> bool {
    text.contains('{') && text.contains(':') && text.contains('}')
}

fn binding_key(name: &str) -> String {
    format!("{}_binding", name)
}

impl Pass<'_> {
    /// Applies the declaration `node` to `element`.
    ///
    /// `parent` is the node `node` was found in. `view` is the view being
    /// built, minus `element` itself.
    pub(super) fn parse_element(
        &mut self,
        node: &XmlNode,
        parent: &XmlNode,
        table: &'static PropertyTable,
        element: &mut ThemeElement,
        view: &ThemeView,
    ) {
        // `control` overrides common properties without changing the type.
        if element.kind.is_empty() || node.tag != "control" {
            element.kind = node.tag.clone();
        }

        if let Some(extra) = node.attr("extra") {
            match extra.to_lowercase().as_str() {
                "true" => element.extra = ExtraKind::Dynamic,
                "static" => element.extra = ExtraKind::Static,
                _ => {}
            }
            if element.extra.is_extra() && self.per_game {
                element.extra = ExtraKind::PerGame;
            }
        } else if element.extra == ExtraKind::None && is_auto_extra(&element.kind) {
            element.extra = ExtraKind::Dynamic;
        }

        if let Some(import) = node.attr("importProperties") {
            let import = import.to_lowercase();
            if let Some(source) = view.elements.get(&import) {
                for (name, value) in &source.properties {
                    if table.contains_key(name.as_str()) {
                        element.properties.insert(name.clone(), value.clone());
                    }
                }
                for (event, storyboard) in &source.storyboards {
                    element.storyboards.insert(event.clone(), storyboard.clone());
                }
            } else {
                debug!("importProperties: no element \"{}\" in view \"{}\"", import, view.name);
            }
        }

        let in_system_view = parent.tag == "view" && parent.attr("name") == Some("system");

        for (name, value) in node.attributes() {
            if RESERVED_ATTRIBUTES.contains(&name) || FILTER_ATTRIBUTES.contains(&name) {
                continue;
            }
            let Some(kind) = table.get(name).copied().or_else(|| inherited_kind(&node.tag, name)) else {
                warn!("Unknown property : {}.{}", node.tag, name);
                continue;
            };
            if !self.overwrite && element.has(name) {
                continue;
            }
            self.set_property(element, name, value, kind, in_system_view);
        }

        for child in &node.children {
            if !self.allows(child) {
                continue;
            }

            let mut name = child.tag.as_str();
            let mut kind = table.get(name).copied();

            if kind.is_none() && self.overwrite && node.tag == "control" && element.kind != "control" {
                kind = element_properties(&element.kind).and_then(|t| t.get(name).copied());
            }
            // <text><text><pos/></text></text> nests a text element.
            if element.kind == "text" && name == "text" && !child.children.is_empty() {
                kind = None;
            }

            if kind.is_none() {
                if name == "storyboard" {
                    self.parse_storyboard(child, table, &node.tag, element);
                    continue;
                }

                if element.kind == "menuIcons" {
                    kind = Some(PropertyKind::Path);
                } else if name == "animate" && node.tag == "imagegrid" {
                    name = "animateSelection";
                    kind = table.get(name).copied();
                } else if SHADER_TYPES.contains(&element.kind.as_str()) {
                    // Shader uniforms have arbitrary names.
                    kind = Some(PropertyKind::String);
                } else if name == "itemTemplate" && ITEM_TEMPLATE_HOSTS.contains(&node.tag.as_str()) {
                    let mut item = ThemeElement {
                        extra: ExtraKind::ItemTemplate,
                        ..ThemeElement::default()
                    };
                    if let Some(control) = element_properties("control") {
                        self.parse_element(child, node, control, &mut item, view);
                    }
                    element.children.push(("itemTemplate".to_string(), item));
                    continue;
                } else if name == "shader"
                    || ((name == "menuShader" || name == "fadeShader") && node.tag == "menuBackground")
                {
                    let mut item = ThemeElement {
                        extra: ExtraKind::Dynamic,
                        ..ThemeElement::default()
                    };
                    if !child.text().is_empty() {
                        item.kind = name.to_string();
                        self.set_property(&mut item, "path", child.text(), PropertyKind::Path, false);
                    } else if let Some(shader) = element_properties("shader") {
                        self.parse_element(child, node, shader, &mut item, view);
                    }
                    element.children.push((name.to_string(), item));
                    continue;
                } else if let Some(base_kind) = inherited_kind(&node.tag, name) {
                    kind = Some(base_kind);
                } else if let Some(child_table) = element_properties(name) {
                    debug!("Processing child element \"{}\" found in element {}", name, node.tag);
                    let key = child.attr("name").unwrap_or(name).to_string();
                    let mut item = ThemeElement {
                        extra: ExtraKind::Dynamic,
                        ..ThemeElement::default()
                    };
                    self.parse_element(child, node, child_table, &mut item, view);
                    element.children.push((key, item));
                    continue;
                } else {
                    warn!("Unknown property : {}.{}", node.tag, name);
                    continue;
                }
            }

            let Some(kind) = kind else {
                continue;
            };
            if !self.overwrite && element.has(name) {
                continue;
            }
            self.set_property(element, name, child.text(), kind, in_system_view);
        }
    }

    /// An empty `<storyboard event="x"/>` removes the storyboard for `x`.
    fn parse_storyboard(&self, node: &XmlNode, table: &PropertyTable, element_tag: &str, element: &mut ThemeElement) {
        if node.is_empty() {
            element.storyboards.shift_remove(node.attr_or_empty("event"));
            return;
        }

        let storyboard = Storyboard::from_node(
            node,
            |property| table.get(property).copied().or_else(|| inherited_kind(element_tag, property)),
            |kind, text| self.animation_value(kind, text),
        );

        if storyboard.animations.is_empty() {
            warn!("Storyboard \"{}\" has no <animation> items !", storyboard.event);
            element.storyboards.shift_remove(&storyboard.event);
        } else {
            element.storyboards.insert(storyboard.event.clone(), storyboard);
        }
    }

    fn animation_value(&self, kind: PropertyKind, text: &str) -> PropertyValue {
        let text = self.expand(text);
        match kind {
            PropertyKind::Path => {
                let path = self.resolver.resolve(&text, &self.sources.current_dir());
                PropertyValue::Str(path.display().to_string())
            }
            other => other.parse(&text),
        }
    }

    /// Converts `raw` to `kind` and stores it on `element` as `name`.
    fn set_property(&self, element: &mut ThemeElement, name: &str, raw: &str, kind: PropertyKind, in_system_view: bool) {
        let mut text = self.expand(raw);
        if text.contains('$') {
            text = self.resolve_placeholders(&text, &self.system_folder);
        }

        let props = &mut element.properties;
        match kind {
            PropertyKind::String | PropertyKind::Float | PropertyKind::Color | PropertyKind::Boolean
                if is_binding(&text) =>
            {
                if kind == PropertyKind::Boolean {
                    props.insert(name.to_string(), PropertyValue::Bool(true));
                }
                props.insert(binding_key(name), PropertyValue::Str(text));
            }
            PropertyKind::String => {
                props.shift_remove(&binding_key(name));
                props.insert(name.to_string(), PropertyValue::Str(text));
            }
            PropertyKind::Float => {
                props.shift_remove(&binding_key(name));
                props.insert(name.to_string(), PropertyValue::Float(parse_float_prefix(&text)));
            }
            PropertyKind::Color => {
                props.shift_remove(&binding_key(name));
                props.insert(name.to_string(), PropertyValue::Color(Color::parse_lenient(&text)));
            }
            PropertyKind::Boolean => {
                props.shift_remove(&binding_key(name));
                props.insert(name.to_string(), PropertyValue::Bool(parse_bool(&text)));
            }
            PropertyKind::NormalizedPair | PropertyKind::NormalizedRect => {
                props.insert(name.to_string(), kind.parse(&text));
            }
            PropertyKind::Path => self.set_path(element, name, &text, in_system_view),
        }
    }

    fn set_path(&self, element: &mut ThemeElement, name: &str, text: &str, in_system_view: bool) {
        if text.is_empty() {
            return;
        }

        if text.starts_with("{random") {
            if let Some(problem) = random_misuse(element, text, in_system_view) {
                warn!("{} ({}.{} = \"{}\")", problem, element.kind, name, text);
            } else {
                element.properties.insert(name.to_string(), PropertyValue::Str(text.to_string()));
            }
            return;
        }

        if text == "none" {
            element.properties.shift_remove(name);
            return;
        }

        if is_binding(text) {
            element
                .properties
                .insert(binding_key(name), PropertyValue::Str(text.to_string()));
            element.properties.insert(name.to_string(), PropertyValue::Str(text.to_string()));
            return;
        }
        element.properties.shift_remove(&binding_key(name));

        let path = self.resolver.resolve(text, &self.sources.current_dir());
        if self.resolver.exists(&path) {
            element.properties.insert(name.to_string(), path_value(&path));
            return;
        }

        if (text.starts_with('.') || text.starts_with('~')) && self.sources.depth() > 1 {
            let from_root = self.resolver.resolve(text, &self.sources.root_dir());
            if from_root != path && self.resolver.exists(&from_root) {
                element.properties.insert(name.to_string(), path_value(&from_root));
                return;
            }
        }

        debug!("Could not find file \"{}\" (which resolved to \"{}\")", text, path.display());
    }
}

fn path_value(path: &Path) -> PropertyValue {
    PropertyValue::Str(path.display().to_string())
}

/// Why a `{random...}` path is not allowed here, if it is not.
fn random_misuse(element: &ThemeElement, text: &str, in_system_view: bool) -> Option<&'static str> {
    if !element.extra.is_extra() {
        Some("random is only supported in extras")
    } else if element.kind != "image" && element.kind != "video" {
        Some("random is only supported in video or image elements")
    } else if !in_system_view {
        Some("random is only supported in systemview")
    } else if element.kind == "video" && text != "{random}" {
        Some("video element only supports {random} element")
    } else if element.kind == "image" && !RANDOM_IMAGE_SOURCES.contains(&text) {
        Some("unknown random element")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use vista_traits::InMemoryResourceResolver;
    use vista_types::{Color, PropertyValue};

    use crate::context::ThemeContext;
    use crate::element::ExtraKind;
    use crate::loader::DocumentSource;
    use crate::model::ThemeModel;
    use crate::parser::ThemeParser;
    use crate::storyboard::EasingMode;

    fn resolve_files(files: &[(&str, &str)], context: ThemeContext) -> ThemeModel {
        let _ = env_logger::builder().is_test(true).try_init();
        let resolver = files
            .iter()
            .fold(InMemoryResourceResolver::new(), |r, (path, text)| r.with(*path, *text));
        ThemeParser::new(&resolver, &context)
            .parse(&DocumentSource::File(PathBuf::from(files[0].0)))
            .unwrap()
    }

    fn resolve(body: &str) -> ThemeModel {
        let xml = format!("<theme><formatVersion>7</formatVersion>{}</theme>", body);
        resolve_files(&[("/t/theme.xml", xml.as_str())], ThemeContext::new("snes"))
    }

    #[test]
    fn properties_are_typed_by_schema() {
        let model = resolve(
            r#"<view name="basic"><text name="title" pos="0.1 0.2">
                <size>0.5</size>
                <padding>0.01 0.02</padding>
                <color>#80808080</color>
                <fontSize>0.045</fontSize>
                <forceUppercase>yes</forceUppercase>
                <text>Hello</text>
                <bogus>1</bogus>
            </text></view>"#,
        );
        let title = model.get_element("basic", "title", "text").unwrap();
        assert_eq!(title.pair("pos"), Some((0.1, 0.2)));
        assert_eq!(title.pair("size"), Some((0.0, 0.0)));
        assert_eq!(title.rect("padding"), Some((0.01, 0.02, 0.01, 0.02)));
        assert_eq!(title.color("color"), Some(Color(0x80808080)));
        assert_eq!(title.float("fontSize"), Some(0.045));
        assert_eq!(title.bool("forceUppercase"), Some(true));
        assert_eq!(title.string("text"), Some("Hello"));
        assert!(!title.has("bogus"));
        assert_eq!(title.extra, ExtraKind::None);
    }

    #[test]
    fn names_split_and_variables_expand() {
        let model = resolve(
            r#"<variables><accent>00FF00</accent></variables>
               <view name="basic"><image name="a, b" color="${accent}"/></view>"#,
        );
        for name in ["a", "b"] {
            let el = model.get_element("basic", name, "image").unwrap();
            assert_eq!(el.color("color"), Some(Color(0x00FF00FF)));
        }
    }

    #[test]
    fn bindings_are_stored_separately() {
        let model = resolve(
            r#"<view name="basic"><text name="t">
                <text>{game:name}</text>
                <visible>{game:favorite}</visible>
                <color>{system:color}</color>
            </text></view>"#,
        );
        let t = model.get_element("basic", "t", "").unwrap();
        assert_eq!(t.binding("text"), Some("{game:name}"));
        assert!(!t.has("text"));
        assert_eq!(t.bool("visible"), Some(true));
        assert_eq!(t.binding("visible"), Some("{game:favorite}"));
        assert!(t.color("color").is_none());

        let cleared = resolve(
            r#"<view name="basic"><text name="t"><text>{game:name}</text></text></view>
               <view name="basic"><text name="t"><text>Plain</text></text></view>"#,
        );
        let t = cleared.get_element("basic", "t", "").unwrap();
        assert_eq!(t.binding("text"), None);
        assert_eq!(t.string("text"), Some("Plain"));
    }

    #[test]
    fn paths_resolve_or_are_dropped() {
        let model = resolve_files(
            &[
                (
                    "/t/theme.xml",
                    r#"<theme><formatVersion>7</formatVersion>
                        <include>./parts/inc.xml</include>
                        <view name="basic"><image name="bg" path="./art/bg.png"/></view>
                        <view name="basic"><image name="gone"><path>./nothing.png</path></image></view>
                    </theme>"#,
                ),
                (
                    "/t/parts/inc.xml",
                    r#"<theme><view name="detailed"><image name="bg"><path>./art/bg.png</path><default>{game:image}</default></image></view></theme>"#,
                ),
                ("/t/art/bg.png", ""),
            ],
            ThemeContext::new("snes"),
        );
        assert_eq!(model.get_element("basic", "bg", "").unwrap().string("path"), Some("/t/art/bg.png"));
        assert!(!model.get_element("basic", "gone", "").unwrap().has("path"));

        let detailed = model.get_element("detailed", "bg", "").unwrap();
        assert_eq!(detailed.string("path"), Some("/t/art/bg.png"));
        assert_eq!(detailed.string("default"), Some("{game:image}"));
        assert_eq!(detailed.binding("default"), Some("{game:image}"));
    }

    #[test]
    fn none_removes_a_path() {
        let model = resolve_files(
            &[
                (
                    "/t/theme.xml",
                    r#"<theme><formatVersion>7</formatVersion>
                        <view name="basic"><image name="bg" path="./bg.png"/></view>
                        <view name="basic"><image name="bg" path="none"/></view>
                    </theme>"#,
                ),
                ("/t/bg.png", ""),
            ],
            ThemeContext::new("snes"),
        );
        assert!(!model.get_element("basic", "bg", "").unwrap().has("path"));
    }

    #[test]
    fn random_paths_only_on_system_view_extras() {
        let model = resolve(
            r#"<view name="system">
                <image name="shot" extra="true" path="{random:fanart}"/>
                <video name="vid" extra="true" path="{random:image}"/>
                <image name="plain" path="{random}"/>
            </view>
            <view name="basic"><image name="shot" extra="true" path="{random}"/></view>"#,
        );
        assert_eq!(model.get_element("system", "shot", "").unwrap().string("path"), Some("{random:fanart}"));
        assert!(!model.get_element("system", "vid", "").unwrap().has("path"));
        assert!(!model.get_element("system", "plain", "").unwrap().has("path"));
        assert!(!model.get_element("basic", "shot", "").unwrap().has("path"));
    }

    #[test]
    fn extras_and_base_class_properties() {
        let model = resolve(
            r#"<view name="basic">
                <clock name="clock" fontSize="0.03"/>
                <image name="s" extra="static"/>
                <image name="d" extra="TRUE"/>
                <batteryIcon name="bat"><full>./none.png</full><pos>0.5 0.5</pos></batteryIcon>
            </view>"#,
        );
        let clock = model.get_element("basic", "clock", "clock").unwrap();
        assert_eq!(clock.extra, ExtraKind::Dynamic);
        assert_eq!(clock.float("fontSize"), Some(0.03));
        assert_eq!(model.get_element("basic", "s", "").unwrap().extra, ExtraKind::Static);
        assert_eq!(model.get_element("basic", "d", "").unwrap().extra, ExtraKind::Dynamic);
        assert_eq!(model.get_element("basic", "bat", "").unwrap().pair("pos"), Some((0.5, 0.5)));
    }

    #[test]
    fn control_overrides_without_changing_kind() {
        let model = resolve(
            r#"<view name="basic"><text name="title"><color>FF0000</color></text></view>
               <view name="basic"><control name="title" pos="0.3 0.4"><color>00FF00</color></control></view>"#,
        );
        let title = model.get_element("basic", "title", "text").unwrap();
        assert_eq!(title.pair("pos"), Some((0.3, 0.4)));
        assert_eq!(title.color("color"), Some(Color(0x00FF00FF)));
    }

    #[test]
    fn import_properties_copies_schema_valid_values() {
        let model = resolve(
            r#"<view name="basic">
                <text name="title"><color>FF0000</color><fontSize>0.05</fontSize>
                    <storyboard event="activate"><animation property="opacity" to="1"/></storyboard>
                </text>
                <image name="art" importProperties="TITLE"/>
            </view>"#,
        );
        let art = model.get_element("basic", "art", "image").unwrap();
        assert_eq!(art.color("color"), Some(Color(0xFF0000FF)));
        assert!(!art.has("fontSize"));
        assert!(art.storyboard("activate").is_some());
    }

    #[test]
    fn nested_children_and_templates() {
        let model = resolve(
            r#"<view name="basic">
                <imagegrid name="grid">
                    <itemTemplate><pos>0.1 0.1</pos></itemTemplate>
                    <animate>true</animate>
                </imagegrid>
                <text name="t"><text name="inner"><pos>0 0</pos></text></text>
                <menuBackground name="menubg"><menuShader>./blur.glsl</menuShader></menuBackground>
                <image name="img"><shader><path>./s.glsl</path><strength>2</strength></shader></image>
            </view>"#,
        );
        let grid = model.get_element("basic", "grid", "").unwrap();
        let template = grid.child("itemTemplate").unwrap();
        assert_eq!(template.extra, ExtraKind::ItemTemplate);
        assert_eq!(template.kind, "itemTemplate");
        assert_eq!(template.pair("pos"), Some((0.1, 0.1)));
        assert_eq!(grid.bool("animateSelection"), Some(true));

        let t = model.get_element("basic", "t", "").unwrap();
        assert!(!t.has("text"));
        let inner = t.child("inner").unwrap();
        assert_eq!(inner.kind, "text");
        assert_eq!(inner.extra, ExtraKind::Dynamic);

        let bg = model.get_element("basic", "menubg", "").unwrap();
        assert_eq!(bg.child("menuShader").unwrap().kind, "menuShader");

        let img = model.get_element("basic", "img", "").unwrap();
        let shader = img.child("shader").unwrap();
        assert_eq!(shader.kind, "shader");
        assert_eq!(shader.string("strength"), Some("2"));
    }

    #[test]
    fn menu_icons_accept_any_name() {
        let model = resolve_files(
            &[
                (
                    "/t/theme.xml",
                    r#"<theme><formatVersion>7</formatVersion><view name="menu">
                        <menuIcons name="menuicons"><iconCustom>./c.svg</iconCustom></menuIcons>
                    </view></theme>"#,
                ),
                ("/t/c.svg", ""),
            ],
            ThemeContext::new("snes"),
        );
        let icons = model.get_element("menu", "menuicons", "menuIcons").unwrap();
        assert_eq!(icons.string("iconCustom"), Some("/t/c.svg"));
    }

    #[test]
    fn storyboards_replace_and_remove() {
        let model = resolve(
            r#"<view name="basic"><image name="a">
                <storyboard event="activate"><animation property="opacity" from="0" to="1" mode="bump"/></storyboard>
                <storyboard event="open"><animation property="opacity" to="1"/></storyboard>
                <storyboard event="close"><animation property="pos" to="1 1"/></storyboard>
            </image></view>
            <view name="basic"><image name="a">
                <storyboard event="open"/>
                <storyboard event="close"><animation property="nope" to="1"/></storyboard>
            </image></view>"#,
        );
        let a = model.get_element("basic", "a", "").unwrap();
        let activate = a.storyboard("activate").unwrap();
        assert_eq!(activate.animations[0].easing, EasingMode::Bump);
        assert_eq!(activate.animations[0].to, Some(PropertyValue::Float(1.0)));
        assert!(a.storyboard("open").is_none());
        assert!(a.storyboard("close").is_none());
        assert!(a.has_activation_storyboard());
    }

    #[test]
    fn child_filters_gate_properties() {
        let model = resolve_files(
            &[(
                "/t/theme.xml",
                r#"<theme><formatVersion>7</formatVersion><view name="basic"><text name="t">
                    <color>111111</color>
                    <color region="us">222222</color>
                    <color lang="fr">333333</color>
                </text></view></theme>"#,
            )],
            ThemeContext::new("snes").with_language("fr_FR"),
        );
        assert_eq!(model.get_element("basic", "t", "").unwrap().color("color"), Some(Color(0x333333FF)));
        assert!(model.variants.contains("region", "us"));
    }
}
