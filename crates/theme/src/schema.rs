//! Static element schema: which properties each element type accepts and
//! how their text is typed.

use std::collections::HashMap;
use std::sync::LazyLock;
use vista_types::PropertyKind;

const PAIR: PropertyKind = PropertyKind::NormalizedPair;
const RECT: PropertyKind = PropertyKind::NormalizedRect;
const PATH: PropertyKind = PropertyKind::Path;
const STRING: PropertyKind = PropertyKind::String;
const COLOR: PropertyKind = PropertyKind::Color;
const FLOAT: PropertyKind = PropertyKind::Float;
const BOOLEAN: PropertyKind = PropertyKind::Boolean;

pub type PropertyTable = HashMap<&'static str, PropertyKind>;

pub const SUPPORTED_VIEWS: &[&str] = &[
    "system", "basic", "detailed", "grid", "video", "gamecarousel", "menu", "screen", "splash",
];

/// Views that are part of the shell rather than selectable game list views.
pub const INTERNAL_VIEWS: &[&str] = &["menu", "system", "screen", "splash"];

pub const SUPPORTED_FEATURES: &[&str] = &["video", "carousel", "gamecarousel", "z-index", "visible", "manufacturer"];

pub const ITEM_TEMPLATE_HOSTS: &[&str] = &["imagegrid", "carousel", "gamecarousel", "textlist"];

/// Element types that are extras even without `extra="true"`.
pub const AUTO_EXTRA_TYPES: &[&str] = &[
    "stackpanel", "container", "screenshader", "clock", "networkIcon", "webimage", "batteryText", "batteryIcon",
    "rectangle",
];

/// Types whose children are shader uniforms of arbitrary name.
pub const SHADER_TYPES: &[&str] = &["shader", "screenshader", "menuShader", "fadeShader"];

/// Element types that inherit the property table of another type.
pub const BASE_CLASSES: &[(&str, &str)] = &[
    ("clock", "text"),
    ("batteryText", "text"),
    ("batteryIcon", "image"),
    ("networkIcon", "image"),
    ("webimage", "image"),
];

const ELEMENTS: &[(&str, &[(&str, PropertyKind)])] = &[
    ("splash", &[("backgroundColor", COLOR)]),
    // Overrides common properties of existing elements without changing their type.
    ("control", &[
        ("pos", PAIR), ("size", PAIR), ("x", FLOAT), ("y", FLOAT), ("h", FLOAT), ("w", FLOAT),
        ("scale", FLOAT), ("scaleOrigin", PAIR), ("rotation", FLOAT), ("rotationOrigin", PAIR),
        ("opacity", FLOAT), ("zIndex", FLOAT), ("visible", BOOLEAN), ("offset", PAIR),
        ("offsetX", FLOAT), ("offsetY", FLOAT), ("clipChildren", BOOLEAN), ("clipRect", RECT),
    ]),
    ("stackpanel", &[
        ("pos", PAIR), ("size", PAIR), ("x", FLOAT), ("y", FLOAT), ("h", FLOAT), ("w", FLOAT),
        ("orientation", STRING), ("reverse", BOOLEAN), ("separator", FLOAT), ("opacity", FLOAT),
        ("visible", BOOLEAN), ("clipChildren", BOOLEAN), ("zIndex", FLOAT),
    ]),
    ("rectangle", &[
        ("pos", PAIR), ("size", PAIR), ("x", FLOAT), ("y", FLOAT), ("h", FLOAT), ("w", FLOAT),
        ("color", COLOR), ("borderColor", COLOR), ("borderSize", FLOAT), ("roundCorners", FLOAT),
        ("opacity", FLOAT), ("visible", BOOLEAN), ("padding", RECT), ("clipChildren", BOOLEAN),
        ("zIndex", FLOAT),
    ]),
    ("screenshader", &[
        ("path", PATH), ("pos", PAIR), ("size", PAIR), ("visible", BOOLEAN), ("clipRect", RECT),
        ("zIndex", FLOAT),
    ]),
    ("shader", &[]),
    ("image", &[
        ("pos", PAIR), ("size", PAIR), ("x", FLOAT), ("y", FLOAT), ("h", FLOAT), ("w", FLOAT),
        ("scale", FLOAT), ("scaleOrigin", PAIR), ("padding", RECT), ("offset", PAIR),
        ("offsetX", FLOAT), ("offsetY", FLOAT), ("clipRect", RECT), ("maxSize", PAIR),
        ("minSize", PAIR), ("origin", PAIR), ("rotation", FLOAT), ("rotationOrigin", PAIR),
        ("path", PATH), ("default", PATH), ("tile", BOOLEAN), ("color", COLOR), ("colorEnd", COLOR),
        ("gradientType", STRING), ("visible", BOOLEAN), ("reflexion", PAIR),
        ("reflexionOnFrame", BOOLEAN), ("horizontalAlignment", STRING), ("verticalAlignment", STRING),
        ("roundCorners", FLOAT), ("opacity", FLOAT), ("saturation", FLOAT), ("flipX", BOOLEAN),
        ("flipY", BOOLEAN), ("autoFade", BOOLEAN), ("onclick", STRING), ("linearSmooth", BOOLEAN),
        ("shared", BOOLEAN), ("zIndex", FLOAT),
    ]),
    ("imagegrid", &[
        ("pos", PAIR), ("size", PAIR), ("x", FLOAT), ("y", FLOAT), ("h", FLOAT), ("w", FLOAT),
        ("scale", FLOAT), ("scaleOrigin", PAIR), ("opacity", FLOAT), ("margin", PAIR),
        ("padding", RECT), ("cellProportion", FLOAT), ("autoLayout", PAIR),
        ("autoLayoutSelectedZoom", FLOAT), ("animateSelection", BOOLEAN), ("imageSource", STRING),
        ("zIndex", FLOAT), ("gameImage", PATH), ("folderImage", PATH), ("logoBackgroundImage", PATH),
        ("showVideoAtDelay", FLOAT), ("scrollDirection", STRING), ("scrollSound", PATH),
        ("scrollbarColor", COLOR), ("scrollbarSize", FLOAT), ("scrollbarCorner", FLOAT),
        ("scrollbarAlignment", STRING), ("centerSelection", STRING), ("scrollLoop", BOOLEAN),
    ]),
    ("gridtile", &[
        ("size", PAIR), ("padding", RECT), ("imageColor", COLOR), ("backgroundImage", PATH),
        ("backgroundCornerSize", PAIR), ("backgroundColor", COLOR), ("backgroundCenterColor", COLOR),
        ("backgroundEdgeColor", COLOR), ("selectionMode", STRING), ("imageSizeMode", STRING),
        ("reflexion", PAIR),
    ]),
    ("clock", &[]),
    ("networkIcon", &[("networkIcon", PATH), ("planemodeIcon", PATH)]),
    ("webimage", &[("path", STRING)]),
    ("batteryText", &[]),
    ("batteryIcon", &[
        ("incharge", PATH), ("full", PATH), ("at75", PATH), ("at50", PATH), ("at25", PATH),
        ("empty", PATH),
    ]),
    ("text", &[
        ("pos", PAIR), ("size", PAIR), ("offset", PAIR), ("offsetX", FLOAT), ("offsetY", FLOAT),
        ("clipRect", RECT), ("x", FLOAT), ("y", FLOAT), ("h", FLOAT), ("w", FLOAT), ("scale", FLOAT),
        ("scaleOrigin", PAIR), ("opacity", FLOAT), ("origin", PAIR), ("rotation", FLOAT),
        ("rotationOrigin", PAIR), ("text", STRING), ("emptyTextDefaults", BOOLEAN),
        ("backgroundColor", COLOR), ("fontPath", PATH), ("fontSize", FLOAT), ("color", COLOR),
        ("extraTextColor", COLOR), ("alignment", STRING), ("verticalAlignment", STRING),
        ("forceUppercase", BOOLEAN), ("lineSpacing", FLOAT), ("value", STRING), ("reflexion", PAIR),
        ("reflexionOnFrame", BOOLEAN), ("glowColor", COLOR), ("glowSize", FLOAT), ("glowOffset", PAIR),
        ("multiLine", STRING), ("singleLineScroll", BOOLEAN), ("autoScroll", STRING),
        ("autoScrollDelay", FLOAT), ("autoScrollSpeed", FLOAT), ("padding", RECT), ("onclick", STRING),
        ("visible", BOOLEAN), ("zIndex", FLOAT),
    ]),
    ("textlist", &[
        ("pos", PAIR), ("size", PAIR), ("x", FLOAT), ("y", FLOAT), ("h", FLOAT), ("w", FLOAT),
        ("scale", FLOAT), ("scaleOrigin", PAIR), ("opacity", FLOAT), ("rotation", FLOAT),
        ("rotationOrigin", PAIR), ("origin", PAIR), ("selectorHeight", FLOAT),
        ("selectorOffsetY", FLOAT), ("selectorColor", COLOR), ("selectorColorEnd", COLOR),
        ("selectorGradientType", STRING), ("selectorImagePath", PATH), ("selectorImageTile", BOOLEAN),
        ("selectedColor", COLOR), ("primaryColor", COLOR), ("secondaryColor", COLOR),
        ("fontPath", PATH), ("fontSize", FLOAT), ("scrollSound", PATH), ("alignment", STRING),
        ("horizontalMargin", FLOAT), ("forceUppercase", BOOLEAN), ("lineSpacing", FLOAT),
        ("lines", FLOAT), ("scrollbarColor", COLOR), ("scrollbarSize", FLOAT),
        ("scrollbarCorner", FLOAT), ("scrollbarAlignment", STRING), ("glowColor", COLOR),
        ("glowSize", FLOAT), ("glowOffset", PAIR), ("extraTextColor", COLOR),
        ("extraTextSelectedColor", COLOR), ("zIndex", FLOAT),
    ]),
    ("container", &[
        ("pos", PAIR), ("size", PAIR), ("x", FLOAT), ("y", FLOAT), ("h", FLOAT), ("w", FLOAT),
        ("origin", PAIR), ("visible", BOOLEAN), ("scale", FLOAT), ("opacity", FLOAT),
        ("clipChildren", BOOLEAN), ("scaleOrigin", PAIR), ("padding", RECT), ("zIndex", FLOAT),
    ]),
    ("ninepatch", &[
        ("pos", PAIR), ("size", PAIR), ("x", FLOAT), ("y", FLOAT), ("h", FLOAT), ("w", FLOAT),
        ("scale", FLOAT), ("scaleOrigin", PAIR), ("opacity", FLOAT), ("rotation", FLOAT),
        ("rotationOrigin", PAIR), ("padding", RECT), ("path", PATH), ("visible", BOOLEAN),
        ("color", COLOR), ("cornerSize", PAIR), ("centerColor", COLOR), ("edgeColor", COLOR),
        ("animateColor", COLOR), ("animateColorTime", FLOAT), ("zIndex", FLOAT),
    ]),
    ("datetime", &[
        ("pos", PAIR), ("size", PAIR), ("x", FLOAT), ("y", FLOAT), ("h", FLOAT), ("w", FLOAT),
        ("scale", FLOAT), ("scaleOrigin", PAIR), ("opacity", FLOAT), ("origin", PAIR),
        ("rotation", FLOAT), ("rotationOrigin", PAIR), ("backgroundColor", COLOR),
        ("fontPath", PATH), ("fontSize", FLOAT), ("color", COLOR), ("alignment", STRING),
        ("forceUppercase", BOOLEAN), ("lineSpacing", FLOAT), ("value", STRING), ("format", STRING),
        ("displayRelative", BOOLEAN), ("visible", BOOLEAN), ("zIndex", FLOAT),
    ]),
    ("rating", &[
        ("pos", PAIR), ("size", PAIR), ("offset", PAIR), ("offsetX", FLOAT), ("offsetY", FLOAT),
        ("clipRect", RECT), ("x", FLOAT), ("y", FLOAT), ("h", FLOAT), ("w", FLOAT), ("scale", FLOAT),
        ("scaleOrigin", PAIR), ("opacity", FLOAT), ("value", FLOAT), ("padding", RECT),
        ("origin", PAIR), ("rotation", FLOAT), ("rotationOrigin", PAIR), ("color", COLOR),
        ("unfilledColor", COLOR), ("filledPath", PATH), ("unfilledPath", PATH),
        ("horizontalAlignment", STRING), ("visible", BOOLEAN), ("zIndex", FLOAT),
    ]),
    ("sound", &[("path", PATH)]),
    ("gameextras", &[("path", PATH)]),
    ("controllerActivity", &[
        ("pos", PAIR), ("size", PAIR), ("itemSpacing", FLOAT), ("horizontalAlignment", STRING),
        ("imagePath", PATH), ("gunPath", PATH), ("wheelPath", PATH), ("color", COLOR),
        ("activityColor", COLOR), ("hotkeyColor", COLOR), ("networkIcon", PATH),
        ("planemodeIcon", PATH), ("incharge", PATH), ("full", PATH), ("at75", PATH), ("at50", PATH),
        ("at25", PATH), ("empty", PATH), ("visible", BOOLEAN), ("zIndex", FLOAT),
    ]),
    ("batteryIndicator", &[
        ("pos", PAIR), ("size", PAIR), ("itemSpacing", FLOAT), ("horizontalAlignment", STRING),
        ("imagePath", PATH), ("color", COLOR), ("activityColor", COLOR), ("hotkeyColor", COLOR),
        ("networkIcon", PATH), ("planemodeIcon", PATH), ("incharge", PATH), ("full", PATH),
        ("at75", PATH), ("at50", PATH), ("at25", PATH), ("empty", PATH), ("visible", BOOLEAN),
        ("zIndex", FLOAT),
    ]),
    ("helpsystem", &[
        ("pos", PAIR), ("origin", PAIR), ("textColor", COLOR), ("iconColor", COLOR),
        ("glowColor", COLOR), ("glowSize", FLOAT), ("glowOffset", PAIR), ("fontPath", PATH),
        ("fontSize", FLOAT), ("iconUpDown", PATH), ("iconLeftRight", PATH),
        ("iconUpDownLeftRight", PATH), ("iconA", PATH), ("iconB", PATH), ("iconX", PATH),
        ("iconY", PATH), ("iconL", PATH), ("iconR", PATH), ("iconStart", PATH), ("iconSelect", PATH),
        ("iconF1", PATH),
    ]),
    ("video", &[
        ("pos", PAIR), ("size", PAIR), ("x", FLOAT), ("y", FLOAT), ("h", FLOAT), ("w", FLOAT),
        ("offset", PAIR), ("offsetX", FLOAT), ("offsetY", FLOAT), ("clipRect", RECT), ("scale", FLOAT),
        ("scaleOrigin", PAIR), ("padding", RECT), ("opacity", FLOAT), ("origin", PAIR),
        ("rotation", FLOAT), ("rotationOrigin", PAIR), ("visible", BOOLEAN), ("enabled", BOOLEAN),
        ("zIndex", FLOAT), ("maxSize", PAIR), ("minSize", PAIR), ("default", PATH), ("path", PATH),
        ("delay", FLOAT), ("effect", STRING), ("roundCorners", FLOAT), ("color", COLOR),
        ("snapshotSource", STRING), ("defaultSnapshot", PATH), ("loops", FLOAT), ("audio", BOOLEAN),
        ("linearSmooth", BOOLEAN), ("saturation", FLOAT), ("onclick", STRING),
        ("showSnapshotNoVideo", BOOLEAN), ("showSnapshotDelay", BOOLEAN),
    ]),
    ("carousel", &[
        ("type", STRING), ("size", PAIR), ("pos", PAIR), ("origin", PAIR), ("color", COLOR),
        ("colorEnd", COLOR), ("gradientType", STRING), ("logoScale", FLOAT), ("logoRotation", FLOAT),
        ("logoRotationOrigin", PAIR), ("logoSize", PAIR), ("logoPos", PAIR), ("logoAlignment", STRING),
        ("maxLogoCount", FLOAT), ("defaultTransition", STRING), ("minLogoOpacity", FLOAT),
        ("transitionSpeed", FLOAT), ("scaledLogoSpacing", FLOAT), ("scrollSound", PATH),
        ("zIndex", FLOAT), ("systemInfoDelay", FLOAT), ("systemInfoCountOnly", BOOLEAN),
    ]),
    ("gamecarousel", &[
        ("type", STRING), ("size", PAIR), ("pos", PAIR), ("origin", PAIR), ("color", COLOR),
        ("colorEnd", COLOR), ("gradientType", STRING), ("logoScale", FLOAT), ("logoRotation", FLOAT),
        ("logoRotationOrigin", PAIR), ("logoSize", PAIR), ("logoPos", PAIR), ("logoAlignment", STRING),
        ("maxLogoCount", FLOAT), ("defaultTransition", STRING), ("minLogoOpacity", FLOAT),
        ("transitionSpeed", FLOAT), ("scaledLogoSpacing", FLOAT), ("scrollSound", PATH),
        ("zIndex", FLOAT), ("imageSource", STRING),
    ]),
    ("menuText", &[
        ("fontPath", PATH), ("fontSize", FLOAT), ("separatorColor", COLOR), ("selectorColor", COLOR),
        ("selectorColorEnd", COLOR), ("selectorGradientType", STRING), ("selectedColor", COLOR),
        ("color", COLOR),
    ]),
    ("menuTextSmall", &[("fontPath", PATH), ("fontSize", FLOAT), ("color", COLOR)]),
    ("menuGroup", &[
        ("fontPath", PATH), ("fontSize", FLOAT), ("lineSpacing", FLOAT), ("alignment", STRING),
        ("backgroundColor", COLOR), ("separatorColor", COLOR), ("visible", BOOLEAN), ("color", COLOR),
    ]),
    ("menuBackground", &[
        ("path", PATH), ("fadePath", PATH), ("color", COLOR), ("centerColor", COLOR),
        ("cornerSize", PAIR), ("scrollbarColor", COLOR), ("scrollbarSize", FLOAT),
        ("scrollbarCorner", FLOAT), ("scrollbarAlignment", STRING),
    ]),
    ("menuIcons", &[
        ("iconSystem", PATH), ("iconUpdates", PATH), ("iconControllers", PATH), ("iconGames", PATH),
        ("iconUI", PATH), ("iconSound", PATH), ("iconNetwork", PATH), ("iconScraper", PATH),
        ("iconAdvanced", PATH), ("iconQuit", PATH),
    ]),
    ("menuSwitch", &[("pathOn", PATH), ("pathOff", PATH)]),
    ("menuTextEdit", &[("active", PATH), ("inactive", PATH)]),
    ("menuSlider", &[("path", PATH)]),
    ("menuButton", &[("cornerSize", PAIR), ("path", PATH), ("filledPath", PATH)]),
];

static ELEMENT_SCHEMA: LazyLock<HashMap<&'static str, PropertyTable>> = LazyLock::new(|| {
    ELEMENTS
        .iter()
        .map(|(tag, props)| (*tag, props.iter().copied().collect()))
        .collect()
});

/// Property table for an element tag, if the tag is a known element type.
pub fn element_properties(tag: &str) -> Option<&'static PropertyTable> {
    ELEMENT_SCHEMA.get(tag)
}

pub fn is_element(tag: &str) -> bool {
    ELEMENT_SCHEMA.contains_key(tag)
}

pub fn base_class(element_type: &str) -> Option<&'static str> {
    BASE_CLASSES
        .iter()
        .find(|(derived, _)| *derived == element_type)
        .map(|(_, base)| *base)
}

/// Looks `property` up through the base class chain of `element_type`,
/// not including `element_type`'s own table.
pub fn inherited_kind(element_type: &str, property: &str) -> Option<PropertyKind> {
    let mut current = element_type;
    while let Some(base) = base_class(current) {
        if let Some(kind) = element_properties(base).and_then(|t| t.get(property)) {
            return Some(*kind);
        }
        current = base;
    }
    None
}

/// Kind of `property` on `element_type`, own table first.
pub fn property_kind(element_type: &str, property: &str) -> Option<PropertyKind> {
    element_properties(element_type)
        .and_then(|t| t.get(property).copied())
        .or_else(|| inherited_kind(element_type, property))
}

pub fn is_supported_view(name: &str) -> bool {
    SUPPORTED_VIEWS.contains(&name)
}

pub fn is_auto_extra(element_type: &str) -> bool {
    AUTO_EXTRA_TYPES.contains(&element_type)
}
