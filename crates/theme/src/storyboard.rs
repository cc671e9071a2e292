//! Event-triggered property animations attached to elements.

use log::warn;
use serde::Serialize;
use vista_types::{PropertyKind, PropertyValue};

use crate::xml::XmlNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EasingMode {
    #[default]
    Linear,
    EaseIn,
    EaseInCubic,
    EaseInQuint,
    EaseOut,
    EaseOutCubic,
    EaseOutQuint,
    EaseInOut,
    Bump,
}

impl EasingMode {
    /// Case-insensitive; unknown names fall back to `Linear`.
    pub fn from_name(name: &str) -> EasingMode {
        match name.to_lowercase().as_str() {
            "easein" => EasingMode::EaseIn,
            "easeincubic" => EasingMode::EaseInCubic,
            "easeinquint" => EasingMode::EaseInQuint,
            "easeout" => EasingMode::EaseOut,
            "easeoutcubic" => EasingMode::EaseOutCubic,
            "easeoutquint" => EasingMode::EaseOutQuint,
            "easeinout" => EasingMode::EaseInOut,
            "bump" => EasingMode::Bump,
            _ => EasingMode::Linear,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Animation {
    pub property: String,
    pub kind: PropertyKind,
    pub from: Option<PropertyValue>,
    pub to: Option<PropertyValue>,
    /// Delay in milliseconds.
    pub begin: i32,
    pub duration: i32,
    /// Number of runs; 0 repeats forever.
    pub repeat: i32,
    pub auto_reverse: bool,
    pub easing: EasingMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Storyboard {
    pub event: String,
    /// Number of runs; 0 repeats forever.
    pub repeat: i32,
    /// Position in milliseconds the storyboard restarts from.
    pub repeat_at: i32,
    pub animations: Vec<Animation>,
}

impl Storyboard {
    /// Builds a storyboard from a `<storyboard>` node.
    ///
    /// `kind_of` gives the schema kind of an animated property, `convert`
    /// turns `from`/`to` text into a value of that kind. Animations on
    /// unknown or boolean properties are skipped with a warning, so the
    /// result may have no animations at all.
    pub fn from_node(
        node: &XmlNode,
        kind_of: impl Fn(&str) -> Option<PropertyKind>,
        mut convert: impl FnMut(PropertyKind, &str) -> PropertyValue,
    ) -> Storyboard {
        let mut storyboard = Storyboard {
            event: node.attr_or_empty("event").to_string(),
            repeat: parse_repeat(node.attr("repeat")).unwrap_or(1),
            repeat_at: 0,
            animations: Vec::new(),
        };

        let repeat_at = node.attr("repeatAt").or_else(|| node.attr("repeatat")).unwrap_or("");
        if !repeat_at.is_empty() {
            storyboard.repeat = 0;
            storyboard.repeat_at = parse_int_prefix(repeat_at);
        }

        for anim in node.children_named("animation") {
            let property = anim.attr_or_empty("property");
            if property.is_empty() {
                continue;
            }
            let Some(kind) = kind_of(property) else {
                warn!("Unknown storyboard property type \"{}\"", property);
                continue;
            };
            if kind == PropertyKind::Boolean {
                warn!("Unsupported animation property type \"{}\"", property);
                continue;
            }

            storyboard.animations.push(Animation {
                property: property.to_string(),
                kind,
                from: anim.attr("from").map(|t| convert(kind, t)),
                to: anim.attr("to").map(|t| convert(kind, t)),
                begin: anim.attr("begin").map(parse_int_prefix).unwrap_or(0),
                duration: anim.attr("duration").map(parse_int_prefix).unwrap_or(0),
                repeat: parse_repeat(anim.attr("repeat")).unwrap_or(1),
                auto_reverse: anim
                    .attr("autoreverse")
                    .or_else(|| anim.attr("autoReverse"))
                    .is_some_and(|v| v == "true" || v == "1"),
                easing: anim
                    .attr("mode")
                    .or_else(|| anim.attr("easingMode"))
                    .map(EasingMode::from_name)
                    .unwrap_or_default(),
            });
        }

        storyboard
    }
}

/// `"forever"` is 0, `"none"` and empty keep the default.
fn parse_repeat(attr: Option<&str>) -> Option<i32> {
    match attr? {
        "forever" => Some(0),
        "" | "none" => None,
        other => Some(parse_int_prefix(other)),
    }
}

/// Leading integer of `s`, 0 when there is none.
fn parse_int_prefix(s: &str) -> i32 {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse::<i32>().map(|v| sign * v).unwrap_or(0)
}
