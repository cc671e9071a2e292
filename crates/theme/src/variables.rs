//! The variable environment and `${name}` placeholder expansion.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use vista_expr::{Value, VariableSource};
use vista_types::parse_float_prefix;

/// Variable names whose values are numeric for expression purposes.
const NUMERIC_VARIABLES: &[&str] = &["screen.width", "screen.height"];

/// Name → value mapping visible to placeholders and expressions.
///
/// Every variable has a text form used by `${name}` expansion and a typed
/// form used by `if` expressions. The two are kept in sync except when an
/// expression result is stored, where the typed value is the exact result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    text: IndexMap<String, String>,
    typed: HashMap<String, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let typed = if NUMERIC_VARIABLES.contains(&name.as_str()) {
            Value::Number(parse_float_prefix(&value))
        } else {
            Value::from_variable_text(&value)
        };
        self.typed.insert(name.clone(), typed);
        self.text.insert(name, value);
    }

    /// Stores a string value without `true`/`false` interpretation.
    pub fn set_string(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        self.typed.insert(name.clone(), Value::Str(value.clone()));
        self.text.insert(name, value);
    }

    /// Stores the result of an expression.
    pub fn set_value(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        self.text.insert(name.clone(), value.to_string());
        self.typed.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.text.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.text.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.text.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Expands `${name}` placeholders in `text`; see [`expand`].
    pub fn expand(&self, text: &str) -> String {
        expand(text, |name| self.get(name))
    }
}

/// Serialized as the text form of every variable.
impl Serialize for Variables {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl VariableSource for Variables {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.typed.get(name).cloned()
    }
}

/// Replaces each `${name}` with its value (empty when unknown).
///
/// Scanning resumes after the closing `}`, so substituted text is never
/// expanded again. A `${` without a closing `}` is copied verbatim.
pub fn expand<'v>(text: &str, lookup: impl Fn(&str) -> Option<&'v str>) -> String {
    let Some(first) = text.find("${") else {
        return text.to_string();
    };

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..first]);
    let mut rest = &text[first..];

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find('}') {
            Some(end) => {
                out.push_str(lookup(&after_open[..end]).unwrap_or(""));
                rest = &after_open[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Variables {
        let mut vars = Variables::new();
        for (k, v) in pairs {
            vars.set(*k, *v);
        }
        vars
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let vars = env(&[("a", "x")]);
        assert_eq!(vars.expand("plain $text {a}"), "plain $text {a}");
        assert_eq!(vars.expand(""), "");
    }

    #[test]
    fn substitutes_known_and_unknown_names() {
        let vars = env(&[("color", "FF0000"), ("dir", "./art")]);
        assert_eq!(vars.expand("${dir}/bg.png"), "./art/bg.png");
        assert_eq!(vars.expand("#${color}${missing}!"), "#FF0000!");
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let vars = env(&[("a", "${b}"), ("b", "x")]);
        assert_eq!(vars.expand("${a}"), "${b}");
        assert_eq!(vars.expand("${a}${b}"), "${b}x");
    }

    #[test]
    fn unterminated_placeholder_is_verbatim() {
        let vars = env(&[("a", "x")]);
        assert_eq!(vars.expand("${a} and ${a"), "x and ${a");
    }

    #[test]
    fn typed_values_follow_text() {
        let mut vars = env(&[("system.cheevos", "true"), ("screen.width", "1280"), ("name", "snes")]);
        assert_eq!(vars.lookup("system.cheevos"), Some(Value::Number(1.0)));
        assert_eq!(vars.lookup("screen.width"), Some(Value::Number(1280.0)));
        assert_eq!(vars.lookup("name"), Some(Value::Str("snes".into())));

        vars.set_value("ratio", Value::Number(0.5));
        assert_eq!(vars.get("ratio"), Some("0.500000"));

        vars.set_string("flag", "true");
        assert_eq!(vars.lookup("flag"), Some(Value::Str("true".into())));
        assert_eq!(vars.len(), 5);
    }
}
