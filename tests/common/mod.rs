#![allow(dead_code)]

use std::path::PathBuf;
use vista::{DocumentSource, InMemoryResourceResolver, ThemeContext, ThemeError, ThemeModel, ThemeParser};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const ROOT: &str = "/themes/test/theme.xml";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Wraps `body` in a `<theme>` root with a current format version.
pub fn theme(body: &str) -> String {
    format!("<theme><formatVersion>7</formatVersion>{}</theme>", body)
}

/// An in-memory theme tree. `files` are relative to the root document's
/// directory and the root document itself is `theme.xml`.
pub fn resolver(root: &str, files: &[(&str, &str)]) -> InMemoryResourceResolver {
    files
        .iter()
        .fold(InMemoryResourceResolver::new().with(ROOT, root), |r, (name, text)| {
            r.with(format!("/themes/test/{}", name), *text)
        })
}

pub fn resolve_with(resolver: &InMemoryResourceResolver, context: &ThemeContext) -> Result<ThemeModel, ThemeError> {
    init_logger();
    ThemeParser::new(resolver, context).parse(&DocumentSource::File(PathBuf::from(ROOT)))
}

pub fn resolve(root: &str, files: &[(&str, &str)], context: &ThemeContext) -> Result<ThemeModel, ThemeError> {
    resolve_with(&resolver(root, files), context)
}

/// Colorset include files setting `${main}`.
pub fn colorsets() -> Vec<(&'static str, &'static str)> {
    vec![
        ("dark.xml", "<theme><variables><main>000000</main></variables></theme>"),
        ("light.xml", "<theme><variables><main>FFFFFF</main></variables></theme>"),
        ("icons.xml", "<theme><variables><icon>round</icon></variables></theme>"),
    ]
}
