mod common;

use common::{TestResult, init_logger, theme};
use std::fs;
use std::sync::Arc;
use vista::{EngineBuilder, ExtraFilter, ExtraKind, FilesystemResourceResolver, OverlayOptions, ThemeContext};

fn write_theme(dir: &std::path::Path) -> std::io::Result<()> {
    fs::create_dir_all(dir.join("art"))?;
    fs::create_dir_all(dir.join("snes"))?;
    fs::write(dir.join("art/bg.png"), b"png")?;
    fs::write(dir.join("snes/logo.svg"), b"svg")?;
    fs::write(
        dir.join("theme.xml"),
        theme(
            r#"<include>./$system/system.xml</include>
               <view name="basic">
                   <image name="background"><path>./art/bg.png</path></image>
                   <image name="missing"><path>./art/none.png</path></image>
               </view>
               <view name="system"><image name="logo" extra="true"><path>./${system.theme}/logo.svg</path></image></view>"#,
        ),
    )?;
    fs::write(
        dir.join("snes/system.xml"),
        r#"<theme><view name="basic"><text name="system_name"><text>Super Nintendo</text></text></view></theme>"#,
    )?;
    fs::write(
        dir.join("game.xml"),
        r#"<theme><view name="basic"><image name="boxart" extra="true"><path>./art/bg.png</path></image></view></theme>"#,
    )
}

#[test]
fn resolves_theme_from_disk() -> TestResult {
    init_logger();
    let dir = tempfile::tempdir()?;
    write_theme(dir.path())?;

    let engine = EngineBuilder::new()
        .with_theme_file(dir.path().join("theme.xml"))
        .with_resolver(Arc::new(FilesystemResourceResolver::new()))
        .with_context(ThemeContext::new("snes").with_variable("system.theme", "snes"))
        .build()?;
    let model = engine.model();

    let background = model.get_element("basic", "background", "image").ok_or("no background")?;
    let expected = dir.path().join("art/bg.png");
    assert_eq!(background.string("path"), Some(expected.to_string_lossy().as_ref()));
    assert!(!model.get_element("basic", "missing", "image").ok_or("no missing")?.has("path"));

    let name = model.get_element("basic", "system_name", "text").ok_or("include not applied")?;
    assert_eq!(name.string("text"), Some("Super Nintendo"));

    let logo = model.get_element("system", "logo", "image").ok_or("no logo")?;
    assert!(logo.string("path").is_some_and(|p| p.ends_with("snes/logo.svg")));
    assert_eq!(model.extras("system", ExtraFilter::ALL), vec!["logo"]);
    Ok(())
}

#[test]
fn per_game_overlay_marks_extras() -> TestResult {
    init_logger();
    let dir = tempfile::tempdir()?;
    write_theme(dir.path())?;

    let engine = EngineBuilder::new()
        .with_theme_file(dir.path().join("theme.xml"))
        .with_context(ThemeContext::new("snes"))
        .build()?;
    let before = engine.model();

    let after = engine.apply_overlay(&dir.path().join("game.xml"), OverlayOptions::per_game())?;
    let boxart = after.get_element("basic", "boxart", "image").ok_or("overlay not applied")?;
    assert_eq!(boxart.extra, ExtraKind::PerGame);
    assert_eq!(after.extras("basic", ExtraFilter::PER_GAME), vec!["boxart"]);
    assert!(before.get_element("basic", "boxart", "").is_none());

    assert!(engine.apply_overlay(&dir.path().join("absent.xml"), OverlayOptions::per_game()).is_err());
    assert!(Arc::ptr_eq(&after, &engine.model()));
    Ok(())
}

#[test]
fn missing_root_is_reported() {
    init_logger();
    let result = EngineBuilder::new()
        .with_theme_file("/definitely/not/here/theme.xml")
        .with_context(ThemeContext::new("snes"))
        .build();
    assert!(result.is_err());
}
