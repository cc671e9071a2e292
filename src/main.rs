use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use vista::{EngineBuilder, EngineError, FilesystemResourceResolver, OverlayOptions, ThemeContext, VariantOverrides};

/// Resolves a theme for one host context and prints the result as JSON.
#[derive(Parser, Debug)]
#[command(name = "vista", version, about)]
struct Cli {
    /// Root theme document (theme.xml)
    theme: PathBuf,

    /// System folder, also the scope of per-system variant choices
    #[arg(long, default_value = "")]
    system: String,

    #[arg(long, default_value = "eu")]
    region: String,

    /// Language tag such as fr_FR
    #[arg(long, default_value = "en_US")]
    lang: String,

    /// Variant choice, `group=value` or `scope.group=value`
    #[arg(long = "set", value_parser = parse_key_value)]
    set: Vec<(String, String)>,

    /// Seed variable, `name=value`
    #[arg(long = "var", value_parser = parse_key_value)]
    var: Vec<(String, String)>,

    #[arg(long)]
    tiny_screen: bool,

    /// Pretend the screen is taller than wide
    #[arg(long)]
    vertical_screen: bool,

    /// Hide help prompts
    #[arg(long)]
    no_help: bool,

    /// Directory backing `:/` resources
    #[arg(long)]
    resources: Option<PathBuf>,

    /// Theme file applied on top of the resolved theme, with per-game extras
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Print only this view
    #[arg(long)]
    view: Option<String>,

    /// Also print the computed menu settings
    #[arg(long)]
    menu: bool,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected `name=value`, got '{}'", s))
}

fn context_from(cli: &Cli) -> ThemeContext {
    let overrides = cli.set.iter().fold(VariantOverrides::new(), |o, (key, value)| match key.split_once('.') {
        Some((scope, group)) => o.with_scoped(scope, group, value.as_str()),
        None => o.with_global(key, value.as_str()),
    });

    let (width, height) = if cli.vertical_screen { (720, 1280) } else { (1280, 720) };
    let context = ThemeContext::new(cli.system.as_str())
        .with_region(cli.region.as_str())
        .with_language(cli.lang.as_str())
        .with_screen(width, height)
        .with_tiny_screen(cli.tiny_screen)
        .with_help_prompts(!cli.no_help)
        .with_overrides(overrides);

    cli.var
        .iter()
        .fold(context, |c, (name, value)| c.with_variable(name.as_str(), value.as_str()))
}

fn main() -> Result<(), EngineError> {
    env_logger::init();
    let cli = Cli::parse();

    let mut resolver = FilesystemResourceResolver::new();
    if let Some(dir) = &cli.resources {
        resolver = resolver.with_resource_root(dir);
    }
    if let Some(home) = std::env::var_os("HOME") {
        resolver = resolver.with_home(home);
    }

    let engine = EngineBuilder::new()
        .with_theme_file(&cli.theme)
        .with_resolver(Arc::new(resolver))
        .with_context(context_from(&cli))
        .build()?;

    if let Some(overlay) = &cli.overlay {
        engine.apply_overlay(overlay, OverlayOptions::per_game())?;
    }

    let model = engine.model();
    let output = match &cli.view {
        Some(name) => {
            let view = model
                .view(name)
                .ok_or_else(|| EngineError::Config(format!("theme has no view named '{}'", name)))?;
            serde_json::to_value(view)?
        }
        None => serde_json::to_value(model.as_ref())?,
    };

    let output = if cli.menu {
        json!({ "theme": output, "menu": serde_json::to_value(engine.menu_theme().as_ref())? })
    } else {
        output
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
