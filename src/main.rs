//! CLI entry point for hueshell.

mod cli;

use clap::Parser;
use crossterm::style::{Color, Stylize};
use hueshell::background::BackgroundTransition;
use hueshell::catalog::Theme;
use hueshell::config::{initialize_default_global_config, load_config, Config, GlobalConfigInitResult};
use hueshell::engine::{Selection, ThemeEngine};
use hueshell::purchase::HttpPurchaseGateway;
use hueshell::render::StyleVariables;
use hueshell::store::{FileStore, MemoryStore, PersistenceStore};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Env var holding the tracing filter directive.
const LOG_ENV: &str = "HUESHELL_LOG";

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    init_tracing();

    if let cli::Command::Init { force } = args.command {
        run_init(force);
        return;
    }

    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    let color = !args.no_color;

    let surface = Arc::new(StyleVariables::new());
    let engine = match build_engine(&config, surface.clone()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    match args.command {
        cli::Command::List { json } => {
            if json {
                match serde_json::to_string_pretty(engine.themes()) {
                    Ok(text) => println!("{text}"),
                    Err(e) => {
                        eprintln!("error: {e}");
                        std::process::exit(1);
                    }
                }
            } else {
                print_theme_list(&engine, color);
            }
        }
        cli::Command::Current => {
            field("theme", engine.state().theme_name());
            for (name, value) in surface.snapshot() {
                field(&name, &value);
            }
        }
        cli::Command::Select { selector } => {
            let name = match engine.catalog().resolve_selector(&selector) {
                Ok(theme) => theme.name.clone(),
                Err(msg) => {
                    eprintln!("error: {msg}");
                    std::process::exit(2);
                }
            };
            if !engine.is_owned(&name) {
                eprintln!("purchasing `{name}`...");
            }
            match engine.select_theme(&name).await {
                Ok(Selection::Applied(theme)) => {
                    println!("switched theme: {}", theme.name);
                    println!("{}", swatches(&theme, color));
                }
                Ok(Selection::Ignored) | Ok(Selection::Superseded) => {
                    println!("theme unchanged: {}", engine.active().name);
                }
                Err(e) => {
                    eprintln!("error: `{}` was not applied: {e}", e.theme());
                    std::process::exit(1);
                }
            }
        }
        cli::Command::Css => println!("{}", surface.to_css()),
        cli::Command::Background { location } => {
            let transition =
                BackgroundTransition::new(&engine.active(), &location, config.background_settings());
            let state = transition.state();
            field("location", &location);
            field("image", &state.image_source);
            field("overlay", &state.overlay);
        }
        // Handled before config load so a broken config can still be replaced.
        cli::Command::Init { .. } => {}
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_engine(config: &Config, surface: Arc<StyleVariables>) -> Result<ThemeEngine, String> {
    let catalog = config.build_catalog().map_err(|e| e.to_string())?;
    let store: Arc<dyn PersistenceStore> = match config.store_path() {
        Some(path) => Arc::new(FileStore::open(path)),
        None => {
            warn!("no config directory available; selections will not persist");
            Arc::new(MemoryStore::new())
        }
    };
    let gateway = HttpPurchaseGateway::new(config.purchase.endpoint.clone(), config.purchase_timeout());
    Ok(ThemeEngine::start(
        Arc::new(catalog),
        store,
        Arc::new(gateway),
        surface,
        config.engine_settings(),
    ))
}

fn run_init(force: bool) {
    match initialize_default_global_config(force) {
        Ok(GlobalConfigInitResult::Created { path }) => {
            println!("created {}", path.display());
        }
        Ok(GlobalConfigInitResult::AlreadyInitialized { path }) => {
            println!(
                "{} already exists; pass --force to replace it",
                path.display()
            );
        }
        Ok(GlobalConfigInitResult::Overwritten { path, backup_path }) => {
            println!("replaced {} (backup: {})", path.display(), backup_path.display());
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn print_theme_list(engine: &ThemeEngine, color: bool) {
    let active = engine.active().name;
    if !engine.has_saved_selection() {
        println!("No palette chosen yet; pick one with `hueshell select <name|index>`.");
    }
    for (idx, theme) in engine.themes().iter().enumerate() {
        let marker = if theme.name == active { "*" } else { " " };
        let lock = if engine.is_owned(&theme.name) { "" } else { "  (locked)" };
        println!(
            "{}.{} {:<18} {}{}",
            idx + 1,
            marker,
            theme.name,
            swatches(theme, color),
            lock
        );
    }
}

fn swatches(theme: &Theme, color: bool) -> String {
    theme
        .colors
        .iter()
        .map(|c| {
            if color {
                let (r, g, b) = c.rgb();
                format!("{}", "  ".on(Color::Rgb { r, g, b }))
            } else {
                c.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(if color { "" } else { " " })
}

fn field(key: &str, value: &str) {
    println!("  {key}: {value}");
}
