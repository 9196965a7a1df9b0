//! Caro engine: desktop game and JSON move server
//!
//! ## Usage
//!
//! - `caro` / `caro gui` - Open the game window
//! - `caro suggest` - Read one JSON move request on stdin, print the response

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use caro::config::{load_config, load_from_path, EngineConfig};
use caro::protocol::handle_request;
use caro::ui::CaroApp;
use caro::Engine;

/// Caro (free-style gomoku) move-selection engine
#[derive(Parser)]
#[command(name = "caro")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: $CARO_CONFIG, ./caro.toml, ../caro.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Board edge length
    #[arg(long, global = true)]
    board_size: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play in a desktop window
    Gui,
    /// Answer one JSON move request from stdin
    Suggest,
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the JSON response in `suggest` mode
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

fn resolve_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => load_from_path(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => load_config(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level.clone_from(level);
    }
    if let Some(size) = cli.board_size {
        config.board_size = size;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    init_tracing(&config.log_level)?;
    info!(
        board_size = config.board_size,
        cache_capacity = config.cache_capacity,
        "configuration loaded"
    );

    match cli.command {
        Some(Commands::Suggest) => run_suggest(config),
        Some(Commands::Gui) | None => run_gui(config),
    }
}

fn run_suggest(config: EngineConfig) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("reading request from stdin")?;

    let mut engine = Engine::new(config);
    let response = handle_request(&mut engine, &input).context("serving move request")?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{response}").context("writing response")?;
    Ok(())
}

fn run_gui(config: EngineConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([720.0, 560.0])
            .with_title("Caro"),
        ..Default::default()
    };

    eframe::run_native(
        "Caro",
        options,
        Box::new(move |cc| Ok(Box::new(CaroApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {e}"))
}
