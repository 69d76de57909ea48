use std::fs::File;
use std::io::stdout;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use simplelog::{Config, WriteLogger};

use cobrita::app::App;
use cobrita::config::AppConfig;

#[derive(Parser)]
#[command(name = "cobrita")]
#[command(version, about = "Snake on a wrap-around grid")]
struct Cli {
    /// Directory holding default.toml and user.toml
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// Seed for reproducible snake and food positions
    #[arg(long)]
    seed: Option<u64>,

    /// Write the log here instead of the configured file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(&cli.config_dir)
        .with_context(|| format!("Failed to load config from {}", cli.config_dir.display()))?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(path) = cli.log_file {
        config.log.file = path;
    }

    // Set up logging before anything else; the terminal is the game screen
    let level = config.log.level_filter()?;
    let log_file = File::create(&config.log.file)
        .with_context(|| format!("Failed to create log file {}", config.log.file.display()))?;
    WriteLogger::init(level, Config::default(), log_file).context("Failed to initialize logger")?;

    log::info!("Starting {}", config.window.title);
    log::debug!("{:?}", config);

    let mut app = App::new(&config, stdout());
    app.run().context("Game loop failed")?;

    Ok(())
}
