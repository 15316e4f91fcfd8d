use std::env;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use crate::api::{HttpSoundApi, SoundApi};
use crate::config::ConfigLoader;

pub mod commands;

use self::commands::{DeleteArgs, ListArgs, UploadArgs};

#[derive(Parser, Debug)]
#[command(
    name = "soundadmin",
    version,
    about = "Terminal admin panel for the sound-point catalog"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Override the config file location (takes precedence over SOUNDADMIN_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the data directory (takes precedence over SOUNDADMIN_DATA)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Sound API base URL for this run (overrides the config file)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive dashboard (default)
    Tui,
    /// Fetch the catalog and print one page of it
    List(ListArgs),
    /// Delete a sound by name
    Delete(DeleteArgs),
    /// Upload a new sound file
    Upload(UploadArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        env::set_var("SOUNDADMIN_CONFIG", path);
    }
    if let Some(path) = &cli.data_dir {
        env::set_var("SOUNDADMIN_DATA", path);
    }

    let loader = ConfigLoader::discover()?;
    loader.paths().ensure_directories()?;
    let paths = loader.paths().clone();
    let command = cli.command.unwrap_or(Commands::Tui);
    let log_target = match command {
        Commands::Tui => LogTarget::File(paths.log_dir.join("soundadmin.log")),
        _ => LogTarget::Stderr,
    };
    init_tracing(&cli.log_level, &log_target)
        .with_context(|| format!("initialising logging at level {}", cli.log_level))?;

    let mut config = loader.load_or_init()?;
    if let Some(base_url) = &cli.base_url {
        config.override_base_url(base_url)?;
    }
    let config = Arc::new(config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    let api: Arc<dyn SoundApi> = Arc::new(HttpSoundApi::new(
        config.api.base_url()?,
        config.api.request_timeout(),
    )?);

    match command {
        Commands::Tui => commands::run_tui(config, api, runtime.handle().clone()),
        Commands::List(args) => runtime.block_on(commands::list_sounds(api.as_ref(), args)),
        Commands::Delete(args) => runtime.block_on(commands::delete_sound(api.as_ref(), args)),
        Commands::Upload(args) => {
            runtime.block_on(commands::upload_sound(config, api.as_ref(), args))
        }
    }
}

enum LogTarget {
    Stderr,
    File(PathBuf),
}

fn init_tracing(level: &str, target: &LogTarget) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
        match target {
            LogTarget::Stderr => {
                fmt()
                    .with_env_filter(env_filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
            LogTarget::File(path) => {
                let file = open_log_file(path)?;
                fmt()
                    .with_env_filter(env_filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .init();
            }
        }
        Ok(())
    })
    .map(|_| ())
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}
