pub mod core;
pub mod models;
pub mod platform;

use anyhow::Context;
use crate::core::config::Config;
use crate::core::gesture_loop::{log_session_summary, GestureController};
use crate::core::shutdown::ShutdownSignal;
use crate::models::gesture::SessionStats;
use crate::platform::hands::{DefaultLandmarkSource, LandmarkSource, ReplaySource};
use crate::platform::input::{get_input_sink, InputSink, LoggingSink};
use std::path::PathBuf;
use tracing::info;

/// Options for one controller session
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Config file to use instead of the default location
    pub config_path: Option<PathBuf>,
    /// Replay recorded frames instead of reading the camera
    pub replay: Option<PathBuf>,
    /// Log key events instead of injecting them
    pub dry_run: bool,
    /// Overwrite the config file with defaults before starting
    pub reset_config: bool,
}

fn load_config(options: &RunOptions) -> anyhow::Result<Config> {
    // Box<dyn Error> is not Send + Sync, so carry its message over
    let path = match &options.config_path {
        Some(path) => path.clone(),
        None => Config::get_config_path()
            .map_err(|e| anyhow::anyhow!("Failed to locate configuration: {}", e))?,
    };

    let loaded = if options.reset_config {
        info!("Resetting configuration at {}", path.display());
        Config::reset_at(&path)
    } else {
        Config::load_from(&path)
    };

    loaded.map_err(|e| anyhow::anyhow!("Failed to load configuration {}: {}", path.display(), e))
}

fn build_source(options: &RunOptions, config: &Config) -> anyhow::Result<Box<dyn LandmarkSource>> {
    let source: Box<dyn LandmarkSource> = match &options.replay {
        Some(path) => Box::new(
            ReplaySource::open(path)
                .with_context(|| format!("Failed to open replay file {}", path.display()))?,
        ),
        None => Box::new(
            DefaultLandmarkSource::new(config).context("Failed to initialize hand tracking")?,
        ),
    };
    Ok(source)
}

fn build_sink(options: &RunOptions) -> anyhow::Result<Box<dyn InputSink>> {
    if options.dry_run {
        return Ok(Box::new(LoggingSink));
    }
    get_input_sink().context("Failed to initialize keyboard injection")
}

/// Run the gesture controller until a termination signal or until the landmark source ends
pub fn run(options: RunOptions) -> anyhow::Result<SessionStats> {
    let config = load_config(&options)?;
    info!(
        "Bindings: left={} right={} accelerate={} brake={}",
        config.bindings.steer_left.to_string(),
        config.bindings.steer_right.to_string(),
        config.bindings.accelerate.to_string(),
        config.bindings.brake.to_string()
    );

    let shutdown = ShutdownSignal::new();
    shutdown
        .install_signal_handlers()
        .context("Failed to install signal handlers")?;

    let source = build_source(&options, &config)?;
    let sink = build_sink(&options)?;

    let mut controller = GestureController::new(source, sink, config.bindings);
    let stats = controller.run(&shutdown);
    log_session_summary(&stats);

    Ok(stats)
}
