//! gesture-drive - steer arrow-key games with hand gestures in front of a webcam.

use clap::Parser;
use gesture_drive_lib::RunOptions;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gesture-drive", version, about = "Hand-gesture arrow-key controller")]
struct Cli {
    /// Config file (default: ~/.gesture_drive/config/settings.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay recorded hand frames from a JSON-lines file instead of the camera
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Log key events instead of injecting them
    #[arg(long)]
    dry_run: bool,

    /// Overwrite the config file with defaults before starting
    #[arg(long)]
    reset_config: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_drive=info,gesture_drive_lib=info".into()),
        )
        .init();

    info!("gesture-drive v{} starting", env!("CARGO_PKG_VERSION"));

    gesture_drive_lib::run(RunOptions {
        config_path: cli.config,
        replay: cli.replay,
        dry_run: cli.dry_run,
        reset_config: cli.reset_config,
    })?;

    Ok(())
}
