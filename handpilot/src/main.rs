//! Handpilot - replay recorded hand frames through the gesture engine.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use handpilot::control::ScreenSize;
use handpilot::hand::Handedness;
use handpilot::replay::{self, ReplayConfig};
use handpilot::sink::TraceSink;
use handpilot::{EngineConfig, GestureEngine};

#[derive(Parser, Debug)]
#[command(name = "handpilot", about = "Hand-gesture pointer and media control engine")]
struct Cli {
    /// Frame file to replay, one s-expression per line ("-" for stdin)
    #[arg(long, default_value = "-")]
    frames: String,

    /// Config plist overriding the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dominant hand: left or right
    #[arg(long)]
    dominant_hand: Option<String>,

    /// Screen resolution as WxH
    #[arg(long)]
    screen: Option<String>,

    /// Delay between replayed frames in milliseconds
    #[arg(long)]
    frame_interval_ms: Option<u64>,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("handpilot {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "handpilot=info".into()),
        )
        .init();

    info!("handpilot v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(hand) = &cli.dominant_hand {
        config.dominant = Handedness::parse(hand)
            .with_context(|| format!("unknown dominant hand: {hand}. Use: left or right"))?;
    }
    if let Some(screen) = &cli.screen {
        config.screen = ScreenSize::parse(screen)
            .with_context(|| format!("invalid screen resolution: {screen}. Use: WxH"))?;
    }
    info!("config: {}", config.config_sexp());

    let replay_config = ReplayConfig {
        frame_interval: cli.frame_interval_ms.map(Duration::from_millis),
        ..Default::default()
    };

    let mut engine = GestureEngine::new(config, TraceSink::new(), TraceSink::new());

    // Signal handling via libc
    replay::install_signal_handlers();

    let summary = if cli.frames == "-" {
        info!("Reading frames from stdin");
        replay::run(&mut engine, io::stdin().lock(), &replay_config)?
    } else {
        let file = File::open(&cli.frames)
            .with_context(|| format!("cannot open frame file {}", cli.frames))?;
        info!("Reading frames from {}", cli.frames);
        replay::run(&mut engine, BufReader::new(file), &replay_config)?
    };

    info!(
        "Replayed {} frames ({} skipped): input {} settings {}",
        summary.frames,
        summary.skipped,
        engine.input().summary_sexp(),
        engine.settings().settings_sexp()
    );
    Ok(())
}
