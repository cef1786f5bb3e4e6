//! logi-mouse-replay
//!
//! Feeds a script of captured reports through a device session and prints
//! every emitted event frame as one JSON line on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::sync::Arc;
use tracing::{info, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use logi_mouse::config::Config;
use logi_mouse::input::{ChannelSink, DeviceSession};
use logi_mouse::replay;

/// Command-line arguments for logi-mouse-replay
#[derive(Parser, Debug)]
#[command(name = "logi-mouse-replay")]
#[command(version, about = "Replay captured mouse/keypad reports", long_about = None)]
pub struct Args {
    /// Replay script path ("-" for stdin)
    pub script: String,

    /// Configuration file path
    #[arg(short, long, env = "LOGI_MOUSE_CONFIG")]
    pub config: Option<String>,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Write logs to file (in addition to stderr)
    #[arg(long)]
    pub log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default_config(),
    };

    // Override config with CLI args
    let level = match args.verbose {
        0 => None,
        1 => Some("debug".to_string()),
        _ => Some("trace".to_string()),
    };
    let config = config.with_overrides(level, args.log_format.clone());
    config.validate()?;

    init_logging(&args, &config)?;

    info!("logi-mouse-replay v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Config: {:?}", config);

    let script = read_script(&args.script)?;
    let steps = replay::parse_script(&script)?;
    info!("Loaded {} replay steps from {}", steps.len(), args.script);

    let (sink, mut frames) = ChannelSink::new();
    let printer = tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            println!("{}", serde_json::to_string(&frame)?);
        }
        Ok::<_, anyhow::Error>(())
    });

    let mut session = DeviceSession::new(&config, Arc::new(sink))?;
    let summary = replay::run(&mut session, &steps).await;
    session.shutdown();

    let stats = session.stats();
    drop(session);
    printer.await??;

    info!(
        "Replayed {} reports ({} dropped, {} ignored), {} keys forwarded, {} wheel ticks",
        summary.reports,
        summary.dropped,
        summary.ignored,
        stats.keys_forwarded,
        stats.wheel_ticks
    );

    Ok(())
}

fn read_script(path: &str) -> Result<String> {
    if path == "-" {
        let mut script = String::new();
        std::io::stdin()
            .read_to_string(&mut script)
            .context("Failed to read replay script from stdin")?;
        Ok(script)
    } else {
        std::fs::read_to_string(path).context(format!("Failed to read replay script: {}", path))
    }
}

fn init_logging(args: &Args, config: &Config) -> Result<()> {
    use std::fs::File;

    // stdout carries the event stream, logs go to stderr
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "logi_mouse={level},logi_mouse_replay={level},warn",
            level = config.logging.level
        ))
    });

    // If log file is specified, mirror the console output into it
    let file_layer = match &args.log_file {
        Some(path) => Some(fmt_layer(&config.logging.format, File::create(path)?, false)),
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer(&config.logging.format, std::io::stderr, true))
        .with(file_layer)
        .init();

    if let Some(path) = &args.log_file {
        info!("Logging to file: {}", path);
    }

    Ok(())
}

/// Formatting layer for one writer in the configured format (json|pretty|compact)
fn fmt_layer<S, W>(format: &str, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);

    match format {
        "json" => layer.json().boxed(),
        "compact" => layer.compact().boxed(),
        _ => layer.pretty().boxed(),
    }
}
