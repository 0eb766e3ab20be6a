use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use fmtwire::format::YapfFormatter;
use fmtwire::parent::{wait_for_parent_exit, DEFAULT_POLL_INTERVAL};
use fmtwire::protocol::{ProtocolVersion, DEFAULT_MAX_PAYLOAD_SIZE};
use fmtwire::Worker;

/// Python formatting worker
#[derive(Parser, Debug)]
#[command(name = "fmtwire", version)]
#[command(about = "Formats Python files for a host process over stdin/stdout", long_about = None)]
struct Args {
    /// Process id of the host; the worker exits when it goes away
    #[arg(long)]
    parent_pid: Option<u32>,

    /// Wire protocol schema version (2 or 3)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(2..=3))]
    schema_version: u32,

    /// Python interpreter used to run yapf
    #[arg(long, default_value = "python")]
    python: String,

    /// Maximum inbound payload size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD_SIZE)]
    max_payload: usize,

    /// Seconds between parent liveness checks
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_secs())]
    parent_poll_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: Level,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries the protocol; logs go to stderr only.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let version = ProtocolVersion::from_u32(args.schema_version)
        .context("unsupported schema version")?;

    let mut worker = Worker::builder()
        .protocol_version(version)
        .formatter(YapfFormatter::new(args.python))
        .max_payload_size(args.max_payload)
        .build();

    tracing::info!("Serving protocol {} on stdio", version);

    let serve = worker.serve_stdio();
    let result = match args.parent_pid {
        Some(pid) => {
            let interval = Duration::from_secs(args.parent_poll_secs.max(1));
            tokio::select! {
                result = serve => result,
                _ = wait_for_parent_exit(pid, interval) => {
                    // A blocking stdin read may still be pending; don't wait on runtime shutdown.
                    tracing::error!("Parent process {} exited, terminating", pid);
                    std::process::exit(1);
                }
            }
        }
        None => serve.await,
    };

    if let Err(e) = &result {
        tracing::error!("Fatal stream error: {}", e);
    }
    result.context("worker stopped")?;

    Ok(())
}
