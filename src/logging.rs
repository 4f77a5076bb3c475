//! Tracing setup for the CLI.
//!
//! Events go to stderr, filtered by `TASKBOARD_LOG` (falling back to `warn`,
//! or `taskboard=debug` with `--verbose`). When a log directory is
//! configured, a daily rolling file receives the same events without color.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

pub const ENV_LOG: &str = "TASKBOARD_LOG";
const LOG_FILE_PREFIX: &str = "taskboard.log";

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub verbose: bool,
    pub json: bool,
    pub dir: Option<PathBuf>,
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "warn,taskboard=debug" } else { "warn" }
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber. Keep the returned guard alive for the
/// life of the process or buffered file output is lost.
pub fn init(options: &LogOptions) -> Result<Option<WorkerGuard>> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(false);
    layers.push(if options.json {
        stderr.json().with_filter(filter(options.verbose)).boxed()
    } else {
        stderr.with_filter(filter(options.verbose)).boxed()
    });

    let guard = match &options.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = fmt::layer().with_writer(writer).with_ansi(false);
            layers.push(if options.json {
                file.json().with_filter(filter(options.verbose)).boxed()
            } else {
                file.with_filter(filter(options.verbose)).boxed()
            });
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(guard)
}
