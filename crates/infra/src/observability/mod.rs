//! Logging setup
//!
//! wxkit only emits `tracing` events; binaries embedding it call
//! [`init_tracing`] once at startup to get them on stdout.
//!
//! ## Levels used by the library
//! - `info`: credential refreshes, directory sync summaries
//! - `warn`: envelope failures (`errcode`), failed refreshes
//! - `debug`: individual HTTP exchanges, pages and batches, rejected payloads

use std::str::FromStr;

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};
use wxkit_domain::{Result, WxError};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output for local runs.
    #[default]
    Pretty,
    /// One JSON object per event for log aggregation.
    Json,
}

impl FromStr for LogFormat {
    type Err = WxError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(WxError::Config(format!("unknown log format: {other}"))),
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`.
///
/// # Errors
/// Returns `WxError::Config` if the filter does not parse or a global
/// subscriber is already installed.
pub fn init_tracing(format: LogFormat, default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| WxError::Config(format!("invalid log filter: {e}")))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(format, std::io::stdout))
        .try_init()
        .map_err(|e| WxError::Config(format!("tracing already initialised: {e}")))?;
    tracing::debug!(?format, "tracing initialised");
    Ok(())
}

fn fmt_layer<S, W>(format: LogFormat, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer().pretty().with_target(true).with_writer(writer).boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .flatten_event(true)
            .with_writer(writer)
            .boxed(),
    }
}

/// Best-effort subscriber for tests; repeated calls are ignored.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().with_env_filter("debug").try_init();
}
