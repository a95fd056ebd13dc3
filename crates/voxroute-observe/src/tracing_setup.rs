//! Tracing subscriber initialization with structured logging, an optional
//! log file and optional OpenTelemetry trace export.
//!
//! # Usage
//!
//! ```no_run
//! use voxroute_observe::tracing_setup::{init_tracing, LogOptions};
//!
//! // Human-readable stdout logging at the CLI's default level
//! init_tracing(&LogOptions::from_verbosity(1, false)).unwrap();
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// What the global subscriber should emit and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
    /// Emit JSON lines on stdout instead of the pretty format.
    pub json: bool,
    /// Bridge spans to OpenTelemetry (stdout exporter).
    pub otel: bool,
    /// Also append plain-text logs to this file.
    pub log_file: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self::from_verbosity(0, false)
    }
}

impl LogOptions {
    /// Options for a CLI verbosity level (`-v` count) and `--quiet`.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        let default_filter = match verbose {
            0 if quiet => "error",
            0 => "info",
            1 => "info,voxroute=debug",
            _ => "trace",
        };
        Self {
            default_filter: default_filter.to_string(),
            json: false,
            otel: false,
            log_file: None,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn with_otel(mut self, otel: bool) -> Self {
        self.otel = otel;
        self
    }

    pub fn with_log_file(mut self, log_file: Option<PathBuf>) -> Self {
        self.log_file = log_file;
        self
    }

    /// `RUST_LOG` wins over the configured default.
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

/// Initialize the global tracing subscriber.
///
/// - Always installs a stdout `fmt` layer, pretty or JSON.
/// - When `log_file` is set, appends an ANSI-free copy of every event to it.
/// - When `otel` is set, bridges tracing spans to OpenTelemetry using a
///   stdout exporter.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or the global
/// subscriber has already been set.
pub fn init_tracing(options: &LogOptions) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (plain_layer, json_layer) = if options.json {
        (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_target(true)),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_target(true)),
            None,
        )
    };

    let file_layer = match &options.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let otel_layer = if options.otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("voxroute");

        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(options.env_filter())
        .with(plain_layer)
        .with(json_layer)
        .with(file_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

/// Flush pending traces and shut down the OpenTelemetry tracer provider.
///
/// No-op when OTel was not enabled.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}
