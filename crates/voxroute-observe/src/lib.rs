//! Observability for voxroute: subscriber setup with structured logging,
//! an optional log file, and optional OpenTelemetry export.

pub mod tracing_setup;
