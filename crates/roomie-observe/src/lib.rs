//! Observability setup for Roomie: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
