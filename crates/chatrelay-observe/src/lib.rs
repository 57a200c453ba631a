//! Observability setup for Chatrelay: structured logging plus optional
//! OpenTelemetry span export.

pub mod tracing_setup;
