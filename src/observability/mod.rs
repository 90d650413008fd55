//! OpenTelemetry-based observability with file-based span export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → JSON lines
//! ```
//!
//! Spans land in `country-browser-spans.jsonl` inside the plugin data
//! directory, one compact JSON object per line, rotated at 5 MB with three
//! numbered backups.
//!
//! The level comes from the `trace_level` config option and defaults to
//! `info`. It accepts full `EnvFilter` directives, e.g.
//! `country_browser::loader=debug,info`.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`exporter`]: Span exporter and tracer provider
//! - [`file_writer`]: Rotating line writer

mod exporter;
mod file_writer;
mod init;

pub use init::{init_tracing, init_tracing_at};
