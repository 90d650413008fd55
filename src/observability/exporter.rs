//! File-based OpenTelemetry span exporter.
//!
//! Spans are written one per line as compact JSON, suitable for `jq` or for
//! loading into a notebook:
//!
//! ```json
//! {"trace_id":"4bf9…","span_id":"00f0…","parent_span_id":"","name":"handle_event",
//!  "start_unix_nano":1718000000000000000,"duration_us":42,
//!  "attributes":{"event_type":"\"tick\""},"events":[],"status":"unset"}
//! ```

use super::file_writer::FileWriter;
use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, Status, TraceError};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{json, Map, Value as JsonValue};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Writes every exported span as a JSON line.
struct FileSpanExporter {
    writer: FileWriter,
    /// Resource attributes stamped on each line.
    service: String,
    is_shutdown: AtomicBool,
}

impl FileSpanExporter {
    fn new(file_path: PathBuf, resource: &Resource) -> Self {
        let service = resource
            .get("service.name".into())
            .map_or_else(|| "unknown".to_string(), |v| v.to_string());

        Self {
            writer: FileWriter::new(file_path),
            service,
            is_shutdown: AtomicBool::new(false),
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> std::io::Result<()> {
        for span in batch {
            let mut line = format_span(span);
            line["service"] = JsonValue::String(self.service.clone());
            self.writer.write_line(&line.to_string())?;
        }
        Ok(())
    }
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Box::pin(std::future::ready(Err(TraceError::from(
                "exporter is shut down",
            ))));
        }

        let result = self
            .write_batch(&batch)
            .map_err(|e| TraceError::from(e.to_string()));
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for FileSpanExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSpanExporter")
            .field("writer", &self.writer)
            .field("service", &self.service)
            .field("is_shutdown", &self.is_shutdown)
            .finish()
    }
}

/// Creates a tracer provider that exports each span as soon as it ends.
pub fn create_tracer_provider(file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = FileSpanExporter::new(file_path, &resource);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

fn format_span(span: &SpanData) -> JsonValue {
    let parent_span_id = if span.parent_span_id == SpanId::INVALID {
        String::new()
    } else {
        format!("{:016x}", span.parent_span_id)
    };

    let duration = span
        .end_time
        .duration_since(span.start_time)
        .unwrap_or(Duration::ZERO);

    let events: Vec<JsonValue> = span
        .events
        .iter()
        .map(|event| {
            json!({
                "name": event.name,
                "unix_nano": unix_nanos(event.timestamp),
                "attributes": format_attributes(&event.attributes),
            })
        })
        .collect();

    let status = match &span.status {
        Status::Unset => json!("unset"),
        Status::Ok => json!("ok"),
        Status::Error { description } => json!({ "error": description.to_string() }),
    };

    json!({
        "trace_id": format!("{:032x}", span.span_context.trace_id()),
        "span_id": format!("{:016x}", span.span_context.span_id()),
        "parent_span_id": parent_span_id,
        "name": span.name,
        "start_unix_nano": unix_nanos(span.start_time),
        "duration_us": u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
        "attributes": format_attributes(&span.attributes),
        "events": events,
        "status": status,
    })
}

fn unix_nanos(time: SystemTime) -> u64 {
    let nanos = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO).as_nanos();
    u64::try_from(nanos).unwrap_or(u64::MAX)
}

fn format_attributes(attributes: &[KeyValue]) -> JsonValue {
    let map: Map<String, JsonValue> = attributes
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect();
    JsonValue::Object(map)
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        Value::String(s) => json!(s.as_str()),
        Value::Array(_) => json!(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{Span, Tracer, TracerProvider as _};

    #[test]
    fn attribute_values_keep_their_json_type() {
        assert_eq!(attribute_value(&Value::Bool(true)), json!(true));
        assert_eq!(attribute_value(&Value::I64(250)), json!(250));
        assert_eq!(attribute_value(&Value::from("Albania")), json!("Albania"));
    }

    #[test]
    fn ended_span_is_written_as_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spans.jsonl");
        let resource = Resource::new(vec![KeyValue::new("service.name", "country-browser")]);
        let provider = create_tracer_provider(path.clone(), resource);

        let tracer = provider.tracer("test");
        let mut span = tracer.start("countries_response");
        span.set_attribute(KeyValue::new("status", 200_i64));
        span.end();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);

        let line: JsonValue = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(line["name"], "countries_response");
        assert_eq!(line["service"], "country-browser");
        assert_eq!(line["attributes"]["status"], 200);
        assert_eq!(line["parent_span_id"], "");
    }
}
