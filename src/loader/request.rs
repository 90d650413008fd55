//! Request and response envelopes for the countries fetch.
//!
//! Zellij's `web_request` is fire-and-forget: the result arrives later as a
//! `WebRequestResult` event carrying the context map that was sent with the
//! request. The loader uses that map to correlate a response with the request
//! that produced it (via a request id) and to continue the distributed trace
//! across the asynchronous gap.

use std::collections::BTreeMap;

/// Context key carrying the loader's request id.
pub const REQUEST_ID_KEY: &str = "country_browser.request_id";

/// Context key carrying the OpenTelemetry trace id.
const TRACE_ID_KEY: &str = "country_browser.trace_id";

/// Context key carrying the OpenTelemetry span id of the issuing span.
const PARENT_SPAN_ID_KEY: &str = "country_browser.parent_span_id";

/// Trace identifiers captured when the request is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Span ID of the span that issued the request.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace context of the current `tracing` span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the span is
    /// not sampled.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }

    fn write_into(&self, context: &mut BTreeMap<String, String>) {
        context.insert(TRACE_ID_KEY.to_string(), self.trace_id.clone());
        context.insert(PARENT_SPAN_ID_KEY.to_string(), self.parent_span_id.clone());
    }

    fn read_from(context: &BTreeMap<String, String>) -> Option<Self> {
        Some(Self {
            trace_id: context.get(TRACE_ID_KEY)?.clone(),
            parent_span_id: context.get(PARENT_SPAN_ID_KEY)?.clone(),
        })
    }

    /// Makes the issuing span the remote parent of spans created while the
    /// returned guard is alive.
    #[must_use]
    pub fn attach(&self) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(opentelemetry::Context::current().with_remote_span_context(span_context).attach())
    }
}

/// A GET the host should issue on the loader's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub request_id: u64,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    /// Opaque map echoed back with the response.
    pub context: BTreeMap<String, String>,
}

impl FetchRequest {
    pub(crate) fn new(request_id: u64, url: &str) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());

        let mut context = BTreeMap::new();
        context.insert(REQUEST_ID_KEY.to_string(), request_id.to_string());
        if let Some(trace) = TraceContext::from_current() {
            trace.write_into(&mut context);
        }

        Self {
            request_id,
            url: url.to_string(),
            headers,
            context,
        }
    }
}

/// A completed request as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub context: BTreeMap<String, String>,
}

impl FetchResponse {
    /// The request id echoed back in the context, if it parses.
    #[must_use]
    pub fn request_id(&self) -> Option<u64> {
        self.context.get(REQUEST_ID_KEY)?.parse().ok()
    }

    /// Trace context of the issuing span, if one was propagated.
    #[must_use]
    pub fn trace_context(&self) -> Option<TraceContext> {
        TraceContext::read_from(&self.context)
    }

    /// Test helper: a response for `request_id` with the given payload.
    #[cfg(test)]
    pub(crate) fn for_request(request_id: u64, status: u16, body: &[u8]) -> Self {
        let mut context = BTreeMap::new();
        context.insert(REQUEST_ID_KEY.to_string(), request_id.to_string());
        Self {
            status,
            body: body.to_vec(),
            context,
        }
    }
}
