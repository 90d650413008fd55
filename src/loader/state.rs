//! One-shot load state machine.
//!
//! ```text
//! Idle ──begin──▶ Loading ──200 + valid body──▶ Loaded
//!                    │
//!                    ├──non-200 / bad body──▶ Failed
//!                    └──deadline passed─────▶ Failed
//! ```
//!
//! `Loaded` and `Failed` are terminal; there is no refresh or retry. The
//! loader never panics and never returns an error to its caller for a failed
//! load: the failure is logged and kept as [`LoadState::Failed`].

use super::request::{FetchRequest, FetchResponse};
use crate::domain::error::{BrowserError, Result};
use crate::domain::{decode_countries, Country};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Observable loader state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight.
    Loading {
        request_id: u64,
        started_at: Instant,
    },
    /// The record set arrived.
    Loaded {
        count: usize,
        fetched_at: DateTime<Utc>,
    },
    /// The load failed; the record set stays empty.
    Failed {
        reason: String,
    },
}

impl LoadState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Loaded { .. } | Self::Failed { .. })
    }
}

/// Issues the countries request at most once and tracks its outcome.
#[derive(Debug, Clone)]
pub struct DataLoader {
    endpoint: String,
    timeout: Option<Duration>,
    state: LoadState,
    next_request_id: u64,
}

impl DataLoader {
    /// Creates an idle loader. A `timeout` of `None` waits forever.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
            state: LoadState::Idle,
            next_request_id: 1,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Starts the load.
    ///
    /// Returns the request to issue, or `None` if a load was already started.
    #[tracing::instrument(level = "debug", skip(self), fields(endpoint = %self.endpoint))]
    pub fn begin(&mut self, now: Instant) -> Option<FetchRequest> {
        if self.state != LoadState::Idle {
            tracing::debug!(state = ?self.state, "load already started, ignoring trigger");
            return None;
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.state = LoadState::Loading {
            request_id,
            started_at: now,
        };

        tracing::info!(request_id, "requesting countries");
        Some(FetchRequest::new(request_id, &self.endpoint))
    }

    /// Applies a host response.
    ///
    /// Returns `None` when the response does not belong to the in-flight
    /// request (stale, abandoned or timed out). Otherwise returns the decoded
    /// record set, or the error that moved the loader to `Failed`.
    pub fn complete(&mut self, response: &FetchResponse) -> Option<Result<Vec<Country>>> {
        let _trace_guard = response.trace_context().and_then(|t| t.attach());
        let _span = tracing::debug_span!(
            "countries_response",
            status = response.status,
            body_len = response.body.len()
        )
        .entered();

        let LoadState::Loading { request_id, .. } = self.state else {
            tracing::debug!(state = ?self.state, "response arrived outside of loading state, ignoring");
            return None;
        };

        if response.request_id() != Some(request_id) {
            tracing::debug!(
                expected = request_id,
                received = ?response.request_id(),
                "ignoring response for a stale request"
            );
            return None;
        }

        let outcome = Self::decode(response);
        match &outcome {
            Ok(countries) => {
                tracing::info!(count = countries.len(), "countries loaded");
                self.state = LoadState::Loaded {
                    count: countries.len(),
                    fetched_at: Utc::now(),
                };
            }
            Err(e) => self.fail(e),
        }
        Some(outcome)
    }

    fn decode(response: &FetchResponse) -> Result<Vec<Country>> {
        if response.status != 200 {
            return Err(BrowserError::Http {
                status: response.status,
            });
        }

        let decoded = decode_countries(&response.body)?;
        if decoded.skipped > 0 {
            tracing::warn!(skipped = decoded.skipped, "some country records could not be decoded");
        }
        Ok(decoded.countries)
    }

    /// Time left before the in-flight request times out.
    ///
    /// A deadline too far out for the clock to represent counts as none.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match (&self.state, self.timeout) {
            (LoadState::Loading { started_at, .. }, Some(timeout)) => started_at
                .checked_add(timeout)
                .map(|deadline| deadline.saturating_duration_since(now)),
            _ => None,
        }
    }

    /// Fails the in-flight request if its deadline has passed.
    ///
    /// Returns `true` when this call caused the transition.
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        match (self.remaining(now), self.timeout) {
            (Some(left), Some(after)) if left.is_zero() => {
                self.fail(&BrowserError::Timeout { after });
                true
            }
            _ => false,
        }
    }

    /// Abandons an in-flight request, e.g. when the plugin is torn down.
    pub fn abandon(&mut self) {
        if let LoadState::Loading { request_id, .. } = self.state {
            tracing::debug!(request_id, "abandoning in-flight request");
            self.state = LoadState::Failed {
                reason: "request abandoned".to_string(),
            };
        }
    }

    /// Fails an idle loader before any request is issued, e.g. when the host
    /// refuses web access. Does nothing once a load has started.
    pub fn refuse(&mut self, error: &BrowserError) {
        if self.state == LoadState::Idle {
            self.fail(error);
        }
    }

    fn fail(&mut self, error: &BrowserError) {
        tracing::warn!(error = %error, "failed to load countries");
        self.state = LoadState::Failed {
            reason: error.to_string(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "https://example.org/countries";

    fn loader(timeout: Option<Duration>) -> DataLoader {
        DataLoader::new(ENDPOINT, timeout)
    }

    #[test]
    fn begins_only_once() {
        let now = Instant::now();
        let mut l = loader(None);

        let request = l.begin(now).unwrap();
        assert_eq!(request.url, ENDPOINT);
        assert!(l.state().is_loading());
        assert!(l.begin(now).is_none());
    }

    #[test]
    fn successful_response_loads_records() {
        let mut l = loader(None);
        let request = l.begin(Instant::now()).unwrap();

        let body = br#"[{"name":"Albania","population":2800000},{"name":"Algeria"}]"#;
        let response = FetchResponse::for_request(request.request_id, 200, body);
        let countries = l.complete(&response).unwrap().unwrap();

        assert_eq!(countries.len(), 2);
        assert!(matches!(l.state(), LoadState::Loaded { count: 2, .. }));
        assert!(l.state().is_terminal());
    }

    #[test]
    fn non_200_status_fails_without_retry() {
        let mut l = loader(None);
        let request = l.begin(Instant::now()).unwrap();

        let response = FetchResponse::for_request(request.request_id, 404, b"not found");
        let outcome = l.complete(&response).unwrap();

        assert!(matches!(outcome, Err(BrowserError::Http { status: 404 })));
        assert_eq!(
            l.state(),
            &LoadState::Failed { reason: "Unexpected HTTP status 404".to_string() }
        );
        assert!(l.begin(Instant::now()).is_none());
    }

    #[test]
    fn undecodable_body_fails() {
        let mut l = loader(None);
        let request = l.begin(Instant::now()).unwrap();

        let response = FetchResponse::for_request(request.request_id, 200, b"{\"oops\":1}");
        assert!(matches!(l.complete(&response), Some(Err(BrowserError::Decode(_)))));
        assert!(matches!(l.state(), LoadState::Failed { .. }));
    }

    #[test]
    fn response_for_unknown_request_is_ignored() {
        let mut l = loader(None);
        let request = l.begin(Instant::now()).unwrap();

        let stray = FetchResponse::for_request(request.request_id + 10, 200, b"[]");
        assert!(l.complete(&stray).is_none());
        assert!(l.state().is_loading());
    }

    #[test]
    fn response_before_begin_is_ignored() {
        let mut l = loader(None);
        assert!(l.complete(&FetchResponse::for_request(1, 200, b"[]")).is_none());
        assert_eq!(l.state(), &LoadState::Idle);
    }

    #[test]
    fn timeout_fails_and_late_response_is_dropped() {
        let t0 = Instant::now();
        let mut l = loader(Some(Duration::from_secs(30)));
        let request = l.begin(t0).unwrap();

        assert_eq!(l.remaining(t0 + Duration::from_secs(10)), Some(Duration::from_secs(20)));
        assert!(!l.check_timeout(t0 + Duration::from_secs(29)));
        assert!(l.check_timeout(t0 + Duration::from_secs(30)));
        assert_eq!(
            l.state(),
            &LoadState::Failed { reason: "Request timed out after 30s".to_string() }
        );

        let late = FetchResponse::for_request(request.request_id, 200, b"[]");
        assert!(l.complete(&late).is_none());
        assert!(!l.check_timeout(t0 + Duration::from_secs(60)));
    }

    #[test]
    fn without_timeout_loading_persists() {
        let t0 = Instant::now();
        let mut l = loader(None);
        l.begin(t0);

        assert!(!l.check_timeout(t0 + Duration::from_secs(3_600)));
        assert!(l.state().is_loading());
        assert_eq!(l.remaining(t0), None);
    }

    #[test]
    fn unrepresentable_deadline_never_times_out() {
        let t0 = Instant::now();
        let mut l = loader(Some(Duration::from_secs(u64::MAX)));
        l.begin(t0);

        assert_eq!(l.remaining(t0 + Duration::from_secs(1)), None);
        assert!(!l.check_timeout(t0 + Duration::from_secs(1)));
        assert!(l.state().is_loading());
    }

    #[test]
    fn refused_loader_fails_and_cannot_begin() {
        let mut l = loader(None);
        l.refuse(&BrowserError::AccessDenied);

        assert_eq!(
            l.state(),
            &LoadState::Failed { reason: "Web access denied".to_string() }
        );
        assert!(l.begin(Instant::now()).is_none());
    }

    #[test]
    fn refuse_after_begin_is_ignored() {
        let mut l = loader(None);
        l.begin(Instant::now());
        l.refuse(&BrowserError::AccessDenied);
        assert!(l.state().is_loading());
    }

    #[test]
    fn abandon_makes_in_flight_request_stale() {
        let mut l = loader(None);
        let request = l.begin(Instant::now()).unwrap();
        l.abandon();

        let response = FetchResponse::for_request(request.request_id, 200, b"[]");
        assert!(l.complete(&response).is_none());
        assert!(matches!(l.state(), LoadState::Failed { .. }));
    }
}
