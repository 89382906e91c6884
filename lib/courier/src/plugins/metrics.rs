//! Metrics plugin using the metrics crate facade.
//!
//! Records client metrics with the `metrics` crate, so any installed recorder
//! (Prometheus, `StatsD`, ...) picks them up.

use bytes::Bytes;
use courier_core::{HttpResponse, Plugin, Request, TransportError};

const LABEL_METHOD: &str = "method";
const LABEL_STATUS: &str = "status";
const LABEL_REASON: &str = "reason";

const METRIC_REQUESTS_TOTAL: &str = "http_client_requests_total";
const METRIC_REQUEST_FAILURES_TOTAL: &str = "http_client_request_failures_total";
const METRIC_REQUESTS_IN_FLIGHT: &str = "http_client_requests_in_flight";

/// Plugin that records HTTP client metrics.
///
/// Records:
/// - `http_client_requests_total` (counter): HTTP responses, labeled by method and status
/// - `http_client_request_failures_total` (counter): calls without an HTTP response, labeled
///   by method and reason
/// - `http_client_requests_in_flight` (gauge): calls currently in flight
///
/// The gauge stays balanced when a call is abandoned: a dropped `execute`
/// future or stream is reported to `did_fail` as a cancellation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsPlugin {
    _private: (),
}

impl MetricsPlugin {
    /// Create a new metrics plugin.
    #[must_use]
    pub fn new() -> Self {
        Self { _private: () }
    }
}

fn failure_reason(error: &TransportError) -> &'static str {
    match error {
        TransportError::NotHttpResponse(_) => "not_http",
        TransportError::RequestFailure { .. } => "status",
        TransportError::Transport(_) => "transport",
        TransportError::Cancelled => "cancelled",
        TransportError::ClientUnavailable => "unavailable",
    }
}

impl Plugin for MetricsPlugin {
    fn will_send(&self, _request: &Request) {
        metrics::gauge!(METRIC_REQUESTS_IN_FLIGHT).increment(1.0);
    }

    fn did_receive(&self, _body: &Bytes, response: &HttpResponse, request: &Request) {
        metrics::gauge!(METRIC_REQUESTS_IN_FLIGHT).decrement(1.0);
        metrics::counter!(
            METRIC_REQUESTS_TOTAL,
            LABEL_METHOD => request.method().to_string(),
            LABEL_STATUS => response.status().code().to_string()
        )
        .increment(1);
    }

    fn did_fail(&self, error: &TransportError, request: &Request) {
        metrics::gauge!(METRIC_REQUESTS_IN_FLIGHT).decrement(1.0);
        metrics::counter!(
            METRIC_REQUEST_FAILURES_TOTAL,
            LABEL_METHOD => request.method().to_string(),
            LABEL_REASON => failure_reason(error)
        )
        .increment(1);
    }
}
