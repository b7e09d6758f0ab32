//! Request counters and latencies in the [OpenMetrics] text exposition format.
//!
//! Two metric families are recorded:
//!
//! * `api_requests_total{endpoint, method, status}`: a counter incremented once per completed
//!   request.
//! * `request_latency_seconds{endpoint, method}`: a histogram with one observation per
//!   completed request.
//!
//! Both only ever grow for the lifetime of the process. The families synchronize internally, so
//! a [`SharedMetrics`] handle can be used from any number of concurrent requests.
//!
//! [OpenMetrics]: https://openmetrics.io

use crate::error::Error;
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;
use std::sync::Arc;
use std::time::Duration;

/// The content type of a [`Metrics::snapshot`].
pub const CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

pub type SharedMetrics = Arc<Metrics>;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct RequestLabels {
    endpoint: String,
    method: String,
    status: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct LatencyLabels {
    endpoint: String,
    method: String,
}

#[derive(Debug)]
pub struct Metrics {
    registry: Registry,
    requests: Family<RequestLabels, Counter>,
    latency: Family<LatencyLabels, Histogram>,
}

// 5ms .. ~10s.
fn latency_histogram() -> Histogram {
    Histogram::new(exponential_buckets(0.005, 2.0, 12))
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let requests = Family::<RequestLabels, Counter>::default();
        registry.register("api_requests", "Total API requests", requests.clone());

        let latency: Family<LatencyLabels, Histogram> =
            Family::new_with_constructor(latency_histogram);
        registry.register("request_latency_seconds", "Request latency", latency.clone());

        Metrics {
            registry,
            requests,
            latency,
        }
    }

    /// Count one completed request.
    pub fn increment(&self, endpoint: &str, method: &str, status: u16) {
        self.requests
            .get_or_create(&RequestLabels {
                endpoint: endpoint.to_string(),
                method: method.to_string(),
                status: status.to_string(),
            })
            .inc();
    }

    /// Record how long one request took.
    pub fn observe_latency(&self, endpoint: &str, method: &str, duration: Duration) {
        self.latency
            .get_or_create(&LatencyLabels {
                endpoint: endpoint.to_string(),
                method: method.to_string(),
            })
            .observe(duration.as_secs_f64());
    }

    /// The number of requests counted so far for the given series. Reading a series that was
    /// never incremented doesn't create it.
    #[must_use]
    pub fn request_count(&self, endpoint: &str, method: &str, status: u16) -> u64 {
        self.requests
            .get(&RequestLabels {
                endpoint: endpoint.to_string(),
                method: method.to_string(),
                status: status.to_string(),
            })
            .map_or(0, |counter| counter.get())
    }

    /// Encode every metric in the OpenMetrics text format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Metrics`] if encoding fails.
    pub fn snapshot(&self) -> Result<String, Error> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
