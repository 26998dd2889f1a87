//! Metric names and instruments for the generate endpoint

use std::time::Instant;

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};

pub const GENERATE_REQUEST_DURATION: &str = "generate.request.duration";
pub const GENERATE_REQUEST_COUNT: &str = "generate.request.count";
pub const SYNTHESIS_DURATION: &str = "generate.synthesis.duration";

/// Record the time elapsed since `start` on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[KeyValue]) {
    histogram.record(start.elapsed().as_secs_f64(), attributes);
}

/// Instruments shared by every `/generate` request
///
/// Built from the global meter provider, so they are no-ops until
/// telemetry export is configured.
#[derive(Clone)]
pub struct GenerateMetrics {
    request_duration: Histogram<f64>,
    request_count: Counter<u64>,
    synthesis_duration: Histogram<f64>,
}

impl GenerateMetrics {
    pub fn new() -> Self {
        let meter = global::meter("murmur");

        Self {
            request_duration: meter
                .f64_histogram(GENERATE_REQUEST_DURATION)
                .with_unit("s")
                .with_description("End-to-end duration of generate requests")
                .build(),
            request_count: meter
                .u64_counter(GENERATE_REQUEST_COUNT)
                .with_description("Generate requests by outcome")
                .build(),
            synthesis_duration: meter
                .f64_histogram(SYNTHESIS_DURATION)
                .with_unit("s")
                .with_description("Time spent inside the synthesis backend")
                .build(),
        }
    }

    /// Record a finished request, `outcome` is `success` or `error`
    pub fn record_request(&self, start: Instant, outcome: &'static str) {
        let attributes = [KeyValue::new("outcome", outcome)];
        record_duration(&self.request_duration, start, &attributes);
        self.request_count.add(1, &attributes);
    }

    pub fn record_synthesis(&self, start: Instant, backend: &'static str) {
        record_duration(&self.synthesis_duration, start, &[KeyValue::new("backend", backend)]);
    }
}

impl Default for GenerateMetrics {
    fn default() -> Self {
        Self::new()
    }
}
