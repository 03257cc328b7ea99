use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;
use std::time::Duration;

pub struct ApiMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
}

static METRICS: OnceLock<ApiMetrics> = OnceLock::new();

impl ApiMetrics {
    fn new() -> Self {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(
                "docproc_api_requests_total",
                "Total number of backend API requests",
            ),
            &["endpoint", "outcome"],
        )
        .expect("metric can be created");

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "docproc_api_request_duration_seconds",
                "Backend API request duration in seconds",
            ),
            &["endpoint"],
        )
        .expect("metric can be created");

        registry
            .register(Box::new(requests_total.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(request_duration_seconds.clone()))
            .expect("collector can be registered");

        Self {
            registry,
            requests_total,
            request_duration_seconds,
        }
    }
}

fn metrics() -> &'static ApiMetrics {
    METRICS.get_or_init(ApiMetrics::new)
}

/// `outcome` is one of `ok`, `http_error`, `transport_error`, `decode_error`.
pub fn record_request(endpoint: &str, outcome: &str, elapsed: Duration) {
    let m = metrics();
    m.requests_total
        .with_label_values(&[endpoint, outcome])
        .inc();
    m.request_duration_seconds
        .with_label_values(&[endpoint])
        .observe(elapsed.as_secs_f64());
}

pub fn request_count(endpoint: &str, outcome: &str) -> u64 {
    metrics()
        .requests_total
        .with_label_values(&[endpoint, outcome])
        .get()
}

/// Render all metrics in the Prometheus text format.
pub fn gather_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = metrics().registry.gather();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_gather() {
        let before = request_count("metrics_test", "ok");
        record_request("metrics_test", "ok", Duration::from_millis(12));

        assert_eq!(request_count("metrics_test", "ok"), before + 1);
        assert!(gather_metrics().contains("docproc_api_requests_total"));
    }
}
