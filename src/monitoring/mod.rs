use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, CounterVec, Encoder, TextEncoder};

pub static BACKEND_REQUESTS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "folio_backend_requests_total",
        "Requests sent to the hosted backend",
        &["operation", "outcome"]
    )
    .expect("backend request counter registers once")
});

pub static LOGIN_ATTEMPTS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "folio_login_attempts_total",
        "Dashboard login attempts",
        &["outcome"]
    )
    .expect("login counter registers once")
});

pub fn record_backend_call(operation: &str, outcome: &str) {
    BACKEND_REQUESTS
        .with_label_values(&[operation, outcome])
        .inc();
}

pub fn record_login(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    LOGIN_ATTEMPTS.with_label_values(&[outcome]).inc();
}

/// Render every registered metric in the Prometheus text format.
pub fn gather_text() -> anyhow::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
