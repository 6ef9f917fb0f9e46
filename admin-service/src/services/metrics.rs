use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const API_KEY_VALIDATIONS_TOTAL: &str = "api_key_validations_total";
pub const API_KEY_TOUCH_FAILURES_TOTAL: &str = "api_key_touch_failures_total";
pub const API_KEYS_CREATED_TOTAL: &str = "api_keys_created_total";
pub const AUTH_REJECTIONS_TOTAL: &str = "auth_rejections_total";

/// Install the global Prometheus recorder.
///
/// Safe to call more than once; only the first call installs a recorder.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => {
            tracing::error!("Failed to install Prometheus recorder: {}", e);
        }
    }
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count one API-key validation by outcome (`valid`, `missing`, `unknown_key`, ...).
pub fn record_validation(outcome: &'static str) {
    metrics::counter!(API_KEY_VALIDATIONS_TOTAL, "outcome" => outcome).increment(1);
}

/// Count a failed `lastUsedAt` write.
pub fn record_touch_failure() {
    metrics::counter!(API_KEY_TOUCH_FAILURES_TOTAL).increment(1);
}

pub fn record_key_created() {
    metrics::counter!(API_KEYS_CREATED_TOTAL).increment(1);
}

pub fn record_auth_rejection(gate: &'static str) {
    metrics::counter!(AUTH_REJECTIONS_TOTAL, "gate" => gate).increment(1);
}
