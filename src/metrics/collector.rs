//! Metrics Collector

use prometheus::{IntCounter, IntGauge, Registry, TextEncoder};
use tracing::error;

/// Collects session lifecycle metrics and exports them in Prometheus format
pub struct Metrics {
    prometheus_registry: Registry,

    logins_total: IntCounter,
    login_rejections_total: IntCounter,
    logouts_total: IntCounter,
    active_sessions: IntGauge,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        let prometheus_registry = Registry::new();

        let logins_total = IntCounter::new(
            "sessiongate_logins_total",
            "Total number of successful logins"
        ).expect("Failed to create logins_total counter");

        let login_rejections_total = IntCounter::new(
            "sessiongate_login_rejections_total",
            "Total number of rejected logins"
        ).expect("Failed to create login_rejections_total counter");

        let logouts_total = IntCounter::new(
            "sessiongate_logouts_total",
            "Total number of sessions ended by logout"
        ).expect("Failed to create logouts_total counter");

        let active_sessions = IntGauge::new(
            "sessiongate_active_sessions",
            "Number of currently active sessions"
        ).expect("Failed to create active_sessions gauge");

        prometheus_registry.register(Box::new(logins_total.clone()))
            .expect("Failed to register logins_total");
        prometheus_registry.register(Box::new(login_rejections_total.clone()))
            .expect("Failed to register login_rejections_total");
        prometheus_registry.register(Box::new(logouts_total.clone()))
            .expect("Failed to register logouts_total");
        prometheus_registry.register(Box::new(active_sessions.clone()))
            .expect("Failed to register active_sessions");

        Self {
            prometheus_registry,
            logins_total,
            login_rejections_total,
            logouts_total,
            active_sessions,
        }
    }

    pub fn record_login(&self) {
        self.logins_total.inc();
    }

    pub fn record_rejection(&self) {
        self.login_rejections_total.inc();
    }

    /// Record `count` sessions ended by a single or bulk logout
    pub fn record_logouts(&self, count: usize) {
        self.logouts_total.inc_by(count as u64);
    }

    pub fn set_active_sessions(&self, count: usize) {
        self.active_sessions.set(count as i64);
    }

    pub fn get_logins(&self) -> u64 {
        self.logins_total.get()
    }

    pub fn get_rejections(&self) -> u64 {
        self.login_rejections_total.get()
    }

    pub fn get_logouts(&self) -> u64 {
        self.logouts_total.get()
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.prometheus_registry.gather();

        match encoder.encode_to_string(&metric_families) {
            Ok(output) => output,
            Err(e) => {
                error!(error = %e, "Failed to encode Prometheus metrics");
                String::new()
            }
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = Metrics::new();
        metrics.record_login();
        metrics.record_login();
        metrics.record_rejection();
        metrics.record_logouts(3);

        assert_eq!(metrics.get_logins(), 2);
        assert_eq!(metrics.get_rejections(), 1);
        assert_eq!(metrics.get_logouts(), 3);
    }

    #[test]
    fn test_prometheus_export() {
        let metrics = Metrics::new();
        metrics.record_login();
        metrics.set_active_sessions(4);

        let output = metrics.export_prometheus();
        assert!(output.contains("sessiongate_logins_total 1"));
        assert!(output.contains("sessiongate_active_sessions 4"));
        assert!(output.contains("sessiongate_login_rejections_total 0"));
    }
}
