//! Opt-in metrics for bridge traffic and transaction outcomes.
//!
//! Recording goes through the [`metrics`] facade; without an installed
//! recorder every call is a no-op, so the GUI can emit unconditionally once
//! the user has opted in.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics::{counter, histogram};

static GLOBAL: OnceLock<UiTelemetry> = OnceLock::new();

#[derive(Clone)]
pub struct UiTelemetry {
    inner: Arc<Inner>,
}

struct Inner {
    enabled: AtomicBool,
}

impl UiTelemetry {
    fn new(enabled: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                enabled: AtomicBool::new(enabled),
            }),
        }
    }

    /// Installs the process-wide handle. Calling again only updates the
    /// opt-in flag.
    pub fn install(enabled: bool) -> UiTelemetry {
        let telemetry = GLOBAL.get_or_init(|| UiTelemetry::new(enabled));
        telemetry.set_enabled(enabled);
        telemetry.clone()
    }

    /// Shared handle used by command plumbing. Defaults to disabled when
    /// nothing was installed.
    pub fn global() -> &'static UiTelemetry {
        GLOBAL.get_or_init(|| UiTelemetry::new(false))
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::Relaxed)
    }

    pub fn record_rpc_success(&self, method: &'static str, elapsed: Duration) {
        if !self.is_enabled() {
            return;
        }
        histogram!("chusd_gui_rpc_duration_seconds", "method" => method)
            .record(elapsed.as_secs_f64());
    }

    pub fn record_rpc_timeout(&self, method: &'static str) {
        if !self.is_enabled() {
            return;
        }
        counter!("chusd_gui_rpc_failures_total", "method" => method, "kind" => "timeout")
            .increment(1);
    }

    pub fn record_rpc_failure(&self, method: &'static str) {
        if !self.is_enabled() {
            return;
        }
        counter!("chusd_gui_rpc_failures_total", "method" => method, "kind" => "client")
            .increment(1);
    }

    pub fn record_oracle_fetch(&self, success: bool) {
        if !self.is_enabled() {
            return;
        }
        let outcome = if success { "ok" } else { "failed" };
        counter!("chusd_gui_oracle_fetch_total", "outcome" => outcome).increment(1);
    }

    pub fn record_transaction(&self, action: &'static str, outcome: &'static str) {
        if !self.is_enabled() {
            return;
        }
        counter!("chusd_gui_transactions_total", "action" => action, "outcome" => outcome)
            .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opt_in_flag_toggles() {
        let telemetry = UiTelemetry::new(false);
        assert!(!telemetry.is_enabled());
        telemetry.set_enabled(true);
        assert!(telemetry.is_enabled());
        telemetry.set_enabled(false);
        assert!(!telemetry.is_enabled());
    }

    #[test]
    fn recording_without_a_recorder_is_a_no_op() {
        let telemetry = UiTelemetry::new(true);
        telemetry.record_rpc_success("wallet_sessionInfo", Duration::from_millis(12));
        telemetry.record_rpc_timeout("manager_deposit");
        telemetry.record_rpc_failure("manager_mint");
        telemetry.record_oracle_fetch(false);
        telemetry.record_transaction("deposit", "succeeded");
    }
}
