//! Prometheus metrics for bulletin acquisition and parsing.
//!
//! The recorder is installed once per process; the rendered snapshot is served
//! by the HTTP server at `/metrics`.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::{Once, OnceLock};
use tracing::{info, warn};

static INIT: Once = Once::new();
static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const FETCH_ATTEMPTS: &str = "price_index_fetch_attempts_total";
pub const FETCH_DURATION: &str = "price_index_fetch_duration_seconds";
pub const FALLBACK_USED: &str = "price_index_fallback_used_total";
pub const UNAVAILABLE: &str = "price_index_unavailable_total";
pub const COMMODITIES_PARSED: &str = "price_index_commodities_parsed";
pub const PRICES_PARSED: &str = "price_index_prices_parsed";

/// Installs the global Prometheus recorder. Idempotent.
pub fn init_metrics() {
    INIT.call_once(|| match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = HANDLE.set(handle);
            info!("Prometheus recorder installed");
        }
        Err(e) => warn!("Failed to install Prometheus recorder: {}", e),
    });
}

/// Current exposition text, if the recorder was installed.
pub fn render() -> Option<String> {
    HANDLE.get().map(PrometheusHandle::render)
}

pub struct PriceMetrics;

impl PriceMetrics {
    /// One download attempt for one date; `outcome` is `success` or the
    /// failure kind (`http`, `status`, `decode`).
    pub fn record_fetch_attempt(outcome: &'static str, duration_secs: f64) {
        ::metrics::counter!(FETCH_ATTEMPTS, "outcome" => outcome).increment(1);
        ::metrics::histogram!(FETCH_DURATION).record(duration_secs);
    }

    /// The requested date failed and an earlier bulletin was served instead.
    pub fn record_fallback_used() {
        ::metrics::counter!(FALLBACK_USED).increment(1);
    }

    /// Every candidate date failed.
    pub fn record_unavailable() {
        ::metrics::counter!(UNAVAILABLE).increment(1);
    }

    pub fn record_catalog(commodities: usize, prices: usize) {
        ::metrics::histogram!(COMMODITIES_PARSED).record(commodities as f64);
        ::metrics::histogram!(PRICES_PARSED).record(prices as f64);
    }
}
