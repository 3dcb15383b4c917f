use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all ledger metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Pre-register so they appear before the first increment.
    counter!("bets_logged_total").absolute(0);
    counter!("bets_updated_total").absolute(0);
    counter!("bets_deleted_total").absolute(0);
    counter!("validation_failures_total").absolute(0);

    gauge!("open_bets").set(0.0);
    gauge!("cumulative_pnl").set(0.0);

    Ok(handle)
}

/// A handle backed by a recorder that is not installed globally. Used where
/// a process-wide recorder may already exist, e.g. in tests.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
