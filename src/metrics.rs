use axum::{routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder. Call once at startup, before the first
/// series records; the handle is what renders the exposition text.
pub fn install() -> PrometheusHandle {
    // Default buckets to avoid API differences across crate versions.
    PrometheusBuilder::new()
        .install_recorder()
        .expect("prometheus: install recorder")
}

/// Returns a router exposing `/metrics` with the Prometheus exposition format.
pub fn router(handle: PrometheusHandle) -> Router {
    Router::new().route(
        "/metrics",
        get(move || {
            let h = handle.clone();
            async move { h.render() }
        }),
    )
}
