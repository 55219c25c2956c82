// Prometheus metrics definitions for the cache hunt bot.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ── Gauges ───────────────────────────────────────────────────────

    /// Inbound updates currently being handled.
    pub static ref UPDATES_IN_FLIGHT: IntGauge =
        IntGauge::new("cachehunt_updates_in_flight", "Inbound updates currently being handled").unwrap();

    // ── Counters ─────────────────────────────────────────────────────

    /// Total inbound updates, by payload kind (text, location, media, empty).
    pub static ref UPDATES_RECEIVED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("cachehunt_updates_received_total", "Total inbound updates"),
        &["kind"],
    )
    .unwrap();

    /// Total guidance decisions, by action (sent, edited, suppressed).
    pub static ref GUIDANCE_MESSAGES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("cachehunt_guidance_messages_total", "Total guidance decisions"),
        &["action"],
    )
    .unwrap();

    /// Edits that failed and fell back to a fresh send.
    pub static ref EDIT_FALLBACKS_TOTAL: IntCounter = IntCounter::new(
        "cachehunt_edit_fallbacks_total",
        "Edits recovered by sending a new message",
    )
    .unwrap();

    /// Outbound operations that failed for good, by operation.
    pub static ref DELIVERY_FAILURES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("cachehunt_delivery_failures_total", "Unrecovered outbound failures"),
        &["op"],
    )
    .unwrap();

    /// Total hunts started.
    pub static ref SESSIONS_STARTED_TOTAL: IntCounter = IntCounter::new(
        "cachehunt_sessions_started_total",
        "Hunts started",
    )
    .unwrap();

    /// Total hunts stopped by the user.
    pub static ref SESSIONS_STOPPED_TOTAL: IntCounter = IntCounter::new(
        "cachehunt_sessions_stopped_total",
        "Hunts stopped by the user",
    )
    .unwrap();

    /// Total arrivals at a cache.
    pub static ref ARRIVALS_TOTAL: IntCounter = IntCounter::new(
        "cachehunt_arrivals_total",
        "Users that reached a cache",
    )
    .unwrap();

    /// Total caches created, by media kind.
    pub static ref CACHES_CREATED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("cachehunt_caches_created_total", "Caches created"),
        &["media_kind"],
    )
    .unwrap();

    /// Total codeword lookups, by outcome (found, not_found, too_short).
    pub static ref CODEWORD_LOOKUPS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("cachehunt_codeword_lookups_total", "Codeword lookups"),
        &["outcome"],
    )
    .unwrap();

    // ── Histograms ───────────────────────────────────────────────────

    /// Full update handling duration in seconds (gate wait included).
    pub static ref UPDATE_HANDLE_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "cachehunt_update_handle_duration_seconds",
            "Update handling duration in seconds",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0]),
    )
    .unwrap();
}

/// Register all metrics with the custom registry. Call once at startup.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(UPDATES_IN_FLIGHT.clone()),
        Box::new(UPDATES_RECEIVED_TOTAL.clone()),
        Box::new(GUIDANCE_MESSAGES_TOTAL.clone()),
        Box::new(EDIT_FALLBACKS_TOTAL.clone()),
        Box::new(DELIVERY_FAILURES_TOTAL.clone()),
        Box::new(SESSIONS_STARTED_TOTAL.clone()),
        Box::new(SESSIONS_STOPPED_TOTAL.clone()),
        Box::new(ARRIVALS_TOTAL.clone()),
        Box::new(CACHES_CREATED_TOTAL.clone()),
        Box::new(CODEWORD_LOOKUPS_TOTAL.clone()),
        Box::new(UPDATE_HANDLE_DURATION_SECONDS.clone()),
    ];

    for c in collectors {
        REGISTRY.register(c).expect("failed to register metric");
    }
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}
