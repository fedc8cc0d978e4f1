//! Prometheus metrics collection for parlord.
//!
//! Provides observability via Prometheus metrics exposed on an HTTP
//! endpoint. Tracks connection health, message throughput, command latency
//! and room statistics.

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters (monotonic increasing)
// ========================================================================

/// Total direct messages stored and delivered.
pub static MESSAGES_SENT: OnceLock<IntCounter> = OnceLock::new();

/// Total pushes dropped because a client's outgoing queue was full or gone.
pub static DELIVERY_FAILURES: OnceLock<IntCounter> = OnceLock::new();

// ========================================================================
// Gauges (can increase/decrease)
// ========================================================================

/// Currently open client sessions.
pub static CONNECTED_SESSIONS: OnceLock<IntGauge> = OnceLock::new();

/// Currently logged-in users.
pub static ACTIVE_USERS: OnceLock<IntGauge> = OnceLock::new();

/// Live rooms.
pub static ACTIVE_ROOMS: OnceLock<IntGauge> = OnceLock::new();

// ========================================================================
// Operation metrics
// ========================================================================

/// Operations processed by tag (login, create, join, ...).
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Operation processing latency by tag.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Operation errors by tag and error code.
pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// View fan-out histogram: how many clients one room event pushed to.
pub static MESSAGE_FANOUT: OnceLock<Histogram> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at server startup before any metrics are recorded.
pub fn init() {
    let r = registry();

    // Helper macro to register metric
    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(
        MESSAGES_SENT,
        IntCounter::new("chat_messages_sent_total", "Total direct messages sent")
    );
    register!(
        DELIVERY_FAILURES,
        IntCounter::new(
            "chat_delivery_failures_total",
            "Pushes dropped on a full or closed client queue"
        )
    );
    register!(
        CONNECTED_SESSIONS,
        IntGauge::new("chat_connected_sessions", "Currently open client sessions")
    );
    register!(
        ACTIVE_USERS,
        IntGauge::new("chat_active_users", "Currently logged-in users")
    );
    register!(
        ACTIVE_ROOMS,
        IntGauge::new("chat_active_rooms", "Live rooms")
    );

    register!(
        COMMAND_COUNTER,
        IntCounterVec::new(
            Opts::new("chat_command_total", "Operations processed by tag"),
            &["command"]
        )
    );
    register!(
        COMMAND_LATENCY,
        HistogramVec::new(
            HistogramOpts::new("chat_command_duration_seconds", "Operation latency by tag")
                .buckets(vec![0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
            &["command"]
        )
    );
    register!(
        COMMAND_ERRORS,
        IntCounterVec::new(
            Opts::new(
                "chat_command_errors_total",
                "Operation errors by tag and code"
            ),
            &["command", "error"]
        )
    );
    register!(
        MESSAGE_FANOUT,
        Histogram::with_opts(
            HistogramOpts::new("chat_message_fanout", "Clients pushed to per room event")
                .buckets(vec![1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0])
        )
    );
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions for metric updates
// ============================================================================

/// Record a processed operation with latency.
#[inline]
pub fn record_command(command: &str, duration_secs: f64) {
    if let Some(c) = COMMAND_COUNTER.get() {
        c.with_label_values(&[command]).inc();
    }
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

/// Record an operation error.
#[inline]
pub fn record_command_error(command: &str, error: &str) {
    if let Some(c) = COMMAND_ERRORS.get() {
        c.with_label_values(&[command, error]).inc();
    }
}

/// Record a stored direct message.
#[inline]
pub fn record_message_sent() {
    if let Some(c) = MESSAGES_SENT.get() {
        c.inc();
    }
}

/// Record a push dropped on a full or closed client queue.
#[inline]
pub fn record_delivery_failure() {
    if let Some(c) = DELIVERY_FAILURES.get() {
        c.inc();
    }
}

/// Update the open-session gauge.
#[inline]
pub fn set_connected_sessions(count: i64) {
    if let Some(g) = CONNECTED_SESSIONS.get() {
        g.set(count);
    }
}

/// Update the logged-in-user gauge.
#[inline]
pub fn set_active_users(count: i64) {
    if let Some(g) = ACTIVE_USERS.get() {
        g.set(count);
    }
}

/// Update the live-room gauge.
#[inline]
pub fn set_active_rooms(count: i64) {
    if let Some(g) = ACTIVE_ROOMS.get() {
        g.set(count);
    }
}

/// Record how many clients one room event fanned out to.
#[inline]
pub fn observe_fanout(recipients: f64) {
    if let Some(h) = MESSAGE_FANOUT.get() {
        h.observe(recipients);
    }
}
