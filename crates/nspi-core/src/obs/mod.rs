//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Log output goes through `tracing`; this module only keeps counters.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, EventState, MethodCounters, MethodSummary};
pub use sink::{
    Method, MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink,
};
