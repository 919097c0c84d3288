use crate::obs::sink::{MetricsEvent, Method};
use serde::Serialize;
use std::{
    cmp::Ordering,
    collections::BTreeMap,
    sync::{LazyLock, Mutex, PoisonError},
    time::{SystemTime, UNIX_EPOCH},
};

///
/// EventState
/// Ephemeral, in-memory counters for address-book methods.
///

#[derive(Clone, Debug, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub methods: BTreeMap<String, MethodCounters>,
    pub codes: BTreeMap<String, u64>,
    pub window_start_ms: u64,
}

impl EventState {
    fn fresh() -> Self {
        Self {
            ops: EventOps::default(),
            methods: BTreeMap::new(),
            codes: BTreeMap::new(),
            window_start_ms: now_millis(),
        }
    }

    /// Fold one event into the counters.
    pub(crate) fn apply(&mut self, event: MetricsEvent) {
        match event {
            MetricsEvent::MethodStart { method } => {
                self.ops.method_calls = self.ops.method_calls.saturating_add(1);
                let entry = self.method_entry(method);
                entry.calls = entry.calls.saturating_add(1);
            }

            MetricsEvent::MethodFinish { method, code, rows } => {
                self.ops.rows_returned = self.ops.rows_returned.saturating_add(rows);
                let failed = !code.is_success();
                if failed {
                    self.ops.failures = self.ops.failures.saturating_add(1);
                }

                let entry = self.method_entry(method);
                entry.rows_returned = entry.rows_returned.saturating_add(rows);
                if failed {
                    entry.failures = entry.failures.saturating_add(1);
                }

                let count = self.codes.entry(code.label().to_string()).or_default();
                *count = count.saturating_add(1);
            }

            MetricsEvent::RowsScanned {
                method,
                rows_scanned,
            } => {
                self.ops.rows_scanned = self.ops.rows_scanned.saturating_add(rows_scanned);
                let entry = self.method_entry(method);
                entry.rows_scanned = entry.rows_scanned.saturating_add(rows_scanned);
            }

            MetricsEvent::SessionBound => {
                self.ops.sessions_bound = self.ops.sessions_bound.saturating_add(1);
            }

            MetricsEvent::SessionUnbound => {
                self.ops.sessions_unbound = self.ops.sessions_unbound.saturating_add(1);
            }
        }
    }

    fn method_entry(&mut self, method: Method) -> &mut MethodCounters {
        self.methods.entry(method.label().to_string()).or_default()
    }
}

impl Default for EventState {
    fn default() -> Self {
        Self::fresh()
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct EventOps {
    // Method entrypoints
    pub method_calls: u64,
    pub failures: u64,

    // Rows
    pub rows_returned: u64,
    pub rows_scanned: u64,

    // Sessions
    pub sessions_bound: u64,
    pub sessions_unbound: u64,
}

///
/// MethodCounters
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct MethodCounters {
    pub calls: u64,
    pub failures: u64,
    pub rows_returned: u64,
    pub rows_scanned: u64,
}

static EVENT_STATE: LazyLock<Mutex<EventState>> = LazyLock::new(|| Mutex::new(EventState::fresh()));

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    let guard = EVENT_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    f(&guard)
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    let mut guard = EVENT_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Reset all counters and open a new window.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::fresh());
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct EventReport {
    /// Counters since `window_start_ms`.
    pub counters: Option<EventState>,
    /// Per-method counters, busiest first.
    pub method_summaries: Vec<MethodSummary>,
}

///
/// MethodSummary
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct MethodSummary {
    pub method: String,
    pub calls: u64,
    pub failures: u64,
    pub rows_returned: u64,
    pub rows_scanned: u64,
    pub avg_rows_per_call: f64,
}

/// Build a report from a state snapshot. A `window_start_ms` after the
/// snapshot's window start yields an empty report.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub(crate) fn report_from(snap: EventState, window_start_ms: Option<u64>) -> EventReport {
    if window_start_ms.is_some_and(|start| start > snap.window_start_ms) {
        return EventReport::default();
    }

    let mut method_summaries: Vec<MethodSummary> = snap
        .methods
        .iter()
        .map(|(method, c)| MethodSummary {
            method: method.clone(),
            calls: c.calls,
            failures: c.failures,
            rows_returned: c.rows_returned,
            rows_scanned: c.rows_scanned,
            avg_rows_per_call: if c.calls > 0 {
                c.rows_returned as f64 / c.calls as f64
            } else {
                0.0
            },
        })
        .collect();

    method_summaries.sort_by(|a, b| match b.calls.cmp(&a.calls) {
        Ordering::Equal => a.method.cmp(&b.method),
        other => other,
    });

    EventReport {
        counters: Some(snap),
        method_summaries,
    }
}

/// Report over the global state.
#[must_use]
pub(crate) fn report_window_start(window_start_ms: Option<u64>) -> EventReport {
    report_from(with_state(Clone::clone), window_start_ms)
}

///
/// TESTS
///

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn finish(method: Method, code: ErrorCode, rows: u64) -> MetricsEvent {
        MetricsEvent::MethodFinish { method, code, rows }
    }

    #[test]
    fn apply_accumulates_per_method_and_per_code() {
        let mut state = EventState::default();
        state.apply(MetricsEvent::MethodStart {
            method: Method::QueryRows,
        });
        state.apply(finish(Method::QueryRows, ErrorCode::Success, 3));
        state.apply(MetricsEvent::MethodStart {
            method: Method::QueryRows,
        });
        state.apply(finish(Method::QueryRows, ErrorCode::InvalidBookmark, 0));
        state.apply(MetricsEvent::RowsScanned {
            method: Method::GetMatches,
            rows_scanned: 7,
        });

        assert_eq!(state.ops.method_calls, 2);
        assert_eq!(state.ops.failures, 1);
        assert_eq!(state.ops.rows_returned, 3);
        assert_eq!(state.ops.rows_scanned, 7);

        let rows = &state.methods["query_rows"];
        assert_eq!(rows.calls, 2);
        assert_eq!(rows.failures, 1);
        assert_eq!(state.methods["get_matches"].rows_scanned, 7);
        assert_eq!(state.codes["success"], 1);
        assert_eq!(state.codes["invalid_bookmark"], 1);
    }

    #[test]
    fn errors_returned_is_not_a_failure() {
        let mut state = EventState::default();
        state.apply(finish(Method::GetProps, ErrorCode::ErrorsReturned, 1));

        assert_eq!(state.ops.failures, 0);
        assert_eq!(state.codes["errors_returned"], 1);
    }

    #[test]
    fn sessions_are_counted() {
        let mut state = EventState::default();
        state.apply(MetricsEvent::SessionBound);
        state.apply(MetricsEvent::SessionBound);
        state.apply(MetricsEvent::SessionUnbound);

        assert_eq!(state.ops.sessions_bound, 2);
        assert_eq!(state.ops.sessions_unbound, 1);
    }

    #[test]
    fn report_sorts_methods_by_calls() {
        let mut state = EventState::default();
        for _ in 0..2 {
            state.apply(MetricsEvent::MethodStart {
                method: Method::UpdateStat,
            });
        }
        state.apply(MetricsEvent::MethodStart {
            method: Method::QueryRows,
        });
        state.apply(finish(Method::QueryRows, ErrorCode::Success, 4));
        state.apply(MetricsEvent::MethodStart {
            method: Method::Bind,
        });

        let report = report_from(state, None);
        let order: Vec<_> = report
            .method_summaries
            .iter()
            .map(|s| s.method.as_str())
            .collect();

        assert_eq!(order, ["update_stat", "bind", "query_rows"]);
        assert_eq!(report.method_summaries[2].avg_rows_per_call, 4.0);
    }

    #[test]
    fn report_window_filter() {
        let state = EventState::default();
        let start = state.window_start_ms;

        assert!(report_from(state.clone(), Some(start.saturating_sub(1))).counters.is_some());
        assert!(report_from(state.clone(), None).counters.is_some());

        let late = report_from(state, Some(start.saturating_add(1)));
        assert!(late.counters.is_none());
        assert!(late.method_summaries.is_empty());
    }
}
