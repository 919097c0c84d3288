//! Metrics sink boundary.
//!
//! Table operations MUST NOT touch obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only bridge between method execution and the
//! global metrics state.
use crate::{error::ErrorCode, obs::metrics};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// Method
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Method {
    Bind,
    Unbind,
    UpdateStat,
    QueryRows,
    SeekEntries,
    GetMatches,
    ResortRestriction,
    CompareMids,
    DnToMid,
    GetPropList,
    GetProps,
    QueryColumns,
    GetSpecialTable,
    GetTemplateInfo,
    ResolveNames,
    ResolveNamesW,
    ModProps,
    ModLinkAtt,
}

impl Method {
    /// Stable label used in logs and metrics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bind => "bind",
            Self::Unbind => "unbind",
            Self::UpdateStat => "update_stat",
            Self::QueryRows => "query_rows",
            Self::SeekEntries => "seek_entries",
            Self::GetMatches => "get_matches",
            Self::ResortRestriction => "resort_restriction",
            Self::CompareMids => "compare_mids",
            Self::DnToMid => "dn_to_mid",
            Self::GetPropList => "get_prop_list",
            Self::GetProps => "get_props",
            Self::QueryColumns => "query_columns",
            Self::GetSpecialTable => "get_special_table",
            Self::GetTemplateInfo => "get_template_info",
            Self::ResolveNames => "resolve_names",
            Self::ResolveNamesW => "resolve_names_w",
            Self::ModProps => "mod_props",
            Self::ModLinkAtt => "mod_link_att",
        }
    }
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    MethodStart {
        method: Method,
    },
    MethodFinish {
        method: Method,
        code: ErrorCode,
        rows: u64,
    },
    RowsScanned {
        method: Method,
        rows_scanned: u64,
    },
    SessionBound,
    SessionUnbound,
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default process-wide sink that writes into global metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| m.apply(event));
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let installed = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match installed {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state.
///
/// `window_start_ms` filters by window start (`EventState::window_start_ms`),
/// not by per-event timestamps.
#[must_use]
pub fn metrics_report(window_start_ms: Option<u64>) -> metrics::EventReport {
    metrics::report_window_start(window_start_ms)
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

/// Span
/// RAII guard that emits start/finish events for one method call.
/// Finish accounting happens even on unwind; an unset code reports
/// `GeneralFailure`.

pub(crate) struct Span {
    method: Method,
    code: ErrorCode,
    rows: u64,
    warned: bool,
}

impl Span {
    #[must_use]
    pub(crate) fn new(method: Method) -> Self {
        record(MetricsEvent::MethodStart { method });

        Self {
            method,
            code: ErrorCode::GeneralFailure,
            rows: 0,
            warned: false,
        }
    }

    pub(crate) fn set_rows(&mut self, rows: usize) {
        self.rows = u64::try_from(rows).unwrap_or(u64::MAX);
    }

    pub(crate) fn scanned(&self, rows_scanned: usize) {
        record(MetricsEvent::RowsScanned {
            method: self.method,
            rows_scanned: u64::try_from(rows_scanned).unwrap_or(u64::MAX),
        });
    }

    /// Record the outcome of `result` and hand it back.
    pub(crate) fn finish<T>(&mut self, result: Result<T, ErrorCode>) -> Result<T, ErrorCode> {
        self.code = match &result {
            Ok(_) if self.warned => ErrorCode::ErrorsReturned,
            Ok(_) => ErrorCode::Success,
            Err(code) => *code,
        };
        if let Err(code) = &result {
            tracing::debug!(method = self.method.label(), code = code.label(), "method failed");
        }

        result
    }

    /// Mark a successful reply as carrying `ErrorsReturned`.
    pub(crate) const fn errors_returned(&mut self) {
        self.warned = true;
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        record(MetricsEvent::MethodFinish {
            method: self.method,
            code: self.code,
            rows: self.rows,
        });
    }
}
