//! Diagnostic sinks for non-fatal problems found while diffing.
//!
//! A field that cannot be compared never aborts a reconciliation. The
//! problem is handed to a [`DiagnosticSink`] and the field is treated as
//! unchanged.

use crate::errors::{ExError, ExErrorKind};
use cdnsnap_core_types::schema::EVENT_DIAGNOSTIC;
use std::sync::Mutex;

/// Receives diagnostics raised while diffing.
pub trait DiagnosticSink {
    /// A pair of field values could not be compared.
    fn comparison_failed(&self, field: &str, err: &ExError);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn comparison_failed(&self, field: &str, err: &ExError) {
        (**self).comparison_failed(field, err)
    }
}

/// Emits each diagnostic as a `warn` level tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnosticSink;

impl DiagnosticSink for TracingDiagnosticSink {
    fn comparison_failed(&self, field: &str, err: &ExError) {
        tracing::warn!(
            component = module_path!(),
            event = EVENT_DIAGNOSTIC,
            field = field,
            err.kind = ?err.kind(),
            err.code = err.code(),
            "treating field as unchanged: {}",
            err
        );
    }
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnosticSink;

impl DiagnosticSink for NoopDiagnosticSink {
    fn comparison_failed(&self, _field: &str, _err: &ExError) {}
}

/// Keeps diagnostics in memory, for callers that surface them next to the
/// diff instead of in the logs.
#[derive(Debug, Default)]
pub struct RecordingDiagnosticSink {
    records: Mutex<Vec<(String, ExErrorKind)>>,
}

impl RecordingDiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded `(field, kind)` pairs in arrival order
    pub fn records(&self) -> Vec<(String, ExErrorKind)> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().map(|r| r.is_empty()).unwrap_or(true)
    }
}

impl DiagnosticSink for RecordingDiagnosticSink {
    fn comparison_failed(&self, field: &str, err: &ExError) {
        self.records
            .lock()
            .map(|mut r| r.push((field.to_string(), err.kind())))
            .ok();
    }
}
