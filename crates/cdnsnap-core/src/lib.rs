//! cdnsnap core - CDN Snapshot reconciliation
//!
//! This crate computes what committing a pending CDN Snapshot would change
//! relative to the one currently deployed:
//! - Typed Traffic Router and cache server entities decoded from Snapshot JSON
//! - Field, set and sequence differs over primitive values
//! - Hostname-keyed reconciliation of router and server sets, including
//!   capability sets and per-Delivery-Service assignment order
//! - A Markdown summary for operator review
//! - Structured logging and a stable error taxonomy

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;

// Re-export commonly used types
pub use diff::{
    build_diff, compute_snapshot_diff, diff_snapshot_bytes, render_human_summary,
    router_differences, server_differences, DiagnosticSink, DiffValue, Diffable, SnapshotDiff,
};
pub use errors::{DiffError, ExError, ExErrorKind, Result};
pub use model::{parse_snapshot_bytes, RouterEntity, ServerEntity, ServerType, Snapshot};
