//! Snapshot diff engine.
//!
//! Reconciles the routers and cache servers of a current and a pending CDN
//! Snapshot and produces a structured, deterministic diff suitable for
//! approve/reject tooling and human review.
//!
//! ## Entry point
//!
//! ```ignore
//! use cdnsnap_core::diff::engine::diff_snapshot_bytes;
//!
//! let diff = diff_snapshot_bytes(current_bytes, pending_bytes)?;
//! let summary = cdnsnap_core::diff::human_summary::render_human_summary(&diff);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: hostnames, field names and Delivery Service ids are
//!   iterated in sorted order, so identical inputs give identical output.
//! - **Totality**: every hostname of either side lands in exactly one of
//!   `changed`, `deleted`, `new` or `unchanged`.
//! - **Purity**: inputs are never modified.
//! - **Tolerance**: a field whose sides cannot be compared is reported to a
//!   [`DiagnosticSink`] and treated as unchanged rather than failing the diff.

pub mod collection;
pub mod engine;
pub mod field;
pub mod human_summary;
pub mod reconcile;
pub mod router;
pub mod server;
pub mod sink;
pub mod value;

pub use collection::{ordered_diff, unordered_diff, SequenceDiff, SetDiff};
pub use engine::{compute_snapshot_diff, diff_snapshot_bytes, SnapshotDiff};
pub use field::{build_diff, FieldDiff, Record};
pub use human_summary::render_human_summary;
pub use reconcile::{EntityDiff, EntitySetDiff};
pub use router::{diff_routers, router_differences, RouterDiff, RouterDifferences, RoutersDiff};
pub use server::{
    diff_delivery_services, diff_servers, server_differences, ServerDiff, ServerDifferences,
    ServerDsDiff, ServersDiff,
};
pub use sink::{DiagnosticSink, NoopDiagnosticSink, RecordingDiagnosticSink, TracingDiagnosticSink};
pub use value::{compare_diffable, DiffValue, Diffable};
