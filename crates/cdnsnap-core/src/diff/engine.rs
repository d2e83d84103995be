//! Snapshot diff computation engine.
//!
//! The core entry point is [`compute_snapshot_diff`], which reconciles the
//! routers and servers of a current and a pending [`Snapshot`].

#![allow(clippy::result_large_err)]

use crate::diff::router::{router_differences, RoutersDiff};
use crate::diff::server::{server_differences, ServersDiff};
use crate::errors::ExError;
use crate::model::snapshot::{parse_snapshot_bytes, Snapshot};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Everything a Snapshot operation would change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDiff {
    pub routers: RoutersDiff,
    pub servers: ServersDiff,
    /// Sum of router and server changes
    pub changes: usize,
}

impl SnapshotDiff {
    /// True when committing the pending snapshot would change nothing
    pub fn is_empty(&self) -> bool {
        self.changes == 0
    }
}

/// Compute the differences between the current and the pending snapshot.
pub fn compute_snapshot_diff(current: &Snapshot, pending: &Snapshot) -> SnapshotDiff {
    let start = Instant::now();
    crate::log_op_start!("compute_snapshot_diff");

    let routers = router_differences(&current.routers, &pending.routers);
    let servers = server_differences(&current.servers, &pending.servers);
    let changes = routers.changes + servers.changes;

    crate::log_op_end!(
        "compute_snapshot_diff",
        duration_ms = start.elapsed().as_millis() as u64,
        changes = changes
    );

    SnapshotDiff {
        routers,
        servers,
        changes,
    }
}

/// Decode two raw snapshots and compute their differences.
///
/// # Errors
///
/// - `InvalidSnapshot`: either payload fails [`parse_snapshot_bytes`]; the
///   error names which side was rejected
pub fn diff_snapshot_bytes(current: &[u8], pending: &[u8]) -> Result<SnapshotDiff, ExError> {
    let start = Instant::now();

    let decoded = parse_snapshot_bytes(current)
        .map_err(|e| e.with_message_prefix("current"))
        .and_then(|c| {
            parse_snapshot_bytes(pending)
                .map_err(|e| e.with_message_prefix("pending"))
                .map(|p| (c, p))
        });

    match decoded {
        Ok((current, pending)) => Ok(compute_snapshot_diff(&current, &pending)),
        Err(err) => {
            crate::log_op_error!(
                "diff_snapshot_bytes",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}
