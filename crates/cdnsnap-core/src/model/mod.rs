//! CDN Snapshot entity models.
//!
//! These mirror the `contentRouters` and `contentServers` sections of a CDN
//! Snapshot as served by the control plane. Field names on the wire are
//! preserved through serde renames so a decoded snapshot re-serializes to
//! the same shape.

pub mod router;
pub mod server;
pub mod snapshot;

pub use router::RouterEntity;
pub use server::{DeliveryServiceAssignments, ServerEntity, ServerType};
pub use snapshot::{parse_snapshot_bytes, Snapshot};
