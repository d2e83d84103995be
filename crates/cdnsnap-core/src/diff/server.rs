//! Cache server differ and reconciler.
//!
//! Besides the scalar fields, a server carries an unordered capability set
//! and, for EDGE servers only, per-Delivery-Service assignment sequences.

use crate::diff::collection::{ordered_diff, unordered_diff, SetDiff};
use crate::diff::reconcile::{reconcile, EntityDiff, EntitySetDiff};
use crate::diff::value::{diff_field, DiffValue, Diffable};
use crate::model::server::{DeliveryServiceAssignments, ServerEntity, ServerType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Differences between the Delivery Service assignments of one server,
/// keyed by Delivery Service XMLID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDsDiff {
    /// Per-index changes of every assignment sequence that differs
    pub changed: BTreeMap<String, Vec<DiffValue<String>>>,
    pub deleted: DeliveryServiceAssignments,
    pub new: DeliveryServiceAssignments,
    pub unchanged: DeliveryServiceAssignments,
}

impl ServerDsDiff {
    /// True when any Delivery Service was changed, removed or added
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty() || !self.deleted.is_empty() || !self.new.is_empty()
    }

    fn all_deleted(current: &DeliveryServiceAssignments) -> Self {
        Self {
            deleted: current.clone(),
            ..Self::default()
        }
    }

    fn all_new(pending: &DeliveryServiceAssignments) -> Self {
        Self {
            new: pending.clone(),
            ..Self::default()
        }
    }
}

/// Find the differences between two sets of Delivery Service assignments.
///
/// Assignment order drives consistent hashing, so each sequence is compared
/// by index.
pub fn diff_delivery_services(
    current: &DeliveryServiceAssignments,
    pending: &DeliveryServiceAssignments,
) -> ServerDsDiff {
    let mut diff = ServerDsDiff::default();

    for (ds, cur) in current {
        match pending.get(ds) {
            None => {
                diff.deleted.insert(ds.clone(), cur.clone());
            }
            Some(pen) => {
                let seq = ordered_diff(cur, pen);
                if seq.changed {
                    diff.changed.insert(ds.clone(), seq.changes);
                } else {
                    diff.unchanged.insert(ds.clone(), cur.clone());
                }
            }
        }
    }

    for (ds, pen) in pending {
        if !current.contains_key(ds) {
            diff.new.insert(ds.clone(), pen.clone());
        }
    }

    diff
}

/// The differences in value between two definitions of a cache server.
/// A scalar field omitted by one definition has that side empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDifferences {
    pub cache_group: DiffValue<String>,
    pub capabilities: SetDiff<String>,
    /// Absent when neither side is an EDGE server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_services: Option<ServerDsDiff>,
    pub fqdn: DiffValue<String>,
    pub hash_count: DiffValue<u32>,
    pub hash_id: DiffValue<String>,
    pub https_port: DiffValue<u16>,
    pub interface_name: DiffValue<String>,
    pub ip: DiffValue<String>,
    pub ip6: DiffValue<String>,
    pub location_id: DiffValue<String>,
    pub port: DiffValue<u16>,
    pub profile: DiffValue<String>,
    pub routing_disabled: DiffValue<bool>,
    pub status: DiffValue<String>,
    #[serde(rename = "type")]
    pub server_type: DiffValue<ServerType>,
}

impl ServerDifferences {
    /// Every scalar field as a primitive pair, keyed by wire field name.
    pub fn field_values(&self) -> Vec<(&'static str, DiffValue<Diffable>)> {
        vec![
            ("cacheGroup", self.cache_group.clone().map(Diffable::from)),
            ("fqdn", self.fqdn.clone().map(Diffable::from)),
            ("hashCount", self.hash_count.clone().map(Diffable::from)),
            ("hashId", self.hash_id.clone().map(Diffable::from)),
            ("httpsPort", self.https_port.clone().map(Diffable::from)),
            (
                "interfaceName",
                self.interface_name.clone().map(Diffable::from),
            ),
            ("ip", self.ip.clone().map(Diffable::from)),
            ("ip6", self.ip6.clone().map(Diffable::from)),
            ("locationId", self.location_id.clone().map(Diffable::from)),
            ("port", self.port.clone().map(Diffable::from)),
            ("profile", self.profile.clone().map(Diffable::from)),
            (
                "routingDisabled",
                self.routing_disabled.clone().map(Diffable::from),
            ),
            ("status", self.status.clone().map(Diffable::from)),
            ("type", self.server_type.clone().map(Diffable::from)),
        ]
    }
}

/// A summary of the differences between two cache servers.
pub type ServerDiff = EntityDiff<ServerDifferences>;

/// Summarizes the differences between two sets of cache servers.
pub type ServersDiff = EntitySetDiff<ServerEntity, ServerDifferences>;

/// Find the differences between two definitions of the same cache server.
///
/// A change of tier is always a change. Leaving EDGE reports every current
/// assignment as deleted; entering EDGE reports every pending assignment as
/// new. Two MID servers carry no assignment diff at all.
pub fn diff_servers(current: &ServerEntity, pending: &ServerEntity) -> ServerDiff {
    let mut changed = false;

    // Raw flags decide the change; the diff shows them as booleans.
    if current.routing_disabled != pending.routing_disabled {
        changed = true;
    }
    let routing_disabled =
        DiffValue::both(current.is_routing_disabled(), pending.is_routing_disabled());
    if current.server_type != pending.server_type {
        changed = true;
    }
    let server_type = DiffValue::both(current.server_type, pending.server_type);

    let capabilities = unordered_diff(&current.capabilities, &pending.capabilities);
    if capabilities.is_changed() {
        changed = true;
    }

    let delivery_services = match (current.assignments(), pending.assignments()) {
        (Some(cur), Some(pen)) => {
            let ds = diff_delivery_services(cur, pen);
            if ds.has_changes() {
                changed = true;
            }
            Some(ds)
        }
        (Some(cur), None) => Some(ServerDsDiff::all_deleted(cur)),
        (None, Some(pen)) => Some(ServerDsDiff::all_new(pen)),
        (None, None) => None,
    };

    let diff = ServerDifferences {
        cache_group: diff_field(&current.cache_group, &pending.cache_group, &mut changed),
        capabilities,
        delivery_services,
        fqdn: diff_field(&current.fqdn, &pending.fqdn, &mut changed),
        hash_count: diff_field(&current.hash_count, &pending.hash_count, &mut changed),
        hash_id: diff_field(&current.hash_id, &pending.hash_id, &mut changed),
        https_port: diff_field(&current.https_port, &pending.https_port, &mut changed),
        interface_name: diff_field(
            &current.interface_name,
            &pending.interface_name,
            &mut changed,
        ),
        ip: diff_field(&current.ip, &pending.ip, &mut changed),
        ip6: diff_field(&current.ip6, &pending.ip6, &mut changed),
        location_id: diff_field(&current.location_id, &pending.location_id, &mut changed),
        port: diff_field(&current.port, &pending.port, &mut changed),
        profile: diff_field(&current.profile, &pending.profile, &mut changed),
        routing_disabled,
        status: diff_field(&current.status, &pending.status, &mut changed),
        server_type,
    };

    ServerDiff { changed, diff }
}

/// Find the differences between two sets of cache servers keyed by
/// hostname.
pub fn server_differences(
    current: &BTreeMap<String, ServerEntity>,
    pending: &BTreeMap<String, ServerEntity>,
) -> ServersDiff {
    reconcile("server_differences", current, pending, |_, c, p| {
        diff_servers(c, p)
    })
}
