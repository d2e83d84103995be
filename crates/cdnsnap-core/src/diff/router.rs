//! Traffic Router differ and reconciler.

use crate::diff::reconcile::{reconcile, EntityDiff, EntitySetDiff};
use crate::diff::value::{diff_field, DiffValue, Diffable};
use crate::model::router::RouterEntity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The differences in value between two definitions of a Traffic Router.
/// Every field is present whether or not it changed. A field omitted by one
/// definition has that side empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterDifferences {
    #[serde(rename = "api.port")]
    pub api_port: DiffValue<String>,
    pub fqdn: DiffValue<String>,
    pub https_port: DiffValue<u16>,
    pub ip: DiffValue<String>,
    pub ip6: DiffValue<String>,
    pub location: DiffValue<String>,
    pub port: DiffValue<u16>,
    pub profile: DiffValue<String>,
    #[serde(rename = "secure.api.port")]
    pub secure_api_port: DiffValue<String>,
    pub status: DiffValue<String>,
}

impl RouterDifferences {
    /// Every field as a primitive pair, keyed by wire field name.
    pub fn field_values(&self) -> Vec<(&'static str, DiffValue<Diffable>)> {
        vec![
            ("api.port", self.api_port.clone().map(Diffable::from)),
            ("fqdn", self.fqdn.clone().map(Diffable::from)),
            ("httpsPort", self.https_port.clone().map(Diffable::from)),
            ("ip", self.ip.clone().map(Diffable::from)),
            ("ip6", self.ip6.clone().map(Diffable::from)),
            ("location", self.location.clone().map(Diffable::from)),
            ("port", self.port.clone().map(Diffable::from)),
            ("profile", self.profile.clone().map(Diffable::from)),
            (
                "secure.api.port",
                self.secure_api_port.clone().map(Diffable::from),
            ),
            ("status", self.status.clone().map(Diffable::from)),
        ]
    }
}

/// A summary of the differences between two Traffic Routers.
pub type RouterDiff = EntityDiff<RouterDifferences>;

/// Summarizes the differences between two sets of Traffic Routers.
pub type RoutersDiff = EntitySetDiff<RouterEntity, RouterDifferences>;

/// Find the differences between two definitions of the same Traffic Router.
pub fn diff_routers(current: &RouterEntity, pending: &RouterEntity) -> RouterDiff {
    let mut changed = false;
    let diff = RouterDifferences {
        api_port: diff_field(&current.api_port, &pending.api_port, &mut changed),
        fqdn: diff_field(&current.fqdn, &pending.fqdn, &mut changed),
        https_port: diff_field(&current.https_port, &pending.https_port, &mut changed),
        ip: diff_field(&current.ip, &pending.ip, &mut changed),
        ip6: diff_field(&current.ip6, &pending.ip6, &mut changed),
        location: diff_field(&current.location, &pending.location, &mut changed),
        port: diff_field(&current.port, &pending.port, &mut changed),
        profile: diff_field(&current.profile, &pending.profile, &mut changed),
        secure_api_port: diff_field(
            &current.secure_api_port,
            &pending.secure_api_port,
            &mut changed,
        ),
        status: diff_field(&current.status, &pending.status, &mut changed),
    };
    RouterDiff { changed, diff }
}

/// Find the differences between two sets of Traffic Routers keyed by
/// hostname.
pub fn router_differences(
    current: &BTreeMap<String, RouterEntity>,
    pending: &BTreeMap<String, RouterEntity>,
) -> RoutersDiff {
    reconcile("router_differences", current, pending, |_, c, p| {
        diff_routers(c, p)
    })
}
