//! Cache server (EDGE / MID tier) entity.

use crate::diff::field::Record;
use crate::diff::value::Diffable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Delivery Service XMLID to the ordered assignment tokens of one server.
pub type DeliveryServiceAssignments = BTreeMap<String, Vec<String>>;

static NO_ASSIGNMENTS: DeliveryServiceAssignments = BTreeMap::new();

/// Cache tier of a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServerType {
    Edge,
    Mid,
}

impl ServerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerType::Edge => "EDGE",
            ServerType::Mid => "MID",
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ServerType> for Diffable {
    fn from(value: ServerType) -> Self {
        Diffable::from(value.as_str())
    }
}

/// A cache server as it appears in a CDN Snapshot, keyed by hostname in the
/// enclosing map.
///
/// Scalar fields the control plane omits, or writes as `null` (`port` and
/// `interfaceName` may be), decode as `None`. The tier is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_group: Option<String>,
    /// Capability names; order carries no meaning
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Only meaningful for EDGE servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_services: Option<DeliveryServiceAssignments>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_id: Option<String>,
    #[serde(default)]
    pub https_port: Option<u16>,
    #[serde(default)]
    pub interface_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip6: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// `0` or `1` on the wire
    #[serde(default)]
    pub routing_disabled: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub server_type: ServerType,
}

impl ServerEntity {
    /// Delivery Service assignments, if this server's tier has any.
    ///
    /// An EDGE server without a `deliveryServices` object has no
    /// assignments; a MID server returns `None` whatever it carries.
    pub fn assignments(&self) -> Option<&DeliveryServiceAssignments> {
        match self.server_type {
            ServerType::Edge => Some(self.delivery_services.as_ref().unwrap_or(&NO_ASSIGNMENTS)),
            ServerType::Mid => None,
        }
    }

    pub fn is_routing_disabled(&self) -> bool {
        self.routing_disabled != 0
    }

    /// Flatten the scalar fields into a record keyed by wire field name.
    ///
    /// `capabilities` and `deliveryServices` are collections and are left
    /// out, as are absent fields.
    pub fn scalar_fields(&self) -> Record {
        [
            ("cacheGroup", self.cache_group.as_deref().map(Diffable::from)),
            ("fqdn", self.fqdn.as_deref().map(Diffable::from)),
            ("hashCount", self.hash_count.map(Diffable::from)),
            ("hashId", self.hash_id.as_deref().map(Diffable::from)),
            ("httpsPort", self.https_port.map(Diffable::from)),
            (
                "interfaceName",
                self.interface_name.as_deref().map(Diffable::from),
            ),
            ("ip", self.ip.as_deref().map(Diffable::from)),
            ("ip6", self.ip6.as_deref().map(Diffable::from)),
            ("locationId", self.location_id.as_deref().map(Diffable::from)),
            ("port", self.port.map(Diffable::from)),
            ("profile", self.profile.as_deref().map(Diffable::from)),
            ("routingDisabled", Some(self.routing_disabled.into())),
            ("status", self.status.as_deref().map(Diffable::from)),
            ("type", Some(self.server_type.into())),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k.to_string(), v)))
        .collect()
    }
}
