//! Traffic Router (DNS tier) entity.

use crate::diff::field::Record;
use crate::diff::value::Diffable;
use serde::{Deserialize, Serialize};

/// A Traffic Router as it appears in a CDN Snapshot, keyed by hostname in
/// the enclosing map.
///
/// The control plane omits any field it has no value for, and writes a
/// missing HTTPS port as `null`. Both decode as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterEntity {
    /// API port, carried as a numeric string
    #[serde(rename = "api.port", skip_serializing_if = "Option::is_none")]
    pub api_port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    pub https_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip6: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Secure API port, carried as a numeric string
    #[serde(rename = "secure.api.port", skip_serializing_if = "Option::is_none")]
    pub secure_api_port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl RouterEntity {
    /// Flatten into a record keyed by wire field name.
    ///
    /// Absent fields have no entry.
    pub fn fields(&self) -> Record {
        [
            ("api.port", self.api_port.as_deref().map(Diffable::from)),
            ("fqdn", self.fqdn.as_deref().map(Diffable::from)),
            ("httpsPort", self.https_port.map(Diffable::from)),
            ("ip", self.ip.as_deref().map(Diffable::from)),
            ("ip6", self.ip6.as_deref().map(Diffable::from)),
            ("location", self.location.as_deref().map(Diffable::from)),
            ("port", self.port.map(Diffable::from)),
            ("profile", self.profile.as_deref().map(Diffable::from)),
            (
                "secure.api.port",
                self.secure_api_port.as_deref().map(Diffable::from),
            ),
            ("status", self.status.as_deref().map(Diffable::from)),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k.to_string(), v)))
        .collect()
    }
}
