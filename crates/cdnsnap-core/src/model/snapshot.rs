//! Whole-CDN snapshot payload and its decoding.

#![allow(clippy::result_large_err)]

use crate::errors::{ExError, ExErrorKind};
use crate::model::router::RouterEntity;
use crate::model::server::ServerEntity;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Control-plane section name, then the short name it shadows.
const SECTION_NAMES: [(&str, &str); 2] = [
    ("contentRouters", "routers"),
    ("contentServers", "servers"),
];

/// The routing-relevant part of a CDN Snapshot: routers and cache servers,
/// each keyed by hostname.
///
/// The control plane names these sections `contentRouters` and
/// `contentServers`; both those names and the short ones are accepted. Other
/// sections of a full snapshot are ignored.
///
/// Decoding a payload that carries both names of one section directly with
/// serde fails as a duplicate field. [`parse_snapshot_bytes`] drops the short
/// name first, so the control-plane section wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, alias = "contentRouters")]
    pub routers: BTreeMap<String, RouterEntity>,
    #[serde(default, alias = "contentServers")]
    pub servers: BTreeMap<String, ServerEntity>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.routers.is_empty() && self.servers.is_empty()
    }
}

/// Decode raw snapshot bytes into a typed [`Snapshot`].
///
/// Accepts either a bare snapshot object or the API envelope
/// `{"response": {...}}`. When a section appears under both its names, the
/// `contentRouters`/`contentServers` one is used.
///
/// # Errors
///
/// - `InvalidSnapshot`: bytes are not valid UTF-8 or JSON, the root is not an
///   object, or an entity does not match the router/server schema
pub fn parse_snapshot_bytes(bytes: &[u8]) -> Result<Snapshot, ExError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        ExError::new(ExErrorKind::InvalidSnapshot)
            .with_op("parse_snapshot_bytes")
            .with_message(format!("snapshot is not valid UTF-8: {}", e))
    })?;

    let raw: Value = serde_json::from_str(text).map_err(|e| {
        ExError::new(ExErrorKind::InvalidSnapshot)
            .with_op("parse_snapshot_bytes")
            .with_message(format!("snapshot is not valid JSON: {}", e))
    })?;

    let mut raw = match raw {
        Value::Object(mut obj) => match obj.remove("response") {
            Some(inner @ Value::Object(_)) => inner,
            Some(other) => {
                obj.insert("response".to_string(), other);
                Value::Object(obj)
            }
            None => Value::Object(obj),
        },
        _ => {
            return Err(ExError::new(ExErrorKind::InvalidSnapshot)
                .with_op("parse_snapshot_bytes")
                .with_message("snapshot JSON root must be an object"))
        }
    };

    if let Value::Object(obj) = &mut raw {
        for (long, short) in SECTION_NAMES {
            if obj.contains_key(long) {
                obj.remove(short);
            }
        }
    }

    serde_json::from_value(raw).map_err(|e| {
        ExError::new(ExErrorKind::InvalidSnapshot)
            .with_op("parse_snapshot_bytes")
            .with_message(format!("failed to deserialize snapshot: {}", e))
    })
}
