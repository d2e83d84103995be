//! Cache server reconciliation tests.
//!
//! Covers scalar fields, capability sets, Delivery Service assignment order
//! and the EDGE/MID type transitions.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use cdnsnap_core::diff::server::server_differences;
use cdnsnap_core::diff::{diff_snapshot_bytes, DiffValue};
use cdnsnap_core::model::{ServerEntity, ServerType};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn servers(value: Value) -> BTreeMap<String, ServerEntity> {
    serde_json::from_value(value).expect("fixture must decode")
}

/// A server whose scalar fields are shared by every host in a scenario.
fn server(fqdn: &str, server_type: &str) -> Value {
    json!({
        "cacheGroup": "test.quest cache group",
        "capabilities": [],
        "fqdn": fqdn,
        "hashCount": 4,
        "hashId": "hash ID 4",
        "httpsPort": 7,
        "interfaceName": "eth2",
        "ip": "0.0.0.3",
        "ip6": ":3",
        "locationId": "test.quest location",
        "port": 8,
        "profile": "test.quest profile",
        "routingDisabled": 0,
        "status": "test.quest status",
        "type": server_type
    })
}

fn with_ds(mut server: Value, ds: Value) -> Value {
    server["deliveryServices"] = ds;
    server
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn assert_scalars_unchanged(diff: &cdnsnap_core::diff::ServerDifferences) {
    for (name, value) in diff.field_values() {
        if name != "type" {
            assert!(!value.is_changed(), "`{}` should be unchanged", name);
        }
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_capability_less_mid_servers() {
    let current = servers(json!({
        "fizz.buzz": {
            "cacheGroup": "fizz.buzz cache group", "capabilities": [], "fqdn": "fizz.buzz.cdn.test",
            "hashCount": 1, "hashId": "hash ID 1", "httpsPort": 1, "interfaceName": "eth0",
            "ip": "0.0.0.1", "ip6": "::1", "locationId": "fizz.buzz location", "port": 2,
            "profile": "fizz.buzz profile", "routingDisabled": 0, "status": "ONLINE", "type": "MID"
        },
        "foo.bar": {
            "cacheGroup": "foo.bar cache group", "capabilities": [], "fqdn": "foo.bar.cdn.test",
            "hashCount": 2, "hashId": "hash ID 2", "httpsPort": 3, "interfaceName": "eth1",
            "ip": "0.0.0.2", "ip6": "::2", "locationId": "foo.bar location", "port": 4,
            "profile": "foo.bar profile", "routingDisabled": 0, "status": "REPORTED", "type": "MID"
        },
        "test.quest": server("test.quest.cdn.test", "MID"),
    }));
    let pending = servers(json!({
        "fizz.buzz": {
            "cacheGroup": "fizz.buzz cache group", "capabilities": [], "fqdn": "fizz.buzz.cdn.test",
            "hashCount": 1, "hashId": "hash ID 1", "httpsPort": 1, "interfaceName": "eth0",
            "ip": "0.0.0.1", "ip6": "::1", "locationId": "fizz.buzz location", "port": 2,
            "profile": "fizz.buzz profile", "routingDisabled": 0, "status": "ONLINE", "type": "MID"
        },
        "foo.bar": {
            "cacheGroup": "foo.bar changed cache group", "capabilities": [], "deliveryServices": {},
            "fqdn": "foo.bar.changed.cdn.test", "hashCount": 3, "hashId": "hash ID 3",
            "httpsPort": 5, "interfaceName": "eth2", "ip": "0.0.0.3", "ip6": "::3",
            "locationId": "foo.bar changed location", "port": 6, "profile": "foo.bar changed profile",
            "routingDisabled": 1, "status": "NOT REPORTED", "type": "EDGE"
        },
        "gee.whiz": server("gee.whiz.cdn.test", "MID"),
    }));

    let diff = server_differences(&current, &pending);
    assert_eq!(
        diff.changes,
        diff.changed.len() + diff.deleted.len() + diff.new.len()
    );
    assert_eq!(diff.changes, 3);
    assert_eq!(diff.changed.len(), 1);

    assert_eq!(
        serde_json::to_value(&diff.changed[0]).unwrap(),
        json!({
            "cacheGroup": {"newValue": "foo.bar changed cache group", "oldValue": "foo.bar cache group"},
            "capabilities": {"deleted": [], "new": [], "unchanged": []},
            "deliveryServices": {"changed": {}, "deleted": {}, "new": {}, "unchanged": {}},
            "fqdn": {"newValue": "foo.bar.changed.cdn.test", "oldValue": "foo.bar.cdn.test"},
            "hashCount": {"newValue": 3, "oldValue": 2},
            "hashId": {"newValue": "hash ID 3", "oldValue": "hash ID 2"},
            "httpsPort": {"newValue": 5, "oldValue": 3},
            "interfaceName": {"newValue": "eth2", "oldValue": "eth1"},
            "ip": {"newValue": "0.0.0.3", "oldValue": "0.0.0.2"},
            "ip6": {"newValue": "::3", "oldValue": "::2"},
            "locationId": {"newValue": "foo.bar changed location", "oldValue": "foo.bar location"},
            "port": {"newValue": 6, "oldValue": 4},
            "profile": {"newValue": "foo.bar changed profile", "oldValue": "foo.bar profile"},
            "routingDisabled": {"newValue": true, "oldValue": false},
            "status": {"newValue": "NOT REPORTED", "oldValue": "REPORTED"},
            "type": {"newValue": "EDGE", "oldValue": "MID"}
        })
    );

    assert_eq!(diff.new, vec![pending["gee.whiz"].clone()]);
    assert_eq!(diff.deleted, vec![current["test.quest"].clone()]);
    assert_eq!(diff.unchanged, vec![current["fizz.buzz"].clone()]);
}

#[test]
fn test_capability_only_difference() {
    let mut cur = server("test.quest.cdn.test", "MID");
    cur["capabilities"] = json!(["a", "b", "c"]);
    let mut pen = server("test.quest.cdn.test", "MID");
    pen["capabilities"] = json!(["a", "c", "d"]);

    let diff = server_differences(
        &servers(json!({"test.quest": cur})),
        &servers(json!({"test.quest": pen})),
    );
    assert_eq!(diff.changed.len(), 1);
    assert!(diff.deleted.is_empty() && diff.new.is_empty() && diff.unchanged.is_empty());

    let server_diff = &diff.changed[0];
    assert_scalars_unchanged(server_diff);
    assert!(!server_diff.server_type.is_changed());
    assert_eq!(server_diff.delivery_services, None);
    assert_eq!(server_diff.capabilities.deleted, set(&["b"]));
    assert_eq!(server_diff.capabilities.new, set(&["d"]));
    assert_eq!(server_diff.capabilities.unchanged, set(&["a", "c"]));
}

#[test]
fn test_ordered_delivery_service_differences() {
    let current = servers(json!({
        "fizz.buzz": with_ds(server("fizz.buzz", "EDGE"), json!({
            "a": ["1", "2", "3"],
            "b": ["4", "5", "6"],
            "c": ["7", "8", "9"]
        })),
        "foo.bar": with_ds(server("foo.bar", "EDGE"), json!({"a": ["1", "2", "3"]})),
        "gee.whiz": server("gee.whiz", "MID"),
        "test.quest": server("test.quest", "MID"),
    }));
    let pending = servers(json!({
        "fizz.buzz": with_ds(server("fizz.buzz", "EDGE"), json!({
            "a": ["1", "2", "3"],
            "b": ["5", "6", "7"],
            "d": ["8", "9", "10"]
        })),
        "foo.bar": server("foo.bar", "MID"),
        "gee.whiz": with_ds(server("gee.whiz", "EDGE"), json!({"a": ["1", "2", "3"]})),
        "test.quest": server("test.quest", "MID"),
    }));

    let diff = server_differences(&current, &pending);
    assert_eq!(diff.changes, 3);
    assert_eq!(diff.changed.len(), 3);
    assert_eq!(diff.unchanged.len(), 1);

    // EDGE -> EDGE
    let fizz = &diff.changed[0];
    assert_eq!(fizz.fqdn.new_value.as_deref(), Some("fizz.buzz"));
    assert_scalars_unchanged(fizz);
    assert!(!fizz.server_type.is_changed());
    let ds = fizz.delivery_services.as_ref().unwrap();
    assert_eq!(ds.unchanged.len(), 1);
    assert_eq!(ds.unchanged["a"], strings(&["1", "2", "3"]));
    assert_eq!(ds.deleted.len(), 1);
    assert_eq!(ds.deleted["c"], strings(&["7", "8", "9"]));
    assert_eq!(ds.new.len(), 1);
    assert_eq!(ds.new["d"], strings(&["8", "9", "10"]));
    assert_eq!(ds.changed.len(), 1);
    assert_eq!(
        ds.changed["b"],
        vec![
            DiffValue::both("4".to_string(), "5".to_string()),
            DiffValue::both("5".to_string(), "6".to_string()),
            DiffValue::both("6".to_string(), "7".to_string()),
        ]
    );

    // EDGE -> MID
    let foo = &diff.changed[1];
    assert_eq!(foo.fqdn.new_value.as_deref(), Some("foo.bar"));
    assert_scalars_unchanged(foo);
    assert_eq!(
        foo.server_type,
        DiffValue::both(ServerType::Edge, ServerType::Mid)
    );
    let ds = foo.delivery_services.as_ref().unwrap();
    assert!(ds.changed.is_empty() && ds.new.is_empty() && ds.unchanged.is_empty());
    assert_eq!(ds.deleted.len(), 1);
    assert_eq!(ds.deleted["a"], strings(&["1", "2", "3"]));

    // MID -> EDGE
    let gee = &diff.changed[2];
    assert_eq!(gee.fqdn.new_value.as_deref(), Some("gee.whiz"));
    assert_scalars_unchanged(gee);
    assert_eq!(
        gee.server_type,
        DiffValue::both(ServerType::Mid, ServerType::Edge)
    );
    let ds = gee.delivery_services.as_ref().unwrap();
    assert!(ds.changed.is_empty() && ds.deleted.is_empty() && ds.unchanged.is_empty());
    assert_eq!(ds.new.len(), 1);
    assert_eq!(ds.new["a"], strings(&["1", "2", "3"]));
}

#[test]
fn test_single_position_reassignment() {
    let current = servers(json!({"x": with_ds(server("x", "EDGE"), json!({"ds1": ["1", "2", "3"]}))}));
    let pending = servers(json!({"x": with_ds(server("x", "EDGE"), json!({"ds1": ["1", "9", "3"]}))}));

    let diff = server_differences(&current, &pending);
    assert_eq!(diff.changed.len(), 1);
    let ds = diff.changed[0].delivery_services.as_ref().unwrap();
    assert_eq!(
        serde_json::to_value(&ds.changed["ds1"]).unwrap(),
        json!([
            {"newValue": "1", "oldValue": "1"},
            {"newValue": "9", "oldValue": "2"},
            {"newValue": "3", "oldValue": "3"}
        ])
    );
}

#[test]
fn test_edge_without_assignments_gains_one() {
    let current = servers(json!({"x": server("x", "EDGE")}));
    let pending = servers(json!({"x": with_ds(server("x", "EDGE"), json!({"ds1": ["1"]}))}));

    let diff = server_differences(&current, &pending);
    assert_eq!(diff.changed.len(), 1);
    let ds = diff.changed[0].delivery_services.as_ref().unwrap();
    assert_eq!(ds.new["ds1"], strings(&["1"]));
}

#[test]
fn test_mid_assignments_are_ignored() {
    let current = servers(json!({"x": with_ds(server("x", "MID"), json!({"ds1": ["1"]}))}));
    let pending = servers(json!({"x": with_ds(server("x", "MID"), json!({"ds1": ["2"]}))}));

    let diff = server_differences(&current, &pending);
    assert_eq!(diff.changes, 0);
    assert_eq!(diff.unchanged.len(), 1);
}

#[test]
fn test_null_port_is_a_one_sided_change() {
    let mut null_port = server("x.cdn.test", "MID");
    null_port["port"] = Value::Null;

    let current = json!({"contentServers": {"x": null_port.clone()}}).to_string();
    let pending = json!({"contentServers": {"x": server("x.cdn.test", "MID")}}).to_string();

    let diff = diff_snapshot_bytes(current.as_bytes(), pending.as_bytes()).unwrap();
    assert_eq!(diff.servers.changes, 1);
    let changed = &diff.servers.changed[0];
    assert_eq!(changed.port, DiffValue::added(8));
    assert_eq!(
        serde_json::to_value(&changed.port).unwrap(),
        json!({"newValue": 8})
    );

    let same = diff_snapshot_bytes(current.as_bytes(), current.as_bytes()).unwrap();
    assert_eq!(same.changes, 0);
}

#[test]
fn test_server_field_omitted_on_one_side() {
    let mut sparse = server("x.cdn.test", "EDGE");
    sparse.as_object_mut().unwrap().remove("hashId");
    let current = servers(json!({"x": server("x.cdn.test", "EDGE")}));
    let pending = servers(json!({"x": sparse}));

    let diff = server_differences(&current, &pending);
    assert_eq!(diff.changes, 1);
    assert_eq!(
        diff.changed[0].hash_id,
        DiffValue::removed("hash ID 4".to_string())
    );
}
