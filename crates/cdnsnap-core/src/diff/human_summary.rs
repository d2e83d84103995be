//! Human-readable summary renderer for snapshot diffs.

use crate::diff::engine::SnapshotDiff;
use crate::diff::server::ServerDsDiff;
use crate::diff::value::{DiffValue, Diffable};
use std::collections::BTreeSet;

/// Render a human-readable Markdown summary of a [`SnapshotDiff`].
///
/// The summary is what an operator reviews before committing a Snapshot.
/// It is informational only and does not affect the structured diff. Hosts
/// are labelled by FQDN.
pub fn render_human_summary(diff: &SnapshotDiff) -> String {
    let mut out = String::new();

    out.push_str("## Snapshot Diff\n\n");
    out.push_str(&format!(
        "**Changes**: {}  \n**Traffic Routers**: {}  \n**Cache Servers**: {}\n\n",
        diff.changes, diff.routers.changes, diff.servers.changes
    ));

    if diff.is_empty() {
        out.push_str("_No changes detected._\n");
        return out;
    }

    // Routers
    let routers = &diff.routers;
    if routers.has_changes() {
        out.push_str("### Traffic Routers\n\n");
        push_host_list(
            &mut out,
            "New",
            routers.new.iter().map(|r| r.fqdn.as_deref().unwrap_or(NO_FQDN)),
        );
        push_host_list(
            &mut out,
            "Deleted",
            routers.deleted.iter().map(|r| r.fqdn.as_deref().unwrap_or(NO_FQDN)),
        );
        for changed in &routers.changed {
            out.push_str(&format!("\n#### `{}`\n\n", host_label(&changed.fqdn)));
            push_field_changes(&mut out, changed.field_values());
        }
        out.push('\n');
    }

    // Servers
    let servers = &diff.servers;
    if servers.has_changes() {
        out.push_str("### Cache Servers\n\n");
        push_host_list(
            &mut out,
            "New",
            servers.new.iter().map(|s| s.fqdn.as_deref().unwrap_or(NO_FQDN)),
        );
        push_host_list(
            &mut out,
            "Deleted",
            servers.deleted.iter().map(|s| s.fqdn.as_deref().unwrap_or(NO_FQDN)),
        );
        for changed in &servers.changed {
            out.push_str(&format!("\n#### `{}`\n\n", host_label(&changed.fqdn)));
            if changed.server_type.is_changed() {
                out.push_str(&format!(
                    "- **Type transition**: {}\n",
                    transition(&changed.server_type.clone().map(Diffable::from))
                ));
            }
            push_field_changes(
                &mut out,
                changed
                    .field_values()
                    .into_iter()
                    .filter(|(name, _)| *name != "type")
                    .collect(),
            );
            push_set(&mut out, "Added capabilities", &changed.capabilities.new);
            push_set(&mut out, "Removed capabilities", &changed.capabilities.deleted);
            if let Some(ds) = &changed.delivery_services {
                push_ds_changes(&mut out, ds);
            }
        }
        out.push('\n');
    }

    out
}

fn push_host_list<'a>(out: &mut String, label: &str, hosts: impl Iterator<Item = &'a str>) {
    let hosts: Vec<&str> = hosts.collect();
    if !hosts.is_empty() {
        out.push_str(&format!(
            "- **{}** ({}): {}\n",
            label,
            hosts.len(),
            hosts.join(", ")
        ));
    }
}

fn push_field_changes(out: &mut String, fields: Vec<(&'static str, DiffValue<Diffable>)>) {
    for (name, value) in fields.iter().filter(|(_, v)| v.is_changed()) {
        out.push_str(&format!("- **{}**: {}\n", name, transition(value)));
    }
}

fn push_set(out: &mut String, label: &str, items: &BTreeSet<String>) {
    if !items.is_empty() {
        let items: Vec<&str> = items.iter().map(String::as_str).collect();
        out.push_str(&format!("- **{}**: {}\n", label, items.join(", ")));
    }
}

fn push_ds_changes(out: &mut String, ds: &ServerDsDiff) {
    for (xml_id, tokens) in &ds.new {
        out.push_str(&format!(
            "- **Assigned to** `{}` ({} tokens)\n",
            xml_id,
            tokens.len()
        ));
    }
    for (xml_id, tokens) in &ds.deleted {
        out.push_str(&format!(
            "- **Unassigned from** `{}` ({} tokens)\n",
            xml_id,
            tokens.len()
        ));
    }
    for (xml_id, changes) in &ds.changed {
        let moved = changes.iter().filter(|c| c.is_changed()).count();
        out.push_str(&format!(
            "- **Changed** `{}` ({} of {} positions differ)\n",
            xml_id,
            moved,
            changes.len()
        ));
    }
}

/// `old` → `new`, with an absent side shown as _none_.
fn transition(value: &DiffValue<Diffable>) -> String {
    format!(
        "{} → {}",
        side(value.old_value.as_ref()),
        side(value.new_value.as_ref())
    )
}

fn side(value: Option<&Diffable>) -> String {
    match value {
        Some(Diffable::String(s)) => format!("`{}`", s),
        Some(other) => format!("`{}`", other),
        None => "_none_".to_string(),
    }
}

const NO_FQDN: &str = "<no fqdn>";

/// The pending FQDN, falling back to the current one.
fn host_label(fqdn: &DiffValue<String>) -> &str {
    fqdn.new_value
        .as_deref()
        .or(fqdn.old_value.as_deref())
        .unwrap_or(NO_FQDN)
}
