//! Version snapshots and the diff algorithm used to compare them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An immutable, append-only record of an entity's state at a particular
/// version. `(owner_id, version)` is unique; snapshots are never mutated
/// once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionSnapshot {
    pub owner_id: Uuid,
    pub version: i64,
    pub snapshot: serde_json::Value,
    pub change_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

/// The kind of change a single diff entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}

/// A single field-level change between two snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffEntry {
    pub field: String,
    pub old_value: Option<serde_json::Value>,
    pub new_value: Option<serde_json::Value>,
    #[serde(rename = "type")]
    pub change_type: ChangeType,
}

/// Diff two JSON-serialized entity snapshots.
///
/// `scalar_fields` lists the non-`properties` fields to compare, in
/// declaration order — that ordering is reflected in the output. The
/// `properties` array (if present on either side) is diffed separately,
/// keyed by each property's `name`, with `added`/`removed`/`modified`
/// entries emitted in lexicographic name order, after all scalar entries.
pub fn diff_snapshots(v1: &serde_json::Value, v2: &serde_json::Value, scalar_fields: &[&str]) -> Vec<DiffEntry> {
    let mut entries = Vec::new();

    for field in scalar_fields {
        let old = v1.get(field);
        let new = v2.get(field);
        if old != new {
            entries.push(DiffEntry {
                field: field.to_string(),
                old_value: old.cloned(),
                new_value: new.cloned(),
                change_type: ChangeType::Modified,
            });
        }
    }

    entries.extend(diff_properties(v1.get("properties"), v2.get("properties")));

    entries
}

fn diff_properties(v1_properties: Option<&serde_json::Value>, v2_properties: Option<&serde_json::Value>) -> Vec<DiffEntry> {
    use std::collections::BTreeMap;

    let to_map = |value: Option<&serde_json::Value>| -> BTreeMap<String, serde_json::Value> {
        value
            .and_then(|v| v.as_array())
            .map(|properties| {
                properties
                    .iter()
                    .filter_map(|p| p.get("name").and_then(|n| n.as_str()).map(|name| (name.to_string(), p.clone())))
                    .collect()
            })
            .unwrap_or_default()
    };

    let old_map = to_map(v1_properties);
    let new_map = to_map(v2_properties);

    let mut names: Vec<&String> = old_map.keys().chain(new_map.keys()).collect();
    names.sort();
    names.dedup();

    names
        .into_iter()
        .filter_map(|name| {
            let old = old_map.get(name);
            let new = new_map.get(name);
            let field = format!("properties.{}", name);

            match (old, new) {
                (None, Some(new_value)) => Some(DiffEntry {
                    field,
                    old_value: None,
                    new_value: Some(new_value.clone()),
                    change_type: ChangeType::Added,
                }),
                (Some(old_value), None) => Some(DiffEntry {
                    field,
                    old_value: Some(old_value.clone()),
                    new_value: None,
                    change_type: ChangeType::Removed,
                }),
                (Some(old_value), Some(new_value)) if old_value != new_value => Some(DiffEntry {
                    field,
                    old_value: Some(old_value.clone()),
                    new_value: Some(new_value.clone()),
                    change_type: ChangeType::Modified,
                }),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALARS: &[&str] = &["name", "displayName", "description"];

    #[test]
    fn scalar_change_produces_one_modified_entry() {
        let v1 = serde_json::json!({"name": "Customer", "displayName": "Customer"});
        let v2 = serde_json::json!({"name": "Customer", "displayName": "Customers"});

        let diff = diff_snapshots(&v1, &v2, SCALARS);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].field, "displayName");
        assert_eq!(diff[0].change_type, ChangeType::Modified);
        assert_eq!(diff[0].old_value, Some(serde_json::json!("Customer")));
        assert_eq!(diff[0].new_value, Some(serde_json::json!("Customers")));
    }

    #[test]
    fn property_added() {
        let v1 = serde_json::json!({"name": "Customer", "properties": []});
        let v2 = serde_json::json!({
            "name": "Customer",
            "properties": [{"name": "email", "dataType": "STRING"}]
        });

        let diff = diff_snapshots(&v1, &v2, SCALARS);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].field, "properties.email");
        assert_eq!(diff[0].change_type, ChangeType::Added);
        assert!(diff[0].old_value.is_none());
    }

    #[test]
    fn property_removed_and_modified() {
        let v1 = serde_json::json!({
            "properties": [
                {"name": "email", "dataType": "STRING", "required": false},
                {"name": "age", "dataType": "NUMBER"}
            ]
        });
        let v2 = serde_json::json!({
            "properties": [
                {"name": "email", "dataType": "STRING", "required": true}
            ]
        });

        let diff = diff_snapshots(&v1, &v2, &[]);
        assert_eq!(diff.len(), 2);
        assert_eq!(diff[0].field, "properties.age");
        assert_eq!(diff[0].change_type, ChangeType::Removed);
        assert_eq!(diff[1].field, "properties.email");
        assert_eq!(diff[1].change_type, ChangeType::Modified);
    }

    #[test]
    fn no_changes_yields_empty_diff() {
        let v1 = serde_json::json!({"name": "Customer"});
        let v2 = serde_json::json!({"name": "Customer"});
        assert!(diff_snapshots(&v1, &v2, SCALARS).is_empty());
    }
}
