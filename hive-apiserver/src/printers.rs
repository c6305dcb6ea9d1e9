//! Table printers for hive objects

use chrono::{DateTime, Utc};
use hive_common::apis::hive::SyncSetInstance;

use crate::registry::table::{Cell, TableColumnDefinition, TablePrinter};

/// Printer used for SyncSetInstance tables
pub fn sync_set_instance_printer() -> TablePrinter<SyncSetInstance> {
    let columns = vec![
        TableColumnDefinition::new(
            "Name",
            "string",
            "Name must be unique within a namespace.",
        )
        .with_format("name"),
        TableColumnDefinition::new(
            "ClusterDeployment",
            "string",
            "ClusterDeployment the SyncSet is applied to.",
        ),
        TableColumnDefinition::new(
            "SyncSet",
            "string",
            "SyncSet or SelectorSyncSet this instance belongs to.",
        ),
        TableColumnDefinition::new("Mode", "string", "Resource apply mode.").with_priority(1),
        TableColumnDefinition::new("Applied", "boolean", "Whether all resources were applied."),
        TableColumnDefinition::new(
            "Age",
            "string",
            "Time since the object was created.",
        ),
    ];

    TablePrinter::new(columns, |ssi: &SyncSetInstance| {
        vec![
            Cell::from(ssi.metadata.name.clone().unwrap_or_default()),
            Cell::from(ssi.spec.cluster_deployment.name.clone()),
            Cell::from(ssi.sync_set_name().unwrap_or("<none>")),
            Cell::from(ssi.spec.resource_apply_mode.as_str()),
            Cell::from(ssi.status.applied),
            Cell::from(translate_timestamp_since(
                ssi.metadata.creation_timestamp.as_ref().map(|t| t.0),
                Utc::now(),
            )),
        ]
    })
}

/// Age of a timestamp in the short form used by `kubectl get`
pub fn translate_timestamp_since(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match timestamp {
        Some(ts) => human_duration(now.signed_duration_since(ts)),
        None => "<unknown>".to_string(),
    }
}

fn human_duration(duration: chrono::Duration) -> String {
    let seconds = duration.num_seconds();
    if seconds < -1 {
        // Clock skew between client and server
        return "<invalid>".to_string();
    }
    let seconds = seconds.max(0);
    if seconds < 120 {
        return format!("{}s", seconds);
    }
    let minutes = seconds / 60;
    if minutes < 10 {
        let rem = seconds % 60;
        return if rem == 0 {
            format!("{}m", minutes)
        } else {
            format!("{}m{}s", minutes, rem)
        };
    }
    if minutes < 3 * 60 {
        return format!("{}m", minutes);
    }
    let hours = minutes / 60;
    if hours < 48 {
        return format!("{}h", hours);
    }
    let days = hours / 24;
    if days < 2 * 365 {
        return format!("{}d", days);
    }
    format!("{}y", days / 365)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::table::TableOptions;
    use chrono::Duration;
    use hive_common::apis::hive::LocalObjectReference;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    #[test]
    fn test_human_duration() {
        let now = Utc::now();
        let cases = [
            (Duration::seconds(5), "5s"),
            (Duration::seconds(150), "2m30s"),
            (Duration::minutes(45), "45m"),
            (Duration::hours(5), "5h"),
            (Duration::days(3), "3d"),
            (Duration::days(800), "2y"),
        ];
        for (age, expected) in cases {
            assert_eq!(translate_timestamp_since(Some(now - age), now), expected);
        }
        assert_eq!(translate_timestamp_since(None, now), "<unknown>");
        assert_eq!(
            translate_timestamp_since(Some(now + Duration::minutes(5)), now),
            "<invalid>"
        );
    }

    #[test]
    fn test_sync_set_instance_row() {
        let mut ssi = SyncSetInstance {
            metadata: ObjectMeta {
                name: Some("cd1-sync".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        ssi.spec.cluster_deployment = LocalObjectReference {
            name: "cd1".to_string(),
        };
        ssi.status.applied = true;

        let printer = sync_set_instance_printer();
        let table = printer
            .print(&[ssi], None, &TableOptions::default())
            .unwrap();

        let cells = &table.rows[0].cells;
        assert_eq!(cells[0], Cell::String("cd1-sync".to_string()));
        assert_eq!(cells[1], Cell::String("cd1".to_string()));
        assert_eq!(cells[2], Cell::String("<none>".to_string()));
        assert_eq!(cells[3], Cell::String("Upsert".to_string()));
        assert_eq!(cells[4], Cell::Bool(true));
        assert_eq!(cells[5], Cell::String("<unknown>".to_string()));
    }
}
