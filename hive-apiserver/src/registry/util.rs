//! Conversion between the internal and `hive.openshift.io/v1` SyncSetInstance

use hive_common::apis::hive::{self, v1};
use hive_common::ConversionError;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn non_empty_vec<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

fn sync_condition_to_v1(condition: &hive::SyncCondition) -> v1::SyncCondition {
    v1::SyncCondition {
        type_: condition.type_.as_str().to_string(),
        status: condition.status.as_str().to_string(),
        last_probe_time: condition.last_probe_time.map(Time),
        last_transition_time: condition.last_transition_time.map(Time),
        reason: non_empty(&condition.reason),
        message: non_empty(&condition.message),
    }
}

fn sync_condition_from_v1(
    condition: &v1::SyncCondition,
) -> Result<hive::SyncCondition, ConversionError> {
    Ok(hive::SyncCondition {
        type_: condition.type_.parse()?,
        status: condition.status.parse()?,
        last_probe_time: condition.last_probe_time.as_ref().map(|t| t.0),
        last_transition_time: condition.last_transition_time.as_ref().map(|t| t.0),
        reason: condition.reason.clone().unwrap_or_default(),
        message: condition.message.clone().unwrap_or_default(),
    })
}

fn sync_conditions_from_v1(
    conditions: Option<&Vec<v1::SyncCondition>>,
) -> Result<Vec<hive::SyncCondition>, ConversionError> {
    conditions
        .map(|c| {
            c.iter()
                .map(sync_condition_from_v1)
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()
        .map(Option::unwrap_or_default)
}

fn sync_status_to_v1(status: &hive::SyncStatus) -> v1::SyncStatus {
    v1::SyncStatus {
        api_version: status.api_version.clone(),
        kind: status.kind.clone(),
        resource: status.resource.clone(),
        name: status.name.clone(),
        namespace: non_empty(&status.namespace),
        hash: status.hash.clone(),
        conditions: non_empty_vec(status.conditions.iter().map(sync_condition_to_v1).collect()),
    }
}

fn sync_status_from_v1(status: &v1::SyncStatus) -> Result<hive::SyncStatus, ConversionError> {
    Ok(hive::SyncStatus {
        api_version: status.api_version.clone(),
        kind: status.kind.clone(),
        resource: status.resource.clone(),
        name: status.name.clone(),
        namespace: status.namespace.clone().unwrap_or_default(),
        hash: status.hash.clone(),
        conditions: sync_conditions_from_v1(status.conditions.as_ref())?,
    })
}

fn sync_statuses_to_v1(statuses: &[hive::SyncStatus]) -> Option<Vec<v1::SyncStatus>> {
    non_empty_vec(statuses.iter().map(sync_status_to_v1).collect())
}

fn sync_statuses_from_v1(
    statuses: Option<&Vec<v1::SyncStatus>>,
) -> Result<Vec<hive::SyncStatus>, ConversionError> {
    statuses
        .map(|s| {
            s.iter()
                .map(sync_status_from_v1)
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()
        .map(Option::unwrap_or_default)
}

fn spec_to_v1(spec: &hive::SyncSetInstanceSpec) -> v1::SyncSetInstanceSpec {
    v1::SyncSetInstanceSpec {
        cluster_deployment_ref: v1::LocalObjectReference {
            name: spec.cluster_deployment.name.clone(),
        },
        sync_set_ref: spec
            .sync_set_ref
            .as_ref()
            .map(|r| v1::LocalObjectReference { name: r.name.clone() }),
        selector_sync_set_ref: spec
            .selector_sync_set_ref
            .as_ref()
            .map(|r| v1::SelectorSyncSetReference { name: r.name.clone() }),
        resource_apply_mode: Some(spec.resource_apply_mode.as_str().to_string()),
        sync_set_hash: non_empty(&spec.sync_set_hash),
    }
}

fn spec_from_v1(
    spec: &v1::SyncSetInstanceSpec,
) -> Result<hive::SyncSetInstanceSpec, ConversionError> {
    Ok(hive::SyncSetInstanceSpec {
        cluster_deployment: hive::LocalObjectReference {
            name: spec.cluster_deployment_ref.name.clone(),
        },
        sync_set_ref: spec
            .sync_set_ref
            .as_ref()
            .map(|r| hive::LocalObjectReference { name: r.name.clone() }),
        selector_sync_set_ref: spec
            .selector_sync_set_ref
            .as_ref()
            .map(|r| hive::SelectorSyncSetReference { name: r.name.clone() }),
        resource_apply_mode: spec.resource_apply_mode.as_deref().unwrap_or_default().parse()?,
        sync_set_hash: spec.sync_set_hash.clone().unwrap_or_default(),
    })
}

fn status_to_v1(status: &hive::SyncSetInstanceStatus) -> Option<v1::SyncSetInstanceStatus> {
    if *status == hive::SyncSetInstanceStatus::default() {
        return None;
    }

    Some(v1::SyncSetInstanceStatus {
        resources: sync_statuses_to_v1(&status.resources),
        patches: sync_statuses_to_v1(&status.patches),
        secret_references: sync_statuses_to_v1(&status.secret_references),
        conditions: non_empty_vec(status.conditions.iter().map(sync_condition_to_v1).collect()),
        applied: Some(status.applied),
    })
}

fn status_from_v1(
    status: &v1::SyncSetInstanceStatus,
) -> Result<hive::SyncSetInstanceStatus, ConversionError> {
    Ok(hive::SyncSetInstanceStatus {
        resources: sync_statuses_from_v1(status.resources.as_ref())?,
        patches: sync_statuses_from_v1(status.patches.as_ref())?,
        secret_references: sync_statuses_from_v1(status.secret_references.as_ref())?,
        conditions: sync_conditions_from_v1(status.conditions.as_ref())?,
        applied: status.applied.unwrap_or_default(),
    })
}

/// Internal object to its wire form, ready to be sent to the remote client
pub fn sync_set_instance_to_hive_v1(
    obj: &hive::SyncSetInstance,
) -> Result<v1::SyncSetInstance, ConversionError> {
    Ok(v1::SyncSetInstance {
        api_version: v1::API_VERSION.to_string(),
        kind: v1::KIND.to_string(),
        metadata: obj.metadata.clone(),
        spec: spec_to_v1(&obj.spec),
        status: status_to_v1(&obj.status),
    })
}

/// Wire object to its internal form; fails on enumerations it does not know
pub fn sync_set_instance_from_hive_v1(
    obj: &v1::SyncSetInstance,
) -> Result<hive::SyncSetInstance, ConversionError> {
    Ok(hive::SyncSetInstance {
        metadata: obj.metadata.clone(),
        spec: spec_from_v1(&obj.spec)?,
        status: obj
            .status
            .as_ref()
            .map(status_from_v1)
            .transpose()?
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hive_common::apis::hive::{
        ConditionStatus, LocalObjectReference, ResourceApplyMode, SelectorSyncSetReference,
        SyncCondition, SyncConditionType, SyncSetInstance, SyncSetInstanceSpec,
        SyncSetInstanceStatus, SyncStatus,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    fn condition(type_: SyncConditionType, status: ConditionStatus) -> SyncCondition {
        SyncCondition {
            type_,
            status,
            last_probe_time: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
            last_transition_time: Some(Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap()),
            reason: "Applied".to_string(),
            message: "resource applied".to_string(),
        }
    }

    fn populated() -> SyncSetInstance {
        SyncSetInstance {
            metadata: ObjectMeta {
                name: Some("cd1-sync".to_string()),
                namespace: Some("hive".to_string()),
                resource_version: Some("12".to_string()),
                labels: Some(BTreeMap::from([(
                    "hive.openshift.io/cluster-deployment".to_string(),
                    "cd1".to_string(),
                )])),
                ..Default::default()
            },
            spec: SyncSetInstanceSpec {
                cluster_deployment: LocalObjectReference {
                    name: "cd1".to_string(),
                },
                sync_set_ref: Some(LocalObjectReference {
                    name: "sync".to_string(),
                }),
                selector_sync_set_ref: None,
                resource_apply_mode: ResourceApplyMode::Sync,
                sync_set_hash: "d41d8cd9".to_string(),
            },
            status: SyncSetInstanceStatus {
                resources: vec![SyncStatus {
                    api_version: "v1".to_string(),
                    kind: "ConfigMap".to_string(),
                    resource: "configmaps".to_string(),
                    name: "settings".to_string(),
                    namespace: "default".to_string(),
                    hash: "abc".to_string(),
                    conditions: vec![condition(
                        SyncConditionType::ApplySuccess,
                        ConditionStatus::True,
                    )],
                }],
                patches: vec![],
                secret_references: vec![SyncStatus {
                    api_version: "v1".to_string(),
                    kind: "Secret".to_string(),
                    resource: "secrets".to_string(),
                    name: "pull".to_string(),
                    namespace: String::new(),
                    hash: "def".to_string(),
                    conditions: vec![],
                }],
                conditions: vec![condition(
                    SyncConditionType::ApplyFailure,
                    ConditionStatus::False,
                )],
                applied: true,
            },
        }
    }

    #[test]
    fn test_round_trip_populated() {
        let original = populated();
        let wire = sync_set_instance_to_hive_v1(&original).unwrap();
        let back = sync_set_instance_from_hive_v1(&wire).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_round_trip_empty() {
        let original = SyncSetInstance::default();
        let wire = sync_set_instance_to_hive_v1(&original).unwrap();
        assert!(wire.status.is_none());
        assert_eq!(sync_set_instance_from_hive_v1(&wire).unwrap(), original);
    }

    #[test]
    fn test_round_trip_selector_reference_and_unapplied_status() {
        let mut original = populated();
        original.spec.sync_set_ref = None;
        original.spec.selector_sync_set_ref = Some(SelectorSyncSetReference {
            name: "global".to_string(),
        });
        original.status.applied = false;

        let wire = sync_set_instance_to_hive_v1(&original).unwrap();
        assert_eq!(wire.status.as_ref().unwrap().applied, Some(false));
        assert_eq!(sync_set_instance_from_hive_v1(&wire).unwrap(), original);
    }

    #[test]
    fn test_to_v1_wire_shape() {
        let wire = sync_set_instance_to_hive_v1(&populated()).unwrap();
        assert_eq!(wire.api_version, "hive.openshift.io/v1");
        assert_eq!(wire.kind, "SyncSetInstance");
        assert_eq!(wire.spec.cluster_deployment_ref.name, "cd1");
        assert_eq!(wire.spec.resource_apply_mode.as_deref(), Some("Sync"));

        let status = wire.status.unwrap();
        assert!(status.patches.is_none());
        let secret = &status.secret_references.unwrap()[0];
        assert!(secret.namespace.is_none());
        assert!(secret.conditions.is_none());
    }

    #[test]
    fn test_unset_apply_mode_defaults_to_upsert() {
        let wire = v1::SyncSetInstance::default();
        let obj = sync_set_instance_from_hive_v1(&wire).unwrap();
        assert_eq!(obj.spec.resource_apply_mode, ResourceApplyMode::Upsert);
    }

    #[test]
    fn test_unknown_values_are_conversion_errors() {
        let mut wire = sync_set_instance_to_hive_v1(&populated()).unwrap();
        wire.spec.resource_apply_mode = Some("Replace".to_string());
        assert_eq!(
            sync_set_instance_from_hive_v1(&wire),
            Err(ConversionError::UnknownApplyMode("Replace".to_string()))
        );

        let mut wire = sync_set_instance_to_hive_v1(&populated()).unwrap();
        if let Some(status) = wire.status.as_mut() {
            if let Some(conditions) = status.conditions.as_mut() {
                conditions[0].status = "Perhaps".to_string();
            }
        }
        assert!(matches!(
            sync_set_instance_from_hive_v1(&wire),
            Err(ConversionError::UnknownConditionStatus(_))
        ));
    }
}
