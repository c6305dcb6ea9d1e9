//! `hive.openshift.io/v1` wire representation
//!
//! This is the form persisted by the backing API server. Field names follow
//! the JSON schema of the SyncSetInstance custom resource.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ListMeta, ObjectMeta, Time};
use serde::{Deserialize, Serialize};

pub const GROUP: &str = "hive.openshift.io";
pub const VERSION: &str = "v1";
pub const API_VERSION: &str = "hive.openshift.io/v1";
pub const KIND: &str = "SyncSetInstance";
pub const RESOURCE: &str = "syncsetinstances";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalObjectReference {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorSyncSetReference {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncCondition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_probe_time: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub api_version: String,
    pub kind: String,
    pub resource: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<SyncCondition>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSetInstanceSpec {
    pub cluster_deployment_ref: LocalObjectReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_set_ref: Option<LocalObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector_sync_set_ref: Option<SelectorSyncSetReference>,
    /// `Upsert` or `Sync`; empty means `Upsert`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_apply_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_set_hash: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSetInstanceStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<SyncStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patches: Option<Vec<SyncStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_references: Option<Vec<SyncStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<SyncCondition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied: Option<bool>,
}

/// SyncSetInstance as stored by the remote API server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSetInstance {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: SyncSetInstanceSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SyncSetInstanceStatus>,
}

impl SyncSetInstance {
    /// Stamp `apiVersion` and `kind` so the object can be sent as a request body
    pub fn with_type_meta(mut self) -> Self {
        self.api_version = API_VERSION.to_string();
        self.kind = KIND.to_string();
        self
    }
}

impl k8s_openapi::Resource for SyncSetInstance {
    const API_VERSION: &'static str = API_VERSION;
    const GROUP: &'static str = GROUP;
    const KIND: &'static str = KIND;
    const VERSION: &'static str = VERSION;
    const URL_PATH_SEGMENT: &'static str = RESOURCE;
    type Scope = k8s_openapi::NamespaceResourceScope;
}

impl k8s_openapi::Metadata for SyncSetInstance {
    type Ty = ObjectMeta;

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncSetInstanceList {
    #[serde(default)]
    pub metadata: ListMeta,
    #[serde(default)]
    pub items: Vec<SyncSetInstance>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_object() {
        let json = serde_json::json!({
            "apiVersion": "hive.openshift.io/v1",
            "kind": "SyncSetInstance",
            "metadata": { "name": "cd1-sync", "namespace": "hive" },
            "spec": {
                "clusterDeploymentRef": { "name": "cd1" },
                "syncSetRef": { "name": "sync" },
                "resourceApplyMode": "Sync"
            },
            "status": {
                "applied": true,
                "resources": [{
                    "apiVersion": "v1",
                    "kind": "ConfigMap",
                    "resource": "configmaps",
                    "name": "cm",
                    "namespace": "default",
                    "hash": "abc"
                }]
            }
        });

        let ssi: SyncSetInstance = serde_json::from_value(json).unwrap();
        assert_eq!(ssi.metadata.name.as_deref(), Some("cd1-sync"));
        assert_eq!(ssi.spec.cluster_deployment_ref.name, "cd1");
        assert_eq!(ssi.spec.resource_apply_mode.as_deref(), Some("Sync"));
        let status = ssi.status.unwrap();
        assert_eq!(status.applied, Some(true));
        assert_eq!(status.resources.unwrap()[0].kind, "ConfigMap");
    }

    #[test]
    fn test_type_meta_stamped() {
        let ssi = SyncSetInstance::default().with_type_meta();
        let value = serde_json::to_value(&ssi).unwrap();
        assert_eq!(value["apiVersion"], "hive.openshift.io/v1");
        assert_eq!(value["kind"], "SyncSetInstance");
        assert!(value.get("status").is_none());
    }
}
