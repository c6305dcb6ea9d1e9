//! Internal representation of the hive API group
//!
//! These are the objects handed to and returned from the storage layer.
//! Enumerated fields are typed here; the wire form in [`v1`] carries them
//! as plain strings.

pub mod v1;

use chrono::{DateTime, Utc};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ListMeta, ObjectMeta};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ConversionError;

/// Reference to an object in the same namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalObjectReference {
    #[serde(default)]
    pub name: String,
}

/// Reference to a cluster-scoped SelectorSyncSet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorSyncSetReference {
    #[serde(default)]
    pub name: String,
}

/// How resources of a SyncSet are applied to the target cluster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceApplyMode {
    /// Create or update, never delete
    #[default]
    Upsert,
    /// Create or update, and delete resources removed from the SyncSet
    Sync,
}

impl ResourceApplyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upsert => "Upsert",
            Self::Sync => "Sync",
        }
    }
}

impl FromStr for ResourceApplyMode {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // An unset mode defaults to upsert
            "" | "Upsert" => Ok(Self::Upsert),
            "Sync" => Ok(Self::Sync),
            other => Err(ConversionError::UnknownApplyMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for ResourceApplyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a sync condition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncConditionType {
    #[default]
    ApplySuccess,
    ApplyFailure,
    DeletionFailed,
    UnknownObject,
}

impl SyncConditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApplySuccess => "ApplySuccess",
            Self::ApplyFailure => "ApplyFailure",
            Self::DeletionFailed => "DeletionFailed",
            Self::UnknownObject => "UnknownObject",
        }
    }
}

impl FromStr for SyncConditionType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ApplySuccess" => Ok(Self::ApplySuccess),
            "ApplyFailure" => Ok(Self::ApplyFailure),
            "DeletionFailed" => Ok(Self::DeletionFailed),
            "UnknownObject" => Ok(Self::UnknownObject),
            other => Err(ConversionError::UnknownConditionType(other.to_string())),
        }
    }
}

impl std::fmt::Display for SyncConditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tri-state condition status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl ConditionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::True => "True",
            Self::False => "False",
            Self::Unknown => "Unknown",
        }
    }
}

impl FromStr for ConditionStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "True" => Ok(Self::True),
            "False" => Ok(Self::False),
            "Unknown" => Ok(Self::Unknown),
            other => Err(ConversionError::UnknownConditionStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single observation about a synced object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncCondition {
    #[serde(rename = "type")]
    pub type_: SyncConditionType,
    pub status: ConditionStatus,
    pub last_probe_time: Option<DateTime<Utc>>,
    pub last_transition_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

/// Sync state of one resource, patch or secret reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub api_version: String,
    pub kind: String,
    pub resource: String,
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub hash: String,
    #[serde(default)]
    pub conditions: Vec<SyncCondition>,
}

/// Desired state of a SyncSetInstance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSetInstanceSpec {
    /// ClusterDeployment the SyncSet is applied to
    pub cluster_deployment: LocalObjectReference,
    /// Namespaced SyncSet this instance was created for
    pub sync_set_ref: Option<LocalObjectReference>,
    /// SelectorSyncSet this instance was created for
    pub selector_sync_set_ref: Option<SelectorSyncSetReference>,
    #[serde(default)]
    pub resource_apply_mode: ResourceApplyMode,
    /// Hash of the SyncSet content last applied
    #[serde(default)]
    pub sync_set_hash: String,
}

/// Observed state of a SyncSetInstance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSetInstanceStatus {
    #[serde(default)]
    pub resources: Vec<SyncStatus>,
    #[serde(default)]
    pub patches: Vec<SyncStatus>,
    #[serde(default)]
    pub secret_references: Vec<SyncStatus>,
    #[serde(default)]
    pub conditions: Vec<SyncCondition>,
    #[serde(default)]
    pub applied: bool,
}

/// Records the application of a SyncSet or SelectorSyncSet to one cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncSetInstance {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: SyncSetInstanceSpec,
    #[serde(default)]
    pub status: SyncSetInstanceStatus,
}

impl SyncSetInstance {
    /// Name of the SyncSet or SelectorSyncSet this instance belongs to
    pub fn sync_set_name(&self) -> Option<&str> {
        self.spec
            .sync_set_ref
            .as_ref()
            .map(|r| r.name.as_str())
            .or_else(|| {
                self.spec
                    .selector_sync_set_ref
                    .as_ref()
                    .map(|r| r.name.as_str())
            })
    }
}

/// A page of SyncSetInstances
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncSetInstanceList {
    #[serde(default)]
    pub metadata: ListMeta,
    #[serde(default)]
    pub items: Vec<SyncSetInstance>,
}
