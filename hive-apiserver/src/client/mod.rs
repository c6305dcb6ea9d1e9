//! Typed client contract for the hive.openshift.io/v1 API
//!
//! The storage layer never talks to a datastore directly; it goes through
//! these traits. [`kubernetes::KubeHiveClient`] is the live implementation,
//! [`fake::FakeHiveClient`] keeps objects in memory.

pub mod fake;
#[cfg(feature = "kubernetes")]
pub mod kubernetes;

use async_trait::async_trait;
use hive_common::apis::hive::v1::{SyncSetInstance, SyncSetInstanceList};
use hive_common::meta::v1::{DeleteOptions, GetOptions, ListOptions};

use crate::error::RegistryResult;

/// SyncSetInstance operations within one namespace
#[async_trait]
pub trait SyncSetInstanceInterface: Send + Sync {
    async fn list(&self, options: &ListOptions) -> RegistryResult<SyncSetInstanceList>;

    async fn get(&self, name: &str, options: &GetOptions) -> RegistryResult<SyncSetInstance>;

    async fn create(&self, obj: &SyncSetInstance) -> RegistryResult<SyncSetInstance>;

    async fn update(&self, obj: &SyncSetInstance) -> RegistryResult<SyncSetInstance>;

    async fn delete(&self, name: &str, options: &DeleteOptions) -> RegistryResult<()>;
}

/// Entry point of the hive v1 client
pub trait HiveV1Interface: Send + Sync {
    fn sync_set_instances(&self, namespace: &str) -> Box<dyn SyncSetInstanceInterface>;
}
