//! Common test utilities and helpers

#![allow(dead_code)]

use hive_apiserver::client::fake::FakeHiveClient;
use hive_apiserver::registry::NoWatchStorageErrWrapper;
use hive_apiserver::{RequestContext, RequestInfo, SyncSetInstanceRest};
use hive_common::apis::hive::v1;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};
use std::sync::Arc;

pub const TEST_NAMESPACE: &str = "cluster-ns";
pub const AGGREGATED_GROUP: &str = "hiveinternal.openshift.io";

/// Remote object as the backing API server would store it
pub fn remote_instance(name: &str, cluster_deployment: &str) -> v1::SyncSetInstance {
    v1::SyncSetInstance {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(TEST_NAMESPACE.to_string()),
            creation_timestamp: Some(Time(chrono::Utc::now())),
            ..Default::default()
        },
        spec: v1::SyncSetInstanceSpec {
            cluster_deployment_ref: v1::LocalObjectReference {
                name: cluster_deployment.to_string(),
            },
            sync_set_ref: Some(v1::LocalObjectReference {
                name: format!("{}-syncset", cluster_deployment),
            }),
            resource_apply_mode: Some("Sync".to_string()),
            sync_set_hash: Some("abc123".to_string()),
            ..Default::default()
        },
        status: Some(v1::SyncSetInstanceStatus {
            applied: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Fake backend seeded with `count` objects named `ssi-0`, `ssi-1`, ...
pub fn seeded_client(count: usize) -> FakeHiveClient {
    FakeHiveClient::with_objects(
        (0..count).map(|i| remote_instance(&format!("ssi-{}", i), &format!("cd-{}", i))),
    )
}

/// Storage without the error wrapper
pub fn plain_storage(client: &FakeHiveClient) -> SyncSetInstanceRest {
    SyncSetInstanceRest::new(
        Arc::new(client.clone()),
        hive_apiserver::printers::sync_set_instance_printer(),
    )
}

/// Storage as registered with the server
pub fn wrapped_storage(client: &FakeHiveClient) -> NoWatchStorageErrWrapper<SyncSetInstanceRest> {
    SyncSetInstanceRest::new_rest(Arc::new(client.clone()))
}

pub fn namespaced_context() -> RequestContext {
    RequestContext::namespaced(TEST_NAMESPACE)
}

/// Context of a request served under the aggregated group
pub fn aggregated_context(verb: &str, name: &str) -> RequestContext {
    namespaced_context().with_request_info(RequestInfo {
        verb: verb.to_string(),
        api_group: AGGREGATED_GROUP.to_string(),
        api_version: "v1alpha1".to_string(),
        namespace: TEST_NAMESPACE.to_string(),
        resource: v1::RESOURCE.to_string(),
        name: name.to_string(),
        ..Default::default()
    })
}
