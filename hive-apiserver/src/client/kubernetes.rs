//! kube-rs backed hive client
//!
//! Wraps a kube-rs `Client` and exposes SyncSetInstances through
//! [`HiveV1Interface`].

use async_trait::async_trait;
use hive_common::apis::hive::v1::{self, SyncSetInstance, SyncSetInstanceList};
use hive_common::meta::v1::{DeleteOptions, DeletionPropagation, GetOptions, ListOptions};
use kube::api::{
    Api, DeleteParams, GetParams, ListParams, PostParams, Preconditions, PropagationPolicy,
    VersionMatch,
};
use kube::{Client, Config};
use thiserror::Error;

use super::{HiveV1Interface, SyncSetInstanceInterface};
use crate::config::KubeClientConfig;
use crate::error::{GroupResource, RegistryError, RegistryResult, StatusError};

/// Errors while building a client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid kubeconfig: {0}")]
    InvalidKubeconfig(String),

    #[error("Failed to read kubeconfig {path:?}: {source}")]
    ReadKubeconfig {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

/// Wrapper around kube-rs Client targeting the hive API group
#[derive(Clone)]
pub struct KubeHiveClient {
    inner: Client,
    api_server: String,
}

impl KubeHiveClient {
    /// Wrap an existing kube-rs client
    pub fn from_client(inner: Client, api_server: impl Into<String>) -> Self {
        Self {
            inner,
            api_server: api_server.into(),
        }
    }

    /// Create client from kubeconfig YAML with optional context
    pub async fn from_kubeconfig(
        kubeconfig_yaml: &str,
        context: Option<&str>,
    ) -> Result<Self, ClientError> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        let kubeconfig = Kubeconfig::from_yaml(kubeconfig_yaml).map_err(|e| {
            ClientError::InvalidKubeconfig(format!("Failed to parse kubeconfig: {}", e))
        })?;

        let config = Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context.map(String::from),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| ClientError::InvalidKubeconfig(format!("Failed to create config: {}", e)))?;

        Self::from_kube_config(config)
    }

    /// Create client from in-cluster configuration (for running inside K8s)
    pub fn from_incluster() -> Result<Self, ClientError> {
        let config = Config::incluster().map_err(|e| {
            ClientError::InvalidKubeconfig(format!("Failed to get in-cluster config: {}", e))
        })?;

        Self::from_kube_config(config)
    }

    /// Create client as described by the server configuration
    ///
    /// In-cluster configuration wins, then an explicit kubeconfig file, then
    /// the usual kube-rs inference (`KUBECONFIG`, `~/.kube/config`).
    pub async fn from_config(config: &KubeClientConfig) -> Result<Self, ClientError> {
        if config.in_cluster {
            return Self::from_incluster();
        }

        if let Some(path) = &config.kubeconfig {
            let yaml = std::fs::read_to_string(path).map_err(|source| {
                ClientError::ReadKubeconfig {
                    path: path.clone(),
                    source,
                }
            })?;
            return Self::from_kubeconfig(&yaml, config.context.as_deref()).await;
        }

        let inferred = Config::infer().await.map_err(|e| {
            ClientError::InvalidKubeconfig(format!("Failed to infer config: {}", e))
        })?;
        Self::from_kube_config(inferred)
    }

    fn from_kube_config(config: Config) -> Result<Self, ClientError> {
        let api_server = config.cluster_url.to_string();

        let client = Client::try_from(config)
            .map_err(|e| ClientError::InvalidKubeconfig(format!("Failed to create client: {}", e)))?;

        tracing::info!("Hive client targeting API server {}", api_server);

        Ok(Self {
            inner: client,
            api_server,
        })
    }

    /// Get the inner kube-rs Client
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Get API server URL
    pub fn api_server(&self) -> &str {
        &self.api_server
    }
}

impl std::fmt::Debug for KubeHiveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeHiveClient")
            .field("api_server", &self.api_server)
            .finish()
    }
}

impl HiveV1Interface for KubeHiveClient {
    /// An empty namespace addresses every namespace
    fn sync_set_instances(&self, namespace: &str) -> Box<dyn SyncSetInstanceInterface> {
        let api = if namespace.is_empty() {
            Api::all(self.inner.clone())
        } else {
            Api::namespaced(self.inner.clone(), namespace)
        };
        Box::new(KubeSyncSetInstances { api })
    }
}

/// Namespaced SyncSetInstance API
struct KubeSyncSetInstances {
    api: Api<SyncSetInstance>,
}

#[async_trait]
impl SyncSetInstanceInterface for KubeSyncSetInstances {
    async fn list(&self, options: &ListOptions) -> RegistryResult<SyncSetInstanceList> {
        let list = self
            .api
            .list(&list_params(options))
            .await
            .map_err(remote_error(""))?;

        Ok(SyncSetInstanceList {
            metadata: list.metadata,
            items: list.items,
        })
    }

    async fn get(&self, name: &str, options: &GetOptions) -> RegistryResult<SyncSetInstance> {
        let result = if options.resource_version.is_empty() {
            self.api.get(name).await
        } else {
            let params = GetParams::at(&options.resource_version);
            self.api.get_with(name, &params).await
        };
        result.map_err(remote_error(name))
    }

    async fn create(&self, obj: &SyncSetInstance) -> RegistryResult<SyncSetInstance> {
        let name = obj.metadata.name.as_deref().unwrap_or_default();
        let body = obj.clone().with_type_meta();
        self.api
            .create(&PostParams::default(), &body)
            .await
            .map_err(remote_error(name))
    }

    async fn update(&self, obj: &SyncSetInstance) -> RegistryResult<SyncSetInstance> {
        let name = obj
            .metadata
            .name
            .clone()
            .ok_or_else(|| StatusError::bad_request("resource name may not be empty"))?;

        let body = obj.clone().with_type_meta();
        self.api
            .replace(&name, &PostParams::default(), &body)
            .await
            .map_err(remote_error(&name))
    }

    async fn delete(&self, name: &str, options: &DeleteOptions) -> RegistryResult<()> {
        self.api
            .delete(name, &delete_params(options))
            .await
            .map_err(remote_error(name))?;
        Ok(())
    }
}

/// Convert a kube-rs error, naming the object when the server sent no details
fn remote_error(name: &str) -> impl FnOnce(kube::Error) -> RegistryError + '_ {
    move |err| match RegistryError::from(err) {
        RegistryError::Status(status_err) if status_err.status().details.is_none() => status_err
            .with_details(&GroupResource::new(v1::GROUP, v1::RESOURCE), name)
            .into(),
        other => other,
    }
}

fn list_params(options: &ListOptions) -> ListParams {
    let mut params = ListParams::default();

    if !options.label_selector.is_empty() {
        params = params.labels(&options.label_selector);
    }
    if !options.field_selector.is_empty() {
        params = params.fields(&options.field_selector);
    }
    if let Some(timeout) = options.timeout_seconds {
        params = params.timeout(u32::try_from(timeout.max(0)).unwrap_or(u32::MAX));
    }
    if options.limit > 0 {
        params = params.limit(u32::try_from(options.limit).unwrap_or(u32::MAX));
    }
    if !options.continue_.is_empty() {
        params = params.continue_token(&options.continue_);
    }
    if !options.resource_version.is_empty() {
        params = params.at(&options.resource_version);
    }
    match options.resource_version_match.as_str() {
        "NotOlderThan" => params = params.matching(VersionMatch::NotOlderThan),
        "Exact" => params = params.matching(VersionMatch::Exact),
        _ => {}
    }

    params
}

fn delete_params(options: &DeleteOptions) -> DeleteParams {
    let mut params = DeleteParams::default();

    params.dry_run = options.is_dry_run();
    params.grace_period_seconds = options
        .grace_period_seconds
        .map(|secs| u32::try_from(secs.max(0)).unwrap_or(u32::MAX));
    params.propagation_policy = options.propagation_policy.map(|policy| match policy {
        DeletionPropagation::Orphan => PropagationPolicy::Orphan,
        DeletionPropagation::Background => PropagationPolicy::Background,
        DeletionPropagation::Foreground => PropagationPolicy::Foreground,
    });
    params.preconditions = options.preconditions.as_ref().map(|p| Preconditions {
        resource_version: p.resource_version.clone(),
        uid: p.uid.clone(),
    });

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_common::meta::v1::Preconditions as DeletePreconditions;

    #[test]
    fn test_list_params_mapping() {
        let params = list_params(&ListOptions {
            label_selector: "app=hive".to_string(),
            field_selector: "metadata.name=a".to_string(),
            limit: 50,
            continue_: "next".to_string(),
            resource_version: "10".to_string(),
            resource_version_match: "NotOlderThan".to_string(),
            ..Default::default()
        });

        assert_eq!(params.label_selector.as_deref(), Some("app=hive"));
        assert_eq!(params.field_selector.as_deref(), Some("metadata.name=a"));
        assert_eq!(params.limit, Some(50));
        assert_eq!(params.continue_token.as_deref(), Some("next"));
        assert_eq!(params.resource_version.as_deref(), Some("10"));
        assert!(matches!(params.version_match, Some(VersionMatch::NotOlderThan)));
    }

    #[test]
    fn test_empty_list_options_map_to_defaults() {
        let params = list_params(&ListOptions::default());
        assert!(params.label_selector.is_none());
        assert!(params.limit.is_none());
        assert!(params.version_match.is_none());
    }

    #[test]
    fn test_delete_params_mapping() {
        let params = delete_params(&DeleteOptions {
            grace_period_seconds: Some(0),
            propagation_policy: Some(DeletionPropagation::Foreground),
            preconditions: Some(DeletePreconditions {
                uid: Some("uid-1".to_string()),
                resource_version: None,
            }),
            dry_run: vec!["All".to_string()],
        });

        assert!(params.dry_run);
        assert_eq!(params.grace_period_seconds, Some(0));
        assert!(matches!(
            params.propagation_policy,
            Some(PropagationPolicy::Foreground)
        ));
        assert_eq!(
            params.preconditions.and_then(|p| p.uid).as_deref(),
            Some("uid-1")
        );
    }

    #[test]
    fn test_remote_error_attaches_details() {
        let err = remote_error("missing")(kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: "syncsetinstances.hive.openshift.io \"missing\" not found".to_string(),
            reason: "NotFound".to_string(),
            code: 404,
        }));

        assert!(err.is_not_found());
        let RegistryError::Status(status_err) = err else {
            panic!("expected status error");
        };
        assert_eq!(status_err.code(), 404);
        let details = status_err.status().details.clone().unwrap();
        assert_eq!(details.group.as_deref(), Some(v1::GROUP));
        assert_eq!(details.kind.as_deref(), Some(v1::RESOURCE));
        assert_eq!(details.name.as_deref(), Some("missing"));
    }
}
