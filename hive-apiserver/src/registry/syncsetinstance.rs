//! SyncSetInstance storage backed by the hive.openshift.io/v1 API
//!
//! Nothing is stored locally: every call resolves the request namespace,
//! forwards to the typed client and converts the answer to the internal
//! representation.

use async_trait::async_trait;
use hive_common::apis::hive::{SyncSetInstance, SyncSetInstanceList};
use hive_common::meta::internalversion::ListOptions;
use hive_common::meta::v1::{CreateOptions, DeleteOptions, GetOptions, UpdateOptions};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ListMeta, Status};
use std::sync::Arc;
use tracing::debug;

use super::rest::{
    Creater, Getter, GracefulDeleter, Lister, Scoper, Storage, TableConvertor, UpdatedObjectInfo,
    Updater, ValidateObjectFn, ValidateObjectUpdateFn,
};
use super::table::{Table, TableOptions, TablePrinter};
use super::util::{sync_set_instance_from_hive_v1, sync_set_instance_to_hive_v1};
use super::{wrap_no_watch_storage_error, NoWatchStorageErrWrapper};
use crate::client::{HiveV1Interface, SyncSetInstanceInterface};
use crate::error::{RegistryResult, StatusError, STATUS_SUCCESS};
use crate::printers::sync_set_instance_printer;
use crate::request::RequestContext;

/// REST storage for SyncSetInstances
pub struct SyncSetInstanceRest {
    client: Arc<dyn HiveV1Interface>,
    table_printer: TablePrinter<SyncSetInstance>,
}

impl SyncSetInstanceRest {
    pub fn new(
        client: Arc<dyn HiveV1Interface>,
        table_printer: TablePrinter<SyncSetInstance>,
    ) -> Self {
        Self {
            client,
            table_printer,
        }
    }

    /// Storage as registered with the API server: default table printer and
    /// errors rewritten to the requested group and resource
    pub fn new_rest(client: Arc<dyn HiveV1Interface>) -> NoWatchStorageErrWrapper<Self> {
        wrap_no_watch_storage_error(Self::new(client, sync_set_instance_printer()))
    }

    fn get_client(&self, ctx: &RequestContext) -> RegistryResult<Box<dyn SyncSetInstanceInterface>> {
        let namespace = ctx
            .namespace()
            .ok_or_else(|| StatusError::bad_request("namespace parameter required"))?;
        Ok(self.client.sync_set_instances(namespace))
    }
}

impl std::fmt::Debug for SyncSetInstanceRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSetInstanceRest")
            .field("table_printer", &self.table_printer)
            .finish_non_exhaustive()
    }
}

impl Storage for SyncSetInstanceRest {
    type Object = SyncSetInstance;

    fn new_object(&self) -> SyncSetInstance {
        SyncSetInstance::default()
    }
}

impl Scoper for SyncSetInstanceRest {
    fn namespace_scoped(&self) -> bool {
        true
    }
}

#[async_trait]
impl Lister for SyncSetInstanceRest {
    type List = SyncSetInstanceList;

    fn new_list(&self) -> SyncSetInstanceList {
        SyncSetInstanceList::default()
    }

    async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> RegistryResult<SyncSetInstanceList> {
        let client = self.get_client(ctx)?;
        let options = options.to_v1()?;
        debug!(namespace = ?ctx.namespace(), "Listing SyncSetInstances");

        let remote = client.list(&options).await?;

        let items = remote
            .items
            .iter()
            .map(sync_set_instance_from_hive_v1)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SyncSetInstanceList {
            metadata: remote.metadata,
            items,
        })
    }
}

#[async_trait]
impl Getter for SyncSetInstanceRest {
    async fn get(
        &self,
        ctx: &RequestContext,
        name: &str,
        options: &GetOptions,
    ) -> RegistryResult<SyncSetInstance> {
        let client = self.get_client(ctx)?;
        debug!(namespace = ?ctx.namespace(), name, "Getting SyncSetInstance");

        let remote = client.get(name, options).await?;
        Ok(sync_set_instance_from_hive_v1(&remote)?)
    }
}

#[async_trait]
impl Creater for SyncSetInstanceRest {
    async fn create(
        &self,
        ctx: &RequestContext,
        obj: SyncSetInstance,
        _create_validation: Option<&ValidateObjectFn<SyncSetInstance>>,
        _options: &CreateOptions,
    ) -> RegistryResult<SyncSetInstance> {
        let client = self.get_client(ctx)?;
        debug!(
            namespace = ?ctx.namespace(),
            name = ?obj.metadata.name,
            "Creating SyncSetInstance"
        );

        let converted = sync_set_instance_to_hive_v1(&obj)?;
        let created = client.create(&converted).await?;
        Ok(sync_set_instance_from_hive_v1(&created)?)
    }
}

#[async_trait]
impl Updater for SyncSetInstanceRest {
    async fn update(
        &self,
        ctx: &RequestContext,
        name: &str,
        obj_info: &dyn UpdatedObjectInfo<SyncSetInstance>,
        _create_validation: Option<&ValidateObjectFn<SyncSetInstance>>,
        _update_validation: Option<&ValidateObjectUpdateFn<SyncSetInstance>>,
        _force_allow_create: bool,
        _options: &UpdateOptions,
    ) -> RegistryResult<(SyncSetInstance, bool)> {
        let client = self.get_client(ctx)?;
        debug!(namespace = ?ctx.namespace(), name, "Updating SyncSetInstance");

        let current = client.get(name, &GetOptions::default()).await?;
        let old = sync_set_instance_from_hive_v1(&current)?;

        let obj = obj_info.updated_object(ctx, old).await?;

        let converted = sync_set_instance_to_hive_v1(&obj)?;
        let updated = client.update(&converted).await?;

        Ok((sync_set_instance_from_hive_v1(&updated)?, false))
    }
}

#[async_trait]
impl GracefulDeleter for SyncSetInstanceRest {
    async fn delete(
        &self,
        ctx: &RequestContext,
        name: &str,
        options: &DeleteOptions,
    ) -> RegistryResult<(Status, bool)> {
        let client = self.get_client(ctx)?;
        debug!(namespace = ?ctx.namespace(), name, "Deleting SyncSetInstance");

        client.delete(name, options).await?;

        Ok((
            Status {
                status: Some(STATUS_SUCCESS.to_string()),
                ..Default::default()
            },
            true,
        ))
    }
}

impl TableConvertor for SyncSetInstanceRest {
    fn convert_to_table(
        &self,
        _ctx: &RequestContext,
        objects: &[SyncSetInstance],
        list_meta: Option<&ListMeta>,
        options: &TableOptions,
    ) -> RegistryResult<Table> {
        self.table_printer.print(objects, list_meta, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{FakeHiveClient, Verb};
    use crate::registry::rest::UpdateFn;
    use hive_common::apis::hive::v1;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn wire(name: &str) -> v1::SyncSetInstance {
        v1::SyncSetInstance {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("hive".to_string()),
                ..Default::default()
            },
            spec: v1::SyncSetInstanceSpec {
                cluster_deployment_ref: v1::LocalObjectReference {
                    name: "cd1".to_string(),
                },
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn rest(client: &FakeHiveClient) -> SyncSetInstanceRest {
        SyncSetInstanceRest::new(Arc::new(client.clone()), sync_set_instance_printer())
    }

    #[test]
    fn test_scope_and_empty_objects() {
        let storage = rest(&FakeHiveClient::new());
        assert!(storage.namespace_scoped());
        assert_eq!(storage.new_object(), SyncSetInstance::default());
        assert_eq!(storage.new_list(), SyncSetInstanceList::default());
    }

    #[tokio::test]
    async fn test_update_sends_converted_result_of_update_fn() {
        let client = FakeHiveClient::with_objects(vec![wire("a")]);
        let storage = rest(&client);
        let ctx = RequestContext::namespaced("hive");

        let info = UpdateFn(
            |_: &RequestContext, mut old: SyncSetInstance| -> RegistryResult<SyncSetInstance> {
                old.spec.sync_set_hash = "new-hash".to_string();
                Ok(old)
            },
        );
        let (updated, created) = storage
            .update(&ctx, "a", &info, None, None, false, &UpdateOptions::default())
            .await
            .unwrap();

        assert!(!created);
        assert_eq!(updated.spec.sync_set_hash, "new-hash");

        let actions = client.actions().await;
        let verbs: Vec<_> = actions.iter().map(|a| a.verb).collect();
        assert_eq!(verbs, vec![Verb::Get, Verb::Update]);
        let sent = actions[1].object.clone().unwrap();
        assert_eq!(sent.spec.sync_set_hash.as_deref(), Some("new-hash"));
    }

    #[tokio::test]
    async fn test_conversion_failure_aborts_get() {
        let mut broken = wire("broken");
        broken.spec.resource_apply_mode = Some("Merge".to_string());
        let client = FakeHiveClient::with_objects(vec![broken]);

        let err = rest(&client)
            .get(&RequestContext::namespaced("hive"), "broken", &GetOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::RegistryError::Conversion(_)));
    }

    #[test]
    fn test_convert_to_table_uses_injected_printer() {
        use crate::registry::table::{Cell, TableColumnDefinition};

        let printer = TablePrinter::new(
            vec![TableColumnDefinition::new("Name", "string", "")],
            |ssi: &SyncSetInstance| vec![Cell::from(ssi.metadata.name.clone().unwrap_or_default())],
        );
        let storage = SyncSetInstanceRest::new(Arc::new(FakeHiveClient::new()), printer);

        let mut ssi = SyncSetInstance::default();
        ssi.metadata.name = Some("only".to_string());
        let table = storage
            .convert_to_table(
                &RequestContext::new(),
                &[ssi],
                None,
                &TableOptions::default(),
            )
            .unwrap();
        assert_eq!(table.column_definitions.len(), 1);
        assert_eq!(table.rows[0].cells, vec![Cell::String("only".to_string())]);
    }
}
