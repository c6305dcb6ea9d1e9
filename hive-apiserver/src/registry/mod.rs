//! Storage registry for hive resources that are proxied to a remote API server
//!
//! Proxied storages serve no watches. [`wrap_no_watch_storage_error`] makes
//! the errors coming back from the remote server name the resource the
//! caller actually asked for.

pub mod rest;
pub mod syncsetinstance;
pub mod table;
pub mod util;

use async_trait::async_trait;
use hive_common::meta::internalversion::ListOptions;
use hive_common::meta::v1::{CreateOptions, DeleteOptions, GetOptions, UpdateOptions};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ListMeta, Status};

use crate::error::{GroupResource, RegistryError, RegistryResult};
use crate::request::RequestContext;
use rest::{
    Creater, Getter, GracefulDeleter, Lister, Scoper, Storage, TableConvertor, UpdatedObjectInfo,
    Updater, ValidateObjectFn, ValidateObjectUpdateFn,
};
use table::{Table, TableOptions};

/// Every capability of a storage that cannot be watched
pub trait NoWatchStorage:
    Lister + Getter + Creater + Updater + GracefulDeleter + Scoper + TableConvertor
{
}

impl<T> NoWatchStorage for T where
    T: Lister + Getter + Creater + Updater + GracefulDeleter + Scoper + TableConvertor
{
}

/// Storage whose errors are passed through [`sync_status_error`]
#[derive(Debug)]
pub struct NoWatchStorageErrWrapper<S> {
    delegate: S,
}

impl<S> NoWatchStorageErrWrapper<S> {
    pub fn delegate(&self) -> &S {
        &self.delegate
    }

    pub fn into_inner(self) -> S {
        self.delegate
    }
}

pub fn wrap_no_watch_storage_error<S: NoWatchStorage>(delegate: S) -> NoWatchStorageErrWrapper<S> {
    NoWatchStorageErrWrapper { delegate }
}

/// Point a status error's group and resource at the request being served
///
/// Only the details and the `resource.group` text in the message change;
/// reason and code stay as the remote server reported them. Errors without
/// status details, or requests without request info, pass through untouched.
pub fn sync_status_error(ctx: &RequestContext, err: RegistryError) -> RegistryError {
    let mut status_err = match err {
        RegistryError::Status(status_err) => status_err,
        other => return other,
    };
    let Some(info) = ctx.request_info() else {
        return RegistryError::Status(status_err);
    };

    let status = status_err.status_mut();
    if let Some(details) = status.details.as_mut() {
        let old = GroupResource::new(
            details.group.clone().unwrap_or_default(),
            details.kind.clone().unwrap_or_default(),
        );
        let new = info.group_resource();

        details.group = Some(info.api_group.clone());
        details.kind = Some(info.resource.clone());

        if !old.resource.is_empty() {
            if let Some(message) = status.message.as_mut() {
                *message = message.replacen(&old.to_string(), &new.to_string(), 1);
            }
        }
    }

    RegistryError::Status(status_err)
}

impl<S: NoWatchStorage> Storage for NoWatchStorageErrWrapper<S> {
    type Object = S::Object;

    fn new_object(&self) -> Self::Object {
        self.delegate.new_object()
    }
}

impl<S: NoWatchStorage> Scoper for NoWatchStorageErrWrapper<S> {
    fn namespace_scoped(&self) -> bool {
        self.delegate.namespace_scoped()
    }
}

#[async_trait]
impl<S: NoWatchStorage> Lister for NoWatchStorageErrWrapper<S> {
    type List = S::List;

    fn new_list(&self) -> Self::List {
        self.delegate.new_list()
    }

    async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> RegistryResult<Self::List> {
        self.delegate
            .list(ctx, options)
            .await
            .map_err(|err| sync_status_error(ctx, err))
    }
}

#[async_trait]
impl<S: NoWatchStorage> Getter for NoWatchStorageErrWrapper<S> {
    async fn get(
        &self,
        ctx: &RequestContext,
        name: &str,
        options: &GetOptions,
    ) -> RegistryResult<Self::Object> {
        self.delegate
            .get(ctx, name, options)
            .await
            .map_err(|err| sync_status_error(ctx, err))
    }
}

#[async_trait]
impl<S: NoWatchStorage> Creater for NoWatchStorageErrWrapper<S> {
    async fn create(
        &self,
        ctx: &RequestContext,
        obj: Self::Object,
        create_validation: Option<&ValidateObjectFn<Self::Object>>,
        options: &CreateOptions,
    ) -> RegistryResult<Self::Object> {
        self.delegate
            .create(ctx, obj, create_validation, options)
            .await
            .map_err(|err| sync_status_error(ctx, err))
    }
}

#[async_trait]
impl<S: NoWatchStorage> Updater for NoWatchStorageErrWrapper<S> {
    async fn update(
        &self,
        ctx: &RequestContext,
        name: &str,
        obj_info: &dyn UpdatedObjectInfo<Self::Object>,
        create_validation: Option<&ValidateObjectFn<Self::Object>>,
        update_validation: Option<&ValidateObjectUpdateFn<Self::Object>>,
        force_allow_create: bool,
        options: &UpdateOptions,
    ) -> RegistryResult<(Self::Object, bool)> {
        self.delegate
            .update(
                ctx,
                name,
                obj_info,
                create_validation,
                update_validation,
                force_allow_create,
                options,
            )
            .await
            .map_err(|err| sync_status_error(ctx, err))
    }
}

#[async_trait]
impl<S: NoWatchStorage> GracefulDeleter for NoWatchStorageErrWrapper<S> {
    async fn delete(
        &self,
        ctx: &RequestContext,
        name: &str,
        options: &DeleteOptions,
    ) -> RegistryResult<(Status, bool)> {
        self.delegate
            .delete(ctx, name, options)
            .await
            .map_err(|err| sync_status_error(ctx, err))
    }
}

impl<S: NoWatchStorage> TableConvertor for NoWatchStorageErrWrapper<S> {
    fn convert_to_table(
        &self,
        ctx: &RequestContext,
        objects: &[Self::Object],
        list_meta: Option<&ListMeta>,
        options: &TableOptions,
    ) -> RegistryResult<Table> {
        self.delegate
            .convert_to_table(ctx, objects, list_meta, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StatusError, StatusReason};
    use crate::request::RequestInfo;
    use hive_common::ConversionError;

    fn aggregated_request() -> RequestContext {
        RequestContext::namespaced("hive").with_request_info(RequestInfo {
            verb: "get".to_string(),
            api_group: "hiveinternal.openshift.io".to_string(),
            api_version: "v1alpha1".to_string(),
            namespace: "hive".to_string(),
            resource: "syncsetinstances".to_string(),
            name: "missing".to_string(),
            ..Default::default()
        })
    }

    fn remote_not_found() -> RegistryError {
        StatusError::not_found(
            &GroupResource::new("hive.openshift.io", "syncsetinstances"),
            "missing",
        )
        .into()
    }

    #[test]
    fn test_sync_rewrites_group_resource() {
        let err = sync_status_error(&aggregated_request(), remote_not_found());

        let RegistryError::Status(status_err) = err else {
            panic!("expected status error");
        };
        assert_eq!(status_err.reason(), StatusReason::NotFound);
        assert_eq!(status_err.code(), 404);
        assert_eq!(
            status_err.message(),
            "syncsetinstances.hiveinternal.openshift.io \"missing\" not found"
        );
        let details = status_err.status().details.clone().unwrap();
        assert_eq!(details.group.as_deref(), Some("hiveinternal.openshift.io"));
        assert_eq!(details.kind.as_deref(), Some("syncsetinstances"));
        assert_eq!(details.name.as_deref(), Some("missing"));
    }

    #[test]
    fn test_sync_rewrites_only_first_mention() {
        let gr = GroupResource::new("hive.openshift.io", "syncsetinstances");
        let err = StatusError::conflict(
            &gr,
            "a",
            "syncsetinstances.hive.openshift.io \"a\" was modified",
        );
        let err = sync_status_error(&aggregated_request(), err.into());

        assert_eq!(
            err.to_string(),
            "Operation cannot be fulfilled on syncsetinstances.hiveinternal.openshift.io \"a\": \
             syncsetinstances.hive.openshift.io \"a\" was modified"
        );
        assert!(err.is_conflict());
    }

    #[test]
    fn test_sync_without_request_info_is_identity() {
        let err = sync_status_error(&RequestContext::namespaced("hive"), remote_not_found());
        assert!(err.is_not_found());
        assert!(err
            .to_string()
            .starts_with("syncsetinstances.hive.openshift.io"));
    }

    #[test]
    fn test_sync_leaves_detail_less_errors() {
        let err = sync_status_error(
            &aggregated_request(),
            StatusError::bad_request("namespace parameter required").into(),
        );
        assert!(err.is_bad_request());
        assert_eq!(err.to_string(), "namespace parameter required");

        let err = sync_status_error(
            &aggregated_request(),
            ConversionError::UnknownApplyMode("x".to_string()).into(),
        );
        assert!(matches!(err, RegistryError::Conversion(_)));
    }
}
