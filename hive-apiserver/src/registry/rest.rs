//! Generic REST storage capabilities
//!
//! Each trait is one capability the serving layer may look for on a
//! storage. A storage implements the subset it supports.

use async_trait::async_trait;
use hive_common::meta::internalversion::ListOptions;
use hive_common::meta::v1::{CreateOptions, DeleteOptions, GetOptions, UpdateOptions};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ListMeta, Status};

use super::table::{Table, TableOptions};
use crate::error::RegistryResult;
use crate::request::RequestContext;

/// Validation hook run on an object before it is created
pub type ValidateObjectFn<T> = dyn Fn(&RequestContext, &T) -> RegistryResult<()> + Send + Sync;

/// Validation hook run on the new and old object before an update
pub type ValidateObjectUpdateFn<T> =
    dyn Fn(&RequestContext, &T, &T) -> RegistryResult<()> + Send + Sync;

/// Base of every storage
pub trait Storage: Send + Sync {
    type Object: Send + Sync + 'static;

    /// Empty object, used for decoding and defaulting
    fn new_object(&self) -> Self::Object;
}

pub trait Scoper {
    /// Whether objects live inside a namespace
    fn namespace_scoped(&self) -> bool;
}

#[async_trait]
pub trait Lister: Storage {
    type List: Send + Sync + 'static;

    /// Empty list, used for decoding and defaulting
    fn new_list(&self) -> Self::List;

    async fn list(&self, ctx: &RequestContext, options: &ListOptions)
        -> RegistryResult<Self::List>;
}

#[async_trait]
pub trait Getter: Storage {
    async fn get(
        &self,
        ctx: &RequestContext,
        name: &str,
        options: &GetOptions,
    ) -> RegistryResult<Self::Object>;
}

#[async_trait]
pub trait Creater: Storage {
    async fn create(
        &self,
        ctx: &RequestContext,
        obj: Self::Object,
        create_validation: Option<&ValidateObjectFn<Self::Object>>,
        options: &CreateOptions,
    ) -> RegistryResult<Self::Object>;
}

#[async_trait]
pub trait Updater: Storage {
    /// Returns the stored object and whether it was created
    #[allow(clippy::too_many_arguments)]
    async fn update(
        &self,
        ctx: &RequestContext,
        name: &str,
        obj_info: &dyn UpdatedObjectInfo<Self::Object>,
        create_validation: Option<&ValidateObjectFn<Self::Object>>,
        update_validation: Option<&ValidateObjectUpdateFn<Self::Object>>,
        force_allow_create: bool,
        options: &UpdateOptions,
    ) -> RegistryResult<(Self::Object, bool)>;
}

#[async_trait]
pub trait GracefulDeleter: Send + Sync {
    /// Returns the outcome and whether the object is already gone
    async fn delete(
        &self,
        ctx: &RequestContext,
        name: &str,
        options: &DeleteOptions,
    ) -> RegistryResult<(Status, bool)>;
}

pub trait TableConvertor: Storage {
    fn convert_to_table(
        &self,
        ctx: &RequestContext,
        objects: &[Self::Object],
        list_meta: Option<&ListMeta>,
        options: &TableOptions,
    ) -> RegistryResult<Table>;
}

/// Produces the object an update should write, given the stored one
#[async_trait]
pub trait UpdatedObjectInfo<T: Send + 'static>: Send + Sync {
    async fn updated_object(&self, ctx: &RequestContext, old: T) -> RegistryResult<T>;
}

/// Transformer applied by [`DefaultUpdatedObjectInfo`]: (ctx, new, old) -> new
pub type TransformFunc<T> = Box<dyn Fn(&RequestContext, T, &T) -> RegistryResult<T> + Send + Sync>;

/// Replaces the stored object with a fixed one, then runs transformers
pub struct DefaultUpdatedObjectInfo<T> {
    obj: T,
    transformers: Vec<TransformFunc<T>>,
}

impl<T> DefaultUpdatedObjectInfo<T> {
    pub fn new(obj: T) -> Self {
        Self {
            obj,
            transformers: Vec::new(),
        }
    }

    pub fn with_transformer(
        mut self,
        transformer: impl Fn(&RequestContext, T, &T) -> RegistryResult<T> + Send + Sync + 'static,
    ) -> Self {
        self.transformers.push(Box::new(transformer));
        self
    }
}

#[async_trait]
impl<T> UpdatedObjectInfo<T> for DefaultUpdatedObjectInfo<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn updated_object(&self, ctx: &RequestContext, old: T) -> RegistryResult<T> {
        let mut obj = self.obj.clone();
        for transformer in &self.transformers {
            obj = transformer(ctx, obj, &old)?;
        }
        Ok(obj)
    }
}

/// Adapts a closure mapping the stored object to the new one
pub struct UpdateFn<F>(pub F);

#[async_trait]
impl<T, F> UpdatedObjectInfo<T> for UpdateFn<F>
where
    T: Send + 'static,
    F: Fn(&RequestContext, T) -> RegistryResult<T> + Send + Sync,
{
    async fn updated_object(&self, ctx: &RequestContext, old: T) -> RegistryResult<T> {
        (self.0)(ctx, old)
    }
}
