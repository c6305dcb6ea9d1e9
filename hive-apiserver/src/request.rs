//! Request-scoped values passed to storage operations

use crate::error::GroupResource;

/// Attributes of the API request being served
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    pub verb: String,
    pub api_group: String,
    pub api_version: String,
    pub namespace: String,
    pub resource: String,
    pub subresource: String,
    pub name: String,
}

impl RequestInfo {
    pub fn group_resource(&self) -> GroupResource {
        GroupResource::new(self.api_group.clone(), self.resource.clone())
    }
}

/// Explicit request scope handed to every storage call
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    namespace: Option<String>,
    request_info: Option<RequestInfo>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context scoped to a namespace
    pub fn namespaced(namespace: impl Into<String>) -> Self {
        Self::new().with_namespace(namespace)
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_request_info(mut self, info: RequestInfo) -> Self {
        self.request_info = Some(info);
        self
    }

    /// Namespace of the request
    ///
    /// `Some("")` means every namespace; `None` means the request carried none.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn request_info(&self) -> Option<&RequestInfo> {
        self.request_info.as_ref()
    }
}
