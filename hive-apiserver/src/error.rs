//! Error types for the hive API server storage layer
//!
//! `StatusError` carries a Kubernetes API `Status` and is the error kind both
//! the request context checks and the remote API server produce.
//! `RegistryError` wraps it together with conversion and transport failures.

use hive_common::ConversionError;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{Status, StatusDetails};
use thiserror::Error;
use tracing::error;

pub const STATUS_SUCCESS: &str = "Success";
pub const STATUS_FAILURE: &str = "Failure";

/// Machine readable reason attached to a failure status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusReason {
    /// 400 Bad Request
    BadRequest,
    /// 401 Unauthorized
    Unauthorized,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 409 Conflict, object already exists
    AlreadyExists,
    /// 409 Conflict, write raced another writer
    Conflict,
    /// 410 Gone
    Gone,
    /// 422 Unprocessable Entity
    Invalid,
    /// 429 Too Many Requests
    TooManyRequests,
    /// 500 Internal Server Error
    InternalError,
    /// 503 Service Unavailable
    ServiceUnavailable,
    /// 504 Gateway Timeout
    Timeout,
    /// Reason missing or not recognised
    Unknown,
}

impl StatusReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BadRequest",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "NotFound",
            Self::AlreadyExists => "AlreadyExists",
            Self::Conflict => "Conflict",
            Self::Gone => "Gone",
            Self::Invalid => "Invalid",
            Self::TooManyRequests => "TooManyRequests",
            Self::InternalError => "InternalError",
            Self::ServiceUnavailable => "ServiceUnavailable",
            Self::Timeout => "Timeout",
            Self::Unknown => "",
        }
    }

    /// HTTP code conventionally paired with the reason
    pub fn code(&self) -> i32 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::AlreadyExists | Self::Conflict => 409,
            Self::Gone => 410,
            Self::Invalid => 422,
            Self::TooManyRequests => 429,
            Self::InternalError | Self::Unknown => 500,
            Self::ServiceUnavailable => 503,
            Self::Timeout => 504,
        }
    }

    pub fn parse(reason: &str) -> Self {
        match reason {
            "BadRequest" => Self::BadRequest,
            "Unauthorized" => Self::Unauthorized,
            "Forbidden" => Self::Forbidden,
            "NotFound" => Self::NotFound,
            "AlreadyExists" => Self::AlreadyExists,
            "Conflict" => Self::Conflict,
            "Gone" => Self::Gone,
            "Invalid" => Self::Invalid,
            "TooManyRequests" => Self::TooManyRequests,
            "InternalError" => Self::InternalError,
            "ServiceUnavailable" => Self::ServiceUnavailable,
            "Timeout" => Self::Timeout,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for StatusReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API group plus plural resource name, rendered as `resource.group`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GroupResource {
    pub group: String,
    pub resource: String,
}

impl GroupResource {
    pub fn new(group: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            resource: resource.into(),
        }
    }
}

impl std::fmt::Display for GroupResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.group.is_empty() {
            f.write_str(&self.resource)
        } else {
            write!(f, "{}.{}", self.resource, self.group)
        }
    }
}

/// Error described by an API `Status`
#[derive(Debug, Clone, PartialEq)]
pub struct StatusError {
    status: Status,
}

impl StatusError {
    pub fn new(reason: StatusReason, message: impl Into<String>) -> Self {
        Self {
            status: Status {
                status: Some(STATUS_FAILURE.to_string()),
                code: Some(reason.code()),
                reason: Some(reason.as_str().to_string()).filter(|r| !r.is_empty()),
                message: Some(message.into()),
                ..Default::default()
            },
        }
    }

    pub fn from_status(status: Status) -> Self {
        Self { status }
    }

    /// Attach group, resource and name details
    pub fn with_details(mut self, resource: &GroupResource, name: &str) -> Self {
        self.status.details = Some(StatusDetails {
            group: Some(resource.group.clone()),
            kind: Some(resource.resource.clone()),
            name: Some(name.to_string()),
            ..Default::default()
        });
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusReason::BadRequest, message)
    }

    pub fn not_found(resource: &GroupResource, name: &str) -> Self {
        Self::new(
            StatusReason::NotFound,
            format!("{} {:?} not found", resource, name),
        )
        .with_details(resource, name)
    }

    pub fn already_exists(resource: &GroupResource, name: &str) -> Self {
        Self::new(
            StatusReason::AlreadyExists,
            format!("{} {:?} already exists", resource, name),
        )
        .with_details(resource, name)
    }

    pub fn conflict(resource: &GroupResource, name: &str, cause: impl std::fmt::Display) -> Self {
        Self::new(
            StatusReason::Conflict,
            format!(
                "Operation cannot be fulfilled on {} {:?}: {}",
                resource, name, cause
            ),
        )
        .with_details(resource, name)
    }

    pub fn internal(cause: impl std::fmt::Display) -> Self {
        Self::new(
            StatusReason::InternalError,
            format!("Internal error occurred: {}", cause),
        )
    }

    pub fn reason(&self) -> StatusReason {
        self.status
            .reason
            .as_deref()
            .map(StatusReason::parse)
            .unwrap_or(StatusReason::Unknown)
    }

    pub fn code(&self) -> i32 {
        self.status.code.unwrap_or_else(|| self.reason().code())
    }

    pub fn message(&self) -> &str {
        self.status.message.as_deref().unwrap_or_default()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }

    pub fn into_status(self) -> Status {
        self.status
    }
}

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for StatusError {}

/// Errors returned by storage operations
#[derive(Debug, Error)]
pub enum RegistryError {
    /// API status from the request checks or the remote API server
    #[error(transparent)]
    Status(#[from] StatusError),

    /// Object or options could not be converted between representations
    #[error("conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// Request never produced an API status (connection, TLS, decoding)
    #[cfg(feature = "kubernetes")]
    #[error("Kubernetes transport error: {0}")]
    Transport(kube::Error),

    /// Internal system error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    /// Status reason, when the error carries one
    pub fn reason(&self) -> Option<StatusReason> {
        match self {
            RegistryError::Status(status) => Some(status.reason()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.reason() == Some(StatusReason::NotFound)
    }

    pub fn is_bad_request(&self) -> bool {
        self.reason() == Some(StatusReason::BadRequest)
    }

    pub fn is_conflict(&self) -> bool {
        self.reason() == Some(StatusReason::Conflict)
    }

    pub fn is_already_exists(&self) -> bool {
        self.reason() == Some(StatusReason::AlreadyExists)
    }

    /// Render as an API status for the serving layer
    pub fn to_status(&self) -> Status {
        match self {
            RegistryError::Status(status) => status.status().clone(),
            other => {
                error!("Internal storage error: {}", other);
                StatusError::internal(other).into_status()
            }
        }
    }
}

#[cfg(feature = "kubernetes")]
impl From<kube::Error> for RegistryError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(response) => RegistryError::Status(StatusError::from_status(Status {
                status: Some(response.status),
                code: Some(i32::from(response.code)),
                reason: Some(response.reason).filter(|r| !r.is_empty()),
                message: Some(response.message),
                ..Default::default()
            })),
            other => RegistryError::Transport(other),
        }
    }
}

/// Result type alias for storage operations
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
