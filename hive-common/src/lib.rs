//! Common types shared between the hive API server and its clients
//!
//! Holds both representations of the hive API objects (internal and
//! `hive.openshift.io/v1`) and the request option structures exchanged
//! with the generic storage layer.

pub mod apis;
pub mod meta;

/// Errors raised while converting between API representations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("unknown resource apply mode: {0:?}")]
    UnknownApplyMode(String),

    #[error("unknown sync condition type: {0:?}")]
    UnknownConditionType(String),

    #[error("unknown condition status: {0:?}")]
    UnknownConditionStatus(String),

    #[error("invalid label selector: {0}")]
    InvalidLabelSelector(String),

    #[error("invalid field selector: {0}")]
    InvalidFieldSelector(String),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
