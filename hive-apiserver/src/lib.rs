//! Hive aggregated API server storage
//!
//! REST storage for resources served under an aggregated API group but
//! persisted by a remote API server as hive.openshift.io/v1 objects.

// Core modules
pub mod config;
pub mod error;
pub mod logging;
pub mod request;

// Remote clients
pub mod client;

// Storage
pub mod printers;
pub mod registry;

pub use config::HiveApiServerConfig;
pub use error::{RegistryError, RegistryResult, StatusError, StatusReason};
pub use registry::syncsetinstance::SyncSetInstanceRest;
pub use request::{RequestContext, RequestInfo};
