//! Options as handed to the storage layer

use serde::{Deserialize, Serialize};

use super::{v1, FieldSelector, LabelSelector};
use crate::ConversionError;

/// How `resource_version` is interpreted on list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceVersionMatch {
    NotOlderThan,
    Exact,
}

impl ResourceVersionMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotOlderThan => "NotOlderThan",
            Self::Exact => "Exact",
        }
    }
}

/// List options with parsed selectors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    pub label_selector: Option<LabelSelector>,
    pub field_selector: Option<FieldSelector>,
    pub watch: bool,
    pub allow_watch_bookmarks: bool,
    pub resource_version: String,
    pub resource_version_match: Option<ResourceVersionMatch>,
    pub timeout_seconds: Option<i64>,
    pub limit: i64,
    pub continue_: String,
}

impl ListOptions {
    /// Convert to the option format of the remote client
    pub fn to_v1(&self) -> Result<v1::ListOptions, ConversionError> {
        let label_selector = match &self.label_selector {
            Some(selector) => selector.to_query_string()?,
            None => String::new(),
        };
        let field_selector = match &self.field_selector {
            Some(selector) => selector.to_query_string()?,
            None => String::new(),
        };

        Ok(v1::ListOptions {
            label_selector,
            field_selector,
            watch: self.watch,
            allow_watch_bookmarks: self.allow_watch_bookmarks,
            resource_version: self.resource_version.clone(),
            resource_version_match: self
                .resource_version_match
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            timeout_seconds: self.timeout_seconds,
            limit: self.limit,
            continue_: self.continue_.clone(),
        })
    }
}

impl TryFrom<&ListOptions> for v1::ListOptions {
    type Error = ConversionError;

    fn try_from(options: &ListOptions) -> Result<Self, Self::Error> {
        options.to_v1()
    }
}
