//! Request option structures and selectors
//!
//! `internalversion` holds the options as the storage layer receives them,
//! `v1` holds the options as the remote client expects them.

pub mod internalversion;
pub mod v1;

use serde::{Deserialize, Serialize};

use crate::ConversionError;

/// Operator of a selector requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionOperator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Exists,
    DoesNotExist,
}

/// One `key <op> values` clause of a selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub key: String,
    pub operator: SelectionOperator,
    #[serde(default)]
    pub values: Vec<String>,
}

impl Requirement {
    pub fn new(key: impl Into<String>, operator: SelectionOperator, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            operator,
            values,
        }
    }

    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, SelectionOperator::Equals, vec![value.into()])
    }

    pub fn not_equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, SelectionOperator::NotEquals, vec![value.into()])
    }

    pub fn exists(key: impl Into<String>) -> Self {
        Self::new(key, SelectionOperator::Exists, Vec::new())
    }

    /// Check value arity against the operator
    fn check(&self) -> Result<(), String> {
        if self.key.is_empty() {
            return Err("requirement key must not be empty".to_string());
        }
        let arity_ok = match self.operator {
            SelectionOperator::Equals | SelectionOperator::NotEquals => self.values.len() == 1,
            SelectionOperator::In | SelectionOperator::NotIn => !self.values.is_empty(),
            SelectionOperator::Exists | SelectionOperator::DoesNotExist => self.values.is_empty(),
        };
        if !arity_ok {
            return Err(format!(
                "operator {:?} on key {:?} got {} value(s)",
                self.operator,
                self.key,
                self.values.len()
            ));
        }
        Ok(())
    }

    fn render(&self) -> String {
        let mut values = self.values.clone();
        values.sort();
        match self.operator {
            SelectionOperator::Equals => format!("{}={}", self.key, values[0]),
            SelectionOperator::NotEquals => format!("{}!={}", self.key, values[0]),
            SelectionOperator::In => format!("{} in ({})", self.key, values.join(",")),
            SelectionOperator::NotIn => format!("{} notin ({})", self.key, values.join(",")),
            SelectionOperator::Exists => self.key.clone(),
            SelectionOperator::DoesNotExist => format!("!{}", self.key),
        }
    }
}

/// Label selector as a conjunction of requirements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSelector {
    pub requirements: Vec<Requirement>,
}

impl LabelSelector {
    pub fn new(requirements: Vec<Requirement>) -> Self {
        Self { requirements }
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Render in the `key=value,key in (a,b)` query form
    pub fn to_query_string(&self) -> Result<String, ConversionError> {
        let mut parts = Vec::with_capacity(self.requirements.len());
        for requirement in &self.requirements {
            requirement
                .check()
                .map_err(ConversionError::InvalidLabelSelector)?;
            parts.push(requirement.render());
        }
        Ok(parts.join(","))
    }
}

/// Field selector; only equality operators are meaningful for fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelector {
    pub requirements: Vec<Requirement>,
}

impl FieldSelector {
    pub fn new(requirements: Vec<Requirement>) -> Self {
        Self { requirements }
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn to_query_string(&self) -> Result<String, ConversionError> {
        let mut parts = Vec::with_capacity(self.requirements.len());
        for requirement in &self.requirements {
            if !matches!(
                requirement.operator,
                SelectionOperator::Equals | SelectionOperator::NotEquals
            ) {
                return Err(ConversionError::InvalidFieldSelector(format!(
                    "operator {:?} is not supported for field {:?}",
                    requirement.operator, requirement.key
                )));
            }
            requirement
                .check()
                .map_err(ConversionError::InvalidFieldSelector)?;
            parts.push(requirement.render());
        }
        Ok(parts.join(","))
    }
}
