//! Tabular rendering of storage objects
//!
//! A [`TablePrinter`] is handed to a storage at construction and turns its
//! objects into rows for `kubectl get` style output.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ListMeta;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{RegistryError, RegistryResult};

/// Column header of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumnDefinition {
    pub name: String,
    /// OpenAPI type: string, integer, boolean, date
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,
    pub description: String,
    /// Columns with priority above zero are only shown in wide output
    pub priority: i32,
}

impl TableColumnDefinition {
    pub fn new(name: &str, type_: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            type_: type_.to_string(),
            format: String::new(),
            description: description.to_string(),
            priority: 0,
        }
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = format.to_string();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    String(String),
    Integer(i64),
    Bool(bool),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::String(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::String(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub metadata: ListMeta,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub column_definitions: Vec<TableColumnDefinition>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOptions {
    /// Omit column definitions
    pub no_headers: bool,
}

type RowFunc<T> = dyn Fn(&T) -> Vec<Cell> + Send + Sync;

/// Column definitions plus the function producing one row per object
pub struct TablePrinter<T> {
    columns: Vec<TableColumnDefinition>,
    row: Arc<RowFunc<T>>,
}

impl<T> Clone for TablePrinter<T> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            row: self.row.clone(),
        }
    }
}

impl<T> TablePrinter<T> {
    pub fn new(
        columns: Vec<TableColumnDefinition>,
        row: impl Fn(&T) -> Vec<Cell> + Send + Sync + 'static,
    ) -> Self {
        Self {
            columns,
            row: Arc::new(row),
        }
    }

    pub fn columns(&self) -> &[TableColumnDefinition] {
        &self.columns
    }

    pub fn print(
        &self,
        objects: &[T],
        list_meta: Option<&ListMeta>,
        options: &TableOptions,
    ) -> RegistryResult<Table> {
        let mut rows = Vec::with_capacity(objects.len());
        for obj in objects {
            let cells = (self.row)(obj);
            if cells.len() != self.columns.len() {
                return Err(RegistryError::Internal(format!(
                    "table row has {} cells, expected {}",
                    cells.len(),
                    self.columns.len()
                )));
            }
            rows.push(TableRow { cells });
        }

        Ok(Table {
            metadata: list_meta.cloned().unwrap_or_default(),
            column_definitions: if options.no_headers {
                Vec::new()
            } else {
                self.columns.clone()
            },
            rows,
        })
    }
}

impl<T> std::fmt::Debug for TablePrinter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TablePrinter")
            .field("columns", &self.columns.len())
            .finish()
    }
}
