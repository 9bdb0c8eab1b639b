use super::{Column, RowAccess, RowSource};
use crate::{async_trait, stmt, Error, Result};

use std::collections::VecDeque;

/// A row source over rows held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryRows {
    columns: Vec<Column>,
    rows: VecDeque<Vec<stmt::Value>>,
    current: Option<Vec<stmt::Value>>,
    result_index: usize,
}

impl MemoryRows {
    /// Creates an empty source with the given `(name, type)` columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, stmt::Type)>,
        S: Into<String>,
    {
        Self {
            columns: columns
                .into_iter()
                .enumerate()
                .map(|(index, (name, ty))| Column::new(index, name, ty))
                .collect(),
            ..Self::default()
        }
    }

    /// Appends a row.
    pub fn row(mut self, values: Vec<stmt::Value>) -> Self {
        self.push(values);
        self
    }

    /// Sets the position of this result set within a multi-result response.
    pub fn with_result_index(mut self, index: usize) -> Self {
        self.result_index = index;
        self
    }

    pub fn push(&mut self, values: Vec<stmt::Value>) {
        self.rows.push_back(values);
    }

    /// Number of rows not yet advanced past.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, index: usize) -> Result<&stmt::Value> {
        let Some(row) = &self.current else {
            return Err(Error::invalid_result("row read before advancing"));
        };

        row.get(index).ok_or_else(|| {
            Error::invalid_result(format!(
                "column index {index} out of range ({} columns)",
                row.len()
            ))
        })
    }
}

impl RowAccess for MemoryRows {
    fn field_count(&self) -> usize {
        self.columns.len()
    }

    fn field_name(&self, index: usize) -> &str {
        &self.columns[index].name
    }

    fn field_type(&self, index: usize) -> &stmt::Type {
        &self.columns[index].ty
    }

    fn is_null(&self, index: usize) -> bool {
        self.cell(index).is_ok_and(|value| value.is_null())
    }

    fn raw_value(&self, index: usize, _requested: &stmt::Type) -> Result<stmt::Value> {
        self.cell(index).cloned()
    }

    fn columns(&self) -> Vec<Column> {
        self.columns.clone()
    }
}

#[async_trait]
impl RowSource for MemoryRows {
    fn has_rows(&self) -> bool {
        self.current.is_some() || !self.rows.is_empty()
    }

    fn result_index(&self) -> usize {
        self.result_index
    }

    fn advance(&mut self) -> Result<bool> {
        self.current = self.rows.pop_front();
        Ok(self.current.is_some())
    }
}
