mod memory;
pub use memory::MemoryRows;

mod stream;
pub use stream::StreamRows;

use crate::{async_trait, stmt, Result};

/// Describes one column of a result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    /// Position of the column in the row
    pub index: usize,

    /// Column name as reported by the row source
    pub name: String,

    /// Runtime type of the column's values
    pub ty: stmt::Type,
}

impl Column {
    pub fn new(index: usize, name: impl Into<String>, ty: stmt::Type) -> Self {
        Self {
            index,
            name: name.into(),
            ty,
        }
    }
}

/// Read access to the row a source is currently positioned on.
pub trait RowAccess {
    /// Number of columns in each row.
    fn field_count(&self) -> usize;

    /// Name of the column at `index`.
    fn field_name(&self, index: usize) -> &str;

    /// Runtime type of the column at `index`.
    fn field_type(&self, index: usize) -> &stmt::Type;

    /// Returns `true` when the current row holds no value at `index`.
    ///
    /// A cell that cannot be read is not null; reading it reports the error.
    fn is_null(&self, index: usize) -> bool;

    /// Reads the raw value at `index`.
    ///
    /// `requested` is the type the caller intends to read. Sources backed by
    /// typed getters use it to pick one; others may ignore it.
    fn raw_value(&self, index: usize, requested: &stmt::Type) -> Result<stmt::Value>;

    /// Describes every column, in order.
    fn columns(&self) -> Vec<Column> {
        (0..self.field_count())
            .map(|index| {
                Column::new(
                    index,
                    self.field_name(index),
                    self.field_type(index).clone(),
                )
            })
            .collect()
    }
}

/// A forward-only cursor over the rows of one result set.
///
/// The source is borrowed by the mapping layer, never owned: it is advanced
/// but not closed.
#[async_trait]
pub trait RowSource: RowAccess + Send {
    /// Returns `true` if the result set has at least one row.
    fn has_rows(&self) -> bool;

    /// Position of this result set within a multi-result response.
    fn result_index(&self) -> usize {
        0
    }

    /// Moves to the next row, returning `false` once the rows are exhausted.
    fn advance(&mut self) -> Result<bool>;

    /// Moves to the next row, suspending while the row is fetched.
    async fn advance_async(&mut self) -> Result<bool> {
        self.advance()
    }
}
