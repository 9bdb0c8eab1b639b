use super::{Column, RowAccess, RowSource};
use crate::{async_trait, stmt, Error, Result};

use std::{collections::VecDeque, fmt, pin::Pin};
use tokio_stream::{Stream, StreamExt};

type DynStream = Pin<Box<dyn Stream<Item = Result<Vec<stmt::Value>>> + Send + 'static>>;

/// A row source fed by an asynchronous stream of rows.
///
/// Rows are pulled from the stream only by [`advance_async`] and [`buffer`].
/// The synchronous [`advance`] serves rows that are already buffered and
/// fails if it would have to wait on the stream.
///
/// [`advance_async`]: RowSource::advance_async
/// [`advance`]: RowSource::advance
/// [`buffer`]: StreamRows::buffer
pub struct StreamRows {
    columns: Vec<Column>,
    buffer: VecDeque<Vec<stmt::Value>>,
    stream: Option<DynStream>,
    current: Option<Vec<stmt::Value>>,
    result_index: usize,
}

impl StreamRows {
    /// Opens a source over `stream`, fetching the first row so that
    /// [`has_rows`](RowSource::has_rows) can answer without waiting.
    pub async fn open<I, S, T>(columns: I, stream: T) -> Result<Self>
    where
        I: IntoIterator<Item = (S, stmt::Type)>,
        S: Into<String>,
        T: Stream<Item = Result<Vec<stmt::Value>>> + Send + 'static,
    {
        let mut rows = Self {
            columns: columns
                .into_iter()
                .enumerate()
                .map(|(index, (name, ty))| Column::new(index, name, ty))
                .collect(),
            buffer: VecDeque::new(),
            stream: Some(Box::pin(stream)),
            current: None,
            result_index: 0,
        };

        rows.tap().await?;
        Ok(rows)
    }

    /// Sets the position of this result set within a multi-result response.
    pub fn with_result_index(mut self, index: usize) -> Self {
        self.result_index = index;
        self
    }

    /// Force the stream to preload at least one row, if there are more rows
    /// to stream.
    pub async fn tap(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            if let Some(row) = self.pull().await? {
                self.buffer.push_back(row);
            }
        }
        Ok(())
    }

    /// Drains the underlying stream into the buffer.
    pub async fn buffer(&mut self) -> Result<()> {
        while let Some(row) = self.pull().await? {
            self.buffer.push_back(row);
        }
        Ok(())
    }

    async fn pull(&mut self) -> Result<Option<Vec<stmt::Value>>> {
        let Some(stream) = &mut self.stream else {
            return Ok(None);
        };

        match stream.next().await {
            Some(row) => row.map(Some),
            None => {
                self.stream = None;
                Ok(None)
            }
        }
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

impl RowAccess for StreamRows {
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
impl RowSource for StreamRows {
    fn has_rows(&self) -> bool {
        self.current.is_some() || !self.buffer.is_empty()
    }

    fn result_index(&self) -> usize {
        self.result_index
    }

    fn advance(&mut self) -> Result<bool> {
        if self.buffer.is_empty() && self.stream.is_some() {
            return Err(Error::invalid_result(
                "synchronous advance past the buffered rows of a streaming source",
            ));
        }

        self.current = self.buffer.pop_front();
        Ok(self.current.is_some())
    }

    async fn advance_async(&mut self) -> Result<bool> {
        self.current = match self.buffer.pop_front() {
            Some(row) => Some(row),
            None => self.pull().await?,
        };
        Ok(self.current.is_some())
    }
}

impl fmt::Debug for StreamRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamRows")
            .field("columns", &self.columns)
            .field("buffered", &self.buffer.len())
            .field("streaming", &self.stream.is_some())
            .finish()
    }
}
