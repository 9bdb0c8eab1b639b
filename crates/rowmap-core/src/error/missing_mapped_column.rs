use super::Error;

/// Error when a constructor argument names a column the result set lacks.
#[derive(Debug)]
pub(super) struct MissingMappedColumnError {
    target: Box<str>,
    column: Box<str>,
}

impl std::error::Error for MissingMappedColumnError {}

impl core::fmt::Display for MissingMappedColumnError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "constructor of {} maps column `{}`, which is not in the result set",
            self.target, self.column
        )
    }
}

impl Error {
    /// Creates a missing mapped column error.
    pub fn missing_mapped_column(target: impl Into<String>, column: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MissingMappedColumn(
            MissingMappedColumnError {
                target: target.into().into(),
                column: column.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is a missing mapped column error.
    pub fn is_missing_mapped_column(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MissingMappedColumn(_))
    }
}
