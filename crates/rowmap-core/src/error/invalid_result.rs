use super::Error;

/// Error when a row source hands back something the mapper cannot read.
///
/// This occurs when:
/// - A column index is out of range for the current row
/// - A read is attempted before the row source was advanced
/// - A row has a different width than the declared columns
#[derive(Debug)]
pub(super) struct InvalidResultError {
    message: Box<str>,
}

impl std::error::Error for InvalidResultError {}

impl core::fmt::Display for InvalidResultError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid result: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid result error.
    pub fn invalid_result(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidResult(InvalidResultError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid result error.
    pub fn is_invalid_result(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidResult(_))
    }
}
