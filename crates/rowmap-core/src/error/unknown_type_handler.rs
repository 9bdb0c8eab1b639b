use super::Error;

/// Error when configuration names a type handler that was never registered.
#[derive(Debug)]
pub(super) struct UnknownTypeHandlerError {
    name: Box<str>,
}

impl std::error::Error for UnknownTypeHandlerError {}

impl core::fmt::Display for UnknownTypeHandlerError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "no type handler registered under the name `{}`", self.name)
    }
}

impl Error {
    /// Creates an unknown type handler error.
    pub fn unknown_type_handler(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownTypeHandler(UnknownTypeHandlerError {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown type handler error.
    pub fn is_unknown_type_handler(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownTypeHandler(_))
    }
}
