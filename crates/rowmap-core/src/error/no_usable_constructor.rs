use super::Error;

/// Error when a target type cannot be constructed for a result set.
///
/// This occurs when:
/// - No constructor map is configured and the target has no parameterless
///   constructor
/// - A constructor map is configured but no constructor of the target accepts
///   the declared argument types
#[derive(Debug)]
pub(super) struct NoUsableConstructorError {
    target: Box<str>,
}

impl std::error::Error for NoUsableConstructorError {}

impl core::fmt::Display for NoUsableConstructorError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "no usable constructor defined for the target type: {}",
            self.target
        )
    }
}

impl Error {
    /// Creates a no usable constructor error for the named target type.
    pub fn no_usable_constructor(target: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NoUsableConstructor(
            NoUsableConstructorError {
                target: target.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is a no usable constructor error.
    pub fn is_no_usable_constructor(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::NoUsableConstructor(_))
    }
}
