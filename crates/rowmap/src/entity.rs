use rowmap_core::schema::TargetType;

/// A type rows can be mapped onto.
pub trait Entity: Sized + Send + 'static {
    /// Describes how to construct and populate an instance.
    ///
    /// Called only when a mapper for a new query shape is built; the result is
    /// not kept once the mapper exists.
    fn target_type() -> TargetType<Self>;
}
