//! Value object trait: equality by value, not identity.

/// Immutable value compared by its attributes.
///
/// Report rows are value objects: two rows with the same fields are the same
/// row, whichever records they were built from. This is the opposite of
/// [`crate::Entity`]. The analytics projections only emit types bounded by it.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
