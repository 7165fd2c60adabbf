//! Entity trait: rows with identity.

/// A stored row identified by its id rather than by its attributes.
///
/// Products, customers, regions and sales are entities: two rows with equal
/// attributes but different ids are different rows.
pub trait Entity {
    /// Singular row name used in store messages, e.g. `"product"`.
    const KIND: &'static str;

    /// Strongly-typed integer identifier.
    type Id: Copy + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> Self::Id;
}
