//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values
/// (e.g. a ticket category or a discount rate). To "modify" one, build a new
/// value.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
