use thiserror::Error;

/// Failure of a narrowing call on an [`Entry`](crate::Entry).
///
/// Both kinds signal a caller precondition that did not hold. They are always
/// avoidable with `is_occupied`/`is_vacant`, `try_into_*` or `either`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EntryError {
    /// The entry was vacant but an occupied entry was required.
    #[error("key was not found in the map")]
    KeyNotFound,
    /// The entry was occupied but a vacant entry was required.
    #[error("key already exists in the map")]
    InvalidState,
}
