use std::collections::TryReserveError;

use thiserror::Error;

/// Errors reported by [`UnrolledList`](crate::UnrolledList) operations.
///
/// Reaching the end of an iteration is not an error: the stepping
/// operations return `Ok(None)` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A parameter was rejected: a zero item size, fewer than two items per
    /// node, an item buffer of the wrong length, or any operation on a
    /// destroyed list.
    #[error("invalid parameter: {0}")]
    InvalidParam(&'static str),
    /// The index is past the valid bound of the operation (`len` for
    /// inserting, `len - 1` for reading and popping).
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// Allocating a node failed. The list is left as it was before the call.
    #[error("node allocation failed")]
    OutOfMemory(#[from] TryReserveError),
    /// `destroy` was called on a list that is already destroyed.
    #[error("list already destroyed")]
    AlreadyDestroyed,
    /// No node holds an index that passed the range check. This means the
    /// node chain is corrupt.
    #[error("no node holds in-range index {index}")]
    Internal { index: usize },
}

/// Result type alias for list operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn error_messages() {
        assert_eq!(
            Error::InvalidParam("item_size").to_string(),
            "invalid parameter: item_size"
        );
        assert_eq!(
            Error::IndexOutOfRange { index: 4, len: 3 }.to_string(),
            "index 4 out of range for list of length 3"
        );
        assert_eq!(Error::AlreadyDestroyed.to_string(), "list already destroyed");
    }

    #[test]
    fn out_of_memory_from_reserve() {
        let mut buf: Vec<u8> = Vec::new();
        let err = buf.try_reserve_exact(usize::MAX).unwrap_err();
        assert!(matches!(Error::from(err), Error::OutOfMemory(_)));
    }
}
