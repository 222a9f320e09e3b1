//! Error type for binomial heap operations

use std::fmt;

/// Error type for heap operations
///
/// None of these are fatal: an operation that returns an error leaves the
/// heap exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The heap has no roots, so there is no minimum to extract
    EmptyHeap,
    /// The node reference does not resolve to a live node of this heap
    NodeNotFound,
    /// `decrease_key` was asked to raise a key
    InvalidKeyIncrease,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::EmptyHeap => write!(f, "heap is empty"),
            HeapError::NodeNotFound => {
                write!(f, "node not found (removed, or belongs to another heap)")
            }
            HeapError::InvalidKeyIncrease => {
                write!(f, "new key is greater than the current key")
            }
        }
    }
}

impl std::error::Error for HeapError {}
