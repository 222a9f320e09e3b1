//! Binomial Heap for Rust
//!
//! This crate provides a mergeable min-priority queue over integer keys,
//! implemented as a binomial heap.
//!
//! # Features
//!
//! - **Insert**: O(log n) worst-case, O(1) amortized
//! - **Minimum**: O(log n), a scan over at most log₂(n) + 1 roots
//! - **Extract-minimum**: O(log n)
//! - **Decrease-key / delete**: O(log n) through a [`NodeRef`]
//! - **Union**: O(log n) root-list work (carry propagation)
//! - **Search**: O(n), turns a key into a [`NodeRef`]
//!
//! Nodes are kept in a slotmap arena, so node references are generational
//! handles: a reference to a removed node reports [`HeapError::NodeNotFound`]
//! instead of dangling.
//!
//! # Example
//!
//! ```rust
//! use rust_binomial_heap::{BinomialHeap, HeapError};
//!
//! let mut x: BinomialHeap = [10, 20].into_iter().collect();
//! let y: BinomialHeap = [5, 15].into_iter().collect();
//! x.merge(y);
//!
//! let node = x.search(20).unwrap();
//! x.decrease_key(node, 1).unwrap();
//! assert_eq!(x.minimum(), Some(1));
//!
//! let mut sorted = Vec::new();
//! while let Ok(key) = x.extract_minimum() {
//!     sorted.push(key);
//! }
//! assert_eq!(sorted, vec![1, 5, 10, 15]);
//! assert_eq!(x.extract_minimum(), Err(HeapError::EmptyHeap));
//! ```

pub mod binomial;
pub mod error;
pub mod storage;

pub use binomial::{BinomialHeap, Key, NodeRef, Roots};
pub use error::HeapError;
