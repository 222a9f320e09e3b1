//! Arena storage for heap nodes
//!
//! Nodes live in a [`SlotMap`], so every link between nodes (parent, first
//! child, next sibling) is a [`NodeKey`] rather than a pointer. Keys are
//! generational: once a node is removed its key stops resolving, even if the
//! slot is reused by a later insert.
//!
//! Moving nodes between arenas (heap union) changes their keys. [`NodeArena::absorb`]
//! performs the move and asks each moved node to rewrite its own links through
//! the [`Relocate`] trait.

use slotmap::{new_key_type, SecondaryMap, SlotMap};
use std::ops::{Index, IndexMut};

new_key_type! {
    /// Slot key of a node inside a [`NodeArena`]
    pub struct NodeKey;
}

/// Nodes that hold links to other nodes of the same arena
pub trait Relocate {
    /// Rewrites every link using `moved`, which maps old keys to new keys
    fn relocate(&mut self, moved: &SecondaryMap<NodeKey, NodeKey>);
}

/// Contiguous node storage indexed by [`NodeKey`]
///
/// Indexing with a key that does not resolve panics; use [`get`](Self::get)
/// for keys that come from outside the structure.
#[derive(Debug, Clone)]
pub struct NodeArena<N> {
    nodes: SlotMap<NodeKey, N>,
}

impl<N> Default for NodeArena<N> {
    fn default() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }
}

impl<N> NodeArena<N> {
    /// Creates an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Stores a node, returning the key that refers to it
    pub fn insert(&mut self, node: N) -> NodeKey {
        self.nodes.insert(node)
    }

    /// Removes a node, returning it if the key was live
    pub fn remove(&mut self, key: NodeKey) -> Option<N> {
        self.nodes.remove(key)
    }

    #[inline]
    pub fn get(&self, key: NodeKey) -> Option<&N> {
        self.nodes.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut N> {
        self.nodes.get_mut(key)
    }

    #[inline]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Moves every node of `other` into this arena
    ///
    /// Returns the old-key to new-key mapping. Links inside the moved nodes
    /// are already rewritten when this returns; keys held outside the nodes
    /// (list heads, external references) must be translated by the caller.
    pub fn absorb(&mut self, other: NodeArena<N>) -> SecondaryMap<NodeKey, NodeKey>
    where
        N: Relocate,
    {
        let mut moved = SecondaryMap::with_capacity(other.len());
        for (old, node) in other.nodes {
            moved.insert(old, self.nodes.insert(node));
        }
        for &new in moved.values() {
            self.nodes[new].relocate(&moved);
        }
        moved
    }
}

impl<N> Index<NodeKey> for NodeArena<N> {
    type Output = N;

    #[inline]
    fn index(&self, key: NodeKey) -> &N {
        &self.nodes[key]
    }
}

impl<N> IndexMut<NodeKey> for NodeArena<N> {
    #[inline]
    fn index_mut(&mut self, key: NodeKey) -> &mut N {
        &mut self.nodes[key]
    }
}
