//! Binomial Heap implementation
//!
//! A binomial heap is a forest of binomial trees with:
//! - O(log n) insert, minimum, extract_minimum, decrease_key and delete
//! - O(log n) union of two heaps
//!
//! # Algorithm Overview
//!
//! The trees hang off a singly linked **root list** ordered by strictly
//! increasing degree, so there is at most one tree of each degree. The set of
//! degrees present is the binary representation of the heap size.
//!
//! **Binomial Tree Bₖ**: Recursively defined:
//! - B₀ is a single node
//! - Bₖ is formed by linking two B_{k-1} trees
//! - Bₖ has exactly 2ᵏ nodes, height k, and one child of each degree k-1..0
//!
//! **Union** first merges two root lists by degree, then walks the merged
//! list linking pairs of equal-degree roots. This is binary addition: two
//! trees of the same degree produce a carry of the next degree. When three
//! roots of one degree are pending (two operands plus a carry) the first is
//! left in place and the later two are linked.
//!
//! Every other mutation is expressed through union: insert unions a single
//! node, extract_minimum unions the minimum's reversed child list back in.
//!
//! # Node references
//!
//! Nodes live in a [`NodeArena`]. A [`NodeRef`] names a node slot in one
//! particular heap. It stops resolving once the node is removed, and it never
//! resolves in a different heap, including the heap produced by a union that
//! consumed its owner as the right operand.
//!
//! Decrease-key moves *keys* up the tree, not nodes. A reference therefore
//! names a position in the forest: after bubbling it may hold a different key.

use crate::error::HeapError;
use crate::storage::{NodeArena, NodeKey, Relocate};
use slotmap::SecondaryMap;
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicU64, Ordering};

/// Key type stored in the heap
pub type Key = i64;

/// Traversal stack; binomial trees are shallow, so this rarely spills
type Worklist<T> = SmallVec<[T; 32]>;

static NEXT_HEAP_ID: AtomicU64 = AtomicU64::new(0);

fn next_heap_id() -> u64 {
    NEXT_HEAP_ID.fetch_add(1, Ordering::Relaxed)
}

/// Reference to a node of a [`BinomialHeap`]
///
/// Returned by [`BinomialHeap::insert`] and [`BinomialHeap::search`], consumed
/// by [`BinomialHeap::decrease_key`] and [`BinomialHeap::delete`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    heap: u64,
    key: NodeKey,
}

/// Internal node structure
///
/// - `parent`: navigation only, None for roots
/// - `child`: first child; children are chained through `sibling` in
///   decreasing degree order
/// - `sibling`: next node in whichever list holds this node (root list or
///   the parent's child list)
#[derive(Debug, Clone, Copy)]
struct Node {
    key: Key,
    degree: usize,
    parent: Option<NodeKey>,
    child: Option<NodeKey>,
    sibling: Option<NodeKey>,
}

impl Node {
    fn new(key: Key) -> Self {
        Node {
            key,
            degree: 0,
            parent: None,
            child: None,
            sibling: None,
        }
    }
}

impl Relocate for Node {
    fn relocate(&mut self, moved: &SecondaryMap<NodeKey, NodeKey>) {
        for link in [&mut self.parent, &mut self.child, &mut self.sibling] {
            if let Some(old) = *link {
                *link = moved.get(old).copied();
            }
        }
    }
}

/// Binomial Heap over integer keys
///
/// # Example
///
/// ```rust
/// use rust_binomial_heap::BinomialHeap;
///
/// let mut heap = BinomialHeap::new();
/// heap.insert(5);
/// let node = heap.insert(9);
/// heap.decrease_key(node, 1).unwrap();
/// assert_eq!(heap.minimum(), Some(1));
/// assert_eq!(heap.extract_minimum(), Ok(1));
/// ```
#[derive(Debug)]
pub struct BinomialHeap {
    nodes: NodeArena<Node>,
    /// First root; root degrees strictly increase along `sibling`
    head: Option<NodeKey>,
    /// Identity that ties [`NodeRef`]s to this heap
    id: u64,
}

impl Default for BinomialHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for BinomialHeap {
    /// The clone is a distinct heap: references into `self` do not resolve in it
    fn clone(&self) -> Self {
        BinomialHeap {
            nodes: self.nodes.clone(),
            head: self.head,
            id: next_heap_id(),
        }
    }
}

impl BinomialHeap {
    /// Creates a new empty heap
    pub fn new() -> Self {
        BinomialHeap {
            nodes: NodeArena::new(),
            head: None,
            id: next_heap_id(),
        }
    }

    /// Returns true if the heap has no roots
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the number of keys in the heap
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the key currently stored at `node`, if it resolves in this heap
    pub fn get(&self, node: NodeRef) -> Option<Key> {
        self.resolve(node).ok().map(|k| self.nodes[k].key)
    }

    /// Returns true if `node` resolves to a live node of this heap
    pub fn contains(&self, node: NodeRef) -> bool {
        self.resolve(node).is_ok()
    }

    /// Iterates over the root list as `(key, degree)`, head to tail
    pub fn roots(&self) -> Roots<'_> {
        Roots {
            heap: self,
            next: self.head,
        }
    }

    /// Combines two heaps into one, consuming both
    ///
    /// References into `a` stay valid in the result; references into `b`
    /// do not (re-resolve them with [`search`](Self::search)).
    pub fn union(mut a: BinomialHeap, b: BinomialHeap) -> BinomialHeap {
        a.merge(b);
        a
    }

    /// Merges another heap into this one, consuming the other heap
    ///
    /// **Time Complexity**: O(log n) for the root-list work, plus moving the
    /// other heap's nodes into this heap's arena.
    pub fn merge(&mut self, other: BinomialHeap) {
        let BinomialHeap { nodes, head, .. } = other;
        let moved = self.nodes.absorb(nodes);
        let other_head = head.and_then(|h| moved.get(h).copied());
        self.head = self.union_root_lists(self.head, other_head);
    }

    /// Inserts a key, returning a reference to its node
    ///
    /// **Time Complexity**: O(log n) worst-case, O(1) amortized over a run of
    /// inserts (the carry chain of a binary counter).
    pub fn insert(&mut self, key: Key) -> NodeRef {
        let node = self.nodes.insert(Node::new(key));
        self.head = self.union_root_lists(self.head, Some(node));
        self.handle(node)
    }

    /// Returns the smallest key without removing it
    ///
    /// **Time Complexity**: O(log n), a scan over the roots.
    pub fn minimum(&self) -> Option<Key> {
        self.min_root().map(|(_, min)| self.nodes[min].key)
    }

    /// Removes and returns the smallest key
    ///
    /// **Time Complexity**: O(log n)
    ///
    /// **Algorithm**:
    /// 1. Find the minimum root and unlink it from the root list
    /// 2. Its children Bₖ₋₁..B₀ are stored in decreasing degree order;
    ///    reversing them yields a valid root list
    /// 3. Union that list with the remaining roots
    pub fn extract_minimum(&mut self) -> Result<Key, HeapError> {
        let (prev, min) = self.min_root().ok_or(HeapError::EmptyHeap)?;
        Ok(self.remove_root(prev, min))
    }

    /// Lowers the key stored at `node` to `new_key`
    ///
    /// A `new_key` equal to the current key is accepted and changes nothing.
    ///
    /// **Time Complexity**: O(log n), bounded by the tree height.
    ///
    /// # Errors
    /// - [`HeapError::NodeNotFound`] if `node` does not resolve in this heap
    /// - [`HeapError::InvalidKeyIncrease`] if `new_key` is greater than the
    ///   current key; the heap is left untouched
    pub fn decrease_key(&mut self, node: NodeRef, new_key: Key) -> Result<(), HeapError> {
        let slot = self.resolve(node)?;
        if new_key > self.nodes[slot].key {
            return Err(HeapError::InvalidKeyIncrease);
        }
        self.nodes[slot].key = new_key;
        self.bubble_up(slot, false);
        Ok(())
    }

    /// Removes the key stored at `node`, returning it
    ///
    /// Equivalent to decreasing the key to minus infinity and extracting the
    /// minimum: the key is carried to the root of its tree and that root is
    /// removed. No sentinel key is written, so a genuine `i64::MIN` elsewhere
    /// in the heap is never taken in its place.
    ///
    /// **Time Complexity**: O(log n)
    ///
    /// # Errors
    /// [`HeapError::NodeNotFound`] if `node` does not resolve in this heap.
    pub fn delete(&mut self, node: NodeRef) -> Result<Key, HeapError> {
        let slot = self.resolve(node)?;
        let root = self.bubble_up(slot, true);
        let prev = self.root_predecessor(root);
        Ok(self.remove_root(prev, root))
    }

    /// Finds a node holding `key`
    ///
    /// Depth-first over the forest in root-list order: a node is checked
    /// before its children, and its children before its later siblings.
    ///
    /// **Time Complexity**: O(n)
    pub fn search(&self, key: Key) -> Option<NodeRef> {
        let mut stack: Worklist<NodeKey> = self.head.into_iter().collect();
        while let Some(n) = stack.pop() {
            let node = &self.nodes[n];
            if node.key == key {
                return Some(self.handle(n));
            }
            // Sibling first so the child subtree is popped before it
            stack.extend(node.sibling);
            stack.extend(node.child);
        }
        None
    }

    /// Checks every structural invariant of the forest
    ///
    /// - roots have no parent and strictly increasing degrees
    /// - a degree-d node has children of degrees d-1, ..., 0 in that order,
    ///   each pointing back at it as parent
    /// - a tree of root degree d has exactly 2ᵈ nodes
    /// - keys never decrease from parent to child
    /// - the trees account for every node in the arena
    pub fn verify_internal_structure(&self) -> bool {
        let mut count = 0;
        let mut last_degree: Option<usize> = None;
        let mut root = self.head;

        while let Some(r) = root {
            let Some(node) = self.nodes.get(r) else {
                return false;
            };
            if node.parent.is_some() || last_degree.is_some_and(|d| d >= node.degree) {
                return false;
            }
            match self.verify_tree(r) {
                Some(size) => count += size,
                None => return false,
            }
            if count > self.nodes.len() {
                return false;
            }
            last_degree = Some(node.degree);
            root = node.sibling;
        }

        count == self.nodes.len()
    }

    /// Verifies one tree, returning its node count
    fn verify_tree(&self, root: NodeKey) -> Option<usize> {
        let mut size = 0;
        let mut stack: Worklist<NodeKey> = smallvec![root];

        while let Some(n) = stack.pop() {
            size += 1;
            if size > self.nodes.len() {
                return None; // cycle
            }
            let node = self.nodes.get(n)?;
            let mut expected = node.degree;
            let mut child = node.child;
            while let Some(c) = child {
                let child_node = self.nodes.get(c)?;
                if expected == 0
                    || child_node.degree != expected - 1
                    || child_node.parent != Some(n)
                    || child_node.key < node.key
                {
                    return None;
                }
                expected -= 1;
                stack.push(c);
                child = child_node.sibling;
            }
            if expected != 0 {
                return None;
            }
        }

        let degree = u32::try_from(self.nodes.get(root)?.degree).ok()?;
        (size == 1usize.checked_shl(degree)?).then_some(size)
    }

    fn handle(&self, key: NodeKey) -> NodeRef {
        NodeRef { heap: self.id, key }
    }

    fn resolve(&self, node: NodeRef) -> Result<NodeKey, HeapError> {
        if node.heap == self.id && self.nodes.contains(node.key) {
            Ok(node.key)
        } else {
            Err(HeapError::NodeNotFound)
        }
    }

    /// Finds the minimum root and its predecessor in the root list
    ///
    /// On equal keys the earliest root wins.
    fn min_root(&self) -> Option<(Option<NodeKey>, NodeKey)> {
        let mut best = (None, self.head?);
        let mut prev = best.1;
        let mut cur = self.nodes[prev].sibling;

        while let Some(c) = cur {
            if self.nodes[c].key < self.nodes[best.1].key {
                best = (Some(prev), c);
            }
            prev = c;
            cur = self.nodes[c].sibling;
        }
        Some(best)
    }

    fn root_predecessor(&self, root: NodeKey) -> Option<NodeKey> {
        let mut cur = self.head;
        while let Some(c) = cur {
            let next = self.nodes[c].sibling;
            if next == Some(root) {
                return Some(c);
            }
            cur = next;
        }
        None
    }

    /// Unlinks a root, releases it, and unions its children back in
    fn remove_root(&mut self, prev: Option<NodeKey>, root: NodeKey) -> Key {
        let removed = self.nodes[root];
        match prev {
            Some(p) => self.nodes[p].sibling = removed.sibling,
            None => self.head = removed.sibling,
        }
        self.nodes.remove(root);

        let mut reversed = None;
        let mut cur = removed.child;
        while let Some(c) = cur {
            let child = &mut self.nodes[c];
            cur = child.sibling;
            child.parent = None;
            child.sibling = reversed;
            reversed = Some(c);
        }

        self.head = self.union_root_lists(self.head, reversed);
        removed.key
    }

    /// Moves the key at `start` toward the root, returning where it stopped
    ///
    /// With `to_root` unset this stops as soon as the parent's key is not
    /// larger; with it set the key is carried all the way to the root.
    ///
    /// **Note**: keys are swapped, nodes stay in place, so the tree shape
    /// never changes.
    fn bubble_up(&mut self, start: NodeKey, to_root: bool) -> NodeKey {
        let mut current = start;
        while let Some(parent) = self.nodes[current].parent {
            let moving = self.nodes[current].key;
            if !to_root && moving >= self.nodes[parent].key {
                break;
            }
            self.nodes[current].key = self.nodes[parent].key;
            self.nodes[parent].key = moving;
            current = parent;
        }
        current
    }

    /// Unions two root lists of this arena, returning the new head
    fn union_root_lists(&mut self, a: Option<NodeKey>, b: Option<NodeKey>) -> Option<NodeKey> {
        let merged = self.merge_root_lists(a, b);
        self.consolidate(merged)
    }

    /// Merges two degree-sorted root lists into one, without linking
    ///
    /// On equal degrees the root from `a` goes first.
    fn merge_root_lists(
        &mut self,
        mut a: Option<NodeKey>,
        mut b: Option<NodeKey>,
    ) -> Option<NodeKey> {
        let mut head = None;
        let mut tail: Option<NodeKey> = None;

        loop {
            let next = match (a, b) {
                (Some(x), Some(y)) => {
                    if self.nodes[x].degree <= self.nodes[y].degree {
                        a = self.nodes[x].sibling;
                        x
                    } else {
                        b = self.nodes[y].sibling;
                        y
                    }
                }
                (rest, None) | (None, rest) => {
                    match tail {
                        Some(t) => self.nodes[t].sibling = rest,
                        None => head = rest,
                    }
                    return head;
                }
            };
            match tail {
                Some(t) => self.nodes[t].sibling = Some(next),
                None => head = Some(next),
            }
            tail = Some(next);
        }
    }

    /// Links equal-degree roots until every degree appears at most once
    ///
    /// **Algorithm**: slide a window over the list. With `x` the current root:
    /// - if `next` has another degree, or the root after `next` shares the
    ///   degree too (three pending), advance
    /// - otherwise link `x` and `next`, keeping the smaller key on top; the
    ///   result stays at the window position and may link again
    fn consolidate(&mut self, head: Option<NodeKey>) -> Option<NodeKey> {
        let mut x = head?;
        let mut head = x;
        let mut prev: Option<NodeKey> = None;

        while let Some(next) = self.nodes[x].sibling {
            let degree = self.nodes[x].degree;
            let after = self.nodes[next].sibling;
            let three_pending = after.is_some_and(|a| self.nodes[a].degree == degree);

            if self.nodes[next].degree != degree || three_pending {
                prev = Some(x);
                x = next;
            } else if self.nodes[x].key <= self.nodes[next].key {
                self.nodes[x].sibling = after;
                self.link(next, x);
            } else {
                match prev {
                    Some(p) => self.nodes[p].sibling = Some(next),
                    None => head = next,
                }
                self.link(x, next);
                x = next;
            }
        }
        Some(head)
    }

    /// Makes `child` the first child of `parent`; both roots of degree k
    fn link(&mut self, child: NodeKey, parent: NodeKey) {
        let first = self.nodes[parent].child;

        let c = &mut self.nodes[child];
        c.parent = Some(parent);
        c.sibling = first;

        let p = &mut self.nodes[parent];
        p.child = Some(child);
        p.degree += 1;
    }
}

/// Iterator over the root list, see [`BinomialHeap::roots`]
#[derive(Clone)]
pub struct Roots<'a> {
    heap: &'a BinomialHeap,
    next: Option<NodeKey>,
}

impl Iterator for Roots<'_> {
    type Item = (Key, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.heap.nodes[self.next?];
        self.next = node.sibling;
        Some((node.key, node.degree))
    }
}

impl FusedIterator for Roots<'_> {}

impl FromIterator<Key> for BinomialHeap {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut heap = BinomialHeap::new();
        heap.extend(iter);
        heap
    }
}

impl Extend<Key> for BinomialHeap {
    fn extend<I: IntoIterator<Item = Key>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

/// Renders each tree with two spaces of indentation per level:
///
/// ```text
/// == Binomial Heap ==
/// [root d=0] (3,d=0)
/// [root d=1] (1,d=1)
///   (2,d=0)
/// ========
/// ```
impl fmt::Display for BinomialHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== Binomial Heap ==")?;

        let mut root = self.head;
        while let Some(r) = root {
            write!(f, "[root d={}] ", self.nodes[r].degree)?;

            let mut stack: Worklist<(NodeKey, usize)> = smallvec![(r, 0)];
            while let Some((n, depth)) = stack.pop() {
                let node = &self.nodes[n];
                writeln!(
                    f,
                    "{:indent$}({},d={})",
                    "",
                    node.key,
                    node.degree,
                    indent = depth * 2
                )?;
                // A root's sibling is the next tree, printed on its own line
                if n != r {
                    stack.extend(node.sibling.map(|s| (s, depth)));
                }
                stack.extend(node.child.map(|c| (c, depth + 1)));
            }

            root = self.nodes[r].sibling;
        }

        writeln!(f, "========")
    }
}
