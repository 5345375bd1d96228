//! Tree node for slab-based storage.
//!
//! ## Design
//!
//! `TreeNode` wraps an `Order` with the bookkeeping the treap needs: child
//! links, a random balancing priority and the cached size of the subtree
//! rooted at this node.
//!
//! ## Slab Integration
//!
//! Per official slab docs (https://docs.rs/slab/0.4.11):
//! - Keys are `usize` values returned by `slab.insert()`
//! - Keys may be reused after `slab.remove()`
//! - O(1) insert, remove, and lookup
//!
//! Child links are slab keys, not references, so rotations only rewrite
//! two or three `Option<usize>` fields.

use crate::types::{Order, PriorityKey};

/// Treap node stored in the slab.
///
/// ## Memory Layout
///
/// ```text
/// TreeNode {
///     order: Order
///     priority: u64       (heap key, drawn at insert)
///     size: usize         (nodes in this subtree, self included)
///     left: Option<usize> (slab key)
///     right: Option<usize> (slab key)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// The resting order
    pub order: Order,

    /// Balancing priority. A parent's priority is never below its children's.
    pub priority: u64,

    /// Number of nodes in the subtree rooted here
    pub size: usize,

    /// Subtree of keys that rank ahead of this one
    pub left: Option<usize>,

    /// Subtree of keys that rank behind this one
    pub right: Option<usize>,
}

impl TreeNode {
    /// Create a detached leaf
    ///
    /// # Example
    ///
    /// ```
    /// use rankbook::orderbook::TreeNode;
    /// use rankbook::types::{Order, Side};
    ///
    /// let node = TreeNode::new(Order::new(0, Side::Sell, 10, 5), 42);
    ///
    /// assert!(node.is_leaf());
    /// assert_eq!(node.size, 1);
    /// ```
    #[inline]
    pub fn new(order: Order, priority: u64) -> Self {
        Self {
            order,
            priority,
            size: 1,
            left: None,
            right: None,
        }
    }

    /// The order's priority key
    #[inline]
    pub fn key(&self) -> PriorityKey {
        self.order.key()
    }

    /// Check if this node has no children
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}
