//! Randomized order-statistics tree (treap) over resting orders.
//!
//! ## Structure
//!
//! - **BST** on [`PriorityKey`]: in-order traversal is price-time priority
//! - **Max-heap** on a random `priority` drawn per node, which keeps the
//!   expected height at O(log n) whatever order keys arrive in
//! - **Subtree sizes** on every node, which turn rank lookups into a single
//!   root-to-leaf descent
//!
//! ## Memory Model
//!
//! Nodes live in a `Slab<TreeNode>` and link to each other by slab key.
//! Rotations, splits and merges rewrite links; nodes never move except when
//! a whole subtree is handed to another tree (`split_off` / `append`).
//!
//! ## Recursion
//!
//! Rank descent, key lookup and both removals are iterative. Insert, split
//! and merge recurse once per level, so their depth is the tree height.
//!
//! ## Example
//!
//! ```
//! use rankbook::orderbook::OrderTree;
//! use rankbook::types::{Order, Side};
//!
//! let mut tree = OrderTree::with_seed(7);
//! tree.insert(Order::new(0, Side::Sell, 12, 1)).unwrap();
//! tree.insert(Order::new(1, Side::Sell, 10, 1)).unwrap();
//! tree.insert(Order::new(2, Side::Sell, 10, 1)).unwrap();
//!
//! assert_eq!(tree.get_by_rank(0).map(|o| o.sequence), Some(1));
//! assert_eq!(tree.get_by_rank(2).map(|o| o.price()), Some(12));
//! assert!(tree.validate().is_ok());
//! ```

use std::cmp::Ordering;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slab::Slab;

use crate::orderbook::{BookError, InvariantViolation, TreeNode};
use crate::types::{Order, PriorityKey};

/// Seed used when the caller does not pick one
pub const DEFAULT_SEED: u64 = 0xDEAD_BEEF;

#[derive(Debug, Clone, Copy)]
enum Branch {
    Left,
    Right,
}

/// Treap of resting orders keyed by [`PriorityKey`].
#[derive(Debug, Clone)]
pub struct OrderTree {
    /// Node arena
    nodes: Slab<TreeNode>,

    /// Slab key of the root, `None` when empty
    root: Option<usize>,

    /// Source of balancing priorities
    rng: ChaCha8Rng,
}

impl Default for OrderTree {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderTree {
    /// Create an empty tree seeded with [`DEFAULT_SEED`]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create an empty tree whose priorities come from `seed`
    ///
    /// Two trees built from the same seed and the same insert/remove
    /// sequence have identical shapes.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_capacity(0, seed)
    }

    /// Create an empty tree with room for `capacity` nodes
    pub fn with_capacity(capacity: usize, seed: u64) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            root: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    // ========================================================================
    // Size
    // ========================================================================

    /// Number of resting orders
    #[inline]
    pub fn len(&self) -> usize {
        self.size_of(self.root)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Pre-allocated node slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Drop every order. The priority stream is not rewound.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    // ========================================================================
    // Key Operations
    // ========================================================================

    /// Insert a resting order.
    ///
    /// The order is placed by BST descent on its key, then rotated up while
    /// its fresh priority beats its parent's.
    ///
    /// # Errors
    ///
    /// - [`BookError::ZeroSize`] if `order.remaining == 0`
    /// - [`BookError::DuplicateKey`] if the key already rests in the tree
    pub fn insert(&mut self, order: Order) -> Result<(), BookError> {
        if order.is_filled() {
            return Err(BookError::ZeroSize { price: order.price() });
        }
        let key = order.key();
        if self.find(&key).is_some() {
            return Err(BookError::DuplicateKey(key));
        }

        let priority = self.rng.gen();
        let new = self.nodes.insert(TreeNode::new(order, priority));
        let root = self.root;
        self.root = Some(self.insert_at(root, new));
        Ok(())
    }

    /// Look up a resting order by key
    pub fn get(&self, key: &PriorityKey) -> Option<&Order> {
        self.find(key).map(|slot| &self.nodes[slot].order)
    }

    #[inline]
    pub fn contains(&self, key: &PriorityKey) -> bool {
        self.find(key).is_some()
    }

    /// 0-based rank of a resting key, `None` if it is not in the tree
    pub fn rank_of(&self, key: &PriorityKey) -> Option<usize> {
        let mut link = self.root;
        let mut rank = 0;
        while let Some(current) = link {
            let node = &self.nodes[current];
            let left_size = self.size_of(node.left);
            match key.cmp(&node.key()) {
                Ordering::Less => link = node.left,
                Ordering::Equal => return Some(rank + left_size),
                Ordering::Greater => {
                    rank += left_size + 1;
                    link = node.right;
                }
            }
        }
        None
    }

    /// Remove a resting order by key. No-op when the key is absent.
    pub fn remove_by_key(&mut self, key: &PriorityKey) -> Option<Order> {
        let rank = self.rank_of(key)?;
        self.remove_by_rank(rank)
    }

    // ========================================================================
    // Rank Operations
    // ========================================================================

    /// Order at 0-based `rank` (0 = best), `None` if `rank >= len()`
    pub fn get_by_rank(&self, rank: usize) -> Option<&Order> {
        self.locate(rank).map(|slot| &self.nodes[slot].order)
    }

    /// Mutable access for consuming residual size in place.
    ///
    /// Callers must not touch the fields that make up the key.
    pub(crate) fn get_by_rank_mut(&mut self, rank: usize) -> Option<&mut Order> {
        let slot = self.locate(rank)?;
        Some(&mut self.nodes[slot].order)
    }

    /// Best order (rank 0)
    #[inline]
    pub fn first(&self) -> Option<&Order> {
        self.get_by_rank(0)
    }

    /// Worst order (rank `len - 1`)
    pub fn last(&self) -> Option<&Order> {
        self.len().checked_sub(1).and_then(|rank| self.get_by_rank(rank))
    }

    /// Remove the order at 0-based `rank`. No-op when out of range.
    ///
    /// Every ancestor on the way down loses exactly one descendant, so sizes
    /// are fixed during the descent and the located node is replaced by the
    /// merge of its children.
    pub fn remove_by_rank(&mut self, rank: usize) -> Option<Order> {
        if rank >= self.len() {
            return None;
        }

        let mut rank = rank;
        let mut parent: Option<(usize, Branch)> = None;
        let mut link = self.root;

        while let Some(current) = link {
            let (left, right) = (self.nodes[current].left, self.nodes[current].right);
            let left_size = self.size_of(left);

            match rank.cmp(&left_size) {
                Ordering::Less => {
                    self.nodes[current].size -= 1;
                    parent = Some((current, Branch::Left));
                    link = left;
                }
                Ordering::Equal => {
                    let merged = self.merge(left, right);
                    match parent {
                        None => self.root = merged,
                        Some((above, Branch::Left)) => self.nodes[above].left = merged,
                        Some((above, Branch::Right)) => self.nodes[above].right = merged,
                    }
                    return Some(self.nodes.remove(current).order);
                }
                Ordering::Greater => {
                    self.nodes[current].size -= 1;
                    rank -= left_size + 1;
                    parent = Some((current, Branch::Right));
                    link = right;
                }
            }
        }

        None
    }

    /// Remove and return the best order
    #[inline]
    pub fn pop_first(&mut self) -> Option<Order> {
        self.remove_by_rank(0)
    }

    // ========================================================================
    // Split / Merge
    // ========================================================================

    /// Move every order ranking strictly behind `key` into a new tree.
    ///
    /// `self` keeps the keys `<= key`. The returned tree draws its future
    /// priorities from a seed taken from this tree's stream.
    pub fn split_off(&mut self, key: &PriorityKey) -> OrderTree {
        let root = self.root;
        let (keep, detach) = self.split_at(root, key);
        self.root = keep;

        let mut other = OrderTree::with_seed(self.rng.gen());
        other.root = self.transplant(detach, &mut other.nodes);
        other
    }

    /// Move every order of `other` to the back of this tree.
    ///
    /// # Errors
    ///
    /// [`BookError::Overlap`] unless every key here precedes every key in
    /// `other`. Neither tree is modified in that case.
    pub fn append(&mut self, mut other: OrderTree) -> Result<(), BookError> {
        if let (Some(last), Some(first)) = (self.last(), other.first()) {
            let (left, right) = (last.key(), first.key());
            if left >= right {
                return Err(BookError::Overlap { left, right });
            }
        }

        let incoming = other.root.take();
        let moved = other.transplant(incoming, &mut self.nodes);
        let root = self.root;
        self.root = self.merge(root, moved);
        Ok(())
    }

    // ========================================================================
    // Traversal and Diagnostics
    // ========================================================================

    /// In-order (best-first) iterator over resting orders
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn height(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(usize, usize)> = self.root.map(|root| (root, 1)).into_iter().collect();

        while let Some((current, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[current];
            for child in [node.left, node.right].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }

        deepest
    }

    /// Check every structural invariant.
    ///
    /// - cached sizes match `1 + size(left) + size(right)`
    /// - no child's priority exceeds its parent's
    /// - in-order keys are strictly increasing
    /// - no resting order has zero size
    /// - every stored node is reachable from the root
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let stored = self.nodes.len();
        let mut reachable = 0;
        let mut stack: Vec<usize> = self.root.into_iter().collect();

        while let Some(current) = stack.pop() {
            reachable += 1;
            if reachable > stored {
                return Err(InvariantViolation::Orphaned { reachable, stored });
            }

            let node = &self.nodes[current];
            let actual = 1 + self.size_of(node.left) + self.size_of(node.right);
            if node.size != actual {
                return Err(InvariantViolation::SizeMismatch {
                    sequence: node.order.sequence,
                    cached: node.size,
                    actual,
                });
            }
            if node.order.is_filled() {
                return Err(InvariantViolation::EmptyOrder {
                    sequence: node.order.sequence,
                });
            }

            for child in [node.left, node.right].into_iter().flatten() {
                let below = &self.nodes[child];
                if below.priority > node.priority {
                    return Err(InvariantViolation::HeapOrder {
                        parent: node.order.sequence,
                        child: below.order.sequence,
                    });
                }
                stack.push(child);
            }
        }

        if reachable != stored {
            return Err(InvariantViolation::Orphaned { reachable, stored });
        }

        let mut previous: Option<PriorityKey> = None;
        for order in self.iter() {
            let next = order.key();
            if let Some(previous) = previous {
                if previous >= next {
                    return Err(InvariantViolation::KeyOrder { previous, next });
                }
            }
            previous = Some(next);
        }

        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    #[inline]
    fn size_of(&self, link: Option<usize>) -> usize {
        link.map_or(0, |slot| self.nodes[slot].size)
    }

    #[inline]
    fn update(&mut self, slot: usize) {
        let node = &self.nodes[slot];
        let size = 1 + self.size_of(node.left) + self.size_of(node.right);
        self.nodes[slot].size = size;
    }

    fn find(&self, key: &PriorityKey) -> Option<usize> {
        let mut link = self.root;
        while let Some(current) = link {
            let node = &self.nodes[current];
            match key.cmp(&node.key()) {
                Ordering::Less => link = node.left,
                Ordering::Equal => return Some(current),
                Ordering::Greater => link = node.right,
            }
        }
        None
    }

    fn locate(&self, rank: usize) -> Option<usize> {
        let mut rank = rank;
        let mut link = self.root;
        while let Some(current) = link {
            let node = &self.nodes[current];
            let left_size = self.size_of(node.left);
            match rank.cmp(&left_size) {
                Ordering::Less => link = node.left,
                Ordering::Equal => return Some(current),
                Ordering::Greater => {
                    rank -= left_size + 1;
                    link = node.right;
                }
            }
        }
        None
    }

    /// ```text
    ///       y            x
    ///      / \          / \
    ///     x   c  ==>   a   y
    ///    / \              / \
    ///   a   b            b   c
    /// ```
    fn rotate_right(&mut self, y: usize) -> usize {
        let Some(x) = self.nodes[y].left else {
            return y;
        };
        self.nodes[y].left = self.nodes[x].right;
        self.nodes[x].right = Some(y);
        self.update(y);
        self.update(x);
        x
    }

    fn rotate_left(&mut self, x: usize) -> usize {
        let Some(y) = self.nodes[x].right else {
            return x;
        };
        self.nodes[x].right = self.nodes[y].left;
        self.nodes[y].left = Some(x);
        self.update(x);
        self.update(y);
        y
    }

    /// Insert the detached node `new` under `link`, returning the new subtree root
    fn insert_at(&mut self, link: Option<usize>, new: usize) -> usize {
        let Some(root) = link else {
            return new;
        };

        if self.nodes[new].key() < self.nodes[root].key() {
            let left = self.nodes[root].left;
            let child = self.insert_at(left, new);
            self.nodes[root].left = Some(child);
            if self.nodes[child].priority > self.nodes[root].priority {
                return self.rotate_right(root);
            }
        } else {
            let right = self.nodes[root].right;
            let child = self.insert_at(right, new);
            self.nodes[root].right = Some(child);
            if self.nodes[child].priority > self.nodes[root].priority {
                return self.rotate_left(root);
            }
        }

        self.update(root);
        root
    }

    /// Partition `link` into (keys <= key, keys > key)
    fn split_at(
        &mut self,
        link: Option<usize>,
        key: &PriorityKey,
    ) -> (Option<usize>, Option<usize>) {
        let Some(root) = link else {
            return (None, None);
        };

        if self.nodes[root].key() <= *key {
            let right = self.nodes[root].right;
            let (low, high) = self.split_at(right, key);
            self.nodes[root].right = low;
            self.update(root);
            (Some(root), high)
        } else {
            let left = self.nodes[root].left;
            let (low, high) = self.split_at(left, key);
            self.nodes[root].left = high;
            self.update(root);
            (low, Some(root))
        }
    }

    /// Join two subtrees where every key in `left` precedes every key in `right`
    fn merge(&mut self, left: Option<usize>, right: Option<usize>) -> Option<usize> {
        let (l, r) = match (left, right) {
            (None, other) | (other, None) => return other,
            (Some(l), Some(r)) => (l, r),
        };

        if self.nodes[l].priority > self.nodes[r].priority {
            let inner = self.nodes[l].right;
            let merged = self.merge(inner, Some(r));
            self.nodes[l].right = merged;
            self.update(l);
            Some(l)
        } else {
            let inner = self.nodes[r].left;
            let merged = self.merge(Some(l), inner);
            self.nodes[r].left = merged;
            self.update(r);
            Some(r)
        }
    }

    /// Move the subtree at `link` out of this arena into `into`
    fn transplant(&mut self, link: Option<usize>, into: &mut Slab<TreeNode>) -> Option<usize> {
        let mut node = self.nodes.remove(link?);
        node.left = self.transplant(node.left, into);
        node.right = self.transplant(node.right, into);
        Some(into.insert(node))
    }
}

// ============================================================================
// Iterator
// ============================================================================

/// Best-first iterator returned by [`OrderTree::iter`]
#[derive(Debug)]
pub struct Iter<'a> {
    nodes: &'a Slab<TreeNode>,
    stack: Vec<usize>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    fn new(tree: &'a OrderTree) -> Self {
        let mut iter = Self {
            nodes: &tree.nodes,
            stack: Vec::new(),
            remaining: tree.len(),
        };
        iter.descend_left(tree.root);
        iter
    }

    fn descend_left(&mut self, mut link: Option<usize>) {
        while let Some(current) = link {
            self.stack.push(current);
            link = self.nodes[current].left;
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Order;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let nodes: &'a Slab<TreeNode> = self.nodes;
        let node = &nodes[current];
        self.descend_left(node.right);
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.order)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a OrderTree {
    type Item = &'a Order;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    fn ask(sequence: u64, price: i64, size: u64) -> Order {
        Order::new(sequence, Side::Sell, price, size)
    }

    fn keys(tree: &OrderTree) -> Vec<(i64, u64)> {
        tree.iter().map(|o| (o.price(), o.sequence)).collect()
    }

    fn build(prices: &[i64]) -> OrderTree {
        let mut tree = OrderTree::with_seed(42);
        for (sequence, &price) in prices.iter().enumerate() {
            tree.insert(ask(sequence as u64, price, 1)).unwrap();
        }
        tree
    }

    #[test]
    fn test_tree_new() {
        let tree = OrderTree::new();

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert!(tree.first().is_none());
        assert!(tree.last().is_none());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_tree_with_capacity() {
        let tree = OrderTree::with_capacity(1_000, 1);
        assert!(tree.capacity() >= 1_000);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_insert_orders_by_price_then_sequence() {
        let tree = build(&[30, 10, 20, 10, 30]);

        assert_eq!(tree.len(), 5);
        assert_eq!(keys(&tree), vec![(10, 1), (10, 3), (20, 2), (30, 0), (30, 4)]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_insert_rejects_zero_size() {
        let mut tree = OrderTree::new();
        let result = tree.insert(ask(0, 10, 0));

        assert_eq!(result, Err(BookError::ZeroSize { price: 10 }));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_insert_rejects_duplicate_key() {
        let mut tree = OrderTree::new();
        tree.insert(ask(0, 10, 5)).unwrap();

        let result = tree.insert(ask(0, 10, 7));
        assert_eq!(
            result,
            Err(BookError::DuplicateKey(PriorityKey::new(Side::Sell, 10, 0)))
        );
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.first().map(|o| o.remaining), Some(5));
    }

    #[test]
    fn test_negative_prices_rank_first() {
        let tree = build(&[3, -2, 0, -7, -2]);

        assert_eq!(keys(&tree), vec![(-7, 3), (-2, 1), (-2, 4), (0, 2), (3, 0)]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_get_by_rank() {
        let tree = build(&[50, 40, 30, 20, 10]);

        for rank in 0..5 {
            let order = tree.get_by_rank(rank).unwrap();
            assert_eq!(order.price(), 10 * (rank as i64 + 1));
        }
        assert!(tree.get_by_rank(5).is_none());
        assert!(tree.get_by_rank(usize::MAX).is_none());
        assert_eq!(tree.last().map(|o| o.price()), Some(50));
    }

    #[test]
    fn test_rank_of() {
        let tree = build(&[50, 40, 30, 20, 10]);

        assert_eq!(tree.rank_of(&PriorityKey::new(Side::Sell, 10, 4)), Some(0));
        assert_eq!(tree.rank_of(&PriorityKey::new(Side::Sell, 30, 2)), Some(2));
        assert_eq!(tree.rank_of(&PriorityKey::new(Side::Sell, 50, 0)), Some(4));
        assert_eq!(tree.rank_of(&PriorityKey::new(Side::Sell, 30, 9)), None);
    }

    #[test]
    fn test_remove_by_rank_middle() {
        let mut tree = build(&[10, 20, 30, 40]);

        let removed = tree.remove_by_rank(2).unwrap();
        assert_eq!(removed.price(), 30);
        assert_eq!(tree.len(), 3);
        assert_eq!(keys(&tree), vec![(10, 0), (20, 1), (40, 3)]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_remove_by_rank_out_of_range_is_noop() {
        let mut tree = build(&[10, 20]);

        assert!(tree.remove_by_rank(2).is_none());
        assert!(tree.remove_by_rank(usize::MAX).is_none());
        assert_eq!(tree.len(), 2);

        let mut empty = OrderTree::new();
        assert!(empty.remove_by_rank(0).is_none());
        assert!(empty.validate().is_ok());
    }

    #[test]
    fn test_remove_by_key() {
        let mut tree = build(&[10, 10, 10]);
        let key = PriorityKey::new(Side::Sell, 10, 1);

        let removed = tree.remove_by_key(&key).unwrap();
        assert_eq!(removed.sequence, 1);
        assert!(!tree.contains(&key));
        assert_eq!(keys(&tree), vec![(10, 0), (10, 2)]);

        // Absent key is a no-op
        assert!(tree.remove_by_key(&key).is_none());
        assert_eq!(tree.len(), 2);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_drain_round_trip() {
        let prices = [7, 3, 9, 3, -1, 7, 7, 2, 9, -5, -1, 8];
        let mut tree = build(&prices);

        let mut expected: Vec<(i64, u64)> = prices
            .iter()
            .enumerate()
            .map(|(sequence, &price)| (price, sequence as u64))
            .collect();
        expected.sort();

        let mut drained = Vec::new();
        while let Some(order) = tree.pop_first() {
            drained.push((order.price(), order.sequence));
            assert!(tree.validate().is_ok());
        }

        assert_eq!(drained, expected);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_get_by_rank_mut_updates_in_place() {
        let mut tree = build(&[10, 20]);

        let best = tree.get_by_rank_mut(0).unwrap();
        assert_eq!(best.fill(1), 1);
        assert!(best.is_filled());

        // A zero-size node must not stay in the tree
        assert!(tree.validate().is_err());
        tree.remove_by_rank(0);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_split_off_and_append() {
        let mut tree = build(&[10, 20, 30, 40, 50, 60]);
        let pivot = PriorityKey::new(Side::Sell, 30, 2);

        let high = tree.split_off(&pivot);
        assert_eq!(keys(&tree), vec![(10, 0), (20, 1), (30, 2)]);
        assert_eq!(keys(&high), vec![(40, 3), (50, 4), (60, 5)]);
        assert!(tree.validate().is_ok());
        assert!(high.validate().is_ok());

        tree.append(high).unwrap();
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.last().map(|o| o.price()), Some(60));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_split_off_at_extremes() {
        let mut tree = build(&[10, 20, 30]);

        let none = tree.split_off(&PriorityKey::new(Side::Sell, 99, 0));
        assert!(none.is_empty());
        assert_eq!(tree.len(), 3);

        let all = tree.split_off(&PriorityKey::new(Side::Sell, 0, 0));
        assert!(tree.is_empty());
        assert_eq!(all.len(), 3);
        assert!(tree.validate().is_ok());
        assert!(all.validate().is_ok());
    }

    #[test]
    fn test_append_rejects_overlap() {
        let mut low = build(&[10, 20]);
        let mut high = OrderTree::with_seed(1);
        high.insert(ask(9, 15, 1)).unwrap();

        let result = low.append(high);
        assert!(matches!(result, Err(BookError::Overlap { .. })));
        assert_eq!(low.len(), 2);
    }

    #[test]
    fn test_iter_is_exact_size() {
        let tree = build(&[3, 1, 2]);
        let iter = tree.iter();

        assert_eq!(iter.len(), 3);
        let prices: Vec<i64> = (&tree).into_iter().map(|o| o.price()).collect();
        assert_eq!(prices, vec![1, 2, 3]);
    }

    #[test]
    fn test_height_stays_logarithmic_for_monotonic_keys() {
        // Sequence numbers always increase and prices here do too: the worst
        // case for an unbalanced BST.
        let n = 10_000;
        let mut tree = OrderTree::with_seed(0xDEAD_BEEF);
        for i in 0..n {
            tree.insert(ask(i, i as i64, 1)).unwrap();
        }

        let bound = 4 * (n as f64).log2().ceil() as usize;
        assert!(tree.height() <= bound, "height {} exceeds {}", tree.height(), bound);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_same_seed_same_shape() {
        let a = build(&[5, 1, 4, 1, 5, 9, 2, 6]);
        let b = build(&[5, 1, 4, 1, 5, 9, 2, 6]);

        assert_eq!(a.height(), b.height());
        assert_eq!(a.root.map(|r| a.nodes[r].key()), b.root.map(|r| b.nodes[r].key()));
    }

    #[test]
    fn test_validate_detects_size_drift() {
        let mut tree = build(&[10, 20, 30]);
        let root = tree.root.unwrap();
        tree.nodes[root].size += 1;

        assert!(matches!(
            tree.validate(),
            Err(InvariantViolation::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_detects_heap_violation() {
        let mut tree = build(&[10, 20, 30, 40]);
        let root = tree.root.unwrap();
        let child = tree.nodes[root].left.or(tree.nodes[root].right).unwrap();
        tree.nodes[child].priority = u64::MAX;
        tree.nodes[root].priority = 0;

        assert!(matches!(
            tree.validate(),
            Err(InvariantViolation::HeapOrder { .. })
        ));
    }

    #[test]
    fn test_clear() {
        let mut tree = build(&[10, 20, 30]);
        tree.clear();

        assert!(tree.is_empty());
        assert!(tree.validate().is_ok());
        tree.insert(ask(10, 5, 1)).unwrap();
        assert_eq!(tree.len(), 1);
    }
}
