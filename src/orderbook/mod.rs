//! Order book module for the rank book.
//!
//! ## Architecture
//!
//! Resting orders live in a randomized order-statistics tree (a treap):
//!
//! - **Slab-based storage**: nodes addressed by `usize` key, no `Box` chains
//! - **Price-time priority**: in-order traversal = best first
//! - **Subtree sizes**: rank lookups and rank removals in O(log n) expected
//!
//! ## Components
//!
//! - [`TreeNode`]: `Order` plus child links, balancing priority and subtree size
//! - [`OrderTree`]: the treap itself
//! - [`OrderBook`]: one-sided book with sequence assignment and matching
//!
//! ## Performance
//!
//! | Operation | Complexity (expected) |
//! |-----------|------------|
//! | Add order | O(log n) |
//! | Cancel at rank | O(log n) |
//! | Cancel by key | O(log n) |
//! | Order at rank | O(log n) |
//! | Market sweep | O(k log n) for k orders touched |
//!
//! ## Example
//!
//! ```
//! use rankbook::orderbook::OrderBook;
//!
//! let mut book = OrderBook::with_seed(0xDEAD_BEEF);
//! book.add(10, 5);
//! book.cancel_at_rank(0);
//!
//! assert_eq!(book.execute_market_buy(1), 0);
//! ```

pub mod book;
pub mod error;
pub mod node;
pub mod tree;

pub use book::OrderBook;
pub use error::{BookError, InvariantViolation};
pub use node::TreeNode;
pub use tree::{OrderTree, DEFAULT_SEED};
