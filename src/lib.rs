//! # rankbook
//!
//! Price-time priority order book on a randomized order-statistics tree.
//!
//! ## Architecture
//!
//! - **Types**: Core data structures (Order, PriorityKey, Fill, Execution)
//! - **OrderBook**: treap with slab-based node storage, plus the one-sided
//!   book that assigns sequence numbers and sweeps market orders
//! - **Driver**: replays a `+`/`-`/`=` command stream and reports the cost
//!   of a closing market buy
//!
//! ## Design Principles
//!
//! 1. **Determinism**: balancing priorities come from a seeded PRNG owned by
//!    the book, so identical inputs give identical trees
//! 2. **Integer math**: prices are `i64` and may be negative, sizes `u64`,
//!    costs `i128`
//! 3. **No-op on bad input**: out-of-range ranks and malformed records
//!    change nothing
//! 4. **Single writer**: one book, one thread, commands in arrival order
//!
//! ## Example
//!
//! ```
//! use rankbook::OrderBook;
//!
//! let mut book = OrderBook::new();
//! book.add(5, 2);
//! book.add(3, 10);
//!
//! assert_eq!(book.execute_market_buy(5), 15);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, PriorityKey, Fill, Execution
pub mod types;

/// Order-statistics tree and the order book built on it
pub mod orderbook;

/// Command stream replay
pub mod driver;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use driver::{run, DriverConfig, RunReport};
pub use orderbook::{BookError, OrderBook, OrderTree};
pub use types::{Execution, Fill, Order, PriorityKey, Side};
