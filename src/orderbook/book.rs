//! One-sided order book over an [`OrderTree`].
//!
//! ## Price Ordering
//!
//! - **Sell book** (asks, the default): best = lowest price
//! - **Buy book** (bids): best = highest price
//!
//! Ties at a price level go to the earliest arrival. Arrival is the book's
//! own sequence counter, so priority follows the order in which `add` calls
//! are applied, never wall-clock time.
//!
//! ## Matching
//!
//! A market order sweeps from rank 0, taking `min(outstanding, remaining)`
//! from each best order at that order's price, removing orders it empties,
//! until the request is met or the book is empty. On a sell book this is a
//! market buy; on a buy book the same sweep is a market sell.
//!
//! ## Example
//!
//! ```
//! use rankbook::orderbook::OrderBook;
//!
//! let mut book = OrderBook::new();
//! book.add(10, 5);
//! book.add(10, 3);
//!
//! assert_eq!(book.execute_market_buy(4), 40);
//! assert_eq!(book.order_at_rank(0).map(|o| o.remaining), Some(1));
//! assert_eq!(book.order_at_rank(1).map(|o| o.remaining), Some(3));
//! ```

use sha2::{Digest, Sha256};
use tracing::{trace, warn};

use crate::orderbook::tree::{Iter, DEFAULT_SEED};
use crate::orderbook::{BookError, OrderTree};
use crate::types::{Execution, Fill, Order, PriorityKey, Side};

/// Price-time priority book for one side of a market.
#[derive(Debug, Clone)]
pub struct OrderBook {
    /// Side every resting order belongs to
    side: Side,

    /// Resting orders ranked best-first
    tree: OrderTree,

    /// Sequence number handed to the next accepted order
    next_sequence: u64,

    /// Sum of `remaining` over all resting orders
    resting_quantity: u128,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create an empty sell-side book with the default seed
    pub fn new() -> Self {
        Self::for_side(Side::Sell, DEFAULT_SEED)
    }

    /// Create an empty sell-side book whose tree priorities come from `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::for_side(Side::Sell, seed)
    }

    /// Create an empty book for `side`
    pub fn for_side(side: Side, seed: u64) -> Self {
        Self::with_capacity(side, 0, seed)
    }

    /// Create an empty book with room for `capacity` resting orders
    ///
    /// # Example
    ///
    /// ```
    /// use rankbook::orderbook::OrderBook;
    /// use rankbook::types::Side;
    ///
    /// let book = OrderBook::with_capacity(Side::Buy, 10_000, 1);
    /// assert!(book.capacity() >= 10_000);
    /// assert_eq!(book.side(), Side::Buy);
    /// ```
    pub fn with_capacity(side: Side, capacity: usize, seed: u64) -> Self {
        Self {
            side,
            tree: OrderTree::with_capacity(capacity, seed),
            next_sequence: 0,
            resting_quantity: 0,
        }
    }

    // ========================================================================
    // Size and Queries
    // ========================================================================

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of resting orders
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// Total unconsumed size across the book
    #[inline]
    pub fn total_quantity(&self) -> u128 {
        self.resting_quantity
    }

    /// Sequence number the next accepted order will receive
    #[inline]
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Best resting order (rank 0)
    #[inline]
    pub fn best(&self) -> Option<&Order> {
        self.tree.first()
    }

    /// Order at 0-based priority `rank`
    #[inline]
    pub fn order_at_rank(&self, rank: usize) -> Option<&Order> {
        self.tree.get_by_rank(rank)
    }

    /// Current rank of a resting order
    #[inline]
    pub fn rank_of(&self, key: &PriorityKey) -> Option<usize> {
        self.tree.rank_of(key)
    }

    /// Resting orders, best first
    pub fn orders(&self) -> Iter<'_> {
        self.tree.iter()
    }

    /// The underlying tree, for diagnostics
    pub fn tree(&self) -> &OrderTree {
        &self.tree
    }

    // ========================================================================
    // Order Entry
    // ========================================================================

    /// Rest a new order of `size` at `price`.
    ///
    /// A zero `size` is rejected as a no-op and logged at `warn`; use
    /// [`submit`](Self::submit) to observe the rejection.
    pub fn add(&mut self, price: i64, size: u64) {
        if let Err(err) = self.submit(price, size) {
            warn!(price, size, %err, "order rejected");
        }
    }

    /// Rest a new order and return the key it was filed under.
    ///
    /// # Errors
    ///
    /// [`BookError::ZeroSize`] when `size == 0`. The sequence counter does
    /// not advance for rejected orders.
    pub fn submit(&mut self, price: i64, size: u64) -> Result<PriorityKey, BookError> {
        if size == 0 {
            return Err(BookError::ZeroSize { price });
        }

        let order = Order::new(self.next_sequence, self.side, price, size);
        let key = order.key();
        self.tree.insert(order)?;

        self.next_sequence += 1;
        self.resting_quantity += size as u128;
        trace!(%key, size, "order resting");
        Ok(key)
    }

    // ========================================================================
    // Cancellation
    // ========================================================================

    /// Remove the order at 0-based priority `rank` (0 = best).
    ///
    /// Out-of-range ranks, including any rank on an empty book, are a no-op
    /// and return `None`.
    pub fn cancel_at_rank(&mut self, rank: usize) -> Option<Order> {
        let order = self.tree.remove_by_rank(rank);
        match &order {
            Some(order) => {
                self.resting_quantity -= order.remaining as u128;
                trace!(rank, key = %order.key(), "order cancelled");
            }
            None => trace!(rank, len = self.len(), "cancel rank out of range"),
        }
        order
    }

    /// Remove a resting order by key, `None` if it is not resting
    pub fn cancel(&mut self, key: &PriorityKey) -> Option<Order> {
        let order = self.tree.remove_by_key(key)?;
        self.resting_quantity -= order.remaining as u128;
        trace!(%key, "order cancelled");
        Some(order)
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Sweep `shares` from the best end of the book and return the cost.
    ///
    /// If the book runs out first the buy is partially filled and only the
    /// consumed cost is returned. Use [`execute_market`](Self::execute_market)
    /// when the filled quantity matters.
    pub fn execute_market_buy(&mut self, shares: u64) -> i128 {
        let mut cost: i128 = 0;
        let filled = self.sweep(shares, |fill| cost = cost.saturating_add(fill.notional()));

        trace!(requested = shares, filled, cost = %cost, "market order swept");
        cost
    }

    /// Sweep `shares` from the best end of the book, recording every fill.
    ///
    /// # Example
    ///
    /// ```
    /// use rankbook::orderbook::OrderBook;
    ///
    /// let mut book = OrderBook::new();
    /// book.add(5, 2);
    /// book.add(3, 10);
    ///
    /// let execution = book.execute_market(15);
    /// assert_eq!(execution.cost, 3 * 10 + 5 * 2);
    /// assert_eq!(execution.filled, 12);
    /// assert!(execution.is_partial());
    /// assert!(book.is_empty());
    /// ```
    pub fn execute_market(&mut self, shares: u64) -> Execution {
        let mut execution = Execution::new(shares);
        self.sweep(shares, |fill| execution.record(fill));

        trace!(
            requested = execution.requested,
            filled = execution.filled,
            cost = %execution.cost,
            fills = execution.fills.len(),
            "market order swept"
        );
        execution
    }

    /// Consume up to `shares` from rank 0 onwards, handing each slice to
    /// `on_fill`. Returns the quantity filled.
    fn sweep<F>(&mut self, shares: u64, mut on_fill: F) -> u64
    where
        F: FnMut(Fill),
    {
        let mut outstanding = shares;

        while outstanding > 0 {
            let Some(best) = self.tree.get_by_rank_mut(0) else {
                break;
            };
            let taken = best.fill(outstanding);
            let fill = Fill::new(best.sequence, best.price(), taken);
            let exhausted = best.is_filled();

            outstanding -= taken;
            self.resting_quantity -= taken as u128;
            if exhausted {
                self.tree.remove_by_rank(0);
            }
            on_fill(fill);
        }

        shares - outstanding
    }

    // ========================================================================
    // State Root
    // ========================================================================

    /// SHA-256 over the SSZ encoding of every resting order in rank order.
    ///
    /// Depends only on book contents, not on tree shape, so books fed the
    /// same commands agree whatever their seeds.
    pub fn state_root(&self) -> Result<[u8; 32], BookError> {
        let mut hasher = Sha256::new();
        for order in self.tree.iter() {
            let bytes = ssz_rs::serialize(order).map_err(|err| BookError::Encoding {
                sequence: order.sequence,
                reason: format!("{err:?}"),
            })?;
            hasher.update(&bytes);
        }

        let digest = hasher.finalize();
        let mut root = [0u8; 32];
        root.copy_from_slice(&digest);
        Ok(root)
    }

    /// State root as a hex string
    pub fn state_root_hex(&self) -> Result<String, BookError> {
        self.state_root().map(hex::encode)
    }

    /// Drop every resting order. The sequence counter keeps counting.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.resting_quantity = 0;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
