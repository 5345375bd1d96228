//! Consumption records produced by a market sweep.
//!
//! A [`Fill`] is one slice taken from one resting order. An [`Execution`]
//! collects the fills of a single market order together with the requested
//! and filled quantities, so a caller can tell a complete fill from a book
//! that ran dry.

/// A single consumption of a resting order.
///
/// The fill always executes at the resting order's price.
///
/// ## Example
///
/// ```
/// use rankbook::types::Fill;
///
/// let fill = Fill::new(3, 10, 4);
/// assert_eq!(fill.notional(), 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fill {
    /// Sequence number of the resting order that was consumed
    pub sequence: u64,

    /// Execution price (the resting order's price)
    pub price: i64,

    /// Quantity taken
    pub quantity: u64,
}

impl Fill {
    pub fn new(sequence: u64, price: i64, quantity: u64) -> Self {
        Self {
            sequence,
            price,
            quantity,
        }
    }

    /// Cost of this fill, `price * quantity`, widened so it cannot overflow.
    /// Negative when the price is.
    #[inline]
    pub fn notional(&self) -> i128 {
        (self.price as i128) * (self.quantity as i128)
    }
}

/// Outcome of one market order against the book.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Execution {
    /// Quantity the market order asked for
    pub requested: u64,

    /// Quantity actually consumed
    pub filled: u64,

    /// Sum of `price * quantity` over all fills, saturating at the `i128` bounds
    pub cost: i128,

    /// Fills in the order they happened (best first)
    pub fills: Vec<Fill>,
}

impl Execution {
    /// Start an empty execution for a market order of `requested` units
    pub fn new(requested: u64) -> Self {
        Self {
            requested,
            ..Self::default()
        }
    }

    /// Append a fill and fold it into the running totals
    pub fn record(&mut self, fill: Fill) {
        self.filled += fill.quantity;
        self.cost = self.cost.saturating_add(fill.notional());
        self.fills.push(fill);
    }

    /// Quantity left unfilled because the book ran out
    pub fn unfilled(&self) -> u64 {
        self.requested - self.filled
    }

    /// True when the whole request was consumed
    pub fn is_complete(&self) -> bool {
        self.filled == self.requested
    }

    /// True when the book was exhausted before the request was met
    pub fn is_partial(&self) -> bool {
        !self.is_complete()
    }

    /// Volume-weighted average execution price, `None` if nothing filled
    pub fn average_price(&self) -> Option<i128> {
        (self.filled > 0).then(|| self.cost / self.filled as i128)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
