//! Resting order record for the rank book.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs so the resting book can be
//! encoded deterministically when computing a state root. Every field is a
//! basic type, so the encoding is a fixed-size little-endian container.
//!
//! ## Mutability
//!
//! Only `remaining` changes after creation. Price, `sequence` and side
//! make up the order's [`PriorityKey`] and are fixed for its lifetime.
//!
//! ## Signed Prices
//!
//! Prices are `i64` and may be negative. SSZ has no signed integers, so the
//! price is stored as its two's-complement bits in `price_raw`, the same way
//! the side is stored as `side_raw`.

use ssz_rs::prelude::*;

use crate::types::PriorityKey;

// ============================================================================
// Side enum
// ============================================================================

/// Side of the book an order rests on.
///
/// Represented as u8 for SSZ compatibility:
/// - Buy = 0
/// - Sell = 1
///
/// The variant order also fixes how keys from different sides compare, which
/// only matters if someone mixes sides in one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Side {
    /// Resting bids. Best = highest price.
    Buy,
    /// Resting asks. Best = lowest price. A market buy walks this side.
    #[default]
    Sell,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }

    /// Parse a side name as accepted on the command line.
    ///
    /// Accepts `buy`/`bid` and `sell`/`ask`, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "buy" | "bid" => Some(Side::Buy),
            "sell" | "ask" => Some(Side::Sell),
            _ => None,
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A resting limit order.
///
/// ## SSZ Layout
///
/// Fixed-size container: 8 (sequence) + 1 (side) + 8 (price) + 8 (quantity)
/// + 8 (remaining) = 33 bytes.
///
/// ## Example
///
/// ```
/// use rankbook::types::{Order, Side};
///
/// let mut order = Order::new(7, Side::Sell, 101, 50);
/// assert_eq!(order.fill(20), 20);
/// assert_eq!(order.remaining, 30);
/// assert_eq!(order.filled_quantity(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Arrival sequence number, assigned by the book at insertion
    pub sequence: u64,

    /// Order side as u8 (0=Buy, 1=Sell)
    pub side_raw: u8,

    /// Limit price as two's-complement bits (see [`Order::price`])
    pub price_raw: u64,

    /// Size at insertion
    pub quantity: u64,

    /// Unconsumed size. Never zero while the order rests in the tree.
    pub remaining: u64,
}

impl Order {
    /// Create a new resting order with its full size remaining
    ///
    /// # Arguments
    ///
    /// * `sequence` - Arrival sequence number
    /// * `side` - Book side the order rests on
    /// * `price` - Limit price
    /// * `quantity` - Order size
    pub fn new(sequence: u64, side: Side, price: i64, quantity: u64) -> Self {
        Self {
            sequence,
            side_raw: side.to_u8(),
            price_raw: price as u64,
            quantity,
            remaining: quantity,
        }
    }

    /// Get the order side
    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or_default()
    }

    /// Get the limit price
    #[inline]
    pub fn price(&self) -> i64 {
        self.price_raw as i64
    }

    /// The price-time priority key of this order
    #[inline]
    pub fn key(&self) -> PriorityKey {
        PriorityKey::new(self.side(), self.price(), self.sequence)
    }

    /// Check if the order is fully consumed
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.remaining == 0
    }

    /// Get the consumed quantity
    pub fn filled_quantity(&self) -> u64 {
        self.quantity.saturating_sub(self.remaining)
    }

    /// Consume up to `quantity` from this order.
    ///
    /// # Returns
    ///
    /// The quantity actually taken, `min(quantity, remaining)`
    pub fn fill(&mut self, quantity: u64) -> u64 {
        let taken = quantity.min(self.remaining);
        self.remaining -= taken;
        taken
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
