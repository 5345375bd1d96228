//! Price-time priority key.
//!
//! Orders are ranked by price first, then by arrival sequence (FIFO within a
//! price level). On the sell side the lowest price is best; on the buy side
//! the highest. The direction is carried by the key itself so a single tree
//! type serves both sides.
//!
//! ```
//! use rankbook::types::{PriorityKey, Side};
//!
//! let cheap = PriorityKey::new(Side::Sell, 99, 5);
//! let early = PriorityKey::new(Side::Sell, 100, 1);
//! let late = PriorityKey::new(Side::Sell, 100, 2);
//! assert!(cheap < early && early < late);
//!
//! // Bids invert the price direction but keep FIFO.
//! let high = PriorityKey::new(Side::Buy, 101, 9);
//! let low = PriorityKey::new(Side::Buy, 100, 1);
//! assert!(high < low);
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::types::Side;

/// Ordering key for a resting order: `(side, price, sequence)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriorityKey {
    pub side: Side,
    pub price: i64,
    pub sequence: u64,
}

impl PriorityKey {
    #[inline]
    pub fn new(side: Side, price: i64, sequence: u64) -> Self {
        Self { side, price, sequence }
    }

    /// Compare prices only, in this key's side direction.
    #[inline]
    pub fn cmp_price(&self, other: &Self) -> Ordering {
        match self.side {
            Side::Sell => self.price.cmp(&other.price),
            Side::Buy => other.price.cmp(&self.price),
        }
    }
}

impl Ord for PriorityKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.side
            .cmp(&other.side)
            .then_with(|| self.cmp_price(other))
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for PriorityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PriorityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}#{}", self.side, self.price, self.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sell_price_ascending() {
        let a = PriorityKey::new(Side::Sell, 3, 10);
        let b = PriorityKey::new(Side::Sell, 5, 0);
        assert!(a < b);
    }

    #[test]
    fn test_fifo_within_level() {
        let first = PriorityKey::new(Side::Sell, 10, 0);
        let second = PriorityKey::new(Side::Sell, 10, 1);
        assert!(first < second);

        let first = PriorityKey::new(Side::Buy, 10, 0);
        let second = PriorityKey::new(Side::Buy, 10, 1);
        assert!(first < second);
    }

    #[test]
    fn test_buy_price_descending() {
        let high = PriorityKey::new(Side::Buy, 20, 7);
        let low = PriorityKey::new(Side::Buy, 10, 0);
        assert!(high < low);
        assert_eq!(high.cmp_price(&low), Ordering::Less);
    }

    #[test]
    fn test_negative_prices_rank_below_positive_on_sell_side() {
        let negative = PriorityKey::new(Side::Sell, -5, 9);
        let zero = PriorityKey::new(Side::Sell, 0, 0);
        assert!(negative < zero);

        let bid_negative = PriorityKey::new(Side::Buy, -5, 0);
        let bid_zero = PriorityKey::new(Side::Buy, 0, 9);
        assert!(bid_zero < bid_negative);
    }

    #[test]
    fn test_equality_is_total() {
        let a = PriorityKey::new(Side::Sell, 10, 4);
        assert_eq!(a.cmp(&a), Ordering::Equal);
        assert_eq!(a, PriorityKey::new(Side::Sell, 10, 4));
        assert_ne!(a, PriorityKey::new(Side::Sell, 10, 5));
    }

    #[test]
    fn test_display() {
        let key = PriorityKey::new(Side::Sell, 42, 7);
        assert_eq!(key.to_string(), "Sell@42#7");
        assert_eq!(PriorityKey::new(Side::Buy, -3, 1).to_string(), "Buy@-3#1");
    }
}
