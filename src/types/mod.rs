//! Core data types for the rank book
//!
//! ## Types
//!
//! - [`Order`]: A resting limit order
//! - [`Side`]: Buy (bid book) or Sell (ask book)
//! - [`PriorityKey`]: Price-time priority ordering key
//! - [`Fill`]: One slice consumed from a resting order
//! - [`Execution`]: Result of a market order sweep
//!
//! `Order` implements SSZ serialization for deterministic encoding.

mod fill;
mod key;
mod order;

pub use fill::{Execution, Fill};
pub use key::PriorityKey;
pub use order::{Order, Side};
