//! Order book error types

use thiserror::Error;

use crate::types::PriorityKey;

/// Errors returned by checked order book and tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// Orders must rest with a positive size
    #[error("order at price {price} has zero size")]
    ZeroSize { price: i64 },

    /// A key that is already resting was inserted again
    #[error("order {0} is already resting")]
    DuplicateKey(PriorityKey),

    /// `append` requires every key on the left to precede every key on the right
    #[error("cannot append: {left} does not precede {right}")]
    Overlap { left: PriorityKey, right: PriorityKey },

    /// SSZ encoding of a resting order failed
    #[error("failed to encode order #{sequence}: {reason}")]
    Encoding { sequence: u64, reason: String },
}

/// Structural defect found by [`OrderTree::validate`](crate::orderbook::OrderTree::validate).
///
/// These indicate a bug in the tree, never bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("subtree size of #{sequence} is {cached}, counted {actual}")]
    SizeMismatch {
        sequence: u64,
        cached: usize,
        actual: usize,
    },

    #[error("heap order broken: child #{child} outranks parent #{parent}")]
    HeapOrder { parent: u64, child: u64 },

    #[error("keys out of order: {previous} before {next}")]
    KeyOrder {
        previous: PriorityKey,
        next: PriorityKey,
    },

    #[error("order #{sequence} rests with zero size")]
    EmptyOrder { sequence: u64 },

    #[error("{reachable} nodes reachable from root, {stored} stored")]
    Orphaned { reachable: usize, stored: usize },
}
