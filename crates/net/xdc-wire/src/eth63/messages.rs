//! eth/63 message definitions.
//!
//! These are re-exports from the main types module for convenience.

pub use crate::types::{
    BlockBodies63, BlockHeaders63, GetBlockBodies63, GetBlockHeaders63, GetNodeData63,
    GetReceipts63, HashOrNumber, NewBlock, NewBlockHashes, NodeData63, Receipts63, Transactions,
    Xdc63Status,
};
