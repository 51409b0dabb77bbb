//! Shared wire-protocol types: the eth `Status` handshake message and the
//! [`NetworkPrimitives`] trait networking/transaction-pool code uses to stay
//! generic over a node's block/header/body/transaction/receipt types.
//!
//! XDC's own 18-field block header RLP decoding lives in [`xdc_header`];
//! [`xdc_hash_cache`] caches the resulting hashes so sealing code never has
//! to recompute or second-guess them against the standard Ethereum header
//! hash. Both are plain modules here rather than a dependency on
//! `reth-xdc-primitives`, which would create a crate cycle (see Cargo.toml).

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use alloy_chains::Chain;
use alloy_primitives::B256;
use core::fmt::Debug;
use reth_primitives_traits::NodePrimitives;

pub mod xdc_header;
pub mod xdc_hash_cache;

pub use xdc_hash_cache::{clear_cache, get_xdc_hash, get_xdc_hash_or_default, has_xdc_hash, store_xdc_hash};
pub use xdc_header::decode_xdc_block_headers;

/// The `Status` message exchanged at the start of an eth/NN handshake.
///
/// eth/63 and earlier never carry a fork id; later versions add one so
/// peers can reject chains that forked away from each other without
/// downloading a single block. XDC negotiates eth/63 on its own chain IDs
/// (see `xdc_node::network::handshake::protocol_version_for_chain`), so both
/// variants need to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    /// eth/63-and-earlier status: no fork id field.
    Eth63 {
        /// Negotiated protocol version.
        version: u8,
        /// Chain identifier.
        chain: Chain,
        /// Total difficulty of the peer's best chain.
        total_difficulty: alloy_primitives::U256,
        /// Hash of the peer's best block.
        best_hash: B256,
        /// Genesis block hash, used to reject peers on a different network.
        genesis: B256,
    },
    /// eth/64-and-later status: carries an EIP-2124 fork id.
    Eth64 {
        /// Negotiated protocol version.
        version: u8,
        /// Chain identifier.
        chain: Chain,
        /// Total difficulty of the peer's best chain.
        total_difficulty: alloy_primitives::U256,
        /// Hash of the peer's best block.
        best_hash: B256,
        /// Genesis block hash, used to reject peers on a different network.
        genesis: B256,
        /// Fork identifier, used to reject peers that forked away from us.
        fork_id: alloy_hardforks::ForkId,
    },
}

impl StatusMessage {
    /// Protocol version advertised in this status message.
    pub fn version(&self) -> u8 {
        match self {
            Self::Eth63 { version, .. } | Self::Eth64 { version, .. } => *version,
        }
    }

    /// Genesis hash advertised in this status message.
    pub fn genesis(&self) -> B256 {
        match self {
            Self::Eth63 { genesis, .. } | Self::Eth64 { genesis, .. } => *genesis,
        }
    }

    /// `true` if this status carries no fork id, i.e. is eth/63 or earlier.
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Eth63 { .. })
    }
}

/// Associated block/transaction/receipt types a wire-protocol implementation
/// is generic over, so the same P2P message codec works for every node's
/// concrete primitives.
pub trait NetworkPrimitives: Debug + Send + Sync + Unpin + Clone + 'static {
    /// Block header type exchanged over the wire.
    type BlockHeader: Debug + Send + Sync + Unpin + Clone + 'static;
    /// Block body type exchanged over the wire.
    type BlockBody: Debug + Send + Sync + Unpin + Clone + 'static;
    /// Full block type, header + body.
    type Block: Debug + Send + Sync + Unpin + Clone + 'static;
    /// Transaction type gossiped via `Transactions`/`NewPooledTransactionHashes`.
    type BroadcastedTransaction: Debug + Send + Sync + Unpin + Clone + 'static;
    /// Transaction type served in response to `GetPooledTransactions`.
    type PooledTransaction: Debug + Send + Sync + Unpin + Clone + 'static;
    /// Receipt type served in response to `GetReceipts`.
    type Receipt: Debug + Send + Sync + Unpin + Clone + 'static;
}

/// A [`NetworkPrimitives`] implementation that forwards its block-side
/// associated types to a [`NodePrimitives`] type `N` and takes the pooled
/// transaction type `Pooled` separately, since the pooled (wire)
/// representation of a transaction often differs from its consensus
/// representation (e.g. blob transactions carrying sidecars on the wire
/// only).
#[derive(Clone)]
pub struct BasicNetworkPrimitives<N, Pooled> {
    _marker: core::marker::PhantomData<fn() -> (N, Pooled)>,
}

impl<N, Pooled> Debug for BasicNetworkPrimitives<N, Pooled> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BasicNetworkPrimitives").finish()
    }
}

impl<N, Pooled> NetworkPrimitives for BasicNetworkPrimitives<N, Pooled>
where
    N: NodePrimitives,
    Pooled: Debug + Send + Sync + Unpin + Clone + 'static,
{
    type BlockHeader = N::BlockHeader;
    type BlockBody = N::BlockBody;
    type Block = N::Block;
    type BroadcastedTransaction = N::SignedTx;
    type PooledTransaction = Pooled;
    type Receipt = N::Receipt;
}
