//! Chain specification types shared by every XDC Network node crate.
//!
//! This crate defines the chain-agnostic [`ChainSpec`] type and the
//! [`EthChainSpec`] trait that lets EVM/payload/node code stay generic over
//! which concrete chain it's running against, plus the genesis chain specs
//! for XDC Mainnet and Apothem Testnet.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod spec;

pub mod xdc;

pub use reth_ethereum_forks::{EthereumHardfork, EthereumHardforks};
pub use spec::{
    make_genesis_header, BaseFeeParams, BaseFeeParamsKind, BlobScheduleBlobParams, ChainSpec,
    DepositContract, EthChainSpec,
};
