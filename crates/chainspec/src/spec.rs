//! Chain specification type and the `EthChainSpec` trait that lets node/EVM
//! code stay generic over which chain it's running.

use alloc::{boxed::Box, vec::Vec};
use alloy_chains::Chain;
use alloy_consensus::{BlockHeader, Header};
use alloy_eips::eip1559::calc_next_block_base_fee;
use alloy_eips::eip4844::BlobParams;
use alloy_genesis::Genesis;
use alloy_primitives::{Address, B256, U256};
use alloy_trie::{root::state_root_unhashed, EMPTY_ROOT_HASH};
use core::fmt::Debug;
use reth_ethereum_forks::{ChainHardforks, Hardfork, Hardforks};
use reth_network_peers::NodeRecord;
use reth_primitives_traits::SealedHeader;

/// EIP-1559 base fee adjustment parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseFeeParams {
    /// Denominator controlling how much the base fee can change block over block.
    pub max_change_denominator: u128,
    /// Gas target elasticity multiplier.
    pub elasticity_multiplier: u128,
}

impl BaseFeeParams {
    /// Ethereum mainnet defaults (denominator 8, elasticity 2).
    pub const fn ethereum() -> Self {
        Self { max_change_denominator: 8, elasticity_multiplier: 2 }
    }
}

impl From<BaseFeeParams> for alloy_eips::eip1559::BaseFeeParams {
    fn from(params: BaseFeeParams) -> Self {
        Self::new(params.max_change_denominator, params.elasticity_multiplier)
    }
}

/// Either a single fixed base fee schedule, or one that changes at specific
/// block numbers (unused by XDC chains today, but kept for API parity with
/// upstream chains that do fork their 1559 params).
#[derive(Debug, Clone)]
pub enum BaseFeeParamsKind {
    /// A constant schedule applied at every block.
    Constant(BaseFeeParams),
    /// A schedule that changes at the given block numbers, in ascending order.
    Variable(Vec<(u64, BaseFeeParams)>),
}

impl From<BaseFeeParams> for BaseFeeParamsKind {
    fn from(params: BaseFeeParams) -> Self {
        Self::Constant(params)
    }
}

impl BaseFeeParamsKind {
    /// Resolve the params active at `block_number`.
    pub fn at_block(&self, block_number: u64) -> BaseFeeParams {
        match self {
            Self::Constant(params) => *params,
            Self::Variable(schedule) => schedule
                .iter()
                .rev()
                .find(|(activation, _)| block_number >= *activation)
                .map(|(_, params)| *params)
                .unwrap_or_else(BaseFeeParams::ethereum),
        }
    }
}

/// EIP-4844 blob gas schedule. XDPoS chains never activate Cancun, so this
/// stays at its all-zero default; kept for `ChainSpec` parity with upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlobScheduleBlobParams {
    /// Target number of blobs per block.
    pub target_blob_count: u64,
    /// Maximum number of blobs per block.
    pub max_blob_count: u64,
}

/// Deposit contract metadata. XDPoS chains have no beacon-chain deposit
/// contract; kept for `ChainSpec` parity with upstream reth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositContract {
    /// Contract address.
    pub address: Address,
    /// Block the contract was deployed at.
    pub block: u64,
    /// Event topic hash node providers filter logs by.
    pub topic: B256,
}

/// A chain specification: genesis state, hardfork activation schedule, and
/// the handful of consensus knobs (base fee params, prune limits) that vary
/// per chain.
#[derive(Debug, Clone)]
pub struct ChainSpec {
    /// Chain identifier.
    pub chain: Chain,
    /// Genesis block configuration as loaded from `genesis.json`.
    pub genesis: Genesis,
    /// Sealed genesis header, precomputed so consumers never recompute its hash.
    pub genesis_header: SealedHeader,
    /// Total difficulty and block number of the Paris (merge) transition, if any.
    /// Always `None` for XDPoS chains since they never run PoW/PoS.
    pub paris_block_and_final_difficulty: Option<(u64, U256)>,
    /// Hardfork activation schedule.
    pub hardforks: ChainHardforks,
    /// Beacon deposit contract, if any.
    pub deposit_contract: Option<DepositContract>,
    /// EIP-1559 base fee parameters.
    pub base_fee_params: BaseFeeParamsKind,
    /// Maximum number of rows considered per stage during pruning.
    pub prune_delete_limit: usize,
    /// EIP-4844 blob gas schedule. Never activated on XDPoS chains.
    pub blob_params: BlobScheduleBlobParams,
}

impl Default for ChainSpec {
    fn default() -> Self {
        let genesis = Genesis::default();
        let hardforks = ChainHardforks::default();
        let header = make_genesis_header(&genesis, &hardforks);
        let hash = header.hash_slow();
        Self {
            chain: Chain::from(1),
            genesis,
            genesis_header: SealedHeader::new(header, hash),
            paris_block_and_final_difficulty: None,
            hardforks,
            deposit_contract: None,
            base_fee_params: BaseFeeParamsKind::Constant(BaseFeeParams::ethereum()),
            prune_delete_limit: 10_000,
            blob_params: Default::default(),
        }
    }
}

impl Hardforks for ChainSpec {
    fn fork<H: Hardfork>(&self, fork: H) -> reth_ethereum_forks::ForkCondition {
        self.hardforks.fork(fork)
    }

    fn forks_iter(
        &self,
    ) -> impl Iterator<Item = (&dyn Hardfork, reth_ethereum_forks::ForkCondition)> {
        self.hardforks.forks_iter()
    }
}

/// Trait letting node/EVM/payload code stay generic over the concrete chain
/// it's wired up to, instead of depending on [`ChainSpec`] directly.
pub trait EthChainSpec: Send + Sync + Unpin + Debug {
    /// Block header type used by this chain.
    type Header: BlockHeader + Send + Sync + Unpin + 'static;

    /// Chain identifier.
    fn chain(&self) -> Chain;

    /// Hash of the genesis block.
    fn genesis_hash(&self) -> B256;

    /// Full genesis configuration.
    fn genesis(&self) -> &Genesis;

    /// Sealed genesis header.
    fn genesis_header(&self) -> &Self::Header;

    /// Beacon deposit contract metadata, if any.
    fn deposit_contract(&self) -> Option<&DepositContract>;

    /// Maximum rows pruned per stage invocation.
    fn prune_delete_limit(&self) -> usize;

    /// Static bootnode list for this chain, if known.
    fn bootnodes(&self) -> Option<Vec<NodeRecord>>;

    /// EIP-1559 base fee params active at `block_number`.
    fn base_fee_params_at_block(&self, block_number: u64) -> BaseFeeParams;

    /// EIP-1559 base fee params active at `timestamp`.
    fn base_fee_params_at_timestamp(&self, timestamp: u64) -> BaseFeeParams;

    /// EIP-4844 blob gas schedule active at `timestamp`, if blobs are enabled
    /// at all on this chain.
    fn blob_params_at_timestamp(&self, timestamp: u64) -> Option<BlobParams>;

    /// Total difficulty and block number of the Paris transition, if this
    /// chain ever ran under PoW/PoS rules.
    fn final_paris_total_difficulty(&self) -> Option<U256>;

    /// Computes the base fee the next block (built on top of `parent` at
    /// `target_timestamp`) must pay, if this chain has EIP-1559 active.
    fn next_block_base_fee(&self, parent: &Self::Header, target_timestamp: u64) -> Option<u64> {
        let base_fee_params = self.base_fee_params_at_timestamp(target_timestamp);
        let base_fee = parent.base_fee_per_gas()?;
        Some(calc_next_block_base_fee(
            parent.gas_used(),
            parent.gas_limit(),
            base_fee,
            base_fee_params.into(),
        ))
    }
}

impl EthChainSpec for ChainSpec {
    type Header = Header;

    fn chain(&self) -> Chain {
        self.chain
    }

    fn genesis_hash(&self) -> B256 {
        self.genesis_header.hash()
    }

    fn genesis(&self) -> &Genesis {
        &self.genesis
    }

    fn genesis_header(&self) -> &Header {
        self.genesis_header.header()
    }

    fn deposit_contract(&self) -> Option<&DepositContract> {
        self.deposit_contract.as_ref()
    }

    fn prune_delete_limit(&self) -> usize {
        self.prune_delete_limit
    }

    fn bootnodes(&self) -> Option<Vec<NodeRecord>> {
        None
    }

    fn base_fee_params_at_block(&self, block_number: u64) -> BaseFeeParams {
        self.base_fee_params.at_block(block_number)
    }

    fn base_fee_params_at_timestamp(&self, _timestamp: u64) -> BaseFeeParams {
        match &self.base_fee_params {
            BaseFeeParamsKind::Constant(params) => *params,
            BaseFeeParamsKind::Variable(schedule) => schedule
                .last()
                .map(|(_, params)| *params)
                .unwrap_or_else(BaseFeeParams::ethereum),
        }
    }

    fn blob_params_at_timestamp(&self, _timestamp: u64) -> Option<BlobParams> {
        // XDPoS chains never activate Cancun/EIP-4844.
        None
    }

    fn final_paris_total_difficulty(&self) -> Option<U256> {
        self.paris_block_and_final_difficulty.map(|(_, difficulty)| difficulty)
    }
}

/// Build the genesis block header for `genesis` given its `hardforks`
/// schedule, computing the genesis state root from the allocated accounts.
pub fn make_genesis_header(genesis: &Genesis, _hardforks: &ChainHardforks) -> Header {
    let state_root = if genesis.alloc.is_empty() {
        EMPTY_ROOT_HASH
    } else {
        state_root_unhashed(genesis.alloc.iter().map(|(address, account)| (*address, account.clone())))
    };

    Header {
        parent_hash: B256::ZERO,
        ommers_hash: alloy_consensus::constants::EMPTY_OMMER_ROOT_HASH,
        beneficiary: genesis.coinbase,
        state_root,
        transactions_root: EMPTY_ROOT_HASH,
        receipts_root: EMPTY_ROOT_HASH,
        logs_bloom: Default::default(),
        difficulty: genesis.difficulty,
        number: 0,
        gas_limit: genesis.gas_limit,
        gas_used: 0,
        timestamp: genesis.timestamp,
        extra_data: genesis.extra_data.clone(),
        mix_hash: genesis.mix_hash,
        nonce: genesis.nonce.into(),
        base_fee_per_gas: genesis.base_fee_per_gas.map(|fee| fee as u64),
        withdrawals_root: None,
        blob_gas_used: None,
        excess_blob_gas: None,
        parent_beacon_block_root: None,
        requests_hash: None,
    }
}
