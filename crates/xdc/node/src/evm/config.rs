//! Maps a chain's hardfork activation schedule to the `revm` [`SpecId`] active
//! at a given timestamp/block number.
//!
//! XDC chains configure their hardforks the same way Ethereum mainnet does up
//! through Shanghai (XDC has never activated the Paris/merge transition or
//! anything past it, since it never ran PoW); [`XdcEvmConfig`](crate::evm::XdcEvmConfig)
//! layers its own EIP-158-disable and TIPSigning rules on top regardless of
//! which `SpecId` this resolves to.

use reth_chainspec::EthereumHardforks;
use revm::primitives::hardfork::SpecId;

/// Resolve the `revm` hardfork `SpecId` active for a block built at `timestamp`/`block_number`,
/// per `chain_spec`'s configured hardfork schedule.
pub fn revm_spec_by_timestamp_and_block_number<C: EthereumHardforks>(
    chain_spec: &C,
    timestamp: u64,
    block_number: u64,
) -> SpecId {
    if chain_spec.is_prague_active_at_timestamp(timestamp) {
        SpecId::PRAGUE
    } else if chain_spec.is_cancun_active_at_timestamp(timestamp) {
        SpecId::CANCUN
    } else if chain_spec.is_shanghai_active_at_timestamp(timestamp) {
        SpecId::SHANGHAI
    } else if chain_spec.is_paris_active_at_block(block_number) {
        SpecId::MERGE
    } else if chain_spec.is_london_active_at_block(block_number) {
        SpecId::LONDON
    } else if chain_spec.is_berlin_active_at_block(block_number) {
        SpecId::BERLIN
    } else if chain_spec.is_istanbul_active_at_block(block_number) {
        SpecId::ISTANBUL
    } else if chain_spec.is_petersburg_active_at_block(block_number) {
        SpecId::PETERSBURG
    } else if chain_spec.is_byzantium_active_at_block(block_number) {
        SpecId::BYZANTIUM
    } else if chain_spec.is_spurious_dragon_active_at_block(block_number) {
        SpecId::SPURIOUS_DRAGON
    } else if chain_spec.is_tangerine_active_at_block(block_number) {
        SpecId::TANGERINE
    } else if chain_spec.is_homestead_active_at_block(block_number) {
        SpecId::HOMESTEAD
    } else {
        SpecId::FRONTIER
    }
}
