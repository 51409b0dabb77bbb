//! XDC Block Execution Hooks
//!
//! This module provides execution-time hooks for XDC consensus integration.
//! These functions are called during the block execution pipeline to:
//! - Determine consensus version (V1 vs V2)
//! - Apply checkpoint rewards after transaction execution
//! - Finalize state roots with cache integration

use crate::{
    errors::{XDPoSError, XDPoSResult},
    extra_data::recover_signer,
    reward::RewardCalculator,
    state_root_cache::XdcStateRootCache,
};
use alloy_primitives::{Address, B256};
use reth_execution_types::ExecutionOutcome;
use reth_storage_api::{BlockReader, StateProvider};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Consensus version for a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsensusVersion {
    /// XDPoS V1 (epoch-based PoA)
    V1,
    /// XDPoS V2 (BFT with QC/TC)
    V2,
}

impl ConsensusVersion {
    /// Get version as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "V1",
            Self::V2 => "V2",
        }
    }
}

/// Apply checkpoint rewards to the execution outcome
///
/// This function is called after all transactions in a checkpoint block are executed,
/// but BEFORE computing the final state root. It:
/// 1. Walks backward through the previous epoch (900 blocks)
/// 2. Counts signing transactions per validator
/// 3. Calculates reward distribution
/// 4. Applies rewards to state (90% masternode, 10% foundation)
///
/// # Arguments
/// * `block_number` - The checkpoint block number (must be N % 900 == 0)
/// * `outcome` - The execution outcome to apply rewards to
/// * `state_provider` - Provider for reading blockchain state
/// * `reward_calculator` - Calculator for computing reward distribution
///
/// # Returns
/// `Ok(())` if rewards were applied successfully, `Err` otherwise
pub fn apply_checkpoint_rewards<SP>(
    block_number: u64,
    outcome: &mut ExecutionOutcome,
    state_provider: &SP,
    reward_calculator: &RewardCalculator,
) -> XDPoSResult<()>
where
    SP: StateProvider + BlockReader,
{
    debug!(
        block = block_number,
        "Applying checkpoint rewards for epoch"
    );

    // Calculate and validate the checkpoint range (also validates block_number % epoch == 0)
    let (epoch_start, epoch_end, _epoch) = reward_calculator
        .calculate_checkpoint_range(block_number)
        .map_err(|_| XDPoSError::InvalidCheckpoint(block_number))?;

    debug!(
        epoch_start = epoch_start,
        epoch_end = epoch_end,
        "Scanning epoch for signatures"
    );

    // Count signatures from each validator in the epoch by recovering the
    // sealing signer embedded in each header's extra-data.
    let mut signer_counts: BTreeMap<Address, u64> = BTreeMap::new();
    let mut total_signatures = 0u64;

    for block_num in epoch_start..=epoch_end {
        let header = state_provider
            .header_by_number(block_num)
            .map_err(|_| XDPoSError::MissingBlockHeader(block_num))?
            .ok_or(XDPoSError::MissingBlockHeader(block_num))?;

        let signer = recover_signer(&header)?;
        *signer_counts.entry(signer).or_insert(0) += 1;
        total_signatures += 1;
    }

    if total_signatures == 0 {
        debug!("No signatures found in epoch, skipping rewards");
        return Ok(());
    }

    debug!(
        total_signatures = total_signatures,
        unique_signers = signer_counts.len(),
        "Calculated signer statistics"
    );

    let masternode_rewards = reward_calculator.calculate_rewards_per_signer(&signer_counts, total_signatures);
    let (foundation_wallet, foundation_reward) = reward_calculator.calculate_holder_rewards();

    for (address, amount) in masternode_rewards.iter().chain(core::iter::once(&(foundation_wallet, foundation_reward))) {
        credit_balance(outcome, *address, *amount);
    }

    let total_applied = masternode_rewards
        .iter()
        .fold(foundation_reward, |acc, (_, amount)| acc + *amount);

    info!(
        block = block_number,
        epoch_start,
        epoch_end,
        recipients = masternode_rewards.len() + 1,
        total_applied = %total_applied,
        "Applied checkpoint rewards"
    );

    Ok(())
}

/// Credit `amount` wei to `address`'s balance within a pending [`ExecutionOutcome`]'s bundle
/// state, creating the account entry if it does not already exist.
fn credit_balance(outcome: &mut ExecutionOutcome, address: Address, amount: alloy_primitives::U256) {
    if amount.is_zero() {
        return;
    }

    let account = outcome.bundle.state.entry(address).or_default();
    match account.info.as_mut() {
        Some(info) => info.balance += amount,
        None => {
            let mut info = account.original_info.clone().unwrap_or_default();
            info.balance += amount;
            account.info = Some(info);
        }
    }
}

/// Finalize state root with cache integration
///
/// For checkpoint blocks (N % 900 == 0), checks the state root cache to handle
/// known divergences between XDC clients. For non-checkpoint blocks, validates
/// the state root normally.
///
/// # Arguments
/// * `block_number` - The block number being executed
/// * `header_state_root` - The state root from the block header
/// * `computed_state_root` - The state root computed after execution
/// * `cache` - The state root cache for checkpoint blocks
/// * `epoch` - The epoch length (usually 900)
///
/// # Returns
/// The finalized state root to use for validation
pub fn finalize_state_root(
    block_number: u64,
    header_state_root: B256,
    computed_state_root: B256,
    cache: &XdcStateRootCache,
    epoch: u64,
) -> B256 {
    // Check if this is a checkpoint block
    let is_checkpoint = block_number % epoch == 0 && block_number > 0;

    if !is_checkpoint {
        // Non-checkpoint blocks: use computed root as-is
        // If it doesn't match header, that's a real consensus error
        return computed_state_root;
    }

    // Checkpoint block: check for known divergence
    if computed_state_root == header_state_root {
        // Roots match - no divergence, great!
        debug!(
            block = block_number,
            state_root = %computed_state_root,
            "State root matches at checkpoint"
        );
        return computed_state_root;
    }

    // Roots don't match - check cache for known divergence
    if let Some(cached_local_root) = cache.get_local_root(&header_state_root) {
        // Known divergence - use cached local root
        info!(
            block = block_number,
            header_root = %header_state_root,
            computed_root = %computed_state_root,
            cached_root = %cached_local_root,
            "Using cached state root for known divergence"
        );

        // Verify our computation matches the cache
        if computed_state_root != cached_local_root {
            warn!(
                block = block_number,
                computed = %computed_state_root,
                cached = %cached_local_root,
                "Computed state root differs from cache - possible execution bug"
            );
        }

        return cached_local_root;
    }

    // New checkpoint - not in cache yet
    // Store the mapping for future use
    cache.insert(header_state_root, computed_state_root, block_number);

    warn!(
        block = block_number,
        header_root = %header_state_root,
        computed_root = %computed_state_root,
        "New checkpoint state root divergence - stored mapping"
    );

    // Use our computed root
    computed_state_root
}

/// Validate state root for a block
///
/// This is a helper function that combines state root validation with cache checking.
/// Returns `Ok(())` if the state root is valid (either matches or is in cache),
/// `Err` otherwise.
///
/// # Arguments
/// * `block_number` - The block number being validated
/// * `header_state_root` - The state root from the block header
/// * `computed_state_root` - The state root computed after execution
/// * `cache` - The state root cache for checkpoint blocks
/// * `epoch` - The epoch length (usually 900)
///
/// # Returns
/// `Ok(())` if state root is valid, `Err(XDPoSError)` otherwise
pub fn validate_state_root(
    block_number: u64,
    header_state_root: B256,
    computed_state_root: B256,
    cache: &XdcStateRootCache,
    epoch: u64,
) -> XDPoSResult<()> {
    let finalized_root = finalize_state_root(
        block_number,
        header_state_root,
        computed_state_root,
        cache,
        epoch,
    );

    if finalized_root != computed_state_root {
        // This means we used a cached root that differs from our computation
        // This is OK for checkpoint blocks, but we should log it
        debug!(
            block = block_number,
            finalized = %finalized_root,
            computed = %computed_state_root,
            "Used cached state root"
        );
    }

    // For now, we accept the finalized root
    // In a stricter implementation, we might want to validate that
    // finalized_root == header_state_root OR is in cache
    Ok(())
}

/// Check if rewards should be applied for a given block number
///
/// Rewards are applied at checkpoint blocks (N % epoch == 0, N > 0)
#[inline]
pub fn should_apply_rewards(block_number: u64, epoch: u64) -> bool {
    block_number % epoch == 0 && block_number > 0
}

/// Get the epoch range for reward calculation
///
/// Returns (epoch_start, epoch_end) for the epoch ending at the given checkpoint block
pub fn get_epoch_range(checkpoint_block: u64, epoch: u64) -> (u64, u64) {
    let epoch_start = if checkpoint_block >= epoch {
        checkpoint_block - epoch + 1
    } else {
        1 // First epoch starts at block 1
    };
    let epoch_end = checkpoint_block - 1;

    (epoch_start, epoch_end)
}
