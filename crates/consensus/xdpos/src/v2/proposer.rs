//! XDPoS V2 Block Proposer Selection
//!
//! This module implements the proposer selection algorithm for V2 BFT consensus.
//! The proposer is determined by: round_number % len(validators)

use super::Round;
use alloy_primitives::Address;
use crate::errors::{XDPoSError, XDPoSResult};

/// Select the block proposer for a given round
///
/// The proposer is selected using simple round-robin based on round number:
/// `proposer_index = round % validator_count`
///
/// # Arguments
/// * `round` - The consensus round number
/// * `validators` - List of validator addresses for this epoch
///
/// # Returns
/// The address of the selected proposer
pub fn select_proposer(round: Round, validators: &[Address]) -> XDPoSResult<Address> {
    if validators.is_empty() {
        return Err(XDPoSError::Custom("empty validator list".to_string()));
    }

    let index = (round as usize) % validators.len();
    Ok(validators[index])
}

/// Get the index of a validator in the validator set
///
/// # Arguments
/// * `validator` - The validator address to find
/// * `validators` - List of validator addresses
///
/// # Returns
/// The index of the validator, or None if not found
pub fn get_validator_index(validator: &Address, validators: &[Address]) -> Option<usize> {
    validators.iter().position(|v| v == validator)
}

/// Check if an address is a valid validator
///
/// # Arguments
/// * `address` - The address to check
/// * `validators` - List of validator addresses
///
/// # Returns
/// true if the address is in the validator set
pub fn is_validator(address: &Address, validators: &[Address]) -> bool {
    validators.contains(address)
}

/// Calculate which round a validator should propose in
///
/// Given a validator's index, calculate the next round they should propose
/// starting from a given round.
///
/// # Arguments
/// * `validator_index` - Index of the validator in the set
/// * `current_round` - Current round number
/// * `validator_count` - Total number of validators
///
/// # Returns
/// The next round number where this validator should propose
pub fn next_proposer_round(
    validator_index: usize,
    current_round: Round,
    validator_count: usize,
) -> XDPoSResult<Round> {
    if validator_count == 0 {
        return Err(XDPoSError::Custom("validator count is zero".to_string()));
    }
    if validator_index >= validator_count {
        return Err(XDPoSError::Custom(format!(
            "validator index {} out of bounds (count: {})",
            validator_index, validator_count
        )));
    }

    let current_proposer_idx = (current_round as usize) % validator_count;
    
    if validator_index >= current_proposer_idx {
        // Next turn in this cycle
        let rounds_until_turn = validator_index - current_proposer_idx;
        Ok(current_round + rounds_until_turn as u64)
    } else {
        // Next turn in next cycle
        let rounds_until_next_cycle = validator_count - current_proposer_idx;
        let rounds_into_next_cycle = validator_index;
        Ok(current_round + (rounds_until_next_cycle + rounds_into_next_cycle) as u64)
    }
}

/// Get the proposer for the parent block given current round
///
/// # Arguments
/// * `current_round` - Current round number
/// * `validators` - List of validator addresses
///
/// # Returns
/// The address of the parent block proposer (previous round)
pub fn parent_proposer(current_round: Round, validators: &[Address]) -> XDPoSResult<Address> {
    if current_round == 0 {
        return Err(XDPoSError::Custom("no parent for round 0".to_string()));
    }
    select_proposer(current_round - 1, validators)
}
