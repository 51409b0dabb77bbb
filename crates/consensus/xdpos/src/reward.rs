//! Checkpoint reward calculation for XDPoS
//!
//! At each reward checkpoint (every `reward_checkpoint` blocks, XDC mainnet
//! default 900), the block reward accrued over the preceding epoch is split
//! between the masternodes that signed blocks in that epoch and the
//! foundation wallet.

use crate::config::XDPoSConfig;
use alloc::{collections::BTreeMap, vec::Vec};
use alloy_primitives::{Address, U256};

/// Share of the checkpoint reward paid to masternodes, by signing weight.
pub const REWARD_MASTER_PERCENT: u64 = 90;

/// Share of the checkpoint reward paid to the foundation wallet.
pub const REWARD_FOUNDATION_PERCENT: u64 = 10;

/// Computes checkpoint reward distribution from a configured [`XDPoSConfig`].
#[derive(Debug, Clone)]
pub struct RewardCalculator {
    config: XDPoSConfig,
}

impl RewardCalculator {
    /// Create a new reward calculator bound to `config`.
    pub fn new(config: XDPoSConfig) -> Self {
        Self { config }
    }

    /// The underlying consensus configuration.
    pub fn config(&self) -> &XDPoSConfig {
        &self.config
    }

    /// The block reward for a single checkpoint, in wei.
    pub fn checkpoint_reward(&self) -> U256 {
        U256::from(self.config.reward)
    }

    /// Validate `checkpoint_block` as a reward checkpoint and return
    /// `(epoch_start, epoch_end, epoch_length)`, where `epoch_start..=epoch_end`
    /// is the range of blocks whose signatures earn this checkpoint's reward.
    pub fn calculate_checkpoint_range(&self, checkpoint_block: u64) -> Result<(u64, u64, u64), alloc::string::String> {
        let epoch = self.config.reward_checkpoint;
        if checkpoint_block == 0 || checkpoint_block % epoch != 0 {
            return Err(alloc::format!("block {checkpoint_block} is not a reward checkpoint"));
        }
        let epoch_start = checkpoint_block.saturating_sub(epoch) + 1;
        let epoch_end = checkpoint_block - 1;
        Ok((epoch_start, epoch_end, epoch))
    }

    /// Split the masternode share of the checkpoint reward among `signer_counts`,
    /// proportional to how many blocks in the epoch each signer signed.
    ///
    /// Returns an empty list if no signatures were counted.
    pub fn calculate_rewards_per_signer(
        &self,
        signer_counts: &BTreeMap<Address, u64>,
        total_signatures: u64,
    ) -> Vec<(Address, U256)> {
        if total_signatures == 0 || signer_counts.is_empty() {
            return Vec::new();
        }

        let masternode_pool = self.checkpoint_reward() * U256::from(REWARD_MASTER_PERCENT) / U256::from(100);

        signer_counts
            .iter()
            .map(|(signer, count)| {
                let share = masternode_pool * U256::from(*count) / U256::from(total_signatures);
                (*signer, share)
            })
            .collect()
    }

    /// The foundation wallet's fixed share of the checkpoint reward.
    pub fn calculate_holder_rewards(&self) -> (Address, U256) {
        let foundation_share = self.checkpoint_reward() * U256::from(REWARD_FOUNDATION_PERCENT) / U256::from(100);
        (self.config.foundation_wallet, foundation_share)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    fn calculator() -> RewardCalculator {
        RewardCalculator::new(XDPoSConfig {
            reward: 250_000_000_000_000_000_000,
            reward_checkpoint: 900,
            foundation_wallet: address!("0000000000000000000000000000000000000099"),
            ..XDPoSConfig::default()
        })
    }

    #[test]
    fn checkpoint_range_rejects_non_checkpoint_blocks() {
        let calc = calculator();
        assert!(calc.calculate_checkpoint_range(0).is_err());
        assert!(calc.calculate_checkpoint_range(901).is_err());
    }

    #[test]
    fn checkpoint_range_first_epoch() {
        let calc = calculator();
        let (start, end, epoch) = calc.calculate_checkpoint_range(900).unwrap();
        assert_eq!((start, end, epoch), (1, 899, 900));
    }

    #[test]
    fn checkpoint_range_later_epoch() {
        let calc = calculator();
        let (start, end, _) = calc.calculate_checkpoint_range(1800).unwrap();
        assert_eq!((start, end), (901, 1799));
    }

    #[test]
    fn rewards_split_proportionally_to_signature_count() {
        let calc = calculator();
        let signer_a = Address::with_last_byte(1);
        let signer_b = Address::with_last_byte(2);
        let mut counts = BTreeMap::new();
        counts.insert(signer_a, 600);
        counts.insert(signer_b, 300);

        let rewards = calc.calculate_rewards_per_signer(&counts, 900);
        let master_pool = calc.checkpoint_reward() * U256::from(REWARD_MASTER_PERCENT) / U256::from(100);

        let a_reward = rewards.iter().find(|(a, _)| *a == signer_a).unwrap().1;
        let b_reward = rewards.iter().find(|(a, _)| *a == signer_b).unwrap().1;
        assert_eq!(a_reward, master_pool * U256::from(600u64) / U256::from(900u64));
        assert_eq!(b_reward, master_pool * U256::from(300u64) / U256::from(900u64));
    }

    #[test]
    fn no_signatures_means_no_rewards() {
        let calc = calculator();
        assert!(calc.calculate_rewards_per_signer(&BTreeMap::new(), 0).is_empty());
    }

    #[test]
    fn foundation_reward_is_fixed_share() {
        let calc = calculator();
        let (wallet, reward) = calc.calculate_holder_rewards();
        assert_eq!(wallet, address!("0000000000000000000000000000000000000099"));
        assert_eq!(reward, calc.checkpoint_reward() * U256::from(REWARD_FOUNDATION_PERCENT) / U256::from(100));
    }
}
