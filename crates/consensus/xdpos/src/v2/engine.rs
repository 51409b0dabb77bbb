//! XDPoS V2 Engine Implementation
//!
//! This module implements the V2 BFT consensus engine: decoding the v2
//! extra-data payload, verifying Quorum/Timeout Certificates, tracking
//! round/epoch state, and driving round progression from incoming votes,
//! timeouts and sync-info messages.

use crate::{
    config::XDPoSConfig,
    errors::{XDPoSError, XDPoSResult},
    v2::{
        pool::AttestationPool, proposer, verification, BlockInfo, EpochSwitchInfo, ExtraFieldsV2,
        QuorumCert, Round, TimeoutCert, Vote, Timeout,
    },
};
use alloc::{format, sync::Arc, vec::Vec};
use alloy_primitives::{Address, B256};
use parking_lot::RwLock;
use tracing::{debug, info};

/// XDPoS V2 Engine
pub struct XDPoSV2Engine {
    config: XDPoSConfig,
    state: RwLock<V2State>,
    votes: AttestationPool<Vote>,
    timeouts: AttestationPool<Timeout>,
}

/// Internal state for V2 engine
#[derive(Debug, Clone, Default)]
struct V2State {
    /// Current round
    current_round: Round,
    /// Current epoch number
    current_epoch: u64,
    /// Highest known QC
    highest_quorum_cert: Option<QuorumCert>,
    /// Highest known TC
    highest_timeout_cert: Option<TimeoutCert>,
    /// Locked QC (for safety)
    lock_quorum_cert: Option<QuorumCert>,
    /// Highest committed block
    highest_commit_block: Option<BlockInfo>,
    /// Master-node set for the current epoch, in canonical order
    current_masternodes: Vec<Address>,
}

impl XDPoSV2Engine {
    /// Create a new V2 engine
    pub fn new(config: XDPoSConfig) -> Arc<Self> {
        let threshold = config.v2.as_ref().map(|v2| v2.cert_threshold_for(0)).unwrap_or(1);
        Arc::new(Self {
            config,
            state: RwLock::new(V2State::default()),
            votes: AttestationPool::new(threshold),
            timeouts: AttestationPool::new(threshold),
        })
    }

    /// Check if a block is a V2 block
    pub fn is_v2_block(&self, block_number: u64) -> bool {
        self.config.is_v2(block_number)
    }

    /// Get current round
    pub fn current_round(&self) -> Round {
        self.state.read().current_round
    }

    /// Get current epoch
    pub fn current_epoch(&self) -> u64 {
        self.state.read().current_epoch
    }

    /// Current master-node set for the active epoch.
    pub fn current_masternodes(&self) -> Vec<Address> {
        self.state.read().current_masternodes.clone()
    }

    /// Highest quorum certificate observed so far.
    pub fn highest_quorum_cert(&self) -> Option<QuorumCert> {
        self.state.read().highest_quorum_cert.clone()
    }

    /// Highest timeout certificate observed so far.
    pub fn highest_timeout_cert(&self) -> Option<TimeoutCert> {
        self.state.read().highest_timeout_cert.clone()
    }

    fn cert_threshold(&self, n: usize) -> usize {
        self.config.v2.as_ref().map(|v2| v2.cert_threshold_for(n)).unwrap_or(2 * n / 3 + 1)
    }

    /// Adopt a new epoch's master-node set, recomputed from the checkpoint
    /// header's embedded validator list. Resets the attestation pools'
    /// threshold to match the new committee size.
    pub fn set_epoch(&self, epoch: u64, masternodes: Vec<Address>) {
        let threshold = self.cert_threshold(masternodes.len());
        let mut state = self.state.write();
        state.current_epoch = epoch;
        state.current_masternodes = masternodes;
        drop(state);
        self.votes.set_threshold(threshold);
        self.timeouts.set_threshold(threshold);
        info!(epoch, threshold, "adopted new V2 epoch masternode set");
    }

    /// At the v1/v2 switchover block, seed the initial master-node set from
    /// the v1 snapshot's signers (per the dual-path-dispatch design note).
    pub fn adopt_v1_signers(&self, signers: Vec<Address>) {
        self.set_epoch(0, signers);
    }

    /// Leader for `round`: `currentMasternodes[round mod |currentMasternodes|]`.
    pub fn leader(&self, round: Round) -> XDPoSResult<Address> {
        let state = self.state.read();
        proposer::select_proposer(round, &state.current_masternodes)
    }

    /// Decode V2 extra fields from a header's full `extra_data`
    /// (vanity ‖ `0x02` ‖ RLP(round, qc) ‖ seal).
    pub fn decode_extra_fields(&self, extra: &[u8]) -> XDPoSResult<ExtraFieldsV2> {
        const EXTRA_VANITY: usize = 32;
        const EXTRA_SEAL: usize = 65;

        if extra.len() < EXTRA_VANITY + EXTRA_SEAL {
            return Err(XDPoSError::ExtraDataTooShort);
        }
        let payload = &extra[EXTRA_VANITY..extra.len() - EXTRA_SEAL];
        let decoded = crate::v2::types::decode_extra_fields_v2(payload)
            .map_err(XDPoSError::InvalidV2Extra)?;
        Ok(ExtraFieldsV2 {
            round: decoded.round,
            quorum_cert: decoded.quorum_cert,
            validators: decoded.validators,
            penalties: decoded.penalties,
        })
    }

    /// Verify a Quorum Certificate against the given master-node set.
    pub fn verify_qc(&self, qc: &QuorumCert, masternodes: &[Address]) -> XDPoSResult<()> {
        let min_signatures = self.cert_threshold(masternodes.len());
        verification::verify_qc(qc, masternodes, min_signatures)
    }

    /// Verify a Timeout Certificate against the given master-node set.
    pub fn verify_tc(&self, tc: &TimeoutCert, masternodes: &[Address]) -> XDPoSResult<()> {
        let min_signatures = self.cert_threshold(masternodes.len());
        verification::verify_tc(tc, masternodes, min_signatures)
    }

    /// Get epoch switch info for a block. Populated by the header
    /// verifier from the checkpoint header's embedded validator/penalty
    /// lists; the engine itself holds no chain-reading capability.
    pub fn get_epoch_switch_info(&self, _block_hash: B256) -> XDPoSResult<EpochSwitchInfo> {
        Err(XDPoSError::Custom("epoch switch info requires a chain reader".into()))
    }

    /// Handle an incoming vote. On threshold, assembles and adopts a QC,
    /// advancing `current_round`, and returns it.
    pub fn handle_vote(&self, vote: Vote) -> XDPoSResult<Option<QuorumCert>> {
        let vote_for_sign = crate::v2::VoteForSign {
            proposed_block_info: vote.proposed_block_info.clone(),
            gap_number: vote.gap_number,
        };
        let sig_hash = crate::v2::types::vote_sig_hash(&vote_for_sign);
        let signer = verification::recover_signer(&sig_hash, &vote.signature)?;

        let (current_round, masternodes) = {
            let state = self.state.read();
            (state.current_round, state.current_masternodes.clone())
        };

        if !masternodes.contains(&signer) {
            return Err(XDPoSError::ValidatorNotWithinMasternodes);
        }

        let incoming = vote.proposed_block_info.round;
        let threshold_sync = self.config.v2.as_ref().map(|v2| v2.timeout_sync_threshold).unwrap_or(5);
        if incoming.abs_diff(current_round) > threshold_sync {
            return Err(XDPoSError::IncomingMessageRoundTooFarFromCurrentRound {
                kind: "vote",
                incoming,
                current: current_round,
            });
        }
        if incoming != current_round {
            return Err(XDPoSError::IncomingMessageRoundNotEqualCurrentRound {
                kind: "vote",
                incoming,
                current: current_round,
            });
        }

        let mut annotated = vote;
        annotated.set_signer(signer);
        let (reached, count, bucket) = self.votes.add(annotated);
        debug!(round = incoming, count, reached, "vote recorded");
        if !reached {
            return Ok(None);
        }

        let threshold = self.votes.threshold();
        let qc = assemble_qc(bucket, threshold)?;
        self.adopt_qc(qc.clone());
        Ok(Some(qc))
    }

    /// Handle an incoming timeout. On threshold, assembles and adopts a TC,
    /// advancing `current_round`, and returns it.
    pub fn handle_timeout(&self, timeout: Timeout) -> XDPoSResult<Option<TimeoutCert>> {
        let timeout_for_sign =
            crate::v2::TimeoutForSign { round: timeout.round, gap_number: timeout.gap_number };
        let sig_hash = crate::v2::types::timeout_sig_hash(&timeout_for_sign);
        let signer = verification::recover_signer(&sig_hash, &timeout.signature)?;

        let (current_round, masternodes) = {
            let state = self.state.read();
            (state.current_round, state.current_masternodes.clone())
        };

        if !masternodes.contains(&signer) {
            return Err(XDPoSError::ValidatorNotWithinMasternodes);
        }

        let incoming = timeout.round;
        let threshold_sync = self.config.v2.as_ref().map(|v2| v2.timeout_sync_threshold).unwrap_or(5);
        if incoming.abs_diff(current_round) > threshold_sync {
            return Err(XDPoSError::IncomingMessageRoundTooFarFromCurrentRound {
                kind: "timeout",
                incoming,
                current: current_round,
            });
        }
        if incoming != current_round {
            return Err(XDPoSError::IncomingMessageRoundNotEqualCurrentRound {
                kind: "timeout",
                incoming,
                current: current_round,
            });
        }

        let mut annotated = timeout;
        annotated.set_signer(signer);
        let (reached, count, bucket) = self.timeouts.add(annotated);
        debug!(round = incoming, count, reached, "timeout recorded");
        if !reached {
            return Ok(None);
        }

        let threshold = self.timeouts.threshold();
        let tc = assemble_tc(bucket, threshold)?;
        self.adopt_tc(tc.clone());
        self.timeouts.clear_by_pool_key(&format!("{incoming}:{}", tc.gap_number));
        Ok(Some(tc))
    }

    /// Handle a peer's sync-info message: adopt their QC if it is ahead of ours.
    pub fn handle_sync_info(&self, sync: &crate::v2::SyncInfo) -> XDPoSResult<()> {
        let should_adopt = {
            let state = self.state.read();
            match &state.highest_quorum_cert {
                Some(current) => sync.highest_quorum_cert.proposed_block_info.round > current.proposed_block_info.round,
                None => true,
            }
        };
        if should_adopt {
            self.adopt_qc(sync.highest_quorum_cert.clone());
        }
        if let Some(tc) = &sync.highest_timeout_cert {
            let should_adopt_tc = {
                let state = self.state.read();
                match &state.highest_timeout_cert {
                    Some(current) => tc.round > current.round,
                    None => true,
                }
            };
            if should_adopt_tc {
                self.adopt_tc(tc.clone());
            }
        }
        Ok(())
    }

    fn adopt_qc(&self, qc: QuorumCert) {
        let mut state = self.state.write();
        let round = qc.proposed_block_info.round;
        let replace = state.highest_quorum_cert.as_ref().is_none_or(|h| round > h.proposed_block_info.round);
        if replace {
            state.highest_quorum_cert = Some(qc);
        }
        state.current_round = state.current_round.max(round + 1);
        debug!(new_round = state.current_round, "advanced round via QC");
    }

    fn adopt_tc(&self, tc: TimeoutCert) {
        let mut state = self.state.write();
        let round = tc.round;
        let replace = state.highest_timeout_cert.as_ref().is_none_or(|h| round > h.round);
        if replace {
            state.highest_timeout_cert = Some(tc);
        }
        state.current_round = state.current_round.max(round + 1);
        debug!(new_round = state.current_round, "advanced round via TC");
    }

    /// Discard pool buckets whose round trails `current_round` by more than
    /// `pool_hygiene_round`, run on the periodic job tick.
    pub fn run_pool_hygiene(&self) {
        let (current_round, window) = {
            let state = self.state.read();
            (state.current_round, self.config.v2.as_ref().map(|v2| v2.pool_hygiene_round).unwrap_or(10))
        };
        let min_round = current_round.saturating_sub(window);
        let round_of = |key: &str| key.split(':').next().and_then(|s| s.parse::<u64>().ok());
        for key in self.votes.stale_keys(min_round, round_of) {
            self.votes.clear_by_pool_key(&key);
        }
        for key in self.timeouts.stale_keys(min_round, round_of) {
            self.timeouts.clear_by_pool_key(&key);
        }
    }
}

/// Assemble a QC from a pool bucket: the first `threshold` signatures in
/// ascending signer-address order, for canonical certificate equality.
fn assemble_qc(bucket: hashbrown::HashMap<B256, Vote>, threshold: usize) -> XDPoSResult<QuorumCert> {
    let mut entries: Vec<Vote> = bucket.into_values().collect();
    entries.sort_by_key(|v| v.signer().unwrap_or(Address::ZERO));
    let sample = entries.first().ok_or(XDPoSError::MissingBlockInfo)?;
    let mut qc = QuorumCert::new(sample.proposed_block_info.clone(), sample.gap_number);
    for vote in entries.into_iter().take(threshold) {
        qc.add_signature(vote.signature);
    }
    Ok(qc)
}

/// Assemble a TC from a pool bucket: the first `threshold` signatures in
/// ascending signer-address order.
fn assemble_tc(bucket: hashbrown::HashMap<B256, Timeout>, threshold: usize) -> XDPoSResult<TimeoutCert> {
    let mut entries: Vec<Timeout> = bucket.into_values().collect();
    entries.sort_by_key(|t| t.signer().unwrap_or(Address::ZERO));
    let sample = entries.first().ok_or(XDPoSError::MissingBlockInfo)?;
    let mut tc = TimeoutCert::new(sample.round, sample.gap_number);
    for timeout in entries.into_iter().take(threshold) {
        tc.add_signature(timeout.signature);
    }
    Ok(tc)
}
