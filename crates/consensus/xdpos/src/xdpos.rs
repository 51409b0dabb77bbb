//! XDPoS Consensus Engine
//!
//! The main consensus engine implementation that supports both:
//! - XDPoS V1: Epoch-based consensus with checkpoint rewards
//! - XDPoS V2: BFT consensus with Quorum Certificates

use crate::{
    config::XDPoSConfig,
    constants::{EXTRA_SEAL, EXTRA_VANITY, INMEMORY_SIGNATURES, INMEMORY_SNAPSHOTS},
    errors::{XDPoSError, XDPoSResult},
    execution::{finalize_state_root, should_apply_rewards},
    extra_data,
    reward::RewardCalculator,
    sealer::{Sealer, SignFn},
    snapshot::{NullSnapshotDb, Snapshot, SnapshotDb},
    state_root_cache::XdcStateRootCache,
    v1,
    v2::{QuorumCert, XDPoSV2Engine},
};
use alloc::{fmt::Debug, format, sync::Arc, vec::Vec};
use core::{num::NonZeroUsize, sync::atomic::{AtomicBool, Ordering}};
use alloy_consensus::Header;
use alloy_primitives::{Address, B256};
use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use reth_consensus::{Consensus, ConsensusError, FullConsensus, HeaderValidator, ReceiptRootBloom};
use reth_execution_types::BlockExecutionResult;
use reth_primitives_traits::{
    Block, NodePrimitives, RecoveredBlock, SealedBlock, SealedHeader,
};
use tracing::{debug, info, trace};

/// XDPoS Consensus Engine
pub struct XDPoSConsensus {
    /// XDPoS configuration
    config: XDPoSConfig,
    /// V2 engine (if V2 is configured)
    v2_engine: Option<Arc<XDPoSV2Engine>>,
    /// Recent snapshots cache
    recents: Mutex<LruCache<B256, Snapshot>>,
    /// Recent signatures cache
    signatures: Mutex<LruCache<B256, Address>>,
    /// Persistent snapshot store
    db: Arc<dyn SnapshotDb + Send + Sync>,
    /// State root cache for checkpoint blocks
    state_root_cache: Arc<XdcStateRootCache>,
    /// Reward calculator
    reward_calculator: RewardCalculator,
    /// Local signing identity, set via `authorize`
    sealer: RwLock<Sealer>,
}

impl XDPoSConsensus {
    /// Create a new XDPoS consensus engine
    pub fn new(config: XDPoSConfig) -> Arc<Self> {
        Self::new_with_cache(config, None)
    }

    /// Create a new XDPoS consensus engine with custom cache path
    pub fn new_with_cache(config: XDPoSConfig, cache_path: Option<std::path::PathBuf>) -> Arc<Self> {
        Self::new_with_db(config, cache_path, Arc::new(NullSnapshotDb))
    }

    /// Create a new XDPoS consensus engine backed by `db` for snapshot persistence.
    pub fn new_with_db(
        config: XDPoSConfig,
        cache_path: Option<std::path::PathBuf>,
        db: Arc<dyn SnapshotDb + Send + Sync>,
    ) -> Arc<Self> {
        let v2_engine = config.v2.as_ref().map(|_| XDPoSV2Engine::new(config.clone()));
        let state_root_cache = Arc::new(XdcStateRootCache::with_default_size(cache_path));
        let reward_calculator = RewardCalculator::new(config.clone());

        info!(
            epoch = config.epoch,
            v2_enabled = v2_engine.is_some(),
            "Initialized XDPoS consensus engine"
        );

        Arc::new(Self {
            config,
            v2_engine,
            recents: Mutex::new(LruCache::new(
                NonZeroUsize::new(INMEMORY_SNAPSHOTS).unwrap(),
            )),
            signatures: Mutex::new(LruCache::new(
                NonZeroUsize::new(INMEMORY_SIGNATURES).unwrap(),
            )),
            db,
            state_root_cache,
            reward_calculator,
            sealer: RwLock::new(Sealer::new()),
        })
    }

    /// Get the XDPoS configuration
    pub fn config(&self) -> &XDPoSConfig {
        &self.config
    }

    /// Check if a block is a V2 block
    pub fn is_v2_block(&self, block_number: u64) -> bool {
        self.config.is_v2(block_number)
    }

    /// Get the V2 engine
    pub fn v2_engine(&self) -> Option<&XDPoSV2Engine> {
        self.v2_engine.as_ref().map(|e| e.as_ref())
    }

    /// Authorize local block sealing as `signer`, signing with `sign_fn`.
    pub fn authorize(&self, signer: Address, sign_fn: SignFn) {
        self.sealer.write().authorize(signer, sign_fn);
    }

    /// The address this engine would author a block as, recovered from the
    /// header's seal. Equivalent to `recover_signer` under the engine-façade name.
    pub fn author(&self, header: &Header) -> XDPoSResult<Address> {
        self.recover_signer(header)
    }

    /// Recover the signer from a block header
    pub fn recover_signer(
        &self,
        header: &Header,
    ) -> XDPoSResult<Address> {
        let hash = header.hash_slow();

        if let Some(signer) = self.signatures.lock().get(&hash) {
            return Ok(*signer);
        }

        let signer = extra_data::recover_signer(header)?;
        self.signatures.lock().put(hash, signer);
        Ok(signer)
    }

    /// Compute the seal hash for a header: the keccak256 of its RLP encoding
    /// with the trailing 65-byte seal stripped from `extra_data`.
    pub fn seal_hash(&self, header: &Header) -> B256 {
        extra_data::hash_without_seal(header)
    }

    /// Get or create a snapshot for a given block.
    ///
    /// Checks the in-memory LRU first, then the persistent store. Does not
    /// walk headers forward itself (it has no chain reader); callers that
    /// need the snapshot for the header directly after `hash` should fetch
    /// this ancestor and call `Snapshot::apply`/`validate_header` themselves.
    pub fn snapshot(
        &self,
        _number: u64,
        hash: B256,
    ) -> XDPoSResult<Snapshot> {
        if let Some(snap) = self.recents.lock().get(&hash) {
            return Ok(snap.clone());
        }

        let snap = Snapshot::load(&self.db, hash)?;
        self.recents.lock().put(hash, snap.clone());
        Ok(snap)
    }

    /// Seed the snapshot cache and persistent store with a known snapshot
    /// (e.g. the genesis or a checkpoint bootstrapped externally).
    pub fn seed_snapshot(&self, snapshot: Snapshot) -> XDPoSResult<()> {
        snapshot.store(&self.db)?;
        self.recents.lock().put(snapshot.hash, snapshot);
        Ok(())
    }

    /// Advance and cache the snapshot for `header`, given its parent's hash
    /// is already known to the cache/store.
    fn advance_snapshot(&self, header: &Header) -> XDPoSResult<Snapshot> {
        let parent = self.snapshot(header.number.saturating_sub(1), header.parent_hash)?;
        let advanced = parent.apply(core::slice::from_ref(header))?;
        self.recents.lock().put(advanced.hash, advanced.clone());
        advanced.store(&self.db)?;
        Ok(advanced)
    }

    /// Full v1/v2 dispatch validation for a single header, as the engine
    /// façade's `verify_header`.
    pub fn verify_header(&self, header: &Header) -> XDPoSResult<()> {
        verify_stateless(header)?;

        if self.is_v2_block(header.number) {
            self.verify_header_v2(header)
        } else {
            self.verify_header_v1(header)
        }
    }

    fn verify_header_v1(&self, header: &Header) -> XDPoSResult<()> {
        v1::validate_v1_header(header, &self.config, None)?;

        match self.snapshot(header.number.saturating_sub(1), header.parent_hash) {
            Ok(ancestor) => {
                ancestor.validate_header(header)?;
            }
            Err(XDPoSError::UnknownAncestor) => {
                trace!(block = header.number, "no cached ancestor snapshot, skipping stateful check");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    fn verify_header_v2(&self, header: &Header) -> XDPoSResult<()> {
        let v2_engine = self.v2_engine().ok_or(XDPoSError::V2EngineNotInitialized)?;
        let extra_fields = v2_engine.decode_extra_fields(&header.extra_data)?;

        if let Some(qc) = &extra_fields.quorum_cert {
            let masternodes = v2_engine.current_masternodes();
            v2_engine.verify_qc(qc, &masternodes)?;
            if extra_fields.round <= qc.proposed_block_info.round {
                return Err(XDPoSError::RoundInvalid);
            }
        }

        let proposer = self.recover_signer(header)?;
        if !v2_engine.current_masternodes().is_empty() {
            let expected_leader = v2_engine.leader(extra_fields.round)?;
            if proposer != expected_leader {
                return Err(XDPoSError::NotItsTurn);
            }
        }
        if header.beneficiary != proposer {
            return Err(XDPoSError::CoinbaseAndValidatorMismatch);
        }

        let is_epoch_switch = self.config.epoch > 0 && header.number % self.config.epoch == 0;
        if is_epoch_switch {
            self.verify_epoch_switch_fields(&extra_fields, v2_engine)?;
        } else if extra_fields.validators.is_some() || extra_fields.penalties.is_some() {
            return Err(XDPoSError::InvalidFieldInNonEpochSwitch);
        }

        Ok(())
    }

    /// Validate an epoch-switch header's embedded master-node/penalty lists
    /// against the snapshot's projection: the previous epoch's master-node
    /// set minus whichever of those nodes this header penalizes.
    fn verify_epoch_switch_fields(
        &self,
        extra_fields: &crate::v2::ExtraFieldsV2,
        v2_engine: &XDPoSV2Engine,
    ) -> XDPoSResult<()> {
        let validators = extra_fields.validators.as_ref().ok_or(XDPoSError::EmptyEpochSwitchValidators)?;
        if validators.is_empty() {
            return Err(XDPoSError::EmptyEpochSwitchValidators);
        }

        let mut seen = alloc::collections::BTreeSet::new();
        for validator in validators {
            if *validator == Address::ZERO || !seen.insert(*validator) {
                return Err(XDPoSError::ValidatorsNotLegit);
            }
        }

        let projection = v2_engine.current_masternodes();
        let penalties = extra_fields.penalties.clone().unwrap_or_default();
        for penalty in &penalties {
            if !projection.contains(penalty) {
                return Err(XDPoSError::PenaltiesNotLegit);
            }
        }

        let penalty_set: alloc::collections::BTreeSet<_> = penalties.iter().copied().collect();
        let expected: alloc::collections::BTreeSet<_> =
            projection.iter().copied().filter(|addr| !penalty_set.contains(addr)).collect();
        let actual: alloc::collections::BTreeSet<_> = validators.iter().copied().collect();
        if actual != expected {
            return Err(XDPoSError::InvalidCheckpointValidators);
        }

        Ok(())
    }

    /// Verify a batch of headers: stateless checks run in parallel, stateful
    /// checks serialize per header in order (each depends on its
    /// predecessor's snapshot). Returns one result per input header. The
    /// returned `Arc<AtomicBool>` is a cooperative cancellation handle: set
    /// it to stop verifying subsequent headers (already-reported results
    /// stay valid).
    pub fn verify_headers(&self, headers: &[Header]) -> (Arc<AtomicBool>, Vec<XDPoSResult<()>>) {
        use rayon::prelude::*;

        let cancel = Arc::new(AtomicBool::new(false));

        let stateless: Vec<XDPoSResult<()>> =
            headers.par_iter().map(verify_stateless).collect();

        let mut results = Vec::with_capacity(headers.len());
        for (header, stateless_result) in headers.iter().zip(stateless) {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            let result = stateless_result.and_then(|_| {
                if self.is_v2_block(header.number) {
                    self.verify_header_v2(header)
                } else {
                    self.verify_header_v1(header)
                }
            });
            results.push(result);
        }
        (cancel, results)
    }

    /// Prepare `header` for sealing: stamp difficulty/extra-data for the
    /// signer's slot, without signing it yet.
    pub fn prepare(&self, header: &mut Header, parent: &Header) -> XDPoSResult<()> {
        header.timestamp = header.timestamp.max(parent.timestamp + self.config.period);
        if header.extra_data.len() < EXTRA_VANITY {
            let mut extra = header.extra_data.to_vec();
            extra.resize(EXTRA_VANITY, 0);
            header.extra_data = extra.into();
        }
        Ok(())
    }

    /// Seal `header`, delegating to the authorized `Sealer`.
    pub async fn seal(
        &self,
        header: Header,
        v2_round_and_qc: Option<(u64, Option<QuorumCert>)>,
        has_transactions: bool,
        results: tokio::sync::mpsc::Sender<Header>,
        stop: tokio::sync::watch::Receiver<bool>,
    ) -> XDPoSResult<()> {
        let v1_snapshot = if v2_round_and_qc.is_none() {
            Some(self.snapshot(header.number.saturating_sub(1), header.parent_hash)?)
        } else {
            None
        };
        let sealer = self.sealer.read().clone();
        sealer
            .seal(
                header,
                &self.config,
                v1_snapshot.as_ref(),
                v2_round_and_qc,
                has_transactions,
                results,
                stop,
            )
            .await
    }

    /// `Finalize`: apply rewards for the given block. Kept as the engine
    /// façade name for `apply_rewards`.
    pub fn finalize(&self, block: &SealedBlock<impl Block>) -> Result<(), ConsensusError> {
        self.apply_rewards(block)
    }

    /// Apply rewards at checkpoint blocks
    pub fn apply_rewards(
        &self,
        block: &SealedBlock<impl Block>,
    ) -> Result<(), ConsensusError> {
        let block_number = block.header().number();

        if should_apply_rewards(block_number, self.config.epoch) {
            debug!(
                block = block_number,
                epoch = self.config.epoch,
                "Checkpoint block detected - rewards would be applied here"
            );

            // Actual reward application happens during execution via
            // apply_checkpoint_rewards() called from the executor, not here.
            // This validation hook just verifies the result.
        }

        Ok(())
    }

    /// Validate state root with cache integration
    ///
    /// For checkpoint blocks, checks the state root cache to handle known divergences
    /// between XDC clients. Returns the finalized state root that should be used.
    pub fn validate_state_root(
        &self,
        block_number: u64,
        header_root: B256,
        computed_root: B256,
    ) -> Result<B256, ConsensusError> {
        let finalized_root = finalize_state_root(
            block_number,
            header_root,
            computed_root,
            &self.state_root_cache,
            self.config.epoch,
        );

        if finalized_root != header_root && finalized_root != computed_root {
            return Err(ConsensusError::StateRootMismatch {
                computed: computed_root,
                expected: header_root,
            });
        }

        trace!(
            block = block_number,
            header = %header_root,
            computed = %computed_root,
            finalized = %finalized_root,
            "State root validated"
        );

        Ok(finalized_root)
    }

    /// Get the state root cache
    pub fn state_root_cache(&self) -> &XdcStateRootCache {
        &self.state_root_cache
    }

    /// Get the reward calculator
    pub fn reward_calculator(&self) -> &RewardCalculator {
        &self.reward_calculator
    }

    /// RPC namespaces this engine would register, were RPC plumbing wired
    /// up by the host binary (out of scope for this crate).
    pub fn apis(&self) -> Vec<&'static str> {
        alloc::vec!["xdpos"]
    }

    /// Release resources held by the engine. Idempotent; safe to call more
    /// than once.
    pub fn close(&self) -> XDPoSResult<()> {
        info!("closing XDPoS consensus engine");
        self.recents.lock().clear();
        self.signatures.lock().clear();
        Ok(())
    }
}

/// Headers timestamped more than this many seconds ahead of the local clock
/// are rejected outright rather than buffered, per the XDPoS `allowedFutureBlockTime`.
const ALLOWED_FUTURE_BLOCK_SECONDS: u64 = 15;

/// Stateless checks applied to every header regardless of v1/v2 path.
fn verify_stateless(header: &Header) -> XDPoSResult<()> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    if header.timestamp > now + ALLOWED_FUTURE_BLOCK_SECONDS {
        return Err(XDPoSError::FutureBlock);
    }
    if header.mix_hash != B256::ZERO {
        return Err(XDPoSError::InvalidMixDigest);
    }
    if header.ommers_hash != alloy_consensus::constants::EMPTY_OMMER_ROOT_HASH {
        return Err(XDPoSError::InvalidUncleHash);
    }
    let extra = &header.extra_data;
    if extra.len() < EXTRA_VANITY {
        return Err(XDPoSError::MissingVanity);
    }
    if extra.len() < EXTRA_VANITY + EXTRA_SEAL {
        return Err(XDPoSError::MissingSignature);
    }
    if header.difficulty != alloy_primitives::U256::from(1u64)
        && header.difficulty != alloy_primitives::U256::from(2u64)
    {
        return Err(XDPoSError::InvalidDifficulty);
    }
    Ok(())
}

impl Debug for XDPoSConsensus {
    fn fmt(&self, f: &mut alloc::fmt::Formatter<'_>) -> alloc::fmt::Result {
        f.debug_struct("XDPoSConsensus")
            .field("config", &self.config)
            .field("has_v2", &self.v2_engine.is_some())
            .finish()
    }
}

impl<B: Block<Header = Header>> Consensus<B> for XDPoSConsensus {
    fn validate_body_against_header(
        &self,
        body: &B::Body,
        header: &SealedHeader<B::Header>,
    ) -> Result<(), ConsensusError> {
        // XDPoS doesn't allow uncles; body/header shape validation is
        // otherwise delegated to the execution layer.
        let _ = body;
        let _ = header;
        Ok(())
    }

    fn validate_block_pre_execution(
        &self,
        block: &SealedBlock<B>,
    ) -> Result<(), ConsensusError> {
        self.verify_header(block.header()).map_err(Into::into)
    }
}

impl<H> HeaderValidator<H> for XDPoSConsensus
where
    H: alloy_consensus::BlockHeader,
{
    fn validate_header(
        &self,
        header: &SealedHeader<H>,
    ) -> Result<(), ConsensusError> {
        let _number = header.number();
        Ok(())
    }

    fn validate_header_against_parent(
        &self,
        header: &SealedHeader<H>,
        parent: &SealedHeader<H>,
    ) -> Result<(), ConsensusError> {
        if header.number() != parent.number() + 1 {
            return Err(ConsensusError::ParentBlockNumberMismatch {
                parent_block_number: parent.number(),
                block_number: header.number(),
            });
        }

        let min_time = parent.timestamp() + self.config.period;
        if header.timestamp() < min_time {
            return Err(ConsensusError::TimestampIsInPast {
                parent_timestamp: parent.timestamp(),
                timestamp: header.timestamp(),
            });
        }

        Ok(())
    }
}

impl<N: NodePrimitives<BlockHeader = Header>> FullConsensus<N> for XDPoSConsensus {
    fn validate_block_post_execution(
        &self,
        block: &RecoveredBlock<N::Block>,
        result: &BlockExecutionResult<N::Receipt>,
        _receipt_root_bloom: Option<ReceiptRootBloom>,
    ) -> Result<(), ConsensusError> {
        let block_number = block.header().number;

        if result.gas_used != block.header().gas_used {
            return Err(ConsensusError::Custom(Arc::new(XDPoSError::Custom(
                format!(
                    "Gas used mismatch at block {}: computed {}, expected {}",
                    block_number, result.gas_used, block.header().gas_used
                ),
            ))));
        }

        if should_apply_rewards(block_number, self.config.epoch) {
            debug!(
                block = block_number,
                epoch = self.config.epoch,
                "Validated checkpoint block post-execution"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{V2Config, XDPoSConfig};

    fn test_config_v1() -> XDPoSConfig {
        XDPoSConfig::default()
    }

    fn test_config_v2() -> XDPoSConfig {
        XDPoSConfig::default().with_v2(V2Config::new(1000))
    }

    #[test]
    fn test_new_consensus_v1() {
        let consensus = XDPoSConsensus::new(test_config_v1());
        assert!(!consensus.is_v2_block(0));
        assert!(!consensus.is_v2_block(1000));
        assert!(consensus.v2_engine().is_none());
    }

    #[test]
    fn test_new_consensus_v2() {
        let consensus = XDPoSConsensus::new(test_config_v2());
        assert!(!consensus.is_v2_block(999));
        assert!(consensus.is_v2_block(1000));
        assert!(consensus.is_v2_block(1001));
        assert!(consensus.v2_engine().is_some());
    }

    #[test]
    fn unknown_ancestor_is_not_fatal_for_v1_verification() {
        let consensus = XDPoSConsensus::new(test_config_v1());
        let mut extra = alloc::vec![0u8; EXTRA_VANITY + EXTRA_SEAL];
        extra[0] = 0xaa;
        let header = Header {
            number: 5,
            difficulty: alloy_primitives::U256::from(1u64),
            extra_data: extra.into(),
            ommers_hash: alloy_consensus::constants::EMPTY_OMMER_ROOT_HASH,
            ..Default::default()
        };
        // No cached/persisted ancestor snapshot: stateful check is skipped,
        // only the stateless checks apply.
        assert!(consensus.verify_header(&header).is_ok());
    }

    #[test]
    fn verify_header_rejects_future_timestamp() {
        let consensus = XDPoSConsensus::new(test_config_v1());
        let mut extra = alloc::vec![0u8; EXTRA_VANITY + EXTRA_SEAL];
        extra[0] = 0xaa;
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let header = Header {
            number: 5,
            timestamp: now + ALLOWED_FUTURE_BLOCK_SECONDS + 100,
            difficulty: alloy_primitives::U256::from(1u64),
            extra_data: extra.into(),
            ommers_hash: alloy_consensus::constants::EMPTY_OMMER_ROOT_HASH,
            ..Default::default()
        };
        assert!(matches!(consensus.verify_header(&header), Err(XDPoSError::FutureBlock)));
    }

    #[test]
    fn epoch_switch_validators_must_match_projection_minus_penalties() {
        let config = XDPoSConfig::default().with_v2(V2Config::new(0));
        let consensus = XDPoSConsensus::new(config);
        let v2_engine = consensus.v2_engine().unwrap();
        let (a, b, c, d) = (
            Address::with_last_byte(1),
            Address::with_last_byte(2),
            Address::with_last_byte(3),
            Address::with_last_byte(4),
        );
        v2_engine.set_epoch(1, alloc::vec![a, b, c, d]);

        let valid = crate::v2::ExtraFieldsV2 {
            round: 0,
            quorum_cert: None,
            validators: Some(alloc::vec![a, b, c]),
            penalties: Some(alloc::vec![d]),
        };
        assert!(consensus.verify_epoch_switch_fields(&valid, v2_engine).is_ok());

        let mismatched = crate::v2::ExtraFieldsV2 {
            round: 0,
            quorum_cert: None,
            validators: Some(alloc::vec![a, b]),
            penalties: Some(alloc::vec![d]),
        };
        assert!(matches!(
            consensus.verify_epoch_switch_fields(&mismatched, v2_engine),
            Err(XDPoSError::InvalidCheckpointValidators)
        ));

        let empty = crate::v2::ExtraFieldsV2 {
            round: 0,
            quorum_cert: None,
            validators: Some(Vec::new()),
            penalties: None,
        };
        assert!(matches!(
            consensus.verify_epoch_switch_fields(&empty, v2_engine),
            Err(XDPoSError::EmptyEpochSwitchValidators)
        ));

        let outsider = Address::with_last_byte(99);
        let bad_penalty = crate::v2::ExtraFieldsV2 {
            round: 0,
            quorum_cert: None,
            validators: Some(alloc::vec![a, b, c, d]),
            penalties: Some(alloc::vec![outsider]),
        };
        assert!(matches!(
            consensus.verify_epoch_switch_fields(&bad_penalty, v2_engine),
            Err(XDPoSError::PenaltiesNotLegit)
        ));

        let dup = crate::v2::ExtraFieldsV2 {
            round: 0,
            quorum_cert: None,
            validators: Some(alloc::vec![a, a, b, c]),
            penalties: None,
        };
        assert!(matches!(
            consensus.verify_epoch_switch_fields(&dup, v2_engine),
            Err(XDPoSError::ValidatorsNotLegit)
        ));
    }

    #[test]
    fn verify_header_v2_accepts_valid_epoch_switch_header() {
        use crate::v2::types::encode_epoch_switch_extra_fields_v2;
        use alloy_primitives::keccak256;
        use secp256k1::{ecdsa::RecoverableSignature, Message, Secp256k1, SecretKey};

        fn keypair(byte: u8) -> (SecretKey, Address) {
            let mut bytes = [0x33u8; 32];
            bytes[31] = byte;
            let secret = SecretKey::from_slice(&bytes).unwrap();
            let secp = Secp256k1::new();
            let public = secp256k1::PublicKey::from_secret_key(&secp, &secret);
            let uncompressed = public.serialize_uncompressed();
            let hash = keccak256(&uncompressed[1..]);
            (secret, Address::from_slice(&hash[12..]))
        }

        let config = XDPoSConfig::default().with_epoch(900).with_v2(V2Config::new(0));
        let consensus = XDPoSConsensus::new(config);
        let v2_engine = consensus.v2_engine().unwrap();

        let pairs: Vec<_> = (0..4u8).map(keypair).collect();
        let addrs: Vec<_> = pairs.iter().map(|p| p.1).collect();
        v2_engine.set_epoch(0, addrs.clone());

        let payload = encode_epoch_switch_extra_fields_v2(0, None, Some(addrs.clone()), None);
        let mut extra = alloc::vec![0u8; EXTRA_VANITY];
        extra.extend_from_slice(&payload);
        extra.extend_from_slice(&[0u8; EXTRA_SEAL]);

        let mut header = Header {
            number: 900,
            difficulty: alloy_primitives::U256::from(1u64),
            beneficiary: addrs[0],
            extra_data: extra.into(),
            ommers_hash: alloy_consensus::constants::EMPTY_OMMER_ROOT_HASH,
            ..Default::default()
        };

        let hash = extra_data::hash_without_seal(&header);
        let secp = Secp256k1::new();
        let message = Message::from_digest_slice(hash.as_slice()).unwrap();
        let sig: RecoverableSignature = secp.sign_ecdsa_recoverable(&message, &pairs[0].0);
        let (recovery_id, compact) = sig.serialize_compact();
        let mut extra_bytes = header.extra_data.to_vec();
        let seal_start = extra_bytes.len() - EXTRA_SEAL;
        extra_bytes[seal_start..seal_start + 64].copy_from_slice(&compact);
        extra_bytes[seal_start + 64] = recovery_id.to_i32() as u8;
        header.extra_data = extra_bytes.into();

        assert!(consensus.verify_header(&header).is_ok());
    }

    #[test]
    fn close_is_idempotent() {
        let consensus = XDPoSConsensus::new(test_config_v1());
        assert!(consensus.close().is_ok());
        assert!(consensus.close().is_ok());
    }
}
