//! XDPoS V1 Voting Snapshot
//!
//! A `Snapshot` is the authoritative, pure-function state of permitted block
//! signers at a given `(number, hash)`. It is advanced by walking a
//! contiguous run of headers forward (`apply`), each of which may cast a
//! vote to add or remove a signer via its nonce/coinbase fields.

use crate::{
    constants::{EXTRA_SEAL, EXTRA_VANITY},
    errors::{XDPoSError, XDPoSResult},
    extra_data::recover_signer,
};
use alloc::{
    collections::{BTreeMap, BTreeSet},
    format,
    string::String,
    vec::Vec,
};
use alloy_consensus::Header;
use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// All-ones nonce: casts an authorize vote for `header.beneficiary`.
pub const NONCE_AUTHORIZE: [u8; 8] = [0xff; 8];
/// All-zero nonce: casts a deauthorize vote for `header.beneficiary`.
pub const NONCE_DEAUTHORIZE: [u8; 8] = [0; 8];

/// A single cast vote, recorded in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Signer who cast the vote.
    pub signer: Address,
    /// Block number when the vote was cast.
    pub block: u64,
    /// Address being voted on (the header's beneficiary/coinbase).
    pub address: Address,
    /// `true` to authorize, `false` to deauthorize.
    pub authorize: bool,
}

/// Running tally for a single vote subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Whether the majority of current votes authorize (vs. deauthorize).
    pub authorize: bool,
    /// Number of votes cast for this subject.
    pub votes: usize,
}

/// Pure-function snapshot of v1 signer authorization at `(number, hash)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Epoch length this snapshot was built with (not part of the legacy
    /// JSON shape persisted upstream, but needed to replay `apply`).
    #[serde(default = "default_epoch_length")]
    epoch_length: u64,
    /// Block number of the snapshot.
    pub number: u64,
    /// Block hash of the snapshot.
    pub hash: B256,
    /// Set of authorized signers.
    pub signers: BTreeSet<Address>,
    /// Recent signers for anti-spam (block number => signer).
    pub recents: BTreeMap<u64, Address>,
    /// Votes cast since the last epoch reset, in arrival order.
    pub votes: Vec<Vote>,
    /// Vote tally per subject address.
    pub tally: BTreeMap<Address, Tally>,
}

fn default_epoch_length() -> u64 {
    900
}

/// External key-value store the core consumes for snapshot persistence.
/// Narrow interface only: the actual storage engine is out of scope.
pub trait SnapshotDb {
    /// Fetch the raw bytes stored under `key`, if any.
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
    /// Store `value` under `key`.
    fn put(&self, key: &[u8], value: &[u8]);
}

/// Build the persistence key `"XDPoS-" || hash` for a snapshot.
pub fn snapshot_key(hash: B256) -> String {
    format!("XDPoS-{hash:x}")
}

impl SnapshotDb for alloc::sync::Arc<dyn SnapshotDb + Send + Sync> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        (**self).get(key)
    }
    fn put(&self, key: &[u8], value: &[u8]) {
        (**self).put(key, value)
    }
}

/// A `SnapshotDb` that stores nothing; the default when no persistent KV
/// store has been wired in, per the core's narrow external-collaborator
/// interface (the storage engine itself is out of scope).
#[derive(Debug, Default)]
pub struct NullSnapshotDb;

impl SnapshotDb for NullSnapshotDb {
    fn get(&self, _key: &[u8]) -> Option<Vec<u8>> {
        None
    }
    fn put(&self, _key: &[u8], _value: &[u8]) {}
}

impl Snapshot {
    /// Create a new snapshot seeded with an explicit signer set.
    pub fn new(epoch_length: u64, number: u64, hash: B256, signers: Vec<Address>) -> Self {
        Self {
            epoch_length,
            number,
            hash,
            signers: signers.into_iter().collect(),
            recents: BTreeMap::new(),
            votes: Vec::new(),
            tally: BTreeMap::new(),
        }
    }

    /// Load a previously stored snapshot for `hash` from `db`.
    pub fn load(db: &impl SnapshotDb, hash: B256) -> XDPoSResult<Self> {
        let key = snapshot_key(hash);
        let raw = db.get(key.as_bytes()).ok_or(XDPoSError::UnknownAncestor)?;
        serde_json::from_slice(&raw)
            .map_err(|e| XDPoSError::Custom(format!("failed to decode snapshot: {e}")))
    }

    /// Persist this snapshot under its own hash.
    pub fn store(&self, db: &impl SnapshotDb) -> XDPoSResult<()> {
        let key = snapshot_key(self.hash);
        let raw = serde_json::to_vec(self)
            .map_err(|e| XDPoSError::Custom(format!("failed to encode snapshot: {e}")))?;
        db.put(key.as_bytes(), &raw);
        Ok(())
    }

    /// Deep copy, required before calling `apply` so the original remains
    /// usable (callers typically keep the pre-`apply` snapshot cached).
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Window size for the recent-signer anti-spam rule.
    fn window(&self) -> u64 {
        self.signers.len() as u64 / 2 + 1
    }

    /// Sorted list of currently authorized signers.
    pub fn signers(&self) -> Vec<Address> {
        self.signers.iter().copied().collect()
    }

    /// `true` iff `signer` is the in-turn signer for `block_number`.
    pub fn inturn(&self, block_number: u64, signer: &Address) -> bool {
        let signers = self.signers();
        if signers.is_empty() {
            return false;
        }
        let turn = (block_number % signers.len() as u64) as usize;
        signers[turn] == *signer
    }

    /// Validate `header` against this (pre-apply) snapshot without advancing
    /// it: the recovered signer must be a current signer, outside the
    /// recency window, and `header.difficulty` must match the in-turn
    /// expectation (`2` if in-turn, `1` otherwise). Returns the recovered
    /// signer on success.
    pub fn validate_header(&self, header: &Header) -> XDPoSResult<Address> {
        let signer = recover_signer(header)?;
        if !self.signers.contains(&signer) {
            return Err(XDPoSError::Unauthorized);
        }
        if self.recents.values().any(|s| *s == signer) {
            return Err(XDPoSError::Unauthorized);
        }
        let expected = if self.inturn(header.number, &signer) { 2u64 } else { 1u64 };
        if header.difficulty != alloy_primitives::U256::from(expected) {
            return Err(XDPoSError::InvalidDifficulty);
        }
        Ok(signer)
    }

    /// Apply a contiguous run of headers starting at `self.number + 1`,
    /// returning the advanced snapshot. `self` is left untouched; callers
    /// pass `&snapshot.copy()` when they need to retain the original.
    pub fn apply(&self, headers: &[Header]) -> XDPoSResult<Self> {
        if headers.is_empty() {
            return Ok(self.clone());
        }
        for (i, header) in headers.iter().enumerate() {
            let expected = self.number + 1 + i as u64;
            if header.number != expected {
                return Err(XDPoSError::InvalidVotingChain);
            }
        }

        let mut snap = self.clone();
        for header in headers {
            snap.apply_one(header)?;
        }
        snap.number = headers.last().expect("checked non-empty above").number;
        snap.hash = headers.last().expect("checked non-empty above").hash_slow();
        Ok(snap)
    }

    fn apply_one(&mut self, header: &Header) -> XDPoSResult<()> {
        let number = header.number;
        let checkpoint = self.epoch_length != 0 && number % self.epoch_length == 0;

        if checkpoint {
            debug!(block = number, "epoch checkpoint: resetting votes and tally");
            self.votes.clear();
            self.tally.clear();

            if header.beneficiary != Address::ZERO {
                return Err(XDPoSError::InvalidCheckpointBeneficiary);
            }
            if header.nonce.as_slice() != NONCE_DEAUTHORIZE {
                return Err(XDPoSError::InvalidCheckpointVote);
            }

            let extra = &header.extra_data;
            if extra.len() < EXTRA_VANITY + EXTRA_SEAL {
                return Err(XDPoSError::MissingVanity);
            }
            let body = &extra[EXTRA_VANITY..extra.len() - EXTRA_SEAL];
            if body.len() % 20 != 0 {
                return Err(XDPoSError::InvalidCheckpointSigners);
            }
            let embedded: BTreeSet<Address> =
                body.chunks_exact(20).map(Address::from_slice).collect();
            if embedded != self.signers {
                return Err(XDPoSError::InvalidCheckpointSigners);
            }
        }

        let window = self.window();
        if number >= window {
            self.recents.remove(&(number - window));
        }

        let signer = recover_signer(header)?;
        if !self.signers.contains(&signer) {
            warn!(?signer, block = number, "unauthorized signer");
            return Err(XDPoSError::Unauthorized);
        }
        if self.recents.values().any(|s| *s == signer) {
            warn!(?signer, block = number, "signer within recency window");
            return Err(XDPoSError::Unauthorized);
        }
        self.recents.insert(number, signer);

        if let Some(pos) = self
            .votes
            .iter()
            .position(|v| v.signer == signer && v.address == header.beneficiary)
        {
            let prior = self.votes.remove(pos);
            self.uncast(prior.address, prior.authorize);
        }

        let authorize = match header.nonce.as_slice() {
            s if s == NONCE_AUTHORIZE => true,
            s if s == NONCE_DEAUTHORIZE => false,
            _ => return Err(XDPoSError::InvalidVote),
        };
        self.cast(signer, number, header.beneficiary, authorize);

        let majority = self.signers.len() / 2;
        if let Some(tally) = self.tally.get(&header.beneficiary).copied() {
            if tally.votes > majority {
                let subject = header.beneficiary;
                if tally.authorize {
                    self.signers.insert(subject);
                    debug!(?subject, block = number, "signer authorized by vote");
                } else {
                    self.signers.remove(&subject);
                    debug!(?subject, block = number, "signer deauthorized by vote");
                    self.votes.retain(|v| v.signer != subject);
                    let window = self.window();
                    let cutoff = number.saturating_sub(window);
                    self.recents.retain(|bn, _| *bn > cutoff);
                }
                self.tally.remove(&subject);
                self.votes.retain(|v| v.address != subject);
            }
        }

        Ok(())
    }

    fn cast(&mut self, signer: Address, block: u64, address: Address, authorize: bool) {
        trace!(?signer, ?address, authorize, "casting vote");
        self.votes.push(Vote { signer, block, address, authorize });
        let tally = self.tally.entry(address).or_insert(Tally { authorize, votes: 0 });
        tally.votes += 1;
    }

    fn uncast(&mut self, address: Address, authorize: bool) {
        if let Some(tally) = self.tally.get_mut(&address) {
            if tally.authorize != authorize {
                return;
            }
            if tally.votes > 1 {
                tally.votes -= 1;
            } else {
                self.tally.remove(&address);
            }
        }
    }
}
