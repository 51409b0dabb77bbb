//! Threshold attestation pool for V2 votes and timeouts
//!
//! Buckets homogeneous attestations (all votes, or all timeouts) by their
//! composite pool key and reports when a bucket has reached the
//! configured threshold, so the caller can form a quorum or timeout
//! certificate from its contents.

use alloc::{string::String, vec::Vec};
use alloy_primitives::B256;
use hashbrown::HashMap;
use parking_lot::RwLock;

/// Minimal surface `AttestationPool` needs from a pooled attestation
/// (`v2::Vote` or `v2::Timeout`).
pub trait PoolObject: Clone {
    /// Bucket key grouping attestations that can jointly form a certificate.
    fn pool_key(&self) -> String;
    /// Content hash, used to dedup repeated insertions of the same object.
    fn hash(&self) -> B256;
}

/// Threshold collector for votes or timeouts, keyed by pool key.
pub struct AttestationPool<T: PoolObject> {
    threshold: RwLock<usize>,
    buckets: RwLock<HashMap<String, HashMap<B256, T>>>,
}

impl<T: PoolObject> AttestationPool<T> {
    /// Create a new pool requiring `threshold` distinct objects per bucket.
    pub fn new(threshold: usize) -> Self {
        Self { threshold: RwLock::new(threshold), buckets: RwLock::new(HashMap::new()) }
    }

    /// Insert `obj`. Idempotent on `obj.hash()`: a repeat insert does not
    /// increase the bucket's count. Returns whether the bucket has reached
    /// threshold after this insert, the bucket's current size, and a copy
    /// of the bucket's contents keyed by hash.
    pub fn add(&self, obj: T) -> (bool, usize, HashMap<B256, T>) {
        let key = obj.pool_key();
        let hash = obj.hash();
        let mut buckets = self.buckets.write();
        let bucket = buckets.entry(key).or_default();
        bucket.entry(hash).or_insert(obj);
        let count = bucket.len();
        let threshold = *self.threshold.read();
        (count >= threshold, count, bucket.clone())
    }

    /// Empty every bucket.
    pub fn clear(&self) {
        self.buckets.write().clear();
    }

    /// Evict a single bucket by its pool key.
    pub fn clear_by_pool_key(&self, key: &str) {
        self.buckets.write().remove(key);
    }

    /// Evict the bucket that `obj` belongs to.
    pub fn clear_pool_key_by_obj(&self, obj: &T) {
        self.clear_by_pool_key(&obj.pool_key());
    }

    /// Update the threshold. Does not retroactively re-fire past inserts.
    pub fn set_threshold(&self, n: usize) {
        *self.threshold.write() = n;
    }

    /// Current threshold.
    pub fn threshold(&self) -> usize {
        *self.threshold.read()
    }

    /// Size of the bucket for `key`, or 0 if absent.
    pub fn bucket_size(&self, key: &str) -> usize {
        self.buckets.read().get(key).map(HashMap::len).unwrap_or(0)
    }

    /// Pool keys whose bucket round is strictly less than `min_round`,
    /// where `round_of` extracts a round number from a pool key. Used by
    /// periodic pool hygiene (`PoolHygieneRound`).
    pub fn stale_keys(&self, min_round: u64, round_of: impl Fn(&str) -> Option<u64>) -> Vec<String> {
        self.buckets
            .read()
            .keys()
            .filter(|k| round_of(k).is_some_and(|r| r < min_round))
            .cloned()
            .collect()
    }
}
