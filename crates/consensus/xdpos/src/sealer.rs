//! Block sealing
//!
//! Produces a signed block header once the local node's signer is
//! authorized and eligible for the slot, per the v1/v2 extra-data layout.

use crate::{
    config::XDPoSConfig,
    errors::{XDPoSError, XDPoSResult},
    extra_data,
    snapshot::Snapshot,
    v2::QuorumCert,
};
use alloc::{sync::Arc, vec::Vec};
use alloy_consensus::Header;
use alloy_primitives::{Address, B256, U256};
use tracing::{debug, info, warn};

/// Signing callback: produces a 65-byte compact secp256k1 signature over
/// `hash`, as `signer`. Supplied once via `Sealer::authorize`.
pub type SignFn = Arc<dyn Fn(Address, B256) -> XDPoSResult<[u8; 65]> + Send + Sync>;

/// Holds the local node's signing identity and callback.
#[derive(Clone, Default)]
pub struct Sealer {
    signer: Option<Address>,
    sign_fn: Option<SignFn>,
}

impl Sealer {
    /// Create an unauthorized sealer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Authorize sealing as `signer`, signing with `sign_fn`.
    pub fn authorize(&mut self, signer: Address, sign_fn: SignFn) {
        info!(%signer, "sealer authorized");
        self.signer = Some(signer);
        self.sign_fn = Some(sign_fn);
    }

    /// The authorized signer, if any.
    pub fn signer(&self) -> Option<Address> {
        self.signer
    }

    /// Seal `header`, producing a new header with `extra_data` carrying the
    /// v1/v2 consensus fields and the seal signature.
    ///
    /// `v1_snapshot` must be `Some` for v1 blocks (to set difficulty and
    /// check eligibility); `v2_round_and_qc` must be `Some` for v2 blocks.
    /// Exactly one of the two should be provided.
    pub fn seal_header(
        &self,
        mut header: Header,
        config: &XDPoSConfig,
        v1_snapshot: Option<&Snapshot>,
        v2_round_and_qc: Option<(u64, Option<QuorumCert>)>,
        has_transactions: bool,
    ) -> XDPoSResult<Header> {
        if header.number == 0 {
            return Err(XDPoSError::UnknownBlock);
        }
        let signer = self.signer.ok_or(XDPoSError::MissingSignFn)?;
        let sign_fn = self.sign_fn.as_ref().ok_or(XDPoSError::MissingSignFn)?;

        if config.period == 0 && !has_transactions {
            return Err(XDPoSError::WaitTransactions);
        }

        let mut vanity: Vec<u8> = header.extra_data.to_vec();
        vanity.truncate(32);
        vanity.resize(32, 0);
        let mut extra = vanity;

        match v2_round_and_qc {
            Some((round, qc)) => {
                header.difficulty = U256::from(1u64);
                extra.extend_from_slice(&crate::v2::types::encode_extra_fields_v2(round, qc.as_ref()));
            }
            None => {
                let snap = v1_snapshot
                    .ok_or_else(|| XDPoSError::Custom("v1 sealing requires a snapshot".into()))?;
                if !snap.signers().contains(&signer) {
                    return Err(XDPoSError::Unauthorized);
                }
                if snap.recents.values().any(|s| *s == signer) {
                    return Err(XDPoSError::Unauthorized);
                }
                header.difficulty =
                    U256::from(if snap.inturn(header.number, &signer) { 2u64 } else { 1u64 });
            }
        }
        extra.extend_from_slice(&[0u8; 65]);
        header.extra_data = extra.into();

        let seal_hash = extra_data::hash_without_seal(&header);
        let signature = sign_fn(signer, seal_hash)?;

        let mut final_extra = header.extra_data.to_vec();
        let len = final_extra.len();
        final_extra[len - 65..].copy_from_slice(&signature);
        header.extra_data = final_extra.into();

        debug!(number = header.number, %signer, "sealed block");
        Ok(header)
    }

    /// Seal `header` and deliver it on `results`, observing `stop`. Returns
    /// without sending if `stop` is already signalled, and logs (without
    /// erroring) if the results receiver has been dropped.
    pub async fn seal(
        &self,
        header: Header,
        config: &XDPoSConfig,
        v1_snapshot: Option<&Snapshot>,
        v2_round_and_qc: Option<(u64, Option<QuorumCert>)>,
        has_transactions: bool,
        results: tokio::sync::mpsc::Sender<Header>,
        stop: tokio::sync::watch::Receiver<bool>,
    ) -> XDPoSResult<()> {
        if *stop.borrow() {
            return Ok(());
        }
        let sealed = self.seal_header(header, config, v1_snapshot, v2_round_and_qc, has_transactions)?;
        if *stop.borrow() {
            return Ok(());
        }
        if results.send(sealed).await.is_err() {
            warn!("seal result receiver dropped; discarding sealed block");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{keccak256, Bytes};
    use secp256k1::{ecdsa::RecoverableSignature, Message, Secp256k1, SecretKey};

    fn keypair(byte: u8) -> (SecretKey, Address) {
        let mut bytes = [0x33u8; 32];
        bytes[31] = byte;
        let secret = SecretKey::from_slice(&bytes).unwrap();
        let secp = Secp256k1::new();
        let public = secp256k1::PublicKey::from_secret_key(&secp, &secret);
        let hash = keccak256(&public.serialize_uncompressed()[1..]);
        (secret, Address::from_slice(&hash[12..]))
    }

    fn sign_fn_for(secret: SecretKey) -> SignFn {
        Arc::new(move |_signer, hash| {
            let secp = Secp256k1::new();
            let message = Message::from_digest_slice(hash.as_slice()).unwrap();
            let sig: RecoverableSignature = secp.sign_ecdsa_recoverable(&message, &secret);
            let (recovery_id, compact) = sig.serialize_compact();
            let mut out = [0u8; 65];
            out[..64].copy_from_slice(&compact);
            out[64] = recovery_id.to_i32() as u8 + 27;
            Ok(out)
        })
    }

    #[test]
    fn seal_without_authorization_fails() {
        let sealer = Sealer::new();
        let header = Header { number: 10, extra_data: Bytes::from(alloc::vec![0u8; 32]), ..Default::default() };
        let result = sealer.seal_header(header, &XDPoSConfig::default(), None, Some((1, None)), true);
        assert!(matches!(result, Err(XDPoSError::MissingSignFn)));
    }

    #[test]
    fn seal_genesis_block_fails() {
        let mut sealer = Sealer::new();
        let (secret, addr) = keypair(1);
        sealer.authorize(addr, sign_fn_for(secret));
        let header = Header { number: 0, ..Default::default() };
        let result = sealer.seal_header(header, &XDPoSConfig::default(), None, Some((1, None)), true);
        assert!(matches!(result, Err(XDPoSError::UnknownBlock)));
    }

    #[test]
    fn seal_v2_block_embeds_round_and_signature() {
        let mut sealer = Sealer::new();
        let (secret, addr) = keypair(2);
        sealer.authorize(addr, sign_fn_for(secret));
        let header = Header { number: 10, extra_data: Bytes::from(alloc::vec![0u8; 32]), ..Default::default() };
        let sealed = sealer
            .seal_header(header, &XDPoSConfig::default(), None, Some((5, None)), true)
            .unwrap();
        assert_eq!(sealed.extra_data.len(), 32 + 1 + 1 + 65); // vanity + version + empty-round-rlp-ish + seal
        assert_eq!(sealed.difficulty, U256::from(1u64));
    }

    #[test]
    fn seal_v1_block_rejects_unauthorized_signer() {
        let mut sealer = Sealer::new();
        let (secret, addr) = keypair(3);
        sealer.authorize(addr, sign_fn_for(secret));
        let snap = Snapshot::new(900, 9, B256::ZERO, alloc::vec![Address::with_last_byte(9)]);
        let header = Header { number: 10, extra_data: Bytes::from(alloc::vec![0u8; 32]), ..Default::default() };
        let result = sealer.seal_header(header, &XDPoSConfig::default(), Some(&snap), None, true);
        assert!(matches!(result, Err(XDPoSError::Unauthorized)));
    }
}
