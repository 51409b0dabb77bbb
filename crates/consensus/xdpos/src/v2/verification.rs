//! XDPoS V2 Signature Verification
//!
//! This module implements signature verification for:
//! - Quorum Certificates (QC)
//! - Timeout Certificates (TC)
//! - Vote messages
//! - Timeout messages

use super::{QuorumCert, TimeoutCert, TimeoutForSign, VoteForSign};
use crate::{
    errors::{XDPoSError, XDPoSResult},
    v2::types::{timeout_sig_hash, vote_sig_hash},
};
use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};
use alloy_primitives::{Address, Signature, B256};
use hashbrown::HashSet;
use rayon::prelude::*;

/// Recover the signer address from a signature.
///
/// `hash` is the message digest that was signed; `signature` is the 65-byte
/// compact `r‖s‖v` encoding.
pub fn recover_signer(hash: &B256, signature: &[u8]) -> XDPoSResult<Address> {
    if signature.len() != 65 {
        return Err(XDPoSError::InvalidSignatureFormat);
    }

    let sig = Signature::try_from(signature).map_err(|_| XDPoSError::InvalidSignatureFormat)?;

    sig.recover_address_from_prehash(hash).map_err(|_| XDPoSError::SignatureVerificationFailed)
}

/// Verify a signature against a list of masternodes, returning the
/// recovered signer alongside whether it is authorized.
pub fn verify_signature(
    hash: &B256,
    signature: &[u8],
    masternodes: &[Address],
) -> XDPoSResult<(bool, Address)> {
    if masternodes.is_empty() {
        return Err(XDPoSError::Custom("empty masternode list".to_string()));
    }

    let signer = recover_signer(hash, signature)?;
    let is_valid = masternodes.contains(&signer);

    Ok((is_valid, signer))
}

/// Remove duplicate signatures (by raw byte content) and return
/// (unique, duplicates). Does not dedup by recovered signer — use
/// `recover_unique_signers` when signer-address distinctness is required.
pub fn unique_signatures(signatures: &[Vec<u8>]) -> (Vec<Vec<u8>>, Vec<Vec<u8>>) {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    let mut duplicates = Vec::new();

    for sig in signatures {
        let sig_hash = alloy_primitives::keccak256(sig);
        if seen.insert(sig_hash) {
            unique.push(sig.clone());
        } else {
            duplicates.push(sig.clone());
        }
    }

    (unique, duplicates)
}

/// Recover unique signers from a list of signatures (parallel), deduping by
/// recovered address rather than by signature bytes.
///
/// Returns `(unique_signatures, duplicate_signatures, unique_signers)`.
pub fn recover_unique_signers(
    hash: &B256,
    signatures: &[Vec<u8>],
) -> XDPoSResult<(Vec<Vec<u8>>, Vec<Vec<u8>>, Vec<Address>)> {
    if signatures.is_empty() {
        return Ok((Vec::new(), Vec::new(), Vec::new()));
    }

    let recovered: Vec<XDPoSResult<(Vec<u8>, Address)>> = signatures
        .par_iter()
        .map(|sig| {
            let addr = recover_signer(hash, sig)?;
            Ok((sig.clone(), addr))
        })
        .collect();

    for result in &recovered {
        if let Err(e) = result {
            return Err(e.clone());
        }
    }

    let mut seen_addresses = HashSet::new();
    let mut unique_sigs = Vec::new();
    let mut duplicate_sigs = Vec::new();
    let mut unique_addrs = Vec::new();

    for result in recovered {
        let (sig, addr) = result.expect("errors already checked above");
        if seen_addresses.insert(addr) {
            unique_sigs.push(sig);
            unique_addrs.push(addr);
        } else {
            duplicate_sigs.push(sig);
        }
    }

    Ok((unique_sigs, duplicate_sigs, unique_addrs))
}

/// Verify a Quorum Certificate: enough distinct masternode signatures over
/// `VoteSigHash(qc.proposed)`. Round 0 (genesis/switch block) is exempt, as
/// it precedes any committee able to sign it.
pub fn verify_qc(qc: &QuorumCert, masternodes: &[Address], min_signatures: usize) -> XDPoSResult<()> {
    if masternodes.is_empty() {
        return Err(XDPoSError::Custom("empty masternode list".to_string()));
    }
    if qc.proposed_block_info.round == 0 {
        return Ok(());
    }

    let vote_for_sign =
        VoteForSign { proposed_block_info: qc.proposed_block_info.clone(), gap_number: qc.gap_number };
    let sig_hash = vote_sig_hash(&vote_for_sign);

    let (_, duplicates, unique_signers) = recover_unique_signers(&sig_hash, &qc.signatures)?;
    if !duplicates.is_empty() {
        tracing::warn!(
            count = duplicates.len(),
            block = qc.proposed_block_info.number,
            "duplicate signer in QC"
        );
    }

    if let Some(outsider) = unique_signers.iter().find(|s| !masternodes.contains(s)) {
        return Err(XDPoSError::InvalidQCSignatures(format!(
            "signature from non-masternode {outsider}"
        )));
    }

    if unique_signers.len() < min_signatures {
        return Err(XDPoSError::InsufficientSignatures {
            have: unique_signers.len(),
            need: min_signatures,
        });
    }

    Ok(())
}

/// Verify a Timeout Certificate: enough distinct masternode signatures over
/// `TimeoutSigHash(tc.round)`.
pub fn verify_tc(tc: &TimeoutCert, masternodes: &[Address], min_signatures: usize) -> XDPoSResult<()> {
    if masternodes.is_empty() {
        return Err(XDPoSError::Custom("empty masternode list".to_string()));
    }

    let timeout_for_sign = TimeoutForSign { round: tc.round, gap_number: tc.gap_number };
    let sig_hash = timeout_sig_hash(&timeout_for_sign);

    let (_, duplicates, unique_signers) = recover_unique_signers(&sig_hash, &tc.signatures)?;
    if !duplicates.is_empty() {
        tracing::warn!(count = duplicates.len(), round = tc.round, "duplicate signer in TC");
    }

    if unique_signers.iter().any(|s| !masternodes.contains(s)) {
        return Err(XDPoSError::InvalidTCSignatures);
    }

    if unique_signers.len() < min_signatures {
        return Err(XDPoSError::InsufficientSignatures {
            have: unique_signers.len(),
            need: min_signatures,
        });
    }

    Ok(())
}
