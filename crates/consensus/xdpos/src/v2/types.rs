//! XDPoS V2 BFT Types with RLP Encoding/Decoding
//!
//! This module implements RLP encoding/decoding for XDPoS V2 consensus types
//! including Vote, Timeout, QuorumCert, and TimeoutCert.

use super::{BlockInfo, QuorumCert, Round, TimeoutCert, VoteForSign, TimeoutForSign};
use alloy_primitives::{keccak256, Address, B256};
use alloy_rlp::{Decodable, RlpDecodable, RlpEncodable};

/// RLP-encodable/decodable BlockInfo
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct BlockInfoRlp {
    pub hash: B256,
    pub round: u64,
    pub number: u64,
}

impl From<&BlockInfo> for BlockInfoRlp {
    fn from(info: &BlockInfo) -> Self {
        Self {
            hash: info.hash,
            round: info.round,
            number: info.number,
        }
    }
}

impl From<BlockInfoRlp> for BlockInfo {
    fn from(rlp: BlockInfoRlp) -> Self {
        Self {
            hash: rlp.hash,
            round: rlp.round,
            number: rlp.number,
        }
    }
}

/// RLP-encodable/decodable QuorumCert
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct QuorumCertRlp {
    pub proposed_block_info: BlockInfoRlp,
    pub signatures: Vec<Vec<u8>>,
    pub gap_number: u64,
}

impl From<&QuorumCert> for QuorumCertRlp {
    fn from(qc: &QuorumCert) -> Self {
        Self {
            proposed_block_info: (&qc.proposed_block_info).into(),
            signatures: qc.signatures.clone(),
            gap_number: qc.gap_number,
        }
    }
}

impl From<QuorumCertRlp> for QuorumCert {
    fn from(rlp: QuorumCertRlp) -> Self {
        QuorumCert {
            proposed_block_info: rlp.proposed_block_info.into(),
            signatures: rlp.signatures,
            gap_number: rlp.gap_number,
        }
    }
}

/// RLP-encodable/decodable TimeoutCert
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct TimeoutCertRlp {
    pub round: u64,
    pub signatures: Vec<Vec<u8>>,
    pub gap_number: u64,
}

impl From<&TimeoutCert> for TimeoutCertRlp {
    fn from(tc: &TimeoutCert) -> Self {
        Self {
            round: tc.round,
            signatures: tc.signatures.clone(),
            gap_number: tc.gap_number,
        }
    }
}

impl From<TimeoutCertRlp> for TimeoutCert {
    fn from(rlp: TimeoutCertRlp) -> Self {
        TimeoutCert {
            round: rlp.round,
            signatures: rlp.signatures,
            gap_number: rlp.gap_number,
        }
    }
}

/// RLP-encodable/decodable VoteForSign
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct VoteForSignRlp {
    pub proposed_block_info: BlockInfoRlp,
    pub gap_number: u64,
}

impl From<&VoteForSign> for VoteForSignRlp {
    fn from(v: &VoteForSign) -> Self {
        Self {
            proposed_block_info: (&v.proposed_block_info).into(),
            gap_number: v.gap_number,
        }
    }
}

/// RLP-encodable/decodable TimeoutForSign
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct TimeoutForSignRlp {
    pub round: u64,
    pub gap_number: u64,
}

impl From<&TimeoutForSign> for TimeoutForSignRlp {
    fn from(t: &TimeoutForSign) -> Self {
        Self {
            round: t.round,
            gap_number: t.gap_number,
        }
    }
}

/// Compute the signature hash for a Vote
pub fn vote_sig_hash(vote: &VoteForSign) -> B256 {
    let rlp_vote: VoteForSignRlp = vote.into();
    let encoded = alloy_rlp::encode(&rlp_vote);
    keccak256(&encoded)
}

/// Compute the signature hash for a Timeout
pub fn timeout_sig_hash(timeout: &TimeoutForSign) -> B256 {
    let rlp_timeout: TimeoutForSignRlp = timeout.into();
    let encoded = alloy_rlp::encode(&rlp_timeout);
    keccak256(&encoded)
}

/// ExtraFields_v2 RLP structure for block headers.
///
/// `quorum_cert`/`validators`/`penalties` are plain RLP lists rather than
/// `Option` fields: a non-switch block has a 1-element `quorum_cert` and
/// empty `validators`/`penalties`, while a switch block has the reverse
/// (empty `quorum_cert`, non-empty `validators`). Since either can be empty
/// independent of the others, `Option`'s RLP trailing-suffix-omission
/// convention (which only drops `None`s from the end of the list) can't
/// represent this; plain lists sidestep the ambiguity entirely.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct ExtraFieldsV2Rlp {
    pub round: u64,
    pub quorum_cert: Vec<QuorumCertRlp>,
    pub validators: Vec<Address>,
    pub penalties: Vec<Address>,
}

/// Encode ExtraFields_v2 to bytes with version prefix (2)
pub fn encode_extra_fields_v2(round: Round, quorum_cert: Option<&QuorumCert>) -> Vec<u8> {
    encode_epoch_switch_extra_fields_v2(round, quorum_cert, None, None)
}

/// Encode ExtraFields_v2 for an epoch-switch block, carrying the embedded
/// master-node list and any penalized validators for that epoch.
pub fn encode_epoch_switch_extra_fields_v2(
    round: Round,
    quorum_cert: Option<&QuorumCert>,
    validators: Option<Vec<Address>>,
    penalties: Option<Vec<Address>>,
) -> Vec<u8> {
    let fields = ExtraFieldsV2Rlp {
        round,
        quorum_cert: quorum_cert.map(|qc| alloc::vec![qc.into()]).unwrap_or_default(),
        validators: validators.unwrap_or_default(),
        penalties: penalties.unwrap_or_default(),
    };

    let encoded = alloy_rlp::encode(&fields);
    let mut result = Vec::with_capacity(1 + encoded.len());
    result.push(2); // Version byte
    result.extend_from_slice(&encoded);
    result
}

/// Decoded `ExtraFieldsV2` payload, including the epoch-switch
/// validator/penalty lists when present.
pub struct DecodedExtraFieldsV2 {
    pub round: Round,
    pub quorum_cert: Option<QuorumCert>,
    pub validators: Option<Vec<Address>>,
    pub penalties: Option<Vec<Address>>,
}

/// Decode ExtraFields_v2 from bytes (with version prefix)
///
/// Only tag byte `0x02` decodes. `0x01` is the reserved legacy tag and any
/// other value is an unknown consensus version; both are rejected rather
/// than treated as a lenient `>= 2` match.
pub fn decode_extra_fields_v2(bytes: &[u8]) -> Result<DecodedExtraFieldsV2, String> {
    if bytes.is_empty() {
        return Err("extra field is empty".to_string());
    }

    let version = bytes[0];
    if version == 1 {
        return Err("consensus version 1 is not applicable for decoding".to_string());
    }
    if version != 2 {
        return Err(format!("consensus version {} is not defined", version));
    }

    let fields = ExtraFieldsV2Rlp::decode(&mut &bytes[1..])
        .map_err(|e| format!("failed to decode extra fields: {}", e))?;

    let qc = fields.quorum_cert.into_iter().next().map(|qc_rlp| qc_rlp.into());
    Ok(DecodedExtraFieldsV2 {
        round: fields.round,
        quorum_cert: qc,
        validators: (!fields.validators.is_empty()).then_some(fields.validators),
        penalties: (!fields.penalties.is_empty()).then_some(fields.penalties),
    })
}
