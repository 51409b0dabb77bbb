//! XDPoS Consensus Errors

use alloc::string::String;
use reth_consensus::ConsensusError;

/// XDPoS-specific error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum XDPoSError {
    /// Unknown block
    #[error("unknown block")]
    UnknownBlock,

    /// Unauthorized signer
    #[error("unauthorized signer")]
    Unauthorized,

    /// Invalid checkpoint beneficiary
    #[error("beneficiary in checkpoint block must be zero")]
    InvalidCheckpointBeneficiary,

    /// Invalid vote nonce
    #[error("invalid vote nonce")]
    InvalidVote,

    /// Invalid checkpoint vote
    #[error("vote nonce in checkpoint block must be zero")]
    InvalidCheckpointVote,

    /// Missing vanity in extra data
    #[error("extra-data 32 byte vanity prefix missing")]
    MissingVanity,

    /// Missing signature in extra data
    #[error("extra-data 65 byte suffix signature missing")]
    MissingSignature,

    /// Invalid checkpoint signers
    #[error("invalid signer list on checkpoint block")]
    InvalidCheckpointSigners,

    /// Non-zero mix digest
    #[error("non-zero mix digest")]
    InvalidMixDigest,

    /// Non-empty uncle hash
    #[error("non empty uncle hash")]
    InvalidUncleHash,

    /// Invalid difficulty
    #[error("invalid difficulty")]
    InvalidDifficulty,

    /// Invalid voting chain
    #[error("invalid voting chain")]
    InvalidVotingChain,

    /// Block in the future
    #[error("block in the future")]
    FutureBlock,

    /// Invalid timestamp
    #[error("invalid timestamp")]
    InvalidTimestamp,

    /// Unknown ancestor
    #[error("unknown ancestor")]
    UnknownAncestor,

    /// V2 consensus errors
    #[error("missing quorum certificate")]
    MissingQC,

    #[error("invalid quorum certificate")]
    InvalidQC,

    #[error("invalid QC signatures: {0}")]
    InvalidQCSignatures(String),

    #[error("missing timeout certificate")]
    MissingTC,

    #[error("invalid timeout certificate")]
    InvalidTC,

    #[error("invalid TC signatures")]
    InvalidTCSignatures,

    #[error("missing block info")]
    MissingBlockInfo,

    #[error("extra data too short")]
    ExtraDataTooShort,

    #[error("invalid extra data format")]
    InvalidExtraData,

    #[error("gap number mismatch")]
    GapNumberMismatch,

    #[error("block info mismatch")]
    BlockInfoMismatch,

    #[error("V2 engine not initialized")]
    V2EngineNotInitialized,

    #[error("signature verification failed")]
    SignatureVerificationFailed,

    #[error("invalid signature format")]
    InvalidSignatureFormat,

    #[error("creator not in masternode list")]
    CreatorNotMasternode,

    #[error("insufficient signatures: have {have}, need {need}")]
    InsufficientSignatures { have: usize, need: usize },

    /// Checkpoint block number is not a multiple of the epoch length
    #[error("block {0} is not a checkpoint block")]
    InvalidCheckpoint(u64),

    /// Requested an ancestor header that could not be located
    #[error("missing block header {0}")]
    MissingBlockHeader(u64),

    /// A vote/timeout signer recovers to an address outside the epoch's
    /// master-node set
    #[error("validator not within masternodes")]
    ValidatorNotWithinMasternodes,

    /// The header's coinbase does not match the address recovered from the seal
    #[error("coinbase does not match recovered validator")]
    CoinbaseAndValidatorMismatch,

    /// The header's proposer is not the expected leader for its round
    #[error("not this validator's turn to propose")]
    NotItsTurn,

    /// Sanity re-validation of an already-accepted header failed
    #[error("double validation of header failed")]
    FailedDoubleValidation,

    /// A non-checkpoint header carries the V2 extra-data validator/penalty fields
    #[error("epoch-switch fields present in a non-epoch-switch block")]
    InvalidFieldInNonEpochSwitch,

    /// An epoch-switch header carries an empty master-node list
    #[error("epoch-switch block carries an empty validator list")]
    EmptyEpochSwitchValidators,

    /// Embedded validator list does not match the locally computed projection
    #[error("invalid checkpoint validators")]
    InvalidCheckpointValidators,

    /// Embedded validator list fails legitimacy checks against the snapshot
    #[error("validators are not legitimate")]
    ValidatorsNotLegit,

    /// Embedded penalty list fails legitimacy checks
    #[error("penalties are not legitimate")]
    PenaltiesNotLegit,

    /// Invalid checkpoint penalties payload
    #[error("invalid checkpoint penalties")]
    InvalidCheckpointPenalties,

    /// `ExtraFieldsV2` failed to decode
    #[error("invalid V2 extra data: {0}")]
    InvalidV2Extra(String),

    /// The round embedded in a V2 header did not exceed its own QC's round
    #[error("round is not greater than the proposed block's QC round")]
    RoundInvalid,

    /// A vote/timeout's round does not equal the current round
    #[error("incoming {kind} round {incoming} does not equal current round {current}")]
    IncomingMessageRoundNotEqualCurrentRound { kind: &'static str, incoming: u64, current: u64 },

    /// A vote/timeout's round is too far ahead of or behind the current round
    #[error("incoming {kind} round {incoming} is too far from current round {current}")]
    IncomingMessageRoundTooFarFromCurrentRound { kind: &'static str, incoming: u64, current: u64 },

    /// A certificate references an empty block-info hash
    #[error("empty block info hash")]
    EmptyBlockInfoHash,

    /// Snapshot `apply` was given headers that do not extend the chain it is walking
    #[error("invalid voting chain")]
    InvalidHeaderOrder,

    /// A child header fails to reference its claimed parent
    #[error("invalid child header")]
    InvalidChild,

    /// Sealing was asked to produce an empty block under an instant-period chain
    #[error("waiting for transactions")]
    WaitTransactions,

    /// `Seal` was called twice for the same header
    #[error("block already sealed")]
    AlreadyMined,

    /// `Authorize` was never called with a signing function
    #[error("missing sign function")]
    MissingSignFn,

    /// Custom error message
    #[error("{0}")]
    Custom(String),
}

impl From<XDPoSError> for ConsensusError {
    fn from(err: XDPoSError) -> Self {
        ConsensusError::Custom(alloc::sync::Arc::new(err))
    }
}

impl From<XDPoSError> for reth_errors::RethError {
    fn from(err: XDPoSError) -> Self {
        reth_errors::RethError::Consensus(err.into())
    }
}

/// Result type for XDPoS operations
pub type XDPoSResult<T> = Result<T, XDPoSError>;
