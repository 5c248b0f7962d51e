//! Error types for the Starcoin Bridge contract
//!
//! Every error aborts the current transaction. The only soft paths
//! (duplicate approval, duplicate claim, over-limit claim) return a
//! `Response` carrying an event instead of an error.

use cosmwasm_std::StdError;
use thiserror::Error;

use crate::codec::CodecError;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only the bridge owner can perform this action")]
    Unauthorized,

    #[error("Unauthorized claim: caller is not the recorded recipient")]
    UnauthorisedClaim,

    // ========================================================================
    // Routing & Chain-ID Errors
    // ========================================================================

    #[error("Invalid chain id: {chain_id}")]
    InvalidChainId { chain_id: u8 },

    #[error("Invalid bridge route: {src_chain} -> {destination}")]
    InvalidBridgeRoute { src_chain: u8, destination: u8 },

    // ========================================================================
    // Bridge State Errors
    // ========================================================================

    #[error("Bridge is unavailable (paused)")]
    BridgeUnavailable,

    #[error("Bridge is already paused")]
    AlreadyPaused,

    #[error("Bridge is not paused")]
    NotPaused,

    #[error("Unexpected message type: {got}")]
    UnexpectedMessageType { got: u8 },

    #[error("Unexpected message version: {got}")]
    UnexpectedMessageVersion { got: u8 },

    #[error("Unexpected sequence number: expected {expected}, got {got}")]
    UnexpectedSeqNum { expected: u64, got: u64 },

    #[error("Unexpected chain id: {got}")]
    UnexpectedChainId { got: u8 },

    #[error("Transfer record not found: source chain {source_chain}, seq {seq_num}")]
    MessageNotFound { source_chain: u8, seq_num: u64 },

    #[error("Malformed message: does not match the stored record")]
    MalformedMessage,

    #[error("Transfer is not approved yet")]
    TransferNotApproved,

    #[error("Transfer has already been claimed")]
    TransferAlreadyClaimed,

    #[error("Token value must be greater than zero")]
    TokenValueZero,

    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("Invalid EVM address length: expected 20 bytes, got {got}")]
    InvalidEvmAddressLength { got: usize },

    #[error("Invalid emergency op type: {op_type}")]
    InvalidEmergencyOp { op_type: u8 },

    // ========================================================================
    // Treasury Errors
    // ========================================================================

    #[error("Unsupported token type: {token}")]
    UnsupportedTokenType { token: String },

    #[error("Token id {token_id} is already assigned")]
    TokenIdAlreadyAssigned { token_id: u8 },

    #[error("Token {token} has nonzero supply at registration")]
    NonZeroSupply { token: String },

    #[error("Notional price must be greater than zero")]
    ZeroNotionalPrice,

    #[error("Token {token} is not in the registration waiting room")]
    TokenNotInWaitingRoom { token: String },

    #[error("Token {token} is already registered")]
    TokenAlreadyRegistered { token: String },

    // ========================================================================
    // Committee Errors
    // ========================================================================

    #[error("Aggregate voting power {got} bps is below the required {required} bps")]
    SignatureBelowThreshold { required: u64, got: u64 },

    #[error("Duplicated signature in the signature set")]
    DuplicatedSignature,

    #[error("Invalid signature: signer is not a committee member")]
    InvalidSignature,

    #[error("Invalid signature length: expected 65 bytes, got {got}")]
    InvalidSignatureLength { got: usize },

    #[error("Invalid secp256k1 public key")]
    InvalidPubkey,

    #[error("Invalid public key length: expected 33 bytes, got {got}")]
    InvalidPubkeyLength { got: usize },

    #[error("Sender is not an active validator")]
    NotActiveValidator,

    #[error("Duplicate public key across committee registrations")]
    DuplicatePubkey,

    #[error("Committee is already initialized")]
    CommitteeAlreadyInitialized,

    #[error("Blocklist contains an unknown committee key")]
    BlocklistContainsUnknownKey,

    // ========================================================================
    // Limiter Errors
    // ========================================================================

    #[error("No transfer limit installed for route {src_chain} -> {destination}")]
    LimitNotFoundForRoute { src_chain: u8, destination: u8 },
}
