//! State definitions for the Starcoin Bridge contract
//!
//! This module defines all storage structures and state maps: bridge
//! configuration, per-message-type sequence numbers, the transfer record
//! lifecycle map, the committee, the treasury registry and the per-route
//! transfer limiter.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Storage};
use cw_storage_plus::{Item, Map};

use crate::error::ContractError;

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Bridge owner (treasury/committee administration)
    pub owner: Addr,
    /// Chain id of the local (home) chain
    pub chain_id: u8,
    /// Whether the bridge is currently paused by an emergency op
    pub paused: bool,
}

// ============================================================================
// Transfer Records
// ============================================================================

/// Lifecycle record of a token transfer.
///
/// - Pending: `verified_signatures` absent, `claimed` false (home-initiated only)
/// - Approved: signatures present, not claimed
/// - Claimed: signatures present, claimed (terminal)
#[cw_serde]
pub struct BridgeRecord {
    /// Serialized `BridgeMessage` bytes, exactly as signed
    pub message: Binary,
    /// Committee signatures once the transfer is approved
    pub verified_signatures: Option<Vec<Binary>>,
    /// Whether the transfer has been claimed on this chain
    pub claimed: bool,
}

// ============================================================================
// Committee
// ============================================================================

/// An active committee member, keyed by compressed public key.
#[cw_serde]
pub struct CommitteeMember {
    /// Member account on the home chain
    pub address: Addr,
    /// 33-byte compressed secp256k1 public key
    pub pubkey: Binary,
    /// Voting power in basis points of 10_000
    pub voting_power: u64,
    /// Off-chain endpoint of the member's signer
    pub http_url: String,
    /// Block-listed members keep their slot but contribute zero power
    pub blocklisted: bool,
}

/// A pre-activation committee registration, keyed by sender address.
#[cw_serde]
pub struct MemberRegistration {
    pub address: Addr,
    pub pubkey: Binary,
    pub http_url: String,
}

/// An active validator and its voting power in basis points.
#[cw_serde]
pub struct ValidatorPower {
    pub address: String,
    pub voting_power: u64,
}

// ============================================================================
// Treasury
// ============================================================================

/// Registered token metadata.
#[cw_serde]
pub struct TokenMetadata {
    /// Token identifier: bank denom for native assets, contract address
    /// for bridged CW20s
    pub token: String,
    /// 1-byte wire token id
    pub token_id: u8,
    /// `10^decimals`
    pub decimal_multiplier: u64,
    /// Notional USD price, 8-dp fixed point
    pub notional_value: u64,
    /// Whether the asset is native to the home chain (locked, not burned)
    pub native_token: bool,
}

/// A foreign token awaiting governance approval.
#[cw_serde]
pub struct PendingTokenRegistration {
    pub token: String,
    pub decimal_multiplier: u64,
    pub native_token: bool,
}

// ============================================================================
// Limiter
// ============================================================================

/// Sliding 24-hour transfer window for one route, 8-dp USD.
///
/// Invariants: `per_hour_amounts.len() == hour_head - hour_tail + 1 <= 24`
/// and `sum(per_hour_amounts) == total_amount`.
#[cw_serde]
pub struct TransferWindow {
    /// Most recent hour ever recorded (`floor(clock_ms / 3_600_000)`)
    pub hour_head: u64,
    /// Oldest hour still inside the window
    pub hour_tail: u64,
    /// Notional USD transferred during hour `hour_tail + i`
    pub per_hour_amounts: Vec<u64>,
    /// Sum over the window
    pub total_amount: u64,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:starcoin-bridge";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = "1.0.0";

/// Voting-power scale: basis points of 10_000
pub const TOTAL_VOTING_POWER: u64 = 10_000;

/// USD fixed-point multiplier (8 fractional digits)
pub const USD_MULTIPLIER: u64 = 100_000_000;

/// Route limit sentinel meaning "effectively unlimited"
pub const MAX_TRANSFER_LIMIT: u64 = u64::MAX;

/// Milliseconds per limiter bucket
pub const MILLIS_PER_HOUR: u64 = 3_600_000;

/// Buckets in the sliding window
pub const WINDOW_HOURS: u64 = 24;

// ============================================================================
// State Storage
// ============================================================================

/// Primary config storage
pub const CONFIG: Item<Config> = Item::new("config");

/// Next sequence number per message type
/// Key: message_type, Value: next expected seq_num
pub const SEQUENCE_NUMS: Map<u8, u64> = Map::new("sequence_nums");

/// Token transfer lifecycle records
/// Key: (source_chain, seq_num), Value: BridgeRecord
pub const TRANSFER_RECORDS: Map<(u8, u64), BridgeRecord> = Map::new("transfer_records");

/// Active committee members
/// Key: 33-byte compressed pubkey, Value: CommitteeMember
pub const COMMITTEE_MEMBERS: Map<&[u8], CommitteeMember> = Map::new("committee_members");

/// Pre-activation committee registrations
/// Key: registrant address, Value: MemberRegistration
pub const MEMBER_REGISTRATIONS: Map<&Addr, MemberRegistration> = Map::new("member_registrations");

/// Active validator set (owner-maintained stand-in for the chain's
/// validator registry)
/// Key: validator address, Value: voting power in bps
pub const VALIDATOR_SET: Map<&Addr, u64> = Map::new("validator_set");

/// Registered token metadata
/// Key: token identifier, Value: TokenMetadata
pub const TOKEN_METADATA: Map<&str, TokenMetadata> = Map::new("token_metadata");

/// Wire token id to token identifier
/// Key: token_id, Value: token identifier
pub const TOKEN_IDS: Map<u8, String> = Map::new("token_ids");

/// Tokens registered but not yet approved by governance
/// Key: token identifier, Value: PendingTokenRegistration
pub const WAITING_ROOM: Map<&str, PendingTokenRegistration> = Map::new("waiting_room");

/// Per-route transfer limits, 8-dp USD
/// Key: (source_chain, destination_chain), Value: limit
pub const TRANSFER_LIMITS: Map<(u8, u8), u64> = Map::new("transfer_limits");

/// Per-route sliding windows
/// Key: (source_chain, destination_chain), Value: TransferWindow
pub const TRANSFER_WINDOWS: Map<(u8, u8), TransferWindow> = Map::new("transfer_windows");

// ============================================================================
// Helpers
// ============================================================================

/// Read and post-increment the sequence number for a message type.
pub fn next_seq_num(storage: &mut dyn Storage, message_type: u8) -> Result<u64, ContractError> {
    let seq = SEQUENCE_NUMS
        .may_load(storage, message_type)?
        .unwrap_or_default();
    SEQUENCE_NUMS.save(storage, message_type, &(seq + 1))?;
    Ok(seq)
}
