//! Message types for the Starcoin Bridge contract
//!
//! This module defines all messages for instantiation, execution, and
//! queries. Value transfer, governance and committee lifecycle all run
//! through `ExecuteMsg`; every response type lives at the bottom.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Uint128};

use crate::state::{TokenMetadata, TransferWindow, ValidatorPower};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Chain id of this deployment (must be a home-chain id)
    pub chain_id: u8,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Token Transfers
    // ========================================================================
    /// Send a native-denom asset to a foreign chain.
    /// The transferred funds must be attached to the call.
    SendToken {
        /// Destination chain id
        target_chain: u8,
        /// 20-byte recipient address on the destination chain
        target_address: Binary,
    },

    /// Send a bridged CW20 to a foreign chain (called via CW20 send).
    /// Implements the CW20 Receiver interface.
    Receive(cw20::Cw20ReceiveMsg),

    /// Store committee signatures for a token transfer.
    ///
    /// Home-initiated transfers must already have a pending record that
    /// byte-matches `message`; remote-initiated transfers are inserted
    /// directly as approved. Re-approving is idempotent.
    ApproveTokenTransfer {
        /// Serialized `BridgeMessage` bytes, exactly as signed
        message: Binary,
        /// 65-byte recoverable signatures (r || s || v)
        signatures: Vec<Binary>,
    },

    /// Claim an approved inbound transfer. Only the recorded recipient
    /// may call; re-claiming is idempotent.
    ClaimToken {
        /// Chain the transfer originated on
        source_chain: u8,
        /// Sequence number minted by the source chain
        seq_num: u64,
    },

    /// Claim an approved inbound transfer on behalf of the recorded
    /// recipient. Anyone may call; funds always go to the recipient.
    ClaimAndTransferToken { source_chain: u8, seq_num: u64 },

    /// Execute a committee-signed governance message (emergency op,
    /// block-list, limit update, price update, add tokens).
    ExecuteSystemMessage {
        message: Binary,
        signatures: Vec<Binary>,
    },

    // ========================================================================
    // Committee Lifecycle
    // ========================================================================
    /// Register the sender's committee signing key.
    ///
    /// Authorization: active validators, before committee activation
    RegisterCommitteeMember {
        /// 33-byte compressed secp256k1 public key
        pubkey: Binary,
        /// Off-chain signer endpoint
        http_url: String,
    },

    /// Activate the committee from current registrations if they cover
    /// the minimum stake participation; a no-op otherwise.
    ///
    /// Authorization: owner only
    CreateCommittee { min_stake_participation_bps: u64 },

    /// Replace the active validator set used for committee registration.
    ///
    /// Authorization: owner only
    UpdateValidatorSet { validators: Vec<ValidatorPower> },

    // ========================================================================
    // Treasury Administration
    // ========================================================================
    /// Hand a CW20 token's mint authority to the bridge and queue it for
    /// governance approval. The token supply must be zero.
    ///
    /// Authorization: owner only
    RegisterForeignToken { contract_addr: String },

    /// Queue a native bank denom for governance approval.
    ///
    /// Authorization: owner only
    RegisterNativeToken { denom: String, decimals: u8 },
}

/// CW20 receive hook message (for sending bridged tokens)
#[cw_serde]
pub enum ReceiveMsg {
    /// Send the attached CW20 amount to a foreign chain
    SendToken {
        target_chain: u8,
        target_address: Binary,
    },
}

// ============================================================================
// Query Messages
// ============================================================================

/// Query messages
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Returns contract configuration
    #[returns(ConfigResponse)]
    Config {},

    /// Returns bridge status summary
    #[returns(StatusResponse)]
    Status {},

    /// Returns metadata for a token by wire id
    #[returns(TokenResponse)]
    Token { token_id: u8 },

    /// Returns metadata for a token by denom/contract address
    #[returns(TokenResponse)]
    TokenByAddress { token: String },

    /// Returns all supported tokens
    #[returns(TokensResponse)]
    Tokens {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    /// Returns tokens awaiting governance approval
    #[returns(PendingTokensResponse)]
    PendingTokens {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    /// Returns the active committee
    #[returns(CommitteeMembersResponse)]
    CommitteeMembers {
        start_after: Option<Binary>,
        limit: Option<u32>,
    },

    /// Returns the owner-maintained validator set
    #[returns(ValidatorSetResponse)]
    ValidatorSet {},

    /// Returns the lifecycle record of a token transfer
    #[returns(TransferRecordResponse)]
    TransferRecord { source_chain: u8, seq_num: u64 },

    /// Returns next sequence numbers per message type
    #[returns(SequenceNumsResponse)]
    SequenceNums {},

    /// Returns the installed limit for a route
    #[returns(RouteLimitResponse)]
    RouteLimit { source: u8, destination: u8 },

    /// Returns the current sliding-window usage for a route
    #[returns(RouteUsageResponse)]
    RouteUsage { source: u8, destination: u8 },

    /// Parses wire bytes into a message summary without touching state
    #[returns(ParseMessageResponse)]
    ParseMessage { message: Binary },
}

// ============================================================================
// Response Types
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub owner: Addr,
    pub chain_id: u8,
    pub paused: bool,
}

#[cw_serde]
pub struct StatusResponse {
    pub paused: bool,
    pub committee_members: u32,
    pub supported_tokens: u32,
    pub pending_tokens: u32,
}

#[cw_serde]
pub struct TokenResponse {
    pub token: String,
    pub token_id: u8,
    pub decimal_multiplier: u64,
    pub notional_value: u64,
    pub native_token: bool,
}

impl From<TokenMetadata> for TokenResponse {
    fn from(metadata: TokenMetadata) -> Self {
        Self {
            token: metadata.token,
            token_id: metadata.token_id,
            decimal_multiplier: metadata.decimal_multiplier,
            notional_value: metadata.notional_value,
            native_token: metadata.native_token,
        }
    }
}

#[cw_serde]
pub struct TokensResponse {
    pub tokens: Vec<TokenResponse>,
}

#[cw_serde]
pub struct PendingTokenResponse {
    pub token: String,
    pub decimal_multiplier: u64,
    pub native_token: bool,
}

#[cw_serde]
pub struct PendingTokensResponse {
    pub tokens: Vec<PendingTokenResponse>,
}

#[cw_serde]
pub struct CommitteeMemberResponse {
    pub address: Addr,
    pub pubkey: Binary,
    pub voting_power: u64,
    pub http_url: String,
    pub blocklisted: bool,
}

#[cw_serde]
pub struct CommitteeMembersResponse {
    pub members: Vec<CommitteeMemberResponse>,
}

#[cw_serde]
pub struct ValidatorSetResponse {
    pub validators: Vec<ValidatorPower>,
}

#[cw_serde]
pub struct TransferRecordResponse {
    pub exists: bool,
    /// Serialized message bytes, if the record exists
    pub message: Option<Binary>,
    pub approved: bool,
    pub claimed: bool,
}

#[cw_serde]
pub struct SequenceNumEntry {
    pub message_type: u8,
    pub next_seq_num: u64,
}

#[cw_serde]
pub struct SequenceNumsResponse {
    pub sequence_nums: Vec<SequenceNumEntry>,
}

#[cw_serde]
pub struct RouteLimitResponse {
    pub source: u8,
    pub destination: u8,
    /// 8-dp USD; None when no limit is installed
    pub limit: Option<u64>,
}

#[cw_serde]
pub struct RouteUsageResponse {
    pub source: u8,
    pub destination: u8,
    pub window: Option<TransferWindow>,
}

#[cw_serde]
pub struct ParseMessageResponse {
    pub message_type: u8,
    pub message_version: u8,
    pub seq_num: u64,
    pub source_chain: u8,
    /// Decoded transfer payload when `message_type` is a token transfer
    pub token_transfer: Option<ParsedTokenTransfer>,
}

#[cw_serde]
pub struct ParsedTokenTransfer {
    pub sender_address: Binary,
    pub target_chain: u8,
    pub target_address: Binary,
    pub token_type: u8,
    pub amount: Uint128,
}
