//! Query handlers for the Starcoin Bridge contract.

use cosmwasm_std::{Binary, Deps, Order, StdError, StdResult, Uint128};
use cw_storage_plus::Bound;

use crate::message::{self, BridgeMessage};
use crate::msg::{
    CommitteeMemberResponse, CommitteeMembersResponse, ConfigResponse, ParseMessageResponse,
    ParsedTokenTransfer, PendingTokenResponse, PendingTokensResponse, RouteLimitResponse,
    RouteUsageResponse, SequenceNumEntry, SequenceNumsResponse, StatusResponse, TokenResponse,
    TokensResponse, TransferRecordResponse, ValidatorSetResponse,
};
use crate::state::{
    ValidatorPower, COMMITTEE_MEMBERS, CONFIG, SEQUENCE_NUMS, TOKEN_IDS, TOKEN_METADATA,
    TRANSFER_LIMITS, TRANSFER_RECORDS, TRANSFER_WINDOWS, VALIDATOR_SET, WAITING_ROOM,
};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 50;

/// Query contract configuration.
pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        owner: config.owner,
        chain_id: config.chain_id,
        paused: config.paused,
    })
}

/// Query contract status summary.
pub fn query_status(deps: Deps) -> StdResult<StatusResponse> {
    let config = CONFIG.load(deps.storage)?;
    let committee_members = COMMITTEE_MEMBERS
        .keys(deps.storage, None, None, Order::Ascending)
        .count() as u32;
    let supported_tokens = TOKEN_METADATA
        .keys(deps.storage, None, None, Order::Ascending)
        .count() as u32;
    let pending_tokens = WAITING_ROOM
        .keys(deps.storage, None, None, Order::Ascending)
        .count() as u32;

    Ok(StatusResponse {
        paused: config.paused,
        committee_members,
        supported_tokens,
        pending_tokens,
    })
}

/// Query token metadata by wire id.
pub fn query_token(deps: Deps, token_id: u8) -> StdResult<TokenResponse> {
    let name = TOKEN_IDS.load(deps.storage, token_id)?;
    let metadata = TOKEN_METADATA.load(deps.storage, &name)?;
    Ok(metadata.into())
}

/// Query token metadata by denom/contract address.
pub fn query_token_by_address(deps: Deps, token: String) -> StdResult<TokenResponse> {
    let metadata = TOKEN_METADATA.load(deps.storage, &token)?;
    Ok(metadata.into())
}

/// Query paginated list of supported tokens.
pub fn query_tokens(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<TokensResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_deref().map(Bound::exclusive);

    let tokens: Vec<TokenResponse> = TOKEN_METADATA
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (_, metadata) = item?;
            Ok(metadata.into())
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(TokensResponse { tokens })
}

/// Query paginated list of tokens awaiting governance approval.
pub fn query_pending_tokens(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<PendingTokensResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_deref().map(Bound::exclusive);

    let tokens: Vec<PendingTokenResponse> = WAITING_ROOM
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (_, pending) = item?;
            Ok(PendingTokenResponse {
                token: pending.token,
                decimal_multiplier: pending.decimal_multiplier,
                native_token: pending.native_token,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(PendingTokensResponse { tokens })
}

/// Query paginated list of committee members.
pub fn query_committee_members(
    deps: Deps,
    start_after: Option<Binary>,
    limit: Option<u32>,
) -> StdResult<CommitteeMembersResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start_key = start_after.as_ref().map(|b| b.as_slice().to_vec());
    let start = start_key.as_deref().map(Bound::exclusive);

    let members: Vec<CommitteeMemberResponse> = COMMITTEE_MEMBERS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (_, member) = item?;
            Ok(CommitteeMemberResponse {
                address: member.address,
                pubkey: member.pubkey,
                voting_power: member.voting_power,
                http_url: member.http_url,
                blocklisted: member.blocklisted,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(CommitteeMembersResponse { members })
}

/// Query the owner-maintained validator set.
pub fn query_validator_set(deps: Deps) -> StdResult<ValidatorSetResponse> {
    let validators: Vec<ValidatorPower> = VALIDATOR_SET
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| {
            let (address, voting_power) = item?;
            Ok(ValidatorPower {
                address: address.to_string(),
                voting_power,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(ValidatorSetResponse { validators })
}

/// Query the lifecycle record of a transfer.
pub fn query_transfer_record(
    deps: Deps,
    source_chain: u8,
    seq_num: u64,
) -> StdResult<TransferRecordResponse> {
    match TRANSFER_RECORDS.may_load(deps.storage, (source_chain, seq_num))? {
        Some(record) => Ok(TransferRecordResponse {
            exists: true,
            approved: record.verified_signatures.is_some(),
            claimed: record.claimed,
            message: Some(record.message),
        }),
        None => Ok(TransferRecordResponse {
            exists: false,
            message: None,
            approved: false,
            claimed: false,
        }),
    }
}

/// Query next sequence numbers per message type.
pub fn query_sequence_nums(deps: Deps) -> StdResult<SequenceNumsResponse> {
    let sequence_nums = message::ALL_MESSAGE_TYPES
        .iter()
        .map(|&message_type| {
            Ok(SequenceNumEntry {
                message_type,
                next_seq_num: SEQUENCE_NUMS
                    .may_load(deps.storage, message_type)?
                    .unwrap_or_default(),
            })
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(SequenceNumsResponse { sequence_nums })
}

/// Query the installed limit for a route.
pub fn query_route_limit(deps: Deps, source: u8, destination: u8) -> StdResult<RouteLimitResponse> {
    Ok(RouteLimitResponse {
        source,
        destination,
        limit: TRANSFER_LIMITS.may_load(deps.storage, (source, destination))?,
    })
}

/// Query the sliding-window usage for a route.
pub fn query_route_usage(deps: Deps, source: u8, destination: u8) -> StdResult<RouteUsageResponse> {
    Ok(RouteUsageResponse {
        source,
        destination,
        window: TRANSFER_WINDOWS.may_load(deps.storage, (source, destination))?,
    })
}

/// Parse wire bytes into a message summary.
pub fn query_parse_message(message_bytes: Binary) -> StdResult<ParseMessageResponse> {
    let parsed = BridgeMessage::deserialize(message_bytes.as_slice())
        .map_err(|e| StdError::generic_err(e.to_string()))?;

    let token_transfer = if parsed.message_type == message::TOKEN_TRANSFER {
        let payload = message::extract_token_transfer(&parsed)
            .map_err(|e| StdError::generic_err(e.to_string()))?;
        Some(ParsedTokenTransfer {
            sender_address: Binary::from(payload.sender_address),
            target_chain: payload.target_chain,
            target_address: Binary::from(payload.target_address),
            token_type: payload.token_type,
            amount: Uint128::from(payload.amount),
        })
    } else {
        None
    };

    Ok(ParseMessageResponse {
        message_type: parsed.message_type,
        message_version: parsed.message_version,
        seq_num: parsed.seq_num,
        source_chain: parsed.source_chain,
        token_transfer,
    })
}
