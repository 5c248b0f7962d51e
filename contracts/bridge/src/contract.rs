//! Starcoin Bridge Contract - Entry Points
//!
//! The bridge moves value between this chain and EVM chains under the
//! authority of a weighted signature committee. The implementation is
//! modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;

use crate::chain_ids::{self, VALID_ROUTES};
use crate::error::ContractError;
use crate::execute::{
    execute_approve_token_transfer, execute_claim_and_transfer_token, execute_claim_token,
    execute_create_committee, execute_receive, execute_register_committee_member,
    execute_register_foreign_token, execute_register_native_token, execute_send_token,
    execute_system_message, execute_update_validator_set,
};
use crate::message::ALL_MESSAGE_TYPES;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_committee_members, query_config, query_parse_message, query_pending_tokens,
    query_route_limit, query_route_usage, query_sequence_nums, query_status, query_token,
    query_token_by_address, query_tokens, query_transfer_record, query_validator_set,
};
use crate::state::{
    Config, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, MAX_TRANSFER_LIMIT, SEQUENCE_NUMS,
    TRANSFER_LIMITS,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    chain_ids::assert_valid_chain_id(msg.chain_id)?;

    let config = Config {
        owner: info.sender,
        chain_id: msg.chain_id,
        paused: false,
    };
    CONFIG.save(deps.storage, &config)?;

    for &message_type in ALL_MESSAGE_TYPES {
        SEQUENCE_NUMS.save(deps.storage, message_type, &0)?;
    }

    // the limiter covers inbound routes only; they start effectively
    // unlimited until governance lowers them
    for &(source, destination) in VALID_ROUTES {
        if destination == msg.chain_id {
            TRANSFER_LIMITS.save(deps.storage, (source, destination), &MAX_TRANSFER_LIMIT)?;
        }
    }

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("owner", config.owner)
        .add_attribute("chain_id", msg.chain_id.to_string()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Token transfers
        ExecuteMsg::SendToken {
            target_chain,
            target_address,
        } => execute_send_token(deps, env, info, target_chain, target_address),
        ExecuteMsg::Receive(cw20_msg) => execute_receive(deps, env, info, cw20_msg),
        ExecuteMsg::ApproveTokenTransfer {
            message,
            signatures,
        } => execute_approve_token_transfer(deps, message, signatures),
        ExecuteMsg::ClaimToken {
            source_chain,
            seq_num,
        } => execute_claim_token(deps, env, info, source_chain, seq_num),
        ExecuteMsg::ClaimAndTransferToken {
            source_chain,
            seq_num,
        } => execute_claim_and_transfer_token(deps, env, info, source_chain, seq_num),

        // Governance
        ExecuteMsg::ExecuteSystemMessage {
            message,
            signatures,
        } => execute_system_message(deps, message, signatures),

        // Committee lifecycle
        ExecuteMsg::RegisterCommitteeMember { pubkey, http_url } => {
            execute_register_committee_member(deps, info, pubkey, http_url)
        }
        ExecuteMsg::CreateCommittee {
            min_stake_participation_bps,
        } => execute_create_committee(deps, info, min_stake_participation_bps),
        ExecuteMsg::UpdateValidatorSet { validators } => {
            execute_update_validator_set(deps, info, validators)
        }

        // Treasury administration
        ExecuteMsg::RegisterForeignToken { contract_addr } => {
            execute_register_foreign_token(deps, info, contract_addr)
        }
        ExecuteMsg::RegisterNativeToken { denom, decimals } => {
            execute_register_native_token(deps, info, denom, decimals)
        }
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Status {} => to_json_binary(&query_status(deps)?),
        QueryMsg::Token { token_id } => to_json_binary(&query_token(deps, token_id)?),
        QueryMsg::TokenByAddress { token } => {
            to_json_binary(&query_token_by_address(deps, token)?)
        }
        QueryMsg::Tokens { start_after, limit } => {
            to_json_binary(&query_tokens(deps, start_after, limit)?)
        }
        QueryMsg::PendingTokens { start_after, limit } => {
            to_json_binary(&query_pending_tokens(deps, start_after, limit)?)
        }
        QueryMsg::CommitteeMembers { start_after, limit } => {
            to_json_binary(&query_committee_members(deps, start_after, limit)?)
        }
        QueryMsg::ValidatorSet {} => to_json_binary(&query_validator_set(deps)?),
        QueryMsg::TransferRecord {
            source_chain,
            seq_num,
        } => to_json_binary(&query_transfer_record(deps, source_chain, seq_num)?),
        QueryMsg::SequenceNums {} => to_json_binary(&query_sequence_nums(deps)?),
        QueryMsg::RouteLimit {
            source,
            destination,
        } => to_json_binary(&query_route_limit(deps, source, destination)?),
        QueryMsg::RouteUsage {
            source,
            destination,
        } => to_json_binary(&query_route_usage(deps, source, destination)?),
        QueryMsg::ParseMessage { message } => to_json_binary(&query_parse_message(message)?),
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
