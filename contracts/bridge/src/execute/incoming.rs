//! Inbound transfer handlers (approve and claim).
//!
//! `ApproveTokenTransfer` stores committee signatures: home-initiated
//! transfers must match their pending record byte for byte; remote ones
//! are inserted directly as approved. Claiming mints (or releases) the
//! funds to the recorded recipient, gated by the route limiter. Both
//! re-approving and re-claiming are idempotent and only emit an event.

use cosmwasm_std::{Binary, DepsMut, Env, MessageInfo, Response, Uint128};

use crate::address::{decode_home_address, encode_home_address};
use crate::chain_ids::{self, get_route};
use crate::committee;
use crate::error::ContractError;
use crate::events;
use crate::limiter;
use crate::message::{self, BridgeMessage, MESSAGE_VERSION};
use crate::state::{BridgeRecord, CONFIG, TRANSFER_RECORDS};
use crate::treasury;

/// Execute handler for storing committee signatures on a token transfer.
pub fn execute_approve_token_transfer(
    deps: DepsMut,
    message_bytes: Binary,
    signatures: Vec<Binary>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::BridgeUnavailable);
    }

    let bridge_message = BridgeMessage::deserialize(message_bytes.as_slice())?;
    committee::verify_signatures(deps.as_ref(), &bridge_message, &signatures)?;

    if bridge_message.message_type != message::TOKEN_TRANSFER {
        return Err(ContractError::UnexpectedMessageType {
            got: bridge_message.message_type,
        });
    }
    if bridge_message.message_version != MESSAGE_VERSION {
        return Err(ContractError::UnexpectedMessageVersion {
            got: bridge_message.message_version,
        });
    }

    chain_ids::assert_valid_chain_id(bridge_message.source_chain)?;
    let payload = message::extract_token_transfer(&bridge_message)?;
    if bridge_message.source_chain != config.chain_id && payload.target_chain != config.chain_id {
        return Err(ContractError::UnexpectedChainId {
            got: bridge_message.source_chain,
        });
    }

    let key = (bridge_message.source_chain, bridge_message.seq_num);
    let response = Response::new()
        .add_attribute("method", "approve_token_transfer")
        .add_attribute("source_chain", bridge_message.source_chain.to_string())
        .add_attribute("seq_num", bridge_message.seq_num.to_string());

    if bridge_message.source_chain == config.chain_id {
        // home-initiated: the send-time record must exist and match
        let mut record = TRANSFER_RECORDS.may_load(deps.storage, key)?.ok_or(
            ContractError::MessageNotFound {
                source_chain: bridge_message.source_chain,
                seq_num: bridge_message.seq_num,
            },
        )?;
        if record.message != message_bytes {
            return Err(ContractError::MalformedMessage);
        }
        if record.claimed {
            return Err(ContractError::TransferAlreadyClaimed);
        }
        if record.verified_signatures.is_some() {
            return Ok(response.add_event(events::token_transfer_already_approved(
                key.0, key.1,
            )));
        }
        record.verified_signatures = Some(signatures);
        TRANSFER_RECORDS.save(deps.storage, key, &record)?;
    } else {
        // remote-initiated: first approval creates the record
        if TRANSFER_RECORDS.has(deps.storage, key) {
            return Ok(response.add_event(events::token_transfer_already_approved(
                key.0, key.1,
            )));
        }
        TRANSFER_RECORDS.save(
            deps.storage,
            key,
            &BridgeRecord {
                message: message_bytes,
                verified_signatures: Some(signatures),
                claimed: false,
            },
        )?;
    }

    Ok(response.add_event(events::token_transfer_approved(key.0, key.1)))
}

/// Execute handler for claiming by the recorded recipient.
pub fn execute_claim_token(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    source_chain: u8,
    seq_num: u64,
) -> Result<Response, ContractError> {
    claim_token(deps, env, info, source_chain, seq_num, true)
}

/// Execute handler for claiming on behalf of the recorded recipient.
pub fn execute_claim_and_transfer_token(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    source_chain: u8,
    seq_num: u64,
) -> Result<Response, ContractError> {
    claim_token(deps, env, info, source_chain, seq_num, false)
}

fn claim_token(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    source_chain: u8,
    seq_num: u64,
    restrict_to_recipient: bool,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::BridgeUnavailable);
    }

    let key = (source_chain, seq_num);
    let mut record = TRANSFER_RECORDS.may_load(deps.storage, key)?.ok_or(
        ContractError::MessageNotFound {
            source_chain,
            seq_num,
        },
    )?;

    let bridge_message = BridgeMessage::deserialize(record.message.as_slice())?;
    let payload = message::extract_token_transfer(&bridge_message)?;

    if record.verified_signatures.is_none() {
        return Err(ContractError::TransferNotApproved);
    }
    if payload.target_chain != config.chain_id {
        return Err(ContractError::UnexpectedChainId {
            got: payload.target_chain,
        });
    }
    if restrict_to_recipient {
        let caller_bytes = encode_home_address(deps.api, &info.sender)?;
        if caller_bytes != payload.target_address {
            return Err(ContractError::UnauthorisedClaim);
        }
    }

    let response = Response::new()
        .add_attribute("method", "claim_token")
        .add_attribute("source_chain", source_chain.to_string())
        .add_attribute("seq_num", seq_num.to_string());

    if record.claimed {
        return Ok(response.add_event(events::token_transfer_already_claimed(
            source_chain,
            seq_num,
        )));
    }

    let metadata = treasury::token_by_id(deps.storage, payload.token_type)?;
    let route = get_route(source_chain, config.chain_id)?;
    let now_ms = env.block.time.nanos() / 1_000_000;

    let within_limit = limiter::check_and_record_sending_transfer(
        deps.storage,
        route,
        &metadata,
        payload.amount,
        now_ms,
    )?;
    if !within_limit {
        // soft refusal: the caller may retry once the window slides
        return Ok(response.add_event(events::token_transfer_limit_exceed(
            source_chain,
            seq_num,
        )));
    }

    let recipient = decode_home_address(deps.api, &payload.target_address)?;
    let mint = treasury::mint_messages(&metadata, &recipient, Uint128::from(payload.amount))?;

    record.claimed = true;
    TRANSFER_RECORDS.save(deps.storage, key, &record)?;

    Ok(response
        .add_messages(mint)
        .add_event(events::token_transfer_claimed(
            source_chain,
            seq_num,
            payload.token_type,
            payload.amount,
        ))
        .add_attribute("recipient", recipient)
        .add_attribute("amount", payload.amount.to_string()))
}
