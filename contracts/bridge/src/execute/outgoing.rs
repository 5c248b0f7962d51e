//! Outbound transfer handlers (SendToken and CW20 Receive).
//!
//! Outbound transfers burn bridged CW20s (or retain native funds in
//! custody), mint the next token-transfer sequence number, persist the
//! Pending record and emit `token_deposited`. The record is approved
//! later when the committee counter-signs the same message bytes.

use cosmwasm_std::{from_json, Addr, Binary, DepsMut, Env, MessageInfo, Response, Uint128};
use cw20::Cw20ReceiveMsg;

use crate::address::encode_home_address;
use crate::chain_ids;
use crate::crypto::EVM_ADDRESS_LENGTH;
use crate::error::ContractError;
use crate::events;
use crate::message::{self, extract_token_transfer};
use crate::msg::ReceiveMsg;
use crate::state::{next_seq_num, BridgeRecord, Config, TokenMetadata, CONFIG, TRANSFER_RECORDS};
use crate::treasury;

/// Execute handler for sending a native-denom asset outbound.
pub fn execute_send_token(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    target_chain: u8,
    target_address: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::BridgeUnavailable);
    }

    if info.funds.len() != 1 {
        return Err(ContractError::InvalidAmount {
            reason: "exactly one denomination must be attached".to_string(),
        });
    }
    let coin = info.funds[0].clone();

    let metadata = treasury::token_by_name(deps.storage, &coin.denom)?;
    if !metadata.native_token {
        return Err(ContractError::UnsupportedTokenType { token: coin.denom });
    }

    send_token(
        deps,
        env,
        config,
        info.sender,
        metadata,
        coin.amount,
        target_chain,
        target_address,
    )
}

/// Execute handler for sending a bridged CW20 outbound (CW20 receive hook).
pub fn execute_receive(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    cw20_msg: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::BridgeUnavailable);
    }

    // the CW20 contract is the caller; the depositor rides in the hook
    let token = info.sender.to_string();
    let sender = deps.api.addr_validate(&cw20_msg.sender)?;

    let metadata = treasury::token_by_name(deps.storage, &token)?;
    if metadata.native_token {
        return Err(ContractError::UnsupportedTokenType { token });
    }

    let ReceiveMsg::SendToken {
        target_chain,
        target_address,
    } = from_json(&cw20_msg.msg)?;

    send_token(
        deps,
        env,
        config,
        sender,
        metadata,
        cw20_msg.amount,
        target_chain,
        target_address,
    )
}

#[allow(clippy::too_many_arguments)]
fn send_token(
    deps: DepsMut,
    _env: Env,
    config: Config,
    sender: Addr,
    metadata: TokenMetadata,
    amount: Uint128,
    target_chain: u8,
    target_address: Binary,
) -> Result<Response, ContractError> {
    if !chain_ids::is_valid_route(config.chain_id, target_chain) {
        return Err(ContractError::InvalidBridgeRoute {
            src_chain: config.chain_id,
            destination: target_chain,
        });
    }
    if target_address.len() != EVM_ADDRESS_LENGTH {
        return Err(ContractError::InvalidEvmAddressLength {
            got: target_address.len(),
        });
    }
    if amount.is_zero() {
        return Err(ContractError::TokenValueZero);
    }
    let wire_amount =
        u64::try_from(amount.u128()).map_err(|_| ContractError::InvalidAmount {
            reason: format!("amount {amount} exceeds the wire width"),
        })?;

    let sender_bytes = encode_home_address(deps.api, &sender)?;
    let seq_num = next_seq_num(deps.storage, message::TOKEN_TRANSFER)?;

    let bridge_message = message::create_token_transfer_message(
        config.chain_id,
        seq_num,
        &sender_bytes,
        target_chain,
        target_address.as_slice(),
        metadata.token_id,
        wire_amount,
    )?;
    let payload = extract_token_transfer(&bridge_message)?;

    // record first, then burn; both commit atomically
    TRANSFER_RECORDS.save(
        deps.storage,
        (config.chain_id, seq_num),
        &BridgeRecord {
            message: Binary::from(bridge_message.serialize()),
            verified_signatures: None,
            claimed: false,
        },
    )?;

    let burn = treasury::burn_messages(&metadata, amount)?;

    Ok(Response::new()
        .add_messages(burn)
        .add_event(events::token_deposited(
            seq_num,
            config.chain_id,
            target_chain,
            &payload,
        ))
        .add_attribute("method", "send_token")
        .add_attribute("seq_num", seq_num.to_string())
        .add_attribute("sender", sender)
        .add_attribute("token", metadata.token)
        .add_attribute("amount", amount.to_string())
        .add_attribute("target_chain", target_chain.to_string())
        .add_attribute("target_address", hex::encode(target_address.as_slice())))
}
