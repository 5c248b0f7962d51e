//! Committee lifecycle and treasury registration handlers.
//!
//! Everything here prepares state that governance messages later act on:
//! the validator set, committee registrations and the token waiting room.
//! None of it moves value.

use cosmwasm_std::{Binary, DepsMut, MessageInfo, Response};

use crate::committee;
use crate::error::ContractError;
use crate::events;
use crate::state::{ValidatorPower, CONFIG, VALIDATOR_SET};
use crate::treasury;

/// Replace the owner-maintained active validator set.
pub fn execute_update_validator_set(
    deps: DepsMut,
    info: MessageInfo,
    validators: Vec<ValidatorPower>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized);
    }

    VALIDATOR_SET.clear(deps.storage);
    for validator in &validators {
        let address = deps.api.addr_validate(&validator.address)?;
        VALIDATOR_SET.save(deps.storage, &address, &validator.voting_power)?;
    }

    Ok(Response::new()
        .add_attribute("method", "update_validator_set")
        .add_attribute("validators", validators.len().to_string()))
}

/// Register the sender's signing key for the next committee.
pub fn execute_register_committee_member(
    deps: DepsMut,
    info: MessageInfo,
    pubkey: Binary,
    http_url: String,
) -> Result<Response, ContractError> {
    committee::register(deps.storage, &info.sender, &pubkey, http_url)?;

    Ok(Response::new()
        .add_event(events::committee_member_registered(
            info.sender.as_str(),
            pubkey.as_slice(),
        ))
        .add_attribute("method", "register_committee_member"))
}

/// Activate the committee if registrations cover the participation bar.
pub fn execute_create_committee(
    deps: DepsMut,
    info: MessageInfo,
    min_stake_participation_bps: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized);
    }

    let (created, total_power) =
        committee::try_create_next_committee(deps.storage, min_stake_participation_bps)?;

    Ok(Response::new()
        .add_event(events::committee_created(created, total_power))
        .add_attribute("method", "create_committee"))
}

/// Queue a CW20 token for governance approval.
pub fn execute_register_foreign_token(
    deps: DepsMut,
    info: MessageInfo,
    contract_addr: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized);
    }

    let pending = treasury::register_foreign_token(deps, contract_addr)?;

    Ok(Response::new()
        .add_event(events::token_registered(&pending.token, false))
        .add_attribute("method", "register_foreign_token"))
}

/// Queue a native bank denom for governance approval.
pub fn execute_register_native_token(
    deps: DepsMut,
    info: MessageInfo,
    denom: String,
    decimals: u8,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized);
    }

    let pending = treasury::register_native_token(deps.storage, denom, decimals)?;

    Ok(Response::new()
        .add_event(events::token_registered(&pending.token, true))
        .add_attribute("method", "register_native_token"))
}
