//! Token metadata registry and mint/burn dispatch.
//!
//! Foreign tokens enter a waiting room when their CW20 contract is
//! registered (the bridge must be the minter and supply must be zero) and
//! become transferable only once an add-tokens governance message
//! promotes them. Native bank assets are locked in contract custody on
//! the way out and released on the way in; bridged CW20s are burned and
//! minted.

use cosmwasm_std::{
    to_json_binary, Addr, BankMsg, Coin, CosmosMsg, DepsMut, Storage, Uint128, WasmMsg,
};
use cw20::{Cw20ExecuteMsg, Cw20QueryMsg, TokenInfoResponse};

use crate::error::ContractError;
use crate::state::{
    PendingTokenRegistration, TokenMetadata, TOKEN_IDS, TOKEN_METADATA, WAITING_ROOM,
};

fn decimal_multiplier(decimals: u8) -> Result<u64, ContractError> {
    10u64
        .checked_pow(u32::from(decimals))
        .ok_or(ContractError::InvalidAmount {
            reason: format!("unrepresentable decimals: {decimals}"),
        })
}

/// Place a CW20 token into the registration waiting room.
///
/// The token must have zero total supply at the moment the bridge takes
/// over its mint authority.
pub fn register_foreign_token(
    deps: DepsMut,
    contract_addr: String,
) -> Result<PendingTokenRegistration, ContractError> {
    let token = deps.api.addr_validate(&contract_addr)?;
    let info: TokenInfoResponse = deps
        .querier
        .query_wasm_smart(&token, &Cw20QueryMsg::TokenInfo {})?;

    if !info.total_supply.is_zero() {
        return Err(ContractError::NonZeroSupply {
            token: token.to_string(),
        });
    }

    register_pending(
        deps.storage,
        PendingTokenRegistration {
            token: token.to_string(),
            decimal_multiplier: decimal_multiplier(info.decimals)?,
            native_token: false,
        },
    )
}

/// Place a native bank denom into the registration waiting room.
pub fn register_native_token(
    storage: &mut dyn Storage,
    denom: String,
    decimals: u8,
) -> Result<PendingTokenRegistration, ContractError> {
    register_pending(
        storage,
        PendingTokenRegistration {
            token: denom,
            decimal_multiplier: decimal_multiplier(decimals)?,
            native_token: true,
        },
    )
}

fn register_pending(
    storage: &mut dyn Storage,
    pending: PendingTokenRegistration,
) -> Result<PendingTokenRegistration, ContractError> {
    if TOKEN_METADATA.has(storage, &pending.token) || WAITING_ROOM.has(storage, &pending.token) {
        return Err(ContractError::TokenAlreadyRegistered {
            token: pending.token,
        });
    }
    WAITING_ROOM.save(storage, &pending.token, &pending)?;
    Ok(pending)
}

/// Promote a waiting-room entry to the supported token set.
pub fn add_new_token(
    storage: &mut dyn Storage,
    token_name: &str,
    token_id: u8,
    native_token: bool,
    notional_value: u64,
) -> Result<TokenMetadata, ContractError> {
    if notional_value == 0 {
        return Err(ContractError::ZeroNotionalPrice);
    }
    if TOKEN_IDS.has(storage, token_id) {
        return Err(ContractError::TokenIdAlreadyAssigned { token_id });
    }

    let pending =
        WAITING_ROOM
            .may_load(storage, token_name)?
            .ok_or(ContractError::TokenNotInWaitingRoom {
                token: token_name.to_string(),
            })?;
    if pending.native_token != native_token {
        return Err(ContractError::TokenNotInWaitingRoom {
            token: token_name.to_string(),
        });
    }

    let metadata = TokenMetadata {
        token: pending.token.clone(),
        token_id,
        decimal_multiplier: pending.decimal_multiplier,
        notional_value,
        native_token: pending.native_token,
    };

    WAITING_ROOM.remove(storage, token_name);
    TOKEN_METADATA.save(storage, token_name, &metadata)?;
    TOKEN_IDS.save(storage, token_id, &metadata.token)?;
    Ok(metadata)
}

/// Look up metadata by wire token id.
pub fn token_by_id(storage: &dyn Storage, token_id: u8) -> Result<TokenMetadata, ContractError> {
    let name = TOKEN_IDS
        .may_load(storage, token_id)?
        .ok_or(ContractError::UnsupportedTokenType {
            token: token_id.to_string(),
        })?;
    token_by_name(storage, &name)
}

/// Look up metadata by token identifier.
pub fn token_by_name(storage: &dyn Storage, name: &str) -> Result<TokenMetadata, ContractError> {
    TOKEN_METADATA
        .may_load(storage, name)?
        .ok_or(ContractError::UnsupportedTokenType {
            token: name.to_string(),
        })
}

/// Update the notional USD price of a token; strictly positive.
pub fn update_asset_notional_price(
    storage: &mut dyn Storage,
    token_id: u8,
    new_price: u64,
) -> Result<TokenMetadata, ContractError> {
    if new_price == 0 {
        return Err(ContractError::ZeroNotionalPrice);
    }
    let mut metadata = token_by_id(storage, token_id)?;
    metadata.notional_value = new_price;
    TOKEN_METADATA.save(storage, &metadata.token, &metadata)?;
    Ok(metadata)
}

/// Messages consuming an outbound amount. Bridged CW20s are burned from
/// contract custody; native assets simply stay locked, so no message.
pub fn burn_messages(
    metadata: &TokenMetadata,
    amount: Uint128,
) -> Result<Vec<CosmosMsg>, ContractError> {
    if metadata.native_token {
        return Ok(vec![]);
    }
    Ok(vec![CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: metadata.token.clone(),
        msg: to_json_binary(&Cw20ExecuteMsg::Burn { amount })?,
        funds: vec![],
    })])
}

/// Messages producing an inbound amount for `recipient`.
pub fn mint_messages(
    metadata: &TokenMetadata,
    recipient: &Addr,
    amount: Uint128,
) -> Result<Vec<CosmosMsg>, ContractError> {
    if metadata.native_token {
        return Ok(vec![CosmosMsg::Bank(BankMsg::Send {
            to_address: recipient.to_string(),
            amount: vec![Coin {
                denom: metadata.token.clone(),
                amount,
            }],
        })]);
    }
    Ok(vec![CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: metadata.token.clone(),
        msg: to_json_binary(&Cw20ExecuteMsg::Mint {
            recipient: recipient.to_string(),
            amount,
        })?,
        funds: vec![],
    })])
}
