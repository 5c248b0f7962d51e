//! Governance message dispatch.
//!
//! Committee-signed system messages mutate bridge state instead of moving
//! value: emergency pause/unpause, committee block-list, route limit
//! updates, asset price updates and token additions. Governance messages
//! originate on this chain and consume its per-type sequence numbers with
//! no gaps.

use cosmwasm_std::{Binary, DepsMut, Response};

use crate::chain_ids::get_route;
use crate::committee;
use crate::error::ContractError;
use crate::events;
use crate::limiter;
use crate::message::{
    self, BridgeMessage, EMERGENCY_OP_PAUSE, EMERGENCY_OP_UNPAUSE, MESSAGE_VERSION,
};
use crate::state::{CONFIG, SEQUENCE_NUMS};
use crate::treasury;

/// Execute handler for committee-signed governance messages.
///
/// Deliberately not gated on `paused`: the unpause op must run while the
/// bridge is paused.
pub fn execute_system_message(
    deps: DepsMut,
    message_bytes: Binary,
    signatures: Vec<Binary>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    let bridge_message = BridgeMessage::deserialize(message_bytes.as_slice())?;
    if bridge_message.message_version != MESSAGE_VERSION {
        return Err(ContractError::UnexpectedMessageVersion {
            got: bridge_message.message_version,
        });
    }
    if bridge_message.source_chain != config.chain_id {
        return Err(ContractError::UnexpectedChainId {
            got: bridge_message.source_chain,
        });
    }
    if bridge_message.message_type == message::TOKEN_TRANSFER {
        return Err(ContractError::UnexpectedMessageType {
            got: bridge_message.message_type,
        });
    }

    let expected = SEQUENCE_NUMS
        .may_load(deps.storage, bridge_message.message_type)?
        .unwrap_or_default();
    if bridge_message.seq_num != expected {
        return Err(ContractError::UnexpectedSeqNum {
            expected,
            got: bridge_message.seq_num,
        });
    }

    committee::verify_signatures(deps.as_ref(), &bridge_message, &signatures)?;
    SEQUENCE_NUMS.save(deps.storage, bridge_message.message_type, &(expected + 1))?;

    let response = Response::new()
        .add_attribute("method", "execute_system_message")
        .add_attribute("message_type", bridge_message.message_type.to_string())
        .add_attribute("seq_num", bridge_message.seq_num.to_string());

    match bridge_message.message_type {
        message::EMERGENCY_OP => {
            let payload = message::extract_emergency_op(&bridge_message)?;
            match payload.op_type {
                EMERGENCY_OP_PAUSE => {
                    if config.paused {
                        return Err(ContractError::AlreadyPaused);
                    }
                    config.paused = true;
                }
                EMERGENCY_OP_UNPAUSE => {
                    if !config.paused {
                        return Err(ContractError::NotPaused);
                    }
                    config.paused = false;
                }
                op_type => return Err(ContractError::InvalidEmergencyOp { op_type }),
            }
            CONFIG.save(deps.storage, &config)?;
            Ok(response.add_event(events::emergency_op(config.paused)))
        }
        message::COMMITTEE_BLOCKLIST => {
            let payload = message::extract_blocklist(&bridge_message)?;
            let touched = committee::execute_blocklist(deps.storage, &payload)?;
            let mut response = response;
            for evm_address in touched {
                response = response.add_event(events::blocklist_validator(
                    payload.is_blocklisting(),
                    &evm_address,
                ));
            }
            Ok(response)
        }
        message::UPDATE_BRIDGE_LIMIT => {
            // the message's source chain is the receiving end of the route
            let payload = message::extract_update_limit(&bridge_message)?;
            let route = get_route(payload.sending_chain, config.chain_id)?;
            limiter::update_route_limit(deps.storage, route, payload.new_limit)?;
            Ok(response.add_event(events::update_route_limit(
                route.source,
                route.destination,
                payload.new_limit,
            )))
        }
        message::UPDATE_ASSET_PRICE => {
            let payload = message::extract_update_price(&bridge_message)?;
            treasury::update_asset_notional_price(
                deps.storage,
                payload.token_id,
                payload.new_price,
            )?;
            Ok(response.add_event(events::update_token_price(
                payload.token_id,
                payload.new_price,
            )))
        }
        message::ADD_TOKENS_ON_HOME => {
            let payload = message::extract_add_tokens(&bridge_message)?;
            if payload.token_ids.len() != payload.token_type_names.len()
                || payload.token_ids.len() != payload.token_prices.len()
            {
                return Err(ContractError::MalformedMessage);
            }

            let mut response = response;
            for i in 0..payload.token_ids.len() {
                let token_name = String::from_utf8(payload.token_type_names[i].clone())
                    .map_err(|_| ContractError::MalformedMessage)?;
                let metadata = treasury::add_new_token(
                    deps.storage,
                    &token_name,
                    payload.token_ids[i],
                    payload.native_token,
                    payload.token_prices[i],
                )?;
                response = response.add_event(events::new_token(
                    metadata.token_id,
                    &metadata.token,
                    metadata.notional_value,
                ));
            }
            Ok(response)
        }
        got => Err(ContractError::UnexpectedMessageType { got }),
    }
}
