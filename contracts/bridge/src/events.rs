//! Typed event constructors.
//!
//! Every observable state change emits exactly one of these events on the
//! `Response`. Byte fields are hex-encoded.

use cosmwasm_std::Event;

use crate::message::TokenTransferPayload;

fn transfer_event(name: &str, source_chain: u8, seq_num: u64) -> Event {
    Event::new(name)
        .add_attribute("source_chain", source_chain.to_string())
        .add_attribute("seq_num", seq_num.to_string())
}

/// Outbound transfer recorded and tokens burned/locked.
pub fn token_deposited(
    seq_num: u64,
    source_chain: u8,
    target_chain: u8,
    payload: &TokenTransferPayload,
) -> Event {
    transfer_event("token_deposited", source_chain, seq_num)
        .add_attribute("target_chain", target_chain.to_string())
        .add_attribute("sender_address", hex::encode(&payload.sender_address))
        .add_attribute("target_address", hex::encode(&payload.target_address))
        .add_attribute("token_type", payload.token_type.to_string())
        .add_attribute("amount", payload.amount.to_string())
}

/// Committee signatures stored for a transfer.
pub fn token_transfer_approved(source_chain: u8, seq_num: u64) -> Event {
    transfer_event("token_transfer_approved", source_chain, seq_num)
}

/// Duplicate approval of an already-approved transfer (idempotent).
pub fn token_transfer_already_approved(source_chain: u8, seq_num: u64) -> Event {
    transfer_event("token_transfer_already_approved", source_chain, seq_num)
}

/// Tokens minted/released to the recipient.
pub fn token_transfer_claimed(source_chain: u8, seq_num: u64, token_type: u8, amount: u64) -> Event {
    transfer_event("token_transfer_claimed", source_chain, seq_num)
        .add_attribute("token_type", token_type.to_string())
        .add_attribute("amount", amount.to_string())
}

/// Duplicate claim of a claimed transfer (idempotent).
pub fn token_transfer_already_claimed(source_chain: u8, seq_num: u64) -> Event {
    transfer_event("token_transfer_already_claimed", source_chain, seq_num)
}

/// Claim refused by the route limiter; the caller may retry later.
pub fn token_transfer_limit_exceed(source_chain: u8, seq_num: u64) -> Event {
    transfer_event("token_transfer_limit_exceed", source_chain, seq_num)
}

/// A token was promoted from the waiting room to the supported set.
pub fn new_token(token_id: u8, token: &str, notional_value: u64) -> Event {
    Event::new("new_token")
        .add_attribute("token_id", token_id.to_string())
        .add_attribute("token", token)
        .add_attribute("notional_value", notional_value.to_string())
}

/// Notional USD price updated for a token.
pub fn update_token_price(token_id: u8, new_price: u64) -> Event {
    Event::new("update_token_price")
        .add_attribute("token_id", token_id.to_string())
        .add_attribute("new_price", new_price.to_string())
}

/// Transfer limit updated for a route.
pub fn update_route_limit(source_chain: u8, destination_chain: u8, new_limit: u64) -> Event {
    Event::new("update_route_limit")
        .add_attribute("source_chain", source_chain.to_string())
        .add_attribute("destination_chain", destination_chain.to_string())
        .add_attribute("new_limit", new_limit.to_string())
}

/// Emergency pause/unpause executed.
pub fn emergency_op(paused: bool) -> Event {
    Event::new("emergency_op").add_attribute("paused", paused.to_string())
}

/// A committee member was block-listed or un-block-listed.
pub fn blocklist_validator(blocklisted: bool, evm_address: &[u8]) -> Event {
    Event::new("blocklist_validator")
        .add_attribute("blocklisted", blocklisted.to_string())
        .add_attribute("member", hex::encode(evm_address))
}

/// A validator registered for the next committee.
pub fn committee_member_registered(address: &str, pubkey: &[u8]) -> Event {
    Event::new("committee_member_registered")
        .add_attribute("address", address)
        .add_attribute("pubkey", hex::encode(pubkey))
}

/// Committee creation attempt; `created` is false below min participation.
pub fn committee_created(created: bool, total_power: u64) -> Event {
    Event::new("committee_created")
        .add_attribute("created", created.to_string())
        .add_attribute("total_power", total_power.to_string())
}

/// A token entered the registration waiting room.
pub fn token_registered(token: &str, native: bool) -> Event {
    Event::new("token_registered")
        .add_attribute("token", token)
        .add_attribute("native", native.to_string())
}
