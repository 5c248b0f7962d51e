//! Weighted-voting signature committee.
//!
//! The committee is a map from compressed secp256k1 public key to member.
//! Voting power is expressed in basis points of 10_000; a message is
//! accepted only when the distinct, non-block-listed recovered signers of
//! its domain-separated preimage carry at least the per-message-type
//! threshold.
//!
//! Registration is open only while the members map is empty: validators
//! register their signing keys, and the owner activates the committee
//! once registrants cover the minimum stake participation.

use cosmwasm_std::{Addr, Binary, Deps, Order, StdResult, Storage};

use crate::crypto;
use crate::error::ContractError;
use crate::message::{
    self, BlocklistPayload, BridgeMessage, MESSAGE_VERSION,
};
use crate::state::{
    CommitteeMember, MemberRegistration, COMMITTEE_MEMBERS, MEMBER_REGISTRATIONS, VALIDATOR_SET,
};

// Required voting power per message type, in bps of 10_000.
const APPROVAL_THRESHOLD_TOKEN_TRANSFER: u64 = 3334;
const APPROVAL_THRESHOLD_EMERGENCY_PAUSE: u64 = 450;
const APPROVAL_THRESHOLD_EMERGENCY_UNPAUSE: u64 = 5001;
const APPROVAL_THRESHOLD_GOVERNANCE: u64 = 5001;

/// The voting power a message type must gather to be executed.
///
/// Emergency ops are asymmetric: pausing is cheap, unpausing needs a
/// majority. Unknown emergency op types abort.
pub fn required_voting_power(message: &BridgeMessage) -> Result<u64, ContractError> {
    match message.message_type {
        message::TOKEN_TRANSFER => Ok(APPROVAL_THRESHOLD_TOKEN_TRANSFER),
        message::EMERGENCY_OP => {
            let payload = message::extract_emergency_op(message)?;
            match payload.op_type {
                message::EMERGENCY_OP_PAUSE => Ok(APPROVAL_THRESHOLD_EMERGENCY_PAUSE),
                message::EMERGENCY_OP_UNPAUSE => Ok(APPROVAL_THRESHOLD_EMERGENCY_UNPAUSE),
                op_type => Err(ContractError::InvalidEmergencyOp { op_type }),
            }
        }
        message::COMMITTEE_BLOCKLIST
        | message::UPDATE_BRIDGE_LIMIT
        | message::UPDATE_ASSET_PRICE
        | message::ADD_TOKENS_ON_HOME => Ok(APPROVAL_THRESHOLD_GOVERNANCE),
        got => Err(ContractError::UnexpectedMessageType { got }),
    }
}

/// Register a validator's signing key for the next committee.
///
/// Only possible while no committee is active; the sender must be in the
/// active validator set and the key must not collide with another
/// registration. Re-registering overwrites the sender's own entry.
pub fn register(
    storage: &mut dyn Storage,
    sender: &Addr,
    pubkey: &Binary,
    http_url: String,
) -> Result<(), ContractError> {
    if !COMMITTEE_MEMBERS.is_empty(storage) {
        return Err(ContractError::CommitteeAlreadyInitialized);
    }
    if pubkey.len() != crypto::COMPRESSED_PUBKEY_LENGTH {
        return Err(ContractError::InvalidPubkeyLength { got: pubkey.len() });
    }
    if !VALIDATOR_SET.has(storage, sender) {
        return Err(ContractError::NotActiveValidator);
    }

    let registrations = all_registrations(storage)?;
    for registration in &registrations {
        if registration.pubkey == *pubkey && registration.address != *sender {
            return Err(ContractError::DuplicatePubkey);
        }
    }

    MEMBER_REGISTRATIONS.save(
        storage,
        sender,
        &MemberRegistration {
            address: sender.clone(),
            pubkey: pubkey.clone(),
            http_url,
        },
    )?;
    Ok(())
}

/// Activate the committee if registrants cover `min_participation_bps` of
/// the active validator power. Returns `(created, total_power)`; below
/// the threshold the call is a no-op.
pub fn try_create_next_committee(
    storage: &mut dyn Storage,
    min_participation_bps: u64,
) -> Result<(bool, u64), ContractError> {
    if !COMMITTEE_MEMBERS.is_empty(storage) {
        return Err(ContractError::CommitteeAlreadyInitialized);
    }

    let registrations = all_registrations(storage)?;
    let mut members = Vec::new();
    let mut total_power = 0u64;
    for registration in registrations {
        let Some(voting_power) = VALIDATOR_SET.may_load(storage, &registration.address)? else {
            // registrant dropped out of the validator set since registering
            continue;
        };
        total_power += voting_power;
        members.push(CommitteeMember {
            address: registration.address,
            pubkey: registration.pubkey,
            voting_power,
            http_url: registration.http_url,
            blocklisted: false,
        });
    }

    if total_power < min_participation_bps {
        return Ok((false, total_power));
    }

    for member in members {
        COMMITTEE_MEMBERS.save(storage, member.pubkey.as_slice(), &member)?;
    }
    MEMBER_REGISTRATIONS.clear(storage);
    Ok((true, total_power))
}

/// Apply a block-list payload to the members map.
///
/// Each 20-byte address must resolve to a member's EVM address; members
/// keep their slot, only the `blocklisted` flag toggles. Returns the EVM
/// addresses touched.
pub fn execute_blocklist(
    storage: &mut dyn Storage,
    payload: &BlocklistPayload,
) -> Result<Vec<[u8; 20]>, ContractError> {
    let members: Vec<CommitteeMember> = COMMITTEE_MEMBERS
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, member)| member))
        .collect::<StdResult<_>>()?;

    let mut touched = Vec::with_capacity(payload.members.len());
    for target in &payload.members {
        let mut found = false;
        for member in &members {
            let evm_address = crypto::ecdsa_pubkey_to_evm_address(&member.pubkey)?;
            if evm_address.as_slice() == target.as_slice() {
                let mut updated = member.clone();
                updated.blocklisted = payload.is_blocklisting();
                COMMITTEE_MEMBERS.save(storage, updated.pubkey.as_slice(), &updated)?;
                touched.push(evm_address);
                found = true;
                break;
            }
        }
        if !found {
            return Err(ContractError::BlocklistContainsUnknownKey);
        }
    }
    Ok(touched)
}

/// Verify committee signatures over a message's domain-separated preimage.
///
/// Duplicate recovered keys abort even when the same signer appears
/// twice; unknown signers abort; block-listed members contribute zero
/// power but are not an error.
pub fn verify_signatures(
    deps: Deps,
    message: &BridgeMessage,
    signatures: &[Binary],
) -> Result<(), ContractError> {
    if message.message_version != MESSAGE_VERSION {
        return Err(ContractError::UnexpectedMessageVersion {
            got: message.message_version,
        });
    }

    let required = required_voting_power(message)?;
    let preimage = message.signing_preimage();

    let mut seen: Vec<[u8; 33]> = Vec::with_capacity(signatures.len());
    let mut aggregate_power = 0u64;
    for signature in signatures {
        let signer = crypto::recover_signer(deps.api, &preimage, signature.as_slice())?;
        if seen.contains(&signer) {
            return Err(ContractError::DuplicatedSignature);
        }
        seen.push(signer);

        let member = COMMITTEE_MEMBERS
            .may_load(deps.storage, &signer)?
            .ok_or(ContractError::InvalidSignature)?;
        if !member.blocklisted {
            aggregate_power += member.voting_power;
        }
    }

    if aggregate_power < required {
        return Err(ContractError::SignatureBelowThreshold {
            required,
            got: aggregate_power,
        });
    }
    Ok(())
}

fn all_registrations(storage: &dyn Storage) -> StdResult<Vec<MemberRegistration>> {
    MEMBER_REGISTRATIONS
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, registration)| registration))
        .collect()
}
