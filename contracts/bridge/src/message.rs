//! Bridge message construction and parsing.
//!
//! The on-wire envelope is bit-exact with the EVM peer bridges:
//!
//! ```text
//! byte 0           : message_type (u8)
//! byte 1           : message_version (u8) = 1
//! bytes 2..=9      : seq_num (u64, big-endian)
//! byte 10          : source_chain (u8)
//! bytes 11..       : payload (message-type specific)
//! ```
//!
//! The signing preimage is `"STARCOIN_BRIDGE_MESSAGE" || serialize(message)`,
//! hashed with keccak-256 before ECDSA recovery.
//!
//! Inside payloads, `seq_num`, `amount`, limits and prices are big-endian
//! regardless of the BCS default; vector fields use ULEB128 length
//! prefixes. Every extractor consumes the whole payload and rejects
//! trailing bytes.

use cosmwasm_schema::cw_serde;

use crate::chain_ids;
use crate::codec::{push_uleb_len, push_vec_u8, BridgeBuf, CodecError};
use crate::crypto::EVM_ADDRESS_LENGTH;
use crate::error::ContractError;

/// Domain separator prepended to the serialized message before hashing.
pub const BRIDGE_MESSAGE_PREFIX: &[u8] = b"STARCOIN_BRIDGE_MESSAGE";

/// Only version accepted in this protocol revision.
pub const MESSAGE_VERSION: u8 = 1;

/// Envelope size in bytes before the payload starts.
const HEADER_LENGTH: usize = 11;

/// Exact byte length of a token-transfer payload.
const TOKEN_TRANSFER_PAYLOAD_LENGTH: usize = 64;

/// Byte length of a home-chain account on the wire.
pub const HOME_ADDRESS_LENGTH: usize = 32;

// Message type tags; the values are part of the wire protocol.
pub const TOKEN_TRANSFER: u8 = 0;
pub const COMMITTEE_BLOCKLIST: u8 = 1;
pub const EMERGENCY_OP: u8 = 2;
pub const UPDATE_BRIDGE_LIMIT: u8 = 3;
pub const UPDATE_ASSET_PRICE: u8 = 4;
pub const ADD_TOKENS_ON_HOME: u8 = 5;

/// All message types, in tag order.
pub const ALL_MESSAGE_TYPES: &[u8] = &[
    TOKEN_TRANSFER,
    COMMITTEE_BLOCKLIST,
    EMERGENCY_OP,
    UPDATE_BRIDGE_LIMIT,
    UPDATE_ASSET_PRICE,
    ADD_TOKENS_ON_HOME,
];

// Emergency op payload tags.
pub const EMERGENCY_OP_PAUSE: u8 = 0;
pub const EMERGENCY_OP_UNPAUSE: u8 = 1;

// Blocklist payload tag for removal; any other value adds to the list.
pub const BLOCKLIST_TYPE_UNBLOCK: u8 = 1;

/// A parsed bridge message.
#[cw_serde]
pub struct BridgeMessage {
    pub message_type: u8,
    pub message_version: u8,
    pub seq_num: u64,
    pub source_chain: u8,
    pub payload: Vec<u8>,
}

impl BridgeMessage {
    /// Serialize into the on-wire envelope.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LENGTH + self.payload.len());
        out.push(self.message_type);
        out.push(self.message_version);
        out.extend_from_slice(&self.seq_num.to_be_bytes());
        out.push(self.source_chain);
        out.extend_from_slice(&self.payload);
        out
    }

    /// Parse the envelope; the payload is everything past byte 10.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, ContractError> {
        let mut buf = BridgeBuf::new(bytes.to_vec());
        let message_type = buf.peel_u8()?;
        let message_version = buf.peel_u8()?;
        let seq_num = buf.peel_u64_be()?;
        let source_chain = buf.peel_u8()?;
        let payload = buf.into_remainder_bytes();
        Ok(Self {
            message_type,
            message_version,
            seq_num,
            source_chain,
            payload,
        })
    }

    /// The exact byte sequence fed to keccak-256 before ECDSA recovery.
    pub fn signing_preimage(&self) -> Vec<u8> {
        let mut out = Vec::from(BRIDGE_MESSAGE_PREFIX);
        out.extend_from_slice(&self.serialize());
        out
    }
}

// ============================================================================
// Payload Types
// ============================================================================

/// Decoded token-transfer payload.
#[cw_serde]
pub struct TokenTransferPayload {
    pub sender_address: Vec<u8>,
    pub target_chain: u8,
    pub target_address: Vec<u8>,
    pub token_type: u8,
    pub amount: u64,
}

/// Decoded committee block-list payload.
#[cw_serde]
pub struct BlocklistPayload {
    pub blocklist_type: u8,
    pub members: Vec<Vec<u8>>,
}

impl BlocklistPayload {
    /// `type != 1` blocks; `type == 1` unblocks.
    pub fn is_blocklisting(&self) -> bool {
        self.blocklist_type != BLOCKLIST_TYPE_UNBLOCK
    }
}

/// Decoded emergency-op payload.
#[cw_serde]
pub struct EmergencyOpPayload {
    pub op_type: u8,
}

/// Decoded route-limit update payload. The message's `source_chain` is
/// the receiving chain of the limited route.
#[cw_serde]
pub struct UpdateLimitPayload {
    pub sending_chain: u8,
    pub new_limit: u64,
}

/// Decoded asset-price update payload.
#[cw_serde]
pub struct UpdatePricePayload {
    pub token_id: u8,
    pub new_price: u64,
}

/// Decoded add-tokens payload. Type names are the canonical token
/// identifier bytes as registered with the treasury.
#[cw_serde]
pub struct AddTokensPayload {
    pub native_token: bool,
    pub token_ids: Vec<u8>,
    pub token_type_names: Vec<Vec<u8>>,
    pub token_prices: Vec<u64>,
}

// ============================================================================
// Constructors
// ============================================================================

fn validate_bridge_address(address: &[u8]) -> Result<(), ContractError> {
    if address.len() == EVM_ADDRESS_LENGTH || address.len() == HOME_ADDRESS_LENGTH {
        Ok(())
    } else {
        Err(CodecError::InvalidAddressLength {
            got: address.len(),
        }
        .into())
    }
}

/// Build a token-transfer message. Sender and target are a 32-byte home
/// account and a 20-byte EVM account, one per direction.
pub fn create_token_transfer_message(
    source_chain: u8,
    seq_num: u64,
    sender_address: &[u8],
    target_chain: u8,
    target_address: &[u8],
    token_type: u8,
    amount: u64,
) -> Result<BridgeMessage, ContractError> {
    chain_ids::assert_valid_chain_id(source_chain)?;
    chain_ids::assert_valid_chain_id(target_chain)?;
    validate_bridge_address(sender_address)?;
    validate_bridge_address(target_address)?;

    let mut payload = Vec::with_capacity(TOKEN_TRANSFER_PAYLOAD_LENGTH);
    payload.push(sender_address.len() as u8);
    payload.extend_from_slice(sender_address);
    payload.push(target_chain);
    payload.push(target_address.len() as u8);
    payload.extend_from_slice(target_address);
    payload.push(token_type);
    payload.extend_from_slice(&amount.to_be_bytes());

    if payload.len() != TOKEN_TRANSFER_PAYLOAD_LENGTH {
        return Err(CodecError::InvalidPayloadLength {
            expected: TOKEN_TRANSFER_PAYLOAD_LENGTH,
            got: payload.len(),
        }
        .into());
    }

    Ok(BridgeMessage {
        message_type: TOKEN_TRANSFER,
        message_version: MESSAGE_VERSION,
        seq_num,
        source_chain,
        payload,
    })
}

/// Build a committee block-list message over 20-byte member addresses.
pub fn create_blocklist_message(
    source_chain: u8,
    seq_num: u64,
    blocklist_type: u8,
    members: &[Vec<u8>],
) -> Result<BridgeMessage, ContractError> {
    chain_ids::assert_valid_chain_id(source_chain)?;
    if members.is_empty() {
        return Err(CodecError::EmptyList.into());
    }

    let mut payload = Vec::with_capacity(2 + members.len() * EVM_ADDRESS_LENGTH);
    payload.push(blocklist_type);
    payload.push(members.len() as u8);
    for member in members {
        if member.len() != EVM_ADDRESS_LENGTH {
            return Err(CodecError::InvalidAddressLength { got: member.len() }.into());
        }
        payload.extend_from_slice(member);
    }

    Ok(BridgeMessage {
        message_type: COMMITTEE_BLOCKLIST,
        message_version: MESSAGE_VERSION,
        seq_num,
        source_chain,
        payload,
    })
}

/// Build an emergency-op message (0 = pause, 1 = unpause).
pub fn create_emergency_op_message(
    source_chain: u8,
    seq_num: u64,
    op_type: u8,
) -> Result<BridgeMessage, ContractError> {
    chain_ids::assert_valid_chain_id(source_chain)?;
    Ok(BridgeMessage {
        message_type: EMERGENCY_OP,
        message_version: MESSAGE_VERSION,
        seq_num,
        source_chain,
        payload: vec![op_type],
    })
}

/// Build a route-limit update. `receiving_chain` becomes the message's
/// source chain; the limit is 8-dp USD.
pub fn create_update_bridge_limit_message(
    receiving_chain: u8,
    seq_num: u64,
    sending_chain: u8,
    new_limit: u64,
) -> Result<BridgeMessage, ContractError> {
    chain_ids::assert_valid_chain_id(receiving_chain)?;
    chain_ids::assert_valid_chain_id(sending_chain)?;

    let mut payload = Vec::with_capacity(9);
    payload.push(sending_chain);
    payload.extend_from_slice(&new_limit.to_be_bytes());

    Ok(BridgeMessage {
        message_type: UPDATE_BRIDGE_LIMIT,
        message_version: MESSAGE_VERSION,
        seq_num,
        source_chain: receiving_chain,
        payload,
    })
}

/// Build an asset-price update (8-dp USD).
pub fn create_update_asset_price_message(
    source_chain: u8,
    seq_num: u64,
    token_id: u8,
    new_price: u64,
) -> Result<BridgeMessage, ContractError> {
    chain_ids::assert_valid_chain_id(source_chain)?;

    let mut payload = Vec::with_capacity(9);
    payload.push(token_id);
    payload.extend_from_slice(&new_price.to_be_bytes());

    Ok(BridgeMessage {
        message_type: UPDATE_ASSET_PRICE,
        message_version: MESSAGE_VERSION,
        seq_num,
        source_chain,
        payload,
    })
}

/// Build an add-tokens message registering `(id, type name, price)`
/// triples on the home chain.
pub fn create_add_tokens_message(
    source_chain: u8,
    seq_num: u64,
    native_token: bool,
    token_ids: &[u8],
    token_type_names: &[Vec<u8>],
    token_prices: &[u64],
) -> Result<BridgeMessage, ContractError> {
    chain_ids::assert_valid_chain_id(source_chain)?;

    let mut payload = Vec::new();
    payload.push(u8::from(native_token));
    push_vec_u8(&mut payload, token_ids);
    push_uleb_len(&mut payload, token_type_names.len());
    for name in token_type_names {
        push_vec_u8(&mut payload, name);
    }
    push_uleb_len(&mut payload, token_prices.len());
    for price in token_prices {
        payload.extend_from_slice(&price.to_le_bytes());
    }

    Ok(BridgeMessage {
        message_type: ADD_TOKENS_ON_HOME,
        message_version: MESSAGE_VERSION,
        seq_num,
        source_chain,
        payload,
    })
}

// ============================================================================
// Extractors
// ============================================================================

fn assert_message_type(message: &BridgeMessage, expected: u8) -> Result<(), ContractError> {
    if message.message_type != expected {
        return Err(ContractError::UnexpectedMessageType {
            got: message.message_type,
        });
    }
    Ok(())
}

/// Decode a token-transfer payload; the payload must be exactly 64 bytes.
pub fn extract_token_transfer(
    message: &BridgeMessage,
) -> Result<TokenTransferPayload, ContractError> {
    assert_message_type(message, TOKEN_TRANSFER)?;
    if message.payload.len() != TOKEN_TRANSFER_PAYLOAD_LENGTH {
        return Err(CodecError::InvalidPayloadLength {
            expected: TOKEN_TRANSFER_PAYLOAD_LENGTH,
            got: message.payload.len(),
        }
        .into());
    }

    let mut buf = BridgeBuf::new(message.payload.clone());
    let sender_len = buf.peel_u8()? as usize;
    let sender_address = buf.peel_bytes(sender_len)?;
    let target_chain = buf.peel_u8()?;
    let target_len = buf.peel_u8()? as usize;
    let target_address = buf.peel_bytes(target_len)?;
    let token_type = buf.peel_u8()?;
    let amount = buf.peel_u64_be()?;
    buf.assert_empty()?;

    validate_bridge_address(&sender_address)?;
    validate_bridge_address(&target_address)?;
    chain_ids::assert_valid_chain_id(target_chain)?;

    Ok(TokenTransferPayload {
        sender_address,
        target_chain,
        target_address,
        token_type,
        amount,
    })
}

/// Decode a block-list payload of 20-byte member addresses.
pub fn extract_blocklist(message: &BridgeMessage) -> Result<BlocklistPayload, ContractError> {
    assert_message_type(message, COMMITTEE_BLOCKLIST)?;

    let mut buf = BridgeBuf::new(message.payload.clone());
    let blocklist_type = buf.peel_u8()?;
    let count = buf.peel_u8()? as usize;
    if count == 0 {
        return Err(CodecError::EmptyList.into());
    }
    let mut members = Vec::with_capacity(count);
    for _ in 0..count {
        members.push(buf.peel_bytes(EVM_ADDRESS_LENGTH)?);
    }
    buf.assert_empty()?;

    Ok(BlocklistPayload {
        blocklist_type,
        members,
    })
}

/// Decode an emergency-op payload.
pub fn extract_emergency_op(message: &BridgeMessage) -> Result<EmergencyOpPayload, ContractError> {
    assert_message_type(message, EMERGENCY_OP)?;

    let mut buf = BridgeBuf::new(message.payload.clone());
    let op_type = buf.peel_u8()?;
    buf.assert_empty()?;

    Ok(EmergencyOpPayload { op_type })
}

/// Decode a route-limit update payload.
pub fn extract_update_limit(message: &BridgeMessage) -> Result<UpdateLimitPayload, ContractError> {
    assert_message_type(message, UPDATE_BRIDGE_LIMIT)?;

    let mut buf = BridgeBuf::new(message.payload.clone());
    let sending_chain = buf.peel_u8()?;
    let new_limit = buf.peel_u64_be()?;
    buf.assert_empty()?;

    chain_ids::assert_valid_chain_id(sending_chain)?;

    Ok(UpdateLimitPayload {
        sending_chain,
        new_limit,
    })
}

/// Decode an asset-price update payload.
pub fn extract_update_price(message: &BridgeMessage) -> Result<UpdatePricePayload, ContractError> {
    assert_message_type(message, UPDATE_ASSET_PRICE)?;

    let mut buf = BridgeBuf::new(message.payload.clone());
    let token_id = buf.peel_u8()?;
    let new_price = buf.peel_u64_be()?;
    buf.assert_empty()?;

    Ok(UpdatePricePayload {
        token_id,
        new_price,
    })
}

/// Decode an add-tokens payload.
pub fn extract_add_tokens(message: &BridgeMessage) -> Result<AddTokensPayload, ContractError> {
    assert_message_type(message, ADD_TOKENS_ON_HOME)?;

    let mut buf = BridgeBuf::new(message.payload.clone());
    let native_token = buf.peel_bool()?;
    let token_ids = buf.peel_vec_u8()?;
    let token_type_names = buf.peel_vec_vec_u8()?;
    let token_prices = buf.peel_vec_u64()?;
    buf.assert_empty()?;

    Ok(AddTokensPayload {
        native_token,
        token_ids,
        token_type_names,
        token_prices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain_ids::{ETH_SEPOLIA, STARCOIN_DEVNET, STARCOIN_TESTNET};

    fn evm_address(last: u8) -> Vec<u8> {
        let mut addr = vec![0u8; 20];
        addr[19] = last;
        addr
    }

    fn home_address(last: u8) -> Vec<u8> {
        let mut addr = vec![0u8; 32];
        addr[31] = last;
        addr
    }

    #[test]
    fn test_token_transfer_wire_vector() {
        // EVM -> home transfer of 12345 units of token 3, seq 10.
        let message = create_token_transfer_message(
            ETH_SEPOLIA,
            10,
            &evm_address(0xc8),
            STARCOIN_TESTNET,
            &home_address(0x64),
            3,
            12345,
        )
        .unwrap();

        let expected = "0001000000000000000a0b1400000000000000000000000000000000000000c8\
                        0120000000000000000000000000000000000000000000000000000000000000\
                        0064030000000000003039";
        assert_eq!(hex::encode(message.serialize()), expected);
    }

    #[test]
    fn test_token_transfer_roundtrip() {
        let message = create_token_transfer_message(
            STARCOIN_DEVNET,
            0,
            &home_address(0x64),
            ETH_SEPOLIA,
            &evm_address(0xc8),
            2,
            10,
        )
        .unwrap();

        let parsed = BridgeMessage::deserialize(&message.serialize()).unwrap();
        assert_eq!(parsed, message);

        let payload = extract_token_transfer(&parsed).unwrap();
        assert_eq!(payload.sender_address, home_address(0x64));
        assert_eq!(payload.target_chain, ETH_SEPOLIA);
        assert_eq!(payload.target_address, evm_address(0xc8));
        assert_eq!(payload.token_type, 2);
        assert_eq!(payload.amount, 10);
    }

    #[test]
    fn test_token_transfer_payload_must_be_64_bytes() {
        let mut message = create_token_transfer_message(
            STARCOIN_DEVNET,
            0,
            &home_address(1),
            ETH_SEPOLIA,
            &evm_address(2),
            2,
            10,
        )
        .unwrap();
        message.payload.push(0);

        let err = extract_token_transfer(&message).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidPayloadLength {
                expected: 64,
                got: 65
            }
            .into()
        );
    }

    #[test]
    fn test_token_transfer_rejects_two_home_addresses() {
        // 32 + 32 byte addresses cannot fit the fixed 64-byte payload
        let err = create_token_transfer_message(
            STARCOIN_DEVNET,
            0,
            &home_address(1),
            ETH_SEPOLIA,
            &home_address(2),
            2,
            10,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ContractError::Codec(CodecError::InvalidPayloadLength { .. })
        ));
    }

    #[test]
    fn test_constructor_rejects_invalid_chain() {
        let err = create_token_transfer_message(
            99,
            0,
            &home_address(1),
            ETH_SEPOLIA,
            &evm_address(2),
            2,
            10,
        )
        .unwrap_err();
        assert_eq!(err, ContractError::InvalidChainId { chain_id: 99 });
    }

    #[test]
    fn test_blocklist_roundtrip() {
        let members = vec![evm_address(0xaa), evm_address(0xbb)];
        let message = create_blocklist_message(STARCOIN_TESTNET, 4, 0, &members).unwrap();
        assert_eq!(message.message_type, COMMITTEE_BLOCKLIST);

        let payload = extract_blocklist(&message).unwrap();
        assert!(payload.is_blocklisting());
        assert_eq!(payload.members, members);

        let unblock = create_blocklist_message(STARCOIN_TESTNET, 5, 1, &members).unwrap();
        assert!(!extract_blocklist(&unblock).unwrap().is_blocklisting());
    }

    #[test]
    fn test_blocklist_rejects_empty_and_bad_addresses() {
        assert_eq!(
            create_blocklist_message(STARCOIN_TESTNET, 0, 0, &[]).unwrap_err(),
            CodecError::EmptyList.into()
        );
        assert_eq!(
            create_blocklist_message(STARCOIN_TESTNET, 0, 0, &[vec![1u8; 19]]).unwrap_err(),
            CodecError::InvalidAddressLength { got: 19 }.into()
        );
    }

    #[test]
    fn test_blocklist_rejects_trailing_bytes() {
        let mut message =
            create_blocklist_message(STARCOIN_TESTNET, 0, 0, &[evm_address(1)]).unwrap();
        message.payload.push(0xff);
        assert_eq!(
            extract_blocklist(&message).unwrap_err(),
            CodecError::TrailingBytes { count: 1 }.into()
        );
    }

    #[test]
    fn test_emergency_op_roundtrip() {
        let message =
            create_emergency_op_message(STARCOIN_TESTNET, 0, EMERGENCY_OP_PAUSE).unwrap();
        assert_eq!(
            extract_emergency_op(&message).unwrap().op_type,
            EMERGENCY_OP_PAUSE
        );
        assert_eq!(message.serialize()[0], EMERGENCY_OP);
        assert_eq!(message.serialize().len(), 12);
    }

    #[test]
    fn test_update_limit_roundtrip() {
        let message =
            create_update_bridge_limit_message(STARCOIN_TESTNET, 7, ETH_SEPOLIA, 5_000 * 100_000_000)
                .unwrap();
        // the message's source chain is the receiving chain
        assert_eq!(message.source_chain, STARCOIN_TESTNET);

        let payload = extract_update_limit(&message).unwrap();
        assert_eq!(payload.sending_chain, ETH_SEPOLIA);
        assert_eq!(payload.new_limit, 5_000 * 100_000_000);
    }

    #[test]
    fn test_update_price_roundtrip() {
        let message = create_update_asset_price_message(STARCOIN_TESTNET, 2, 3, 100_000_000)
            .unwrap();
        let payload = extract_update_price(&message).unwrap();
        assert_eq!(payload.token_id, 3);
        assert_eq!(payload.new_price, 100_000_000);
    }

    #[test]
    fn test_add_tokens_roundtrip() {
        let names = vec![b"wasm1usdt".to_vec(), b"wasm1usdc".to_vec()];
        let message = create_add_tokens_message(
            STARCOIN_TESTNET,
            3,
            false,
            &[3, 4],
            &names,
            &[100_000_000, 100_000_000],
        )
        .unwrap();

        let payload = extract_add_tokens(&message).unwrap();
        assert!(!payload.native_token);
        assert_eq!(payload.token_ids, vec![3, 4]);
        assert_eq!(payload.token_type_names, names);
        assert_eq!(payload.token_prices, vec![100_000_000, 100_000_000]);
    }

    #[test]
    fn test_extractor_rejects_wrong_message_type() {
        let message =
            create_emergency_op_message(STARCOIN_TESTNET, 0, EMERGENCY_OP_PAUSE).unwrap();
        assert_eq!(
            extract_blocklist(&message).unwrap_err(),
            ContractError::UnexpectedMessageType { got: EMERGENCY_OP }
        );
    }

    #[test]
    fn test_deserialize_rejects_short_input() {
        let err = BridgeMessage::deserialize(&[0, 1, 2]).unwrap_err();
        assert_eq!(err, CodecError::OutOfRange.into());
    }

    #[test]
    fn test_signing_preimage_has_domain_prefix() {
        let message =
            create_emergency_op_message(STARCOIN_TESTNET, 0, EMERGENCY_OP_PAUSE).unwrap();
        let preimage = message.signing_preimage();
        assert!(preimage.starts_with(b"STARCOIN_BRIDGE_MESSAGE"));
        assert_eq!(&preimage[BRIDGE_MESSAGE_PREFIX.len()..], message.serialize());
    }
}
