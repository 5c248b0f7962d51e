//! secp256k1 signature recovery and EVM address derivation.
//!
//! Signature recovery itself runs through the chain's native
//! `secp256k1_recover_pubkey` API; point decompression and compression
//! use `k256` since the chain API has no equivalent.

use cosmwasm_std::Api;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;
use tiny_keccak::{Hasher, Keccak};

use crate::error::ContractError;

/// Byte length of a compressed secp256k1 public key.
pub const COMPRESSED_PUBKEY_LENGTH: usize = 33;

/// Byte length of an uncompressed secp256k1 public key (0x04 prefix).
pub const UNCOMPRESSED_PUBKEY_LENGTH: usize = 65;

/// Byte length of a recoverable ECDSA signature (r || s || v).
pub const SIGNATURE_LENGTH: usize = 65;

/// Byte length of an EVM address.
pub const EVM_ADDRESS_LENGTH: usize = 20;

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Decompress a 33-byte compressed public key to the 65-byte SEC1
/// uncompressed form.
pub fn decompress_pubkey(compressed: &[u8]) -> Result<[u8; 65], ContractError> {
    if compressed.len() != COMPRESSED_PUBKEY_LENGTH {
        return Err(ContractError::InvalidPubkeyLength {
            got: compressed.len(),
        });
    }
    let pubkey =
        PublicKey::from_sec1_bytes(compressed).map_err(|_| ContractError::InvalidPubkey)?;
    let point = pubkey.to_encoded_point(false);
    let bytes = point.as_bytes();
    let mut out = [0u8; 65];
    out.copy_from_slice(bytes);
    Ok(out)
}

/// Compress a 65-byte SEC1 uncompressed public key to 33 bytes.
pub fn compress_pubkey(uncompressed: &[u8]) -> Result<[u8; 33], ContractError> {
    if uncompressed.len() != UNCOMPRESSED_PUBKEY_LENGTH {
        return Err(ContractError::InvalidPubkeyLength {
            got: uncompressed.len(),
        });
    }
    let pubkey =
        PublicKey::from_sec1_bytes(uncompressed).map_err(|_| ContractError::InvalidPubkey)?;
    let point = pubkey.to_encoded_point(true);
    let bytes = point.as_bytes();
    let mut out = [0u8; 33];
    out.copy_from_slice(bytes);
    Ok(out)
}

/// Recover the compressed public key of the signer of `message`.
///
/// `signature` is 65 bytes r || s || v; v is normalized from the
/// Ethereum 27/28 convention. The message is hashed with keccak256
/// before recovery.
pub fn recover_signer(
    api: &dyn Api,
    message: &[u8],
    signature: &[u8],
) -> Result<[u8; 33], ContractError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(ContractError::InvalidSignatureLength {
            got: signature.len(),
        });
    }

    let mut recovery_id = signature[64];
    if recovery_id >= 27 {
        recovery_id -= 27;
    }
    if recovery_id > 1 {
        return Err(ContractError::InvalidSignature);
    }

    let hash = keccak256(message);
    let uncompressed = api
        .secp256k1_recover_pubkey(&hash, &signature[..64], recovery_id)
        .map_err(|_| ContractError::InvalidSignature)?;

    compress_pubkey(&uncompressed)
}

/// Derive the 20-byte EVM address of a compressed public key: keccak256
/// over the decompressed 64-byte tail, bytes 12..32.
pub fn ecdsa_pubkey_to_evm_address(compressed: &[u8]) -> Result<[u8; 20], ContractError> {
    let uncompressed = decompress_pubkey(compressed)?;
    let hash = keccak256(&uncompressed[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..32]);
    Ok(address)
}
