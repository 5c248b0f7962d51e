//! Home-chain address encoding for the wire format.
//!
//! On the wire a home account is its canonical address left-padded to 32
//! bytes; an EVM account is its raw 20 bytes. Canonical home addresses
//! are 20 or 32 bytes depending on the account type, so decoding strips
//! the 12-byte zero padding only when the tail is a 20-byte canonical
//! form.

use cosmwasm_std::{Addr, Api, CanonicalAddr};

use crate::codec::CodecError;
use crate::error::ContractError;
use crate::message::HOME_ADDRESS_LENGTH;

/// Encode a home account as 32 bytes (left-padded canonical form).
pub fn encode_home_address(api: &dyn Api, addr: &Addr) -> Result<Vec<u8>, ContractError> {
    let canonical = api.addr_canonicalize(addr.as_str())?;
    let bytes = canonical.as_slice();
    if bytes.len() > HOME_ADDRESS_LENGTH {
        return Err(CodecError::InvalidAddressLength { got: bytes.len() }.into());
    }

    let mut out = vec![0u8; HOME_ADDRESS_LENGTH];
    out[HOME_ADDRESS_LENGTH - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}

/// Decode a 32-byte wire address back into a home account.
pub fn decode_home_address(api: &dyn Api, bytes: &[u8]) -> Result<Addr, ContractError> {
    if bytes.len() != HOME_ADDRESS_LENGTH {
        return Err(CodecError::InvalidAddressLength { got: bytes.len() }.into());
    }

    // 20-byte canonical addresses carry 12 bytes of zero padding
    let canonical = if bytes[..12].iter().all(|&b| b == 0) {
        CanonicalAddr::from(&bytes[12..])
    } else {
        CanonicalAddr::from(bytes)
    };
    Ok(api.addr_humanize(&canonical)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockApi;

    #[test]
    fn test_encode_decode_roundtrip() {
        let api = MockApi::default();
        let addr = api.addr_make("claimant");

        let encoded = encode_home_address(&api, &addr).unwrap();
        assert_eq!(encoded.len(), 32);

        let decoded = decode_home_address(&api, &encoded).unwrap();
        assert_eq!(decoded, addr);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let api = MockApi::default();
        assert_eq!(
            decode_home_address(&api, &[0u8; 20]).unwrap_err(),
            CodecError::InvalidAddressLength { got: 20 }.into()
        );
    }
}
