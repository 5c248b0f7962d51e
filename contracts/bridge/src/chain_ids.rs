//! Chain identifier registry.
//!
//! Chain ids are 8-bit tags fixed at compile time. A bridge route is a
//! *directed* pair of chain ids drawn from [`VALID_ROUTES`]; the limiter
//! only installs entries for routes pointing at the local chain, so the
//! set of limited routes is a strict subset of the set of legal routes.

use cosmwasm_schema::cw_serde;

use crate::error::ContractError;

/// Starcoin mainnet
pub const STARCOIN_MAINNET: u8 = 0;
/// Starcoin testnet
pub const STARCOIN_TESTNET: u8 = 1;
/// Starcoin devnet
pub const STARCOIN_DEVNET: u8 = 2;
/// Ethereum mainnet
pub const ETH_MAINNET: u8 = 10;
/// Ethereum Sepolia testnet
pub const ETH_SEPOLIA: u8 = 11;
/// Custom EVM chain (local forks, anvil)
pub const ETH_CUSTOM: u8 = 12;

/// All chain ids the bridge will ever accept.
pub const VALID_CHAIN_IDS: &[u8] = &[
    STARCOIN_MAINNET,
    STARCOIN_TESTNET,
    STARCOIN_DEVNET,
    ETH_MAINNET,
    ETH_SEPOLIA,
    ETH_CUSTOM,
];

/// Directed (source, destination) pairs that value may flow across.
///
/// Mainnet only pairs with mainnet; test and dev networks pair with the
/// test EVM chains.
pub const VALID_ROUTES: &[(u8, u8)] = &[
    (STARCOIN_MAINNET, ETH_MAINNET),
    (ETH_MAINNET, STARCOIN_MAINNET),
    (STARCOIN_TESTNET, ETH_SEPOLIA),
    (ETH_SEPOLIA, STARCOIN_TESTNET),
    (STARCOIN_TESTNET, ETH_CUSTOM),
    (ETH_CUSTOM, STARCOIN_TESTNET),
    (STARCOIN_DEVNET, ETH_SEPOLIA),
    (ETH_SEPOLIA, STARCOIN_DEVNET),
    (STARCOIN_DEVNET, ETH_CUSTOM),
    (ETH_CUSTOM, STARCOIN_DEVNET),
];

/// A directed bridge route.
#[cw_serde]
#[derive(Copy)]
pub struct Route {
    pub source: u8,
    pub destination: u8,
}

/// Whether `chain_id` is one of the compiled-in chain ids.
pub fn is_valid_chain_id(chain_id: u8) -> bool {
    VALID_CHAIN_IDS.contains(&chain_id)
}

/// Abort with `InvalidChainId` unless `chain_id` is legal.
pub fn assert_valid_chain_id(chain_id: u8) -> Result<(), ContractError> {
    if is_valid_chain_id(chain_id) {
        Ok(())
    } else {
        Err(ContractError::InvalidChainId { chain_id })
    }
}

/// Whether `(source, destination)` is in the route allow-list.
pub fn is_valid_route(source: u8, destination: u8) -> bool {
    VALID_ROUTES.contains(&(source, destination))
}

/// Resolve a route, aborting with `InvalidBridgeRoute` if it is not allowed.
pub fn get_route(source: u8, destination: u8) -> Result<Route, ContractError> {
    if is_valid_route(source, destination) {
        Ok(Route {
            source,
            destination,
        })
    } else {
        Err(ContractError::InvalidBridgeRoute {
            src_chain: source,
            destination,
        })
    }
}
