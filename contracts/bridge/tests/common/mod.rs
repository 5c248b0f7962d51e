#![allow(dead_code)]

//! Shared fixtures for the bridge integration tests.
//!
//! Spins up a bridge with a three-member committee whose signing keys are
//! deterministic, plus helpers to build and sign wire messages the way a
//! relayer would.

use cosmwasm_std::{Addr, Binary, Empty};
use cw20::MinterResponse;
use cw_multi_test::{App, Contract, ContractWrapper, Executor};
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;

use bridge::crypto::keccak256;
use bridge::message::BridgeMessage;
use bridge::msg::{ExecuteMsg, InstantiateMsg};
use bridge::state::ValidatorPower;

/// Committee voting powers used across the tests. The first member alone
/// meets the token-transfer threshold; the others individually do not.
pub const COMMITTEE_POWERS: [u64; 3] = [3334, 3333, 3333];

pub fn bridge_contract() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        bridge::contract::execute,
        bridge::contract::instantiate,
        bridge::contract::query,
    );
    Box::new(contract)
}

pub fn cw20_contract() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    );
    Box::new(contract)
}

pub struct TestBridge {
    pub app: App,
    pub bridge: Addr,
    pub owner: Addr,
    pub keys: Vec<SigningKey>,
}

impl TestBridge {
    /// Instantiate a bridge on `chain_id` and activate a three-member
    /// committee.
    pub fn new(chain_id: u8) -> Self {
        let mut app = App::default();
        let owner = app.api().addr_make("owner");

        let code_id = app.store_code(bridge_contract());
        let bridge = app
            .instantiate_contract(
                code_id,
                owner.clone(),
                &InstantiateMsg { chain_id },
                &[],
                "starcoin-bridge",
                Some(owner.to_string()),
            )
            .unwrap();

        let keys: Vec<SigningKey> = (1..=COMMITTEE_POWERS.len() as u8)
            .map(signing_key)
            .collect();
        let validators: Vec<Addr> = (0..COMMITTEE_POWERS.len())
            .map(|i| app.api().addr_make(&format!("validator{i}")))
            .collect();

        app.execute_contract(
            owner.clone(),
            bridge.clone(),
            &ExecuteMsg::UpdateValidatorSet {
                validators: validators
                    .iter()
                    .zip(COMMITTEE_POWERS)
                    .map(|(addr, voting_power)| ValidatorPower {
                        address: addr.to_string(),
                        voting_power,
                    })
                    .collect(),
            },
            &[],
        )
        .unwrap();

        for (validator, key) in validators.iter().zip(&keys) {
            app.execute_contract(
                validator.clone(),
                bridge.clone(),
                &ExecuteMsg::RegisterCommitteeMember {
                    pubkey: compressed_pubkey(key),
                    http_url: format!("https://{validator}.example"),
                },
                &[],
            )
            .unwrap();
        }

        app.execute_contract(
            owner.clone(),
            bridge.clone(),
            &ExecuteMsg::CreateCommittee {
                min_stake_participation_bps: 10_000,
            },
            &[],
        )
        .unwrap();

        Self {
            app,
            bridge,
            owner,
            keys,
        }
    }

    /// Sign `message` with the committee keys at `signers`.
    pub fn sign(&self, signers: &[usize], message: &BridgeMessage) -> Vec<Binary> {
        signers
            .iter()
            .map(|&i| sign_message(&self.keys[i], message))
            .collect()
    }

    /// The 32-byte wire encoding of a home account.
    pub fn home_address(&self, addr: &Addr) -> Vec<u8> {
        bridge::address::encode_home_address(self.app.api(), addr).unwrap()
    }
}

pub fn signing_key(seed: u8) -> SigningKey {
    let mut bytes = [0u8; 32];
    bytes[31] = seed;
    SigningKey::from_slice(&bytes).unwrap()
}

pub fn compressed_pubkey(key: &SigningKey) -> Binary {
    Binary::from(key.verifying_key().to_encoded_point(true).as_bytes())
}

pub fn sign_message(key: &SigningKey, message: &BridgeMessage) -> Binary {
    let hash = keccak256(&message.signing_preimage());
    let (sig, rid) = key.sign_prehash_recoverable(&hash).unwrap();
    let mut wire = sig.to_bytes().to_vec();
    wire.push(rid.to_byte());
    Binary::from(wire)
}

/// A 20-byte EVM address ending in `last`.
pub fn evm_address(last: u8) -> Vec<u8> {
    let mut addr = vec![0u8; 20];
    addr[19] = last;
    addr
}

/// Instantiate a zero-supply CW20 with the bridge as minter.
pub fn instantiate_cw20(test: &mut TestBridge, symbol: &str, decimals: u8) -> Addr {
    let code_id = test.app.store_code(cw20_contract());
    let owner = test.owner.clone();
    test.app
        .instantiate_contract(
            code_id,
            owner.clone(),
            &cw20_base::msg::InstantiateMsg {
                name: format!("Bridged {symbol}"),
                symbol: symbol.to_string(),
                decimals,
                initial_balances: vec![],
                mint: Some(MinterResponse {
                    minter: test.bridge.to_string(),
                    cap: None,
                }),
                marketing: None,
            },
            &[],
            symbol,
            Some(owner.to_string()),
        )
        .unwrap()
}

/// Mint native funds to an account through the bank sudo hook.
pub fn fund_native(test: &mut TestBridge, to: &Addr, amount: u128, denom: &str) {
    test.app
        .sudo(cw_multi_test::SudoMsg::Bank(
            cw_multi_test::BankSudo::Mint {
                to_address: to.to_string(),
                amount: vec![cosmwasm_std::Coin {
                    denom: denom.to_string(),
                    amount: amount.into(),
                }],
            },
        ))
        .unwrap();
}

/// Whether an `AppResponse` carries a wasm event with the given name.
pub fn has_event(response: &cw_multi_test::AppResponse, name: &str) -> bool {
    response
        .events
        .iter()
        .any(|event| event.ty == format!("wasm-{name}"))
}
