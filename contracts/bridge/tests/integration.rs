//! Bridge-level integration tests: instantiation, the outbound deposit
//! flow for a native asset and treasury registration through the CW20
//! zero-supply gate.

use cosmwasm_std::{coins, Binary, Uint128};
use cw20::{Cw20ExecuteMsg, MinterResponse};
use cw_multi_test::Executor;

use bridge::chain_ids::{ETH_CUSTOM, ETH_MAINNET, ETH_SEPOLIA, STARCOIN_DEVNET};
use bridge::message::create_add_tokens_message;
use bridge::msg::{
    ConfigResponse, ExecuteMsg, QueryMsg, StatusResponse, TransferRecordResponse,
};
use bridge::state::USD_MULTIPLIER;
use bridge::ContractError;

mod common;
use common::{cw20_contract, evm_address, fund_native, has_event, TestBridge};

/// Register the native "ustc" denom (6 decimals, $2) via governance.
fn register_ustc(test: &mut TestBridge) {
    test.app
        .execute_contract(
            test.owner.clone(),
            test.bridge.clone(),
            &ExecuteMsg::RegisterNativeToken {
                denom: "ustc".to_string(),
                decimals: 6,
            },
            &[],
        )
        .unwrap();

    let add = create_add_tokens_message(
        STARCOIN_DEVNET,
        0,
        true,
        &[1],
        &[b"ustc".to_vec()],
        &[2 * USD_MULTIPLIER],
    )
    .unwrap();
    let signatures = test.sign(&[0, 1], &add);
    test.app
        .execute_contract(
            test.owner.clone(),
            test.bridge.clone(),
            &ExecuteMsg::ExecuteSystemMessage {
                message: Binary::from(add.serialize()),
                signatures,
            },
            &[],
        )
        .unwrap();
}

#[test]
fn test_instantiate_seeds_state() {
    let test = TestBridge::new(STARCOIN_DEVNET);

    let config: ConfigResponse = test
        .app
        .wrap()
        .query_wasm_smart(&test.bridge, &QueryMsg::Config {})
        .unwrap();
    assert_eq!(config.chain_id, STARCOIN_DEVNET);
    assert_eq!(config.owner, test.owner);
    assert!(!config.paused);

    let status: StatusResponse = test
        .app
        .wrap()
        .query_wasm_smart(&test.bridge, &QueryMsg::Status {})
        .unwrap();
    assert_eq!(status.committee_members, 3);
    assert_eq!(status.supported_tokens, 0);
}

#[test]
fn test_outbound_native_deposit() {
    let mut test = TestBridge::new(STARCOIN_DEVNET);
    register_ustc(&mut test);

    let sender = test.app.api().addr_make("sender");
    fund_native(&mut test, &sender, 10_000_000, "ustc");

    let res = test
        .app
        .execute_contract(
            sender.clone(),
            test.bridge.clone(),
            &ExecuteMsg::SendToken {
                target_chain: ETH_SEPOLIA,
                target_address: Binary::from(evm_address(0xc8)),
            },
            &coins(10, "ustc"),
        )
        .unwrap();
    assert!(has_event(&res, "token_deposited"));

    // seq 0, record pending
    let record: TransferRecordResponse = test
        .app
        .wrap()
        .query_wasm_smart(
            &test.bridge,
            &QueryMsg::TransferRecord {
                source_chain: STARCOIN_DEVNET,
                seq_num: 0,
            },
        )
        .unwrap();
    assert!(record.exists && !record.approved && !record.claimed);

    // native funds are held in contract custody
    let custody = test
        .app
        .wrap()
        .query_balance(&test.bridge, "ustc")
        .unwrap();
    assert_eq!(custody.amount.u128(), 10);

    // the next deposit takes seq 1
    test.app
        .execute_contract(
            sender.clone(),
            test.bridge.clone(),
            &ExecuteMsg::SendToken {
                target_chain: ETH_SEPOLIA,
                target_address: Binary::from(evm_address(0xc8)),
            },
            &coins(5, "ustc"),
        )
        .unwrap();
    let record: TransferRecordResponse = test
        .app
        .wrap()
        .query_wasm_smart(
            &test.bridge,
            &QueryMsg::TransferRecord {
                source_chain: STARCOIN_DEVNET,
                seq_num: 1,
            },
        )
        .unwrap();
    assert!(record.exists);
}

#[test]
fn test_send_rejects_invalid_route() {
    let mut test = TestBridge::new(STARCOIN_DEVNET);
    register_ustc(&mut test);
    let sender = test.app.api().addr_make("sender");
    fund_native(&mut test, &sender, 1_000, "ustc");

    // devnet never routes to Ethereum mainnet
    let err = test
        .app
        .execute_contract(
            sender,
            test.bridge.clone(),
            &ExecuteMsg::SendToken {
                target_chain: ETH_MAINNET,
                target_address: Binary::from(evm_address(0xc8)),
            },
            &coins(10, "ustc"),
        )
        .unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::InvalidBridgeRoute {
            src_chain: STARCOIN_DEVNET,
            destination: ETH_MAINNET,
        }
    );
}

#[test]
fn test_send_rejects_bad_target_address() {
    let mut test = TestBridge::new(STARCOIN_DEVNET);
    register_ustc(&mut test);
    let sender = test.app.api().addr_make("sender");
    fund_native(&mut test, &sender, 1_000, "ustc");

    let err = test
        .app
        .execute_contract(
            sender,
            test.bridge.clone(),
            &ExecuteMsg::SendToken {
                target_chain: ETH_CUSTOM,
                target_address: Binary::from(vec![0u8; 32]),
            },
            &coins(10, "ustc"),
        )
        .unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::InvalidEvmAddressLength { got: 32 }
    );
}

#[test]
fn test_send_rejects_unregistered_denom() {
    let mut test = TestBridge::new(STARCOIN_DEVNET);
    let sender = test.app.api().addr_make("sender");
    fund_native(&mut test, &sender, 1_000, "uother");

    let err = test
        .app
        .execute_contract(
            sender,
            test.bridge.clone(),
            &ExecuteMsg::SendToken {
                target_chain: ETH_SEPOLIA,
                target_address: Binary::from(evm_address(0xc8)),
            },
            &coins(10, "uother"),
        )
        .unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::UnsupportedTokenType {
            token: "uother".to_string(),
        }
    );
}

#[test]
fn test_register_foreign_token_rejects_nonzero_supply() {
    let mut test = TestBridge::new(STARCOIN_DEVNET);
    let holder = test.app.api().addr_make("holder");

    // a CW20 that already has supply cannot hand over its authority
    let code_id = test.app.store_code(cw20_contract());
    let owner = test.owner.clone();
    let minted = test
        .app
        .instantiate_contract(
            code_id,
            owner.clone(),
            &cw20_base::msg::InstantiateMsg {
                name: "Preminted".to_string(),
                symbol: "PRE".to_string(),
                decimals: 6,
                initial_balances: vec![cw20::Cw20Coin {
                    address: holder.to_string(),
                    amount: Uint128::new(1_000),
                }],
                mint: Some(MinterResponse {
                    minter: test.bridge.to_string(),
                    cap: None,
                }),
                marketing: None,
            },
            &[],
            "preminted",
            Some(owner.to_string()),
        )
        .unwrap();

    let err = test
        .app
        .execute_contract(
            owner,
            test.bridge.clone(),
            &ExecuteMsg::RegisterForeignToken {
                contract_addr: minted.to_string(),
            },
            &[],
        )
        .unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::NonZeroSupply {
            token: minted.to_string(),
        }
    );
}

#[test]
fn test_unapproved_token_cannot_move() {
    let mut test = TestBridge::new(STARCOIN_DEVNET);

    // in the waiting room but never promoted by governance
    test.app
        .execute_contract(
            test.owner.clone(),
            test.bridge.clone(),
            &ExecuteMsg::RegisterNativeToken {
                denom: "ustc".to_string(),
                decimals: 6,
            },
            &[],
        )
        .unwrap();

    let sender = test.app.api().addr_make("sender");
    fund_native(&mut test, &sender, 1_000, "ustc");

    let err = test
        .app
        .execute_contract(
            sender,
            test.bridge.clone(),
            &ExecuteMsg::SendToken {
                target_chain: ETH_SEPOLIA,
                target_address: Binary::from(evm_address(0xc8)),
            },
            &coins(10, "ustc"),
        )
        .unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::UnsupportedTokenType {
            token: "ustc".to_string(),
        }
    );
}

#[test]
fn test_cw20_burn_gate_rejects_unregistered_sender_token() {
    let mut test = TestBridge::new(STARCOIN_DEVNET);
    let holder = test.app.api().addr_make("holder");

    let code_id = test.app.store_code(cw20_contract());
    let owner = test.owner.clone();
    let rogue = test
        .app
        .instantiate_contract(
            code_id,
            owner.clone(),
            &cw20_base::msg::InstantiateMsg {
                name: "Rogue".to_string(),
                symbol: "RGE".to_string(),
                decimals: 6,
                initial_balances: vec![cw20::Cw20Coin {
                    address: holder.to_string(),
                    amount: Uint128::new(1_000),
                }],
                mint: None,
                marketing: None,
            },
            &[],
            "rogue",
            Some(owner.to_string()),
        )
        .unwrap();

    let err = test
        .app
        .execute_contract(
            holder,
            rogue.clone(),
            &Cw20ExecuteMsg::Send {
                contract: test.bridge.to_string(),
                amount: Uint128::new(100),
                msg: cosmwasm_std::to_json_binary(&bridge::msg::ReceiveMsg::SendToken {
                    target_chain: ETH_SEPOLIA,
                    target_address: Binary::from(evm_address(0xc8)),
                })
                .unwrap(),
            },
            &[],
        )
        .unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::UnsupportedTokenType {
            token: rogue.to_string(),
        }
    );
}
