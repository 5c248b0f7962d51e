//! Per-route transfer limiter.
//!
//! Each directed route keeps a sliding 24-hour window of hourly notional
//! USD totals (8-dp fixed point). A transfer is admitted only if the
//! window total plus the transfer's notional value stays within the
//! route's limit; the comparison runs in 128-bit arithmetic scaled by the
//! token's decimal multiplier so no precision is lost.
//!
//! Routes without an installed limit fail closed: the lookup aborts
//! rather than admitting the transfer.

use cosmwasm_std::Storage;

use crate::chain_ids::Route;
use crate::error::ContractError;
use crate::state::{
    TokenMetadata, TransferWindow, MILLIS_PER_HOUR, TRANSFER_LIMITS, TRANSFER_WINDOWS,
    WINDOW_HOURS,
};

/// Read the limit for a route, aborting if none is installed.
pub fn route_limit(storage: &dyn Storage, route: Route) -> Result<u64, ContractError> {
    TRANSFER_LIMITS
        .may_load(storage, (route.source, route.destination))?
        .ok_or(ContractError::LimitNotFoundForRoute {
            src_chain: route.source,
            destination: route.destination,
        })
}

/// Upsert the limit for a route (8-dp USD).
pub fn update_route_limit(
    storage: &mut dyn Storage,
    route: Route,
    new_limit: u64,
) -> Result<(), ContractError> {
    TRANSFER_LIMITS.save(storage, (route.source, route.destination), &new_limit)?;
    Ok(())
}

/// Slide `window` forward so its head bucket covers `current_hour`.
fn adjust_window(window: &mut TransferWindow, current_hour: u64) {
    if window.hour_head == current_hour {
        return;
    }

    let target_tail = current_hour.saturating_sub(WINDOW_HOURS - 1);
    if window.hour_head < target_tail {
        // the whole recorded window is stale
        window.per_hour_amounts.clear();
        window.per_hour_amounts.push(0);
        window.hour_head = target_tail;
        window.hour_tail = target_tail;
        window.total_amount = 0;
    } else {
        while window.hour_tail < target_tail {
            let evicted = window.per_hour_amounts.remove(0);
            window.total_amount -= evicted;
            window.hour_tail += 1;
        }
    }
    while window.hour_head < current_hour {
        window.per_hour_amounts.push(0);
        window.hour_head += 1;
    }
}

/// Check a transfer against the route limit and record it if admitted.
///
/// Returns `true` if the transfer is within the limit and has been
/// recorded; `false` if it would exceed the limit, in which case nothing
/// is mutated.
pub fn check_and_record_sending_transfer(
    storage: &mut dyn Storage,
    route: Route,
    metadata: &TokenMetadata,
    amount: u64,
    clock_ms: u64,
) -> Result<bool, ContractError> {
    let limit = route_limit(storage, route)?;
    let key = (route.source, route.destination);

    let mut window = TRANSFER_WINDOWS
        .may_load(storage, key)?
        .unwrap_or(TransferWindow {
            hour_head: 0,
            hour_tail: 0,
            per_hour_amounts: vec![0],
            total_amount: 0,
        });

    adjust_window(&mut window, clock_ms / MILLIS_PER_HOUR);

    // token-decimal-scaled notional USD of this transfer
    let notional_with_decimals = u128::from(metadata.notional_value) * u128::from(amount);
    let multiplier = u128::from(metadata.decimal_multiplier);
    let limit_with_decimals = u128::from(limit) * multiplier;
    let window_with_decimals = u128::from(window.total_amount) * multiplier;

    if window_with_decimals + notional_with_decimals > limit_with_decimals {
        return Ok(false);
    }

    let recorded = (notional_with_decimals / multiplier) as u64;
    *window
        .per_hour_amounts
        .last_mut()
        .expect("window always holds at least one bucket") += recorded;
    window.total_amount += recorded;
    TRANSFER_WINDOWS.save(storage, key, &window)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain_ids::{ETH_SEPOLIA, STARCOIN_TESTNET};
    use crate::state::{TokenMetadata, USD_MULTIPLIER};
    use cosmwasm_std::testing::mock_dependencies;
    use cosmwasm_std::MemoryStorage;

    const ROUTE: Route = Route {
        source: ETH_SEPOLIA,
        destination: STARCOIN_TESTNET,
    };

    fn eth(price_usd: u64) -> TokenMetadata {
        TokenMetadata {
            token: "wasm1eth".to_string(),
            token_id: 2,
            decimal_multiplier: 100_000_000, // 8 decimals
            notional_value: price_usd * USD_MULTIPLIER,
            native_token: false,
        }
    }

    fn whole(amount: u64) -> u64 {
        amount * 100_000_000
    }

    fn window(storage: &dyn Storage) -> TransferWindow {
        TRANSFER_WINDOWS
            .load(storage, (ROUTE.source, ROUTE.destination))
            .unwrap()
    }

    fn assert_window_invariants(window: &TransferWindow) {
        assert!(window.per_hour_amounts.len() as u64 <= WINDOW_HOURS);
        assert_eq!(
            window.per_hour_amounts.len() as u64,
            window.hour_head - window.hour_tail + 1
        );
        assert_eq!(
            window.per_hour_amounts.iter().sum::<u64>(),
            window.total_amount
        );
    }

    #[test]
    fn test_missing_route_limit_fails_closed() {
        let mut store = MemoryStorage::new();
        let err = check_and_record_sending_transfer(&mut store, ROUTE, &eth(5), whole(1), 0)
            .unwrap_err();
        assert_eq!(
            err,
            ContractError::LimitNotFoundForRoute {
                src_chain: ETH_SEPOLIA,
                destination: STARCOIN_TESTNET,
            }
        );
    }

    #[test]
    fn test_first_transfer_slides_to_current_hour() {
        let mut deps = mock_dependencies();
        let storage = deps.as_mut().storage;
        update_route_limit(storage, ROUTE, 100_000_000 * USD_MULTIPLIER).unwrap();

        let now_ms = 1_700_000_000_000u64;
        let ok =
            check_and_record_sending_transfer(storage, ROUTE, &eth(5), whole(10_000), now_ms)
                .unwrap();
        assert!(ok);

        let w = window(storage);
        assert_window_invariants(&w);
        assert_eq!(w.hour_head, now_ms / MILLIS_PER_HOUR);
        assert_eq!(w.total_amount, 50_000 * USD_MULTIPLIER);
    }

    #[test]
    fn test_window_slides_over_fifty_hours() {
        let mut deps = mock_dependencies();
        let storage = deps.as_mut().storage;
        update_route_limit(storage, ROUTE, 100_000_000 * USD_MULTIPLIER).unwrap();

        let start_hour = 500_000u64;
        // 10,000 ETH at hour H, then 1,000 ETH per hour for 50 hours
        assert!(check_and_record_sending_transfer(
            storage,
            ROUTE,
            &eth(5),
            whole(10_000),
            start_hour * MILLIS_PER_HOUR,
        )
        .unwrap());
        assert_eq!(window(storage).total_amount, 50_000 * USD_MULTIPLIER);

        for step in 1..=50u64 {
            assert!(check_and_record_sending_transfer(
                storage,
                ROUTE,
                &eth(5),
                whole(1_000),
                (start_hour + step) * MILLIS_PER_HOUR,
            )
            .unwrap());
        }

        let w = window(storage);
        assert_window_invariants(&w);
        assert_eq!(w.per_hour_amounts.len() as u64, WINDOW_HOURS);
        assert_eq!(w.total_amount, 24 * 1_000 * 5 * USD_MULTIPLIER);
    }

    #[test]
    fn test_limit_boundary() {
        let mut deps = mock_dependencies();
        let storage = deps.as_mut().storage;
        // $1M limit, ETH at $10
        update_route_limit(storage, ROUTE, 1_000_000 * USD_MULTIPLIER).unwrap();

        let hour = 600_000u64;
        assert!(check_and_record_sending_transfer(
            storage,
            ROUTE,
            &eth(10),
            whole(90_000),
            hour * MILLIS_PER_HOUR,
        )
        .unwrap());
        assert!(check_and_record_sending_transfer(
            storage,
            ROUTE,
            &eth(10),
            whole(10_000),
            (hour + 1) * MILLIS_PER_HOUR,
        )
        .unwrap());

        // exactly at the cap now; one more ETH is refused
        let before = window(storage);
        assert!(!check_and_record_sending_transfer(
            storage,
            ROUTE,
            &eth(10),
            whole(1),
            (hour + 1) * MILLIS_PER_HOUR,
        )
        .unwrap());
        // refusal does not mutate
        assert_eq!(window(storage), before);

        // 23 hours later the 90k bucket has been evicted
        assert!(check_and_record_sending_transfer(
            storage,
            ROUTE,
            &eth(10),
            whole(90_000),
            (hour + 24) * MILLIS_PER_HOUR,
        )
        .unwrap());
        assert_window_invariants(&window(storage));
    }

    #[test]
    fn test_fully_stale_window_resets() {
        let mut deps = mock_dependencies();
        let storage = deps.as_mut().storage;
        update_route_limit(storage, ROUTE, 1_000 * USD_MULTIPLIER).unwrap();

        let hour = 700_000u64;
        assert!(check_and_record_sending_transfer(
            storage,
            ROUTE,
            &eth(5),
            whole(100),
            hour * MILLIS_PER_HOUR,
        )
        .unwrap());

        // a month later nothing of the old window remains
        assert!(check_and_record_sending_transfer(
            storage,
            ROUTE,
            &eth(5),
            whole(100),
            (hour + 720) * MILLIS_PER_HOUR,
        )
        .unwrap());
        let w = window(storage);
        assert_window_invariants(&w);
        assert_eq!(w.per_hour_amounts.len() as u64, WINDOW_HOURS);
        assert_eq!(w.total_amount, 500 * USD_MULTIPLIER);
        assert_eq!(w.hour_head, hour + 720);
    }

    #[test]
    fn test_sub_usd_decimal_scaling() {
        let mut deps = mock_dependencies();
        let storage = deps.as_mut().storage;
        update_route_limit(storage, ROUTE, 1_000 * USD_MULTIPLIER).unwrap();

        // half an ETH at $5: notional $2.50 recorded without truncation to zero
        assert!(check_and_record_sending_transfer(
            storage,
            ROUTE,
            &eth(5),
            50_000_000,
            0,
        )
        .unwrap());
        assert_eq!(window(storage).total_amount, 2 * USD_MULTIPLIER + 50_000_000);
    }
}
