//! Starcoin Bridge Contract - Federated Token Bridging
//!
//! This contract is the home-chain core of a federated, multi-signature
//! token bridge between this chain and EVM chains.
//!
//! # Outbound Flow
//! 1. User sends tokens to this contract (native funds or CW20 send hook)
//! 2. The contract burns/locks them, mints a sequence number and stores a
//!    pending record
//! 3. The bridge committee counter-signs the transfer message off-chain;
//!    its signatures are stored via `ApproveTokenTransfer`
//!
//! # Inbound Flow
//! 1. A relayer submits the foreign deposit message with committee
//!    signatures; the first approval creates the record
//! 2. The recipient (or anyone, via `ClaimAndTransferToken`) claims;
//!    minting is gated by a per-route 24-hour USD rate limit
//!
//! # Security
//! - Weighted ECDSA committee with per-message-type voting thresholds
//! - Per-route sliding-window rate limiting in notional USD
//! - Strict per-type sequence numbers for governance messages
//! - Emergency pause/unpause through the same signed message bus

pub mod address;
pub mod chain_ids;
pub mod codec;
pub mod committee;
pub mod contract;
pub mod crypto;
pub mod error;
pub mod events;
mod execute;
pub mod limiter;
pub mod message;
pub mod msg;
mod query;
pub mod state;
pub mod treasury;

pub use crate::error::ContractError;
pub use crate::message::{BridgeMessage, BRIDGE_MESSAGE_PREFIX, MESSAGE_VERSION};
