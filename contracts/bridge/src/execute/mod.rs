//! Execute handlers for the Starcoin Bridge contract.
//!
//! This module contains all execute message handlers, organized by category:
//! - `outgoing` - SendToken and CW20 Receive handlers for outbound transfers
//! - `incoming` - ApproveTokenTransfer and claim handlers for inbound transfers
//! - `governance` - ExecuteSystemMessage dispatch
//! - `admin` - committee lifecycle and treasury registration

mod admin;
mod governance;
mod incoming;
mod outgoing;

pub use admin::*;
pub use governance::*;
pub use incoming::*;
pub use outgoing::*;
