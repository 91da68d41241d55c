//! Fungible token paid out by the marketplace for token purchases.
//!
//! Messages for transfers, minting and balances use the cw20 wire format, so
//! the marketplace (and any cw20 client) drives it through `cw20::Cw20Contract`.
//! Build with `--features token` to export its entry points; `library` still
//! turns all exports off.

pub mod contract;
pub mod error;
pub mod msg;
pub mod state;
