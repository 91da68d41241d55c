use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TokenError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    OverflowError(#[from] OverflowError),

    #[error("Invalid zero amount")]
    InvalidZeroAmount {},

    #[error("Insufficient balance: {available} available, {required} required")]
    InsufficientBalance {
        available: Uint128,
        required: Uint128,
    },

    #[error("Insufficient allowance: {allowance} approved, {required} required")]
    InsufficientAllowance {
        allowance: Uint128,
        required: Uint128,
    },

    #[error("Cannot approve own address")]
    CannotApproveSelf {},
}
