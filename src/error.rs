use cosmwasm_std::{OverflowError, StdError};
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("{0}")]
    OverflowError(#[from] OverflowError),

    #[error("Ownable: caller is not the owner")]
    Unauthorized {},

    #[error("You must pay marketplace fee")]
    MarketplaceFee {},

    #[error("Price differs from the cost")]
    PriceMismatch {},

    #[error("Only item owner can perform this operation")]
    NotItemOwner {},

    #[error("Only seller can cancel the sale")]
    NotSeller {},

    #[error("Price can't be zero")]
    ZeroPrice {},

    #[error("Item {id} is not for sale")]
    NotForSale { id: u64 },

    #[error("Items can only enter the marketplace by being listed")]
    TransferToMarket {},

    #[error("Fee of {bps} basis points exceeds 100%")]
    InvalidFeeBps { bps: u64 },

    #[error("Balance is zero")]
    ZeroBalance {},

    #[error("Cannot migrate from {previous_contract}, expected {expected}")]
    WrongContract {
        previous_contract: String,
        expected: String,
    },

    #[error("Cannot migrate from version {previous} to older version {new}")]
    MigrationDowngrade { previous: String, new: String },

    #[error("Invalid contract version: {0}")]
    InvalidVersion(String),
}

impl From<semver::Error> for ContractError {
    fn from(err: semver::Error) -> Self {
        Self::InvalidVersion(err.to_string())
    }
}
