use cosmwasm_std::{OverflowError, Uint128};

/// Basis points in 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// What a buyer owes for an item, split by recipient. Fees are charged on
/// top of the asking price and rounded down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub price: Uint128,
    pub creator_fee: Uint128,
    pub market_fee: Uint128,
}

impl PriceBreakdown {
    pub fn new(price: Uint128, creator_fee_bps: u64, market_fee_bps: u64) -> Self {
        Self {
            price,
            creator_fee: bps_of(price, creator_fee_bps),
            market_fee: bps_of(price, market_fee_bps),
        }
    }

    pub fn total(&self) -> Result<Uint128, OverflowError> {
        self.price
            .checked_add(self.creator_fee)?
            .checked_add(self.market_fee)
    }
}

pub fn bps_of(amount: Uint128, bps: u64) -> Uint128 {
    amount.multiply_ratio(bps, BPS_DENOMINATOR)
}

pub fn is_valid_bps(bps: u64) -> bool {
    bps <= BPS_DENOMINATOR
}
