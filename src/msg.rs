use crate::state::{Config, MarketItem};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Coin, Empty, Uint128};
use cw721::{NftInfoResponse, NumTokensResponse, OwnerOfResponse, TokensResponse};

#[cw_serde]
pub struct InstantiateMsg {
    pub token_address: String,
    pub denom: String,
    /// Defaults to the instantiating address.
    pub owner: Option<String>,
    /// Flat fee paid in `denom` to create or re-create a listing.
    pub listing_fee: Option<Uint128>,
    /// Marketplace cut of every sale, in basis points.
    pub market_fee_bps: Option<u64>,
}

#[cw_serde]
pub enum ExecuteMsg {
    CreateNft {
        uri: String,
        token_price: Uint128,
        native_price: Uint128,
        creator_fee_bps: u64,
    },
    BuyWithEther {
        id: u64,
    },
    BuyWithToken {
        id: u64,
        amount: Uint128,
    },
    ResellNft {
        id: u64,
        token_price: Uint128,
        native_price: Uint128,
    },
    CancellationOfSale {
        id: u64,
    },
    TransferNft {
        recipient: String,
        id: u64,
    },
    Withdraw {},
    TransferOwnership {
        new_owner: String,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(MarketItem)]
    InfoAboutNft { id: u64 },
    /// Native funds retained by the marketplace.
    #[returns(Coin)]
    Balance {},
    #[returns(Config)]
    Config {},
    #[returns(OwnerOfResponse)]
    OwnerOf { id: u64 },
    #[returns(NftInfoResponse<Empty>)]
    NftInfo { id: u64 },
    #[returns(NumTokensResponse)]
    BalanceOf { owner: String },
    #[returns(TokensResponse)]
    Tokens {
        owner: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(Vec<MarketItem>)]
    ListedItems {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(Vec<MarketItem>)]
    AllItems {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}
