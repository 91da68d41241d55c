use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;
use cw20::{AllowanceResponse, BalanceResponse, Cw20Coin, TokenInfoResponse};

#[cw_serde]
pub struct InstantiateMsg {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub initial_balances: Vec<Cw20Coin>,
}

#[cw_serde]
pub enum ExecuteMsg {
    Transfer {
        recipient: String,
        amount: Uint128,
    },
    /// Spends an allowance granted by `owner` to the caller.
    TransferFrom {
        owner: String,
        recipient: String,
        amount: Uint128,
    },
    /// Sets the caller's allowance for `spender`, replacing any previous one.
    Approve {
        spender: String,
        amount: Uint128,
    },
    /// Open to any caller.
    Mint {
        recipient: String,
        amount: Uint128,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(BalanceResponse)]
    Balance { address: String },
    #[returns(AllowanceResponse)]
    Allowance { owner: String, spender: String },
    #[returns(TokenInfoResponse)]
    TokenInfo {},
}
