#[cfg(all(feature = "token", not(feature = "library")))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult, Storage,
    Uint128,
};
use cw2::set_contract_version;
use cw20::{AllowanceResponse, BalanceResponse, TokenInfoResponse};
use cw_utils::Expiration;

use crate::token::error::TokenError;
use crate::token::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};
use crate::token::state::{TokenInfo, ALLOWANCES, BALANCES, TOKEN_INFO};

pub const CONTRACT_NAME: &str = "market-token";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(all(feature = "token", not(feature = "library")), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, TokenError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let mut total_supply = Uint128::zero();
    for initial in msg.initial_balances {
        let holder = deps.api.addr_validate(&initial.address)?;
        credit(deps.storage, &holder, initial.amount)?;
        total_supply = total_supply.checked_add(initial.amount)?;
    }

    let info = TokenInfo {
        name: msg.name,
        symbol: msg.symbol,
        decimals: msg.decimals,
        total_supply,
    };
    TOKEN_INFO.save(deps.storage, &info)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("symbol", info.symbol)
        .add_attribute("total_supply", total_supply))
}

#[cfg_attr(all(feature = "token", not(feature = "library")), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, TokenError> {
    match msg {
        ExecuteMsg::Transfer { recipient, amount } => {
            execute_transfer(deps, info, recipient, amount)
        }
        ExecuteMsg::TransferFrom {
            owner,
            recipient,
            amount,
        } => execute_transfer_from(deps, info, owner, recipient, amount),
        ExecuteMsg::Approve { spender, amount } => execute_approve(deps, info, spender, amount),
        ExecuteMsg::Mint { recipient, amount } => execute_mint(deps, info, recipient, amount),
    }
}

pub fn execute_transfer(
    deps: DepsMut,
    info: MessageInfo,
    recipient: String,
    amount: Uint128,
) -> Result<Response, TokenError> {
    if amount.is_zero() {
        return Err(TokenError::InvalidZeroAmount {});
    }
    let recipient = deps.api.addr_validate(&recipient)?;

    debit(deps.storage, &info.sender, amount)?;
    credit(deps.storage, &recipient, amount)?;

    Ok(Response::new()
        .add_attribute("action", "transfer")
        .add_attribute("from", info.sender)
        .add_attribute("to", recipient)
        .add_attribute("amount", amount))
}

pub fn execute_transfer_from(
    deps: DepsMut,
    info: MessageInfo,
    owner: String,
    recipient: String,
    amount: Uint128,
) -> Result<Response, TokenError> {
    if amount.is_zero() {
        return Err(TokenError::InvalidZeroAmount {});
    }
    let owner = deps.api.addr_validate(&owner)?;
    let recipient = deps.api.addr_validate(&recipient)?;

    let allowance = ALLOWANCES
        .may_load(deps.storage, (&owner, &info.sender))?
        .unwrap_or_default();
    if allowance < amount {
        return Err(TokenError::InsufficientAllowance {
            allowance,
            required: amount,
        });
    }
    ALLOWANCES.save(deps.storage, (&owner, &info.sender), &(allowance - amount))?;

    debit(deps.storage, &owner, amount)?;
    credit(deps.storage, &recipient, amount)?;

    Ok(Response::new()
        .add_attribute("action", "transfer_from")
        .add_attribute("from", owner)
        .add_attribute("to", recipient)
        .add_attribute("by", info.sender)
        .add_attribute("amount", amount))
}

pub fn execute_approve(
    deps: DepsMut,
    info: MessageInfo,
    spender: String,
    amount: Uint128,
) -> Result<Response, TokenError> {
    let spender = deps.api.addr_validate(&spender)?;
    if spender == info.sender {
        return Err(TokenError::CannotApproveSelf {});
    }

    if amount.is_zero() {
        ALLOWANCES.remove(deps.storage, (&info.sender, &spender));
    } else {
        ALLOWANCES.save(deps.storage, (&info.sender, &spender), &amount)?;
    }

    Ok(Response::new()
        .add_attribute("action", "approve")
        .add_attribute("owner", info.sender)
        .add_attribute("spender", spender)
        .add_attribute("amount", amount))
}

pub fn execute_mint(
    deps: DepsMut,
    info: MessageInfo,
    recipient: String,
    amount: Uint128,
) -> Result<Response, TokenError> {
    if amount.is_zero() {
        return Err(TokenError::InvalidZeroAmount {});
    }
    let recipient = deps.api.addr_validate(&recipient)?;

    let mut token_info = TOKEN_INFO.load(deps.storage)?;
    token_info.total_supply = token_info.total_supply.checked_add(amount)?;
    TOKEN_INFO.save(deps.storage, &token_info)?;

    credit(deps.storage, &recipient, amount)?;

    Ok(Response::new()
        .add_attribute("action", "mint")
        .add_attribute("minter", info.sender)
        .add_attribute("to", recipient)
        .add_attribute("amount", amount))
}

fn debit(storage: &mut dyn Storage, holder: &Addr, amount: Uint128) -> Result<(), TokenError> {
    let available = BALANCES.may_load(storage, holder)?.unwrap_or_default();
    if available < amount {
        return Err(TokenError::InsufficientBalance {
            available,
            required: amount,
        });
    }
    BALANCES.save(storage, holder, &(available - amount))?;
    Ok(())
}

fn credit(storage: &mut dyn Storage, holder: &Addr, amount: Uint128) -> Result<(), TokenError> {
    BALANCES.update(
        storage,
        holder,
        |balance: Option<Uint128>| -> Result<_, TokenError> {
            Ok(balance.unwrap_or_default().checked_add(amount)?)
        },
    )?;
    Ok(())
}

#[cfg_attr(all(feature = "token", not(feature = "library")), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Balance { address } => to_json_binary(&get_balance(deps, address)?),
        QueryMsg::Allowance { owner, spender } => {
            to_json_binary(&get_allowance(deps, owner, spender)?)
        }
        QueryMsg::TokenInfo {} => to_json_binary(&get_token_info(deps)?),
    }
}

pub fn get_balance(deps: Deps, address: String) -> StdResult<BalanceResponse> {
    let address = deps.api.addr_validate(&address)?;
    let balance = BALANCES
        .may_load(deps.storage, &address)?
        .unwrap_or_default();
    Ok(BalanceResponse { balance })
}

pub fn get_allowance(deps: Deps, owner: String, spender: String) -> StdResult<AllowanceResponse> {
    let owner = deps.api.addr_validate(&owner)?;
    let spender = deps.api.addr_validate(&spender)?;
    let allowance = ALLOWANCES
        .may_load(deps.storage, (&owner, &spender))?
        .unwrap_or_default();
    Ok(AllowanceResponse {
        allowance,
        expires: Expiration::Never {},
    })
}

pub fn get_token_info(deps: Deps) -> StdResult<TokenInfoResponse> {
    let info = TOKEN_INFO.load(deps.storage)?;
    Ok(TokenInfoResponse {
        name: info.name,
        symbol: info.symbol,
        decimals: info.decimals,
        total_supply: info.total_supply,
    })
}
