#[cfg(not(any(feature = "library", feature = "token")))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    coins, to_json_binary, Addr, BankMsg, Binary, Coin, CosmosMsg, Deps, DepsMut, Empty, Env,
    Event, MessageInfo, Order, Response, StdResult, Uint128,
};
use cw2::{get_contract_version, set_contract_version};
use cw20::{Cw20Contract, Cw20ExecuteMsg};
use cw721::{NftInfoResponse, NumTokensResponse, OwnerOfResponse, TokensResponse};
use cw_storage_plus::Bound;
use cw_utils::{may_pay, nonpayable};
use semver::Version;

use crate::error::ContractError;
use crate::fees::{is_valid_bps, PriceBreakdown};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::state::{items, next_item_id, Config, MarketItem, CONFIG, ITEM_COUNTER};

pub const CONTRACT_NAME: &str = "market-nft";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// 0.025 native units at 18 decimals.
pub const DEFAULT_LISTING_FEE: Uint128 = Uint128::new(25_000_000_000_000_000);
pub const DEFAULT_MARKET_FEE_BPS: u64 = 500;

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

#[cfg_attr(not(any(feature = "library", feature = "token")), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let market_fee_bps = msg.market_fee_bps.unwrap_or(DEFAULT_MARKET_FEE_BPS);
    if !is_valid_bps(market_fee_bps) {
        return Err(ContractError::InvalidFeeBps {
            bps: market_fee_bps,
        });
    }

    let owner = match msg.owner {
        Some(owner) => deps.api.addr_validate(&owner)?,
        None => info.sender,
    };

    let config = Config {
        owner,
        token_address: deps.api.addr_validate(&msg.token_address)?,
        denom: msg.denom,
        listing_fee: msg.listing_fee.unwrap_or(DEFAULT_LISTING_FEE),
        market_fee_bps,
    };

    CONFIG.save(deps.storage, &config)?;
    ITEM_COUNTER.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("owner", config.owner)
        .add_attribute("token", config.token_address)
        .add_attribute("listing_fee", config.listing_fee)
        .add_attribute("market_fee_bps", market_fee_bps.to_string()))
}

#[cfg_attr(not(any(feature = "library", feature = "token")), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CreateNft {
            uri,
            token_price,
            native_price,
            creator_fee_bps,
        } => execute_create_nft(
            deps,
            env,
            info,
            uri,
            token_price,
            native_price,
            creator_fee_bps,
        ),
        ExecuteMsg::BuyWithEther { id } => execute_buy_with_ether(deps, info, id),
        ExecuteMsg::BuyWithToken { id, amount } => {
            execute_buy_with_token(deps, env, info, id, amount)
        }
        ExecuteMsg::ResellNft {
            id,
            token_price,
            native_price,
        } => execute_resell_nft(deps, env, info, id, token_price, native_price),
        ExecuteMsg::CancellationOfSale { id } => execute_cancellation_of_sale(deps, info, id),
        ExecuteMsg::TransferNft { recipient, id } => {
            execute_transfer_nft(deps, env, info, recipient, id)
        }
        ExecuteMsg::Withdraw {} => execute_withdraw(deps, env, info),
        ExecuteMsg::TransferOwnership { new_owner } => {
            execute_transfer_ownership(deps, info, new_owner)
        }
    }
}

pub fn execute_create_nft(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    uri: String,
    token_price: Uint128,
    native_price: Uint128,
    creator_fee_bps: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if may_pay(&info, &config.denom)? < config.listing_fee {
        return Err(ContractError::MarketplaceFee {});
    }
    if !is_valid_bps(creator_fee_bps) {
        return Err(ContractError::InvalidFeeBps {
            bps: creator_fee_bps,
        });
    }

    let id = next_item_id(deps.storage)?;
    let item = MarketItem {
        id,
        uri,
        seller: Some(info.sender.clone()),
        owner: env.contract.address,
        creator: info.sender.clone(),
        token_price,
        native_price,
        creator_fee_bps,
        sold: false,
    };
    items().save(deps.storage, id, &item)?;

    Ok(Response::new()
        .add_attribute("action", "create_nft")
        .add_attribute("id", id.to_string())
        .add_attribute("creator", info.sender.as_str())
        .add_event(created_event(&item, &info.sender)))
}

pub fn execute_buy_with_ether(
    deps: DepsMut,
    info: MessageInfo,
    id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut item = items().load(deps.storage, id)?;
    let seller = listed_seller(&item)?;

    let paid = may_pay(&info, &config.denom)?;
    let breakdown = PriceBreakdown::new(
        item.native_price,
        item.creator_fee_bps,
        config.market_fee_bps,
    );
    if paid != breakdown.total()? {
        return Err(ContractError::PriceMismatch {});
    }

    // the market fee stays in the contract balance until withdrawn
    let payments: Vec<CosmosMsg> = payouts(&seller, &item.creator, &breakdown)
        .into_iter()
        .map(|(recipient, amount)| {
            CosmosMsg::Bank(BankMsg::Send {
                to_address: recipient.into_string(),
                amount: coins(amount.u128(), &config.denom),
            })
        })
        .collect();

    item.owner = info.sender.clone();
    item.seller = None;
    item.sold = true;
    items().save(deps.storage, id, &item)?;

    Ok(Response::new()
        .add_attribute("action", "buy_with_ether")
        .add_attribute("id", id.to_string())
        .add_attribute("buyer", info.sender.as_str())
        .add_messages(payments)
        .add_event(sent_nft_event(
            &seller,
            &info.sender,
            Uint128::zero(),
            paid,
            id,
        )))
}

pub fn execute_buy_with_token(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    id: u64,
    amount: Uint128,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let config = CONFIG.load(deps.storage)?;
    let mut item = items().load(deps.storage, id)?;
    let seller = listed_seller(&item)?;

    let breakdown = PriceBreakdown::new(
        item.token_price,
        item.creator_fee_bps,
        config.market_fee_bps,
    );
    if amount != breakdown.total()? {
        return Err(ContractError::PriceMismatch {});
    }

    let cw20 = Cw20Contract(config.token_address);
    let mut messages: Vec<CosmosMsg> = vec![];

    // pull the whole amount against the buyer's allowance, then forward the shares
    if !amount.is_zero() {
        messages.push(cw20.call(Cw20ExecuteMsg::TransferFrom {
            owner: info.sender.to_string(),
            recipient: env.contract.address.to_string(),
            amount,
        })?);
    }
    for (recipient, share) in payouts(&seller, &item.creator, &breakdown) {
        messages.push(cw20.call(Cw20ExecuteMsg::Transfer {
            recipient: recipient.into_string(),
            amount: share,
        })?);
    }

    item.owner = info.sender.clone();
    item.seller = None;
    item.sold = true;
    items().save(deps.storage, id, &item)?;

    Ok(Response::new()
        .add_attribute("action", "buy_with_token")
        .add_attribute("id", id.to_string())
        .add_attribute("buyer", info.sender.as_str())
        .add_messages(messages)
        .add_event(sent_nft_event(
            &seller,
            &info.sender,
            amount,
            Uint128::zero(),
            id,
        )))
}

pub fn execute_resell_nft(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    id: u64,
    token_price: Uint128,
    native_price: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut item = items().load(deps.storage, id)?;

    if item.owner != info.sender {
        return Err(ContractError::NotItemOwner {});
    }
    if token_price.is_zero() || native_price.is_zero() {
        return Err(ContractError::ZeroPrice {});
    }
    if may_pay(&info, &config.denom)? < config.listing_fee {
        return Err(ContractError::MarketplaceFee {});
    }

    item.seller = Some(info.sender.clone());
    item.owner = env.contract.address;
    item.token_price = token_price;
    item.native_price = native_price;
    item.sold = false;
    items().save(deps.storage, id, &item)?;

    Ok(Response::new()
        .add_attribute("action", "resell_nft")
        .add_attribute("id", id.to_string())
        .add_event(
            Event::new("resell")
                .add_attribute("id", id.to_string())
                .add_attribute("seller", info.sender.as_str())
                .add_attribute("token_price", token_price)
                .add_attribute("native_price", native_price),
        ))
}

pub fn execute_cancellation_of_sale(
    deps: DepsMut,
    info: MessageInfo,
    id: u64,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let mut item = items().load(deps.storage, id)?;
    if item.seller.as_ref() != Some(&info.sender) {
        return Err(ContractError::NotSeller {});
    }

    // "sold" doubles as "not listed" once the sale is called off
    item.owner = info.sender.clone();
    item.seller = None;
    item.sold = true;
    items().save(deps.storage, id, &item)?;

    Ok(Response::new()
        .add_attribute("action", "cancellation_of_sale")
        .add_attribute("id", id.to_string())
        .add_attribute("owner", info.sender))
}

pub fn execute_transfer_nft(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    id: u64,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let mut item = items().load(deps.storage, id)?;
    if item.owner != info.sender {
        return Err(ContractError::NotItemOwner {});
    }

    // only a listing puts an item in the marketplace's custody
    let recipient_addr = deps.api.addr_validate(&recipient)?;
    if recipient_addr == env.contract.address {
        return Err(ContractError::TransferToMarket {});
    }

    item.owner = recipient_addr;
    items().save(deps.storage, id, &item)?;

    Ok(Response::new()
        .add_attribute("action", "transfer_nft")
        .add_attribute("id", id.to_string())
        .add_attribute("sender", info.sender)
        .add_attribute("recipient", recipient))
}

pub fn execute_withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized {});
    }

    let balance = deps
        .querier
        .query_balance(env.contract.address.as_str(), &config.denom)?;
    if balance.amount.is_zero() {
        return Err(ContractError::ZeroBalance {});
    }

    Ok(Response::new()
        .add_attribute("action", "withdraw")
        .add_attribute("amount", balance.amount)
        .add_message(BankMsg::Send {
            to_address: config.owner.into_string(),
            amount: vec![balance],
        }))
}

pub fn execute_transfer_ownership(
    deps: DepsMut,
    info: MessageInfo,
    new_owner: String,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized {});
    }

    config.owner = deps.api.addr_validate(&new_owner)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "transfer_ownership")
        .add_attribute("previous_owner", info.sender)
        .add_attribute("new_owner", config.owner))
}

/// The seller of an item that is still up for sale.
fn listed_seller(item: &MarketItem) -> Result<Addr, ContractError> {
    match &item.seller {
        Some(seller) if !item.sold => Ok(seller.clone()),
        _ => Err(ContractError::NotForSale { id: item.id }),
    }
}

/// Seller and creator shares of a sale, merged when the seller is the creator.
/// Zero shares are dropped, the host rejects empty transfers.
fn payouts(seller: &Addr, creator: &Addr, breakdown: &PriceBreakdown) -> Vec<(Addr, Uint128)> {
    let shares = if seller == creator {
        vec![(seller.clone(), breakdown.price + breakdown.creator_fee)]
    } else {
        vec![
            (seller.clone(), breakdown.price),
            (creator.clone(), breakdown.creator_fee),
        ]
    };
    shares
        .into_iter()
        .filter(|(_, amount)| !amount.is_zero())
        .collect()
}

fn created_event(item: &MarketItem, seller: &Addr) -> Event {
    Event::new("created")
        .add_attribute("id", item.id.to_string())
        .add_attribute("seller", seller.as_str())
        .add_attribute("owner", item.owner.as_str())
        .add_attribute("token_price", item.token_price)
        .add_attribute("native_price", item.native_price)
        .add_attribute("sold", item.sold.to_string())
}

fn sent_nft_event(
    seller: &Addr,
    buyer: &Addr,
    token_amount: Uint128,
    ether_amount: Uint128,
    id: u64,
) -> Event {
    Event::new("sent_nft")
        .add_attribute("seller", seller.as_str())
        .add_attribute("buyer", buyer.as_str())
        .add_attribute("token_amount", token_amount)
        .add_attribute("ether_amount", ether_amount)
        .add_attribute("id", id.to_string())
}

#[cfg_attr(not(any(feature = "library", feature = "token")), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::WrongContract {
            previous_contract: stored.contract,
            expected: CONTRACT_NAME.to_string(),
        });
    }

    let previous: Version = stored.version.parse()?;
    let new: Version = CONTRACT_VERSION.parse()?;
    if previous > new {
        return Err(ContractError::MigrationDowngrade {
            previous: stored.version,
            new: CONTRACT_VERSION.to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}

#[cfg_attr(not(any(feature = "library", feature = "token")), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::InfoAboutNft { id } => to_json_binary(&get_item(deps, id)?),
        QueryMsg::Balance {} => to_json_binary(&get_balance(deps, env)?),
        QueryMsg::Config {} => to_json_binary(&CONFIG.load(deps.storage)?),
        QueryMsg::OwnerOf { id } => to_json_binary(&get_owner_of(deps, id)?),
        QueryMsg::NftInfo { id } => to_json_binary(&get_nft_info(deps, id)?),
        QueryMsg::BalanceOf { owner } => to_json_binary(&get_balance_of(deps, owner)?),
        QueryMsg::Tokens {
            owner,
            start_after,
            limit,
        } => to_json_binary(&get_tokens(deps, owner, start_after, limit)?),
        QueryMsg::ListedItems { start_after, limit } => to_json_binary(&collect_items(
            deps,
            start_after,
            limit,
            MarketItem::is_listed,
        )?),
        QueryMsg::AllItems { start_after, limit } => {
            to_json_binary(&collect_items(deps, start_after, limit, |_| true)?)
        }
    }
}

pub fn get_item(deps: Deps, id: u64) -> StdResult<MarketItem> {
    items().load(deps.storage, id)
}

pub fn get_balance(deps: Deps, env: Env) -> StdResult<Coin> {
    let config = CONFIG.load(deps.storage)?;
    deps.querier
        .query_balance(env.contract.address.as_str(), config.denom)
}

pub fn get_owner_of(deps: Deps, id: u64) -> StdResult<OwnerOfResponse> {
    let item = items().load(deps.storage, id)?;
    Ok(OwnerOfResponse {
        owner: item.owner.into_string(),
        approvals: vec![],
    })
}

pub fn get_nft_info(deps: Deps, id: u64) -> StdResult<NftInfoResponse<Empty>> {
    let item = items().load(deps.storage, id)?;
    Ok(NftInfoResponse {
        token_uri: Some(item.uri),
        extension: Empty {},
    })
}

pub fn get_balance_of(deps: Deps, owner: String) -> StdResult<NumTokensResponse> {
    let owner = deps.api.addr_validate(&owner)?;

    let count = items()
        .idx
        .owner
        .prefix(owner)
        .keys_raw(deps.storage, None, None, Order::Ascending)
        .count() as u64;
    Ok(NumTokensResponse { count })
}

pub fn get_tokens(
    deps: Deps,
    owner: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<TokensResponse> {
    let owner = deps.api.addr_validate(&owner)?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let tokens = items()
        .idx
        .owner
        .prefix(owner)
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|id| id.map(|id| id.to_string()))
        .collect::<StdResult<Vec<_>>>()?;
    Ok(TokensResponse { tokens })
}

fn collect_items(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
    keep: impl Fn(&MarketItem) -> bool,
) -> StdResult<Vec<MarketItem>> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    items()
        .range(deps.storage, start, None, Order::Ascending)
        .map(|entry| entry.map(|(_, item)| item))
        .filter(|entry| entry.as_ref().map_or(true, &keep))
        .take(limit)
        .collect()
}
