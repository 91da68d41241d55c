use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdResult, Storage, Uint128};
use cw_storage_plus::{Index, IndexList, IndexedMap, Item, MultiIndex};

#[cw_serde]
pub struct Config {
    pub owner: Addr,
    pub token_address: Addr,
    pub denom: String,
    pub listing_fee: Uint128,
    pub market_fee_bps: u64,
}

#[cw_serde]
pub struct MarketItem {
    pub id: u64,
    pub uri: String,
    /// `None` once the item is no longer offered for sale.
    pub seller: Option<Addr>,
    pub owner: Addr,
    pub creator: Addr,
    pub token_price: Uint128,
    pub native_price: Uint128,
    pub creator_fee_bps: u64,
    pub sold: bool,
}

impl MarketItem {
    pub fn is_listed(&self) -> bool {
        !self.sold && self.seller.is_some()
    }
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const ITEM_COUNTER: Item<u64> = Item::new("item_counter");

pub struct ItemIndexes<'a> {
    pub owner: MultiIndex<'a, Addr, MarketItem, u64>,
}

impl<'a> IndexList<MarketItem> for ItemIndexes<'a> {
    fn get_indexes(&'_ self) -> Box<dyn Iterator<Item = &'_ dyn Index<MarketItem>> + '_> {
        let v: Vec<&dyn Index<MarketItem>> = vec![&self.owner];
        Box::new(v.into_iter())
    }
}

/// Items by id, indexed by current owner.
pub fn items<'a>() -> IndexedMap<'a, u64, MarketItem, ItemIndexes<'a>> {
    let indexes = ItemIndexes {
        owner: MultiIndex::new(|_pk, item| item.owner.clone(), "items", "items__owner"),
    };
    IndexedMap::new("items", indexes)
}

/// Hands out the next item id, starting from 1.
pub fn next_item_id(store: &mut dyn Storage) -> StdResult<u64> {
    let id = ITEM_COUNTER.may_load(store)?.unwrap_or_default() + 1;
    ITEM_COUNTER.save(store, &id)?;
    Ok(id)
}
