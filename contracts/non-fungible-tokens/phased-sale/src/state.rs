use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Storage, Uint128};
use cw_storage_plus::{Item, Map};
use sale_std::error::ContractError;
use sale_tokens::sale::SaleConfig;

use crate::{settlement::Treasury, supply::SupplyLedger};

pub const CONFIG: Item<SaleConfig> = Item::new("sale_config");

pub const SUPPLY: Item<SupplyLedger> = Item::new("supply_ledger");

pub const TREASURY: Item<Treasury> = Item::new("treasury");

pub const BUYERS: Map<&Addr, Buyer> = Map::new("buyers");

/// Spent one-shot allocation budgets, keyed by buyer and pool name.
pub const CONSUMED_ALLOCATIONS: Map<(&Addr, &str), bool> = Map::new("consumed_allocations");

#[cw_serde]
#[derive(Default)]
pub struct Buyer {
    /// Paid units across every purchase path.
    pub units_purchased: u32,
    /// Refundable share of the buyer's payments.
    pub escrowed_payment: Uint128,
}

pub(crate) fn load_buyer(storage: &dyn Storage, addr: &Addr) -> Result<Buyer, ContractError> {
    Ok(BUYERS.may_load(storage, addr)?.unwrap_or_default())
}
