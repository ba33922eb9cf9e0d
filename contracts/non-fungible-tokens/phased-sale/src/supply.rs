use std::{fmt, ops::Range};

use cosmwasm_schema::cw_serde;
use cosmwasm_std::ensure;
use sale_std::error::ContractError;
use sale_tokens::sale::SupplyCaps;

/// Disjoint supply partitions. Units never spill over between pools.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum SupplyPool {
    /// Public and non guaranteed signed purchases.
    General,
    /// Owner airdrops.
    Airdrop,
    /// Guaranteed signed purchases.
    Guaranteed,
}

impl SupplyPool {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplyPool::General => "general",
            SupplyPool::Airdrop => "airdrop",
            SupplyPool::Guaranteed => "guaranteed",
        }
    }

    pub fn cap(&self, caps: &SupplyCaps) -> u32 {
        match self {
            SupplyPool::General => caps.general_cap(),
            SupplyPool::Airdrop => caps.reserved_airdrop_cap,
            SupplyPool::Guaranteed => caps.reserved_guaranteed_cap,
        }
    }
}

impl fmt::Display for SupplyPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cw_serde]
#[derive(Default)]
pub struct SupplyLedger {
    pub issued_general: u32,
    pub issued_airdrop: u32,
    pub issued_guaranteed: u32,
    /// Id of the next token minted into the registry.
    pub next_token_id: u64,
}

impl SupplyLedger {
    pub fn issued(&self, pool: SupplyPool) -> u32 {
        match pool {
            SupplyPool::General => self.issued_general,
            SupplyPool::Airdrop => self.issued_airdrop,
            SupplyPool::Guaranteed => self.issued_guaranteed,
        }
    }

    fn issued_mut(&mut self, pool: SupplyPool) -> &mut u32 {
        match pool {
            SupplyPool::General => &mut self.issued_general,
            SupplyPool::Airdrop => &mut self.issued_airdrop,
            SupplyPool::Guaranteed => &mut self.issued_guaranteed,
        }
    }

    /// Takes `units` from `pool` and hands out the token ids they are minted under.
    /// Either every unit fits under the pool cap or nothing changes.
    pub fn reserve(
        &mut self,
        caps: &SupplyCaps,
        pool: SupplyPool,
        units: u32,
    ) -> Result<Range<u64>, ContractError> {
        ensure!(units > 0, ContractError::ZeroAmount {});
        let issued = self
            .issued(pool)
            .checked_add(units)
            .ok_or(ContractError::Overflow {})?;
        ensure!(
            issued <= pool.cap(caps),
            ContractError::NoSupplyLeft {
                pool: pool.to_string()
            }
        );
        let first = self.next_token_id;
        let next = first
            .checked_add(u64::from(units))
            .ok_or(ContractError::Overflow {})?;

        *self.issued_mut(pool) = issued;
        self.next_token_id = next;
        Ok(first..next)
    }

    /// Units that count toward the minimum sold threshold.
    pub fn sold(&self) -> u32 {
        self.issued_general.saturating_add(self.issued_guaranteed)
    }

    pub fn total_issued(&self) -> u64 {
        u64::from(self.issued_general)
            + u64::from(self.issued_airdrop)
            + u64::from(self.issued_guaranteed)
    }

    pub fn threshold_reached(&self, caps: &SupplyCaps) -> bool {
        self.sold() >= caps.minimum_sold_threshold
    }

    /// Rejects caps that would sit below what each pool already issued.
    pub fn check_caps(&self, caps: &SupplyCaps) -> Result<(), ContractError> {
        for pool in [
            SupplyPool::General,
            SupplyPool::Airdrop,
            SupplyPool::Guaranteed,
        ] {
            ensure!(
                self.issued(pool) <= pool.cap(caps),
                ContractError::InvalidSupply {
                    msg: format!("{pool} cap is below the units already issued"),
                }
            );
        }
        Ok(())
    }
}
