use cosmwasm_std::ensure;
use sale_std::error::ContractError;
use sale_tokens::sale::{LateMintPolicy, SaleConfig, SalePhase, Schedule};

use crate::supply::SupplyLedger;

/// Purchase paths, each with its own admission window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MintPath {
    Unsigned,
    Signed { guaranteed: bool },
}

pub fn current_phase(schedule: &Schedule, now: u64) -> SalePhase {
    if now < schedule.whitelist_start {
        SalePhase::NotStarted
    } else if now < schedule.public_start {
        SalePhase::Whitelist
    } else if now < schedule.mint_finish {
        SalePhase::Public
    } else {
        SalePhase::Finished
    }
}

/// Whether the late mint policy keeps minting open past `mint_finish`.
pub fn late_mint_open(config: &SaleConfig, supply: &SupplyLedger) -> bool {
    match config.late_mint_policy {
        LateMintPolicy::Closed => false,
        LateMintPolicy::WhileUndersold => !supply.threshold_reached(&config.supply),
        LateMintPolicy::AfterThresholdMet => supply.threshold_reached(&config.supply),
    }
}

/// Checks that `path` is admitted at `now` and returns the phase the purchase runs in.
/// A purchase admitted by the late mint policy runs as a public one.
pub fn admit(
    config: &SaleConfig,
    supply: &SupplyLedger,
    now: u64,
    path: MintPath,
) -> Result<SalePhase, ContractError> {
    let phase = match current_phase(&config.schedule, now) {
        SalePhase::NotStarted => return Err(ContractError::SaleNotStarted {}),
        SalePhase::Finished => {
            ensure!(
                late_mint_open(config, supply),
                ContractError::SaleFinished {}
            );
            SalePhase::Public
        }
        phase => phase,
    };

    match path {
        MintPath::Unsigned => ensure!(
            phase == SalePhase::Public,
            ContractError::PublicSaleNotStarted {}
        ),
        MintPath::Signed { guaranteed: true } => ensure!(
            now >= config.schedule.guaranteed_start,
            ContractError::GuaranteedPhaseNotStarted {}
        ),
        MintPath::Signed { guaranteed: false } => {}
    }

    Ok(phase)
}
