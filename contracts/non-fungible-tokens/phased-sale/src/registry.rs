use std::ops::Range;

use cosmwasm_std::{ensure, Addr, CosmosMsg};
use sale_std::error::ContractError;
use sale_tokens::{registry::mint_msg, sale::SaleConfig};

use crate::supply::SupplyLedger;

/// Mints every id in `token_ids` to `owner`.
pub fn mint_messages(
    config: &SaleConfig,
    token_ids: Range<u64>,
    owner: &Addr,
) -> Result<Vec<CosmosMsg>, ContractError> {
    token_ids
        .map(|token_id| {
            mint_msg(
                &config.asset_registry,
                token_id,
                owner,
                config.token_uri(token_id),
            )
            .map_err(ContractError::Std)
        })
        .collect()
}

/// Metadata URI of a token that has been issued.
pub fn token_uri(
    config: &SaleConfig,
    supply: &SupplyLedger,
    token_id: u64,
) -> Result<String, ContractError> {
    ensure!(
        token_id < supply.next_token_id,
        ContractError::TokenNotFound { token_id }
    );
    Ok(config.token_uri(token_id))
}
