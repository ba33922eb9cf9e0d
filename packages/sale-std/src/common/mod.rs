pub mod context;
pub mod migrate;

use crate::error::ContractError;
use cosmwasm_std::{to_json_binary, Binary, Uint128};
use serde::Serialize;

/// Denominator for every share expressed in basis points.
pub const BPS_DENOMINATOR: u128 = 10_000;

pub fn encode_binary<T>(val: &T) -> Result<Binary, ContractError>
where
    T: Serialize,
{
    match to_json_binary(val) {
        Ok(encoded_val) => Ok(encoded_val),
        Err(err) => Err(err.into()),
    }
}

/// Returns `amount * bps / 10000`, truncated toward zero.
pub fn apply_bps(amount: Uint128, bps: u16) -> Result<Uint128, ContractError> {
    Ok(amount.checked_multiply_ratio(u128::from(bps), BPS_DENOMINATOR)?)
}
