use cosmwasm_schema::cw_serde;
use cosmwasm_std::{ensure, DepsMut, Response};
use cw2::{get_contract_version, set_contract_version};
use semver::Version;

use crate::error::{from_semver, ContractError};

#[cw_serde]
pub struct MigrateMsg {}

fn parse_version(version: &str) -> Result<Version, ContractError> {
    Ok(version.parse().map_err(from_semver)?)
}

/// Bumps the stored cw2 version of `contract_name` to `contract_version`.
/// Fails for another contract's state and for anything but an upgrade.
pub fn migrate(
    deps: DepsMut,
    contract_name: &str,
    contract_version: &str,
) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    ensure!(
        stored.contract == contract_name,
        ContractError::CannotMigrate {
            previous_contract: stored.contract,
        }
    );

    let from = parse_version(&stored.version)?;
    let to = parse_version(contract_version)?;
    ensure!(
        from < to,
        ContractError::CannotMigrate {
            previous_contract: stored.version,
        }
    );

    set_contract_version(deps.storage, contract_name, contract_version)?;

    Ok(Response::default()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", from.to_string())
        .add_attribute("to_version", to.to_string()))
}
