use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    attr, ensure, Addr, Api, DepsMut, Env, Event, MessageInfo, Response, Storage,
};
use cw_storage_plus::Item;
use cw_utils::Expiration;

use crate::error::ContractError;

const OWNER: Item<Addr> = Item::new("owner");
const POTENTIAL_OWNER: Item<Addr> = Item::new("potential_owner");
const POTENTIAL_OWNER_EXPIRATION: Item<Expiration> = Item::new("potential_owner_expiration");

#[cw_serde]
pub enum OwnershipMessage {
    UpdateOwner {
        new_owner: String,
        expiration: Option<Expiration>,
    },
    RevokeOwnershipOffer,
    AcceptOwnership,
}

#[cw_serde]
pub struct ContractOwnerResponse {
    pub owner: String,
}

#[cw_serde]
pub struct ContractPotentialOwnerResponse {
    pub potential_owner: Option<Addr>,
    pub expiration: Option<Expiration>,
}

/// Stores the initial owner, defaulting to the instantiating address.
pub fn initialize_owner(
    storage: &mut dyn Storage,
    api: &dyn Api,
    sender: &Addr,
    owner: Option<String>,
) -> Result<Addr, ContractError> {
    let owner = match owner {
        Some(owner) => api.addr_validate(&owner)?,
        None => sender.clone(),
    };
    OWNER.save(storage, &owner)?;
    Ok(owner)
}

pub fn execute_ownership(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: OwnershipMessage,
) -> Result<Response, ContractError> {
    match msg {
        OwnershipMessage::UpdateOwner {
            new_owner,
            expiration,
        } => update_owner(deps, info, new_owner, expiration),
        OwnershipMessage::RevokeOwnershipOffer => revoke_ownership_offer(deps, info),
        OwnershipMessage::AcceptOwnership => accept_ownership(deps, env, info),
    }
}

/// Offers ownership to `new_owner`. **Only executable by the current contract owner.**
fn update_owner(
    deps: DepsMut,
    info: MessageInfo,
    new_owner: String,
    expiration: Option<Expiration>,
) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info.sender)?;
    let new_owner_addr = deps.api.addr_validate(&new_owner)?;
    ensure!(
        !is_contract_owner(deps.storage, &new_owner_addr)?,
        ContractError::Unauthorized {}
    );
    POTENTIAL_OWNER.save(deps.storage, &new_owner_addr)?;

    if let Some(exp) = expiration {
        POTENTIAL_OWNER_EXPIRATION.save(deps.storage, &exp)?;
    } else {
        // In case an offer is already pending
        POTENTIAL_OWNER_EXPIRATION.remove(deps.storage);
    }

    Ok(Response::new()
        .add_attributes(vec![
            attr("action", "update_owner"),
            attr("value", new_owner_addr.as_str()),
        ])
        .add_event(Event::new("ownership").add_attribute("offered_to", new_owner_addr)))
}

fn revoke_ownership_offer(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info.sender)?;
    POTENTIAL_OWNER.remove(deps.storage);
    POTENTIAL_OWNER_EXPIRATION.remove(deps.storage);
    Ok(Response::new()
        .add_attributes(vec![attr("action", "revoke_ownership_offer")])
        .add_event(Event::new("ownership").add_attribute("offer", "revoked")))
}

/// Accepts a pending offer. **Only executable by the offered address.**
fn accept_ownership(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let new_owner_addr = POTENTIAL_OWNER
        .may_load(deps.storage)?
        .ok_or(ContractError::Unauthorized {})?;
    ensure!(
        info.sender == new_owner_addr,
        ContractError::Unauthorized {}
    );
    if let Some(exp) = POTENTIAL_OWNER_EXPIRATION.may_load(deps.storage)? {
        ensure!(!exp.is_expired(&env.block), ContractError::Unauthorized {});
    }

    OWNER.save(deps.storage, &new_owner_addr)?;
    POTENTIAL_OWNER.remove(deps.storage);
    POTENTIAL_OWNER_EXPIRATION.remove(deps.storage);
    Ok(Response::new()
        .add_attributes(vec![
            attr("action", "accept_ownership"),
            attr("value", new_owner_addr.as_str()),
        ])
        .add_event(Event::new("ownership").add_attribute("owner", new_owner_addr)))
}

pub fn owner(storage: &dyn Storage) -> Result<Addr, ContractError> {
    Ok(OWNER.load(storage)?)
}

pub fn is_contract_owner(storage: &dyn Storage, addr: &Addr) -> Result<bool, ContractError> {
    Ok(OWNER.load(storage)? == *addr)
}

pub fn assert_owner(storage: &dyn Storage, sender: &Addr) -> Result<(), ContractError> {
    ensure!(
        is_contract_owner(storage, sender)?,
        ContractError::Unauthorized {}
    );
    Ok(())
}

pub fn query_owner(storage: &dyn Storage) -> Result<ContractOwnerResponse, ContractError> {
    Ok(ContractOwnerResponse {
        owner: owner(storage)?.to_string(),
    })
}

pub fn query_ownership_offer(
    storage: &dyn Storage,
) -> Result<ContractPotentialOwnerResponse, ContractError> {
    Ok(ContractPotentialOwnerResponse {
        potential_owner: POTENTIAL_OWNER.may_load(storage)?,
        expiration: POTENTIAL_OWNER_EXPIRATION.may_load(storage)?,
    })
}
