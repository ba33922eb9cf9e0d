use cosmwasm_std::{ensure, Addr, Api, Storage};
use sale_std::error::ContractError;
use sale_tokens::{
    allocation::{eth_address, AllocationTuple},
    sale::{SaleConfig, SignedAllocation},
};

use crate::{state::CONSUMED_ALLOCATIONS, supply::SupplyPool};

/// Recovers the `0x` key hash that signed `digest`.
pub trait SignerRecovery {
    fn recover_signer(&self, digest: &[u8; 32], signature: &[u8]) -> Result<String, ContractError>;
}

/// Recovery through the host's secp256k1 implementation.
pub struct ApiRecovery<'a> {
    api: &'a dyn Api,
}

impl<'a> ApiRecovery<'a> {
    pub fn new(api: &'a dyn Api) -> Self {
        Self { api }
    }
}

impl SignerRecovery for ApiRecovery<'_> {
    fn recover_signer(&self, digest: &[u8; 32], signature: &[u8]) -> Result<String, ContractError> {
        ensure!(signature.len() == 65, ContractError::InvalidSignature {});
        let recovery_param = match signature[64] {
            0 | 27 => 0,
            1 | 28 => 1,
            _ => return Err(ContractError::InvalidSignature {}),
        };
        let public_key = self
            .api
            .secp256k1_recover_pubkey(digest, &signature[..64], recovery_param)
            .map_err(|_| ContractError::InvalidSignature {})?;
        eth_address(&public_key)
    }
}

/// Verifies that `signature` over `tuple` comes from `trusted_signer`.
pub fn verify(
    tuple: &AllocationTuple,
    signature: &[u8],
    trusted_signer: &str,
    recovery: &dyn SignerRecovery,
) -> Result<String, ContractError> {
    let digest = tuple.signed_digest()?;
    let signer = recovery
        .recover_signer(&digest, signature)
        .map_err(|_| ContractError::InvalidSignature {})?;
    ensure!(signer == trusted_signer, ContractError::InvalidSignature {});
    Ok(signer)
}

/// A referral must be a valid address other than the buyer.
pub fn validate_referral(api: &dyn Api, buyer: &Addr, referral: &str) -> Result<Addr, ContractError> {
    ensure!(!referral.is_empty(), ContractError::InvalidReferral {});
    let referral = api
        .addr_validate(referral)
        .map_err(|_| ContractError::InvalidReferral {})?;
    ensure!(referral != *buyer, ContractError::InvalidReferral {});
    Ok(referral)
}

pub fn allocation_pool(is_guaranteed: bool) -> SupplyPool {
    if is_guaranteed {
        SupplyPool::Guaranteed
    } else {
        SupplyPool::General
    }
}

pub fn is_consumed(
    storage: &dyn Storage,
    buyer: &Addr,
    pool: SupplyPool,
) -> Result<bool, ContractError> {
    Ok(CONSUMED_ALLOCATIONS.has(storage, (buyer, pool.as_str())))
}

pub fn consume(
    storage: &mut dyn Storage,
    buyer: &Addr,
    pool: SupplyPool,
) -> Result<(), ContractError> {
    CONSUMED_ALLOCATIONS.save(storage, (buyer, pool.as_str()), &true)?;
    Ok(())
}

/// Runs every check a signed purchase of `units` must pass and returns the referral.
/// The allocation is not consumed here.
pub fn check_allocation(
    storage: &dyn Storage,
    api: &dyn Api,
    config: &SaleConfig,
    buyer: &Addr,
    units: u32,
    allocation: &SignedAllocation,
    recovery: &dyn SignerRecovery,
) -> Result<Addr, ContractError> {
    let referral = validate_referral(api, buyer, &allocation.referral)?;
    ensure!(
        units <= allocation.max_units,
        ContractError::AllocationExceeded {}
    );
    ensure!(
        allocation.unit_price >= config.pricing.minimum_unit_price,
        ContractError::PriceBelowFloor {}
    );
    let pool = allocation_pool(allocation.is_guaranteed);
    ensure!(
        !is_consumed(storage, buyer, pool)?,
        ContractError::AllocationAlreadyUsed {}
    );

    let tuple = AllocationTuple {
        buyer: api.addr_canonicalize(buyer.as_str())?,
        referral: api.addr_canonicalize(referral.as_str())?,
        max_units: allocation.max_units,
        unit_price: allocation.unit_price,
        is_guaranteed: allocation.is_guaranteed,
    };
    verify(
        &tuple,
        allocation.signature.as_slice(),
        &config.trusted_signer,
        recovery,
    )?;

    Ok(referral)
}
