use cosmwasm_std::{ensure, Api, Event, Response};
use sale_std::{common::context::ExecuteContext, error::ContractError, ownership::assert_owner};
use sale_tokens::sale::{normalize_signer, ConfigUpdate, SaleConfig};

use crate::state::{CONFIG, SUPPLY};

pub fn execute_update_config(
    ctx: ExecuteContext,
    update: ConfigUpdate,
) -> Result<Response, ContractError> {
    let ExecuteContext { deps, info, .. } = ctx;
    assert_owner(deps.storage, &info.sender)?;

    let current = CONFIG.load(deps.storage)?;
    let mut config = current.clone();
    let (field, value) = apply_update(&mut config, deps.api, update)?;
    config.validate()?;

    let supply = SUPPLY.load(deps.storage)?;
    supply.check_caps(&config.supply)?;
    // Escrow already credited to the owner cannot become refundable again
    ensure!(
        !supply.threshold_reached(&current.supply) || supply.threshold_reached(&config.supply),
        ContractError::InvalidThreshold {
            msg: "threshold already reached".to_string(),
        }
    );
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_event(
            Event::new("config_updated")
                .add_attribute("field", field)
                .add_attribute("value", value),
        ))
}

/// Writes `update` into `config` and returns the changed field with its new value.
/// The caller still has to validate the result.
pub fn apply_update(
    config: &mut SaleConfig,
    api: &dyn Api,
    update: ConfigUpdate,
) -> Result<(&'static str, String), ContractError> {
    let changed = match update {
        ConfigUpdate::Schedule(schedule) => {
            let value = format!(
                "{},{},{},{}",
                schedule.whitelist_start,
                schedule.public_start,
                schedule.guaranteed_start,
                schedule.mint_finish
            );
            config.schedule = schedule;
            ("schedule", value)
        }
        ConfigUpdate::WhitelistStart { time } => {
            config.schedule.whitelist_start = time;
            ("whitelist_start", time.to_string())
        }
        ConfigUpdate::PublicStart { time } => {
            config.schedule.public_start = time;
            ("public_start", time.to_string())
        }
        ConfigUpdate::GuaranteedStart { time } => {
            config.schedule.guaranteed_start = time;
            ("guaranteed_start", time.to_string())
        }
        ConfigUpdate::MintFinish { time } => {
            config.schedule.mint_finish = time;
            ("mint_finish", time.to_string())
        }
        ConfigUpdate::PublicUnitPrice { price } => {
            config.pricing.public_unit_price = price;
            ("public_unit_price", price.to_string())
        }
        ConfigUpdate::MinimumUnitPrice { price } => {
            config.pricing.minimum_unit_price = price;
            ("minimum_unit_price", price.to_string())
        }
        ConfigUpdate::MarketingShare { bps } => {
            config.pricing.marketing_share_bps = bps;
            ("marketing_share_bps", bps.to_string())
        }
        ConfigUpdate::ReferralShare { bps } => {
            config.pricing.referral_share_bps = bps;
            ("referral_share_bps", bps.to_string())
        }
        ConfigUpdate::PerWalletPublicCap { cap } => {
            config.supply.per_wallet_public_cap = cap;
            ("per_wallet_public_cap", cap.to_string())
        }
        ConfigUpdate::ReservedAirdropCap { cap } => {
            config.supply.reserved_airdrop_cap = cap;
            ("reserved_airdrop_cap", cap.to_string())
        }
        ConfigUpdate::ReservedGuaranteedCap { cap } => {
            config.supply.reserved_guaranteed_cap = cap;
            ("reserved_guaranteed_cap", cap.to_string())
        }
        ConfigUpdate::MinimumSoldThreshold { threshold } => {
            config.supply.minimum_sold_threshold = threshold;
            ("minimum_sold_threshold", threshold.to_string())
        }
        ConfigUpdate::TrustedSigner { signer } => {
            config.trusted_signer = normalize_signer(&signer)?;
            ("trusted_signer", config.trusted_signer.clone())
        }
        ConfigUpdate::PaymentToken { address } => {
            config.payment_token = api.addr_validate(&address)?;
            ("payment_token", address)
        }
        ConfigUpdate::MarketingAccount { address } => {
            config.marketing_account = api.addr_validate(&address)?;
            ("marketing_account", address)
        }
        ConfigUpdate::BaseUri { base_uri } => {
            config.base_uri = base_uri.clone();
            ("base_uri", base_uri)
        }
        ConfigUpdate::BaseExtension { extension } => {
            config.base_extension = extension.clone();
            ("base_extension", extension)
        }
        ConfigUpdate::LateMintPolicy { policy } => {
            config.late_mint_policy = policy;
            ("late_mint_policy", format!("{policy:?}"))
        }
    };
    Ok(changed)
}
