use sale_std::{
    common::{
        context::ExecuteContext,
        encode_binary,
        migrate::{migrate as migrate_contract, MigrateMsg},
    },
    error::ContractError,
    ownership::{
        assert_owner, execute_ownership, initialize_owner, query_owner, query_ownership_offer,
    },
};
use sale_tokens::sale::{
    normalize_signer, BuyerResponse, ExecuteMsg, InstantiateMsg, PaymentBalanceResponse,
    PhaseResponse, QueryMsg, SaleConfig, SalePhase, SignedAllocation, SupplyResponse,
    TokenUriResponse, TreasuryResponse,
};

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{ensure, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Response, Uint128};

use crate::{
    authorization::{
        allocation_pool, check_allocation, consume, is_consumed, validate_referral, ApiRecovery,
    },
    config::execute_update_config,
    payment::PaymentToken,
    phase::{admit, current_phase, late_mint_open, MintPath},
    refund::{execute_redeem_owner, execute_refund},
    registry::{mint_messages, token_uri},
    settlement::{charge, Treasury},
    state::{load_buyer, Buyer, BUYERS, CONFIG, SUPPLY, TREASURY},
    supply::{SupplyLedger, SupplyPool},
};

const CONTRACT_NAME: &str = "crates.io:phased-sale";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    let config = SaleConfig {
        schedule: msg.schedule,
        pricing: msg.pricing,
        supply: msg.supply,
        trusted_signer: normalize_signer(&msg.trusted_signer)?,
        payment_token: deps.api.addr_validate(&msg.payment_token)?,
        asset_registry: deps.api.addr_validate(&msg.asset_registry)?,
        marketing_account: deps.api.addr_validate(&msg.marketing_account)?,
        base_uri: msg.base_uri,
        base_extension: msg.base_extension,
        late_mint_policy: msg.late_mint_policy.unwrap_or_default(),
    };
    config.validate()?;

    CONFIG.save(deps.storage, &config)?;
    SUPPLY.save(deps.storage, &SupplyLedger::default())?;
    TREASURY.save(deps.storage, &Treasury::default())?;

    cw2::set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    let owner = initialize_owner(deps.storage, deps.api, &info.sender, msg.owner)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("type", CONTRACT_NAME)
        .add_attribute("owner", owner)
        .add_attribute("total_supply_cap", config.supply.total_supply_cap.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    migrate_contract(deps, CONTRACT_NAME, CONTRACT_VERSION)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    let ctx = ExecuteContext::new(deps, info, env);

    match msg {
        ExecuteMsg::Mint { units } => execute_mint(ctx, units, None),
        ExecuteMsg::MintReferred { units, referral } => execute_mint(ctx, units, Some(referral)),
        ExecuteMsg::MintAllocation { units, allocation } => {
            execute_mint_allocation(ctx, units, allocation)
        }
        ExecuteMsg::Airdrop { recipients, units } => execute_airdrop(ctx, recipients, units),
        ExecuteMsg::RedeemOwner { receiver } => execute_redeem_owner(ctx, receiver),
        ExecuteMsg::Refund {} => execute_refund(ctx),
        ExecuteMsg::UpdateConfig { update } => execute_update_config(ctx, update),
        ExecuteMsg::Ownership(msg) => execute_ownership(ctx.deps, ctx.env, ctx.info, msg),
    }
}

/// A purchase that passed admission and eligibility checks.
struct Purchase {
    action: &'static str,
    units: u32,
    unit_price: Uint128,
    referral: Option<Addr>,
    pool: SupplyPool,
    phase: SalePhase,
}

fn execute_mint(
    ctx: ExecuteContext,
    units: u32,
    referral: Option<String>,
) -> Result<Response, ContractError> {
    let ExecuteContext {
        deps, info, env, ..
    } = ctx;

    let config = CONFIG.load(deps.storage)?;
    let supply = SUPPLY.load(deps.storage)?;
    let phase = admit(&config, &supply, env.block.time.seconds(), MintPath::Unsigned)?;
    ensure!(units > 0, ContractError::ZeroAmount {});

    let referral = referral
        .map(|referral| validate_referral(deps.api, &info.sender, &referral))
        .transpose()?;

    let buyer = load_buyer(deps.storage, &info.sender)?;
    let purchased = buyer
        .units_purchased
        .checked_add(units)
        .ok_or(ContractError::Overflow {})?;
    ensure!(
        purchased <= config.supply.per_wallet_public_cap,
        ContractError::PerWalletCapExceeded {}
    );

    let action = if referral.is_some() {
        "mint_referred"
    } else {
        "mint"
    };
    let purchase = Purchase {
        action,
        units,
        unit_price: config.pricing.public_unit_price,
        referral,
        pool: SupplyPool::General,
        phase,
    };
    settle_purchase(deps, &env, &info.sender, &config, supply, buyer, purchase)
}

fn execute_mint_allocation(
    ctx: ExecuteContext,
    units: u32,
    allocation: SignedAllocation,
) -> Result<Response, ContractError> {
    let ExecuteContext {
        mut deps,
        info,
        env,
        ..
    } = ctx;

    let config = CONFIG.load(deps.storage)?;
    let supply = SUPPLY.load(deps.storage)?;
    let phase = admit(
        &config,
        &supply,
        env.block.time.seconds(),
        MintPath::Signed {
            guaranteed: allocation.is_guaranteed,
        },
    )?;
    ensure!(units > 0, ContractError::ZeroAmount {});

    let referral = check_allocation(
        deps.storage,
        deps.api,
        &config,
        &info.sender,
        units,
        &allocation,
        &ApiRecovery::new(deps.api),
    )?;

    let buyer = load_buyer(deps.storage, &info.sender)?;
    let pool = allocation_pool(allocation.is_guaranteed);
    let purchase = Purchase {
        action: "mint_allocation",
        units,
        unit_price: allocation.unit_price,
        referral: Some(referral),
        pool,
        phase,
    };
    let res = settle_purchase(
        deps.branch(),
        &env,
        &info.sender,
        &config,
        supply,
        buyer,
        purchase,
    )?;
    consume(deps.storage, &info.sender, pool)?;

    Ok(res.add_attribute("guaranteed", allocation.is_guaranteed.to_string()))
}

/// Reserves supply, books the payment split and emits the payment and mint messages.
/// Nothing is written before every step has succeeded.
fn settle_purchase(
    deps: DepsMut,
    env: &Env,
    sender: &Addr,
    config: &SaleConfig,
    mut supply: SupplyLedger,
    mut buyer: Buyer,
    purchase: Purchase,
) -> Result<Response, ContractError> {
    let Purchase {
        action,
        units,
        unit_price,
        referral,
        pool,
        phase,
    } = purchase;

    let token_ids = supply.reserve(&config.supply, pool, units)?;
    buyer.units_purchased = buyer
        .units_purchased
        .checked_add(units)
        .ok_or(ContractError::Overflow {})?;

    let mut treasury = TREASURY.load(deps.storage)?;
    let charge = charge(
        &config.pricing,
        &mut treasury,
        &mut buyer,
        units,
        unit_price,
        referral.as_ref(),
        supply.threshold_reached(&config.supply),
    )?;

    let payment_msgs = PaymentToken::new(&config.payment_token).settle(
        &charge,
        sender,
        &env.contract.address,
        &config.marketing_account,
    )?;
    let first_token_id = token_ids.start;
    let mint_msgs = mint_messages(config, token_ids, sender)?;

    SUPPLY.save(deps.storage, &supply)?;
    BUYERS.save(deps.storage, sender, &buyer)?;
    TREASURY.save(deps.storage, &treasury)?;

    let mut res = Response::new()
        .add_messages(payment_msgs)
        .add_messages(mint_msgs)
        .add_attribute("action", action)
        .add_attribute("buyer", sender)
        .add_attribute("phase", phase.to_string())
        .add_attribute("pool", pool.as_str())
        .add_attribute("units", units.to_string())
        .add_attribute("first_token_id", first_token_id.to_string())
        .add_attribute("total", charge.total)
        .add_attribute("escrowed", charge.escrowed)
        .add_attribute("marketing", charge.marketing);
    if let Some((referral, amount)) = &charge.referral {
        res = res
            .add_attribute("referral", referral)
            .add_attribute("referral_amount", *amount);
    }
    Ok(res)
}

fn execute_airdrop(
    ctx: ExecuteContext,
    recipients: Vec<String>,
    units: Vec<u32>,
) -> Result<Response, ContractError> {
    let ExecuteContext { deps, info, .. } = ctx;
    assert_owner(deps.storage, &info.sender)?;

    ensure!(
        recipients.len() == units.len(),
        ContractError::LengthMismatch {}
    );
    ensure!(!recipients.is_empty(), ContractError::ZeroAmount {});

    let config = CONFIG.load(deps.storage)?;
    let mut supply = SUPPLY.load(deps.storage)?;

    let mut msgs = vec![];
    let mut total_units: u32 = 0;
    for (recipient, amount) in recipients.iter().zip(units) {
        ensure!(amount > 0, ContractError::ZeroAmount {});
        let recipient = deps.api.addr_validate(recipient)?;
        let token_ids = supply.reserve(&config.supply, SupplyPool::Airdrop, amount)?;
        msgs.extend(mint_messages(&config, token_ids, &recipient)?);
        total_units = total_units
            .checked_add(amount)
            .ok_or(ContractError::Overflow {})?;
    }
    SUPPLY.save(deps.storage, &supply)?;

    Ok(Response::new()
        .add_messages(msgs)
        .add_attribute("action", "airdrop")
        .add_attribute("recipients", recipients.len().to_string())
        .add_attribute("units", total_units.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Config {} => encode_binary(&CONFIG.load(deps.storage)?),
        QueryMsg::Phase {} => encode_binary(&query_phase(deps, env)?),
        QueryMsg::Supply {} => encode_binary(&query_supply(deps)?),
        QueryMsg::Buyer { address } => encode_binary(&query_buyer(deps, address)?),
        QueryMsg::Treasury {} => encode_binary(&TreasuryResponse::from(
            TREASURY.load(deps.storage)?,
        )),
        QueryMsg::AllocationUsed {
            address,
            guaranteed,
        } => encode_binary(&query_allocation_used(deps, address, guaranteed)?),
        QueryMsg::TokenUri { token_id } => encode_binary(&query_token_uri(deps, token_id)?),
        QueryMsg::PaymentBalance { address } => {
            encode_binary(&query_payment_balance(deps, address)?)
        }
        QueryMsg::Owner {} => encode_binary(&query_owner(deps.storage)?),
        QueryMsg::OwnershipOffer {} => encode_binary(&query_ownership_offer(deps.storage)?),
    }
}

fn query_phase(deps: Deps, env: Env) -> Result<PhaseResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let supply = SUPPLY.load(deps.storage)?;
    Ok(PhaseResponse {
        phase: current_phase(&config.schedule, env.block.time.seconds()),
        late_mint_open: late_mint_open(&config, &supply),
    })
}

fn query_supply(deps: Deps) -> Result<SupplyResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let supply = SUPPLY.load(deps.storage)?;
    Ok(SupplyResponse {
        issued_general: supply.issued_general,
        issued_airdrop: supply.issued_airdrop,
        issued_guaranteed: supply.issued_guaranteed,
        general_cap: config.supply.general_cap(),
        airdrop_cap: config.supply.reserved_airdrop_cap,
        guaranteed_cap: config.supply.reserved_guaranteed_cap,
        total_supply_cap: config.supply.total_supply_cap,
        sold: supply.sold(),
        threshold_reached: supply.threshold_reached(&config.supply),
    })
}

fn query_buyer(deps: Deps, address: String) -> Result<BuyerResponse, ContractError> {
    let address = deps.api.addr_validate(&address)?;
    let buyer = load_buyer(deps.storage, &address)?;
    Ok(BuyerResponse {
        units_purchased: buyer.units_purchased,
        escrowed_payment: buyer.escrowed_payment,
    })
}

fn query_allocation_used(
    deps: Deps,
    address: String,
    guaranteed: bool,
) -> Result<bool, ContractError> {
    let address = deps.api.addr_validate(&address)?;
    is_consumed(deps.storage, &address, allocation_pool(guaranteed))
}

fn query_token_uri(deps: Deps, token_id: u64) -> Result<TokenUriResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let supply = SUPPLY.load(deps.storage)?;
    Ok(TokenUriResponse {
        token_uri: token_uri(&config, &supply, token_id)?,
    })
}

fn query_payment_balance(
    deps: Deps,
    address: String,
) -> Result<PaymentBalanceResponse, ContractError> {
    let address = deps.api.addr_validate(&address)?;
    let config = CONFIG.load(deps.storage)?;
    Ok(PaymentBalanceResponse {
        balance: PaymentToken::new(&config.payment_token).balance_of(&deps.querier, &address)?,
    })
}
