use cosmwasm_std::{ensure, Env, Response, Uint128};
use sale_std::{common::context::ExecuteContext, error::ContractError, ownership::assert_owner};
use sale_tokens::sale::SaleConfig;

use crate::{
    payment::PaymentToken,
    state::{load_buyer, BUYERS, CONFIG, SUPPLY, TREASURY},
};

fn ensure_finished(config: &SaleConfig, env: &Env) -> Result<(), ContractError> {
    ensure!(
        env.block.time.seconds() >= config.schedule.mint_finish,
        ContractError::SaleNotFinished {}
    );
    Ok(())
}

/// Sends everything escrowed for the owner to `receiver`. Calling it again pays nothing.
pub fn execute_redeem_owner(
    ctx: ExecuteContext,
    receiver: String,
) -> Result<Response, ContractError> {
    let ExecuteContext {
        deps, info, env, ..
    } = ctx;
    assert_owner(deps.storage, &info.sender)?;
    let receiver = deps.api.addr_validate(&receiver)?;

    let config = CONFIG.load(deps.storage)?;
    ensure_finished(&config, &env)?;
    let supply = SUPPLY.load(deps.storage)?;
    ensure!(
        supply.threshold_reached(&config.supply),
        ContractError::ThresholdNotReached {}
    );

    let mut treasury = TREASURY.load(deps.storage)?;
    let amount = treasury.redeem()?;
    TREASURY.save(deps.storage, &treasury)?;

    let msg = PaymentToken::new(&config.payment_token).transfer(&receiver, amount)?;

    Ok(Response::new()
        .add_messages(msg)
        .add_attribute("action", "redeem_owner")
        .add_attribute("receiver", receiver)
        .add_attribute("amount", amount))
}

/// Returns the caller's escrow while the sale sits below its threshold.
/// Repeat calls succeed without paying anything.
pub fn execute_refund(ctx: ExecuteContext) -> Result<Response, ContractError> {
    let ExecuteContext {
        deps, info, env, ..
    } = ctx;

    let config = CONFIG.load(deps.storage)?;
    ensure_finished(&config, &env)?;
    let supply = SUPPLY.load(deps.storage)?;
    ensure!(
        !supply.threshold_reached(&config.supply),
        ContractError::ThresholdAlreadyReached {}
    );

    let mut buyer = load_buyer(deps.storage, &info.sender)?;
    ensure!(buyer.units_purchased > 0, ContractError::NothingToRefund {});

    let amount = buyer.escrowed_payment;
    buyer.escrowed_payment = Uint128::zero();
    let mut treasury = TREASURY.load(deps.storage)?;
    treasury.refund(amount)?;

    BUYERS.save(deps.storage, &info.sender, &buyer)?;
    TREASURY.save(deps.storage, &treasury)?;

    let msg = PaymentToken::new(&config.payment_token).transfer(&info.sender, amount)?;

    Ok(Response::new()
        .add_messages(msg)
        .add_attribute("action", "refund")
        .add_attribute("buyer", info.sender)
        .add_attribute("amount", amount))
}
