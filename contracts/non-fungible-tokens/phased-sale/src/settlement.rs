use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use sale_std::{common::apply_bps, error::ContractError};
use sale_tokens::sale::{Pricing, TreasuryResponse};

use crate::state::Buyer;

/// Proceeds bookkeeping. Every amount charged ends up in exactly one of
/// `marketing_paid`, `referral_paid`, `pending`, `redeemable`, `redeemed` or `refunded`.
#[cw_serde]
#[derive(Default)]
pub struct Treasury {
    pub pending: Uint128,
    pub redeemable: Uint128,
    pub redeemed: Uint128,
    pub refunded: Uint128,
    pub charged: Uint128,
    pub marketing_paid: Uint128,
    pub referral_paid: Uint128,
}

impl Treasury {
    /// Credits the owner with everything accrued while the threshold was unmet.
    pub fn sweep_pending(&mut self) -> Result<(), ContractError> {
        self.redeemable = self.redeemable.checked_add(self.pending)?;
        self.pending = Uint128::zero();
        Ok(())
    }

    /// Pays out the redeemable balance.
    pub fn redeem(&mut self) -> Result<Uint128, ContractError> {
        self.sweep_pending()?;
        let amount = self.redeemable;
        self.redeemed = self.redeemed.checked_add(amount)?;
        self.redeemable = Uint128::zero();
        Ok(amount)
    }

    pub fn refund(&mut self, amount: Uint128) -> Result<(), ContractError> {
        self.pending = self.pending.checked_sub(amount)?;
        self.refunded = self.refunded.checked_add(amount)?;
        Ok(())
    }

    pub fn is_conserved(&self) -> bool {
        let accounted = [
            self.pending,
            self.redeemable,
            self.redeemed,
            self.refunded,
            self.marketing_paid,
            self.referral_paid,
        ]
        .iter()
        .try_fold(Uint128::zero(), |sum, amount| sum.checked_add(*amount));
        accounted == Ok(self.charged)
    }
}

impl From<Treasury> for TreasuryResponse {
    fn from(treasury: Treasury) -> Self {
        TreasuryResponse {
            pending: treasury.pending,
            redeemable: treasury.redeemable,
            redeemed: treasury.redeemed,
            refunded: treasury.refunded,
            charged: treasury.charged,
            marketing_paid: treasury.marketing_paid,
            referral_paid: treasury.referral_paid,
        }
    }
}

/// Split of a single purchase.
#[derive(Clone, Debug, PartialEq)]
pub struct Charge {
    pub total: Uint128,
    pub marketing: Uint128,
    pub referral: Option<(Addr, Uint128)>,
    pub escrowed: Uint128,
}

impl Charge {
    pub fn referral_amount(&self) -> Uint128 {
        self.referral
            .as_ref()
            .map(|(_, amount)| *amount)
            .unwrap_or_default()
    }
}

pub fn split(
    pricing: &Pricing,
    units: u32,
    unit_price: Uint128,
    referral: Option<&Addr>,
) -> Result<Charge, ContractError> {
    let total = unit_price.checked_mul(Uint128::from(units))?;
    let marketing = apply_bps(total, pricing.marketing_share_bps)?;
    let referral = referral
        .map(|addr| {
            apply_bps(total, pricing.referral_share_bps).map(|amount| (addr.clone(), amount))
        })
        .transpose()?;
    let referral_amount = referral
        .as_ref()
        .map(|(_, amount)| *amount)
        .unwrap_or_default();
    let escrowed = total.checked_sub(marketing)?.checked_sub(referral_amount)?;
    Ok(Charge {
        total,
        marketing,
        referral,
        escrowed,
    })
}

/// Charges `buyer` for `units` at `unit_price` and books the split.
///
/// `threshold_reached` must already count the units being paid for. Once the
/// threshold is reached, escrow goes straight to the owner's redeemable balance;
/// before that it stays pending and refundable.
pub fn charge(
    pricing: &Pricing,
    treasury: &mut Treasury,
    buyer: &mut Buyer,
    units: u32,
    unit_price: Uint128,
    referral: Option<&Addr>,
    threshold_reached: bool,
) -> Result<Charge, ContractError> {
    let charge = split(pricing, units, unit_price, referral)?;

    buyer.escrowed_payment = buyer.escrowed_payment.checked_add(charge.escrowed)?;

    treasury.charged = treasury.charged.checked_add(charge.total)?;
    treasury.marketing_paid = treasury.marketing_paid.checked_add(charge.marketing)?;
    treasury.referral_paid = treasury
        .referral_paid
        .checked_add(charge.referral_amount())?;
    if threshold_reached {
        treasury.sweep_pending()?;
        treasury.redeemable = treasury.redeemable.checked_add(charge.escrowed)?;
    } else {
        treasury.pending = treasury.pending.checked_add(charge.escrowed)?;
    }

    Ok(charge)
}
