use cosmwasm_std::{wasm_execute, Addr, CosmosMsg, QuerierWrapper, Uint128};
use cw20::{BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg};
use sale_std::error::ContractError;

use crate::settlement::Charge;

/// cw20 payment asset. Zero amounts are never sent, cw20 rejects them.
pub struct PaymentToken<'a> {
    address: &'a Addr,
}

impl<'a> PaymentToken<'a> {
    pub fn new(address: &'a Addr) -> Self {
        Self { address }
    }

    pub fn transfer_from(
        &self,
        owner: &Addr,
        recipient: &Addr,
        amount: Uint128,
    ) -> Result<Option<CosmosMsg>, ContractError> {
        self.message(
            Cw20ExecuteMsg::TransferFrom {
                owner: owner.to_string(),
                recipient: recipient.to_string(),
                amount,
            },
            amount,
        )
    }

    pub fn transfer(
        &self,
        recipient: &Addr,
        amount: Uint128,
    ) -> Result<Option<CosmosMsg>, ContractError> {
        self.message(
            Cw20ExecuteMsg::Transfer {
                recipient: recipient.to_string(),
                amount,
            },
            amount,
        )
    }

    fn message(
        &self,
        msg: Cw20ExecuteMsg,
        amount: Uint128,
    ) -> Result<Option<CosmosMsg>, ContractError> {
        if amount.is_zero() {
            return Ok(None);
        }
        Ok(Some(wasm_execute(self.address, &msg, vec![])?.into()))
    }

    pub fn balance_of(
        &self,
        querier: &QuerierWrapper,
        address: &Addr,
    ) -> Result<Uint128, ContractError> {
        let res: BalanceResponse = querier.query_wasm_smart(
            self.address,
            &Cw20QueryMsg::Balance {
                address: address.to_string(),
            },
        )?;
        Ok(res.balance)
    }

    /// Pulls the full price from the buyer, then pays the marketing and referral cuts.
    pub fn settle(
        &self,
        charge: &Charge,
        buyer: &Addr,
        contract: &Addr,
        marketing: &Addr,
    ) -> Result<Vec<CosmosMsg>, ContractError> {
        let mut msgs = vec![
            self.transfer_from(buyer, contract, charge.total)?,
            self.transfer(marketing, charge.marketing)?,
        ];
        if let Some((referral, amount)) = &charge.referral {
            msgs.push(self.transfer(referral, *amount)?);
        }
        Ok(msgs.into_iter().flatten().collect())
    }
}
