#![cfg(all(not(target_arch = "wasm32"), feature = "testing"))]

use crate::contract::{execute, instantiate, migrate, query};
use cosmwasm_std::{Addr, Empty};
use cw_multi_test::{Contract, ContractWrapper, Executor};
use sale_std::ownership::{ContractOwnerResponse, OwnershipMessage};
use sale_testing::{
    mock::MockApp,
    mock_contract,
    mock_contract::{ExecuteResult, MockContract},
};
use sale_tokens::sale::{
    BuyerResponse, ConfigUpdate, ExecuteMsg, InstantiateMsg, PhaseResponse, QueryMsg, SaleConfig,
    SignedAllocation, SupplyResponse, TokenUriResponse, TreasuryResponse,
};

pub struct MockPhasedSale(Addr);
mock_contract!(MockPhasedSale, ExecuteMsg, QueryMsg);

impl MockPhasedSale {
    pub fn instantiate(
        code_id: u64,
        sender: Addr,
        app: &mut MockApp,
        msg: InstantiateMsg,
    ) -> MockPhasedSale {
        let addr = app
            .instantiate_contract(
                code_id,
                sender.clone(),
                &msg,
                &[],
                "Phased Sale Contract",
                Some(sender.to_string()),
            )
            .unwrap();
        MockPhasedSale(addr)
    }

    pub fn execute_mint(&self, app: &mut MockApp, sender: Addr, units: u32) -> ExecuteResult {
        self.execute(app, &ExecuteMsg::Mint { units }, sender, &[])
    }

    pub fn execute_mint_referred(
        &self,
        app: &mut MockApp,
        sender: Addr,
        units: u32,
        referral: &Addr,
    ) -> ExecuteResult {
        let msg = ExecuteMsg::MintReferred {
            units,
            referral: referral.to_string(),
        };
        self.execute(app, &msg, sender, &[])
    }

    pub fn execute_mint_allocation(
        &self,
        app: &mut MockApp,
        sender: Addr,
        units: u32,
        allocation: SignedAllocation,
    ) -> ExecuteResult {
        let msg = ExecuteMsg::MintAllocation { units, allocation };
        self.execute(app, &msg, sender, &[])
    }

    pub fn execute_airdrop(
        &self,
        app: &mut MockApp,
        sender: Addr,
        drops: Vec<(&Addr, u32)>,
    ) -> ExecuteResult {
        let (recipients, units) = drops
            .into_iter()
            .map(|(recipient, units)| (recipient.to_string(), units))
            .unzip();
        self.execute(app, &ExecuteMsg::Airdrop { recipients, units }, sender, &[])
    }

    pub fn execute_redeem_owner(
        &self,
        app: &mut MockApp,
        sender: Addr,
        receiver: &Addr,
    ) -> ExecuteResult {
        let msg = ExecuteMsg::RedeemOwner {
            receiver: receiver.to_string(),
        };
        self.execute(app, &msg, sender, &[])
    }

    pub fn execute_refund(&self, app: &mut MockApp, sender: Addr) -> ExecuteResult {
        self.execute(app, &ExecuteMsg::Refund {}, sender, &[])
    }

    pub fn execute_update_config(
        &self,
        app: &mut MockApp,
        sender: Addr,
        update: ConfigUpdate,
    ) -> ExecuteResult {
        self.execute(app, &ExecuteMsg::UpdateConfig { update }, sender, &[])
    }

    pub fn execute_update_owner(
        &self,
        app: &mut MockApp,
        sender: Addr,
        new_owner: &Addr,
    ) -> ExecuteResult {
        let msg = ExecuteMsg::Ownership(OwnershipMessage::UpdateOwner {
            new_owner: new_owner.to_string(),
            expiration: None,
        });
        self.execute(app, &msg, sender, &[])
    }

    pub fn execute_accept_ownership(&self, app: &mut MockApp, sender: Addr) -> ExecuteResult {
        let msg = ExecuteMsg::Ownership(OwnershipMessage::AcceptOwnership);
        self.execute(app, &msg, sender, &[])
    }

    pub fn query_config(&self, app: &MockApp) -> SaleConfig {
        self.query(app, QueryMsg::Config {})
    }

    pub fn query_phase(&self, app: &MockApp) -> PhaseResponse {
        self.query(app, QueryMsg::Phase {})
    }

    pub fn query_supply(&self, app: &MockApp) -> SupplyResponse {
        self.query(app, QueryMsg::Supply {})
    }

    pub fn query_buyer(&self, app: &MockApp, address: &Addr) -> BuyerResponse {
        self.query(
            app,
            QueryMsg::Buyer {
                address: address.to_string(),
            },
        )
    }

    pub fn query_treasury(&self, app: &MockApp) -> TreasuryResponse {
        self.query(app, QueryMsg::Treasury {})
    }

    pub fn query_allocation_used(&self, app: &MockApp, address: &Addr, guaranteed: bool) -> bool {
        self.query(
            app,
            QueryMsg::AllocationUsed {
                address: address.to_string(),
                guaranteed,
            },
        )
    }

    pub fn query_token_uri(&self, app: &MockApp, token_id: u64) -> TokenUriResponse {
        self.query(app, QueryMsg::TokenUri { token_id })
    }

    pub fn query_owner(&self, app: &MockApp) -> String {
        let res: ContractOwnerResponse = self.query(app, QueryMsg::Owner {});
        res.owner
    }
}

pub fn mock_phased_sale() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new_with_empty(execute, instantiate, query).with_migrate(migrate);
    Box::new(contract)
}
