use cosmwasm_std::{Addr, Empty, Uint128};
use cw20::{BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg};
use cw20_base::{
    contract::{execute, instantiate, query},
    msg::InstantiateMsg,
};
use cw_multi_test::{Contract, ContractWrapper, Executor};

use crate::{
    mock::MockApp,
    mock_contract::{ExecuteResult, MockContract},
    mock_contract,
};

/// Payment token backed by the reference cw20 implementation.
pub struct MockCw20(Addr);
mock_contract!(MockCw20, Cw20ExecuteMsg, Cw20QueryMsg);

impl MockCw20 {
    pub fn instantiate(
        code_id: u64,
        sender: Addr,
        app: &mut MockApp,
        initial_balances: Vec<(Addr, u128)>,
    ) -> MockCw20 {
        let msg = InstantiateMsg {
            name: "Sale Payment Token".to_string(),
            symbol: "SPT".to_string(),
            decimals: 6,
            initial_balances: initial_balances
                .into_iter()
                .map(|(address, amount)| Cw20Coin {
                    address: address.to_string(),
                    amount: Uint128::new(amount),
                })
                .collect(),
            mint: None,
            marketing: None,
        };
        let addr = app
            .instantiate_contract(code_id, sender, &msg, &[], "Payment Token", None)
            .unwrap();
        MockCw20(addr)
    }

    pub fn execute_increase_allowance(
        &self,
        app: &mut MockApp,
        sender: Addr,
        spender: &Addr,
        amount: u128,
    ) -> ExecuteResult {
        let msg = Cw20ExecuteMsg::IncreaseAllowance {
            spender: spender.to_string(),
            amount: Uint128::new(amount),
            expires: None,
        };
        self.execute(app, &msg, sender, &[])
    }

    pub fn query_balance(&self, app: &MockApp, address: &Addr) -> u128 {
        let res: BalanceResponse = self.query(
            app,
            Cw20QueryMsg::Balance {
                address: address.to_string(),
            },
        );
        res.balance.u128()
    }
}

pub fn mock_cw20() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new_with_empty(execute, instantiate, query);
    Box::new(contract)
}
