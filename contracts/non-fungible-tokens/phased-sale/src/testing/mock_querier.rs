use std::collections::HashMap;

use cosmwasm_std::{
    from_json,
    testing::{MockApi, MockQuerier, MockStorage},
    to_json_binary, Addr, Binary, ContractResult, Empty, OwnedDeps, Querier, QuerierResult,
    QueryRequest, SystemError, SystemResult, Uint128, WasmQuery,
};
use cw20::{BalanceResponse, Cw20QueryMsg};
use sale_tokens::sale::{InstantiateMsg, LateMintPolicy, Pricing, Schedule, SupplyCaps};

pub const MOCK_OWNER: &str = "owner";
pub const MOCK_PAYMENT_TOKEN: &str = "payment_token";
pub const MOCK_ASSET_REGISTRY: &str = "asset_registry";
pub const MOCK_MARKETING: &str = "marketing";
pub const MOCK_BASE_URI: &str = "https://assets.example/sale/";
pub const MOCK_BASE_EXTENSION: &str = ".json";
/// Secret key of the allocation signer trusted by [`mock_instantiate_msg`].
pub const MOCK_SIGNER_SEED: [u8; 32] = [42u8; 32];

pub const WHITELIST_START: u64 = 1_000;
pub const GUARANTEED_START: u64 = 1_500;
pub const PUBLIC_START: u64 = 2_000;
pub const MINT_FINISH: u64 = 3_000;

pub fn mock_addr(name: &str) -> Addr {
    MockApi::default().addr_make(name)
}

/// Cap 99, 10 reserved for airdrops, 5 guaranteed, 3 per wallet, 100 per unit with
/// 5% marketing and 5% referral shares, 30 units to reach the threshold.
pub fn mock_instantiate_msg(trusted_signer: String) -> InstantiateMsg {
    InstantiateMsg {
        owner: None,
        schedule: Schedule {
            whitelist_start: WHITELIST_START,
            public_start: PUBLIC_START,
            guaranteed_start: GUARANTEED_START,
            mint_finish: MINT_FINISH,
        },
        pricing: Pricing {
            public_unit_price: Uint128::new(100),
            minimum_unit_price: Uint128::new(50),
            marketing_share_bps: 500,
            referral_share_bps: 500,
        },
        supply: SupplyCaps {
            total_supply_cap: 99,
            reserved_airdrop_cap: 10,
            reserved_guaranteed_cap: 5,
            per_wallet_public_cap: 3,
            minimum_sold_threshold: 30,
        },
        trusted_signer,
        payment_token: mock_addr(MOCK_PAYMENT_TOKEN).to_string(),
        asset_registry: mock_addr(MOCK_ASSET_REGISTRY).to_string(),
        marketing_account: mock_addr(MOCK_MARKETING).to_string(),
        base_uri: MOCK_BASE_URI.to_string(),
        base_extension: MOCK_BASE_EXTENSION.to_string(),
        late_mint_policy: Some(LateMintPolicy::Closed),
    }
}

/// Alternative to `cosmwasm_std::testing::mock_dependencies` that answers cw20
/// balance queries for the mock payment token.
pub fn mock_dependencies_custom(
    token_balances: &[(&Addr, u128)],
) -> OwnedDeps<MockStorage, MockApi, WasmMockQuerier> {
    OwnedDeps {
        storage: MockStorage::default(),
        api: MockApi::default(),
        querier: WasmMockQuerier::new(MockQuerier::new(&[]), token_balances),
        custom_query_type: std::marker::PhantomData,
    }
}

pub struct WasmMockQuerier {
    pub base: MockQuerier,
    token_balances: HashMap<String, Uint128>,
}

impl Querier for WasmMockQuerier {
    fn raw_query(&self, bin_request: &[u8]) -> QuerierResult {
        let request: QueryRequest<Empty> = match from_json(bin_request) {
            Ok(v) => v,
            Err(e) => {
                return SystemResult::Err(SystemError::InvalidRequest {
                    error: format!("Parsing query request: {e}"),
                    request: bin_request.into(),
                })
            }
        };
        self.handle_query(&request)
    }
}

impl WasmMockQuerier {
    pub fn new(base: MockQuerier, token_balances: &[(&Addr, u128)]) -> Self {
        WasmMockQuerier {
            base,
            token_balances: token_balances
                .iter()
                .map(|(addr, amount)| (addr.to_string(), Uint128::new(*amount)))
                .collect(),
        }
    }

    pub fn handle_query(&self, request: &QueryRequest<Empty>) -> QuerierResult {
        match request {
            QueryRequest::Wasm(WasmQuery::Smart { contract_addr, msg })
                if *contract_addr == mock_addr(MOCK_PAYMENT_TOKEN).to_string() =>
            {
                self.handle_cw20_query(msg)
            }
            _ => self.base.handle_query(request),
        }
    }

    fn handle_cw20_query(&self, msg: &Binary) -> QuerierResult {
        match from_json(msg).unwrap() {
            Cw20QueryMsg::Balance { address } => {
                let balance = self
                    .token_balances
                    .get(&address)
                    .copied()
                    .unwrap_or_default();
                SystemResult::Ok(ContractResult::Ok(
                    to_json_binary(&BalanceResponse { balance }).unwrap(),
                ))
            }
            _ => panic!("Unsupported cw20 query"),
        }
    }
}
