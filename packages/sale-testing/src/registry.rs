use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    ensure, to_json_binary, Addr, Binary, Deps, DepsMut, Empty, Env, MessageInfo, Response,
    StdError, StdResult,
};
use cw_multi_test::{Contract, ContractWrapper, Executor};
use cw_storage_plus::{Item, Map};
use sale_tokens::registry::{
    MintMsg, NftInfoResponse, NumTokensResponse, OwnerOfResponse, RegistryQueryMsg,
};

use crate::{
    mock::MockApp,
    mock_contract,
    mock_contract::{ExecuteResult, MockContract},
};

const CREATOR: Item<Addr> = Item::new("creator");
const MINTER: Item<Addr> = Item::new("minter");
const TOKENS: Map<&str, TokenInfo> = Map::new("tokens");
const NUM_TOKENS: Item<u64> = Item::new("num_tokens");

#[cw_serde]
struct TokenInfo {
    owner: Addr,
    token_uri: Option<String>,
}

#[cw_serde]
pub struct RegistryInstantiateMsg {
    pub minter: String,
}

/// The sale's mint message plus a creator-only minter handover, since the sale
/// is instantiated after the registry.
#[cw_serde]
pub enum MockRegistryExecuteMsg {
    Mint(MintMsg),
    SetMinter { minter: String },
}

fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: RegistryInstantiateMsg,
) -> StdResult<Response> {
    CREATOR.save(deps.storage, &info.sender)?;
    MINTER.save(deps.storage, &deps.api.addr_validate(&msg.minter)?)?;
    NUM_TOKENS.save(deps.storage, &0)?;
    Ok(Response::default())
}

fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: MockRegistryExecuteMsg,
) -> StdResult<Response> {
    match msg {
        MockRegistryExecuteMsg::SetMinter { minter } => {
            ensure!(
                info.sender == CREATOR.load(deps.storage)?,
                StdError::generic_err("Unauthorized")
            );
            MINTER.save(deps.storage, &deps.api.addr_validate(&minter)?)?;
            Ok(Response::new().add_attribute("action", "set_minter"))
        }
        MockRegistryExecuteMsg::Mint(MintMsg {
            token_id,
            owner,
            token_uri,
            ..
        }) => {
            ensure!(
                info.sender == MINTER.load(deps.storage)?,
                StdError::generic_err("Unauthorized")
            );
            ensure!(
                !TOKENS.has(deps.storage, &token_id),
                StdError::generic_err("token_id already claimed")
            );
            let owner = deps.api.addr_validate(&owner)?;
            TOKENS.save(deps.storage, &token_id, &TokenInfo { owner, token_uri })?;
            NUM_TOKENS.update(deps.storage, |count| -> StdResult<u64> { Ok(count + 1) })?;
            Ok(Response::new()
                .add_attribute("action", "mint")
                .add_attribute("token_id", token_id))
        }
    }
}

fn query(deps: Deps, _env: Env, msg: RegistryQueryMsg) -> StdResult<Binary> {
    match msg {
        RegistryQueryMsg::OwnerOf { token_id, .. } => {
            let token = TOKENS.load(deps.storage, &token_id)?;
            to_json_binary(&OwnerOfResponse {
                owner: token.owner.to_string(),
                approvals: vec![],
            })
        }
        RegistryQueryMsg::NftInfo { token_id } => {
            let token = TOKENS.load(deps.storage, &token_id)?;
            to_json_binary(&NftInfoResponse {
                token_uri: token.token_uri,
                extension: Empty {},
            })
        }
        RegistryQueryMsg::NumTokens {} => to_json_binary(&NumTokensResponse {
            count: NUM_TOKENS.load(deps.storage)?,
        }),
    }
}

pub fn mock_registry() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new_with_empty(execute, instantiate, query);
    Box::new(contract)
}

/// Minimal cw721 style registry: a single minter, sequential ownership records.
pub struct MockRegistry(Addr);
mock_contract!(MockRegistry, MockRegistryExecuteMsg, RegistryQueryMsg);

impl MockRegistry {
    pub fn instantiate(code_id: u64, sender: Addr, app: &mut MockApp, minter: &Addr) -> Self {
        let msg = RegistryInstantiateMsg {
            minter: minter.to_string(),
        };
        let addr = app
            .instantiate_contract(code_id, sender, &msg, &[], "Asset Registry", None)
            .unwrap();
        MockRegistry(addr)
    }

    pub fn execute_set_minter(
        &self,
        app: &mut MockApp,
        sender: Addr,
        minter: &Addr,
    ) -> ExecuteResult {
        let msg = MockRegistryExecuteMsg::SetMinter {
            minter: minter.to_string(),
        };
        self.execute(app, &msg, sender, &[])
    }

    pub fn query_owner_of(&self, app: &MockApp, token_id: u64) -> String {
        let res: OwnerOfResponse = self.query(
            app,
            RegistryQueryMsg::OwnerOf {
                token_id: token_id.to_string(),
                include_expired: None,
            },
        );
        res.owner
    }

    pub fn query_token_uri(&self, app: &MockApp, token_id: u64) -> Option<String> {
        let res: NftInfoResponse = self.query(
            app,
            RegistryQueryMsg::NftInfo {
                token_id: token_id.to_string(),
            },
        );
        res.token_uri
    }

    pub fn query_num_tokens(&self, app: &MockApp) -> u64 {
        let res: NumTokensResponse = self.query(app, RegistryQueryMsg::NumTokens {});
        res.count
    }
}
