//! Wire format of the asset registry the sale mints into. Only the subset of a
//! cw721 contract the sale and its tests rely on.
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{to_json_binary, Addr, CosmosMsg, Empty, StdResult, WasmMsg};

#[cw_serde]
pub struct MintMsg {
    /// Unique ID of the token
    pub token_id: String,
    /// The owner of the newly minted token
    pub owner: String,
    /// Universal resource identifier for this token
    pub token_uri: Option<String>,
    pub extension: Empty,
}

#[cw_serde]
pub enum RegistryExecuteMsg {
    /// Mints a token. Only the registry's minter may call this.
    Mint(MintMsg),
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum RegistryQueryMsg {
    #[returns(OwnerOfResponse)]
    OwnerOf {
        token_id: String,
        include_expired: Option<bool>,
    },
    #[returns(NftInfoResponse)]
    NftInfo { token_id: String },
    #[returns(NumTokensResponse)]
    NumTokens {},
}

#[cw_serde]
pub struct OwnerOfResponse {
    pub owner: String,
    pub approvals: Vec<Empty>,
}

#[cw_serde]
pub struct NftInfoResponse {
    pub token_uri: Option<String>,
    pub extension: Empty,
}

#[cw_serde]
pub struct NumTokensResponse {
    pub count: u64,
}

/// Builds the message minting `token_id` to `owner` on `registry`.
pub fn mint_msg(
    registry: &Addr,
    token_id: u64,
    owner: &Addr,
    token_uri: String,
) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: registry.to_string(),
        msg: to_json_binary(&RegistryExecuteMsg::Mint(MintMsg {
            token_id: token_id.to_string(),
            owner: owner.to_string(),
            token_uri: Some(token_uri),
            extension: Empty {},
        }))?,
        funds: vec![],
    }))
}
