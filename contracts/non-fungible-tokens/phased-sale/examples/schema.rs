use cosmwasm_schema::write_api;

use sale_std::common::migrate::MigrateMsg;
use sale_tokens::sale::{ExecuteMsg, InstantiateMsg, QueryMsg};

fn main() {
    write_api! {
        instantiate: InstantiateMsg,
        query: QueryMsg,
        execute: ExecuteMsg,
        migrate: MigrateMsg,
    }
}
