use cosmwasm_std::{DepsMut, Env, MessageInfo};

pub struct ExecuteContext<'a> {
    pub deps: DepsMut<'a>,
    pub info: MessageInfo,
    pub env: Env,
}

impl<'a> ExecuteContext<'a> {
    #[inline]
    pub fn new(deps: DepsMut<'a>, info: MessageInfo, env: Env) -> ExecuteContext<'a> {
        ExecuteContext { deps, info, env }
    }
}
