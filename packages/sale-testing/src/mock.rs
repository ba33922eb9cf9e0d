use cosmwasm_std::{Addr, Timestamp};
use cw_multi_test::{App, AppBuilder, BankKeeper, MockApiBech32};

pub type MockApp = App<BankKeeper, MockApiBech32>;

pub const BECH32_PREFIX: &str = "sale";

pub fn mock_app() -> MockApp {
    AppBuilder::new()
        .with_api(MockApiBech32::new(BECH32_PREFIX))
        .build(|_, _, _| {})
}

/// Moves the chain clock to `seconds` without touching the block height.
pub fn set_block_time(app: &mut MockApp, seconds: u64) {
    app.update_block(|block| block.time = Timestamp::from_seconds(seconds));
}

pub fn block_time(app: &MockApp) -> u64 {
    app.block_info().time.seconds()
}

pub fn wallet(app: &MockApp, name: &str) -> Addr {
    app.api().addr_make(name)
}
