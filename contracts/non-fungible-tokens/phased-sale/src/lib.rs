pub mod authorization;
pub mod config;
pub mod contract;
pub mod payment;
pub mod phase;
pub mod refund;
pub mod registry;
pub mod settlement;
pub mod state;
pub mod supply;
#[cfg(test)]
mod testing;

#[cfg(not(target_arch = "wasm32"))]
pub mod mock;
