#[cfg(not(target_arch = "wasm32"))]
mod payment_token;
#[cfg(not(target_arch = "wasm32"))]
pub mod mock;
#[cfg(not(target_arch = "wasm32"))]
pub mod mock_contract;
#[cfg(not(target_arch = "wasm32"))]
pub mod registry;

#[cfg(not(target_arch = "wasm32"))]
pub use payment_token::{mock_cw20, MockCw20};
#[cfg(not(target_arch = "wasm32"))]
pub use mock_contract::MockContract;
#[cfg(not(target_arch = "wasm32"))]
pub use registry::MockRegistry;
