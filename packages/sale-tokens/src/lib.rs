pub mod allocation;
pub mod registry;
pub mod sale;
#[cfg(feature = "signer")]
pub mod signer;
