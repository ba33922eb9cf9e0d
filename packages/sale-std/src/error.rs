use cosmwasm_std::{CheckedMultiplyRatioError, OverflowError, StdError};
use std::convert::From;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Overflow")]
    Overflow {},

    #[error("Cannot migrate from: {previous_contract}")]
    CannotMigrate { previous_contract: String },

    // Configuration
    #[error("Invalid phase order: {msg}")]
    InvalidPhaseOrder { msg: String },

    #[error("Marketing and referral shares must add up to less than 10000 basis points")]
    InvalidShare {},

    #[error("Invalid price: {msg}")]
    InvalidPrice { msg: String },

    #[error("Invalid supply: {msg}")]
    InvalidSupply { msg: String },

    #[error("Invalid minimum sold threshold: {msg}")]
    InvalidThreshold { msg: String },

    #[error("Invalid signer: {signer}")]
    InvalidSigner { signer: String },

    // Authorization
    #[error("Invalid signature")]
    InvalidSignature {},

    #[error("Invalid referral")]
    InvalidReferral {},

    #[error("Requested units exceed the signed allocation")]
    AllocationExceeded {},

    #[error("Unit price is below the minimum unit price")]
    PriceBelowFloor {},

    #[error("Allocation already used")]
    AllocationAlreadyUsed {},

    // Supply
    #[error("No supply left in the {pool} pool")]
    NoSupplyLeft { pool: String },

    #[error("Per wallet cap exceeded")]
    PerWalletCapExceeded {},

    #[error("Amount must be greater than zero")]
    ZeroAmount {},

    #[error("Recipients and amounts have different lengths")]
    LengthMismatch {},

    // Phase
    #[error("Sale has not started")]
    SaleNotStarted {},

    #[error("Public sale has not started, only signed allocations are accepted")]
    PublicSaleNotStarted {},

    #[error("Guaranteed allocations are not open yet")]
    GuaranteedPhaseNotStarted {},

    #[error("Sale has finished")]
    SaleFinished {},

    #[error("Sale has not finished")]
    SaleNotFinished {},

    // Settlement
    #[error("Minimum sold threshold not reached")]
    ThresholdNotReached {},

    #[error("Minimum sold threshold already reached")]
    ThresholdAlreadyReached {},

    #[error("Nothing to refund")]
    NothingToRefund {},

    // Registry
    #[error("Token {token_id} does not exist")]
    TokenNotFound { token_id: u64 },
}

impl From<OverflowError> for ContractError {
    fn from(_err: OverflowError) -> Self {
        ContractError::Overflow {}
    }
}

impl From<CheckedMultiplyRatioError> for ContractError {
    fn from(_err: CheckedMultiplyRatioError) -> Self {
        ContractError::Overflow {}
    }
}

pub fn from_semver(err: semver::Error) -> StdError {
    StdError::generic_err(format!("Semver: {err}"))
}
