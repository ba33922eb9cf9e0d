use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{ensure, Addr, Binary, Uint128};
use sale_std::{
    common::BPS_DENOMINATOR,
    error::ContractError,
    ownership::{ContractOwnerResponse, ContractPotentialOwnerResponse, OwnershipMessage},
};

#[cw_serde]
pub struct InstantiateMsg {
    /// Defaults to the instantiating address.
    pub owner: Option<String>,
    pub schedule: Schedule,
    pub pricing: Pricing,
    pub supply: SupplyCaps,
    /// `0x`-prefixed 20 byte key hash of the off-chain allocation signer.
    pub trusted_signer: String,
    /// cw20 contract used to pay for units.
    pub payment_token: String,
    /// cw721 compatible contract the sale mints into. The sale must be its minter.
    pub asset_registry: String,
    /// Receives the marketing share of every purchase.
    pub marketing_account: String,
    pub base_uri: String,
    pub base_extension: String,
    /// Defaults to [`LateMintPolicy::Closed`].
    pub late_mint_policy: Option<LateMintPolicy>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Buys `units` at the public price. Only during the public phase.
    Mint { units: u32 },
    /// Same as `Mint`, paying the referral share to `referral`.
    MintReferred { units: u32, referral: String },
    /// Buys up to `allocation.max_units` at the signed price with an allocation
    /// issued by the trusted signer. Each allocation pool can be used once per buyer.
    MintAllocation {
        units: u32,
        allocation: SignedAllocation,
    },
    /// Issues units from the airdrop reserve without payment. Owner only.
    Airdrop {
        recipients: Vec<String>,
        units: Vec<u32>,
    },
    /// Sends the redeemable escrow to `receiver` once the sale finished above the threshold.
    /// Owner only.
    RedeemOwner { receiver: String },
    /// Returns the sender's escrow once the sale finished below the threshold.
    Refund {},
    /// Updates a single configuration field. Owner only.
    UpdateConfig { update: ConfigUpdate },
    Ownership(OwnershipMessage),
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(SaleConfig)]
    Config {},
    #[returns(PhaseResponse)]
    Phase {},
    #[returns(SupplyResponse)]
    Supply {},
    #[returns(BuyerResponse)]
    Buyer { address: String },
    #[returns(TreasuryResponse)]
    Treasury {},
    #[returns(bool)]
    AllocationUsed { address: String, guaranteed: bool },
    #[returns(TokenUriResponse)]
    TokenUri { token_id: u64 },
    /// Payment token balance held by `address`.
    #[returns(PaymentBalanceResponse)]
    PaymentBalance { address: String },
    #[returns(ContractOwnerResponse)]
    Owner {},
    #[returns(ContractPotentialOwnerResponse)]
    OwnershipOffer {},
}

/// Phase boundaries, in unix seconds.
#[cw_serde]
pub struct Schedule {
    pub whitelist_start: u64,
    pub public_start: u64,
    pub guaranteed_start: u64,
    pub mint_finish: u64,
}

impl Schedule {
    pub fn validate(&self) -> Result<(), ContractError> {
        ensure!(
            self.whitelist_start <= self.public_start,
            ContractError::InvalidPhaseOrder {
                msg: "public sale cannot start before the whitelist".to_string(),
            }
        );
        ensure!(
            self.public_start < self.mint_finish,
            ContractError::InvalidPhaseOrder {
                msg: "mint finish must be after the public start".to_string(),
            }
        );
        ensure!(
            self.guaranteed_start > self.whitelist_start,
            ContractError::InvalidPhaseOrder {
                msg: "guaranteed phase must start after the whitelist start".to_string(),
            }
        );
        Ok(())
    }
}

#[cw_serde]
pub struct Pricing {
    pub public_unit_price: Uint128,
    /// Floor for prices carried by signed allocations.
    pub minimum_unit_price: Uint128,
    pub marketing_share_bps: u16,
    pub referral_share_bps: u16,
}

impl Pricing {
    pub fn validate(&self) -> Result<(), ContractError> {
        ensure!(
            !self.public_unit_price.is_zero(),
            ContractError::InvalidPrice {
                msg: "public unit price must be greater than zero".to_string(),
            }
        );
        ensure!(
            !self.minimum_unit_price.is_zero(),
            ContractError::InvalidPrice {
                msg: "minimum unit price must be greater than zero".to_string(),
            }
        );
        let shares = u128::from(self.marketing_share_bps) + u128::from(self.referral_share_bps);
        ensure!(shares < BPS_DENOMINATOR, ContractError::InvalidShare {});
        Ok(())
    }
}

#[cw_serde]
pub struct SupplyCaps {
    /// Fixed at instantiation.
    pub total_supply_cap: u32,
    pub reserved_airdrop_cap: u32,
    pub reserved_guaranteed_cap: u32,
    pub per_wallet_public_cap: u32,
    /// Units that must be sold (general and guaranteed) for the owner to redeem.
    pub minimum_sold_threshold: u32,
}

impl SupplyCaps {
    pub fn validate(&self) -> Result<(), ContractError> {
        ensure!(
            self.total_supply_cap > 0,
            ContractError::InvalidSupply {
                msg: "total supply cap must be greater than zero".to_string(),
            }
        );
        let reserved =
            u64::from(self.reserved_airdrop_cap) + u64::from(self.reserved_guaranteed_cap);
        ensure!(
            reserved <= u64::from(self.total_supply_cap),
            ContractError::InvalidSupply {
                msg: "reserved pools exceed the total supply cap".to_string(),
            }
        );
        ensure!(
            self.per_wallet_public_cap > 0,
            ContractError::InvalidSupply {
                msg: "per wallet cap must be greater than zero".to_string(),
            }
        );
        ensure!(
            self.minimum_sold_threshold > 0,
            ContractError::InvalidThreshold {
                msg: "threshold must be greater than zero".to_string(),
            }
        );
        ensure!(
            self.minimum_sold_threshold <= self.sellable_cap(),
            ContractError::InvalidThreshold {
                msg: "threshold exceeds the sellable supply".to_string(),
            }
        );
        Ok(())
    }

    /// Cap of the pool shared by public and non guaranteed signed purchases.
    pub fn general_cap(&self) -> u32 {
        self.total_supply_cap
            .saturating_sub(self.reserved_airdrop_cap)
            .saturating_sub(self.reserved_guaranteed_cap)
    }

    /// Units that count toward the threshold when fully sold.
    pub fn sellable_cap(&self) -> u32 {
        self.total_supply_cap
            .saturating_sub(self.reserved_airdrop_cap)
    }
}

#[cw_serde]
#[derive(Copy, Default)]
pub enum LateMintPolicy {
    /// No mint is admitted after `mint_finish`.
    #[default]
    Closed,
    /// Mints stay open after `mint_finish` while the threshold is unmet.
    WhileUndersold,
    /// Mints stay open after `mint_finish` once the threshold is met.
    AfterThresholdMet,
}

#[cw_serde]
pub struct SaleConfig {
    pub schedule: Schedule,
    pub pricing: Pricing,
    pub supply: SupplyCaps,
    pub trusted_signer: String,
    pub payment_token: Addr,
    pub asset_registry: Addr,
    pub marketing_account: Addr,
    pub base_uri: String,
    pub base_extension: String,
    pub late_mint_policy: LateMintPolicy,
}

impl SaleConfig {
    pub fn validate(&self) -> Result<(), ContractError> {
        self.schedule.validate()?;
        self.pricing.validate()?;
        self.supply.validate()?;
        normalize_signer(&self.trusted_signer)?;
        Ok(())
    }

    pub fn token_uri(&self, token_id: u64) -> String {
        format!("{}{}{}", self.base_uri, token_id, self.base_extension)
    }
}

/// Lower-cases and checks a `0x`-prefixed 20 byte hex key hash.
pub fn normalize_signer(signer: &str) -> Result<String, ContractError> {
    let invalid = || ContractError::InvalidSigner {
        signer: signer.to_string(),
    };
    let stripped = signer
        .strip_prefix("0x")
        .or_else(|| signer.strip_prefix("0X"))
        .ok_or_else(invalid)?;
    let bytes = hex::decode(stripped).map_err(|_| invalid())?;
    ensure!(bytes.len() == 20, invalid());
    Ok(format!("0x{}", hex::encode(bytes)))
}

#[cw_serde]
pub enum ConfigUpdate {
    /// Replaces all phase boundaries at once.
    Schedule(Schedule),
    WhitelistStart { time: u64 },
    PublicStart { time: u64 },
    GuaranteedStart { time: u64 },
    MintFinish { time: u64 },
    PublicUnitPrice { price: Uint128 },
    MinimumUnitPrice { price: Uint128 },
    MarketingShare { bps: u16 },
    ReferralShare { bps: u16 },
    PerWalletPublicCap { cap: u32 },
    ReservedAirdropCap { cap: u32 },
    ReservedGuaranteedCap { cap: u32 },
    MinimumSoldThreshold { threshold: u32 },
    TrustedSigner { signer: String },
    PaymentToken { address: String },
    MarketingAccount { address: String },
    BaseUri { base_uri: String },
    BaseExtension { extension: String },
    LateMintPolicy { policy: LateMintPolicy },
}

/// Allocation granted off-chain. The buyer is the sender of the message.
#[cw_serde]
pub struct SignedAllocation {
    pub referral: String,
    pub max_units: u32,
    pub unit_price: Uint128,
    pub is_guaranteed: bool,
    /// 65 byte recoverable secp256k1 signature, `r || s || v`.
    pub signature: Binary,
}

#[cw_serde]
#[derive(Copy, Eq)]
pub enum SalePhase {
    NotStarted,
    Whitelist,
    Public,
    Finished,
}

impl std::fmt::Display for SalePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let phase = match self {
            SalePhase::NotStarted => "not_started",
            SalePhase::Whitelist => "whitelist",
            SalePhase::Public => "public",
            SalePhase::Finished => "finished",
        };
        write!(f, "{phase}")
    }
}

#[cw_serde]
pub struct PhaseResponse {
    pub phase: SalePhase,
    /// Whether unsigned and signed mints are admitted after `mint_finish`.
    pub late_mint_open: bool,
}

#[cw_serde]
pub struct SupplyResponse {
    pub issued_general: u32,
    pub issued_airdrop: u32,
    pub issued_guaranteed: u32,
    pub general_cap: u32,
    pub airdrop_cap: u32,
    pub guaranteed_cap: u32,
    pub total_supply_cap: u32,
    pub sold: u32,
    pub threshold_reached: bool,
}

#[cw_serde]
pub struct BuyerResponse {
    pub units_purchased: u32,
    pub escrowed_payment: Uint128,
}

#[cw_serde]
pub struct TreasuryResponse {
    /// Escrow accrued before the threshold was reached. Refundable.
    pub pending: Uint128,
    /// Escrow the owner may redeem.
    pub redeemable: Uint128,
    pub redeemed: Uint128,
    pub refunded: Uint128,
    pub charged: Uint128,
    pub marketing_paid: Uint128,
    pub referral_paid: Uint128,
}

#[cw_serde]
pub struct TokenUriResponse {
    pub token_uri: String,
}

#[cw_serde]
pub struct PaymentBalanceResponse {
    pub balance: Uint128,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> Schedule {
        Schedule {
            whitelist_start: 100,
            public_start: 200,
            guaranteed_start: 150,
            mint_finish: 300,
        }
    }

    fn caps() -> SupplyCaps {
        SupplyCaps {
            total_supply_cap: 99,
            reserved_airdrop_cap: 10,
            reserved_guaranteed_cap: 5,
            per_wallet_public_cap: 3,
            minimum_sold_threshold: 30,
        }
    }

    #[test]
    fn test_schedule_ordering() {
        assert!(schedule().validate().is_ok());

        let mut public_first = schedule();
        public_first.public_start = 99;
        assert!(matches!(
            public_first.validate(),
            Err(ContractError::InvalidPhaseOrder { .. })
        ));

        let mut finish_at_public = schedule();
        finish_at_public.mint_finish = finish_at_public.public_start;
        assert!(matches!(
            finish_at_public.validate(),
            Err(ContractError::InvalidPhaseOrder { .. })
        ));

        let mut guaranteed_at_whitelist = schedule();
        guaranteed_at_whitelist.guaranteed_start = 100;
        assert!(matches!(
            guaranteed_at_whitelist.validate(),
            Err(ContractError::InvalidPhaseOrder { .. })
        ));
    }

    #[test]
    fn test_pricing_shares() {
        let pricing = Pricing {
            public_unit_price: Uint128::new(100),
            minimum_unit_price: Uint128::new(50),
            marketing_share_bps: 5_000,
            referral_share_bps: 4_999,
        };
        assert!(pricing.validate().is_ok());

        let full = Pricing {
            referral_share_bps: 5_000,
            ..pricing.clone()
        };
        assert_eq!(full.validate(), Err(ContractError::InvalidShare {}));

        let free = Pricing {
            public_unit_price: Uint128::zero(),
            ..pricing
        };
        assert!(matches!(
            free.validate(),
            Err(ContractError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_supply_caps() {
        let caps = caps();
        assert!(caps.validate().is_ok());
        assert_eq!(caps.general_cap(), 84);
        assert_eq!(caps.sellable_cap(), 89);

        let over_reserved = SupplyCaps {
            reserved_guaranteed_cap: 90,
            ..caps.clone()
        };
        assert!(matches!(
            over_reserved.validate(),
            Err(ContractError::InvalidSupply { .. })
        ));

        let unreachable = SupplyCaps {
            minimum_sold_threshold: 90,
            ..caps
        };
        assert!(matches!(
            unreachable.validate(),
            Err(ContractError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_normalize_signer() {
        assert_eq!(
            normalize_signer("0xAbCdEf0000000000000000000000000000000001").unwrap(),
            "0xabcdef0000000000000000000000000000000001"
        );
        assert!(normalize_signer("abcdef0000000000000000000000000000000001").is_err());
        assert!(normalize_signer("0xabcd").is_err());
        assert!(normalize_signer("0xzz00000000000000000000000000000000000000").is_err());
    }
}
