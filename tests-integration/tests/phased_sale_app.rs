use cosmwasm_std::{Addr, Api, Uint128};
use phased_sale::mock::{mock_phased_sale, MockPhasedSale};
use sale_std::error::ContractError;
use sale_testing::{
    mock::{mock_app, set_block_time, wallet, MockApp},
    mock_contract::MockContract,
    mock_cw20,
    registry::mock_registry,
    MockCw20, MockRegistry,
};
use sale_tokens::{
    allocation::AllocationTuple,
    sale::{
        ConfigUpdate, InstantiateMsg, LateMintPolicy, Pricing, SalePhase, Schedule,
        SignedAllocation, SupplyCaps,
    },
    signer::AllocationSigner,
};

const SIGNER_SEED: [u8; 32] = [9u8; 32];
const WHITELIST_START: u64 = 1_000;
const GUARANTEED_START: u64 = 1_500;
const PUBLIC_START: u64 = 2_000;
const MINT_FINISH: u64 = 3_000;
const BASE_URI: &str = "ipfs://sale/";
const STARTING_BALANCE: u128 = 1_000;

struct SaleEnv {
    app: MockApp,
    owner: Addr,
    marketing: Addr,
    payment: MockCw20,
    registry: MockRegistry,
    sale: MockPhasedSale,
}

fn setup(buyers: &[&str], minimum_sold_threshold: u32) -> SaleEnv {
    let mut app = mock_app();
    let owner = wallet(&app, "owner");
    let marketing = wallet(&app, "marketing");

    let cw20_code_id = app.store_code(mock_cw20());
    let registry_code_id = app.store_code(mock_registry());
    let sale_code_id = app.store_code(mock_phased_sale());

    let balances = buyers
        .iter()
        .map(|name| (wallet(&app, name), STARTING_BALANCE))
        .collect();
    let payment = MockCw20::instantiate(cw20_code_id, owner.clone(), &mut app, balances);
    let registry = MockRegistry::instantiate(registry_code_id, owner.clone(), &mut app, &owner);

    let msg = InstantiateMsg {
        owner: None,
        schedule: Schedule {
            whitelist_start: WHITELIST_START,
            public_start: PUBLIC_START,
            guaranteed_start: GUARANTEED_START,
            mint_finish: MINT_FINISH,
        },
        pricing: Pricing {
            public_unit_price: Uint128::new(100),
            minimum_unit_price: Uint128::new(50),
            marketing_share_bps: 500,
            referral_share_bps: 500,
        },
        supply: SupplyCaps {
            total_supply_cap: 99,
            reserved_airdrop_cap: 10,
            reserved_guaranteed_cap: 5,
            per_wallet_public_cap: 3,
            minimum_sold_threshold,
        },
        trusted_signer: AllocationSigner::from_seed(&SIGNER_SEED)
            .unwrap()
            .address()
            .unwrap(),
        payment_token: payment.addr().to_string(),
        asset_registry: registry.addr().to_string(),
        marketing_account: marketing.to_string(),
        base_uri: BASE_URI.to_string(),
        base_extension: ".json".to_string(),
        late_mint_policy: None,
    };
    let sale = MockPhasedSale::instantiate(sale_code_id, owner.clone(), &mut app, msg);
    registry
        .execute_set_minter(&mut app, owner.clone(), sale.addr())
        .unwrap();

    SaleEnv {
        app,
        owner,
        marketing,
        payment,
        registry,
        sale,
    }
}

/// Approves the sale for `units` at the public price and buys them.
fn buy(env: &mut SaleEnv, buyer: &Addr, units: u32) {
    env.payment
        .execute_increase_allowance(
            &mut env.app,
            buyer.clone(),
            env.sale.addr(),
            u128::from(units) * 100,
        )
        .unwrap();
    env.sale
        .execute_mint(&mut env.app, buyer.clone(), units)
        .unwrap();
}

fn sign(
    app: &MockApp,
    buyer: &Addr,
    referral: &Addr,
    max_units: u32,
    unit_price: u128,
    is_guaranteed: bool,
) -> SignedAllocation {
    let tuple = AllocationTuple {
        buyer: app.api().addr_canonicalize(buyer.as_str()).unwrap(),
        referral: app.api().addr_canonicalize(referral.as_str()).unwrap(),
        max_units,
        unit_price: Uint128::new(unit_price),
        is_guaranteed,
    };
    SignedAllocation {
        referral: referral.to_string(),
        max_units,
        unit_price: Uint128::new(unit_price),
        is_guaranteed,
        signature: AllocationSigner::from_seed(&SIGNER_SEED)
            .unwrap()
            .sign(&tuple)
            .unwrap(),
    }
}

#[test]
fn test_public_mint_referred() {
    let mut env = setup(&["buyer"], 30);
    let buyer = wallet(&env.app, "buyer");
    let referral = wallet(&env.app, "referral");
    set_block_time(&mut env.app, PUBLIC_START);

    let phase = env.sale.query_phase(&env.app);
    assert_eq!(phase.phase, SalePhase::Public);

    env.payment
        .execute_increase_allowance(&mut env.app, buyer.clone(), env.sale.addr(), 300)
        .unwrap();
    env.sale
        .execute_mint_referred(&mut env.app, buyer.clone(), 3, &referral)
        .unwrap();

    assert_eq!(env.payment.query_balance(&env.app, &buyer), 700);
    assert_eq!(env.payment.query_balance(&env.app, &env.marketing), 15);
    assert_eq!(env.payment.query_balance(&env.app, &referral), 15);
    assert_eq!(env.payment.query_balance(&env.app, env.sale.addr()), 270);

    assert_eq!(env.registry.query_num_tokens(&env.app), 3);
    for token_id in 0..3 {
        assert_eq!(
            env.registry.query_owner_of(&env.app, token_id),
            buyer.to_string()
        );
    }
    assert_eq!(
        env.registry.query_token_uri(&env.app, 1),
        Some(format!("{BASE_URI}1.json"))
    );
    assert_eq!(
        env.sale.query_token_uri(&env.app, 1).token_uri,
        format!("{BASE_URI}1.json")
    );

    let buyer_state = env.sale.query_buyer(&env.app, &buyer);
    assert_eq!(buyer_state.units_purchased, 3);
    assert_eq!(buyer_state.escrowed_payment, Uint128::new(270));
}

#[test]
fn test_failed_payment_rolls_back_mint() {
    let mut env = setup(&["buyer"], 30);
    let buyer = wallet(&env.app, "buyer");
    set_block_time(&mut env.app, PUBLIC_START);

    // allowance covers a single unit only
    env.payment
        .execute_increase_allowance(&mut env.app, buyer.clone(), env.sale.addr(), 100)
        .unwrap();
    let res = env.sale.execute_mint(&mut env.app, buyer.clone(), 3);
    assert!(res.is_err());

    let supply = env.sale.query_supply(&env.app);
    assert_eq!(supply.issued_general, 0);
    assert_eq!(supply.sold, 0);
    assert_eq!(env.sale.query_buyer(&env.app, &buyer).units_purchased, 0);
    assert_eq!(env.registry.query_num_tokens(&env.app), 0);
    assert_eq!(
        env.payment.query_balance(&env.app, &buyer),
        STARTING_BALANCE
    );
}

#[test]
fn test_signed_allocation_mint() {
    let mut env = setup(&["buyer"], 30);
    let buyer = wallet(&env.app, "buyer");
    let referral = wallet(&env.app, "referral");
    set_block_time(&mut env.app, WHITELIST_START);

    let allocation = sign(&env.app, &buyer, &referral, 2, 80, false);

    // public minting is closed during the whitelist
    let err: ContractError = env
        .sale
        .execute_mint(&mut env.app, buyer.clone(), 1)
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::PublicSaleNotStarted {});

    env.payment
        .execute_increase_allowance(&mut env.app, buyer.clone(), env.sale.addr(), 160)
        .unwrap();
    env.sale
        .execute_mint_allocation(&mut env.app, buyer.clone(), 2, allocation.clone())
        .unwrap();

    assert_eq!(env.payment.query_balance(&env.app, &buyer), 840);
    assert_eq!(env.payment.query_balance(&env.app, &referral), 8);
    assert_eq!(env.payment.query_balance(&env.app, &env.marketing), 8);
    assert_eq!(env.registry.query_owner_of(&env.app, 1), buyer.to_string());
    assert!(env.sale.query_allocation_used(&env.app, &buyer, false));
    assert!(!env.sale.query_allocation_used(&env.app, &buyer, true));

    let err: ContractError = env
        .sale
        .execute_mint_allocation(&mut env.app, buyer.clone(), 1, allocation)
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::AllocationAlreadyUsed {});
}

#[test]
fn test_guaranteed_allocation_mint() {
    let mut env = setup(&["buyer"], 30);
    let buyer = wallet(&env.app, "buyer");
    let referral = wallet(&env.app, "referral");
    let allocation = sign(&env.app, &buyer, &referral, 5, 60, true);
    env.payment
        .execute_increase_allowance(&mut env.app, buyer.clone(), env.sale.addr(), 300)
        .unwrap();

    set_block_time(&mut env.app, GUARANTEED_START - 1);
    let err: ContractError = env
        .sale
        .execute_mint_allocation(&mut env.app, buyer.clone(), 5, allocation.clone())
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::GuaranteedPhaseNotStarted {});

    set_block_time(&mut env.app, GUARANTEED_START);
    env.sale
        .execute_mint_allocation(&mut env.app, buyer.clone(), 5, allocation)
        .unwrap();

    let supply = env.sale.query_supply(&env.app);
    assert_eq!(supply.issued_guaranteed, 5);
    assert_eq!(supply.issued_general, 0);
    assert_eq!(env.payment.query_balance(&env.app, &buyer), 700);
}

#[test]
fn test_refund_when_threshold_missed() {
    let mut env = setup(&["buyer"], 30);
    let buyer = wallet(&env.app, "buyer");
    set_block_time(&mut env.app, PUBLIC_START);
    buy(&mut env, &buyer, 3);

    let err: ContractError = env
        .sale
        .execute_refund(&mut env.app, buyer.clone())
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::SaleNotFinished {});

    set_block_time(&mut env.app, MINT_FINISH);
    let owner = env.owner.clone();
    let err: ContractError = env
        .sale
        .execute_redeem_owner(&mut env.app, owner.clone(), &owner)
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::ThresholdNotReached {});

    env.sale
        .execute_refund(&mut env.app, buyer.clone())
        .unwrap();
    // marketing share is not refundable
    assert_eq!(env.payment.query_balance(&env.app, &buyer), 985);
    assert_eq!(env.payment.query_balance(&env.app, env.sale.addr()), 0);
    // purchased assets stay with the buyer
    assert_eq!(env.registry.query_owner_of(&env.app, 0), buyer.to_string());

    env.sale
        .execute_refund(&mut env.app, buyer.clone())
        .unwrap();
    assert_eq!(env.payment.query_balance(&env.app, &buyer), 985);

    let treasury = env.sale.query_treasury(&env.app);
    assert_eq!(treasury.refunded, Uint128::new(285));
    assert_eq!(treasury.pending, Uint128::zero());
}

#[test]
fn test_redeem_after_threshold() {
    let mut env = setup(&["first", "second"], 5);
    let first = wallet(&env.app, "first");
    let second = wallet(&env.app, "second");
    let receiver = wallet(&env.app, "receiver");
    set_block_time(&mut env.app, PUBLIC_START);
    buy(&mut env, &first, 3);
    buy(&mut env, &second, 3);

    let supply = env.sale.query_supply(&env.app);
    assert!(supply.threshold_reached);
    assert_eq!(supply.sold, 6);

    set_block_time(&mut env.app, MINT_FINISH);
    let err: ContractError = env
        .sale
        .execute_redeem_owner(&mut env.app, first.clone(), &first)
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::Unauthorized {});

    let owner = env.owner.clone();
    env.sale
        .execute_redeem_owner(&mut env.app, owner.clone(), &receiver)
        .unwrap();
    assert_eq!(env.payment.query_balance(&env.app, &receiver), 570);
    assert_eq!(env.payment.query_balance(&env.app, env.sale.addr()), 0);

    let err: ContractError = env
        .sale
        .execute_refund(&mut env.app, first.clone())
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::ThresholdAlreadyReached {});

    let treasury = env.sale.query_treasury(&env.app);
    assert_eq!(treasury.redeemed, Uint128::new(570));
    assert_eq!(treasury.redeemable, Uint128::zero());
}

#[test]
fn test_airdrop_and_ownership_handover() {
    let mut env = setup(&[], 30);
    let recipient = wallet(&env.app, "recipient");
    let new_owner = wallet(&env.app, "new_owner");
    let owner = env.owner.clone();

    env.sale
        .execute_update_owner(&mut env.app, owner.clone(), &new_owner)
        .unwrap();
    env.sale
        .execute_accept_ownership(&mut env.app, new_owner.clone())
        .unwrap();
    assert_eq!(env.sale.query_owner(&env.app), new_owner.to_string());

    let err: ContractError = env
        .sale
        .execute_airdrop(&mut env.app, owner, vec![(&recipient, 1)])
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::Unauthorized {});

    env.sale
        .execute_airdrop(&mut env.app, new_owner.clone(), vec![(&recipient, 2)])
        .unwrap();
    assert_eq!(env.registry.query_num_tokens(&env.app), 2);
    assert_eq!(
        env.registry.query_owner_of(&env.app, 1),
        recipient.to_string()
    );
    assert_eq!(env.sale.query_supply(&env.app).issued_airdrop, 2);

    // late minting opened by the new owner once the window has closed
    env.sale
        .execute_update_config(
            &mut env.app,
            new_owner,
            ConfigUpdate::LateMintPolicy {
                policy: LateMintPolicy::WhileUndersold,
            },
        )
        .unwrap();
    set_block_time(&mut env.app, MINT_FINISH + 1);
    let phase = env.sale.query_phase(&env.app);
    assert_eq!(phase.phase, SalePhase::Finished);
    assert!(phase.late_mint_open);
    assert_eq!(
        env.sale.query_config(&env.app).late_mint_policy,
        LateMintPolicy::WhileUndersold
    );
}
