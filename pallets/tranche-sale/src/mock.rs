use crate as pallet_tranche_sale;
use crate::WhitelistWindow;
use frame_support::{
    derive_impl, parameter_types,
    traits::{ConstU32, ConstU64},
    PalletId,
};
use sale_primitives::UNIT;
use sp_core::H256;
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage, Permill,
};

type Block = frame_system::mocking::MockBlock<Test>;

// Configure a mock runtime to test the pallet.
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        Balances: pallet_balances,
        Timestamp: pallet_timestamp,
        SaleToken: pallet_sale_token,
        TrancheSale: pallet_tranche_sale,
    }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
    type BaseCallFilter = frame_support::traits::Everything;
    type BlockWeights = ();
    type BlockLength = ();
    type DbWeight = ();
    type RuntimeOrigin = RuntimeOrigin;
    type RuntimeCall = RuntimeCall;
    type Nonce = u64;
    type Hash = H256;
    type Hashing = BlakeTwo256;
    type AccountId = u64;
    type Lookup = IdentityLookup<Self::AccountId>;
    type Block = Block;
    type RuntimeEvent = RuntimeEvent;
    type BlockHashCount = ConstU64<250>;
    type Version = ();
    type PalletInfo = PalletInfo;
    type AccountData = pallet_balances::AccountData<u128>;
    type OnNewAccount = ();
    type OnKilledAccount = ();
    type SystemWeightInfo = ();
    type SS58Prefix = ();
    type OnSetCode = ();
    type MaxConsumers = ConstU32<16>;
}

parameter_types! {
    pub storage ExistentialDeposit: u128 = 1;
}

#[derive_impl(pallet_balances::config_preludes::TestDefaultConfig)]
impl pallet_balances::Config for Test {
    type Balance = u128;
    type ExistentialDeposit = ExistentialDeposit;
    type AccountStore = System;
}

impl pallet_timestamp::Config for Test {
    type Moment = u64;
    type OnTimestampSet = ();
    type MinimumPeriod = ConstU64<1>;
    type WeightInfo = ();
}

parameter_types! {
    pub const LedgerPalletId: PalletId = PalletId(*b"py/sltok");
}

impl pallet_sale_token::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type PalletId = LedgerPalletId;
}

pub const SALE_START: u64 = 1_000_000;
pub const PUBLIC_START: u64 = 2_000_000;
pub const END: u64 = 3_000_000;

parameter_types! {
    pub const SalePalletId: PalletId = PalletId(*b"py/trsal");
    pub const CompanyReserve: Permill = Permill::from_percent(40);
    pub const SaleStartTime: u64 = SALE_START;
    pub const PublicStartTime: u64 = PUBLIC_START;
    pub const EndTime: u64 = END;
    pub const MinContribution: u128 = UNIT / 10;
    pub const MaxContribution: u128 = 2_500 * UNIT;
    pub storage SaleWhitelistWindow: WhitelistWindow = WhitelistWindow::EntireSale;
}

impl pallet_tranche_sale::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type Currency = Balances;
    type Ledger = SaleToken;
    type Time = Timestamp;
    type PalletId = SalePalletId;
    type CompanyReserve = CompanyReserve;
    type SaleStartTime = SaleStartTime;
    type PublicStartTime = PublicStartTime;
    type EndTime = EndTime;
    type MinContribution = MinContribution;
    type MaxContribution = MaxContribution;
    type MaxEarlyCommitments = ConstU32<3>;
    type WhitelistWindow = SaleWhitelistWindow;
    type WeightInfo = ();
}

pub const OWNER: u64 = 1;
pub const FUNDING: u64 = 2;
pub const OPERATOR: u64 = 3;
pub const BUYER: u64 = 4;
pub const BUYER2: u64 = 5;
pub const EARLY1: u64 = 6;
pub const EARLY2: u64 = 7;
/// Whitelisted but holds only one value-unit
pub const POOR: u64 = 8;

pub const TOTAL_SUPPLY: u128 = 100_000_000 * UNIT;
pub const BUYER_FUNDS: u128 = 10_000 * UNIT;

/// Half an hour before the public sale, inside the sale window.
pub const PRESALE_TIME: u64 = PUBLIC_START - 30 * 60;

pub fn set_time(secs: u64) {
    Timestamp::set_timestamp(secs * 1_000);
}

pub fn new_test_ext() -> sp_io::TestExternalities {
    new_test_ext_with_supply(TOTAL_SUPPLY)
}

// Build genesis storage according to the mock runtime.
pub fn new_test_ext_with_supply(total_supply: u128) -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

    pallet_balances::GenesisConfig::<Test> {
        balances: vec![
            (OWNER, 100 * UNIT),
            (FUNDING, UNIT),
            (BUYER, BUYER_FUNDS),
            (BUYER2, BUYER_FUNDS),
            (EARLY1, BUYER_FUNDS),
            (POOR, UNIT),
        ],
        dev_accounts: None,
    }
    .assimilate_storage(&mut t)
    .unwrap();

    pallet_sale_token::GenesisConfig::<Test> {
        owner: Some(OWNER),
        sale_account: Some(TrancheSale::account_id()),
        token_name: b"Sale Token".to_vec(),
        token_symbol: b"SALE".to_vec(),
        decimals: sale_primitives::DECIMALS,
        total_supply,
    }
    .assimilate_storage(&mut t)
    .unwrap();

    pallet_tranche_sale::GenesisConfig::<Test> {
        owner: Some(OWNER),
        funding_wallet: Some(FUNDING),
        whitelist_operators: vec![OPERATOR],
    }
    .assimilate_storage(&mut t)
    .unwrap();

    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| {
        System::set_block_number(1);
        set_time(PRESALE_TIME);
    });
    ext
}

/// Runs `test` and checks the sale and ledger invariants afterwards.
pub fn build_and_execute(test: impl FnOnce()) {
    build_and_execute_with_supply(TOTAL_SUPPLY, test)
}

pub fn build_and_execute_with_supply(total_supply: u128, test: impl FnOnce()) {
    new_test_ext_with_supply(total_supply).execute_with(|| {
        test();
        TrancheSale::do_try_state().expect("sale invariants hold");
        SaleToken::do_try_state().expect("ledger invariants hold");
    });
}

pub fn connect() {
    frame_support::assert_ok!(TrancheSale::connect_ledger(
        RuntimeOrigin::signed(OWNER),
        SaleToken::account_id()
    ));
}

/// Connects the ledger and whitelists both buyers and the underfunded account.
pub fn setup_active_sale() {
    connect();
    for account in [BUYER, BUYER2, POOR] {
        frame_support::assert_ok!(TrancheSale::add_to_whitelist(
            RuntimeOrigin::signed(OPERATOR),
            account
        ));
    }
}
