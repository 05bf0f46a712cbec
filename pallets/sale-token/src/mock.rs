use crate as pallet_sale_token;
use frame_support::{
    derive_impl, parameter_types,
    traits::{ConstU32, ConstU64},
    PalletId,
};
use sale_primitives::UNIT;
use sp_core::H256;
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage,
};

type Block = frame_system::mocking::MockBlock<Test>;

// Configure a mock runtime to test the pallet.
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        SaleToken: pallet_sale_token,
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
    type AccountData = ();
    type OnNewAccount = ();
    type OnKilledAccount = ();
    type SystemWeightInfo = ();
    type SS58Prefix = ();
    type OnSetCode = ();
    type MaxConsumers = ConstU32<16>;
}

parameter_types! {
    pub const LedgerPalletId: PalletId = PalletId(*b"py/sltok");
}

impl pallet_sale_token::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type PalletId = LedgerPalletId;
}

pub const OWNER: u64 = 1;
pub const HOLDER: u64 = 2;
pub const OTHER: u64 = 3;
pub const SPENDER: u64 = 4;
pub const SALE: u64 = 10;

pub const TOTAL_SUPPLY: u128 = 100_000_000 * UNIT;

// Build genesis storage according to the mock runtime.
pub fn new_test_ext() -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

    pallet_sale_token::GenesisConfig::<Test> {
        owner: Some(OWNER),
        sale_account: Some(SALE),
        token_name: b"Sale Token".to_vec(),
        token_symbol: b"SALE".to_vec(),
        decimals: 18,
        total_supply: TOTAL_SUPPLY,
    }
    .assimilate_storage(&mut t)
    .unwrap();

    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
}

/// Runs `test` and checks the ledger invariants afterwards.
pub fn build_and_execute(test: impl FnOnce()) {
    new_test_ext().execute_with(|| {
        test();
        SaleToken::do_try_state().expect("ledger invariants hold");
    });
}
