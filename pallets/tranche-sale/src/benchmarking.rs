//! Benchmarking setup for pallet-tranche-sale

use super::*;

#[allow(unused)]
use crate::Pallet as TrancheSale;
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;

fn owner<T: Config>() -> T::AccountId {
    let caller: T::AccountId = whitelisted_caller();
    Owner::<T>::put(&caller);
    caller
}

#[benchmarks]
mod benchmarks {
    use super::*;

    /// Needs a ledger whose genesis minted its supply to the sale account, and
    /// whose sellable part covers `c` commitments of one value base unit each
    /// at the presale rate (`c * 1554` token base units).
    #[benchmark]
    fn connect_ledger(c: Linear<0, { T::MaxEarlyCommitments::get() }>) {
        let caller = owner::<T>();
        FundingWallet::<T>::put(account::<T::AccountId>("funding", 0, 0));
        for i in 0..c {
            EarlyCommitments::<T>::insert(account::<T::AccountId>("early", i, 0), 1u128);
        }
        let ledger = T::Ledger::ledger_account();

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), ledger.clone());

        assert_eq!(LedgerAccount::<T>::get(), Some(ledger));
        assert!(Phase::<T>::get().is_connected());
    }

    #[benchmark]
    fn add_early_commitment() {
        let caller = owner::<T>();
        let participant: T::AccountId = account("participant", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), participant.clone(), 1_000u128);

        assert_eq!(EarlyCommitments::<T>::get(&participant), 1_000);
    }

    #[benchmark]
    fn transfer_ownership() {
        let caller = owner::<T>();
        let new_owner: T::AccountId = account("new_owner", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), new_owner.clone());

        assert_eq!(Owner::<T>::get(), Some(new_owner));
    }

    #[benchmark]
    fn add_whitelist_operator() {
        let caller = owner::<T>();
        let operator: T::AccountId = account("operator", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), operator.clone());

        assert!(WhitelistOperators::<T>::contains_key(&operator));
    }

    #[benchmark]
    fn remove_whitelist_operator() {
        let caller = owner::<T>();
        let operator: T::AccountId = account("operator", 0, 0);
        WhitelistOperators::<T>::insert(&operator, ());

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), operator.clone());

        assert!(!WhitelistOperators::<T>::contains_key(&operator));
    }

    #[benchmark]
    fn add_to_whitelist() {
        let caller: T::AccountId = whitelisted_caller();
        WhitelistOperators::<T>::insert(&caller, ());
        let buyer: T::AccountId = account("buyer", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), buyer.clone());

        assert_eq!(Whitelist::<T>::get(&buyer), true);
    }

    #[benchmark]
    fn remove_from_whitelist() {
        let caller: T::AccountId = whitelisted_caller();
        WhitelistOperators::<T>::insert(&caller, ());
        let buyer: T::AccountId = account("buyer", 0, 0);
        Whitelist::<T>::insert(&buyer, true);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), buyer.clone());

        assert_eq!(Whitelist::<T>::get(&buyer), false);
    }

    impl_benchmark_test_suite!(TrancheSale, crate::mock::new_test_ext(), crate::mock::Test);
}
