//! Weights for pallet-tranche-sale.
//!
//! MVP placeholder figures, not produced by the benchmark CLI. Read and write
//! counts are estimates too; `buy`, `finalize` and `dispose_unsold` have no
//! benchmark yet.

#![allow(unused_parens)]
#![allow(unused_imports)]

use frame_support::{traits::Get, weights::Weight};
use sp_std::marker::PhantomData;

pub trait WeightInfo {
    fn connect_ledger(c: u32) -> Weight;
    fn add_early_commitment() -> Weight;
    fn transfer_ownership() -> Weight;
    fn add_whitelist_operator() -> Weight;
    fn remove_whitelist_operator() -> Weight;
    fn add_to_whitelist() -> Weight;
    fn remove_from_whitelist() -> Weight;
    fn buy() -> Weight;
    fn finalize() -> Weight;
    fn dispose_unsold() -> Weight;
}

/// Weights backed by the runtime's database weights.
pub struct SubstrateWeight<T>(PhantomData<T>);

impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    fn connect_ledger(c: u32) -> Weight {
        Weight::from_parts(40_000_000, 3_600)
            .saturating_add(Weight::from_parts(12_000_000, 2_600).saturating_mul(c.into()))
            .saturating_add(T::DbWeight::get().reads(6_u64))
            .saturating_add(T::DbWeight::get().reads((2_u64).saturating_mul(c.into())))
            .saturating_add(T::DbWeight::get().writes(6_u64))
            .saturating_add(T::DbWeight::get().writes((1_u64).saturating_mul(c.into())))
    }
    fn add_early_commitment() -> Weight {
        Weight::from_parts(18_000_000, 3_500)
            .saturating_add(T::DbWeight::get().reads(4_u64))
            .saturating_add(T::DbWeight::get().writes(2_u64))
    }
    fn transfer_ownership() -> Weight {
        Weight::from_parts(10_000_000, 1_500)
            .saturating_add(T::DbWeight::get().reads(1_u64))
            .saturating_add(T::DbWeight::get().writes(1_u64))
    }
    fn add_whitelist_operator() -> Weight {
        Weight::from_parts(11_000_000, 1_500)
            .saturating_add(T::DbWeight::get().reads(1_u64))
            .saturating_add(T::DbWeight::get().writes(1_u64))
    }
    fn remove_whitelist_operator() -> Weight {
        Weight::from_parts(11_000_000, 1_500)
            .saturating_add(T::DbWeight::get().reads(1_u64))
            .saturating_add(T::DbWeight::get().writes(1_u64))
    }
    fn add_to_whitelist() -> Weight {
        Weight::from_parts(12_000_000, 3_500)
            .saturating_add(T::DbWeight::get().reads(1_u64))
            .saturating_add(T::DbWeight::get().writes(1_u64))
    }
    fn remove_from_whitelist() -> Weight {
        Weight::from_parts(12_000_000, 3_500)
            .saturating_add(T::DbWeight::get().reads(1_u64))
            .saturating_add(T::DbWeight::get().writes(1_u64))
    }
    fn buy() -> Weight {
        Weight::from_parts(95_000_000, 6_200)
            .saturating_add(T::DbWeight::get().reads(12_u64))
            .saturating_add(T::DbWeight::get().writes(10_u64))
    }
    fn finalize() -> Weight {
        Weight::from_parts(22_000_000, 1_800)
            .saturating_add(T::DbWeight::get().reads(4_u64))
            .saturating_add(T::DbWeight::get().writes(2_u64))
    }
    fn dispose_unsold() -> Weight {
        Weight::from_parts(30_000_000, 3_600)
            .saturating_add(T::DbWeight::get().reads(4_u64))
            .saturating_add(T::DbWeight::get().writes(3_u64))
    }
}

// For tests and mock runtimes
impl WeightInfo for () {
    fn connect_ledger(c: u32) -> Weight {
        Weight::from_parts(40_000_000, 3_600)
            .saturating_add(Weight::from_parts(12_000_000, 2_600).saturating_mul(c.into()))
    }
    fn add_early_commitment() -> Weight {
        Weight::from_parts(18_000_000, 3_500)
    }
    fn transfer_ownership() -> Weight {
        Weight::from_parts(10_000_000, 1_500)
    }
    fn add_whitelist_operator() -> Weight {
        Weight::from_parts(11_000_000, 1_500)
    }
    fn remove_whitelist_operator() -> Weight {
        Weight::from_parts(11_000_000, 1_500)
    }
    fn add_to_whitelist() -> Weight {
        Weight::from_parts(12_000_000, 3_500)
    }
    fn remove_from_whitelist() -> Weight {
        Weight::from_parts(12_000_000, 3_500)
    }
    fn buy() -> Weight {
        Weight::from_parts(95_000_000, 6_200)
    }
    fn finalize() -> Weight {
        Weight::from_parts(22_000_000, 1_800)
    }
    fn dispose_unsold() -> Weight {
        Weight::from_parts(30_000_000, 3_600)
    }
}
