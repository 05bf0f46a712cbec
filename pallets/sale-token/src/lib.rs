#![cfg_attr(not(feature = "std"), no_std)]
// Allow deprecated weight constants and getters, matching the rest of the workspace
#![allow(deprecated)]
#![allow(clippy::let_unit_value)]

//! Token ledger sold through `pallet-tranche-sale`.
//!
//! The whole supply is minted to the sale account at genesis. Until the sale
//! finalizes the ledger, only the ledger owner and the sale account may move
//! tokens; afterwards transfers are unrestricted and holders may burn.

use frame_support::{dispatch::DispatchResult, ensure, pallet_prelude::*, PalletId};
use frame_system::{ensure_signed, pallet_prelude::*};
use sale_primitives::TokenLedger;
use sp_runtime::{traits::AccountIdConversion, DispatchError};
use sp_std::prelude::*;

pub use pallet::*;

#[cfg(test)]
mod mock;


/// The current storage version.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

const LOG_TARGET: &str = "pallet-sale-token";

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Identifier the ledger's own account is derived from.
        #[pallet::constant]
        type PalletId: Get<PalletId>;
    }

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    pub struct Pallet<T>(_);

    /// Token name (e.g., "Sale Token")
    #[pallet::storage]
    #[pallet::getter(fn token_name)]
    pub type TokenName<T> = StorageValue<_, BoundedVec<u8, ConstU32<64>>, ValueQuery>;

    /// Token symbol (e.g., "SALE")
    #[pallet::storage]
    #[pallet::getter(fn token_symbol)]
    pub type TokenSymbol<T> = StorageValue<_, BoundedVec<u8, ConstU32<16>>, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn decimals)]
    pub type Decimals<T> = StorageValue<_, u8, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn total_supply)]
    pub type TotalSupply<T> = StorageValue<_, u128, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn balance_of)]
    pub type Balances<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, u128, ValueQuery>;

    /// Spending allowances, keyed by (holder, spender)
    #[pallet::storage]
    #[pallet::getter(fn allowance)]
    pub type Allowances<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        T::AccountId,
        u128,
        ValueQuery,
    >;

    /// Set once by the sale; unlocks transfers and burning
    #[pallet::storage]
    #[pallet::getter(fn is_finalized)]
    pub type Finalized<T> = StorageValue<_, bool, ValueQuery>;

    /// The sale account: initial holder of the supply and the only finalizer
    #[pallet::storage]
    #[pallet::getter(fn sale_account)]
    pub type SaleAccount<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

    /// Ledger owner, allowed to transfer before finalization
    #[pallet::storage]
    #[pallet::getter(fn owner)]
    pub type Owner<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// Tokens moved between accounts
        Transferred { from: T::AccountId, to: T::AccountId, amount: u128 },
        /// Holder set the allowance of a spender
        Approved { owner: T::AccountId, spender: T::AccountId, amount: u128 },
        /// Tokens destroyed, total supply reduced
        Burned { who: T::AccountId, amount: u128 },
        /// Transfers unlocked for everyone
        Finalized,
    }

    #[pallet::error]
    pub enum Error<T> {
        InsufficientBalance,
        InsufficientAllowance,
        /// Ledger not finalized and caller is neither owner nor sale account
        TransfersLocked,
        NotSaleAccount,
        AlreadyFinalized,
        NotFinalized,
        Overflow,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        #[cfg(feature = "try-runtime")]
        fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
            Self::do_try_state()
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        #[pallet::call_index(0)]
        #[pallet::weight(10_000)]
        pub fn transfer(origin: OriginFor<T>, to: T::AccountId, amount: u128) -> DispatchResult {
            let sender = ensure_signed(origin)?;
            Self::do_transfer(&sender, &to, amount)
        }

        #[pallet::call_index(1)]
        #[pallet::weight(10_000)]
        pub fn approve(
            origin: OriginFor<T>,
            spender: T::AccountId,
            amount: u128,
        ) -> DispatchResult {
            let owner = ensure_signed(origin)?;
            Allowances::<T>::insert(&owner, &spender, amount);
            Self::deposit_event(Event::Approved { owner, spender, amount });
            Ok(())
        }

        #[pallet::call_index(2)]
        #[pallet::weight(10_000)]
        pub fn transfer_from(
            origin: OriginFor<T>,
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
        ) -> DispatchResult {
            let spender = ensure_signed(origin)?;
            let allowance = Allowances::<T>::get(&from, &spender);
            ensure!(allowance >= amount, Error::<T>::InsufficientAllowance);

            Self::do_transfer(&from, &to, amount)?;
            Allowances::<T>::insert(&from, &spender, allowance - amount);
            Ok(())
        }

        #[pallet::call_index(3)]
        #[pallet::weight(10_000)]
        pub fn burn(origin: OriginFor<T>, amount: u128) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_burn(&who, amount)
        }

        #[pallet::call_index(4)]
        #[pallet::weight(10_000)]
        pub fn finalize(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_finalize(&who)
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Ledger owner, allowed to transfer before finalization
        pub owner: Option<T::AccountId>,
        /// Account receiving the whole supply (the sale)
        pub sale_account: Option<T::AccountId>,
        pub token_name: Vec<u8>,
        pub token_symbol: Vec<u8>,
        pub decimals: u8,
        /// Supply minted to `sale_account`, in base units
        pub total_supply: u128,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            let name: BoundedVec<u8, ConstU32<64>> =
                self.token_name.clone().try_into().expect("Token name too long (max 64 bytes)");
            TokenName::<T>::put(name);

            let symbol: BoundedVec<u8, ConstU32<16>> =
                self.token_symbol.clone().try_into().expect("Token symbol too long (max 16 bytes)");
            TokenSymbol::<T>::put(symbol);

            Decimals::<T>::put(self.decimals);

            if let Some(ref owner) = self.owner {
                Owner::<T>::put(owner);
            }

            match self.sale_account {
                Some(ref sale) => {
                    SaleAccount::<T>::put(sale);
                    Balances::<T>::insert(sale, self.total_supply);
                    TotalSupply::<T>::put(self.total_supply);
                }
                None => assert!(self.total_supply == 0, "Initial supply requires a sale account"),
            }
        }
    }
}

impl<T: Config> Pallet<T> {
    /// The ledger's own account.
    pub fn account_id() -> T::AccountId {
        T::PalletId::get().into_account_truncating()
    }

    /// Whether `who` may move tokens right now.
    pub fn can_transfer(who: &T::AccountId) -> bool {
        Finalized::<T>::get() ||
            Owner::<T>::get().as_ref() == Some(who) ||
            SaleAccount::<T>::get().as_ref() == Some(who)
    }

    pub fn do_transfer(from: &T::AccountId, to: &T::AccountId, amount: u128) -> DispatchResult {
        ensure!(Self::can_transfer(from), Error::<T>::TransfersLocked);

        let from_balance = Balances::<T>::get(from);
        ensure!(from_balance >= amount, Error::<T>::InsufficientBalance);

        if from != to {
            let to_balance =
                Balances::<T>::get(to).checked_add(amount).ok_or(Error::<T>::Overflow)?;
            Balances::<T>::insert(from, from_balance - amount);
            Balances::<T>::insert(to, to_balance);
        }

        Self::deposit_event(Event::Transferred { from: from.clone(), to: to.clone(), amount });
        Ok(())
    }

    pub fn do_burn(who: &T::AccountId, amount: u128) -> DispatchResult {
        ensure!(Finalized::<T>::get(), Error::<T>::NotFinalized);

        let balance = Balances::<T>::get(who);
        ensure!(balance >= amount, Error::<T>::InsufficientBalance);

        Balances::<T>::insert(who, balance - amount);
        TotalSupply::<T>::mutate(|supply| *supply = supply.saturating_sub(amount));

        log::debug!(target: LOG_TARGET, "Burned {amount} tokens from {who:?}");
        Self::deposit_event(Event::Burned { who: who.clone(), amount });
        Ok(())
    }

    pub fn do_finalize(who: &T::AccountId) -> DispatchResult {
        ensure!(SaleAccount::<T>::get().as_ref() == Some(who), Error::<T>::NotSaleAccount);
        ensure!(!Finalized::<T>::get(), Error::<T>::AlreadyFinalized);

        Finalized::<T>::put(true);

        log::info!(target: LOG_TARGET, "Ledger finalized, transfers unlocked");
        Self::deposit_event(Event::Finalized);
        Ok(())
    }

    /// Sum of all balances must equal the total supply.
    #[cfg(any(feature = "try-runtime", test))]
    pub fn do_try_state() -> Result<(), DispatchError> {
        let sum = Balances::<T>::iter_values().fold(0u128, |acc, b| acc.saturating_add(b));
        ensure!(
            sum == TotalSupply::<T>::get(),
            DispatchError::Other("Sum of balances does not match total supply")
        );
        Ok(())
    }
}

impl<T: Config> TokenLedger<T::AccountId> for Pallet<T> {
    fn ledger_account() -> T::AccountId {
        Self::account_id()
    }

    fn total_supply() -> u128 {
        TotalSupply::<T>::get()
    }

    fn balance_of(who: &T::AccountId) -> u128 {
        Balances::<T>::get(who)
    }

    fn transfer(caller: &T::AccountId, to: &T::AccountId, amount: u128) -> DispatchResult {
        Self::do_transfer(caller, to, amount)
    }

    fn burn(caller: &T::AccountId, amount: u128) -> DispatchResult {
        Self::do_burn(caller, amount)
    }

    fn finalize(caller: &T::AccountId) -> DispatchResult {
        Self::do_finalize(caller)
    }

    fn is_finalized() -> bool {
        Finalized::<T>::get()
    }

    fn name() -> Vec<u8> {
        TokenName::<T>::get().into_inner()
    }

    fn symbol() -> Vec<u8> {
        TokenSymbol::<T>::get().into_inner()
    }
}
