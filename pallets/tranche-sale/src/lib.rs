#![cfg_attr(not(feature = "std"), no_std)]
// Allow deprecated getters and the explicit RuntimeEvent type, matching the ledger pallet
#![allow(deprecated)]
#![allow(clippy::let_unit_value)]

//! # Tranche sale
//!
//! Time-boxed token sale priced in tranches. Buyers pay in the native currency
//! and receive tokens from a [`TokenLedger`] at a rate that depends on how many
//! tokens have already been sold and on whether the public sale has started.
//!
//! ## Lifecycle
//!
//! 1. **Unconnected**: the owner records early commitments.
//! 2. `connect_ledger`: the company reserve goes to the funding wallet, the rest
//!    becomes sellable supply, early commitments are settled at the first
//!    tranche rate. The sale is now **Active**.
//! 3. `buy`: whitelisted accounts purchase inside the sale window, within the
//!    per-account contribution cap. When supply runs out the last buyer gets a
//!    partial fill plus refund and the sale finalizes itself.
//! 4. `finalize`: the owner closes the sale after the end time. The ledger is
//!    finalized too, unlocking transfers.
//! 5. `dispose_unsold`: anyone burns whatever the sale account still holds.
//!
//! Each dispatchable runs in its own storage layer, so a failure at any step
//! (including a rejected currency or ledger transfer) leaves no trace.

use codec::{Decode, Encode, MaxEncodedLen};
use frame_support::{
    dispatch::DispatchResult,
    ensure,
    pallet_prelude::*,
    storage::with_storage_layer,
    traits::{
        fungible::{Inspect, Mutate},
        tokens::Preservation,
        UnixTime,
    },
    PalletId,
};
use frame_system::{ensure_signed, pallet_prelude::*};
use sale_primitives::TokenLedger;
use scale_info::TypeInfo;
use sp_runtime::{traits::AccountIdConversion, DispatchError, Permill, RuntimeDebug};
use sp_std::prelude::*;

pub use access::WhitelistWindow;
pub use lifecycle::{SalePhase, TransitionError};
pub use pallet::*;
pub use weights::WeightInfo;

mod access;
pub mod lifecycle;
pub mod pricing;
pub mod weights;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

/// The current storage version.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

const LOG_TARGET: &str = "pallet-tranche-sale";

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Native currency buyers pay with.
        type Currency: Inspect<Self::AccountId, Balance = u128> + Mutate<Self::AccountId>;

        /// Ledger of the token being sold.
        type Ledger: TokenLedger<Self::AccountId>;

        /// Source of the current time.
        type Time: UnixTime;

        /// Identifier the sale's own account is derived from.
        #[pallet::constant]
        type PalletId: Get<PalletId>;

        /// Share of the ledger supply sent to the funding wallet on connect.
        #[pallet::constant]
        type CompanyReserve: Get<Permill>;

        /// Unix seconds. Purchases before this instant are rejected.
        #[pallet::constant]
        type SaleStartTime: Get<u64>;

        /// Unix seconds. From here on the public rate applies regardless of
        /// tokens sold.
        #[pallet::constant]
        type PublicStartTime: Get<u64>;

        /// Unix seconds. Purchases after this instant are rejected; the owner
        /// may finalize once it has passed.
        #[pallet::constant]
        type EndTime: Get<u64>;

        /// Smallest accepted contribution, in value base units.
        #[pallet::constant]
        type MinContribution: Get<u128>;

        /// Cap on a single contribution and on an account's running total.
        #[pallet::constant]
        type MaxContribution: Get<u128>;

        /// Upper bound on distinct early-commitment participants.
        #[pallet::constant]
        type MaxEarlyCommitments: Get<u32>;

        type WhitelistWindow: Get<WhitelistWindow>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    pub struct Pallet<T>(_);

    #[pallet::storage]
    #[pallet::getter(fn owner)]
    pub type Owner<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

    /// Accounts allowed to manage the whitelist
    #[pallet::storage]
    pub type WhitelistOperators<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, (), OptionQuery>;

    /// Accounts allowed to buy
    #[pallet::storage]
    #[pallet::getter(fn whitelist)]
    pub type Whitelist<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, bool, ValueQuery>;

    /// Receives the company reserve and all accepted contributions
    #[pallet::storage]
    #[pallet::getter(fn funding_wallet)]
    pub type FundingWallet<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

    /// Written once, by `connect_ledger`
    #[pallet::storage]
    #[pallet::getter(fn ledger_account)]
    pub type LedgerAccount<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

    #[pallet::storage]
    #[pallet::getter(fn phase)]
    pub type Phase<T> = StorageValue<_, SalePhase, ValueQuery>;

    /// Tokens handed out so far, early commitments included
    #[pallet::storage]
    #[pallet::getter(fn total_units_sold)]
    pub type TotalUnitsSold<T> = StorageValue<_, u128, ValueQuery>;

    /// Tokens still available for purchase
    #[pallet::storage]
    #[pallet::getter(fn sellable_balance)]
    pub type SellableBalance<T> = StorageValue<_, u128, ValueQuery>;

    /// Value pledged before launch, per participant
    #[pallet::storage]
    pub type EarlyCommitments<T: Config> =
        CountedStorageMap<_, Blake2_128Concat, T::AccountId, u128, ValueQuery>;

    /// Accepted (non-refunded) value, per buyer
    #[pallet::storage]
    #[pallet::getter(fn contribution_of)]
    pub type Contributions<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, u128, ValueQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// Ledger connected, reserve allocated and supply made sellable
        LedgerConnected { ledger: T::AccountId, company_reserve: u128, sellable: u128 },
        EarlyCommitmentAdded { participant: T::AccountId, amount: u128, total: u128 },
        /// Early commitment paid out in tokens during `connect_ledger`
        EarlyCommitmentSettled { participant: T::AccountId, value: u128, units: u128 },
        OwnershipTransferred { from: T::AccountId, to: T::AccountId },
        WhitelistOperatorAdded { operator: T::AccountId },
        WhitelistOperatorRemoved { operator: T::AccountId },
        Whitelisted { account: T::AccountId },
        RemovedFromWhitelist { account: T::AccountId },
        /// `paid` is the value kept by the sale, after any refund
        TokensPurchased { buyer: T::AccountId, paid: u128, units: u128, rate: u128 },
        /// Excess value returned on a partial fill
        Refunded { buyer: T::AccountId, amount: u128 },
        SaleFinalized { total_units_sold: u128 },
        UnsoldDisposed { amount: u128 },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Caller is not the owner
        NotOwner,
        /// Caller is not a whitelist operator
        NotWhitelistOperator,
        /// Buyer is not on the whitelist
        NotWhitelisted,
        /// Purchases need a connected, not yet finalized sale
        SaleNotActive,
        AlreadyConnected,
        NotConnected,
        /// Account passed to `connect_ledger` is not the configured ledger
        UnknownLedger,
        AlreadyFinalized,
        NotFinalized,
        NoFundingWallet,
        /// Outside `[SaleStartTime, EndTime]`
        OutsideSaleWindow,
        /// `finalize` before `EndTime` has passed
        SaleNotEnded,
        BelowMinimumContribution,
        /// Contribution, alone or with the buyer's previous ones, exceeds the cap
        ContributionCapExceeded,
        TooManyEarlyCommitments,
        /// Early commitments need more tokens than are sellable
        InsufficientSellableSupply,
        ZeroAmount,
        /// A currency or ledger transfer was rejected
        TransferFailed,
        Overflow,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn integrity_test() {
            assert!(
                T::SaleStartTime::get() <= T::PublicStartTime::get() &&
                    T::PublicStartTime::get() <= T::EndTime::get(),
                "Sale start, public start and end times must be ordered"
            );
            assert!(
                T::MinContribution::get() > 0 &&
                    T::MinContribution::get() <= T::MaxContribution::get(),
                "Contribution limits must be non-zero and ordered"
            );
            assert!(pricing::is_well_formed(), "Tranche schedule is malformed");
        }

        #[cfg(feature = "try-runtime")]
        fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
            Self::do_try_state()
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Connect the token ledger and start the sale.
        ///
        /// Allocates the company reserve, makes the remainder sellable and settles
        /// every early commitment at the first tranche rate.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::connect_ledger(T::MaxEarlyCommitments::get()))]
        pub fn connect_ledger(origin: OriginFor<T>, ledger: T::AccountId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_owner(&who)?;
            Self::do_connect_ledger(ledger)
        }

        /// Record (or top up) a pre-launch pledge. Only before the ledger is
        /// connected.
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::add_early_commitment())]
        pub fn add_early_commitment(
            origin: OriginFor<T>,
            participant: T::AccountId,
            amount: u128,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_owner(&who)?;
            ensure!(amount > 0, Error::<T>::ZeroAmount);
            ensure!(!Phase::<T>::get().is_connected(), Error::<T>::AlreadyConnected);

            if !EarlyCommitments::<T>::contains_key(&participant) {
                ensure!(
                    EarlyCommitments::<T>::count() < T::MaxEarlyCommitments::get(),
                    Error::<T>::TooManyEarlyCommitments
                );
            }

            let total = EarlyCommitments::<T>::get(&participant)
                .checked_add(amount)
                .ok_or(Error::<T>::Overflow)?;
            EarlyCommitments::<T>::insert(&participant, total);

            Self::deposit_event(Event::EarlyCommitmentAdded { participant, amount, total });
            Ok(())
        }

        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::transfer_ownership())]
        pub fn transfer_ownership(origin: OriginFor<T>, new_owner: T::AccountId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_transfer_ownership(&who, new_owner)
        }

        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::add_whitelist_operator())]
        pub fn add_whitelist_operator(
            origin: OriginFor<T>,
            operator: T::AccountId,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_set_whitelist_operator(&who, operator, true)
        }

        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::remove_whitelist_operator())]
        pub fn remove_whitelist_operator(
            origin: OriginFor<T>,
            operator: T::AccountId,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_set_whitelist_operator(&who, operator, false)
        }

        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::add_to_whitelist())]
        pub fn add_to_whitelist(origin: OriginFor<T>, account: T::AccountId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_set_whitelisted(&who, account, true)
        }

        #[pallet::call_index(6)]
        #[pallet::weight(T::WeightInfo::remove_from_whitelist())]
        pub fn remove_from_whitelist(
            origin: OriginFor<T>,
            account: T::AccountId,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_set_whitelisted(&who, account, false)
        }

        /// Buy tokens for `value` of the native currency.
        ///
        /// If less supply is left than `value` would buy, the caller receives the
        /// remainder and is refunded the difference, and the sale finalizes.
        #[pallet::call_index(7)]
        #[pallet::weight(T::WeightInfo::buy())]
        pub fn buy(origin: OriginFor<T>, value: u128) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_buy(&who, value)
        }

        /// Close the sale once the end time has passed and finalize the ledger.
        #[pallet::call_index(8)]
        #[pallet::weight(T::WeightInfo::finalize())]
        pub fn finalize(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_owner(&who)?;
            Phase::<T>::get().finalize().map_err(Error::<T>::from)?;
            ensure!(Self::now() > T::EndTime::get(), Error::<T>::SaleNotEnded);

            Self::finalize_sale()
        }

        /// Burn whatever the sale account still holds. Anyone may call this once
        /// the sale is finalized.
        #[pallet::call_index(9)]
        #[pallet::weight(T::WeightInfo::dispose_unsold())]
        pub fn dispose_unsold(origin: OriginFor<T>) -> DispatchResult {
            ensure_signed(origin)?;
            ensure!(Phase::<T>::get().is_finalized(), Error::<T>::NotFinalized);

            let sale = Self::account_id();
            let amount = T::Ledger::balance_of(&sale);
            if amount > 0 {
                Self::ledger_result(T::Ledger::burn(&sale, amount))?;
            }
            SellableBalance::<T>::put(0);

            log::info!(target: LOG_TARGET, "Disposed of {amount} unsold tokens");
            Self::deposit_event(Event::UnsoldDisposed { amount });
            Ok(())
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Sale owner
        pub owner: Option<T::AccountId>,
        /// Receives the company reserve and the contributions (required)
        pub funding_wallet: Option<T::AccountId>,
        /// Accounts allowed to manage the whitelist from the start
        pub whitelist_operators: Vec<T::AccountId>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            let funding = self.funding_wallet.as_ref().expect("Sale requires a funding wallet");
            FundingWallet::<T>::put(funding);

            if let Some(ref owner) = self.owner {
                Owner::<T>::put(owner);
            }

            for operator in &self.whitelist_operators {
                WhitelistOperators::<T>::insert(operator, ());
            }
        }
    }
}

impl<T: Config> From<TransitionError> for Error<T> {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::AlreadyConnected => Error::<T>::AlreadyConnected,
            TransitionError::NotConnected => Error::<T>::NotConnected,
            TransitionError::AlreadyFinalized => Error::<T>::AlreadyFinalized,
        }
    }
}

impl<T: Config> Pallet<T> {
    /// The sale's own account: holds the sellable supply.
    pub fn account_id() -> T::AccountId {
        T::PalletId::get().into_account_truncating()
    }

    /// Current time in unix seconds.
    pub fn now() -> u64 {
        T::Time::now().as_secs()
    }

    pub fn is_finalized() -> bool {
        Phase::<T>::get().is_finalized()
    }

    pub fn early_commitment(who: &T::AccountId) -> u128 {
        EarlyCommitments::<T>::get(who)
    }

    pub fn early_commitment_count() -> u32 {
        EarlyCommitments::<T>::count()
    }

    /// Rate the next purchase would get.
    pub fn current_rate() -> u128 {
        pricing::rate(TotalUnitsSold::<T>::get(), Self::now(), T::PublicStartTime::get())
    }

    /// Tokens `value` would buy right now, ignoring remaining supply.
    pub fn calculate_token_amount(value: u128) -> Option<u128> {
        pricing::token_amount(value, Self::current_rate())
    }

    fn do_connect_ledger(ledger: T::AccountId) -> DispatchResult {
        let next = Phase::<T>::get().connect().map_err(Error::<T>::from)?;
        ensure!(ledger == T::Ledger::ledger_account(), Error::<T>::UnknownLedger);
        let funding = FundingWallet::<T>::get().ok_or(Error::<T>::NoFundingWallet)?;

        let sale = Self::account_id();
        let supply = T::Ledger::total_supply();
        let company_reserve = T::CompanyReserve::get().mul_floor(supply);
        Self::ledger_result(T::Ledger::transfer(&sale, &funding, company_reserve))?;

        let mut sellable = supply.saturating_sub(company_reserve);
        let mut sold = TotalUnitsSold::<T>::get();
        let rate = pricing::presale_rate();

        for (participant, value) in EarlyCommitments::<T>::iter() {
            let units = pricing::token_amount(value, rate).ok_or(Error::<T>::Overflow)?;
            ensure!(units <= sellable, Error::<T>::InsufficientSellableSupply);

            Self::ledger_result(T::Ledger::transfer(&sale, &participant, units))?;
            sellable -= units;
            sold = sold.checked_add(units).ok_or(Error::<T>::Overflow)?;

            log::debug!(
                target: LOG_TARGET,
                "Settled early commitment of {value} for {participant:?}: {units} tokens"
            );
            Self::deposit_event(Event::EarlyCommitmentSettled { participant, value, units });
        }

        LedgerAccount::<T>::put(&ledger);
        Phase::<T>::put(next);
        SellableBalance::<T>::put(sellable);
        TotalUnitsSold::<T>::put(sold);

        log::info!(
            target: LOG_TARGET,
            "Ledger {ledger:?} connected: reserve {company_reserve}, sellable {sellable}"
        );
        Self::deposit_event(Event::LedgerConnected { ledger, company_reserve, sellable });

        if sellable == 0 {
            Self::finalize_sale()?;
        }
        Ok(())
    }

    /// Purchase admission, pricing, settlement and sell-out handling.
    ///
    /// Runs in its own storage layer: on `Err` nothing it wrote survives, also
    /// when called from outside a dispatchable.
    pub fn do_buy(who: &T::AccountId, value: u128) -> DispatchResult {
        with_storage_layer(|| Self::settle_purchase(who, value))
    }

    fn settle_purchase(who: &T::AccountId, value: u128) -> DispatchResult {
        ensure!(Phase::<T>::get().is_active(), Error::<T>::SaleNotActive);

        let now = Self::now();
        if Self::whitelist_enforced(now) {
            ensure!(Whitelist::<T>::get(who), Error::<T>::NotWhitelisted);
        }
        ensure!(
            now >= T::SaleStartTime::get() && now <= T::EndTime::get(),
            Error::<T>::OutsideSaleWindow
        );

        ensure!(value >= T::MinContribution::get(), Error::<T>::BelowMinimumContribution);
        let cap = T::MaxContribution::get();
        let contributed = Contributions::<T>::get(who);
        ensure!(
            value <= cap && contributed.saturating_add(value) <= cap,
            Error::<T>::ContributionCapExceeded
        );

        let sold = TotalUnitsSold::<T>::get();
        let sellable = SellableBalance::<T>::get();
        let rate = pricing::rate(sold, now, T::PublicStartTime::get());
        let requested = pricing::token_amount(value, rate).ok_or(Error::<T>::Overflow)?;

        let (units, paid) = if requested <= sellable {
            (requested, value)
        } else {
            (sellable, pricing::cost_of(sellable, rate))
        };
        let refund = value.saturating_sub(paid);

        let funding = FundingWallet::<T>::get().ok_or(Error::<T>::NoFundingWallet)?;

        // Only the accepted part is charged; the refund never leaves the buyer.
        Self::ledger_result(T::Ledger::transfer(&Self::account_id(), who, units))?;
        if paid > 0 {
            Self::move_value(who, &funding, paid, Preservation::Preserve)?;
        }

        let remaining = sellable - units;
        SellableBalance::<T>::put(remaining);
        TotalUnitsSold::<T>::put(sold.checked_add(units).ok_or(Error::<T>::Overflow)?);
        Contributions::<T>::insert(who, contributed.saturating_add(paid));

        log::debug!(
            target: LOG_TARGET,
            "{who:?} bought {units} tokens at rate {rate}, paid {paid}, refunded {refund}"
        );
        Self::deposit_event(Event::TokensPurchased { buyer: who.clone(), paid, units, rate });
        if refund > 0 {
            Self::deposit_event(Event::Refunded { buyer: who.clone(), amount: refund });
        }

        if remaining == 0 {
            Self::finalize_sale()?;
        }
        Ok(())
    }

    fn finalize_sale() -> DispatchResult {
        let next = Phase::<T>::get().finalize().map_err(Error::<T>::from)?;
        Phase::<T>::put(next);
        T::Ledger::finalize(&Self::account_id())?;

        let total_units_sold = TotalUnitsSold::<T>::get();
        log::info!(target: LOG_TARGET, "Sale finalized after selling {total_units_sold} tokens");
        Self::deposit_event(Event::SaleFinalized { total_units_sold });
        Ok(())
    }

    fn move_value(
        from: &T::AccountId,
        to: &T::AccountId,
        amount: u128,
        preservation: Preservation,
    ) -> DispatchResult {
        T::Currency::transfer(from, to, amount, preservation).map(|_| ()).map_err(
            |err| -> DispatchError {
                log::warn!(
                    target: LOG_TARGET,
                    "Value transfer of {amount} from {from:?} to {to:?} rejected: {err:?}"
                );
                Error::<T>::TransferFailed.into()
            },
        )
    }

    fn ledger_result(result: DispatchResult) -> DispatchResult {
        result.map_err(|err| {
            log::warn!(target: LOG_TARGET, "Ledger operation rejected: {err:?}");
            Error::<T>::TransferFailed.into()
        })
    }

    /// Storage invariants of the sale.
    #[cfg(any(feature = "try-runtime", test))]
    pub fn do_try_state() -> Result<(), DispatchError> {
        let phase = Phase::<T>::get();
        ensure!(
            phase.is_connected() == LedgerAccount::<T>::get().is_some(),
            DispatchError::Other("Ledger account must be set exactly when connected")
        );

        if phase.is_connected() {
            ensure!(
                SellableBalance::<T>::get() <= T::Ledger::balance_of(&Self::account_id()),
                DispatchError::Other("Sellable balance exceeds the sale's ledger balance")
            );
        } else {
            ensure!(
                TotalUnitsSold::<T>::get() == 0,
                DispatchError::Other("Tokens sold before the ledger was connected")
            );
        }

        ensure!(
            EarlyCommitments::<T>::count() <= T::MaxEarlyCommitments::get(),
            DispatchError::Other("Too many early commitments")
        );

        let cap = T::MaxContribution::get();
        ensure!(
            Contributions::<T>::iter_values().all(|c| c <= cap),
            DispatchError::Other("Contribution above cap")
        );
        Ok(())
    }
}
