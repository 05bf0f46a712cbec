//! Interfaces shared by `pallet-tranche-sale` and the token ledger it sells from.
//!
//! The sale never touches ledger storage directly. Everything it needs from the
//! ledger goes through [`TokenLedger`].

#![cfg_attr(not(feature = "std"), no_std)]

use sp_runtime::DispatchResult;
use sp_std::vec::Vec;

/// Number of decimals used by the sold token and by the value currency.
pub const DECIMALS: u8 = 18;

/// One whole token (or one whole value-unit) expressed in base units.
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// The narrow view of a token ledger consumed by the sale.
///
/// Amounts are token base units. `caller` is the account on whose behalf the
/// ledger operation runs; the ledger applies its own authorization rules to it.
pub trait TokenLedger<AccountId> {
    /// Account identifying the ledger itself (its "address").
    fn ledger_account() -> AccountId;

    /// Current total supply.
    fn total_supply() -> u128;

    /// Balance held by `who`.
    fn balance_of(who: &AccountId) -> u128;

    /// Move `amount` from `caller` to `to`.
    ///
    /// Fails while the ledger is not finalized unless `caller` is the ledger
    /// owner or the sale account.
    fn transfer(caller: &AccountId, to: &AccountId, amount: u128) -> DispatchResult;

    /// Destroy `amount` of `caller`'s balance, reducing total supply.
    ///
    /// Only possible once the ledger is finalized.
    fn burn(caller: &AccountId, amount: u128) -> DispatchResult;

    /// One-way switch unlocking general transfers. Only the sale account may
    /// call it, and only once.
    fn finalize(caller: &AccountId) -> DispatchResult;

    /// Whether [`TokenLedger::finalize`] already happened.
    fn is_finalized() -> bool;

    fn name() -> Vec<u8>;

    fn symbol() -> Vec<u8>;
}
