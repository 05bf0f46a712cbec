//! Owner, whitelist operators and the purchase whitelist.

use super::*;

/// How long the purchase whitelist is enforced.
#[derive(
    Encode, Decode, MaxEncodedLen, TypeInfo, Clone, Copy, PartialEq, Eq, RuntimeDebug, Default,
)]
pub enum WhitelistWindow {
    /// Every purchase requires a whitelisted buyer.
    #[default]
    EntireSale,
    /// Whitelist only gates purchases made before the public start time.
    UntilPublicStart,
}

impl<T: Config> Pallet<T> {
    pub(crate) fn ensure_owner(who: &T::AccountId) -> DispatchResult {
        ensure!(Owner::<T>::get().as_ref() == Some(who), Error::<T>::NotOwner);
        Ok(())
    }

    pub(crate) fn ensure_whitelist_operator(who: &T::AccountId) -> DispatchResult {
        ensure!(Self::is_whitelist_operator(who), Error::<T>::NotWhitelistOperator);
        Ok(())
    }

    pub fn is_whitelist_operator(who: &T::AccountId) -> bool {
        WhitelistOperators::<T>::contains_key(who)
    }

    /// Whether a purchase at `now` must come from a whitelisted account.
    pub fn whitelist_enforced(now: u64) -> bool {
        match T::WhitelistWindow::get() {
            WhitelistWindow::EntireSale => true,
            WhitelistWindow::UntilPublicStart => now < T::PublicStartTime::get(),
        }
    }

    pub(crate) fn do_transfer_ownership(
        who: &T::AccountId,
        new_owner: T::AccountId,
    ) -> DispatchResult {
        Self::ensure_owner(who)?;

        Owner::<T>::put(&new_owner);

        log::info!(target: LOG_TARGET, "Ownership moved from {who:?} to {new_owner:?}");
        Self::deposit_event(Event::OwnershipTransferred { from: who.clone(), to: new_owner });
        Ok(())
    }

    pub(crate) fn do_set_whitelist_operator(
        who: &T::AccountId,
        operator: T::AccountId,
        enabled: bool,
    ) -> DispatchResult {
        Self::ensure_owner(who)?;

        if enabled {
            WhitelistOperators::<T>::insert(&operator, ());
            Self::deposit_event(Event::WhitelistOperatorAdded { operator });
        } else {
            WhitelistOperators::<T>::remove(&operator);
            Self::deposit_event(Event::WhitelistOperatorRemoved { operator });
        }
        Ok(())
    }

    pub(crate) fn do_set_whitelisted(
        who: &T::AccountId,
        account: T::AccountId,
        enabled: bool,
    ) -> DispatchResult {
        Self::ensure_whitelist_operator(who)?;

        if enabled {
            Whitelist::<T>::insert(&account, true);
            Self::deposit_event(Event::Whitelisted { account });
        } else {
            Whitelist::<T>::remove(&account);
            Self::deposit_event(Event::RemovedFromWhitelist { account });
        }
        Ok(())
    }
}
