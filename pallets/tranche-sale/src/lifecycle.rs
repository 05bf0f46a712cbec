use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use sp_runtime::RuntimeDebug;

/// Lifecycle of the sale. Transitions only ever move forward.
#[derive(
    Encode, Decode, MaxEncodedLen, TypeInfo, Clone, Copy, PartialEq, Eq, RuntimeDebug, Default,
)]
pub enum SalePhase {
    /// No ledger yet; early commitments may be recorded.
    #[default]
    Unconnected,
    /// Ledger connected, purchases accepted inside the sale window.
    Active,
    /// Closed for purchases; unsold supply may be disposed of.
    Finalized,
}

/// Rejected lifecycle transition.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub enum TransitionError {
    AlreadyConnected,
    NotConnected,
    AlreadyFinalized,
}

impl SalePhase {
    pub fn connect(self) -> Result<Self, TransitionError> {
        match self {
            SalePhase::Unconnected => Ok(SalePhase::Active),
            SalePhase::Active | SalePhase::Finalized => Err(TransitionError::AlreadyConnected),
        }
    }

    pub fn finalize(self) -> Result<Self, TransitionError> {
        match self {
            SalePhase::Active => Ok(SalePhase::Finalized),
            SalePhase::Unconnected => Err(TransitionError::NotConnected),
            SalePhase::Finalized => Err(TransitionError::AlreadyFinalized),
        }
    }

    pub fn is_connected(&self) -> bool {
        !matches!(self, SalePhase::Unconnected)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SalePhase::Active)
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, SalePhase::Finalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions() {
        let active = SalePhase::default().connect().unwrap();
        assert_eq!(active, SalePhase::Active);
        assert_eq!(active.finalize(), Ok(SalePhase::Finalized));
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        assert_eq!(SalePhase::Active.connect(), Err(TransitionError::AlreadyConnected));
        assert_eq!(SalePhase::Finalized.connect(), Err(TransitionError::AlreadyConnected));
        assert_eq!(SalePhase::Unconnected.finalize(), Err(TransitionError::NotConnected));
        assert_eq!(SalePhase::Finalized.finalize(), Err(TransitionError::AlreadyFinalized));
    }
}
