//! Tranche pricing.
//!
//! Rates are token base units minted per value base unit. Both sides use
//! [`sale_primitives::DECIMALS`] decimals, so a rate of 1554 means one whole
//! value-unit buys 1554 whole tokens.
//!
//! Everything here is pure: the same `(units_sold, now)` always yields the same
//! rate.

use sale_primitives::UNIT;
use sp_runtime::RuntimeDebug;

/// A pricing bracket, active once `units_sold >= threshold`.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub struct Tranche {
    pub threshold: u128,
    pub rate: u128,
}

/// Ordered by ascending threshold. The last entry is the public rate, which also
/// applies to everyone once the public sale has started.
pub const TRANCHES: [Tranche; 4] = [
    Tranche { threshold: 0, rate: 1554 },
    Tranche { threshold: 5_000_000 * UNIT, rate: 1178 },
    Tranche { threshold: 10_000_000 * UNIT, rate: 1000 },
    Tranche { threshold: 20_000_000 * UNIT, rate: 740 },
];

/// Rate of the first tranche, also used to settle early commitments.
pub const fn presale_rate() -> u128 {
    TRANCHES[0].rate
}

pub const fn public_rate() -> u128 {
    TRANCHES[TRANCHES.len() - 1].rate
}

/// Rate applying to the next purchase.
pub fn rate(units_sold: u128, now: u64, public_start: u64) -> u128 {
    if now >= public_start {
        return public_rate();
    }

    TRANCHES
        .iter()
        .rev()
        .find(|tranche| tranche.threshold <= units_sold)
        .map_or(presale_rate(), |tranche| tranche.rate)
}

/// Tokens bought by `value` at `rate`. `None` on overflow.
pub fn token_amount(value: u128, rate: u128) -> Option<u128> {
    value.checked_mul(rate)
}

/// Value charged for `units` at `rate`, rounded up to the next value base unit.
pub fn cost_of(units: u128, rate: u128) -> u128 {
    units.div_ceil(rate)
}

/// Thresholds start at zero and strictly increase, rates are positive and never
/// increase from one tranche to the next.
pub fn is_well_formed() -> bool {
    TRANCHES[0].threshold == 0 &&
        TRANCHES.iter().all(|tranche| tranche.rate > 0) &&
        TRANCHES
            .windows(2)
            .all(|pair| pair[0].threshold < pair[1].threshold && pair[0].rate >= pair[1].rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLIC_START: u64 = 2_000_000;
    const BEFORE_PUBLIC: u64 = PUBLIC_START - 30 * 60;

    const MEGA: u128 = 1_000_000;

    #[test]
    fn schedule_is_well_formed() {
        assert!(is_well_formed());
    }

    #[test]
    fn rate_follows_tranche_table() {
        // (whole tokens sold, value spent, whole tokens expected)
        let cases = [
            (0, 1, 1554),
            (0, 5, 1554 * 5),
            (5 * MEGA - 1, 1, 1554),
            (5 * MEGA, 1, 1178),
            (10 * MEGA - 1, 1, 1178),
            (10 * MEGA, 1, 1000),
            (20 * MEGA - 1, 1, 1000),
            (20 * MEGA, 1, 740),
            (50 * MEGA, 1, 740),
            (60 * MEGA, 1, 740),
            (110 * MEGA, 5, 740 * 5),
        ];

        for (sold, spent, expected) in cases {
            let tranche_rate = rate(sold * UNIT, BEFORE_PUBLIC, PUBLIC_START);
            assert_eq!(
                token_amount(spent * UNIT, tranche_rate),
                Some(expected * UNIT),
                "sold {sold} tokens, spent {spent}"
            );
        }
    }

    #[test]
    fn boundary_switches_exactly_at_threshold() {
        assert_eq!(rate(5 * MEGA * UNIT - 1, BEFORE_PUBLIC, PUBLIC_START), 1554);
        assert_eq!(rate(5 * MEGA * UNIT, BEFORE_PUBLIC, PUBLIC_START), 1178);
    }

    #[test]
    fn rate_never_increases_with_units_sold() {
        let mut previous = u128::MAX;
        for sold in (0..=25u128).map(|m| m * MEGA * UNIT) {
            let current = rate(sold, BEFORE_PUBLIC, PUBLIC_START);
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn public_start_overrides_tranches() {
        assert_eq!(rate(0, PUBLIC_START - 1, PUBLIC_START), 1554);
        assert_eq!(rate(0, PUBLIC_START, PUBLIC_START), public_rate());
        assert_eq!(rate(7 * MEGA * UNIT, PUBLIC_START + 30 * 60, PUBLIC_START), 740);
    }

    #[test]
    fn cost_rounds_up() {
        assert_eq!(cost_of(370 * UNIT, 740), UNIT / 2);
        assert_eq!(cost_of(741, 740), 2);
        assert_eq!(cost_of(0, 740), 0);
    }

    #[test]
    fn token_amount_detects_overflow() {
        assert_eq!(token_amount(u128::MAX, 2), None);
    }
}
