//! Aggregation of the three field statuses into one "ready to pay" flag.

use crate::status::Status;

/// Snapshot of the three latest field statuses and the flag derived from them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AggregateState {
    card: Status,
    expiry: Status,
    cvv: Status,
    all_valid: bool,
}

impl AggregateState {
    /// Builds a snapshot; `all_valid` is derived, never supplied.
    #[inline]
    pub const fn new(card: Status, expiry: Status, cvv: Status) -> Self {
        Self {
            card,
            expiry,
            cvv,
            all_valid: card.is_valid() && expiry.is_valid() && cvv.is_valid(),
        }
    }

    /// Returns the card number status.
    #[inline]
    pub const fn card(&self) -> Status {
        self.card
    }

    /// Returns the expiry status.
    #[inline]
    pub const fn expiry(&self) -> Status {
        self.expiry
    }

    /// Returns the CVV status.
    #[inline]
    pub const fn cvv(&self) -> Status {
        self.cvv
    }

    /// Returns true when all three fields are valid.
    #[inline]
    pub const fn all_valid(&self) -> bool {
        self.all_valid
    }
}

/// Tracks the latest statuses and reports flips of the all-valid flag.
///
/// The last announced value starts at `false`, so a form that never becomes
/// fully valid produces no announcement at all.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    state: AggregateState,
    announced: bool,
}

impl Aggregator {
    /// Creates an aggregator with every field neutral.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records new statuses.
    ///
    /// Returns `Some(all_valid)` when the flag differs from the last announced
    /// value, `None` when nothing needs announcing.
    pub fn update(&mut self, card: Status, expiry: Status, cvv: Status) -> Option<bool> {
        self.state = AggregateState::new(card, expiry, cvv);

        if self.state.all_valid == self.announced {
            return None;
        }
        self.announced = self.state.all_valid;
        Some(self.announced)
    }

    /// Returns the latest snapshot.
    #[inline]
    pub const fn state(&self) -> AggregateState {
        self.state
    }

    /// Returns the last announced value of the flag.
    #[inline]
    pub const fn announced(&self) -> bool {
        self.announced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use Status::{Invalid, Neutral, Valid};

    #[test]
    fn test_all_valid_is_conjunction() {
        assert!(AggregateState::new(Valid, Valid, Valid).all_valid());
        assert!(!AggregateState::new(Valid, Valid, Neutral).all_valid());
        assert!(!AggregateState::new(Invalid, Valid, Valid).all_valid());
        assert!(!AggregateState::default().all_valid());
    }

    #[test]
    fn test_flips_once_when_third_field_turns_valid() {
        let mut agg = Aggregator::new();
        assert_eq!(agg.update(Valid, Neutral, Neutral), None);
        assert_eq!(agg.update(Valid, Valid, Neutral), None);
        assert_eq!(agg.update(Valid, Valid, Valid), Some(true));
        assert!(agg.state().all_valid());
        assert!(agg.announced());
    }

    #[test]
    fn test_redundant_updates_are_silent() {
        let mut agg = Aggregator::new();
        assert_eq!(agg.update(Valid, Valid, Valid), Some(true));
        assert_eq!(agg.update(Valid, Valid, Valid), None);
        assert_eq!(agg.update(Valid, Valid, Valid), None);

        assert_eq!(agg.update(Valid, Valid, Invalid), Some(false));
        assert_eq!(agg.update(Valid, Neutral, Invalid), None);
        assert_eq!(agg.update(Neutral, Neutral, Neutral), None);
    }

    #[test]
    fn test_state_tracks_latest_statuses() {
        let mut agg = Aggregator::new();
        agg.update(Invalid, Valid, Neutral);
        let state = agg.state();
        assert_eq!(state.card(), Invalid);
        assert_eq!(state.expiry(), Valid);
        assert_eq!(state.cvv(), Neutral);
    }
}
