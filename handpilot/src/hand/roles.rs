//! Assignment of detected hands to the major/minor roles.

use tracing::debug;

use super::landmarks::{HandObservation, Handedness, TrackedHand};

/// Maximum number of hands considered per frame.
pub const MAX_HANDS: usize = 2;

/// Observations for each role in one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleAssignment {
    pub major: Option<HandObservation>,
    pub minor: Option<HandObservation>,
}

impl RoleAssignment {
    pub fn is_empty(&self) -> bool {
        self.major.is_none() && self.minor.is_none()
    }
}

/// Maps provider handedness labels onto roles given the dominant hand.
#[derive(Debug, Clone)]
pub struct HandRoleResolver {
    pub dominant: Handedness,
}

impl Default for HandRoleResolver {
    fn default() -> Self {
        Self {
            dominant: Handedness::Right,
        }
    }
}

impl HandRoleResolver {
    pub fn new(dominant: Handedness) -> Self {
        Self { dominant }
    }

    /// Assign this frame's hands.  Only the first two are considered; a later
    /// hand with the same label replaces an earlier one.  Hands with an
    /// unrecognized label are skipped.
    pub fn resolve(&self, hands: &[TrackedHand]) -> RoleAssignment {
        let mut left = None;
        let mut right = None;

        for hand in hands.iter().take(MAX_HANDS) {
            match Handedness::parse(&hand.label) {
                Some(Handedness::Left) => left = Some(hand.observation.clone()),
                Some(Handedness::Right) => right = Some(hand.observation.clone()),
                None => {
                    debug!("Dropping hand with malformed handedness label {:?}", hand.label);
                }
            }
        }

        let mut take = |side: Handedness| match side {
            Handedness::Left => left.take(),
            Handedness::Right => right.take(),
        };
        RoleAssignment {
            major: take(self.dominant),
            minor: take(self.dominant.opposite()),
        }
    }
}
