//! Gesture classification from finger masks and hand geometry.
//!
//! Most gestures are the finger mask itself.  A handful of masks are
//! ambiguous and get an extra geometric test: the pinch (thumb tip touching
//! index tip) and the two-finger family (spread V, closed, or stacked).

use super::fingers::{FingerMask, INDEX_BIT, MIDDLE_BIT, PINKY_BIT, RING_BIT, THUMB_BIT};
use super::landmarks::{HandJoint, HandObservation, HandRole};

// ── Gesture types ──────────────────────────────────────────

/// Recognized gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// All fingers closed.
    Fist,
    Pinky,
    Ring,
    Middle,
    /// Middle, ring and pinky open.
    LastThree,
    Index,
    /// Index and middle open, not otherwise disambiguated.
    FirstTwo,
    /// Index through pinky open.
    LastFour,
    Thumb,
    /// Rest state.  Also the initial stabilized gesture of every hand.
    OpenPalm,
    /// Index and middle spread apart.
    Victory,
    /// Index and middle together and level in depth.
    TwoFingerClosed,
    /// Thumb-index pinch on the major hand.
    PinchMajor,
    /// Thumb-index pinch on the minor hand.
    PinchMinor,
    /// Any other finger combination, carried as-is.
    Other(FingerMask),
}

impl Gesture {
    /// Map a finger mask to its gesture.  Named combinations get their own
    /// variant; everything else becomes [`Gesture::Other`].
    pub fn from_mask(mask: FingerMask) -> Self {
        const LAST_THREE: u8 = MIDDLE_BIT | RING_BIT | PINKY_BIT;
        const FIRST_TWO: u8 = INDEX_BIT | MIDDLE_BIT;
        const LAST_FOUR: u8 = INDEX_BIT | LAST_THREE;
        const PALM: u8 = THUMB_BIT | LAST_FOUR;

        match mask.bits() {
            0 => Self::Fist,
            PINKY_BIT => Self::Pinky,
            RING_BIT => Self::Ring,
            MIDDLE_BIT => Self::Middle,
            LAST_THREE => Self::LastThree,
            INDEX_BIT => Self::Index,
            FIRST_TWO => Self::FirstTwo,
            LAST_FOUR => Self::LastFour,
            THUMB_BIT => Self::Thumb,
            PALM => Self::OpenPalm,
            _ => Self::Other(mask),
        }
    }

    /// String representation for status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fist => "fist",
            Self::Pinky => "pinky",
            Self::Ring => "ring",
            Self::Middle => "middle",
            Self::LastThree => "last-three",
            Self::Index => "index",
            Self::FirstTwo => "first-two",
            Self::LastFour => "last-four",
            Self::Thumb => "thumb",
            Self::OpenPalm => "open-palm",
            Self::Victory => "victory",
            Self::TwoFingerClosed => "two-finger-closed",
            Self::PinchMajor => "pinch-major",
            Self::PinchMinor => "pinch-minor",
            Self::Other(_) => "other",
        }
    }

    /// Pinch gesture for a given hand role.
    pub fn pinch_for(role: HandRole) -> Self {
        match role {
            HandRole::Major => Self::PinchMajor,
            HandRole::Minor => Self::PinchMinor,
        }
    }
}

// ── Config ─────────────────────────────────────────────────

/// Thresholds for the geometric disambiguation tests.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Maximum thumb-tip to index-tip distance for a pinch.
    pub pinch_distance: f32,
    /// Tip spread over knuckle spread above which two fingers form a V.
    pub victory_spread_ratio: f32,
    /// Maximum index/middle tip depth difference for the closed variant.
    pub closed_depth: f32,
    /// Knuckle spread used when the index and middle knuckles coincide.
    pub zero_divisor: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            pinch_distance: 0.05,
            victory_spread_ratio: 1.7,
            closed_depth: 0.1,
            zero_divisor: 0.01,
        }
    }
}

// ── Classifier ─────────────────────────────────────────────

/// Turns a finger mask plus the observation it came from into a gesture.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    pub config: ClassifierConfig,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, mask: FingerMask, obs: &HandObservation, role: HandRole) -> Gesture {
        let raw = Gesture::from_mask(mask);
        match raw {
            Gesture::LastThree | Gesture::LastFour if self.is_pinched(obs) => {
                Gesture::pinch_for(role)
            }
            Gesture::FirstTwo => self.classify_two_finger(obs),
            other => other,
        }
    }

    fn is_pinched(&self, obs: &HandObservation) -> bool {
        obs.distance(HandJoint::IndexTip, HandJoint::ThumbTip) < self.config.pinch_distance
    }

    fn classify_two_finger(&self, obs: &HandObservation) -> Gesture {
        let tip_spread = obs.distance(HandJoint::IndexTip, HandJoint::MiddleTip);
        let knuckle_spread = obs.distance(HandJoint::IndexMcp, HandJoint::MiddleMcp);
        let knuckle_spread = if knuckle_spread < f32::EPSILON {
            self.config.zero_divisor
        } else {
            knuckle_spread
        };

        if tip_spread / knuckle_spread > self.config.victory_spread_ratio {
            Gesture::Victory
        } else if obs.depth_delta(HandJoint::IndexTip, HandJoint::MiddleTip)
            < self.config.closed_depth
        {
            Gesture::TwoFingerClosed
        } else {
            Gesture::Middle
        }
    }
}

// ── Tests ──────────────────────────────────────────────────
