//! Finger-state encoding — geometric ratios to an open/closed bitmask.

use super::landmarks::{HandJoint, HandObservation};

/// Bit for each finger in a [`FingerMask`].  The thumb bit is reserved and
/// never set by the encoder.
pub const THUMB_BIT: u8 = 0b1_0000;
pub const INDEX_BIT: u8 = 0b0_1000;
pub const MIDDLE_BIT: u8 = 0b0_0100;
pub const RING_BIT: u8 = 0b0_0010;
pub const PINKY_BIT: u8 = 0b0_0001;

/// Open(1)/closed(0) state of the fingers, thumb in the highest bit down to
/// pinky in the lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FingerMask(u8);

impl FingerMask {
    pub const ALL_CLOSED: FingerMask = FingerMask(0);

    /// Build a mask from raw bits; anything above the thumb bit is dropped.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1_1111)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_open(&self, bit: u8) -> bool {
        self.0 & bit != 0
    }
}

/// Thresholds for the open/closed decision.
#[derive(Debug, Clone)]
pub struct FingerConfig {
    /// Tip-segment over base-segment ratio above which a finger is open.
    pub open_ratio: f32,
    /// Divisor used when the base segment has (near) zero length.
    pub zero_divisor: f32,
}

impl Default for FingerConfig {
    fn default() -> Self {
        Self {
            open_ratio: 0.5,
            zero_divisor: 0.01,
        }
    }
}

/// Per finger: (tip, base joint, palm joint).  Ordered so that shifting in
/// each result leaves index in the highest finger bit and pinky in the lowest.
const FINGER_CHAINS: [(HandJoint, HandJoint, HandJoint); 4] = [
    (HandJoint::IndexTip, HandJoint::IndexMcp, HandJoint::Wrist),
    (HandJoint::MiddleTip, HandJoint::MiddleMcp, HandJoint::Wrist),
    (HandJoint::RingTip, HandJoint::RingMcp, HandJoint::Wrist),
    (HandJoint::PinkyTip, HandJoint::PinkyMcp, HandJoint::Wrist),
];

/// Encodes a hand observation into a [`FingerMask`].
#[derive(Debug, Clone, Default)]
pub struct FingerStateEncoder {
    pub config: FingerConfig,
}

impl FingerStateEncoder {
    pub fn new(config: FingerConfig) -> Self {
        Self { config }
    }

    /// Extension ratio of one finger, rounded to one decimal.
    ///
    /// Both segments are signed by which end sits higher in the frame, so a
    /// finger folded down over the palm yields a negative ratio.
    pub fn finger_ratio(
        &self,
        obs: &HandObservation,
        tip: HandJoint,
        base: HandJoint,
        palm: HandJoint,
    ) -> f32 {
        let tip_segment = obs.signed_distance(tip, base);
        let base_segment = obs.signed_distance(base, palm);
        let divisor = if base_segment.abs() < f32::EPSILON {
            self.config.zero_divisor
        } else {
            base_segment
        };
        round_tenths(tip_segment / divisor)
    }

    pub fn encode(&self, obs: &HandObservation) -> FingerMask {
        // Thumb state is not evaluated; its bit stays clear.
        let mut bits: u8 = 0;
        for (tip, base, palm) in FINGER_CHAINS {
            bits <<= 1;
            if self.finger_ratio(obs, tip, base, palm) > self.config.open_ratio {
                bits |= 1;
            }
        }
        FingerMask::from_bits(bits)
    }
}

/// Round to one decimal place.
pub(crate) fn round_tenths(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}

// ── Test helpers ───────────────────────────────────────────

/// Build an upright hand: wrist at the bottom, each finger either extended
/// straight up or folded back down below its knuckle.
#[cfg(test)]
pub(crate) fn hand_with_fingers(
    index: bool,
    middle: bool,
    ring: bool,
    pinky: bool,
) -> HandObservation {
    use super::landmarks::{flat_observation, with_joint};

    let mut obs = flat_observation(0.5, 0.5);
    obs = with_joint(&obs, HandJoint::Wrist, 0.5, 0.9, 0.0);
    // Thumb parked well away from the index tip.
    obs = with_joint(&obs, HandJoint::ThumbTip, 0.3, 0.75, 0.0);
    let fingers = [
        (index, HandJoint::IndexMcp, HandJoint::IndexTip, 0.44),
        (middle, HandJoint::MiddleMcp, HandJoint::MiddleTip, 0.50),
        (ring, HandJoint::RingMcp, HandJoint::RingTip, 0.56),
        (pinky, HandJoint::PinkyMcp, HandJoint::PinkyTip, 0.62),
    ];
    for (open, mcp, tip, x) in fingers {
        obs = with_joint(&obs, mcp, x, 0.6, 0.0);
        let tip_y = if open { 0.35 } else { 0.68 };
        obs = with_joint(&obs, tip, x, tip_y, 0.0);
    }
    obs
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::landmarks::{flat_observation, with_joint};

    #[test]
    fn test_all_open() {
        let enc = FingerStateEncoder::default();
        let mask = enc.encode(&hand_with_fingers(true, true, true, true));
        assert_eq!(mask.bits(), 0b0_1111);
        assert!(!mask.is_open(THUMB_BIT));
    }

    #[test]
    fn test_fist() {
        let enc = FingerStateEncoder::default();
        let mask = enc.encode(&hand_with_fingers(false, false, false, false));
        assert_eq!(mask, FingerMask::ALL_CLOSED);
    }

    #[test]
    fn test_bit_order() {
        let enc = FingerStateEncoder::default();
        assert_eq!(enc.encode(&hand_with_fingers(true, false, false, false)).bits(), INDEX_BIT);
        assert_eq!(enc.encode(&hand_with_fingers(false, true, false, false)).bits(), MIDDLE_BIT);
        assert_eq!(enc.encode(&hand_with_fingers(false, false, true, false)).bits(), RING_BIT);
        assert_eq!(enc.encode(&hand_with_fingers(false, false, false, true)).bits(), PINKY_BIT);
        assert_eq!(
            enc.encode(&hand_with_fingers(true, true, false, false)).bits(),
            INDEX_BIT | MIDDLE_BIT
        );
    }

    #[test]
    fn test_ratio_rounding() {
        let enc = FingerStateEncoder::default();
        // Base segment 0.3 up, tip segment 0.16 up: ratio 0.533 rounds to 0.5,
        // which is not strictly above the threshold.
        let obs = flat_observation(0.5, 0.5);
        let obs = with_joint(&obs, HandJoint::Wrist, 0.5, 0.9, 0.0);
        let obs = with_joint(&obs, HandJoint::IndexMcp, 0.5, 0.6, 0.0);
        let obs = with_joint(&obs, HandJoint::IndexTip, 0.5, 0.44, 0.0);
        let ratio =
            enc.finger_ratio(&obs, HandJoint::IndexTip, HandJoint::IndexMcp, HandJoint::Wrist);
        assert!((ratio - 0.5).abs() < 1e-6, "Expected 0.5, got {}", ratio);
        assert!(!enc.encode(&obs).is_open(INDEX_BIT));
    }

    #[test]
    fn test_zero_base_segment_uses_substitute_divisor() {
        let enc = FingerStateEncoder::default();
        // Knuckle sits exactly on the wrist; tip above by 0.02.
        let obs = flat_observation(0.5, 0.5);
        let obs = with_joint(&obs, HandJoint::IndexTip, 0.5, 0.48, 0.0);
        let ratio =
            enc.finger_ratio(&obs, HandJoint::IndexTip, HandJoint::IndexMcp, HandJoint::Wrist);
        assert!(ratio.is_finite());
        assert!((ratio - 2.0).abs() < 1e-4, "Expected 2.0, got {}", ratio);
    }

    #[test]
    fn test_degenerate_hand_does_not_panic() {
        let enc = FingerStateEncoder::default();
        let mask = enc.encode(&flat_observation(0.5, 0.5));
        // Every segment is zero length: ratio 0, all closed.
        assert_eq!(mask, FingerMask::ALL_CLOSED);
    }

    #[test]
    fn test_from_bits_masks_high_bits() {
        assert_eq!(FingerMask::from_bits(0xFF).bits(), 0b1_1111);
    }
}
