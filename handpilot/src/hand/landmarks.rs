//! Hand landmark data model.
//!
//! Models the 21 joints per hand delivered by the upstream hand-tracking
//! provider.  Coordinates are normalized to the camera frame: x and y lie in
//! [0, 1] with y growing downwards, z is a relative depth whose sign and scale
//! are only consistent within one observation.

use tracing::debug;

// ── Joint definitions ──────────────────────────────────────

/// The 21 hand joints, in provider order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandJoint {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of joints per hand.
pub const JOINT_COUNT: usize = 21;

impl HandJoint {
    /// Convert joint enum to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// String representation for status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb-cmc",
            Self::ThumbMcp => "thumb-mcp",
            Self::ThumbIp => "thumb-ip",
            Self::ThumbTip => "thumb-tip",
            Self::IndexMcp => "index-mcp",
            Self::IndexPip => "index-pip",
            Self::IndexDip => "index-dip",
            Self::IndexTip => "index-tip",
            Self::MiddleMcp => "middle-mcp",
            Self::MiddlePip => "middle-pip",
            Self::MiddleDip => "middle-dip",
            Self::MiddleTip => "middle-tip",
            Self::RingMcp => "ring-mcp",
            Self::RingPip => "ring-pip",
            Self::RingDip => "ring-dip",
            Self::RingTip => "ring-tip",
            Self::PinkyMcp => "pinky-mcp",
            Self::PinkyPip => "pinky-pip",
            Self::PinkyDip => "pinky-dip",
            Self::PinkyTip => "pinky-tip",
        }
    }
}

// ── Handedness and roles ───────────────────────────────────

/// Physical hand as labelled by the tracking provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parse a provider label.  Accepts "left"/"right" in any case.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// The other hand.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Role of a hand independent of its physical side.
///
/// `Major` is the configured dominant hand, `Minor` the other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandRole {
    Major,
    Minor,
}

impl HandRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
        }
    }
}

// ── Landmarks ──────────────────────────────────────────────

/// One normalized joint position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Complete joint set for one hand in one frame.
///
/// Replaced wholesale every frame; never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    joints: [Landmark; JOINT_COUNT],
}

impl HandObservation {
    pub fn new(joints: [Landmark; JOINT_COUNT]) -> Self {
        Self { joints }
    }

    /// Build an observation from a provider joint list.
    ///
    /// Returns `None` unless exactly 21 joints are supplied.
    pub fn from_joints(joints: &[Landmark]) -> Option<Self> {
        let joints: [Landmark; JOINT_COUNT] = match joints.try_into() {
            Ok(j) => j,
            Err(_) => {
                debug!(
                    "Hand observation: expected {} joints, got {}",
                    JOINT_COUNT,
                    joints.len()
                );
                return None;
            }
        };
        Some(Self { joints })
    }

    /// Position of a single joint.
    pub fn joint(&self, joint: HandJoint) -> Landmark {
        self.joints[joint.index()]
    }

    /// All joints in provider order.
    pub fn joints(&self) -> &[Landmark; JOINT_COUNT] {
        &self.joints
    }

    /// Planar (x, y) Euclidean distance between two joints.
    pub fn distance(&self, a: HandJoint, b: HandJoint) -> f32 {
        let pa = self.joint(a);
        let pb = self.joint(b);
        let dx = pa.x - pb.x;
        let dy = pa.y - pb.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Planar distance, positive when `a` sits higher in the frame than `b`
    /// (smaller y) and negative otherwise.
    pub fn signed_distance(&self, a: HandJoint, b: HandJoint) -> f32 {
        let dist = self.distance(a, b);
        if self.joint(a).y < self.joint(b).y {
            dist
        } else {
            -dist
        }
    }

    /// Absolute depth difference between two joints.
    pub fn depth_delta(&self, a: HandJoint, b: HandJoint) -> f32 {
        (self.joint(a).z - self.joint(b).z).abs()
    }
}

/// A detected hand as delivered by the tracking provider, before role
/// assignment.  The label is kept raw so malformed values can be dropped
/// at resolution time.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedHand {
    /// Handedness label from the provider ("left" / "right").
    pub label: String,
    pub observation: HandObservation,
}

impl TrackedHand {
    pub fn new(label: impl Into<String>, observation: HandObservation) -> Self {
        Self {
            label: label.into(),
            observation,
        }
    }
}

// ── Test helpers ───────────────────────────────────────────

/// Observation with every joint at the same position.
#[cfg(test)]
pub(crate) fn flat_observation(x: f32, y: f32) -> HandObservation {
    HandObservation::new([Landmark::new(x, y, 0.0); JOINT_COUNT])
}

/// Copy of `obs` with one joint moved.
#[cfg(test)]
pub(crate) fn with_joint(
    obs: &HandObservation,
    joint: HandJoint,
    x: f32,
    y: f32,
    z: f32,
) -> HandObservation {
    let mut joints = *obs.joints();
    joints[joint.index()] = Landmark::new(x, y, z);
    HandObservation::new(joints)
}

// ── Tests ──────────────────────────────────────────────────
