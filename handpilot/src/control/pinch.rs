//! Pinch analog control — hold-and-commit adjustment along one locked axis.
//!
//! While a pinch is held the index fingertip's displacement from where the
//! pinch started is turned into a level on each axis.  The dominant axis
//! beyond the dead zone is locked, and its level has to hold steady for a
//! number of frames before it is committed and reported.

use tracing::debug;

use crate::hand::fingers::round_tenths;
use crate::hand::{HandJoint, HandObservation};

/// Fingertip tracked during a pinch.
pub const PINCH_JOINT: HandJoint = HandJoint::IndexTip;

/// Axis of an analog adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinchAxis {
    Horizontal,
    Vertical,
}

impl PinchAxis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// A committed level on a locked axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchCommit {
    pub axis: PinchAxis,
    /// Signed level; positive is right or up.
    pub level: f32,
}

/// Pinch thresholds.
#[derive(Debug, Clone)]
pub struct PinchConfig {
    /// Dead zone on the level and the allowed wobble while holding.
    pub threshold: f32,
    /// Frames a level must hold before it is committed.
    pub hold_frames: u32,
    /// Normalized displacement to level multiplier.
    pub level_scale: f32,
}

impl Default for PinchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            hold_frames: 5,
            level_scale: 10.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PinchAnalogController {
    pub config: PinchConfig,
    /// Fingertip position when the pinch started.
    start: Option<(f32, f32)>,
    /// Last committed level.
    committed: f32,
    /// Level currently being held.
    pending: f32,
    /// Frames the pending level has held.
    hold: u32,
    /// Axis locked by the most recent out-of-dead-zone frame.
    axis: Option<PinchAxis>,
}

impl PinchAnalogController {
    pub fn new(config: PinchConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Start a pinch session at the current fingertip position.
    pub fn init(&mut self, obs: &HandObservation) {
        let tip = obs.joint(PINCH_JOINT);
        self.start = Some((tip.x, tip.y));
        self.committed = 0.0;
        self.pending = 0.0;
        self.hold = 0;
        self.axis = None;
        debug!(
            "Pinch session started: {} at ({:.3}, {:.3})",
            PINCH_JOINT.as_str(),
            tip.x,
            tip.y
        );
    }

    /// Horizontal and vertical levels relative to the pinch start.  Vertical
    /// is inverted so moving up is positive.
    pub fn levels(&self, obs: &HandObservation) -> Option<(f32, f32)> {
        let (sx, sy) = self.start?;
        let tip = obs.joint(PINCH_JOINT);
        let scale = self.config.level_scale;
        Some((
            round_tenths((tip.x - sx) * scale),
            round_tenths((sy - tip.y) * scale),
        ))
    }

    /// Advance one frame of a held pinch.  Returns a commit on the frame the
    /// hold counter reaches `hold_frames`.
    pub fn update(&mut self, obs: &HandObservation) -> Option<PinchCommit> {
        debug_assert!(self.start.is_some(), "pinch update before init");
        let (level_x, level_y) = self.levels(obs)?;
        let threshold = self.config.threshold;

        let tentative = if level_y.abs() > level_x.abs() && level_y.abs() > threshold {
            Some((PinchAxis::Vertical, level_y))
        } else if level_x.abs() > threshold {
            Some((PinchAxis::Horizontal, level_x))
        } else {
            None
        };

        let (axis, level) = tentative?;
        self.axis = Some(axis);
        if (self.pending - level).abs() < threshold {
            self.hold += 1;
        } else {
            self.pending = level;
            self.hold = 0;
        }

        if self.hold != self.config.hold_frames {
            return None;
        }

        self.committed = self.pending;
        self.hold = 0;
        debug!(
            "Pinch commit: {} level {:.1}",
            axis.as_str(),
            self.committed
        );
        Some(PinchCommit {
            axis,
            level: self.committed,
        })
    }

    pub fn committed_level(&self) -> f32 {
        self.committed
    }

    pub fn axis(&self) -> Option<PinchAxis> {
        self.axis
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// End the session.
    pub fn clear(&mut self) {
        self.start = None;
        self.hold = 0;
        self.axis = None;
    }
}
