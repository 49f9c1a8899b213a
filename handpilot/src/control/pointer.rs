//! Pointer damping — hand position to a stable cursor target.
//!
//! Movement between frames is scaled by a factor that depends on how far the
//! hand moved: tremor below 5px is dropped, 5-30px is scaled proportionally,
//! and anything faster passes through amplified.

use crate::hand::{HandJoint, HandObservation};

/// Joint used as the palm-center reference.
pub const POINTER_JOINT: HandJoint = HandJoint::MiddleMcp;

/// Squared pixel distance at or below which motion is treated as jitter.
const JITTER_DIST_SQ: f64 = 25.0;
/// Squared pixel distance at or below which motion is scaled proportionally.
const PROPORTIONAL_DIST_SQ: f64 = 900.0;
const PROPORTIONAL_GAIN: f64 = 0.07;
const FAST_GAIN: f64 = 2.1;

/// Screen resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl ScreenSize {
    /// Parse a "WxH" resolution string.
    pub fn parse(s: &str) -> Option<Self> {
        let (w, h) = s.split_once('x')?;
        let width = w.trim().parse::<u32>().ok()?;
        let height = h.trim().parse::<u32>().ok()?;
        if width > 0 && height > 0 {
            Some(Self { width, height })
        } else {
            None
        }
    }
}

/// Damping factor for a squared pixel delta.
pub fn damping_factor(dist_sq: f64) -> f64 {
    if dist_sq <= JITTER_DIST_SQ {
        0.0
    } else if dist_sq <= PROPORTIONAL_DIST_SQ {
        PROPORTIONAL_GAIN * dist_sq.sqrt()
    } else {
        FAST_GAIN
    }
}

#[derive(Debug, Clone)]
pub struct PointerDamper {
    pub screen: ScreenSize,
    /// Raw (undamped) pixel position of the reference joint last frame.
    prev_raw: Option<(i32, i32)>,
    /// Last position actually sent to the pointer.
    cursor: Option<(f64, f64)>,
}

impl PointerDamper {
    pub fn new(screen: ScreenSize) -> Self {
        Self {
            screen,
            prev_raw: None,
            cursor: None,
        }
    }

    /// Raw pixel position of the reference joint.
    pub fn raw_position(&self, obs: &HandObservation) -> (i32, i32) {
        let j = obs.joint(POINTER_JOINT);
        (
            (j.x as f64 * self.screen.width as f64) as i32,
            (j.y as f64 * self.screen.height as f64) as i32,
        )
    }

    /// Compute the damped target for this frame and remember the raw
    /// position.  The first frame after [`forget`](Self::forget) anchors
    /// without moving.
    pub fn target(&mut self, obs: &HandObservation) -> (f64, f64) {
        let (x, y) = self.raw_position(obs);
        let (px, py) = self.prev_raw.unwrap_or((x, y));
        self.prev_raw = Some((x, y));

        let dx = (x - px) as f64;
        let dy = (y - py) as f64;
        let factor = damping_factor(dx * dx + dy * dy);

        let (cx, cy) = self.cursor.unwrap_or((x as f64, y as f64));
        (cx + dx * factor, cy + dy * factor)
    }

    /// Record a position the pointer was actually moved to.
    pub fn settle(&mut self, pos: (f64, f64)) {
        self.cursor = Some(pos);
    }

    /// Drop the raw-position memory so tracking re-anchors on the next frame.
    pub fn forget(&mut self) {
        self.prev_raw = None;
    }

    pub fn cursor(&self) -> Option<(f64, f64)> {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::landmarks::flat_observation;

    fn damper() -> PointerDamper {
        PointerDamper::new(ScreenSize {
            width: 1000,
            height: 1000,
        })
    }

    #[test]
    fn test_damping_regimes() {
        assert_eq!(damping_factor(0.0), 0.0);
        assert_eq!(damping_factor(25.0), 0.0);
        assert!((damping_factor(100.0) - 0.7).abs() < 1e-9);
        assert!((damping_factor(900.0) - 2.1).abs() < 1e-9);
        assert_eq!(damping_factor(901.0), 2.1);
        assert_eq!(damping_factor(1e6), 2.1);
    }

    #[test]
    fn test_damped_motion_monotonic_and_continuous() {
        // Damped displacement |d| * factor(|d|^2) never decreases with |d|.
        let mut prev = 0.0;
        for tenth in 0..600 {
            let d = tenth as f64 / 10.0;
            let moved = d * damping_factor(d * d);
            assert!(moved >= prev - 1e-9, "decrease at d={}: {} < {}", d, moved, prev);
            assert!(moved >= 0.0);
            prev = moved;
        }
        // Both sides of the 30px boundary agree.
        let below = 30.0 * damping_factor(900.0);
        let above = 30.0 * damping_factor(900.0001);
        assert!((below - above).abs() < 1e-6);
    }

    #[test]
    fn test_first_frame_anchors() {
        let mut d = damper();
        let t = d.target(&flat_observation(0.5, 0.25));
        assert_eq!(t, (500.0, 250.0));
    }

    #[test]
    fn test_jitter_suppressed() {
        let mut d = damper();
        let start = d.target(&flat_observation(0.5, 0.5));
        d.settle(start);
        // 3px move: inside the jitter band.
        let t = d.target(&flat_observation(0.503, 0.5));
        assert_eq!(t, start);
    }

    #[test]
    fn test_proportional_band() {
        let mut d = damper();
        d.settle((500.0, 500.0));
        d.target(&flat_observation(0.5, 0.5));
        // 10px right: factor 0.7, 7px of movement.
        let t = d.target(&flat_observation(0.5101, 0.5));
        assert!((t.0 - 507.0).abs() < 1e-6, "got {:?}", t);
        assert!((t.1 - 500.0).abs() < 1e-6);
    }

    #[test]
    fn test_fast_band_amplifies() {
        let mut d = damper();
        d.settle((100.0, 100.0));
        d.target(&flat_observation(0.5, 0.5));
        // 100px down: factor 2.1.
        let t = d.target(&flat_observation(0.5, 0.6));
        assert!((t.0 - 100.0).abs() < 1e-6);
        assert!((t.1 - 310.0).abs() < 1e-6, "got {:?}", t);
    }

    #[test]
    fn test_forget_reanchors() {
        let mut d = damper();
        d.settle((500.0, 500.0));
        d.target(&flat_observation(0.1, 0.1));
        d.forget();
        // Large jump after a gap does not move the cursor.
        let t = d.target(&flat_observation(0.9, 0.9));
        assert_eq!(t, (500.0, 500.0));
    }

    #[test]
    fn test_parse_screen() {
        assert_eq!(
            ScreenSize::parse("2560x1440"),
            Some(ScreenSize {
                width: 2560,
                height: 1440
            })
        );
        assert_eq!(ScreenSize::parse("0x100"), None);
        assert_eq!(ScreenSize::parse("wide"), None);
        assert_eq!(ScreenSize::parse("10x"), None);
    }
}
