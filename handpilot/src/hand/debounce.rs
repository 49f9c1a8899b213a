//! Per-hand gesture stabilization.
//!
//! A raw classification only becomes the stabilized gesture after it has
//! repeated for more than `stabilize_after` consecutive frames.  Until then
//! the previous stabilized gesture is reported.

use tracing::debug;

use super::gesture::Gesture;

/// Default streak length that must be exceeded before a gesture is promoted.
pub const DEFAULT_STABILIZE_AFTER: u32 = 4;

#[derive(Debug, Clone)]
pub struct GestureDebouncer {
    /// Streak length that must be exceeded for promotion.
    pub stabilize_after: u32,
    /// Raw gesture seen on the previous frame.
    previous: Gesture,
    /// Number of consecutive repeats of `previous`.
    streak: u32,
    /// Gesture currently acted upon.
    stable: Gesture,
}

impl Default for GestureDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_STABILIZE_AFTER)
    }
}

impl GestureDebouncer {
    pub fn new(stabilize_after: u32) -> Self {
        Self {
            stabilize_after,
            previous: Gesture::OpenPalm,
            streak: 0,
            stable: Gesture::OpenPalm,
        }
    }

    /// Feed one raw classification and return the stabilized gesture.
    pub fn push(&mut self, raw: Gesture) -> Gesture {
        if raw == self.previous {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.streak = 0;
        }
        self.previous = raw;

        if self.streak > self.stabilize_after && self.stable != raw {
            debug!(
                "Gesture stabilized: {} -> {}",
                self.stable.as_str(),
                raw.as_str()
            );
            self.stable = raw;
        }
        self.stable
    }

    pub fn stable(&self) -> Gesture {
        self.stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(d: &mut GestureDebouncer, seq: &[Gesture]) -> Vec<Gesture> {
        seq.iter().map(|g| d.push(*g)).collect()
    }

    #[test]
    fn test_initial_state_is_open_palm() {
        let d = GestureDebouncer::default();
        assert_eq!(d.stable(), Gesture::OpenPalm);
    }

    #[test]
    fn test_promotes_after_streak() {
        let mut d = GestureDebouncer::default();
        let out = feed(&mut d, &[Gesture::Fist; 6]);
        // First sighting resets the streak; five repeats follow.
        assert_eq!(&out[..5], &[Gesture::OpenPalm; 5]);
        assert_eq!(out[5], Gesture::Fist);
    }

    #[test]
    fn test_single_glitch_never_surfaces() {
        let a = Gesture::Victory;
        let b = Gesture::Fist;
        let mut d = GestureDebouncer::default();
        let out = feed(&mut d, &[a, a, a, a, a, a, a, b, a, a, a, a, a]);
        assert!(out.iter().all(|g| *g != b), "glitch leaked: {:?}", out);
        assert_eq!(d.stable(), a);
    }

    #[test]
    fn test_glitch_restarts_streak() {
        let a = Gesture::Index;
        let b = Gesture::Middle;
        let mut d = GestureDebouncer::default();
        let out = feed(&mut d, &[a, a, a, a, a, b, a, a, a, a, a]);
        assert!(out.iter().all(|g| *g != b));
        // Neither run of `a` is long enough to be promoted.
        assert_eq!(d.stable(), Gesture::OpenPalm);
        assert_eq!(d.push(a), a);
    }

    #[test]
    fn test_custom_threshold() {
        let mut d = GestureDebouncer::new(0);
        assert_eq!(d.push(Gesture::Fist), Gesture::OpenPalm);
        assert_eq!(d.push(Gesture::Fist), Gesture::Fist);
    }
}
