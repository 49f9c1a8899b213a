//! Per-role hand recognizer: observation in, stabilized gesture out.

use super::debounce::GestureDebouncer;
use super::fingers::{FingerMask, FingerStateEncoder};
use super::gesture::{Gesture, GestureClassifier};
use super::landmarks::{HandObservation, HandRole};

/// Recognition state for one hand role.
///
/// Updating is split in two steps so a caller can refresh the observation and
/// finger mask of both hands every frame while only advancing the debouncer
/// of the hand whose gesture it actually consults.
#[derive(Debug, Clone)]
pub struct HandRecognizer {
    role: HandRole,
    encoder: FingerStateEncoder,
    classifier: GestureClassifier,
    debouncer: GestureDebouncer,
    /// Latest observation; `None` when the hand was not seen this frame.
    observation: Option<HandObservation>,
    /// Finger mask of the last observation that was present.
    mask: FingerMask,
}

impl HandRecognizer {
    pub fn new(
        role: HandRole,
        encoder: FingerStateEncoder,
        classifier: GestureClassifier,
        debouncer: GestureDebouncer,
    ) -> Self {
        Self {
            role,
            encoder,
            classifier,
            debouncer,
            observation: None,
            mask: FingerMask::default(),
        }
    }

    /// Replace the observation for this frame and recompute the finger mask.
    /// An absent observation leaves the mask untouched.
    pub fn observe(&mut self, observation: Option<HandObservation>) {
        if let Some(obs) = &observation {
            self.mask = self.encoder.encode(obs);
        }
        self.observation = observation;
    }

    /// Classify the current observation and advance the debouncer.
    ///
    /// Returns `None` without touching any state when the hand is absent.
    pub fn recognize(&mut self) -> Option<Gesture> {
        let obs = self.observation.as_ref()?;
        let raw = self.classifier.classify(self.mask, obs, self.role);
        Some(self.debouncer.push(raw))
    }

    pub fn observation(&self) -> Option<&HandObservation> {
        self.observation.as_ref()
    }

    pub fn mask(&self) -> FingerMask {
        self.mask
    }

    /// Stabilized gesture, which persists while the hand is absent.
    pub fn stabilized(&self) -> Gesture {
        self.debouncer.stable()
    }
}
