//! Hand subsystem — landmark model and gesture recognition.
//!
//! Provides:
//! - `landmarks`: 21-joint observation model, handedness and roles
//! - `fingers`: open/closed finger bitmask encoder
//! - `gesture`: gesture classification with geometric disambiguation
//! - `debounce`: frame-count hysteresis on classified gestures
//! - `recognizer`: per-role pipeline of the three above
//! - `roles`: major/minor assignment from provider labels

pub mod debounce;
pub mod fingers;
pub mod gesture;
pub mod landmarks;
pub mod recognizer;
pub mod roles;

pub use debounce::GestureDebouncer;
pub use fingers::{FingerConfig, FingerMask, FingerStateEncoder};
pub use gesture::{ClassifierConfig, Gesture, GestureClassifier};
pub use landmarks::{
    HandJoint, HandObservation, HandRole, Handedness, Landmark, TrackedHand, JOINT_COUNT,
};
pub use recognizer::HandRecognizer;
pub use roles::{HandRoleResolver, RoleAssignment};
