//! Gesture engine — the per-frame entry point.
//!
//! Owns the two hand recognizers, the controller state and the output sinks.
//! Each engine is a fresh, independent instance; nothing is shared between
//! engines except what the caller passes in.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::control::{ActionDispatcher, ControllerMode, DispatchConfig};
use crate::hand::{
    FingerStateEncoder, Gesture, GestureClassifier, GestureDebouncer, HandRecognizer, HandRole,
    HandRoleResolver, TrackedHand,
};
use crate::sink::{InputSink, SettingSink};

/// Cloneable stop signal that can be raised from another thread.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct GestureEngine<I: InputSink, S: SettingSink> {
    resolver: HandRoleResolver,
    major: HandRecognizer,
    minor: HandRecognizer,
    dispatcher: ActionDispatcher,
    input: I,
    settings: S,
    stop: StopHandle,
    frames: u64,
    hands_visible: bool,
}

impl<I: InputSink, S: SettingSink> GestureEngine<I, S> {
    pub fn new(config: EngineConfig, input: I, settings: S) -> Self {
        let recognizer = |role| {
            HandRecognizer::new(
                role,
                FingerStateEncoder::new(config.fingers.clone()),
                GestureClassifier::new(config.classifier.clone()),
                GestureDebouncer::new(config.stabilize_after),
            )
        };
        let major = recognizer(HandRole::Major);
        let minor = recognizer(HandRole::Minor);

        info!(
            "Gesture engine created (dominant: {}, screen: {}x{})",
            config.dominant.as_str(),
            config.screen.width,
            config.screen.height
        );

        Self {
            resolver: HandRoleResolver::new(config.dominant),
            major,
            minor,
            dispatcher: ActionDispatcher::new(DispatchConfig {
                screen: config.screen,
                pinch: config.pinch,
                analog: config.analog,
            }),
            input,
            settings,
            stop: StopHandle::default(),
            frames: 0,
            hands_visible: false,
        }
    }

    /// Process one frame of hand observations.
    ///
    /// The minor hand's pinch takes priority; otherwise the major hand's
    /// stabilized gesture drives the controller.  Once stopped, the frame is
    /// ignored and any held button is released.
    pub fn process(&mut self, hands: &[TrackedHand]) {
        if self.stop.is_stopped() {
            self.dispatcher.release(&mut self.input);
            return;
        }
        self.frames += 1;

        let roles = self.resolver.resolve(hands);
        if roles.is_empty() {
            if self.hands_visible {
                debug!("No hands in frame {}, resetting controller", self.frames);
                self.hands_visible = false;
            }
            self.major.observe(None);
            self.minor.observe(None);
            self.dispatcher.hand_lost(&mut self.input);
            return;
        }
        self.hands_visible = true;

        self.major.observe(roles.major);
        self.minor.observe(roles.minor);

        if self.minor.recognize() == Some(Gesture::PinchMinor) {
            self.dispatcher.handle(
                Gesture::PinchMinor,
                self.minor.observation(),
                &mut self.input,
                &mut self.settings,
            );
            return;
        }

        let gesture = self.major.recognize().unwrap_or(Gesture::OpenPalm);
        self.dispatcher.handle(
            gesture,
            self.major.observation(),
            &mut self.input,
            &mut self.settings,
        );
    }

    /// Request the engine to stop processing frames.
    pub fn stop(&self) {
        if !self.stop.is_stopped() {
            info!("Gesture engine stop requested");
        }
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    pub fn current_mode(&self) -> ControllerMode {
        self.dispatcher.mode()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Stop and release any held button without waiting for another frame.
    pub fn shutdown(&mut self) {
        self.stop.stop();
        self.dispatcher.release(&mut self.input);
        info!("Gesture engine shut down after {} frames", self.frames);
    }

    pub fn status_sexp(&self) -> String {
        format!(
            "(:mode {} :major (:gesture {} :present {}) :minor (:gesture {} :present {}) \
             :frames {} :stopped {})",
            self.current_mode().as_str(),
            self.major.stabilized().as_str(),
            if self.major.observation().is_some() { "t" } else { "nil" },
            self.minor.stabilized().as_str(),
            if self.minor.observation().is_some() { "t" } else { "nil" },
            self.frames,
            if self.is_stopped() { "t" } else { "nil" },
        )
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }
}
