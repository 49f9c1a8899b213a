//! Controller state machine — stabilized gestures to pointer, button,
//! scroll and system-setting actions.
//!
//! One dispatcher exists per engine instance and owns all state that must
//! persist between frames: the click-armed flag, whether the primary button
//! is held for a drag, which pinch session is running, the pointer damper
//! and the pinch controller.

use tracing::{debug, info, warn};

use super::pinch::{PinchAnalogController, PinchAxis, PinchCommit, PinchConfig};
use super::pointer::{PointerDamper, ScreenSize};
use crate::hand::{Gesture, HandObservation};
use crate::sink::{InputSink, KeyState, Modifier, MouseButton, SettingSink, SinkError};

// ── Analog actions ─────────────────────────────────────────

/// Continuous adjustment driven by a committed pinch level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogAction {
    Brightness,
    Volume,
    ScrollHorizontal,
    ScrollVertical,
}

impl AnalogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Volume => "volume",
            Self::ScrollHorizontal => "scroll-horizontal",
            Self::ScrollVertical => "scroll-vertical",
        }
    }
}

/// Actions bound to the two pinch axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinchBinding {
    pub horizontal: AnalogAction,
    pub vertical: AnalogAction,
}

impl PinchBinding {
    /// Major-hand pinch: brightness across, volume up/down.
    pub const MAJOR: PinchBinding = PinchBinding {
        horizontal: AnalogAction::Brightness,
        vertical: AnalogAction::Volume,
    };

    /// Minor-hand pinch: scrolling on both axes.
    pub const MINOR: PinchBinding = PinchBinding {
        horizontal: AnalogAction::ScrollHorizontal,
        vertical: AnalogAction::ScrollVertical,
    };

    pub fn action_for(&self, axis: PinchAxis) -> AnalogAction {
        match axis {
            PinchAxis::Horizontal => self.horizontal,
            PinchAxis::Vertical => self.vertical,
        }
    }
}

/// Scaling of committed levels into actions.
#[derive(Debug, Clone)]
pub struct AnalogConfig {
    /// Wheel units per scroll commit.
    pub scroll_step: i32,
    /// Volume change per commit is `level / level_sensitivity`.
    pub level_sensitivity: f32,
    /// Brightness change per commit, in the direction of the level.
    pub brightness_step: f32,
}

impl Default for AnalogConfig {
    fn default() -> Self {
        Self {
            scroll_step: 120,
            level_sensitivity: 50.0,
            brightness_step: 0.1,
        }
    }
}

// ── Mode ───────────────────────────────────────────────────

/// Externally visible controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerMode {
    Idle,
    /// V gesture seen; a click gesture will fire.
    PointerTracking,
    /// Primary button held down.
    Dragging,
    PinchMajorActive,
    PinchMinorActive,
}

impl ControllerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PointerTracking => "pointer-tracking",
            Self::Dragging => "dragging",
            Self::PinchMajorActive => "pinch-major",
            Self::PinchMinorActive => "pinch-minor",
        }
    }
}

// ── Dispatcher ─────────────────────────────────────────────

/// Dispatcher configuration.
#[derive(Debug, Clone, Default)]
pub struct DispatchConfig {
    pub screen: ScreenSize,
    pub pinch: PinchConfig,
    pub analog: AnalogConfig,
}

pub struct ActionDispatcher {
    pub analog: AnalogConfig,
    damper: PointerDamper,
    pinch: PinchAnalogController,
    click_armed: bool,
    dragging: bool,
    pinch_major: bool,
    pinch_minor: bool,
}

impl ActionDispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            analog: config.analog,
            damper: PointerDamper::new(config.screen),
            pinch: PinchAnalogController::new(config.pinch),
            click_armed: false,
            dragging: false,
            pinch_major: false,
            pinch_minor: false,
        }
    }

    /// Handle one frame's governing gesture.
    ///
    /// `hand` is the observation of the hand the gesture came from.  Without
    /// one the frame is treated as rest.
    pub fn handle(
        &mut self,
        gesture: Gesture,
        hand: Option<&HandObservation>,
        input: &mut dyn InputSink,
        settings: &mut dyn SettingSink,
    ) {
        let Some(obs) = hand else {
            self.handle_rest(input);
            return;
        };

        let target = if gesture == Gesture::OpenPalm {
            None
        } else {
            Some(self.damper.target(obs))
        };

        if gesture != Gesture::Fist {
            self.release_drag(input);
        }
        if gesture != Gesture::PinchMajor && self.pinch_major {
            self.end_pinch(Gesture::PinchMajor);
        }
        if gesture != Gesture::PinchMinor && self.pinch_minor {
            self.end_pinch(Gesture::PinchMinor);
        }

        match gesture {
            Gesture::Victory => {
                self.click_armed = true;
                if let Some(pos) = target {
                    self.move_pointer(input, pos);
                }
            }
            Gesture::Fist => {
                if !self.dragging {
                    self.dragging = true;
                    info!("Drag started");
                    input.mouse_down(MouseButton::Primary);
                }
                if let Some(pos) = target {
                    self.move_pointer(input, pos);
                }
            }
            Gesture::Middle if self.click_armed => {
                debug!("Primary click");
                input.click(MouseButton::Primary);
                self.click_armed = false;
            }
            Gesture::Index if self.click_armed => {
                debug!("Secondary click");
                input.click(MouseButton::Secondary);
                self.click_armed = false;
            }
            Gesture::TwoFingerClosed if self.click_armed => {
                debug!("Double click");
                input.double_click();
                self.click_armed = false;
            }
            Gesture::PinchMinor => {
                if !self.pinch_minor {
                    self.pinch.init(obs);
                    self.pinch_minor = true;
                }
                if let Some(commit) = self.pinch.update(obs) {
                    self.apply(PinchBinding::MINOR, commit, input, settings);
                }
            }
            Gesture::PinchMajor => {
                if !self.pinch_major {
                    self.pinch.init(obs);
                    self.pinch_major = true;
                }
                if let Some(commit) = self.pinch.update(obs) {
                    self.apply(PinchBinding::MAJOR, commit, input, settings);
                }
            }
            _ => {}
        }
    }

    /// No hand in this frame: release everything and forget the pointer
    /// anchor so the next detection does not jump.
    pub fn hand_lost(&mut self, input: &mut dyn InputSink) {
        self.handle_rest(input);
        self.click_armed = false;
        self.damper.forget();
    }

    /// Release a held button and end every session.  Called when the
    /// engine stops.  Repeated calls do nothing.
    pub fn release(&mut self, input: &mut dyn InputSink) {
        self.handle_rest(input);
        self.click_armed = false;
    }

    pub fn mode(&self) -> ControllerMode {
        if self.dragging {
            ControllerMode::Dragging
        } else if self.pinch_major {
            ControllerMode::PinchMajorActive
        } else if self.pinch_minor {
            ControllerMode::PinchMinorActive
        } else if self.click_armed {
            ControllerMode::PointerTracking
        } else {
            ControllerMode::Idle
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_click_armed(&self) -> bool {
        self.click_armed
    }

    pub fn cursor(&self) -> Option<(f64, f64)> {
        self.damper.cursor()
    }

    fn handle_rest(&mut self, input: &mut dyn InputSink) {
        self.release_drag(input);
        if self.pinch_major {
            self.end_pinch(Gesture::PinchMajor);
        }
        if self.pinch_minor {
            self.end_pinch(Gesture::PinchMinor);
        }
    }

    fn release_drag(&mut self, input: &mut dyn InputSink) {
        if self.dragging {
            self.dragging = false;
            info!("Drag released");
            input.mouse_up(MouseButton::Primary);
        }
    }

    fn end_pinch(&mut self, which: Gesture) {
        match which {
            Gesture::PinchMajor => self.pinch_major = false,
            Gesture::PinchMinor => self.pinch_minor = false,
            _ => return,
        }
        if !self.pinch_major && !self.pinch_minor {
            self.pinch.clear();
        }
        debug!("Pinch ended: {}", which.as_str());
    }

    fn move_pointer(&mut self, input: &mut dyn InputSink, pos: (f64, f64)) {
        input.move_to(pos.0, pos.1);
        self.damper.settle(pos);
    }

    fn apply(
        &mut self,
        binding: PinchBinding,
        commit: PinchCommit,
        input: &mut dyn InputSink,
        settings: &mut dyn SettingSink,
    ) {
        let action = binding.action_for(commit.axis);
        debug!("Analog {} level {:.1}", action.as_str(), commit.level);
        let step = self.analog.scroll_step;
        match action {
            AnalogAction::ScrollVertical => {
                input.scroll(if commit.level > 0.0 { step } else { -step });
            }
            AnalogAction::ScrollHorizontal => {
                let chord = [Modifier::Shift, Modifier::Ctrl];
                input.modifier_chord(&chord, KeyState::Pressed);
                input.scroll(if commit.level > 0.0 { -step } else { step });
                input.modifier_chord(&chord, KeyState::Released);
            }
            AnalogAction::Volume => {
                let delta = commit.level / self.analog.level_sensitivity;
                if let Err(e) = adjust_volume(settings, delta) {
                    warn!("Volume adjustment skipped: {}", e);
                }
            }
            AnalogAction::Brightness => {
                let delta = if commit.level > 0.0 {
                    self.analog.brightness_step
                } else {
                    -self.analog.brightness_step
                };
                if let Err(e) = adjust_brightness(settings, delta) {
                    warn!("Brightness adjustment skipped: {}", e);
                }
            }
        }
    }
}

fn adjust_volume(settings: &mut dyn SettingSink, delta: f32) -> Result<(), SinkError> {
    let level = (settings.volume()? + delta).clamp(0.0, 1.0);
    settings.set_volume(level)
}

fn adjust_brightness(settings: &mut dyn SettingSink, delta: f32) -> Result<(), SinkError> {
    let level = (settings.brightness()? + delta).clamp(0.0, 1.0);
    settings.set_brightness(level)
}

// ── Tests ──────────────────────────────────────────────────
