//! Output sinks — input injection and system settings.
//!
//! The engine never talks to the OS directly.  Pointer, button, scroll and
//! modifier actions go to an [`InputSink`]; volume and brightness go to a
//! [`SettingSink`].  Setting access is fallible and treated as best-effort by
//! the caller.

use tracing::info;

// ── Input types ────────────────────────────────────────────

/// Mouse buttons the engine drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Secondary,
}

impl MouseButton {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

/// Keyboard modifiers used in chords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Shift,
    Ctrl,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shift => "shift",
            Self::Ctrl => "ctrl",
        }
    }
}

/// Press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Input-injection primitives.
pub trait InputSink {
    /// Move the pointer to an absolute screen position in pixels.
    fn move_to(&mut self, x: f64, y: f64);
    fn mouse_down(&mut self, button: MouseButton);
    fn mouse_up(&mut self, button: MouseButton);
    fn click(&mut self, button: MouseButton);
    fn double_click(&mut self);
    /// Scroll by `amount` wheel units; positive scrolls up.
    fn scroll(&mut self, amount: i32);
    /// Press or release every modifier of a chord, in order.
    fn modifier_chord(&mut self, modifiers: &[Modifier], state: KeyState);
}

// ── Settings ───────────────────────────────────────────────

/// Failure reported by a [`SettingSink`].
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("{setting} control is unavailable: {reason}")]
    Unavailable {
        setting: &'static str,
        reason: String,
    },

    #[error("{setting} rejected level {level:.2}")]
    Rejected { setting: &'static str, level: f32 },
}

/// Reject a level outside [0, 1].
pub fn check_level(setting: &'static str, level: f32) -> Result<f32, SinkError> {
    if (0.0..=1.0).contains(&level) {
        Ok(level)
    } else {
        Err(SinkError::Rejected { setting, level })
    }
}

/// System brightness and volume, both normalized to [0, 1].
pub trait SettingSink {
    fn brightness(&mut self) -> Result<f32, SinkError>;
    fn set_brightness(&mut self, level: f32) -> Result<(), SinkError>;
    fn volume(&mut self) -> Result<f32, SinkError>;
    fn set_volume(&mut self, level: f32) -> Result<(), SinkError>;
}

// ── Tracing sink ───────────────────────────────────────────

/// Sink that logs every action and simulates volume and brightness in
/// memory.  Used by the replay host in place of a real OS backend.
#[derive(Debug, Clone)]
pub struct TraceSink {
    pub volume: f32,
    pub brightness: f32,
    pub position: (f64, f64),
    pub moves: u64,
    pub clicks: u64,
    pub drags: u64,
    pub scrolls: u64,
}

impl Default for TraceSink {
    fn default() -> Self {
        Self {
            volume: 0.5,
            brightness: 0.5,
            position: (0.0, 0.0),
            moves: 0,
            clicks: 0,
            drags: 0,
            scrolls: 0,
        }
    }
}

impl TraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Injected input counters for the end-of-run log.
    pub fn summary_sexp(&self) -> String {
        format!(
            "(:moves {} :clicks {} :drags {} :scrolls {} :position ({:.0} {:.0}))",
            self.moves,
            self.clicks,
            self.drags,
            self.scrolls,
            self.position.0,
            self.position.1,
        )
    }

    pub fn settings_sexp(&self) -> String {
        format!(
            "(:volume {:.2} :brightness {:.2})",
            self.volume, self.brightness
        )
    }
}

impl InputSink for TraceSink {
    fn move_to(&mut self, x: f64, y: f64) {
        self.position = (x, y);
        self.moves += 1;
        tracing::trace!("move-to ({:.0}, {:.0})", x, y);
    }

    fn mouse_down(&mut self, button: MouseButton) {
        self.drags += 1;
        info!("mouse-down {}", button.as_str());
    }

    fn mouse_up(&mut self, button: MouseButton) {
        info!("mouse-up {}", button.as_str());
    }

    fn click(&mut self, button: MouseButton) {
        self.clicks += 1;
        info!("click {}", button.as_str());
    }

    fn double_click(&mut self) {
        self.clicks += 2;
        info!("double-click");
    }

    fn scroll(&mut self, amount: i32) {
        self.scrolls += 1;
        info!("scroll {}", amount);
    }

    fn modifier_chord(&mut self, modifiers: &[Modifier], state: KeyState) {
        let names: Vec<&str> = modifiers.iter().map(|m| m.as_str()).collect();
        info!("modifier chord {:?} {}", state, names.join("+"));
    }
}

impl SettingSink for TraceSink {
    fn brightness(&mut self) -> Result<f32, SinkError> {
        Ok(self.brightness)
    }

    fn set_brightness(&mut self, level: f32) -> Result<(), SinkError> {
        self.brightness = check_level("brightness", level)?;
        info!("brightness -> {:.2}", level);
        Ok(())
    }

    fn volume(&mut self) -> Result<f32, SinkError> {
        Ok(self.volume)
    }

    fn set_volume(&mut self, level: f32) -> Result<(), SinkError> {
        self.volume = check_level("volume", level)?;
        info!("volume -> {:.2}", level);
        Ok(())
    }
}

// ── Test sinks ─────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// One recorded input action.
    #[derive(Debug, Clone, PartialEq)]
    pub enum InputAction {
        MoveTo(f64, f64),
        MouseDown(MouseButton),
        MouseUp(MouseButton),
        Click(MouseButton),
        DoubleClick,
        Scroll(i32),
        Chord(Vec<Modifier>, KeyState),
    }

    /// Input sink that records every call.
    #[derive(Debug, Default)]
    pub struct RecordingInput {
        pub actions: Vec<InputAction>,
    }

    impl RecordingInput {
        pub fn count(&self, pred: impl Fn(&InputAction) -> bool) -> usize {
            self.actions.iter().filter(|a| pred(a)).count()
        }

        pub fn moves(&self) -> usize {
            self.count(|a| matches!(a, InputAction::MoveTo(..)))
        }

        pub fn downs(&self) -> usize {
            self.count(|a| matches!(a, InputAction::MouseDown(_)))
        }

        pub fn ups(&self) -> usize {
            self.count(|a| matches!(a, InputAction::MouseUp(_)))
        }

        pub fn clicks(&self) -> usize {
            self.count(|a| matches!(a, InputAction::Click(_) | InputAction::DoubleClick))
        }

        pub fn scrolls(&self) -> Vec<i32> {
            self.actions
                .iter()
                .filter_map(|a| match a {
                    InputAction::Scroll(n) => Some(*n),
                    _ => None,
                })
                .collect()
        }
    }

    impl InputSink for RecordingInput {
        fn move_to(&mut self, x: f64, y: f64) {
            self.actions.push(InputAction::MoveTo(x, y));
        }
        fn mouse_down(&mut self, button: MouseButton) {
            self.actions.push(InputAction::MouseDown(button));
        }
        fn mouse_up(&mut self, button: MouseButton) {
            self.actions.push(InputAction::MouseUp(button));
        }
        fn click(&mut self, button: MouseButton) {
            self.actions.push(InputAction::Click(button));
        }
        fn double_click(&mut self) {
            self.actions.push(InputAction::DoubleClick);
        }
        fn scroll(&mut self, amount: i32) {
            self.actions.push(InputAction::Scroll(amount));
        }
        fn modifier_chord(&mut self, modifiers: &[Modifier], state: KeyState) {
            self.actions.push(InputAction::Chord(modifiers.to_vec(), state));
        }
    }

    /// Setting sink holding levels in memory; `None` makes that setting fail.
    #[derive(Debug)]
    pub struct FakeSettings {
        pub volume: Option<f32>,
        pub brightness: Option<f32>,
        pub writes: usize,
    }

    impl Default for FakeSettings {
        fn default() -> Self {
            Self {
                volume: Some(0.5),
                brightness: Some(0.5),
                writes: 0,
            }
        }
    }

    fn unavailable(setting: &'static str) -> SinkError {
        SinkError::Unavailable {
            setting,
            reason: "no device".to_string(),
        }
    }

    impl SettingSink for FakeSettings {
        fn brightness(&mut self) -> Result<f32, SinkError> {
            self.brightness.ok_or_else(|| unavailable("brightness"))
        }
        fn set_brightness(&mut self, level: f32) -> Result<(), SinkError> {
            let slot = self
                .brightness
                .as_mut()
                .ok_or_else(|| unavailable("brightness"))?;
            *slot = check_level("brightness", level)?;
            self.writes += 1;
            Ok(())
        }
        fn volume(&mut self) -> Result<f32, SinkError> {
            self.volume.ok_or_else(|| unavailable("volume"))
        }
        fn set_volume(&mut self, level: f32) -> Result<(), SinkError> {
            let slot = self.volume.as_mut().ok_or_else(|| unavailable("volume"))?;
            *slot = check_level("volume", level)?;
            self.writes += 1;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_sink_counts() {
        let mut s = TraceSink::new();
        s.move_to(10.0, 20.0);
        s.click(MouseButton::Primary);
        s.double_click();
        s.mouse_down(MouseButton::Primary);
        s.mouse_up(MouseButton::Primary);
        s.scroll(120);
        assert_eq!(s.moves, 1);
        assert_eq!(s.clicks, 3);
        assert_eq!(s.drags, 1);
        assert_eq!(s.scrolls, 1);
        assert_eq!(s.position, (10.0, 20.0));
        assert_eq!(
            s.summary_sexp(),
            "(:moves 1 :clicks 3 :drags 1 :scrolls 1 :position (10 20))"
        );
    }

    #[test]
    fn test_trace_sink_settings() {
        let mut s = TraceSink::new();
        s.set_volume(0.8).unwrap();
        s.set_brightness(0.1).unwrap();
        assert!((s.volume().unwrap() - 0.8).abs() < f32::EPSILON);
        assert!((s.brightness().unwrap() - 0.1).abs() < f32::EPSILON);
        let sexp = s.settings_sexp();
        assert!(sexp.contains(":volume 0.80"));
        assert!(sexp.contains(":brightness 0.10"));
    }

    #[test]
    fn test_out_of_range_level_rejected() {
        let mut s = TraceSink::new();
        s.set_volume(0.3).unwrap();
        for level in [1.5, -0.1, f32::NAN] {
            let err = s.set_volume(level).unwrap_err();
            assert!(
                matches!(err, SinkError::Rejected { setting: "volume", .. }),
                "{}",
                err
            );
        }
        assert!((s.volume - 0.3).abs() < f32::EPSILON);

        let err = s.set_brightness(2.0).unwrap_err();
        assert_eq!(err.to_string(), "brightness rejected level 2.00");
        assert!(check_level("brightness", 1.0).is_ok());
        assert!(check_level("brightness", 0.0).is_ok());
    }

    #[test]
    fn test_sink_error_display() {
        let e = SinkError::Unavailable {
            setting: "volume",
            reason: "no audio endpoint".to_string(),
        };
        assert_eq!(e.to_string(), "volume control is unavailable: no audio endpoint");
        let e = SinkError::Rejected {
            setting: "brightness",
            level: 0.5,
        };
        assert_eq!(e.to_string(), "brightness rejected level 0.50");
    }
}
