//! Engine configuration and its s-expression plist loader.
//!
//! Every field has a default; a config file only needs the keys it
//! overrides:
//!
//! ```text
//! (:dominant-hand left :screen-width 2560 :screen-height 1440
//!  :pinch-threshold 0.25)
//! ```

use std::path::Path;

use lexpr::Value;
use tracing::debug;

use crate::control::{AnalogConfig, PinchConfig, ScreenSize};
use crate::hand::debounce::DEFAULT_STABILIZE_AFTER;
use crate::hand::{ClassifierConfig, FingerConfig, Handedness};
use crate::sexp::{get_float, get_int, get_keyword, list_items};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(String),

    #[error("invalid value for :{key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Full engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub dominant: Handedness,
    pub screen: ScreenSize,
    pub fingers: FingerConfig,
    pub classifier: ClassifierConfig,
    /// Consecutive repeats a raw gesture must exceed to become stable.
    pub stabilize_after: u32,
    pub pinch: PinchConfig,
    pub analog: AnalogConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dominant: Handedness::Right,
            screen: ScreenSize::default(),
            fingers: FingerConfig::default(),
            classifier: ClassifierConfig::default(),
            stabilize_after: DEFAULT_STABILIZE_AFTER,
            pinch: PinchConfig::default(),
            analog: AnalogConfig::default(),
        }
    }
}

const KNOWN_KEYS: &[&str] = &[
    "dominant-hand",
    "screen-width",
    "screen-height",
    "open-ratio",
    "zero-divisor",
    "pinch-distance",
    "victory-spread-ratio",
    "closed-depth",
    "stabilize-after",
    "pinch-threshold",
    "pinch-hold-frames",
    "level-scale",
    "scroll-step",
    "level-sensitivity",
    "brightness-step",
];

impl EngineConfig {
    /// Load overrides from a plist file on top of the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_sexp(&raw)
    }

    /// Parse a plist, overriding only the keys present.
    pub fn from_sexp(raw: &str) -> Result<Self, ConfigError> {
        let value = lexpr::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if !matches!(value, Value::Cons(_) | Value::Null | Value::Nil) {
            return Err(ConfigError::Parse("expected a plist".to_string()));
        }

        for key in plist_keys(&value) {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                debug!("Ignoring unknown config key :{}", key);
            }
        }

        let mut config = Self::default();

        if let Some(s) = get_keyword(&value, "dominant-hand") {
            config.dominant = Handedness::parse(&s).ok_or(ConfigError::InvalidValue {
                key: "dominant-hand",
                value: s,
            })?;
        }
        if let Some(w) = positive_int(&value, "screen-width")? {
            config.screen.width = w;
        }
        if let Some(h) = positive_int(&value, "screen-height")? {
            config.screen.height = h;
        }

        if let Some(v) = positive_float(&value, "open-ratio")? {
            config.fingers.open_ratio = v;
        }
        if let Some(v) = positive_float(&value, "zero-divisor")? {
            config.fingers.zero_divisor = v;
            config.classifier.zero_divisor = v;
        }
        if let Some(v) = positive_float(&value, "pinch-distance")? {
            config.classifier.pinch_distance = v;
        }
        if let Some(v) = positive_float(&value, "victory-spread-ratio")? {
            config.classifier.victory_spread_ratio = v;
        }
        if let Some(v) = positive_float(&value, "closed-depth")? {
            config.classifier.closed_depth = v;
        }

        if let Some(s) = get_keyword(&value, "stabilize-after") {
            config.stabilize_after = s.parse().map_err(|_| ConfigError::InvalidValue {
                key: "stabilize-after",
                value: s,
            })?;
        }

        if let Some(v) = positive_float(&value, "pinch-threshold")? {
            config.pinch.threshold = v;
        }
        if let Some(v) = positive_int(&value, "pinch-hold-frames")? {
            config.pinch.hold_frames = v;
        }
        if let Some(v) = positive_float(&value, "level-scale")? {
            config.pinch.level_scale = v;
        }

        if let Some(v) = positive_int(&value, "scroll-step")? {
            config.analog.scroll_step = i32::try_from(v).map_err(|_| ConfigError::InvalidValue {
                key: "scroll-step",
                value: v.to_string(),
            })?;
        }
        if let Some(v) = positive_float(&value, "level-sensitivity")? {
            config.analog.level_sensitivity = v;
        }
        if let Some(v) = positive_float(&value, "brightness-step")? {
            if v > 1.0 {
                return Err(ConfigError::InvalidValue {
                    key: "brightness-step",
                    value: v.to_string(),
                });
            }
            config.analog.brightness_step = v;
        }

        Ok(config)
    }

    /// Render the effective configuration as a plist.
    pub fn config_sexp(&self) -> String {
        format!(
            "(:dominant-hand {} :screen-width {} :screen-height {} \
             :open-ratio {} :zero-divisor {} :pinch-distance {} \
             :victory-spread-ratio {} :closed-depth {} :stabilize-after {} \
             :pinch-threshold {} :pinch-hold-frames {} :level-scale {} \
             :scroll-step {} :level-sensitivity {} :brightness-step {})",
            self.dominant.as_str(),
            self.screen.width,
            self.screen.height,
            self.fingers.open_ratio,
            self.fingers.zero_divisor,
            self.classifier.pinch_distance,
            self.classifier.victory_spread_ratio,
            self.classifier.closed_depth,
            self.stabilize_after,
            self.pinch.threshold,
            self.pinch.hold_frames,
            self.pinch.level_scale,
            self.analog.scroll_step,
            self.analog.level_sensitivity,
            self.analog.brightness_step,
        )
    }
}

/// Key names of a plist, without the leading colon.
fn plist_keys(value: &Value) -> Vec<String> {
    list_items(value)
        .into_iter()
        .step_by(2)
        .filter_map(|k| match k {
            Value::Keyword(k) => Some(k.to_string()),
            Value::Symbol(s) => s.strip_prefix(':').map(str::to_string),
            _ => None,
        })
        .collect()
}

fn positive_float(value: &Value, key: &'static str) -> Result<Option<f32>, ConfigError> {
    let Some(raw) = get_keyword(value, key) else {
        return Ok(None);
    };
    match get_float(value, key) {
        Some(v) if v.is_finite() && v > 0.0 => Ok(Some(v as f32)),
        _ => Err(ConfigError::InvalidValue { key, value: raw }),
    }
}

fn positive_int(value: &Value, key: &'static str) -> Result<Option<u32>, ConfigError> {
    let Some(raw) = get_keyword(value, key) else {
        return Ok(None);
    };
    match get_int(value, key).and_then(|v| u32::try_from(v).ok()) {
        Some(v) if v > 0 => Ok(Some(v)),
        _ => Err(ConfigError::InvalidValue { key, value: raw }),
    }
}
