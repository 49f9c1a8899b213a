//! Handpilot - hand-gesture classification and analog control engine
//!
//! Turns per-frame hand skeletons into pointer, click, drag, scroll, volume
//! and brightness actions.

pub mod config;
pub mod control;
pub mod engine;
pub mod hand;
pub mod replay;
pub mod sexp;
pub mod sink;

pub use config::{ConfigError, EngineConfig};
pub use engine::{GestureEngine, StopHandle};
