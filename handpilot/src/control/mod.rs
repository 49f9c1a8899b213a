//! Control subsystem — stabilized gestures to OS actions.
//!
//! Provides:
//! - `pointer`: damped hand-to-cursor mapping
//! - `pinch`: hold-and-commit analog levels along one axis
//! - `dispatcher`: the controller state machine driving the sinks

pub mod dispatcher;
pub mod pinch;
pub mod pointer;

pub use dispatcher::{
    ActionDispatcher, AnalogAction, AnalogConfig, ControllerMode, DispatchConfig, PinchBinding,
};
pub use pinch::{PinchAnalogController, PinchAxis, PinchCommit, PinchConfig};
pub use pointer::{PointerDamper, ScreenSize};
