//! Floater-level physics: environment lookups, gas thermodynamics,
//! the floater lifecycle state machine, injection pulses, and the
//! nanobubble column.

pub mod environment;
pub mod floater;
pub mod gas;
pub mod injection;
pub mod nanobubble;
