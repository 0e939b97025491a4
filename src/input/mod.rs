//! # Input Module
//!
//! The mapping engine, control registry and control-learning protocol.

pub mod code;
pub mod engine;
pub mod finder;
pub mod registry;

pub use code::{AxisDirection, ControlCode};
pub use engine::InputEngine;
pub use finder::{ControlFinder, FindPhase};
pub use registry::{GameInput, InputKind, InputRegistry, MacroInput, OutputCell, Representation};
