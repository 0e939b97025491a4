//! # Arcade Input Library
//!
//! Input abstraction layer for an arcade hardware emulator.
//!
//! This library converts raw control signals (digital keys, joystick axes,
//! mouse axes) read from a pluggable device backend into normalized logical
//! values consumed by emulated game controls, and implements the interactive
//! protocol used to bind a physical control to a logical one.

pub mod config;
pub mod error;
pub mod backend;
pub mod input;
