//! # Null Backend
//!
//! A driver that reports every control at rest. Used for headless runs and
//! as the default when no platform driver is configured.

use super::InputBackend;
use crate::error::Result;
use crate::input::code::ControlCode;

/// Backend with no devices: switches are never active, axes read zero and
/// no control is ever found.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl NullBackend {
    /// Creates a new null backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl InputBackend for NullBackend {
    fn name(&self) -> &'static str {
        "null"
    }

    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn exit(&mut self) -> Result<()> {
        Ok(())
    }

    fn new_frame(&mut self) {}

    fn read_switch(&mut self, _code: ControlCode) -> bool {
        false
    }

    fn read_joy_axis(&mut self, _joy: u8, _axis: u8) -> i32 {
        0
    }

    fn read_mouse_axis(&mut self, _mouse: u8, _axis: u8) -> i32 {
        0
    }

    fn find(&mut self, _capture: bool) -> Option<ControlCode> {
        None
    }
}
