//! # Device Backend
//!
//! Trait abstraction over the platform input driver (keyboard, mouse and
//! joystick polling). Exactly one backend is active at a time; the engine
//! receives it injected at startup rather than picking it from a global
//! table.
//!
//! Reads never fail: a disconnected or unreadable device reports inactive
//! switches and zero axes. The optional capabilities (`control_name`,
//! `set_cooperative_level`, `settings`) have default implementations so a
//! minimal driver only has to provide polling and reads.

pub mod null;

pub use null::NullBackend;

use crate::error::Result;
use crate::input::code::ControlCode;

/// Name of a control and the device it is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlName {
    /// Human-readable device name, e.g. "USB Gamepad".
    pub device: String,
    /// Human-readable control name, e.g. "Button 3".
    pub control: String,
}

/// Platform input driver capability set.
///
/// Implementations wrap a native input API (DirectInput, SDL, evdev, ...).
/// All operations are synchronous; the engine calls [`InputBackend::new_frame`]
/// once per emulated frame before any read.
#[cfg_attr(test, mockall::automock)]
pub trait InputBackend {
    /// Short driver name for diagnostic reports.
    fn name(&self) -> &'static str;

    /// Acquires devices and prepares for polling.
    fn init(&mut self) -> Result<()>;

    /// Releases all devices.
    fn exit(&mut self) -> Result<()>;

    /// Refreshes all polled device state for the current frame.
    fn new_frame(&mut self);

    /// Reads the state of a digital switch (key, button, POV direction).
    fn read_switch(&mut self, code: ControlCode) -> bool;

    /// Reads a joystick axis. Centered axes read 0 at rest and about
    /// +/-0x10000 at full deflection.
    fn read_joy_axis(&mut self, joy: u8, axis: u8) -> i32;

    /// Reads a mouse axis delta for the current frame.
    fn read_mouse_axis(&mut self, mouse: u8, axis: u8) -> i32;

    /// Returns the code of the control the user is currently operating,
    /// or `None` when everything is at rest.
    ///
    /// With `capture` set the backend takes a fresh baseline of analog
    /// positions, so subsequent calls report movement relative to it.
    fn find(&mut self, capture: bool) -> Option<ControlCode>;

    /// Looks up the name of a control and its device.
    ///
    /// Optional capability: the default reports nothing. Device names are
    /// queried with the switch/axis part of the code set to zero.
    fn control_name(&mut self, _code: ControlCode) -> Option<ControlName> {
        None
    }

    /// Requests exclusive access and/or foreground-only input processing.
    ///
    /// Optional capability: drivers that cannot honour it succeed without
    /// effect.
    fn set_cooperative_level(&mut self, _exclusive: bool, _foreground: bool) -> Result<()> {
        Ok(())
    }

    /// Driver-specific settings lines for diagnostic reports.
    fn settings(&self) -> Vec<String> {
        Vec::new()
    }
}
