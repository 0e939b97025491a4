//! # Mapping Engine
//!
//! Per-frame transform of raw backend reads into normalized logical values.
//!
//! [`InputEngine::run_frame`] runs once per emulated frame and performs
//! three passes over the registry:
//!
//! 1. **Slider pass** — integrates key pairs and joystick axes into the
//!    slider descriptors, with optional centering.
//! 2. **Value pass** — computes every descriptor's value from its source
//!    and, when committing, writes it through the output cell.
//! 3. **Macro pass** — fans the preset values of each triggered macro out
//!    to its targets.
//!
//! Computed values use the whole 16-bit range. Digital switches mapped to
//! analog targets report 0x0001 when inactive rather than 0, keeping 0 as
//! a "no read" sentinel for consumers.
//!
//! ## Usage
//!
//! ```
//! use arcade_input::backend::NullBackend;
//! use arcade_input::input::engine::InputEngine;
//! use arcade_input::input::registry::InputRegistry;
//!
//! let mut engine = InputEngine::new();
//! engine.set_backend(Box::new(NullBackend::new()));
//! engine.start()?;
//!
//! let mut registry = InputRegistry::new();
//! engine.run_frame(&mut registry, true)?;
//! engine.stop()?;
//! # Ok::<(), arcade_input::error::InputError>(())
//! ```

use tracing::{debug, info};

use crate::backend::{ControlName, InputBackend};
use crate::config::InputConfig;
use crate::error::{InputError, Result};
use crate::input::code::{ControlCode, CLASS_JOYSTICK, CLASS_KEYBOARD, CLASS_MOUSE};
use crate::input::finder::{ControlFinder, FindPhase};
use crate::input::registry::{
    InputKind, InputRegistry, Representation, SliderState, SLIDER_CENTER, SLIDER_MAX, SLIDER_MIN,
};

/// Default scale applied to mouse axes and relative joystick axes.
pub const DEFAULT_ANALOG_SPEED: i32 = 0x0100;

/// Highest device index probed when building the capability report.
const MAX_REPORTED_DEVICES: u16 = 16;

/// Reads a switch, masking keyboard controls off while keyboard input is
/// disabled (menus, chat and similar host-side states).
fn switch_state(backend: &mut dyn InputBackend, keyboard_input: bool, code: ControlCode) -> bool {
    if code.is_keyboard() && !keyboard_input {
        return false;
    }
    backend.read_switch(code)
}

/// Integrates one frame of movement into a slider.
fn tick_slider(slider: &mut SliderState, raw_delta: i32) {
    // Scale the raw +/-0x100 delta by the slider speed
    let delta = raw_delta * slider.speed / 0x100;

    if slider.center > 0 {
        // Attract to center
        let mut v = slider.value - SLIDER_CENTER;
        v *= slider.center - 1;
        v /= slider.center;
        slider.value = v + SLIDER_CENTER;
    }

    slider.value = (slider.value + delta).clamp(SLIDER_MIN, SLIDER_MAX);
}

/// Owns the active device backend and drives the per-frame mapping.
///
/// The backend is injected with [`InputEngine::set_backend`]; every
/// operation fails with [`InputError::NoBackend`] until one is set.
pub struct InputEngine {
    backend: Option<Box<dyn InputBackend>>,
    okay: bool,
    keyboard_input: bool,
    analog_speed: i32,
}

impl Default for InputEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InputEngine {
    /// Creates an engine with no backend selected.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backend: None,
            okay: false,
            keyboard_input: true,
            analog_speed: DEFAULT_ANALOG_SPEED,
        }
    }

    /// Creates an engine with settings taken from configuration.
    #[must_use]
    pub fn from_config(config: &InputConfig) -> Self {
        let mut engine = Self::new();
        engine.analog_speed = i32::from(config.analog_speed);
        engine
    }

    /// Selects the active backend, stopping any previous one.
    pub fn set_backend(&mut self, backend: Box<dyn InputBackend>) {
        if self.okay {
            // Best effort; a failing exit must not block reconfiguration
            let _ = self.stop();
        }
        self.backend = Some(backend);
    }

    /// Returns true once [`InputEngine::start`] has succeeded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.okay
    }

    /// Enables or disables keyboard switch reads for subsequent frames.
    pub fn set_keyboard_input(&mut self, enabled: bool) {
        self.keyboard_input = enabled;
    }

    /// Sets the analog speed scale (mouse axes, relative joystick axes).
    pub fn set_analog_speed(&mut self, speed: i32) {
        self.analog_speed = speed;
    }

    fn backend_mut(&mut self) -> Result<&mut (dyn InputBackend + '_)> {
        match self.backend.as_deref_mut() {
            Some(backend) => Ok(backend),
            None => Err(InputError::NoBackend),
        }
    }

    /// Initialises the selected backend.
    ///
    /// # Errors
    ///
    /// [`InputError::NoBackend`] when no backend is selected, or the
    /// backend's own initialisation error.
    pub fn start(&mut self) -> Result<()> {
        self.okay = false;
        let backend = self.backend_mut()?;
        backend.init()?;
        let name = backend.name();
        self.okay = true;
        info!("input backend '{name}' initialised");
        Ok(())
    }

    /// Releases the selected backend.
    pub fn stop(&mut self) -> Result<()> {
        self.okay = false;
        self.backend_mut()?.exit()
    }

    /// Requests exclusive access and/or foreground-only input processing.
    ///
    /// Backends without the capability succeed silently.
    ///
    /// # Errors
    ///
    /// [`InputError::NotInitialized`] before a successful `start`.
    pub fn set_cooperative_level(&mut self, exclusive: bool, foreground: bool) -> Result<()> {
        if !self.okay {
            return Err(InputError::NotInitialized);
        }
        self.backend_mut()?.set_cooperative_level(exclusive, foreground)
    }

    /// Looks up the name of a control and the device it is on.
    ///
    /// # Errors
    ///
    /// [`InputError::NotInitialized`] before a successful `start`,
    /// [`InputError::Unsupported`] when the backend cannot name controls.
    pub fn control_name(&mut self, code: ControlCode) -> Result<ControlName> {
        if !self.okay {
            return Err(InputError::NotInitialized);
        }
        self.backend_mut()?
            .control_name(code)
            .ok_or(InputError::Unsupported)
    }

    /// Runs one step of the control-learning protocol.
    ///
    /// See [`ControlFinder::probe`] for the protocol itself; this wrapper
    /// only resolves the active backend.
    pub fn probe(
        &mut self,
        finder: &mut ControlFinder,
        phase: FindPhase,
        poll: bool,
    ) -> Result<Option<ControlCode>> {
        let backend = self.backend_mut()?;
        Ok(finder.probe(backend, phase, poll))
    }

    /// Processes one frame of input and updates every descriptor.
    ///
    /// With `commit` set the computed values are also written through the
    /// output cells; otherwise only the computed values (and the slider
    /// integrators) change.
    ///
    /// # Errors
    ///
    /// [`InputError::NoBackend`] when no backend is selected. Device reads
    /// themselves never fail; unreadable devices report inactive.
    pub fn run_frame(&mut self, registry: &mut InputRegistry, commit: bool) -> Result<()> {
        let keyboard_input = self.keyboard_input;
        let analog_speed = self.analog_speed;
        let backend = self.backend.as_deref_mut().ok_or(InputError::NoBackend)?;

        backend.new_frame();

        // Do one frame's worth of slider movement
        for input in &mut registry.inputs {
            match &mut input.kind {
                InputKind::KeySlider { keys, slider } => {
                    let mut delta = 0;
                    if switch_state(backend, keyboard_input, keys[0]) {
                        delta -= 0x100;
                    }
                    if switch_state(backend, keyboard_input, keys[1]) {
                        delta += 0x100;
                    }
                    tick_slider(slider, delta);
                }
                InputKind::JoySlider { joy, axis, slider } => {
                    let delta = backend.read_joy_axis(*joy, *axis) / 0x100;
                    tick_slider(slider, delta);
                }
                _ => {}
            }
        }

        // Compute every descriptor's value and write it through on commit
        for input in &mut registry.inputs {
            match &input.kind {
                InputKind::Undefined => {
                    input.value = 0;
                }
                InputKind::Constant { value } => {
                    input.value = *value;
                    if commit {
                        if let Some(out) = &input.output {
                            out.store_byte(input.value as u8);
                        }
                    }
                }
                InputKind::Switch { code } => {
                    let active = switch_state(backend, keyboard_input, *code);
                    if input.rep.is_analog() {
                        // Analog targets snap to full scale, never to 0
                        input.value = if active { 0xFFFF } else { 0x0001 };
                        if commit {
                            if let Some(out) = &input.output {
                                out.store_word(input.value);
                            }
                        }
                    } else {
                        input.value = u16::from(active);
                        if commit {
                            if let Some(out) = &input.output {
                                out.store_byte(input.value as u8);
                            }
                        }
                    }
                }
                InputKind::KeySlider { slider, .. } | InputKind::JoySlider { slider, .. } => {
                    let mut v = slider.value;
                    if input.rep == Representation::AnalogRelative {
                        // Relative mode re-centers and drops resolution
                        v = (v - SLIDER_CENTER) >> 4;
                    }
                    input.value = v as u16;
                    if commit {
                        if let Some(out) = &input.output {
                            out.store_word(input.value);
                        }
                    }
                }
                InputKind::MouseAxis { mouse, axis } => {
                    let raw = backend.read_mouse_axis(*mouse, *axis);
                    input.value = raw.wrapping_mul(analog_speed) as u16;
                    if commit {
                        if let Some(out) = &input.output {
                            out.store_word(input.value);
                        }
                    }
                }
                InputKind::JoyAxisFull { joy, axis } => {
                    let raw = backend.read_joy_axis(*joy, *axis);
                    let v = if input.rep == Representation::AnalogRelative {
                        (raw.wrapping_mul(analog_speed) >> 13).clamp(-32768, 32767)
                    } else {
                        ((raw >> 1) + 0x8000).clamp(0x0001, 0xFFFF)
                    };
                    input.value = v as u16;
                    if commit {
                        if let Some(out) = &input.output {
                            out.store_word(input.value);
                        }
                    }
                }
                InputKind::JoyAxisNeg { joy, axis } => {
                    let raw = backend.read_joy_axis(*joy, *axis);
                    input.value = if raw < 32767 {
                        (-raw).clamp(0x0000, 0xFFFF) as u16
                    } else {
                        0
                    };
                    if commit {
                        if let Some(out) = &input.output {
                            out.store_word(input.value);
                        }
                    }
                }
                InputKind::JoyAxisPos { joy, axis } => {
                    let raw = backend.read_joy_axis(*joy, *axis);
                    input.value = if raw > 32767 {
                        raw.clamp(0x0000, 0xFFFF) as u16
                    } else {
                        0
                    };
                    if commit {
                        if let Some(out) = &input.output {
                            out.store_word(input.value);
                        }
                    }
                }
            }
        }

        // Fire the macros
        for mac in &registry.macros {
            if !mac.defined {
                continue;
            }
            if commit && switch_state(backend, keyboard_input, mac.trigger) {
                debug!("macro triggered by {:?}", mac.trigger);
                for (cell, value) in mac.outputs.iter().flatten() {
                    cell.set(*value);
                }
            }
        }

        Ok(())
    }

    /// Builds a human-readable report of the attached devices.
    ///
    /// One line per found device per class (`keyboard`, `mouse`,
    /// `joystick`), probing indices upward until the backend stops naming
    /// them. Before a successful `start` the report is a single "not
    /// initialised" line.
    pub fn describe(&mut self) -> Vec<String> {
        if !self.okay {
            return vec!["input backend not initialised".to_string()];
        }
        let Some(backend) = self.backend.as_deref_mut() else {
            return vec!["input backend not initialised".to_string()];
        };

        let mut lines = vec![format!("module {}", backend.name())];
        lines.extend(backend.settings());

        let classes = [
            ("keyboard", CLASS_KEYBOARD),
            ("mouse   ", CLASS_MOUSE),
            ("joystick", CLASS_JOYSTICK),
        ];
        for (label, class) in classes {
            for index in 0..MAX_REPORTED_DEVICES {
                let code = ControlCode::decode(class | (index << 8));
                match backend.control_name(code) {
                    Some(name) if !name.device.is_empty() => {
                        lines.push(format!("{label} {index} {}", name.device));
                    }
                    _ => break,
                }
            }
        }

        lines
    }
}
