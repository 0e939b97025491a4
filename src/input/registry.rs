//! # Control Registry
//!
//! Descriptors for the logical controls of the emulated game.
//!
//! The registry is built and owned by configuration loading before the
//! engine runs; the engine never creates or destroys descriptors. It only
//! updates each descriptor's computed value and slider integrator, and on
//! a committed frame the externally-owned output cells.
//!
//! ## Output cells
//!
//! Emulated game memory is shared with the consumer through [`OutputCell`]:
//! a byte cell for digital controls and macro targets, a 16-bit cell for
//! analog controls. Cells are `Rc<Cell<_>>` handles, so the game side keeps
//! one handle and the descriptor another (the whole layer is
//! single-threaded).

use std::cell::Cell;
use std::rc::Rc;

use crate::input::code::ControlCode;

/// Lower clamp of a slider integrator.
pub const SLIDER_MIN: i32 = 0x0100;
/// Upper clamp of a slider integrator.
pub const SLIDER_MAX: i32 = 0xFF00;
/// Resting midpoint of a slider integrator.
pub const SLIDER_CENTER: i32 = 0x8000;

/// How the target storage interprets the computed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// Binary 0/1 stored in a byte cell.
    Digital,
    /// Absolute analog position stored in a 16-bit cell.
    AnalogAbsolute,
    /// Relative analog movement stored in a 16-bit cell.
    AnalogRelative,
}

impl Representation {
    /// Returns true for either analog mode.
    #[must_use]
    pub fn is_analog(self) -> bool {
        matches!(self, Self::AnalogAbsolute | Self::AnalogRelative)
    }
}

/// Integrator state of a virtual slider control.
///
/// The value stays within [`SLIDER_MIN`]..=[`SLIDER_MAX`]; a `center`
/// strength above zero pulls it toward [`SLIDER_CENTER`] every frame
/// before the frame's delta is applied (higher strength = weaker pull).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderState {
    /// Current integrator value.
    pub value: i32,
    /// Centering strength; 0 disables centering.
    pub center: i32,
    /// Speed scale applied to the raw delta, in units of 1/0x100.
    pub speed: i32,
}

impl SliderState {
    /// Creates a slider resting at the midpoint.
    #[must_use]
    pub fn new(speed: i32, center: i32) -> Self {
        Self {
            value: SLIDER_CENTER,
            center,
            speed,
        }
    }
}

impl Default for SliderState {
    fn default() -> Self {
        Self::new(0x100, 0)
    }
}

/// Externally-owned storage cell a computed value is written through.
#[derive(Debug, Clone)]
pub enum OutputCell {
    /// Byte-wide game input (digital controls, constants, macro targets).
    Byte(Rc<Cell<u8>>),
    /// 16-bit game input (analog controls).
    Word(Rc<Cell<u16>>),
}

impl OutputCell {
    /// Creates a byte cell and returns it with the game-side handle.
    #[must_use]
    pub fn byte() -> (Self, Rc<Cell<u8>>) {
        let cell = Rc::new(Cell::new(0));
        (Self::Byte(Rc::clone(&cell)), cell)
    }

    /// Creates a 16-bit cell and returns it with the game-side handle.
    #[must_use]
    pub fn word() -> (Self, Rc<Cell<u16>>) {
        let cell = Rc::new(Cell::new(0));
        (Self::Word(Rc::clone(&cell)), cell)
    }

    /// Stores a byte-wide value; a 16-bit cell is zero-extended.
    pub fn store_byte(&self, value: u8) {
        match self {
            Self::Byte(cell) => cell.set(value),
            Self::Word(cell) => cell.set(u16::from(value)),
        }
    }

    /// Stores a 16-bit value; a byte cell keeps the low byte.
    pub fn store_word(&self, value: u16) {
        match self {
            Self::Byte(cell) => cell.set(value as u8),
            Self::Word(cell) => cell.set(value),
        }
    }
}

/// Source of a logical input's value.
///
/// Slider kinds carry their integrator inline, so it exists exactly when
/// the kind calls for one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// No source; the value is forced to 0.
    Undefined,
    /// A fixed value.
    Constant {
        /// Value reported every frame.
        value: u16,
    },
    /// A digital switch.
    Switch {
        /// The switch to read.
        code: ControlCode,
    },
    /// Slider driven by a decrement/increment key pair.
    KeySlider {
        /// Keys for the negative and positive direction.
        keys: [ControlCode; 2],
        /// Integrator state.
        slider: SliderState,
    },
    /// Slider driven by a joystick axis.
    JoySlider {
        /// Joystick index.
        joy: u8,
        /// Axis index.
        axis: u8,
        /// Integrator state.
        slider: SliderState,
    },
    /// Mouse axis delta.
    MouseAxis {
        /// Mouse index.
        mouse: u8,
        /// Axis index.
        axis: u8,
    },
    /// Full range of a joystick axis.
    JoyAxisFull {
        /// Joystick index.
        joy: u8,
        /// Axis index.
        axis: u8,
    },
    /// Negative half of a joystick axis (readings below center).
    JoyAxisNeg {
        /// Joystick index.
        joy: u8,
        /// Axis index.
        axis: u8,
    },
    /// Positive half of a joystick axis (readings above center).
    JoyAxisPos {
        /// Joystick index.
        joy: u8,
        /// Axis index.
        axis: u8,
    },
}

impl InputKind {
    /// Returns true for the slider kinds.
    #[must_use]
    pub fn is_slider(&self) -> bool {
        matches!(self, Self::KeySlider { .. } | Self::JoySlider { .. })
    }
}

/// One logical control of the emulated game.
#[derive(Debug, Clone)]
pub struct GameInput {
    /// Where the value comes from.
    pub kind: InputKind,
    /// How the target storage interprets it.
    pub rep: Representation,
    /// Storage written through on commit; `None` computes only.
    pub output: Option<OutputCell>,
    /// Last value produced, updated every frame.
    pub value: u16,
}

impl GameInput {
    /// Creates a descriptor with no output cell.
    #[must_use]
    pub fn new(kind: InputKind, rep: Representation) -> Self {
        Self {
            kind,
            rep,
            output: None,
            value: 0,
        }
    }

    /// Attaches an output cell.
    #[must_use]
    pub fn with_output(mut self, output: OutputCell) -> Self {
        self.output = Some(output);
        self
    }
}

/// Number of targets a macro can fan out to.
pub const MACRO_TARGETS: usize = 4;

/// One physical trigger fanned out to up to four byte writes.
#[derive(Debug, Clone)]
pub struct MacroInput {
    /// Whether the macro is defined; undefined macros are skipped.
    pub defined: bool,
    /// Switch that fires the macro.
    pub trigger: ControlCode,
    /// Target cells and the preset values written to them.
    pub outputs: [Option<(Rc<Cell<u8>>, u8)>; MACRO_TARGETS],
}

impl MacroInput {
    /// Creates a defined macro with no targets yet.
    #[must_use]
    pub fn new(trigger: ControlCode) -> Self {
        Self {
            defined: true,
            trigger,
            outputs: [None, None, None, None],
        }
    }

    /// Sets one of the four target slots.
    #[must_use]
    pub fn with_target(mut self, slot: usize, cell: Rc<Cell<u8>>, value: u8) -> Self {
        self.outputs[slot] = Some((cell, value));
        self
    }
}

/// The ordered collection of logical inputs plus trailing macros.
#[derive(Debug, Clone, Default)]
pub struct InputRegistry {
    /// Logical game inputs, in configuration order.
    pub inputs: Vec<GameInput>,
    /// Macro descriptors.
    pub macros: Vec<MacroInput>,
}

impl InputRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
