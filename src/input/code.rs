//! # Control Codes
//!
//! Packed integer identifiers for physical controls and their typed form.
//!
//! Every physical switch or axis the backend can report is addressed by a
//! 16-bit packed code. The layout is the addressing contract between the
//! engine and the backend, and matches what binding files store:
//!
//! | Bits | Meaning |
//! |------|---------|
//! | 15   | Set: mouse device |
//! | 14   | Set: joystick device (if bit 15 clear) |
//! | 13:8 | Device index (0-63) |
//! | 7:0  | Switch number, or packed axis for axis codes |
//!
//! For axis codes the low byte packs the axis index into bits [3:1] and the
//! movement direction into bit 0 (set = negative direction). Mouse codes
//! with a low byte below 0x06 and joystick codes with a low byte below 0x10
//! are axis codes; anything else in the low byte is a plain switch (button,
//! POV direction, key).
//!
//! Keyboard codes have neither class bit set; the low byte is the key scan
//! number and bits [13:8] select the keyboard.
//!
//! ## Usage
//!
//! ```
//! use arcade_input::input::code::{ControlCode, AxisDirection};
//!
//! let code = ControlCode::JoyAxis { joy: 1, axis: 2, direction: AxisDirection::Positive };
//! assert_eq!(code.encode(), 0x4104);
//! assert_eq!(ControlCode::decode(0x4104), code);
//! ```

/// Class bit for mouse codes.
pub const CLASS_MOUSE: u16 = 0x8000;
/// Class bit for joystick codes.
pub const CLASS_JOYSTICK: u16 = 0x4000;
/// Class value for keyboard codes (no class bit set).
pub const CLASS_KEYBOARD: u16 = 0x0000;

/// Mouse low-byte values below this address an axis.
const MOUSE_AXIS_LIMIT: u16 = 0x06;
/// Joystick low-byte values below this address an axis.
const JOY_AXIS_LIMIT: u16 = 0x10;

/// Direction of movement encoded in bit 0 of an axis code.
///
/// A set bit means the negative direction; the backend reports axis codes
/// with this bit reflecting which way the axis was moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDirection {
    /// Bit 0 clear.
    Positive,
    /// Bit 0 set.
    Negative,
}

impl AxisDirection {
    /// Decodes the direction from bit 0 of a code.
    #[must_use]
    pub fn from_bit(bit: u16) -> Self {
        if bit & 1 != 0 {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    /// Encodes the direction as bit 0 of a code.
    #[must_use]
    pub fn to_bit(self) -> u16 {
        match self {
            Self::Positive => 0,
            Self::Negative => 1,
        }
    }
}

/// A decoded control code: which physical control on which device.
///
/// The variants carry named fields for type safety inside the engine;
/// [`ControlCode::encode`] and [`ControlCode::decode`] convert to and from
/// the packed form bit-exactly so existing bindings keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCode {
    /// A key on a keyboard.
    Key {
        /// Keyboard index (0-63).
        keyboard: u8,
        /// Key scan number.
        scan: u8,
    },
    /// A joystick axis (with the direction it was moved in).
    JoyAxis {
        /// Joystick index (0-63).
        joy: u8,
        /// Axis index (0-7).
        axis: u8,
        /// Movement direction.
        direction: AxisDirection,
    },
    /// A joystick button or POV direction.
    JoySwitch {
        /// Joystick index (0-63).
        joy: u8,
        /// Switch number (0x10-0xFF).
        switch: u8,
    },
    /// A mouse axis (with the direction it was moved in).
    MouseAxis {
        /// Mouse index (0-63).
        mouse: u8,
        /// Axis index (0-2).
        axis: u8,
        /// Movement direction.
        direction: AxisDirection,
    },
    /// A mouse button.
    MouseSwitch {
        /// Mouse index (0-63).
        mouse: u8,
        /// Switch number (0x06-0xFF).
        switch: u8,
    },
}

impl ControlCode {
    /// Decodes a packed 16-bit control code.
    ///
    /// # Examples
    ///
    /// ```
    /// use arcade_input::input::code::{ControlCode, AxisDirection};
    ///
    /// // Mouse 0, axis 1, negative direction
    /// assert_eq!(
    ///     ControlCode::decode(0x8003),
    ///     ControlCode::MouseAxis { mouse: 0, axis: 1, direction: AxisDirection::Negative }
    /// );
    /// ```
    #[must_use]
    pub fn decode(code: u16) -> Self {
        let device = ((code >> 8) & 0x3F) as u8;
        let low = code & 0xFF;

        if code & CLASS_MOUSE != 0 {
            if low < MOUSE_AXIS_LIMIT {
                Self::MouseAxis {
                    mouse: device,
                    axis: ((low >> 1) & 0x07) as u8,
                    direction: AxisDirection::from_bit(low),
                }
            } else {
                Self::MouseSwitch {
                    mouse: device,
                    switch: low as u8,
                }
            }
        } else if code & CLASS_JOYSTICK != 0 {
            if low < JOY_AXIS_LIMIT {
                Self::JoyAxis {
                    joy: device,
                    axis: ((low >> 1) & 0x07) as u8,
                    direction: AxisDirection::from_bit(low),
                }
            } else {
                Self::JoySwitch {
                    joy: device,
                    switch: low as u8,
                }
            }
        } else {
            Self::Key {
                keyboard: device,
                scan: low as u8,
            }
        }
    }

    /// Encodes the control back into its packed 16-bit form.
    #[must_use]
    pub fn encode(self) -> u16 {
        match self {
            Self::Key { keyboard, scan } => {
                ((u16::from(keyboard) & 0x3F) << 8) | u16::from(scan)
            }
            Self::JoyAxis { joy, axis, direction } => {
                CLASS_JOYSTICK
                    | ((u16::from(joy) & 0x3F) << 8)
                    | ((u16::from(axis) & 0x07) << 1)
                    | direction.to_bit()
            }
            Self::JoySwitch { joy, switch } => {
                CLASS_JOYSTICK | ((u16::from(joy) & 0x3F) << 8) | u16::from(switch)
            }
            Self::MouseAxis { mouse, axis, direction } => {
                CLASS_MOUSE
                    | ((u16::from(mouse) & 0x3F) << 8)
                    | ((u16::from(axis) & 0x07) << 1)
                    | direction.to_bit()
            }
            Self::MouseSwitch { mouse, switch } => {
                CLASS_MOUSE | ((u16::from(mouse) & 0x3F) << 8) | u16::from(switch)
            }
        }
    }

    /// Returns true for keyboard codes.
    #[must_use]
    pub fn is_keyboard(self) -> bool {
        matches!(self, Self::Key { .. })
    }

    /// Returns the device index regardless of class.
    #[must_use]
    pub fn device(self) -> u8 {
        match self {
            Self::Key { keyboard, .. } => keyboard,
            Self::JoyAxis { joy, .. } | Self::JoySwitch { joy, .. } => joy,
            Self::MouseAxis { mouse, .. } | Self::MouseSwitch { mouse, .. } => mouse,
        }
    }
}
