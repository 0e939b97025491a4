//! # Control Finder
//!
//! State machine for the interactive control-learning protocol.
//!
//! The caller drives [`ControlFinder::probe`] once per frame through four
//! phases in strict sequence:
//!
//! 1. [`FindPhase::Arm`] — reset the finder and let the backend take a
//!    fresh baseline of analog positions.
//! 2. [`FindPhase::AwaitRelease`] — repeat until the result is `None`,
//!    i.e. every control is at rest.
//! 3. [`FindPhase::AwaitActivate`] — repeat until a control is reported;
//!    it becomes the candidate.
//! 4. [`FindPhase::Confirm`] — repeat while the user holds or keeps moving
//!    the control; the returned candidate tracks the direction an axis is
//!    moved in.
//!
//! Analog sources are noisy at rest, so `Confirm` debounces them: a
//! joystick-axis candidate is cancelled once the axis sits still (within a
//! small window) for more than [`JOY_CONFIRM_TIMEOUT`] calls, and a
//! mouse-axis candidate once the backend reports nothing or movement
//! against the candidate's direction for more than
//! [`MOUSE_CONFIRM_TIMEOUT`] calls. Digital controls need no filtering and
//! pass the backend result straight through.
//!
//! A `None` out of `Confirm` is not an error; it tells the caller to go
//! back to `AwaitActivate` and keep waiting. Abandoning the protocol is
//! simply ceasing to call `probe`.
//!
//! ## Usage
//!
//! ```
//! use arcade_input::backend::NullBackend;
//! use arcade_input::input::finder::{ControlFinder, FindPhase};
//!
//! let mut backend = NullBackend::new();
//! let mut finder = ControlFinder::new();
//!
//! finder.probe(&mut backend, FindPhase::Arm, true);
//! // Next frames: AwaitRelease until None, AwaitActivate until Some, ...
//! let released = finder.probe(&mut backend, FindPhase::AwaitRelease, true);
//! assert_eq!(released, None);
//! ```

use tracing::debug;

use crate::backend::InputBackend;
use crate::input::code::{AxisDirection, ControlCode};

/// Joystick movement within +/- this window counts as rest.
pub const JOY_CONFIRM_THRESHOLD: i32 = 0x100;
/// Quiet confirm calls after which a joystick-axis candidate is cancelled.
pub const JOY_CONFIRM_TIMEOUT: u32 = 64;
/// Idle/contrary confirm calls after which a mouse-axis candidate is
/// cancelled.
pub const MOUSE_CONFIRM_TIMEOUT: u32 = 128;

/// Phase of the control-learning protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindPhase {
    /// Reset the finder and the backend's analog baselines.
    Arm,
    /// Wait for every control to be released.
    AwaitRelease,
    /// Wait for the user to operate a control.
    AwaitActivate,
    /// Hold the candidate while filtering out accidental movement.
    Confirm,
}

/// Holds the candidate control and debounce state across probe calls.
///
/// One finder per learning session; [`FindPhase::Arm`] resets it for the
/// next binding.
#[derive(Debug, Default)]
pub struct ControlFinder {
    candidate: Option<ControlCode>,
    joy_baseline: i32,
    delay: u32,
}

impl ControlFinder {
    /// Creates a finder with no candidate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current candidate, if any.
    #[must_use]
    pub fn candidate(&self) -> Option<ControlCode> {
        self.candidate
    }

    /// Runs one step of the protocol.
    ///
    /// Set `poll` when the engine's own per-frame poll is not running, so
    /// the backend still refreshes device state this call.
    pub fn probe(
        &mut self,
        backend: &mut dyn InputBackend,
        phase: FindPhase,
        poll: bool,
    ) -> Option<ControlCode> {
        if poll {
            backend.new_frame();
        }

        match phase {
            FindPhase::Arm => {
                self.candidate = None;
                self.joy_baseline = 0;
                self.delay = 0;
                // Baseline capture on the backend side; result discarded
                backend.find(true);
                None
            }
            FindPhase::AwaitRelease => backend.find(false),
            FindPhase::AwaitActivate => {
                let found = backend.find(true);
                if let Some(code) = found {
                    debug!("candidate control {:?}", code);
                    self.candidate = Some(code);
                    self.delay = 0;
                    if let ControlCode::JoyAxis { joy, axis, .. } = code {
                        self.joy_baseline = backend.read_joy_axis(joy, axis);
                    }
                }
                found
            }
            FindPhase::Confirm => self.confirm(backend),
        }
    }

    fn confirm(&mut self, backend: &mut dyn InputBackend) -> Option<ControlCode> {
        let found = backend.find(false);

        match self.candidate {
            // Joystick axes report jitter at rest; wait until the axis
            // sits still for a while before giving up on the candidate
            Some(ControlCode::JoyAxis { joy, axis, .. }) => {
                let position = backend.read_joy_axis(joy, axis);
                let delta = self.joy_baseline - position;
                self.joy_baseline = position;

                if found.is_some() {
                    self.candidate = found;
                }

                if delta > -JOY_CONFIRM_THRESHOLD && delta < JOY_CONFIRM_THRESHOLD {
                    self.delay += 1;
                    if self.delay > JOY_CONFIRM_TIMEOUT {
                        return None;
                    }
                } else {
                    self.delay = 0;
                }

                self.candidate
            }
            // Mouse axes confirm by continuing to move the same way; idle
            // frames or movement against the candidate's direction count
            // toward the timeout
            Some(ControlCode::MouseAxis { mouse, axis, direction }) => {
                let delta = backend.read_mouse_axis(mouse, axis);
                let contrary = match direction {
                    AxisDirection::Negative => delta > 0,
                    AxisDirection::Positive => delta < 0,
                };

                if found.is_none() || contrary {
                    self.delay += 1;
                    if self.delay > MOUSE_CONFIRM_TIMEOUT {
                        return None;
                    }
                } else {
                    self.delay = 0;
                    self.candidate = found;
                }

                self.candidate
            }
            // Digital controls are binary; pass the backend result through
            _ => found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mocks::ScriptedBackend;
    use crate::input::code::AxisDirection;

    const KEY: ControlCode = ControlCode::Key { keyboard: 0, scan: 0x1E };
    const JOY_X: ControlCode = ControlCode::JoyAxis {
        joy: 0,
        axis: 0,
        direction: AxisDirection::Positive,
    };
    const MOUSE_X_POS: ControlCode = ControlCode::MouseAxis {
        mouse: 0,
        axis: 0,
        direction: AxisDirection::Positive,
    };

    /// Arms the finder and walks it to a confirmed candidate.
    fn activate(finder: &mut ControlFinder, backend: &mut ScriptedBackend, code: ControlCode) {
        finder.probe(backend, FindPhase::Arm, true);
        backend.push_find(None);
        assert_eq!(finder.probe(backend, FindPhase::AwaitRelease, true), None);
        backend.push_find(Some(code));
        assert_eq!(
            finder.probe(backend, FindPhase::AwaitActivate, true),
            Some(code)
        );
    }

    // ==================== Protocol Tests ====================

    #[test]
    fn test_arm_resets_state() {
        let mut backend = ScriptedBackend::new();
        let mut finder = ControlFinder::new();
        activate(&mut finder, &mut backend, KEY);
        assert_eq!(finder.candidate(), Some(KEY));

        assert_eq!(finder.probe(&mut backend, FindPhase::Arm, true), None);
        assert_eq!(finder.candidate(), None);
    }

    #[test]
    fn test_await_release_returns_raw_result() {
        let mut backend = ScriptedBackend::new();
        let mut finder = ControlFinder::new();
        finder.probe(&mut backend, FindPhase::Arm, true);

        // Control still held: result passed through, no candidate stored
        backend.push_find(Some(KEY));
        assert_eq!(
            finder.probe(&mut backend, FindPhase::AwaitRelease, true),
            Some(KEY)
        );
        assert_eq!(finder.candidate(), None);

        backend.push_find(None);
        assert_eq!(finder.probe(&mut backend, FindPhase::AwaitRelease, true), None);
    }

    #[test]
    fn test_digital_control_confirms_without_debounce() {
        let mut backend = ScriptedBackend::new();
        let mut finder = ControlFinder::new();
        activate(&mut finder, &mut backend, KEY);

        // Still held
        assert_eq!(finder.probe(&mut backend, FindPhase::Confirm, true), Some(KEY));

        // Released: the raw result comes straight through
        backend.push_find(None);
        assert_eq!(finder.probe(&mut backend, FindPhase::Confirm, true), None);
    }

    #[test]
    fn test_probe_polls_backend_when_asked() {
        let mut backend = ScriptedBackend::new();
        let mut finder = ControlFinder::new();

        finder.probe(&mut backend, FindPhase::Arm, true);
        assert_eq!(backend.frames(), 1);
        finder.probe(&mut backend, FindPhase::AwaitRelease, false);
        assert_eq!(backend.frames(), 1);
    }

    // ==================== Joystick Debounce Tests ====================

    #[test]
    fn test_joy_activate_records_baseline_then_times_out() {
        let mut backend = ScriptedBackend::new();
        backend.set_joy_axis(0, 0, 5000);

        let mut finder = ControlFinder::new();
        activate(&mut finder, &mut backend, JOY_X);
        backend.push_find(None);

        // Axis sits still: the candidate survives 64 confirm calls
        for call in 1..=JOY_CONFIRM_TIMEOUT {
            assert_eq!(
                finder.probe(&mut backend, FindPhase::Confirm, true),
                Some(JOY_X),
                "call {call} should keep the candidate"
            );
        }

        // Call 65 cancels
        assert_eq!(finder.probe(&mut backend, FindPhase::Confirm, true), None);
    }

    #[test]
    fn test_joy_movement_resets_debounce() {
        // Movement outside the +/-0x100 window resets the quiet counter;
        // movement within it does not. The window test is a deliberate
        // both-sides (logical AND) check.
        let mut backend = ScriptedBackend::new();
        backend.set_joy_axis(0, 0, 0);

        let mut finder = ControlFinder::new();
        activate(&mut finder, &mut backend, JOY_X);
        backend.push_find(None);

        let mut position = 0;
        for _ in 0..JOY_CONFIRM_TIMEOUT {
            assert_eq!(
                finder.probe(&mut backend, FindPhase::Confirm, true),
                Some(JOY_X)
            );
        }

        // A real movement on what would have been the final quiet call
        position += 0x1000;
        backend.set_joy_axis(0, 0, position);
        assert_eq!(finder.probe(&mut backend, FindPhase::Confirm, true), Some(JOY_X));

        // The counter restarted, so 64 more quiet calls still confirm
        for call in 1..=JOY_CONFIRM_TIMEOUT {
            assert_eq!(
                finder.probe(&mut backend, FindPhase::Confirm, true),
                Some(JOY_X),
                "call {call} after movement should keep the candidate"
            );
        }
        assert_eq!(finder.probe(&mut backend, FindPhase::Confirm, true), None);
    }

    #[test]
    fn test_joy_jitter_within_window_counts_as_rest() {
        let mut backend = ScriptedBackend::new();
        backend.set_joy_axis(0, 0, 0);

        let mut finder = ControlFinder::new();
        activate(&mut finder, &mut backend, JOY_X);
        backend.push_find(None);

        // +/-0x40 of jitter never resets the counter
        for call in 0..JOY_CONFIRM_TIMEOUT {
            let jitter = if call % 2 == 0 { 0x40 } else { -0x40 };
            backend.set_joy_axis(0, 0, jitter);
            assert_eq!(
                finder.probe(&mut backend, FindPhase::Confirm, true),
                Some(JOY_X)
            );
        }
        assert_eq!(finder.probe(&mut backend, FindPhase::Confirm, true), None);
    }

    #[test]
    fn test_joy_confirm_tracks_new_find_result() {
        let mut backend = ScriptedBackend::new();
        backend.set_joy_axis(0, 0, 0);

        let mut finder = ControlFinder::new();
        activate(&mut finder, &mut backend, JOY_X);

        // The axis is now moved the other way; the backend reports the
        // negative-direction code and the candidate follows
        let joy_x_neg = ControlCode::JoyAxis {
            joy: 0,
            axis: 0,
            direction: AxisDirection::Negative,
        };
        backend.push_find(Some(joy_x_neg));
        backend.set_joy_axis(0, 0, -0x2000);
        assert_eq!(
            finder.probe(&mut backend, FindPhase::Confirm, true),
            Some(joy_x_neg)
        );
        assert_eq!(finder.candidate(), Some(joy_x_neg));
    }

    // ==================== Mouse Debounce Tests ====================

    #[test]
    fn test_mouse_consistent_motion_confirms() {
        let mut backend = ScriptedBackend::new();
        let mut finder = ControlFinder::new();
        activate(&mut finder, &mut backend, MOUSE_X_POS);

        // Moving the same way with the backend still reporting the code
        backend.push_find(Some(MOUSE_X_POS));
        backend.set_mouse_axis(0, 0, 4);
        for _ in 0..200 {
            assert_eq!(
                finder.probe(&mut backend, FindPhase::Confirm, true),
                Some(MOUSE_X_POS)
            );
        }
    }

    #[test]
    fn test_mouse_idle_times_out_after_128() {
        let mut backend = ScriptedBackend::new();
        let mut finder = ControlFinder::new();
        activate(&mut finder, &mut backend, MOUSE_X_POS);

        backend.push_find(None);
        backend.set_mouse_axis(0, 0, 0);
        for call in 1..=MOUSE_CONFIRM_TIMEOUT {
            assert_eq!(
                finder.probe(&mut backend, FindPhase::Confirm, true),
                Some(MOUSE_X_POS),
                "call {call} should keep the candidate"
            );
        }
        assert_eq!(finder.probe(&mut backend, FindPhase::Confirm, true), None);
    }

    #[test]
    fn test_mouse_contrary_motion_counts_toward_timeout() {
        let mut backend = ScriptedBackend::new();
        let mut finder = ControlFinder::new();
        activate(&mut finder, &mut backend, MOUSE_X_POS);

        // Backend still reports the control, but the delta fights the
        // candidate's direction
        backend.push_find(Some(MOUSE_X_POS));
        backend.set_mouse_axis(0, 0, -4);
        for _ in 1..=MOUSE_CONFIRM_TIMEOUT {
            assert_eq!(
                finder.probe(&mut backend, FindPhase::Confirm, true),
                Some(MOUSE_X_POS)
            );
        }
        assert_eq!(finder.probe(&mut backend, FindPhase::Confirm, true), None);
    }

    #[test]
    fn test_mouse_consistent_motion_resets_timeout() {
        let mut backend = ScriptedBackend::new();
        let mut finder = ControlFinder::new();
        activate(&mut finder, &mut backend, MOUSE_X_POS);

        // Idle almost to the limit
        backend.push_find(None);
        backend.set_mouse_axis(0, 0, 0);
        for _ in 0..MOUSE_CONFIRM_TIMEOUT {
            finder.probe(&mut backend, FindPhase::Confirm, true);
        }

        // One consistent move resets the counter
        backend.push_find(Some(MOUSE_X_POS));
        backend.set_mouse_axis(0, 0, 2);
        assert_eq!(
            finder.probe(&mut backend, FindPhase::Confirm, true),
            Some(MOUSE_X_POS)
        );

        // A fresh run of idle calls is needed before cancelling
        backend.push_find(None);
        backend.set_mouse_axis(0, 0, 0);
        for call in 1..=MOUSE_CONFIRM_TIMEOUT {
            assert_eq!(
                finder.probe(&mut backend, FindPhase::Confirm, true),
                Some(MOUSE_X_POS),
                "call {call} after reset should keep the candidate"
            );
        }
        assert_eq!(finder.probe(&mut backend, FindPhase::Confirm, true), None);
    }
}
